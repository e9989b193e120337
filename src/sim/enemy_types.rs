//! Enemy catalogue
//!
//! Registration table of every enemy type. Hook timers live in `Enemy::args`
//! and count down with `World::dt`.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use super::enemy::{Enemy, EnemyType};
use super::pickup::PickupKind;
use super::projectile::{ProjectileHooks, ProjectileSpec, UpdateHook};
use super::state::World;
use crate::render::VisualKind;
use crate::{SimError, direction_from_angle, random_angle};

fn drop_money(enemy: &mut Enemy, world: &mut World) {
    world.spawn_pickup(PickupKind::Money, enemy.pos);
}

/// Counts `args[0]` down; true (and re-armed to `reset`) once it runs out
fn timer_elapsed(enemy: &mut Enemy, world: &World, reset: f32) -> bool {
    enemy.args[0] -= world.dt;
    if enemy.args[0] < 0.0 {
        enemy.args[0] = reset;
        return true;
    }
    false
}

fn hostile_shot(visual: VisualKind, pos: Vec2, dir: Vec2, damage: f32) -> ProjectileSpec {
    ProjectileSpec {
        dir,
        damage,
        unfriendly: true,
        ..ProjectileSpec::new(visual, pos)
    }
}

fn standard_create(enemy: &mut Enemy, world: &mut World) {
    enemy.base_visual = VisualKind::Standard(world.rng.random_range(1..=5));
}

fn kissing_create(enemy: &mut Enemy, _world: &mut World) {
    enemy.args[0] = 2.0;
}

fn kissing_update(enemy: &mut Enemy, world: &mut World) {
    if !timer_elapsed(enemy, world, 4.0) {
        return;
    }
    let dir = (world.player.pos - enemy.pos).normalize_or_zero() * 300.0;
    world.spawn_projectile(hostile_shot(VisualKind::Heart, enemy.pos, dir, 10.0));
}

fn party_create(enemy: &mut Enemy, _world: &mut World) {
    enemy.args[0] = 0.8;
}

fn party_update(enemy: &mut Enemy, world: &mut World) {
    if !timer_elapsed(enemy, world, 1.0) {
        return;
    }
    let dir = direction_from_angle(random_angle(&mut world.rng)) * 450.0;
    let variant = if world.rng.random::<f32>() > 0.5 { 1 } else { 2 };
    world.spawn_projectile(hostile_shot(
        VisualKind::Confetti(variant),
        enemy.pos,
        dir,
        9.0,
    ));
}

fn star_death(enemy: &mut Enemy, world: &mut World) {
    drop_money(enemy, world);
    world.spawn_enemy_named("starNoEyes", enemy.pos);
    // A frozen star dies silently, same as a frozen sick one
    if enemy.is_frozen() {
        return;
    }
    for _ in 0..2 {
        let dir = direction_from_angle(random_angle(&mut world.rng)) * 300.0;
        world.spawn_projectile(hostile_shot(VisualKind::Star, enemy.pos, dir, 25.0));
    }
}

fn sick_death(enemy: &mut Enemy, world: &mut World) {
    if enemy.is_frozen() {
        return;
    }
    for n in 0..12 {
        let dir = direction_from_angle(n as f32 * PI / 6.0) * 450.0;
        world.spawn_projectile(ProjectileSpec {
            lifetime: 2.0,
            hooks: ProjectileHooks {
                on_update: Some(UpdateHook::Decelerate),
                ..Default::default()
            },
            ..hostile_shot(VisualKind::Germ, enemy.pos, dir, 20.0)
        });
    }
}

fn angry_death(enemy: &mut Enemy, world: &mut World) {
    world.spawn_enemy_named("furious", enemy.pos);
}

fn sleeping_death(enemy: &mut Enemy, world: &mut World) {
    world.spawn_enemy_named("wokenUp", enemy.pos);
}

// Charges along the direction the player was in at creation
fn laughing_create(enemy: &mut Enemy, world: &mut World) {
    let dir = (world.player.pos - enemy.pos).normalize_or_zero() * 200.0;
    enemy.args = dir.to_array();
}

fn laughing_update(enemy: &mut Enemy, world: &mut World) {
    enemy.pos += Vec2::from_array(enemy.args) * world.dt;
}

pub static ENEMY_TYPES: [EnemyType; 13] = [
    EnemyType {
        on_create: Some(standard_create),
        ..EnemyType::new("standard", VisualKind::Standard(1))
    },
    EnemyType {
        on_create: Some(kissing_create),
        on_update: Some(kissing_update),
        ..EnemyType::new("kissing", VisualKind::Kissing)
    },
    EnemyType {
        on_death: Some(drop_money),
        ..EnemyType::new("money", VisualKind::Money)
    },
    EnemyType {
        on_create: Some(party_create),
        on_update: Some(party_update),
        ..EnemyType::new("party", VisualKind::Party)
    },
    EnemyType {
        health: 300.0,
        on_death: Some(star_death),
        ..EnemyType::new("star", VisualKind::StarEyes)
    },
    EnemyType {
        health: 200.0,
        ..EnemyType::new("starNoEyes", VisualKind::Standard(5))
    },
    EnemyType {
        on_death: Some(sick_death),
        ..EnemyType::new("sick", VisualKind::Sick)
    },
    EnemyType {
        health: 1.0,
        on_death: Some(angry_death),
        ..EnemyType::new("angry", VisualKind::Angry)
    },
    EnemyType {
        health: 200.0,
        speed: 200.0,
        ..EnemyType::new("furious", VisualKind::Furious)
    },
    EnemyType {
        health: 1.0,
        speed: 0.0,
        on_death: Some(sleeping_death),
        ..EnemyType::new("sleeping", VisualKind::Sleeping)
    },
    EnemyType::new("wokenUp", VisualKind::WokenUp),
    EnemyType {
        health: 80.0,
        speed: 0.0,
        on_create: Some(laughing_create),
        on_update: Some(laughing_update),
        ..EnemyType::new("laughing", VisualKind::Laughing)
    },
    EnemyType {
        health: 600.0,
        speed: 50.0,
        on_death: Some(drop_money),
        ..EnemyType::new("sunglasses", VisualKind::Sunglasses)
    },
];

/// Look up an enemy type by catalogue name
pub fn enemy_type(name: &str) -> Result<&'static EnemyType, SimError> {
    ENEMY_TYPES
        .iter()
        .find(|kind| kind.name == name)
        .ok_or_else(|| SimError::UnknownEnemyType(name.to_string()))
}
