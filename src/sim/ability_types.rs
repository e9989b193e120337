//! Ability catalogue
//!
//! Each effect sets its own next cooldown. Aimed shots add the player's
//! velocity to the aim direction scaled by the shot speed.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use super::ability::{Ability, AbilityType};
use super::projectile::{DeathHook, HitHook, ProjectileHooks, ProjectileSpec};
use super::state::World;
use crate::SimError;
use crate::direction_from_angle;
use crate::render::VisualKind;

/// Shot velocity toward the pointer, carrying the player's own movement
fn aimed(world: &World, speed: f32) -> Vec2 {
    world.player.vel + world.aim * speed
}

fn cookie_shot(ability: &mut Ability, world: &mut World) {
    ability.set_cooldown(ability.level_value());
    world.spawn_projectile(ProjectileSpec {
        dir: aimed(world, 1200.0),
        damage: 120.0,
        ..ProjectileSpec::new(VisualKind::Cookie, world.player.pos)
    });
}

fn bad_apple(ability: &mut Ability, world: &mut World) {
    ability.set_cooldown(ability.level_value());
    let to_ghost = (world.ghost.pos - world.player.pos).normalize_or_zero();
    world.spawn_projectile(ProjectileSpec {
        dir: to_ghost * 1000.0,
        damage: 50.0,
        ..ProjectileSpec::new(VisualKind::Apple, world.player.pos)
    });
}

fn piercing_diamond(ability: &mut Ability, world: &mut World) {
    ability.set_cooldown(0.9);
    world.spawn_projectile(ProjectileSpec {
        dir: aimed(world, 1200.0),
        damage: ability.level_value(),
        piercing: true,
        ..ProjectileSpec::new(VisualKind::Diamond, world.player.pos)
    });
}

fn ice_cubes(ability: &mut Ability, world: &mut World) {
    ability.set_cooldown(1.5);
    // Freeze time is baked in at fire time; cubes in flight ignore later level-ups
    let seconds = ability.level_value();
    for n in 0..6 {
        let angle = n as f32 / 6.0 * TAU;
        world.spawn_projectile(ProjectileSpec {
            dir: direction_from_angle(angle) * 150.0,
            damage: 20.0,
            hooks: ProjectileHooks {
                on_hit: Some(HitHook::Freeze { seconds }),
                ..Default::default()
            },
            ..ProjectileSpec::new(VisualKind::Ice, world.player.pos)
        });
    }
}

fn frozen_pizza(ability: &mut Ability, world: &mut World) {
    ability.set_cooldown(ability.level_value());
    world.spawn_projectile(ProjectileSpec {
        dir: aimed(world, 800.0),
        piercing: true,
        hooks: ProjectileHooks {
            on_hit: Some(HitHook::Freeze { seconds: 5.0 }),
            ..Default::default()
        },
        ..ProjectileSpec::new(VisualKind::Pizza, world.player.pos)
    });
}

fn explosive_stick(ability: &mut Ability, world: &mut World) {
    ability.set_cooldown(1.0);
    world.spawn_projectile(ProjectileSpec {
        piercing: true,
        lifetime: 2.0,
        hooks: ProjectileHooks {
            on_death: Some(DeathHook::Explode {
                damage: ability.level_value(),
            }),
            ..Default::default()
        },
        ..ProjectileSpec::new(VisualKind::Explosive, world.player.pos)
    });
}

fn passive_healing(ability: &mut Ability, world: &mut World) {
    // Runs every tick
    ability.set_cooldown(0.0);
    if world.ghost.distance < world.tuning.heal_radius {
        let amount = world.dt * ability.level_value();
        world.player.heal(amount);
    }
}

fn electric_arcs(ability: &mut Ability, world: &mut World) {
    ability.set_cooldown(0.25);
    ability.phase = (ability.phase + 0.5) % PI;
    for angle in [ability.phase, ability.phase + PI] {
        world.spawn_projectile(ProjectileSpec {
            dir: direction_from_angle(angle) * 500.0 + world.player.vel,
            damage: ability.level_value(),
            piercing: true,
            ..ProjectileSpec::new(VisualKind::Bolt, world.player.pos)
        });
    }
}

fn fireball(ability: &mut Ability, world: &mut World) {
    ability.set_cooldown(1.0);
    world.spawn_projectile(ProjectileSpec {
        dir: aimed(world, 600.0),
        damage: 120.0,
        hooks: ProjectileHooks {
            on_hit: Some(HitHook::Explode {
                damage: ability.level_value(),
            }),
            ..Default::default()
        },
        ..ProjectileSpec::new(VisualKind::Fire, world.player.pos)
    });
}

fn speed_increase(ability: &mut Ability, world: &mut World) {
    ability.go_inert();
    world.player.speed = ability.level_value();
}

fn ghost_speed(ability: &mut Ability, world: &mut World) {
    ability.go_inert();
    world.ghost.speed = ability.level_value();
}

fn max_health(ability: &mut Ability, world: &mut World) {
    ability.go_inert();
    world.player.max_health = ability.level_value();
}

/// Every ability the player can learn, in offer order
pub static ABILITY_TYPES: [AbilityType; 12] = [
    AbilityType {
        name: "Cookie shot",
        description: "Shoots a cookie towards the mouse pointer. Upgrades decrease cooldown.",
        level_values: &[1.0, 0.8, 0.6, 0.4, 0.2],
        effect: Some(cookie_shot),
    },
    AbilityType {
        name: "Bad Apple",
        description: "Shoots an apple towards the ghost. Upgrades decrease cooldown.",
        level_values: &[0.55, 0.45, 0.35, 0.25, 0.15],
        effect: Some(bad_apple),
    },
    AbilityType {
        name: "Piercing Diamond",
        description: "Shoots a piercing diamond towards the mouse pointer. Upgrades increase damage.",
        level_values: &[1200.0, 1800.0, 2400.0, 3000.0, 3600.0],
        effect: Some(piercing_diamond),
    },
    AbilityType {
        name: "Ice cubes",
        description: "Shoots ice cubes in 6 directions that freeze enemies. Upgrades increase freeze time.",
        level_values: &[1.0, 2.0, 3.0, 4.0, 5.0],
        effect: Some(ice_cubes),
    },
    AbilityType {
        name: "Frozen Pizza",
        description: "Shoots a piercing pizza that freezes every enemy it touches. Upgrades decrease cooldown.",
        level_values: &[5.0, 4.5, 4.0, 3.5, 3.0],
        effect: Some(frozen_pizza),
    },
    AbilityType {
        name: "Explosive Stick",
        description: "Drops a TNT that explodes after a short delay. Upgrades increase damage.",
        level_values: &[400.0, 600.0, 800.0, 1000.0, 1200.0],
        effect: Some(explosive_stick),
    },
    AbilityType {
        name: "Passive Healing",
        description: "Heals the player while near the ghost. Upgrades increase healing rate.",
        level_values: &[2.0, 4.0, 6.0, 8.0, 10.0],
        effect: Some(passive_healing),
    },
    AbilityType {
        name: "Electric Arcs",
        description: "Shoots piercing bolts in a spiral pattern. Upgrades increase damage.",
        level_values: &[480.0, 540.0, 600.0, 660.0, 720.0],
        effect: Some(electric_arcs),
    },
    AbilityType {
        name: "Fireball",
        description: "Shoots a fireball that explodes on impact. Upgrades increase damage.",
        level_values: &[480.0, 540.0, 600.0, 660.0, 720.0],
        effect: Some(fireball),
    },
    AbilityType {
        name: "Speed Increase",
        description: "Increases player speed. Does not affect the ghost.",
        level_values: &[330.0, 360.0, 390.0],
        effect: Some(speed_increase),
    },
    AbilityType {
        name: "Ghost Speed",
        description: "Increases ghost speed. Does not affect the player.",
        level_values: &[110.0, 120.0, 130.0],
        effect: Some(ghost_speed),
    },
    AbilityType {
        name: "Max Health",
        description: "Increases max health of the player.",
        level_values: &[120.0, 140.0, 160.0],
        effect: Some(max_health),
    },
];

/// Look up an ability by catalogue name
pub fn ability_type(name: &str) -> Result<&'static AbilityType, SimError> {
    ABILITY_TYPES
        .iter()
        .find(|kind| kind.name == name)
        .ok_or_else(|| SimError::UnknownAbility(name.to_string()))
}
