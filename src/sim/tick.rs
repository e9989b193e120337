//! Per-tick simulation driver
//!
//! Runs the passes in a fixed order. Each pass compacts its collection in
//! place (stable, survivors keep their order) and unregisters the visual of
//! every entity it drops. Entities spawned during a pass wait in
//! `World::pending` and join the live collections right after it.

use glam::Vec2;
use rand::Rng;

use super::flow;
use super::pickup::PickupKind;
use super::state::{GamePhase, GameState, World};
use crate::render::{GHOST_VISUAL, Layer, PLAYER_VISUAL, RenderRegistry, VisualId};
use crate::{autopilot, ghost_penalty, manhattan, random_point_on_circle};

/// Held movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    /// Unnormalized movement axis (screen coordinates, +y is down)
    pub fn axis(self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.up {
            axis.y -= 1.0;
        }
        if self.down {
            axis.y += 1.0;
        }
        if self.left {
            axis.x -= 1.0;
        }
        if self.right {
            axis.x += 1.0;
        }
        axis
    }
}

/// Input sampled once per tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub keys: MoveKeys,
    /// Pointer offset from the screen centre (where the player is drawn)
    pub cursor: Vec2,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - the autopilot plays
    pub idle_mode: bool,
}

/// Mode switch raised by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSignal {
    /// Money reached the upgrade threshold
    LevelUp,
    /// Player health dropped below zero
    Defeat,
}

impl ModeSignal {
    pub fn phase(self) -> GamePhase {
        match self {
            ModeSignal::LevelUp => GamePhase::LevelUp,
            ModeSignal::Defeat => GamePhase::Defeat,
        }
    }
}

/// Advance the simulation by `dt` seconds.
///
/// Only runs while playing. A raised mode signal has already been applied
/// to `state.phase` when this returns; Defeat wins over LevelUp.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Option<ModeSignal> {
    if input.pause {
        if let Err(err) = flow::toggle_pause(state) {
            log::warn!("{err}");
        }
    }
    if state.phase != GamePhase::Playing {
        return None;
    }

    let input = if input.idle_mode {
        autopilot::idle_input(state)
    } else {
        input.clone()
    };

    let dt = state.world.tuning.clamp_dt(dt);
    state.world.dt = dt;
    state.time_ticks += 1;

    update_player(&mut state.world, &input, dt);
    update_ghost(&mut state.world, dt);
    run_abilities(state, dt);
    let upgraded = check_upgrade(state);
    update_enemies(state, dt);
    // Latched before pickups can heal the contact damage away
    let mut defeated = state.world.player.health < 0.0;
    update_pickups(state);
    update_projectiles(state, dt);
    defeated |= state.world.player.health < 0.0;
    spawn_new_objects(state, dt);
    publish_positions(state);

    let signal = if defeated {
        Some(ModeSignal::Defeat)
    } else if upgraded {
        Some(ModeSignal::LevelUp)
    } else {
        None
    };
    if let Some(signal) = signal {
        if let Err(err) = flow::switch_phase(state, signal.phase()) {
            log::warn!("{err}");
        }
    }
    signal
}

fn update_player(world: &mut World, input: &TickInput, dt: f32) {
    world.minutes_survived += dt / 60.0;

    let player = &mut world.player;
    player.vel = input.keys.axis().normalize_or_zero() * player.speed * world.ghost.penalty;
    player.pos += player.vel * dt;

    world.aim = input.cursor.normalize_or_zero();
}

/// Move the ghost toward the player and recompute the penalty from the
/// distance measured before the move
fn update_ghost(world: &mut World, dt: f32) {
    let ghost = &mut world.ghost;
    let to_player = world.player.pos - ghost.pos;
    ghost.distance = to_player.length();
    if ghost.distance > 0.0 {
        let step = (ghost.speed * dt).min(ghost.distance);
        ghost.pos += to_player / ghost.distance * step;
    }
    ghost.penalty = ghost_penalty(ghost.distance, world.tuning.ghost_penalty_falloff);
}

fn run_abilities(state: &mut GameState, dt: f32) {
    for ability in &mut state.abilities {
        ability.update(dt, &mut state.world);
    }
    state.absorb_pending();
}

/// Returns true when the player reached the next level
fn check_upgrade(state: &mut GameState) -> bool {
    let offset = state.world.tuning.upgrade_cost_offset;
    let player = &mut state.world.player;
    if player.money < player.money_needed {
        return false;
    }
    if state.untaken.is_empty() {
        // Nothing left to buy
        player.money = player.money_needed;
        return false;
    }
    player.level += 1;
    player.money = 0;
    player.money_needed = player.level + offset;
    log::info!("Level up! Now level {}", player.level);
    true
}

/// Move every enemy, drop dead and out-of-range ones, then separate the survivors
fn update_enemies(state: &mut GameState, dt: f32) {
    let GameState { world, enemies, .. } = state;
    let render_distance = world.tuning.render_distance;

    enemies.retain_mut(|enemy| {
        if manhattan(enemy.pos, world.player.pos) > render_distance {
            log::debug!("Despawned {} (out of range)", enemy.name());
            world.scene.unregister(Layer::Game, enemy.visual);
            return false;
        }
        if enemy.update(dt, world) {
            return true;
        }
        log::debug!("{} died", enemy.name());
        world.scene.unregister(Layer::Game, enemy.visual);
        false
    });
    state.absorb_pending();

    // Second pass against a snapshot so the result is independent of order
    let positions: Vec<Vec2> = state.enemies.iter().map(|enemy| enemy.pos).collect();
    for (index, enemy) in state.enemies.iter_mut().enumerate() {
        enemy.update_separation(index, &positions, &state.world.tuning);
    }
}

fn update_pickups(state: &mut GameState) {
    let GameState { world, pickups, .. } = state;
    let render_distance = world.tuning.render_distance;

    pickups.retain(|pickup| {
        let keep = manhattan(pickup.pos, world.player.pos) <= render_distance
            && pickup.update(world);
        if !keep {
            world.scene.unregister(Layer::Background, pickup.visual);
        }
        keep
    });
    state.absorb_pending();
}

fn update_projectiles(state: &mut GameState, dt: f32) {
    let GameState {
        world,
        enemies,
        projectiles,
        ..
    } = state;

    projectiles.retain_mut(|projectile| {
        if projectile.update(dt, &mut enemies[..], world) {
            return true;
        }
        world.scene.unregister(Layer::Game, projectile.visual);
        false
    });
    state.absorb_pending();
}

/// Roll the spawn table and the health pickup chance
fn spawn_new_objects(state: &mut GameState, dt: f32) {
    let world = &mut state.world;
    let radius = world.tuning.spawn_radius();

    for kind in state
        .spawn_table
        .roll(world.minutes_survived, dt, &mut world.rng)
    {
        let pos = random_point_on_circle(&mut world.rng, world.player.pos, radius);
        world.spawn_enemy(kind, pos);
    }

    if world.rng.random::<f32>() < world.tuning.health_pickup_chance {
        let pos = random_point_on_circle(&mut world.rng, world.player.pos, radius);
        world.spawn_pickup(PickupKind::Health, pos);
    }
    state.absorb_pending();
}

/// Push every position that changed this tick to the render registry
fn publish_positions(state: &mut GameState) {
    let GameState {
        world,
        enemies,
        projectiles,
        ..
    } = state;

    for enemy in enemies.iter_mut() {
        if enemy.pos != enemy.published {
            world.scene.set_position(enemy.visual, enemy.pos);
            enemy.published = enemy.pos;
        }
    }
    for projectile in projectiles.iter_mut() {
        if projectile.pos != projectile.published {
            world.scene.set_position(projectile.visual, projectile.pos);
            projectile.published = projectile.pos;
        }
    }

    let (player_pos, ghost_pos) = (world.player.pos, world.ghost.pos);
    publish_fixed(world, PLAYER_VISUAL, player_pos);
    publish_fixed(world, GHOST_VISUAL, ghost_pos);
}

fn publish_fixed(world: &mut World, id: VisualId, pos: Vec2) {
    if world.scene.get(id).is_some_and(|visual| visual.pos != pos) {
        world.scene.set_position(id, pos);
    }
}
