//! Idle/demo mode input
//!
//! A simple AI that plays well enough to keep a demo run alive: aims at the
//! nearest enemy, dodges anything closing in, stays within healing range of
//! the ghost and collects pickups when it is safe to.

use std::cmp::Ordering;

use glam::Vec2;

use crate::sim::{GameState, MoveKeys, TickInput};

/// Enemies and hostile shots inside this radius are dodged
const THREAT_RADIUS: f32 = 180.0;
/// Beyond this the ghost penalty starts to hurt; head back
const GHOST_LEASH: f32 = 250.0;
/// Pickups further than this are ignored
const PICKUP_SEARCH: f32 = 600.0;
/// Axis deadzone when turning a direction into held keys
const KEY_DEADZONE: f32 = 0.3;

/// Build this tick's input from the current state
pub fn idle_input(state: &GameState) -> TickInput {
    let player = state.world.player.pos;
    let ghost = state.world.ghost.pos;

    let nearest_enemy = state
        .enemies
        .iter()
        .map(|enemy| enemy.pos)
        .min_by(|a, b| by_distance(player, *a, *b));

    let threats: Vec2 = state
        .enemies
        .iter()
        .map(|enemy| enemy.pos)
        .chain(
            state
                .projectiles
                .iter()
                .filter(|p| p.unfriendly)
                .map(|p| p.pos),
        )
        .filter(|pos| pos.distance(player) < THREAT_RADIUS)
        .map(|pos| (player - pos).normalize_or_zero())
        .sum();

    let target_pickup = state
        .pickups
        .iter()
        .map(|pickup| pickup.pos)
        .filter(|pos| pos.distance(player) < PICKUP_SEARCH)
        .min_by(|a, b| by_distance(player, *a, *b));

    let heading = if player.distance(ghost) > GHOST_LEASH {
        // Too far ahead, go back to the ghost
        ghost - player
    } else if threats != Vec2::ZERO {
        threats
    } else if let Some(pickup) = target_pickup {
        pickup - player
    } else {
        Vec2::ZERO
    };

    TickInput {
        keys: keys_toward(heading.normalize_or_zero()),
        cursor: nearest_enemy.map_or(Vec2::ZERO, |pos| pos - player),
        ..Default::default()
    }
}

fn by_distance(origin: Vec2, a: Vec2, b: Vec2) -> Ordering {
    origin
        .distance_squared(a)
        .partial_cmp(&origin.distance_squared(b))
        .unwrap_or(Ordering::Equal)
}

fn keys_toward(dir: Vec2) -> MoveKeys {
    MoveKeys {
        up: dir.y < -KEY_DEADZONE,
        down: dir.y > KEY_DEADZONE,
        left: dir.x < -KEY_DEADZONE,
        right: dir.x > KEY_DEADZONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PickupKind, start_run};

    fn playing() -> GameState {
        let mut state = GameState::new(21);
        start_run(&mut state).unwrap();
        state
    }

    #[test]
    fn test_aims_at_nearest_enemy() {
        let mut state = playing();
        state.world.spawn_enemy_named("sleeping", Vec2::new(500.0, 0.0));
        state.world.spawn_enemy_named("sleeping", Vec2::new(0.0, -300.0));
        state.absorb_pending();

        let input = idle_input(&state);
        assert_eq!(input.cursor, Vec2::new(0.0, -300.0));
        assert!(!input.pause && !input.idle_mode);
    }

    #[test]
    fn test_flees_close_enemy() {
        let mut state = playing();
        state.world.spawn_enemy_named("standard", Vec2::new(100.0, 0.0));
        state.absorb_pending();

        let keys = idle_input(&state).keys;
        assert!(keys.left && !keys.right);
    }

    #[test]
    fn test_returns_to_ghost() {
        let mut state = playing();
        state.world.ghost.pos = Vec2::new(0.0, 400.0);
        let keys = idle_input(&state).keys;
        assert!(keys.down && !keys.up);
    }

    #[test]
    fn test_collects_pickup_when_safe() {
        let mut state = playing();
        state.world.spawn_pickup(PickupKind::Money, Vec2::new(-200.0, 0.0));
        state.absorb_pending();
        let keys = idle_input(&state).keys;
        assert!(keys.left);
        assert!(!keys.up && !keys.down);
    }

    #[test]
    fn test_no_target_no_input() {
        let state = playing();
        let input = idle_input(&state);
        assert_eq!(input.keys, MoveKeys::default());
        assert_eq!(input.cursor, Vec2::ZERO);
    }
}
