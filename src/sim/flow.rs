//! Phase transitions and the level-up choice
//!
//! ```text
//! MainMenu -> Playing
//! Playing  -> Paused | LevelUp | Defeat
//! Paused   -> Playing | MainMenu
//! LevelUp  -> Playing
//! Defeat   -> MainMenu
//! ```

use rand::seq::SliceRandom;

use super::ability::Ability;
use super::ability_types::ability_type;
use super::state::{GamePhase, GameState};
use crate::SimError;
use crate::render::{GHOST_VISUAL, Layer, PLAYER_VISUAL, RenderRegistry, VisualKind};

/// Whether the flow allows going from `from` to `to`
pub fn can_switch(from: GamePhase, to: GamePhase) -> bool {
    use GamePhase::*;
    matches!(
        (from, to),
        (MainMenu, Playing)
            | (Playing, Paused | LevelUp | Defeat)
            | (Paused, Playing | MainMenu)
            | (LevelUp, Playing)
            | (Defeat, MainMenu)
    )
}

/// Switch phase, running exit and entry hooks. Refused transitions leave
/// the state untouched.
pub fn switch_phase(state: &mut GameState, to: GamePhase) -> Result<(), SimError> {
    let from = state.phase;
    if !can_switch(from, to) {
        return Err(SimError::InvalidTransition { from, to });
    }

    match from {
        GamePhase::Playing => on_exit_simulation(state),
        GamePhase::LevelUp => state.offered.clear(),
        _ => {}
    }

    state.phase = to;
    log::debug!("Phase {:?} -> {:?}", from, to);

    match to {
        GamePhase::Playing => on_enter_simulation(state),
        GamePhase::MainMenu => state.reset(),
        GamePhase::LevelUp => offer_abilities(state),
        GamePhase::Defeat => log::info!(
            "Defeated after {:.2} minutes at level {}",
            state.world.minutes_survived,
            state.world.player.level
        ),
        GamePhase::Paused => {}
    }
    Ok(())
}

/// Register the player and ghost visuals and learn the starting ability.
/// Both are skipped when already done, so resuming is a no-op.
pub fn on_enter_simulation(state: &mut GameState) {
    let world = &mut state.world;
    if !world.scene.contains(GHOST_VISUAL) {
        world
            .scene
            .register(Layer::Effect, GHOST_VISUAL, VisualKind::Ghost, world.ghost.pos);
    }
    if !world.scene.contains(PLAYER_VISUAL) {
        world
            .scene
            .register(Layer::Effect, PLAYER_VISUAL, VisualKind::Player, world.player.pos);
    }

    if state.abilities.is_empty() {
        match ability_type(&world.tuning.starting_ability) {
            Ok(kind) => state.abilities.push(Ability::new(kind)),
            Err(err) => log::error!("Starting ability: {err}"),
        }
    }
}

/// Nothing is torn down when leaving the simulation; entities persist
/// through pause and level-up.
pub fn on_exit_simulation(_state: &mut GameState) {}

/// Start a run from the main menu
pub fn start_run(state: &mut GameState) -> Result<(), SimError> {
    log::info!("Starting run (seed {})", state.seed);
    switch_phase(state, GamePhase::Playing)
}

pub fn toggle_pause(state: &mut GameState) -> Result<(), SimError> {
    match state.phase {
        GamePhase::Paused => switch_phase(state, GamePhase::Playing),
        _ => switch_phase(state, GamePhase::Paused),
    }
}

/// Shuffle the untaken abilities and offer the first few
fn offer_abilities(state: &mut GameState) {
    let choices = state.world.tuning.level_up_choices;
    state.untaken.shuffle(&mut state.world.rng);
    state.offered = state.untaken.iter().take(choices).copied().collect();
    log::debug!(
        "Offering {:?}",
        state.offered.iter().map(|kind| kind.name).collect::<Vec<_>>()
    );
}

/// Take one of the offered abilities: learn it, or level it if already
/// known. Maxed abilities are never offered again.
pub fn choose_ability(state: &mut GameState, name: &str) -> Result<(), SimError> {
    let kind = state
        .offered
        .iter()
        .copied()
        .find(|kind| kind.name == name)
        .ok_or_else(|| SimError::NotOffered(name.to_string()))?;

    let level = match state.abilities.iter().position(|a| a.name() == name) {
        Some(index) => state.abilities[index].level_up()?,
        None => {
            state.abilities.push(Ability::new(kind));
            1
        }
    };
    if level >= kind.max_level() {
        state.untaken.retain(|untaken| !std::ptr::eq(*untaken, kind));
        log::info!("{} is maxed out", kind.name);
    }
    switch_phase(state, GamePhase::Playing)
}

/// Skip the offer and take half of the next threshold as money instead
pub fn redeem_money(state: &mut GameState) -> Result<(), SimError> {
    if state.phase != GamePhase::LevelUp {
        return Err(SimError::InvalidTransition {
            from: state.phase,
            to: GamePhase::Playing,
        });
    }
    let player = &mut state.world.player;
    player.money = player.money_needed.div_ceil(2);
    switch_phase(state, GamePhase::Playing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ability_types::ABILITY_TYPES;
    use glam::Vec2;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        start_run(&mut state).unwrap();
        state
    }

    fn level_up(state: &mut GameState) {
        switch_phase(state, GamePhase::LevelUp).unwrap();
    }

    #[test]
    fn test_transition_table() {
        use GamePhase::*;
        let all = [MainMenu, Playing, Paused, LevelUp, Defeat];
        let allowed = all
            .iter()
            .flat_map(|&from| all.iter().map(move |&to| (from, to)))
            .filter(|&(from, to)| can_switch(from, to))
            .count();
        assert_eq!(allowed, 8);
        assert!(!can_switch(MainMenu, Defeat));
        assert!(!can_switch(LevelUp, MainMenu));
        assert!(!can_switch(Playing, Playing));
    }

    #[test]
    fn test_invalid_transition_leaves_state() {
        let mut state = GameState::new(1);
        let err = switch_phase(&mut state, GamePhase::Defeat).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidTransition {
                from: GamePhase::MainMenu,
                to: GamePhase::Defeat
            }
        ));
        assert_eq!(state.phase, GamePhase::MainMenu);
        assert!(state.world.scene.is_empty());
    }

    #[test]
    fn test_enter_simulation_registers_once() {
        let mut state = playing(2);
        assert_eq!(state.world.scene.count_on(Layer::Effect), 2);
        assert_eq!(state.abilities.len(), 1);
        assert_eq!(state.abilities[0].name(), "Cookie shot");

        toggle_pause(&mut state).unwrap();
        toggle_pause(&mut state).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.world.scene.count_on(Layer::Effect), 2);
        assert_eq!(state.abilities.len(), 1);
    }

    #[test]
    fn test_bad_starting_ability_is_logged_not_fatal() {
        let tuning = crate::Tuning {
            starting_ability: "Laser".to_string(),
            ..Default::default()
        };
        let mut state = GameState::with_tuning(tuning, 3);
        start_run(&mut state).unwrap();
        assert!(state.abilities.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_offer_is_bounded_and_distinct() {
        let mut state = playing(4);
        level_up(&mut state);
        assert_eq!(state.offered.len(), 4);
        for (i, a) in state.offered.iter().enumerate() {
            assert!(state.untaken.iter().any(|u| std::ptr::eq(*u, *a)));
            for b in &state.offered[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }

        let first = state.offered[0].name;
        choose_ability(&mut state, first).unwrap();
        state.untaken.truncate(2);
        level_up(&mut state);
        assert_eq!(state.offered.len(), 2);
    }

    #[test]
    fn test_choose_learns_then_levels() {
        let mut state = playing(5);
        state.untaken = ABILITY_TYPES.iter().filter(|k| k.name == "Cookie shot").collect();
        level_up(&mut state);
        choose_ability(&mut state, "Cookie shot").unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.ability("Cookie shot").unwrap().level, 2);
        assert!(state.offered.is_empty());

        state.untaken = ABILITY_TYPES.iter().filter(|k| k.name == "Max Health").collect();
        level_up(&mut state);
        choose_ability(&mut state, "Max Health").unwrap();
        assert_eq!(state.ability("Max Health").unwrap().level, 1);
    }

    #[test]
    fn test_maxed_ability_leaves_untaken() {
        let mut state = playing(6);
        state.untaken = ABILITY_TYPES.iter().filter(|k| k.name == "Ghost Speed").collect();
        for _ in 0..3 {
            level_up(&mut state);
            choose_ability(&mut state, "Ghost Speed").unwrap();
        }
        assert_eq!(state.ability("Ghost Speed").unwrap().level, 3);
        assert!(state.untaken.is_empty());
    }

    #[test]
    fn test_choosing_unoffered_is_refused() {
        let mut state = playing(7);
        state.untaken = ABILITY_TYPES.iter().filter(|k| k.name == "Fireball").collect();
        level_up(&mut state);
        let err = choose_ability(&mut state, "Ice cubes").unwrap_err();
        assert!(matches!(err, SimError::NotOffered(_)));
        assert_eq!(state.phase, GamePhase::LevelUp);
    }

    #[test]
    fn test_redeem_gives_half_threshold_rounded_up() {
        let mut state = playing(8);
        state.world.player.money_needed = 5;
        level_up(&mut state);
        redeem_money(&mut state).unwrap();
        assert_eq!(state.world.player.money, 3);
        assert_eq!(state.phase, GamePhase::Playing);

        assert!(redeem_money(&mut state).is_err());
    }

    #[test]
    fn test_main_menu_resets_everything() {
        let mut state = playing(9);
        state.world.spawn_enemy_named("standard", Vec2::new(300.0, 0.0));
        state.absorb_pending();
        state.world.player.level = 4;
        switch_phase(&mut state, GamePhase::Defeat).unwrap();
        switch_phase(&mut state, GamePhase::MainMenu).unwrap();

        assert!(state.enemies.is_empty());
        assert!(state.abilities.is_empty());
        assert!(state.world.scene.is_empty());
        assert_eq!(state.untaken.len(), ABILITY_TYPES.len());
        assert_eq!(state.world.player.level, 0);

        start_run(&mut state).unwrap();
        assert_eq!(state.world.scene.count_on(Layer::Effect), 2);
        assert_eq!(state.abilities.len(), 1);
    }
}
