//! Ghost Escort - headless runner
//!
//! Plays one autopilot session at display rate and prints the run summary
//! as JSON.
//!
//! Usage: `ghost-escort [tuning.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use ghost_escort::consts::FRAME_DT;
    use ghost_escort::sim::{self, GamePhase, GameState, ModeSignal, TickInput};
    use ghost_escort::{SimError, Tuning};

    /// Ten minutes of play at 60 Hz
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    /// Frame time clamp applied by the host loop
    const MAX_FRAME_DT: f32 = 0.1;

    pub fn run() -> Result<(), SimError> {
        let mut args = std::env::args().skip(1);
        let tuning = match args.next() {
            Some(path) => Tuning::load(&path)?,
            None => Tuning::default(),
        };
        let seed = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or_else(|| {
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0)
            });

        let mut state = GameState::with_tuning(tuning, seed);
        sim::start_run(&mut state)?;
        log::info!("Game initialized with seed: {}", seed);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut commands = 0usize;

        for _ in 0..MAX_FRAMES {
            match sim::tick(&mut state, &input, FRAME_DT.min(MAX_FRAME_DT)) {
                Some(ModeSignal::LevelUp) => pick_first_offer(&mut state)?,
                Some(ModeSignal::Defeat) => break,
                None => {}
            }
            // Stands in for the presentation layer
            commands += state.world.scene.drain_commands().count();
        }

        if state.phase == GamePhase::Playing {
            log::info!("Survived the whole session");
        }
        log::info!("{} render commands issued", commands);

        match serde_json::to_string_pretty(&state.summary()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize summary: {:?}", e),
        }
        Ok(())
    }

    fn pick_first_offer(state: &mut GameState) -> Result<(), SimError> {
        match state.offered.first() {
            Some(kind) => {
                let name = kind.name;
                log::info!("Autopicking {}", name);
                sim::choose_ability(state, name).or_else(|err| {
                    log::warn!("{err}, redeeming instead");
                    sim::redeem_money(state)
                })
            }
            None => sim::redeem_money(state),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Ghost Escort (headless) starting...");

    if let Err(e) = native::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host page; there is no standalone entry point
}
