//! Simulation error types.
//!
//! None of these are ever shown to the player. Configuration errors degrade
//! to a no-op at the call site; invariant violations refuse the operation and
//! leave state untouched.

use thiserror::Error;

use crate::sim::GamePhase;

#[derive(Debug, Error)]
pub enum SimError {
    /// A spawn table or hook referenced an enemy type that is not in the catalogue
    #[error("no enemy type named `{0}` in the catalogue")]
    UnknownEnemyType(String),

    /// An ability name that is not in the catalogue
    #[error("no ability named `{0}` in the catalogue")]
    UnknownAbility(String),

    /// Tried to level an ability that is already at its max level
    #[error("ability `{ability}` is already at max level {level}")]
    AbilityMaxed { ability: &'static str, level: u32 },

    /// Phase switch that the flow does not allow
    #[error("cannot switch from {from:?} to {to:?}")]
    InvalidTransition { from: GamePhase, to: GamePhase },

    /// Picked an ability that was not part of the current level-up offer
    #[error("ability `{0}` was not offered this level-up")]
    NotOffered(String),

    #[error("tuning JSON: {0}")]
    TuningParse(#[from] serde_json::Error),

    #[error("failed to read tuning file: {0}")]
    TuningIo(#[from] std::io::Error),
}

impl SimError {
    /// Configuration errors come from bad data rather than bad calls
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            SimError::UnknownEnemyType(_)
                | SimError::UnknownAbility(_)
                | SimError::TuningParse(_)
                | SimError::TuningIo(_)
        )
    }
}
