//! Entity simulation module
//!
//! All gameplay logic lives here. The module stays free of rendering and
//! platform code:
//! - Seeded RNG only
//! - Stable iteration order (collection order, survivors keep their slot)
//! - Visuals only through the `RenderRegistry` seam

pub mod ability;
pub mod ability_types;
pub mod collision;
pub mod enemy;
pub mod enemy_types;
pub mod flow;
pub mod pickup;
pub mod projectile;
pub mod spawn;
pub mod state;
pub mod tick;

pub use ability::{Ability, AbilityType, Cooldown};
pub use ability_types::{ABILITY_TYPES, ability_type};
pub use enemy::{Enemy, EnemyType};
pub use enemy_types::{ENEMY_TYPES, enemy_type};
pub use flow::{choose_ability, redeem_money, start_run, switch_phase, toggle_pause};
pub use pickup::{Pickup, PickupKind};
pub use projectile::{Projectile, ProjectileSpec};
pub use spawn::SpawnTable;
pub use state::{GamePhase, GameState, Ghost, Player, RunSummary, World};
pub use tick::{ModeSignal, MoveKeys, TickInput, tick};
