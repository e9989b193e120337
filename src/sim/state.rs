//! Game state and core simulation types
//!
//! `GameState` is the single simulation context: the driver owns it for the
//! whole tick and passes `World` (everything except the live entity
//! collections) into entity updates and catalogue hooks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ability::{Ability, AbilityType};
use super::ability_types::ABILITY_TYPES;
use super::enemy::{Enemy, EnemyType};
use super::enemy_types::enemy_type;
use super::pickup::{Pickup, PickupKind};
use super::projectile::{Projectile, ProjectileSpec};
use super::spawn::SpawnTable;
use crate::Tuning;
use crate::render::{FIRST_ENTITY_VISUAL, Scene, VisualId};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen; all simulation state is reset on entry
    MainMenu,
    /// Active simulation
    Playing,
    /// Simulation suspended by the player
    Paused,
    /// Simulation suspended while an ability is picked
    LevelUp,
    /// Player health dropped below zero
    Defeat,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Movement this tick (units/second), already scaled by the ghost penalty
    pub vel: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub money: u32,
    pub money_needed: u32,
    pub level: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            health: tuning.player_max_health,
            max_health: tuning.player_max_health,
            speed: tuning.player_speed,
            money: 0,
            money_needed: tuning.first_upgrade_cost,
            level: 0,
        }
    }

    /// Heal without exceeding max health
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}

/// The companion that trails the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ghost {
    pub pos: Vec2,
    pub speed: f32,
    /// Distance to the player, measured before this tick's ghost move
    pub distance: f32,
    /// 0..1 multiplier on player speed and outgoing damage
    pub penalty: f32,
}

impl Ghost {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            speed: tuning.ghost_speed,
            distance: 0.0,
            penalty: 1.0,
        }
    }
}

/// Entities created during a pass, merged into the live collections after it
#[derive(Debug, Default)]
pub struct Spawns {
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
}

impl Spawns {
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty() && self.projectiles.is_empty() && self.pickups.is_empty()
    }
}

/// Everything entity updates and hooks may touch
#[derive(Debug)]
pub struct World {
    pub tuning: Tuning,
    pub player: Player,
    pub ghost: Ghost,
    pub minutes_survived: f32,
    /// Delta time of the tick in progress
    pub dt: f32,
    /// Unit aim direction from the pointer (zero when the pointer is centred)
    pub aim: Vec2,
    pub rng: Pcg32,
    pub scene: Scene,
    pub pending: Spawns,
    /// Next visual id; ids are never reused
    next_id: u32,
}

impl World {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            player: Player::new(&tuning),
            ghost: Ghost::new(&tuning),
            tuning,
            minutes_survived: 0.0,
            dt: 0.0,
            aim: Vec2::ZERO,
            rng: Pcg32::seed_from_u64(seed),
            scene: Scene::new(),
            pending: Spawns::default(),
            next_id: FIRST_ENTITY_VISUAL,
        }
    }

    /// Allocate a new visual id
    pub fn next_visual_id(&mut self) -> VisualId {
        let id = VisualId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create an enemy; it joins the live collection after the current pass
    pub fn spawn_enemy(&mut self, kind: &'static EnemyType, pos: Vec2) {
        let enemy = Enemy::new(kind, pos, self);
        log::debug!("Spawned {} at ({:.0}, {:.0})", kind.name, pos.x, pos.y);
        self.pending.enemies.push(enemy);
    }

    /// Spawn an enemy by catalogue name. A missing entry is logged and skipped.
    pub fn spawn_enemy_named(&mut self, name: &str, pos: Vec2) {
        match enemy_type(name) {
            Ok(kind) => self.spawn_enemy(kind, pos),
            Err(err) => log::error!("{err}"),
        }
    }

    pub fn spawn_projectile(&mut self, spec: ProjectileSpec) {
        let projectile = Projectile::new(spec, self);
        self.pending.projectiles.push(projectile);
    }

    pub fn spawn_pickup(&mut self, kind: PickupKind, pos: Vec2) {
        let pickup = Pickup::new(kind, pos, self);
        self.pending.pickups.push(pickup);
    }

    /// Reset everything except tuning, RNG stream and id counter
    fn reset(&mut self) {
        self.player = Player::new(&self.tuning);
        self.ghost = Ghost::new(&self.tuning);
        self.minutes_survived = 0.0;
        self.dt = 0.0;
        self.aim = Vec2::ZERO;
        self.pending = Spawns::default();
        self.scene.clear();
    }
}

/// Every catalogue ability except the withheld ones
fn offer_pool(tuning: &Tuning) -> Vec<&'static AbilityType> {
    ABILITY_TYPES
        .iter()
        .filter(|kind| !tuning.withheld_abilities.iter().any(|name| name == kind.name))
        .collect()
}

/// Complete simulation context
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub world: World,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    /// Learned abilities, in learning order
    pub abilities: Vec<Ability>,
    /// Abilities that can still be offered at a level-up
    pub untaken: Vec<&'static AbilityType>,
    /// Current level-up offer (empty outside LevelUp)
    pub offered: Vec<&'static AbilityType>,
    pub spawn_table: SpawnTable,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a new session with default tuning, sitting in the main menu
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), seed)
    }

    pub fn with_tuning(tuning: Tuning, seed: u64) -> Self {
        let (spawn_table, errors) = SpawnTable::resolve(&tuning.spawn_bands);
        let untaken = offer_pool(&tuning);
        for err in &errors {
            log::error!("Spawn table: {err}");
        }

        Self {
            seed,
            phase: GamePhase::MainMenu,
            world: World::new(tuning, seed),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            abilities: Vec::new(),
            untaken,
            offered: Vec::new(),
            spawn_table,
            time_ticks: 0,
        }
    }

    /// Merge entities spawned during the last pass into the live collections
    pub fn absorb_pending(&mut self) {
        let pending = &mut self.world.pending;
        self.enemies.append(&mut pending.enemies);
        self.projectiles.append(&mut pending.projectiles);
        self.pickups.append(&mut pending.pickups);
    }

    /// Learned ability by name
    pub fn ability(&self, name: &str) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.name() == name)
    }

    /// Drop all run state (entering the main menu)
    pub fn reset(&mut self) {
        self.world.reset();
        self.enemies.clear();
        self.projectiles.clear();
        self.pickups.clear();
        self.abilities.clear();
        self.untaken = offer_pool(&self.world.tuning);
        self.offered.clear();
        self.time_ticks = 0;
        log::info!("Session reset");
    }

    /// Snapshot for logging and the headless runner
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            phase: self.phase,
            ticks: self.time_ticks,
            minutes_survived: self.world.minutes_survived,
            level: self.world.player.level,
            health: self.world.player.health,
            money: self.world.player.money,
            enemies: self.enemies.len(),
            projectiles: self.projectiles.len(),
            pickups: self.pickups.len(),
            abilities: self
                .abilities
                .iter()
                .map(|a| (a.name().to_string(), a.level))
                .collect(),
        }
    }
}

/// Serializable summary of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub phase: GamePhase,
    pub ticks: u64,
    pub minutes_survived: f32,
    pub level: u32,
    pub health: f32,
    pub money: u32,
    pub enemies: usize,
    pub projectiles: usize,
    pub pickups: usize,
    pub abilities: Vec<(String, u32)>,
}
