//! Game balance and tuning
//!
//! Every numeric knob of the simulation lives here so balance passes never
//! touch the driver. Loaded from JSON; missing keys fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SimError;

/// One row of the spawn table: rates apply while `minutes_survived < until_minutes`.
/// A row without a bound catches everything after the previous rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnBandConfig {
    pub until_minutes: Option<f32>,
    /// (enemy type name, expected spawns per second), trialled in this order
    pub rates: Vec<(String, f32)>,
}

impl SpawnBandConfig {
    fn new(until_minutes: Option<f32>, rates: &[(&str, f32)]) -> Self {
        Self {
            until_minutes,
            rates: rates.iter().map(|&(name, rate)| (name.to_string(), rate)).collect(),
        }
    }
}

/// Simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Enemies ===
    /// Enemy hitbox diameter; also the player's contact size
    pub enemy_diameter: f32,
    /// Damage per second each touching enemy deals to the player
    pub enemy_contact_dps: f32,
    /// Enemies closer than this stop steering (prevents point-blank jitter)
    pub min_steer_distance: f32,
    /// Fraction of the separation offset applied each tick
    pub separation_damping: f32,

    // === Proximity ===
    /// Manhattan distance beyond which exact contact tests are skipped
    pub proximity_prefilter: f32,
    /// Pickups closer than this are collected
    pub pickup_range: f32,
    /// Manhattan distance at which enemies and pickups are silently despawned
    pub render_distance: f32,
    /// Radius of the spawn circle around the player (defaults to half the render distance)
    pub spawn_radius: Option<f32>,

    // === Player ===
    pub player_max_health: f32,
    pub player_speed: f32,
    /// Money needed for the first level-up
    pub first_upgrade_cost: u32,
    /// Cost of the next level-up is `level + upgrade_cost_offset`
    pub upgrade_cost_offset: u32,
    /// Number of abilities offered per level-up
    pub level_up_choices: usize,
    /// Ability every run starts with
    pub starting_ability: String,
    /// Catalogue abilities never offered at a level-up
    pub withheld_abilities: Vec<String>,

    // === Ghost ===
    pub ghost_speed: f32,
    /// Ghost distance at which the penalty reaches zero
    pub ghost_penalty_falloff: f32,
    /// Passive healing only works this close to the ghost
    pub heal_radius: f32,

    // === Difficulty ramp ===
    /// Per-minute growth of damage dealt to the player
    pub enemy_damage_growth: f32,
    /// Per-minute decay of damage dealt by the player
    pub player_damage_decay: f32,

    // === Pickups ===
    /// Chance per tick that a health present appears
    pub health_pickup_chance: f32,
    pub health_pickup_heal: f32,

    // === Frame clock ===
    /// Optional cap on a single tick's dt. `None` runs the frame delta unclamped.
    pub max_dt: Option<f32>,

    // === Spawning ===
    pub spawn_bands: Vec<SpawnBandConfig>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enemy_diameter: 48.0,
            enemy_contact_dps: 100.0,
            min_steer_distance: 20.0,
            separation_damping: 0.9,

            proximity_prefilter: 100.0,
            pickup_range: 64.0,
            render_distance: 3840.0,
            spawn_radius: None,

            player_max_health: 100.0,
            player_speed: 300.0,
            first_upgrade_cost: 3,
            upgrade_cost_offset: 2,
            level_up_choices: 4,
            starting_ability: "Cookie shot".to_string(),
            withheld_abilities: Vec::new(),

            ghost_speed: 100.0,
            ghost_penalty_falloff: 1000.0,
            heal_radius: 128.0,

            enemy_damage_growth: 1.05,
            player_damage_decay: 0.95,

            health_pickup_chance: 0.005,
            health_pickup_heal: 10.0,

            max_dt: None,

            spawn_bands: default_spawn_bands(),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning ({} spawn bands)", tuning.spawn_bands.len());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Effective spawn circle radius
    pub fn spawn_radius(&self) -> f32 {
        self.spawn_radius.unwrap_or(self.render_distance / 2.0)
    }

    /// Squared contact threshold for an object of `size` against an enemy-sized body
    pub fn contact_threshold_sq(&self, size: f32) -> f32 {
        let reach = (self.enemy_diameter + size) / 2.0;
        reach * reach
    }

    pub fn enemy_diameter_sq(&self) -> f32 {
        self.enemy_diameter * self.enemy_diameter
    }

    pub fn pickup_range_sq(&self) -> f32 {
        self.pickup_range * self.pickup_range
    }

    /// Apply the optional dt clamp
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        match self.max_dt {
            Some(max) => dt.min(max),
            None => dt,
        }
    }
}

/// Spawn rates per survival-time band
fn default_spawn_bands() -> Vec<SpawnBandConfig> {
    vec![
        SpawnBandConfig::new(Some(1.0), &[("standard", 0.5), ("money", 0.25)]),
        SpawnBandConfig::new(
            Some(3.0),
            &[("standard", 0.5), ("money", 0.4), ("kissing", 0.2), ("sick", 0.1)],
        ),
        SpawnBandConfig::new(
            Some(5.0),
            &[
                ("standard", 1.0),
                ("money", 0.4),
                ("kissing", 0.25),
                ("angry", 0.1),
                ("laughing", 0.2),
            ],
        ),
        SpawnBandConfig::new(
            Some(7.0),
            &[
                ("standard", 1.0),
                ("money", 0.3),
                ("sick", 0.1),
                ("party", 0.25),
                ("sunglasses", 0.15),
            ],
        ),
        SpawnBandConfig::new(
            Some(9.0),
            &[
                ("standard", 1.0),
                ("money", 0.4),
                ("kissing", 0.3),
                ("sick", 0.2),
                ("angry", 0.1),
                ("laughing", 0.2),
            ],
        ),
        SpawnBandConfig::new(
            Some(11.0),
            &[
                ("standard", 1.5),
                ("money", 0.25),
                ("kissing", 0.4),
                ("party", 0.3),
                ("star", 0.1),
                ("sunglasses", 0.1),
            ],
        ),
        SpawnBandConfig::new(
            Some(13.0),
            &[
                ("standard", 1.0),
                ("money", 0.2),
                ("sick", 0.3),
                ("angry", 0.3),
                ("party", 0.4),
                ("star", 0.2),
                ("laughing", 0.3),
            ],
        ),
        SpawnBandConfig::new(
            Some(15.0),
            &[
                ("money", 0.15),
                ("kissing", 0.5),
                ("sick", 0.4),
                ("angry", 0.4),
                ("party", 0.6),
                ("star", 0.3),
                ("laughing", 0.2),
                ("sunglasses", 0.2),
            ],
        ),
        SpawnBandConfig::new(
            None,
            &[
                ("money", 0.1),
                ("kissing", 1.0),
                ("sick", 0.5),
                ("angry", 0.5),
                ("party", 1.0),
                ("star", 0.5),
                ("laughing", 0.5),
                ("sunglasses", 0.5),
            ],
        ),
    ]
}
