//! Enemy instances
//!
//! Behavior is bound from the catalogue entry at construction; the driver
//! only ever calls the three hook slots, each of which may be empty.

use glam::Vec2;

use super::collision::separation_offset;
use super::state::World;
use crate::Tuning;
use crate::render::{Layer, RenderRegistry, VisualId, VisualKind};

/// Catalogue hook: runs synchronously with full access to the world
pub type EnemyHook = fn(&mut Enemy, &mut World);

/// Catalogue entry for one enemy type
#[derive(Debug)]
pub struct EnemyType {
    pub name: &'static str,
    pub visual: VisualKind,
    pub health: f32,
    pub speed: f32,
    /// Runs once before the visual is registered
    pub on_create: Option<EnemyHook>,
    /// Runs every unfrozen tick, before steering
    pub on_update: Option<EnemyHook>,
    /// Runs once when health has dropped to zero
    pub on_death: Option<EnemyHook>,
}

impl EnemyType {
    /// Entry with base stats and no hooks
    pub const fn new(name: &'static str, visual: VisualKind) -> Self {
        Self {
            name,
            visual,
            health: 100.0,
            speed: 100.0,
            on_create: None,
            on_update: None,
            on_death: None,
        }
    }
}

/// A live enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: &'static EnemyType,
    pub visual: VisualId,
    pub pos: Vec2,
    pub health: f32,
    pub speed: f32,
    /// Seconds until the enemy thaws (0 = not frozen)
    pub freeze_time: f32,
    /// Sprite shown while not frozen
    pub base_visual: VisualKind,
    /// Scratch values private to the type's hooks (timers, directions)
    pub args: [f32; 2],
    showing_frozen: bool,
    pub(crate) published: Vec2,
}

impl Enemy {
    /// Build an enemy, run its create hook and register its visual
    pub fn new(kind: &'static EnemyType, pos: Vec2, world: &mut World) -> Self {
        let mut enemy = Self {
            kind,
            visual: world.next_visual_id(),
            pos,
            health: kind.health,
            speed: kind.speed,
            freeze_time: 0.0,
            base_visual: kind.visual,
            args: [0.0; 2],
            showing_frozen: false,
            published: pos,
        };
        if let Some(on_create) = kind.on_create {
            on_create(&mut enemy, world);
        }
        world
            .scene
            .register(Layer::Game, enemy.visual, enemy.base_visual, enemy.pos);
        enemy
    }

    pub fn name(&self) -> &'static str {
        self.kind.name
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_time > 0.0
    }

    /// Advance one tick. Returns false once the enemy has died (death hook already run).
    pub fn update(&mut self, dt: f32, world: &mut World) -> bool {
        if self.health <= 0.0 {
            if let Some(on_death) = self.kind.on_death {
                on_death(self, world);
            }
            return false;
        }

        self.freeze_time = (self.freeze_time - dt).max(0.0);
        if self.is_frozen() {
            return true;
        }
        if self.showing_frozen {
            world.scene.set_visual_kind(self.visual, self.base_visual);
            self.showing_frozen = false;
        }

        // Contact damage (player is assumed enemy-sized)
        let contact_sq = world.tuning.enemy_diameter_sq();
        if self.pos.distance_squared(world.player.pos) < contact_sq {
            world.player.health -= world.tuning.enemy_contact_dps * dt;
        }

        if let Some(on_update) = self.kind.on_update {
            on_update(self, world);
        }

        let to_player = world.player.pos - self.pos;
        let distance = to_player.length();
        if distance < world.tuning.min_steer_distance {
            return true;
        }
        self.pos += to_player / distance * self.speed * dt;
        true
    }

    /// Push away from overlapping neighbours.
    ///
    /// `positions` is a snapshot of every live enemy taken after all of them
    /// moved this tick; `index` is this enemy's slot in it.
    pub fn update_separation(&mut self, index: usize, positions: &[Vec2], tuning: &Tuning) {
        if self.is_frozen() {
            return;
        }

        let mut offset = Vec2::ZERO;
        let mut collided = 0u32;
        for (i, &other) in positions.iter().enumerate() {
            if i == index {
                continue;
            }
            if let Some(push) = separation_offset(
                self.pos,
                other,
                tuning.enemy_diameter,
                tuning.proximity_prefilter,
            ) {
                offset += push;
                collided += 1;
            }
        }

        if collided > 0 {
            self.pos += offset / collided as f32 * tuning.separation_damping;
        }
    }

    /// Freeze for at least `seconds`. Freezes extend, they never stack.
    pub fn freeze_for(&mut self, seconds: f32, render: &mut dyn RenderRegistry) {
        self.freeze_time = self.freeze_time.max(seconds);
        if self.is_frozen() && !self.showing_frozen {
            render.set_visual_kind(self.visual, VisualKind::Frozen);
            self.showing_frozen = true;
        }
    }
}
