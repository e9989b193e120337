//! Render registry seam
//!
//! The simulation never draws. It registers one visual per live entity, flips
//! visual kinds (e.g. frozen), publishes moved positions, and unregisters the
//! visual in the same step the entity dies. `Scene` keeps the core-side mirror
//! of that bookkeeping and queues `RenderCommand`s for the presentation layer
//! to drain each frame.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Draw layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Background,
    Game,
    Effect,
    Ui,
}

/// Handle linking an entity to its visual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualId(pub u32);

/// Fixed visual of the player
pub const PLAYER_VISUAL: VisualId = VisualId(0);
/// Fixed visual of the ghost
pub const GHOST_VISUAL: VisualId = VisualId(1);
/// First id handed out to spawned entities
pub const FIRST_ENTITY_VISUAL: u32 = 2;

/// Sprite to show for a visual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualKind {
    Player,
    Ghost,
    // Enemies
    /// Standard face, variants 1..=5
    Standard(u8),
    Kissing,
    Money,
    Party,
    StarEyes,
    Sick,
    Angry,
    Furious,
    Sleeping,
    WokenUp,
    Laughing,
    Sunglasses,
    Frozen,
    // Projectiles
    Ice,
    Cookie,
    Diamond,
    Germ,
    Pizza,
    Apple,
    Star,
    Fire,
    Heart,
    Bolt,
    /// Party confetti, variants 1..=2
    Confetti(u8),
    Explosive,
    Explosion,
    // Pickups
    MoneyPickup,
    PresentPickup,
}

/// One registry mutation, in the order the simulation issued it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    Register {
        layer: Layer,
        id: VisualId,
        kind: VisualKind,
        pos: Vec2,
    },
    Unregister {
        layer: Layer,
        id: VisualId,
    },
    SetKind {
        id: VisualId,
        kind: VisualKind,
    },
    Move {
        id: VisualId,
        pos: Vec2,
    },
}

/// Operations the simulation needs from the presentation layer
pub trait RenderRegistry {
    fn register(&mut self, layer: Layer, id: VisualId, kind: VisualKind, pos: Vec2);
    fn unregister(&mut self, layer: Layer, id: VisualId);
    fn set_visual_kind(&mut self, id: VisualId, kind: VisualKind);
    fn set_position(&mut self, id: VisualId, pos: Vec2);
}

/// A registered visual
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    pub layer: Layer,
    pub kind: VisualKind,
    pub pos: Vec2,
}

/// Core-side mirror of every live visual plus the pending command queue
#[derive(Debug, Default)]
pub struct Scene {
    visuals: HashMap<VisualId, Visual>,
    commands: Vec<RenderCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: VisualId) -> Option<&Visual> {
        self.visuals.get(&id)
    }

    pub fn contains(&self, id: VisualId) -> bool {
        self.visuals.contains_key(&id)
    }

    /// Number of live visuals
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Live visuals on one layer
    pub fn count_on(&self, layer: Layer) -> usize {
        self.visuals.values().filter(|v| v.layer == layer).count()
    }

    /// Hand the queued commands to the presentation layer
    pub fn drain_commands(&mut self) -> impl Iterator<Item = RenderCommand> + '_ {
        self.commands.drain(..)
    }

    pub fn pending_commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Drop every visual (return to main menu)
    pub fn clear(&mut self) {
        for (id, visual) in self.visuals.drain() {
            self.commands.push(RenderCommand::Unregister {
                layer: visual.layer,
                id,
            });
        }
    }
}

impl RenderRegistry for Scene {
    fn register(&mut self, layer: Layer, id: VisualId, kind: VisualKind, pos: Vec2) {
        if self.visuals.insert(id, Visual { layer, kind, pos }).is_some() {
            log::warn!("Visual {:?} registered twice, replacing", id);
        }
        self.commands.push(RenderCommand::Register { layer, id, kind, pos });
    }

    fn unregister(&mut self, layer: Layer, id: VisualId) {
        match self.visuals.get(&id) {
            Some(visual) if visual.layer == layer => {
                self.visuals.remove(&id);
                self.commands.push(RenderCommand::Unregister { layer, id });
            }
            Some(visual) => {
                log::warn!(
                    "Visual {:?} unregistered from {:?} but lives on {:?}",
                    id,
                    layer,
                    visual.layer
                );
            }
            None => log::warn!("Unregistering unknown visual {:?}", id),
        }
    }

    fn set_visual_kind(&mut self, id: VisualId, kind: VisualKind) {
        match self.visuals.get_mut(&id) {
            Some(visual) => {
                visual.kind = kind;
                self.commands.push(RenderCommand::SetKind { id, kind });
            }
            None => log::warn!("Setting kind of unknown visual {:?}", id),
        }
    }

    fn set_position(&mut self, id: VisualId, pos: Vec2) {
        match self.visuals.get_mut(&id) {
            Some(visual) => {
                visual.pos = pos;
                self.commands.push(RenderCommand::Move { id, pos });
            }
            None => log::warn!("Moving unknown visual {:?}", id),
        }
    }
}
