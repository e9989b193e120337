//! Pickups dropped by enemies or scattered by the spawner

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::in_contact;
use super::state::World;
use crate::render::{Layer, RenderRegistry, VisualId, VisualKind};

/// What a pickup does when collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// One unit of upgrade money
    Money,
    /// Heals the player
    Health,
}

impl PickupKind {
    pub fn visual(self) -> VisualKind {
        match self {
            PickupKind::Money => VisualKind::MoneyPickup,
            PickupKind::Health => VisualKind::PresentPickup,
        }
    }

    fn on_pickup(self, world: &mut World) {
        match self {
            PickupKind::Money => world.player.money += 1,
            PickupKind::Health => {
                let heal = world.tuning.health_pickup_heal;
                world.player.heal(heal);
            }
        }
    }
}

/// A live pickup
#[derive(Debug, Clone)]
pub struct Pickup {
    pub kind: PickupKind,
    pub visual: VisualId,
    pub pos: Vec2,
}

impl Pickup {
    /// Build a pickup and register its visual on the background layer
    pub fn new(kind: PickupKind, pos: Vec2, world: &mut World) -> Self {
        let visual = world.next_visual_id();
        world
            .scene
            .register(Layer::Background, visual, kind.visual(), pos);
        Self { kind, visual, pos }
    }

    /// Returns false once collected (effect already applied)
    pub fn update(&self, world: &mut World) -> bool {
        let tuning = &world.tuning;
        if !in_contact(
            self.pos,
            world.player.pos,
            tuning.proximity_prefilter,
            tuning.pickup_range_sq(),
        ) {
            return true;
        }
        self.kind.on_pickup(world);
        false
    }
}
