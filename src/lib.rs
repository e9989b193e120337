//! Ghost Escort - an arcade survival simulation core
//!
//! Core modules:
//! - `sim`: Entity simulation (enemies, projectiles, pickups, abilities, spawning)
//! - `render`: Render registry seam consumed by the presentation layer
//! - `tuning`: Data-driven game balance
//! - `autopilot`: Idle/demo input generator

pub mod autopilot;
pub mod error;
pub mod render;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use tuning::Tuning;

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Display refresh the headless runner simulates
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Golden ratio, shapes the ghost penalty curve
    pub const PHI: f32 = 1.618;

    /// Default projectile size (pixels)
    pub const PROJECTILE_SIZE: f32 = 18.0;
    /// Default projectile lifetime (seconds)
    pub const PROJECTILE_LIFETIME: f32 = 5.0;

    /// Explosion projectile size
    pub const EXPLOSION_SIZE: f32 = 96.0;
    /// Explosion projectile lifetime
    pub const EXPLOSION_LIFETIME: f32 = 0.25;
}

/// Sum of the absolute axis differences. Cheap pre-filter before exact distance tests.
#[inline]
pub fn manhattan(a: Vec2, b: Vec2) -> f32 {
    (a - b).abs().element_sum()
}

/// Direction for an angle, using the (sin, cos) convention the catalogues are tuned for
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), angle.cos())
}

/// Uniform random angle in [0, 2π)
#[inline]
pub fn random_angle<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>() * std::f32::consts::TAU
}

/// Uniform random point on the circle of `radius` around `center`
pub fn random_point_on_circle<R: Rng + ?Sized>(rng: &mut R, center: Vec2, radius: f32) -> Vec2 {
    center + direction_from_angle(random_angle(rng)) * radius
}

/// Multiplier (0..1) applied to player speed and outgoing damage as the ghost falls behind.
///
/// A shifted 1/x curve: 1.0 at distance 0, dropping to 0 as the distance
/// approaches `falloff`, and clamped to 0 beyond it.
pub fn ghost_penalty(distance: f32, falloff: f32) -> f32 {
    use consts::PHI;
    if distance >= falloff {
        return 0.0;
    }
    (1.0 / (distance / falloff - PHI) + PHI).clamp(0.0, 1.0)
}
