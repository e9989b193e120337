//! Proximity tests
//!
//! Every contact test is two-stage: a Manhattan pre-filter rejects anything
//! that is not remotely close, then an exact squared-distance comparison
//! decides. Thresholds are always strict (`<`).

use glam::Vec2;

use crate::manhattan;

/// True when `a` and `b` pass the cheap pre-filter (`|dx| + |dy| <= limit`)
#[inline]
pub fn within_prefilter(a: Vec2, b: Vec2, limit: f32) -> bool {
    manhattan(a, b) <= limit
}

/// Two-stage contact test: pre-filter, then `distance² < threshold_sq`
#[inline]
pub fn in_contact(a: Vec2, b: Vec2, prefilter: f32, threshold_sq: f32) -> bool {
    within_prefilter(a, b, prefilter) && a.distance_squared(b) < threshold_sq
}

/// Offset that pushes `pos` out of `other` until they sit exactly `diameter` apart.
///
/// `None` when the bodies don't overlap, are not near, or coincide exactly
/// (no direction to push along).
pub fn separation_offset(pos: Vec2, other: Vec2, diameter: f32, prefilter: f32) -> Option<Vec2> {
    let diff = pos - other;
    if diff == Vec2::ZERO || !within_prefilter(pos, other, prefilter) {
        return None;
    }
    let dist_sq = diff.length_squared();
    if dist_sq >= diameter * diameter {
        return None;
    }
    let dist = dist_sq.sqrt();
    Some(diff / dist * diameter - diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefilter_is_inclusive() {
        assert!(within_prefilter(Vec2::ZERO, Vec2::new(60.0, 40.0), 100.0));
        assert!(!within_prefilter(Vec2::ZERO, Vec2::new(60.0, 40.1), 100.0));
    }

    #[test]
    fn test_contact_is_strict() {
        let threshold_sq = 64.0 * 64.0;
        assert!(!in_contact(Vec2::ZERO, Vec2::new(64.0, 0.0), 100.0, threshold_sq));
        assert!(in_contact(Vec2::ZERO, Vec2::new(63.0, 0.0), 100.0, threshold_sq));
    }

    #[test]
    fn test_prefilter_rejects_before_exact_test() {
        // Exact test would pass, but the pre-filter rejects first
        assert!(!in_contact(Vec2::ZERO, Vec2::new(80.0, 80.0), 100.0, 200.0 * 200.0));
    }

    #[test]
    fn test_separation_offset_closes_gap() {
        let pos = Vec2::new(10.0, 0.0);
        let offset = separation_offset(pos, Vec2::ZERO, 48.0, 100.0).unwrap();
        assert!((offset.x - 38.0).abs() < 1e-4);
        assert!(offset.y.abs() < 1e-6);
        // Applying the full offset leaves them exactly one diameter apart
        assert!(((pos + offset).length() - 48.0).abs() < 1e-4);
    }

    #[test]
    fn test_separation_offset_none_cases() {
        assert!(separation_offset(Vec2::ZERO, Vec2::ZERO, 48.0, 100.0).is_none());
        assert!(separation_offset(Vec2::new(48.0, 0.0), Vec2::ZERO, 48.0, 100.0).is_none());
        assert!(separation_offset(Vec2::new(500.0, 0.0), Vec2::ZERO, 48.0, 100.0).is_none());
    }
}
