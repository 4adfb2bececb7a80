//! Circle overlap tests and target acquisition
//!
//! Every body in the arena is a circle; nothing else collides.

use glam::Vec2;

use crate::Viewport;

/// A circular body
pub trait Circle {
    fn center(&self) -> Vec2;

    fn radius(&self) -> f32;

    /// Strict overlap: center distance below the sum of radii
    fn is_colliding_with<C: Circle + ?Sized>(&self, other: &C) -> bool {
        circles_overlap(self.center(), self.radius(), other.center(), other.radius())
    }
}

/// Check whether two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Check whether a circle lies entirely outside the viewport rectangle
#[inline]
pub fn circle_outside_viewport(pos: Vec2, radius: f32, viewport: &Viewport) -> bool {
    pos.x < -radius
        || pos.x > viewport.width + radius
        || pos.y < -radius
        || pos.y > viewport.height + radius
}

/// Find the closest candidate strictly within `range` of `origin`
///
/// Ties keep the first candidate encountered. Returns the candidate's index
/// and position.
pub fn nearest_within(origin: Vec2, range: f32, candidates: &[Vec2]) -> Option<(usize, Vec2)> {
    let mut best: Option<(usize, Vec2)> = None;
    let mut best_dist = range;

    for (i, &pos) in candidates.iter().enumerate() {
        let dist = origin.distance(pos);
        if dist < best_dist {
            best = Some((i, pos));
            best_dist = dist;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dot(Vec2, f32);

    impl Circle for Dot {
        fn center(&self) -> Vec2 {
            self.0
        }
        fn radius(&self) -> f32 {
            self.1
        }
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Dot(Vec2::ZERO, 5.0);
        let touching = Dot(Vec2::new(10.0, 0.0), 5.0);
        let inside = Dot(Vec2::new(9.9, 0.0), 5.0);
        assert!(!a.is_colliding_with(&touching));
        assert!(a.is_colliding_with(&inside));
    }

    #[test]
    fn test_outside_viewport_padded_by_radius() {
        let vp = Viewport::new(800.0, 600.0);
        assert!(!circle_outside_viewport(Vec2::new(-2.0, 300.0), 3.0, &vp));
        assert!(circle_outside_viewport(Vec2::new(-3.5, 300.0), 3.0, &vp));
        assert!(circle_outside_viewport(Vec2::new(400.0, 603.5), 3.0, &vp));
        assert!(!circle_outside_viewport(Vec2::new(800.0, 600.0), 3.0, &vp));
    }

    #[test]
    fn test_nearest_within_range() {
        let origin = Vec2::new(400.0, 300.0);
        let candidates = [
            Vec2::new(600.0, 300.0), // out of range
            Vec2::new(480.0, 300.0),
            Vec2::new(450.0, 300.0),
        ];
        let (idx, pos) = nearest_within(origin, 150.0, &candidates).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(pos, Vec2::new(450.0, 300.0));
    }

    #[test]
    fn test_nearest_tie_keeps_first() {
        let origin = Vec2::ZERO;
        let candidates = [Vec2::new(0.0, 10.0), Vec2::new(10.0, 0.0)];
        let (idx, _) = nearest_within(origin, 100.0, &candidates).unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn test_nearest_none_in_range() {
        assert!(nearest_within(Vec2::ZERO, 50.0, &[Vec2::new(50.0, 0.0)]).is_none());
        assert!(nearest_within(Vec2::ZERO, 50.0, &[]).is_none());
    }
}
