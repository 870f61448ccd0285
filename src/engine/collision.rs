//! Overlap tests for the mini-games
//!
//! Axis-aligned boxes for the shooter, circle-vs-box for the flappy bird,
//! grid cells for snake and memory. All checks are pure functions; the
//! rule-sets decide what an overlap means.
//!
//! Resolution-order contract: within one tick, projectile-obstacle pairs
//! are resolved before player-obstacle pairs, so a simultaneous "shoot and
//! get hit" is a trade rather than a missed kill. The shooter's tick
//! enforces this ordering.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box, +y pointing down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from top-left corner and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict interior overlap; touching edges do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Circle-circle overlap (touching counts)
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

/// Circle-box overlap via closest-point distance
pub fn circle_aabb_overlap(center: Vec2, radius: f32, rect: &Aabb) -> bool {
    let closest = center.clamp(rect.min, rect.max);
    center.distance_squared(closest) <= radius * radius
}

/// Is the cell inside a `grid.x` x `grid.y` play field?
pub fn cell_in_grid(cell: IVec2, grid: IVec2) -> bool {
    cell.x >= 0 && cell.x < grid.x && cell.y >= 0 && cell.y < grid.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_overlap_and_miss() {
        let a = Aabb::from_pos_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::from_pos_size(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        let c = Aabb::from_pos_size(Vec2::new(20.0, 0.0), Vec2::new(4.0, 4.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn aabb_touching_edges_do_not_collide() {
        let a = Aabb::from_pos_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::from_pos_size(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn circle_circle() {
        assert!(circles_overlap(
            Vec2::new(0.0, 0.0),
            5.0,
            Vec2::new(8.0, 0.0),
            4.0
        ));
        assert!(!circles_overlap(
            Vec2::new(0.0, 0.0),
            5.0,
            Vec2::new(10.0, 0.0),
            4.0
        ));
    }

    #[test]
    fn circle_aabb_corner_case() {
        let rect = Aabb::from_pos_size(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0));
        // Circle near the corner: closest point is (10, 10)
        assert!(circle_aabb_overlap(Vec2::new(7.0, 7.0), 5.0, &rect));
        assert!(!circle_aabb_overlap(Vec2::new(5.0, 5.0), 5.0, &rect));
    }

    #[test]
    fn grid_bounds() {
        let grid = IVec2::new(20, 20);
        assert!(cell_in_grid(IVec2::new(0, 0), grid));
        assert!(cell_in_grid(IVec2::new(19, 19), grid));
        assert!(!cell_in_grid(IVec2::new(-1, 5), grid));
        assert!(!cell_in_grid(IVec2::new(5, 20), grid));
    }
}
