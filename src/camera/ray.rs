/// Ray with distance-clipped AABB intersection.

use glam::Vec3;
use crate::spatial::AABB;

/// A ray cast from an origin along a unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Create a ray. The direction is normalized here so `t` values from
    /// the intersection test are world-space distances.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Slab-method intersection against `aabb`, clipped to `far`.
    ///
    /// Returns true if the ray enters the box at a distance within
    /// `[0, far]`. An origin inside the box counts as a hit.
    pub fn intersects_aabb(&self, aabb: &AABB, far: f32) -> bool {
        if self.direction == Vec3::ZERO {
            return aabb.contains_point(self.origin);
        }

        let inv = self.direction.recip();
        let t1 = (aabb.min - self.origin) * inv;
        let t2 = (aabb.max - self.origin) * inv;

        // min/max drop the NaN lanes produced by 0 * inf on axes where the
        // direction component is zero
        let t_entry = t1.min(t2).max_element();
        let t_exit = t1.max(t2).min_element();

        t_exit >= t_entry && t_exit >= 0.0 && t_entry <= far
    }
}

#[cfg(test)]
#[path = "ray_tests.rs"]
mod tests;
