/// Visibility classification strategies.
///
/// A VisibilityClassifier partitions the known mesh ids into hit
/// (candidate-visible) and unhit sets from camera state. The default
/// RayFanClassifier is a bounding-volume ray-coverage heuristic: it can
/// miss a box lying between two adjacent sample rays, and it never tests
/// depth against other scene content. It is an approximate visibility
/// test, not an occlusion algorithm.

use glam::Vec3;
use rustc_hash::FxHashSet;
use crate::error::Result;
use crate::camera::{Ray, RayFanConfig};
use crate::spatial::{Entry, AABB};

/// Partition of all known mesh ids for one classification pass.
///
/// Recomputed on every pass and discarded after reconciliation.
#[derive(Debug, Clone, Default)]
pub struct VisibilitySnapshot {
    pub hit_ids: FxHashSet<String>,
    pub unhit_ids: FxHashSet<String>,
}

impl VisibilitySnapshot {
    pub fn hit_count(&self) -> usize {
        self.hit_ids.len()
    }

    pub fn unhit_count(&self) -> usize {
        self.unhit_ids.len()
    }
}

/// Strategy for classifying entries as hit or unhit.
///
/// The caller owns the classifier and invokes it on demand; `&mut self`
/// allows stateful implementations to cache between passes.
pub trait VisibilityClassifier {
    /// Partition `entries` into hit and unhit mesh ids, as seen from
    /// `camera_position` looking along `forward`.
    fn classify(
        &mut self,
        camera_position: Vec3,
        forward: Vec3,
        entries: &[&Entry],
    ) -> Result<VisibilitySnapshot>;
}

/// Trivial classifier that marks everything as hit.
///
/// Useful as a baseline and for scenes small enough to keep fully
/// resident.
pub struct AllVisibleClassifier;

impl AllVisibleClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl VisibilityClassifier for AllVisibleClassifier {
    fn classify(
        &mut self,
        _camera_position: Vec3,
        _forward: Vec3,
        entries: &[&Entry],
    ) -> Result<VisibilitySnapshot> {
        let mut snapshot = VisibilitySnapshot::default();
        for entry in entries {
            snapshot.hit_ids.insert(entry.mesh_id.clone());
        }
        Ok(snapshot)
    }
}

/// Ray-fan classifier.
///
/// Casts the configured direction grid from the camera position. For each
/// entry, an axis-aligned box is reconstructed from `position ± radius`;
/// the entry is hit if at least one ray, clipped to the fan's far
/// distance, intersects that box.
pub struct RayFanClassifier {
    config: RayFanConfig,
}

impl RayFanClassifier {
    pub fn new(config: RayFanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RayFanConfig {
        &self.config
    }
}

impl VisibilityClassifier for RayFanClassifier {
    fn classify(
        &mut self,
        camera_position: Vec3,
        forward: Vec3,
        entries: &[&Entry],
    ) -> Result<VisibilitySnapshot> {
        let directions = self.config.directions(forward)?;
        let rays: Vec<Ray> = directions
            .into_iter()
            .map(|dir| Ray::new(camera_position, dir))
            .collect();
        let far = self.config.far_distance;

        let mut snapshot = VisibilitySnapshot::default();
        for entry in entries {
            let bounds = AABB::from_center_half_extent(entry.position, entry.radius);
            let hit = rays.iter().any(|ray| ray.intersects_aabb(&bounds, far));
            if hit {
                snapshot.hit_ids.insert(entry.mesh_id.clone());
            } else {
                snapshot.unhit_ids.insert(entry.mesh_id.clone());
            }
        }

        crate::engine_debug!(
            "meshstream::RayFanClassifier",
            "Classified {} entries with {} rays: {} hit, {} unhit",
            entries.len(),
            rays.len(),
            snapshot.hit_count(),
            snapshot.unhit_count()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;
