/// Bounded-depth octree over point-like mesh-instance entries.
///
/// Each node covers an axis-aligned cube. A node is either a leaf holding
/// up to `capacity` entries, or subdivided into exactly 8 children that
/// partition its cube into octants of half its size. Subdivision stops one
/// level short of `max_depth`; leaves at the bottom absorb overflow instead
/// of losing data.
///
/// Ownership: the caller creates and owns the Octree and passes it by
/// reference to the classifier and the persistence layer.

use glam::Vec3;
use crate::error::Result;
use crate::engine_bail;
use super::aabb::AABB;

/// Point-radius proxy for a mesh instance stored in the spatial index.
///
/// `radius` approximates a bounding sphere; the classifier reconstructs
/// an axis-aligned box from `position ± radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub position: Vec3,
    pub radius: f32,
    pub mesh_id: String,
}

impl Entry {
    pub fn new(position: Vec3, radius: f32, mesh_id: impl Into<String>) -> Self {
        Self {
            position,
            radius,
            mesh_id: mesh_id.into(),
        }
    }
}

/// Octree construction parameters.
#[derive(Debug, Clone, Copy)]
pub struct OctreeConfig {
    /// Max entries per leaf before subdivision is attempted
    pub capacity: usize,
    /// Hard bound on node depth (root is depth 0)
    pub max_depth: u32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            capacity: 8,
            max_depth: 5,
        }
    }
}

/// One cubic cell of the octree.
#[derive(Debug, Clone)]
pub struct OctreeNode {
    center: Vec3,
    size: f32,
    depth: u32,
    entries: Vec<Entry>,
    children: Option<Box<[OctreeNode; 8]>>,
}

impl OctreeNode {
    fn new(center: Vec3, size: f32, depth: u32) -> Self {
        Self {
            center,
            size,
            depth,
            entries: Vec::new(),
            children: None,
        }
    }

    /// Reassemble a node from persisted parts (loader use only).
    pub(crate) fn from_parts(
        center: Vec3,
        size: f32,
        depth: u32,
        entries: Vec<Entry>,
        children: Option<Box<[OctreeNode; 8]>>,
    ) -> Self {
        Self {
            center,
            size,
            depth,
            entries,
            children,
        }
    }

    // ===== GETTERS =====

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Edge length of this node's cube.
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Entries owned directly by this node.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn children(&self) -> Option<&[OctreeNode; 8]> {
        self.children.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Bounding cube derived from center and size.
    pub fn bounds(&self) -> AABB {
        AABB::from_center_size(self.center, self.size)
    }

    /// Closed-interval point-in-cube test against this node's bounds.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.bounds().contains_point(point)
    }

    // ===== MUTATION =====

    /// Insert an entry into this subtree.
    ///
    /// Returns false if `entry.position` lies outside this node's cube.
    /// At the bottom of the tree, capacity is not enforced: leaves absorb
    /// overflow rather than dropping data.
    fn insert(&mut self, entry: Entry, config: &OctreeConfig) -> bool {
        if !self.contains_point(entry.position) {
            return false;
        }

        if let Some(ref mut children) = self.children {
            return Self::insert_into_children(children, entry, config, self.depth, &mut self.entries);
        }

        // Leaf: append while under capacity, or when subdivision is no
        // longer allowed at this depth.
        if self.entries.len() < config.capacity || !self.can_subdivide(config) {
            self.entries.push(entry);
            return true;
        }

        self.subdivide(config);

        // Redistribute existing entries; a containment miss keeps the
        // entry at this node.
        let existing = std::mem::take(&mut self.entries);
        if let Some(ref mut children) = self.children {
            for prior in existing {
                Self::insert_into_children(children, prior, config, self.depth, &mut self.entries);
            }
            return Self::insert_into_children(children, entry, config, self.depth, &mut self.entries);
        }

        // subdivide() declined; keep the data in place
        self.entries = existing;
        self.entries.push(entry);
        true
    }

    /// Delegate to the single child whose cube contains the point.
    ///
    /// If no child claims the point (floating-point edge case), the entry
    /// falls back to the parent's own entry list and the anomaly is logged.
    fn insert_into_children(
        children: &mut [OctreeNode; 8],
        entry: Entry,
        config: &OctreeConfig,
        depth: u32,
        fallback: &mut Vec<Entry>,
    ) -> bool {
        for child in children.iter_mut() {
            if child.contains_point(entry.position) {
                return child.insert(entry, config);
            }
        }

        crate::engine_warn!(
            "meshstream::Octree",
            "No child octant claims entry '{}' at ({}, {}, {}) (depth {}); keeping it on the parent node",
            entry.mesh_id,
            entry.position.x,
            entry.position.y,
            entry.position.z,
            depth
        );
        fallback.push(entry);
        true
    }

    /// Whether this node may still subdivide under the depth bound.
    fn can_subdivide(&self, config: &OctreeConfig) -> bool {
        self.depth + 1 < config.max_depth
    }

    /// Split this node into 8 children, one per octant.
    ///
    /// Child centers sit at `center + (±size/4, ±size/4, ±size/4)`, each
    /// with half this node's size. No-op when the depth bound forbids it.
    /// Octant index bit layout: bit 0 = +X, bit 1 = +Y, bit 2 = +Z.
    fn subdivide(&mut self, config: &OctreeConfig) {
        if self.children.is_some() || !self.can_subdivide(config) {
            return;
        }

        let quarter = self.size * 0.25;
        let half = self.size * 0.5;
        let child_depth = self.depth + 1;

        let child = |octant: usize| {
            let offset = Vec3::new(
                if octant & 1 != 0 { quarter } else { -quarter },
                if octant & 2 != 0 { quarter } else { -quarter },
                if octant & 4 != 0 { quarter } else { -quarter },
            );
            OctreeNode::new(self.center + offset, half, child_depth)
        };

        self.children = Some(Box::new([
            child(0), child(1), child(2), child(3),
            child(4), child(5), child(6), child(7),
        ]));
    }

    // ===== QUERIES =====

    /// Deepest node whose cube contains `point`, without side effects.
    fn find_node_for_position(&self, point: Vec3) -> Option<&OctreeNode> {
        if !self.contains_point(point) {
            return None;
        }
        if let Some(ref children) = self.children {
            for child in children.iter() {
                if let Some(node) = child.find_node_for_position(point) {
                    return Some(node);
                }
            }
        }
        Some(self)
    }

    /// Locate an entry by mesh id anywhere in this subtree.
    fn find_by_id(&self, mesh_id: &str) -> Option<(&Entry, u32)> {
        if let Some(entry) = self.entries.iter().find(|e| e.mesh_id == mesh_id) {
            return Some((entry, self.depth));
        }
        if let Some(ref children) = self.children {
            for child in children.iter() {
                if let Some(found) = child.find_by_id(mesh_id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Deepest node depth present in this subtree.
    fn max_depth_reached(&self) -> u32 {
        match self.children {
            Some(ref children) => children
                .iter()
                .map(|c| c.max_depth_reached())
                .max()
                .unwrap_or(self.depth),
            None => self.depth,
        }
    }

    fn entry_count(&self) -> usize {
        let own = self.entries.len();
        match self.children {
            Some(ref children) => own + children.iter().map(|c| c.entry_count()).sum::<usize>(),
            None => own,
        }
    }

    fn collect_entries<'a>(&'a self, out: &mut Vec<&'a Entry>) {
        out.extend(self.entries.iter());
        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.collect_entries(out);
            }
        }
    }
}

/// Bounded-depth octree over mesh-instance entries.
///
/// # Example
///
/// ```no_run
/// use glam::Vec3;
/// use mesh_stream_engine::meshstream::spatial::{Entry, Octree, OctreeConfig};
///
/// let mut octree = Octree::new(Vec3::ZERO, 100.0, OctreeConfig::default())?;
/// octree.insert(Entry::new(Vec3::new(1.0, 2.0, 3.0), 0.5, "mesh_0"));
/// # Ok::<(), mesh_stream_engine::meshstream::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Octree {
    root: OctreeNode,
    config: OctreeConfig,
}

impl Octree {
    /// Create an empty octree covering a cube of edge `size` around `center`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `size` is not positive, `capacity` is
    /// zero, or `max_depth` is zero.
    pub fn new(center: Vec3, size: f32, config: OctreeConfig) -> Result<Self> {
        if !(size > 0.0) {
            engine_bail!(InvalidConfig, "meshstream::Octree", "root size must be positive, got {}", size);
        }
        if config.capacity == 0 {
            engine_bail!(InvalidConfig, "meshstream::Octree", "capacity must be at least 1");
        }
        if config.max_depth == 0 {
            engine_bail!(InvalidConfig, "meshstream::Octree", "max_depth must be at least 1");
        }
        Ok(Self {
            root: OctreeNode::new(center, size, 0),
            config,
        })
    }

    /// Reassemble an octree from a persisted root node (loader use only).
    pub(crate) fn from_root(root: OctreeNode, config: OctreeConfig) -> Self {
        Self { root, config }
    }

    /// Insert an entry. Returns false if its position lies outside the
    /// root cube.
    pub fn insert(&mut self, entry: Entry) -> bool {
        let config = self.config;
        self.root.insert(entry, &config)
    }

    /// Root node of the tree.
    pub fn root(&self) -> &OctreeNode {
        &self.root
    }

    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Deepest node whose cube contains `point`, without side effects.
    pub fn find_node_for_position(&self, point: Vec3) -> Option<&OctreeNode> {
        self.root.find_node_for_position(point)
    }

    /// Locate an entry by mesh id. Returns the entry and the depth of the
    /// node holding it.
    pub fn find_by_id(&self, mesh_id: &str) -> Option<(&Entry, u32)> {
        self.root.find_by_id(mesh_id)
    }

    /// Deepest populated depth. Always `<= config.max_depth`.
    pub fn max_depth_reached(&self) -> u32 {
        self.root.max_depth_reached()
    }

    /// Total entries across the whole tree.
    pub fn entry_count(&self) -> usize {
        self.root.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// All entries in the tree, in traversal order.
    pub fn entries(&self) -> Vec<&Entry> {
        let mut out = Vec::with_capacity(self.entry_count());
        self.root.collect_entries(&mut out);
        out
    }
}

#[cfg(test)]
#[path = "octree_tests.rs"]
mod tests;
