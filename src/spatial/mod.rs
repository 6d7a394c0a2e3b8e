/// Spatial indexing primitives.
///
/// Contains the axis-aligned bounding box type and the bounded-depth
/// octree that partitions mesh-instance entries in 3D space.

pub mod aabb;
pub mod octree;

pub use aabb::AABB;
pub use octree::{Entry, Octree, OctreeConfig, OctreeNode};
