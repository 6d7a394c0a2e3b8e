/// Persistence layer.
///
/// A versioned key/value record store backed by per-collection files,
/// plus the two typed collections built on it: the flattened octree index
/// and the mesh payload. Schema migration is destructive: a version bump
/// wipes every collection before the next write.

pub mod record_store;
pub mod index_store;
pub mod mesh_store;

pub use record_store::{RecordStore, StoreConfig};
pub use index_store::{IndexStore, SerializedEntry, SerializedNode};
pub use mesh_store::{
    DecodedMesh, GeometryDesc, GeometryKind, MaterialDesc, MaterialKind,
    MeshRecord, MeshStore, Transform, UserData,
};
