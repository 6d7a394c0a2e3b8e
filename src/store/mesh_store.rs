/// Mesh payload collection.
///
/// Stores one MeshRecord per mesh instance and decodes records into
/// typed geometry/material variants on load. Decoding is tag-driven over
/// a closed set of kinds: an unknown tag falls back to a placeholder
/// (unit cube, neutral material) so a present id never maps to a missing
/// mesh. Records that fail structural validation are skipped with a
/// diagnostic instead of aborting the load.

use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::engine_bail;
use super::record_store::RecordStore;

/// Collection name for the mesh payload.
pub const MESH_COLLECTION: &str = "glb_meshes";

/// Neutral placeholder color (0xcccccc).
pub const NEUTRAL_COLOR: u32 = 0x00cc_cccc;

/// Geometry kind tags accepted by the decoder.
const GEOMETRY_KIND_BUFFER: &str = "buffer";
const GEOMETRY_KIND_BOX: &str = "box";

/// Material kind tags accepted by the decoder.
const MATERIAL_KIND_BASIC: &str = "basic";
const MATERIAL_KIND_STANDARD: &str = "standard";

// ===== STORED RECORDS =====

/// Geometry descriptor as persisted: a kind tag plus a flat position
/// attribute array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDesc {
    pub kind: String,
    /// Flat vertex positions, `item_size` floats per vertex
    pub positions: Vec<f32>,
    pub item_size: u32,
    /// Vertex count; must equal `positions.len() / item_size`
    pub count: u32,
}

/// Material descriptor as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDesc {
    pub kind: String,
    pub color: u32,
}

/// World transform of a mesh instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

/// User-assigned identity block, distinct from the storage key.
///
/// `position` and `size` are the bounding-box center and diagonal the
/// import pipeline derived for this instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub id: String,
    pub position: [f32; 3],
    pub size: f32,
}

/// One mesh instance as persisted in the payload collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshRecord {
    pub id: String,
    pub name: String,
    pub geometry: GeometryDesc,
    pub material: MaterialDesc,
    pub transform: Transform,
    pub user_data: UserData,
}

// ===== DECODED FORMS =====

/// Decoded geometry variant.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryKind {
    /// Arbitrary vertex buffer
    Buffer {
        positions: Vec<f32>,
        item_size: u32,
        count: u32,
    },
    /// Axis-aligned box of the given dimensions (placeholder uses 1,1,1)
    Box { width: f32, height: f32, depth: f32 },
}

impl GeometryKind {
    /// Unit-cube placeholder geometry.
    pub fn unit_box() -> Self {
        GeometryKind::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }
}

/// Decoded material variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Unlit flat color
    Basic { color: u32 },
    /// Lit standard material
    Standard { color: u32 },
}

impl MaterialKind {
    /// Neutral placeholder material.
    pub fn neutral() -> Self {
        MaterialKind::Basic {
            color: NEUTRAL_COLOR,
        }
    }
}

/// A mesh instance after decoding, ready for scene attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMesh {
    pub id: String,
    pub name: String,
    pub geometry: GeometryKind,
    pub material: MaterialKind,
    pub transform: Transform,
    pub user_data: UserData,
}

// ===== STORE =====

/// Mesh persistence over a RecordStore.
pub struct MeshStore<'a> {
    store: &'a RecordStore,
}

impl<'a> MeshStore<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Persist the full mesh payload, replacing the collection.
    pub fn store_meshes(&self, records: &[MeshRecord]) -> Result<()> {
        self.store.write_collection(MESH_COLLECTION, records)?;
        crate::engine_info!(
            "meshstream::MeshStore",
            "Persisted {} mesh records",
            records.len()
        );
        Ok(())
    }

    /// Bulk-read and decode the mesh payload.
    ///
    /// Structurally invalid records are skipped with a diagnostic; records
    /// with unknown geometry/material tags decode to the placeholder.
    ///
    /// # Errors
    ///
    /// `NotFound` if the collection is missing or holds zero records.
    pub fn load_meshes(&self) -> Result<Vec<DecodedMesh>> {
        let records: Vec<MeshRecord> = self.store.read_collection(MESH_COLLECTION)?;
        if records.is_empty() {
            engine_bail!(NotFound, "meshstream::MeshStore",
                "collection '{}' holds no records", MESH_COLLECTION);
        }

        let total = records.len();
        let decoded: Vec<DecodedMesh> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| Self::decode(index, record))
            .collect();

        if decoded.len() < total {
            crate::engine_warn!(
                "meshstream::MeshStore",
                "Loaded {} of {} mesh records; the rest were skipped as malformed",
                decoded.len(),
                total
            );
        }
        Ok(decoded)
    }

    /// Scan the collection for the record whose embedded user id matches.
    ///
    /// The user id is a stable logical id distinct from the storage key.
    /// Returns None when no record matches (or the matching record is
    /// structurally invalid).
    ///
    /// # Errors
    ///
    /// `NotFound` if the collection itself is missing.
    pub fn lookup_by_user_id(&self, user_id: &str) -> Result<Option<DecodedMesh>> {
        let records: Vec<MeshRecord> = self.store.read_collection(MESH_COLLECTION)?;
        for (index, record) in records.iter().enumerate() {
            if record.user_data.id == user_id {
                return Ok(Self::decode(index, record));
            }
        }
        Ok(None)
    }

    /// Decode one record, or None if it fails structural validation.
    fn decode(index: usize, record: &MeshRecord) -> Option<DecodedMesh> {
        if record.id.is_empty() {
            crate::engine_warn!(
                "meshstream::MeshStore",
                "Skipping mesh record {}: empty id",
                index
            );
            return None;
        }
        if record.geometry.kind.is_empty() {
            crate::engine_warn!(
                "meshstream::MeshStore",
                "Skipping mesh record '{}': missing geometry kind",
                record.id
            );
            return None;
        }

        let geometry = Self::decode_geometry(record)?;
        let material = Self::decode_material(record);

        Some(DecodedMesh {
            id: record.id.clone(),
            name: record.name.clone(),
            geometry,
            material,
            transform: record.transform,
            user_data: record.user_data.clone(),
        })
    }

    fn decode_geometry(record: &MeshRecord) -> Option<GeometryKind> {
        let desc = &record.geometry;
        match desc.kind.as_str() {
            GEOMETRY_KIND_BUFFER => {
                // Malformed attribute arrays are structural: skip the record
                if desc.item_size == 0
                    || desc.positions.len() != (desc.count as usize) * (desc.item_size as usize)
                {
                    crate::engine_warn!(
                        "meshstream::MeshStore",
                        "Skipping mesh record '{}': {} position floats do not match count {} x item_size {}",
                        record.id,
                        desc.positions.len(),
                        desc.count,
                        desc.item_size
                    );
                    return None;
                }
                Some(GeometryKind::Buffer {
                    positions: desc.positions.clone(),
                    item_size: desc.item_size,
                    count: desc.count,
                })
            }
            GEOMETRY_KIND_BOX => Some(GeometryKind::unit_box()),
            unknown => {
                crate::engine_warn!(
                    "meshstream::MeshStore",
                    "Mesh record '{}' has unknown geometry kind '{}'; using the unit-cube placeholder",
                    record.id,
                    unknown
                );
                Some(GeometryKind::unit_box())
            }
        }
    }

    fn decode_material(record: &MeshRecord) -> MaterialKind {
        let desc = &record.material;
        match desc.kind.as_str() {
            MATERIAL_KIND_BASIC => MaterialKind::Basic { color: desc.color },
            MATERIAL_KIND_STANDARD => MaterialKind::Standard { color: desc.color },
            unknown => {
                crate::engine_warn!(
                    "meshstream::MeshStore",
                    "Mesh record '{}' has unknown material kind '{}'; using the neutral placeholder",
                    record.id,
                    unknown
                );
                MaterialKind::neutral()
            }
        }
    }
}

#[cfg(test)]
#[path = "mesh_store_tests.rs"]
mod tests;
