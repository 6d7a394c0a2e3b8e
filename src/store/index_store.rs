/// Flattened octree collection.
///
/// Stores the spatial index as one record per node, assigned sequential
/// ids by a pre-order traversal counter. Child references use the ids the
/// same counter hands to the children during that traversal, so the id
/// scheme has a single source of truth and `rebuild_tree` can always walk
/// down from the root record.

use glam::Vec3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::engine_bail;
use crate::spatial::{Entry, Octree, OctreeConfig, OctreeNode};
use super::record_store::RecordStore;

/// Collection name for the flattened index.
pub const INDEX_COLLECTION: &str = "octree_nodes";

/// Id of the root node record.
pub const ROOT_NODE_ID: &str = "node_0";

/// Storable projection of an Entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedEntry {
    pub position: [f32; 3],
    pub radius: f32,
    pub mesh_id: String,
}

impl From<&Entry> for SerializedEntry {
    fn from(entry: &Entry) -> Self {
        Self {
            position: entry.position.to_array(),
            radius: entry.radius,
            mesh_id: entry.mesh_id.clone(),
        }
    }
}

impl From<&SerializedEntry> for Entry {
    fn from(record: &SerializedEntry) -> Self {
        Self {
            position: Vec3::from_array(record.position),
            radius: record.radius,
            mesh_id: record.mesh_id.clone(),
        }
    }
}

/// Storable projection of an OctreeNode.
///
/// `id` is assigned at serialization time by the traversal counter; it is
/// not derivable from the node's position in the tree alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode {
    pub id: String,
    pub center: [f32; 3],
    pub size: f32,
    pub entries: Vec<SerializedEntry>,
    pub child_ids: Option<Vec<String>>,
}

/// Octree persistence over a RecordStore.
pub struct IndexStore<'a> {
    store: &'a RecordStore,
}

impl<'a> IndexStore<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Flatten and persist the whole tree.
    ///
    /// Pre-order depth-first traversal; each visited node takes the next
    /// id from a counter local to this call.
    pub fn store_tree(&self, octree: &Octree) -> Result<()> {
        let mut records = Vec::new();
        let mut next_id = 0u32;
        Self::flatten(octree.root(), &mut next_id, &mut records);

        self.store.write_collection(INDEX_COLLECTION, &records)?;
        crate::engine_info!(
            "meshstream::IndexStore",
            "Persisted {} octree nodes ({} entries)",
            records.len(),
            octree.entry_count()
        );
        Ok(())
    }

    fn flatten(node: &OctreeNode, next_id: &mut u32, out: &mut Vec<SerializedNode>) -> String {
        let id = format!("node_{}", *next_id);
        *next_id += 1;

        let index = out.len();
        out.push(SerializedNode {
            id: id.clone(),
            center: node.center().to_array(),
            size: node.size(),
            entries: node.entries().iter().map(SerializedEntry::from).collect(),
            child_ids: None,
        });

        if let Some(children) = node.children() {
            let child_ids = children
                .iter()
                .map(|child| Self::flatten(child, next_id, out))
                .collect();
            out[index].child_ids = Some(child_ids);
        }

        id
    }

    /// Bulk-read the index collection as an id-keyed map.
    ///
    /// Records failing structural validation (non-positive size, empty id)
    /// are skipped with a diagnostic.
    ///
    /// # Errors
    ///
    /// `NotFound` if the collection is missing or holds zero records.
    pub fn load_index(&self) -> Result<FxHashMap<String, SerializedNode>> {
        let records: Vec<SerializedNode> = self.store.read_collection(INDEX_COLLECTION)?;
        if records.is_empty() {
            engine_bail!(NotFound, "meshstream::IndexStore",
                "collection '{}' holds no records", INDEX_COLLECTION);
        }

        let mut map = FxHashMap::default();
        for record in records {
            if record.id.is_empty() || !(record.size > 0.0) {
                crate::engine_warn!(
                    "meshstream::IndexStore",
                    "Skipping malformed node record '{}' (size {})",
                    record.id,
                    record.size
                );
                continue;
            }
            map.insert(record.id.clone(), record);
        }
        Ok(map)
    }

    /// Rebuild a live octree from a loaded id map, walking down from the
    /// root record.
    ///
    /// A node whose `child_ids` cannot all be resolved keeps its own
    /// entries and becomes a leaf; the unresolved references are logged.
    ///
    /// # Errors
    ///
    /// `NotFound` if the root record (`node_0`) is absent.
    pub fn rebuild_tree(
        &self,
        map: &FxHashMap<String, SerializedNode>,
        config: OctreeConfig,
    ) -> Result<Octree> {
        let root_record = match map.get(ROOT_NODE_ID) {
            Some(record) => record,
            None => engine_bail!(NotFound, "meshstream::IndexStore",
                "root record '{}' is missing from the index", ROOT_NODE_ID),
        };

        let root = Self::rebuild_node(root_record, map, 0);
        Ok(Octree::from_root(root, config))
    }

    fn rebuild_node(
        record: &SerializedNode,
        map: &FxHashMap<String, SerializedNode>,
        depth: u32,
    ) -> OctreeNode {
        let entries: Vec<Entry> = record.entries.iter().map(Entry::from).collect();

        let children = record.child_ids.as_ref().and_then(|ids| {
            let resolved: Vec<&SerializedNode> =
                ids.iter().filter_map(|id| map.get(id)).collect();
            if resolved.len() != 8 {
                crate::engine_warn!(
                    "meshstream::IndexStore",
                    "Node '{}' references {} children but {} resolved; treating it as a leaf",
                    record.id,
                    ids.len(),
                    resolved.len()
                );
                return None;
            }
            let rebuilt: Vec<OctreeNode> = resolved
                .into_iter()
                .map(|child| Self::rebuild_node(child, map, depth + 1))
                .collect();
            match <[OctreeNode; 8]>::try_from(rebuilt) {
                Ok(array) => Some(Box::new(array)),
                Err(_) => None,
            }
        });

        OctreeNode::from_parts(
            Vec3::from_array(record.center),
            record.size,
            depth,
            entries,
            children,
        )
    }
}

#[cfg(test)]
#[path = "index_store_tests.rs"]
mod tests;
