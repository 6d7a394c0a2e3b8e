use glam::Vec3;
use std::path::{Path, PathBuf};
use crate::spatial::{Entry, Octree, OctreeConfig};
use crate::store::record_store::{RecordStore, StoreConfig};
use super::*;

fn temp_root(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "meshstream_index_store_{}_{}",
        tag,
        std::process::id()
    ))
}

fn cleanup(root: &Path) {
    std::fs::remove_dir_all(root).ok();
}

fn open_store(root: &Path) -> RecordStore {
    cleanup(root);
    RecordStore::open(StoreConfig::new(root, 1)).unwrap()
}

fn split_tree() -> Octree {
    // Capacity 1 forces a root split on the second insert
    let mut tree = Octree::new(
        Vec3::ZERO,
        100.0,
        OctreeConfig { capacity: 1, max_depth: 3 },
    )
    .unwrap();
    assert!(tree.insert(Entry::new(Vec3::new(-20.0, -20.0, -20.0), 1.0, "a")));
    assert!(tree.insert(Entry::new(Vec3::new(20.0, 20.0, 20.0), 2.0, "b")));
    assert!(tree.insert(Entry::new(Vec3::new(20.0, -20.0, 20.0), 0.5, "c")));
    tree
}

/// Entry sets of two trees match, order-independent, with node geometry.
fn assert_trees_equivalent(left: &Octree, right: &Octree) {
    assert_eq!(left.entry_count(), right.entry_count());
    for entry in left.entries() {
        let (found, _) = right
            .find_by_id(&entry.mesh_id)
            .unwrap_or_else(|| panic!("entry '{}' missing after rebuild", entry.mesh_id));
        assert_eq!(found.position, entry.position);
        assert_eq!(found.radius, entry.radius);

        let left_node = left.find_node_for_position(entry.position).unwrap();
        let right_node = right.find_node_for_position(entry.position).unwrap();
        assert_eq!(left_node.center(), right_node.center());
        assert_eq!(left_node.size(), right_node.size());
        assert_eq!(left_node.depth(), right_node.depth());
    }
}

// ============================================================================
// Traversal id assignment
// ============================================================================

#[test]
fn test_single_counter_assigns_node_and_child_ids() {
    let root = temp_root("counter");
    let store = open_store(&root);

    IndexStore::new(&store).store_tree(&split_tree()).unwrap();

    let records: Vec<SerializedNode> = store.read_collection(INDEX_COLLECTION).unwrap();
    assert_eq!(records.len(), 9); // root + 8 children

    // Pre-order: records appear in the order the counter visited them
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.id, format!("node_{}", i));
    }

    // Root's child references are exactly the ids the counter assigned
    let root_record = &records[0];
    let child_ids = root_record.child_ids.as_ref().unwrap();
    assert_eq!(child_ids.len(), 8);
    let expected: Vec<String> = (1..=8).map(|i| format!("node_{}", i)).collect();
    assert_eq!(child_ids, &expected);

    // Children are leaves
    for record in &records[1..] {
        assert!(record.child_ids.is_none());
    }

    cleanup(&root);
}

#[test]
fn test_entries_embedded_inline() {
    let root = temp_root("inline");
    let store = open_store(&root);

    IndexStore::new(&store).store_tree(&split_tree()).unwrap();

    let records: Vec<SerializedNode> = store.read_collection(INDEX_COLLECTION).unwrap();
    let total: usize = records.iter().map(|r| r.entries.len()).sum();
    assert_eq!(total, 3);
    assert!(records
        .iter()
        .flat_map(|r| r.entries.iter())
        .any(|e| e.mesh_id == "b" && e.radius == 2.0));

    cleanup(&root);
}

// ============================================================================
// Load / rebuild
// ============================================================================

#[test]
fn test_roundtrip_preserves_geometry_and_entries() {
    let root = temp_root("roundtrip");
    let store = open_store(&root);
    let index = IndexStore::new(&store);

    let config = OctreeConfig { capacity: 1, max_depth: 3 };
    let original = split_tree();
    index.store_tree(&original).unwrap();

    let map = index.load_index().unwrap();
    let rebuilt = index.rebuild_tree(&map, config).unwrap();

    assert_trees_equivalent(&original, &rebuilt);
    assert_eq!(rebuilt.max_depth_reached(), original.max_depth_reached());

    cleanup(&root);
}

#[test]
fn test_roundtrip_of_leaf_only_tree() {
    let root = temp_root("leaf");
    let store = open_store(&root);
    let index = IndexStore::new(&store);

    let config = OctreeConfig::default();
    let mut original = Octree::new(Vec3::new(5.0, 5.0, 5.0), 40.0, config).unwrap();
    original.insert(Entry::new(Vec3::new(1.0, 2.0, 3.0), 1.5, "only"));
    index.store_tree(&original).unwrap();

    let map = index.load_index().unwrap();
    assert_eq!(map.len(), 1);
    let rebuilt = index.rebuild_tree(&map, config).unwrap();
    assert_trees_equivalent(&original, &rebuilt);

    cleanup(&root);
}

#[test]
fn test_load_index_missing_collection_is_not_found() {
    let root = temp_root("missing");
    let store = open_store(&root);

    match IndexStore::new(&store).load_index() {
        Err(crate::error::Error::NotFound(_)) => {}
        other => panic!("expected NotFound, got {:?}", other.map(|m| m.len())),
    }

    cleanup(&root);
}

#[test]
fn test_load_index_empty_collection_is_not_found() {
    let root = temp_root("empty");
    let store = open_store(&root);
    store
        .write_collection::<SerializedNode>(INDEX_COLLECTION, &[])
        .unwrap();

    match IndexStore::new(&store).load_index() {
        Err(crate::error::Error::NotFound(_)) => {}
        other => panic!("expected NotFound, got {:?}", other.map(|m| m.len())),
    }

    cleanup(&root);
}

#[test]
fn test_malformed_record_skipped_on_load() {
    let root = temp_root("malformed");
    let store = open_store(&root);

    let records = vec![
        SerializedNode {
            id: ROOT_NODE_ID.to_string(),
            center: [0.0; 3],
            size: 100.0,
            entries: vec![],
            child_ids: None,
        },
        SerializedNode {
            id: "node_1".to_string(),
            center: [0.0; 3],
            size: 0.0, // malformed
            entries: vec![],
            child_ids: None,
        },
    ];
    store.write_collection(INDEX_COLLECTION, &records).unwrap();

    let map = IndexStore::new(&store).load_index().unwrap();
    assert_eq!(map.len(), 1);
    assert!(map.contains_key(ROOT_NODE_ID));

    cleanup(&root);
}

#[test]
fn test_rebuild_without_root_record_is_not_found() {
    let root = temp_root("noroot");
    let store = open_store(&root);
    let index = IndexStore::new(&store);

    let mut map = FxHashMap::default();
    map.insert(
        "node_7".to_string(),
        SerializedNode {
            id: "node_7".to_string(),
            center: [0.0; 3],
            size: 10.0,
            entries: vec![],
            child_ids: None,
        },
    );

    match index.rebuild_tree(&map, OctreeConfig::default()) {
        Err(crate::error::Error::NotFound(_)) => {}
        other => panic!("expected NotFound, got {:?}", other.map(|t| t.entry_count())),
    }

    cleanup(&root);
}

#[test]
fn test_rebuild_with_unresolved_children_degrades_to_leaf() {
    let root = temp_root("dangling");
    let store = open_store(&root);
    let index = IndexStore::new(&store);

    let mut map = FxHashMap::default();
    map.insert(
        ROOT_NODE_ID.to_string(),
        SerializedNode {
            id: ROOT_NODE_ID.to_string(),
            center: [0.0; 3],
            size: 100.0,
            entries: vec![SerializedEntry {
                position: [1.0, 1.0, 1.0],
                radius: 0.5,
                mesh_id: "kept".to_string(),
            }],
            // References that resolve to nothing
            child_ids: Some((1..=8).map(|i| format!("node_{}", i)).collect()),
        },
    );

    let tree = index.rebuild_tree(&map, OctreeConfig::default()).unwrap();
    assert!(tree.root().is_leaf());
    assert_eq!(tree.entry_count(), 1);

    cleanup(&root);
}
