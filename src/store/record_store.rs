/// Versioned record store over per-collection files.
///
/// Each collection is one bincode file under the store root: a small
/// header carrying a magic number and the schema version, followed by the
/// record vector. Opening a store whose on-disk version differs from the
/// configured one wipes ALL collections; this is the deliberate
/// destructive-migration strategy, and it is logged as a data-loss event.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use crate::error::{Error, Result};
use crate::engine_bail;

/// File magic, "MSTREAM1" as a little-endian u64.
const MAGIC: u64 = 0x314d_4145_5254_534d;

/// Per-collection file header, written and checked before the records.
#[derive(Debug, Serialize, Deserialize)]
struct CollectionHeader {
    magic: u64,
    schema_version: u32,
}

/// Store location and schema version.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding one file per collection
    pub root: PathBuf,
    /// Current schema version; a mismatch against disk wipes the store
    pub schema_version: u32,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>, schema_version: u32) -> Self {
        Self {
            root: root.into(),
            schema_version,
        }
    }
}

/// Key/value record store with destructive schema migration.
///
/// # Example
///
/// ```no_run
/// use mesh_stream_engine::meshstream::store::{RecordStore, StoreConfig};
///
/// let store = RecordStore::open(StoreConfig::new("./stream_store", 2))?;
/// store.write_collection("octree_nodes", &["..."])?;
/// let nodes: Vec<String> = store.read_collection("octree_nodes")?;
/// # Ok::<(), mesh_stream_engine::meshstream::Error>(())
/// ```
pub struct RecordStore {
    config: StoreConfig,
}

impl RecordStore {
    /// Open (and if needed create) a store at the configured root.
    ///
    /// Scans existing collection files; if any carries a different magic
    /// or schema version, every collection is deleted before the store is
    /// returned. A version bump during active use is a data-loss event.
    pub fn open(config: StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.root)?;

        let store = Self { config };
        if store.disk_version_mismatch()? {
            crate::engine_warn!(
                "meshstream::RecordStore",
                "Schema version changed to {}; wiping all collections at {}",
                store.config.schema_version,
                store.config.root.display()
            );
            store.wipe_all()?;
        }

        crate::engine_info!(
            "meshstream::RecordStore",
            "Store opened at {} (schema v{})",
            store.config.root.display(),
            store.config.schema_version
        );
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Replace the contents of a collection with `records`.
    pub fn write_collection<T: Serialize>(&self, name: &str, records: &[T]) -> Result<()> {
        let path = self.collection_path(name);
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);

        let header = CollectionHeader {
            magic: MAGIC,
            schema_version: self.config.schema_version,
        };
        bincode::serialize_into(&mut writer, &header)
            .map_err(|e| Error::Codec(format!("writing header of '{}': {}", name, e)))?;
        bincode::serialize_into(&mut writer, records)
            .map_err(|e| Error::Codec(format!("writing records of '{}': {}", name, e)))?;

        crate::engine_debug!(
            "meshstream::RecordStore",
            "Wrote {} records to collection '{}'",
            records.len(),
            name
        );
        Ok(())
    }

    /// Read every record of a collection.
    ///
    /// # Errors
    ///
    /// `NotFound` if the collection file does not exist; `Codec` if the
    /// header or records cannot be decoded; `StructuralError` on magic or
    /// version mismatch (the file was written by an incompatible store).
    pub fn read_collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let path = self.collection_path(name);
        if !path.exists() {
            engine_bail!(NotFound, "meshstream::RecordStore",
                "collection '{}' does not exist at {}", name, path.display());
        }

        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);

        let header: CollectionHeader = bincode::deserialize_from(&mut reader)
            .map_err(|e| Error::Codec(format!("reading header of '{}': {}", name, e)))?;
        if header.magic != MAGIC {
            engine_bail!(StructuralError, "meshstream::RecordStore",
                "collection '{}' has an unrecognized file magic", name);
        }
        if header.schema_version != self.config.schema_version {
            engine_bail!(StructuralError, "meshstream::RecordStore",
                "collection '{}' is schema v{}, expected v{}",
                name, header.schema_version, self.config.schema_version);
        }

        bincode::deserialize_from(&mut reader)
            .map_err(|e| Error::Codec(format!("reading records of '{}': {}", name, e)))
    }

    /// Whether a collection file exists.
    pub fn collection_exists(&self, name: &str) -> bool {
        self.collection_path(name).exists()
    }

    /// Delete one collection. Missing files are not an error.
    pub fn clear_collection(&self, name: &str) -> Result<()> {
        let path = self.collection_path(name);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Delete every collection file under the store root.
    pub fn wipe_all(&self) -> Result<()> {
        for path in self.collection_files()? {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.config.root.join(format!("{}.bin", name))
    }

    fn collection_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for dir_entry in fs::read_dir(&self.config.root)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("bin") {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// True if any existing collection file disagrees with the configured
    /// magic or schema version.
    fn disk_version_mismatch(&self) -> Result<bool> {
        for path in self.collection_files()? {
            if Self::file_needs_wipe(&path, self.config.schema_version) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn file_needs_wipe(path: &Path, expected_version: u32) -> bool {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => return true,
        };
        let mut reader = BufReader::new(file);
        match bincode::deserialize_from::<_, CollectionHeader>(&mut reader) {
            Ok(header) => header.magic != MAGIC || header.schema_version != expected_version,
            Err(_) => true,
        }
    }
}

#[cfg(test)]
#[path = "record_store_tests.rs"]
mod tests;
