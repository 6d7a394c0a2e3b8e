/// Streaming lifecycle reconciliation.
///
/// The StreamingManager diffs a VisibilitySnapshot against the
/// ResidencySet and mutates scene residency through the SceneHost seam:
/// unhit residents are detached, hit non-residents are resolved through
/// the MeshLookup and attached. A hit id with no mesh record is a
/// non-fatal diagnostic, never an abort.

use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::Result;
use crate::store::DecodedMesh;
use super::scene::SceneHost;
use super::visibility::VisibilitySnapshot;

/// Set of mesh ids currently attached to the live scene.
///
/// Mutated exclusively by the StreamingManager. Empty at startup; cleared
/// on scene teardown.
#[derive(Debug, Clone, Default)]
pub struct ResidencySet {
    ids: FxHashSet<String>,
}

impl ResidencySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, mesh_id: &str) -> bool {
        self.ids.contains(mesh_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.ids.iter()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    fn insert(&mut self, mesh_id: String) {
        self.ids.insert(mesh_id);
    }

    fn remove(&mut self, mesh_id: &str) -> bool {
        self.ids.remove(mesh_id)
    }
}

/// Source of mesh payload for attachment.
pub trait MeshLookup {
    /// Resolve a mesh by id. None is a recoverable miss, not an error.
    fn mesh(&self, mesh_id: &str) -> Option<&DecodedMesh>;
}

impl MeshLookup for FxHashMap<String, DecodedMesh> {
    fn mesh(&self, mesh_id: &str) -> Option<&DecodedMesh> {
        self.get(mesh_id)
    }
}

/// What one reconcile pass changed.
///
/// Both lists are sorted so reports are deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub attached: Vec<String>,
    pub detached: Vec<String>,
}

/// Observability counters, updated once per reconcile pass.
///
/// These are for display only; correctness never depends on them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StreamingCounters {
    /// Hit ids in the last snapshot
    pub hit: usize,
    /// Unhit ids in the last snapshot
    pub unhit: usize,
    /// Ids newly attached by the last pass
    pub attached: usize,
    /// Ids newly detached by the last pass
    pub detached: usize,
    /// Current resident count after the last pass
    pub resident: usize,
    /// Hit ids the lookup could not resolve in the last pass
    pub lookup_misses: usize,
}

/// Reconciles visibility snapshots against scene residency.
///
/// # Example
///
/// ```no_run
/// use mesh_stream_engine::meshstream::scene::{
///     ResidencySet, Scene, StreamingManager,
/// };
/// # use mesh_stream_engine::meshstream::scene::VisibilitySnapshot;
/// # use mesh_stream_engine::meshstream::store::DecodedMesh;
/// # use rustc_hash::FxHashMap;
///
/// let mut manager = StreamingManager::new();
/// let mut residency = ResidencySet::new();
/// let mut scene = Scene::new();
/// # let snapshot = VisibilitySnapshot::default();
/// # let lookup: FxHashMap<String, DecodedMesh> = FxHashMap::default();
/// let report = manager.reconcile(&snapshot, &mut residency, &lookup, &mut scene)?;
/// # Ok::<(), mesh_stream_engine::meshstream::Error>(())
/// ```
pub struct StreamingManager {
    counters: StreamingCounters,
}

impl StreamingManager {
    pub fn new() -> Self {
        Self {
            counters: StreamingCounters::default(),
        }
    }

    /// Counters from the most recent pass.
    pub fn counters(&self) -> StreamingCounters {
        self.counters
    }

    /// Apply one snapshot to the scene.
    ///
    /// Idempotent: running the same snapshot twice against unchanged
    /// residency yields an empty report the second time. A host failure on
    /// one id is logged and skipped; the pass continues with the rest.
    pub fn reconcile(
        &mut self,
        snapshot: &VisibilitySnapshot,
        residency: &mut ResidencySet,
        lookup: &dyn MeshLookup,
        host: &mut dyn SceneHost,
    ) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();
        let mut lookup_misses = 0usize;

        // Sorted passes keep attach/detach order and reports deterministic
        let mut to_detach: Vec<&String> = snapshot
            .unhit_ids
            .iter()
            .filter(|id| residency.contains(id))
            .collect();
        to_detach.sort();

        for mesh_id in to_detach {
            match host.detach(mesh_id) {
                Ok(()) => {
                    residency.remove(mesh_id);
                    report.detached.push(mesh_id.clone());
                }
                Err(err) => {
                    crate::engine_warn!(
                        "meshstream::StreamingManager",
                        "Detach of '{}' failed, leaving it resident: {}",
                        mesh_id,
                        err
                    );
                }
            }
        }

        let mut to_attach: Vec<&String> = snapshot
            .hit_ids
            .iter()
            .filter(|id| !residency.contains(id))
            .collect();
        to_attach.sort();

        for mesh_id in to_attach {
            let mesh = match lookup.mesh(mesh_id) {
                Some(mesh) => mesh,
                None => {
                    lookup_misses += 1;
                    crate::engine_warn!(
                        "meshstream::StreamingManager",
                        "Hit id '{}' has no mesh record; skipping",
                        mesh_id
                    );
                    continue;
                }
            };
            match host.attach(mesh) {
                Ok(()) => {
                    residency.insert(mesh_id.clone());
                    report.attached.push(mesh_id.clone());
                }
                Err(err) => {
                    crate::engine_warn!(
                        "meshstream::StreamingManager",
                        "Attach of '{}' failed, skipping: {}",
                        mesh_id,
                        err
                    );
                }
            }
        }

        self.counters = StreamingCounters {
            hit: snapshot.hit_count(),
            unhit: snapshot.unhit_count(),
            attached: report.attached.len(),
            detached: report.detached.len(),
            resident: residency.len(),
            lookup_misses,
        };

        crate::engine_debug!(
            "meshstream::StreamingManager",
            "Reconciled: {} attached, {} detached, {} resident, {} lookup misses",
            self.counters.attached,
            self.counters.detached,
            self.counters.resident,
            self.counters.lookup_misses
        );
        Ok(report)
    }
}

impl Default for StreamingManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "streaming_tests.rs"]
mod tests;
