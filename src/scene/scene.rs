/// Scene: the set of currently attached mesh instances.
///
/// Uses a SlotMap for O(1) attach/detach with stable keys, plus a mesh-id
/// index for the id-keyed operations the streaming manager performs.
/// The caller creates and owns the Scene and passes it to the
/// StreamingManager as a SceneHost; there is no global scene.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::engine_bail;
use crate::store::{DecodedMesh, GeometryKind, MaterialKind, Transform};

new_key_type! {
    /// Stable key of an attached SceneInstance.
    pub struct SceneInstanceKey;
}

/// One attached mesh instance.
#[derive(Debug, Clone)]
pub struct SceneInstance {
    mesh_id: String,
    name: String,
    geometry: GeometryKind,
    material: MaterialKind,
    transform: Transform,
}

impl SceneInstance {
    pub fn mesh_id(&self) -> &str {
        &self.mesh_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &GeometryKind {
        &self.geometry
    }

    pub fn material(&self) -> MaterialKind {
        self.material
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}

/// Seam through which the streaming manager mutates scene residency.
///
/// The Scene below is the default implementation; hosts embedding this
/// engine in a renderer implement it to create/destroy real scene objects.
pub trait SceneHost {
    /// Attach a mesh instance. Called at most once per resident id.
    fn attach(&mut self, mesh: &DecodedMesh) -> Result<()>;

    /// Detach the instance for `mesh_id`. Called only for resident ids.
    fn detach(&mut self, mesh_id: &str) -> Result<()>;
}

/// Default live scene.
///
/// # Example
///
/// ```no_run
/// use mesh_stream_engine::meshstream::scene::Scene;
///
/// let mut scene = Scene::new();
/// assert_eq!(scene.instance_count(), 0);
/// ```
pub struct Scene {
    instances: SlotMap<SceneInstanceKey, SceneInstance>,
    by_mesh_id: FxHashMap<String, SceneInstanceKey>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            instances: SlotMap::with_key(),
            by_mesh_id: FxHashMap::default(),
        }
    }

    /// Get an instance by key.
    pub fn instance(&self, key: SceneInstanceKey) -> Option<&SceneInstance> {
        self.instances.get(key)
    }

    /// Key of the instance attached for `mesh_id`, if resident.
    pub fn key_for(&self, mesh_id: &str) -> Option<SceneInstanceKey> {
        self.by_mesh_id.get(mesh_id).copied()
    }

    pub fn contains(&self, mesh_id: &str) -> bool {
        self.by_mesh_id.contains_key(mesh_id)
    }

    /// Iterate over all attached instances (key, instance).
    pub fn instances(
        &self,
    ) -> impl Iterator<Item = (SceneInstanceKey, &SceneInstance)> {
        self.instances.iter()
    }

    /// Number of attached instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Detach everything.
    pub fn clear(&mut self) {
        self.instances.clear();
        self.by_mesh_id.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneHost for Scene {
    fn attach(&mut self, mesh: &DecodedMesh) -> Result<()> {
        if self.by_mesh_id.contains_key(&mesh.id) {
            engine_bail!(StructuralError, "meshstream::Scene",
                "mesh '{}' is already attached", mesh.id);
        }
        let key = self.instances.insert(SceneInstance {
            mesh_id: mesh.id.clone(),
            name: mesh.name.clone(),
            geometry: mesh.geometry.clone(),
            material: mesh.material,
            transform: mesh.transform,
        });
        self.by_mesh_id.insert(mesh.id.clone(), key);
        Ok(())
    }

    fn detach(&mut self, mesh_id: &str) -> Result<()> {
        match self.by_mesh_id.remove(mesh_id) {
            Some(key) => {
                self.instances.remove(key);
                Ok(())
            }
            None => engine_bail!(NotFound, "meshstream::Scene",
                "mesh '{}' is not attached", mesh_id),
        }
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
