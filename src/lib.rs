/*!
# MeshStream Engine

Spatial index + visibility-driven mesh streaming.

Mesh instances are indexed in a bounded-depth octree, persisted to a
versioned record store alongside their mesh payload, classified as
candidate-visible or not by a ray-fan sampling heuristic, and streamed
in and out of the live scene by a reconciliation pass over the residency
set.

## Architecture

- **Octree**: depth-bounded spatial index over point-radius entries
- **RecordStore / IndexStore / MeshStore**: persistence with destructive
  schema migration
- **VisibilityClassifier**: hit/unhit partition from camera state
- **StreamingManager**: attach/detach reconciliation through the
  SceneHost seam
- **DebouncedTrigger**: coalesces movement bursts into one trailing pass
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod spatial;
pub mod camera;
pub mod store;
pub mod scene;

// Main meshstream namespace module
pub mod meshstream {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine facade (global logger)
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: engine_* macros are NOT re-exported here - they are internal only
    }

    // Spatial sub-module
    pub mod spatial {
        pub use crate::spatial::*;
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Store sub-module
    pub mod store {
        pub use crate::store::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
