/// Live scene and the streaming machinery around it.
///
/// The Scene holds attached mesh instances behind stable keys. The
/// classifier partitions known mesh ids into hit/unhit sets from camera
/// state, and the StreamingManager reconciles that partition against the
/// ResidencySet, attaching and detaching through the SceneHost seam.

pub mod scene;
pub mod visibility;
pub mod streaming;
pub mod trigger;

pub use scene::{Scene, SceneHost, SceneInstance, SceneInstanceKey};
pub use visibility::{
    AllVisibleClassifier, RayFanClassifier, VisibilityClassifier, VisibilitySnapshot,
};
pub use streaming::{
    MeshLookup, ReconcileReport, ResidencySet, StreamingCounters, StreamingManager,
};
pub use trigger::DebouncedTrigger;
