/// Camera-side primitives for the visibility classifier.
///
/// A Ray with a slab-method box intersection test, and the RayFanConfig
/// describing the dense direction grid cast around the camera's forward
/// axis.

pub mod ray;
pub mod ray_fan;

pub use ray::Ray;
pub use ray_fan::RayFanConfig;
