/// Dense ray-direction grid around a forward axis.
///
/// The fan approximates a forward visibility cone: an evenly-stepped grid
/// of directions spanning an elevation range (phi) and an azimuth range
/// (theta) around the forward axis. It is a sampling heuristic, not a
/// frustum, so boxes can slip between angularly-adjacent rays.

use glam::{Quat, Vec3};
use std::f32::consts::PI;
use crate::error::Result;
use crate::engine_bail;

/// Ray fan geometry and reach.
///
/// Defaults: 144 degree elevation and azimuth ranges sampled every
/// 3 degrees, clipped at 1000 world units.
#[derive(Debug, Clone, Copy)]
pub struct RayFanConfig {
    /// Full vertical (phi) span in radians, centered on forward
    pub elevation_range: f32,
    /// Full horizontal (theta) span in radians, centered on forward
    pub azimuth_range: f32,
    /// Angular step between adjacent samples, radians
    pub angle_step: f32,
    /// Max ray reach in world units
    pub far_distance: f32,
}

impl Default for RayFanConfig {
    fn default() -> Self {
        Self {
            elevation_range: PI * 0.8,
            azimuth_range: PI * 0.8,
            angle_step: PI / 60.0,
            far_distance: 1000.0,
        }
    }
}

impl RayFanConfig {
    /// Generate the direction grid, rotated so the fan's central axis is
    /// `forward`.
    ///
    /// The grid is built around a -Z base axis (phi = theta = 0 maps to
    /// -Z) and then rotated onto `forward` by the shortest arc. Both range
    /// endpoints are included.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the step or far distance is not
    /// positive, a range is negative, or `forward` has zero length.
    pub fn directions(&self, forward: Vec3) -> Result<Vec<Vec3>> {
        if !(self.angle_step > 0.0) {
            engine_bail!(InvalidConfig, "meshstream::RayFan",
                "angle_step must be positive, got {}", self.angle_step);
        }
        if !(self.far_distance > 0.0) {
            engine_bail!(InvalidConfig, "meshstream::RayFan",
                "far_distance must be positive, got {}", self.far_distance);
        }
        if self.elevation_range < 0.0 || self.azimuth_range < 0.0 {
            engine_bail!(InvalidConfig, "meshstream::RayFan", "ranges must be non-negative");
        }
        let forward = forward.normalize_or_zero();
        if forward == Vec3::ZERO {
            engine_bail!(InvalidConfig, "meshstream::RayFan", "forward axis has zero length");
        }

        let rotation = Quat::from_rotation_arc(Vec3::NEG_Z, forward);

        // Count matches a `phi <= range/2` sweep; the epsilon keeps exact
        // multiples of the step from losing the endpoint to rounding
        let phi_steps = (self.elevation_range / self.angle_step + 1e-4).floor() as i32;
        let theta_steps = (self.azimuth_range / self.angle_step + 1e-4).floor() as i32;
        let phi_half = self.elevation_range * 0.5;
        let theta_half = self.azimuth_range * 0.5;

        let mut directions =
            Vec::with_capacity(((phi_steps + 1) * (theta_steps + 1)) as usize);
        for pi_idx in 0..=phi_steps {
            let phi = -phi_half + pi_idx as f32 * self.angle_step;
            let (sin_phi, cos_phi) = phi.sin_cos();
            for ti_idx in 0..=theta_steps {
                let theta = -theta_half + ti_idx as f32 * self.angle_step;
                let base = Vec3::new(
                    sin_phi * theta.cos(),
                    sin_phi * theta.sin(),
                    -cos_phi,
                )
                .normalize();
                directions.push(rotation * base);
            }
        }

        Ok(directions)
    }
}

#[cfg(test)]
#[path = "ray_fan_tests.rs"]
mod tests;
