//! Viewport geometry: turn a render surface and a camera into world extents.
//!
//! The box the bodies live in is sized from what the camera can see at its
//! target plane, so the spheres always fill the window regardless of its
//! shape.

use glam::Vec3;

use crate::camera::Camera;

/// Render surface size in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. A zero-sized surface reports 1.0.
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// True if either dimension is zero (minimized window).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Full world-space size of the simulation volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldExtents {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl WorldExtents {
    /// Half-extents along x, y and z.
    pub fn half(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth) * 0.5
    }
}

/// Visible `(width, height)` of the plane `distance` units in front of a
/// camera with vertical field of view `fov_y`.
pub fn visible_size(fov_y: f32, distance: f32, aspect: f32) -> (f32, f32) {
    let height = 2.0 * (fov_y * 0.5).tan() * distance;
    (height * aspect, height)
}

/// Resolve the simulation volume for a viewport and camera.
///
/// Depth has no independent source, so it is `depth_fraction` of the smaller
/// of width and height.
pub fn resolve(viewport: ViewportSize, camera: &Camera, depth_fraction: f32) -> WorldExtents {
    let (width, height) = visible_size(camera.fov_y, camera.distance, viewport.aspect());
    WorldExtents {
        width,
        height,
        depth: width.min(height) * depth_fraction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_size_formula() {
        let fov = 90.0_f32.to_radians();
        let (w, h) = visible_size(fov, 10.0, 2.0);
        // tan(45°) = 1, so height = 2 * 10
        assert!((h - 20.0).abs() < 1e-4);
        assert!((w - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_resolve_depth_from_smaller_side() {
        let camera = Camera::new().with_fov_degrees(90.0).with_distance(10.0);
        let extents = resolve(ViewportSize::new(1600, 800), &camera, 0.3);
        assert!((extents.height - 20.0).abs() < 1e-4);
        assert!((extents.width - 40.0).abs() < 1e-4);
        assert!((extents.depth - 6.0).abs() < 1e-4);

        let tall = resolve(ViewportSize::new(800, 1600), &camera, 0.3);
        assert!((tall.depth - tall.width * 0.3).abs() < 1e-4);
    }

    #[test]
    fn test_zero_sized_viewport_is_square() {
        let size = ViewportSize::new(0, 0);
        assert!(size.is_empty());
        assert_eq!(size.aspect(), 1.0);
        let extents = resolve(size, &Camera::new(), 0.3);
        assert!(extents.width.is_finite());
        assert!((extents.width - extents.height).abs() < 1e-5);
    }

    #[test]
    fn test_half_extents() {
        let extents = WorldExtents {
            width: 4.0,
            height: 2.0,
            depth: 1.0,
        };
        assert_eq!(extents.half(), Vec3::new(2.0, 1.0, 0.5));
    }
}
