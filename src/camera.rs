//! Perspective camera looking into the body box.

use glam::{Mat4, Vec2, Vec3};

use crate::ray::Ray;

/// Orbit camera used both for rendering and for pointer raycasts.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
}

impl Camera {
    /// Create a camera looking straight down -Z at the origin.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 20.0,
            target: Vec3::ZERO,
            fov_y: 50.0_f32.to_radians(),
            near: 0.1,
            far: 200.0,
        }
    }

    /// Set the distance from the target.
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.fov_y = degrees.to_radians();
        self
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Perspective projection for the given aspect ratio.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(f32::EPSILON), self.near, self.far)
    }

    /// Combined view-projection matrix.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view_matrix()
    }

    /// Camera basis vectors `(right, up)` in world space.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.position()).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        (right, up)
    }

    /// Ray through a point given in normalized device coordinates.
    ///
    /// NDC has its origin at the screen center, X to the right and Y up.
    pub fn ray_from_ndc(&self, ndc: Vec2, aspect: f32) -> Ray {
        let inverse = self.view_proj(aspect).inverse();
        let far_point = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let origin = self.position();
        Ray::new(origin, far_point - origin)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a pixel position to normalized device coordinates.
///
/// Y is flipped so that the top of the window maps to +1.
pub fn screen_to_ndc(position: Vec2, width: u32, height: u32) -> Vec2 {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    Vec2::new((position.x / w) * 2.0 - 1.0, 1.0 - (position.y / h) * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_position_on_z_axis() {
        let camera = Camera::new();
        let pos = camera.position();
        assert!(pos.x.abs() < 1e-5);
        assert!(pos.y.abs() < 1e-5);
        assert!((pos.z - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_screen_to_ndc_center_and_corners() {
        let center = screen_to_ndc(Vec2::new(400.0, 300.0), 800, 600);
        assert!(center.length() < 1e-5);

        let top_left = screen_to_ndc(Vec2::new(0.0, 0.0), 800, 600);
        assert!((top_left.x + 1.0).abs() < 1e-5);
        assert!((top_left.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::new();
        let ray = camera.ray_from_ndc(Vec2::ZERO, 1.5);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        assert!((ray.origin - camera.position()).length() < 1e-5);
    }

    #[test]
    fn test_edge_ray_hits_visible_height() {
        // A ray through the top edge of the screen crosses the target plane
        // at half the visible height.
        let camera = Camera::new();
        let ray = camera.ray_from_ndc(Vec2::new(0.0, 1.0), 1.0);
        let t = camera.distance / -ray.direction.z;
        let hit = ray.at(t);
        let expected = (camera.fov_y * 0.5).tan() * camera.distance;
        assert!((hit.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let mut camera = Camera::new();
        camera.yaw = 0.4;
        camera.pitch = 0.2;
        let (right, up) = camera.basis();
        assert!((right.length() - 1.0).abs() < 1e-5);
        assert!((up.length() - 1.0).abs() < 1e-5);
        assert!(right.dot(up).abs() < 1e-5);
    }
}
