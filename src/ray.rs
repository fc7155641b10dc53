//! Ray queries against spheres.

use glam::Vec3;

/// A ray defined by origin and direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray. A zero direction falls back to -Z.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or(Vec3::NEG_Z),
        }
    }

    /// Point along the ray at parameter `t`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin.
    pub t: f32,
    /// Index of the body that was hit.
    pub index: usize,
}

/// Distance along `ray` to the first intersection with a sphere, if any.
///
/// A ray starting inside the sphere reports the exit point.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let near = -b - sqrt_d;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + sqrt_d;
    (far >= 0.0).then_some(far)
}

/// Nearest sphere hit by `ray` among `(center, radius)` pairs.
pub fn closest_hit<I>(ray: &Ray, spheres: I) -> Option<RayHit>
where
    I: IntoIterator<Item = (Vec3, f32)>,
{
    spheres
        .into_iter()
        .enumerate()
        .filter_map(|(index, (center, radius))| {
            ray_sphere(ray, center, radius).map(|t| RayHit { t, index })
        })
        .min_by(|a, b| a.t.total_cmp(&b.t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_sphere_hit_and_miss() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = ray_sphere(&ray, Vec3::ZERO, 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-5);

        assert!(ray_sphere(&ray, Vec3::new(3.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_ray_sphere_behind_origin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(ray_sphere(&ray, Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_ray_inside_sphere_exits() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = ray_sphere(&ray, Vec3::ZERO, 2.0).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_closest_hit_picks_nearest() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let spheres = vec![
            (Vec3::new(0.0, 0.0, -2.0), 1.0),
            (Vec3::new(0.0, 0.0, 3.0), 1.0),
            (Vec3::new(5.0, 0.0, 5.0), 1.0),
        ];
        let hit = closest_hit(&ray, spheres).unwrap();
        assert_eq!(hit.index, 1);
        assert!((hit.t - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_direction_falls_back() {
        let ray = Ray::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(ray.direction, Vec3::NEG_Z);
    }
}
