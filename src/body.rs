//! Rigid sphere state and the box that contains it.

use glam::{Quat, Vec3};

/// Surface response of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Fraction of closing speed returned after a contact.
    pub restitution: f32,
    /// Fraction of tangential speed lost on wall contact.
    pub friction: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 0.8,
            friction: 0.05,
        }
    }
}

/// A dynamic sphere simulated by the [`PhysicsWorld`](crate::world::PhysicsWorld).
///
/// Bodies are addressed by their index in the world; the index never changes
/// for the lifetime of a body.
#[derive(Clone, Debug, PartialEq)]
pub struct RigidBody {
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub radius: f32,
    /// Per-step multiplier on linear velocity.
    pub linear_damping: f32,
    /// Per-step multiplier on angular velocity.
    pub angular_damping: f32,
    pub material: Material,
}

impl RigidBody {
    /// Create a resting sphere with mass derived from its size.
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: mass_for_size(radius),
            radius,
            linear_damping: 1.0,
            angular_damping: 1.0,
            material: Material::default(),
        }
    }

    /// Builder: set initial linear velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Builder: override the mass.
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Builder: set linear and angular damping multipliers.
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Builder: set the surface material.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.linear_velocity.length()
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.linear_velocity.length_squared()
    }

    /// Add an impulse, changing velocity by `impulse / mass`.
    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.linear_velocity += impulse * self.inverse_mass();
    }

    /// Scale velocity down uniformly so its magnitude is at most `max_speed`.
    ///
    /// Returns `true` if the velocity was clamped.
    pub fn clamp_speed(&mut self, max_speed: f32) -> bool {
        let speed_sq = self.linear_velocity.length_squared();
        if speed_sq > max_speed * max_speed {
            self.linear_velocity *= max_speed / speed_sq.sqrt();
            true
        } else {
            false
        }
    }
}

/// Mass proxy for a sphere of the given size (roughly its volume).
#[inline]
pub fn mass_for_size(size: f32) -> f32 {
    size * size * size
}

/// Which wall of the box a body touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wall {
    MinX,
    MaxX,
    MinY,
    MaxY,
    MinZ,
    MaxZ,
}

/// Six inward-facing planes forming a box centered at the origin.
///
/// Rebuilt, never mutated, whenever the viewport changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticBoundary {
    half_extents: Vec3,
}

impl StaticBoundary {
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents: half_extents.max(Vec3::ZERO),
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// Largest center offset per axis for a sphere of `radius`.
    ///
    /// A sphere larger than the box is pinned to the center on that axis.
    #[inline]
    pub fn limits_for(&self, radius: f32) -> Vec3 {
        (self.half_extents - Vec3::splat(radius)).max(Vec3::ZERO)
    }

    /// Inward-facing normal of a wall.
    pub fn normal(wall: Wall) -> Vec3 {
        match wall {
            Wall::MinX => Vec3::X,
            Wall::MaxX => Vec3::NEG_X,
            Wall::MinY => Vec3::Y,
            Wall::MaxY => Vec3::NEG_Y,
            Wall::MinZ => Vec3::Z,
            Wall::MaxZ => Vec3::NEG_Z,
        }
    }
}
