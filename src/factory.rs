//! Body factory: initial placement and randomized body parameters.
//!
//! Placement is rejection sampling. Each body gets a fixed number of tries
//! inside a shrunken, front-biased part of the box; a try is rejected if the
//! new center is closer to any placed center than the summed radii times the
//! separation factor. When every try fails the body is dropped anywhere in
//! the full box and may overlap; the solver pushes it apart on the first
//! step. Placement is O(n²) but runs once per resize, never per frame.

use glam::Vec3;
use rand::Rng;

use crate::body::{Material, RigidBody};
use crate::config::Config;
use crate::viewport::WorldExtents;

/// Where a new body ended up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    /// `true` if no non-overlapping slot was found.
    pub fallback: bool,
}

/// A freshly created body plus its base color.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnedBody {
    pub body: RigidBody,
    pub color: Vec3,
    pub fallback: bool,
}

/// Creates bodies that fit inside a given volume.
#[derive(Clone, Debug)]
pub struct BodyFactory {
    half_extents: Vec3,
    min_size: f32,
    max_size: f32,
    initial_speed: f32,
    separation_factor: f32,
    attempts: u32,
    shrink: f32,
    linear_damping: f32,
    angular_damping: f32,
    material: Material,
}

impl BodyFactory {
    pub fn new(config: &Config, extents: WorldExtents) -> Self {
        Self {
            half_extents: extents.half(),
            min_size: config.min_size,
            max_size: config.max_size,
            initial_speed: config.initial_speed,
            separation_factor: config.separation_factor,
            attempts: config.placement_attempts,
            shrink: config.placement_shrink,
            linear_damping: config.linear_damping,
            angular_damping: config.angular_damping,
            material: Material {
                restitution: config.restitution,
                friction: config.friction,
            },
        }
    }

    /// Create `count` bodies, each placed against all earlier ones.
    pub fn populate<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<SpawnedBody> {
        let mut placed: Vec<RigidBody> = Vec::with_capacity(count);
        let mut spawned = Vec::with_capacity(count);
        let mut fallbacks = 0;

        for _ in 0..count {
            let next = self.spawn(&placed, rng);
            if next.fallback {
                fallbacks += 1;
            }
            placed.push(next.body.clone());
            spawned.push(next);
        }

        if fallbacks > 0 {
            log::debug!(
                "{} of {} bodies used fallback placement and may overlap",
                fallbacks,
                count
            );
        }
        spawned
    }

    /// Create one body that avoids `existing` if it can.
    pub fn spawn<R: Rng + ?Sized>(&self, existing: &[RigidBody], rng: &mut R) -> SpawnedBody {
        let radius = uniform(rng, self.min_size, self.max_size);
        let placement = self.place(radius, existing, rng);
        let velocity = Vec3::new(
            uniform(rng, -self.initial_speed, self.initial_speed),
            uniform(rng, -self.initial_speed, self.initial_speed),
            uniform(rng, -self.initial_speed, self.initial_speed),
        );

        let body = RigidBody::new(placement.position, radius)
            .with_velocity(velocity)
            .with_damping(self.linear_damping, self.angular_damping)
            .with_material(self.material);

        SpawnedBody {
            body,
            color: random_hue(rng, 0.55, 0.95),
            fallback: placement.fallback,
        }
    }

    /// Find a position for a sphere of `radius`.
    pub fn place<R: Rng + ?Sized>(
        &self,
        radius: f32,
        existing: &[RigidBody],
        rng: &mut R,
    ) -> Placement {
        let limit = (self.half_extents - Vec3::splat(radius)).max(Vec3::ZERO);
        let inner = limit * self.shrink;

        for _ in 0..self.attempts {
            // Front-biased: more room toward the camera (+Z) than behind.
            let candidate = Vec3::new(
                uniform(rng, -inner.x, inner.x),
                uniform(rng, -inner.y, inner.y),
                uniform(rng, -inner.z * 0.5, inner.z),
            );
            if self.is_clear(candidate, radius, existing) {
                return Placement {
                    position: candidate,
                    fallback: false,
                };
            }
        }

        Placement {
            position: Vec3::new(
                uniform(rng, -limit.x, limit.x),
                uniform(rng, -limit.y, limit.y),
                uniform(rng, -limit.z, limit.z),
            ),
            fallback: true,
        }
    }

    fn is_clear(&self, candidate: Vec3, radius: f32, existing: &[RigidBody]) -> bool {
        existing.iter().all(|other| {
            let min_distance = (radius + other.radius) * self.separation_factor;
            candidate.distance_squared(other.position) >= min_distance * min_distance
        })
    }
}

/// Adds bodies one at a time every few frames until a target is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagedSpawn {
    target: usize,
    interval: u32,
    frames: u32,
}

impl StagedSpawn {
    pub fn new(target: usize, interval: u32) -> Self {
        Self {
            target,
            interval: interval.max(1),
            frames: 0,
        }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Advance one frame. Returns `true` if a body should be added now.
    pub fn tick(&mut self, current: usize) -> bool {
        if current >= self.target {
            return false;
        }
        self.frames += 1;
        if self.frames >= self.interval {
            self.frames = 0;
            true
        } else {
            false
        }
    }

    pub fn is_complete(&self, current: usize) -> bool {
        current >= self.target
    }
}

/// Uniform sample in `[lo, hi)`, or `lo` for an empty range.
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Random color with given saturation and value (HSV model).
fn random_hue<R: Rng + ?Sized>(rng: &mut R, saturation: f32, value: f32) -> Vec3 {
    hsv_to_rgb(rng.gen::<f32>(), saturation, value)
}

/// Convert HSV to RGB.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}
