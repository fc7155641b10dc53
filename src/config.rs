//! Tunable parameters for a visualization.
//!
//! Every knob the host can turn lives on [`Config`]. All values are plain
//! numbers with defaults chosen for a camera roughly 20 units away from a
//! full-window viewport.
//!
//! # Example
//!
//! ```ignore
//! use bauble::prelude::*;
//!
//! let config = Config::default()
//!     .with_body_count(BodyCount::Grid { x: 6, y: 4, z: 2 })
//!     .with_size_range(0.4, 0.9)
//!     .with_gravity(Vec3::new(0.0, -4.0, 0.0))
//!     .with_restitution(0.7)
//!     .with_seed(7);
//! config.validate()?;
//! ```

use glam::Vec3;

use crate::error::ConfigError;

/// How many bodies to create.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyCount {
    /// A grid-shaped target count (`x * y * z` bodies).
    Grid { x: u32, y: u32, z: u32 },
    /// A flat number of bodies.
    Flat(u32),
}

impl BodyCount {
    /// Total number of bodies this count describes.
    pub fn total(&self) -> usize {
        match *self {
            BodyCount::Grid { x, y, z } => x as usize * y as usize * z as usize,
            BodyCount::Flat(n) => n as usize,
        }
    }
}

impl Default for BodyCount {
    fn default() -> Self {
        BodyCount::Grid { x: 7, y: 4, z: 2 }
    }
}

/// Parameters for the whole visualization.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    // ========== Bodies ==========
    /// Target number of bodies.
    pub body_count: BodyCount,
    /// Smallest body radius.
    pub min_size: f32,
    /// Largest body radius.
    pub max_size: f32,
    /// Largest initial speed along each axis.
    pub initial_speed: f32,
    /// Minimum center distance, as a multiple of the summed radii.
    pub separation_factor: f32,
    /// Random placement attempts per body before falling back.
    pub placement_attempts: u32,
    /// Fraction of the volume used for the first placement attempts.
    pub placement_shrink: f32,
    /// Add one body every `k` frames instead of all at once.
    pub spawn_interval: Option<u32>,

    // ========== Physics ==========
    /// Gravity acceleration.
    pub gravity: Vec3,
    /// Per-step multiplier on linear velocity (1.0 = no damping).
    pub linear_damping: f32,
    /// Per-step multiplier on angular velocity (1.0 = no damping).
    pub angular_damping: f32,
    /// Below this speed damping is skipped and idle jitter may kick in.
    pub min_speed: f32,
    /// Chance per step that a slow body gets a random nudge.
    pub jitter_probability: f32,
    /// Magnitude of the idle nudge.
    pub jitter_strength: f32,
    /// Bounciness of walls and body contacts, in (0, 1].
    pub restitution: f32,
    /// Share of tangential velocity lost on wall contact, in [0, 1].
    pub friction: f32,
    /// Velocity magnitude cap.
    pub max_speed: f32,
    /// Fixed simulation step in seconds.
    pub fixed_timestep: f32,
    /// Maximum fixed steps per frame.
    pub max_substeps: u32,

    // ========== Interaction ==========
    /// Radius around the touched body that receives chain impulses.
    pub interaction_radius: f32,
    /// Impulse applied to the touched body.
    pub impulse_strength: f32,
    /// Chain impulse strength relative to `impulse_strength`.
    pub chain_factor: f32,
    /// Impulse scale applied on each drag move.
    pub drag_impulse_scale: f32,

    // ========== Highlight ==========
    /// Emissive intensity of a highlighted body.
    pub highlight_peak: f32,
    /// Seconds for a highlight to fade back to the base intensity.
    pub highlight_decay: f32,
    /// Emissive intensity of a body at rest.
    pub base_emissive: f32,

    // ========== Viewport ==========
    /// Depth of the box as a fraction of the smaller visible extent.
    pub depth_fraction: f32,

    /// Seed for the per-visualization random generator.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            body_count: BodyCount::default(),
            min_size: 0.45,
            max_size: 1.0,
            initial_speed: 2.0,
            separation_factor: 2.0,
            placement_attempts: 50,
            placement_shrink: 0.8,
            spawn_interval: None,

            gravity: Vec3::new(0.0, -3.0, 0.0),
            linear_damping: 0.995,
            angular_damping: 0.99,
            min_speed: 0.15,
            jitter_probability: 0.02,
            jitter_strength: 1.5,
            restitution: 0.8,
            friction: 0.05,
            max_speed: 14.0,
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 3,

            interaction_radius: 4.0,
            impulse_strength: 6.0,
            chain_factor: 0.35,
            drag_impulse_scale: 0.25,

            highlight_peak: 2.5,
            highlight_decay: 0.6,
            base_emissive: 0.05,

            depth_fraction: 0.3,

            seed: 0x5eed_ba11,
        }
    }
}

impl Config {
    /// Set the target body count.
    pub fn with_body_count(mut self, count: BodyCount) -> Self {
        self.body_count = count;
        self
    }

    /// Set the radius range bodies are drawn from.
    pub fn with_size_range(mut self, min: f32, max: f32) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set linear and angular damping multipliers.
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Set restitution for walls and contacts.
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set wall friction.
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Set the velocity cap.
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Set the chain-reaction radius and the primary impulse strength.
    pub fn with_interaction(mut self, radius: f32, strength: f32) -> Self {
        self.interaction_radius = radius;
        self.impulse_strength = strength;
        self
    }

    /// Set highlight peak intensity and decay duration in seconds.
    pub fn with_highlight(mut self, peak: f32, decay: f32) -> Self {
        self.highlight_peak = peak;
        self.highlight_decay = decay;
        self
    }

    /// Spawn one body every `frames` frames.
    pub fn with_staged_spawn(mut self, frames: u32) -> Self {
        self.spawn_interval = Some(frames);
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("min_size", self.min_size)?;
        check_positive("max_size", self.max_size)?;
        if self.min_size > self.max_size {
            return Err(ConfigError::InvertedSizeRange {
                min: self.min_size,
                max: self.max_size,
            });
        }
        check_unit("restitution", self.restitution, false)?;
        check_unit("linear_damping", self.linear_damping, false)?;
        check_unit("angular_damping", self.angular_damping, false)?;
        check_unit("friction", self.friction, true)?;
        check_unit("jitter_probability", self.jitter_probability, true)?;
        check_positive("fixed_timestep", self.fixed_timestep)?;
        check_positive("max_speed", self.max_speed)?;
        check_positive("depth_fraction", self.depth_fraction)?;
        check_positive("separation_factor", self.separation_factor)?;
        check_unit("placement_shrink", self.placement_shrink, false)?;
        check_non_negative("initial_speed", self.initial_speed)?;
        check_non_negative("min_speed", self.min_speed)?;
        check_non_negative("jitter_strength", self.jitter_strength)?;
        check_non_negative("interaction_radius", self.interaction_radius)?;
        check_non_negative("impulse_strength", self.impulse_strength)?;
        check_non_negative("chain_factor", self.chain_factor)?;
        check_non_negative("drag_impulse_scale", self.drag_impulse_scale)?;
        check_non_negative("highlight_peak", self.highlight_peak)?;
        check_non_negative("highlight_decay", self.highlight_decay)?;
        check_non_negative("base_emissive", self.base_emissive)?;
        if !self.gravity.is_finite() {
            return Err(ConfigError::NotFinite { name: "gravity" });
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::ZeroCount { name: "max_substeps" });
        }
        if self.spawn_interval == Some(0) {
            return Err(ConfigError::ZeroCount { name: "spawn_interval" });
        }
        Ok(())
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name })
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    check_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn check_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    check_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

/// `value` must lie in (0, 1], or [0, 1] when `allow_zero` is set.
fn check_unit(name: &'static str, value: f32, allow_zero: bool) -> Result<(), ConfigError> {
    check_finite(name, value)?;
    let low_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if low_ok && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}
