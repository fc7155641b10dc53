//! Fixed-step rigid sphere integration.
//!
//! The world owns every [`RigidBody`] and the [`StaticBoundary`] around them.
//! Callers feed it variable frame deltas through [`PhysicsWorld::advance`];
//! the world turns those into whole fixed steps, capped per frame, and drops
//! any backlog beyond the cap so a long hitch never snowballs.
//!
//! Each fixed step runs, in order:
//!
//! 1. gravity
//! 2. damping, or an occasional idle nudge for slow bodies
//! 3. speed clamp
//! 4. position and orientation integration
//! 5. wall collisions
//! 6. pairwise sphere collisions
//!
//! Pair checks are all-pairs. That is fine for a few hundred bodies; a
//! uniform grid would be the next step if counts grow.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;

use crate::body::{RigidBody, StaticBoundary, Wall};
use crate::config::Config;

/// Contact normal used when two centers coincide.
const FALLBACK_NORMAL: Vec3 = Vec3::Y;

/// Distances below this are treated as coincident.
const DEGENERATE_DISTANCE: f32 = 1e-6;

const WALLS: [(Wall, Wall); 3] = [
    (Wall::MinX, Wall::MaxX),
    (Wall::MinY, Wall::MaxY),
    (Wall::MinZ, Wall::MaxZ),
];

/// Global integration parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldSettings {
    pub gravity: Vec3,
    /// Damping only applies above this speed.
    pub min_speed: f32,
    /// Chance per step that a body below `min_speed` gets nudged.
    pub jitter_probability: f32,
    /// Velocity added by an idle nudge.
    pub jitter_strength: f32,
    pub max_speed: f32,
    pub fixed_timestep: f32,
    pub max_substeps: u32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for WorldSettings {
    fn from(config: &Config) -> Self {
        Self {
            gravity: config.gravity,
            min_speed: config.min_speed,
            jitter_probability: config.jitter_probability,
            jitter_strength: config.jitter_strength,
            max_speed: config.max_speed,
            fixed_timestep: config.fixed_timestep,
            max_substeps: config.max_substeps,
        }
    }
}

/// What happened during one [`PhysicsWorld::advance`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Fixed steps executed.
    pub substeps: u32,
    /// Seconds discarded because the substep cap was reached.
    pub dropped: f32,
    /// Body-wall contacts resolved.
    pub wall_contacts: u32,
    /// Overlapping body pairs resolved.
    pub pair_contacts: u32,
}

/// Owns all bodies and advances them in fixed steps.
#[derive(Clone, Debug)]
pub struct PhysicsWorld {
    bodies: Vec<RigidBody>,
    boundary: StaticBoundary,
    settings: WorldSettings,
    accumulator: f32,
}

impl PhysicsWorld {
    /// Create an empty world inside `boundary`.
    pub fn new(boundary: StaticBoundary, settings: WorldSettings) -> Self {
        Self {
            bodies: Vec::new(),
            boundary,
            settings,
            accumulator: 0.0,
        }
    }

    /// Add a body and return its index.
    pub fn add_body(&mut self, body: RigidBody) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Replace the boundary and every body, discarding pending time.
    pub fn rebuild(&mut self, boundary: StaticBoundary, bodies: Vec<RigidBody>) {
        self.boundary = boundary;
        self.bodies = bodies;
        self.accumulator = 0.0;
    }

    /// Remove all bodies.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.accumulator = 0.0;
    }

    #[inline]
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    #[inline]
    pub fn bodies_mut(&mut self) -> &mut [RigidBody] {
        &mut self.bodies
    }

    #[inline]
    pub fn body(&self, index: usize) -> Option<&RigidBody> {
        self.bodies.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    #[inline]
    pub fn boundary(&self) -> &StaticBoundary {
        &self.boundary
    }

    #[inline]
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Unconsumed time carried to the next frame.
    #[inline]
    pub fn pending_time(&self) -> f32 {
        self.accumulator
    }

    /// Total kinetic energy of all bodies.
    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(RigidBody::kinetic_energy).sum()
    }

    /// Apply an impulse to one body, then clamp its speed.
    ///
    /// Unknown indices are ignored.
    pub fn apply_impulse(&mut self, index: usize, impulse: Vec3) {
        let max_speed = self.settings.max_speed;
        if let Some(body) = self.bodies.get_mut(index) {
            body.apply_impulse(impulse);
            body.clamp_speed(max_speed);
        }
    }

    /// Consume a frame delta in fixed steps.
    ///
    /// At most `max_substeps` steps run. If time is still owed after that,
    /// it is dropped rather than carried forward.
    pub fn advance<R: Rng + ?Sized>(&mut self, delta: f32, rng: &mut R) -> StepReport {
        let mut report = StepReport::default();
        let dt = self.settings.fixed_timestep;
        if !(dt > 0.0) {
            return report;
        }

        if delta.is_finite() && delta > 0.0 {
            self.accumulator += delta;
        }

        while self.accumulator >= dt && report.substeps < self.settings.max_substeps {
            self.step_into(rng, &mut report);
            self.accumulator -= dt;
            report.substeps += 1;
        }

        if self.accumulator >= dt {
            report.dropped = self.accumulator;
            log::trace!("dropping {:.4}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        report
    }

    /// Run exactly one fixed step.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StepReport {
        let mut report = StepReport {
            substeps: 1,
            ..Default::default()
        };
        self.step_into(rng, &mut report);
        report
    }

    fn step_into<R: Rng + ?Sized>(&mut self, rng: &mut R, report: &mut StepReport) {
        let settings = self.settings;
        let dt = settings.fixed_timestep;

        for body in &mut self.bodies {
            body.linear_velocity += settings.gravity * dt;

            if body.speed() > settings.min_speed {
                body.linear_velocity *= body.linear_damping;
                body.angular_velocity *= body.angular_damping;
            } else if settings.jitter_probability > 0.0
                && rng.gen::<f32>() < settings.jitter_probability
            {
                body.linear_velocity += random_direction(rng) * settings.jitter_strength;
            }

            body.clamp_speed(settings.max_speed);

            body.position += body.linear_velocity * dt;
            integrate_orientation(body, dt);
        }

        for body in &mut self.bodies {
            report.wall_contacts += resolve_walls(body, &self.boundary);
        }

        report.pair_contacts += self.resolve_pairs();

        // Pair separation can push a body past a wall; pull it back in
        // without touching velocity.
        for body in &mut self.bodies {
            let limit = self.boundary.limits_for(body.radius);
            body.position = body.position.clamp(-limit, limit);
        }
    }

    fn resolve_pairs(&mut self) -> u32 {
        let max_speed = self.settings.max_speed;
        let mut contacts = 0;

        for j in 1..self.bodies.len() {
            let (head, tail) = self.bodies.split_at_mut(j);
            let b = &mut tail[0];
            for a in head.iter_mut() {
                if resolve_pair(a, b, max_speed) {
                    contacts += 1;
                }
            }
        }

        contacts
    }
}

/// Resolve contact between two spheres. Returns `true` if they overlapped.
fn resolve_pair(a: &mut RigidBody, b: &mut RigidBody, max_speed: f32) -> bool {
    let delta = b.position - a.position;
    let min_distance = a.radius + b.radius;
    let distance_sq = delta.length_squared();
    if distance_sq >= min_distance * min_distance {
        return false;
    }

    let distance = distance_sq.sqrt();
    let normal = if distance > DEGENERATE_DISTANCE {
        delta / distance
    } else {
        FALLBACK_NORMAL
    };

    // Only approaching pairs exchange momentum.
    let closing = (b.linear_velocity - a.linear_velocity).dot(normal);
    let inverse_mass_sum = a.inverse_mass() + b.inverse_mass();
    if closing < 0.0 && inverse_mass_sum > 0.0 {
        let restitution = a.material.restitution.min(b.material.restitution);
        let impulse = -(1.0 + restitution) * closing / inverse_mass_sum;
        a.linear_velocity -= normal * (impulse * a.inverse_mass());
        b.linear_velocity += normal * (impulse * b.inverse_mass());
        a.clamp_speed(max_speed);
        b.clamp_speed(max_speed);
    }

    let correction = normal * ((min_distance - distance) * 0.5);
    a.position -= correction;
    b.position += correction;
    true
}

/// Clamp a body into the box, reflecting the velocity of every axis that
/// crossed a wall. Returns the number of walls touched.
fn resolve_walls(body: &mut RigidBody, boundary: &StaticBoundary) -> u32 {
    let limit = boundary.limits_for(body.radius);
    let restitution = body.material.restitution;
    let mut contacts = 0;

    for (axis, (min_wall, max_wall)) in WALLS.iter().enumerate() {
        let wall = if body.position[axis] > limit[axis] {
            body.position[axis] = limit[axis];
            *max_wall
        } else if body.position[axis] < -limit[axis] {
            body.position[axis] = -limit[axis];
            *min_wall
        } else {
            continue;
        };

        let normal = StaticBoundary::normal(wall);
        if body.linear_velocity.dot(normal) < 0.0 {
            body.linear_velocity[axis] = -body.linear_velocity[axis] * restitution;
        }
        apply_wall_friction(body, normal);
        contacts += 1;
    }

    contacts
}

/// Bleed tangential speed into rolling spin.
fn apply_wall_friction(body: &mut RigidBody, normal: Vec3) {
    let friction = body.material.friction;
    if friction <= 0.0 {
        return;
    }

    let tangential = body.linear_velocity - normal * body.linear_velocity.dot(normal);
    body.linear_velocity -= tangential * friction;

    if body.radius > 0.0 {
        let rolling = normal.cross(tangential) / body.radius;
        body.angular_velocity += (rolling - body.angular_velocity) * friction;
    }
}

fn integrate_orientation(body: &mut RigidBody, dt: f32) {
    let rotation = body.angular_velocity * dt;
    if rotation.length_squared() > 0.0 {
        body.orientation = (Quat::from_scaled_axis(rotation) * body.orientation).normalize();
    }
}

/// Uniformly distributed unit vector.
pub(crate) fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.gen_range(0.0..TAU);
    let cos_phi: f32 = rng.gen_range(-1.0..1.0);
    let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
    Vec3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), cos_phi)
}
