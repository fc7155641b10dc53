//! Boundary between the simulation and whatever draws it.
//!
//! The core never talks to a GPU. It drives a [`Renderer`] through opaque
//! handles, one per body, kept in a vector indexed exactly like the
//! physics world's bodies.

use glam::{Quat, Vec3};

use crate::camera::Camera;

/// Visual parameters of one body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    /// Base RGB color (0.0-1.0).
    pub color: Vec3,
    /// Emissive intensity added on top of the lit color.
    pub emissive: f32,
}

impl Appearance {
    pub fn new(color: Vec3, emissive: f32) -> Self {
        Self { color, emissive }
    }

    /// Same color with a different emissive intensity.
    pub fn with_emissive(self, emissive: f32) -> Self {
        Self { emissive, ..self }
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            emissive: 0.0,
        }
    }
}

/// Anything that can display spheres.
pub trait Renderer {
    /// Opaque per-body handle.
    type Handle: Copy;

    /// Create a sphere and return its handle.
    fn create_body(&mut self, radius: f32, appearance: &Appearance) -> Self::Handle;

    /// Move a sphere.
    fn set_transform(&mut self, handle: Self::Handle, position: Vec3, orientation: Quat);

    /// Change a sphere's look.
    fn set_appearance(&mut self, handle: Self::Handle, appearance: &Appearance);

    /// Destroy a sphere. The handle must not be used afterwards.
    fn remove_body(&mut self, handle: Self::Handle);

    /// Camera for subsequent draws. Picking uses the same camera, so the
    /// two must never disagree.
    fn set_camera(&mut self, camera: &Camera);

    /// Present the current state.
    fn draw(&mut self);

    /// The render surface changed size.
    fn on_resize(&mut self, width: u32, height: u32);
}

/// Visual counterpart of a body, at the same index as the body.
///
/// Holds no physics state; it only remembers the handle and the appearance
/// the body had before any highlight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderProxy<H> {
    pub handle: H,
    pub base: Appearance,
}
