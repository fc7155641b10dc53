//! # bauble
//!
//! A field of rigid spheres bouncing inside the visible viewport, pushed
//! around by the pointer.
//!
//! The library is split into a renderer-agnostic core and a native host:
//!
//! - the core ([`Visualization`] and everything it owns) simulates, picks
//!   and animates, and talks to graphics only through the [`Renderer`]
//!   trait;
//! - the host ([`window::run`], [`gpu::SphereRenderer`]) puts it in a winit
//!   window drawn with wgpu.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bauble::prelude::*;
//!
//! fn main() -> Result<(), HostError> {
//!     let config = Config::default()
//!         .with_body_count(BodyCount::Grid { x: 8, y: 4, z: 2 })
//!         .with_gravity(Vec3::new(0.0, -3.0, 0.0))
//!         .with_restitution(0.8);
//!     bauble::window::run(config)
//! }
//! ```
//!
//! ## Driving it yourself
//!
//! Any type implementing [`Renderer`] can display a visualization. The host
//! queues pointer events as they arrive and calls [`Visualization::frame`]
//! once per refresh:
//!
//! ```ignore
//! let viewport = ViewportSize::new(w, h);
//! let mut vis = Visualization::new(config, Camera::new(), viewport, my_renderer, Instant::now())?;
//!
//! vis.push_pointer(PointerEvent::moved(x, y));
//! vis.frame(Instant::now());
//! ```
//!
//! ## Frame order
//!
//! 1. drain queued pointer events (hover, impulses, highlight enter/leave)
//! 2. advance physics in fixed steps
//! 3. staged spawn, if enabled
//! 4. copy body transforms to the renderer
//! 5. fade highlights
//! 6. draw

pub mod body;
pub mod camera;
pub mod config;
pub mod error;
pub mod factory;
pub mod frame;
pub mod gpu;
pub mod highlight;
pub mod input;
pub mod interaction;
pub mod ray;
pub mod renderer;
pub mod time;
pub mod viewport;
pub mod visualization;
pub mod window;
pub mod world;

pub use config::{BodyCount, Config};
pub use error::{ConfigError, GpuError, HostError};
pub use glam::{Mat4, Quat, Vec2, Vec3};
pub use renderer::{Appearance, Renderer};
pub use visualization::Visualization;

/// Common imports.
pub mod prelude {
    pub use crate::body::{Material, RigidBody, StaticBoundary};
    pub use crate::camera::Camera;
    pub use crate::config::{BodyCount, Config};
    pub use crate::error::{ConfigError, GpuError, HostError};
    pub use crate::frame::{CancelFlag, FrameLoop, FrameScheduler, FrameToken};
    pub use crate::highlight::{HighlightAnimator, HighlightState};
    pub use crate::input::{PointerEvent, PointerKind};
    pub use crate::interaction::{InteractionState, ScreenRect};
    pub use crate::renderer::{Appearance, RenderProxy, Renderer};
    pub use crate::viewport::{ViewportSize, WorldExtents};
    pub use crate::visualization::Visualization;
    pub use crate::world::{PhysicsWorld, StepReport};
    pub use crate::{Quat, Vec2, Vec3};
}
