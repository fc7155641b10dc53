//! One running visualization: physics, interaction, highlight and rendering
//! tied together by a per-frame update.
//!
//! [`Visualization`] is the instance object. It owns every piece of state
//! for its lifetime and is driven from outside: the host pushes pointer
//! events whenever they arrive and calls [`Visualization::frame`] once per
//! display refresh. Nothing is shared between instances.
//!
//! Bodies and render proxies live in parallel vectors with the same index.
//! A resize throws both away and builds new ones.

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::body::StaticBoundary;
use crate::camera::Camera;
use crate::config::Config;
use crate::error::ConfigError;
use crate::factory::{BodyFactory, SpawnedBody, StagedSpawn};
use crate::highlight::HighlightAnimator;
use crate::input::{PointerEvent, PointerQueue};
use crate::interaction::{HoverChange, InteractionController, InteractionSettings, ScreenRect};
use crate::renderer::{Appearance, RenderProxy, Renderer};
use crate::time::FrameClock;
use crate::viewport::{resolve, ViewportSize, WorldExtents};
use crate::world::{PhysicsWorld, StepReport, WorldSettings};

/// A self-contained sphere visualization drawing through `R`.
pub struct Visualization<R: Renderer> {
    config: Config,
    camera: Camera,
    viewport: ViewportSize,
    extents: WorldExtents,
    world: PhysicsWorld,
    proxies: Vec<RenderProxy<R::Handle>>,
    interaction: InteractionController,
    highlight: HighlightAnimator,
    staged: Option<StagedSpawn>,
    rng: SmallRng,
    clock: FrameClock,
    pointer: PointerQueue,
    last_report: StepReport,
    renderer: R,
}

impl<R: Renderer> Visualization<R> {
    /// Validate `config` and build the initial scene.
    pub fn new(
        config: Config,
        camera: Camera,
        viewport: ViewportSize,
        mut renderer: R,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        renderer.set_camera(&camera);
        let extents = resolve(viewport, &camera, config.depth_fraction);
        let mut vis = Self {
            world: PhysicsWorld::new(
                StaticBoundary::new(extents.half()),
                WorldSettings::from(&config),
            ),
            interaction: InteractionController::new(InteractionSettings::from(&config)),
            highlight: HighlightAnimator::new(config.highlight_peak, config.highlight_decay),
            staged: None,
            rng: SmallRng::seed_from_u64(config.seed),
            clock: FrameClock::new(now),
            pointer: PointerQueue::new(),
            last_report: StepReport::default(),
            proxies: Vec::new(),
            config,
            camera,
            viewport,
            extents,
            renderer,
        };
        vis.populate();

        log::info!(
            "visualization created: {} bodies (target {}), box {:.1} x {:.1} x {:.1}",
            vis.world.len(),
            vis.config.body_count.total(),
            extents.width,
            extents.height,
            extents.depth
        );
        Ok(vis)
    }

    // ========== Host input ==========

    /// Queue a pointer event for the next frame.
    pub fn push_pointer(&mut self, event: PointerEvent) {
        self.pointer.push(event);
    }

    /// Screen regions owned by overlay controls.
    pub fn set_ui_regions(&mut self, regions: Vec<ScreenRect>) {
        self.interaction.set_ui_regions(regions);
    }

    /// The render surface changed size. Rebuilds the whole scene.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = ViewportSize::new(width, height);
        self.rebuild();
        self.renderer.on_resize(width, height);
        log::info!(
            "resized to {}x{}: {} bodies, box {:.1} x {:.1} x {:.1}",
            width,
            height,
            self.world.len(),
            self.extents.width,
            self.extents.height,
            self.extents.depth
        );
    }

    /// Move the camera. The box follows what the camera sees, so the scene
    /// is rebuilt. The renderer draws with the same camera used for picking.
    pub fn set_camera(&mut self, camera: Camera) {
        self.renderer.set_camera(&camera);
        self.camera = camera;
        self.rebuild();
    }

    // ========== Frame ==========

    /// Run one frame at wall-clock time `now`.
    ///
    /// Order: pointer events, physics, staged spawn, transform copy,
    /// highlight fade, draw.
    pub fn frame(&mut self, now: Instant) {
        let (elapsed, delta) = self.clock.tick(now);

        let mut queue = std::mem::take(&mut self.pointer);
        for event in queue.drain() {
            let change = self.interaction.handle(
                &event,
                &self.camera,
                self.viewport,
                &mut self.world,
                &mut self.rng,
            );
            self.apply_hover(change, elapsed);
        }
        self.pointer = queue;

        self.last_report = self.world.advance(delta, &mut self.rng);
        let report = self.last_report;
        if report.wall_contacts + report.pair_contacts > 0 {
            log::trace!(
                "frame {}: {} substeps, {} wall contacts, {} pair contacts",
                self.clock.frame(),
                report.substeps,
                report.wall_contacts,
                report.pair_contacts
            );
        }

        if let Some(staged) = self.staged.as_mut() {
            if staged.tick(self.world.len()) {
                self.spawn_one();
            }
        }
        self.finish_staged_spawn();

        for (proxy, body) in self.proxies.iter().zip(self.world.bodies()) {
            self.renderer
                .set_transform(proxy.handle, body.position, body.orientation);
        }

        let proxies = &self.proxies;
        let renderer = &mut self.renderer;
        self.highlight.advance(
            elapsed,
            |i| proxies.get(i).map_or(0.0, |p| p.base.emissive),
            |i, intensity| {
                if let Some(proxy) = proxies.get(i) {
                    renderer.set_appearance(proxy.handle, &proxy.base.with_emissive(intensity));
                }
            },
        );

        self.renderer.draw();
    }

    /// Release every body and proxy. The instance draws nothing afterwards
    /// until the next resize.
    pub fn teardown(&mut self) {
        self.pointer.clear();
        self.interaction.reset();
        self.highlight.reset(0);
        self.staged = None;
        self.clear_proxies();
        self.world.clear();
        log::info!("visualization torn down");
    }

    /// Tear down and hand back the renderer.
    pub fn into_renderer(mut self) -> R {
        self.teardown();
        self.renderer
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn extents(&self) -> WorldExtents {
        self.extents
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Direct world access, for hosts that add their own forces.
    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn highlight(&self) -> &HighlightAnimator {
        &self.highlight
    }

    pub fn proxies(&self) -> &[RenderProxy<R::Handle>] {
        &self.proxies
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Physics statistics of the most recent frame.
    pub fn last_report(&self) -> StepReport {
        self.last_report
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    // ========== Internals ==========

    fn apply_hover(&mut self, change: HoverChange, now: f32) {
        if let Some(index) = change.left {
            self.highlight.leave(index, now);
        }
        if let Some(index) = change.entered {
            if self.highlight.enter(index) {
                if let Some(proxy) = self.proxies.get(index) {
                    let peak = proxy.base.with_emissive(self.highlight.peak());
                    self.renderer.set_appearance(proxy.handle, &peak);
                }
            }
        }
    }

    /// Recreate boundary and bodies for the current viewport and camera.
    fn rebuild(&mut self) {
        self.interaction.reset();
        self.pointer.clear();
        self.clear_proxies();

        self.extents = resolve(self.viewport, &self.camera, self.config.depth_fraction);
        self.world
            .rebuild(StaticBoundary::new(self.extents.half()), Vec::new());
        self.highlight.reset(0);
        self.populate();
    }

    /// Fill an empty world for the current extents.
    fn populate(&mut self) {
        self.staged = None;
        if self.viewport.is_empty() {
            log::debug!("viewport is empty, no bodies created");
            return;
        }

        let target = self.config.body_count.total();
        match self.config.spawn_interval {
            Some(interval) => {
                self.staged = Some(StagedSpawn::new(target, interval));
            }
            None => {
                let factory = BodyFactory::new(&self.config, self.extents);
                for spawned in factory.populate(target, &mut self.rng) {
                    self.add_spawned(spawned);
                }
            }
        }
    }

    fn spawn_one(&mut self) {
        let factory = BodyFactory::new(&self.config, self.extents);
        let spawned = factory.spawn(self.world.bodies(), &mut self.rng);
        if spawned.fallback {
            log::debug!("staged body {} used fallback placement", self.world.len());
        }
        self.add_spawned(spawned);
    }

    fn finish_staged_spawn(&mut self) {
        if let Some(staged) = self.staged {
            if staged.is_complete(self.world.len()) {
                log::debug!("staged spawn complete: {} bodies", self.world.len());
                self.staged = None;
            }
        }
    }

    fn add_spawned(&mut self, spawned: SpawnedBody) {
        let base = Appearance::new(spawned.color, self.config.base_emissive);
        let handle = self.renderer.create_body(spawned.body.radius, &base);
        self.renderer
            .set_transform(handle, spawned.body.position, spawned.body.orientation);
        self.world.add_body(spawned.body);
        self.proxies.push(RenderProxy { handle, base });
        self.highlight.push();
    }

    fn clear_proxies(&mut self) {
        for proxy in self.proxies.drain(..) {
            self.renderer.remove_body(proxy.handle);
        }
    }
}
