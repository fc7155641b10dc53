//! Native window host.
//!
//! Opens a winit window, puts a [`SphereRenderer`] on it and drives a
//! [`Visualization`] from redraw requests. Pointer and touch events go into
//! the visualization's queue; resizes rebuild the scene. Closing the window
//! stops the frame loop before anything else is released.

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::camera::Camera;
use crate::config::Config;
use crate::error::HostError;
use crate::frame::{FrameLoop, FrameScheduler, FrameToken};
use crate::gpu::SphereRenderer;
use crate::input::PointerTracker;
use crate::viewport::ViewportSize;
use crate::visualization::Visualization;

/// Frame scheduler backed by `Window::request_redraw`.
pub struct RedrawScheduler {
    window: Arc<Window>,
    next: u64,
}

impl RedrawScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window, next: 0 }
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameToken {
        self.next += 1;
        self.window.request_redraw();
        FrameToken(self.next)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        // winit cannot withdraw a redraw; the loop's cancel flag drops it.
        log::trace!("frame {:?} cancelled", token);
    }
}

/// Everything that exists only while the window is open.
struct Running {
    frames: FrameLoop<RedrawScheduler>,
    visualization: Visualization<SphereRenderer>,
    window: Arc<Window>,
}

impl Running {
    fn start(event_loop: &ActiveEventLoop, config: &Config) -> Result<Self, HostError> {
        let window_attrs = Window::default_attributes()
            .with_title("bauble")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let camera = Camera::new();
        let size = window.inner_size();
        let renderer = pollster::block_on(SphereRenderer::new(window.clone(), camera.clone()))?;
        let visualization = Visualization::new(
            config.clone(),
            camera,
            ViewportSize::new(size.width, size.height),
            renderer,
            Instant::now(),
        )?;

        let mut frames = FrameLoop::new(RedrawScheduler::new(window.clone()));
        frames.start();

        Ok(Self {
            frames,
            visualization,
            window,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.visualization.resize(size.width, size.height);
    }

    fn redraw(&mut self) {
        let visualization = &mut self.visualization;
        self.frames.fire(|| visualization.frame(Instant::now()));
    }

    /// Release in reverse order of creation.
    fn shutdown(mut self) {
        self.frames.stop();
        let renderer = self.visualization.into_renderer();
        drop(renderer);
        drop(self.frames);
        drop(self.window);
    }
}

/// winit application driving one visualization.
pub struct App {
    config: Config,
    running: Option<Running>,
    tracker: PointerTracker,
    error: Option<HostError>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            running: None,
            tracker: PointerTracker::new(),
            error: None,
        }
    }

    /// First fatal error, if any.
    pub fn take_error(&mut self) -> Option<HostError> {
        self.error.take()
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(running) = self.running.take() {
            running.shutdown();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match Running::start(event_loop, &self.config) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                log::error!("failed to start: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            self.close(event_loop);
            return;
        }

        let Some(running) = self.running.as_mut() else {
            return;
        };

        for pointer in self.tracker.handle_event(&event) {
            running.visualization.push_pointer(pointer);
        }

        match event {
            WindowEvent::Resized(size) => running.resize(size),
            WindowEvent::RedrawRequested => running.redraw(),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = self.running.take() {
            running.shutdown();
        }
    }
}

/// Open a window and run `config` until it is closed.
pub fn run(config: Config) -> Result<(), HostError> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
