//! Integration tests for a full visualization driven frame by frame.
//!
//! A recording renderer stands in for the GPU and a manual scheduler for
//! the display refresh, so every frame is explicit.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bauble::frame::{FrameLoop, FrameScheduler, FrameToken};
use bauble::highlight::HighlightState;
use bauble::input::PointerTracker;
use bauble::prelude::*;
use winit::dpi::PhysicalPosition;
use winit::event::{DeviceId, Touch, TouchPhase, WindowEvent};

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Default)]
struct RecordingRenderer {
    next: u32,
    live: HashMap<u32, Appearance>,
    transforms: HashMap<u32, Vec3>,
    removed: usize,
    draws: usize,
    appearance_updates: usize,
    resizes: Vec<(u32, u32)>,
    camera: Option<Camera>,
}

impl Renderer for RecordingRenderer {
    type Handle = u32;

    fn create_body(&mut self, _radius: f32, appearance: &Appearance) -> u32 {
        self.next += 1;
        self.live.insert(self.next, *appearance);
        self.next
    }

    fn set_transform(&mut self, handle: u32, position: Vec3, _orientation: Quat) {
        assert!(self.live.contains_key(&handle), "transform on dead handle");
        self.transforms.insert(handle, position);
    }

    fn set_appearance(&mut self, handle: u32, appearance: &Appearance) {
        assert!(self.live.contains_key(&handle), "appearance on dead handle");
        self.live.insert(handle, *appearance);
        self.appearance_updates += 1;
    }

    fn remove_body(&mut self, handle: u32) {
        assert!(self.live.remove(&handle).is_some(), "double remove");
        self.transforms.remove(&handle);
        self.removed += 1;
    }

    fn set_camera(&mut self, camera: &Camera) {
        self.camera = Some(camera.clone());
    }

    fn draw(&mut self) {
        self.draws += 1;
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }
}

#[derive(Default)]
struct ManualScheduler {
    next: u64,
    cancelled: Vec<FrameToken>,
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        self.next += 1;
        FrameToken(self.next)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.cancelled.push(token);
    }
}

// ============================================================================
// Helpers
// ============================================================================

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn visualization(config: Config, t0: Instant) -> Visualization<RecordingRenderer> {
    Visualization::new(
        config,
        Camera::new(),
        ViewportSize::new(WIDTH, HEIGHT),
        RecordingRenderer::default(),
        t0,
    )
    .unwrap()
}

/// One motionless body at the origin, right under the screen center.
fn single_body(t0: Instant) -> Visualization<RecordingRenderer> {
    let mut config = Config::default()
        .with_body_count(BodyCount::Flat(1))
        .with_gravity(Vec3::ZERO);
    config.jitter_probability = 0.0;
    let mut vis = visualization(config, t0);

    let body = &mut vis.world_mut().bodies_mut()[0];
    body.position = Vec3::ZERO;
    body.linear_velocity = Vec3::ZERO;
    vis
}

fn center() -> PointerEvent {
    PointerEvent::moved(WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0)
}

fn corner() -> PointerEvent {
    PointerEvent::moved(4.0, 4.0)
}

fn touch_at_center(phase: TouchPhase) -> WindowEvent {
    WindowEvent::Touch(Touch {
        device_id: DeviceId::dummy(),
        phase,
        location: PhysicalPosition::new(WIDTH as f64 / 2.0, HEIGHT as f64 / 2.0),
        force: None,
        id: 0,
    })
}

// ============================================================================
// Frames
// ============================================================================

#[test]
fn test_frame_copies_transforms_and_draws() {
    let t0 = Instant::now();
    let mut vis = visualization(Config::default(), t0);
    let count = vis.world().len();
    assert_eq!(count, Config::default().body_count.total());

    vis.frame(t0 + ms(16));
    vis.frame(t0 + ms(33));

    let renderer = vis.renderer();
    assert_eq!(renderer.draws, 2);
    assert_eq!(renderer.camera.as_ref(), Some(vis.camera()));
    assert_eq!(renderer.live.len(), count);
    for (proxy, body) in vis.proxies().iter().zip(vis.world().bodies()) {
        assert_eq!(renderer.transforms[&proxy.handle], body.position);
    }
}

#[test]
fn test_same_seed_same_scene() {
    let t0 = Instant::now();
    let a = visualization(Config::default().with_seed(99), t0);
    let b = visualization(Config::default().with_seed(99), t0);
    let c = visualization(Config::default().with_seed(100), t0);

    let positions = |v: &Visualization<RecordingRenderer>| -> Vec<Vec3> {
        v.world().bodies().iter().map(|b| b.position).collect()
    };
    assert_eq!(positions(&a), positions(&b));
    assert_ne!(positions(&a), positions(&c));
}

// ============================================================================
// Hover and highlight
// ============================================================================

#[test]
fn test_hover_highlights_then_fades_back() {
    let t0 = Instant::now();
    let mut vis = single_body(t0);
    let peak = vis.config().highlight_peak;
    let decay = vis.config().highlight_decay;
    let handle = vis.proxies()[0].handle;
    let base = vis.proxies()[0].base;

    vis.push_pointer(center());
    vis.frame(t0 + ms(16));
    assert_eq!(vis.interaction().hovered(), Some(0));
    assert_eq!(vis.highlight().state(0), Some(HighlightState::Highlighted));
    assert_eq!(vis.renderer().live[&handle].emissive, peak);
    // The hover kick pushed the body away from the camera.
    assert!(vis.world().bodies()[0].linear_velocity.z < 0.0);

    vis.push_pointer(corner());
    vis.frame(t0 + ms(32));
    assert_eq!(vis.interaction().hovered(), None);
    assert!(matches!(
        vis.highlight().state(0),
        Some(HighlightState::Decaying { .. })
    ));

    let after = t0 + ms(32) + Duration::from_secs_f32(decay) + ms(100);
    vis.frame(after);
    assert_eq!(vis.highlight().state(0), Some(HighlightState::Idle));
    assert_eq!(vis.renderer().live[&handle], base);
}

#[test]
fn test_touch_release_fades_highlight() {
    let t0 = Instant::now();
    let mut vis = single_body(t0);
    let decay = vis.config().highlight_decay;
    let handle = vis.proxies()[0].handle;
    let base = vis.proxies()[0].base;
    let mut tracker = PointerTracker::new();

    for event in tracker.handle_event(&touch_at_center(TouchPhase::Started)) {
        vis.push_pointer(event);
    }
    vis.frame(t0 + ms(16));
    assert_eq!(vis.highlight().state(0), Some(HighlightState::Highlighted));

    for event in tracker.handle_event(&touch_at_center(TouchPhase::Ended)) {
        vis.push_pointer(event);
    }
    vis.frame(t0 + ms(32));
    assert_eq!(vis.interaction().hovered(), None);
    assert!(!vis.interaction().state().drag_active);
    assert!(matches!(
        vis.highlight().state(0),
        Some(HighlightState::Decaying { .. })
    ));

    vis.frame(t0 + ms(32) + Duration::from_secs_f32(decay) + ms(100));
    assert_eq!(vis.highlight().state(0), Some(HighlightState::Idle));
    assert_eq!(vis.renderer().live[&handle], base);
}

#[test]
fn test_ui_region_shields_the_scene() {
    let t0 = Instant::now();
    let mut vis = single_body(t0);
    vis.set_ui_regions(vec![ScreenRect::new(300.0, 200.0, 200.0, 200.0)]);
    let updates_before = vis.renderer().appearance_updates;

    vis.push_pointer(center());
    vis.push_pointer(PointerEvent::down(400.0, 300.0));
    vis.frame(t0 + ms(16));

    assert_eq!(vis.interaction().hovered(), None);
    assert_eq!(vis.highlight().active(), 0);
    assert_eq!(vis.renderer().appearance_updates, updates_before);
    assert_eq!(vis.world().bodies()[0].linear_velocity, Vec3::ZERO);
}

#[test]
fn test_events_wait_for_next_frame() {
    let t0 = Instant::now();
    let mut vis = single_body(t0);

    vis.push_pointer(center());
    assert_eq!(vis.interaction().hovered(), None);
    assert_eq!(vis.world().bodies()[0].linear_velocity, Vec3::ZERO);

    vis.frame(t0 + ms(16));
    assert_eq!(vis.interaction().hovered(), Some(0));
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_with_no_bodies() {
    let t0 = Instant::now();
    let mut vis = visualization(Config::default().with_body_count(BodyCount::Flat(0)), t0);
    assert!(vis.world().is_empty());

    vis.resize(1024, 768);
    vis.frame(t0 + ms(16));

    assert_eq!(vis.interaction().hovered(), None);
    assert!(vis.world().is_empty());
    assert_eq!(vis.renderer().resizes, vec![(1024, 768)]);
}

#[test]
fn test_resize_resets_hover_and_recreates_bodies() {
    let t0 = Instant::now();
    let mut vis = single_body(t0);
    vis.push_pointer(center());
    vis.frame(t0 + ms(16));
    assert_eq!(vis.interaction().hovered(), Some(0));

    let old_extents = vis.extents();
    vis.resize(1600, 600);

    assert_eq!(*vis.interaction().state(), InteractionState::default());
    assert_eq!(vis.highlight().active(), 0);
    assert_eq!(vis.world().len(), 1);
    assert_eq!(vis.renderer().removed, 1);
    assert_eq!(vis.renderer().live.len(), 1);
    assert!(vis.extents().width > old_extents.width);

    let half = vis.extents().half();
    for body in vis.world().bodies() {
        assert!(body.position.abs().cmple(half).all());
    }
}

// ============================================================================
// Staged spawn
// ============================================================================

#[test]
fn test_staged_spawn_adds_bodies_over_frames() {
    let t0 = Instant::now();
    let config = Config::default()
        .with_body_count(BodyCount::Flat(3))
        .with_staged_spawn(2);
    let mut vis = visualization(config, t0);
    assert!(vis.world().is_empty());

    let mut counts = Vec::new();
    for i in 1..=8 {
        vis.frame(t0 + ms(16 * i));
        counts.push(vis.world().len());
    }

    assert_eq!(counts, vec![0, 1, 1, 2, 2, 3, 3, 3]);
    assert_eq!(vis.proxies().len(), 3);
    assert_eq!(vis.highlight().len(), 3);
    assert_eq!(vis.renderer().live.len(), 3);
}

// ============================================================================
// Frame loop and teardown
// ============================================================================

#[test]
fn test_no_frames_after_stop() {
    let t0 = Instant::now();
    let mut vis = visualization(Config::default(), t0);
    let mut frames = FrameLoop::new(ManualScheduler::default());
    frames.start();

    for i in 1..=3 {
        assert!(frames.fire(|| vis.frame(t0 + ms(16 * i))));
    }
    frames.stop();

    assert!(!frames.fire(|| vis.frame(t0 + ms(64))));
    assert_eq!(vis.renderer().draws, 3);
    assert_eq!(frames.scheduler().cancelled, vec![FrameToken(4)]);

    let renderer = vis.into_renderer();
    assert!(renderer.live.is_empty());
}
