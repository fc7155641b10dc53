//! Pointer interaction: hover picking, impulses and chain reactions.
//!
//! Each pointer event is turned into a camera ray and tested against every
//! body. The nearest hit is the hovered body. Entering a body (or tapping
//! it) kicks it along the ray and gives weaker, randomized kicks to the
//! bodies around it. Dragging across a hovered body keeps nudging it.
//!
//! The controller only decides *what* happened. Highlight changes are
//! returned as a [`HoverChange`] for the caller to forward.

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::camera::{screen_to_ndc, Camera};
use crate::config::Config;
use crate::input::{PointerEvent, PointerKind};
use crate::ray::closest_hit;
use crate::viewport::ViewportSize;
use crate::world::{random_direction, PhysicsWorld};

/// Weight of the random component in a chain impulse direction.
const CHAIN_SCATTER: f32 = 0.3;

/// Axis-aligned screen rectangle in physical pixels.
///
/// Pointer events inside any of these are left to the overlay UI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Pointer state of one visualization.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractionState {
    /// Last pointer position in normalized device coordinates.
    pub pointer_ndc: Option<Vec2>,
    /// Body currently under the pointer.
    pub hovered: Option<usize>,
    /// Pointer is held down.
    pub drag_active: bool,
}

/// Hover transition produced by one event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverChange {
    pub left: Option<usize>,
    pub entered: Option<usize>,
}

impl HoverChange {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.entered.is_none()
    }
}

/// Impulse tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionSettings {
    pub radius: f32,
    pub strength: f32,
    pub chain_factor: f32,
    pub drag_scale: f32,
}

impl From<&Config> for InteractionSettings {
    fn from(config: &Config) -> Self {
        Self {
            radius: config.interaction_radius,
            strength: config.impulse_strength,
            chain_factor: config.chain_factor,
            drag_scale: config.drag_impulse_scale,
        }
    }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Maps pointer events to hover state and impulses.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    state: InteractionState,
    settings: InteractionSettings,
    ui_regions: Vec<ScreenRect>,
}

impl InteractionController {
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            state: InteractionState::default(),
            settings,
            ui_regions: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    #[inline]
    pub fn hovered(&self) -> Option<usize> {
        self.state.hovered
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    /// Replace the screen regions that belong to overlay controls.
    pub fn set_ui_regions(&mut self, regions: Vec<ScreenRect>) {
        self.ui_regions = regions;
    }

    pub fn ui_regions(&self) -> &[ScreenRect] {
        &self.ui_regions
    }

    /// Forget hover and drag. Used when the bodies are recreated.
    pub fn reset(&mut self) {
        self.state = InteractionState::default();
    }

    /// Process one pointer event.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        event: &PointerEvent,
        camera: &Camera,
        viewport: ViewportSize,
        world: &mut PhysicsWorld,
        rng: &mut R,
    ) -> HoverChange {
        if event.kind == PointerKind::Cancel {
            let left = self.state.hovered.take();
            self.state.drag_active = false;
            self.state.pointer_ndc = None;
            if let Some(index) = left {
                log::trace!("hover left body {} (pointer cancelled)", index);
            }
            return HoverChange {
                left,
                entered: None,
            };
        }

        if self.ui_regions.iter().any(|r| r.contains(event.position)) {
            return HoverChange::default();
        }

        // A stale index can only come from bodies removed behind our back.
        if self.state.hovered.is_some_and(|i| i >= world.len()) {
            self.state.hovered = None;
        }

        let mut change = HoverChange::default();
        if !viewport.is_empty() {
            let ndc = screen_to_ndc(event.position, viewport.width, viewport.height);
            self.state.pointer_ndc = Some(ndc);

            let ray = camera.ray_from_ndc(ndc, viewport.aspect());
            let hit = closest_hit(&ray, world.bodies().iter().map(|b| (b.position, b.radius)))
                .map(|h| h.index);

            let previous = self.state.hovered;
            if hit != previous {
                change = HoverChange {
                    left: previous,
                    entered: hit,
                };
                self.state.hovered = hit;
                if let Some(index) = previous {
                    log::trace!("hover left body {}", index);
                }
                if let Some(index) = hit {
                    log::trace!("hover entered body {}", index);
                    self.strike(index, ray.direction, world, rng);
                }
            } else if let Some(index) = hit {
                match event.kind {
                    PointerKind::Down => self.strike(index, ray.direction, world, rng),
                    PointerKind::Move if self.state.drag_active => {
                        let scale = self.settings.strength * self.settings.drag_scale;
                        world.apply_impulse(index, ray.direction * scale);
                    }
                    _ => {}
                }
            }
        }

        match event.kind {
            PointerKind::Down => self.state.drag_active = true,
            PointerKind::Up => self.state.drag_active = false,
            _ => {}
        }

        change
    }

    /// Kick `target` along `direction` and scatter weaker kicks around it.
    fn strike<R: Rng + ?Sized>(
        &self,
        target: usize,
        direction: Vec3,
        world: &mut PhysicsWorld,
        rng: &mut R,
    ) {
        let Some(center) = world.body(target).map(|b| b.position) else {
            return;
        };
        world.apply_impulse(target, direction * self.settings.strength);

        let radius = self.settings.radius;
        if radius <= 0.0 || self.settings.chain_factor <= 0.0 {
            return;
        }

        let neighbors: Vec<(usize, Vec3, f32)> = world
            .bodies()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target)
            .filter_map(|(i, body)| {
                let offset = body.position - center;
                let distance = offset.length();
                (distance < radius).then_some((i, offset, distance))
            })
            .collect();

        for (index, offset, distance) in neighbors {
            let scatter = random_direction(rng) * CHAIN_SCATTER;
            let away = offset.normalize_or_zero();
            let dir = (away + scatter).normalize_or(random_direction(rng));
            let falloff = 1.0 - distance / radius;
            let magnitude = self.settings.strength
                * self.settings.chain_factor
                * falloff
                * rng.gen_range(0.5..1.0);
            world.apply_impulse(index, dir * magnitude);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{RigidBody, StaticBoundary};
    use crate::world::WorldSettings;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const VIEW: ViewportSize = ViewportSize {
        width: 800,
        height: 600,
    };

    fn world_with(bodies: &[(Vec3, f32)]) -> PhysicsWorld {
        let mut world = PhysicsWorld::new(
            StaticBoundary::new(Vec3::new(20.0, 20.0, 5.0)),
            WorldSettings::default(),
        );
        for &(position, radius) in bodies {
            world.add_body(RigidBody::new(position, radius));
        }
        world
    }

    fn center() -> PointerEvent {
        PointerEvent::moved(400.0, 300.0)
    }

    fn send(
        controller: &mut InteractionController,
        event: PointerEvent,
        world: &mut PhysicsWorld,
        rng: &mut SmallRng,
    ) -> HoverChange {
        controller.handle(&event, &Camera::new(), VIEW, world, rng)
    }

    fn corner() -> PointerEvent {
        PointerEvent::moved(5.0, 5.0)
    }

    #[test]
    fn test_hover_enter_kicks_along_ray() {
        let mut world = world_with(&[(Vec3::ZERO, 1.0)]);
        let mut controller = InteractionController::default();
        let mut rng = SmallRng::seed_from_u64(1);

        let change = controller.handle(&center(), &Camera::new(), VIEW, &mut world, &mut rng);
        assert_eq!(change.entered, Some(0));
        assert_eq!(change.left, None);
        assert_eq!(controller.hovered(), Some(0));

        let v = world.bodies()[0].linear_velocity;
        assert!(v.z < 0.0, "camera looks down -Z, got {:?}", v);
    }

    #[test]
    fn test_moving_within_body_does_not_kick_again() {
        let mut world = world_with(&[(Vec3::ZERO, 1.0)]);
        let mut controller = InteractionController::default();
        let mut rng = SmallRng::seed_from_u64(2);

        controller.handle(&center(), &Camera::new(), VIEW, &mut world, &mut rng);
        let after_enter = world.bodies()[0].linear_velocity;
        let change = controller.handle(
            &PointerEvent::moved(401.0, 300.0),
            &Camera::new(),
            VIEW,
            &mut world,
            &mut rng,
        );
        assert!(change.is_empty());
        assert_eq!(world.bodies()[0].linear_velocity, after_enter);
    }

    #[test]
    fn test_leave_reports_previous_body() {
        let mut world = world_with(&[(Vec3::ZERO, 1.0)]);
        let mut controller = InteractionController::default();
        let mut rng = SmallRng::seed_from_u64(3);

        controller.handle(&center(), &Camera::new(), VIEW, &mut world, &mut rng);
        let change = controller.handle(&corner(), &Camera::new(), VIEW, &mut world, &mut rng);
        assert_eq!(change.left, Some(0));
        assert_eq!(change.entered, None);
        assert_eq!(controller.hovered(), None);
    }

    #[test]
    fn test_tap_on_hovered_body_kicks_once() {
        let mut world = world_with(&[(Vec3::ZERO, 1.0)]);
        let mut controller = InteractionController::default();
        let mut rng = SmallRng::seed_from_u64(4);

        controller.handle(&center(), &Camera::new(), VIEW, &mut world, &mut rng);
        let after_enter = world.bodies()[0].linear_velocity.z;
        send(&mut controller, PointerEvent::down(400.0, 300.0), &mut world, &mut rng);
        assert!(world.bodies()[0].linear_velocity.z < after_enter);
        assert!(controller.state().drag_active);

        send(&mut controller, PointerEvent::up(400.0, 300.0), &mut world, &mut rng);
        assert!(!controller.state().drag_active);
    }

    #[test]
    fn test_drag_nudges_hovered_body_until_release() {
        let mut world = world_with(&[(Vec3::ZERO, 1.0)]);
        let mut controller = InteractionController::default();
        let mut rng = SmallRng::seed_from_u64(9);
        let nudge = controller.settings().strength * controller.settings().drag_scale;

        send(&mut controller, PointerEvent::down(400.0, 300.0), &mut world, &mut rng);
        assert!(controller.state().drag_active);

        for x in [401.0, 402.0] {
            let before = world.bodies()[0].linear_velocity;
            let change = send(&mut controller, PointerEvent::moved(x, 300.0), &mut world, &mut rng);
            assert!(change.is_empty());

            let gained = before - world.bodies()[0].linear_velocity;
            // Near the screen center the ray points almost straight down -Z.
            assert!((gained.length() - nudge).abs() < 1e-4, "gained {:?}", gained);
            assert!(gained.z > nudge * 0.99);
        }

        send(&mut controller, PointerEvent::up(402.0, 300.0), &mut world, &mut rng);
        let released = world.bodies()[0].linear_velocity;
        send(&mut controller, PointerEvent::moved(403.0, 300.0), &mut world, &mut rng);
        assert_eq!(world.bodies()[0].linear_velocity, released);
    }

    #[test]
    fn test_chain_reaction_pushes_neighbors_away() {
        let mut world = world_with(&[
            (Vec3::ZERO, 1.0),
            (Vec3::new(2.5, 0.0, 0.0), 0.5),
            (Vec3::new(0.0, 9.0, 0.0), 0.5),
        ]);
        let mut controller = InteractionController::default();
        let mut rng = SmallRng::seed_from_u64(5);

        controller.handle(&center(), &Camera::new(), VIEW, &mut world, &mut rng);
        assert!(world.bodies()[1].linear_velocity.x > 0.0);
        assert_eq!(world.bodies()[2].linear_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_ui_region_blocks_events() {
        let mut world = world_with(&[(Vec3::ZERO, 1.0)]);
        let mut controller = InteractionController::default();
        controller.set_ui_regions(vec![ScreenRect::new(350.0, 250.0, 100.0, 100.0)]);
        let mut rng = SmallRng::seed_from_u64(6);

        let change = controller.handle(&center(), &Camera::new(), VIEW, &mut world, &mut rng);
        assert!(change.is_empty());
        assert_eq!(controller.hovered(), None);
        assert_eq!(world.bodies()[0].linear_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_cancel_clears_hover() {
        let mut world = world_with(&[(Vec3::ZERO, 1.0)]);
        let mut controller = InteractionController::default();
        let mut rng = SmallRng::seed_from_u64(7);

        send(&mut controller, PointerEvent::down(400.0, 300.0), &mut world, &mut rng);
        let change = send(&mut controller, PointerEvent::cancel(), &mut world, &mut rng);
        assert_eq!(change.left, Some(0));
        assert_eq!(*controller.state(), InteractionState::default());
    }

    #[test]
    fn test_empty_world_and_viewport_are_harmless() {
        let mut world = world_with(&[]);
        let mut controller = InteractionController::default();
        let mut rng = SmallRng::seed_from_u64(8);

        let change = controller.handle(&center(), &Camera::new(), VIEW, &mut world, &mut rng);
        assert!(change.is_empty());
        let change = controller.handle(
            &center(),
            &Camera::new(),
            ViewportSize::new(0, 0),
            &mut world,
            &mut rng,
        );
        assert!(change.is_empty());
    }

    #[test]
    fn test_screen_rect_contains() {
        let rect = ScreenRect::new(10.0, 20.0, 30.0, 40.0);
        assert!(rect.contains(Vec2::new(10.0, 20.0)));
        assert!(rect.contains(Vec2::new(40.0, 60.0)));
        assert!(!rect.contains(Vec2::new(41.0, 30.0)));
        assert!(!rect.contains(Vec2::new(20.0, 19.0)));
    }
}
