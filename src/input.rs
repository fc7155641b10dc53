//! Pointer input for bauble visualizations.
//!
//! Hosts deliver pointer and touch events whenever they like. They are
//! buffered in a [`PointerQueue`] and drained once at the start of each
//! frame, so nothing reaches the simulation in the middle of a step.
//!
//! [`PointerTracker`] turns raw winit window events into [`PointerEvent`]s.
//! Mouse and touch share one pointer: a touch start is a press, a touch move
//! is a move, and a touch end is a release. A lifted finger leaves no pointer
//! behind, so a touch end is also followed by a cancel.

use std::collections::VecDeque;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Move,
    Down,
    Up,
    /// The pointer is gone (left the window, touch cancelled).
    Cancel,
}

/// One pointer sample in physical pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, position: Vec2) -> Self {
        Self { kind, position }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, Vec2::new(x, y))
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Down, Vec2::new(x, y))
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Up, Vec2::new(x, y))
    }

    pub fn cancel() -> Self {
        Self::new(PointerKind::Cancel, Vec2::ZERO)
    }
}

/// Events waiting for the next frame.
#[derive(Debug, Default)]
pub struct PointerQueue {
    events: VecDeque<PointerEvent>,
}

impl PointerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PointerEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Take every queued event in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = PointerEvent> + '_ {
        self.events.drain(..)
    }
}

/// Converts winit window events into pointer events.
///
/// Mouse button events carry no position, so the last cursor position is
/// remembered.
#[derive(Debug, Default)]
pub struct PointerTracker {
    cursor: Vec2,
    active_touch: Option<u64>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position.
    pub fn position(&self) -> Vec2 {
        self.cursor
    }

    /// Translate a window event into zero, one or two pointer events.
    pub fn handle_event(&mut self, event: &WindowEvent) -> impl Iterator<Item = PointerEvent> {
        let (first, second) = self.translate(event);
        first.into_iter().chain(second)
    }

    fn translate(&mut self, event: &WindowEvent) -> (Option<PointerEvent>, Option<PointerEvent>) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                (Some(PointerEvent::new(PointerKind::Move, self.cursor)), None)
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let kind = match state {
                    ElementState::Pressed => PointerKind::Down,
                    ElementState::Released => PointerKind::Up,
                };
                (Some(PointerEvent::new(kind, self.cursor)), None)
            }

            WindowEvent::CursorLeft { .. } => {
                (Some(PointerEvent::new(PointerKind::Cancel, self.cursor)), None)
            }

            WindowEvent::Touch(touch) => {
                // Only the first finger drives the pointer.
                if self.active_touch.is_some_and(|id| id != touch.id) {
                    return (None, None);
                }
                self.cursor = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started => {
                        self.active_touch = Some(touch.id);
                        (Some(PointerEvent::new(PointerKind::Down, self.cursor)), None)
                    }
                    TouchPhase::Moved => {
                        (Some(PointerEvent::new(PointerKind::Move, self.cursor)), None)
                    }
                    TouchPhase::Ended => {
                        self.active_touch = None;
                        (
                            Some(PointerEvent::new(PointerKind::Up, self.cursor)),
                            Some(PointerEvent::new(PointerKind::Cancel, self.cursor)),
                        )
                    }
                    TouchPhase::Cancelled => {
                        self.active_touch = None;
                        (Some(PointerEvent::new(PointerKind::Cancel, self.cursor)), None)
                    }
                }
            }

            _ => (None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::event::{DeviceId, Touch};

    fn cursor_moved(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: DeviceId::dummy(),
            position: PhysicalPosition::new(x, y),
        }
    }

    fn left_button(state: ElementState) -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: DeviceId::dummy(),
            state,
            button: MouseButton::Left,
        }
    }

    fn touch(id: u64, phase: TouchPhase, x: f64, y: f64) -> WindowEvent {
        WindowEvent::Touch(Touch {
            device_id: DeviceId::dummy(),
            phase,
            location: PhysicalPosition::new(x, y),
            force: None,
            id,
        })
    }

    fn kinds(tracker: &mut PointerTracker, event: &WindowEvent) -> Vec<PointerKind> {
        tracker.handle_event(event).map(|e| e.kind).collect()
    }

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = PointerQueue::new();
        queue.push(PointerEvent::moved(1.0, 2.0));
        queue.push(PointerEvent::down(1.0, 2.0));
        queue.push(PointerEvent::up(3.0, 4.0));
        assert_eq!(queue.len(), 3);

        let kinds: Vec<_> = queue.drain().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![PointerKind::Move, PointerKind::Down, PointerKind::Up]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_constructors() {
        let e = PointerEvent::moved(5.0, 6.0);
        assert_eq!(e.kind, PointerKind::Move);
        assert_eq!(e.position, Vec2::new(5.0, 6.0));
        assert_eq!(PointerEvent::cancel().kind, PointerKind::Cancel);
    }

    #[test]
    fn test_tracker_ignores_unrelated_events() {
        let mut tracker = PointerTracker::new();
        assert!(kinds(&mut tracker, &WindowEvent::CloseRequested).is_empty());
        assert_eq!(tracker.position(), Vec2::ZERO);
    }

    #[test]
    fn test_mouse_buttons_use_last_cursor_position() {
        let mut tracker = PointerTracker::new();
        let moved: Vec<_> = tracker.handle_event(&cursor_moved(120.0, 80.0)).collect();
        assert_eq!(moved, vec![PointerEvent::moved(120.0, 80.0)]);

        let pressed: Vec<_> = tracker.handle_event(&left_button(ElementState::Pressed)).collect();
        assert_eq!(pressed, vec![PointerEvent::down(120.0, 80.0)]);

        let released: Vec<_> = tracker.handle_event(&left_button(ElementState::Released)).collect();
        assert_eq!(released, vec![PointerEvent::up(120.0, 80.0)]);
    }

    #[test]
    fn test_other_mouse_buttons_are_ignored() {
        let mut tracker = PointerTracker::new();
        let right = WindowEvent::MouseInput {
            device_id: DeviceId::dummy(),
            state: ElementState::Pressed,
            button: MouseButton::Right,
        };
        assert!(kinds(&mut tracker, &right).is_empty());
    }

    #[test]
    fn test_cursor_left_cancels() {
        let mut tracker = PointerTracker::new();
        tracker.handle_event(&cursor_moved(10.0, 10.0)).for_each(drop);
        let left = WindowEvent::CursorLeft {
            device_id: DeviceId::dummy(),
        };
        assert_eq!(kinds(&mut tracker, &left), vec![PointerKind::Cancel]);
    }

    #[test]
    fn test_touch_phases() {
        let mut tracker = PointerTracker::new();
        assert_eq!(
            kinds(&mut tracker, &touch(7, TouchPhase::Started, 50.0, 60.0)),
            vec![PointerKind::Down]
        );
        assert_eq!(tracker.position(), Vec2::new(50.0, 60.0));
        assert_eq!(
            kinds(&mut tracker, &touch(7, TouchPhase::Moved, 55.0, 60.0)),
            vec![PointerKind::Move]
        );
        // A lifted finger leaves no pointer to hover with.
        assert_eq!(
            kinds(&mut tracker, &touch(7, TouchPhase::Ended, 55.0, 60.0)),
            vec![PointerKind::Up, PointerKind::Cancel]
        );
    }

    #[test]
    fn test_touch_cancelled_is_a_single_cancel() {
        let mut tracker = PointerTracker::new();
        tracker.handle_event(&touch(1, TouchPhase::Started, 0.0, 0.0)).for_each(drop);
        assert_eq!(
            kinds(&mut tracker, &touch(1, TouchPhase::Cancelled, 0.0, 0.0)),
            vec![PointerKind::Cancel]
        );
    }

    #[test]
    fn test_second_finger_is_ignored() {
        let mut tracker = PointerTracker::new();
        tracker.handle_event(&touch(1, TouchPhase::Started, 10.0, 10.0)).for_each(drop);

        assert!(kinds(&mut tracker, &touch(2, TouchPhase::Started, 90.0, 90.0)).is_empty());
        assert!(kinds(&mut tracker, &touch(2, TouchPhase::Ended, 90.0, 90.0)).is_empty());
        assert_eq!(tracker.position(), Vec2::new(10.0, 10.0));

        // Once the first finger is up, a new one takes over.
        tracker.handle_event(&touch(1, TouchPhase::Ended, 10.0, 10.0)).for_each(drop);
        assert_eq!(
            kinds(&mut tracker, &touch(3, TouchPhase::Started, 30.0, 30.0)),
            vec![PointerKind::Down]
        );
    }
}
