//! Cancelable frame loop on top of a host scheduler.
//!
//! The host owns the display refresh. A [`FrameScheduler`] asks it for one
//! callback at a time; [`FrameLoop`] keeps at most one request in flight and
//! re-requests after every frame it runs. Stopping the loop sets a shared
//! [`CancelFlag`] and cancels the pending request. A callback that the host
//! had already queued still arrives, finds the flag set, and does nothing.

use std::cell::Cell;
use std::rc::Rc;

/// Identifies one frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Host frame-scheduling primitive.
pub trait FrameScheduler {
    /// Ask for one frame callback.
    fn request_frame(&mut self) -> FrameToken;

    /// Withdraw a request made with [`request_frame`](Self::request_frame).
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Shared stop signal, checked at the top of every frame.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Rc<Cell<bool>>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Drives frames through a [`FrameScheduler`] until stopped.
#[derive(Debug)]
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameToken>,
    cancel: CancelFlag,
    frames_run: u64,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            cancel: CancelFlag::new(),
            frames_run: 0,
        }
    }

    /// Request the first frame. Does nothing once stopped or while a request
    /// is already pending.
    pub fn start(&mut self) {
        if self.cancel.is_cancelled() || self.pending.is_some() {
            return;
        }
        self.pending = Some(self.scheduler.request_frame());
    }

    /// Host callback for the pending request.
    ///
    /// Runs `frame` and requests the next one. Returns `false` without
    /// running anything if the loop was stopped or nothing was requested.
    pub fn fire<F: FnOnce()>(&mut self, frame: F) -> bool {
        if self.cancel.is_cancelled() || self.pending.take().is_none() {
            return false;
        }

        frame();
        self.frames_run += 1;

        // The frame itself may have stopped the loop.
        if !self.cancel.is_cancelled() {
            self.pending = Some(self.scheduler.request_frame());
        }
        true
    }

    /// Stop for good. No frame runs after this returns.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel_frame(token);
        }
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Handle that stops the loop at its next frame boundary.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
