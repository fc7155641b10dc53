//! Per-body highlight pulse.
//!
//! A hovered body glows at a fixed peak intensity. When the pointer leaves
//! it, the glow fades linearly back to the body's own intensity over a fixed
//! duration, after which the body is idle again. Hovering a fading body
//! cancels the fade and puts it straight back at the peak.
//!
//! ```text
//! Idle ──enter──▶ Highlighted ──leave──▶ Decaying ──(progress = 1)──▶ Idle
//!                     ▲                     │
//!                     └────────enter────────┘
//! ```

/// Highlight phase of one body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum HighlightState {
    #[default]
    Idle,
    Highlighted,
    /// Fading since `start` seconds.
    Decaying { start: f32 },
}

/// Fade progress in `[0, 1]` for a decay that began at `start`.
///
/// A zero duration completes immediately.
pub fn decay_progress(start: f32, duration: f32, now: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    ((now - start) / duration).clamp(0.0, 1.0)
}

/// Intensity at `progress` along the fade from `peak` to `base`.
///
/// Returns exactly `base` once the fade is complete.
pub fn decay_intensity(peak: f32, base: f32, progress: f32) -> f32 {
    if progress >= 1.0 {
        base
    } else {
        peak + (base - peak) * progress.max(0.0)
    }
}

/// Timed highlight state for every body, indexed like the physics world.
#[derive(Clone, Debug)]
pub struct HighlightAnimator {
    states: Vec<HighlightState>,
    peak: f32,
    duration: f32,
}

impl HighlightAnimator {
    pub fn new(peak: f32, duration: f32) -> Self {
        Self {
            states: Vec::new(),
            peak,
            duration,
        }
    }

    #[inline]
    pub fn peak(&self) -> f32 {
        self.peak
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Drop all state and track `count` idle bodies.
    pub fn reset(&mut self, count: usize) {
        self.states.clear();
        self.states.resize(count, HighlightState::Idle);
    }

    /// Track one more idle body.
    pub fn push(&mut self) {
        self.states.push(HighlightState::Idle);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, index: usize) -> Option<HighlightState> {
        self.states.get(index).copied()
    }

    /// Number of bodies that are not idle.
    pub fn active(&self) -> usize {
        self.states
            .iter()
            .filter(|s| **s != HighlightState::Idle)
            .count()
    }

    /// Pointer entered a body.
    ///
    /// Returns `true` if the body just became highlighted and should be set
    /// to the peak appearance. An already highlighted body is left alone.
    pub fn enter(&mut self, index: usize) -> bool {
        let Some(state) = self.states.get_mut(index) else {
            return false;
        };
        match *state {
            HighlightState::Idle | HighlightState::Decaying { .. } => {
                *state = HighlightState::Highlighted;
                true
            }
            HighlightState::Highlighted => false,
        }
    }

    /// Pointer left a body at time `now`. Starts the fade if highlighted.
    pub fn leave(&mut self, index: usize, now: f32) -> bool {
        match self.states.get_mut(index) {
            Some(state) if *state == HighlightState::Highlighted => {
                *state = HighlightState::Decaying { start: now };
                true
            }
            _ => false,
        }
    }

    /// Intensity of body `index` at time `now`, given its resting `base`.
    ///
    /// Pure: sampling twice at the same time gives the same value.
    pub fn sample(&self, index: usize, base: f32, now: f32) -> f32 {
        match self.state(index) {
            Some(HighlightState::Highlighted) => self.peak,
            Some(HighlightState::Decaying { start }) => {
                decay_intensity(self.peak, base, decay_progress(start, self.duration, now))
            }
            _ => base,
        }
    }

    /// Step every fading body to time `now`.
    ///
    /// `base_of` gives a body's resting intensity; `apply` receives the
    /// intensity to show. Bodies whose fade completes get their base
    /// intensity and return to idle.
    pub fn advance<B, F>(&mut self, now: f32, base_of: B, mut apply: F)
    where
        B: Fn(usize) -> f32,
        F: FnMut(usize, f32),
    {
        for (index, state) in self.states.iter_mut().enumerate() {
            if let HighlightState::Decaying { start } = *state {
                let base = base_of(index);
                let progress = decay_progress(start, self.duration, now);
                apply(index, decay_intensity(self.peak, base, progress));
                if progress >= 1.0 {
                    *state = HighlightState::Idle;
                }
            }
        }
    }
}
