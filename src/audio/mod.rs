// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Audio-facing seams of the engine.
//!
//! This module provides:
//! - The audio context gate (playback must be unlocked from a user
//!   interaction before anything is audible)
//! - The sample loader seam hosts implement to report stem readiness
//! - The command timeline the engine schedules against

pub mod timeline;

pub use timeline::{AudioCommand, ScheduledCommand, Timeline};

use crate::arrangement::SampleRef;

/// Audio context state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Playback not yet permitted; play requests defer
    Suspended,
    /// Playback unlocked by a user interaction
    Running,
}

/// Gate modeling the host audio context's autoplay restriction.
///
/// A context starts suspended. `resume` must be called from a
/// user-interaction path before the session will act on `play`.
#[derive(Debug, Clone)]
pub struct AudioContext {
    state: ContextState,
}

impl AudioContext {
    /// Create a suspended context
    pub fn new() -> Self {
        Self {
            state: ContextState::Suspended,
        }
    }

    /// Get the current state
    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Check if playback is permitted
    pub fn is_running(&self) -> bool {
        self.state == ContextState::Running
    }

    /// Unlock playback. Idempotent.
    pub fn resume(&mut self) {
        self.state = ContextState::Running;
    }
}

impl Default for AudioContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Readiness of a stem as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Decoded and ready to start
    Ready,
    /// Still loading; treat as absent for this tick
    Pending,
    /// Failed to load; treat as absent for this tick
    Failed,
}

/// Host seam reporting whether stems are ready to play.
///
/// A stem that is not ready is skipped for the tick in question; the
/// session and the other voices carry on.
pub trait SampleLoader {
    /// Report the readiness of a stem
    fn status(&self, sample: &SampleRef) -> LoadStatus;
}

/// Loader that reports every stem ready.
///
/// Default for hosts that resolve assets ahead of time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadyLoader;

impl SampleLoader for ReadyLoader {
    fn status(&self, _sample: &SampleRef) -> LoadStatus {
        LoadStatus::Ready
    }
}
