// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Spatial panning from simulation state.
//!
//! Maps the horizontal position of each simulated body onto the pan
//! control of the voice with the same index. Runs on the caller's
//! cadence (typically a simulation frame), fully independent of
//! sequencer ticks; the panner writes only pan, never gain.

use tracing::warn;

use crate::audio::Timeline;
use crate::engine::voice::VoicePool;

/// Total pan span; 2.0 would allow hard left/right panning
pub const PAN_RANGE: f64 = 1.6;

/// Duration of pan ramps
pub const PAN_RAMP_SECS: f64 = 0.1;

/// A 2D position reported by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One simulated body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Current position
    pub position: Position,
}

impl Body {
    /// Create a body at an x position
    pub fn at_x(x: f64) -> Self {
        Self {
            position: Position { x, y: 0.0 },
        }
    }
}

/// Snapshot of the simulation fed to `render`
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Bodies in index-aligned correspondence with voice slots
    pub bodies: Vec<Body>,
    /// Current viewport width in the same units as positions
    pub viewport_width: f64,
}

/// Map an x position to a pan value
pub fn pan_for(x: f64, viewport_width: f64) -> f64 {
    let x_factor = x / viewport_width;
    x_factor * PAN_RANGE - PAN_RANGE / 2.0
}

/// Continuous pan re-targeting from body positions
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatialPanner;

impl SpatialPanner {
    /// Re-target each voice's pan from the body with the same index.
    ///
    /// Voice slots with no corresponding body keep their current pan;
    /// extra bodies beyond the pool size are ignored.
    pub fn render(&self, state: &SimulationState, voices: &mut VoicePool, timeline: &mut Timeline) {
        if state.viewport_width <= 0.0 {
            warn!(
                viewport_width = state.viewport_width,
                "ignoring render with non-positive viewport width"
            );
            return;
        }

        for (slot, body) in state.bodies.iter().enumerate() {
            let Some(voice) = voices.voice_at_mut(slot) else {
                break;
            };
            let pan = pan_for(body.position.x, state.viewport_width);
            voice.ramp_pan(pan, PAN_RAMP_SECS, timeline);
        }
    }
}
