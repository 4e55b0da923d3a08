// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Session engine.
//!
//! This module provides the playback core:
//! - Voice pool and mix bus resources
//! - Per-tick gating sequencer
//! - Spatial panner fed by simulation state
//! - The session state machine that owns all of the above

pub mod bus;
pub mod panner;
pub mod sequencer;
pub mod voice;

pub use bus::{CompressorSettings, MixBus, ReverbSettings, FADE_IN_SECS, MAX_VOLUME_DB};
pub use panner::{pan_for, Body, Position, SimulationState, SpatialPanner, PAN_RANGE};
pub use sequencer::{Sequencer, GATE_RAMP_SECS, INTRO_WINDOW_MEASURES};
pub use voice::{PlaybackState, Voice, VoicePool, SILENCE_DB, UNITY_DB};

use tracing::{debug, info};

use crate::arrangement::{presets, Arrangement};
use crate::audio::{AudioContext, ReadyLoader, SampleLoader, ScheduledCommand, Timeline};
use crate::timing::TransportClock;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No arrangement, no resources
    Idle,
    /// Clock running, sequencer ticking
    Playing,
    /// Clock halted, resources kept for a resume
    Paused,
}

/// Top-level owner of clock, voices, bus, and the active arrangement.
///
/// All session state lives in this one explicitly owned instance;
/// hosts construct it, drive `process` from their scheduling loop,
/// feed `render` from their simulation frames, and issue the
/// play/pause/stop/resume commands.
pub struct Session {
    /// Lifecycle state
    state: SessionState,
    /// Active arrangement while Playing or Paused
    arrangement: Option<Arrangement>,
    /// Ticks since the last full stop
    measure: u64,
    /// Voice pool; present exactly when `bus` is
    voices: Option<VoicePool>,
    /// Mix bus; present exactly when `voices` is
    bus: Option<MixBus>,
    /// Transport clock
    clock: TransportClock,
    /// Command timeline shared by all components
    timeline: Timeline,
    /// Gating sequencer
    sequencer: Sequencer,
    /// Pan mapper
    panner: SpatialPanner,
    /// Autoplay gate
    context: AudioContext,
    /// Stem readiness source
    loader: Box<dyn SampleLoader>,
    /// Arrangement played by `resume`
    default_arrangement: Arrangement,
}

impl Session {
    /// Create an idle session with a nondeterministic gating source
    pub fn new() -> Self {
        Self::with_sequencer(Sequencer::new())
    }

    /// Create an idle session with seeded, reproducible gating
    pub fn with_seed(seed: u64) -> Self {
        Self::with_sequencer(Sequencer::with_seed(seed))
    }

    fn with_sequencer(sequencer: Sequencer) -> Self {
        Self {
            state: SessionState::Idle,
            arrangement: None,
            measure: 0,
            voices: None,
            bus: None,
            clock: TransportClock::default(),
            timeline: Timeline::new(),
            sequencer,
            panner: SpatialPanner,
            context: AudioContext::new(),
            loader: Box::new(ReadyLoader),
            default_arrangement: presets::default_arrangement(),
        }
    }

    /// Replace the stem readiness source
    pub fn set_loader(&mut self, loader: Box<dyn SampleLoader>) {
        self.loader = loader;
    }

    /// Replace the arrangement `resume` starts with
    pub fn set_default_arrangement(&mut self, arrangement: Arrangement) {
        self.default_arrangement = arrangement;
    }

    /// Get the lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Get the measure counter (ticks since the last full stop)
    pub fn measure_counter(&self) -> u64 {
        self.measure
    }

    /// Get the active arrangement
    pub fn arrangement(&self) -> Option<&Arrangement> {
        self.arrangement.as_ref()
    }

    /// Get the voice pool, if a session is built
    pub fn voices(&self) -> Option<&VoicePool> {
        self.voices.as_ref()
    }

    /// Get the mix bus, if a session is built
    pub fn bus(&self) -> Option<&MixBus> {
        self.bus.as_ref()
    }

    /// Start (or resume, or switch to) an arrangement.
    ///
    /// Defers silently while the audio context is suspended. Playing
    /// the arrangement that is already Playing is a no-op; playing a
    /// different one performs a full stop of the old resources first.
    /// A Paused session resumes the same arrangement by restarting
    /// the clock, without rebuilding voices or bus.
    pub fn play(&mut self, arrangement: &Arrangement) {
        if !self.context.is_running() {
            debug!(
                arrangement = arrangement.name(),
                "audio context suspended, deferring play"
            );
            return;
        }

        match self.state {
            SessionState::Playing => {
                if self.arrangement.as_ref() == Some(arrangement) {
                    debug!(arrangement = arrangement.name(), "already playing");
                    return;
                }
                self.stop();
            }
            SessionState::Paused => {
                if self.arrangement.as_ref() == Some(arrangement) {
                    self.clock.start();
                    self.state = SessionState::Playing;
                    info!(arrangement = arrangement.name(), "resumed");
                    return;
                }
                self.stop();
            }
            SessionState::Idle => {}
        }

        let voices = VoicePool::create_for(arrangement);
        let mut bus = MixBus::new();
        bus.initialize(&mut self.timeline);

        self.clock.set_tempo(arrangement.tempo_bpm());
        self.arrangement = Some(arrangement.clone());
        self.voices = Some(voices);
        self.bus = Some(bus);
        self.clock.start();
        self.state = SessionState::Playing;
        info!(
            arrangement = arrangement.name(),
            tempo = arrangement.tempo_bpm(),
            voices = arrangement.voice_count(),
            "playback started"
        );
    }

    /// Halt the clock and audible output, keeping resources
    pub fn pause(&mut self) {
        if self.state != SessionState::Playing {
            return;
        }
        self.clock.stop();
        let now = self.timeline.now();
        if let Some(voices) = self.voices.as_mut() {
            for voice in voices.iter_mut() {
                voice.halt(now, &mut self.timeline);
            }
        }
        self.state = SessionState::Paused;
        info!("paused");
    }

    /// Full stop: cancel pending commands, dispose resources, reset
    /// the measure counter. Idempotent from any state.
    pub fn stop(&mut self) {
        self.clock.stop();
        // Cancel in-flight ramps and pending starts before disposal
        self.timeline.clear();
        if let Some(mut voices) = self.voices.take() {
            voices.dispose_all(&mut self.timeline);
            info!("stopped");
        }
        self.bus = None;
        self.arrangement = None;
        self.measure = 0;
        self.state = SessionState::Idle;
    }

    /// User-interaction entry point: unlock the audio context and
    /// play the default arrangement
    pub fn resume(&mut self) {
        self.context.resume();
        let default = self.default_arrangement.clone();
        self.play(&default);
    }

    /// Feed a simulation snapshot to the spatial panner.
    ///
    /// Independent of ticks; a no-op while no resources exist.
    pub fn render(&mut self, state: &SimulationState) {
        let Some(voices) = self.voices.as_mut() else {
            return;
        };
        self.panner.render(state, voices, &mut self.timeline);
    }

    /// Poll the clock and run the sequencer if a tick is due.
    ///
    /// Returns the measure counter when a tick fired.
    pub fn process(&mut self) -> Option<u64> {
        let now = self.timeline.now();
        let at = self.clock.tick(now)?;
        let arrangement = self.arrangement.as_ref()?;
        let voices = self.voices.as_mut()?;

        self.measure += 1;
        self.sequencer.run_tick(
            self.measure,
            at,
            arrangement,
            voices,
            self.loader.as_ref(),
            &mut self.timeline,
        );
        Some(self.measure)
    }

    /// Seconds until the next tick is due, zero if overdue or stopped
    pub fn time_until_next_tick(&self) -> f64 {
        self.clock.time_until_next_tick(self.timeline.now())
    }

    /// Drain the commands due now for the host audio backend
    pub fn drain_commands(&mut self) -> Vec<ScheduledCommand> {
        self.timeline.poll()
    }

    /// Number of commands still pending on the timeline
    pub fn pending_commands(&self) -> usize {
        self.timeline.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
