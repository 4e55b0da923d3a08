// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Transport clock implementation.
//!
//! A poll-based clock that fires one tick per fixed musical interval
//! (two measures) at the arrangement's tempo. The clock works in
//! audio-timeline seconds supplied by the caller, so every voice
//! scheduled within one tick shares the same timestamp.

use super::TransportTiming;

/// Transport clock state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    Running,
}

/// Measure-interval tick generator
#[derive(Debug, Clone)]
pub struct TransportClock {
    /// Transport math at the current tempo
    timing: TransportTiming,
    /// Current clock state
    state: ClockState,
    /// Timeline time of the last fired tick
    last_tick: Option<f64>,
}

impl TransportClock {
    /// Create a new clock at the specified tempo
    pub fn new(tempo_bpm: f64) -> Self {
        Self {
            timing: TransportTiming::new(tempo_bpm),
            state: ClockState::Stopped,
            last_tick: None,
        }
    }

    /// Get the current tempo in BPM
    pub fn tempo_bpm(&self) -> f64 {
        self.timing.tempo_bpm
    }

    /// Set the tempo for subsequent ticks
    pub fn set_tempo(&mut self, tempo_bpm: f64) {
        self.timing = TransportTiming::new(tempo_bpm);
    }

    /// Get the current clock state
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Check if the clock is running
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Seconds between ticks at the current tempo
    pub fn tick_interval(&self) -> f64 {
        self.timing.seconds_per_tick()
    }

    /// Start the clock. No-op while already running.
    ///
    /// The first poll after a fresh start fires immediately.
    pub fn start(&mut self) {
        if self.state == ClockState::Running {
            return;
        }
        self.state = ClockState::Running;
        self.last_tick = None;
    }

    /// Stop the clock and reset internal timing. No-op while stopped.
    ///
    /// The measure counter lives in the session, not here; stopping
    /// the clock does not touch it.
    pub fn stop(&mut self) {
        if self.state == ClockState::Stopped {
            return;
        }
        self.state = ClockState::Stopped;
        self.last_tick = None;
    }

    /// Check whether a tick is due at the given timeline time.
    ///
    /// Returns the timestamp at which everything scheduled for this
    /// tick must start, or None if no tick is due.
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        if self.state != ClockState::Running {
            return None;
        }

        match self.last_tick {
            None => {
                self.last_tick = Some(now);
                Some(now)
            }
            Some(last) if now - last >= self.tick_interval() => {
                self.last_tick = Some(now);
                Some(now)
            }
            Some(_) => None,
        }
    }

    /// Seconds until the next tick is due, zero if overdue or stopped
    pub fn time_until_next_tick(&self, now: f64) -> f64 {
        if self.state != ClockState::Running {
            return 0.0;
        }
        match self.last_tick {
            None => 0.0,
            Some(last) => (last + self.tick_interval() - now).max(0.0),
        }
    }
}

impl Default for TransportClock {
    fn default() -> Self {
        Self::new(120.0)
    }
}
