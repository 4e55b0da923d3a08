// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Transport timing module.
//!
//! Provides the measure-based transport math and the clock that
//! drives sequencer ticks.

pub mod clock;

pub use clock::{ClockState, TransportClock};

/// Beats per measure (the engine runs in common time)
pub const BEATS_PER_MEASURE: u32 = 4;

/// Measures covered by a single sequencer tick
pub const MEASURES_PER_TICK: u32 = 2;

/// Transport math for a fixed tempo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportTiming {
    /// Tempo in BPM
    pub tempo_bpm: f64,
}

impl TransportTiming {
    /// Create timing for the given tempo
    pub fn new(tempo_bpm: f64) -> Self {
        Self { tempo_bpm }
    }

    /// Seconds one measure lasts at this tempo
    pub fn seconds_per_measure(&self) -> f64 {
        BEATS_PER_MEASURE as f64 * 60.0 / self.tempo_bpm
    }

    /// Seconds between sequencer ticks (two measures)
    pub fn seconds_per_tick(&self) -> f64 {
        self.seconds_per_measure() * MEASURES_PER_TICK as f64
    }
}

impl Default for TransportTiming {
    fn default() -> Self {
        Self::new(120.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_per_measure() {
        let timing = TransportTiming::new(120.0);
        // 4 beats at 120 BPM = 2 seconds
        assert!((timing.seconds_per_measure() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_seconds_per_tick() {
        // 70 BPM: one measure = 240/70 s, tick = two measures
        let timing = TransportTiming::new(70.0);
        assert!((timing.seconds_per_tick() - 480.0 / 70.0).abs() < 1e-9);

        let timing = TransportTiming::default();
        assert!((timing.seconds_per_tick() - 4.0).abs() < 1e-9);
    }
}
