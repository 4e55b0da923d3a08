// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Shared mix bus.
//!
//! Every voice routes its pan/gain stage into one fixed downstream
//! chain: reverb, dynamics compressor, master gain. The bus is built
//! once per session and fades the master gain in from silence so
//! playback never starts abruptly. It is only ever torn down by a
//! full stop.

use crate::audio::{AudioCommand, Timeline};
use crate::engine::voice::SILENCE_DB;

/// Maximum master loudness after the fade-in, in dB
pub const MAX_VOLUME_DB: f64 = 24.0;

/// Duration of the one-time master fade-in
pub const FADE_IN_SECS: f64 = 3.0;

/// Reverb stage settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSettings {
    /// Wet/dry mix (0 dry, 1 fully wet)
    pub wet: f64,
    /// Decay time in seconds
    pub decay_secs: f64,
}

impl Default for ReverbSettings {
    fn default() -> Self {
        Self {
            wet: 0.15,
            decay_secs: 0.5,
        }
    }
}

/// Dynamics compressor settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorSettings {
    /// Level above which compression starts, in dB
    pub threshold_db: f64,
    /// Input/output ratio above the threshold
    pub ratio: f64,
    /// Attack time in seconds
    pub attack_secs: f64,
    /// Release time in seconds
    pub release_secs: f64,
    /// Transition width around the threshold, in dB
    pub knee_db: f64,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            threshold_db: -24.0,
            ratio: 12.0,
            attack_secs: 0.003,
            release_secs: 0.25,
            knee_db: 30.0,
        }
    }
}

/// The fixed reverb -> compressor -> master gain chain
#[derive(Debug, Clone)]
pub struct MixBus {
    /// Reverb stage
    reverb: ReverbSettings,
    /// Compressor stage
    compressor: CompressorSettings,
    /// Master gain target in dB
    master_db: f64,
    /// Whether the one-time fade-in has been scheduled
    initialized: bool,
}

impl MixBus {
    /// Create a bus with default stage settings, master at silence
    pub fn new() -> Self {
        Self {
            reverb: ReverbSettings::default(),
            compressor: CompressorSettings::default(),
            master_db: SILENCE_DB,
            initialized: false,
        }
    }

    /// Get the reverb settings
    pub fn reverb(&self) -> ReverbSettings {
        self.reverb
    }

    /// Get the compressor settings
    pub fn compressor(&self) -> CompressorSettings {
        self.compressor
    }

    /// Get the master gain target in dB
    pub fn master_db(&self) -> f64 {
        self.master_db
    }

    /// Build the chain and schedule the one-time fade-in.
    ///
    /// Subsequent calls are no-ops; the bus is never rebuilt
    /// mid-session.
    pub fn initialize(&mut self, timeline: &mut Timeline) {
        if self.initialized {
            return;
        }
        timeline.schedule_now(AudioCommand::BusFade {
            target_db: MAX_VOLUME_DB,
            duration: FADE_IN_SECS,
        });
        self.master_db = MAX_VOLUME_DB;
        self.initialized = true;
    }
}

impl Default for MixBus {
    fn default() -> Self {
        Self::new()
    }
}
