// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Voices and the voice pool.
//!
//! A voice owns one sample-playback slot plus its pan/gain controls.
//! Voices hold no sequencing logic; they track what is loaded and how
//! loud/panned it is, and emit timeline commands when instructed.

use crate::arrangement::{Arrangement, SampleRef};
use crate::audio::{AudioCommand, Timeline};

/// Gain value treated as silence
pub const SILENCE_DB: f64 = f64::NEG_INFINITY;

/// Gain value for full (unity) loudness
pub const UNITY_DB: f64 = 0.0;

/// Playback state of a voice's sample player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Not producing sound
    Stopped,
    /// Sample loaded, waiting for a start
    Loaded,
    /// Started on the timeline
    Playing,
}

/// One sample-playback unit with pan and gain controls
#[derive(Debug, Clone)]
pub struct Voice {
    /// Slot index within the pool
    slot: usize,
    /// Currently loaded stem, if any
    sample: Option<SampleRef>,
    /// Current pan target (-1 hard left, +1 hard right)
    pan: f64,
    /// Current gain target in dB
    gain_db: f64,
    /// Player state
    playback: PlaybackState,
}

impl Voice {
    /// Create a voice for a slot, silent, with an optional initial stem
    pub fn new(slot: usize, sample: Option<SampleRef>) -> Self {
        Self {
            slot,
            sample,
            pan: 0.0,
            gain_db: SILENCE_DB,
            playback: PlaybackState::Stopped,
        }
    }

    /// Get the slot index
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Get the currently loaded stem
    pub fn sample(&self) -> Option<&SampleRef> {
        self.sample.as_ref()
    }

    /// Get the current pan target
    pub fn pan(&self) -> f64 {
        self.pan
    }

    /// Get the current gain target in dB
    pub fn gain_db(&self) -> f64 {
        self.gain_db
    }

    /// Get the player state
    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    /// Instruct the player to load a stem for this tick
    pub fn load(&mut self, sample: SampleRef, at: f64, timeline: &mut Timeline) {
        timeline.schedule(
            at,
            AudioCommand::LoadSample {
                slot: self.slot,
                sample: sample.clone(),
            },
        );
        self.sample = Some(sample);
        if self.playback == PlaybackState::Stopped {
            self.playback = PlaybackState::Loaded;
        }
    }

    /// Instruct the player to stop producing sound (no sample swap)
    pub fn halt(&mut self, at: f64, timeline: &mut Timeline) {
        timeline.schedule(at, AudioCommand::StopPlayback { slot: self.slot });
        self.playback = PlaybackState::Stopped;
    }

    /// Start playback at a timeline timestamp.
    ///
    /// A voice that was just told to stop ignores the start; its gain
    /// ramp still applies without erroring on the stopped player.
    pub fn start_at(&mut self, at: f64, timeline: &mut Timeline) {
        if self.playback == PlaybackState::Stopped {
            return;
        }
        timeline.schedule(at, AudioCommand::StartPlayback { slot: self.slot });
        self.playback = PlaybackState::Playing;
    }

    /// Ramp the gain toward a target over a duration
    pub fn ramp_gain(&mut self, target_db: f64, duration: f64, at: f64, timeline: &mut Timeline) {
        timeline.schedule(
            at,
            AudioCommand::RampGain {
                slot: self.slot,
                target_db,
                duration,
            },
        );
        self.gain_db = target_db;
    }

    /// Ramp the pan toward a target over a duration, starting now
    pub fn ramp_pan(&mut self, target: f64, duration: f64, timeline: &mut Timeline) {
        timeline.schedule_now(AudioCommand::RampPan {
            slot: self.slot,
            target,
            duration,
        });
        self.pan = target;
    }

    /// Check if the voice is currently producing audible sound
    pub fn is_audible(&self) -> bool {
        self.playback == PlaybackState::Playing && self.gain_db > SILENCE_DB
    }

    /// Release playback and control resources
    pub fn dispose(&mut self, timeline: &mut Timeline) {
        timeline.schedule_now(AudioCommand::StopPlayback { slot: self.slot });
        timeline.schedule_now(AudioCommand::DisposeVoice { slot: self.slot });
        self.playback = PlaybackState::Stopped;
        self.sample = None;
    }
}

/// Fixed-size ordered collection of voices, one per track slot
#[derive(Debug, Clone, Default)]
pub struct VoicePool {
    voices: Vec<Voice>,
}

impl VoicePool {
    /// Build one voice per track slot of the arrangement's first part,
    /// each initialized to silence
    pub fn create_for(arrangement: &Arrangement) -> Self {
        let voices = arrangement.parts()[0]
            .tracks()
            .iter()
            .enumerate()
            .map(|(slot, track)| Voice::new(slot, track.sample().cloned()))
            .collect();
        Self { voices }
    }

    /// Number of voices
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// Check if the pool holds no voices
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Bounds-checked voice accessor
    pub fn voice_at(&self, slot: usize) -> Option<&Voice> {
        self.voices.get(slot)
    }

    /// Bounds-checked mutable voice accessor
    pub fn voice_at_mut(&mut self, slot: usize) -> Option<&mut Voice> {
        self.voices.get_mut(slot)
    }

    /// Iterate over voices
    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    /// Iterate mutably over voices
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.voices.iter_mut()
    }

    /// Number of currently audible voices
    pub fn audible_count(&self) -> usize {
        self.voices.iter().filter(|voice| voice.is_audible()).count()
    }

    /// Release every voice's resources. Safe on an empty pool.
    pub fn dispose_all(&mut self, timeline: &mut Timeline) {
        for voice in &mut self.voices {
            voice.dispose(timeline);
        }
        self.voices.clear();
    }
}
