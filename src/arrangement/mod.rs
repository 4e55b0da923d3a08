// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Arrangement data model.
//!
//! An arrangement is an immutable description of a looping piece:
//! a tempo plus an ordered list of parts, where each part assigns
//! one track (stem + gating probabilities) to every voice slot.
//! Arrangements are validated once at construction and never
//! mutated afterwards.

pub mod presets;

use std::fmt;

use thiserror::Error;

/// Opaque handle for a pre-recorded stem.
///
/// The core never interprets the contents; hosts map it to an actual
/// asset (a file path, a URL, a decoder slot).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleRef(String);

impl SampleRef {
    /// Create a sample reference
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validation errors for arrangement data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArrangementError {
    /// Arrangement contains no parts
    #[error("arrangement '{0}' has no parts")]
    NoParts(String),
    /// Tempo is zero, negative, or not finite
    #[error("arrangement '{name}' has invalid tempo {tempo} BPM")]
    InvalidTempo { name: String, tempo: f64 },
    /// A part has a different track count than the first part
    #[error("part {part} has {found} tracks, expected {expected}")]
    UnequalParts {
        part: usize,
        found: usize,
        expected: usize,
    },
    /// A probability lies outside [0, 1]
    #[error("track {track} in part {part} has probability {value} outside [0, 1]")]
    InvalidProbability {
        part: usize,
        track: usize,
        value: f64,
    },
}

/// One musical part's behavior for one voice slot in one loop position
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Stem to load, or None to keep the voice silent this part
    sample: Option<SampleRef>,
    /// Chance the voice is audible on a normal tick
    steady_probability: f64,
    /// Override probability during the intro window, if any
    intro_probability: Option<f64>,
}

impl Track {
    /// Create a track playing the given stem
    pub fn new(sample: SampleRef, steady_probability: f64) -> Self {
        Self {
            sample: Some(sample),
            steady_probability,
            intro_probability: None,
        }
    }

    /// Create a track with no stem (the voice stays silent)
    pub fn silent() -> Self {
        Self {
            sample: None,
            steady_probability: 0.0,
            intro_probability: None,
        }
    }

    /// Builder: set the intro-window probability
    pub fn with_intro(mut self, probability: f64) -> Self {
        self.intro_probability = Some(probability);
        self
    }

    /// Get the stem reference
    pub fn sample(&self) -> Option<&SampleRef> {
        self.sample.as_ref()
    }

    /// Get the steady-state gating probability
    pub fn steady_probability(&self) -> f64 {
        self.steady_probability
    }

    /// Get the intro-window gating probability
    pub fn intro_probability(&self) -> Option<f64> {
        self.intro_probability
    }

    /// Probability to gate against for a tick.
    ///
    /// Inside the intro window a defined intro probability overrides
    /// the steady one; everywhere else the steady probability applies.
    pub fn effective_probability(&self, in_intro: bool) -> f64 {
        if in_intro {
            self.intro_probability.unwrap_or(self.steady_probability)
        } else {
            self.steady_probability
        }
    }
}

/// An ordered set of tracks, one per voice slot
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    tracks: Vec<Track>,
}

impl Part {
    /// Create a part from its tracks
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Get all tracks
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Get the track for a voice slot
    pub fn track(&self, slot: usize) -> Option<&Track> {
        self.tracks.get(slot)
    }

    /// Number of voice slots this part covers
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the part has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// A complete, validated arrangement
///
/// Invariants held after construction: at least one part, all parts
/// of equal length, finite positive tempo, probabilities in [0, 1].
/// The length of the first part fixes the voice count for any session
/// playing this arrangement.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    /// Arrangement name
    name: String,
    /// Tempo in BPM
    tempo_bpm: f64,
    /// Parts stepped through in order, wrapping indefinitely
    parts: Vec<Part>,
}

impl Arrangement {
    /// Build a validated arrangement, rejecting malformed data
    pub fn new(
        name: impl Into<String>,
        tempo_bpm: f64,
        parts: Vec<Part>,
    ) -> Result<Self, ArrangementError> {
        let name = name.into();

        if parts.is_empty() {
            return Err(ArrangementError::NoParts(name));
        }
        if !tempo_bpm.is_finite() || tempo_bpm <= 0.0 {
            return Err(ArrangementError::InvalidTempo {
                name,
                tempo: tempo_bpm,
            });
        }

        let expected = parts[0].len();
        for (part_index, part) in parts.iter().enumerate() {
            if part.len() != expected {
                return Err(ArrangementError::UnequalParts {
                    part: part_index,
                    found: part.len(),
                    expected,
                });
            }
            for (track_index, track) in part.tracks().iter().enumerate() {
                let mut probabilities = vec![track.steady_probability()];
                if let Some(intro) = track.intro_probability() {
                    probabilities.push(intro);
                }
                for value in probabilities {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(ArrangementError::InvalidProbability {
                            part: part_index,
                            track: track_index,
                            value,
                        });
                    }
                }
            }
        }

        Ok(Self {
            name,
            tempo_bpm,
            parts,
        })
    }

    /// Get the arrangement name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the tempo in BPM
    pub fn tempo_bpm(&self) -> f64 {
        self.tempo_bpm
    }

    /// Get all parts
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Number of parts in the loop
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Number of voices a session playing this arrangement needs
    pub fn voice_count(&self) -> usize {
        self.parts[0].len()
    }

    /// Part selected for a given measure counter value (circular)
    pub fn part_for_measure(&self, measure: u64) -> &Part {
        &self.parts[(measure % self.parts.len() as u64) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_part_arrangement() -> Arrangement {
        let part_a = Part::new(vec![
            Track::new(SampleRef::new("a0"), 1.0).with_intro(0.0),
            Track::new(SampleRef::new("a1"), 0.9),
        ]);
        let part_b = Part::new(vec![
            Track::new(SampleRef::new("b0"), 0.7).with_intro(1.0),
            Track::silent(),
        ]);
        Arrangement::new("test", 70.0, vec![part_a, part_b]).unwrap()
    }

    #[test]
    fn test_arrangement_construction() {
        let arr = two_part_arrangement();
        assert_eq!(arr.name(), "test");
        assert_eq!(arr.tempo_bpm(), 70.0);
        assert_eq!(arr.part_count(), 2);
        assert_eq!(arr.voice_count(), 2);
    }

    #[test]
    fn test_rejects_empty_parts() {
        let result = Arrangement::new("empty", 120.0, Vec::new());
        assert_eq!(result.unwrap_err(), ArrangementError::NoParts("empty".into()));
    }

    #[test]
    fn test_rejects_nonpositive_tempo() {
        let part = Part::new(vec![Track::silent()]);
        assert!(matches!(
            Arrangement::new("bad", 0.0, vec![part.clone()]),
            Err(ArrangementError::InvalidTempo { .. })
        ));
        assert!(matches!(
            Arrangement::new("bad", -70.0, vec![part.clone()]),
            Err(ArrangementError::InvalidTempo { .. })
        ));
        assert!(matches!(
            Arrangement::new("bad", f64::NAN, vec![part]),
            Err(ArrangementError::InvalidTempo { .. })
        ));
    }

    #[test]
    fn test_rejects_unequal_part_lengths() {
        let part_a = Part::new(vec![Track::silent(), Track::silent()]);
        let part_b = Part::new(vec![Track::silent()]);
        let result = Arrangement::new("uneven", 120.0, vec![part_a, part_b]);
        assert_eq!(
            result.unwrap_err(),
            ArrangementError::UnequalParts {
                part: 1,
                found: 1,
                expected: 2,
            }
        );
    }

    #[test]
    fn test_rejects_out_of_range_probability() {
        let part = Part::new(vec![Track::new(SampleRef::new("x"), 1.5)]);
        assert!(matches!(
            Arrangement::new("bad", 120.0, vec![part]),
            Err(ArrangementError::InvalidProbability { .. })
        ));

        let part = Part::new(vec![Track::new(SampleRef::new("x"), 0.5).with_intro(-0.1)]);
        assert!(matches!(
            Arrangement::new("bad", 120.0, vec![part]),
            Err(ArrangementError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn test_effective_probability() {
        let track = Track::new(SampleRef::new("x"), 0.9).with_intro(0.2);
        assert_eq!(track.effective_probability(true), 0.2);
        assert_eq!(track.effective_probability(false), 0.9);

        // No intro probability defined: steady applies everywhere
        let track = Track::new(SampleRef::new("x"), 0.9);
        assert_eq!(track.effective_probability(true), 0.9);
        assert_eq!(track.effective_probability(false), 0.9);
    }

    #[test]
    fn test_part_for_measure_wraps() {
        let arr = two_part_arrangement();
        assert_eq!(arr.part_for_measure(0), &arr.parts()[0]);
        assert_eq!(arr.part_for_measure(1), &arr.parts()[1]);
        assert_eq!(arr.part_for_measure(2), &arr.parts()[0]);
        assert_eq!(arr.part_for_measure(101), &arr.parts()[1]);
    }

    #[test]
    fn test_sample_ref_display() {
        let sample = SampleRef::new("sound/whistle/whistle_8_T7.mp3");
        assert_eq!(sample.to_string(), "sound/whistle/whistle_8_T7.mp3");
        assert_eq!(sample.as_str(), "sound/whistle/whistle_8_T7.mp3");
    }
}
