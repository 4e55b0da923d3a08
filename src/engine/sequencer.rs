// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Per-tick sequencing logic.
//!
//! On every transport tick the sequencer walks the voice pool once:
//! it selects the part for the current measure counter, swaps or
//! stops each voice's stem, draws a fresh Bernoulli gate per voice,
//! and schedules the resulting gain ramps and sample-accurate starts
//! on the timeline. Gating has no memory: each tick re-randomizes
//! every voice independently.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::arrangement::Arrangement;
use crate::audio::{LoadStatus, SampleLoader, Timeline};
use crate::engine::voice::{VoicePool, SILENCE_DB, UNITY_DB};

/// Duration of the gating gain ramps
pub const GATE_RAMP_SECS: f64 = 0.1;

/// Last measure counter value inside the intro window
pub const INTRO_WINDOW_MEASURES: u64 = 2;

/// Probabilistic gate and part stepper
pub struct Sequencer {
    /// Random source for gating draws
    rng: StdRng,
}

impl Sequencer {
    /// Create a sequencer with a nondeterministic random source
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a sequencer with a seeded random source, for
    /// reproducible gating
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Run one tick.
    ///
    /// `measure` is the session's measure counter, already
    /// incremented for this tick; `at` is the timeline timestamp at
    /// which every voice in this tick starts.
    pub fn run_tick(
        &mut self,
        measure: u64,
        at: f64,
        arrangement: &Arrangement,
        voices: &mut VoicePool,
        loader: &dyn SampleLoader,
        timeline: &mut Timeline,
    ) {
        let part = arrangement.part_for_measure(measure);
        let in_intro = measure <= INTRO_WINDOW_MEASURES;
        debug!(
            measure,
            part_index = (measure % arrangement.part_count() as u64),
            in_intro,
            "sequencer tick"
        );

        for slot in 0..voices.len() {
            let Some(track) = part.track(slot) else {
                break;
            };
            let Some(voice) = voices.voice_at_mut(slot) else {
                break;
            };

            match track.sample() {
                Some(sample) if loader.status(sample) == LoadStatus::Ready => {
                    voice.load(sample.clone(), at, timeline);
                }
                Some(sample) => {
                    warn!(slot, sample = %sample, "stem not ready, skipping voice this tick");
                    voice.halt(at, timeline);
                }
                None => {
                    voice.halt(at, timeline);
                }
            }

            // Randomly mute some voices, but keep most on. Fresh
            // independent draw every tick.
            let probability = track.effective_probability(in_intro);
            let draw: f64 = self.rng.gen();
            if draw > probability {
                voice.ramp_gain(SILENCE_DB, GATE_RAMP_SECS, at, timeline);
            } else {
                voice.ramp_gain(UNITY_DB, GATE_RAMP_SECS, at, timeline);
            }

            voice.start_at(at, timeline);
        }
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::{Part, SampleRef, Track};
    use crate::audio::{AudioCommand, ReadyLoader};

    fn arrangement_with(parts: Vec<Part>) -> Arrangement {
        Arrangement::new("test", 70.0, parts).unwrap()
    }

    /// Two 4-track parts: steady always-on, intro always-off
    fn intro_arrangement() -> Arrangement {
        let part = |prefix: &str| {
            Part::new(
                (0..4)
                    .map(|i| {
                        Track::new(SampleRef::new(format!("{prefix}{i}")), 1.0).with_intro(0.0)
                    })
                    .collect(),
            )
        };
        arrangement_with(vec![part("a"), part("b")])
    }

    fn tick(sequencer: &mut Sequencer, measure: u64, arrangement: &Arrangement) -> VoicePool {
        let mut voices = VoicePool::create_for(arrangement);
        let mut timeline = Timeline::new();
        sequencer.run_tick(
            measure,
            0.0,
            arrangement,
            &mut voices,
            &ReadyLoader,
            &mut timeline,
        );
        voices
    }

    #[test]
    fn test_intro_window_uses_intro_probability() {
        let arrangement = intro_arrangement();
        let mut sequencer = Sequencer::with_seed(7);

        // Intro probability 0.0: every voice muted on measures 1 and 2,
        // whatever the random draws are
        for measure in [1, 2] {
            let voices = tick(&mut sequencer, measure, &arrangement);
            assert_eq!(voices.audible_count(), 0, "measure {measure}");
        }
    }

    #[test]
    fn test_steady_probability_after_intro_window() {
        let arrangement = intro_arrangement();
        let mut sequencer = Sequencer::with_seed(7);

        // Steady probability 1.0: every voice audible from measure 3 on,
        // even though intro probabilities are still defined
        for measure in [3, 4, 250] {
            let voices = tick(&mut sequencer, measure, &arrangement);
            assert_eq!(voices.audible_count(), 4, "measure {measure}");
        }
    }

    #[test]
    fn test_part_selection_is_modular() {
        let part_a = Part::new(vec![Track::new(SampleRef::new("a"), 1.0)]);
        let part_b = Part::new(vec![Track::new(SampleRef::new("b"), 1.0)]);
        let arrangement = arrangement_with(vec![part_a, part_b]);
        let mut sequencer = Sequencer::with_seed(0);

        for measure in 1..=6 {
            let voices = tick(&mut sequencer, measure, &arrangement);
            let expected = if measure % 2 == 0 { "a" } else { "b" };
            assert_eq!(
                voices.voice_at(0).unwrap().sample().unwrap().as_str(),
                expected,
                "measure {measure}"
            );
        }
    }

    #[test]
    fn test_absent_sample_stops_voice_but_still_ramps() {
        let part = Part::new(vec![Track::silent()]);
        let arrangement = arrangement_with(vec![part]);
        let mut sequencer = Sequencer::with_seed(0);

        let mut voices = VoicePool::create_for(&arrangement);
        let mut timeline = Timeline::new();
        sequencer.run_tick(5, 0.0, &arrangement, &mut voices, &ReadyLoader, &mut timeline);

        assert_eq!(voices.audible_count(), 0);
        let commands = timeline.poll_until(f64::MAX);
        assert!(commands
            .iter()
            .any(|c| matches!(c.command, AudioCommand::StopPlayback { slot: 0 })));
        assert!(commands
            .iter()
            .any(|c| matches!(c.command, AudioCommand::RampGain { slot: 0, .. })));
        assert!(!commands
            .iter()
            .any(|c| matches!(c.command, AudioCommand::StartPlayback { .. })));
    }

    #[test]
    fn test_unready_sample_skips_voice_without_aborting_others() {
        struct FlakyLoader;
        impl SampleLoader for FlakyLoader {
            fn status(&self, sample: &SampleRef) -> LoadStatus {
                if sample.as_str() == "broken" {
                    LoadStatus::Failed
                } else {
                    LoadStatus::Ready
                }
            }
        }

        let part = Part::new(vec![
            Track::new(SampleRef::new("broken"), 1.0),
            Track::new(SampleRef::new("fine"), 1.0),
        ]);
        let arrangement = arrangement_with(vec![part]);
        let mut sequencer = Sequencer::with_seed(0);

        let mut voices = VoicePool::create_for(&arrangement);
        let mut timeline = Timeline::new();
        sequencer.run_tick(5, 0.0, &arrangement, &mut voices, &FlakyLoader, &mut timeline);

        assert!(!voices.voice_at(0).unwrap().is_audible());
        assert!(voices.voice_at(1).unwrap().is_audible());
    }

    #[test]
    fn test_audible_count_bounded_by_part_length() {
        let arrangement = crate::arrangement::presets::wii();
        let mut sequencer = Sequencer::with_seed(42);

        for measure in 1..=20 {
            let voices = tick(&mut sequencer, measure, &arrangement);
            assert!(voices.audible_count() <= arrangement.part_for_measure(measure).len());
        }
    }

    #[test]
    fn test_seeded_gating_is_reproducible() {
        let arrangement = crate::arrangement::presets::ipod();

        let run = || {
            let mut sequencer = Sequencer::with_seed(1234);
            (1..=10)
                .map(|measure| {
                    tick(&mut sequencer, measure, &arrangement)
                        .iter()
                        .map(|voice| voice.is_audible())
                        .collect::<Vec<bool>>()
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_all_starts_share_the_tick_timestamp() {
        let arrangement = crate::arrangement::presets::whistle();
        let mut sequencer = Sequencer::with_seed(9);
        let mut voices = VoicePool::create_for(&arrangement);
        let mut timeline = Timeline::new();

        sequencer.run_tick(3, 17.5, &arrangement, &mut voices, &ReadyLoader, &mut timeline);

        let starts: Vec<f64> = timeline
            .poll_until(f64::MAX)
            .iter()
            .filter(|c| matches!(c.command, AudioCommand::StartPlayback { .. }))
            .map(|c| c.time)
            .collect();
        assert!(!starts.is_empty());
        assert!(starts.iter().all(|&t| t == 17.5));
    }
}
