// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Built-in demo arrangements.
//!
//! Three ready-made arrangements with their original stem pools and
//! gating probability tables. `default_arrangement` is the one a
//! session falls back to when resumed from a user interaction.

use super::{Arrangement, Part, SampleRef, Track};

fn track(path: &str, steady: f64, intro: f64) -> Track {
    Track::new(SampleRef::new(path), steady).with_intro(intro)
}

/// Whistle arrangement: 70 BPM, four voices, two parts
pub fn whistle() -> Arrangement {
    let part_a = Part::new(vec![
        track("sound/whistle/whistle_8_T7.mp3", 1.0, 0.0),
        track("sound/whistle/whistle_4_T3.mp3", 0.9, 1.0),
        track("sound/whistle/whistle_7_T6.mp3", 0.7, 1.0),
        track("sound/whistle/whistle_12_T11.mp3", 0.7, 0.0),
    ]);
    let part_b = Part::new(vec![
        track("sound/whistle/whistle_8_T7_B.mp3", 1.0, 0.0),
        track("sound/whistle/whistle_4_T3.mp3", 0.7, 1.0),
        track("sound/whistle/whistle_7_T6.mp3", 0.7, 1.0),
        track("sound/whistle/whistle_12_T11.mp3", 0.7, 0.0),
    ]);

    Arrangement::new("whistle", 70.0, vec![part_a, part_b])
        .expect("preset arrangement is valid")
}

/// Wii arrangement: 70 BPM, six voices, two parts
pub fn wii() -> Arrangement {
    let part_a = Part::new(vec![
        track("sound/wii/wii_2_T1.mp3", 1.0, 0.0),
        track("sound/wii/wii_4_T3.mp3", 0.9, 1.0),
        track("sound/whistle/whistle_7_T6.mp3", 0.7, 1.0),
        track("sound/wii/wii_12_T11.mp3", 0.7, 0.0),
        track("sound/wii/wii_10_T9.mp3", 0.9, 0.0),
        track("sound/wii/wii_T5.mp3", 0.2, 1.0),
    ]);
    let part_b = Part::new(vec![
        track("sound/wii/wii_2_T1.mp3", 1.0, 0.0),
        track("sound/wii/wii_4_T3.mp3", 0.9, 0.0),
        track("sound/wii/wii_8_T7.mp3", 1.0, 1.0),
        track("sound/whistle/whistle_7_T6.mp3", 0.7, 1.0),
        track("sound/wii/wii_12_T11.mp3", 0.8, 0.0),
        track("sound/wii/wii_10_T9.mp3", 0.7, 0.0),
    ]);

    Arrangement::new("wii", 70.0, vec![part_a, part_b]).expect("preset arrangement is valid")
}

/// iPod arrangement: 113 BPM, seven voices, one part
pub fn ipod() -> Arrangement {
    let part = Part::new(vec![
        track("sound/ipod/ipod_2_T1.mp3", 0.9, 0.0),
        track("sound/ipod/ipod_5_T4.mp3", 0.9, 1.0),
        track("sound/ipod/ipod_7_T6.mp3", 0.7, 1.0),
        track("sound/ipod/ipod_8_T7.mp3", 0.7, 0.0),
        track("sound/ipod/ipod_14_FX.mp3", 0.5, 0.0),
        track("sound/ipod/ipod_15_Delay_Reverb.mp3", 1.0, 0.0),
        track("sound/ipod/ipod_hiss.mp3", 0.5, 0.0),
    ]);

    Arrangement::new("ipod", 113.0, vec![part]).expect("preset arrangement is valid")
}

/// The arrangement played by `Session::resume`
pub fn default_arrangement() -> Arrangement {
    ipod()
}

/// All built-in arrangements
pub fn all() -> Vec<Arrangement> {
    vec![whistle(), wii(), ipod()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for arrangement in all() {
            assert!(arrangement.part_count() >= 1);
            assert!(arrangement.tempo_bpm() > 0.0);
            // Validation already ran in the constructor; spot-check the invariant
            for part in arrangement.parts() {
                assert_eq!(part.len(), arrangement.voice_count());
            }
        }
    }

    #[test]
    fn test_preset_shapes() {
        assert_eq!(whistle().voice_count(), 4);
        assert_eq!(whistle().part_count(), 2);
        assert_eq!(wii().voice_count(), 6);
        assert_eq!(ipod().voice_count(), 7);
        assert_eq!(ipod().part_count(), 1);
        assert_eq!(ipod().tempo_bpm(), 113.0);
    }

    #[test]
    fn test_default_arrangement() {
        assert_eq!(default_arrangement(), ipod());
    }
}
