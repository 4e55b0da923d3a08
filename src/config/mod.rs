// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for STEMSEQ.
//!
//! This module provides the on-disk YAML schema for arrangements and
//! the conversion into validated `Arrangement` records. Malformed
//! files are rejected here, at load time, never mid-playback.

pub mod watcher;

pub use watcher::{ConfigEvent, ConfigWatcher, validate_config};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::arrangement::{Arrangement, Part, SampleRef, Track};

/// Root configuration for an arrangement file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArrangementFile {
    /// Arrangement metadata and settings
    pub arrangement: ArrangementConfig,
    /// Parts, outermost to innermost: part -> voice slot -> track
    #[serde(default)]
    pub parts: Vec<Vec<TrackConfig>>,
}

impl ArrangementFile {
    /// Load an arrangement configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse an arrangement configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Convert into a validated arrangement
    pub fn into_arrangement(self) -> Result<Arrangement> {
        let name = self.arrangement.name.clone();
        let parts = self
            .parts
            .into_iter()
            .map(|tracks| Part::new(tracks.into_iter().map(TrackConfig::into_track).collect()))
            .collect();
        Arrangement::new(name.clone(), self.arrangement.tempo, parts)
            .with_context(|| format!("Invalid arrangement '{}'", name))
    }

    /// Build the file representation of an arrangement
    pub fn from_arrangement(arrangement: &Arrangement) -> Self {
        Self {
            arrangement: ArrangementConfig {
                name: arrangement.name().to_string(),
                tempo: arrangement.tempo_bpm(),
            },
            parts: arrangement
                .parts()
                .iter()
                .map(|part| part.tracks().iter().map(TrackConfig::from_track).collect())
                .collect(),
        }
    }
}

/// Arrangement-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArrangementConfig {
    /// Arrangement name
    pub name: String,
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo: f64,
}

fn default_tempo() -> f64 {
    120.0
}
fn default_probability() -> f64 {
    1.0
}

impl Default for ArrangementConfig {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            tempo: default_tempo(),
        }
    }
}

/// Track configuration for one voice slot in one part
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackConfig {
    /// Stem reference; omit for a silent slot
    #[serde(default)]
    pub sample: Option<String>,
    /// Steady-state gating probability
    #[serde(default = "default_probability")]
    pub probability: f64,
    /// Intro-window gating probability override
    #[serde(default)]
    pub intro_probability: Option<f64>,
}

impl TrackConfig {
    fn into_track(self) -> Track {
        let mut track = match self.sample {
            Some(sample) => Track::new(SampleRef::new(sample), self.probability),
            None => Track::silent(),
        };
        if let Some(intro) = self.intro_probability {
            track = track.with_intro(intro);
        }
        track
    }

    fn from_track(track: &Track) -> Self {
        Self {
            sample: track.sample().map(|s| s.as_str().to_string()),
            probability: track.steady_probability(),
            intro_probability: track.intro_probability(),
        }
    }
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            sample: None,
            probability: default_probability(),
            intro_probability: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::presets;

    const WHISTLE_YAML: &str = r#"
arrangement:
  name: "whistle"
  tempo: 70
parts:
  - - sample: "sound/whistle/whistle_8_T7.mp3"
      probability: 1.0
      intro_probability: 0.0
    - sample: "sound/whistle/whistle_4_T3.mp3"
      probability: 0.9
      intro_probability: 1.0
  - - sample: "sound/whistle/whistle_8_T7_B.mp3"
      probability: 1.0
      intro_probability: 0.0
    - sample: "sound/whistle/whistle_4_T3.mp3"
      probability: 0.7
      intro_probability: 1.0
"#;

    #[test]
    fn test_parse_yaml() {
        let file = ArrangementFile::from_yaml(WHISTLE_YAML).unwrap();
        assert_eq!(file.arrangement.name, "whistle");
        assert_eq!(file.arrangement.tempo, 70.0);
        assert_eq!(file.parts.len(), 2);
        assert_eq!(file.parts[0].len(), 2);

        let arrangement = file.into_arrangement().unwrap();
        assert_eq!(arrangement.voice_count(), 2);
        assert_eq!(
            arrangement.parts()[0].tracks()[1].intro_probability(),
            Some(1.0)
        );
    }

    #[test]
    fn test_defaults_applied() {
        let yaml = r#"
arrangement:
  name: "sparse"
parts:
  - - sample: "a.mp3"
    - {}
"#;
        let file = ArrangementFile::from_yaml(yaml).unwrap();
        assert_eq!(file.arrangement.tempo, 120.0);
        assert_eq!(file.parts[0][0].probability, 1.0);
        assert!(file.parts[0][1].sample.is_none());

        let arrangement = file.into_arrangement().unwrap();
        assert!(arrangement.parts()[0].tracks()[1].sample().is_none());
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        assert!(ArrangementFile::from_yaml("this is not valid yaml: [").is_err());
    }

    #[test]
    fn test_malformed_arrangement_rejected_at_load() {
        // Unequal part lengths pass YAML parsing but fail validation
        let yaml = r#"
arrangement:
  name: "uneven"
  tempo: 100
parts:
  - - sample: "a.mp3"
    - sample: "b.mp3"
  - - sample: "c.mp3"
"#;
        let file = ArrangementFile::from_yaml(yaml).unwrap();
        assert!(file.into_arrangement().is_err());

        let yaml = r#"
arrangement:
  name: "frozen"
  tempo: 0
parts:
  - - sample: "a.mp3"
"#;
        let file = ArrangementFile::from_yaml(yaml).unwrap();
        assert!(file.into_arrangement().is_err());
    }

    #[test]
    fn test_round_trip_preserves_presets() {
        for arrangement in presets::all() {
            let file = ArrangementFile::from_arrangement(&arrangement);
            let yaml = file.to_yaml().unwrap();
            let reloaded = ArrangementFile::from_yaml(&yaml)
                .unwrap()
                .into_arrangement()
                .unwrap();
            assert_eq!(reloaded, arrangement);
        }
    }

    #[test]
    fn test_load_and_save_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whistle.yaml");

        let file = ArrangementFile::from_arrangement(&presets::whistle());
        file.save(&path).unwrap();

        let loaded = ArrangementFile::load(&path).unwrap();
        assert_eq!(loaded, file);

        assert!(ArrangementFile::load(dir.path().join("missing.yaml")).is_err());
    }
}
