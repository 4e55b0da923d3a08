// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! STEMSEQ - A measure-driven generative stem sequencer
//!
//! This library provides the core components for probabilistic,
//! loop-based background music:
//! - Arrangements of looped sample stems with per-track gate probabilities
//! - A poll-based transport clock ticking once every two measures
//! - A sequencer that gates voices by weighted coin flips each tick
//! - A spatial panner that maps simulation positions onto stereo pan
//! - A timeline of scheduled audio commands for the playback backend

pub mod arrangement;
pub mod audio;
pub mod config;
pub mod engine;
pub mod timing;

// Re-export commonly used types
pub use arrangement::{Arrangement, Part, SampleRef, Track};
pub use audio::{AudioCommand, AudioContext, LoadStatus, SampleLoader, Timeline};
pub use engine::{
    MixBus, Sequencer, Session, SessionState, SimulationState, SpatialPanner, VoicePool,
};
pub use timing::{TransportClock, TransportTiming};
