// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scheduled command timeline.
//!
//! All audible effects of the engine are explicit commands scheduled
//! at timeline timestamps: sample loads, playback starts/stops, gain
//! and pan ramps, and the bus fade. A priority queue orders commands
//! by time (FIFO within equal timestamps), and `clear` cancels
//! everything pending, which is how `stop` cancels in-flight ramps.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use crate::arrangement::SampleRef;

/// A command addressed to the host audio backend
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    /// Load a stem into a voice's player
    LoadSample { slot: usize, sample: SampleRef },
    /// Start a voice's playback
    StartPlayback { slot: usize },
    /// Stop a voice's playback
    StopPlayback { slot: usize },
    /// Ramp a voice's gain to a target over a duration
    RampGain {
        slot: usize,
        target_db: f64,
        duration: f64,
    },
    /// Ramp a voice's pan to a target over a duration
    RampPan {
        slot: usize,
        target: f64,
        duration: f64,
    },
    /// Ramp the master bus gain to a target over a duration
    BusFade { target_db: f64, duration: f64 },
    /// Release a voice's playback and control resources
    DisposeVoice { slot: usize },
}

/// A command with its scheduled timestamp
#[derive(Debug, Clone)]
pub struct ScheduledCommand {
    /// Timeline time in seconds
    pub time: f64,
    /// Insertion order, for FIFO within equal timestamps
    seq: u64,
    /// The command itself
    pub command: AudioCommand,
}

// For BinaryHeap - we want minimum time first
impl Eq for ScheduledCommand {}

impl PartialEq for ScheduledCommand {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl Ord for ScheduledCommand {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ScheduledCommand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Command queue against the audio clock's timeline
pub struct Timeline {
    /// Pending commands, earliest first
    queue: BinaryHeap<ScheduledCommand>,
    /// Wall-clock origin of timeline time
    epoch: Instant,
    /// Next insertion sequence number
    next_seq: u64,
}

impl Timeline {
    /// Create a timeline whose time origin is now
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::with_capacity(64),
            epoch: Instant::now(),
            next_seq: 0,
        }
    }

    /// Current timeline time in seconds
    pub fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Schedule a command at a timeline timestamp
    pub fn schedule(&mut self, time: f64, command: AudioCommand) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(ScheduledCommand { time, seq, command });
    }

    /// Schedule a command at the current timeline time
    pub fn schedule_now(&mut self, command: AudioCommand) {
        self.schedule(self.now(), command);
    }

    /// Drain commands due at or before the given timeline time
    pub fn poll_until(&mut self, time: f64) -> Vec<ScheduledCommand> {
        let mut due = Vec::new();
        while let Some(next) = self.queue.peek() {
            if next.time <= time {
                due.push(self.queue.pop().expect("peeked command exists"));
            } else {
                break;
            }
        }
        due
    }

    /// Drain commands due now
    pub fn poll(&mut self) -> Vec<ScheduledCommand> {
        self.poll_until(self.now())
    }

    /// Cancel every pending command
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Number of pending commands
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_creation() {
        let timeline = Timeline::new();
        assert!(timeline.is_empty());
        assert_eq!(timeline.len(), 0);
    }

    #[test]
    fn test_commands_drain_in_time_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(2.0, AudioCommand::StartPlayback { slot: 2 });
        timeline.schedule(0.0, AudioCommand::StartPlayback { slot: 0 });
        timeline.schedule(1.0, AudioCommand::StartPlayback { slot: 1 });

        let due = timeline.poll_until(10.0);
        assert_eq!(due.len(), 3);
        for (i, scheduled) in due.iter().enumerate() {
            assert_eq!(
                scheduled.command,
                AudioCommand::StartPlayback { slot: i }
            );
        }
    }

    #[test]
    fn test_equal_timestamps_stay_fifo() {
        let mut timeline = Timeline::new();
        for slot in 0..4 {
            timeline.schedule(1.0, AudioCommand::StartPlayback { slot });
        }

        let due = timeline.poll_until(1.0);
        let slots: Vec<usize> = due
            .iter()
            .map(|scheduled| match scheduled.command {
                AudioCommand::StartPlayback { slot } => slot,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_poll_until_leaves_future_commands() {
        let mut timeline = Timeline::new();
        timeline.schedule(0.5, AudioCommand::StopPlayback { slot: 0 });
        timeline.schedule(5.0, AudioCommand::StopPlayback { slot: 1 });

        let due = timeline.poll_until(1.0);
        assert_eq!(due.len(), 1);
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_clear_cancels_everything() {
        let mut timeline = Timeline::new();
        timeline.schedule(
            0.0,
            AudioCommand::RampGain {
                slot: 0,
                target_db: 0.0,
                duration: 0.1,
            },
        );
        timeline.schedule(3.0, AudioCommand::BusFade {
            target_db: 24.0,
            duration: 3.0,
        });

        timeline.clear();
        assert!(timeline.is_empty());
        assert!(timeline.poll_until(100.0).is_empty());
    }

    #[test]
    fn test_now_is_monotonic() {
        let timeline = Timeline::new();
        let a = timeline.now();
        let b = timeline.now();
        assert!(b >= a);
    }
}
