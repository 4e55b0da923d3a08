// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File watcher for hot-reload arrangement configuration.
//!
//! Watches arrangement files (or a directory of them) and emits
//! validated arrangements when they change, so a host can swap what
//! is playing without stopping the engine.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::ArrangementFile;
use crate::arrangement::Arrangement;

/// Events emitted by the config watcher
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    /// An arrangement file was modified and revalidated successfully
    Reloaded(Box<Arrangement>),
    /// An arrangement file was modified but failed to parse or validate
    Error(String),
    /// A new file was created in the watch directory
    FileCreated(PathBuf),
    /// A file was deleted from the watch directory
    FileDeleted(PathBuf),
}

/// Load and fully validate an arrangement file
fn load_arrangement<P: AsRef<Path>>(path: P) -> Result<Arrangement> {
    ArrangementFile::load(path)?.into_arrangement()
}

/// Validate an arrangement file without applying it
pub fn validate_config<P: AsRef<Path>>(path: P) -> Result<Arrangement> {
    load_arrangement(path)
}

/// Arrangement file watcher with debouncing and validation
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<ConfigEvent>,
    watched_path: PathBuf,
}

impl ConfigWatcher {
    /// Create a new config watcher for the specified path
    ///
    /// The watcher monitors the file (or directory) for changes and
    /// emits `ConfigEvent`s when files are modified.
    ///
    /// # Arguments
    /// * `path` - Path to watch (file or directory)
    /// * `debounce_ms` - Debounce duration in milliseconds (default: 500)
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let debounce_duration = Duration::from_millis(debounce_ms.unwrap_or(500));

        let (event_tx, event_rx): (Sender<ConfigEvent>, Receiver<ConfigEvent>) = mpsc::channel();

        // State for debouncing
        let debounced_path = watched_path.clone();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        // Create the watcher
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        // Start watching
        let watch_path = watched_path.clone();
        let mode = if watched_path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        watcher
            .watch(&watch_path, mode)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watch_path, e))?;

        // Spawn debounce thread
        std::thread::spawn(move || {
            let mut last_event_time: Option<Instant> = None;
            let mut pending_paths: Vec<PathBuf> = Vec::new();

            loop {
                // Check for new events with timeout
                match notify_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(event) => {
                        match event.kind {
                            EventKind::Create(_) => {
                                for path in event.paths {
                                    let _ = event_tx.send(ConfigEvent::FileCreated(path));
                                }
                            }
                            EventKind::Remove(_) => {
                                for path in event.paths {
                                    let _ = event_tx.send(ConfigEvent::FileDeleted(path));
                                }
                            }
                            EventKind::Modify(_) => {
                                // Add to pending and update debounce timer
                                for path in event.paths {
                                    if !pending_paths.contains(&path) {
                                        pending_paths.push(path);
                                    }
                                }
                                last_event_time = Some(Instant::now());
                            }
                            _ => {}
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        // Check if debounce period has passed
                        if let Some(last_time) = last_event_time {
                            if last_time.elapsed() >= debounce_duration {
                                // Process pending modifications
                                for path in pending_paths.drain(..) {
                                    let is_yaml = path
                                        .extension()
                                        .map(|ext| ext == "yaml" || ext == "yml")
                                        .unwrap_or(path == debounced_path);
                                    if !is_yaml {
                                        continue;
                                    }
                                    let event = match load_arrangement(&path) {
                                        Ok(arrangement) => {
                                            ConfigEvent::Reloaded(Box::new(arrangement))
                                        }
                                        Err(e) => ConfigEvent::Error(format!(
                                            "Failed to load {:?}: {}",
                                            path, e
                                        )),
                                    };
                                    let _ = event_tx.send(event);
                                }
                                last_event_time = None;
                            }
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        // Watcher was dropped, exit thread
                        break;
                    }
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next config event (non-blocking)
    pub fn try_recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending config events
    pub fn recv_all(&self) -> Vec<ConfigEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Block until the next config event is received
    pub fn recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.recv().ok()
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}
