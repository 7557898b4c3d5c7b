//! Channel carrying replacement event lists from a data source to the frame loop.
//!
//! Producers publish whole lists from any thread. The frame loop drains the
//! channel once per frame without blocking; when several lists queued up
//! between frames only the newest one matters.

use std::path::PathBuf;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use tracing::{error, info};

use crate::event::{EventRecord, load_events_file};

/// Sending half, held by the external data source.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: Sender<Vec<EventRecord>>,
}

impl EventPublisher {
    /// Publish a replacement list. Returns `false` once the feed is gone.
    pub fn publish(&self, records: Vec<EventRecord>) -> bool {
        self.sender.send(records).is_ok()
    }
}

/// Receiving half, polled by the frame loop.
#[derive(Debug)]
pub struct EventFeed {
    receiver: Receiver<Vec<EventRecord>>,
}

impl EventFeed {
    /// Create a connected feed and publisher pair.
    pub fn new() -> (Self, EventPublisher) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { receiver }, EventPublisher { sender })
    }

    /// Take the newest queued list, if any. Never blocks.
    ///
    /// A source that published once and exited leaves its last list queued
    /// until drained; afterwards the feed stays quiet.
    pub fn drain_latest(&mut self) -> Option<Vec<EventRecord>> {
        self.receiver.try_iter().last()
    }
}

/// Load `path` on a background thread and publish the result once.
///
/// Failures are logged; nothing is published in that case.
pub fn spawn_file_source(path: PathBuf, publisher: EventPublisher) -> JoinHandle<()> {
    std::thread::spawn(move || match load_events_file(&path) {
        Ok(records) => {
            info!(path = %path.display(), count = records.len(), "loaded events");
            publisher.publish(records);
        }
        Err(e) => error!(path = %path.display(), "failed to load events: {e}"),
    })
}
