//! Channel-based data source.
//!
//! Receives snapshots via a tokio watch channel. The background poller holds
//! the sending half; the TUI polls this end without blocking.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, Notify};

use super::{DataSource, Snapshot};

/// A data source that receives snapshots via a channel.
///
/// # Example
///
/// ```
/// use solwatch::ChannelSource;
///
/// // Create a channel pair
/// let (tx, source) = ChannelSource::create("noaa + owm");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Snapshot>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
    refresh: Option<Arc<Notify>>,
    closed: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - A description of where snapshots come from
    pub fn new(receiver: watch::Receiver<Snapshot>, source_description: &str) -> Self {
        let description = format!("live: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
            refresh: None,
            closed: false,
        }
    }

    /// Create a channel pair for sending snapshots to a ChannelSource.
    ///
    /// The initial value is an empty snapshot with every feed pending.
    pub fn create(source_description: &str) -> (watch::Sender<Snapshot>, Self) {
        let (tx, rx) = watch::channel(Snapshot::empty(Utc::now()));
        let source = Self::new(rx, source_description);
        (tx, source)
    }

    /// Attach a handle the producer listens on for refresh requests.
    pub fn with_refresh(mut self, notify: Arc<Notify>) -> Self {
        self.refresh = Some(notify);
        self
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<Snapshot> {
        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        match self.receiver.has_changed() {
            Ok(true) => Some(self.receiver.borrow_and_update().clone()),
            Ok(false) => None,
            Err(_) => {
                self.closed = true;
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.closed.then_some("Poller stopped")
    }

    fn request_refresh(&mut self) -> bool {
        match self.refresh {
            Some(ref notify) if !self.closed => {
                notify.notify_one();
                true
            }
            _ => false,
        }
    }
}
