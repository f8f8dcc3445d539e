//! Data source abstraction for receiving snapshots.
//!
//! The TUI never talks to the network itself. It polls a [`DataSource`],
//! which is either a [`ChannelSource`] fed by the background [`Poller`], or a
//! [`FileSource`] replaying a snapshot recorded with `--record`.

mod cache;
mod channel;
mod file;
mod poller;
mod snapshot;

pub use cache::{Endpoint, TtlCache};
pub use channel::ChannelSource;
pub use file::FileSource;
pub use poller::{Poller, PollerConfig};
pub use snapshot::{Feed, Snapshot};

use std::fmt::Debug;

/// Trait for receiving snapshots from various sources.
///
/// # Example
///
/// ```
/// use solwatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("snapshot.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Collected at {}", snapshot.collected_at);
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<Snapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Check if the source has encountered an error.
    ///
    /// Returns the error message if an error occurred during the last poll.
    fn error(&self) -> Option<&str>;

    /// Ask the source to fetch fresh data, bypassing any cache.
    ///
    /// Returns `false` if the source cannot refresh on demand.
    fn request_refresh(&mut self) -> bool {
        false
    }
}
