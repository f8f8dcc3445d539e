//! Background collection from the upstream endpoints.
//!
//! The [`Poller`] owns the adapters and a [`TtlCache`] per resource type. On
//! every tick it fetches only the endpoints whose entry has expired and
//! publishes a fresh [`Snapshot`] when anything changed. Stale values stay
//! visible until their replacement arrives.
//!
//! ```text
//! ┌───────────── tokio task ─────────────┐
//! │ interval tick / refresh Notify       │
//! │        │                             │
//! │        ▼                             │
//! │ Poller::refresh(now) ──▶ TtlCache    │
//! │        │                             │
//! │        ▼                             │
//! │ watch::Sender<Snapshot> ─────────────┼──▶ ChannelSource (TUI)
//! └──────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use solwatch_adapters::imagery::{ImageFrame, ImageSource, ImageryAdapter};
use solwatch_adapters::noaa::NoaaAdapter;
use solwatch_adapters::uv::UvAdapter;
use solwatch_adapters::AdapterError;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::{ChannelSource, Endpoint, Feed, Snapshot, TtlCache};
use crate::config::Settings;

/// Timing knobs of the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// TTL of the NOAA feeds and the images.
    pub refresh: Duration,
    /// TTL of the UV feed, and of a missing-credential result.
    pub uv_ttl: Duration,
    /// How long a failed fetch is kept before it is tried again.
    pub failure_ttl: Duration,
    /// How often the background task checks for expired entries.
    pub tick: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            refresh: Duration::from_secs(300),
            uv_ttl: Duration::from_secs(3600),
            failure_ttl: Duration::from_secs(30),
            tick: Duration::from_secs(1),
        }
    }
}

/// Fetches feeds and image metadata on demand, caching each by endpoint.
#[derive(Debug)]
pub struct Poller {
    noaa: NoaaAdapter,
    uv: UvAdapter,
    imagery: ImageryAdapter,
    image_sources: Vec<ImageSource>,
    config: PollerConfig,
    feeds: TtlCache<Endpoint, Feed>,
    frames: TtlCache<Endpoint, ImageFrame>,
    last_fetch: Option<DateTime<Utc>>,
}

impl Poller {
    pub fn new(
        noaa: NoaaAdapter,
        uv: UvAdapter,
        imagery: ImageryAdapter,
        image_sources: Vec<ImageSource>,
        config: PollerConfig,
    ) -> Self {
        Self {
            noaa,
            uv,
            imagery,
            image_sources,
            config,
            feeds: TtlCache::new(),
            frames: TtlCache::new(),
            last_fetch: None,
        }
    }

    /// Build the adapters described by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let timeout = settings.request_timeout()?;
        let noaa = NoaaAdapter::builder()
            .kp_url(&settings.kp_url)
            .mag_url(&settings.mag_url)
            .timeout(timeout)
            .build()?;
        let uv = UvAdapter::builder()
            .endpoint(&settings.uv_url)
            .api_key(settings.uv_api_key.clone())
            .location(settings.latitude, settings.longitude)
            .timeout(timeout)
            .build()?;
        let imagery = ImageryAdapter::new(timeout)?;
        let config = PollerConfig {
            refresh: settings.refresh_interval()?,
            uv_ttl: settings.uv_ttl()?,
            ..PollerConfig::default()
        };

        if !uv.has_credential() {
            info!("no UV API key configured, UV index will be unavailable");
        }

        Ok(Self::new(noaa, uv, imagery, settings.images.clone(), config))
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Fetch every endpoint whose cache entry is missing or expired at `now`.
    ///
    /// Returns how many endpoints were fetched.
    pub async fn refresh(&mut self, now: Instant) -> usize {
        let kp_due = !self.feeds.is_fresh(&Endpoint::Kp, now);
        let mag_due = !self.feeds.is_fresh(&Endpoint::Mag, now);
        let uv_due = !self.feeds.is_fresh(&Endpoint::Uv, now);
        let images_due: Vec<&ImageSource> = self
            .image_sources
            .iter()
            .filter(|s| !self.frames.is_fresh(&image_key(s), now))
            .collect();

        if !(kp_due || mag_due || uv_due || !images_due.is_empty()) {
            return 0;
        }
        debug!(kp_due, mag_due, uv_due, images = images_due.len(), "refreshing");

        let imagery = &self.imagery;
        let (kp, mag, uv, frames) = tokio::join!(
            fetch_if(kp_due, self.noaa.fetch_kp()),
            fetch_if(mag_due, self.noaa.fetch_mag()),
            fetch_if(uv_due, self.uv.fetch()),
            async move {
                let mut frames = Vec::with_capacity(images_due.len());
                for source in images_due {
                    let frame = match imagery.fetch_frame(source).await {
                        Ok(frame) => frame,
                        Err(e) => {
                            warn!(url = %source.url, error = %e, "image fetch failed");
                            ImageFrame::failed(source, Utc::now(), e.to_string())
                        }
                    };
                    frames.push(frame);
                }
                frames
            }
        );

        let mut fetched = frames.len();
        for (endpoint, feed) in [(Endpoint::Kp, kp), (Endpoint::Mag, mag), (Endpoint::Uv, uv)] {
            let Some(feed) = feed else {
                continue;
            };
            if let Feed::Failed(ref message) = feed {
                warn!(?endpoint, error = %message, "feed fetch failed");
            }
            let ttl = self.ttl_for(&endpoint, &feed);
            self.feeds.insert(endpoint, feed, ttl, now);
            fetched += 1;
        }
        for frame in frames {
            let ttl = if frame.error.is_some() {
                self.config.failure_ttl
            } else {
                self.config.refresh
            };
            self.frames.insert(Endpoint::Image(frame.url.clone()), frame, ttl, now);
        }

        self.last_fetch = Some(Utc::now());
        info!(fetched, "refreshed space-weather data");
        fetched
    }

    fn ttl_for(&self, endpoint: &Endpoint, feed: &Feed) -> Duration {
        match (endpoint, feed) {
            (_, Feed::Failed(_)) => self.config.failure_ttl,
            (Endpoint::Uv, _) => self.config.uv_ttl,
            _ => self.config.refresh,
        }
    }

    /// The latest known state of every endpoint.
    pub fn snapshot(&self, now: Instant) -> Snapshot {
        let feed = |endpoint: Endpoint| self.feeds.get_stale(&endpoint).cloned().unwrap_or_default();
        Snapshot {
            collected_at: self.last_fetch.unwrap_or_else(Utc::now),
            next_refresh: self.next_refresh(now),
            kp: feed(Endpoint::Kp),
            bz: feed(Endpoint::Mag),
            uv: feed(Endpoint::Uv),
            images: self
                .image_sources
                .iter()
                .filter_map(|s| self.frames.get_stale(&image_key(s)).cloned())
                .collect(),
        }
    }

    /// Wall-clock time at which the earliest cache entry expires.
    pub fn next_refresh(&self, now: Instant) -> Option<DateTime<Utc>> {
        let next = self.feeds.next_expiry().into_iter().chain(self.frames.next_expiry()).min()?;
        let wait = chrono::Duration::from_std(next.saturating_duration_since(now)).ok()?;
        Some(Utc::now() + wait)
    }

    /// Expire every cache entry so the next refresh fetches everything.
    pub fn invalidate(&mut self, now: Instant) {
        self.feeds.expire_all(now);
        self.frames.expire_all(now);
    }

    /// Fetch everything once and return the result.
    pub async fn collect_once(&mut self) -> Snapshot {
        let now = Instant::now();
        self.refresh(now).await;
        self.snapshot(now)
    }

    /// Run the poller on the current tokio runtime.
    ///
    /// Returns the TUI end of the channel and the task handle. The task stops
    /// when the source is dropped.
    pub fn spawn(mut self, description: &str) -> (ChannelSource, JoinHandle<()>) {
        let notify = Arc::new(Notify::new());
        let (tx, source) = ChannelSource::create(description);
        let source = source.with_refresh(notify.clone());
        let tick = self.config.tick;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = notify.notified() => {
                        info!("manual refresh requested");
                        self.invalidate(Instant::now());
                    }
                }
                if tx.is_closed() {
                    break;
                }

                let now = Instant::now();
                if self.refresh(now).await == 0 {
                    continue;
                }
                if tx.send(self.snapshot(now)).is_err() {
                    break;
                }
            }
            debug!("poller stopped");
        });

        (source, handle)
    }
}

fn image_key(source: &ImageSource) -> Endpoint {
    Endpoint::Image(source.url.clone())
}

async fn fetch_if<F>(due: bool, fetch: F) -> Option<Feed>
where
    F: Future<Output = Result<Value, AdapterError>>,
{
    if due {
        Some(Feed::from(fetch.await))
    } else {
        None
    }
}
