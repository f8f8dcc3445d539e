//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use solwatch_types::MetricKind;

use crate::config::Schemas;
use crate::data::export::write_json;
use crate::data::{Dashboard, History, MetricStatus};
use crate::source::DataSource;
use crate::ui::Theme;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
///
/// Metric detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Current value and verdict of each metric.
    Metrics,
    /// Freshness of the solar images.
    Imagery,
    /// Fetch and parse problems.
    Notices,
}

impl View {
    /// All views in tab order.
    pub const ALL: [View; 3] = [View::Metrics, View::Imagery, View::Notices];

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Metrics => View::Imagery,
            View::Imagery => View::Notices,
            View::Notices => View::Metrics,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Metrics => View::Notices,
            View::Imagery => View::Metrics,
            View::Notices => View::Imagery,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Metrics => "Metrics",
            View::Imagery => "Imagery",
            View::Notices => "Notices",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub dashboard: Option<Dashboard>,
    pub history: History,
    pub load_error: Option<String>,
    pub schemas: Schemas,

    // Navigation state
    pub selected_index: usize,

    // UI
    pub theme: Theme,
    /// Refresh interval of a live source, shown in the status bar.
    pub refresh_interval: Option<Duration>,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App, picking a theme from the terminal background.
    pub fn new(source: Box<dyn DataSource>, schemas: Schemas) -> Self {
        Self::with_theme(source, schemas, Theme::auto_detect())
    }

    pub fn with_theme(source: Box<dyn DataSource>, schemas: Schemas, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Metrics,
            show_help: false,
            show_detail_overlay: false,
            source,
            dashboard: None,
            history: History::new(),
            load_error: None,
            schemas,
            selected_index: 0,
            theme,
            refresh_interval: None,
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Poll the data source for new data.
    ///
    /// Returns true if new data was received.
    pub fn reload_data(&mut self) -> bool {
        if let Some(snapshot) = self.source.poll() {
            let dashboard = Dashboard::from_snapshot(&snapshot, &self.schemas);

            // Record history before updating
            self.history.record(&dashboard);
            self.dashboard = Some(dashboard);
            self.load_error = None;
            self.clamp_selection();
            return true;
        }

        // Check for errors from the source
        if let Some(err) = self.source.error() {
            self.load_error = Some(err.to_string());
        }
        false
    }

    /// Ask the source for fresh data, bypassing its cache.
    pub fn request_refresh(&mut self) {
        if self.source.request_refresh() {
            self.set_status_message("Refreshing...".to_string());
        } else {
            let _ = self.reload_data();
            self.set_status_message("Reloaded".to_string());
        }
    }

    /// Switch to the next view (cycles through Metrics → Imagery → Notices).
    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.selected_index = 0;
        self.show_detail_overlay = false;
    }

    /// Number of selectable rows in the current view.
    pub fn item_count(&self) -> usize {
        let Some(ref dashboard) = self.dashboard else {
            return 0;
        };
        match self.current_view {
            View::Metrics => dashboard.metrics.len(),
            View::Imagery => dashboard.images.len(),
            View::Notices => dashboard.notices.len() + usize::from(self.load_error.is_some()),
        }
    }

    fn clamp_selection(&mut self) {
        let max = self.item_count().saturating_sub(1);
        self.selected_index = self.selected_index.min(max);
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.item_count().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.selected_index = self.item_count().saturating_sub(1);
    }

    /// The metric under the cursor in the Metrics view.
    pub fn selected_metric(&self) -> Option<&MetricStatus> {
        if self.current_view != View::Metrics {
            return None;
        }
        let kind = MetricKind::ALL.get(self.selected_index)?;
        self.dashboard.as_ref()?.metric(*kind)
    }

    /// Open the detail overlay for the selected metric.
    pub fn enter_detail(&mut self) {
        if self.selected_metric().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then return to Metrics.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
        } else if self.current_view != View::Metrics {
            self.set_view(View::Metrics);
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current dashboard to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref dashboard) = self.dashboard else {
            bail!("No data to export");
        };
        write_json(dashboard, path)
    }
}
