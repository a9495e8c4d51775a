//! Application state and navigation logic.

use std::collections::HashMap;
use std::time::Instant;

use anyhow::Result;

use crate::data::{
    Dataset, HostSelection, MetricKind, MetricRecord, SharedDataset, DEFAULT_SELECTION,
};
use crate::error::UnknownProfileError;
use crate::report::Report;
use crate::sla::{ProfileRegistry, SeverityTier};
use crate::source::DataSource;
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Severity-colored bar charts for the selected hosts.
    Charts,
    /// Host list with selection checkboxes and latest readings.
    Hosts,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Charts => View::Hosts,
            View::Hosts => View::Charts,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Charts => "Charts",
            View::Hosts => "Hosts",
        }
    }
}

/// Latest reading and sample count for one host.
#[derive(Debug, Clone)]
pub struct HostSummary {
    pub host_name: String,
    pub latest: MetricRecord,
    pub samples: usize,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data
    source: Box<dyn DataSource>,
    pub dataset: SharedDataset,
    pub profiles: ProfileRegistry,
    pub profile: String,
    pub hosts: Vec<HostSummary>,
    pub selection: HostSelection,
    /// Records of the selected hosts, as charted.
    pub records: Vec<MetricRecord>,
    pub initial_selection: usize,
    selection_seeded: bool,
    pub load_error: Option<String>,
    /// Files rejected by the most recent ingestion, with the reason.
    pub ingest_errors: Vec<(String, String)>,
    pub last_updated: Option<Instant>,

    // Navigation state
    pub selected_host_index: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App using the registry's default profile.
    pub fn new(source: Box<dyn DataSource>, dataset: SharedDataset, profiles: ProfileRegistry) -> Self {
        let profile = profiles.default_profile().to_string();
        Self {
            running: true,
            current_view: View::Charts,
            show_help: false,
            source,
            dataset,
            profiles,
            profile,
            hosts: Vec::new(),
            selection: HostSelection::new(),
            records: Vec::new(),
            initial_selection: DEFAULT_SELECTION,
            selection_seeded: false,
            load_error: None,
            ingest_errors: Vec::new(),
            last_updated: None,
            selected_host_index: 0,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Use a named profile for color-coding.
    pub fn with_profile(mut self, profile: &str) -> Result<Self, UnknownProfileError> {
        self.profiles.resolve(Some(profile))?;
        self.profile = profile.to_string();
        Ok(self)
    }

    /// Number of hosts preselected once data first arrives.
    pub fn with_initial_selection(mut self, count: usize) -> Self {
        self.initial_selection = count;
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the source and ingest whatever it delivered.
    ///
    /// Returns Ok(true) if anything was ingested, Ok(false) otherwise.
    pub fn reload_data(&mut self) -> Result<bool> {
        let uploads = self.source.poll();
        self.load_error = self.source.error().map(str::to_string);

        if uploads.is_empty() {
            return Ok(false);
        }

        let report = self.dataset.ingest_batch(uploads);
        self.ingest_errors = report
            .failed()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.file_name.clone(), e.to_string())))
            .collect();
        if let Some((file, err)) = self.ingest_errors.first() {
            self.set_status_message(format!("{}: {}", file, err));
        }

        self.refresh();
        Ok(true)
    }

    /// Forget delivered files and ingest everything again.
    pub fn force_reload(&mut self) -> Result<bool> {
        self.source.reset();
        self.reload_data()
    }

    /// Rebuild cached host summaries and the charted records.
    ///
    /// Everything is derived from one read of the dataset, so the selection,
    /// host list and records always agree with each other.
    pub fn refresh(&mut self) {
        let selection = &mut self.selection;
        let seeded = &mut self.selection_seeded;
        let initial = self.initial_selection;

        let (hosts, records) = self.dataset.read(|dataset| {
            let available = dataset.hosts();
            if available.is_empty() {
                selection.clear();
                *seeded = false;
            } else if !*seeded {
                *selection = HostSelection::first_n(&available, initial);
                *seeded = true;
            } else {
                selection.retain_known(&available);
            }
            (summarize(dataset), dataset.filter(selection.hosts()))
        });

        self.hosts = hosts;
        self.records = records;
        self.last_updated = Some(Instant::now());

        if self.selected_host_index >= self.hosts.len() {
            self.selected_host_index = self.hosts.len().saturating_sub(1);
        }
    }

    /// Severity of a value under the active profile.
    pub fn tier(&self, value: f64, kind: MetricKind) -> SeverityTier {
        self.profiles
            .classify(value, kind, Some(&self.profile))
            .unwrap_or(SeverityTier::Normal)
    }

    /// Switch to the next configured profile.
    pub fn cycle_profile(&mut self) {
        self.profile = self.profiles.next_name(&self.profile).to_string();
        self.set_status_message(format!("Profile: {}", self.profile));
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
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
        let max = self.hosts.len().saturating_sub(1);
        self.selected_host_index = (self.selected_host_index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_host_index = self.selected_host_index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_host_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.selected_host_index = self.hosts.len().saturating_sub(1);
    }

    /// Toggle the host under the cursor in the chart selection.
    pub fn toggle_selected_host(&mut self) {
        let Some(host) = self.hosts.get(self.selected_host_index) else {
            return;
        };
        let host = host.host_name.clone();
        self.selection.toggle(&host);
        self.records = self.dataset.for_hosts(&self.selection);
    }

    /// Select every known host.
    pub fn select_all_hosts(&mut self) {
        let all: Vec<String> = self.hosts.iter().map(|h| h.host_name.clone()).collect();
        self.selection.select_all(&all);
        self.records = self.dataset.for_hosts(&self.selection);
    }

    /// Deselect every host.
    pub fn select_no_hosts(&mut self) {
        self.selection.clear();
        self.records.clear();
    }

    /// Drop every ingested source.
    pub fn clear_dataset(&mut self) {
        self.dataset.clear();
        self.ingest_errors.clear();
        self.refresh();
        self.set_status_message("Dataset cleared".to_string());
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the selected hosts to a JSON report.
    pub fn export_state(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if self.selection.is_empty() {
            anyhow::bail!("No hosts selected");
        }

        Report::build(&self.dataset, &self.profiles, Some(&self.profile), Some(&self.selection))?
            .with_errors(self.ingest_errors.iter().cloned())
            .write_to(path)
    }
}

/// Latest reading and sample count per host, first-seen order.
fn summarize(dataset: &Dataset) -> Vec<HostSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut hosts: Vec<HostSummary> = Vec::new();
    for record in dataset.records() {
        match index.get(record.host_name.as_str()) {
            Some(&i) => {
                hosts[i].latest = record.clone();
                hosts[i].samples += 1;
            }
            None => {
                index.insert(&record.host_name, hosts.len());
                hosts.push(HostSummary {
                    host_name: record.host_name.clone(),
                    latest: record.clone(),
                    samples: 1,
                });
            }
        }
    }
    hosts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Upload;
    use crate::source::ChannelSource;

    fn export(rows: &[&str]) -> Vec<u8> {
        let mut body = String::from("t\nt\nt\nt\nt\n");
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        body.into_bytes()
    }

    fn app_with_channel() -> (tokio::sync::mpsc::Sender<Vec<Upload>>, App) {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), SharedDataset::new(), ProfileRegistry::builtin());
        app.theme = Theme::dark();
        (tx, app)
    }

    fn hosts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("h{},ip,,,99,{},0", i, i)).collect()
    }

    #[test]
    fn test_reload_preselects_first_hosts() {
        let (tx, mut app) = app_with_channel();
        let rows = hosts(7);
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        tx.try_send(vec![Upload::new("a.csv", export(&rows))]).unwrap();

        assert!(app.reload_data().unwrap());
        assert_eq!(app.hosts.len(), 7);
        assert_eq!(app.selection.len(), DEFAULT_SELECTION);
        assert_eq!(app.records.len(), DEFAULT_SELECTION);
        assert!(!app.reload_data().unwrap());
    }

    #[test]
    fn test_rejected_file_is_reported() {
        let (tx, mut app) = app_with_channel();
        tx.try_send(vec![
            Upload::new("good.csv", export(&["h1,ip,,,99,1,0"])),
            Upload::new("bad.csv", export(&["h2,ip,99,1,0"])),
        ])
        .unwrap();

        app.reload_data().unwrap();
        assert_eq!(app.hosts.len(), 1);
        assert_eq!(app.ingest_errors.len(), 1);
        assert_eq!(app.ingest_errors[0].0, "bad.csv");
        assert!(app.get_status_message().unwrap().contains("Schema mismatch"));
    }

    #[test]
    fn test_toggle_and_clear() {
        let (tx, mut app) = app_with_channel();
        tx.try_send(vec![Upload::new("a.csv", export(&["h1,ip,,,99,1,0", "h2,ip,,,98,2,0"]))])
            .unwrap();
        app.reload_data().unwrap();
        assert_eq!(app.records.len(), 2);

        app.select_next();
        app.toggle_selected_host();
        assert!(!app.selection.contains("h2"));
        assert_eq!(app.records.len(), 1);

        app.select_no_hosts();
        assert!(app.records.is_empty());
        app.select_all_hosts();
        assert_eq!(app.records.len(), 2);

        app.clear_dataset();
        assert!(app.hosts.is_empty());
        assert!(app.selection.is_empty());
        assert!(app.records.is_empty());

        // Next ingestion preselects again
        tx.try_send(vec![Upload::new("b.csv", export(&["h3,ip,,,97,3,0"]))]).unwrap();
        app.reload_data().unwrap();
        assert_eq!(app.selection.hosts(), &["h3".to_string()]);
    }

    #[test]
    fn test_host_summary_tracks_latest() {
        let (tx, mut app) = app_with_channel();
        tx.try_send(vec![
            Upload::new("mon.csv", export(&["h1,ip,,,99,10,0"])),
            Upload::new("tue.csv", export(&["h1,ip,,,98,20,0"])),
        ])
        .unwrap();
        app.reload_data().unwrap();

        assert_eq!(app.hosts.len(), 1);
        assert_eq!(app.hosts[0].samples, 2);
        assert_eq!(app.hosts[0].latest.latency_ms, 20.0);
    }

    #[test]
    fn test_refresh_is_consistent_while_dataset_changes() {
        let (_tx, mut app) = app_with_channel();
        app.initial_selection = usize::MAX;

        let writer = {
            let dataset = app.dataset.clone();
            std::thread::spawn(move || {
                for i in 0..300 {
                    if i % 3 == 0 {
                        dataset.clear();
                    } else {
                        dataset.ingest("s.csv", &export(&["h1,ip,,,99,1,0", "h2,ip,,,98,2,0"])).unwrap();
                    }
                }
            })
        };

        for _ in 0..300 {
            app.refresh();
            for host in app.selection.hosts() {
                assert!(app.hosts.iter().any(|h| &h.host_name == host), "{} not listed", host);
            }
            for record in &app.records {
                assert!(app.selection.contains(&record.host_name));
            }
        }
        writer.join().unwrap();
    }

    #[test]
    fn test_profiles() {
        let (_tx, app) = app_with_channel();
        assert!(app.with_profile("gold").is_err());

        let (_tx, mut app) = app_with_channel();
        app.cycle_profile();
        assert_eq!(app.profile, "default");
        assert_eq!(app.tier(250.0, MetricKind::Latency), SeverityTier::Critical);
    }
}
