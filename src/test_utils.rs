// In-memory collaborators for unit tests
use crate::application::disease_provider::{DiseaseProvider, Fetched, HistoricalRequest};
use crate::application::sinks::{Notification, Notifier, TraceEntry, TraceSink};
use crate::domain::ranking::CountryEntry;
use crate::domain::timeline::RawTimeline;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Provider returning canned data, or failing every call with `error`
#[derive(Default)]
pub struct FakeProvider {
    timeline: RawTimeline,
    snapshot: Vec<CountryEntry>,
    error: Option<String>,
    historical_error: Option<String>,
    snapshot_delay: Duration,
}

impl FakeProvider {
    pub fn with_timeline(timeline: RawTimeline) -> Self {
        Self {
            timeline,
            ..Self::default()
        }
    }

    pub fn with_snapshot(snapshot: Vec<CountryEntry>) -> Self {
        Self {
            snapshot,
            ..Self::default()
        }
    }

    pub fn and_snapshot(mut self, snapshot: Vec<CountryEntry>) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn failing(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// Fail only the historical endpoint
    pub fn failing_historical(mut self, error: &str) -> Self {
        self.historical_error = Some(error.to_string());
        self
    }

    pub fn with_snapshot_delay(mut self, delay: Duration) -> Self {
        self.snapshot_delay = delay;
        self
    }

    fn respond<T>(&self, data: T) -> anyhow::Result<Fetched<T>> {
        match &self.error {
            Some(error) => Err(anyhow::anyhow!(error.clone())),
            None => Ok(Fetched { status: 200, data }),
        }
    }
}

#[async_trait]
impl DiseaseProvider for FakeProvider {
    fn snapshot_url(&self) -> String {
        "fake://countries".to_string()
    }

    fn historical_url(&self, request: &HistoricalRequest) -> String {
        format!(
            "fake://historical/{}?lastdays={}",
            request.country_label(),
            request.last_days
        )
    }

    async fn fetch_current_snapshot(&self) -> anyhow::Result<Fetched<Vec<CountryEntry>>> {
        if !self.snapshot_delay.is_zero() {
            tokio::time::sleep(self.snapshot_delay).await;
        }
        self.respond(self.snapshot.clone())
    }

    async fn fetch_historical(
        &self,
        _request: &HistoricalRequest,
    ) -> anyhow::Result<Fetched<RawTimeline>> {
        if let Some(error) = &self.historical_error {
            return Err(anyhow::anyhow!(error.clone()));
        }
        self.respond(self.timeline.clone())
    }
}

#[derive(Default)]
pub struct RecordingTraceSink {
    entries: Mutex<Vec<TraceEntry>>,
}

impl RecordingTraceSink {
    pub fn entries(&self) -> Vec<TraceEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl TraceSink for RecordingTraceSink {
    async fn record(&self, entry: TraceEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) {
        self.events.lock().unwrap().push(notification);
    }
}
