// Side-effect sinks: request tracing and event notification
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// One upstream request, successful or not
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    #[serde(serialize_with = "rfc3339_millis")]
    pub ts: DateTime<Utc>,
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TraceEntry {
    pub fn success(url: impl Into<String>, status: u16, duration_ms: u64) -> Self {
        Self {
            ts: Utc::now(),
            method: "GET".to_string(),
            url: url.into(),
            status: Some(status),
            duration_ms: Some(duration_ms),
            error: None,
        }
    }

    pub fn failure(url: impl Into<String>, error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            ts: Utc::now(),
            method: "GET".to_string(),
            url: url.into(),
            status: None,
            duration_ms: Some(duration_ms),
            error: Some(error.into()),
        }
    }
}

fn rfc3339_millis<S: serde::Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// A named event with its payload fields
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub event: String,
    pub timestamp: DateTime<Utc>,
    pub fields: Map<String, Value>,
}

impl Notification {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            timestamp: Utc::now(),
            fields: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Flat JSON body: `event`, `timestamp`, then the payload fields
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("event".to_string(), Value::from(self.event.clone()));
        body.insert(
            "timestamp".to_string(),
            Value::from(self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        for (key, value) in &self.fields {
            body.insert(key.clone(), value.clone());
        }
        Value::Object(body)
    }
}

/// Best-effort trace recorder. Implementations swallow and log their own failures.
#[async_trait]
pub trait TraceSink: Send + Sync {
    async fn record(&self, entry: TraceEntry);
}

/// Best-effort event publisher. Implementations swallow and log their own failures.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification);
}

/// Notifier used when no webhook is configured
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn notify(&self, notification: Notification) {
        tracing::debug!(event = %notification.event, "Notifications disabled, dropping event");
    }
}
