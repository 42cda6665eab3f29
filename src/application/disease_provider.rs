// Provider trait for upstream pandemic statistics
use crate::domain::ranking::CountryEntry;
use crate::domain::timeline::RawTimeline;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// How many trailing days of history to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastDays {
    Days(u32),
    All,
}

impl Default for LastDays {
    fn default() -> Self {
        Self::Days(30)
    }
}

impl fmt::Display for LastDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{}", days),
            Self::All => f.write_str("all"),
        }
    }
}

impl FromStr for LastDays {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<u32>()
            .ok()
            .filter(|days| *days > 0)
            .map(Self::Days)
            .ok_or_else(|| format!("lastdays must be a positive number or 'all', got '{}'", s))
    }
}

/// A country name, or `None` for the worldwide aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalRequest {
    pub country: Option<String>,
    pub last_days: LastDays,
}

impl HistoricalRequest {
    pub fn new(country: Option<String>, last_days: LastDays) -> Self {
        let country = country.filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));
        Self { country, last_days }
    }

    pub fn country_label(&self) -> &str {
        self.country.as_deref().unwrap_or("all")
    }
}

/// A successful upstream response
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub status: u16,
    pub data: T,
}

#[async_trait]
pub trait DiseaseProvider: Send + Sync {
    /// URL of the per-country snapshot, for tracing
    fn snapshot_url(&self) -> String;

    /// URL of a historical query, for tracing
    fn historical_url(&self, request: &HistoricalRequest) -> String;

    /// Current cumulative totals for every country
    async fn fetch_current_snapshot(&self) -> anyhow::Result<Fetched<Vec<CountryEntry>>>;

    /// Cumulative timeline, already normalized to a flat shape
    async fn fetch_historical(
        &self,
        request: &HistoricalRequest,
    ) -> anyhow::Result<Fetched<RawTimeline>>;
}
