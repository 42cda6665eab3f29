// Query string parameters and their validation
use crate::application::disease_provider::{HistoricalRequest, LastDays};
use crate::application::error::StatsError;
use crate::application::statistics_service::{HistoricalQuery, RankQuery};
use crate::domain::date_range::DateRange;
use crate::domain::ranking::RankMetric;
use crate::presentation::app_state::QueryDefaults;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct HistoricalParams {
    pub country: Option<String>,
    pub lastdays: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RankParams {
    pub limit: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OverviewParams {
    #[serde(flatten)]
    pub historical: HistoricalParams,
    #[serde(flatten)]
    pub rank: RankParams,
}

impl HistoricalParams {
    pub fn to_query(&self, defaults: &QueryDefaults) -> Result<HistoricalQuery, StatsError> {
        let last_days = match self.lastdays.as_deref() {
            Some(raw) => raw.parse::<LastDays>().map_err(StatsError::InvalidQuery)?,
            None => defaults.last_days,
        };

        Ok(HistoricalQuery {
            request: HistoricalRequest::new(self.country.clone(), last_days),
            range: self.date_range()?,
        })
    }

    /// An open side of the range is unbounded
    fn date_range(&self) -> Result<Option<DateRange>, StatsError> {
        if self.start.is_none() && self.end.is_none() {
            return Ok(None);
        }

        let start = parse_date("start", self.start.as_deref())?.unwrap_or(NaiveDate::MIN);
        let end = parse_date("end", self.end.as_deref())?.unwrap_or(NaiveDate::MAX);

        DateRange::new(start, end)
            .map(Some)
            .ok_or_else(|| StatsError::InvalidQuery("start must not be after end".to_string()))
    }
}

impl RankParams {
    pub fn to_query(&self, defaults: &QueryDefaults) -> Result<RankQuery, StatsError> {
        let limit = match self.limit.as_deref() {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or_else(|| {
                    StatsError::InvalidQuery(format!(
                        "limit must be a positive integer, got '{}'",
                        raw
                    ))
                })?,
            None => defaults.top_n,
        };
        let metric = match self.sort.as_deref() {
            Some(raw) => raw.parse::<RankMetric>().map_err(StatsError::InvalidQuery)?,
            None => RankMetric::default(),
        };

        Ok(RankQuery { limit, metric })
    }
}

fn parse_date(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, StatsError> {
    raw.map(|value| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            StatsError::InvalidQuery(format!("{} must be a YYYY-MM-DD date, got '{}'", name, value))
        })
    })
    .transpose()
}
