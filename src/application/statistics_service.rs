// Statistics service - Use cases for trend, snapshot and leaderboard views
use crate::application::disease_provider::{DiseaseProvider, Fetched, HistoricalRequest};
use crate::application::error::{Resource, StatsError};
use crate::application::sinks::{Notification, Notifier, TraceEntry, TraceSink};
use crate::domain::date_range::DateRange;
use crate::domain::ranking::{top_countries, CountryEntry, RankMetric};
use crate::domain::timeline::{transform_timeline, DerivedPoint};
use serde::Serialize;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Historical request plus the optional window applied after transformation
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalQuery {
    pub request: HistoricalRequest,
    pub range: Option<DateRange>,
}

/// Leaderboard parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankQuery {
    pub limit: usize,
    pub metric: RankMetric,
}

/// Everything the dashboard page needs in one response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub historical: Vec<DerivedPoint>,
    pub countries: Vec<CountryEntry>,
    pub top_countries: Vec<CountryEntry>,
}

#[derive(Clone)]
pub struct StatisticsService {
    provider: Arc<dyn DiseaseProvider>,
    trace_sink: Arc<dyn TraceSink>,
    notifier: Arc<dyn Notifier>,
}

impl StatisticsService {
    pub fn new(
        provider: Arc<dyn DiseaseProvider>,
        trace_sink: Arc<dyn TraceSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            provider,
            trace_sink,
            notifier,
        }
    }

    pub async fn historical(
        &self,
        query: &HistoricalQuery,
    ) -> Result<Vec<DerivedPoint>, StatsError> {
        let request = &query.request;
        let country = request.country_label().to_string();
        tracing::info!(%country, last_days = %request.last_days, "Historical data request received");

        match self.load_historical(request).await {
            Ok(points) => {
                tracing::info!(%country, points = points.len(), "Historical data fetched and transformed");
                self.notifier
                    .notify(
                        Notification::new("historical_data_transformed")
                            .with("country", country)
                            .with("status", "success"),
                    )
                    .await;
                Ok(apply_range(points, query.range))
            }
            Err(e) => {
                tracing::error!(%country, error = %format!("{:#}", e), "Error fetching historical data");
                self.notifier
                    .notify(
                        Notification::new("historical_data_error")
                            .with(
                                "query",
                                json!({
                                    "country": country,
                                    "lastdays": request.last_days.to_string(),
                                }),
                            )
                            .with("error", format!("{:#}", e)),
                    )
                    .await;
                Err(StatsError::upstream(Resource::Historical, &e))
            }
        }
    }

    pub async fn countries(&self) -> Result<Vec<CountryEntry>, StatsError> {
        tracing::info!("Countries data request received");

        match self.load_snapshot().await {
            Ok(countries) => {
                tracing::info!(countries = countries.len(), "Countries data fetched");
                self.notifier
                    .notify(
                        Notification::new("countries_data_fetched")
                            .with("status", "success")
                            .with("countriesCount", countries.len()),
                    )
                    .await;
                Ok(countries)
            }
            Err(e) => {
                tracing::error!(error = %format!("{:#}", e), "Error fetching countries data");
                self.notifier
                    .notify(
                        Notification::new("countries_data_error")
                            .with("error", format!("{:#}", e)),
                    )
                    .await;
                Err(StatsError::upstream(Resource::Countries, &e))
            }
        }
    }

    pub async fn top_countries(&self, query: RankQuery) -> Result<Vec<CountryEntry>, StatsError> {
        tracing::info!(limit = query.limit, metric = ?query.metric, "Top countries request received");

        match self.load_snapshot().await {
            Ok(countries) => {
                let top = top_countries(&countries, query.limit, query.metric);
                tracing::info!(countries = top.len(), "Top countries fetched and ranked");
                self.notifier
                    .notify(
                        Notification::new("top_countries_data_fetched")
                            .with("status", "success")
                            .with("countriesCount", top.len()),
                    )
                    .await;
                Ok(top)
            }
            Err(e) => {
                tracing::error!(error = %format!("{:#}", e), "Error fetching top countries data");
                self.notifier
                    .notify(
                        Notification::new("top_countries_data_error")
                            .with("error", format!("{:#}", e)),
                    )
                    .await;
                Err(StatsError::upstream(Resource::TopCountries, &e))
            }
        }
    }

    /// Fetch history and the country snapshot concurrently; the leaderboard
    /// is ranked from the same snapshot. Both fetches run to completion so
    /// each one is traced even when the other fails.
    pub async fn overview(
        &self,
        query: &HistoricalQuery,
        rank: RankQuery,
    ) -> Result<Overview, StatsError> {
        let country = query.request.country_label().to_string();
        tracing::info!(%country, "Overview request received");

        let loaded = futures::join!(
            self.load_historical(&query.request),
            self.load_snapshot()
        );

        match loaded {
            (Ok(points), Ok(countries)) => {
                let top = top_countries(&countries, rank.limit, rank.metric);
                self.notifier
                    .notify(
                        Notification::new("overview_data_fetched")
                            .with("country", country)
                            .with("status", "success")
                            .with("countriesCount", countries.len()),
                    )
                    .await;
                Ok(Overview {
                    historical: apply_range(points, query.range),
                    countries,
                    top_countries: top,
                })
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!(%country, error = %format!("{:#}", e), "Error fetching overview data");
                self.notifier
                    .notify(
                        Notification::new("overview_data_error")
                            .with("country", country)
                            .with("error", format!("{:#}", e)),
                    )
                    .await;
                Err(StatsError::upstream(Resource::Overview, &e))
            }
        }
    }

    async fn load_historical(
        &self,
        request: &HistoricalRequest,
    ) -> anyhow::Result<Vec<DerivedPoint>> {
        let url = self.provider.historical_url(request);
        let timeline = self
            .traced(url, self.provider.fetch_historical(request))
            .await?;
        Ok(transform_timeline(&timeline))
    }

    async fn load_snapshot(&self) -> anyhow::Result<Vec<CountryEntry>> {
        let url = self.provider.snapshot_url();
        self.traced(url, self.provider.fetch_current_snapshot()).await
    }

    /// Await an upstream call and record its outcome in the trace sink
    async fn traced<T, F>(&self, url: String, fetch: F) -> anyhow::Result<T>
    where
        F: Future<Output = anyhow::Result<Fetched<T>>>,
    {
        let start = Instant::now();
        let result = fetch.await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(fetched) => {
                self.trace_sink
                    .record(TraceEntry::success(url, fetched.status, duration_ms))
                    .await;
                Ok(fetched.data)
            }
            Err(e) => {
                self.trace_sink
                    .record(TraceEntry::failure(url, format!("{:#}", e), duration_ms))
                    .await;
                Err(e)
            }
        }
    }
}

fn apply_range(points: Vec<DerivedPoint>, range: Option<DateRange>) -> Vec<DerivedPoint> {
    match range {
        Some(range) => range.filter(&points),
        None => points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::disease_provider::LastDays;
    use crate::domain::timeline::{CumulativeCounts, RawTimeline};
    use crate::test_utils::{FakeProvider, RecordingNotifier, RecordingTraceSink};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn service(
        provider: FakeProvider,
    ) -> (StatisticsService, Arc<RecordingTraceSink>, Arc<RecordingNotifier>) {
        let trace = Arc::new(RecordingTraceSink::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = StatisticsService::new(Arc::new(provider), trace.clone(), notifier.clone());
        (service, trace, notifier)
    }

    fn seven_day_timeline() -> RawTimeline {
        RawTimeline::new(
            (0..7)
                .map(|i| {
                    let cases = if i == 6 { 20 } else { 10 };
                    (format!("3/{}/21", i + 1), CumulativeCounts::new(cases, 1, 2))
                })
                .collect(),
        )
    }

    fn query(country: Option<&str>) -> HistoricalQuery {
        HistoricalQuery {
            request: HistoricalRequest::new(country.map(String::from), LastDays::Days(7)),
            range: None,
        }
    }

    #[tokio::test]
    async fn test_historical_transforms_and_traces() {
        let (service, trace, notifier) = service(FakeProvider::with_timeline(seven_day_timeline()));

        let points = service.historical(&query(Some("Chile"))).await.unwrap();

        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, "3/1/21");
        assert!(points[6].weekly_average.is_some());

        let entries = trace.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "fake://historical/Chile?lastdays=7");
        assert_eq!(entries[0].status, Some(200));
        assert_eq!(entries[0].error, None);

        let events = notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "historical_data_transformed");
        assert_eq!(events[0].fields["country"], "Chile");
    }

    #[tokio::test]
    async fn test_historical_applies_range_after_transform() {
        let (service, _, _) = service(FakeProvider::with_timeline(seven_day_timeline()));
        let mut query = query(None);
        query.range = DateRange::new(
            NaiveDate::from_ymd_opt(2021, 3, 7).unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 31).unwrap(),
        );

        let points = service.historical(&query).await.unwrap();

        // The single remaining point still carries the average computed over the full week
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, "3/7/21");
        assert!((points[0].weekly_average.unwrap() - 10.0 / 7.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_historical_failure_is_generic() {
        let (service, trace, notifier) = service(FakeProvider::failing("request timed out"));

        let error = service.historical(&query(None)).await.unwrap_err();

        assert_eq!(error.to_string(), "Failed to fetch historical data");
        let entries = trace.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, None);
        assert_eq!(entries[0].error.as_deref(), Some("request timed out"));

        let events = notifier.events();
        assert_eq!(events[0].event, "historical_data_error");
        assert_eq!(events[0].fields["query"]["country"], "all");
        assert_eq!(events[0].fields["query"]["lastdays"], "7");
        assert_eq!(events[0].fields["error"], "request timed out");
    }

    #[tokio::test]
    async fn test_countries_pass_through() {
        let snapshot = vec![CountryEntry::new("A", 5), CountryEntry::new("B", 50)];
        let (service, trace, notifier) = service(FakeProvider::with_snapshot(snapshot.clone()));

        let countries = service.countries().await.unwrap();

        assert_eq!(countries, snapshot);
        assert_eq!(trace.entries()[0].url, "fake://countries");
        assert_eq!(notifier.events()[0].event, "countries_data_fetched");
        assert_eq!(notifier.events()[0].fields["countriesCount"], 2);
    }

    #[tokio::test]
    async fn test_top_countries_ranks_snapshot() {
        let snapshot = vec![
            CountryEntry::new("A", 5),
            CountryEntry::new("B", 50),
            CountryEntry::new("C", 20),
        ];
        let (service, _, notifier) = service(FakeProvider::with_snapshot(snapshot));

        let top = service
            .top_countries(RankQuery { limit: 2, metric: RankMetric::Cases })
            .await
            .unwrap();

        let names: Vec<&str> = top.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
        assert_eq!(notifier.events()[0].event, "top_countries_data_fetched");
        assert_eq!(notifier.events()[0].fields["countriesCount"], 2);
    }

    #[tokio::test]
    async fn test_top_countries_failure() {
        let (service, _, notifier) = service(FakeProvider::failing("HTTP 502"));

        let error = service
            .top_countries(RankQuery { limit: 5, metric: RankMetric::Cases })
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            StatsError::Upstream { resource: Resource::TopCountries, .. }
        ));
        assert_eq!(notifier.events()[0].event, "top_countries_data_error");
    }

    #[tokio::test]
    async fn test_overview_fetches_both_once() {
        let provider = FakeProvider::with_timeline(seven_day_timeline())
            .and_snapshot(vec![CountryEntry::new("A", 5), CountryEntry::new("B", 50)]);
        let (service, trace, notifier) = service(provider);

        let overview = service
            .overview(&query(None), RankQuery { limit: 1, metric: RankMetric::Cases })
            .await
            .unwrap();

        assert_eq!(overview.historical.len(), 7);
        assert_eq!(overview.countries.len(), 2);
        assert_eq!(overview.top_countries[0].country, "B");
        assert_eq!(trace.entries().len(), 2);
        assert_eq!(notifier.events().len(), 1);
        assert_eq!(notifier.events()[0].event, "overview_data_fetched");
    }

    #[tokio::test]
    async fn test_overview_failure_traces_both_calls() {
        // History fails fast while the snapshot is still in flight
        let provider = FakeProvider::with_snapshot(vec![CountryEntry::new("A", 5)])
            .failing_historical("HTTP 404")
            .with_snapshot_delay(Duration::from_millis(50));
        let (service, trace, notifier) = service(provider);

        let error = service
            .overview(&query(Some("Chile")), RankQuery { limit: 1, metric: RankMetric::Cases })
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Failed to fetch overview data");

        let entries = trace.entries();
        assert_eq!(entries.len(), 2);
        let historical = entries
            .iter()
            .find(|e| e.url.starts_with("fake://historical"))
            .unwrap();
        assert_eq!(historical.error.as_deref(), Some("HTTP 404"));
        let snapshot = entries.iter().find(|e| e.url == "fake://countries").unwrap();
        assert_eq!(snapshot.status, Some(200));

        let events = notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "overview_data_error");
        assert_eq!(events[0].fields["country"], "Chile");
        assert_eq!(events[0].fields["error"], "HTTP 404");
    }
}
