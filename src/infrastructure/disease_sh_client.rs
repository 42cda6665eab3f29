// disease.sh provider implementation
use crate::application::disease_provider::{DiseaseProvider, Fetched, HistoricalRequest};
use crate::domain::ranking::CountryEntry;
use crate::domain::timeline::RawTimeline;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct DiseaseShClient {
    client: reqwest::Client,
    base_url: String,
}

/// The three parallel series, each keyed by date in provider order.
///
/// `cases` is required so that a body of the wrong shape is rejected
/// instead of decoding as an empty timeline.
#[derive(Debug, Deserialize)]
struct ProviderTimeline {
    cases: Map<String, Value>,
    #[serde(default)]
    deaths: Map<String, Value>,
    #[serde(default)]
    recovered: Map<String, Value>,
}

/// Single-country queries nest the series under `timeline`; the worldwide one does not
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistoricalBody {
    Nested { timeline: ProviderTimeline },
    Flat(ProviderTimeline),
}

impl HistoricalBody {
    fn into_timeline(self) -> RawTimeline {
        let series = match self {
            Self::Nested { timeline } => timeline,
            Self::Flat(timeline) => timeline,
        };

        let cases = series
            .cases
            .into_iter()
            .map(|(date, value)| (date, value.as_i64()))
            .collect();
        let by_date = |map: Map<String, Value>| -> HashMap<String, Option<i64>> {
            map.into_iter().map(|(date, value)| (date, value.as_i64())).collect()
        };

        RawTimeline::from_parallel_series(
            cases,
            &by_date(series.deaths),
            &by_date(series.recovered),
        )
    }
}

impl DiseaseShClient {
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Fetched<T>> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to disease.sh")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("disease.sh request failed with status {}: {}", status, body);
        }

        let data = response
            .json::<T>()
            .await
            .context("Failed to parse disease.sh response")?;

        Ok(Fetched {
            status: status.as_u16(),
            data,
        })
    }
}

#[async_trait]
impl DiseaseProvider for DiseaseShClient {
    fn snapshot_url(&self) -> String {
        format!("{}/countries", self.base_url)
    }

    fn historical_url(&self, request: &HistoricalRequest) -> String {
        let scope = match &request.country {
            Some(country) => urlencoding::encode(country).into_owned(),
            None => "all".to_string(),
        };
        format!(
            "{}/historical/{}?lastdays={}",
            self.base_url, scope, request.last_days
        )
    }

    async fn fetch_current_snapshot(&self) -> Result<Fetched<Vec<CountryEntry>>> {
        self.get_json(&self.snapshot_url()).await
    }

    async fn fetch_historical(&self, request: &HistoricalRequest) -> Result<Fetched<RawTimeline>> {
        let fetched: Fetched<HistoricalBody> = self.get_json(&self.historical_url(request)).await?;
        let timeline = fetched.data.into_timeline();
        tracing::debug!(
            country = request.country_label(),
            days = timeline.len(),
            "Normalized historical timeline"
        );

        Ok(Fetched {
            status: fetched.status,
            data: timeline,
        })
    }
}
