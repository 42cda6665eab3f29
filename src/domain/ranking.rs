// Country snapshot models and top-N ranking
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Number of countries returned by the leaderboard when no limit is given
pub const DEFAULT_TOP_N: usize = 5;

/// Per-country cumulative totals from the provider's snapshot.
///
/// Only the counters are interpreted; every other field is carried through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryEntry {
    pub country: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub cases: i64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub deaths: i64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub recovered: i64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub active: i64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub today_cases: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
}

impl CountryEntry {
    #[cfg(test)]
    pub fn new(country: impl Into<String>, cases: i64) -> Self {
        Self {
            country: country.into(),
            cases,
            deaths: 0,
            recovered: 0,
            active: 0,
            today_cases: 0,
            extra: serde_json::Map::new(),
        }
    }

    pub fn metric(&self, metric: RankMetric) -> i64 {
        match metric {
            RankMetric::Cases => self.cases,
            RankMetric::Deaths => self.deaths,
            RankMetric::Recovered => self.recovered,
            RankMetric::Active => self.active,
            RankMetric::TodayCases => self.today_cases,
        }
    }
}

/// Counter a leaderboard is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankMetric {
    #[default]
    Cases,
    Deaths,
    Recovered,
    Active,
    TodayCases,
}

impl FromStr for RankMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cases" => Ok(Self::Cases),
            "deaths" => Ok(Self::Deaths),
            "recovered" => Ok(Self::Recovered),
            "active" => Ok(Self::Active),
            "todayCases" => Ok(Self::TodayCases),
            other => Err(format!("unknown sort metric '{}'", other)),
        }
    }
}

/// Return the `k` items with the largest key, largest first.
///
/// The sort is stable, so items with equal keys keep their input order.
pub fn top_n_by<T, K, F>(items: &[T], k: usize, key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut ranked: Vec<&T> = items.iter().collect();
    ranked.sort_by(|a, b| key(b).cmp(&key(a)));
    ranked.into_iter().take(k).cloned().collect()
}

pub fn top_countries(entries: &[CountryEntry], k: usize, metric: RankMetric) -> Vec<CountryEntry> {
    top_n_by(entries, k, |entry| entry.metric(metric))
}
