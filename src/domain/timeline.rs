// Timeline domain models and the series transformation
use serde::Serialize;
use std::collections::HashMap;

/// Number of trailing days in the rolling average window (current day included)
pub const ROLLING_WINDOW: usize = 7;

/// Cumulative counters for a single day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CumulativeCounts {
    pub cases: i64,
    pub deaths: i64,
    pub recovered: i64,
}

impl CumulativeCounts {
    pub fn new(cases: i64, deaths: i64, recovered: i64) -> Self {
        Self {
            cases,
            deaths,
            recovered,
        }
    }
}

/// Chronologically ordered cumulative series, exactly as received from the provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTimeline {
    entries: Vec<(String, CumulativeCounts)>,
}

impl RawTimeline {
    pub fn new(entries: Vec<(String, CumulativeCounts)>) -> Self {
        Self { entries }
    }

    /// Build a timeline from the provider's three parallel date-keyed series.
    ///
    /// Date order is taken from `cases`. A counter that is missing for a date,
    /// or explicitly null, counts as 0.
    pub fn from_parallel_series(
        cases: Vec<(String, Option<i64>)>,
        deaths: &HashMap<String, Option<i64>>,
        recovered: &HashMap<String, Option<i64>>,
    ) -> Self {
        let lookup = |series: &HashMap<String, Option<i64>>, date: &str| {
            series.get(date).copied().flatten().unwrap_or(0)
        };

        let entries = cases
            .into_iter()
            .map(|(date, cases)| {
                let counts = CumulativeCounts::new(
                    cases.unwrap_or(0),
                    lookup(deaths, &date),
                    lookup(recovered, &date),
                );
                (date, counts)
            })
            .collect();

        Self::new(entries)
    }

    pub fn entries(&self) -> &[(String, CumulativeCounts)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// One analytical point per input date
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedPoint {
    pub date: String,
    pub cases: i64,
    pub deaths: i64,
    pub recovered: i64,
    pub active_ratio: f64,
    pub fatality_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_average: Option<f64>,
}

/// Turn a cumulative timeline into derived points, preserving input order.
///
/// The rolling average only exists from the seventh point on, and only when it
/// is strictly positive. The very first day of the series has no predecessor,
/// so its daily delta is taken as 0 rather than its full cumulative count.
pub fn transform_timeline(timeline: &RawTimeline) -> Vec<DerivedPoint> {
    let entries = timeline.entries();
    let cases: Vec<i64> = entries.iter().map(|(_, c)| c.cases).collect();

    entries
        .iter()
        .enumerate()
        .map(|(i, (date, counts))| {
            let (active_ratio, fatality_rate) = rates(counts);
            DerivedPoint {
                date: date.clone(),
                cases: counts.cases,
                deaths: counts.deaths,
                recovered: counts.recovered,
                active_ratio,
                fatality_rate,
                weekly_average: rolling_average(&cases, i),
            }
        })
        .collect()
}

/// Active ratio and fatality rate as percentages, both 0 when there are no cases
fn rates(counts: &CumulativeCounts) -> (f64, f64) {
    if counts.cases <= 0 {
        return (0.0, 0.0);
    }

    let cases = counts.cases as f64;
    let active = counts.cases - counts.deaths - counts.recovered;
    (
        active as f64 / cases * 100.0,
        counts.deaths as f64 / cases * 100.0,
    )
}

fn daily_new_cases(cases: &[i64], j: usize) -> i64 {
    let previous = if j == 0 { cases[0] } else { cases[j - 1] };
    cases[j] - previous
}

fn rolling_average(cases: &[i64], i: usize) -> Option<f64> {
    if i + 1 < ROLLING_WINDOW {
        return None;
    }

    let sum: i64 = (i + 1 - ROLLING_WINDOW..=i)
        .map(|j| daily_new_cases(cases, j))
        .sum();
    let average = sum as f64 / ROLLING_WINDOW as f64;

    (average > 0.0).then_some(average)
}
