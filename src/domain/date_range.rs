// Inclusive date window over derived points
use super::timeline::DerivedPoint;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `start` falls after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Keep the points whose date lies within the range.
    ///
    /// Points with an unparseable date are dropped.
    pub fn filter(&self, points: &[DerivedPoint]) -> Vec<DerivedPoint> {
        points
            .iter()
            .filter(|p| parse_point_date(&p.date).is_some_and(|d| self.contains(d)))
            .cloned()
            .collect()
    }
}

/// Parse a point date, either ISO (`2021-03-09`) or the provider's `3/9/21`
pub fn parse_point_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date, "%m/%d/%y"))
        .ok()
}
