// Application state for HTTP handlers
use crate::application::disease_provider::LastDays;
use crate::application::statistics_service::StatisticsService;
use crate::domain::ranking::DEFAULT_TOP_N;

/// Values used when a query leaves a parameter out
#[derive(Debug, Clone, Copy)]
pub struct QueryDefaults {
    pub last_days: LastDays,
    pub top_n: usize,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            last_days: LastDays::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub statistics_service: StatisticsService,
    pub defaults: QueryDefaults,
}
