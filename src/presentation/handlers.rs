// HTTP request handlers
use crate::application::error::StatsError;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::params::{HistoricalParams, OverviewParams, RankParams};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Derived daily series for a country or the whole world
pub async fn historical(
    Query(params): Query<HistoricalParams>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = match params.to_query(&state.defaults) {
        Ok(query) => state.statistics_service.historical(&query).await,
        Err(e) => Err(e),
    };
    respond(result, accepts_brotli(&headers)).await
}

/// Current snapshot for every country, as the provider returned it
pub async fn countries(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let result = state.statistics_service.countries().await;
    respond(result, accepts_brotli(&headers)).await
}

/// Leaderboard of the countries with the largest metric
pub async fn top_countries(
    Query(params): Query<RankParams>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = match params.to_query(&state.defaults) {
        Ok(query) => state.statistics_service.top_countries(query).await,
        Err(e) => Err(e),
    };
    respond(result, accepts_brotli(&headers)).await
}

/// Historical series, snapshot and leaderboard in one round trip
pub async fn overview(
    Query(params): Query<OverviewParams>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let queries = params
        .historical
        .to_query(&state.defaults)
        .and_then(|historical| Ok((historical, params.rank.to_query(&state.defaults)?)));
    let result = match queries {
        Ok((historical, rank)) => state.statistics_service.overview(&historical, rank).await,
        Err(e) => Err(e),
    };
    respond(result, accepts_brotli(&headers)).await
}

async fn respond<T: Serialize>(result: Result<T, StatsError>, compress: bool) -> Response {
    match result {
        Ok(data) => match json_response(StatusCode::OK, &data, compress).await {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) => {
            if let StatsError::InvalidQuery(reason) = &e {
                tracing::warn!(%reason, "Rejected query");
            }
            e.into_response()
        }
    }
}
