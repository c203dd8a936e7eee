pub mod response;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::error::ServiceError;
use crate::provider::{fetch_all_leagues, EventProvider, LeagueId, TeamQuery};
use crate::ranking::{select_top, ScoringPolicy};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn EventProvider>,
    pub policy: ScoringPolicy,
    /// Per-league budget for the importance query's fan-out fetch.
    pub fetch_timeout: Duration,
}

/// Build the Axum router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sports", get(sports_handler))
        .route("/important", get(important_handler))
        .fallback(fallback_handler)
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Every resolved request answers HTTP 200; the body's `result` key carries
/// the outcome. Validation failures never reach the ranking core.
fn respond(result: Result<Map<String, Value>, ServiceError>) -> Json<Map<String, Value>> {
    match result {
        Ok(map) => Json(map),
        Err(err) => {
            debug!("Request resolved to {}: {}", err.result_code(), err);
            Json(response::error(&err))
        }
    }
}

fn required_param<'a>(
    params: &'a HashMap<String, String>,
    name: &str,
) -> Result<&'a str, ServiceError> {
    params
        .get(name)
        .map(|s| s.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServiceError::BadRequest(format!("missing query parameter '{}'", name)))
}

/// GET /sports?sport=basketball&league=nba&team=boston-celtics
async fn sports_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    respond(handle_sports(&state, &params).await)
}

async fn handle_sports(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<Map<String, Value>, ServiceError> {
    let sport = required_param(params, "sport")?;
    let league = required_param(params, "league")?;
    let team = required_param(params, "team")?;

    let league = LeagueId::resolve(sport, league).ok_or_else(|| {
        ServiceError::BadRequest(format!("unknown sport/league '{}/{}'", sport, league))
    })?;

    let query = TeamQuery { league, team: team.to_string() };
    let schedule = state.provider.team_schedule(&query).await?;
    Ok(response::team_schedule(&schedule.team, &schedule.events))
}

/// GET /important?count=5
async fn important_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    respond(handle_important(&state, &params).await)
}

async fn handle_important(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<Map<String, Value>, ServiceError> {
    let raw_count = required_param(params, "count")?;
    let count: i64 = raw_count
        .parse()
        .map_err(|_| ServiceError::BadRequest(format!("count '{}' is not an integer", raw_count)))?;
    if count < 0 {
        return Err(ServiceError::BadRequest(format!(
            "count must be non-negative, got {}",
            count
        )));
    }

    let events = fetch_all_leagues(Arc::clone(&state.provider), state.fetch_timeout).await?;
    let ranked = select_top(events, count as usize, &state.policy)?;
    Ok(response::important_games(&ranked))
}

/// Unmatched routes get a generic not-found body.
async fn fallback_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(response::not_found()))
}
