pub mod espn;

pub use espn::EspnProvider;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::model::{Event, TeamInfo};

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The upstream does not know this team slug.
    #[error("unknown team '{0}'")]
    UnknownTeam(String),

    /// The upstream could not be reached or answered with an error.
    #[error("upstream request failed: {0}")]
    Upstream(anyhow::Error),

    /// The upstream answered, but the payload was not usable.
    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

/// A supported sport/league pair. Queries for anything outside the
/// catalog are rejected at the boundary, before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueId {
    pub sport: &'static str,
    pub league: &'static str,
}

/// Sport/league pairs this service can retrieve.
const CATALOG: &[LeagueId] = &[
    LeagueId { sport: "basketball", league: "nba" },
    LeagueId { sport: "football", league: "nfl" },
    LeagueId { sport: "baseball", league: "mlb" },
    LeagueId { sport: "hockey", league: "nhl" },
];

impl LeagueId {
    /// Look up a sport/league pair in the catalog. `None` means the caller
    /// asked for something this service does not serve.
    pub fn resolve(sport: &str, league: &str) -> Option<LeagueId> {
        let sport = sport.to_lowercase();
        let league = league.to_lowercase();
        CATALOG
            .iter()
            .find(|id| id.sport == sport && id.league == league)
            .cloned()
    }

    pub fn all() -> &'static [LeagueId] {
        CATALOG
    }
}

/// A team-scoped query, validated against the catalog.
#[derive(Debug, Clone)]
pub struct TeamQuery {
    pub league: LeagueId,
    /// Team slug as the upstream expects it, e.g. "boston-celtics".
    pub team: String,
}

/// A team's metadata together with its schedule of events.
#[derive(Debug, Clone)]
pub struct TeamSchedule {
    pub team: TeamInfo,
    pub events: Vec<Event>,
}

/// Trait every upstream data source must implement.
#[async_trait]
pub trait EventProvider: Send + Sync {
    /// Fetch one team's metadata and schedule.
    async fn team_schedule(&self, query: &TeamQuery) -> Result<TeamSchedule, ProviderError>;

    /// Fetch the current slate of events for one league.
    async fn league_events(&self, league: &LeagueId) -> Result<Vec<Event>, ProviderError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Fetch every catalog league concurrently and merge whatever succeeded.
///
/// Individual league failures are logged and tolerated; the call only
/// fails when *no* league produced data, which the caller surfaces as a
/// data-source error. Each fetch gets its own timeout so one slow league
/// cannot stall the request.
pub async fn fetch_all_leagues(
    provider: Arc<dyn EventProvider>,
    fetch_timeout: Duration,
) -> Result<Vec<Event>, ProviderError> {
    let fetches: Vec<_> = LeagueId::all()
        .iter()
        .map(|league| {
            let provider = Arc::clone(&provider);
            async move {
                let res = tokio::time::timeout(fetch_timeout, provider.league_events(league)).await;
                let out = match res {
                    Ok(result) => result,
                    Err(_) => Err(ProviderError::Upstream(anyhow::anyhow!(
                        "timed out after {:?}",
                        fetch_timeout
                    ))),
                };
                (league, out)
            }
        })
        .collect();

    let results = futures_util::future::join_all(fetches).await;

    let mut events = Vec::new();
    let mut failures = 0usize;
    for (league, result) in results {
        match result {
            Ok(mut league_events) => events.append(&mut league_events),
            Err(e) => {
                failures += 1;
                warn!("League {}/{} fetch failed: {}", league.sport, league.league, e);
            }
        }
    }

    if events.is_empty() && failures == LeagueId::all().len() {
        return Err(ProviderError::Upstream(anyhow::anyhow!(
            "all {} league fetches failed",
            failures
        )));
    }

    info!(
        "Retrieved {} events across {} leagues ({} failed)",
        events.len(),
        LeagueId::all().len() - failures,
        failures
    );
    Ok(events)
}
