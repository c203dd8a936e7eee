use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::{EventProvider, LeagueId, ProviderError, TeamQuery, TeamSchedule};
use crate::model::{Event, GameStatus, TeamInfo, TeamRecord};

/// Event provider backed by ESPN's public site API.
/// Docs: <https://site.api.espn.com/apis/site/v2/sports/>
pub struct EspnProvider {
    http: Client,
    /// Base URL up to and including `/sports`, overridable in tests.
    base_url: String,
}

impl EspnProvider {
    pub fn new(base_url: &str, timeout: std::time::Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(EspnProvider {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, url: &str, team_route: Option<&str>) -> Result<Value, ProviderError> {
        debug!("Fetching {}", url);
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Upstream(anyhow!(e).context("ESPN request failed")))?;

        let status = resp.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
            // On the team routes ESPN answers 400/404 for a slug it does
            // not recognize; that is the caller's mistake, not an outage.
            if let Some(team) = team_route {
                return Err(ProviderError::UnknownTeam(team.to_string()));
            }
        }
        if !status.is_success() {
            return Err(ProviderError::Upstream(anyhow!("ESPN error: {}", status)));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| ProviderError::Malformed(format!("invalid JSON: {}", e)))
    }
}

#[async_trait]
impl EventProvider for EspnProvider {
    fn name(&self) -> &str {
        "ESPN"
    }

    async fn team_schedule(&self, query: &TeamQuery) -> Result<TeamSchedule, ProviderError> {
        let url = format!(
            "{}/{}/{}/teams/{}/schedule",
            self.base_url, query.league.sport, query.league.league, query.team
        );
        let raw = self.get_json(&url, Some(&query.team)).await?;

        let team = parse_team_info(&raw)
            .ok_or_else(|| ProviderError::UnknownTeam(query.team.clone()))?;
        let events = parse_events(&raw, &query.league, Utc::now());
        Ok(TeamSchedule { team, events })
    }

    async fn league_events(&self, league: &LeagueId) -> Result<Vec<Event>, ProviderError> {
        let url = format!(
            "{}/{}/{}/scoreboard",
            self.base_url, league.sport, league.league
        );
        let raw = self.get_json(&url, None).await?;
        Ok(parse_events(&raw, league, Utc::now()))
    }
}

fn parse_team_info(raw: &Value) -> Option<TeamInfo> {
    let team = raw.get("team")?;
    let display_name = team["displayName"].as_str()?.to_string();
    // Schedule payloads carry either a bare "logo" URL or a "logos" array.
    let logo = team["logo"]
        .as_str()
        .or_else(|| team["logos"][0]["href"].as_str())
        .map(|s| s.to_string());
    let color = team["color"].as_str().map(|s| s.to_string());
    Some(TeamInfo { display_name, logo, color })
}

/// Parse the `events` array shared by the scoreboard and schedule payloads.
/// Malformed entries are skipped with a debug log; one bad event never
/// fails the batch.
fn parse_events(raw: &Value, league: &LeagueId, retrieved_at: DateTime<Utc>) -> Vec<Event> {
    let events = match raw["events"].as_array() {
        Some(a) => a,
        None => return vec![],
    };

    events
        .iter()
        .filter_map(|ev| match parse_event(ev, league, retrieved_at) {
            Some(event) => Some(event),
            None => {
                debug!(
                    "Skipping malformed event {} in {}/{}",
                    ev["id"].as_str().unwrap_or("?"),
                    league.sport,
                    league.league
                );
                None
            }
        })
        .collect()
}

fn parse_event(ev: &Value, league: &LeagueId, retrieved_at: DateTime<Utc>) -> Option<Event> {
    let id = ev["id"].as_str()?;
    let start_time = parse_espn_date(ev["date"].as_str()?)?;
    let competition = &ev["competitions"][0];
    let competitors = competition["competitors"].as_array()?;

    let home = competitors.iter().find(|c| c["homeAway"] == "home")?;
    let away = competitors.iter().find(|c| c["homeAway"] == "away")?;

    let event = Event::new(
        id,
        competitor_name(home)?,
        competitor_name(away)?,
        start_time,
        league.sport,
        league.league,
        retrieved_at,
    )
    .ok()?;

    let status = ev["status"]["type"]["name"]
        .as_str()
        .map(GameStatus::from_upstream)
        .unwrap_or(GameStatus::Scheduled);

    Some(
        event
            .with_status(status)
            .with_scores(competitor_score(home), competitor_score(away))
            .with_records(competitor_record(home), competitor_record(away))
            .with_ranks(competitor_rank(home), competitor_rank(away))
            .with_national_broadcast(has_national_broadcast(competition)),
    )
}

fn competitor_name(c: &Value) -> Option<&str> {
    c["team"]["displayName"].as_str()
}

/// Scores arrive as strings on the scoreboard, numbers or `{value}`
/// objects on the schedule, and are absent before tip-off.
fn competitor_score(c: &Value) -> Option<i32> {
    let score = &c["score"];
    score
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| score.as_i64().map(|v| v as i32))
        .or_else(|| score["value"].as_f64().map(|v| v as i32))
}

fn competitor_record(c: &Value) -> Option<TeamRecord> {
    let records = c["records"].as_array()?;
    // Prefer the overall/total record over home/road splits.
    let overall = records
        .iter()
        .find(|r| r["type"] == "total" || r["name"] == "overall")
        .or_else(|| records.first())?;
    TeamRecord::parse_summary(overall["summary"].as_str()?)
}

fn competitor_rank(c: &Value) -> Option<u32> {
    let rank = c["curatedRank"]["current"].as_u64()?;
    // ESPN reports 99 for unranked teams.
    if rank >= 99 {
        None
    } else {
        Some(rank as u32)
    }
}

fn has_national_broadcast(competition: &Value) -> bool {
    competition["broadcasts"]
        .as_array()
        .map(|bs| bs.iter().any(|b| b["market"] == "national"))
        .unwrap_or(false)
}

/// ESPN dates come as RFC 3339 or the abbreviated "2023-03-11T00:00Z".
fn parse_espn_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nba() -> LeagueId {
        LeagueId::resolve("basketball", "nba").unwrap()
    }

    fn scoreboard_event() -> Value {
        json!({
            "id": "401442",
            "date": "2023-03-11T00:30Z",
            "status": { "type": { "name": "STATUS_IN_PROGRESS" } },
            "competitions": [{
                "competitors": [
                    {
                        "homeAway": "home",
                        "team": { "displayName": "Boston Celtics" },
                        "score": "54",
                        "records": [{ "type": "total", "summary": "48-20" }],
                        "curatedRank": { "current": 99 }
                    },
                    {
                        "homeAway": "away",
                        "team": { "displayName": "Philadelphia 76ers" },
                        "score": "51",
                        "records": [{ "type": "total", "summary": "44-24" }]
                    }
                ],
                "broadcasts": [{ "market": "national", "names": ["ESPN"] }]
            }]
        })
    }

    #[test]
    fn test_parse_scoreboard_event() {
        let raw = json!({ "events": [scoreboard_event()] });
        let events = parse_events(&raw, &nba(), Utc::now());
        assert_eq!(events.len(), 1);

        let ev = &events[0];
        assert_eq!(ev.id, "401442");
        assert_eq!(ev.name, "Philadelphia 76ers at Boston Celtics");
        assert_eq!(ev.home_score, Some(54));
        assert_eq!(ev.away_score, Some(51));
        assert_eq!(ev.status, GameStatus::InProgress);
        assert_eq!(ev.home_record, Some(TeamRecord::new(48, 20)));
        assert_eq!(ev.home_rank, None); // 99 means unranked
        assert!(ev.national_broadcast);
    }

    #[test]
    fn test_malformed_event_is_skipped_not_fatal() {
        let raw = json!({
            "events": [
                { "id": "broken" },
                scoreboard_event()
            ]
        });
        let events = parse_events(&raw, &nba(), Utc::now());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "401442");
    }

    #[test]
    fn test_scheduled_event_without_scores() {
        let raw = json!({
            "events": [{
                "id": "500",
                "date": "2023-03-15T23:00Z",
                "status": { "type": { "name": "STATUS_SCHEDULED" } },
                "competitions": [{
                    "competitors": [
                        { "homeAway": "home", "team": { "displayName": "Miami Heat" } },
                        { "homeAway": "away", "team": { "displayName": "Boston Celtics" } }
                    ]
                }]
            }]
        });
        let events = parse_events(&raw, &nba(), Utc::now());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].home_score, None);
        assert_eq!(events[0].status, GameStatus::Scheduled);
        assert!(!events[0].national_broadcast);
    }

    #[test]
    fn test_parse_team_info() {
        let raw = json!({
            "team": {
                "displayName": "Boston Red Sox",
                "color": "00224b",
                "logos": [{ "href": "https://a.espncdn.com/i/teamlogos/mlb/500/bos.png" }]
            }
        });
        let team = parse_team_info(&raw).unwrap();
        assert_eq!(team.display_name, "Boston Red Sox");
        assert_eq!(team.color.as_deref(), Some("00224b"));
        assert_eq!(
            team.logo.as_deref(),
            Some("https://a.espncdn.com/i/teamlogos/mlb/500/bos.png")
        );
    }

    #[test]
    fn test_parse_espn_date_formats() {
        assert!(parse_espn_date("2023-03-11T00:30Z").is_some());
        assert!(parse_espn_date("2023-03-11T00:30:00Z").is_some());
        assert!(parse_espn_date("yesterday").is_none());
    }

    #[test]
    fn test_competitor_score_shapes() {
        assert_eq!(competitor_score(&json!({ "score": "12" })), Some(12));
        assert_eq!(competitor_score(&json!({ "score": 12 })), Some(12));
        assert_eq!(competitor_score(&json!({ "score": { "value": 12.0 } })), Some(12));
        assert_eq!(competitor_score(&json!({})), None);
    }
}
