//! Response assembly: converts ranked or filtered event sequences into the
//! ordered key/value wire contract. Every call builds a fresh map — there
//! is no shared response buffer to mutate across requests.

use serde_json::{json, Map, Value};

use crate::error::ServiceError;
use crate::model::{Event, TeamInfo};

/// Wire value of the `result` key on the happy path.
const RESULT_SUCCESS: &str = "success";

/// `{"result": "<error code>"}`
pub fn error(err: &ServiceError) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("result".into(), Value::String(err.result_code().into()));
    map
}

/// Body served on unmatched routes.
pub fn not_found() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("result".into(), Value::String("error_not_found".into()));
    map
}

/// Schedule response for one team: metadata, an `eventList` array, and
/// numbered `game0..gameN` entries mirroring the list order. Both shapes
/// are part of the wire contract.
pub fn team_schedule(team: &TeamInfo, events: &[Event]) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("result".into(), Value::String(RESULT_SUCCESS.into()));
    map.insert("displayName".into(), Value::String(team.display_name.clone()));
    if let Some(logo) = &team.logo {
        map.insert("logo".into(), Value::String(logo.clone()));
    }
    if let Some(color) = &team.color {
        map.insert("color".into(), Value::String(color.clone()));
    }
    map.insert(
        "eventList".into(),
        Value::Array(events.iter().map(event_summary).collect()),
    );
    for (i, event) in events.iter().enumerate() {
        map.insert(format!("game{}", i), game_entry(event));
    }
    map
}

/// Importance response: `game0..game{k-1}` in descending-score order.
pub fn important_games(events: &[Event]) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("result".into(), Value::String(RESULT_SUCCESS.into()));
    for (i, event) in events.iter().enumerate() {
        map.insert(format!("game{}", i), game_entry(event));
    }
    map
}

fn event_summary(event: &Event) -> Value {
    json!({
        "name": event.name,
        "homeTeamName": event.home_team,
        "awayTeamName": event.away_team,
        "homeScore": event.home_score,
        "awayScore": event.away_score,
        "date": event.start_time.to_rfc3339(),
        "status": event.status,
    })
}

fn game_entry(event: &Event) -> Value {
    json!({
        "gameName": event.name,
        "homeTeamName": event.home_team,
        "awayTeamName": event.away_team,
        "homeScore": event.home_score,
        "awayScore": event.away_score,
        "date": event.start_time.to_rfc3339(),
        "sport": event.sport,
        "league": event.league,
    })
}
