use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Raised when the upstream payload is missing a field the model requires.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("event is missing required field '{0}'")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final,
}

impl GameStatus {
    /// Map an upstream status name (e.g. ESPN's "STATUS_IN_PROGRESS") onto
    /// the three states the model distinguishes.
    pub fn from_upstream(s: &str) -> GameStatus {
        match s.to_uppercase().as_str() {
            "STATUS_SCHEDULED" | "STATUS_POSTPONED" | "PRE" | "SCHEDULED" => GameStatus::Scheduled,
            "STATUS_FINAL" | "STATUS_FULL_TIME" | "POST" | "FINAL" => GameStatus::Final,
            _ => GameStatus::InProgress,
        }
    }
}

/// A team's season record. Used as a proxy for team strength when a game
/// has not been played yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
}

impl TeamRecord {
    pub fn new(wins: u32, losses: u32) -> Self {
        TeamRecord { wins, losses }
    }

    /// Win percentage in [0, 1]. A team with no games yet sits at 0.5.
    pub fn win_pct(&self) -> f64 {
        let played = self.wins + self.losses;
        if played == 0 {
            0.5
        } else {
            f64::from(self.wins) / f64::from(played)
        }
    }

    /// Parse an upstream "W-L" summary such as "12-4".
    pub fn parse_summary(summary: &str) -> Option<TeamRecord> {
        let (w, l) = summary.split_once('-')?;
        Some(TeamRecord {
            wins: w.trim().parse().ok()?,
            losses: l.trim().parse().ok()?,
        })
    }
}

/// Team metadata surfaced on the schedule endpoint.
#[derive(Debug, Clone)]
pub struct TeamInfo {
    pub display_name: String,
    pub logo: Option<String>,
    /// Primary brand color as a hex string without '#', e.g. "00224b".
    pub color: Option<String>,
}

/// One scheduled or completed sporting contest, normalized away from the
/// upstream schema. Built fresh per request, immutable once constructed.
///
/// Scoring metadata (records, ranks, broadcast prominence) is pre-resolved
/// and attached at fetch time so that scoring stays a pure function of the
/// event.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: String,
    /// Derived display name, always "<Away> at <Home>".
    pub name: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub sport: String,
    pub league: String,
    pub status: GameStatus,
    pub home_record: Option<TeamRecord>,
    pub away_record: Option<TeamRecord>,
    /// Poll/curated rank where the league has one (e.g. AP top 25).
    pub home_rank: Option<u32>,
    pub away_rank: Option<u32>,
    pub national_broadcast: bool,
    /// When the adapter fetched this event. Reference instant for the
    /// timing factor, so scoring never has to consult the wall clock.
    pub retrieved_at: DateTime<Utc>,
}

impl Event {
    /// Construct a normalized event. Fails when a required upstream field
    /// is missing or blank; the display name is derived, never supplied.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        start_time: DateTime<Utc>,
        sport: impl Into<String>,
        league: impl Into<String>,
        retrieved_at: DateTime<Utc>,
    ) -> Result<Event, ModelError> {
        let id = id.into();
        let home_team = home_team.into();
        let away_team = away_team.into();
        if id.trim().is_empty() {
            return Err(ModelError::MissingField("id"));
        }
        if home_team.trim().is_empty() {
            return Err(ModelError::MissingField("home_team"));
        }
        if away_team.trim().is_empty() {
            return Err(ModelError::MissingField("away_team"));
        }
        let name = format!("{} at {}", away_team, home_team);
        Ok(Event {
            id,
            name,
            home_team,
            away_team,
            home_score: None,
            away_score: None,
            start_time,
            sport: sport.into(),
            league: league.into(),
            status: GameStatus::Scheduled,
            home_record: None,
            away_record: None,
            home_rank: None,
            away_rank: None,
            national_broadcast: false,
            retrieved_at,
        })
    }

    pub fn with_scores(mut self, home: Option<i32>, away: Option<i32>) -> Self {
        self.home_score = home;
        self.away_score = away;
        self
    }

    pub fn with_status(mut self, status: GameStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_records(mut self, home: Option<TeamRecord>, away: Option<TeamRecord>) -> Self {
        self.home_record = home;
        self.away_record = away;
        self
    }

    pub fn with_ranks(mut self, home: Option<u32>, away: Option<u32>) -> Self {
        self.home_rank = home;
        self.away_rank = away;
        self
    }

    pub fn with_national_broadcast(mut self, national: bool) -> Self {
        self.national_broadcast = national;
        self
    }

    /// Absolute score margin, when both scores are known.
    pub fn margin(&self) -> Option<i32> {
        Some((self.home_score? - self.away_score?).abs())
    }

    pub fn is_live(&self) -> bool {
        self.status == GameStatus::InProgress
    }
}
