//! Interest scoring for sporting events.
//!
//! Each event gets a real-valued score; higher means a fan is more likely
//! to care. The score is a weighted mean of three sub-factors, each in
//! [0, 1]:
//!
//! - **Competitiveness**: close contests beat blowouts. Uses the live or
//!   final margin when scores exist, otherwise the gap between the teams'
//!   win percentages.
//! - **Prominence**: matchups between good teams, ranked teams, or games
//!   on a national broadcast.
//! - **Timing**: tonight's game beats one three weeks out; recently
//!   finished games fade the same way.
//!
//! A factor whose inputs are missing drops out of both the numerator and
//! the denominator, so sparse events still score on whatever is available.
//! Only an event with *no* available factor is unscorable and gets
//! excluded from ranking.
//!
//! The weights are policy, not structure: `ScoringPolicy` is plain data
//! and can be swapped without touching the selector or the handlers.

use crate::model::Event;

/// Weighting policy for the interest score.
///
/// All weights must be non-negative; the score is monotonic in each
/// sub-factor. The defaults are a considered starting point, not a law.
#[derive(Debug, Clone)]
pub struct ScoringPolicy {
    pub competitiveness_weight: f64,
    pub prominence_weight: f64,
    pub timing_weight: f64,
    /// Flat bonus added when the game is currently in progress.
    pub live_bonus: f64,
    /// Half-life-ish scale (hours) for the timing decay.
    pub time_decay_hours: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy {
            competitiveness_weight: 0.45,
            prominence_weight: 0.35,
            timing_weight: 0.20,
            live_bonus: 0.15,
            time_decay_hours: 36.0,
        }
    }
}

impl ScoringPolicy {
    /// Score one event. Pure and deterministic: reads only the event's
    /// own attributes (the timing reference is the event's `retrieved_at`,
    /// stamped at fetch time).
    ///
    /// Returns `None` when no sub-factor is available or every weight is
    /// zero; such events are dropped from ranking, not failed on.
    pub fn score(&self, event: &Event) -> Option<f64> {
        let mut total = 0.0;
        let mut weight = 0.0;

        if let Some(c) = competitiveness(event) {
            total += self.competitiveness_weight * c;
            weight += self.competitiveness_weight;
        }
        if let Some(p) = prominence(event) {
            total += self.prominence_weight * p;
            weight += self.prominence_weight;
        }
        if let Some(t) = timing(event, self.time_decay_hours) {
            total += self.timing_weight * t;
            weight += self.timing_weight;
        }

        if weight <= 0.0 {
            return None;
        }

        let mut score = total / weight;
        if event.is_live() {
            score += self.live_bonus;
        }
        Some(score)
    }
}

// ── Competitiveness ──────────────────────────────────────────────────────────
//
// With scores: exp(-margin / scale), where scale is the sport's typical
// margin. A 10-point NBA game and a 2-goal NHL game are comparably close;
// raw margins are not comparable across sports.
//
// Without scores: 1 - |home_pct - away_pct|. Two .700 teams → 1.0; a .900
// team hosting a .100 team → 0.2.

/// Typical winning margin per sport, used to normalize live/final margins.
fn margin_scale(sport: &str) -> f64 {
    match sport {
        "basketball" => 10.0,
        "football" => 7.0,
        "baseball" => 3.0,
        "hockey" => 2.0,
        _ => 5.0,
    }
}

fn competitiveness(event: &Event) -> Option<f64> {
    if let Some(margin) = event.margin() {
        let scale = margin_scale(&event.sport);
        return Some((-f64::from(margin) / scale).exp());
    }
    match (event.home_record, event.away_record) {
        (Some(home), Some(away)) => Some(1.0 - (home.win_pct() - away.win_pct()).abs()),
        _ => None,
    }
}

// ── Prominence ───────────────────────────────────────────────────────────────
//
// Base: average win percentage of the two teams (good teams draw eyes).
// Ranked teams and national broadcasts add fixed boosts on top. Clamped
// to [0, 1] so the factor stays commensurate with the others.

/// Boost per team carrying a poll/curated rank.
const RANKED_TEAM_BOOST: f64 = 0.15;
/// Boost for a nationally broadcast game.
const NATIONAL_BROADCAST_BOOST: f64 = 0.20;

fn prominence(event: &Event) -> Option<f64> {
    let mut value = 0.0;
    let mut available = false;

    if let (Some(home), Some(away)) = (event.home_record, event.away_record) {
        value = (home.win_pct() + away.win_pct()) / 2.0;
        available = true;
    }
    if event.home_rank.is_some() {
        value += RANKED_TEAM_BOOST;
        available = true;
    }
    if event.away_rank.is_some() {
        value += RANKED_TEAM_BOOST;
        available = true;
    }
    if event.national_broadcast {
        value += NATIONAL_BROADCAST_BOOST;
        available = true;
    }

    if available {
        Some(value.clamp(0.0, 1.0))
    } else {
        None
    }
}

// ── Timing ───────────────────────────────────────────────────────────────────
//
// exp(-|start - retrieved| / tau). A game in progress sits near distance
// zero and scores ~1; a game 36 hours out (default tau) scores ~0.37.
// Symmetric on purpose: last night's final is as recent as tomorrow's
// tip-off is near.

fn timing(event: &Event, decay_hours: f64) -> Option<f64> {
    if decay_hours <= 0.0 {
        return None;
    }
    let distance = event
        .start_time
        .signed_duration_since(event.retrieved_at)
        .num_minutes()
        .abs() as f64
        / 60.0;
    Some((-distance / decay_hours).exp())
}
