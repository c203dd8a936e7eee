pub mod scoring;

pub use scoring::ScoringPolicy;

use thiserror::Error;
use tracing::debug;

use crate::model::Event;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankingError {
    /// The candidate pool was empty: the data source supplied nothing.
    /// Distinct from "fewer than k interesting events exist", which is an
    /// under-full success.
    #[error("no events available to rank")]
    NoData,
}

/// Select the `count` highest-interest events from the pool.
///
/// Every candidate is scored through the policy; events that cannot be
/// scored are dropped from the pool rather than failing the request.
/// Ordering is strictly deterministic: descending score, then earliest
/// start time, then identifier. An under-full pool returns everything it
/// has; an empty pool is a `NoData` error.
pub fn select_top(
    events: Vec<Event>,
    count: usize,
    policy: &ScoringPolicy,
) -> Result<Vec<Event>, RankingError> {
    if events.is_empty() {
        return Err(RankingError::NoData);
    }

    let mut scored: Vec<(f64, Event)> = events
        .into_iter()
        .filter_map(|event| match policy.score(&event) {
            Some(score) => Some((score, event)),
            None => {
                debug!("Dropping unscorable event '{}' ({})", event.name, event.id);
                None
            }
        })
        .collect();

    scored.sort_by(|(score_a, ev_a), (score_b, ev_b)| {
        score_b
            .total_cmp(score_a)
            .then_with(|| ev_a.start_time.cmp(&ev_b.start_time))
            .then_with(|| ev_a.id.cmp(&ev_b.id))
    });
    scored.truncate(count);

    Ok(scored.into_iter().map(|(_, event)| event).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TeamRecord;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 3, 10, 18, 0, 0).unwrap()
    }

    /// Event whose interest is controlled by how close its scoreline is.
    fn event_with_margin(id: &str, margin: i32) -> Event {
        Event::new(id, "Home", "Away", now(), "basketball", "nba", now())
            .unwrap()
            .with_scores(Some(100), Some(100 - margin))
    }

    fn pool() -> Vec<Event> {
        vec![
            event_with_margin("b", 20),
            event_with_margin("a", 2),
            event_with_margin("c", 8),
        ]
    }

    #[test]
    fn test_returns_min_of_count_and_pool() {
        let policy = ScoringPolicy::default();
        assert_eq!(select_top(pool(), 2, &policy).unwrap().len(), 2);
        assert_eq!(select_top(pool(), 3, &policy).unwrap().len(), 3);
        // Under-full pool is a success, never an error.
        assert_eq!(select_top(pool(), 10, &policy).unwrap().len(), 3);
        assert_eq!(select_top(pool(), 0, &policy).unwrap().len(), 0);
    }

    #[test]
    fn test_orders_by_descending_score() {
        let policy = ScoringPolicy::default();
        let ranked = select_top(pool(), 3, &policy).unwrap();
        let ids: Vec<&str> = ranked.iter().map(|e| e.id.as_str()).collect();
        // Closest game first, blowout last.
        assert_eq!(ids, vec!["a", "c", "b"]);
        let scores: Vec<f64> = ranked.iter().map(|e| policy.score(e).unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_empty_pool_is_no_data() {
        assert_eq!(
            select_top(vec![], 5, &ScoringPolicy::default()).unwrap_err(),
            RankingError::NoData
        );
    }

    #[test]
    fn test_tie_break_by_start_time_then_id() {
        // Identical attributes → identical scores; order must still be
        // deterministic and reproducible.
        let mut early = event_with_margin("z", 2);
        early.start_time = now() - Duration::hours(1);
        let mut early_twin = event_with_margin("m", 2);
        early_twin.start_time = now() - Duration::hours(1);
        let late = event_with_margin("a", 2);

        let policy = ScoringPolicy {
            timing_weight: 0.0,
            live_bonus: 0.0,
            ..ScoringPolicy::default()
        };
        for _ in 0..5 {
            let ranked = select_top(
                vec![late.clone(), early.clone(), early_twin.clone()],
                3,
                &policy,
            )
            .unwrap();
            let ids: Vec<&str> = ranked.iter().map(|e| e.id.as_str()).collect();
            // Earlier start first; equal starts fall back to id order.
            assert_eq!(ids, vec!["m", "z", "a"]);
        }
    }

    #[test]
    fn test_unscorable_events_are_dropped_not_fatal() {
        // Bare event with zero-weight policy factors removed: give the
        // policy only record-based prominence so the bare event can't score.
        let policy = ScoringPolicy {
            competitiveness_weight: 0.0,
            timing_weight: 0.0,
            live_bonus: 0.0,
            time_decay_hours: 0.0,
            ..ScoringPolicy::default()
        };
        let scorable = Event::new("s", "Home", "Away", now(), "basketball", "nba", now())
            .unwrap()
            .with_records(Some(TeamRecord::new(30, 30)), Some(TeamRecord::new(30, 30)));
        let unscorable = Event::new("u", "Home", "Away", now(), "basketball", "nba", now()).unwrap();

        let ranked = select_top(vec![unscorable, scorable], 5, &policy).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "s");
    }
}
