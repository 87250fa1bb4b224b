//! Derived counts attached to listing responses.
//!
//! The counts are taken over the current related rows at query time,
//! nothing here is cached or stored on the entities themselves.

use std::collections::HashMap;

use diesel::prelude::*;

use crate::db;
use crate::errors::ServiceError;
use crate::schema::{attendances, events};

/// Distinct attendee totals for a set of events, keyed by event id.
/// Distinctness comes from the (gamer_id, event_id) primary key.
pub struct AttendeeCounts(HashMap<i64, i64>);

impl AttendeeCounts {
    pub fn load(event_ids: &[i64], conn: &db::Conn) -> Result<AttendeeCounts, ServiceError> {
        let rows = attendances::table
            .filter(attendances::event_id.eq_any(event_ids))
            .select(attendances::event_id)
            .load::<i64>(conn)?;

        Ok(AttendeeCounts(tally(rows)))
    }

    pub fn get(&self, event_id: i64) -> i64 {
        self.0.get(&event_id).copied().unwrap_or(0)
    }
}

/// Event totals per game, along with the share organized by one gamer.
pub struct EventCounts {
    total: HashMap<i64, i64>,
    organized: HashMap<i64, i64>,
}

impl EventCounts {
    pub fn load(
        game_ids: &[i64],
        organizer_id: i64,
        conn: &db::Conn,
    ) -> Result<EventCounts, ServiceError> {
        let rows = events::table
            .filter(events::game_id.eq_any(game_ids))
            .select((events::game_id, events::organizer_id))
            .load::<(i64, i64)>(conn)?;

        Ok(EventCounts::from_rows(rows, organizer_id))
    }

    fn from_rows(rows: Vec<(i64, i64)>, organizer_id: i64) -> EventCounts {
        let total = tally(rows.iter().map(|(game_id, _)| *game_id));
        let organized = tally(
            rows.iter()
                .filter(|(_, organizer)| *organizer == organizer_id)
                .map(|(game_id, _)| *game_id),
        );

        EventCounts { total, organized }
    }

    /// events belonging to the game
    pub fn total(&self, game_id: i64) -> i64 {
        self.total.get(&game_id).copied().unwrap_or(0)
    }

    /// events belonging to the game that the requesting gamer organizes
    pub fn organized(&self, game_id: i64) -> i64 {
        self.organized.get(&game_id).copied().unwrap_or(0)
    }
}

fn tally(ids: impl IntoIterator<Item = i64>) -> HashMap<i64, i64> {
    let mut counts: HashMap<i64, i64> = HashMap::new();
    for id in ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendee_count_equals_relation_rows() {
        let counts = AttendeeCounts(tally(vec![5, 5, 5, 9]));

        assert_eq!(counts.get(5), 3);
        assert_eq!(counts.get(9), 1);
    }

    #[test]
    fn absent_event_counts_zero() {
        let counts = AttendeeCounts(tally(vec![]));

        assert_eq!(counts.get(1), 0);
    }

    #[test]
    fn events_tallied_per_game() {
        // (game_id, organizer_id)
        let rows = vec![(1, 10), (1, 11), (1, 10), (2, 11)];
        let counts = EventCounts::from_rows(rows, 10);

        assert_eq!(counts.total(1), 3);
        assert_eq!(counts.total(2), 1);
        assert_eq!(counts.total(3), 0);
    }

    #[test]
    fn organized_count_is_scoped_to_the_gamer() {
        let rows = vec![(1, 10), (1, 11), (1, 10), (2, 11)];
        let counts = EventCounts::from_rows(rows, 10);

        assert_eq!(counts.organized(1), 2);
        assert_eq!(counts.organized(2), 0);
    }
}
