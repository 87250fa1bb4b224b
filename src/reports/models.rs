//! Aggregated report views.
//!
//! Both reports run one raw query producing flat rows and fold them into
//! per-gamer groups. Groups appear in the order their gamer is first seen
//! in the row stream and events/games keep the row order within a group.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date, Integer, Text, Time};

use crate::db;
use crate::errors::ServiceError;

const EVENTS_BY_ORGANIZER_SQL: &str = "
    SELECT
        e.id,
        e.description,
        e.date,
        e.time,
        e.game_id,
        games.title AS game_name,
        e.organizer_id,
        users.first_name || ' ' || users.last_name AS full_name
    FROM events e
    JOIN gamers ON gamers.id = e.organizer_id
    JOIN users ON users.id = gamers.user_id
    JOIN games ON games.id = e.game_id
";

const GAMES_BY_GAMER_SQL: &str = "
    SELECT
        games.id,
        games.title,
        games.maker,
        games.number_of_players,
        games.skill_level,
        games.gamer_id,
        users.first_name || ' ' || users.last_name AS full_name
    FROM games
    JOIN gamers ON gamers.id = games.gamer_id
    JOIN users ON users.id = gamers.user_id
";

#[derive(Debug, QueryableByName)]
pub struct EventReportRow {
    #[sql_type = "BigInt"]
    pub id: i64,
    #[sql_type = "Text"]
    pub description: String,
    #[sql_type = "Date"]
    pub date: NaiveDate,
    #[sql_type = "Time"]
    pub time: NaiveTime,
    #[sql_type = "BigInt"]
    pub game_id: i64,
    #[sql_type = "Text"]
    pub game_name: String,
    #[sql_type = "BigInt"]
    pub organizer_id: i64,
    #[sql_type = "Text"]
    pub full_name: String,
}

#[derive(Debug, QueryableByName)]
pub struct GameReportRow {
    #[sql_type = "BigInt"]
    pub id: i64,
    #[sql_type = "Text"]
    pub title: String,
    #[sql_type = "Text"]
    pub maker: String,
    #[sql_type = "Integer"]
    pub number_of_players: i32,
    #[sql_type = "Integer"]
    pub skill_level: i32,
    #[sql_type = "BigInt"]
    pub gamer_id: i64,
    #[sql_type = "Text"]
    pub full_name: String,
}

#[derive(Debug, Serialize)]
pub struct EventSummary {
    pub id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub game_name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct OrganizerEvents {
    pub organizer_id: i64,
    pub full_name: String,
    pub events: Vec<EventSummary>,
}

#[derive(Debug, Serialize)]
pub struct GameEntry {
    pub id: i64,
    pub title: String,
    pub maker: String,
    pub number_of_players: i32,
    pub skill_level: i32,
}

#[derive(Debug, Serialize)]
pub struct GamerGames {
    pub gamer_id: i64,
    pub full_name: String,
    pub games: Vec<GameEntry>,
}

pub fn user_events(conn: &db::Conn) -> Result<Vec<OrganizerEvents>, ServiceError> {
    let rows = diesel::sql_query(EVENTS_BY_ORGANIZER_SQL).load::<EventReportRow>(conn)?;

    Ok(events_by_organizer(rows))
}

pub fn user_games(conn: &db::Conn) -> Result<Vec<GamerGames>, ServiceError> {
    let rows = diesel::sql_query(GAMES_BY_GAMER_SQL).load::<GameReportRow>(conn)?;

    Ok(games_by_gamer(rows))
}

/// Fold flat event rows into one group per organizer. The group index is
/// keyed by organizer id so a single forward pass suffices regardless of
/// row count.
pub fn events_by_organizer(rows: Vec<EventReportRow>) -> Vec<OrganizerEvents> {
    let mut groups: Vec<OrganizerEvents> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let event = EventSummary {
            id: row.id,
            date: row.date,
            time: row.time,
            game_name: row.game_name,
            description: row.description,
        };

        match index.get(&row.organizer_id) {
            Some(&position) => groups[position].events.push(event),
            None => {
                index.insert(row.organizer_id, groups.len());
                groups.push(OrganizerEvents {
                    organizer_id: row.organizer_id,
                    full_name: row.full_name,
                    events: vec![event],
                });
            }
        }
    }

    groups
}

pub fn games_by_gamer(rows: Vec<GameReportRow>) -> Vec<GamerGames> {
    let mut groups: Vec<GamerGames> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let game = GameEntry {
            id: row.id,
            title: row.title,
            maker: row.maker,
            number_of_players: row.number_of_players,
            skill_level: row.skill_level,
        };

        match index.get(&row.gamer_id) {
            Some(&position) => groups[position].games.push(game),
            None => {
                index.insert(row.gamer_id, groups.len());
                groups.push(GamerGames {
                    gamer_id: row.gamer_id,
                    full_name: row.full_name,
                    games: vec![game],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, organizer_id: i64, full_name: &str) -> EventReportRow {
        EventReportRow {
            id,
            description: String::from("a game night"),
            date: NaiveDate::from_ymd(2020, 12, 23),
            time: NaiveTime::from_hms(19, 0, 0),
            game_id: 1,
            game_name: String::from("Fortress America"),
            organizer_id,
            full_name: String::from(full_name),
        }
    }

    #[test]
    fn groups_follow_first_appearance_order() {
        let rows = vec![row(10, 1, "A B"), row(11, 2, "C D"), row(12, 1, "A B")];

        let groups = events_by_organizer(rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].organizer_id, 1);
        assert_eq!(groups[1].organizer_id, 2);
    }

    #[test]
    fn events_keep_row_order_within_a_group() {
        let rows = vec![row(10, 1, "A B"), row(11, 2, "C D"), row(12, 1, "A B")];

        let groups = events_by_organizer(rows);

        let ids: Vec<i64> = groups[0].events.iter().map(|event| event.id).collect();
        assert_eq!(ids, vec![10, 12]);
        assert_eq!(groups[0].full_name, "A B");

        let ids: Vec<i64> = groups[1].events.iter().map(|event| event.id).collect();
        assert_eq!(ids, vec![11]);
    }

    #[test]
    fn no_rows_means_no_groups() {
        assert!(events_by_organizer(Vec::new()).is_empty());
    }

    #[test]
    fn games_grouped_per_gamer() {
        let game = |id: i64, gamer_id: i64| GameReportRow {
            id,
            title: String::from("Ticket to Ride"),
            maker: String::from("Days of Wonder"),
            number_of_players: 4,
            skill_level: 2,
            gamer_id,
            full_name: String::from("Molly Ringwald"),
        };

        let groups = games_by_gamer(vec![game(1, 7), game(2, 7), game(3, 8)]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].games.len(), 2);
        assert_eq!(groups[1].games.len(), 1);
    }
}
