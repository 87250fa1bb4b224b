use std::collections::HashSet;

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db;
use crate::errors::ServiceError;
use crate::schema::attendances;

/// The signup relation between a gamer and an event.
///
/// A pair can only exist once, the table's composite primary key makes the
/// second signup a no-op rather than a duplicate row. The organizer of an
/// event is not automatically part of this relation.
#[derive(Debug, Serialize, Insertable, Queryable, Identifiable)]
#[table_name = "attendances"]
#[primary_key(gamer_id, event_id)]
pub struct Attendance {
    pub gamer_id: i64,
    pub event_id: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl Attendance {
    pub fn new(gamer_id: i64, event_id: i64) -> Attendance {
        Attendance {
            gamer_id,
            event_id,
            created_at: None,
        }
    }

    /// Sign the gamer up for the event. Signing up twice leaves exactly
    /// one relation row behind.
    pub fn signup(&self, conn: &db::Conn) -> Result<(), ServiceError> {
        diesel::insert_into(attendances::table)
            .values(self)
            .on_conflict((attendances::gamer_id, attendances::event_id))
            .do_nothing()
            .execute(conn)?;

        Ok(())
    }

    /// Remove the relation. Leaving an event the gamer never joined is
    /// a no-op.
    pub fn leave(&self, conn: &db::Conn) -> Result<(), ServiceError> {
        diesel::delete(
            attendances::table
                .filter(attendances::gamer_id.eq(self.gamer_id))
                .filter(attendances::event_id.eq(self.event_id)),
        )
        .execute(conn)?;

        Ok(())
    }

    pub fn is_attending(
        gamer_id: i64,
        event_id: i64,
        conn: &db::Conn,
    ) -> Result<bool, ServiceError> {
        let res = attendances::table
            .filter(attendances::gamer_id.eq(gamer_id))
            .filter(attendances::event_id.eq(event_id))
            .select(attendances::gamer_id)
            .first::<i64>(conn)
            .optional()?;

        Ok(res.is_some())
    }

    /// every event the gamer is signed up for, used to project the
    /// `joined` flag onto event listings
    pub fn event_ids_for(gamer_id: i64, conn: &db::Conn) -> Result<HashSet<i64>, ServiceError> {
        let ids = attendances::table
            .filter(attendances::gamer_id.eq(gamer_id))
            .select(attendances::event_id)
            .load::<i64>(conn)?;

        Ok(ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{events, game_types, games, gamers, users};

    /// These tests need a postgres instance and are skipped when
    /// DATABASE_URL is not set. Every test runs inside a test
    /// transaction that is rolled back afterwards, so nothing the
    /// fixtures insert ever hits the database for real.
    fn connection() -> Option<db::Conn> {
        let database_url = std::env::var("DATABASE_URL").ok()?;

        db::migrate(&database_url).ok()?;
        let pool = db::build_connection_pool(&database_url).ok()?;
        let conn = pool.get().ok()?;
        conn.begin_test_transaction().ok()?;

        Some(conn)
    }

    /// one gamer organizing one event, returns (gamer_id, event_id)
    fn seed(conn: &db::Conn) -> (i64, i64) {
        let user_id: i64 = diesel::insert_into(users::table)
            .values((
                users::username.eq("ledger-gamer"),
                users::password.eq("hunter2boogaloo"),
                users::first_name.eq("Molly"),
                users::last_name.eq("Ringwald"),
            ))
            .returning(users::id)
            .get_result(conn)
            .unwrap();

        let gamer_id: i64 = diesel::insert_into(gamers::table)
            .values(gamers::user_id.eq(user_id))
            .returning(gamers::id)
            .get_result(conn)
            .unwrap();

        let game_type_id: i64 = diesel::insert_into(game_types::table)
            .values(game_types::label.eq("ledger-board-game"))
            .returning(game_types::id)
            .get_result(conn)
            .unwrap();

        let game_id: i64 = diesel::insert_into(games::table)
            .values((
                games::game_type_id.eq(game_type_id),
                games::gamer_id.eq(gamer_id),
                games::title.eq("Fortress America"),
                games::maker.eq("Milton Bradley"),
                games::number_of_players.eq(4),
                games::skill_level.eq(2),
            ))
            .returning(games::id)
            .get_result(conn)
            .unwrap();

        let event_id: i64 = diesel::insert_into(events::table)
            .values((
                events::game_id.eq(game_id),
                events::organizer_id.eq(gamer_id),
                events::description.eq("friday night showdown"),
                events::date.eq(chrono::NaiveDate::from_ymd(2020, 12, 23)),
                events::time.eq(chrono::NaiveTime::from_hms(19, 0, 0)),
            ))
            .returning(events::id)
            .get_result(conn)
            .unwrap();

        (gamer_id, event_id)
    }

    fn relation_rows(gamer_id: i64, event_id: i64, conn: &db::Conn) -> i64 {
        attendances::table
            .filter(attendances::gamer_id.eq(gamer_id))
            .filter(attendances::event_id.eq(event_id))
            .count()
            .get_result(conn)
            .unwrap()
    }

    #[test]
    fn signup_then_leave_round_trip() {
        let conn = match connection() {
            Some(conn) => conn,
            None => return,
        };
        let (gamer_id, event_id) = seed(&conn);

        let attendance = Attendance::new(gamer_id, event_id);

        attendance.signup(&conn).unwrap();
        assert!(Attendance::is_attending(gamer_id, event_id, &conn).unwrap());

        attendance.leave(&conn).unwrap();
        assert!(!Attendance::is_attending(gamer_id, event_id, &conn).unwrap());
    }

    #[test]
    fn leaving_without_signup_is_a_noop() {
        let conn = match connection() {
            Some(conn) => conn,
            None => return,
        };
        let (gamer_id, event_id) = seed(&conn);

        Attendance::new(gamer_id, event_id).leave(&conn).unwrap();

        assert!(!Attendance::is_attending(gamer_id, event_id, &conn).unwrap());
        assert_eq!(relation_rows(gamer_id, event_id, &conn), 0);
    }

    #[test]
    fn double_signup_keeps_a_single_row() {
        let conn = match connection() {
            Some(conn) => conn,
            None => return,
        };
        let (gamer_id, event_id) = seed(&conn);

        let attendance = Attendance::new(gamer_id, event_id);

        attendance.signup(&conn).unwrap();
        attendance.signup(&conn).unwrap();

        assert_eq!(relation_rows(gamer_id, event_id, &conn), 1);
    }

    #[test]
    fn deleting_the_event_removes_its_relations() {
        let conn = match connection() {
            Some(conn) => conn,
            None => return,
        };
        let (gamer_id, event_id) = seed(&conn);

        Attendance::new(gamer_id, event_id).signup(&conn).unwrap();

        diesel::delete(events::table.filter(events::id.eq(event_id)))
            .execute(&conn)
            .unwrap();

        // the relation cascades away, the gamer stays
        assert_eq!(relation_rows(gamer_id, event_id, &conn), 0);
        let gamer: i64 = gamers::table
            .filter(gamers::id.eq(gamer_id))
            .count()
            .get_result(&conn)
            .unwrap();
        assert_eq!(gamer, 1);
    }
}
