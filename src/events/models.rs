use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;

use crate::aggregates::AttendeeCounts;
use crate::cache;
use crate::db;
use crate::errors::ServiceError;
use crate::events::Attendance;
use crate::games::{Game, GameSummary};
use crate::gamers::GamerSummary;
use crate::schema::{events, gamers, games, users};

#[derive(Debug, Serialize, Deserialize, Queryable, Identifiable, AsChangeset)]
pub struct Event {
    pub id: i64,
    pub game_id: i64,
    pub organizer_id: i64,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Insertable)]
#[table_name = "events"]
pub struct CreateEvent {
    pub game_id: i64,
    #[serde(skip)]
    pub organizer_id: i64,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Deserialize, AsChangeset)]
#[table_name = "events"]
pub struct UpdateEvent {
    pub game_id: i64,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Deserialize)]
pub struct EventFilter {
    /// only list events scheduled for this game
    pub game: Option<i64>,
}

#[derive(Debug, Serialize, Queryable)]
pub struct EventDetail {
    pub id: i64,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub game: GameSummary,
    pub organizer: GamerSummary,
}

/// An event joined with its derived fields: the distinct attendee count
/// and whether the requesting gamer is signed up. Both are computed per
/// request, never persisted.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    #[serde(flatten)]
    pub event: EventDetail,
    pub attendees_count: i64,
    pub joined: bool,
}

impl Event {
    pub fn create(new_event: CreateEvent, conn: &db::Conn) -> Result<Event, ServiceError> {
        // an unknown game id is a 404, not a foreign key violation
        Game::find_by_id(new_event.game_id, conn)?;

        let event: Event = diesel::insert_into(events::table)
            .values(&new_event)
            .get_result(conn)?;

        Ok(event)
    }

    pub fn find_by_id(id: i64, conn: &db::Conn) -> Result<Event, ServiceError> {
        if let Some(event) = cache::find(id)? {
            debug!("found event in cache");
            return Ok(event);
        }

        let event = events::table
            .filter(events::id.eq(id))
            .first::<Event>(conn)?;

        cache::set(&event, event.id)?;

        Ok(event)
    }

    /// List events with `attendees_count` and the requester's `joined`
    /// flag attached.
    pub fn find_all(
        filter: EventFilter,
        gamer_id: i64,
        conn: &db::Conn,
    ) -> Result<Vec<EventResponse>, ServiceError> {
        let mut query = events::table
            .inner_join(games::table)
            .inner_join(gamers::table.inner_join(users::table))
            .select((
                events::id,
                events::description,
                events::date,
                events::time,
                (games::id, games::title),
                (gamers::id, users::first_name, users::last_name),
            ))
            .order((events::date, events::time))
            .into_boxed();

        if let Some(game_id) = filter.game {
            query = query.filter(events::game_id.eq(game_id));
        }

        let details = query.load::<EventDetail>(conn)?;

        let ids: Vec<i64> = details.iter().map(|event| event.id).collect();
        let counts = AttendeeCounts::load(&ids, conn)?;
        let attending = Attendance::event_ids_for(gamer_id, conn)?;

        let events = details
            .into_iter()
            .map(|event| {
                let attendees_count = counts.get(event.id);
                let joined = attending.contains(&event.id);
                EventResponse {
                    event,
                    attendees_count,
                    joined,
                }
            })
            .collect();

        Ok(events)
    }

    pub fn find_detail(
        event_id: i64,
        gamer_id: i64,
        conn: &db::Conn,
    ) -> Result<EventResponse, ServiceError> {
        let event = events::table
            .inner_join(games::table)
            .inner_join(gamers::table.inner_join(users::table))
            .filter(events::id.eq(event_id))
            .select((
                events::id,
                events::description,
                events::date,
                events::time,
                (games::id, games::title),
                (gamers::id, users::first_name, users::last_name),
            ))
            .first::<EventDetail>(conn)?;

        let counts = AttendeeCounts::load(&[event.id], conn)?;
        let attendees_count = counts.get(event.id);
        let joined = Attendance::is_attending(gamer_id, event.id, conn)?;

        Ok(EventResponse {
            event,
            attendees_count,
            joined,
        })
    }

    pub fn update(event_id: i64, update: UpdateEvent, conn: &db::Conn) -> Result<(), ServiceError> {
        Game::find_by_id(update.game_id, conn)?;

        let event: Event = diesel::update(events::table.filter(events::id.eq(event_id)))
            .set(&update)
            .get_result(conn)?;

        cache::set(&event, event.id)?;

        Ok(())
    }

    /// Removes the event. The schema cascades to its attendance rows and
    /// leaves the game and the organizer alone.
    pub fn delete_by_id(event_id: i64, conn: &db::Conn) -> Result<(), ServiceError> {
        diesel::delete(events::table.filter(events::id.eq(event_id))).execute(conn)?;

        cache::delete(format!("event.{}", event_id))?;

        Ok(())
    }

    /// returns true if a gamer is an admin or organizes the event
    pub fn is_organizer(&self, gamer_id: i64, is_admin: bool) -> bool {
        is_admin || self.organizer_id == gamer_id
    }

    /// the amount of events scheduled for today or later
    pub fn upcoming(conn: &db::Conn) -> Result<i64, ServiceError> {
        let today = Utc::now().naive_utc().date();

        let count = events::table
            .filter(events::date.ge(today))
            .count()
            .get_result::<i64>(conn)?;

        Ok(count)
    }
}

impl crate::cache::Cache for Event {
    fn cache_key<T: std::fmt::Display>(id: T) -> String {
        format!("event.{}", id)
    }
}

impl crate::validator::Validate<CreateEvent> for CreateEvent {
    fn validate(&self) -> Result<(), ServiceError> {
        validate_description(&self.description)
    }
}

impl crate::validator::Validate<UpdateEvent> for UpdateEvent {
    fn validate(&self) -> Result<(), ServiceError> {
        validate_description(&self.description)
    }
}

fn validate_description(description: &str) -> Result<(), ServiceError> {
    if description.trim().is_empty() {
        bad_request!("the description is required");
    }

    if description.len() > 150 {
        bad_request!("the description is too long, maximum 150 characters");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validator;

    fn create_event(description: &str) -> CreateEvent {
        CreateEvent {
            game_id: 1,
            organizer_id: 1,
            description: String::from(description),
            date: NaiveDate::from_ymd(2020, 12, 23),
            time: NaiveTime::from_hms(19, 0, 0),
        }
    }

    #[test]
    fn valid_description() {
        let event = create_event("friday night showdown");

        assert!(Validator::new(event).validate().is_ok());
    }

    #[test]
    fn empty_description() {
        let event = create_event("  ");

        assert!(Validator::new(event).validate().is_err());
    }

    #[test]
    fn oversized_description() {
        let description = "a".repeat(151);
        let event = create_event(&description);

        assert!(Validator::new(event).validate().is_err());
    }
}
