use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DBError;

use crate::db;
use crate::errors::ServiceError;
use crate::schema::gamers;

/// The application profile of a user. Games are owned and events are
/// organized by gamers, never by the auth user directly.
#[derive(Debug, Serialize, Queryable, Identifiable)]
pub struct Gamer {
    pub id: i64,
    pub user_id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[table_name = "gamers"]
pub struct NewGamer {
    pub user_id: i64,
}

/// the gamer fields embedded in game and event responses
#[derive(Debug, Serialize, Queryable)]
pub struct GamerSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Gamer {
    /// profile lookup for the authenticated user
    pub fn find_by_user(user_id: i64, conn: &db::Conn) -> Result<Gamer, ServiceError> {
        let gamer = gamers::table
            .filter(gamers::user_id.eq(user_id))
            .first(conn)?;

        Ok(gamer)
    }
}

impl NewGamer {
    pub fn new(user_id: i64) -> NewGamer {
        NewGamer { user_id }
    }

    /// Store the profile, returns the persisted gamer, or a database error.
    pub fn save(&self, conn: &db::Conn) -> Result<Gamer, DBError> {
        // This has to return the actual database error, because it's used in transactions.
        diesel::insert_into(gamers::table)
            .values(self)
            .get_result::<Gamer>(conn)
    }
}
