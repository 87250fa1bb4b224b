use diesel::prelude::*;

use crate::db;
use crate::errors::ServiceError;
use crate::schema::game_types;

#[derive(Debug, Serialize, Deserialize, Queryable, Identifiable)]
pub struct GameType {
    pub id: i64,
    pub label: String,
}

impl GameType {
    pub fn find_all(conn: &db::Conn) -> Result<Vec<GameType>, ServiceError> {
        let game_types = game_types::table
            .order(game_types::label)
            .load::<GameType>(conn)?;

        Ok(game_types)
    }

    pub fn find_by_id(id: i64, conn: &db::Conn) -> Result<GameType, ServiceError> {
        let game_type = game_types::table
            .filter(game_types::id.eq(id))
            .first::<GameType>(conn)?;

        Ok(game_type)
    }
}
