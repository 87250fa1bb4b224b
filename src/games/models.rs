use chrono::{DateTime, Utc};
use diesel::prelude::*;
use regex::Regex;

use crate::aggregates::EventCounts;
use crate::cache;
use crate::db;
use crate::errors::ServiceError;
use crate::game_types::GameType;
use crate::gamers::GamerSummary;
use crate::schema::{game_types, gamers, games, users};

#[derive(Debug, Serialize, Deserialize, Queryable, Identifiable, AsChangeset)]
pub struct Game {
    pub id: i64,
    pub game_type_id: i64,
    pub gamer_id: i64,
    pub title: String,
    pub maker: String,
    pub number_of_players: i32,
    pub skill_level: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Insertable)]
#[table_name = "games"]
pub struct CreateGame {
    pub game_type_id: i64,
    #[serde(skip)]
    pub gamer_id: i64,
    pub title: String,
    pub maker: String,
    pub number_of_players: i32,
    pub skill_level: i32,
}

#[derive(Debug, Deserialize, AsChangeset)]
#[table_name = "games"]
pub struct UpdateGame {
    pub game_type_id: i64,
    pub title: String,
    pub maker: String,
    pub number_of_players: i32,
    pub skill_level: i32,
}

/// GameFilter is a struct that the client can use to query for games.
#[derive(Debug, Deserialize)]
pub struct GameFilter {
    /// restrict the listing to one game type
    #[serde(rename = "type")]
    pub game_type: Option<i64>,
    /// prefix search on title and maker
    pub search: Option<String>,
}

/// the game fields embedded in event responses
#[derive(Debug, Serialize, Queryable)]
pub struct GameSummary {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Serialize, Queryable)]
pub struct GameDetail {
    pub id: i64,
    pub title: String,
    pub maker: String,
    pub number_of_players: i32,
    pub skill_level: i32,
    pub game_type: GameType,
    pub gamer: GamerSummary,
}

/// A game joined with its derived counts. The counts are a read-only
/// projection, they never live on the games table.
#[derive(Debug, Serialize)]
pub struct GameResponse {
    #[serde(flatten)]
    pub game: GameDetail,
    pub event_count: i64,
    pub user_event_count: i64,
}

impl Game {
    pub fn create(new_game: CreateGame, conn: &db::Conn) -> Result<Game, ServiceError> {
        // resolve the type first so an unknown id surfaces as a 404
        GameType::find_by_id(new_game.game_type_id, conn)?;

        let game: Game = diesel::insert_into(games::table)
            .values(&new_game)
            .get_result(conn)?;

        Ok(game)
    }

    pub fn find_by_id(id: i64, conn: &db::Conn) -> Result<Game, ServiceError> {
        if let Some(game) = cache::find(id)? {
            debug!("found game in cache");
            return Ok(game);
        }

        let game = games::table.filter(games::id.eq(id)).first::<Game>(conn)?;

        cache::set(&game, game.id)?;

        Ok(game)
    }

    /// List games with their `event_count` and, scoped to the requesting
    /// gamer, `user_event_count` attached.
    pub fn find_all(
        filter: GameFilter,
        gamer_id: i64,
        conn: &db::Conn,
    ) -> Result<Vec<GameResponse>, ServiceError> {
        let mut query = games::table
            .inner_join(game_types::table)
            .inner_join(gamers::table.inner_join(users::table))
            .select((
                games::id,
                games::title,
                games::maker,
                games::number_of_players,
                games::skill_level,
                (game_types::id, game_types::label),
                (gamers::id, users::first_name, users::last_name),
            ))
            .order(games::title)
            .into_boxed();

        if let Some(game_type) = filter.game_type {
            query = query.filter(games::game_type_id.eq(game_type));
        }

        if let Some(search) = filter.search {
            let prefix = format!("{}%", search);
            query = query.filter(
                games::title
                    .ilike(prefix.clone())
                    .or(games::maker.ilike(prefix)),
            );
        }

        let details = query.load::<GameDetail>(conn)?;

        let ids: Vec<i64> = details.iter().map(|game| game.id).collect();
        let counts = EventCounts::load(&ids, gamer_id, conn)?;

        let games = details
            .into_iter()
            .map(|game| {
                let event_count = counts.total(game.id);
                let user_event_count = counts.organized(game.id);
                GameResponse {
                    game,
                    event_count,
                    user_event_count,
                }
            })
            .collect();

        Ok(games)
    }

    pub fn find_detail(
        game_id: i64,
        gamer_id: i64,
        conn: &db::Conn,
    ) -> Result<GameResponse, ServiceError> {
        let game = games::table
            .inner_join(game_types::table)
            .inner_join(gamers::table.inner_join(users::table))
            .filter(games::id.eq(game_id))
            .select((
                games::id,
                games::title,
                games::maker,
                games::number_of_players,
                games::skill_level,
                (game_types::id, game_types::label),
                (gamers::id, users::first_name, users::last_name),
            ))
            .first::<GameDetail>(conn)?;

        let counts = EventCounts::load(&[game.id], gamer_id, conn)?;
        let event_count = counts.total(game.id);
        let user_event_count = counts.organized(game.id);

        Ok(GameResponse {
            game,
            event_count,
            user_event_count,
        })
    }

    pub fn update(game_id: i64, update: UpdateGame, conn: &db::Conn) -> Result<(), ServiceError> {
        GameType::find_by_id(update.game_type_id, conn)?;

        let game: Game = diesel::update(games::table.filter(games::id.eq(game_id)))
            .set(&update)
            .get_result(conn)?;

        cache::set(&game, game.id)?;

        Ok(())
    }

    /// Removes the game. The schema cascades to its events and their
    /// attendance rows.
    pub fn delete_by_id(game_id: i64, conn: &db::Conn) -> Result<(), ServiceError> {
        diesel::delete(games::table.filter(games::id.eq(game_id))).execute(conn)?;

        cache::delete(format!("game.{}", game_id))?;

        Ok(())
    }

    /// returns true if a gamer is an admin or owns the game
    pub fn is_owner(&self, gamer_id: i64, is_admin: bool) -> bool {
        is_admin || self.gamer_id == gamer_id
    }
}

impl crate::cache::Cache for Game {
    fn cache_key<T: std::fmt::Display>(id: T) -> String {
        format!("game.{}", id)
    }
}

impl crate::validator::Validate<CreateGame> for CreateGame {
    fn validate(&self) -> Result<(), ServiceError> {
        validate_fields(
            &self.title,
            &self.maker,
            self.number_of_players,
            self.skill_level,
        )
    }
}

impl crate::validator::Validate<UpdateGame> for UpdateGame {
    fn validate(&self) -> Result<(), ServiceError> {
        validate_fields(
            &self.title,
            &self.maker,
            self.number_of_players,
            self.skill_level,
        )
    }
}

fn validate_fields(
    title: &str,
    maker: &str,
    number_of_players: i32,
    skill_level: i32,
) -> Result<(), ServiceError> {
    let pattern: Regex = Regex::new(r"^[a-zA-Z0-9_'!:-]+( [a-zA-Z0-9_'!:-]+)*$").unwrap();

    if title.trim().is_empty() {
        bad_request!("title is too short");
    }

    if title.trim().len() > 55 {
        bad_request!("title is too long, maximum 55 characters");
    }

    if !pattern.is_match(title) {
        bad_request!("title contains unsupported characters");
    }

    if maker.trim().is_empty() {
        bad_request!("maker is too short");
    }

    if maker.trim().len() > 55 {
        bad_request!("maker is too long, maximum 55 characters");
    }

    if number_of_players < 1 {
        bad_request!("a game needs at least one player");
    }

    if skill_level < 0 {
        bad_request!("the skill level cannot be negative");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validator;

    fn create_game(title: &str) -> CreateGame {
        CreateGame {
            game_type_id: 1,
            gamer_id: 1,
            title: String::from(title),
            maker: String::from("Milton Bradley"),
            number_of_players: 4,
            skill_level: 2,
        }
    }

    #[test]
    fn valid_titles() {
        assert!(Validator::new(create_game("Fortress America")).validate().is_ok());
        assert!(Validator::new(create_game("Ticket to Ride")).validate().is_ok());
        assert!(Validator::new(create_game("Munchkin 2: Unnatural Axe"))
            .validate()
            .is_ok());
    }

    #[test]
    fn invalid_titles() {
        assert!(Validator::new(create_game("")).validate().is_err());
        assert!(Validator::new(create_game("<html>")).validate().is_err());

        let too_long = "a".repeat(56);
        assert!(Validator::new(create_game(&too_long)).validate().is_err());
    }

    #[test]
    fn invalid_player_count() {
        let mut game = create_game("Fortress America");
        game.number_of_players = 0;

        assert!(Validator::new(game).validate().is_err());
    }

    #[test]
    fn negative_skill_level() {
        let mut game = create_game("Fortress America");
        game.skill_level = -1;

        assert!(Validator::new(game).validate().is_err());
    }
}
