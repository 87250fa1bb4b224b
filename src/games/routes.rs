use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::web::{Data, HttpResponse, Json, Path, Query};
use actix_web::{delete, get, post, put, web};

use crate::auth;
use crate::db;
use crate::games::models::{CreateGame, Game, GameFilter, UpdateGame};
use crate::gamers::Gamer;
use crate::server;
use crate::validator::Validator;

#[get("/games")]
async fn find_all(
    filter: Query<GameFilter>,
    session: Session,
    pool: Data<db::Pool>,
) -> server::Response {
    let user_id = auth::get_user_id(&session)?;
    let conn = pool.get()?;

    let games = web::block(move || {
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        Game::find_all(filter.into_inner(), gamer.id, &conn)
    })
    .await?;

    http_ok_json!(games);
}

#[get("/games/{id}")]
async fn find(game_id: Path<i64>, session: Session, pool: Data<db::Pool>) -> server::Response {
    let user_id = auth::get_user_id(&session)?;
    let conn = pool.get()?;

    let game = web::block(move || {
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        Game::find_detail(*game_id, gamer.id, &conn)
    })
    .await?;

    http_ok_json!(game);
}

#[post("/games")]
async fn create(
    game: Json<CreateGame>,
    session: Session,
    pool: Data<db::Pool>,
) -> server::Response {
    let user_id = auth::get_user_id(&session)?;
    let mut game = Validator::new(game.into_inner()).validate()?;

    let conn = pool.get()?;

    let game = web::block(move || {
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        game.gamer_id = gamer.id;
        Game::create(game, &conn)
    })
    .await?;

    http_created_json!(game);
}

#[put("/games/{id}")]
async fn update(
    game_id: Path<i64>,
    game: Json<UpdateGame>,
    session: Session,
    pool: Data<db::Pool>,
) -> server::Response {
    auth::validate_session(&session)?;
    let game = Validator::new(game.into_inner()).validate()?;

    let conn = pool.get()?;

    web::block(move || Game::update(*game_id, game, &conn)).await?;

    Ok(HttpResponse::new(StatusCode::NO_CONTENT))
}

#[delete("/games/{id}")]
async fn delete(game_id: Path<i64>, session: Session, pool: Data<db::Pool>) -> server::Response {
    let user_id = auth::get_user_id(&session)?;
    let is_admin = auth::is_admin(&session)?;

    let conn = pool.get()?;

    web::block(move || {
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        let game = Game::find_by_id(*game_id, &conn)?;

        if !game.is_owner(gamer.id, is_admin) {
            forbidden!("Only game owners can delete games");
        }

        Game::delete_by_id(game.id, &conn)
    })
    .await?;

    Ok(HttpResponse::new(StatusCode::NO_CONTENT))
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(find_all);
    cfg.service(find);
    cfg.service(create);
    cfg.service(update);
    cfg.service(delete);
}
