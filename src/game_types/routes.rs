use actix_web::web::{Data, Path};
use actix_web::{get, web};

use crate::db;
use crate::game_types::GameType;
use crate::server::Response;

#[get("/gametypes")]
async fn find_all(pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let game_types = web::block(move || GameType::find_all(&conn)).await?;

    http_ok_json!(game_types);
}

#[get("/gametypes/{id}")]
async fn find(game_type_id: Path<i64>, pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let game_type = web::block(move || GameType::find_by_id(*game_type_id, &conn)).await?;

    http_ok_json!(game_type);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(find_all);
    cfg.service(find);
}
