use actix_session::Session;
use actix_web::web::{Data, Query};
use actix_web::{get, web};

use crate::auth;
use crate::db;
use crate::server::Response;
use crate::users::{Filter, User};

#[get("/users")]
async fn find_all(filter: Query<Filter>, session: Session, pool: Data<db::Pool>) -> Response {
    auth::validate_session(&session)?;
    let conn = pool.get()?;

    let users = web::block(move || User::find_all(filter.into_inner(), &conn)).await?;

    http_ok_json!(users);
}

#[get("/users/me")]
async fn find_me(session: Session, pool: Data<db::Pool>) -> Response {
    let user_id = auth::get_user_id(&session)?;
    let conn = pool.get()?;

    let user = web::block(move || User::find_by_id(user_id, &conn)).await?;

    http_ok_json!(user);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(find_all);
    cfg.service(find_me);
}
