use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::web::{Data, Json};
use actix_web::{post, web, HttpResponse};
use serde_json::json;

use crate::db;
use crate::errors::ServiceError;
use crate::server::Response;
use crate::users::{Credentials, User, UserMessage};
use crate::validator::Validator;

#[post("/register")]
async fn register(user: Json<UserMessage>, pool: Data<db::Pool>) -> Response {
    let user = Validator::new(user.into_inner()).validate()?;
    let conn = pool.get()?;

    web::block(move || User::register(user, &conn)).await?;

    Ok(HttpResponse::new(StatusCode::OK))
}

#[post("/login")]
async fn login(
    credentials: Json<Credentials>,
    session: Session,
    pool: Data<db::Pool>,
) -> Response {
    let conn = pool.get()?;
    let credentials = credentials.into_inner();
    let password = credentials.password.clone();

    // an unknown username should be indistinguishable from a wrong password
    let user = web::block(move || User::find_by_username(credentials.username, &conn))
        .await
        .map_err(|error| match ServiceError::from(error) {
            ServiceError::NotFound(_) => ServiceError::Unauthorized,
            error => error,
        })?;

    user.verify_password(password.as_bytes())?;

    session.set("user_id", user.id)?;
    session.set("is_admin", user.is_admin)?;
    session.renew();

    http_ok_json!(user);
}

#[post("/logout")]
async fn logout(session: Session) -> Response {
    let id: Option<i64> = session.get("user_id")?;

    if id.is_some() {
        session.purge();
        Ok(HttpResponse::Ok().json(json!({ "message": "Successfully signed out" })))
    } else {
        Err(ServiceError::Unauthorized)
    }
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register);
    cfg.service(login);
    cfg.service(logout);
}
