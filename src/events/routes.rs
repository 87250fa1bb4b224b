use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::web::{Data, HttpResponse, Json, Path, Query};
use actix_web::{delete, get, post, put, web};
use serde_json::json;

use crate::auth;
use crate::db;
use crate::events::models::{CreateEvent, Event, EventFilter, UpdateEvent};
use crate::events::Attendance;
use crate::gamers::Gamer;
use crate::server;
use crate::validator::Validator;

#[get("/events")]
async fn find_all(
    filter: Query<EventFilter>,
    session: Session,
    pool: Data<db::Pool>,
) -> server::Response {
    let user_id = auth::get_user_id(&session)?;
    let conn = pool.get()?;

    let events = web::block(move || {
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        Event::find_all(filter.into_inner(), gamer.id, &conn)
    })
    .await?;

    http_ok_json!(events);
}

#[get("/events/{id}")]
async fn find(event_id: Path<i64>, session: Session, pool: Data<db::Pool>) -> server::Response {
    let user_id = auth::get_user_id(&session)?;
    let conn = pool.get()?;

    let event = web::block(move || {
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        Event::find_detail(*event_id, gamer.id, &conn)
    })
    .await?;

    http_ok_json!(event);
}

#[post("/events")]
async fn create(
    event: Json<CreateEvent>,
    session: Session,
    pool: Data<db::Pool>,
) -> server::Response {
    let user_id = auth::get_user_id(&session)?;
    let mut event = Validator::new(event.into_inner()).validate()?;

    let conn = pool.get()?;

    let event = web::block(move || {
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        event.organizer_id = gamer.id;
        Event::create(event, &conn)
    })
    .await?;

    http_created_json!(event);
}

#[put("/events/{id}")]
async fn update(
    event_id: Path<i64>,
    event: Json<UpdateEvent>,
    session: Session,
    pool: Data<db::Pool>,
) -> server::Response {
    auth::validate_session(&session)?;
    let event = Validator::new(event.into_inner()).validate()?;

    let conn = pool.get()?;

    web::block(move || Event::update(*event_id, event, &conn)).await?;

    Ok(HttpResponse::new(StatusCode::NO_CONTENT))
}

#[delete("/events/{id}")]
async fn delete(event_id: Path<i64>, session: Session, pool: Data<db::Pool>) -> server::Response {
    let user_id = auth::get_user_id(&session)?;
    let is_admin = auth::is_admin(&session)?;

    let conn = pool.get()?;

    web::block(move || {
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        let event = Event::find_by_id(*event_id, &conn)?;

        if !event.is_organizer(gamer.id, is_admin) {
            forbidden!("Only the organizer can delete an event");
        }

        Event::delete_by_id(event.id, &conn)
    })
    .await?;

    Ok(HttpResponse::new(StatusCode::NO_CONTENT))
}

#[post("/events/{id}/signup")]
async fn signup(event_id: Path<i64>, session: Session, pool: Data<db::Pool>) -> server::Response {
    let user_id = auth::get_user_id(&session)?;
    let conn = pool.get()?;

    web::block(move || {
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        let event = Event::find_by_id(*event_id, &conn)?;

        Attendance::new(gamer.id, event.id).signup(&conn)
    })
    .await?;

    Ok(HttpResponse::Created().json(json!({ "message": "Gamer added" })))
}

#[delete("/events/{id}/leave")]
async fn leave(event_id: Path<i64>, session: Session, pool: Data<db::Pool>) -> server::Response {
    let user_id = auth::get_user_id(&session)?;
    let conn = pool.get()?;

    web::block(move || {
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        let event = Event::find_by_id(*event_id, &conn)?;

        Attendance::new(gamer.id, event.id).leave(&conn)
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
    cfg.service(signup);
    cfg.service(leave);
}
