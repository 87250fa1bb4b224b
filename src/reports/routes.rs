use actix_web::web::{Data, HttpResponse};
use actix_web::{get, web};
use minijinja::{context, Environment};

use crate::db;
use crate::reports::models;
use crate::server::Response;

lazy_static! {
    static ref TEMPLATES: Environment<'static> = {
        let mut env = Environment::new();
        env.add_template("userevents", include_str!("../../templates/userevents.html"))
            .expect("invalid userevents template");
        env.add_template("usergames", include_str!("../../templates/usergames.html"))
            .expect("invalid usergames template");
        env
    };
}

#[get("/userevents")]
async fn user_events(pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let events = web::block(move || models::user_events(&conn)).await?;

    let html = TEMPLATES
        .get_template("userevents")?
        .render(context! { userevent_list => events })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

#[get("/usergames")]
async fn user_games(pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let games = web::block(move || models::user_games(&conn)).await?;

    let html = TEMPLATES
        .get_template("usergames")?
        .render(context! { usergame_list => games })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(user_events);
    cfg.service(user_games);
}
