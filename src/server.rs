use url::Url;

use actix_redis::RedisSession;
use actix_web::{cookie, get, middleware, web, App, HttpRequest, HttpResponse, HttpServer};

use crate::auth;
use crate::config::Config;
use crate::db;
use crate::errors::ServiceError;
use crate::events;
use crate::game_types;
use crate::games;
use crate::reports;
use crate::stats;
use crate::users;

pub type Response = Result<HttpResponse, ServiceError>;

#[get("/health")]
async fn health(_: HttpRequest) -> &'static str {
    "ok"
}

pub async fn launch(db_pool: db::Pool) -> std::io::Result<()> {
    let stats = web::Data::new(stats::Stats::new());

    let redis_url = Url::parse(Config::redis_url()).expect("invalid redis url");
    let redis_address = format!(
        "{}:{}",
        redis_url.host_str().expect("missing redis host"),
        redis_url.port().unwrap_or(6379),
    );

    HttpServer::new(move || {
        App::new()
            .data(db_pool.clone())
            .app_data(stats.clone())
            .wrap(middleware::DefaultHeaders::new().header("X-Version", env!("CARGO_PKG_VERSION")))
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::default())
            .wrap(stats::Middleware::default())
            .wrap(
                RedisSession::new(
                    redis_address.clone(),
                    Config::session_private_key().as_bytes(),
                )
                .cookie_same_site(cookie::SameSite::Strict),
            )
            .data(web::JsonConfig::default().limit(262_144))
            .data(web::PayloadConfig::default().limit(262_144))
            .service(stats::route)
            .service(
                web::scope("/api")
                    .configure(auth::routes::register_routes)
                    .configure(users::routes::register)
                    .configure(game_types::routes::register)
                    .configure(games::routes::register)
                    .configure(events::routes::register)
                    .service(health),
            )
            .service(web::scope("/reports").configure(reports::routes::register))
    })
    .bind(format!("{}:{}", Config::api_host(), Config::api_port()))?
    .run()
    .await
}
