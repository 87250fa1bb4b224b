#![warn(missing_debug_implementations, rust_2018_idioms)]

#[macro_use]
extern crate diesel;

#[macro_use]
extern crate diesel_migrations;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;

use dotenv::dotenv;

#[macro_use]
mod macros;

mod aggregates;
mod auth;
mod cache;
mod config;
mod db;
mod errors;
mod events;
mod game_types;
mod games;
mod gamers;
mod reports;
mod schema;
mod server;
mod stats;
mod users;
mod validator;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .expect("unable to initialize the tracing subscriber");

    db::migrate(config::Config::database_url())?;
    let pool = db::build_connection_pool(config::Config::database_url())?;

    cache::init();

    debug!("launching the actix webserver");
    server::launch(pool).await?;

    Ok(())
}
