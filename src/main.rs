#[cfg(test)]
#[macro_use]
mod test_support;

mod config;
mod db;
mod errors;
mod handlers;
mod middlewares;
mod models;
mod routes;
mod state;
mod structs;
mod utils;

use std::sync::Arc;

use crate::config::{AllowedOrigins, Config, StoreBackend};
use crate::db::Store;
use crate::db::memory::MemoryStore;
use crate::db::mongodb::{MongoStore, get_database};
use crate::state::app_state::AppState;
use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware::Logger, web};
use dotenv::dotenv;
use env_logger::Env;
use routes::init_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();

    // Initialize the storage backend
    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::MongoDb => match get_database(&config).await {
            Ok(db) => Arc::new(MongoStore::new(db)),
            Err(e) => {
                log::error!("Error connecting to the database: {:#}", e);
                std::process::exit(1);
            }
        },
        StoreBackend::Memory => {
            log::warn!("Using in-memory storage, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    if config.admin_token.is_none() {
        log::warn!("ADMIN_TOKEN not set, stats/reset/suggestion listing are unauthenticated");
    }

    let bind = (config.host.clone(), config.port);
    log::info!("Server running on {}:{}", bind.0, bind.1);
    log::info!("API endpoint: {}", config.api_url);

    // Create shared state
    let app_state = web::Data::new(AppState::new(store, config));

    // Start the Actix Web server
    HttpServer::new(move || {
        // Create a logger with a custom format instead
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");
        App::new()
            .wrap(logger)
            .wrap(cors(&app_state.config.allowed_origins))
            .app_data(app_state.clone())
            .configure(init_routes)
    })
    .bind(bind)?
    .run()
    .await
}

fn cors(origins: &AllowedOrigins) -> Cors {
    let cors = match origins {
        AllowedOrigins::Any => Cors::default().allow_any_origin(),
        AllowedOrigins::List(list) => list
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin)),
    };

    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![http::header::AUTHORIZATION, http::header::ACCEPT])
        .allowed_header(http::header::CONTENT_TYPE)
        .max_age(3600)
}
