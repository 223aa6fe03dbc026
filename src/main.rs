use std::io;
use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{info, warn};

use social_media_api::config::{AppConfig, StorageBackend};
use social_media_api::database::{Database, MemoryStore};
use social_media_api::middleware::cors::cors;
use social_media_api::middleware::error_handler::error_handlers;
use social_media_api::state::{AppState, app_config};

async fn serve(state: AppState, config: &AppConfig) -> io::Result<()> {
    let allowed_origins = config.cors_allowed_origins.clone();

    info!("Starting server on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(error_handlers())
            .wrap(cors(&allowed_origins))
            .wrap(Logger::default())
            .configure(move |cfg| app_config(&state, cfg))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("Server has stopped");
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    match config.storage {
        StorageBackend::Mongo => {
            let database = Database::init(&config).await.map_err(io::Error::other)?;
            let store = Arc::new(database.store());
            store.ensure_indexes().await.map_err(io::Error::other)?;

            let state = AppState::new(store.clone(), store, &config);
            let result = serve(state, &config).await;
            database.shutdown().await;
            result
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            let store = Arc::new(MemoryStore::new());
            let state = AppState::new(store.clone(), store, &config);
            serve(state, &config).await
        }
    }
}
