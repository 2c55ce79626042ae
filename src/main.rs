//! Main entry point for the pingpong session coordinator.
//!
//! Starts the state store, the match recorder and the session registry, then
//! launches the HTTP server exposing the game WebSocket endpoint.

use std::sync::Arc;
use std::time::Duration;

use actix::Actor;
use clap::Parser;
use actix_web::{web, App, HttpServer};
use log::info;

use config::server::ServerConfig;
use server::game_session::SessionRegistry;
use server::recorder::{JsonLinesRecorder, LogRecorder, MatchRecorder};
use server::store::{MemoryBackend, SessionStore, StateStore};

pub mod config;
mod server;
mod game;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from RUST_LOG (default to info level).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();

    // Start the StateStore actor (holds every session's slots, snapshot and running flag).
    let store = SessionStore::new(StateStore::new(Box::new(MemoryBackend::new())).start());

    let recorder: Arc<dyn MatchRecorder> = match &config.match_log {
        Some(path) => {
            info!("[Server] Recording matches to {}", path.display());
            Arc::new(JsonLinesRecorder::new(path.clone()))
        }
        None => Arc::new(LogRecorder),
    };

    // Start the SessionRegistry actor (broadcast groups and simulation loops).
    let registry = SessionRegistry::new(store.clone(), recorder)
        .with_tick_interval(Duration::from_millis(config.tick_ms))
        .start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(server::state::AppState::new(store, registry));

    info!("[Server] Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
