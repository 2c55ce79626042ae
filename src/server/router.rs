//! HTTP and WebSocket routing configuration.

use actix_web::web;
use crate::server::game_session::session::ws_game;

/// Configure the application's routes.
///
/// `/api/ws/game/{room_code}` is kept as an alias for clients behind the API prefix.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/ws/game/{room_code}")
            .to(ws_game)
    )
    .service(
        web::resource("/api/ws/game/{room_code}")
            .to(ws_game)
    );
}
