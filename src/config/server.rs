/// Server configuration.
///
/// Compile-time limits for the coordinator plus the runtime settings read from
/// flags or the environment at startup.
use std::path::PathBuf;

use clap::Parser;

use crate::config::game::TICK_INTERVAL_MS;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Upper bound for a single request to the state store, in milliseconds.
pub const STORE_TIMEOUT_MS: u64 = 500;

/// How many compare-and-set rounds a slot claim or release may take before giving up.
pub const SLOT_CLAIM_ATTEMPTS: usize = 8;

/// How many times a disconnecting connection tries to give its slot back.
pub const LEAVE_ATTEMPTS: u32 = 5;

/// Delay before the first leave retry; doubled after each failure.
pub const LEAVE_RETRY_BACKOFF_MS: u64 = 25;

/// Longest room code accepted on the WebSocket route.
pub const ROOM_CODE_MAX_LEN: usize = 100;

/// Runtime settings, from command-line flags or `PINGPONG_*` environment variables.
#[derive(Parser, Debug, Clone)]
#[command(name = "pingpong", version, about = "Two-player pingpong session coordinator")]
pub struct ServerConfig {
    /// Address to bind to.
    #[arg(short = 'H', long, env = "PINGPONG_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, env = "PINGPONG_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Simulation tick interval, in milliseconds.
    #[arg(long, env = "PINGPONG_TICK_MS", default_value_t = TICK_INTERVAL_MS)]
    pub tick_ms: u64,

    /// JSON-lines file receiving finished matches. Results are only logged when unset.
    #[arg(long, env = "PINGPONG_MATCH_LOG")]
    pub match_log: Option<PathBuf>,
}
