//! Queue store configuration.

use serde::{Deserialize, Serialize};

/// SQLite queue store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file. Created if missing.
    #[serde(default = "default_path")]
    pub path: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long SQLite waits on a locked database, in seconds.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_seconds: u64,
    /// Connection acquire timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            max_connections: default_max_connections(),
            busy_timeout_seconds: default_busy_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

fn default_path() -> String {
    "data/print_queue.db".to_string()
}

fn default_max_connections() -> u32 {
    4
}

fn default_busy_timeout() -> u64 {
    5
}

fn default_connect_timeout() -> u64 {
    10
}
