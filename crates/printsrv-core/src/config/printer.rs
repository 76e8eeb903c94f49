//! Network printer configuration.

use serde::{Deserialize, Serialize};

/// Raw TCP (port 9100 style) receipt printer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterConfig {
    /// Printer hostname or IP address.
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Printer TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// TCP connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Blank lines fed after each job.
    #[serde(default = "default_feed_lines")]
    pub feed_lines: u8,
    /// Whether to issue a partial cut after each job.
    #[serde(default = "default_true")]
    pub cut: bool,
}

impl PrinterConfig {
    /// `host:port` address of the printer.
    pub fn address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            port: default_port(),
            connect_timeout_seconds: default_connect_timeout(),
            feed_lines: default_feed_lines(),
            cut: default_true(),
        }
    }
}

fn default_hostname() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9100
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_feed_lines() -> u8 {
    2
}

fn default_true() -> bool {
    true
}
