//! Raw TCP receipt printer (the "port 9100" protocol).

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use printsrv_core::config::PrinterConfig;
use printsrv_core::traits::{DispatchError, Dispatcher};

use crate::command::CommandBuilder;

/// Sends each payload over a fresh TCP connection.
///
/// Every job is framed as `initialize + payload + feed + cut` so that a
/// half-finished previous job cannot leak formatting into the next one.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    address: String,
    connect_timeout: Duration,
    feed_lines: u8,
    cut: bool,
}

impl NetworkPrinter {
    /// Create a printer from configuration.
    pub fn new(config: &PrinterConfig) -> Self {
        Self {
            address: config.address(),
            connect_timeout: Duration::from_secs(config.connect_timeout_seconds),
            feed_lines: config.feed_lines,
            cut: config.cut,
        }
    }

    /// `host:port` this printer dials.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Wrap a job payload with the reset prefix and the feed/cut suffix.
    pub fn frame(&self, payload: &[u8]) -> Vec<u8> {
        let mut builder = CommandBuilder::new()
            .initialize()
            .append(payload)
            .feed_lines(self.feed_lines);
        if self.cut {
            builder = builder.partial_cut();
        }
        builder.build().to_vec()
    }
}

#[async_trait]
impl Dispatcher for NetworkPrinter {
    fn name(&self) -> &str {
        "network"
    }

    async fn dispatch(&self, payload: &[u8]) -> Result<(), DispatchError> {
        let framed = self.frame(payload);

        let mut stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.address))
            .await
            .map_err(|_| DispatchError::Timeout(self.connect_timeout.as_secs()))?
            .map_err(|source| DispatchError::Connect {
                address: self.address.clone(),
                source,
            })?;

        stream.write_all(&framed).await.map_err(DispatchError::Write)?;
        stream.flush().await.map_err(DispatchError::Write)?;
        stream.shutdown().await.map_err(DispatchError::Write)?;

        debug!(address = %self.address, bytes = framed.len(), "Payload handed to printer");
        Ok(())
    }
}
