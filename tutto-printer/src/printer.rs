//! Raw TCP receipt printers
//!
//! Thermal printers with an Ethernet board take the ESC/POS stream as-is on
//! a raw socket, conventionally port 9100.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, instrument, warn};

use crate::error::{PrintError, PrintResult};

/// Raw printing port used when an address has none
pub const DEFAULT_RAW_PORT: u16 = 9100;

/// A device that accepts a finished ESC/POS document
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send the whole document
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Whether the device currently answers
    async fn is_online(&self) -> bool;
}

/// Printer reached over raw TCP
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Parse `ip[:port]`; the port defaults to [`DEFAULT_RAW_PORT`]
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr = addr.trim();
        let parsed = addr
            .parse::<SocketAddr>()
            .or_else(|_| addr.parse().map(|ip| SocketAddr::new(ip, DEFAULT_RAW_PORT)))
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid printer address: {addr}")))?;

        Ok(Self {
            addr: parsed,
            timeout: Duration::from_secs(5),
        })
    }

    /// Bound on connect plus write
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn write_document(&self, data: &[u8]) -> PrintResult<()> {
        let mut stream = TcpStream::connect(self.addr)
            .await
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        stream.write_all(data).await?;
        // Half-close so the printer sees the end of the job
        stream.shutdown().await?;
        Ok(())
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(self, data), fields(addr = %self.addr, bytes = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        tokio::time::timeout(self.timeout, self.write_document(data))
            .await
            .map_err(|_| {
                PrintError::Timeout(format!(
                    "printer {} did not accept the job within {:?}",
                    self.addr, self.timeout
                ))
            })??;

        debug!("Document written to network printer");
        Ok(())
    }

    async fn is_online(&self) -> bool {
        let probe = Duration::from_millis(500).min(self.timeout);
        match tokio::time::timeout(probe, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(addr = %self.addr, error = %e, "Network printer unreachable");
                false
            }
            Err(_) => {
                warn!(addr = %self.addr, "Network printer probe timed out");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_addr_with_port() {
        let printer = NetworkPrinter::from_addr("192.168.1.50:9101").unwrap();
        assert_eq!(printer.addr().port(), 9101);
    }

    #[test]
    fn test_addr_defaults_to_raw_port() {
        let printer = NetworkPrinter::from_addr(" 192.168.1.50 ").unwrap();
        assert_eq!(printer.addr().port(), DEFAULT_RAW_PORT);
    }

    #[test]
    fn test_invalid_addr() {
        let result = NetworkPrinter::from_addr("caja-1");
        assert!(matches!(result, Err(PrintError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_print_sends_exact_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let mut connections = Vec::new();
            for _ in 0..2 {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut received = Vec::new();
                socket.read_to_end(&mut received).await.unwrap();
                connections.push(received);
            }
            connections
        });

        let printer = NetworkPrinter::from_addr(&addr.to_string()).unwrap();
        assert!(printer.is_online().await);

        let data = b"\x1B\x40TOTAL: $1300\n\x1D\x56\x00";
        printer.print(data).await.unwrap();

        // First connection is the online probe, second carries the job
        let connections = server.await.unwrap();
        assert!(connections[0].is_empty());
        assert_eq!(connections[1], data);
    }

    #[tokio::test]
    async fn test_print_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let printer = NetworkPrinter::from_addr(&addr.to_string())
            .unwrap()
            .with_timeout(Duration::from_secs(2));
        assert!(!printer.is_online().await);
        let err = printer.print(b"data").await.unwrap_err();
        assert!(matches!(err, PrintError::Connection(_)));
    }
}
