use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Default deadline for one connection attempt.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Reachability probe for a single host/port.
///
/// A probe is a liveness proxy, not a protocol client: implementations must
/// only establish a transport connection and report whether it came up before
/// the deadline. No bytes are exchanged.
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// True iff a connection to `host_name:port` reached the established
    /// state within the probe's deadline.
    async fn probe(&self, host_name: &str, port: u16) -> bool;
}

/// TCP connect probe with a hard per-attempt deadline.
pub struct TcpProbe {
    timeout_duration: Duration,
}

impl TcpProbe {
    pub fn new(timeout_duration: Duration) -> Self {
        Self { timeout_duration }
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait::async_trait]
impl Probe for TcpProbe {
    async fn probe(&self, host_name: &str, port: u16) -> bool {
        let target = format!("{host_name}:{port}");

        // Dropping the timed-out connect future cancels the attempt and
        // closes the socket, so nothing leaks past the cycle.
        match timeout(self.timeout_duration, TcpStream::connect(&target)).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(error)) => {
                debug!(%target, %error, "connection attempt failed");
                false
            }
            Err(_elapsed) => {
                debug!(%target, timeout = ?self.timeout_duration, "connection attempt timed out");
                false
            }
        }
    }
}
