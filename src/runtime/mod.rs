//! Async runtime and socket abstractions.
//!
//! The session never touches a concrete socket type. It asks a [`Connector`] for a
//! [`MessageSocket`] and exchanges text frames through it. The default connector,
//! [`WsConnector`], speaks WebSocket over tokio; tests plug in an in-memory socket.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::errors::Error;

mod tokio_impl;

pub use tokio_impl::*;

/// A boxed future type for runtime abstraction.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A connected, message-oriented socket carrying text frames.
///
/// Each call to [`MessageSocket::recv_text`] yields exactly one complete message.
pub trait MessageSocket: Send {
    /// Send one text message.
    fn send_text(&mut self, text: String) -> BoxFuture<'_, Result<(), Error>>;

    /// Wait for the next text message.
    fn recv_text(&mut self) -> BoxFuture<'_, Result<String, Error>>;

    /// Close the connection.
    fn close(&mut self) -> BoxFuture<'_, Result<(), Error>>;
}

/// Opens [`MessageSocket`]s to a controller endpoint.
pub trait Connector: Send + Sync {
    /// Connect to `host:port`.
    fn connect<'a>(
        &'a self,
        host: &'a str,
        port: u16,
    ) -> BoxFuture<'a, Result<Box<dyn MessageSocket>, Error>>;
}

/// Sleep for the specified duration.
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await
}

/// Run a future with a timeout.
///
/// Returns `Err(TimedOut)` if the timeout expires before the future completes.
pub async fn timeout<F, T>(duration: Duration, future: F) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, future)
        .await
        .map_err(|_| TimedOut)
}

/// Error returned when a timeout expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedOut;

impl std::fmt::Display for TimedOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "operation timed out")
    }
}

impl std::error::Error for TimedOut {}

/// A measurement of monotonically increasing time.
#[derive(Debug, Clone, Copy)]
pub struct Instant(tokio::time::Instant);

impl Instant {
    /// Returns the current instant.
    pub fn now() -> Self {
        Instant(tokio::time::Instant::now())
    }

    /// Returns the duration elapsed since this instant was created.
    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

// Async mutex re-export
pub use tokio::sync::Mutex;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_expires() {
        let result = timeout(Duration::from_millis(10), futures::future::pending::<()>()).await;
        assert_eq!(result, Err(TimedOut));

        let result = timeout(Duration::from_secs(1), async { 7 }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_sleep_advances_instant() {
        let start = Instant::now();
        sleep(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
