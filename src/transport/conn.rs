//! Gateway transport contract.

use std::io;
use std::time::Duration;

use async_trait::async_trait;

/// A connection to an Apple gateway.
///
/// Implementations allow `read` and `write` to run concurrently: the
/// session's error reader parks in `read` while send calls write.
#[async_trait]
pub trait Conn: Send + Sync {
    /// Dial the gateway, closing any previous connection first.
    async fn connect(&self) -> io::Result<()>;

    /// Fill `buf` from the connection.
    ///
    /// The stream ending before `buf` is full surfaces as
    /// [`io::ErrorKind::UnexpectedEof`]; an expired read timeout as
    /// [`io::ErrorKind::TimedOut`].
    async fn read(&self, buf: &mut [u8]) -> io::Result<()>;

    /// Write all of `buf` to the connection.
    async fn write(&self, buf: &[u8]) -> io::Result<()>;

    /// Close the connection. In-flight reads end once the peer observes the
    /// close.
    async fn close(&self) -> io::Result<()>;

    /// Bound subsequent reads. `None` disables the timeout.
    fn set_read_timeout(&self, timeout: Option<Duration>);
}
