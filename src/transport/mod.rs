//! Gateway transport: connection contract, TLS implementation, and the
//! binary framing codec.

mod conn;
pub mod frame;
mod tls;

#[cfg(test)]
pub(crate) mod testing;

pub use conn::Conn;
pub use frame::{ErrorResponse, ErrorStatus};
pub use tls::{Identity, TlsConn, TlsError};
