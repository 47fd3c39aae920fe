//! # APNs binary-protocol client
//!
//! Client for Apple's legacy binary Push Notification Service: a persistent
//! TLS connection to the push gateway speaking the v2 framed protocol, plus
//! a reader for the feedback service.
//!
//! The gateway's failure mode shapes the whole crate: it reports a bad
//! notification asynchronously with one 6-byte error frame, silently
//! discards everything sent after it, and closes the connection. The client
//! therefore:
//!
//! - keeps a **long-lived connection** instead of dialing per push,
//! - **buffers recent sends** so the offender can be identified,
//! - **rebuilds the session and replays** the notifications the gateway
//!   discarded, preserving their identifiers.
//!
//! ## Example
//!
//! ```no_run
//! use apns::{constants, Client, Notification};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (client, mut failed) =
//!         Client::with_pem_files(constants::SANDBOX_GATEWAY, "cert.pem", "key.pem").await?;
//!
//!     tokio::spawn(async move {
//!         while let Some(result) = failed.recv().await {
//!             eprintln!("rejected {}: {}", result.notification.id, result.error);
//!         }
//!     });
//!
//!     let mut notification = Notification::new();
//!     notification.id = "user_123:welcome".to_string();
//!     notification.device_token =
//!         "0f744707bebcf74f9b7c25d48e3358945f6aa01da5ddb387462c7eaf61bb78ad".to_string();
//!     notification.payload.aps.alert.body = "Hello from Rust".to_string();
//!     notification.payload.aps.badge = Some(1);
//!
//!     client.send(notification).await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod core;
pub mod feedback;
pub mod notification;
pub mod session;
pub mod transport;

pub use crate::client::{Client, ClientConfig, FailedNotifications, RetryConfig};
pub use crate::core::constants;
pub use crate::core::{ClientError, EncodeError, PayloadError, SessionError};
pub use crate::feedback::{Feedback, FeedbackTuple};
pub use crate::notification::{Alert, Aps, Notification, Payload, Priority};
pub use crate::session::{NotificationResult, Session};
pub use crate::transport::{Conn, ErrorResponse, ErrorStatus, Identity, TlsConn, TlsError};
