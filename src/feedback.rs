//! Reader for Apple's feedback service.
//!
//! The feedback gateway streams fixed 38-byte records naming device tokens
//! that stopped accepting pushes, then goes quiet. This reader is one-shot
//! and shares nothing with the send path.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tracing::debug;

use crate::core::constants::FEEDBACK_READ_TIMEOUT;
use crate::transport::{Conn, Identity, TlsConn, TlsError};

/// Feedback record size: timestamp (4) + token length (2) + token (32).
const TUPLE_SIZE: usize = 38;

/// Buffered records between the reader task and the consumer.
const CHANNEL_CAPACITY: usize = 16;

/// One feedback record from Apple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackTuple {
    /// When the gateway first saw delivery fail for this token.
    pub timestamp: SystemTime,
    /// Declared token length.
    pub token_length: u16,
    /// Device token as hex.
    pub device_token: String,
}

fn tuple_from_bytes(bytes: &[u8; TUPLE_SIZE]) -> FeedbackTuple {
    let timestamp = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let token_length = u16::from_be_bytes([bytes[4], bytes[5]]);
    let token_end = 6 + (token_length as usize).min(TUPLE_SIZE - 6);

    FeedbackTuple {
        timestamp: UNIX_EPOCH + Duration::from_secs(u64::from(timestamp)),
        token_length,
        device_token: hex::encode(&bytes[6..token_end]),
    }
}

/// Connection to Apple's feedback service.
pub struct Feedback {
    conn: Arc<dyn Conn>,
}

impl Feedback {
    /// Create a feedback reader with a prepared certificate identity.
    pub fn with_identity(
        gateway: impl Into<String>,
        identity: Identity,
    ) -> Result<Self, TlsError> {
        Ok(Self::over_conn(Arc::new(TlsConn::new(gateway, identity)?)))
    }

    /// Create a feedback reader with a certificate and key in PEM byte
    /// strings.
    pub fn with_pem(
        gateway: impl Into<String>,
        cert_pem: &[u8],
        key_pem: &[u8],
    ) -> Result<Self, TlsError> {
        Self::with_identity(gateway, Identity::from_pem(cert_pem, key_pem)?)
    }

    /// Create a feedback reader with certificate and key PEM files.
    pub fn with_pem_files(
        gateway: impl Into<String>,
        cert_file: impl AsRef<Path>,
        key_file: impl AsRef<Path>,
    ) -> Result<Self, TlsError> {
        Self::with_identity(gateway, Identity::from_pem_files(cert_file, key_file)?)
    }

    pub(crate) fn over_conn(conn: Arc<dyn Conn>) -> Self {
        Self { conn }
    }

    /// Connect and stream feedback records.
    ///
    /// The channel closes once the gateway has nothing more to say or the
    /// connection fails; the gateway goes quiet when drained, so each read
    /// is bounded by a short timeout.
    pub fn receive(&self) -> mpsc::Receiver<FeedbackTuple> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(run(Arc::clone(&self.conn), tx));
        rx
    }
}

async fn run(conn: Arc<dyn Conn>, tx: mpsc::Sender<FeedbackTuple>) {
    if let Err(e) = conn.connect().await {
        debug!(error = %e, "feedback connect failed");
        return;
    }

    loop {
        conn.set_read_timeout(Some(FEEDBACK_READ_TIMEOUT));

        let mut record = [0u8; TUPLE_SIZE];
        match conn.read(&mut record).await {
            Ok(()) => {
                if tx.send(tuple_from_bytes(&record)).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!(error = %e, "feedback stream ended");
                break;
            }
        }
    }

    let _ = conn.close().await;
}
