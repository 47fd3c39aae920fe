//! Long-lived client for the push gateway.
//!
//! The client hides session churn: it holds the current [`Session`], watches
//! for its death on each send, and rebuilds it over the same transport,
//! replaying the notifications the gateway silently discarded after the
//! offending one.

mod config;

use std::path::Path;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::core::ClientError;
use crate::notification::Notification;
use crate::session::{NotificationResult, Session};
use crate::transport::{Conn, Identity, TlsConn};

pub use config::{ClientConfig, RetryConfig};

/// Receiver for notifications the gateway explicitly rejected.
///
/// Reports are best-effort: the channel is bounded and results published
/// with no room left are dropped.
pub struct FailedNotifications {
    rx: mpsc::Receiver<NotificationResult>,
}

impl FailedNotifications {
    /// Receive the next failure report.
    pub async fn recv(&mut self) -> Option<NotificationResult> {
        self.rx.recv().await
    }

    /// Receive a failure report if one is already queued.
    pub fn try_recv(&mut self) -> Option<NotificationResult> {
        self.rx.try_recv().ok()
    }
}

/// Wire identifier sequence.
///
/// Identifier 0 means "assign one", so the sequence skips it on wrap.
#[derive(Debug)]
struct IdentifierSequence {
    counter: StdMutex<u32>,
}

impl IdentifierSequence {
    fn new() -> Self {
        Self {
            counter: StdMutex::new(0),
        }
    }

    fn next(&self) -> u32 {
        let mut counter = self.counter.lock().unwrap();
        *counter = counter.wrapping_add(1);
        if *counter == 0 {
            *counter = 1;
        }
        *counter
    }

    fn advance_to(&self, identifier: u32) {
        let mut counter = self.counter.lock().unwrap();
        if *counter < identifier {
            *counter = identifier;
        }
    }
}

/// Long-lived client to Apple's push gateway.
pub struct Client {
    conn: Arc<dyn Conn>,
    session: Mutex<Session>,
    ids: IdentifierSequence,
    failed_tx: mpsc::Sender<NotificationResult>,
    config: ClientConfig,
}

impl Client {
    /// Connect with a prepared certificate identity.
    pub async fn with_identity(
        gateway: impl Into<String>,
        identity: Identity,
    ) -> Result<(Self, FailedNotifications), ClientError> {
        Self::with_config(gateway, identity, ClientConfig::default()).await
    }

    /// Connect with a certificate and key in PEM byte strings.
    pub async fn with_pem(
        gateway: impl Into<String>,
        cert_pem: &[u8],
        key_pem: &[u8],
    ) -> Result<(Self, FailedNotifications), ClientError> {
        Self::with_identity(gateway, Identity::from_pem(cert_pem, key_pem)?).await
    }

    /// Connect with certificate and key PEM files.
    pub async fn with_pem_files(
        gateway: impl Into<String>,
        cert_file: impl AsRef<Path>,
        key_file: impl AsRef<Path>,
    ) -> Result<(Self, FailedNotifications), ClientError> {
        Self::with_identity(gateway, Identity::from_pem_files(cert_file, key_file)?).await
    }

    /// Connect with a prepared identity and explicit configuration.
    pub async fn with_config(
        gateway: impl Into<String>,
        identity: Identity,
        config: ClientConfig,
    ) -> Result<(Self, FailedNotifications), ClientError> {
        let conn: Arc<dyn Conn> = Arc::new(TlsConn::new(gateway, identity)?);
        Self::over_conn(conn, config).await
    }

    /// Connect over an already constructed transport.
    pub(crate) async fn over_conn(
        conn: Arc<dyn Conn>,
        config: ClientConfig,
    ) -> Result<(Self, FailedNotifications), ClientError> {
        let (failed_tx, rx) = mpsc::channel(config.failed_capacity);

        let session = Session::new(Arc::clone(&conn), config.buffer_capacity, failed_tx.clone());
        session.connect().await?;

        let client = Self {
            conn,
            session: Mutex::new(session),
            ids: IdentifierSequence::new(),
            failed_tx,
            config,
        };
        Ok((client, FailedNotifications { rx }))
    }

    /// Send a notification.
    ///
    /// A zero identifier gets the next one from the client's sequence. When
    /// the current session has died, a replacement is connected first and
    /// the recoverable notifications are replayed through it; replay
    /// failures surface on the failed-notifications channel, not here.
    pub async fn send(&self, mut notification: Notification) -> Result<(), ClientError> {
        let session = {
            let mut current = self.session.lock().await;
            if current.disconnected() {
                self.reconnect_and_requeue(&mut current).await?;
            }
            current.clone()
        };

        if notification.identifier == 0 {
            notification.identifier = self.ids.next();
        } else {
            self.ids.advance_to(notification.identifier);
        }

        session.send(notification).await.map_err(ClientError::from)
    }

    /// Close the transport, ending both session actors.
    ///
    /// A later `send` dials the gateway again.
    pub async fn close(&self) -> std::io::Result<()> {
        self.session.lock().await.disconnect();
        self.conn.close().await
    }

    /// Replace a dead session and replay what the gateway discarded.
    ///
    /// Runs under the session-swap lock, so concurrent sends reconnect once.
    async fn reconnect_and_requeue(&self, current: &mut Session) -> Result<(), ClientError> {
        let replay = current.requeueable_notifications();
        info!(replay = replay.len(), "rebuilding gateway session");

        let mut delay = self.config.retry.initial_delay;
        let mut attempts = 0u32;
        let session = loop {
            attempts += 1;
            let session = Session::new(
                Arc::clone(&self.conn),
                self.config.buffer_capacity,
                self.failed_tx.clone(),
            );
            match session.connect().await {
                Ok(()) => break session,
                Err(e) => {
                    if let Some(max) = self.config.retry.max_attempts {
                        if attempts >= max {
                            warn!(attempts, error = %e, "giving up on gateway reconnect");
                            return Err(ClientError::ReconnectExhausted { attempts });
                        }
                    }
                    debug!(attempts, error = %e, "gateway reconnect failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay = self.config.retry.next_delay(delay);
                }
            }
        };

        *current = session;

        for notification in replay {
            // Replay failures are reported by the new session's error
            // reader, not to the caller that triggered the reconnect.
            if let Err(e) = current.send(notification).await {
                warn!(error = %e, "replayed notification was not written");
            }
        }

        Ok(())
    }
}
