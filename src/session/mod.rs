//! One connection's send/receive/error state machine.
//!
//! A session is single-use: it moves from new to connected to disconnected
//! and never back. The gateway reports a failure by writing one 6-byte error
//! frame and closing the connection, discarding everything sent after the
//! offending notification; the session buffers recent sends so the client
//! can replay them on a replacement session.

mod buffer;

use std::io;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::core::SessionError;
use crate::notification::Notification;
use crate::transport::frame::{self, wire};
use crate::transport::{Conn, ErrorResponse};

pub(crate) use buffer::SendBuffer;

/// A notification the gateway rejected, paired with its error frame.
#[derive(Debug, Clone)]
pub struct NotificationResult {
    /// The rejected notification.
    pub notification: Notification,
    /// The gateway's error frame.
    pub error: ErrorResponse,
}

impl std::fmt::Display for NotificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Session lifecycle state. Disconnected is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    New,
    Connected,
    Disconnected,
}

struct Inner {
    conn: Arc<dyn Conn>,
    buffer: SendBuffer,
    state: StdMutex<SessionState>,
    write_lock: Mutex<()>,
    failed: StdMutex<Option<NotificationResult>>,
    failed_tx: mpsc::Sender<NotificationResult>,
}

/// Session to Apple's push gateway.
///
/// Handles are cheap clones sharing one state machine.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    /// Create a new session over `conn`.
    ///
    /// `buffer_capacity` bounds the replay window; `failed_tx` receives
    /// best-effort reports of notifications the gateway rejects.
    pub fn new(
        conn: Arc<dyn Conn>,
        buffer_capacity: usize,
        failed_tx: mpsc::Sender<NotificationResult>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                conn,
                buffer: SendBuffer::new(buffer_capacity),
                state: StdMutex::new(SessionState::New),
                write_lock: Mutex::new(()),
                failed: StdMutex::new(None),
                failed_tx,
            }),
        }
    }

    /// Connect to the gateway and start watching for error frames.
    ///
    /// Valid only while the session is new.
    pub async fn connect(&self) -> Result<(), SessionError> {
        if *self.inner.state.lock().unwrap() != SessionState::New {
            return Err(SessionError::AlreadyStarted);
        }

        self.inner.conn.connect().await?;

        {
            let mut state = self.inner.state.lock().unwrap();
            if *state != SessionState::New {
                return Err(SessionError::AlreadyStarted);
            }
            *state = SessionState::Connected;
        }

        tokio::spawn(read_errors(Arc::clone(&self.inner)));
        Ok(())
    }

    /// Send a notification to the gateway.
    ///
    /// The notification is buffered before the write so a later error frame
    /// can identify it. A write that hits end-of-stream (including a partial
    /// write) disconnects the session.
    pub async fn send(&self, notification: Notification) -> Result<(), SessionError> {
        if !self.connected() {
            return Err(SessionError::NotConnected);
        }

        let frame = frame::encode(&notification)?;

        let _write = self.inner.write_lock.lock().await;
        self.inner.buffer.add(notification);
        match self.inner.conn.write(&frame).await {
            Ok(()) => Ok(()),
            Err(e) => {
                if matches!(
                    e.kind(),
                    io::ErrorKind::UnexpectedEof | io::ErrorKind::WriteZero
                ) {
                    warn!(error = %e, "gateway closed the stream mid-write");
                    self.disconnect();
                }
                Err(SessionError::Io(e))
            }
        }
    }

    /// Notifications sent after the one the gateway rejected, in send order.
    ///
    /// Empty unless the session is disconnected with a recorded failure.
    pub fn requeueable_notifications(&self) -> Vec<Notification> {
        if !self.disconnected() {
            return Vec::new();
        }

        match &*self.inner.failed.lock().unwrap() {
            Some(result) => self
                .inner
                .buffer
                .notifications_after(result.notification.identifier),
            None => Vec::new(),
        }
    }

    /// Whether the session is connected.
    pub fn connected(&self) -> bool {
        *self.inner.state.lock().unwrap() == SessionState::Connected
    }

    /// Whether the session is disconnected.
    pub fn disconnected(&self) -> bool {
        *self.inner.state.lock().unwrap() == SessionState::Disconnected
    }

    /// Move the session to its terminal state.
    pub fn disconnect(&self) {
        *self.inner.state.lock().unwrap() = SessionState::Disconnected;
    }
}

/// Watch the connection for the gateway's one error frame.
///
/// The failing notification is latched before the state flips so
/// `requeueable_notifications` never observes a disconnect without it.
async fn read_errors(inner: Arc<Inner>) {
    let mut frame = [0u8; wire::ERROR_FRAME_SIZE];
    match inner.conn.read(&mut frame).await {
        Ok(()) => {
            let error = ErrorResponse::from_bytes(&frame);
            debug!(
                status = %error.status,
                identifier = error.identifier,
                "error frame from gateway"
            );
            match inner.buffer.find(error.identifier) {
                Some(notification) => {
                    let result = NotificationResult {
                        notification,
                        error,
                    };
                    *inner.failed.lock().unwrap() = Some(result.clone());
                    // Best-effort: without a listener the result is dropped.
                    let _ = inner.failed_tx.try_send(result);
                }
                None => warn!(
                    identifier = error.identifier,
                    "rejected notification no longer buffered"
                ),
            }
        }
        Err(e) => debug!(error = %e, "gateway read ended"),
    }

    *inner.state.lock().unwrap() = SessionState::Disconnected;
}
