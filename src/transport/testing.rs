//! Scripted transport for exercising sessions and clients without a gateway.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

use super::conn::Conn;

/// One scripted outcome for a `read` call.
pub(crate) enum ReadStep {
    /// Bytes the fake gateway "sent".
    Data(Vec<u8>),
    /// Read failure of the given kind.
    Error(io::ErrorKind),
}

/// In-memory [`Conn`] driven by the test.
///
/// Reads resolve as the test feeds steps; an unfed read parks like a quiet
/// gateway. Writes are captured per call.
pub(crate) struct MockConn {
    connects: AtomicUsize,
    connect_errors: StdMutex<VecDeque<io::ErrorKind>>,
    write_errors: StdMutex<VecDeque<io::ErrorKind>>,
    reads: Mutex<mpsc::UnboundedReceiver<ReadStep>>,
    reads_tx: mpsc::UnboundedSender<ReadStep>,
    written: StdMutex<Vec<Vec<u8>>>,
    read_timeout: StdMutex<Option<Duration>>,
}

impl MockConn {
    pub(crate) fn new() -> Self {
        let (reads_tx, reads) = mpsc::unbounded_channel();
        Self {
            connects: AtomicUsize::new(0),
            connect_errors: StdMutex::new(VecDeque::new()),
            write_errors: StdMutex::new(VecDeque::new()),
            reads: Mutex::new(reads),
            reads_tx,
            written: StdMutex::new(Vec::new()),
            read_timeout: StdMutex::new(None),
        }
    }

    /// Resolve the next read with `bytes`.
    pub(crate) fn feed_read(&self, bytes: &[u8]) {
        let _ = self.reads_tx.send(ReadStep::Data(bytes.to_vec()));
    }

    /// Resolve the next read with an error of `kind`.
    pub(crate) fn feed_read_error(&self, kind: io::ErrorKind) {
        let _ = self.reads_tx.send(ReadStep::Error(kind));
    }

    /// Fail the next `connect` call with `kind`.
    pub(crate) fn fail_next_connect(&self, kind: io::ErrorKind) {
        self.connect_errors.lock().unwrap().push_back(kind);
    }

    /// Fail the next `write` call with `kind`.
    pub(crate) fn fail_next_write(&self, kind: io::ErrorKind) {
        self.write_errors.lock().unwrap().push_back(kind);
    }

    /// Number of `connect` calls so far.
    pub(crate) fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Every frame written, in order.
    pub(crate) fn frames(&self) -> Vec<Vec<u8>> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait]
impl Conn for MockConn {
    async fn connect(&self) -> io::Result<()> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match self.connect_errors.lock().unwrap().pop_front() {
            Some(kind) => Err(io::Error::new(kind, "scripted connect failure")),
            None => Ok(()),
        }
    }

    async fn read(&self, buf: &mut [u8]) -> io::Result<()> {
        let mut reads = self.reads.lock().await;
        let timeout = *self.read_timeout.lock().unwrap();
        let step = match timeout {
            Some(limit) => match tokio::time::timeout(limit, reads.recv()).await {
                Ok(step) => step,
                Err(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "read timeout exceeded",
                    ))
                }
            },
            None => reads.recv().await,
        };

        match step {
            Some(ReadStep::Data(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(())
            }
            Some(ReadStep::Error(kind)) => Err(io::Error::new(kind, "scripted read failure")),
            None => Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
        }
    }

    async fn write(&self, buf: &[u8]) -> io::Result<()> {
        if let Some(kind) = self.write_errors.lock().unwrap().pop_front() {
            return Err(io::Error::new(kind, "scripted write failure"));
        }
        self.written.lock().unwrap().push(buf.to_vec());
        Ok(())
    }

    async fn close(&self) -> io::Result<()> {
        Ok(())
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) {
        *self.read_timeout.lock().unwrap() = timeout;
    }
}
