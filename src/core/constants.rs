//! Gateway endpoints and protocol defaults.
//!
//! The gateway hosts are fixed by Apple; the remaining values are defaults
//! that `ClientConfig` can override.

use std::time::Duration;

// =============================================================================
// GATEWAY ENDPOINTS
// =============================================================================

/// Production push gateway.
pub const PRODUCTION_GATEWAY: &str = "gateway.push.apple.com:2195";

/// Sandbox push gateway for development.
pub const SANDBOX_GATEWAY: &str = "gateway.sandbox.push.apple.com:2195";

/// Production feedback service.
pub const PRODUCTION_FEEDBACK_GATEWAY: &str = "feedback.push.apple.com:2196";

/// Sandbox feedback service for development.
pub const SANDBOX_FEEDBACK_GATEWAY: &str = "feedback.sandbox.push.apple.com:2196";

// =============================================================================
// DEFAULTS
// =============================================================================

/// Notifications kept in flight for replay after a gateway error.
///
/// The gateway only reports failures for notifications it has seen, so this
/// bounds how far back a failure can be diagnosed.
pub const SEND_BUFFER_CAPACITY: usize = 50;

/// Bound of the failed-notifications channel. Results published while the
/// channel is full are dropped.
pub const FAILED_NOTIFICATIONS_CAPACITY: usize = 16;

/// Delay between reconnect attempts.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Per-read timeout on the feedback stream. The feedback service goes quiet
/// once drained, so each read is bounded to let the reader finish promptly.
pub const FEEDBACK_READ_TIMEOUT: Duration = Duration::from_millis(100);
