//! Binary framing for the push gateway.
//!
//! Write direction: the v2 notification frame.
//!
//! ```text
//! +---------+------------------+-------------------------------------+
//! | Command | Frame Length     | Items                               |
//! | 1 byte  | 4 bytes (BE32)   | item blocks, in item-ID order       |
//! +---------+------------------+-------------------------------------+
//! ```
//!
//! Each item block is `item ID (1 byte) | item length (BE16) | value`.
//!
//! Read direction: the 6-byte error frame the gateway sends right before it
//! closes the connection.
//!
//! ```text
//! +---------+--------+------------------+
//! | Command | Status | Identifier       |
//! | 1 byte  | 1 byte | 4 bytes (BE32)   |
//! +---------+--------+------------------+
//! ```

use std::time::UNIX_EPOCH;

use thiserror::Error;

use crate::core::EncodeError;
use crate::notification::Notification;

/// Wire constants of the v2 protocol.
pub mod wire {
    /// Command byte of a notification frame.
    pub const SEND_COMMAND: u8 = 2;
    /// Command byte of an error frame.
    pub const ERROR_COMMAND: u8 = 8;

    /// Device token item ID.
    pub const DEVICE_TOKEN_ITEM: u8 = 1;
    /// Payload item ID.
    pub const PAYLOAD_ITEM: u8 = 2;
    /// Notification identifier item ID.
    pub const IDENTIFIER_ITEM: u8 = 3;
    /// Expiration date item ID.
    pub const EXPIRATION_ITEM: u8 = 4;
    /// Priority item ID.
    pub const PRIORITY_ITEM: u8 = 5;

    /// Raw device token size.
    pub const DEVICE_TOKEN_SIZE: usize = 32;
    /// Device token size in its hex transport form.
    pub const DEVICE_TOKEN_HEX_SIZE: usize = 64;
    /// Identifier item value size.
    pub const IDENTIFIER_SIZE: usize = 4;
    /// Expiration item value size.
    pub const EXPIRATION_SIZE: usize = 4;
    /// Priority item value size.
    pub const PRIORITY_SIZE: usize = 1;

    /// Item block overhead (ID + length).
    pub const ITEM_HEADER_SIZE: usize = 3;
    /// Frame header size (command + frame length).
    pub const FRAME_HEADER_SIZE: usize = 5;
    /// Error frame size.
    pub const ERROR_FRAME_SIZE: usize = 6;
}

/// Encode a notification into a v2 frame.
///
/// Items are emitted in item-ID order: device token, payload, identifier,
/// expiration, priority. The frame length counts the item blocks only.
pub fn encode(n: &Notification) -> Result<Vec<u8>, EncodeError> {
    if n.device_token.len() != wire::DEVICE_TOKEN_HEX_SIZE {
        return Err(EncodeError::InvalidToken);
    }
    let token = hex::decode(&n.device_token).map_err(|_| EncodeError::InvalidToken)?;

    let json = serde_json::to_vec(&n.payload)?;

    let expiration = n
        .expiration
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0);

    let frame_length = 5 * wire::ITEM_HEADER_SIZE
        + wire::DEVICE_TOKEN_SIZE
        + json.len()
        + wire::IDENTIFIER_SIZE
        + wire::EXPIRATION_SIZE
        + wire::PRIORITY_SIZE;

    let mut frame = Vec::with_capacity(wire::FRAME_HEADER_SIZE + frame_length);
    frame.push(wire::SEND_COMMAND);
    frame.extend_from_slice(&(frame_length as u32).to_be_bytes());
    push_item(&mut frame, wire::DEVICE_TOKEN_ITEM, &token);
    push_item(&mut frame, wire::PAYLOAD_ITEM, &json);
    push_item(&mut frame, wire::IDENTIFIER_ITEM, &n.identifier.to_be_bytes());
    push_item(&mut frame, wire::EXPIRATION_ITEM, &expiration.to_be_bytes());
    push_item(&mut frame, wire::PRIORITY_ITEM, &[n.priority.as_byte()]);

    Ok(frame)
}

fn push_item(frame: &mut Vec<u8>, id: u8, value: &[u8]) {
    frame.push(id);
    frame.extend_from_slice(&(value.len() as u16).to_be_bytes());
    frame.extend_from_slice(value);
}

/// Status byte of an error frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorStatus {
    /// Processing error.
    Processing = 1,
    /// No device token in the frame.
    MissingDeviceToken = 2,
    /// No topic in the frame.
    MissingTopic = 3,
    /// No payload in the frame.
    MissingPayload = 4,
    /// Token item has the wrong size.
    InvalidTokenSize = 5,
    /// Topic item has the wrong size.
    InvalidTopicSize = 6,
    /// Payload exceeds the allowed size.
    InvalidPayloadSize = 7,
    /// The device token is not valid for this gateway.
    InvalidToken = 8,
    /// The gateway is shutting down.
    Shutdown = 10,
    /// Anything the gateway did not explain, including malformed frames.
    Unknown = 255,
}

impl ErrorStatus {
    /// Parse a status from its wire byte. Unmapped bytes are [`Unknown`].
    ///
    /// [`Unknown`]: ErrorStatus::Unknown
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            1 => Self::Processing,
            2 => Self::MissingDeviceToken,
            3 => Self::MissingTopic,
            4 => Self::MissingPayload,
            5 => Self::InvalidTokenSize,
            6 => Self::InvalidTopicSize,
            7 => Self::InvalidPayloadSize,
            8 => Self::InvalidToken,
            10 => Self::Shutdown,
            _ => Self::Unknown,
        }
    }

    /// Wire byte of this status.
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Fixed description, as documented by Apple.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "Processing error",
            Self::MissingDeviceToken => "Missing device token",
            Self::MissingTopic => "Missing topic",
            Self::MissingPayload => "Missing payload",
            Self::InvalidTokenSize => "Invalid token size",
            Self::InvalidTopicSize => "Invalid topic size",
            Self::InvalidPayloadSize => "Invalid payload size",
            Self::InvalidToken => "Invalid token",
            Self::Shutdown => "Shutdown",
            Self::Unknown => "None (unknown)",
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded error frame from the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{status}")]
pub struct ErrorResponse {
    /// Command byte, always 8 from the gateway.
    pub command: u8,
    /// Failure status.
    pub status: ErrorStatus,
    /// Identifier of the notification the gateway rejected.
    pub identifier: u32,
}

impl ErrorResponse {
    /// Decode an error frame.
    ///
    /// Anything other than exactly 6 bytes decodes to
    /// [`ErrorStatus::Unknown`] with a zero identifier.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.len() != wire::ERROR_FRAME_SIZE {
            return Self {
                command: 0,
                status: ErrorStatus::Unknown,
                identifier: 0,
            };
        }

        Self {
            command: bytes[0],
            status: ErrorStatus::from_byte(bytes[1]),
            identifier: u32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
        }
    }
}
