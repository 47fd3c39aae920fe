//! Core constants and error types.

pub mod constants;
pub mod error;

pub use error::{ClientError, EncodeError, PayloadError, SessionError};
