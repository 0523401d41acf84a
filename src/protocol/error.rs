//! Wire-decode error types.

use thiserror::Error;

/// Failures produced while decoding a datagram's declared shape.
///
/// These never reach the client: per the handler's shape-check step, a
/// datagram that fails to decode is dropped silently, never answered with
/// `BAD_REQUEST`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    /// The leading byte does not match any known message type.
    #[error("unknown message type: {type_byte:#x}")]
    UnknownType {
        /// The unrecognized leading byte.
        type_byte: u8,
    },

    /// The leading byte is a known request type but the datagram length
    /// does not match that type's exact required length.
    #[error("wrong length for type {type_byte:#x}: expected {expected}, got {got}")]
    WrongLength {
        /// The request's declared type byte.
        type_byte: u8,
        /// The exact length this type requires.
        expected: usize,
        /// The length actually received.
        got: usize,
    },
}
