//! Error types for transaction configuration.
//!
//! Every failure this crate reports happens before a step sequence exists:
//! malformed hex input, values outside a protocol's legal range, or data that
//! does not match the declared length. Once a configuration has validated,
//! encoding cannot fail.
//!
//! # Example
//!
//! ```
//! use busline::{Error, can::CanInput};
//!
//! let mut input = CanInput::default();
//! input.message_id = "800".into();
//!
//! match input.parse() {
//!     Err(Error::IdentifierOutOfRange { id, .. }) => assert_eq!(id, 0x800),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use core::fmt;

/// Errors raised while validating a bus transaction.
#[derive(Debug)]
pub enum Error {
    /// Input is not a hexadecimal string (only `0-9` and `A-F` are allowed).
    InvalidHex {
        /// Name of the input field
        field: &'static str,
        /// The normalized (trimmed, upper-case) input
        input: String,
    },

    /// Hex input is longer than the field allows.
    HexTooLong {
        /// Name of the input field
        field: &'static str,
        /// Number of hex digits that were supplied
        digits: usize,
        /// Maximum number of hex digits
        max_digits: usize,
    },

    /// A numeric value does not fit the field's bit width.
    ValueOutOfRange {
        /// Name of the input field
        field: &'static str,
        /// The parsed value
        value: u64,
        /// Largest legal value
        max: u64,
    },

    /// A CAN identifier exceeds the range of the selected frame format.
    ///
    /// Standard identifiers are limited to 0x7FF (11 bits), extended ones to
    /// 0x1FFFFFFF (29 bits).
    IdentifierOutOfRange {
        /// Human readable frame format ("standard" or "extended")
        format: &'static str,
        /// The rejected identifier
        id: u32,
    },

    /// A CAN data length code outside 0..=8.
    InvalidDataLength(u8),

    /// The data bytes do not match the declared data length.
    DataLengthMismatch {
        /// Number of bytes declared by the DLC
        expected: usize,
        /// Number of bytes supplied
        actual: usize,
    },

    /// Playback was started before a transaction was configured.
    NotConfigured,

    /// An enumerated choice did not match any of its options.
    InvalidChoice {
        /// Name of the input field
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// Options or views could not be converted to or from JSON.
    #[cfg(feature = "serde_json")]
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidHex { field, input } => write!(
                f,
                "Invalid hex input for {field}: {input:?} (only 0-9 and A-F are allowed)"
            ),
            Error::HexTooLong {
                field,
                digits,
                max_digits,
            } => write!(
                f,
                "Input for {field} is too long: {digits} hex digits, at most {max_digits} allowed"
            ),
            Error::ValueOutOfRange { field, value, max } => write!(
                f,
                "Value 0x{value:X} for {field} is out of range (0x00 to 0x{max:X})"
            ),
            Error::IdentifierOutOfRange { format, id } => {
                let max = if *format == "standard" {
                    0x7FF
                } else {
                    0x1FFF_FFFF
                };
                write!(
                    f,
                    "Message ID 0x{id:X} exceeds the {format} frame maximum 0x{max:X}"
                )
            }
            Error::InvalidDataLength(dlc) => {
                write!(f, "Data length {dlc} is invalid, expected 0 to 8 bytes")
            }
            Error::DataLengthMismatch { expected, actual } => write!(
                f,
                "Data length mismatch: DLC declares {expected} bytes, got {actual}"
            ),
            Error::NotConfigured => write!(f, "No transaction has been configured"),
            Error::InvalidChoice { field, value } => {
                write!(f, "Invalid choice for {field}: {value:?}")
            }
            #[cfg(feature = "serde_json")]
            Error::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "serde_json")]
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "serde_json")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

/// A specialized Result type for configuration and encoding.
pub type Result<T> = core::result::Result<T, Error>;
