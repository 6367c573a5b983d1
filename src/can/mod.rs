//! CAN frame encoding.
//!
//! This module turns a classic CAN 2.0 data or remote frame into the
//! bit-time step sequence drawn on three tracks: `CAN_H`, `CAN_L` and the
//! differential voltage.
//!
//! # Features
//!
//! - Standard (11-bit) and Extended (29-bit) identifiers via [`embedded_can::Id`]
//! - Data and remote frames, DLC 0 to 8
//! - Per-bit field metadata for a live bit decoder
//! - Static frame structure summary ([`frame_structure`])
//!
//! The CRC field carries the fixed [`PLACEHOLDER_CRC`] pattern; no checksum
//! is computed.
//!
//! # Example
//!
//! ```
//! use busline::can::{self, CanConfig};
//! use embedded_can::StandardId;
//!
//! let id = StandardId::new(0x123).unwrap();
//! let frame = CanConfig::data_frame(id, &[0xAB, 0xCD]).unwrap();
//! let seq = can::encode(&frame).unwrap();
//!
//! assert_eq!(seq.field_steps().count(), 47 + 16);
//! assert_eq!(can::frame_bit_count(&frame), 47 + 16);
//! ```

mod encoder;
pub mod frame;
pub mod structure;

use crate::signal::{Level, SignalLine};

pub use encoder::{EOF_BITS, IFS_BITS, encode, line_levels};
pub use frame::{
    BusState, CanConfig, CanInput, FrameFormat, FrameKind, MAX_DATA_LEN, MAX_EXTENDED_ID,
    MAX_STANDARD_ID, PLACEHOLDER_CRC,
};
pub use structure::{FrameField, frame_bit_count, frame_structure};

/// CAN line set: `CAN_H`, `CAN_L`, differential.
pub static LINES: [SignalLine; 3] = [
    SignalLine::new("CAN_H", "#007bff", Level::Low),
    SignalLine::new("CAN_L", "#fd7e14", Level::High),
    SignalLine::new("Diff", "#6610f2", Level::Low),
];
