//! I2C transaction encoding.
//!
//! A transaction is START, the address byte with its R/W bit, the address
//! ACK, one data byte with its acknowledge, and STOP. Two lines are drawn:
//! `SCL` and `SDA`, both idling high.
//!
//! # Acknowledge
//!
//! - After the address byte and after a written byte the slave pulls SDA
//!   low (ACK).
//! - After a read byte the master drives SDA itself: low for ACK to keep
//!   reading, high for NACK to end the read.
//!
//! # Example
//!
//! ```
//! use busline::i2c::{self, I2cConfig};
//!
//! let cfg = I2cConfig::write(0x50, 0x42).unwrap();
//! assert_eq!(cfg.address_byte(), 0xA0);
//!
//! let seq = i2c::encode(&cfg).unwrap();
//! assert_eq!(seq.steps()[1].label.as_deref(), Some("Start"));
//! ```

mod encoder;
pub mod transaction;

use crate::signal::{Level, SignalLine};

pub use encoder::encode;
pub use transaction::{AckType, Direction, I2cConfig, I2cInput, MAX_ADDRESS};

/// I2C line set: `SCL`, `SDA`.
pub static LINES: [SignalLine; 2] = [
    SignalLine::new("SCL", "#007bff", Level::High),
    SignalLine::new("SDA", "#17a2b8", Level::High),
];
