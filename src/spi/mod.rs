//! SPI exchange encoding.
//!
//! One 8-bit word is exchanged full duplex: the master shifts a byte out on
//! MOSI while the slave shifts one out on MISO. Four lines are drawn: `SS`,
//! `SCLK`, `MOSI` and `MISO`.
//!
//! # Modes
//!
//! | Mode | CPOL | CPHA | SCLK idle | Sampling edge |
//! |------|------|------|-----------|---------------|
//! | 0    | 0    | 0    | low       | rising        |
//! | 1    | 0    | 1    | low       | falling       |
//! | 2    | 1    | 0    | high      | falling       |
//! | 3    | 1    | 1    | high      | rising        |
//!
//! # Example
//!
//! ```
//! use busline::spi::{self, Cpha, Cpol, SpiConfig};
//!
//! let cfg = SpiConfig::new(Cpol::Idle1, Cpha::Trailing, 0x0F, 0xF0);
//! assert_eq!(cfg.mode(), 3);
//!
//! let seq = spi::encode(&cfg).unwrap();
//! let sclk = seq.levels_of("SCLK").unwrap();
//! assert!(sclk[0].is_high());
//! ```

mod encoder;
pub mod mode;

use crate::signal::{Level, SignalLine};

pub use encoder::encode;
pub use mode::{Cpha, Cpol, SpiConfig, SpiInput, WORD_BITS};

/// SPI line set: `SS`, `SCLK`, `MOSI`, `MISO`.
///
/// The `SCLK` idle level listed here is the CPOL=0 one; the actual rest
/// level of a sequence is [`Sequence::idle_levels`](crate::Sequence::idle_levels).
pub static LINES: [SignalLine; 4] = [
    SignalLine::new("SS", "#6610f2", Level::High),
    SignalLine::new("SCLK", "#007bff", Level::Low),
    SignalLine::new("MOSI", "#17a2b8", Level::Low),
    SignalLine::new("MISO", "#fd7e14", Level::Low),
];
