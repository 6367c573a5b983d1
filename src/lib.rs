#![forbid(unsafe_code)]

//! # busline
//!
//! Step-by-step signal-level simulation of the CAN, I2C and SPI serial buses.
//!
//! A transaction (a CAN frame, an I2C register access, an SPI exchange) is
//! encoded into a [`Sequence`] of steps. Each step holds the level of every
//! bus line, a short description and the annotations drawn above the
//! waveform. Sequences can be rendered as a timing diagram in one go, or
//! played back one step per timer tick by a [`Session`], which also keeps
//! the transaction log and the live view of line levels and the bit decoder.
//!
//! ## Features
//!
//! - **Encoding**: Standard and extended CAN data/remote frames, I2C write and
//!   read transfers with ACK/NACK, SPI exchanges in all four modes
//! - **Rendering**: Incremental timing diagrams on any [`render::DrawingSurface`],
//!   with an SVG backend included
//! - **Playback**: Cancellable, restartable timed playback with a virtual or
//!   wall clock
//! - **Frame structure**: Field-by-field breakdown of a CAN frame
//!
//! ## Quick Start
//!
//! ### Encoding a transaction
//!
//! ```
//! use busline::{Level, Result};
//! use busline::spi::{Cpha, Cpol, SpiConfig};
//!
//! fn main() -> Result<()> {
//!     let config = SpiConfig::new(Cpol::Idle0, Cpha::Leading, 0xA5, 0x5A);
//!     let sequence = busline::spi::encode(&config)?;
//!
//!     let mosi = sequence.line_index("MOSI").unwrap();
//!     let first_sample = sequence.field_steps().next().unwrap();
//!     assert_eq!(first_sample.level(mosi), Level::High);
//!     Ok(())
//! }
//! ```
//!
//! ### Playing a CAN frame
//!
//! ```
//! use busline::{Result, Session, SessionOptions};
//! use busline::can::CanInput;
//! use busline::render::SvgSurface;
//!
//! fn main() -> Result<()> {
//!     let frame = CanInput::default().parse()?;
//!     let mut session = Session::with_virtual_clock(SvgSurface::new(), SessionOptions::default());
//!     session.configure(frame);
//!     session.start()?;
//!     session.run_until_idle();
//!
//!     assert_eq!(session.log().step_count(), session.driver().position());
//!     let svg = session.into_surface().into_document();
//!     assert!(svg.contains("CAN_H"));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`can`] | CAN frame encoding and frame structure |
//! | [`i2c`] | I2C transaction encoding |
//! | [`spi`] | SPI exchange encoding |
//! | [`signal`] | Levels, lines, steps and sequences |
//! | [`hex`] | Hex text parsing and formatting |
//! | [`render`] | Timing diagram layout and drawing surfaces |
//! | [`playback`] | Timers and the playback state machine |
//! | [`session`] | One visualizer instance tying it all together |
//! | [`options`] | Session options |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`], which is an alias for
//! `std::result::Result<T, Error>`. The [`Error`] enum covers malformed hex
//! input, out-of-range values and inconsistent frame settings.

pub mod can;
mod error;
pub mod hex;
pub mod i2c;
pub mod options;
pub mod playback;
pub mod protocol;
pub mod render;
pub mod session;
pub mod signal;
pub mod spi;

// Re-export commonly used types at the crate root
pub use error::{Error, Result};
pub use options::SessionOptions;
pub use protocol::{ConfigNotice, Protocol, TransactionConfig};
pub use session::{LineState, Session, SessionView};
pub use signal::{BitSlot, CurrentField, IDLE_UNITS, Level, Sequence, SignalLine, Step};
