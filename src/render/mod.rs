//! Timing-diagram rendering.
//!
//! A [`TimingDiagram`] draws a [`Sequence`](crate::Sequence) as a strip
//! chart: one horizontal track per bus line, a vertical edge wherever a
//! line changes level between consecutive steps, captions under the steps
//! and bit annotations above them. Drawing goes through the
//! [`DrawingSurface`] trait.
//!
//! # Surfaces
//!
//! - [`RecordingSurface`]: keeps every operation for inspection or replay
//! - [`SvgSurface`]: builds a standalone SVG document
//!
//! # Example
//!
//! ```
//! use busline::render::{DiagramLayout, SvgSurface, TimingDiagram};
//! use busline::spi::{self, Cpha, Cpol, SpiConfig};
//!
//! let seq = spi::encode(&SpiConfig::new(Cpol::Idle0, Cpha::Leading, 0xA5, 0x5A)).unwrap();
//!
//! let mut svg = SvgSurface::new();
//! TimingDiagram::new(DiagramLayout::spi(), 800.0).render(&seq, &mut svg);
//! assert!(svg.document().contains("MOSI"));
//! ```

mod diagram;
mod layout;
mod surface;
mod svg;

pub use diagram::{SCROLL_MARGIN, TimingDiagram};
pub use layout::{DiagramLayout, LayoutOverrides};
pub use surface::{DrawCommand, DrawingSurface, Point, RecordingSurface, TextAlign, TextStyle};
pub use svg::SvgSurface;
