//! Diagram geometry per protocol.

use crate::protocol::Protocol;
use crate::signal::Level;

/// Geometry and paint settings of a timing diagram.
///
/// Track `i` sits at `top_margin + i * line_spacing`; a line at
/// [`Level::High`] is drawn `high_offset` below its track, at
/// [`Level::Low`] `low_offset` below it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagramLayout {
    /// Pixels per base time unit.
    pub step_width: f64,
    /// Vertical distance between tracks.
    pub line_spacing: f64,
    /// Y of the first track.
    pub top_margin: f64,
    /// Offset of the high level from the track.
    pub high_offset: f64,
    /// Offset of the low level from the track.
    pub low_offset: f64,
    /// Y of step captions.
    pub label_y: f64,
    /// Y of bit annotations.
    pub bit_label_y: f64,
    /// Space below the label row.
    pub bottom_padding: f64,
    /// Space right of the last step.
    pub right_padding: f64,
    /// Stroke width of signal lines.
    pub stroke_width: f64,
    /// Font size of captions and track names.
    pub label_font_px: f64,
    /// Font size of bit annotations.
    pub bit_label_font_px: f64,
    /// Colour of captions and track names.
    pub label_colour: String,
    /// Colour of bit annotations.
    pub bit_label_colour: String,
    /// Push a caption down when it would collide with the previous one.
    pub avoid_label_overlap: bool,
    /// Minimum horizontal gap between captions on the same row.
    pub min_label_spacing: f64,
    /// How far a colliding caption is pushed down.
    pub overlap_shift: f64,
}

impl DiagramLayout {
    /// Layout of the given protocol's diagram.
    pub fn for_protocol(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Can => Self::can(),
            Protocol::I2c => Self::i2c(),
            Protocol::Spi => Self::spi(),
        }
    }

    /// CAN: 12 px bit times, three tracks 40 px apart.
    pub fn can() -> Self {
        let (top, spacing) = (30.0, 40.0);
        Self {
            step_width: 12.0,
            line_spacing: spacing,
            top_margin: top,
            high_offset: 5.0,
            low_offset: 20.0,
            label_y: top + spacing * 3.0,
            bit_label_y: top - 15.0,
            bottom_padding: 30.0,
            right_padding: 80.0,
            ..Self::base()
        }
    }

    /// I2C: 15 px clock phases, two tracks 45 px apart, label anti-overlap.
    pub fn i2c() -> Self {
        let (top, spacing) = (30.0, 45.0);
        Self {
            step_width: 15.0,
            line_spacing: spacing,
            top_margin: top,
            label_y: top + spacing + spacing / 1.5,
            bit_label_y: top - 15.0,
            bottom_padding: 30.0,
            avoid_label_overlap: true,
            ..Self::base()
        }
    }

    /// SPI: 15 px clock phases, four tracks 40 px apart.
    pub fn spi() -> Self {
        let (top, spacing) = (30.0, 40.0);
        Self {
            step_width: 15.0,
            line_spacing: spacing,
            top_margin: top,
            label_y: top + spacing * 4.0,
            // Bit indices go above the clock track.
            bit_label_y: top + spacing - 15.0,
            bottom_padding: 50.0,
            ..Self::base()
        }
    }

    fn base() -> Self {
        Self {
            step_width: 15.0,
            line_spacing: 40.0,
            top_margin: 30.0,
            high_offset: 0.0,
            low_offset: 15.0,
            label_y: 0.0,
            bit_label_y: 15.0,
            bottom_padding: 30.0,
            right_padding: 50.0,
            stroke_width: 2.0,
            label_font_px: 11.0,
            bit_label_font_px: 10.0,
            label_colour: String::from("#6c757d"),
            bit_label_colour: String::from("#888"),
            avoid_label_overlap: false,
            min_label_spacing: 5.0,
            overlap_shift: 15.0,
        }
    }

    /// Y of track `index`.
    pub fn track_y(&self, index: usize) -> f64 {
        self.top_margin + index as f64 * self.line_spacing
    }

    /// Y of track `index` at `level`.
    pub fn level_y(&self, index: usize, level: Level) -> f64 {
        self.track_y(index)
            + match level {
                Level::High => self.high_offset,
                Level::Low => self.low_offset,
            }
    }

    /// Y of the track name, halfway between the two levels.
    pub fn name_y(&self, index: usize) -> f64 {
        self.track_y(index) + (self.high_offset + self.low_offset) / 2.0
    }

    /// X where the first step starts; the track names sit left of it.
    pub fn left_margin(&self) -> f64 {
        self.step_width * 2.0
    }

    /// Surface size that fits `total_units` of steps.
    pub fn canvas_size(&self, total_units: u32) -> (f64, f64) {
        let width = self.left_margin() + total_units as f64 * self.step_width + self.right_padding;
        let height = self.label_y + self.bottom_padding;
        (width, height)
    }
}

/// Partial layout changes, applied on top of a protocol's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOverrides {
    /// Pixels per base time unit.
    pub step_width: Option<f64>,
    /// Vertical distance between tracks.
    pub line_spacing: Option<f64>,
    /// Stroke width of signal lines.
    pub stroke_width: Option<f64>,
    /// Turn caption anti-overlap on or off.
    pub avoid_label_overlap: Option<bool>,
}

impl LayoutOverrides {
    /// Returns true when nothing is overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `layout` with the overridden values replaced.
    ///
    /// Label rows follow a changed line spacing so captions stay below the
    /// last track.
    pub fn apply(&self, mut layout: DiagramLayout) -> DiagramLayout {
        if let Some(width) = self.step_width.filter(|w| *w > 0.0) {
            layout.step_width = width;
        }
        if let Some(spacing) = self.line_spacing.filter(|s| *s > 0.0) {
            let delta = spacing - layout.line_spacing;
            let tracks_above_label = (layout.label_y - layout.top_margin) / layout.line_spacing;
            layout.label_y += delta * tracks_above_label;
            if layout.bit_label_y > layout.top_margin {
                layout.bit_label_y += delta;
            }
            layout.line_spacing = spacing;
        }
        if let Some(width) = self.stroke_width.filter(|w| *w > 0.0) {
            layout.stroke_width = width;
        }
        if let Some(avoid) = self.avoid_label_overlap {
            layout.avoid_label_overlap = avoid;
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_rows() {
        let can = DiagramLayout::can();
        assert_eq!(can.label_y, 150.0);
        assert_eq!(can.level_y(2, Level::High), 115.0);
        assert_eq!(can.level_y(2, Level::Low), 130.0);

        let i2c = DiagramLayout::i2c();
        assert_eq!(i2c.label_y, 105.0);
        assert_eq!(i2c.bit_label_y, 15.0);
        assert!(i2c.avoid_label_overlap);

        let spi = DiagramLayout::spi();
        assert_eq!(spi.label_y, 190.0);
        assert_eq!(spi.bit_label_y, 55.0);
        assert!(!spi.avoid_label_overlap);
    }

    #[test]
    fn test_canvas_size() {
        let layout = DiagramLayout::i2c();
        assert_eq!(layout.canvas_size(10), (30.0 + 150.0 + 50.0, 135.0));
    }

    #[test]
    fn test_overrides() {
        let overrides = LayoutOverrides {
            step_width: Some(20.0),
            line_spacing: Some(50.0),
            avoid_label_overlap: Some(true),
            ..LayoutOverrides::default()
        };
        let layout = overrides.apply(DiagramLayout::spi());
        assert_eq!(layout.step_width, 20.0);
        assert_eq!(layout.track_y(3), 180.0);
        assert_eq!(layout.label_y, 230.0);
        assert_eq!(layout.bit_label_y, 65.0);
        assert!(layout.avoid_label_overlap);

        let untouched = LayoutOverrides {
            step_width: Some(-1.0),
            ..LayoutOverrides::default()
        }
        .apply(DiagramLayout::can());
        assert_eq!(untouched.step_width, 12.0);
        assert!(LayoutOverrides::default().is_empty());
    }
}
