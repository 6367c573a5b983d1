//! The drawing surface the timing diagram paints on.
//!
//! This module abstracts the 2-D canvas so the diagram can be drawn into a
//! browser canvas, an SVG document, or a command list for inspection.

/// A point in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal offset from the left edge.
    pub x: f64,
    /// Vertical offset from the top edge.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Horizontal anchor of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TextAlign {
    /// Text starts at the anchor.
    #[default]
    Left,
    /// Text is centered on the anchor.
    Center,
    /// Text ends at the anchor.
    Right,
}

/// Paint attributes of a text run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextStyle {
    /// Fill colour (CSS syntax).
    pub colour: String,
    /// Font size in pixels.
    pub font_px: f64,
    /// Horizontal anchor.
    pub align: TextAlign,
}

impl TextStyle {
    /// Create a style.
    pub fn new(colour: impl Into<String>, font_px: f64, align: TextAlign) -> Self {
        Self {
            colour: colour.into(),
            font_px,
            align,
        }
    }
}

/// Trait for the drawing operations used by [`TimingDiagram`](super::TimingDiagram).
///
/// Text is vertically centered on its anchor point.
pub trait DrawingSurface {
    /// Set the surface size and clear everything drawn so far.
    fn resize(&mut self, width: f64, height: f64);

    /// Stroke a straight line.
    fn line(&mut self, from: Point, to: Point, colour: &str, width: f64);

    /// Fill a text run.
    fn text(&mut self, text: &str, at: Point, style: &TextStyle);

    /// Width of `text` at `font_px`.
    ///
    /// The default is an estimate for a proportional sans-serif font.
    fn measure_text(&self, text: &str, font_px: f64) -> f64 {
        text.chars().count() as f64 * font_px * 0.6
    }

    /// Scroll the viewport so that `x` is its left edge.
    fn scroll_to(&mut self, x: f64);
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawCommand {
    /// [`DrawingSurface::resize`]
    Resize {
        /// New width
        width: f64,
        /// New height
        height: f64,
    },
    /// [`DrawingSurface::line`]
    Line {
        /// Start point
        from: Point,
        /// End point
        to: Point,
        /// Stroke colour
        colour: String,
        /// Stroke width
        width: f64,
    },
    /// [`DrawingSurface::text`]
    Text {
        /// Text run
        text: String,
        /// Anchor point
        at: Point,
        /// Paint attributes
        style: TextStyle,
    },
    /// [`DrawingSurface::scroll_to`]
    Scroll(f64),
}

/// A surface that keeps every drawing operation in memory.
///
/// Useful for tests and for replaying a diagram into another surface.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    width: f64,
    height: f64,
    scroll: f64,
}

impl RecordingSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// All operations since the last resize, in drawing order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Current surface size.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Last scroll position.
    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Stroked lines as `(from, to, colour)`.
    pub fn lines(&self) -> impl Iterator<Item = (Point, Point, &str)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Line {
                from, to, colour, ..
            } => Some((*from, *to, colour.as_str())),
            _ => None,
        })
    }

    /// Text runs as `(text, anchor)`.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Point)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, at, .. } => Some((text.as_str(), *at)),
            _ => None,
        })
    }

    /// Replay the recorded operations onto another surface.
    pub fn replay<S: DrawingSurface>(&self, target: &mut S) {
        for cmd in &self.commands {
            match cmd {
                DrawCommand::Resize { width, height } => target.resize(*width, *height),
                DrawCommand::Line {
                    from,
                    to,
                    colour,
                    width,
                } => target.line(*from, *to, colour, *width),
                DrawCommand::Text { text, at, style } => target.text(text, *at, style),
                DrawCommand::Scroll(x) => target.scroll_to(*x),
            }
        }
    }
}

impl DrawingSurface for RecordingSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.commands.clear();
        self.width = width;
        self.height = height;
        self.scroll = 0.0;
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn line(&mut self, from: Point, to: Point, colour: &str, width: f64) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            colour: String::from(colour),
            width,
        });
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: String::from(text),
            at,
            style: style.clone(),
        });
    }

    fn scroll_to(&mut self, x: f64) {
        self.scroll = x;
        self.commands.push(DrawCommand::Scroll(x));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_clears() {
        let mut surface = RecordingSurface::new();
        surface.line(Point::new(0.0, 0.0), Point::new(1.0, 0.0), "#000", 2.0);
        surface.resize(100.0, 50.0);
        assert_eq!(surface.commands().len(), 1);
        assert_eq!(surface.size(), (100.0, 50.0));
    }

    #[test]
    fn test_default_measure() {
        let surface = RecordingSurface::new();
        assert_eq!(surface.measure_text("Start", 10.0), 30.0);
    }

    #[test]
    fn test_replay() {
        let mut a = RecordingSurface::new();
        a.resize(10.0, 10.0);
        a.text("x", Point::new(1.0, 2.0), &TextStyle::new("#888", 10.0, TextAlign::Center));
        a.scroll_to(4.0);

        let mut b = RecordingSurface::new();
        a.replay(&mut b);
        assert_eq!(a.commands(), b.commands());
        assert_eq!(b.scroll(), 4.0);
    }
}
