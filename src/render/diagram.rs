//! Incremental timing-diagram drawing.

use crate::signal::{Level, Sequence, SignalLine, Step};

use super::layout::DiagramLayout;
use super::surface::{DrawingSurface, Point, TextAlign, TextStyle};

/// Distance kept between the drawing cursor and the right edge of the viewport.
pub const SCROLL_MARGIN: f64 = 50.0;

/// Draws a step sequence one step at a time.
///
/// The diagram owns the drawing cursor: it starts at the layout's left
/// margin on [`begin`](Self::begin) and only ever moves right.
#[derive(Debug, Clone)]
pub struct TimingDiagram {
    layout: DiagramLayout,
    viewport_width: f64,
    lines: &'static [SignalLine],
    previous: Vec<Level>,
    cursor: f64,
    last_label: Option<(f64, f64)>,
    drawn: usize,
}

impl TimingDiagram {
    /// Create a diagram drawing with `layout` into a viewport `viewport_width` pixels wide.
    pub fn new(layout: DiagramLayout, viewport_width: f64) -> Self {
        let cursor = layout.left_margin();
        Self {
            layout,
            viewport_width,
            lines: &[],
            previous: Vec::new(),
            cursor,
            last_label: None,
            drawn: 0,
        }
    }

    /// Geometry in use.
    pub fn layout(&self) -> &DiagramLayout {
        &self.layout
    }

    /// X where the next step starts.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Number of steps drawn since [`begin`](Self::begin).
    pub fn steps_drawn(&self) -> usize {
        self.drawn
    }

    /// Prepare the surface for `sequence`.
    ///
    /// Sizes the surface so the whole sequence fits, clears it, draws the
    /// track names and resets the cursor.
    pub fn begin<S: DrawingSurface>(&mut self, sequence: &Sequence, surface: &mut S) {
        self.lines = sequence.lines();
        self.previous = sequence.idle_levels().to_vec();
        self.cursor = self.layout.left_margin();
        self.last_label = None;
        self.drawn = 0;

        let (width, height) = self.layout.canvas_size(sequence.total_units());
        surface.resize(width, height);
        surface.scroll_to(0.0);

        let style = TextStyle::new(
            self.layout.label_colour.clone(),
            self.layout.label_font_px,
            TextAlign::Right,
        );
        let x = self.layout.left_margin() - 5.0;
        for (index, line) in self.lines.iter().enumerate() {
            surface.text(line.name, Point::new(x, self.layout.name_y(index)), &style);
        }
        log::debug!(
            "diagram sized {width}x{height} for {} units",
            sequence.total_units()
        );
    }

    /// Draw one step at the cursor and advance it.
    pub fn draw_step<S: DrawingSurface>(&mut self, step: &Step, surface: &mut S) {
        let layout = &self.layout;
        let start = self.cursor;
        let end = start + step.duration as f64 * layout.step_width;

        // Edges first so segments are painted over their ends.
        for (index, line) in self.lines.iter().enumerate() {
            let (prev, level) = (self.previous[index], step.level(index));
            if prev != level {
                surface.line(
                    Point::new(start, layout.level_y(index, prev)),
                    Point::new(start, layout.level_y(index, level)),
                    line.colour,
                    layout.stroke_width,
                );
            }
        }
        for (index, line) in self.lines.iter().enumerate() {
            let y = layout.level_y(index, step.level(index));
            surface.line(
                Point::new(start, y),
                Point::new(end, y),
                line.colour,
                layout.stroke_width,
            );
        }

        let centre = start + (end - start) / 2.0;
        if let Some(label) = &step.label {
            self.draw_label(label, centre, surface);
        }
        if let Some(bit) = &step.bit_label {
            let style = TextStyle::new(
                self.layout.bit_label_colour.clone(),
                self.layout.bit_label_font_px,
                TextAlign::Center,
            );
            surface.text(bit, Point::new(centre, self.layout.bit_label_y), &style);
        }

        self.previous.clone_from(&step.levels);
        self.cursor = end;
        self.drawn += 1;
        surface.scroll_to((end - self.viewport_width + SCROLL_MARGIN).max(0.0));
    }

    /// Draw a whole sequence at once.
    pub fn render<S: DrawingSurface>(&mut self, sequence: &Sequence, surface: &mut S) {
        self.begin(sequence, surface);
        for step in sequence.steps() {
            self.draw_step(step, surface);
        }
    }

    fn draw_label<S: DrawingSurface>(&mut self, text: &str, centre: f64, surface: &mut S) {
        let mut y = self.layout.label_y;
        if self.layout.avoid_label_overlap {
            let width = surface.measure_text(text, self.layout.label_font_px);
            let left = centre - width / 2.0;
            if let Some((last_left, last_width)) = self.last_label {
                if left < last_left + last_width + self.layout.min_label_spacing {
                    y += self.layout.overlap_shift;
                }
            }
            self.last_label = Some((left, width));
        }
        let style = TextStyle::new(
            self.layout.label_colour.clone(),
            self.layout.label_font_px,
            TextAlign::Center,
        );
        surface.text(text, Point::new(centre, y), &style);
    }
}
