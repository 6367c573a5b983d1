//! Standalone SVG output.

use core::fmt::Write;

use super::surface::{DrawingSurface, Point, TextAlign, TextStyle};

/// A surface that builds an SVG document.
///
/// Scrolling has no effect on the document; the whole diagram is exported.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    font_family: String,
    body: String,
}

impl SvgSurface {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            font_family: String::from("sans-serif"),
            body: String::new(),
        }
    }

    /// Use `family` for every text run.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Number of drawn elements.
    pub fn element_count(&self) -> usize {
        self.body.lines().count()
    }

    /// The complete SVG document.
    pub fn document(&self) -> String {
        let mut doc = String::with_capacity(self.body.len() + 256);
        let _ = writeln!(
            doc,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(
            doc,
            r#"<rect width="100%" height="100%" fill="white"/>"#
        );
        doc.push_str(&self.body);
        doc.push_str("</svg>\n");
        doc
    }

    /// Consume the surface and return the document.
    pub fn into_document(self) -> String {
        self.document()
    }
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface for SvgSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.body.clear();
    }

    fn line(&mut self, from: Point, to: Point, colour: &str, width: f64) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-linecap="square"/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            escape(colour),
            width
        );
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) {
        let anchor = match style.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" fill="{}" font-family="{}" font-size="{}" text-anchor="{}" dominant-baseline="middle">{}</text>"#,
            at.x,
            at.y,
            escape(&style.colour),
            escape(&self.font_family),
            style.font_px,
            anchor,
            escape(text)
        );
    }

    fn scroll_to(&mut self, _x: f64) {}
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_shape() {
        let mut svg = SvgSurface::new();
        svg.resize(120.0, 80.0);
        svg.line(Point::new(0.0, 30.0), Point::new(45.0, 30.0), "#007bff", 2.0);
        svg.text(
            "Addr <0x50>",
            Point::new(20.0, 105.0),
            &TextStyle::new("#6c757d", 11.0, TextAlign::Center),
        );

        let doc = svg.document();
        assert!(doc.starts_with("<svg "));
        assert!(doc.contains(r#"width="120" height="80""#));
        assert!(doc.contains(r##"<line x1="0" y1="30" x2="45" y2="30" stroke="#007bff""##));
        assert!(doc.contains("Addr &lt;0x50&gt;"));
        assert!(doc.contains(r#"text-anchor="middle""#));
        assert!(doc.trim_end().ends_with("</svg>"));
        assert_eq!(svg.element_count(), 2);
    }

    #[test]
    fn test_resize_clears_body() {
        let mut svg = SvgSurface::new();
        svg.line(Point::new(0.0, 0.0), Point::new(1.0, 1.0), "red", 1.0);
        svg.resize(10.0, 10.0);
        assert_eq!(svg.element_count(), 0);
    }
}
