//! Session options.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration.
//!
//! # Example
//!
//! ```
//! # #[cfg(feature = "serde_json")]
//! # {
//! use busline::SessionOptions;
//! use std::time::Duration;
//!
//! let options = SessionOptions::from_json(r#"{ "speed_ms": "abc" }"#).unwrap();
//! assert_eq!(options.speed(), Duration::from_millis(150));
//!
//! let options = SessionOptions::from_json(r#"{ "speed_ms": 40, "layout": { "step_width": 20 } }"#).unwrap();
//! assert_eq!(options.speed(), Duration::from_millis(40));
//! # }
//! ```

use std::time::Duration;

use crate::protocol::Protocol;
use crate::render::{DiagramLayout, LayoutOverrides};

/// Playback interval used when the configured one is missing or invalid.
pub const DEFAULT_SPEED_MS: i64 = 150;

/// Default viewport width for auto-scrolling.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 800.0;

/// Options of a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionOptions {
    /// Milliseconds per step. Zero or negative selects the default.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "lenient_speed"))]
    pub speed_ms: i64,
    /// Width of the visible part of the diagram.
    pub viewport_width: f64,
    /// Changes to the protocol's default diagram layout.
    pub layout: LayoutOverrides,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            speed_ms: DEFAULT_SPEED_MS,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            layout: LayoutOverrides::default(),
        }
    }
}

impl SessionOptions {
    /// Set the step interval.
    pub fn with_speed_ms(mut self, speed_ms: i64) -> Self {
        self.speed_ms = speed_ms;
        self
    }

    /// Set the viewport width.
    pub fn with_viewport_width(mut self, width: f64) -> Self {
        self.viewport_width = width;
        self
    }

    /// Set layout overrides.
    pub fn with_layout(mut self, layout: LayoutOverrides) -> Self {
        self.layout = layout;
        self
    }

    /// Effective step interval.
    pub fn speed(&self) -> Duration {
        let ms = if self.speed_ms > 0 {
            self.speed_ms
        } else {
            DEFAULT_SPEED_MS
        };
        Duration::from_millis(ms as u64)
    }

    /// Diagram layout for `protocol` with the overrides applied.
    pub fn layout_for(&self, protocol: Protocol) -> DiagramLayout {
        self.layout.apply(DiagramLayout::for_protocol(protocol))
    }

    /// Parse options from JSON.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize options to JSON.
    #[cfg(feature = "serde_json")]
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Accept a number or numeric text; anything else becomes 0 (the default).
#[cfg(feature = "serde")]
fn lenient_speed<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSpeed {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<RawSpeed>::deserialize(deserializer)? {
        Some(RawSpeed::Number(n)) if n.is_finite() => n as i64,
        Some(RawSpeed::Text(text)) => text.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    })
}
