//! CAN frame configuration types.
//!
//! [`CanInput`] is the raw form state (hex strings and choices). Parsing it
//! yields a [`CanConfig`], whose identifier is an [`embedded_can::Id`] so an
//! out-of-range identifier cannot survive validation.

use core::fmt;
use core::str::FromStr;

use embedded_can::{ExtendedId, Id, StandardId};

use crate::hex;
use crate::protocol::ConfigNotice;
use crate::{Error, Result};

/// Maximum classic CAN data length in bytes.
pub const MAX_DATA_LEN: u8 = 8;

/// Largest standard (11-bit) identifier.
pub const MAX_STANDARD_ID: u32 = 0x7FF;

/// Largest extended (29-bit) identifier.
pub const MAX_EXTENDED_ID: u32 = 0x1FFF_FFFF;

/// Fixed 15-bit value transmitted in the CRC field.
///
/// The CRC is not computed; every frame carries this alternating pattern.
pub const PLACEHOLDER_CRC: u16 = 0b101_0101_0101_0101;

/// Identifier format of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FrameFormat {
    /// 11-bit identifier (CAN 2.0A).
    #[default]
    Standard,
    /// 29-bit identifier (CAN 2.0B).
    Extended,
}

impl FrameFormat {
    /// Number of identifier bits.
    pub const fn id_bits(self) -> u32 {
        match self {
            FrameFormat::Standard => 11,
            FrameFormat::Extended => 29,
        }
    }

    /// Largest identifier of this format.
    pub const fn max_id(self) -> u32 {
        match self {
            FrameFormat::Standard => MAX_STANDARD_ID,
            FrameFormat::Extended => MAX_EXTENDED_ID,
        }
    }

    /// Maximum number of hex digits accepted for the identifier input.
    pub const fn max_id_digits(self) -> usize {
        match self {
            FrameFormat::Standard => 3,
            FrameFormat::Extended => 8,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            FrameFormat::Standard => "standard",
            FrameFormat::Extended => "extended",
        }
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FrameFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(FrameFormat::Standard),
            "extended" => Ok(FrameFormat::Extended),
            _ => Err(Error::InvalidChoice {
                field: "frame format",
                value: String::from(s),
            }),
        }
    }
}

/// Data or remote frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FrameKind {
    /// Frame carrying a data field.
    #[default]
    Data,
    /// Remote transmission request; the DLC is sent but no data follows.
    Remote,
}

impl FrameKind {
    /// Value of the RTR bit.
    pub const fn rtr_bit(self) -> u8 {
        match self {
            FrameKind::Data => 0,
            FrameKind::Remote => 1,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameKind::Data => f.write_str("data"),
            FrameKind::Remote => f.write_str("remote"),
        }
    }
}

impl FromStr for FrameKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "data" => Ok(FrameKind::Data),
            "remote" => Ok(FrameKind::Remote),
            _ => Err(Error::InvalidChoice {
                field: "frame kind",
                value: String::from(s),
            }),
        }
    }
}

/// CAN bus state of one bit time.
///
/// A logical 0 is dominant and wins arbitration over a recessive 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BusState {
    /// Logical 0: CAN_H driven high, CAN_L driven low.
    Dominant,
    /// Logical 1: both lines at the quiescent level.
    Recessive,
}

impl BusState {
    /// Bus state that transmits `bit`.
    #[inline]
    pub const fn from_bit(bit: u8) -> Self {
        if bit == 0 {
            BusState::Dominant
        } else {
            BusState::Recessive
        }
    }

    /// Returns true for [`BusState::Dominant`].
    #[inline]
    pub const fn is_dominant(self) -> bool {
        matches!(self, BusState::Dominant)
    }
}

impl fmt::Display for BusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusState::Dominant => f.write_str("dominant"),
            BusState::Recessive => f.write_str("recessive"),
        }
    }
}

/// A validated CAN frame configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanConfig {
    id: Id,
    kind: FrameKind,
    dlc: u8,
    data: Vec<u8>,
}

impl CanConfig {
    /// Create a data frame; the DLC is the length of `data`.
    pub fn data_frame(id: impl Into<Id>, data: &[u8]) -> Result<Self> {
        if data.len() > MAX_DATA_LEN as usize {
            return Err(Error::InvalidDataLength(data.len().min(u8::MAX as usize) as u8));
        }
        let cfg = Self {
            id: id.into(),
            kind: FrameKind::Data,
            dlc: data.len() as u8,
            data: data.to_vec(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Create a remote frame requesting `dlc` bytes.
    pub fn remote_frame(id: impl Into<Id>, dlc: u8) -> Result<Self> {
        let cfg = Self {
            id: id.into(),
            kind: FrameKind::Remote,
            dlc,
            data: Vec::new(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Create a frame from raw values, rejecting identifiers above the format's cap.
    pub fn from_raw(
        format: FrameFormat,
        raw_id: u32,
        kind: FrameKind,
        dlc: u8,
        data: &[u8],
    ) -> Result<Self> {
        let id = make_id(format, raw_id)?;
        let cfg = Self {
            id,
            kind,
            dlc,
            data: data.to_vec(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the DLC and data against each other.
    pub fn validate(&self) -> Result<()> {
        if self.dlc > MAX_DATA_LEN {
            return Err(Error::InvalidDataLength(self.dlc));
        }
        let expected = match self.kind {
            FrameKind::Data => self.dlc as usize,
            FrameKind::Remote => 0,
        };
        if self.data.len() != expected {
            return Err(Error::DataLengthMismatch {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Identifier of the frame.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Identifier as a plain integer.
    pub fn raw_id(&self) -> u32 {
        match self.id {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        }
    }

    /// Identifier format.
    pub fn format(&self) -> FrameFormat {
        match self.id {
            Id::Standard(_) => FrameFormat::Standard,
            Id::Extended(_) => FrameFormat::Extended,
        }
    }

    /// Data or remote frame.
    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Data length code.
    pub fn dlc(&self) -> u8 {
        self.dlc
    }

    /// Data bytes (empty for remote frames).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns true when the frame carries a data field.
    pub fn has_data_field(&self) -> bool {
        self.kind == FrameKind::Data && self.dlc > 0
    }

    /// Log header describing the frame.
    pub fn summary(&self) -> Vec<String> {
        let mut second = format!(
            "Message ID: {}, data length: {} bytes",
            hex::format_hex(self.raw_id(), 2),
            self.dlc
        );
        if self.kind == FrameKind::Data {
            second.push_str(&format!(", data: 0x{}", hex::format_bytes(&self.data)));
        }
        vec![
            format!(
                "Simulation start: {} format {} frame",
                self.format(),
                self.kind
            ),
            second,
        ]
    }
}

fn make_id(format: FrameFormat, raw_id: u32) -> Result<Id> {
    let out_of_range = || Error::IdentifierOutOfRange {
        format: format.name(),
        id: raw_id,
    };
    match format {
        FrameFormat::Standard => {
            let raw = u16::try_from(raw_id).map_err(|_| out_of_range())?;
            StandardId::new(raw).map(Id::Standard).ok_or_else(out_of_range)
        }
        FrameFormat::Extended => ExtendedId::new(raw_id)
            .map(Id::Extended)
            .ok_or_else(out_of_range),
    }
}

/// Raw CAN form input, as handed over by a user interface.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CanInput {
    /// Identifier format.
    pub format: FrameFormat,
    /// Data or remote frame.
    pub kind: FrameKind,
    /// Message identifier as hex text.
    pub message_id: String,
    /// Data length code (0 to 8).
    pub data_length: u8,
    /// Data bytes as one hex run.
    pub data: String,
}

impl Default for CanInput {
    fn default() -> Self {
        Self {
            format: FrameFormat::Standard,
            kind: FrameKind::Data,
            message_id: String::from("123"),
            data_length: 8,
            data: String::from("1122334455667788"),
        }
    }
}

impl CanInput {
    /// Validate the form and freeze it into a [`CanConfig`].
    ///
    /// Data shorter than the DLC is zero-padded; longer data is rejected.
    pub fn parse(&self) -> Result<CanConfig> {
        let id_hex = hex::normalize(&self.message_id);
        let max_digits = self.format.max_id_digits();
        if id_hex.len() > max_digits {
            return Err(Error::HexTooLong {
                field: "message ID",
                digits: id_hex.len(),
                max_digits,
            });
        }
        let raw_id = hex::parse_value("message ID", &id_hex, 32)?;
        if raw_id > self.format.max_id() {
            return Err(Error::IdentifierOutOfRange {
                format: self.format.name(),
                id: raw_id,
            });
        }
        if self.data_length > MAX_DATA_LEN {
            return Err(Error::InvalidDataLength(self.data_length));
        }

        let data = match self.kind {
            FrameKind::Data => hex::parse_bytes("data", &self.data, self.data_length as usize)?,
            FrameKind::Remote => Vec::new(),
        };
        CanConfig::from_raw(self.format, raw_id, self.kind, self.data_length, &data)
    }

    /// Switch the frame format.
    ///
    /// Switching to standard while the identifier is above 0x7FF clamps it to
    /// 0x7FF and reports the adjustment instead of failing. This includes
    /// identifiers too large for 32 bits.
    pub fn set_format(&mut self, format: FrameFormat) -> Option<ConfigNotice> {
        self.format = format;
        if format != FrameFormat::Standard {
            return None;
        }
        match hex::parse_value("message ID", &self.message_id, 32) {
            Ok(current) if current <= MAX_STANDARD_ID => return None,
            // Non-hex text is left for `parse` to report.
            Err(Error::InvalidHex { .. }) => return None,
            _ => {}
        }
        self.message_id = String::from("7FF");
        let notice = ConfigNotice::new(
            "message ID",
            "Standard frame IDs cannot exceed 0x7FF (11 bits); the ID was set to the maximum.",
        );
        log::warn!("{notice}");
        Some(notice)
    }

    /// Change the data length, truncating data that no longer fits.
    pub fn set_data_length(&mut self, dlc: u8) -> Result<Option<ConfigNotice>> {
        if dlc > MAX_DATA_LEN {
            return Err(Error::InvalidDataLength(dlc));
        }
        self.data_length = dlc;

        let max_digits = dlc as usize * 2;
        let data = hex::normalize(&self.data);
        if data.chars().count() <= max_digits {
            return Ok(None);
        }
        self.data = data.chars().take(max_digits).collect();
        let notice = ConfigNotice::new(
            "data",
            format!("Data length changed to {dlc} bytes; the data was truncated to match."),
        );
        log::warn!("{notice}");
        Ok(Some(notice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_state_polarity() {
        assert_eq!(BusState::from_bit(0), BusState::Dominant);
        assert_eq!(BusState::from_bit(1), BusState::Recessive);
        assert!(BusState::Dominant.is_dominant());
    }

    #[test]
    fn test_config_from_raw_rejects_large_ids() {
        assert!(CanConfig::from_raw(FrameFormat::Standard, 0x7FF, FrameKind::Remote, 0, &[]).is_ok());
        assert!(matches!(
            CanConfig::from_raw(FrameFormat::Standard, 0x800, FrameKind::Remote, 0, &[]),
            Err(Error::IdentifierOutOfRange { id: 0x800, .. })
        ));
        assert!(matches!(
            CanConfig::from_raw(FrameFormat::Extended, 0x2000_0000, FrameKind::Remote, 0, &[]),
            Err(Error::IdentifierOutOfRange { .. })
        ));
    }

    #[test]
    fn test_config_data_mismatch() {
        assert!(matches!(
            CanConfig::from_raw(FrameFormat::Standard, 0x10, FrameKind::Data, 2, &[1]),
            Err(Error::DataLengthMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            CanConfig::from_raw(FrameFormat::Standard, 0x10, FrameKind::Data, 9, &[0; 9]),
            Err(Error::InvalidDataLength(9))
        ));
        let remote = CanConfig::remote_frame(StandardId::new(0x10).unwrap(), 4).unwrap();
        assert_eq!(remote.dlc(), 4);
        assert!(remote.data().is_empty());
        assert!(!remote.has_data_field());
    }

    #[test]
    fn test_input_parse() {
        let input = CanInput {
            message_id: " 1a3 ".into(),
            data_length: 3,
            data: "abcd".into(),
            ..CanInput::default()
        };
        let cfg = input.parse().unwrap();
        assert_eq!(cfg.raw_id(), 0x1A3);
        assert_eq!(cfg.data(), &[0xAB, 0xCD, 0x00]);

        let input = CanInput {
            message_id: "1234".into(),
            ..CanInput::default()
        };
        assert!(matches!(input.parse(), Err(Error::HexTooLong { .. })));

        let input = CanInput {
            message_id: "800".into(),
            ..CanInput::default()
        };
        assert!(matches!(
            input.parse(),
            Err(Error::IdentifierOutOfRange { .. })
        ));

        let input = CanInput {
            format: FrameFormat::Extended,
            message_id: "3FFFFFFF".into(),
            ..CanInput::default()
        };
        assert!(matches!(
            input.parse(),
            Err(Error::IdentifierOutOfRange { id: 0x3FFF_FFFF, .. })
        ));
    }

    #[test]
    fn test_set_format_clamps_identifier() {
        let mut input = CanInput {
            format: FrameFormat::Extended,
            message_id: "18FEF100".into(),
            ..CanInput::default()
        };
        let notice = input.set_format(FrameFormat::Standard).unwrap();
        assert_eq!(notice.field, "message ID");
        assert_eq!(input.message_id, "7FF");
        assert!(input.parse().is_ok());

        assert!(input.set_format(FrameFormat::Extended).is_none());
        assert!(input.set_format(FrameFormat::Standard).is_none());
    }

    #[test]
    fn test_set_format_clamps_oversized_identifier() {
        let mut input = CanInput {
            format: FrameFormat::Extended,
            message_id: "FFFFFFFFF".into(),
            ..CanInput::default()
        };
        assert!(input.set_format(FrameFormat::Standard).is_some());
        assert_eq!(input.message_id, "7FF");

        let mut input = CanInput {
            format: FrameFormat::Extended,
            message_id: "XYZ".into(),
            ..CanInput::default()
        };
        assert!(input.set_format(FrameFormat::Standard).is_none());
        assert_eq!(input.message_id, "XYZ");
    }

    #[test]
    fn test_set_data_length_truncates() {
        let mut input = CanInput::default();
        let notice = input.set_data_length(2).unwrap();
        assert!(notice.is_some());
        assert_eq!(input.data, "1122");
        assert!(input.set_data_length(4).unwrap().is_none());
        assert!(input.set_data_length(9).is_err());
    }

    #[test]
    fn test_set_data_length_counts_characters() {
        let mut input = CanInput {
            data: "aé1234".into(),
            ..CanInput::default()
        };
        let notice = input.set_data_length(1).unwrap();
        assert!(notice.is_some());
        assert_eq!(input.data, "Aé");
        assert!(matches!(input.parse(), Err(Error::InvalidHex { .. })));

        let mut input = CanInput {
            data: "éé".into(),
            ..CanInput::default()
        };
        assert!(input.set_data_length(1).unwrap().is_none());
        assert_eq!(input.data, "éé");
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!("Extended".parse::<FrameFormat>().unwrap(), FrameFormat::Extended);
        assert_eq!("remote".parse::<FrameKind>().unwrap(), FrameKind::Remote);
        assert!("fd".parse::<FrameFormat>().is_err());
    }
}
