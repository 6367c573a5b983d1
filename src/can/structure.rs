//! Static breakdown of a CAN frame into its named fields.
//!
//! Unlike the step sequence this view is derived from the configuration alone
//! and is recomputed whenever the configuration changes.

use crate::hex;

use super::encoder::{EOF_BITS, IFS_BITS};
use super::frame::{CanConfig, FrameFormat, PLACEHOLDER_CRC};

/// One named field of a CAN frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameField {
    /// Field name.
    pub name: String,
    /// Width in bits.
    pub bits: u32,
    /// Resolved value as displayed.
    pub value: String,
}

impl FrameField {
    fn new(name: &str, bits: u32, value: impl Into<String>) -> Self {
        Self {
            name: String::from(name),
            bits,
            value: value.into(),
        }
    }
}

/// Field list of the frame described by `config`, in transmission order.
pub fn frame_structure(config: &CanConfig) -> Vec<FrameField> {
    let mut fields = Vec::with_capacity(17);
    let raw_id = config.raw_id();
    let rtr = config.kind().rtr_bit().to_string();

    fields.push(FrameField::new("SOF", 1, "0"));
    match config.format() {
        FrameFormat::Standard => {
            fields.push(FrameField::new("Identifier", 11, hex::format_hex(raw_id, 3)));
            fields.push(FrameField::new("RTR", 1, rtr));
            fields.push(FrameField::new("IDE", 1, "0"));
            fields.push(FrameField::new("r0", 1, "0"));
        }
        FrameFormat::Extended => {
            fields.push(FrameField::new(
                "Base identifier",
                11,
                hex::format_hex((raw_id >> 18) & 0x7FF, 3),
            ));
            fields.push(FrameField::new("SRR", 1, "1"));
            fields.push(FrameField::new("IDE", 1, "1"));
            fields.push(FrameField::new(
                "Extended identifier",
                18,
                hex::format_hex(raw_id & 0x3FFFF, 5),
            ));
            fields.push(FrameField::new("RTR", 1, rtr));
            // Both reserved bits of CAN 2.0B, matching the encoder.
            fields.push(FrameField::new("r1", 1, "0"));
            fields.push(FrameField::new("r0", 1, "0"));
        }
    }
    fields.push(FrameField::new("DLC", 4, config.dlc().to_string()));

    if config.has_data_field() {
        fields.push(FrameField::new(
            "Data",
            config.dlc() as u32 * 8,
            format!("0x{}", hex::format_bytes(config.data())),
        ));
    }

    fields.push(FrameField::new(
        "CRC",
        15,
        hex::format_hex(PLACEHOLDER_CRC as u32, 4),
    ));
    fields.push(FrameField::new("CRC delimiter", 1, "1"));
    fields.push(FrameField::new("ACK", 1, "0"));
    fields.push(FrameField::new("ACK delimiter", 1, "1"));
    fields.push(FrameField::new("EOF", EOF_BITS as u32, "1".repeat(EOF_BITS)));
    fields.push(FrameField::new("IFS", IFS_BITS as u32, "1".repeat(IFS_BITS)));
    fields
}

/// Total number of bit times in the frame, SOF through IFS.
pub fn frame_bit_count(config: &CanConfig) -> u32 {
    frame_structure(config).iter().map(|f| f.bits).sum()
}
