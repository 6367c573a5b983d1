//! CAN frame to step sequence encoding.
//!
//! One step per bit time. All three diagram lines move together: a dominant
//! bit drives CAN_H high and CAN_L low (large differential), a recessive bit
//! leaves both at the quiescent level (differential near zero).

use crate::protocol::Protocol;
use crate::signal::{CurrentField, Level, Sequence, SequenceBuilder, Step};
use crate::Result;

use super::frame::{BusState, CanConfig, FrameFormat, FrameKind, PLACEHOLDER_CRC};

/// Number of recessive end-of-frame bits.
pub const EOF_BITS: usize = 7;

/// Number of recessive interframe space bits.
pub const IFS_BITS: usize = 3;

/// Diagram levels of `CAN_H`, `CAN_L` and the differential for a bus state.
pub fn line_levels(state: BusState) -> Vec<Level> {
    match state {
        BusState::Dominant => vec![Level::High, Level::Low, Level::High],
        BusState::Recessive => vec![Level::Low, Level::High, Level::Low],
    }
}

struct FrameEncoder {
    builder: SequenceBuilder,
}

impl FrameEncoder {
    fn new() -> Self {
        Self {
            builder: SequenceBuilder::new(Protocol::Can),
        }
    }

    fn bit(&mut self, bit: u8, description: String, field: &str, explanation: String) -> &mut Step {
        let state = BusState::from_bit(bit);
        let step = Step::new(description, line_levels(state))
            .with_bit_label(bit.to_string())
            .with_field(CurrentField {
                name: String::from(field),
                explanation,
                slot: None,
                asserted: state.is_dominant(),
            });
        self.builder.push(step)
    }

    /// Emit `width` bits of `value`, most significant first.
    ///
    /// Returns the step of the first (most significant) bit.
    fn bits(&mut self, value: u32, width: u32, field: &str, what: &str) -> &mut Step {
        let first = self.builder.len();
        for i in (0..width).rev() {
            let bit = ((value >> i) & 1) as u8;
            let pos = width - 1 - i;
            self.bit(
                bit,
                format!("{what} bit {pos} [{bit}]"),
                field,
                format!("{what} bit {pos}"),
            );
        }
        self.builder.step_mut(first)
    }

    fn rtr(&mut self, kind: FrameKind) {
        let bit = kind.rtr_bit();
        self.bit(
            bit,
            format!("RTR bit [{bit}] - {kind} frame"),
            "RTR",
            format!("Remote transmission request: {kind} frame"),
        );
    }

    fn reserved(&mut self, name: &str) -> &mut Step {
        self.bit(
            0,
            format!("{name} bit [0] - reserved"),
            name,
            String::from("Reserved bit"),
        )
    }
}

/// Encode a CAN frame.
///
/// The frame is validated first; on success the sequence runs idle, SOF,
/// arbitration, control, data, CRC, ACK, EOF, IFS and idle again.
pub fn encode(config: &CanConfig) -> Result<Sequence> {
    config.validate()?;

    let mut enc = FrameEncoder::new();
    enc.builder.push_idle("Bus idle (recessive)", "Bus idle");

    enc.bit(
        0,
        String::from("SOF (start of frame) - dominant"),
        "SOF",
        String::from("Start of frame"),
    )
    .status = Some(String::from("Start of frame"));

    let raw_id = config.raw_id();
    match config.format() {
        FrameFormat::Standard => {
            enc.bits(raw_id, 11, "ID", "Identifier").status = Some(String::from("Arbitration"));
            enc.rtr(config.kind());
            enc.bit(
                0,
                String::from("IDE bit [0] - standard format"),
                "IDE",
                String::from("Identifier extension: standard format"),
            )
            .status = Some(String::from("Control"));
            enc.reserved("r0");
        }
        FrameFormat::Extended => {
            enc.bits((raw_id >> 18) & 0x7FF, 11, "ID", "Base identifier")
                .status = Some(String::from("Arbitration"));
            enc.bit(
                1,
                String::from("SRR bit [1] - substitute remote request"),
                "SRR",
                String::from("Substitute remote request"),
            );
            enc.bit(
                1,
                String::from("IDE bit [1] - extended format"),
                "IDE",
                String::from("Identifier extension: extended format"),
            );
            enc.bits(raw_id & 0x3FFFF, 18, "ID", "Extended identifier");
            enc.rtr(config.kind());
            // CAN 2.0B extended frames carry two reserved bits, r1 then r0,
            // so they run two bits longer than the 11-bit layout plus the
            // 18-bit identifier extension alone would suggest.
            enc.reserved("r1").status = Some(String::from("Control"));
            enc.reserved("r0");
        }
    }

    enc.bits(config.dlc() as u32, 4, "DLC", "Data length code");

    if config.has_data_field() {
        let total = config.data().len();
        for (index, &byte) in config.data().iter().enumerate() {
            for i in (0..8).rev() {
                let bit = (byte >> i) & 1;
                let pos = 7 - i;
                let step = enc.bit(
                    bit,
                    format!("Data byte {index} bit {pos} [{bit}]"),
                    "DATA",
                    format!("Data byte {}/{total} bit {pos}", index + 1),
                );
                step.byte = Some(byte);
                if index == 0 && pos == 0 {
                    step.status = Some(String::from("Data"));
                }
            }
        }
    }

    enc.bits(PLACEHOLDER_CRC as u32, 15, "CRC", "CRC").status = Some(String::from("CRC"));
    enc.bit(
        1,
        String::from("CRC delimiter [1]"),
        "CRC_DELIM",
        String::from("CRC delimiter"),
    );

    enc.bit(
        0,
        String::from("ACK slot [0] - received"),
        "ACK",
        String::from("Acknowledge slot"),
    )
    .status = Some(String::from("Acknowledge"));
    enc.bit(
        1,
        String::from("ACK delimiter [1]"),
        "ACK_DELIM",
        String::from("ACK delimiter"),
    );

    for i in 0..EOF_BITS {
        let step = enc.bit(
            1,
            format!("EOF bit {i} [1]"),
            "EOF",
            format!("End of frame bit {}/{EOF_BITS}", i + 1),
        );
        if i == 0 {
            step.status = Some(String::from("End of frame"));
        }
    }
    for i in 0..IFS_BITS {
        enc.bit(
            1,
            format!("IFS bit {i} [1]"),
            "IFS",
            format!("Interframe space bit {}/{IFS_BITS}", i + 1),
        );
    }

    enc.builder
        .push_idle("Bus idle again (recessive)", "Bus idle")
        .status = Some(String::from("Complete"));

    Ok(enc.builder.finish())
}
