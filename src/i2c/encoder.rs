//! I2C transaction to step sequence encoding.
//!
//! Every bit is two steps: SCL low while SDA takes the bit value, then SCL
//! high while SDA holds it. START and STOP are the only places where SDA
//! changes while SCL is high.

use crate::hex;
use crate::protocol::Protocol;
use crate::signal::{BitSlot, CurrentField, Level, Sequence, SequenceBuilder, Step};
use crate::Result;

use super::transaction::{AckType, Direction, I2cConfig};

const SCL: usize = 0;
const SDA: usize = 1;

struct TransactionEncoder {
    builder: SequenceBuilder,
}

impl TransactionEncoder {
    fn new() -> Self {
        Self {
            builder: SequenceBuilder::new(Protocol::I2c),
        }
    }

    fn step(&mut self, description: String, scl: Level, sda: Level) -> &mut Step {
        self.builder.push(Step::new(description, vec![scl, sda]))
    }

    /// SCL low with SDA left where it is.
    fn clock_low(&mut self, description: String) -> &mut Step {
        let sda = self.builder.current(SDA);
        self.step(description, Level::Low, sda)
    }

    /// Byte preparation, eight clocked bits and the trailing SCL low.
    ///
    /// Returns the index of the preparation step.
    fn byte(&mut self, byte: u8, label: &str, field: &str) -> usize {
        let first = self.builder.len();
        self.clock_low(format!("{label}: prepare"))
            .label = Some(String::from(label));

        for i in (0..8u8).rev() {
            let bit = (byte >> i) & 1;
            let sda = Level::from_bit(bit);
            let current = CurrentField {
                name: String::from(field),
                explanation: format!("{label} bit {i} = {bit}"),
                slot: Some(BitSlot::Data(i)),
                asserted: sda.is_high(),
            };
            self.step(format!("{label} bit {i}: SCL low, SDA={bit}"), Level::Low, sda)
                .field = Some(current.clone());
            let step = self.step(format!("{label} bit {i}: SCL high"), Level::High, sda);
            step.bit_label = Some(i.to_string());
            step.field = Some(current);
        }

        self.clock_low(format!("{label}: done, SCL low"));
        first
    }

    /// Acknowledge clock where the slave pulls SDA low.
    fn slave_ack(&mut self, prefix: &str) -> usize {
        let first = self.builder.len();
        let step = self.step(
            format!("{prefix}: master releases SDA"),
            Level::Low,
            Level::High,
        );
        step.label = Some(String::from("ACK"));
        step.field = Some(ack_field("ACK", "SDA released, waiting for slave", Level::High));

        self.step(
            format!("{prefix}: SCL high, slave pulls SDA low"),
            Level::High,
            Level::Low,
        )
        .field = Some(ack_field("ACK", "Slave acknowledged", Level::Low));
        self.step(format!("{prefix}: SCL low (end of ACK)"), Level::Low, Level::Low);
        first
    }

    /// Acknowledge clock driven by the master.
    fn master_ack(&mut self, ack: AckType) -> usize {
        let first = self.builder.len();
        let name = format!("M-{ack}");
        let sda = ack.level();
        let explanation = format!("Master sends {ack}");
        let step = self.step(
            format!("Master {ack}: SCL low, master drives SDA"),
            Level::Low,
            sda,
        );
        step.label = Some(name.clone());
        step.field = Some(ack_field(&name, &explanation, sda));

        self.step(format!("Master {ack}: SCL high"), Level::High, sda)
            .field = Some(ack_field(&name, &explanation, sda));
        self.step(format!("Master {ack}: SCL low (end of ACK)"), Level::Low, sda);
        first
    }

    fn status(&mut self, index: usize, status: &str) -> &mut Step {
        let step = self.builder.step_mut(index);
        step.status = Some(String::from(status));
        step
    }
}

fn ack_field(name: &str, explanation: &str, sda: Level) -> CurrentField {
    CurrentField {
        name: String::from(name),
        explanation: String::from(explanation),
        slot: Some(BitSlot::Ack),
        asserted: sda.is_high(),
    }
}

/// Encode a single-byte I2C read or write.
pub fn encode(config: &I2cConfig) -> Result<Sequence> {
    config.validate()?;

    let mut enc = TransactionEncoder::new();
    enc.builder.push_idle("Bus idle", "Idle");

    let address_byte = config.address_byte();
    let start = enc.step(
        String::from("Start: SDA falls while SCL high"),
        Level::High,
        Level::Low,
    );
    start.label = Some(String::from("Start"));
    start.status = Some(String::from("Sending address"));
    start.byte = Some(address_byte);

    let label = format!(
        "Addr {}{}",
        hex::format_hex(config.address() as u32, 2),
        config.direction().suffix()
    );
    enc.byte(address_byte, &label, "Addr");
    let ack = enc.slave_ack("Addr ACK");
    enc.status(ack, "Waiting for address ACK");

    let data = hex::format_hex(config.data() as u32, 2);
    match config.direction() {
        Direction::Write => {
            let prep = enc.byte(config.data(), &format!("Data {data} →"), "Data");
            enc.status(prep, "Sending data").byte = Some(config.data());
            let ack = enc.slave_ack("Data ACK");
            enc.status(ack, "Waiting for data ACK");
        }
        Direction::Read => {
            let prep = enc.byte(config.data(), &format!("Data {data} ←"), "Data");
            enc.status(prep, "Receiving slave data").byte = Some(config.data());
            let ack = enc.master_ack(config.master_ack());
            enc.status(ack, "Master acknowledge");
        }
    }

    enc.step(String::from("Stop: SDA low"), Level::Low, Level::Low)
        .status = Some(String::from("Preparing stop"));
    enc.step(String::from("Stop: SCL high"), Level::High, Level::Low)
        .label = Some(String::from("Stop"));
    let rise = enc.step(
        String::from("Stop: SDA rises while SCL high"),
        Level::High,
        Level::High,
    );
    rise.duration = 2;

    enc.builder
        .push_idle("Bus idle again", "Idle")
        .status = Some(String::from("Transfer complete"));

    Ok(enc.builder.finish())
}
