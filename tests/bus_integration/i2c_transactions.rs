//! End-to-end tests: I2C configuration -> step sequence

use busline::i2c::{self, AckType, Direction, I2cConfig, I2cInput};
use busline::{BitSlot, Error, Level, Result};

use super::{steps_of, to_value};

const SCL: usize = 0;
const SDA: usize = 1;

/// SDA sampled while SCL is high, for the steps of one field.
fn sampled(seq: &busline::Sequence, field: &str) -> Vec<u8> {
    steps_of(seq, field)
        .filter(|s| s.level(SCL).is_high())
        .map(|s| s.level(SDA).bit())
        .collect()
}

#[test]
fn write_transaction_end_to_end() -> Result<()> {
    let cfg = I2cConfig::write(0x50, 0x42)?;
    let seq = i2c::encode(&cfg)?;

    // Idle, START, address byte (prepare + 16 + done), ACK (3), data byte,
    // ACK (3), STOP (3), idle.
    assert_eq!(seq.len(), 1 + 1 + 18 + 3 + 18 + 3 + 3 + 1);

    assert_eq!(to_value(&sampled(&seq, "Addr")), 0xA0);
    assert_eq!(to_value(&sampled(&seq, "Data")), 0x42);
    assert_eq!(sampled(&seq, "ACK"), [0, 0]);

    let start = &seq[1];
    assert_eq!((start.level(SCL), start.level(SDA)), (Level::High, Level::Low));
    assert_eq!(start.label.as_deref(), Some("Start"));

    let rise = &seq[seq.len() - 2];
    assert_eq!((rise.level(SCL), rise.level(SDA)), (Level::High, Level::High));
    assert_eq!(rise.duration, 2);

    let labels: Vec<_> = seq.steps().iter().filter_map(|s| s.label.as_deref()).collect();
    assert_eq!(
        labels,
        ["Idle", "Start", "Addr 0x50+W", "ACK", "Data 0x42 →", "ACK", "Stop", "Idle"]
    );
    Ok(())
}

#[test]
fn sda_only_changes_with_scl_low_inside_frame() -> Result<()> {
    let seq = i2c::encode(&I2cConfig::read(0x3C, 0x81, AckType::Nack)?)?;
    let steps = seq.steps();
    let mut violations = Vec::new();
    for i in 1..steps.len() {
        let (prev, cur) = (&steps[i - 1], &steps[i]);
        if prev.level(SCL).is_high() && cur.level(SCL).is_high() && prev.level(SDA) != cur.level(SDA) {
            violations.push(i);
        }
    }
    // The START condition and the STOP rise.
    assert_eq!(violations, [1, steps.len() - 2]);
    Ok(())
}

#[test]
fn read_transaction_has_one_master_acknowledge() -> Result<()> {
    for ack in [AckType::Ack, AckType::Nack] {
        let cfg = I2cConfig::read(0x50, 0xA5, ack)?;
        let seq = i2c::encode(&cfg)?;
        let name = format!("M-{ack}");

        assert_eq!(to_value(&sampled(&seq, "Addr")), 0xA1);
        assert_eq!(to_value(&sampled(&seq, "Data")), 0xA5);

        let master: Vec<_> = steps_of(&seq, &name)
            .filter(|s| s.level(SCL).is_high())
            .collect();
        assert_eq!(master.len(), 1);
        assert_eq!(master[0].level(SDA), ack.level());
        assert_eq!(
            master[0].field.as_ref().and_then(|f| f.slot),
            Some(BitSlot::Ack)
        );

        // Only the address byte is acknowledged by the slave.
        assert_eq!(sampled(&seq, "ACK"), [0]);

        let status: Vec<_> = seq.steps().iter().filter_map(|s| s.status.as_deref()).collect();
        assert!(status.contains(&"Receiving slave data"));
        assert!(status.contains(&"Master acknowledge"));
    }
    Ok(())
}

#[test]
fn data_bits_fill_the_bit_decoder() -> Result<()> {
    let seq = i2c::encode(&I2cConfig::write(0x10, 0x80)?)?;
    let slots: Vec<_> = steps_of(&seq, "Data")
        .filter(|s| s.level(SCL).is_high())
        .map(|s| {
            let field = s.field.as_ref().unwrap();
            (field.slot, field.asserted)
        })
        .collect();
    assert_eq!(slots.len(), 8);
    assert_eq!(slots[0], (Some(BitSlot::Data(7)), true));
    assert_eq!(slots[7], (Some(BitSlot::Data(0)), false));
    Ok(())
}

#[test]
fn form_input() -> Result<()> {
    let cfg = I2cInput::default().parse()?;
    assert_eq!(cfg, I2cConfig::write(0x50, 0x42)?);

    let input = I2cInput {
        operation: Direction::Read,
        address: String::from("7f"),
        data: String::from("ignored"),
        response_data: String::from("0x"),
        ack_type: AckType::Nack,
    };
    assert!(matches!(input.parse(), Err(Error::InvalidHex { .. })));

    let input = I2cInput {
        response_data: String::from("C3"),
        ..input
    };
    let cfg = input.parse()?;
    assert_eq!(cfg.direction(), Direction::Read);
    assert_eq!(cfg.data(), 0xC3);
    assert_eq!(cfg.master_ack(), AckType::Nack);

    let input = I2cInput {
        address: String::from("80"),
        ..I2cInput::default()
    };
    assert!(matches!(
        input.parse(),
        Err(Error::ValueOutOfRange { field: "address", .. })
    ));
    Ok(())
}
