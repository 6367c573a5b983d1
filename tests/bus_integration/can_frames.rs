//! End-to-end tests: CAN configuration -> step sequence -> frame structure

use busline::can::{
    self, BusState, CanConfig, CanInput, FrameFormat, FrameKind, frame_bit_count, frame_structure,
    line_levels,
};
use busline::{Error, Level, Protocol, Result, TransactionConfig};
use embedded_can::{ExtendedId, StandardId};

use super::{steps_of, to_value};

fn bit_values<'a>(steps: impl Iterator<Item = &'a busline::Step>) -> Vec<u8> {
    steps
        .map(|s| match s.bit_label.as_deref() {
            Some("0") => 0,
            Some("1") => 1,
            other => panic!("unexpected bit label {other:?}"),
        })
        .collect()
}

#[test]
fn standard_data_frame_end_to_end() -> Result<()> {
    let cfg = CanConfig::data_frame(StandardId::new(0x123).unwrap(), &[0xAB, 0xCD])?;
    let seq = can::encode(&cfg)?;

    assert_eq!(seq.protocol(), Protocol::Can);
    // Idle, 47 + 16 bit times, idle again.
    assert_eq!(seq.len(), 1 + 63 + 1);
    assert_eq!(seq.field_steps().count() as u32, frame_bit_count(&cfg));

    let id = bit_values(steps_of(&seq, "ID"));
    assert_eq!(id.len(), 11);
    assert_eq!(to_value(&id), 0x123);

    let dlc = bit_values(steps_of(&seq, "DLC"));
    assert_eq!(to_value(&dlc), 2);

    let data = bit_values(steps_of(&seq, "DATA"));
    assert_eq!(to_value(&data[..8]), 0xAB);
    assert_eq!(to_value(&data[8..]), 0xCD);
    let bytes: Vec<_> = steps_of(&seq, "DATA").filter_map(|s| s.byte).collect();
    assert!(bytes[..8].iter().all(|&b| b == 0xAB));
    assert!(bytes[8..].iter().all(|&b| b == 0xCD));

    let crc = bit_values(steps_of(&seq, "CRC"));
    assert_eq!(to_value(&crc), can::PLACEHOLDER_CRC as u32);

    // SOF dominant, ACK slot dominant, delimiters and EOF recessive.
    let sof = steps_of(&seq, "SOF").next().unwrap();
    assert_eq!(sof.levels, line_levels(BusState::Dominant));
    let ack = steps_of(&seq, "ACK").next().unwrap();
    assert_eq!(ack.levels, line_levels(BusState::Dominant));
    assert!(steps_of(&seq, "EOF").all(|s| s.levels == line_levels(BusState::Recessive)));
    assert_eq!(steps_of(&seq, "EOF").count(), can::EOF_BITS);
    assert_eq!(steps_of(&seq, "IFS").count(), can::IFS_BITS);

    // Bus idle before and after the frame.
    let recessive = line_levels(BusState::Recessive);
    assert_eq!(seq[0].levels, recessive);
    assert_eq!(seq[seq.len() - 1].levels, recessive);
    assert_eq!(seq[0].duration, busline::IDLE_UNITS);
    Ok(())
}

#[test]
fn extended_identifier_is_split() -> Result<()> {
    let raw = 0x18FE_F100;
    let cfg = CanConfig::data_frame(ExtendedId::new(raw).unwrap(), &[0x01])?;
    let seq = can::encode(&cfg)?;

    let id = bit_values(steps_of(&seq, "ID"));
    assert_eq!(id.len(), 29);
    assert_eq!(to_value(&id[..11]), raw >> 18);
    assert_eq!(to_value(&id[11..]), raw & 0x3FFFF);
    assert_eq!(to_value(&id), raw);

    let srr = steps_of(&seq, "SRR").next().unwrap();
    assert_eq!(srr.levels, line_levels(BusState::Recessive));
    let ide = steps_of(&seq, "IDE").next().unwrap();
    assert_eq!(ide.levels, line_levels(BusState::Recessive));
    assert_eq!(steps_of(&seq, "r1").count(), 1);
    assert_eq!(frame_bit_count(&cfg), 67 + 8);
    Ok(())
}

#[test]
fn bit_count_follows_data_length() -> Result<()> {
    let data = [0x55u8; 8];
    for n in 0..=8usize {
        let std = CanConfig::data_frame(StandardId::new(0x100).unwrap(), &data[..n])?;
        assert_eq!(frame_bit_count(&std), 47 + 8 * n as u32);
        assert_eq!(can::encode(&std)?.field_steps().count(), 47 + 8 * n);

        let ext = CanConfig::data_frame(ExtendedId::new(0x100).unwrap(), &data[..n])?;
        assert_eq!(frame_bit_count(&ext), 67 + 8 * n as u32);
        assert_eq!(can::encode(&ext)?.field_steps().count(), 67 + 8 * n);

        // Remote frames send the DLC but never a data field.
        let remote = CanConfig::remote_frame(StandardId::new(0x100).unwrap(), n as u8)?;
        assert_eq!(frame_bit_count(&remote), 47);
        assert_eq!(steps_of(&can::encode(&remote)?, "DATA").count(), 0);
    }
    Ok(())
}

#[test]
fn encoding_is_deterministic() -> Result<()> {
    let cfg = CanInput::default().parse()?;
    let first = can::encode(&cfg)?;
    let second = can::encode(&cfg)?;
    assert_eq!(first, second);
    assert_eq!(frame_structure(&cfg), frame_structure(&cfg));

    let config = TransactionConfig::from(cfg);
    assert_eq!(config.encode()?, first);
    Ok(())
}

#[test]
fn frame_structure_matches_sequence() -> Result<()> {
    let cfg = CanConfig::remote_frame(StandardId::new(0x7FF).unwrap(), 4)?;
    let fields = frame_structure(&cfg);
    assert!(fields.iter().all(|f| f.name != "Data"));
    let rtr = fields.iter().find(|f| f.name == "RTR").unwrap();
    assert_eq!(rtr.value, "1");
    let dlc = fields.iter().find(|f| f.name == "DLC").unwrap();
    assert_eq!(dlc.value, "4");

    let seq = can::encode(&cfg)?;
    let rtr_step = steps_of(&seq, "RTR").next().unwrap();
    assert_eq!(rtr_step.level(0), Level::Low);
    Ok(())
}

#[test]
fn form_input_validation() {
    let input = CanInput {
        message_id: String::from("xyz"),
        ..CanInput::default()
    };
    assert!(matches!(input.parse(), Err(Error::InvalidHex { .. })));

    let input = CanInput {
        message_id: String::from("800"),
        ..CanInput::default()
    };
    assert!(matches!(
        input.parse(),
        Err(Error::IdentifierOutOfRange { id: 0x800, .. })
    ));

    let input = CanInput {
        message_id: String::from("1234"),
        ..CanInput::default()
    };
    assert!(matches!(
        input.parse(),
        Err(Error::HexTooLong { max_digits: 3, .. })
    ));

    let input = CanInput {
        data_length: 9,
        ..CanInput::default()
    };
    assert!(matches!(input.parse(), Err(Error::InvalidDataLength(9))));

    let input = CanInput {
        data_length: 1,
        data: String::from("ABCD"),
        ..CanInput::default()
    };
    assert!(matches!(input.parse(), Err(Error::HexTooLong { .. })));
}

#[test]
fn form_input_padding_and_remote() -> Result<()> {
    let input = CanInput {
        data_length: 3,
        data: String::from(" ab "),
        ..CanInput::default()
    };
    let cfg = input.parse()?;
    assert_eq!(cfg.data(), &[0xAB, 0x00, 0x00]);

    let input = CanInput {
        format: FrameFormat::Extended,
        kind: FrameKind::Remote,
        message_id: String::from("1fffffff"),
        data_length: 8,
        data: String::from("not hex at all"),
    };
    let cfg = input.parse()?;
    assert_eq!(cfg.raw_id(), 0x1FFF_FFFF);
    assert!(cfg.data().is_empty());
    assert!(!cfg.has_data_field());
    Ok(())
}

#[test]
fn switching_to_standard_clamps_identifier() -> Result<()> {
    let mut input = CanInput {
        format: FrameFormat::Extended,
        message_id: String::from("18FEF100"),
        ..CanInput::default()
    };
    let notice = input.set_format(FrameFormat::Standard);
    assert!(notice.is_some());
    assert_eq!(input.message_id, "7FF");
    assert_eq!(input.parse()?.raw_id(), 0x7FF);

    let notice = input.set_data_length(2)?;
    assert!(notice.is_some());
    assert_eq!(input.data, "1122");
    Ok(())
}
