//! End-to-end tests: SPI configuration -> step sequence, all four modes

use busline::spi::{self, Cpha, Cpol, SpiConfig, SpiInput};
use busline::{BitSlot, Error, Level, Result, TransactionConfig};

use super::{steps_of, to_value, transitions};

const SS: usize = 0;
const SCLK: usize = 1;
const MOSI: usize = 2;
const MISO: usize = 3;

const MODES: [(Cpol, Cpha); 4] = [
    (Cpol::Idle0, Cpha::Leading),
    (Cpol::Idle0, Cpha::Trailing),
    (Cpol::Idle1, Cpha::Leading),
    (Cpol::Idle1, Cpha::Trailing),
];

#[test]
fn sampling_edge_in_every_mode() -> Result<()> {
    for (mode, (cpol, cpha)) in MODES.into_iter().enumerate() {
        let cfg = SpiConfig::new(cpol, cpha, 0xA5, 0x3C);
        assert_eq!(cfg.mode() as usize, mode);
        let seq = spi::encode(&cfg)?;
        let steps = seq.steps();

        // Leading-edge modes sample when SCLK leaves its idle level,
        // trailing-edge modes when it returns to it.
        let sample_level = match cpha {
            Cpha::Leading => cpol.active_level(),
            Cpha::Trailing => cpol.idle_level(),
        };

        let mut mosi = Vec::new();
        let mut miso = Vec::new();
        for (index, step) in steps.iter().enumerate() {
            if step.field.is_none() {
                continue;
            }
            assert_eq!(step.level(SCLK), sample_level, "mode {mode} step {index}");
            assert_ne!(steps[index - 1].level(SCLK), step.level(SCLK), "mode {mode} step {index}");
            assert_eq!(step.level(SS), Level::Low);
            mosi.push(step.level(MOSI).bit());
            miso.push(step.level(MISO).bit());
        }
        assert_eq!(to_value(&mosi), 0xA5, "mode {mode}");
        assert_eq!(to_value(&miso), 0x3C, "mode {mode}");

        // Eight full clock pulses.
        assert_eq!(transitions(&seq, SCLK), 16, "mode {mode}");
        assert_eq!(seq[0].level(SCLK), cpol.idle_level());
        assert_eq!(seq[seq.len() - 1].level(SCLK), cpol.idle_level());
    }
    Ok(())
}

#[test]
fn mode3_exchange_end_to_end() -> Result<()> {
    let cfg = SpiConfig::new(Cpol::Idle1, Cpha::Trailing, 0x0F, 0xF0);
    let seq = spi::encode(&cfg)?;
    assert_eq!(seq.len(), 27);
    assert_eq!(seq.idle_levels(), &[Level::High, Level::High, Level::Low, Level::Low]);

    let mosi: Vec<_> = steps_of(&seq, "Data").map(|s| s.level(MOSI).bit()).collect();
    let miso: Vec<_> = steps_of(&seq, "Data").map(|s| s.level(MISO).bit()).collect();
    assert_eq!(mosi, [0, 0, 0, 0, 1, 1, 1, 1]);
    assert_eq!(miso, [1, 1, 1, 1, 0, 0, 0, 0]);

    let bits: Vec<_> = seq.field_steps().filter_map(|s| s.bit_label.as_deref()).collect();
    assert_eq!(bits, ["7", "6", "5", "4", "3", "2", "1", "0"]);
    let slots: Vec<_> = seq
        .field_steps()
        .filter_map(|s| s.field.as_ref().and_then(|f| f.slot))
        .collect();
    assert_eq!(slots[0], BitSlot::Data(7));
    assert_eq!(slots[7], BitSlot::Data(0));

    // SS frames the exchange for two units on each side.
    assert_eq!(seq[1].level(SS), Level::Low);
    assert_eq!(seq[1].duration, 2);
    assert_eq!(seq[seq.len() - 2].level(SS), Level::High);
    assert_eq!(seq[seq.len() - 2].duration, 2);
    assert_eq!(transitions(&seq, SS), 2);

    let summary = TransactionConfig::from(cfg).summary();
    assert_eq!(summary[1], "SPI settings: CPOL=1, CPHA=1 (mode 3)");
    Ok(())
}

#[test]
fn data_lines_change_only_between_samples() -> Result<()> {
    for (cpol, cpha) in MODES {
        let seq = spi::encode(&SpiConfig::new(cpol, cpha, 0x55, 0xAA))?;
        let steps = seq.steps();
        for (index, step) in steps.iter().enumerate().skip(1) {
            let prev = &steps[index - 1];
            let clock_edge = prev.level(SCLK) != step.level(SCLK);
            let data_edge = prev.level(MOSI) != step.level(MOSI);
            // Data never moves on the sampling edge.
            if step.field.is_some() {
                assert!(clock_edge && !data_edge);
            }
        }
    }
    Ok(())
}

#[test]
fn form_input() -> Result<()> {
    let cfg = SpiInput::default().parse()?;
    assert_eq!(cfg, SpiConfig::new(Cpol::Idle0, Cpha::Leading, 0xA5, 0x5A));

    let input = SpiInput {
        master_data: String::from("100"),
        ..SpiInput::default()
    };
    assert!(matches!(input.parse(), Err(Error::ValueOutOfRange { .. })));

    let input = SpiInput {
        slave_data: String::from("g1"),
        ..SpiInput::default()
    };
    assert!(matches!(input.parse(), Err(Error::InvalidHex { .. })));

    assert_eq!("1".parse::<Cpol>()?, Cpol::Idle1);
    assert!("2".parse::<Cpha>().is_err());
    Ok(())
}
