//! Bus encoder integration tests
//!
//! This module contains end-to-end tests for the three encoders:
//! - `can_frames`: CAN frame layout, bit counts and form input
//! - `i2c_transactions`: I2C write and read transfers
//! - `spi_modes`: SPI sampling edges in all four modes

mod can_frames;
mod i2c_transactions;
mod spi_modes;

// Shared test utilities
use busline::{Level, Sequence, Step};

/// Steps whose bit decoder field is called `name`.
pub fn steps_of<'a>(seq: &'a Sequence, name: &'a str) -> impl Iterator<Item = &'a Step> + 'a {
    seq.field_steps()
        .filter(move |s| s.field.as_ref().is_some_and(|f| f.name == name))
}

/// Fold MSB-first bits into an integer.
pub fn to_value(bits: &[u8]) -> u32 {
    bits.iter().fold(0, |acc, &b| (acc << 1) | b as u32)
}

/// Number of positions where a line changes level, counting from the idle state.
pub fn transitions(seq: &Sequence, line: usize) -> usize {
    let mut previous = seq.idle_levels()[line];
    let mut count = 0;
    for step in seq.steps() {
        let level = step.level(line);
        if level != previous {
            count += 1;
        }
        previous = level;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_value() {
        assert_eq!(to_value(&[1, 0, 1, 0, 0, 1, 0, 1]), 0xA5);
        assert_eq!(to_value(&[]), 0);
    }

    #[test]
    fn test_transitions_of_constant_line() {
        let seq = busline::spi::encode(&busline::spi::SpiConfig::new(
            busline::spi::Cpol::Idle0,
            busline::spi::Cpha::Leading,
            0x00,
            0x00,
        ))
        .unwrap();
        let mosi = seq.line_index("MOSI").unwrap();
        assert_eq!(transitions(&seq, mosi), 0);
        assert!(seq.levels_of("MOSI").unwrap().iter().all(|&l| l == Level::Low));
    }
}
