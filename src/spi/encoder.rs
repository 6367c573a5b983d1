//! SPI exchange to step sequence encoding.
//!
//! Both words are shifted MSB first, MOSI and MISO change together. The order
//! of the three steps per bit depends on CPHA:
//!
//! | CPHA | step 1                | step 2                  | step 3                  |
//! |------|-----------------------|-------------------------|-------------------------|
//! | 0    | set MOSI/MISO         | leading edge (sample)   | trailing edge           |
//! | 1    | leading edge (shift)  | trailing edge (sample)  | gap, except after bit 0 |

use crate::protocol::Protocol;
use crate::signal::{BitSlot, CurrentField, Level, Sequence, SequenceBuilder, Step};
use crate::Result;

use super::mode::{Cpha, SpiConfig, WORD_BITS};

const SS: usize = 0;
const MOSI: usize = 2;
const MISO: usize = 3;

struct ExchangeEncoder {
    builder: SequenceBuilder,
    idle_clock: Level,
}

impl ExchangeEncoder {
    fn new(config: &SpiConfig) -> Self {
        let idle_clock = config.cpol.idle_level();
        let idle = vec![Level::High, idle_clock, Level::Low, Level::Low];
        Self {
            builder: SequenceBuilder::with_idle(Protocol::Spi, idle),
            idle_clock,
        }
    }

    fn step(&mut self, description: String, ss: Level, sclk: Level, mosi: Level, miso: Level) -> &mut Step {
        self.builder.push(Step::new(description, vec![ss, sclk, mosi, miso]))
    }

    /// SS low, SCLK at `sclk`, data lines at the given bit.
    fn clock(&mut self, description: String, sclk: Level, mosi: Level, miso: Level) -> &mut Step {
        self.step(description, Level::Low, sclk, mosi, miso)
    }
}

/// Encode an 8-bit SPI exchange in any of the four modes.
pub fn encode(config: &SpiConfig) -> Result<Sequence> {
    config.validate()?;

    let mut enc = ExchangeEncoder::new(config);
    let idle = enc.idle_clock;
    let active = config.cpol.active_level();

    enc.builder.push_idle("Bus idle", "Idle");

    let start = enc.step(
        String::from("SS falls, transfer starts"),
        Level::Low,
        idle,
        Level::Low,
        Level::Low,
    );
    start.duration = 2;
    start.label = Some(String::from("Start"));
    start.status = Some(String::from("Transferring"));
    start.byte = Some(config.master);

    for i in (0..WORD_BITS).rev() {
        let m = (config.master >> i) & 1;
        let s = (config.slave >> i) & 1;
        let (mosi, miso) = (Level::from_bit(m), Level::from_bit(s));
        let field = CurrentField {
            name: String::from("Data"),
            explanation: format!("Bit {i}: MOSI={m}, MISO={s}"),
            slot: Some(BitSlot::Data(i)),
            asserted: mosi.is_high(),
        };

        let sample = match config.cpha {
            Cpha::Leading => {
                enc.clock(format!("Bit {i}: set MOSI={m}, MISO={s}"), idle, mosi, miso);
                let sample = enc.builder.len();
                enc.clock(format!("Bit {i}: leading edge (sample)"), active, mosi, miso);
                enc.clock(format!("Bit {i}: trailing edge (shift next bit)"), idle, mosi, miso);
                sample
            }
            Cpha::Trailing => {
                enc.clock(format!("Bit {i}: leading edge (shift)"), active, mosi, miso);
                let sample = enc.builder.len();
                enc.clock(format!("Bit {i}: trailing edge (sample)"), idle, mosi, miso);
                if i > 0 {
                    enc.clock(format!("Bit {i}: prepare next bit"), idle, mosi, miso);
                }
                sample
            }
        };
        let step = enc.builder.step_mut(sample);
        step.bit_label = Some(i.to_string());
        step.field = Some(field);
    }

    let (mosi, miso) = (enc.builder.current(MOSI), enc.builder.current(MISO));
    let end = enc.step(String::from("SS rises, transfer ends"), Level::High, idle, mosi, miso);
    end.duration = 2;
    end.label = Some(String::from("End"));
    end.status = Some(String::from("Transfer complete"));

    debug_assert!(enc.builder.current(SS).is_high());
    enc.builder.push_idle("Bus idle again", "Idle");

    Ok(enc.builder.finish())
}
