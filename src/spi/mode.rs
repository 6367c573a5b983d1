//! SPI clock modes and exchange configuration.

use core::fmt;
use core::str::FromStr;

use crate::hex;
use crate::signal::Level;
use crate::{Error, Result};

/// Bits per SPI word. The word size is fixed.
pub const WORD_BITS: u8 = 8;

/// Clock polarity: the level SCLK rests at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cpol {
    /// CPOL=0, clock idles low.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "0"))]
    Idle0,
    /// CPOL=1, clock idles high.
    #[cfg_attr(feature = "serde", serde(rename = "1"))]
    Idle1,
}

impl Cpol {
    /// Numeric CPOL value.
    pub const fn bit(self) -> u8 {
        match self {
            Cpol::Idle0 => 0,
            Cpol::Idle1 => 1,
        }
    }

    /// SCLK level between transfers.
    pub const fn idle_level(self) -> Level {
        Level::from_bit(self.bit())
    }

    /// SCLK level during the first half of a clock pulse.
    pub const fn active_level(self) -> Level {
        self.idle_level().inverted()
    }
}

impl FromStr for Cpol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "0" => Ok(Cpol::Idle0),
            "1" => Ok(Cpol::Idle1),
            _ => Err(Error::InvalidChoice {
                field: "CPOL",
                value: String::from(s),
            }),
        }
    }
}

/// Clock phase: which edge of a pulse samples the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cpha {
    /// CPHA=0, sample on the leading edge (away from idle).
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "0"))]
    Leading,
    /// CPHA=1, sample on the trailing edge (back to idle).
    #[cfg_attr(feature = "serde", serde(rename = "1"))]
    Trailing,
}

impl Cpha {
    /// Numeric CPHA value.
    pub const fn bit(self) -> u8 {
        match self {
            Cpha::Leading => 0,
            Cpha::Trailing => 1,
        }
    }
}

impl FromStr for Cpha {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "0" => Ok(Cpha::Leading),
            "1" => Ok(Cpha::Trailing),
            _ => Err(Error::InvalidChoice {
                field: "CPHA",
                value: String::from(s),
            }),
        }
    }
}

/// A validated SPI exchange: one word in each direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpiConfig {
    /// Clock polarity.
    pub cpol: Cpol,
    /// Clock phase.
    pub cpha: Cpha,
    /// Byte shifted out on MOSI.
    pub master: u8,
    /// Byte shifted out on MISO.
    pub slave: u8,
}

impl SpiConfig {
    /// Create an exchange.
    pub const fn new(cpol: Cpol, cpha: Cpha, master: u8, slave: u8) -> Self {
        Self {
            cpol,
            cpha,
            master,
            slave,
        }
    }

    /// SPI mode number, `(CPOL << 1) | CPHA`.
    pub const fn mode(&self) -> u8 {
        (self.cpol.bit() << 1) | self.cpha.bit()
    }

    /// Every combination of byte values and modes is encodable.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Log header describing the exchange.
    pub fn summary(&self) -> Vec<String> {
        vec![
            format!(
                "Simulation start: master sends {}, slave sends {}",
                hex::format_hex(self.master as u32, 2),
                hex::format_hex(self.slave as u32, 2)
            ),
            format!(
                "SPI settings: CPOL={}, CPHA={} (mode {})",
                self.cpol.bit(),
                self.cpha.bit(),
                self.mode()
            ),
        ]
    }
}

/// Raw SPI form input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpiInput {
    /// Clock polarity.
    pub cpol: Cpol,
    /// Clock phase.
    pub cpha: Cpha,
    /// Master byte as hex text.
    pub master_data: String,
    /// Slave byte as hex text.
    pub slave_data: String,
}

impl Default for SpiInput {
    fn default() -> Self {
        Self {
            cpol: Cpol::Idle0,
            cpha: Cpha::Leading,
            master_data: String::from("A5"),
            slave_data: String::from("5A"),
        }
    }
}

impl SpiInput {
    /// Validate the form and freeze it into a [`SpiConfig`].
    pub fn parse(&self) -> Result<SpiConfig> {
        let master = hex::parse_byte("master data", &self.master_data)?;
        let slave = hex::parse_byte("slave data", &self.slave_data)?;
        Ok(SpiConfig::new(self.cpol, self.cpha, master, slave))
    }
}
