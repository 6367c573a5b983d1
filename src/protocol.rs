//! Protocol selection and the common encoding contract.
//!
//! [`TransactionConfig`] is the tagged union of the three per-protocol
//! configurations. Whatever the protocol, [`TransactionConfig::encode`]
//! validates first and then produces a complete [`Sequence`]; no partial
//! sequence is ever returned.

use core::fmt;

use crate::can::{self, CanConfig};
use crate::i2c::{self, I2cConfig};
use crate::signal::{Level, Sequence, SignalLine};
use crate::spi::{self, SpiConfig};
use crate::Result;

/// The bus protocols this crate can simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Protocol {
    /// Controller Area Network.
    Can,
    /// Inter-Integrated Circuit.
    I2c,
    /// Serial Peripheral Interface.
    Spi,
}

impl Protocol {
    /// Line set of the protocol, in the order step levels are stored.
    pub fn lines(self) -> &'static [SignalLine] {
        match self {
            Protocol::Can => &can::LINES,
            Protocol::I2c => &i2c::LINES,
            Protocol::Spi => &spi::LINES,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Can => write!(f, "CAN"),
            Protocol::I2c => write!(f, "I2C"),
            Protocol::Spi => write!(f, "SPI"),
        }
    }
}

/// An automatic correction applied to an inconsistent configuration.
///
/// Returned instead of an error when a form change leaves another field out
/// of range and the nearest valid value can be substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConfigNotice {
    /// Field that was adjusted.
    pub field: &'static str,
    /// User-facing explanation.
    pub message: String,
}

impl ConfigNotice {
    /// Create a notice.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A frozen transaction configuration for any supported protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionConfig {
    /// A CAN data or remote frame.
    Can(CanConfig),
    /// A single-byte I2C read or write.
    I2c(I2cConfig),
    /// A single 8-bit SPI exchange.
    Spi(SpiConfig),
}

impl TransactionConfig {
    /// Protocol of this configuration.
    pub fn protocol(&self) -> Protocol {
        match self {
            TransactionConfig::Can(_) => Protocol::Can,
            TransactionConfig::I2c(_) => Protocol::I2c,
            TransactionConfig::Spi(_) => Protocol::Spi,
        }
    }

    /// Rest level of every line before the transaction starts.
    pub fn idle_levels(&self) -> Vec<Level> {
        let mut levels: Vec<Level> = self.protocol().lines().iter().map(|l| l.idle).collect();
        if let TransactionConfig::Spi(cfg) = self {
            // SCLK rests at CPOL.
            levels[1] = cfg.cpol.idle_level();
        }
        levels
    }

    /// Check every value against its protocol-legal range.
    pub fn validate(&self) -> Result<()> {
        match self {
            TransactionConfig::Can(cfg) => cfg.validate(),
            TransactionConfig::I2c(cfg) => cfg.validate(),
            TransactionConfig::Spi(cfg) => cfg.validate(),
        }
    }

    /// Encode the transaction into its step sequence.
    pub fn encode(&self) -> Result<Sequence> {
        match self {
            TransactionConfig::Can(cfg) => can::encode(cfg),
            TransactionConfig::I2c(cfg) => i2c::encode(cfg),
            TransactionConfig::Spi(cfg) => spi::encode(cfg),
        }
    }

    /// Header lines written to the transaction log when a run starts.
    pub fn summary(&self) -> Vec<String> {
        match self {
            TransactionConfig::Can(cfg) => cfg.summary(),
            TransactionConfig::I2c(cfg) => cfg.summary(),
            TransactionConfig::Spi(cfg) => cfg.summary(),
        }
    }
}

impl From<CanConfig> for TransactionConfig {
    fn from(cfg: CanConfig) -> Self {
        TransactionConfig::Can(cfg)
    }
}

impl From<I2cConfig> for TransactionConfig {
    fn from(cfg: I2cConfig) -> Self {
        TransactionConfig::I2c(cfg)
    }
}

impl From<SpiConfig> for TransactionConfig {
    fn from(cfg: SpiConfig) -> Self {
        TransactionConfig::Spi(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spi::{Cpha, Cpol};

    #[test]
    fn test_line_sets() {
        let names: Vec<_> = Protocol::Can.lines().iter().map(|l| l.name).collect();
        assert_eq!(names, ["CAN_H", "CAN_L", "Diff"]);
        let names: Vec<_> = Protocol::I2c.lines().iter().map(|l| l.name).collect();
        assert_eq!(names, ["SCL", "SDA"]);
        let names: Vec<_> = Protocol::Spi.lines().iter().map(|l| l.name).collect();
        assert_eq!(names, ["SS", "SCLK", "MOSI", "MISO"]);
    }

    #[test]
    fn test_dispatch() {
        let cfg: TransactionConfig = SpiConfig::new(Cpol::Idle0, Cpha::Leading, 0xA5, 0x5A).into();
        assert_eq!(cfg.protocol(), Protocol::Spi);
        assert!(cfg.validate().is_ok());
        let seq = cfg.encode().unwrap();
        assert_eq!(seq.protocol(), Protocol::Spi);
        assert!(cfg.summary()[0].contains("0xA5"));
        assert_eq!(cfg.idle_levels(), seq.idle_levels());

        let cfg: TransactionConfig = SpiConfig::new(Cpol::Idle1, Cpha::Leading, 0, 0).into();
        assert_eq!(cfg.idle_levels()[1], Level::High);
        assert_eq!(cfg.idle_levels(), cfg.encode().unwrap().idle_levels());
    }
}
