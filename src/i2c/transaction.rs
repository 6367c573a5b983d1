//! I2C transaction configuration.

use core::fmt;
use core::str::FromStr;

use crate::hex;
use crate::signal::Level;
use crate::{Error, Result};

/// Largest 7-bit slave address.
pub const MAX_ADDRESS: u8 = 0x7F;

/// Transfer direction, as carried in the R/W bit of the address byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Master sends a byte to the slave (R/W = 0).
    #[default]
    Write,
    /// Master reads a byte from the slave (R/W = 1).
    Read,
}

impl Direction {
    /// Value of the R/W bit.
    pub const fn rw_bit(self) -> u8 {
        match self {
            Direction::Write => 0,
            Direction::Read => 1,
        }
    }

    /// Suffix used in address labels (`+W` / `+R`).
    pub const fn suffix(self) -> &'static str {
        match self {
            Direction::Write => "+W",
            Direction::Read => "+R",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Write => f.write_str("write"),
            Direction::Read => f.write_str("read"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "write" => Ok(Direction::Write),
            "read" => Ok(Direction::Read),
            _ => Err(Error::InvalidChoice {
                field: "operation",
                value: String::from(s),
            }),
        }
    }
}

/// Acknowledge sent by the master after a read byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AckType {
    /// SDA pulled low: continue reading.
    #[default]
    Ack,
    /// SDA left high: end of read.
    Nack,
}

impl AckType {
    /// SDA level during the acknowledge clock.
    pub const fn level(self) -> Level {
        match self {
            AckType::Ack => Level::Low,
            AckType::Nack => Level::High,
        }
    }
}

impl fmt::Display for AckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AckType::Ack => f.write_str("ACK"),
            AckType::Nack => f.write_str("NACK"),
        }
    }
}

impl FromStr for AckType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ack" => Ok(AckType::Ack),
            "nack" => Ok(AckType::Nack),
            _ => Err(Error::InvalidChoice {
                field: "ACK type",
                value: String::from(s),
            }),
        }
    }
}

/// A validated single-byte I2C transaction.
///
/// For a write `data` is the byte the master sends; for a read it is the
/// byte the slave answers with, and `master_ack` is what the master returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct I2cConfig {
    address: u8,
    direction: Direction,
    data: u8,
    master_ack: AckType,
}

impl I2cConfig {
    /// Write `data` to the slave at `address`.
    pub fn write(address: u8, data: u8) -> Result<Self> {
        let cfg = Self {
            address,
            direction: Direction::Write,
            data,
            master_ack: AckType::Ack,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read one byte (`response`) from the slave at `address`.
    pub fn read(address: u8, response: u8, master_ack: AckType) -> Result<Self> {
        let cfg = Self {
            address,
            direction: Direction::Read,
            data: response,
            master_ack,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the address fits in 7 bits.
    pub fn validate(&self) -> Result<()> {
        if self.address > MAX_ADDRESS {
            return Err(Error::ValueOutOfRange {
                field: "address",
                value: self.address as u64,
                max: MAX_ADDRESS as u64,
            });
        }
        Ok(())
    }

    /// 7-bit slave address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Transfer direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Byte on the wire after the address (written or read).
    pub fn data(&self) -> u8 {
        self.data
    }

    /// Master acknowledge after a read byte.
    pub fn master_ack(&self) -> AckType {
        self.master_ack
    }

    /// Address byte as transmitted: address shifted left, R/W in bit 0.
    pub fn address_byte(&self) -> u8 {
        (self.address << 1) | self.direction.rw_bit()
    }

    /// Log header describing the transaction.
    pub fn summary(&self) -> Vec<String> {
        let address = hex::format_hex(self.address as u32, 2);
        let full = hex::format_hex(self.address_byte() as u32, 2);
        let data = hex::format_hex(self.data as u32, 2);
        match self.direction {
            Direction::Write => vec![
                String::from("Simulation start: I2C write (master → slave)"),
                format!("Slave address: {address} ({full} with R/W), data: {data}"),
            ],
            Direction::Read => vec![
                String::from("Simulation start: I2C read (master ← slave)"),
                format!("Slave address: {address} ({full} with R/W), expected data: {data}"),
                match self.master_ack {
                    AckType::Ack => String::from("Master will send: ACK (continue reading)"),
                    AckType::Nack => String::from("Master will send: NACK (end of read)"),
                },
            ],
        }
    }
}

/// Raw I2C form input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct I2cInput {
    /// Read or write.
    pub operation: Direction,
    /// 7-bit slave address as hex text.
    pub address: String,
    /// Byte to write, as hex text (write only).
    pub data: String,
    /// Byte the slave answers with, as hex text (read only).
    pub response_data: String,
    /// Master acknowledge after the read byte (read only).
    pub ack_type: AckType,
}

impl Default for I2cInput {
    fn default() -> Self {
        Self {
            operation: Direction::Write,
            address: String::from("50"),
            data: String::from("42"),
            response_data: String::from("A5"),
            ack_type: AckType::Ack,
        }
    }
}

impl I2cInput {
    /// Validate the form and freeze it into an [`I2cConfig`].
    ///
    /// Only the fields relevant to the selected operation are parsed.
    pub fn parse(&self) -> Result<I2cConfig> {
        let address = hex::parse_value("address", &self.address, 7)? as u8;
        match self.operation {
            Direction::Write => I2cConfig::write(address, hex::parse_byte("data", &self.data)?),
            Direction::Read => I2cConfig::read(
                address,
                hex::parse_byte("response data", &self.response_data)?,
                self.ack_type,
            ),
        }
    }
}
