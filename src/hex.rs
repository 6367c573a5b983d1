//! Hexadecimal input handling.
//!
//! Form inputs arrive as free text. They are trimmed, upper-cased and checked
//! against `^[0-9A-F]+$` before any numeric interpretation happens, so the
//! error a user sees always names the field that was wrong.

use crate::{Error, Result};

/// Trim and upper-case a raw hex input.
pub fn normalize(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

/// Check that a normalized string only contains hex digits.
fn check_digits(field: &'static str, hex: &str) -> Result<()> {
    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidHex {
            field,
            input: String::from(hex),
        });
    }
    Ok(())
}

/// Parse a hex value that must fit in `bits` bits.
///
/// Leading zeros are accepted, so `"007F"` is a valid 7-bit value.
pub fn parse_value(field: &'static str, input: &str, bits: u32) -> Result<u32> {
    let hex = normalize(input);
    check_digits(field, &hex)?;

    let max = if bits >= 32 {
        u32::MAX as u64
    } else {
        (1u64 << bits) - 1
    };
    let trimmed = hex.trim_start_matches('0');
    // Anything longer than 16 significant digits cannot fit in a u64.
    let value = if trimmed.len() > 16 {
        u64::MAX
    } else if trimmed.is_empty() {
        0
    } else {
        u64::from_str_radix(trimmed, 16).map_err(|_| Error::InvalidHex {
            field,
            input: hex.clone(),
        })?
    };

    if value > max {
        return Err(Error::ValueOutOfRange { field, value, max });
    }
    Ok(value as u32)
}

/// Parse a byte (8-bit value).
pub fn parse_byte(field: &'static str, input: &str) -> Result<u8> {
    parse_value(field, input, 8).map(|v| v as u8)
}

/// Parse a run of hex digit pairs into exactly `len` bytes.
///
/// Input shorter than `len * 2` digits is padded with zeros on the right;
/// longer input is rejected. An odd trailing digit is treated as the high
/// nibble of the last byte, the same way padding fills it.
pub fn parse_bytes(field: &'static str, input: &str, len: usize) -> Result<Vec<u8>> {
    if len == 0 {
        return Ok(Vec::new());
    }

    let hex = normalize(input);
    check_digits(field, &hex)?;
    if hex.len() > len * 2 {
        return Err(Error::HexTooLong {
            field,
            digits: hex.len(),
            max_digits: len * 2,
        });
    }

    let padded = format!("{hex:0<width$}", width = len * 2);
    padded
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            // Digits were validated above; a failure here means a non-ASCII slip.
            let text = core::str::from_utf8(pair).map_err(|_| Error::InvalidHex {
                field,
                input: hex.clone(),
            })?;
            u8::from_str_radix(text, 16).map_err(|_| Error::InvalidHex {
                field,
                input: hex.clone(),
            })
        })
        .collect()
}

/// Format a value as `0xNN`, zero-padded to `width` digits.
pub fn format_hex(value: u32, width: usize) -> String {
    format!("0x{value:0width$X}")
}

/// Format bytes as one upper-case hex run, e.g. `ABCD`.
pub fn format_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  7ff \n"), "7FF");
    }

    #[test]
    fn test_parse_value_limits() {
        assert_eq!(parse_value("address", "50", 7).unwrap(), 0x50);
        assert_eq!(parse_value("address", "007f", 7).unwrap(), 0x7F);
        assert!(matches!(
            parse_value("address", "80", 7),
            Err(Error::ValueOutOfRange { max: 0x7F, .. })
        ));
        assert!(matches!(
            parse_value("id", "1FFFFFFF0000000000000000", 29),
            Err(Error::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_value_rejects_non_hex() {
        assert!(matches!(
            parse_value("data", "0x42", 8),
            Err(Error::InvalidHex { .. })
        ));
        assert!(matches!(
            parse_value("data", "", 8),
            Err(Error::InvalidHex { .. })
        ));
        assert!(matches!(
            parse_value("data", "G1", 8),
            Err(Error::InvalidHex { .. })
        ));
    }

    #[test]
    fn test_parse_bytes_pads_short_input() {
        assert_eq!(parse_bytes("data", "abcd", 2).unwrap(), vec![0xAB, 0xCD]);
        assert_eq!(parse_bytes("data", "AB", 3).unwrap(), vec![0xAB, 0x00, 0x00]);
        assert_eq!(parse_bytes("data", "ABC", 2).unwrap(), vec![0xAB, 0xC0]);
        assert!(parse_bytes("data", "", 0).unwrap().is_empty());
    }

    #[test]
    fn test_parse_bytes_rejects_long_input() {
        assert!(matches!(
            parse_bytes("data", "ABCDEF", 2),
            Err(Error::HexTooLong {
                digits: 6,
                max_digits: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_hex(0xA0, 2), "0xA0");
        assert_eq!(format_hex(0x5, 3), "0x005");
        assert_eq!(format_bytes(&[0xAB, 0x0C]), "AB0C");
    }
}
