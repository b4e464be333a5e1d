//! Navigation frame decoder.
//!
//! Layout (7 bytes minimum, extra bytes ignored):
//! ```text
//! Byte 0:    Flag (unused)
//! Byte 1-2:  Speed limit, km/h, big-endian u16
//! Byte 3:    Turn direction (1 = left, 2 = right, 3 = straight, 4 = U-turn)
//! Byte 4-6:  Distance, see below
//! ```
//!
//! The sender encodes the distance oddly: each of bytes 4-6 is printed
//! as two hex digits, the digits are concatenated, and the result is
//! read back as a *decimal* number (leading digits only, like `atol`).
//! `[0x35, 0x30, 0x6D]` therefore means `"35306d"` -> 35306 m. The paired
//! app depends on this, so it is reproduced exactly.

use super::{Instruction, NavigationEvent};
use crate::error::DecodeError;

/// Minimum frame length.
pub const NAV_FRAME_LEN: usize = 7;

const DISTANCE_START: usize = 4;

/// Decode one characteristic write.
pub fn decode(data: &[u8]) -> Result<NavigationEvent, DecodeError> {
    if data.len() < NAV_FRAME_LEN {
        return Err(DecodeError::TooShort { len: data.len() });
    }

    let speed_limit_kph = u16::from_be_bytes([data[1], data[2]]);
    let instruction = Instruction::from_code(data[3]);
    let distance_m = hex_digits_as_decimal(&data[DISTANCE_START..NAV_FRAME_LEN]);

    Ok(NavigationEvent {
        instruction,
        distance_m,
        speed_limit_kph,
        valid: true,
    })
}

/// Read the hex rendering of `bytes` as a base-10 number, stopping at the
/// first non-decimal digit.
fn hex_digits_as_decimal(bytes: &[u8]) -> u32 {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut value: u32 = 0;
    for &b in bytes {
        for nibble in [b >> 4, b & 0x0F] {
            let digit = HEX[nibble as usize];
            if !digit.is_ascii_digit() {
                return value;
            }
            value = value * 10 + u32::from(digit - b'0');
        }
    }
    value
}
