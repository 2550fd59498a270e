//! IBM System/360 floating point conversion.
//!
//! XPT stores numerics as big-endian IBM hexadecimal floats: one sign bit, a
//! 7-bit base-16 exponent biased by 64, and a 56-bit fraction. Fields shorter
//! than 8 bytes are truncated fractions and are zero-padded before decoding.

use crate::error::{Result, XptError};

const FRACTION_BITS: i32 = 56;
const EXPONENT_BIAS: i32 = 64;

/// Decode an IBM float to IEEE 754.
#[must_use]
pub fn ibm_to_ieee(bytes: [u8; 8]) -> f64 {
    let negative = bytes[0] & 0x80 != 0;
    let exponent = i32::from(bytes[0] & 0x7f);
    let fraction = u64::from_be_bytes([
        0, bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ]);
    if fraction == 0 {
        return 0.0;
    }
    // fraction * 2^-56 * 16^(exponent - 64)
    let magnitude = (fraction as f64) * 2f64.powi(4 * (exponent - EXPONENT_BIAS) - FRACTION_BITS);
    if negative { -magnitude } else { magnitude }
}

/// Encode an IEEE 754 value as an IBM float.
pub fn ieee_to_ibm(value: f64) -> Result<[u8; 8]> {
    if !value.is_finite() {
        return Err(XptError::FloatConversion {
            message: format!("{value} has no IBM representation"),
        });
    }
    if value == 0.0 {
        return Ok([0; 8]);
    }

    let sign = if value < 0.0 { 0x80u8 } else { 0 };
    let mut fraction = value.abs();
    let mut exponent = EXPONENT_BIAS;
    while fraction >= 1.0 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 0.0625 {
        fraction *= 16.0;
        exponent -= 1;
    }

    let mut bits = (fraction * 2f64.powi(FRACTION_BITS)).round() as u64;
    if bits >= 1u64 << FRACTION_BITS {
        bits >>= 4;
        exponent += 1;
    }
    if !(0..=127).contains(&exponent) {
        return Err(XptError::FloatConversion {
            message: format!("{value} is outside the IBM exponent range"),
        });
    }

    let mut out = bits.to_be_bytes();
    out[0] = sign | exponent as u8;
    Ok(out)
}

/// Whether a numeric field holds a SAS missing value (`.`, `._`, `.A`-`.Z`).
///
/// Missing values are a marker in the first byte followed by zero bytes.
#[must_use]
pub fn is_missing(bytes: &[u8]) -> bool {
    match bytes.split_first() {
        Some((&first, rest)) => {
            (first == b'.' || first == b'_' || first.is_ascii_uppercase())
                && rest.iter().all(|&b| b == 0)
        }
        None => true,
    }
}

/// The standard missing value (`.`) as stored in an 8-byte field.
pub const MISSING: [u8; 8] = [b'.', 0, 0, 0, 0, 0, 0, 0];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        let one = [0x41, 0x10, 0, 0, 0, 0, 0, 0];
        assert_eq!(ibm_to_ieee(one), 1.0);
        assert_eq!(ieee_to_ibm(1.0).unwrap(), one);

        let minus_118_625 = [0xc2, 0x76, 0xa0, 0, 0, 0, 0, 0];
        assert_eq!(ibm_to_ieee(minus_118_625), -118.625);
        assert_eq!(ieee_to_ibm(-118.625).unwrap(), minus_118_625);
    }

    #[test]
    fn test_survey_codes_are_exact() {
        for code in [1.0, 2.0, 7.0, 9.0, 77.0, 99.0, 777.0, 999_999.0, 2_856.0] {
            let bytes = ieee_to_ibm(code).unwrap();
            assert_eq!(ibm_to_ieee(bytes), code);
        }
    }

    #[test]
    fn test_missing_markers() {
        assert!(is_missing(&MISSING));
        assert!(is_missing(&[b'A', 0, 0, 0, 0, 0, 0, 0]));
        assert!(is_missing(&[b'_', 0, 0]));
        assert!(!is_missing(&[0x41, 0x10, 0, 0, 0, 0, 0, 0]));
        assert!(!is_missing(&[0; 8]));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(ieee_to_ibm(f64::NAN).is_err());
        assert!(ieee_to_ibm(f64::INFINITY).is_err());
    }
}
