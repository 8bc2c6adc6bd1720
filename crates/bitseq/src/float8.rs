//! 8-bit floating point formats
//!
//! Two interchange formats from the IEEE WG P3109 draft: `p4binary` with a
//! 1-4-3 sign/exponent/mantissa split and `p3binary` with a 1-5-2 split.
//! Both reserve `0x80` for NaN and `0x7f` / `0xff` for the infinities.
//! Conversion in each direction goes through a 256-entry lookup table that
//! is built on first use.

use std::sync::OnceLock;

/// An 8-bit float format with one sign bit, `exp_bits` exponent bits and
/// `7 - exp_bits` mantissa bits.
pub struct Binary8Format {
    exp_bits: u32,
    bias: i32,
    lut: OnceLock<[f64; 256]>,
}

/// The 1-4-3 format with bias 8.
pub static P4BINARY: Binary8Format = Binary8Format::new(4, 8);

/// The 1-5-2 format with bias 16.
pub static P3BINARY: Binary8Format = Binary8Format::new(5, 16);

impl Binary8Format {
    const fn new(exp_bits: u32, bias: i32) -> Self {
        Self {
            exp_bits,
            bias,
            lut: OnceLock::new(),
        }
    }

    fn lut(&self) -> &[f64; 256] {
        self.lut.get_or_init(|| {
            let mut table = [0.0f64; 256];
            let mantissa_bits = 7 - self.exp_bits;
            for (i, slot) in table.iter_mut().enumerate() {
                let i = i as u32;
                let sign = if i >> 7 == 1 { -1.0 } else { 1.0 };
                let exp_field = (i >> mantissa_bits) & ((1 << self.exp_bits) - 1);
                let mut significand = i & ((1 << mantissa_bits) - 1);
                let exponent = if exp_field == 0 {
                    // Subnormal, no implicit leading one
                    1 - self.bias
                } else {
                    significand |= 1 << mantissa_bits;
                    exp_field as i32 - self.bias
                };
                *slot = sign * significand as f64 / 2f64.powi(mantissa_bits as i32)
                    * 2f64.powi(exponent);
            }
            // Reserved encodings
            table[0x80] = f64::NAN;
            table[0x7f] = f64::INFINITY;
            table[0xff] = f64::NEG_INFINITY;
            table
        })
    }

    /// Decode a byte to its float value.
    pub fn u8_to_float(&self, b: u8) -> f64 {
        self.lut()[b as usize]
    }

    /// Encode a float as the nearest byte, rounding towards zero.
    ///
    /// Values beyond the float16 range encode as the infinities and NaN
    /// encodes as `0x80`; finite values past the format's largest finite
    /// value clip to it.
    pub fn float_to_u8(&self, f: f64) -> u8 {
        // The original converts through float16 first, so anything float16
        // cannot represent becomes an infinity.
        const F16_MAX: f64 = 65504.0;
        if f > F16_MAX {
            return 0x7f;
        }
        if f < -F16_MAX {
            return 0xff;
        }
        let lut = self.lut();
        if f >= 0.0 {
            // lut[0..=0x7e] ascends from 0.0; lut[0x7f] is +inf
            for i in 1..0x80 {
                if f < lut[i] {
                    return (i - 1) as u8;
                }
            }
            return 0x7f;
        }
        if f < 0.0 {
            if f > lut[0x81] {
                return 0; // Towards zero, no negative zero encoding
            }
            // lut[0x81..=0xfe] descends; lut[0xff] is -inf
            for i in 0x82..0x100 {
                if f > lut[i] {
                    return (i - 1) as u8;
                }
            }
            return 0xff;
        }
        0x80 // NaN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_values() {
        assert!(P4BINARY.u8_to_float(0x80).is_nan());
        assert_eq!(P4BINARY.u8_to_float(0x7f), f64::INFINITY);
        assert_eq!(P4BINARY.u8_to_float(0xff), f64::NEG_INFINITY);
        assert_eq!(P3BINARY.u8_to_float(0x00), 0.0);
    }

    #[test]
    fn test_round_trip_all_bytes() {
        for format in [&P4BINARY, &P3BINARY] {
            for b in 0..=0xffu8 {
                let f = format.u8_to_float(b);
                if f.is_nan() {
                    assert_eq!(format.float_to_u8(f), 0x80);
                } else {
                    assert_eq!(format.float_to_u8(f), b, "byte {b:#04x}");
                }
            }
        }
    }

    #[test]
    fn test_rounds_towards_zero() {
        let exact = P4BINARY.u8_to_float(0x10);
        let above = P4BINARY.u8_to_float(0x11);
        let between = (exact + above) / 2.0;
        assert_eq!(P4BINARY.float_to_u8(between), 0x10);
    }

    #[test]
    fn test_saturates_to_infinity() {
        assert_eq!(P4BINARY.float_to_u8(1e9), 0x7f);
        assert_eq!(P4BINARY.float_to_u8(-1e9), 0xff);
        assert_eq!(P4BINARY.float_to_u8(f64::INFINITY), 0x7f);
        assert_eq!(P4BINARY.float_to_u8(f64::NEG_INFINITY), 0xff);
    }

    #[test]
    fn test_clips_within_float16_range_to_max_finite() {
        // 1000 is representable in float16 but past p4binary's max of 240
        assert_eq!(P4BINARY.float_to_u8(1000.0), 0x7e);
        assert_eq!(P4BINARY.float_to_u8(-1000.0), 0xfe);
    }
}
