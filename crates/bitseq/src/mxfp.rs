//! Microscaling (MX) element formats
//!
//! The sub-byte float formats from the OCP MX specification: `e2m1` (4 bit),
//! `e2m3` and `e3m2` (6 bit). None of them encode infinities or NaN; values
//! beyond the largest finite value clip to it and NaN cannot be encoded at
//! all.

use std::sync::OnceLock;

use crate::error::{Error, Result};

/// A microscaling float format with one sign bit, `exp_bits` exponent bits
/// and `mantissa_bits` mantissa bits.
pub struct MxfpFormat {
    exp_bits: u32,
    mantissa_bits: u32,
    bias: i32,
    lut: OnceLock<Vec<f64>>,
}

/// The 4-bit 1-2-1 format with bias 1.
pub static E2M1: MxfpFormat = MxfpFormat::new(2, 1, 1);

/// The 6-bit 1-2-3 format with bias 1.
pub static E2M3: MxfpFormat = MxfpFormat::new(2, 3, 1);

/// The 6-bit 1-3-2 format with bias 3.
pub static E3M2: MxfpFormat = MxfpFormat::new(3, 2, 3);

impl MxfpFormat {
    const fn new(exp_bits: u32, mantissa_bits: u32, bias: i32) -> Self {
        Self {
            exp_bits,
            mantissa_bits,
            bias,
            lut: OnceLock::new(),
        }
    }

    /// Total width in bits, including the sign.
    pub fn width(&self) -> usize {
        (1 + self.exp_bits + self.mantissa_bits) as usize
    }

    fn lut(&self) -> &[f64] {
        self.lut.get_or_init(|| {
            let size = 1usize << self.width();
            let mut table = Vec::with_capacity(size);
            for i in 0..size {
                let i = i as u32;
                let sign = if i >> (self.exp_bits + self.mantissa_bits) == 1 {
                    -1.0
                } else {
                    1.0
                };
                let exp_field = (i >> self.mantissa_bits) & ((1 << self.exp_bits) - 1);
                let mut significand = i & ((1 << self.mantissa_bits) - 1);
                let exponent = if exp_field == 0 {
                    1 - self.bias
                } else {
                    significand |= 1 << self.mantissa_bits;
                    exp_field as i32 - self.bias
                };
                table.push(
                    sign * significand as f64 / 2f64.powi(self.mantissa_bits as i32)
                        * 2f64.powi(exponent),
                );
            }
            table
        })
    }

    /// Decode an encoded value to its float.
    ///
    /// Errors if `u` does not fit in the format's width.
    pub fn uint_to_float(&self, u: u32) -> Result<f64> {
        self.lut()
            .get(u as usize)
            .copied()
            .ok_or_else(|| Error::value(format!("{u} out of range for {} bit format", self.width())))
    }

    /// Encode a float, rounding towards zero and clipping to the largest
    /// finite magnitude. NaN cannot be represented.
    pub fn float_to_uint(&self, f: f64) -> Result<u32> {
        if f.is_nan() {
            return Err(Error::value("cannot convert float NaN to an MX format"));
        }
        let lut = self.lut();
        let half = lut.len() / 2;
        if f >= 0.0 {
            // lut[0..half] ascends from zero
            for i in 1..half {
                if f < lut[i] {
                    return Ok((i - 1) as u32);
                }
            }
            return Ok((half - 1) as u32);
        }
        if f > lut[half + 1] {
            return Ok(0); // Small negative values round up to positive zero
        }
        // lut[half] is negative zero; the rest of the top half descends
        for i in half + 2..lut.len() {
            if f > lut[i] {
                return Ok((i - 1) as u32);
            }
        }
        Ok((lut.len() - 1) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_e2m1_values() {
        // 0, 0.5, 1, 1.5, 2, 3, 4, 6 then the negated mirror
        let expected = [0.0, 0.5, 1.0, 1.5, 2.0, 3.0, 4.0, 6.0];
        for (i, &v) in expected.iter().enumerate() {
            assert_eq!(E2M1.uint_to_float(i as u32).unwrap(), v);
            assert_eq!(E2M1.uint_to_float(i as u32 + 8).unwrap(), -v);
        }
    }

    #[test]
    fn test_round_trip() {
        for format in [&E2M1, &E2M3, &E3M2] {
            let size = 1u32 << format.width();
            for u in 0..size {
                let f = format.uint_to_float(u).unwrap();
                if f == 0.0 {
                    // Both zero encodings decode to 0.0 and re-encode as +0
                    assert_eq!(format.float_to_uint(f).unwrap(), 0);
                } else {
                    assert_eq!(format.float_to_uint(f).unwrap(), u);
                }
            }
        }
    }

    #[test]
    fn test_clipping() {
        assert_eq!(E2M1.float_to_uint(100.0).unwrap(), 7);
        assert_eq!(E2M1.float_to_uint(-100.0).unwrap(), 15);
        assert!(E2M1.float_to_uint(f64::NAN).is_err());
    }
}
