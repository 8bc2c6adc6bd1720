//! Power-of-two scaled dtypes and arrays
//!
//! A [`ScaledDtype`] wraps a numeric [`Dtype`] with a power-of-two scale
//! factor, as used for the shared scales of microscaling tensor formats.
//! Values are multiplied by `2^scale` when read and divided by it when
//! built, so the stored bits stay in the compact unscaled range.

use std::fmt;

use crate::array::Array;
use crate::bits::Bits;
use crate::dtype::{Dtype, DtypeValue};
use crate::error::{Error, Result};

/// A numeric dtype with a power-of-two scale factor.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledDtype {
    dtype: Dtype,
    scale: i32,
}

impl ScaledDtype {
    /// Wrap a dtype with a scale. The dtype must be numeric.
    pub fn new(dtype: Dtype, scale: i32) -> Result<Self> {
        if !dtype.kind().is_integer() && !dtype.kind().is_float() {
            return Err(Error::creation(format!(
                "only numeric dtypes can be scaled, not '{dtype}'"
            )));
        }
        Ok(Self { dtype, scale })
    }

    /// The unscaled dtype.
    pub fn dtype(&self) -> &Dtype {
        &self.dtype
    }

    /// The scale exponent.
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Change the scale exponent.
    pub fn set_scale(&mut self, scale: i32) {
        self.scale = scale;
    }

    /// Interpret a whole bit sequence, scaling the value up.
    pub fn get(&self, bits: &Bits) -> Result<DtypeValue> {
        Ok(scale_up(&self.dtype.get(bits)?, self.scale))
    }

    /// Read a value at `pos`, scaling it up.
    pub fn read(&self, bits: &Bits, pos: usize) -> Result<(DtypeValue, usize)> {
        let (value, new_pos) = self.dtype.read(bits, pos)?;
        Ok((scale_up(&value, self.scale), new_pos))
    }

    /// Build bits from a scaled value, dividing the scale back out.
    pub fn build(&self, value: &DtypeValue) -> Result<Bits> {
        self.dtype.build(&scale_down(value, self.scale, &self.dtype)?)
    }
}

impl fmt::Display for ScaledDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_scale{}", self.dtype, self.scale)
    }
}

/// Multiply a read value by `2^scale`.
///
/// Integer values stay integers for non-negative scales; a negative scale
/// turns them into floats.
fn scale_up(value: &DtypeValue, scale: i32) -> DtypeValue {
    if scale == 0 {
        return value.clone();
    }
    match value {
        DtypeValue::Float(v) => DtypeValue::Float(v * 2f64.powi(scale)),
        // checked_shl only rejects oversized shift amounts, so check the
        // headroom explicitly to catch bits shifted out of the top.
        DtypeValue::Uint(v) if scale > 0 => {
            let s = scale as u32;
            if s < 128 && v.leading_zeros() >= s {
                DtypeValue::Uint(v << s)
            } else {
                DtypeValue::Float(*v as f64 * 2f64.powi(scale))
            }
        }
        DtypeValue::Int(v) if scale > 0 => match (scale < 127)
            .then(|| v.checked_mul(1i128 << scale))
            .flatten()
        {
            Some(scaled) => DtypeValue::Int(scaled),
            None => DtypeValue::Float(*v as f64 * 2f64.powi(scale)),
        },
        DtypeValue::Uint(v) => DtypeValue::Float(*v as f64 * 2f64.powi(scale)),
        DtypeValue::Int(v) => DtypeValue::Float(*v as f64 * 2f64.powi(scale)),
        other => other.clone(),
    }
}

/// Divide a value to be stored by `2^scale`.
fn scale_down(value: &DtypeValue, scale: i32, dtype: &Dtype) -> Result<DtypeValue> {
    if scale == 0 {
        return Ok(value.clone());
    }
    let scaled = value.to_f64()? / 2f64.powi(scale);
    if dtype.kind().is_float() {
        return Ok(DtypeValue::Float(scaled));
    }
    if scaled.fract() != 0.0 {
        return Err(Error::creation(format!(
            "{value} does not divide by 2^{scale} to a whole number for dtype '{dtype}'"
        )));
    }
    Ok(DtypeValue::Int(scaled as i128))
}

/// An [`Array`] whose element values carry a shared power-of-two scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledArray {
    array: Array,
    scale: i32,
}

impl ScaledArray {
    /// Create an empty scaled array.
    pub fn new(dtype: ScaledDtype) -> Result<Self> {
        Ok(Self {
            array: Array::new(dtype.dtype.clone())?,
            scale: dtype.scale,
        })
    }

    /// Create over existing byte data.
    pub fn from_bytes(dtype: ScaledDtype, data: impl Into<Vec<u8>>) -> Result<Self> {
        Ok(Self {
            array: Array::from_bytes(dtype.dtype.clone(), data)?,
            scale: dtype.scale,
        })
    }

    /// The unscaled array.
    pub fn array(&self) -> &Array {
        &self.array
    }

    /// The scale exponent.
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Change the scale. The stored bits do not change, so every element's
    /// value changes by the ratio of the scales.
    pub fn set_scale(&mut self, scale: i32) {
        self.scale = scale;
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Whether there are no elements.
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// The scaled value of the element at `i`.
    pub fn get(&self, i: usize) -> Result<DtypeValue> {
        Ok(scale_up(&self.array.get(i)?, self.scale))
    }

    /// Store a scaled value at `i`.
    pub fn set(&mut self, i: usize, value: &DtypeValue) -> Result<()> {
        let unscaled = scale_down(value, self.scale, self.array.dtype())?;
        self.array.set(i, &unscaled)
    }

    /// Add a scaled value at the end.
    pub fn push(&mut self, value: &DtypeValue) -> Result<()> {
        let unscaled = scale_down(value, self.scale, self.array.dtype())?;
        self.array.push(&unscaled)
    }

    /// All the element values, scaled.
    pub fn to_vec(&self) -> Result<Vec<DtypeValue>> {
        self.array
            .iter()
            .map(|v| Ok(scale_up(&v?, self.scale)))
            .collect()
    }

    /// The raw data as bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.array.to_bytes()
    }
}
