//! Fixed-format element containers
//!
//! An [`Array`] holds a sequence of equally-sized elements, all of one
//! [`Dtype`], packed back to back in a [`BitArray`]. It behaves like a
//! compact `Vec` of the element values while storing only their bit
//! patterns.

use std::fmt;

use crate::bits::Bits;
use crate::dtype::{Dtype, DtypeValue};
use crate::error::{Error, Result};
use crate::mutable::BitArray;

/// A scalar operand for the elementwise arithmetic methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// An integer operand
    Int(i128),
    /// A float operand
    Float(f64),
}

impl From<i128> for Scalar {
    fn from(v: i128) -> Self {
        Scalar::Int(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v as i128)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

/// An array of bit-packed elements sharing one dtype.
///
/// # Example
///
/// ```
/// use bitseq::{Array, Dtype, DtypeValue};
///
/// let mut a = Array::new(Dtype::parse("u7")?)?;
/// a.push(&DtypeValue::Uint(90))?;
/// a.push(&DtypeValue::Uint(100))?;
/// assert_eq!(a.len(), 2);
/// assert_eq!(a.data().len(), 14);
/// assert_eq!(a.get(1)?, DtypeValue::Uint(100));
/// # Ok::<(), bitseq::Error>(())
/// ```
#[derive(Clone, PartialEq)]
pub struct Array {
    dtype: Dtype,
    data: BitArray,
}

impl Array {
    /// Create an empty array of `dtype` elements.
    ///
    /// The dtype must have a fixed, non-zero length.
    pub fn new(dtype: Dtype) -> Result<Self> {
        check_array_dtype(&dtype)?;
        Ok(Self {
            dtype,
            data: BitArray::new(),
        })
    }

    /// Create from a list of element values.
    pub fn with_items(dtype: Dtype, items: &[DtypeValue]) -> Result<Self> {
        let mut array = Self::new(dtype)?;
        array.extend(items)?;
        Ok(array)
    }

    /// Create over existing byte data, which may include trailing bits
    /// that make up no whole element.
    pub fn from_bytes(dtype: Dtype, data: impl Into<Vec<u8>>) -> Result<Self> {
        check_array_dtype(&dtype)?;
        Ok(Self {
            dtype,
            data: BitArray::from_bytes(data),
        })
    }

    /// The element dtype.
    pub fn dtype(&self) -> &Dtype {
        &self.dtype
    }

    /// The element size in bits.
    pub fn item_size(&self) -> usize {
        self.dtype.bit_length().expect("array dtypes have a fixed length")
    }

    /// The number of whole elements.
    pub fn len(&self) -> usize {
        self.data.len() / self.item_size()
    }

    /// Whether there are no whole elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bits at the end that make up no whole element.
    pub fn trailing_bits(&self) -> Bits {
        let whole = self.len() * self.item_size();
        self.data.slice_abs(whole, self.data.len())
    }

    /// The raw element data.
    pub fn data(&self) -> &BitArray {
        &self.data
    }

    /// The raw element data, mutably. Changing its length can change the
    /// element count.
    pub fn data_mut(&mut self) -> &mut BitArray {
        &mut self.data
    }

    /// The raw data as bytes, zero-padded at the end.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.to_bytes()
    }

    /// Reinterpret the same data with a different element dtype.
    pub fn set_dtype(&mut self, dtype: Dtype) -> Result<()> {
        check_array_dtype(&dtype)?;
        self.dtype = dtype;
        Ok(())
    }

    /// The element at `i`.
    pub fn get(&self, i: usize) -> Result<DtypeValue> {
        let span = self.element_span(i)?;
        self.dtype.get(&self.data.slice_abs(span.0, span.1))
    }

    /// Overwrite the element at `i`.
    pub fn set(&mut self, i: usize, value: &DtypeValue) -> Result<()> {
        let span = self.element_span(i)?;
        let bits = self.dtype.build(value)?;
        self.data.overwrite(span.0, &bits)
    }

    /// Add an element at the end.
    ///
    /// Errors if there are trailing bits, since the new element would not
    /// be aligned to the element grid.
    pub fn push(&mut self, value: &DtypeValue) -> Result<()> {
        self.check_no_trailing_bits()?;
        let bits = self.dtype.build(value)?;
        self.data.append(&bits);
        Ok(())
    }

    /// Add several elements at the end.
    pub fn extend(&mut self, values: &[DtypeValue]) -> Result<()> {
        for value in values {
            self.push(value)?;
        }
        Ok(())
    }

    /// Insert an element before position `i` (or at the end if `i` is past
    /// it).
    pub fn insert(&mut self, i: usize, value: &DtypeValue) -> Result<()> {
        self.check_no_trailing_bits()?;
        let i = i.min(self.len());
        let bits = self.dtype.build(value)?;
        self.data.insert(i * self.item_size(), &bits)
    }

    /// Remove and return the final element.
    pub fn pop(&mut self) -> Result<DtypeValue> {
        if self.is_empty() {
            return Err(Error::value("cannot pop from an empty array"));
        }
        self.remove(self.len() - 1)
    }

    /// Remove and return the element at `i`.
    pub fn remove(&mut self, i: usize) -> Result<DtypeValue> {
        let span = self.element_span(i)?;
        let value = self.get(i)?;
        self.data.delete(span.0, span.1)?;
        Ok(value)
    }

    /// Reverse the order of the elements.
    ///
    /// Errors if there are trailing bits.
    pub fn reverse(&mut self) -> Result<()> {
        self.check_no_trailing_bits()?;
        let size = self.item_size();
        let mut reversed = BitArray::new();
        for i in (0..self.len()).rev() {
            reversed.append(&self.data.slice_abs(i * size, (i + 1) * size));
        }
        self.data = reversed;
        Ok(())
    }

    /// Reverse the byte order within each element.
    ///
    /// Errors unless the element size is a whole number of bytes.
    pub fn byteswap(&mut self) -> Result<()> {
        if self.item_size() % 8 != 0 {
            return Err(Error::byte_align(format!(
                "byteswap needs whole-byte elements, got {} bits",
                self.item_size()
            )));
        }
        self.data.byteswap(self.item_size() / 8)?;
        Ok(())
    }

    /// The number of elements equal to `value`.
    pub fn count(&self, value: &DtypeValue) -> usize {
        self.iter().filter(|v| v.as_ref() == Ok(value)).count()
    }

    /// All the element values.
    pub fn to_vec(&self) -> Result<Vec<DtypeValue>> {
        self.iter().collect()
    }

    /// Iterate over the element values.
    pub fn iter(&self) -> impl Iterator<Item = Result<DtypeValue>> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Elementwise arithmetic
    // ═══════════════════════════════════════════════════════════════════

    /// A new array with `scalar` added to every element.
    pub fn add_scalar(&self, scalar: Scalar) -> Result<Array> {
        self.map(|v| numeric_op(v, scalar, NumericOp::Add))
    }

    /// A new array with `scalar` subtracted from every element.
    pub fn sub_scalar(&self, scalar: Scalar) -> Result<Array> {
        self.map(|v| numeric_op(v, scalar, NumericOp::Sub))
    }

    /// A new array with every element multiplied by `scalar`.
    pub fn mul_scalar(&self, scalar: Scalar) -> Result<Array> {
        self.map(|v| numeric_op(v, scalar, NumericOp::Mul))
    }

    /// A new array with every element divided by `scalar`.
    ///
    /// Division always produces floats, so this errors for integer dtypes;
    /// use [`floordiv_scalar`](Self::floordiv_scalar) for those.
    pub fn div_scalar(&self, scalar: Scalar) -> Result<Array> {
        self.map(|v| numeric_op(v, scalar, NumericOp::Div))
    }

    /// A new array with every element floor-divided by `scalar`.
    pub fn floordiv_scalar(&self, scalar: Scalar) -> Result<Array> {
        self.map(|v| numeric_op(v, scalar, NumericOp::FloorDiv))
    }

    /// A new array with every element shifted left by `n`. Integer dtypes
    /// only.
    pub fn lshift_scalar(&self, n: u32) -> Result<Array> {
        self.map(|v| shift_op(v, n, true))
    }

    /// A new array with every element shifted right by `n`. Integer dtypes
    /// only.
    pub fn rshift_scalar(&self, n: u32) -> Result<Array> {
        self.map(|v| shift_op(v, n, false))
    }

    /// A new array with every element's raw bits ANDed with `mask`.
    pub fn and_scalar(&self, mask: u128) -> Result<Array> {
        self.map_raw(|u| u & mask)
    }

    /// A new array with every element's raw bits ORed with `mask`.
    pub fn or_scalar(&self, mask: u128) -> Result<Array> {
        self.map_raw(|u| u | mask)
    }

    /// A new array with every element's raw bits XORed with `mask`.
    pub fn xor_scalar(&self, mask: u128) -> Result<Array> {
        self.map_raw(|u| u ^ mask)
    }

    /// In-place variant of [`add_scalar`](Self::add_scalar). The array is
    /// untouched if the operation fails on any element.
    pub fn add_scalar_in_place(&mut self, scalar: Scalar) -> Result<()> {
        *self = self.add_scalar(scalar)?;
        Ok(())
    }

    /// In-place variant of [`sub_scalar`](Self::sub_scalar).
    pub fn sub_scalar_in_place(&mut self, scalar: Scalar) -> Result<()> {
        *self = self.sub_scalar(scalar)?;
        Ok(())
    }

    /// In-place variant of [`mul_scalar`](Self::mul_scalar).
    pub fn mul_scalar_in_place(&mut self, scalar: Scalar) -> Result<()> {
        *self = self.mul_scalar(scalar)?;
        Ok(())
    }

    /// In-place variant of [`div_scalar`](Self::div_scalar).
    pub fn div_scalar_in_place(&mut self, scalar: Scalar) -> Result<()> {
        *self = self.div_scalar(scalar)?;
        Ok(())
    }

    /// In-place variant of [`floordiv_scalar`](Self::floordiv_scalar).
    pub fn floordiv_scalar_in_place(&mut self, scalar: Scalar) -> Result<()> {
        *self = self.floordiv_scalar(scalar)?;
        Ok(())
    }

    /// In-place variant of [`lshift_scalar`](Self::lshift_scalar).
    pub fn lshift_scalar_in_place(&mut self, n: u32) -> Result<()> {
        *self = self.lshift_scalar(n)?;
        Ok(())
    }

    /// In-place variant of [`rshift_scalar`](Self::rshift_scalar).
    pub fn rshift_scalar_in_place(&mut self, n: u32) -> Result<()> {
        *self = self.rshift_scalar(n)?;
        Ok(())
    }

    /// In-place variant of [`and_scalar`](Self::and_scalar).
    pub fn and_scalar_in_place(&mut self, mask: u128) -> Result<()> {
        *self = self.and_scalar(mask)?;
        Ok(())
    }

    /// In-place variant of [`or_scalar`](Self::or_scalar).
    pub fn or_scalar_in_place(&mut self, mask: u128) -> Result<()> {
        *self = self.or_scalar(mask)?;
        Ok(())
    }

    /// In-place variant of [`xor_scalar`](Self::xor_scalar).
    pub fn xor_scalar_in_place(&mut self, mask: u128) -> Result<()> {
        *self = self.xor_scalar(mask)?;
        Ok(())
    }

    /// A new array with `f` applied to every element value.
    pub fn map<F>(&self, f: F) -> Result<Array>
    where
        F: Fn(&DtypeValue) -> Result<DtypeValue>,
    {
        let mut out = Array::new(self.dtype.clone())?;
        for value in self.iter() {
            out.push(&f(&value?)?)?;
        }
        Ok(out)
    }

    /// Apply `f` to the raw bits of every element, masked to the element
    /// width.
    fn map_raw<F>(&self, f: F) -> Result<Array>
    where
        F: Fn(u128) -> u128,
    {
        let size = self.item_size();
        if size > 128 {
            return Err(Error::value(format!(
                "bitwise operations are limited to 128 bit elements, got {size}"
            )));
        }
        let mask = if size == 128 {
            u128::MAX
        } else {
            (1u128 << size) - 1
        };
        let mut data = BitArray::new();
        for i in 0..self.len() {
            let raw = self
                .data
                .slice_abs(i * size, (i + 1) * size)
                .to_uint()?;
            data.append(&Bits::from_uint(f(raw) & mask, size)?);
        }
        Ok(Array {
            dtype: self.dtype.clone(),
            data,
        })
    }

    fn element_span(&self, i: usize) -> Result<(usize, usize)> {
        if i >= self.len() {
            return Err(Error::value(format!(
                "element index {i} out of range for array of {}",
                self.len()
            )));
        }
        let size = self.item_size();
        Ok((i * size, (i + 1) * size))
    }

    fn check_no_trailing_bits(&self) -> Result<()> {
        if self.data.len() % self.item_size() != 0 {
            return Err(Error::value(format!(
                "cannot change the elements while {} trailing bits make up a partial one",
                self.data.len() % self.item_size()
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Array('{}', [", self.dtype)?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                Ok(v) => write!(f, "{v}")?,
                Err(_) => write!(f, "?")?,
            }
        }
        write!(f, "])")?;
        let trailing = self.trailing_bits();
        if !trailing.is_empty() {
            write!(f, " + trailing_bits = 0b{}", trailing.to_bin())?;
        }
        Ok(())
    }
}

fn check_array_dtype(dtype: &Dtype) -> Result<()> {
    match dtype.bit_length() {
        Some(n) if n > 0 => Ok(()),
        _ => Err(Error::value(format!(
            "arrays need a fixed-length dtype, '{dtype}' has none"
        ))),
    }
}

#[derive(Clone, Copy)]
enum NumericOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
}

fn numeric_op(v: &DtypeValue, scalar: Scalar, op: NumericOp) -> Result<DtypeValue> {
    let float_mode = matches!(scalar, Scalar::Float(_))
        || matches!(v, DtypeValue::Float(_))
        || matches!(op, NumericOp::Div);
    if float_mode {
        let a = v.to_f64()?;
        let b = match scalar {
            Scalar::Float(f) => f,
            Scalar::Int(i) => i as f64,
        };
        let result = match op {
            NumericOp::Add => a + b,
            NumericOp::Sub => a - b,
            NumericOp::Mul => a * b,
            NumericOp::Div => a / b,
            NumericOp::FloorDiv => (a / b).floor(),
        };
        return Ok(DtypeValue::Float(result));
    }
    let a = v.to_i128()?;
    let Scalar::Int(b) = scalar else {
        unreachable!("float scalars use the float path")
    };
    let result = match op {
        NumericOp::Add => a.checked_add(b),
        NumericOp::Sub => a.checked_sub(b),
        NumericOp::Mul => a.checked_mul(b),
        NumericOp::Div => unreachable!("division uses the float path"),
        NumericOp::FloorDiv => {
            if b == 0 {
                None
            } else {
                a.checked_div_euclid(b)
            }
        }
    };
    let result = result.ok_or_else(|| Error::value("arithmetic overflow in array operation"))?;
    Ok(DtypeValue::Int(result))
}

fn shift_op(v: &DtypeValue, n: u32, left: bool) -> Result<DtypeValue> {
    let a = v.to_i128()?;
    let result = if left {
        a.checked_shl(n)
            .ok_or_else(|| Error::value("shift overflow in array operation"))?
    } else {
        a >> n.min(127)
    };
    Ok(DtypeValue::Int(result))
}
