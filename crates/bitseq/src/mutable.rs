//! Mutable bit sequences
//!
//! [`BitArray`] adds in-place modification on top of [`Bits`]. It derefs
//! to `Bits`, so every constructor, interpretation and search method is
//! available on it too.

use std::ops::{
    AddAssign, BitAndAssign, BitOrAssign, BitXorAssign, Deref, ShlAssign, ShrAssign,
};

use crate::bits::Bits;
use crate::error::{Error, Result};
use crate::options;
use crate::store::BitStore;

/// A mutable sequence of bits.
///
/// # Example
///
/// ```
/// use bitseq::{BitArray, Bits};
///
/// let mut a = BitArray::parse("0x0f")?;
/// a.append(&Bits::from_bin("0b11")?);
/// a.invert_all();
/// assert_eq!(a.to_bin(), "1111000000");
/// # Ok::<(), bitseq::Error>(())
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BitArray {
    bits: Bits,
}

impl BitArray {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `n` zero bits.
    pub fn zeros(n: usize) -> Self {
        Bits::zeros(n).into()
    }

    /// Create `n` one bits.
    pub fn ones(n: usize) -> Self {
        Bits::ones(n).into()
    }

    /// Create from whole bytes.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Bits::from_bytes(data).into()
    }

    /// Create from a formatted string, as [`Bits::parse`].
    pub fn parse(s: &str) -> Result<Self> {
        Ok(Bits::parse(s)?.into())
    }

    /// The immutable view of the current contents.
    pub fn as_bits(&self) -> &Bits {
        &self.bits
    }

    /// Freeze into an immutable [`Bits`].
    pub fn into_bits(self) -> Bits {
        self.bits
    }

    /// Append to the end (in lsb0 mode the end is bit zero).
    pub fn append(&mut self, bs: &Bits) {
        if options::lsb0() {
            self.bits.store.prepend(&bs.store);
        } else {
            self.bits.store.append(&bs.store);
        }
    }

    /// Prepend at the start.
    pub fn prepend(&mut self, bs: &Bits) {
        if options::lsb0() {
            self.bits.store.append(&bs.store);
        } else {
            self.bits.store.prepend(&bs.store);
        }
    }

    /// Insert at bit position `pos`, between existing bits.
    pub fn insert(&mut self, pos: usize, bs: &Bits) -> Result<()> {
        if pos > self.len() {
            return Err(Error::value(format!(
                "insert position {pos} is past the end ({} bits)",
                self.len()
            )));
        }
        let p = if options::lsb0() { self.len() - pos } else { pos };
        self.bits.store.insert(p, &bs.store);
        Ok(())
    }

    /// Overwrite the bits starting at `pos` without changing the length.
    pub fn overwrite(&mut self, pos: usize, bs: &Bits) -> Result<()> {
        if pos + bs.len() > self.len() {
            return Err(Error::value(format!(
                "overwrite of {} bits at position {pos} runs past the end ({} bits)",
                bs.len(),
                self.len()
            )));
        }
        let p = if options::lsb0() {
            self.len() - pos - bs.len()
        } else {
            pos
        };
        self.bits.store.overwrite(p, &bs.store);
        Ok(())
    }

    /// Delete the bits in `start..end`.
    pub fn delete(&mut self, start: usize, end: usize) -> Result<()> {
        let (start, end) = self.bits.validate_range(Some(start), Some(end))?;
        let (s, e) = self.translate_span(start, end);
        self.bits.store.delete(s, e);
        Ok(())
    }

    /// Replace the bits in `start..end` with `bs`, changing the length as
    /// needed.
    pub fn set_slice(&mut self, start: usize, end: usize, bs: &Bits) -> Result<()> {
        let (start, end) = self.bits.validate_range(Some(start), Some(end))?;
        let (s, e) = self.translate_span(start, end);
        self.bits.store.splice(s, e, &bs.store);
        Ok(())
    }

    /// Set the bits at `positions` to `value`.
    pub fn set(&mut self, value: bool, positions: &[usize]) -> Result<()> {
        for &p in positions {
            if p >= self.len() {
                return Err(Error::value(format!("bit position {p} out of range")));
            }
            let i = self.bits.translate_index(p);
            self.bits.store.set(i, value);
        }
        Ok(())
    }

    /// Set every bit to `value`.
    pub fn set_all(&mut self, value: bool) {
        self.bits.store.set_all(value);
    }

    /// Invert the bits at `positions`.
    pub fn invert(&mut self, positions: &[usize]) -> Result<()> {
        for &p in positions {
            if p >= self.len() {
                return Err(Error::value(format!("bit position {p} out of range")));
            }
            let i = self.bits.translate_index(p);
            self.bits.store.invert(i);
        }
        Ok(())
    }

    /// Invert every bit.
    pub fn invert_all(&mut self) {
        self.bits.store.invert_all();
    }

    /// Reverse the bit order.
    pub fn reverse(&mut self) {
        self.bits.store.reverse();
    }

    /// Rotate left by `n` bits. Errors on an empty array.
    pub fn rol(&mut self, n: usize) -> Result<()> {
        if options::lsb0() {
            self.rotate_right(n)
        } else {
            self.rotate_left(n)
        }
    }

    /// Rotate right by `n` bits. Errors on an empty array.
    pub fn ror(&mut self, n: usize) -> Result<()> {
        if options::lsb0() {
            self.rotate_left(n)
        } else {
            self.rotate_right(n)
        }
    }

    fn rotate_left(&mut self, n: usize) -> Result<()> {
        if self.is_empty() {
            return Err(Error::value("cannot rotate an empty bitstring"));
        }
        let n = n % self.len();
        if n == 0 {
            return Ok(());
        }
        let head = self.bits.store.slice(0, n);
        self.bits.store.delete(0, n);
        self.bits.store.append(&head);
        Ok(())
    }

    fn rotate_right(&mut self, n: usize) -> Result<()> {
        if self.is_empty() {
            return Err(Error::value("cannot rotate an empty bitstring"));
        }
        let n = n % self.len();
        if n == 0 {
            return Ok(());
        }
        let tail = self.bits.store.slice(self.len() - n, self.len());
        self.bits.store.delete(self.len() - n, self.len());
        self.bits.store.prepend(&tail);
        Ok(())
    }

    /// Reverse the byte order of each group of `size` bytes, working from
    /// the start. Returns the number of groups swapped; trailing bytes and
    /// bits beyond the last whole group are untouched.
    pub fn byteswap(&mut self, size: usize) -> Result<usize> {
        if size == 0 {
            return Err(Error::value("byteswap needs a positive group size"));
        }
        let groups = self.len() / 8 / size;
        for g in 0..groups {
            let start = g * size * 8;
            let group = self.bits.slice_abs(start, start + size * 8);
            let swapped = Bits::from_bytes({
                let mut bytes = group.to_bytes();
                bytes.reverse();
                bytes
            });
            self.bits.store.overwrite(start, &swapped.store);
        }
        Ok(groups)
    }

    /// Replace non-overlapping occurrences of `old` with `new`, working
    /// left to right. Returns the number of replacements made.
    pub fn replace(
        &mut self,
        old: &Bits,
        new: &Bits,
        bytealigned: Option<bool>,
    ) -> Result<usize> {
        if old.is_empty() {
            return Err(Error::value("cannot replace an empty bitstring"));
        }
        let ba = bytealigned.unwrap_or_else(options::bytealigned);
        let mut count = 0usize;
        let mut out = BitStore::new();
        let mut pos = 0usize;
        while let Some(p) = self.bits.store.find(&old.store, pos, self.len(), ba) {
            out.append(&self.bits.store.slice(pos, p));
            out.append(&new.store);
            pos = p + old.len();
            count += 1;
        }
        if count > 0 {
            out.append(&self.bits.store.slice(pos, self.len()));
            self.bits.store = out;
        }
        Ok(count)
    }
}

impl Deref for BitArray {
    type Target = Bits;

    fn deref(&self) -> &Bits {
        &self.bits
    }
}

impl From<Bits> for BitArray {
    fn from(bits: Bits) -> Self {
        Self { bits }
    }
}

impl From<BitArray> for Bits {
    fn from(array: BitArray) -> Self {
        array.bits
    }
}

impl AddAssign<&Bits> for BitArray {
    fn add_assign(&mut self, rhs: &Bits) {
        self.append(rhs);
    }
}

impl BitAndAssign<&Bits> for BitArray {
    /// Panics if the lengths differ; use [`Bits::and`] for a fallible form.
    fn bitand_assign(&mut self, rhs: &Bits) {
        self.bits = self.bits.and(rhs).expect("bitwise and of equal-length bitstrings");
    }
}

impl BitOrAssign<&Bits> for BitArray {
    /// Panics if the lengths differ; use [`Bits::or`] for a fallible form.
    fn bitor_assign(&mut self, rhs: &Bits) {
        self.bits = self.bits.or(rhs).expect("bitwise or of equal-length bitstrings");
    }
}

impl BitXorAssign<&Bits> for BitArray {
    /// Panics if the lengths differ; use [`Bits::xor`] for a fallible form.
    fn bitxor_assign(&mut self, rhs: &Bits) {
        self.bits = self.bits.xor(rhs).expect("bitwise xor of equal-length bitstrings");
    }
}

impl ShlAssign<usize> for BitArray {
    /// Panics on an empty array; use [`Bits::shifted_left`] for a fallible
    /// form.
    fn shl_assign(&mut self, n: usize) {
        self.bits = self.bits.shifted_left(n).expect("shift of non-empty bitstring");
    }
}

impl ShrAssign<usize> for BitArray {
    /// Panics on an empty array; use [`Bits::shifted_right`] for a fallible
    /// form.
    fn shr_assign(&mut self, n: usize) {
        self.bits = self.bits.shifted_right(n).expect("shift of non-empty bitstring");
    }
}

impl BitArray {
    /// Translate a user span to msb0 store coordinates.
    fn translate_span(&self, start: usize, end: usize) -> (usize, usize) {
        if options::lsb0() {
            (self.len() - end, self.len() - start)
        } else {
            (start, end)
        }
    }
}
