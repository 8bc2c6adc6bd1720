//! Positional reading of bit sequences
//!
//! [`BitReader`] walks a [`Bits`] with a bit position, reading values off
//! the front one dtype at a time. Reader positions are always msb0,
//! whatever the lsb0 option says.

use crate::bits::Bits;
use crate::dtype::{Dtype, DtypeValue};
use crate::error::{Error, Result};
use crate::options;
use crate::pack;
use crate::tokens;

/// A reader over a bit sequence with a current position.
///
/// # Example
///
/// ```
/// use bitseq::{BitReader, Bits, Dtype, DtypeValue};
///
/// let b = Bits::parse("0x47, u12=1000, 0b11")?;
/// let mut r = BitReader::new(&b);
/// assert_eq!(r.read(&Dtype::parse("hex8")?)?, DtypeValue::String("47".into()));
/// assert_eq!(r.read(&Dtype::parse("u12")?)?, DtypeValue::Uint(1000));
/// assert_eq!(r.remaining(), 2);
/// # Ok::<(), bitseq::Error>(())
/// ```
pub struct BitReader<'a> {
    bits: &'a Bits,
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the start.
    pub fn new(bits: &'a Bits) -> Self {
        Self { bits, pos: 0 }
    }

    /// The underlying bit sequence.
    pub fn bits(&self) -> &'a Bits {
        self.bits
    }

    /// The current bit position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move to an absolute bit position.
    pub fn set_pos(&mut self, pos: usize) -> Result<()> {
        if pos > self.bits.len() {
            return Err(Error::value(format!(
                "position {pos} is past the end ({} bits)",
                self.bits.len()
            )));
        }
        self.pos = pos;
        Ok(())
    }

    /// Bits left between the position and the end.
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.pos
    }

    /// Whether the position is at the end of the data.
    pub fn is_at_end(&self) -> bool {
        self.pos == self.bits.len()
    }

    /// Read a value of `dtype`, advancing the position past it.
    pub fn read(&mut self, dtype: &Dtype) -> Result<DtypeValue> {
        let (value, new_pos) = dtype.read(self.bits, self.pos)?;
        self.pos = new_pos;
        Ok(value)
    }

    /// Read the next `n` bits as a [`Bits`].
    pub fn read_bits(&mut self, n: usize) -> Result<Bits> {
        if n > self.remaining() {
            return Err(Error::read(format!(
                "cannot read {n} bits, only {} available",
                self.remaining()
            )));
        }
        let out = self.bits.slice_abs(self.pos, self.pos + n);
        self.pos += n;
        Ok(out)
    }

    /// Read a whole format string, advancing past everything it matched.
    ///
    /// A stretchy token takes all the bits between the fixed tokens and
    /// the end of the data.
    pub fn read_list(&mut self, fmt: &str) -> Result<Vec<DtypeValue>> {
        let tokens = tokens::tokenparser(fmt)?;
        let (values, new_pos) =
            pack::read_format(self.bits, self.pos, self.bits.len(), &tokens)?;
        self.pos = new_pos;
        Ok(values)
    }

    /// Read a value of `dtype` without moving the position.
    pub fn peek(&self, dtype: &Dtype) -> Result<DtypeValue> {
        let (value, _) = dtype.read(self.bits, self.pos)?;
        Ok(value)
    }

    /// Look at the next `n` bits without moving the position.
    pub fn peek_bits(&self, n: usize) -> Result<Bits> {
        if n > self.remaining() {
            return Err(Error::read(format!(
                "cannot peek {n} bits, only {} available",
                self.remaining()
            )));
        }
        Ok(self.bits.slice_abs(self.pos, self.pos + n))
    }

    /// Advance to the next byte boundary, returning the bits skipped.
    pub fn bytealign(&mut self) -> usize {
        let skipped = (8 - self.pos % 8) % 8;
        let skipped = skipped.min(self.remaining());
        self.pos += skipped;
        skipped
    }

    /// Search forwards from the position for `pattern`.
    ///
    /// On success the position moves to the start of the match and the
    /// match position is returned; on failure the position is unchanged.
    /// The search is in msb0 positions like everything else here, even
    /// when the lsb0 option is set.
    pub fn find(&mut self, pattern: &Bits, bytealigned: Option<bool>) -> Result<Option<usize>> {
        if pattern.is_empty() {
            return Err(Error::value("cannot find an empty bitstring"));
        }
        let ba = bytealigned.unwrap_or_else(options::bytealigned);
        let found = self
            .bits
            .store
            .find(&pattern.store, self.pos, self.bits.len(), ba);
        if let Some(p) = found {
            self.pos = p;
        }
        Ok(found)
    }
}
