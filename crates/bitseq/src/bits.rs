//! Immutable bit sequences
//!
//! [`Bits`] is the core container: an immutable sequence of bits with
//! constructors from (and interpretations as) integers, floats, hex/oct/bin
//! strings, bytes and exponential-Golomb codes. The mutable counterpart is
//! [`BitArray`](crate::BitArray).

use std::ops::{Add, BitAnd, BitOr, BitXor, Not, Shl, Shr};
use std::path::Path;

use crate::error::{Error, Result};
use crate::float8::{P3BINARY, P4BINARY};
use crate::options;
use crate::store::BitStore;

/// An immutable sequence of bits.
///
/// `Bits` is cheap to clone relative to its size and never changes after
/// construction. Positions are msb0 by default (bit zero is the first bit);
/// enabling [`options::set_lsb0`](crate::options::set_lsb0) flips indexing,
/// slicing and searching so that bit zero is the final bit.
///
/// # Example
///
/// ```
/// use bitseq::Bits;
///
/// let a = Bits::from_hex("0xc3e")?;
/// assert_eq!(a.len(), 12);
/// assert_eq!(a.find(&Bits::from_bin("0b1111")?, None, None, None)?, Some(6));
/// assert_eq!(a.slice(0, 4)?.to_uint()?, 0xc);
/// # Ok::<(), bitseq::Error>(())
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bits {
    pub(crate) store: BitStore,
}

impl Bits {
    // ═══════════════════════════════════════════════════════════════════
    // Constructors
    // ═══════════════════════════════════════════════════════════════════

    /// Create an empty bit sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `n` zero bits.
    pub fn zeros(n: usize) -> Self {
        Self {
            store: BitStore::zeros(n),
        }
    }

    /// Create `n` one bits.
    pub fn ones(n: usize) -> Self {
        Self {
            store: BitStore::ones(n),
        }
    }

    /// Create from whole bytes, eight bits per byte.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            store: BitStore::from_bytes(data.into()),
        }
    }

    /// Create from `length` bits of `data`, skipping `offset` leading bits.
    pub fn from_bytes_with_offset(data: &[u8], offset: usize, length: usize) -> Result<Self> {
        let total = data.len() * 8;
        if offset + length > total {
            return Err(Error::creation(format!(
                "need {} bits, have {} bits of data",
                offset + length,
                total
            )));
        }
        let store = BitStore::from_bytes(data.to_vec());
        Ok(Self {
            store: store.slice(offset, offset + length),
        })
    }

    /// Create from an iterator of bools, one bit per item.
    pub fn from_bools<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        Self {
            store: BitStore::from_bools(bits),
        }
    }

    /// Create from a binary string such as `"0b0011"` (the prefix is
    /// optional, underscores are ignored).
    pub fn from_bin(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0b").unwrap_or(s);
        let mut store = BitStore::new();
        for c in s.chars() {
            match c {
                '0' => store.push(false),
                '1' => store.push(true),
                '_' => {}
                _ => {
                    return Err(Error::creation(format!(
                        "invalid character '{c}' in binary initialiser '{s}'"
                    )))
                }
            }
        }
        Ok(Self { store })
    }

    /// Create from a hexadecimal string such as `"0x2ef"`, four bits per
    /// digit.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        let mut store = BitStore::new();
        for c in s.chars() {
            if c == '_' {
                continue;
            }
            let digit = c.to_digit(16).ok_or_else(|| {
                Error::creation(format!("invalid character '{c}' in hex initialiser"))
            })? as u8;
            for i in (0..4).rev() {
                store.push((digit >> i) & 1 == 1);
            }
        }
        Ok(Self { store })
    }

    /// Create from an octal string such as `"0o777"`, three bits per digit.
    pub fn from_oct(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0o").or_else(|| s.strip_prefix("0O")).unwrap_or(s);
        let mut store = BitStore::new();
        for c in s.chars() {
            if c == '_' {
                continue;
            }
            let digit = c.to_digit(8).ok_or_else(|| {
                Error::creation(format!("invalid character '{c}' in octal initialiser"))
            })? as u8;
            for i in (0..3).rev() {
                store.push((digit >> i) & 1 == 1);
            }
        }
        Ok(Self { store })
    }

    /// Create from an unsigned integer in `length` bits.
    pub fn from_uint(value: u128, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(Error::creation(
                "a non-zero length must be specified with a uint initialiser",
            ));
        }
        if length > 128 {
            return Err(Error::creation(format!(
                "uint initialisers are limited to 128 bits, got {length}"
            )));
        }
        if length < 128 && value >> length != 0 {
            return Err(Error::creation(format!(
                "{value} is too large an unsigned integer for a bitstring of length {length}"
            )));
        }
        let mut store = BitStore::zeros(length);
        for i in 0..length {
            if (value >> (length - 1 - i)) & 1 == 1 {
                store.set(i, true);
            }
        }
        Ok(Self { store })
    }

    /// Create from a two's complement signed integer in `length` bits.
    pub fn from_int(value: i128, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(Error::creation(
                "a non-zero length must be specified with an int initialiser",
            ));
        }
        if length > 128 {
            return Err(Error::creation(format!(
                "int initialisers are limited to 128 bits, got {length}"
            )));
        }
        if length < 128 {
            let min = -(1i128 << (length - 1));
            let max = (1i128 << (length - 1)) - 1;
            if value < min || value > max {
                return Err(Error::creation(format!(
                    "{value} is out of range for a signed bitstring of length {length}"
                )));
            }
        }
        let mask = if length == 128 {
            u128::MAX
        } else {
            (1u128 << length) - 1
        };
        Self::from_uint(value as u128 & mask, length)
    }

    /// Big-endian unsigned integer. The length must be a whole number of
    /// bytes.
    pub fn from_uint_be(value: u128, length: usize) -> Result<Self> {
        Self::check_whole_byte(length, "big-endian integers")?;
        Self::from_uint(value, length)
    }

    /// Little-endian unsigned integer.
    pub fn from_uint_le(value: u128, length: usize) -> Result<Self> {
        Self::check_whole_byte(length, "little-endian integers")?;
        let be = Self::from_uint(value, length)?;
        Ok(Self::from_bytes(reverse_bytes(be.to_bytes())))
    }

    /// Native-endian unsigned integer.
    pub fn from_uint_ne(value: u128, length: usize) -> Result<Self> {
        if cfg!(target_endian = "little") {
            Self::from_uint_le(value, length)
        } else {
            Self::from_uint_be(value, length)
        }
    }

    /// Big-endian signed integer. The length must be a whole number of
    /// bytes.
    pub fn from_int_be(value: i128, length: usize) -> Result<Self> {
        Self::check_whole_byte(length, "big-endian integers")?;
        Self::from_int(value, length)
    }

    /// Little-endian signed integer.
    pub fn from_int_le(value: i128, length: usize) -> Result<Self> {
        Self::check_whole_byte(length, "little-endian integers")?;
        let be = Self::from_int(value, length)?;
        Ok(Self::from_bytes(reverse_bytes(be.to_bytes())))
    }

    /// Native-endian signed integer.
    pub fn from_int_ne(value: i128, length: usize) -> Result<Self> {
        if cfg!(target_endian = "little") {
            Self::from_int_le(value, length)
        } else {
            Self::from_int_be(value, length)
        }
    }

    /// Big-endian IEEE float in 16, 32 or 64 bits.
    pub fn from_f64(value: f64, length: usize) -> Result<Self> {
        let bytes: Vec<u8> = match length {
            16 => f64_to_f16_bits(value).to_be_bytes().to_vec(),
            32 => (value as f32).to_bits().to_be_bytes().to_vec(),
            64 => value.to_bits().to_be_bytes().to_vec(),
            _ => {
                return Err(Error::creation(format!(
                    "a length of 16, 32 or 64 must be specified with a float initialiser, got {length}"
                )))
            }
        };
        Ok(Self::from_bytes(bytes))
    }

    /// Little-endian IEEE float in 16, 32 or 64 bits.
    pub fn from_f64_le(value: f64, length: usize) -> Result<Self> {
        let be = Self::from_f64(value, length)?;
        Ok(Self::from_bytes(reverse_bytes(be.to_bytes())))
    }

    /// Native-endian IEEE float.
    pub fn from_f64_ne(value: f64, length: usize) -> Result<Self> {
        if cfg!(target_endian = "little") {
            Self::from_f64_le(value, length)
        } else {
            Self::from_f64(value, length)
        }
    }

    /// Big-endian bfloat16: the top sixteen bits of the binary32 encoding.
    pub fn from_bfloat(value: f64) -> Self {
        let b = (value as f32).to_bits();
        Self::from_bytes(((b >> 16) as u16).to_be_bytes().to_vec())
    }

    /// Little-endian bfloat16.
    pub fn from_bfloat_le(value: f64) -> Self {
        let be = Self::from_bfloat(value);
        Self::from_bytes(reverse_bytes(be.to_bytes()))
    }

    /// A single bit.
    pub fn from_bool(value: bool) -> Self {
        Self::from_bools([value])
    }

    /// 8-bit float, 1-4-3 format (`p4binary` / e4m3).
    pub fn from_p4binary(value: f64) -> Self {
        Self::from_bytes(vec![P4BINARY.float_to_u8(value)])
    }

    /// 8-bit float, 1-5-2 format (`p3binary` / e5m2).
    pub fn from_p3binary(value: f64) -> Self {
        Self::from_bytes(vec![P3BINARY.float_to_u8(value)])
    }

    /// Unsigned exponential-Golomb code for `value`.
    ///
    /// Exp-Golomb codes cannot be used in lsb0 mode.
    pub fn from_ue(value: u128) -> Result<Self> {
        Self::check_not_lsb0()?;
        let x = value
            .checked_add(1)
            .ok_or_else(|| Error::creation("exp-Golomb value out of range"))?;
        let lz = (127 - x.leading_zeros()) as usize;
        let mut store = BitStore::zeros(lz);
        for i in (0..=lz).rev() {
            store.push((x >> i) & 1 == 1);
        }
        Ok(Self { store })
    }

    /// Signed exponential-Golomb code for `value`.
    pub fn from_se(value: i128) -> Result<Self> {
        let u = if value > 0 {
            2 * value as u128 - 1
        } else {
            value
                .unsigned_abs()
                .checked_mul(2)
                .ok_or_else(|| Error::creation("exp-Golomb value out of range"))?
        };
        Self::from_ue(u)
    }

    /// Unsigned interleaved exponential-Golomb code for `value`.
    pub fn from_uie(value: u128) -> Result<Self> {
        Self::check_not_lsb0()?;
        let x = value
            .checked_add(1)
            .ok_or_else(|| Error::creation("exp-Golomb value out of range"))?;
        let top = 127 - x.leading_zeros();
        let mut store = BitStore::new();
        for i in (0..top).rev() {
            store.push(false);
            store.push((x >> i) & 1 == 1);
        }
        store.push(true);
        Ok(Self { store })
    }

    /// Signed interleaved exponential-Golomb code for `value`.
    pub fn from_sie(value: i128) -> Result<Self> {
        let mut bits = Self::from_uie(value.unsigned_abs())?;
        if value != 0 {
            bits.store.push(value < 0);
        }
        Ok(bits)
    }

    /// Read a whole file as a bit sequence.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())
            .map_err(|e| Error::creation(format!("cannot read file: {e}")))?;
        Ok(Self::from_bytes(data))
    }

    /// Concatenate `items` with `self` as the separator between each pair.
    pub fn join<'a, I: IntoIterator<Item = &'a Bits>>(&self, items: I) -> Bits {
        let mut out = BitStore::new();
        let mut first = true;
        for item in items {
            if !first && !self.is_empty() {
                out.append(&self.store);
            }
            out.append(&item.store);
            first = false;
        }
        Bits { store: out }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Interpretations
    // ═══════════════════════════════════════════════════════════════════

    /// Interpret as an unsigned integer (msb first).
    pub fn to_uint(&self) -> Result<u128> {
        let len = self.len();
        if len == 0 {
            return Err(Error::interpret(
                "cannot interpret a zero length bitstring as an integer",
            ));
        }
        if len > 128 {
            return Err(Error::interpret(format!(
                "integer interpretations are limited to 128 bits, got {len}"
            )));
        }
        let mut value = 0u128;
        for i in 0..len {
            value = (value << 1) | self.store.get(i) as u128;
        }
        Ok(value)
    }

    /// Interpret as a two's complement signed integer.
    pub fn to_int(&self) -> Result<i128> {
        let u = self.to_uint()?;
        let len = self.len();
        if len == 128 {
            return Ok(u as i128);
        }
        if u & (1u128 << (len - 1)) != 0 {
            // Two's complement in u128 space; the wrap is the sign extension
            Ok(u.wrapping_sub(1u128 << len) as i128)
        } else {
            Ok(u as i128)
        }
    }

    /// Interpret as a big-endian unsigned integer (whole bytes only).
    pub fn to_uint_be(&self) -> Result<u128> {
        self.check_whole_byte_interpret("big-endian integers")?;
        self.to_uint()
    }

    /// Interpret as a little-endian unsigned integer (whole bytes only).
    pub fn to_uint_le(&self) -> Result<u128> {
        self.check_whole_byte_interpret("little-endian integers")?;
        Bits::from_bytes(reverse_bytes(self.to_bytes())).to_uint()
    }

    /// Interpret as a native-endian unsigned integer.
    pub fn to_uint_ne(&self) -> Result<u128> {
        if cfg!(target_endian = "little") {
            self.to_uint_le()
        } else {
            self.to_uint_be()
        }
    }

    /// Interpret as a big-endian signed integer (whole bytes only).
    pub fn to_int_be(&self) -> Result<i128> {
        self.check_whole_byte_interpret("big-endian integers")?;
        self.to_int()
    }

    /// Interpret as a little-endian signed integer (whole bytes only).
    pub fn to_int_le(&self) -> Result<i128> {
        self.check_whole_byte_interpret("little-endian integers")?;
        Bits::from_bytes(reverse_bytes(self.to_bytes())).to_int()
    }

    /// Interpret as a native-endian signed integer.
    pub fn to_int_ne(&self) -> Result<i128> {
        if cfg!(target_endian = "little") {
            self.to_int_le()
        } else {
            self.to_int_be()
        }
    }

    /// Interpret as a big-endian IEEE float (16, 32 or 64 bits).
    pub fn to_f64(&self) -> Result<f64> {
        let bytes = self.to_bytes();
        match self.len() {
            16 => Ok(f16_bits_to_f64(u16::from_be_bytes([bytes[0], bytes[1]]))),
            32 => Ok(f32::from_bits(u32::from_be_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3],
            ])) as f64),
            64 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&bytes[..8]);
                Ok(f64::from_bits(u64::from_be_bytes(raw)))
            }
            n => Err(Error::interpret(format!(
                "floats can only be 16, 32 or 64 bits long, not {n}"
            ))),
        }
    }

    /// Interpret as a little-endian IEEE float (16, 32 or 64 bits).
    pub fn to_f64_le(&self) -> Result<f64> {
        if ![16, 32, 64].contains(&self.len()) {
            return Err(Error::interpret(format!(
                "floats can only be 16, 32 or 64 bits long, not {}",
                self.len()
            )));
        }
        Bits::from_bytes(reverse_bytes(self.to_bytes())).to_f64()
    }

    /// Interpret as a native-endian IEEE float.
    pub fn to_f64_ne(&self) -> Result<f64> {
        if cfg!(target_endian = "little") {
            self.to_f64_le()
        } else {
            self.to_f64()
        }
    }

    /// Interpret sixteen bits as a big-endian bfloat16.
    pub fn to_bfloat(&self) -> Result<f64> {
        if self.len() != 16 {
            return Err(Error::interpret(format!(
                "bfloats must be 16 bits long, not {}",
                self.len()
            )));
        }
        let mut padded = self.clone();
        padded.store.append(&BitStore::zeros(16));
        padded.to_f64()
    }

    /// Interpret sixteen bits as a little-endian bfloat16.
    pub fn to_bfloat_le(&self) -> Result<f64> {
        if self.len() != 16 {
            return Err(Error::interpret(format!(
                "bfloats must be 16 bits long, not {}",
                self.len()
            )));
        }
        let mut padded = Bits::zeros(16);
        padded.store.append(&self.store);
        padded.to_f64_le()
    }

    /// Interpret a single bit as a bool.
    pub fn to_bool(&self) -> Result<bool> {
        if self.len() != 1 {
            return Err(Error::interpret(format!(
                "bools must be a single bit, not {}",
                self.len()
            )));
        }
        Ok(self.store.get(0))
    }

    /// Interpret eight bits as a 1-4-3 8-bit float.
    pub fn to_p4binary(&self) -> Result<f64> {
        if self.len() != 8 {
            return Err(Error::interpret(format!(
                "p4binary floats must be 8 bits long, not {}",
                self.len()
            )));
        }
        Ok(P4BINARY.u8_to_float(self.to_bytes()[0]))
    }

    /// Interpret eight bits as a 1-5-2 8-bit float.
    pub fn to_p3binary(&self) -> Result<f64> {
        if self.len() != 8 {
            return Err(Error::interpret(format!(
                "p3binary floats must be 8 bits long, not {}",
                self.len()
            )));
        }
        Ok(P3BINARY.u8_to_float(self.to_bytes()[0]))
    }

    /// The binary string representation, without a `0b` prefix.
    pub fn to_bin(&self) -> String {
        self.store
            .iter()
            .map(|b| if b { '1' } else { '0' })
            .collect()
    }

    /// The hexadecimal representation (length must be a multiple of 4).
    pub fn to_hex(&self) -> Result<String> {
        if self.len() % 4 != 0 {
            return Err(Error::interpret(
                "cannot convert to hex unambiguously - not a multiple of 4 bits long",
            ));
        }
        let mut s = String::with_capacity(self.len() / 4);
        for i in (0..self.len()).step_by(4) {
            let mut nibble = 0usize;
            for j in 0..4 {
                nibble = (nibble << 1) | self.store.get(i + j) as usize;
            }
            s.push(DIGITS[nibble] as char);
        }
        Ok(s)
    }

    /// The octal representation (length must be a multiple of 3).
    pub fn to_oct(&self) -> Result<String> {
        if self.len() % 3 != 0 {
            return Err(Error::interpret(
                "cannot convert to octal unambiguously - not a multiple of 3 bits long",
            ));
        }
        let mut s = String::with_capacity(self.len() / 3);
        for i in (0..self.len()).step_by(3) {
            let mut digit = 0usize;
            for j in 0..3 {
                digit = (digit << 1) | self.store.get(i + j) as usize;
            }
            s.push(DIGITS[digit] as char);
        }
        Ok(s)
    }

    /// The bits as bytes, zero-padded at the end to a byte boundary.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.store.to_bytes()
    }

    /// The bits as bytes; errors unless the length is a multiple of 8.
    pub fn to_bytes_exact(&self) -> Result<Vec<u8>> {
        if self.len() % 8 != 0 {
            return Err(Error::interpret(
                "cannot interpret as bytes unambiguously - not a multiple of 8 bits",
            ));
        }
        Ok(self.to_bytes())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Exp-Golomb reads (used by BitReader and the golomb dtypes)
    // ═══════════════════════════════════════════════════════════════════

    /// Read an unsigned exp-Golomb code starting at `pos` (msb0).
    /// Returns the value and the position after the code.
    pub fn read_ue(&self, pos: usize) -> Result<(u128, usize)> {
        Self::check_not_lsb0_read()?;
        let mut p = pos;
        while p < self.len() && !self.store.get(p) {
            p += 1;
        }
        if p >= self.len() {
            return Err(Error::read(
                "read off end of bitstring trying to read exp-Golomb code",
            ));
        }
        let leading_zeros = p - pos;
        if leading_zeros > 127 {
            return Err(Error::read("exp-Golomb code does not fit in 128 bits"));
        }
        let mut value = (1u128 << leading_zeros) - 1;
        if leading_zeros > 0 {
            if p + leading_zeros + 1 > self.len() {
                return Err(Error::read(
                    "read off end of bitstring trying to read exp-Golomb code",
                ));
            }
            value += self.slice_abs(p + 1, p + 1 + leading_zeros).to_uint()?;
            Ok((value, p + leading_zeros + 1))
        } else {
            Ok((value, p + 1))
        }
    }

    /// Read a signed exp-Golomb code starting at `pos`.
    pub fn read_se(&self, pos: usize) -> Result<(i128, usize)> {
        let (code, new_pos) = self.read_ue(pos)?;
        let m = (code + 1) / 2;
        if code % 2 == 0 {
            Ok((-(m as i128), new_pos))
        } else {
            Ok((m as i128, new_pos))
        }
    }

    /// Read an unsigned interleaved exp-Golomb code starting at `pos`.
    pub fn read_uie(&self, pos: usize) -> Result<(u128, usize)> {
        Self::check_not_lsb0_read()?;
        let mut p = pos;
        let mut value = 1u128;
        loop {
            if p >= self.len() {
                return Err(Error::read(
                    "read off end of bitstring trying to read exp-Golomb code",
                ));
            }
            if self.store.get(p) {
                p += 1;
                break;
            }
            p += 1;
            if p >= self.len() {
                return Err(Error::read(
                    "read off end of bitstring trying to read exp-Golomb code",
                ));
            }
            if value.leading_zeros() == 0 {
                return Err(Error::read("exp-Golomb code does not fit in 128 bits"));
            }
            value = (value << 1) + self.store.get(p) as u128;
            p += 1;
        }
        Ok((value - 1, p))
    }

    /// Read a signed interleaved exp-Golomb code starting at `pos`.
    pub fn read_sie(&self, pos: usize) -> Result<(i128, usize)> {
        let (code, new_pos) = self.read_uie(pos)?;
        if code == 0 {
            return Ok((0, new_pos));
        }
        if new_pos >= self.len() {
            return Err(Error::read(
                "read off end of bitstring trying to read exp-Golomb code",
            ));
        }
        let negative = self.store.get(new_pos);
        let v = if negative {
            -(code as i128)
        } else {
            code as i128
        };
        Ok((v, new_pos + 1))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════

    /// The length in bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the sequence is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Get the bit at position `i`, honouring the lsb0 option.
    pub fn get(&self, i: usize) -> Option<bool> {
        if i >= self.len() {
            return None;
        }
        Some(self.store.get(self.translate_index(i)))
    }

    /// A new sequence of the bits in `start..end` (positions honour lsb0).
    pub fn slice(&self, start: usize, end: usize) -> Result<Bits> {
        let (start, end) = self.validate_range(Some(start), Some(end))?;
        Ok(self.slice_bits(start, end))
    }

    /// Slice without validation, honouring lsb0.
    pub(crate) fn slice_bits(&self, start: usize, end: usize) -> Bits {
        if options::lsb0() {
            let len = self.len();
            Bits {
                store: self.store.slice(len - end, len - start),
            }
        } else {
            Bits {
                store: self.store.slice(start, end),
            }
        }
    }

    /// Slice in msb0 coordinates regardless of the lsb0 option.
    pub(crate) fn slice_abs(&self, start: usize, end: usize) -> Bits {
        Bits {
            store: self.store.slice(start, end),
        }
    }

    /// Find the first occurrence of `pattern`.
    ///
    /// Returns the bit position, or `None` if not found. When `bytealigned`
    /// is `None` the global option is used.
    pub fn find(
        &self,
        pattern: &Bits,
        start: Option<usize>,
        end: Option<usize>,
        bytealigned: Option<bool>,
    ) -> Result<Option<usize>> {
        if pattern.is_empty() {
            return Err(Error::value("cannot find an empty bitstring"));
        }
        let (start, end) = self.validate_range(start, end)?;
        let ba = bytealigned.unwrap_or_else(options::bytealigned);
        if options::lsb0() {
            // A forward find in lsb0 is a reverse find in msb0.
            let len = self.len();
            let p = self.store.rfind(&pattern.store, len - end, len - start, ba);
            Ok(p.map(|p| len - p - pattern.len()))
        } else {
            Ok(self.store.find(&pattern.store, start, end, ba))
        }
    }

    /// Find the final occurrence of `pattern`.
    pub fn rfind(
        &self,
        pattern: &Bits,
        start: Option<usize>,
        end: Option<usize>,
        bytealigned: Option<bool>,
    ) -> Result<Option<usize>> {
        if pattern.is_empty() {
            return Err(Error::value("cannot find an empty bitstring"));
        }
        let (start, end) = self.validate_range(start, end)?;
        let ba = bytealigned.unwrap_or_else(options::bytealigned);
        if options::lsb0() {
            let len = self.len();
            let p = self.store.find(&pattern.store, len - end, len - start, ba);
            Ok(p.map(|p| len - p - pattern.len()))
        } else {
            Ok(self.store.rfind(&pattern.store, start, end, ba))
        }
    }

    /// All occurrences of `pattern`, including overlapping ones.
    pub fn find_all(&self, pattern: &Bits, bytealigned: Option<bool>) -> Result<Vec<usize>> {
        if pattern.is_empty() {
            return Err(Error::value("cannot find an empty bitstring"));
        }
        let ba = bytealigned.unwrap_or_else(options::bytealigned);
        let mut positions = Vec::new();
        let mut start = 0;
        while let Some(p) = self.store.find(&pattern.store, start, self.len(), ba) {
            positions.push(p);
            start = p + 1;
        }
        if options::lsb0() {
            let len = self.len();
            let mut lsb: Vec<usize> = positions
                .into_iter()
                .map(|p| len - p - pattern.len())
                .collect();
            lsb.sort_unstable();
            return Ok(lsb);
        }
        Ok(positions)
    }

    /// Whether the sequence starts with `prefix`.
    pub fn starts_with(&self, prefix: &Bits) -> bool {
        prefix.len() <= self.len() && self.slice_bits(0, prefix.len()) == *prefix
    }

    /// Whether the sequence ends with `suffix`.
    pub fn ends_with(&self, suffix: &Bits) -> bool {
        suffix.len() <= self.len() && self.slice_bits(self.len() - suffix.len(), self.len()) == *suffix
    }

    /// Count of bits equal to `value`.
    pub fn count(&self, value: bool) -> usize {
        let ones = self.store.count_ones();
        if value {
            ones
        } else {
            self.len() - ones
        }
    }

    /// Whether all bits (or all bits at `positions`) equal `value`.
    pub fn all(&self, value: bool, positions: Option<&[usize]>) -> Result<bool> {
        match positions {
            None => Ok(if value {
                self.store.all_set()
            } else {
                !self.store.any_set()
            }),
            Some(ps) => {
                for &p in ps {
                    let bit = self
                        .get(p)
                        .ok_or_else(|| Error::value(format!("bit position {p} out of range")))?;
                    if bit != value {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// Whether any bit (or any bit at `positions`) equals `value`.
    pub fn any(&self, value: bool, positions: Option<&[usize]>) -> Result<bool> {
        match positions {
            None => Ok(if value {
                self.store.any_set()
            } else {
                !self.store.all_set()
            }),
            Some(ps) => {
                for &p in ps {
                    let bit = self
                        .get(p)
                        .ok_or_else(|| Error::value(format!("bit position {p} out of range")))?;
                    if bit == value {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Iterate over the bits as bools (msb0 order).
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.store.iter()
    }

    /// Split into chunks of `size` bits; the final chunk may be shorter.
    pub fn chunks(&self, size: usize) -> Result<Chunks<'_>> {
        if size == 0 {
            return Err(Error::value("cannot cut into chunks of zero bits"));
        }
        Ok(Chunks {
            bits: self,
            pos: 0,
            size,
        })
    }

    /// Split around occurrences of `delimiter`.
    ///
    /// The first item is the (possibly empty) prefix before the first
    /// occurrence; every subsequent item starts with the delimiter.
    pub fn split(&self, delimiter: &Bits, bytealigned: Option<bool>) -> Result<Vec<Bits>> {
        if delimiter.is_empty() {
            return Err(Error::value("split delimiter cannot be empty"));
        }
        let ba = bytealigned.unwrap_or_else(options::bytealigned);
        let mut found = Vec::new();
        let mut pos = 0;
        while let Some(p) = self.store.find(&delimiter.store, pos, self.len(), ba) {
            found.push(p);
            pos = p + delimiter.len();
        }
        let mut out = Vec::with_capacity(found.len() + 1);
        match found.first() {
            None => out.push(self.clone()),
            Some(&first) => {
                out.push(self.slice_abs(0, first));
                for pair in found.windows(2) {
                    out.push(self.slice_abs(pair[0], pair[1]));
                }
                out.push(self.slice_abs(found[found.len() - 1], self.len()));
            }
        }
        Ok(out)
    }

    /// Concatenation of `n` copies of the sequence.
    pub fn repeat(&self, n: usize) -> Bits {
        let mut store = BitStore::new();
        for _ in 0..n {
            store.append(&self.store);
        }
        Bits { store }
    }

    /// Concatenation with another sequence.
    pub fn concat(&self, other: &Bits) -> Bits {
        let mut store = self.store.clone();
        store.append(&other.store);
        Bits { store }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Fallible bitwise operations (the std ops delegate here and panic)
    // ═══════════════════════════════════════════════════════════════════

    /// Bitwise AND. Errors if the lengths differ.
    pub fn and(&self, other: &Bits) -> Result<Bits> {
        self.check_same_len(other, "&")?;
        Ok(Bits {
            store: self.store.bitand(&other.store),
        })
    }

    /// Bitwise OR. Errors if the lengths differ.
    pub fn or(&self, other: &Bits) -> Result<Bits> {
        self.check_same_len(other, "|")?;
        Ok(Bits {
            store: self.store.bitor(&other.store),
        })
    }

    /// Bitwise XOR. Errors if the lengths differ.
    pub fn xor(&self, other: &Bits) -> Result<Bits> {
        self.check_same_len(other, "^")?;
        Ok(Bits {
            store: self.store.bitxor(&other.store),
        })
    }

    /// Every bit inverted. Errors on an empty sequence.
    pub fn inverted(&self) -> Result<Bits> {
        if self.is_empty() {
            return Err(Error::value("cannot invert empty bitstring"));
        }
        let mut store = self.store.clone();
        store.invert_all();
        Ok(Bits { store })
    }

    /// Shift left by `n` with zero fill. Errors on an empty sequence.
    /// Shifting by more than the length gives all zeros.
    pub fn shifted_left(&self, n: usize) -> Result<Bits> {
        if self.is_empty() {
            return Err(Error::value("cannot shift an empty bitstring"));
        }
        let n = n.min(self.len());
        let mut store = self.store.slice(n, self.len());
        store.append(&BitStore::zeros(n));
        Ok(Bits { store })
    }

    /// Shift right by `n` with zero fill. Errors on an empty sequence.
    pub fn shifted_right(&self, n: usize) -> Result<Bits> {
        if self.is_empty() {
            return Err(Error::value("cannot shift an empty bitstring"));
        }
        let n = n.min(self.len());
        let mut store = BitStore::zeros(n);
        store.append(&self.store.slice(0, self.len() - n));
        Ok(Bits { store })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Internal helpers
    // ═══════════════════════════════════════════════════════════════════

    /// Translate a user index to an msb0 store index.
    #[inline]
    pub(crate) fn translate_index(&self, i: usize) -> usize {
        if options::lsb0() {
            self.len() - 1 - i
        } else {
            i
        }
    }

    /// Resolve optional start/end to validated positions.
    pub(crate) fn validate_range(
        &self,
        start: Option<usize>,
        end: Option<usize>,
    ) -> Result<(usize, usize)> {
        let start = start.unwrap_or(0);
        let end = end.unwrap_or(self.len());
        if end > self.len() {
            return Err(Error::value("end is not a valid position in the bitstring"));
        }
        if start > self.len() {
            return Err(Error::value(
                "start is not a valid position in the bitstring",
            ));
        }
        if end < start {
            return Err(Error::value("end must not be less than start"));
        }
        Ok((start, end))
    }

    fn check_same_len(&self, other: &Bits, op: &str) -> Result<()> {
        if self.len() != other.len() {
            return Err(Error::value(format!(
                "bitstrings of differing lengths ({} and {}) cannot be combined with '{op}'",
                self.len(),
                other.len()
            )));
        }
        Ok(())
    }

    fn check_whole_byte(length: usize, what: &str) -> Result<()> {
        if length % 8 != 0 || length == 0 {
            return Err(Error::creation(format!(
                "{what} must be whole-byte, length = {length} bits"
            )));
        }
        Ok(())
    }

    fn check_whole_byte_interpret(&self, what: &str) -> Result<()> {
        if self.len() % 8 != 0 || self.is_empty() {
            return Err(Error::interpret(format!(
                "{what} must be whole-byte, length = {} bits",
                self.len()
            )));
        }
        Ok(())
    }

    fn check_not_lsb0() -> Result<()> {
        if options::lsb0() {
            return Err(Error::creation(
                "exp-Golomb codes cannot be used in lsb0 mode",
            ));
        }
        Ok(())
    }

    fn check_not_lsb0_read() -> Result<()> {
        if options::lsb0() {
            return Err(Error::read("exp-Golomb codes cannot be read in lsb0 mode"));
        }
        Ok(())
    }
}

/// Iterator over fixed-size chunks of a [`Bits`].
pub struct Chunks<'a> {
    bits: &'a Bits,
    pos: usize,
    size: usize,
}

impl Iterator for Chunks<'_> {
    type Item = Bits;

    fn next(&mut self) -> Option<Bits> {
        if self.pos >= self.bits.len() {
            return None;
        }
        let end = (self.pos + self.size).min(self.bits.len());
        let chunk = self.bits.slice_abs(self.pos, end);
        self.pos = end;
        Some(chunk)
    }
}

// ═══════════════════════════════════════════════════════════════════
// Operators. These delegate to the fallible methods and panic where the
// method would error, mirroring the exceptions of the reference behaviour.
// ═══════════════════════════════════════════════════════════════════

impl Add for &Bits {
    type Output = Bits;

    fn add(self, rhs: &Bits) -> Bits {
        self.concat(rhs)
    }
}

impl Add for Bits {
    type Output = Bits;

    fn add(self, rhs: Bits) -> Bits {
        self.concat(&rhs)
    }
}

impl BitAnd for &Bits {
    type Output = Bits;

    /// Panics if the lengths differ; use [`Bits::and`] for a fallible form.
    fn bitand(self, rhs: &Bits) -> Bits {
        self.and(rhs).expect("bitwise and of equal-length bitstrings")
    }
}

impl BitOr for &Bits {
    type Output = Bits;

    /// Panics if the lengths differ; use [`Bits::or`] for a fallible form.
    fn bitor(self, rhs: &Bits) -> Bits {
        self.or(rhs).expect("bitwise or of equal-length bitstrings")
    }
}

impl BitXor for &Bits {
    type Output = Bits;

    /// Panics if the lengths differ; use [`Bits::xor`] for a fallible form.
    fn bitxor(self, rhs: &Bits) -> Bits {
        self.xor(rhs).expect("bitwise xor of equal-length bitstrings")
    }
}

impl Not for &Bits {
    type Output = Bits;

    /// Panics on an empty sequence; use [`Bits::inverted`] for a fallible
    /// form.
    fn not(self) -> Bits {
        self.inverted().expect("invert of non-empty bitstring")
    }
}

impl Shl<usize> for &Bits {
    type Output = Bits;

    /// Panics on an empty sequence; use [`Bits::shifted_left`] for a
    /// fallible form.
    fn shl(self, n: usize) -> Bits {
        self.shifted_left(n).expect("shift of non-empty bitstring")
    }
}

impl Shr<usize> for &Bits {
    type Output = Bits;

    /// Panics on an empty sequence; use [`Bits::shifted_right`] for a
    /// fallible form.
    fn shr(self, n: usize) -> Bits {
        self.shifted_right(n).expect("shift of non-empty bitstring")
    }
}

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Reverse a byte vector (for little-endian interpretations).
fn reverse_bytes(mut bytes: Vec<u8>) -> Vec<u8> {
    bytes.reverse();
    bytes
}

// ═══════════════════════════════════════════════════════════════════
// Half-precision helpers (binary16 has no native Rust type)
// ═══════════════════════════════════════════════════════════════════

/// Encode an f64 as IEEE binary16 bits, rounding to nearest even.
pub(crate) fn f64_to_f16_bits(value: f64) -> u16 {
    let bits = (value as f32).to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exp = ((bits >> 23) & 0xff) as i32;
    let frac = bits & 0x007f_ffff;
    if exp == 255 {
        // Infinity or NaN
        return sign | 0x7c00 | if frac != 0 { 0x0200 } else { 0 };
    }
    let exp16 = exp - 127 + 15;
    if exp16 >= 31 {
        return sign | 0x7c00; // Overflow to infinity
    }
    if exp16 <= 0 {
        if exp16 < -10 {
            return sign; // Underflow to zero
        }
        let frac = frac | 0x0080_0000;
        let shift = (14 - exp16) as u32;
        let mut sub = (frac >> shift) as u16;
        let rem = frac & ((1u32 << shift) - 1);
        let half = 1u32 << (shift - 1);
        if rem > half || (rem == half && sub & 1 == 1) {
            sub += 1;
        }
        return sign | sub;
    }
    let mut out = sign | ((exp16 as u16) << 10) | ((frac >> 13) as u16);
    let rem = frac & 0x1fff;
    if rem > 0x1000 || (rem == 0x1000 && out & 1 == 1) {
        out += 1; // A carry here correctly rolls into the exponent
    }
    out
}

/// Decode IEEE binary16 bits to an f64.
pub(crate) fn f16_bits_to_f64(bits: u16) -> f64 {
    let sign = bits >> 15 == 1;
    let exp = ((bits >> 10) & 0x1f) as i32;
    let frac = (bits & 0x3ff) as f64;
    let mag = match exp {
        0 => frac * 2f64.powi(-24),
        31 => {
            if frac == 0.0 {
                f64::INFINITY
            } else {
                f64::NAN
            }
        }
        _ => (1.0 + frac / 1024.0) * 2f64.powi(exp - 15),
    };
    if sign {
        -mag
    } else {
        mag
    }
}
