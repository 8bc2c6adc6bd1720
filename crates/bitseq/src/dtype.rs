//! Data types for interpreting and building bit sequences
//!
//! A [`Dtype`] pairs a kind of interpretation (unsigned int, IEEE float,
//! hex characters and so on) with an optional length. Dtypes are parsed
//! from token strings such as `"u12"`, `"floatle32"` or `"hex"` and drive
//! reading in [`BitReader`](crate::BitReader), packing, and the element
//! type of [`Array`](crate::Array).

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::bits::Bits;
use crate::error::{Error, Result};
use crate::tokens;

/// The interpretation a [`Dtype`] applies to bits.
///
/// Native-endian names (`uintne` and friends) resolve to the big or little
/// endian kind for the build target when parsed, so no native variants
/// appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DtypeKind {
    /// Unsigned integer, most significant bit first
    Uint,
    /// Two's complement signed integer
    Int,
    /// Big-endian unsigned integer, whole bytes
    UintBe,
    /// Little-endian unsigned integer, whole bytes
    UintLe,
    /// Big-endian signed integer, whole bytes
    IntBe,
    /// Little-endian signed integer, whole bytes
    IntLe,
    /// Big-endian IEEE float (16, 32 or 64 bits)
    Float,
    /// Little-endian IEEE float
    FloatLe,
    /// Big-endian bfloat16
    BFloat,
    /// Little-endian bfloat16
    BFloatLe,
    /// Hexadecimal characters, four bits each
    Hex,
    /// Octal characters, three bits each
    Oct,
    /// Binary characters
    Bin,
    /// Raw bytes (lengths are in bytes, not bits)
    Bytes,
    /// A single bit as a bool
    Bool,
    /// Bits skipped over and not returned
    Pad,
    /// Bits returned unchanged
    Bits,
    /// Unsigned exponential-Golomb code
    Ue,
    /// Signed exponential-Golomb code
    Se,
    /// Unsigned interleaved exponential-Golomb code
    Uie,
    /// Signed interleaved exponential-Golomb code
    Sie,
    /// 8-bit 1-4-3 float
    P4Binary,
    /// 8-bit 1-5-2 float
    P3Binary,
}

impl DtypeKind {
    /// The canonical token name.
    pub fn name(self) -> &'static str {
        match self {
            DtypeKind::Uint => "uint",
            DtypeKind::Int => "int",
            DtypeKind::UintBe => "uintbe",
            DtypeKind::UintLe => "uintle",
            DtypeKind::IntBe => "intbe",
            DtypeKind::IntLe => "intle",
            DtypeKind::Float => "float",
            DtypeKind::FloatLe => "floatle",
            DtypeKind::BFloat => "bfloat",
            DtypeKind::BFloatLe => "bfloatle",
            DtypeKind::Hex => "hex",
            DtypeKind::Oct => "oct",
            DtypeKind::Bin => "bin",
            DtypeKind::Bytes => "bytes",
            DtypeKind::Bool => "bool",
            DtypeKind::Pad => "pad",
            DtypeKind::Bits => "bits",
            DtypeKind::Ue => "ue",
            DtypeKind::Se => "se",
            DtypeKind::Uie => "uie",
            DtypeKind::Sie => "sie",
            DtypeKind::P4Binary => "p4binary",
            DtypeKind::P3Binary => "p3binary",
        }
    }

    /// Whether this kind has an integer value.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            DtypeKind::Uint
                | DtypeKind::Int
                | DtypeKind::UintBe
                | DtypeKind::UintLe
                | DtypeKind::IntBe
                | DtypeKind::IntLe
                | DtypeKind::Ue
                | DtypeKind::Se
                | DtypeKind::Uie
                | DtypeKind::Sie
        )
    }

    /// Whether this kind has a float value.
    pub fn is_float(self) -> bool {
        matches!(
            self,
            DtypeKind::Float
                | DtypeKind::FloatLe
                | DtypeKind::BFloat
                | DtypeKind::BFloatLe
                | DtypeKind::P4Binary
                | DtypeKind::P3Binary
        )
    }

    /// Whether this kind has a signed value.
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            DtypeKind::Int | DtypeKind::IntBe | DtypeKind::IntLe | DtypeKind::Se | DtypeKind::Sie
        ) || self.is_float()
    }

    /// Whether the length of an encoded value is only known once read.
    pub fn is_variable_length(self) -> bool {
        matches!(
            self,
            DtypeKind::Ue | DtypeKind::Se | DtypeKind::Uie | DtypeKind::Sie
        )
    }

    /// Bits per unit of token length (a "hex" item is a character, a
    /// "bytes" item is a byte).
    pub fn bits_per_item(self) -> usize {
        match self {
            DtypeKind::Hex => 4,
            DtypeKind::Oct => 3,
            DtypeKind::Bytes => 8,
            _ => 1,
        }
    }

    /// The length this kind is fixed to, if any, in token units.
    fn fixed_length(self) -> Option<usize> {
        match self {
            DtypeKind::Bool => Some(1),
            DtypeKind::BFloat | DtypeKind::BFloatLe => Some(16),
            DtypeKind::P4Binary | DtypeKind::P3Binary => Some(8),
            _ => None,
        }
    }
}

/// A data type: an interpretation kind plus an optional length.
///
/// Lengths are in bits apart from the `bytes` kind, whose lengths count
/// bytes. A missing length makes the dtype *stretchy*: in unpacking it
/// takes whatever bits are left over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dtype {
    kind: DtypeKind,
    length: Option<usize>,
}

impl Dtype {
    /// Create a dtype, validating the length against the kind.
    pub fn new(kind: DtypeKind, length: Option<usize>) -> Result<Self> {
        if kind.is_variable_length() {
            if length.is_some() {
                return Err(Error::creation(format!(
                    "a length cannot be given for the exp-Golomb type '{}'",
                    kind.name()
                )));
            }
            return Ok(Self { kind, length: None });
        }
        // Fixed-length kinds allow the length to be omitted or repeated.
        if let Some(fixed) = kind.fixed_length() {
            return match length {
                None => Ok(Self {
                    kind,
                    length: Some(fixed),
                }),
                Some(l) if l == fixed => Ok(Self { kind, length: Some(l) }),
                Some(l) => Err(Error::creation(format!(
                    "'{}' is always {fixed} bits long, a length of {l} was given",
                    kind.name()
                ))),
            };
        }
        if let Some(l) = length {
            match kind {
                DtypeKind::Uint | DtypeKind::Int => {
                    if l == 0 || l > 128 {
                        return Err(Error::creation(format!(
                            "'{}' lengths must be in the range 1 to 128, got {l}",
                            kind.name()
                        )));
                    }
                }
                DtypeKind::UintBe | DtypeKind::UintLe | DtypeKind::IntBe | DtypeKind::IntLe => {
                    if l == 0 || l % 8 != 0 || l > 128 {
                        return Err(Error::creation(format!(
                            "'{}' lengths must be non-zero whole bytes up to 128 bits, got {l}",
                            kind.name()
                        )));
                    }
                }
                DtypeKind::Float | DtypeKind::FloatLe => {
                    if ![16, 32, 64].contains(&l) {
                        return Err(Error::creation(format!(
                            "'{}' lengths must be 16, 32 or 64, got {l}",
                            kind.name()
                        )));
                    }
                }
                DtypeKind::Hex => {
                    if l % 4 != 0 {
                        return Err(Error::creation(format!(
                            "'hex' lengths must be a multiple of 4 bits, got {l}"
                        )));
                    }
                }
                DtypeKind::Oct => {
                    if l % 3 != 0 {
                        return Err(Error::creation(format!(
                            "'oct' lengths must be a multiple of 3 bits, got {l}"
                        )));
                    }
                }
                DtypeKind::Pad => {
                    if l == 0 {
                        return Err(Error::creation("'pad' needs a non-zero length"));
                    }
                }
                _ => {}
            }
        } else if kind == DtypeKind::Pad {
            return Err(Error::creation("'pad' needs a length"));
        }
        Ok(Self { kind, length })
    }

    /// Parse a single token such as `"u12"`, `"floatle32"` or `"hex"`.
    pub fn parse(token: &str) -> Result<Self> {
        let (name, length) = tokens::parse_name_length_token(token)?;
        let kind = lookup_kind(&name)?;
        Self::new(kind, length)
    }

    /// The interpretation kind.
    pub fn kind(&self) -> DtypeKind {
        self.kind
    }

    /// The length in token units, if fixed.
    pub fn length(&self) -> Option<usize> {
        self.length
    }

    /// The length in bits, if it is known before reading.
    pub fn bit_length(&self) -> Option<usize> {
        let scale = if self.kind == DtypeKind::Bytes { 8 } else { 1 };
        self.length.map(|l| l * scale)
    }

    /// Whether this dtype soaks up leftover bits when unpacking.
    pub fn is_stretchy(&self) -> bool {
        self.length.is_none() && !self.kind.is_variable_length()
    }

    /// Read a value at `pos`, returning it and the position after it.
    pub fn read(&self, bits: &Bits, pos: usize) -> Result<(DtypeValue, usize)> {
        match self.kind {
            DtypeKind::Ue => {
                let (v, p) = bits.read_ue(pos)?;
                return Ok((DtypeValue::Uint(v), p));
            }
            DtypeKind::Se => {
                let (v, p) = bits.read_se(pos)?;
                return Ok((DtypeValue::Int(v), p));
            }
            DtypeKind::Uie => {
                let (v, p) = bits.read_uie(pos)?;
                return Ok((DtypeValue::Uint(v), p));
            }
            DtypeKind::Sie => {
                let (v, p) = bits.read_sie(pos)?;
                return Ok((DtypeValue::Int(v), p));
            }
            _ => {}
        }
        let n = self.bit_length().ok_or_else(|| {
            Error::read(format!(
                "'{}' needs a length before it can be read",
                self.kind.name()
            ))
        })?;
        if pos + n > bits.len() {
            return Err(Error::read(format!(
                "reading off the end of the data: needed {n} bits at position {pos}, but only {} available",
                bits.len().saturating_sub(pos)
            )));
        }
        let value = self.interpret(&bits.slice_abs(pos, pos + n))?;
        Ok((value, pos + n))
    }

    /// Interpret a whole bit sequence as a value of this dtype.
    ///
    /// If the dtype has a length it must match the sequence exactly.
    pub fn get(&self, bits: &Bits) -> Result<DtypeValue> {
        if self.kind.is_variable_length() {
            let (value, end) = self.read(bits, 0)?;
            if end != bits.len() {
                return Err(Error::interpret(format!(
                    "exp-Golomb code ended at bit {end} of {}",
                    bits.len()
                )));
            }
            return Ok(value);
        }
        if let Some(n) = self.bit_length() {
            if n != bits.len() {
                return Err(Error::interpret(format!(
                    "dtype '{self}' is {n} bits long, but got {} bits",
                    bits.len()
                )));
            }
        }
        self.interpret(bits)
    }

    fn interpret(&self, bits: &Bits) -> Result<DtypeValue> {
        let value = match self.kind {
            DtypeKind::Uint => DtypeValue::Uint(bits.to_uint()?),
            DtypeKind::Int => DtypeValue::Int(bits.to_int()?),
            DtypeKind::UintBe => DtypeValue::Uint(bits.to_uint_be()?),
            DtypeKind::UintLe => DtypeValue::Uint(bits.to_uint_le()?),
            DtypeKind::IntBe => DtypeValue::Int(bits.to_int_be()?),
            DtypeKind::IntLe => DtypeValue::Int(bits.to_int_le()?),
            DtypeKind::Float => DtypeValue::Float(bits.to_f64()?),
            DtypeKind::FloatLe => DtypeValue::Float(bits.to_f64_le()?),
            DtypeKind::BFloat => DtypeValue::Float(bits.to_bfloat()?),
            DtypeKind::BFloatLe => DtypeValue::Float(bits.to_bfloat_le()?),
            DtypeKind::P4Binary => DtypeValue::Float(bits.to_p4binary()?),
            DtypeKind::P3Binary => DtypeValue::Float(bits.to_p3binary()?),
            DtypeKind::Hex => DtypeValue::String(bits.to_hex()?),
            DtypeKind::Oct => DtypeValue::String(bits.to_oct()?),
            DtypeKind::Bin => DtypeValue::String(bits.to_bin()),
            DtypeKind::Bytes => DtypeValue::Bytes(bits.to_bytes_exact()?),
            DtypeKind::Bool => DtypeValue::Bool(bits.to_bool()?),
            DtypeKind::Pad => DtypeValue::None,
            DtypeKind::Bits => DtypeValue::Bits(bits.clone()),
            DtypeKind::Ue | DtypeKind::Se | DtypeKind::Uie | DtypeKind::Sie => {
                unreachable!("exp-Golomb kinds are handled in read and get")
            }
        };
        Ok(value)
    }

    /// Build a bit sequence from a value of this dtype.
    pub fn build(&self, value: &DtypeValue) -> Result<Bits> {
        let n = self.bit_length();
        match self.kind {
            DtypeKind::Uint => Bits::from_uint(value.to_u128()?, self.require_length()?),
            DtypeKind::Int => Bits::from_int(value.to_i128()?, self.require_length()?),
            DtypeKind::UintBe => Bits::from_uint_be(value.to_u128()?, self.require_length()?),
            DtypeKind::UintLe => Bits::from_uint_le(value.to_u128()?, self.require_length()?),
            DtypeKind::IntBe => Bits::from_int_be(value.to_i128()?, self.require_length()?),
            DtypeKind::IntLe => Bits::from_int_le(value.to_i128()?, self.require_length()?),
            DtypeKind::Float => Bits::from_f64(value.to_f64()?, self.require_length()?),
            DtypeKind::FloatLe => Bits::from_f64_le(value.to_f64()?, self.require_length()?),
            DtypeKind::BFloat => Ok(Bits::from_bfloat(value.to_f64()?)),
            DtypeKind::BFloatLe => Ok(Bits::from_bfloat_le(value.to_f64()?)),
            DtypeKind::P4Binary => Ok(Bits::from_p4binary(value.to_f64()?)),
            DtypeKind::P3Binary => Ok(Bits::from_p3binary(value.to_f64()?)),
            DtypeKind::Ue => Bits::from_ue(value.to_u128()?),
            DtypeKind::Se => Bits::from_se(value.to_i128()?),
            DtypeKind::Uie => Bits::from_uie(value.to_u128()?),
            DtypeKind::Sie => Bits::from_sie(value.to_i128()?),
            DtypeKind::Bool => Ok(Bits::from_bool(value.to_bool()?)),
            DtypeKind::Pad => Ok(Bits::zeros(self.require_length()?)),
            DtypeKind::Hex => {
                let bits = Bits::from_hex(value.as_str().ok_or_else(|| type_mismatch(self, value))?)?;
                self.check_built_length(bits, n)
            }
            DtypeKind::Oct => {
                let bits = Bits::from_oct(value.as_str().ok_or_else(|| type_mismatch(self, value))?)?;
                self.check_built_length(bits, n)
            }
            DtypeKind::Bin => {
                let bits = Bits::from_bin(value.as_str().ok_or_else(|| type_mismatch(self, value))?)?;
                self.check_built_length(bits, n)
            }
            DtypeKind::Bytes => {
                let bits = Bits::from_bytes(
                    value
                        .as_bytes()
                        .ok_or_else(|| type_mismatch(self, value))?
                        .to_vec(),
                );
                self.check_built_length(bits, n)
            }
            DtypeKind::Bits => {
                let bits = value
                    .as_bits()
                    .ok_or_else(|| type_mismatch(self, value))?
                    .clone();
                self.check_built_length(bits, n)
            }
        }
    }

    /// Build from a token's value string, for example the `"352"` of
    /// `"u12=352"`.
    pub fn build_from_str(&self, s: &str) -> Result<Bits> {
        let value = match self.kind {
            DtypeKind::Uint
            | DtypeKind::UintBe
            | DtypeKind::UintLe
            | DtypeKind::Ue
            | DtypeKind::Uie => {
                let v = parse_int_auto(s)?;
                DtypeValue::Uint(u128::try_from(v).map_err(|_| {
                    Error::creation(format!("'{s}' is negative, '{}' is unsigned", self.kind.name()))
                })?)
            }
            DtypeKind::Int | DtypeKind::IntBe | DtypeKind::IntLe | DtypeKind::Se | DtypeKind::Sie => {
                DtypeValue::Int(parse_int_auto(s)?)
            }
            DtypeKind::Float
            | DtypeKind::FloatLe
            | DtypeKind::BFloat
            | DtypeKind::BFloatLe
            | DtypeKind::P4Binary
            | DtypeKind::P3Binary => DtypeValue::Float(s.parse::<f64>().map_err(|_| {
                Error::creation(format!("cannot parse '{s}' as a float value"))
            })?),
            DtypeKind::Bool => DtypeValue::Bool(match s {
                "1" | "True" | "true" => true,
                "0" | "False" | "false" => false,
                _ => {
                    return Err(Error::creation(format!(
                        "cannot parse '{s}' as a bool value"
                    )))
                }
            }),
            DtypeKind::Hex | DtypeKind::Oct | DtypeKind::Bin => {
                DtypeValue::String(s.to_string())
            }
            DtypeKind::Bits => DtypeValue::Bits(Bits::parse(s)?),
            DtypeKind::Bytes | DtypeKind::Pad => {
                return Err(Error::creation(format!(
                    "a '{}' token cannot be given a string value",
                    self.kind.name()
                )))
            }
        };
        self.build(&value)
    }

    fn require_length(&self) -> Result<usize> {
        self.bit_length().ok_or_else(|| {
            Error::creation(format!(
                "'{}' needs a length before a value can be built",
                self.kind.name()
            ))
        })
    }

    fn check_built_length(&self, bits: Bits, expected: Option<usize>) -> Result<Bits> {
        match expected {
            Some(n) if bits.len() != n => Err(Error::creation(format!(
                "built value is {} bits long, but dtype '{self}' needs {n}",
                bits.len()
            ))),
            _ => Ok(bits),
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.length {
            Some(l) if self.kind.fixed_length().is_none() => {
                write!(f, "{}{}", self.kind.name(), l)
            }
            _ => write!(f, "{}", self.kind.name()),
        }
    }
}

fn type_mismatch(dtype: &Dtype, value: &DtypeValue) -> Error {
    Error::creation(format!(
        "cannot build dtype '{dtype}' from a {} value",
        value.type_name()
    ))
}

/// Parse an integer, accepting `0x`, `0o` and `0b` prefixes and a sign.
fn parse_int_auto(s: &str) -> Result<i128> {
    let cleaned = s.replace('_', "");
    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    let parsed = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        i128::from_str_radix(hex, 16)
    } else if let Some(oct) = body.strip_prefix("0o").or_else(|| body.strip_prefix("0O")) {
        i128::from_str_radix(oct, 8)
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        i128::from_str_radix(bin, 2)
    } else {
        body.parse::<i128>()
    };
    let v = parsed.map_err(|_| Error::creation(format!("cannot parse '{s}' as an integer")))?;
    Ok(if negative { -v } else { v })
}

// ═══════════════════════════════════════════════════════════════════
// Values
// ═══════════════════════════════════════════════════════════════════

/// A value read from or written as bits.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DtypeValue {
    /// An unsigned integer
    Uint(u128),
    /// A signed integer
    Int(i128),
    /// A float
    Float(f64),
    /// A bool
    Bool(bool),
    /// A string of hex, octal or binary characters
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// A bit sequence
    Bits(Bits),
    /// No value (produced by `pad` tokens)
    #[default]
    None,
}

impl DtypeValue {
    /// A short name for the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            DtypeValue::Uint(_) => "uint",
            DtypeValue::Int(_) => "int",
            DtypeValue::Float(_) => "float",
            DtypeValue::Bool(_) => "bool",
            DtypeValue::String(_) => "string",
            DtypeValue::Bytes(_) => "bytes",
            DtypeValue::Bits(_) => "bits",
            DtypeValue::None => "none",
        }
    }

    /// The unsigned integer, if that is what this is.
    pub fn as_uint(&self) -> Option<u128> {
        match self {
            DtypeValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// The signed integer, if that is what this is.
    pub fn as_int(&self) -> Option<i128> {
        match self {
            DtypeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The float, if that is what this is.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DtypeValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The bool, if that is what this is.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DtypeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The string, if that is what this is.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DtypeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The bytes, if that is what this is.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            DtypeValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The bit sequence, if that is what this is.
    pub fn as_bits(&self) -> Option<&Bits> {
        match self {
            DtypeValue::Bits(b) => Some(b),
            _ => None,
        }
    }

    /// Whether this is the none value.
    pub fn is_none(&self) -> bool {
        matches!(self, DtypeValue::None)
    }

    /// Coerce to an unsigned integer, converting between the numeric
    /// variants where the value allows it.
    pub fn to_u128(&self) -> Result<u128> {
        match self {
            DtypeValue::Uint(v) => Ok(*v),
            DtypeValue::Int(v) => u128::try_from(*v)
                .map_err(|_| Error::creation(format!("{v} cannot be used as an unsigned value"))),
            DtypeValue::Bool(b) => Ok(*b as u128),
            _ => Err(Error::creation(format!(
                "a {} value cannot be used as an integer",
                self.type_name()
            ))),
        }
    }

    /// Coerce to a signed integer.
    pub fn to_i128(&self) -> Result<i128> {
        match self {
            DtypeValue::Int(v) => Ok(*v),
            DtypeValue::Uint(v) => i128::try_from(*v)
                .map_err(|_| Error::creation(format!("{v} is too large for a signed value"))),
            DtypeValue::Bool(b) => Ok(*b as i128),
            _ => Err(Error::creation(format!(
                "a {} value cannot be used as an integer",
                self.type_name()
            ))),
        }
    }

    /// Coerce to a float, accepting the integer variants.
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            DtypeValue::Float(v) => Ok(*v),
            DtypeValue::Uint(v) => Ok(*v as f64),
            DtypeValue::Int(v) => Ok(*v as f64),
            _ => Err(Error::creation(format!(
                "a {} value cannot be used as a float",
                self.type_name()
            ))),
        }
    }

    /// Coerce to a bool. Only the bool variant qualifies.
    pub fn to_bool(&self) -> Result<bool> {
        self.as_bool().ok_or_else(|| {
            Error::creation(format!(
                "a {} value cannot be used as a bool",
                self.type_name()
            ))
        })
    }
}

impl fmt::Display for DtypeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DtypeValue::Uint(v) => write!(f, "{v}"),
            DtypeValue::Int(v) => write!(f, "{v}"),
            DtypeValue::Float(v) => write!(f, "{v}"),
            DtypeValue::Bool(v) => write!(f, "{v}"),
            DtypeValue::String(s) => write!(f, "{s}"),
            DtypeValue::Bytes(b) => write!(f, "{b:?}"),
            DtypeValue::Bits(b) => write!(f, "{b}"),
            DtypeValue::None => Ok(()),
        }
    }
}

impl From<u128> for DtypeValue {
    fn from(v: u128) -> Self {
        DtypeValue::Uint(v)
    }
}

impl From<u64> for DtypeValue {
    fn from(v: u64) -> Self {
        DtypeValue::Uint(v as u128)
    }
}

impl From<i128> for DtypeValue {
    fn from(v: i128) -> Self {
        DtypeValue::Int(v)
    }
}

impl From<i64> for DtypeValue {
    fn from(v: i64) -> Self {
        DtypeValue::Int(v as i128)
    }
}

impl From<f64> for DtypeValue {
    fn from(v: f64) -> Self {
        DtypeValue::Float(v)
    }
}

impl From<bool> for DtypeValue {
    fn from(v: bool) -> Self {
        DtypeValue::Bool(v)
    }
}

impl From<&str> for DtypeValue {
    fn from(v: &str) -> Self {
        DtypeValue::String(v.to_string())
    }
}

impl From<Vec<u8>> for DtypeValue {
    fn from(v: Vec<u8>) -> Self {
        DtypeValue::Bytes(v)
    }
}

impl From<Bits> for DtypeValue {
    fn from(v: Bits) -> Self {
        DtypeValue::Bits(v)
    }
}

// ═══════════════════════════════════════════════════════════════════
// Name registry
// ═══════════════════════════════════════════════════════════════════

/// Token name to kind, including the single-letter and endianness aliases.
pub(crate) fn registry() -> &'static IndexMap<&'static str, DtypeKind> {
    static REGISTRY: OnceLock<IndexMap<&'static str, DtypeKind>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let native_uint = if cfg!(target_endian = "little") {
            DtypeKind::UintLe
        } else {
            DtypeKind::UintBe
        };
        let native_int = if cfg!(target_endian = "little") {
            DtypeKind::IntLe
        } else {
            DtypeKind::IntBe
        };
        let native_float = if cfg!(target_endian = "little") {
            DtypeKind::FloatLe
        } else {
            DtypeKind::Float
        };
        let native_bfloat = if cfg!(target_endian = "little") {
            DtypeKind::BFloatLe
        } else {
            DtypeKind::BFloat
        };
        IndexMap::from([
            ("uint", DtypeKind::Uint),
            ("u", DtypeKind::Uint),
            ("int", DtypeKind::Int),
            ("i", DtypeKind::Int),
            ("uintbe", DtypeKind::UintBe),
            ("uintle", DtypeKind::UintLe),
            ("uintne", native_uint),
            ("intbe", DtypeKind::IntBe),
            ("intle", DtypeKind::IntLe),
            ("intne", native_int),
            ("float", DtypeKind::Float),
            ("floatbe", DtypeKind::Float),
            ("f", DtypeKind::Float),
            ("floatle", DtypeKind::FloatLe),
            ("floatne", native_float),
            ("bfloat", DtypeKind::BFloat),
            ("bfloatbe", DtypeKind::BFloat),
            ("bfloatle", DtypeKind::BFloatLe),
            ("bfloatne", native_bfloat),
            ("hex", DtypeKind::Hex),
            ("h", DtypeKind::Hex),
            ("oct", DtypeKind::Oct),
            ("o", DtypeKind::Oct),
            ("bin", DtypeKind::Bin),
            ("b", DtypeKind::Bin),
            ("bytes", DtypeKind::Bytes),
            ("bool", DtypeKind::Bool),
            ("pad", DtypeKind::Pad),
            ("bits", DtypeKind::Bits),
            ("ue", DtypeKind::Ue),
            ("se", DtypeKind::Se),
            ("uie", DtypeKind::Uie),
            ("sie", DtypeKind::Sie),
            ("p4binary", DtypeKind::P4Binary),
            ("e4m3float", DtypeKind::P4Binary),
            ("p3binary", DtypeKind::P3Binary),
            ("e5m2float", DtypeKind::P3Binary),
        ])
    })
}

pub(crate) fn lookup_kind(name: &str) -> Result<DtypeKind> {
    registry()
        .get(name)
        .copied()
        .ok_or_else(|| Error::value(format!("unknown dtype name '{name}'")))
}
