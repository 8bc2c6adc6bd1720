//! Packing and unpacking with format strings
//!
//! [`pack`] builds a bit sequence from a format string and a list of
//! values; [`Bits::unpack`] is its inverse. A format may contain at most
//! one *stretchy* token (one with no length), which soaks up whatever bits
//! the fixed-length tokens leave over.

use crate::bits::Bits;
use crate::dtype::{Dtype, DtypeKind, DtypeValue};
use crate::error::{Error, Result};
use crate::tokens::{self, Token};

/// Build a bit sequence from a format string and values.
///
/// Literal tokens (`"0xff"`) and value tokens (`"u8=5"`) consume no
/// values from the list; every other token takes the next one in turn.
///
/// # Example
///
/// ```
/// use bitseq::{pack, DtypeValue};
///
/// let b = pack("u12, hex8, 0b1", &[352u64.into(), "3f".into()])?;
/// assert_eq!(b.len(), 21);
/// # Ok::<(), bitseq::Error>(())
/// ```
pub fn pack(fmt: &str, values: &[DtypeValue]) -> Result<Bits> {
    let tokens = tokens::tokenparser(fmt)?;
    let mut out = Bits::new();
    let mut next = 0usize;
    for token in &tokens {
        if token.is_literal() {
            out = out.concat(&build_literal(token)?);
            continue;
        }
        let dtype = token_dtype(token)?;
        if let Some(value) = &token.value {
            out = out.concat(&dtype.build_from_str(value)?);
            continue;
        }
        if dtype.kind() == DtypeKind::Pad {
            out = out.concat(&dtype.build(&DtypeValue::None)?);
            continue;
        }
        let value = values.get(next).ok_or_else(|| {
            Error::creation(format!(
                "not enough values to pack '{fmt}': needed more than {}",
                values.len()
            ))
        })?;
        next += 1;
        out = out.concat(&dtype.build(value)?);
    }
    if next != values.len() {
        return Err(Error::creation(format!(
            "too many values to pack '{fmt}': {} given, {next} used",
            values.len()
        )));
    }
    Ok(out)
}

impl Bits {
    /// Create from a formatted string such as `"0x1f"`, `"u12=352"` or
    /// `"0b110, 0o7, pad:2"`.
    pub fn parse(s: &str) -> Result<Bits> {
        let tokens = tokens::tokenparser(s)?;
        let mut out = Bits::new();
        for token in &tokens {
            if token.is_literal() {
                out = out.concat(&build_literal(token)?);
                continue;
            }
            let dtype = token_dtype(token)?;
            match &token.value {
                Some(value) => out = out.concat(&dtype.build_from_str(value)?),
                None if dtype.kind() == DtypeKind::Pad => {
                    out = out.concat(&dtype.build(&DtypeValue::None)?)
                }
                None => {
                    return Err(Error::creation(format!(
                        "token '{token:?}' needs a value to initialise from a string"
                    )))
                }
            }
        }
        Ok(out)
    }

    /// Interpret the bits according to a format string.
    ///
    /// Values are returned in token order; `pad` tokens skip their bits
    /// and return nothing.
    pub fn unpack(&self, fmt: &str) -> Result<Vec<DtypeValue>> {
        let tokens = tokens::tokenparser(fmt)?;
        let (values, _) = read_format(self, 0, self.len(), &tokens)?;
        Ok(values)
    }
}

/// Read a token list starting at `pos`, with `end` bounding the bits a
/// stretchy token may take. Returns the values and the final position.
pub(crate) fn read_format(
    bits: &Bits,
    pos: usize,
    end: usize,
    tokens: &[Token],
) -> Result<(Vec<DtypeValue>, usize)> {
    let dtypes: Vec<Dtype> = tokens
        .iter()
        .map(|t| {
            if t.is_literal() || t.value.is_some() {
                Err(Error::read(
                    "literal and value tokens cannot be used when reading",
                ))
            } else {
                token_dtype(t)
            }
        })
        .collect::<Result<_>>()?;

    let mut values = Vec::new();
    let mut p = pos;
    for (i, dtype) in dtypes.iter().enumerate() {
        let concrete;
        let dtype = if dtype.is_stretchy() {
            let leftover = stretchy_leftover(dtype, &dtypes[i + 1..], p, end)?;
            concrete = stretchy_dtype(dtype, leftover)?;
            &concrete
        } else {
            dtype
        };
        let (value, new_pos) = dtype.read(bits, p)?;
        p = new_pos;
        if dtype.kind() != DtypeKind::Pad {
            values.push(value);
        }
    }
    Ok((values, p))
}

/// Work out how many bits a stretchy token at position `pos` gets: whatever
/// the fixed tokens after it leave over. Everything after it must have a
/// known length.
fn stretchy_leftover(stretchy: &Dtype, rest: &[Dtype], pos: usize, end: usize) -> Result<usize> {
    let mut after = 0usize;
    for dtype in rest {
        if dtype.is_stretchy() {
            return Err(Error::read(
                "the format is ambiguous - more than one stretchy token",
            ));
        }
        after += dtype.bit_length().ok_or_else(|| {
            Error::read("a variable-length token cannot follow a stretchy token")
        })?;
    }
    let available = end.saturating_sub(pos);
    if after > available {
        return Err(Error::read(format!(
            "not enough bits: the fixed tokens need {after}, only {available} available"
        )));
    }
    let leftover = available - after;
    let per_item = stretchy.kind().bits_per_item();
    if leftover % per_item != 0 {
        return Err(Error::read(format!(
            "the leftover {leftover} bits do not fit a whole number of '{}' items",
            stretchy.kind().name()
        )));
    }
    Ok(leftover)
}

/// A concrete dtype for a stretchy token given its share of the bits.
fn stretchy_dtype(dtype: &Dtype, bit_len: usize) -> Result<Dtype> {
    let length = if dtype.kind() == DtypeKind::Bytes {
        bit_len / 8
    } else {
        bit_len
    };
    Dtype::new(dtype.kind(), Some(length))
}

fn token_dtype(token: &Token) -> Result<Dtype> {
    Dtype::new(tokens::token_kind(token)?, token.length)
}

fn build_literal(token: &Token) -> Result<Bits> {
    let value = token.value.as_deref().unwrap_or("");
    match token.name.as_str() {
        "0x" => Bits::from_hex(value),
        "0o" => Bits::from_oct(value),
        "0b" => Bits::from_bin(value),
        _ => Err(Error::creation(format!(
            "unknown literal prefix '{}'",
            token.name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_simple() {
        let b = pack("u8, u8", &[1u64.into(), 2u64.into()]).unwrap();
        assert_eq!(b.to_hex().unwrap(), "0102");
    }

    #[test]
    fn test_pack_literals_take_no_values() {
        let b = pack("0xff, u8=3, u4", &[9u64.into()]).unwrap();
        assert_eq!(b.len(), 20);
        assert_eq!(b.slice(16, 20).unwrap().to_uint().unwrap(), 9);
    }

    #[test]
    fn test_pack_value_count_errors() {
        assert!(pack("u8", &[]).is_err());
        assert!(pack("u8", &[1u64.into(), 2u64.into()]).is_err());
    }

    #[test]
    fn test_unpack_round_trip() {
        let b = pack("u12, i12", &[100u64.into(), (-100i64).into()]).unwrap();
        let values = b.unpack("u12, i12").unwrap();
        assert_eq!(values, vec![DtypeValue::Uint(100), DtypeValue::Int(-100)]);
    }

    #[test]
    fn test_unpack_stretchy() {
        let b = Bits::from_hex("0x12345").unwrap();
        let values = b.unpack("u8, bin").unwrap();
        assert_eq!(values[0], DtypeValue::Uint(0x12));
        assert_eq!(values[1], DtypeValue::String("001101000101".to_string()));
    }

    #[test]
    fn test_unpack_two_stretchy_errors() {
        let b = Bits::from_hex("0xff").unwrap();
        assert!(b.unpack("bin, hex").is_err());
    }

    #[test]
    fn test_pad_skips() {
        let b = Bits::from_hex("0xf0f").unwrap();
        let values = b.unpack("u4, pad:4, u4").unwrap();
        assert_eq!(values, vec![DtypeValue::Uint(15), DtypeValue::Uint(15)]);
    }

    #[test]
    fn test_parse_auto_string() {
        let b = Bits::parse("0x0f, 0b11").unwrap();
        assert_eq!(b.len(), 10);
        assert_eq!(b.to_bin(), "0000111111");
    }
}
