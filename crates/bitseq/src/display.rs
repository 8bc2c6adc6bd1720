//! Display and Debug implementations

use std::fmt;

use crate::bits::Bits;
use crate::mutable::BitArray;

/// Cap on the number of characters printed before truncating.
const MAX_CHARS: usize = 250;

fn format_bits(bits: &Bits, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let len = bits.len();
    if len == 0 {
        return Ok(());
    }
    if len > MAX_CHARS * 4 {
        // Too long for a full representation; show the start as hex.
        let head = bits.slice_abs(0, MAX_CHARS * 4);
        return write!(f, "0x{}...", head.to_hex().map_err(|_| fmt::Error)?);
    }
    if len % 4 == 0 {
        return write!(f, "0x{}", bits.to_hex().map_err(|_| fmt::Error)?);
    }
    if len < 32 {
        return write!(f, "0b{}", bits.to_bin());
    }
    // Hex for the whole nibbles, binary for the leftover bits.
    let split = len - len % 4;
    let head = bits.slice_abs(0, split);
    let tail = bits.slice_abs(split, len);
    write!(
        f,
        "0x{}, 0b{}",
        head.to_hex().map_err(|_| fmt::Error)?,
        tail.to_bin()
    )
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_bits(self, f)
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits('")?;
        format_bits(self, f)?;
        write!(f, "')")
    }
}

impl fmt::Display for BitArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_bits(self, f)
    }
}

impl fmt::Debug for BitArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitArray('")?;
        format_bits(self, f)?;
        write!(f, "')")
    }
}
