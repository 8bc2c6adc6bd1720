//! Process-wide library options

use std::sync::atomic::{AtomicBool, Ordering};

/// If true, the least significant bit (the final bit) is indexed as bit zero.
static LSB0: AtomicBool = AtomicBool::new(false);

/// Whether search methods default to working only on byte boundaries.
static BYTEALIGNED: AtomicBool = AtomicBool::new(false);

/// Return whether lsb0 bit numbering is in effect.
pub fn lsb0() -> bool {
    LSB0.load(Ordering::Relaxed)
}

/// Switch between msb0 (default) and lsb0 bit numbering.
///
/// In lsb0 mode bit zero is the last bit of the sequence, as is conventional
/// when reading hardware registers. Indexing, slicing, searching and
/// rotation all honour the setting. Exponential-Golomb codes cannot be used
/// while it is enabled.
pub fn set_lsb0(value: bool) {
    LSB0.store(value, Ordering::Relaxed);
}

/// Return the default for byte-aligned searching.
pub fn bytealigned() -> bool {
    BYTEALIGNED.load(Ordering::Relaxed)
}

/// Set the default for byte-aligned searching.
///
/// Methods such as [`find`](crate::Bits::find) consult this when their
/// `bytealigned` argument is `None`.
pub fn set_bytealigned(value: bool) {
    BYTEALIGNED.store(value, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert!(!lsb0());
        assert!(!bytealigned());
    }
}
