//! # Bitseq
//!
//! Creation, manipulation and interpretation of binary data at the bit
//! level.
//!
//! Bit sequences can be built from integers, floats, hex/octal/binary
//! strings, bytes, bools and exponential-Golomb codes, sliced and searched
//! at arbitrary bit positions, and read back as any of those
//! interpretations. Compact format strings drive packing and unpacking of
//! heterogeneous records.
//!
//! ## Main types
//!
//! - **[`Bits`]**: an immutable bit sequence
//! - **[`BitArray`]**: its mutable counterpart, with in-place editing
//! - **[`BitReader`]**: positional reading, one dtype at a time
//! - **[`Dtype`]**: a named interpretation such as `u12` or `floatle32`
//! - **[`Array`]**: a compact container of equally-sized elements
//!
//! ## Example
//!
//! ```
//! use bitseq::{pack, Bits, DtypeValue};
//!
//! let record = pack("u4, u12, 0b01", &[3u64.into(), 352u64.into()])?;
//! let fields = record.unpack("u4, u12, bin")?;
//! assert_eq!(fields[1], DtypeValue::Uint(352));
//! # Ok::<(), bitseq::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod bits;
mod display;
pub mod dtype;
pub mod error;
pub mod float8;
pub mod mutable;
pub mod mxfp;
pub mod options;
pub mod pack;
pub mod reader;
pub mod scaled;
mod store;
mod tokens;

// Re-export main types
pub use array::{Array, Scalar};
pub use bits::{Bits, Chunks};
pub use dtype::{Dtype, DtypeKind, DtypeValue};
pub use error::{Error, Result};
pub use float8::{Binary8Format, P3BINARY, P4BINARY};
pub use mutable::BitArray;
pub use mxfp::{MxfpFormat, E2M1, E2M3, E3M2};
pub use pack::pack;
pub use reader::BitReader;
pub use scaled::{ScaledArray, ScaledDtype};

/// Bitseq version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
