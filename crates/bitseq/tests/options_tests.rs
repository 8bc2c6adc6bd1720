//! Tests for the lsb0 and bytealigned global options
//!
//! These toggle process-wide state, so they all live in one serialised
//! test to keep them away from each other and from the other suites
//! (each tests/ file is its own process).

use bitseq::{options, BitArray, Bits};
use pretty_assertions::assert_eq;

fn with_lsb0<F: FnOnce()>(f: F) {
    options::set_lsb0(true);
    f();
    options::set_lsb0(false);
}

#[test]
fn test_global_options() {
    lsb0_indexing_and_slicing();
    lsb0_find();
    lsb0_append_and_rotate();
    lsb0_rejects_exp_golomb();
    bytealigned_default();
}

fn lsb0_indexing_and_slicing() {
    let b = Bits::from_bin("0b1100").unwrap();
    assert_eq!(b.get(0), Some(false));
    with_lsb0(|| {
        // Bit zero is now the final bit
        assert_eq!(b.get(0), Some(false));
        assert_eq!(b.get(2), Some(true));
        assert_eq!(b.get(3), Some(true));
        // Slices count from the lsb end but keep bit order
        assert_eq!(b.slice(2, 4).unwrap().to_bin(), "11");
        assert_eq!(b.slice(0, 2).unwrap().to_bin(), "00");
    });
    assert_eq!(b.slice(0, 2).unwrap().to_bin(), "11");
}

fn lsb0_find() {
    let b = Bits::from_bin("0b00110000").unwrap();
    let p = Bits::from_bin("0b11").unwrap();
    assert_eq!(b.find(&p, None, None, Some(false)).unwrap(), Some(2));
    with_lsb0(|| {
        // Positions are from the lsb end
        assert_eq!(b.find(&p, None, None, Some(false)).unwrap(), Some(4));
        assert_eq!(b.rfind(&p, None, None, Some(false)).unwrap(), Some(4));
    });
}

fn lsb0_append_and_rotate() {
    with_lsb0(|| {
        let mut a = BitArray::parse("0b01").unwrap();
        // Appending adds at the lsb end, which is the msb0 start
        a.append(&Bits::from_bin("0b11").unwrap());
        assert_eq!(a.to_bin(), "1101");
        a.prepend(&Bits::from_bin("0b0").unwrap());
        assert_eq!(a.to_bin(), "11010");
    });
    let mut msb = BitArray::parse("0b0001").unwrap();
    msb.rol(1).unwrap();
    assert_eq!(msb.to_bin(), "0010");
    with_lsb0(|| {
        let mut lsb = BitArray::parse("0b0001").unwrap();
        // The rotation direction flips along with the bit numbering
        lsb.rol(1).unwrap();
        assert_eq!(lsb.to_bin(), "1000");
    });
}

fn lsb0_rejects_exp_golomb() {
    with_lsb0(|| {
        assert!(Bits::from_ue(3).is_err());
        assert!(Bits::from_sie(-1).is_err());
        let b = Bits::from_bin("0b00100").unwrap();
        assert!(b.read_ue(0).is_err());
    });
    assert!(Bits::from_ue(3).is_ok());
}

fn bytealigned_default() {
    let b = Bits::from_hex("0x0fff").unwrap();
    let p = Bits::from_hex("0xff").unwrap();
    assert_eq!(b.find(&p, None, None, None).unwrap(), Some(4));
    options::set_bytealigned(true);
    assert_eq!(b.find(&p, None, None, None).unwrap(), Some(8));
    // An explicit argument still beats the global default
    assert_eq!(b.find(&p, None, None, Some(false)).unwrap(), Some(4));
    options::set_bytealigned(false);
}
