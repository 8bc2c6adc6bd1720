//! Integration tests for the immutable Bits type

use bitseq::{Bits, Error};
use pretty_assertions::assert_eq;

#[test]
fn test_creation_from_strings() {
    assert_eq!(Bits::from_bin("0b0011").unwrap().len(), 4);
    assert_eq!(Bits::from_hex("0x2ef").unwrap().len(), 12);
    assert_eq!(Bits::from_oct("0o17").unwrap().to_bin(), "001111");
    assert_eq!(Bits::from_hex("a_b").unwrap().to_hex().unwrap(), "ab");
    assert!(Bits::from_bin("0b012").is_err());
    assert!(Bits::from_hex("0xgg").is_err());
}

#[test]
fn test_uint_round_trip() {
    let b = Bits::from_uint(352, 12).unwrap();
    assert_eq!(b.to_bin(), "000101100000");
    assert_eq!(b.to_uint().unwrap(), 352);
    assert_eq!(Bits::from_uint(15, 4).unwrap().to_uint().unwrap(), 15);
    assert!(Bits::from_uint(16, 4).is_err());
    assert!(Bits::from_uint(1, 0).is_err());
}

#[test]
fn test_int_round_trip() {
    assert_eq!(Bits::from_int(-1, 8).unwrap().to_hex().unwrap(), "ff");
    assert_eq!(Bits::from_int(-128, 8).unwrap().to_int().unwrap(), -128);
    assert_eq!(Bits::from_int(127, 8).unwrap().to_int().unwrap(), 127);
    assert!(Bits::from_int(128, 8).is_err());
    assert!(Bits::from_int(-129, 8).is_err());
}

#[test]
fn test_128_bit_limits() {
    let b = Bits::from_uint(u128::MAX, 128).unwrap();
    assert_eq!(b.to_uint().unwrap(), u128::MAX);
    assert_eq!(b.to_int().unwrap(), -1);
    assert!(Bits::ones(129).to_uint().is_err());
    // Negative values at 127 bits exercise the sign extension wrap
    assert_eq!(Bits::from_int(-1, 127).unwrap().to_int().unwrap(), -1);
    let min127 = -(1i128 << 126);
    assert_eq!(Bits::from_int(min127, 127).unwrap().to_int().unwrap(), min127);
    assert_eq!(
        Bits::from_int(i128::MIN, 128).unwrap().to_int().unwrap(),
        i128::MIN
    );
}

#[test]
fn test_endian_integers() {
    let b = Bits::from_uint_le(0x0102, 16).unwrap();
    assert_eq!(b.to_hex().unwrap(), "0201");
    assert_eq!(b.to_uint_le().unwrap(), 0x0102);
    assert_eq!(b.to_uint_be().unwrap(), 0x0201);
    assert_eq!(Bits::from_int_le(-2, 16).unwrap().to_int_le().unwrap(), -2);
    assert!(Bits::from_uint_le(1, 12).is_err());
    assert!(Bits::from_bin("0b111").unwrap().to_uint_be().is_err());
}

#[test]
fn test_floats() {
    for value in [0.0, 0.5, -2.0, 1.5e3] {
        assert_eq!(Bits::from_f64(value, 16).unwrap().to_f64().unwrap(), value);
        assert_eq!(Bits::from_f64(value, 32).unwrap().to_f64().unwrap(), value);
        assert_eq!(Bits::from_f64(value, 64).unwrap().to_f64().unwrap(), value);
        assert_eq!(
            Bits::from_f64_le(value, 32).unwrap().to_f64_le().unwrap(),
            value
        );
    }
    assert_eq!(Bits::from_f64(1.0, 32).unwrap().to_hex().unwrap(), "3f800000");
    assert!(Bits::from_f64(1.0, 24).is_err());
    assert!(Bits::zeros(24).to_f64().is_err());
}

#[test]
fn test_float_infinities_and_nan() {
    let inf = Bits::from_f64(f64::INFINITY, 16).unwrap();
    assert_eq!(inf.to_hex().unwrap(), "7c00");
    assert_eq!(inf.to_f64().unwrap(), f64::INFINITY);
    let nan = Bits::from_f64(f64::NAN, 32).unwrap();
    assert!(nan.to_f64().unwrap().is_nan());
}

#[test]
fn test_bfloat() {
    let b = Bits::from_bfloat(1.0);
    assert_eq!(b.to_hex().unwrap(), "3f80");
    assert_eq!(b.to_bfloat().unwrap(), 1.0);
    assert_eq!(Bits::from_bfloat_le(-2.5).to_bfloat_le().unwrap(), -2.5);
    assert!(Bits::zeros(8).to_bfloat().is_err());
}

#[test]
fn test_bool_and_bytes() {
    assert_eq!(Bits::from_bool(true).to_bin(), "1");
    assert!(Bits::zeros(2).to_bool().is_err());
    let b = Bits::from_bytes(vec![1, 2, 3]);
    assert_eq!(b.len(), 24);
    assert_eq!(b.to_bytes_exact().unwrap(), vec![1, 2, 3]);
    assert!(Bits::zeros(7).to_bytes_exact().is_err());
    assert_eq!(Bits::zeros(7).to_bytes(), vec![0]);
}

#[test]
fn test_from_bytes_with_offset() {
    let b = Bits::from_bytes_with_offset(&[0x0f, 0xf0], 4, 8).unwrap();
    assert_eq!(b.to_hex().unwrap(), "ff");
    assert!(Bits::from_bytes_with_offset(&[0xff], 4, 8).is_err());
}

#[test]
fn test_exp_golomb_round_trip() {
    for i in 0..50u128 {
        let ue = Bits::from_ue(i).unwrap();
        assert_eq!(ue.read_ue(0).unwrap(), (i, ue.len()));
        let uie = Bits::from_uie(i).unwrap();
        assert_eq!(uie.read_uie(0).unwrap(), (i, uie.len()));
    }
    for i in -20..20i128 {
        let se = Bits::from_se(i).unwrap();
        assert_eq!(se.read_se(0).unwrap(), (i, se.len()));
        let sie = Bits::from_sie(i).unwrap();
        assert_eq!(sie.read_sie(0).unwrap(), (i, sie.len()));
    }
}

#[test]
fn test_exp_golomb_known_codes() {
    assert_eq!(Bits::from_ue(0).unwrap().to_bin(), "1");
    assert_eq!(Bits::from_ue(1).unwrap().to_bin(), "010");
    assert_eq!(Bits::from_ue(2).unwrap().to_bin(), "011");
    assert_eq!(Bits::from_ue(3).unwrap().to_bin(), "00100");
    assert_eq!(Bits::from_se(1).unwrap().to_bin(), "010");
    assert_eq!(Bits::from_se(-1).unwrap().to_bin(), "011");
}

#[test]
fn test_exp_golomb_128_bit_bounds() {
    // The widest representable code has 127 leading zeros
    let max = Bits::from_ue(u128::MAX - 1).unwrap();
    assert_eq!(max.read_ue(0).unwrap(), (u128::MAX - 1, max.len()));
    assert!(Bits::from_ue(u128::MAX).is_err());
    // Longer runs of zeros are an error, not a shift panic
    let too_wide = Bits::zeros(130).concat(&Bits::from_bin("1").unwrap());
    assert!(matches!(too_wide.read_ue(0), Err(Error::Read(_))));
    let long_uie = Bits::from_bin(&"01".repeat(130))
        .unwrap()
        .concat(&Bits::from_bin("1").unwrap());
    assert!(matches!(long_uie.read_uie(0), Err(Error::Read(_))));
    assert!(Bits::from_se(i128::MIN).is_err());
    assert!(Bits::from_se(i128::MIN + 1).is_ok());
}

#[test]
fn test_exp_golomb_read_off_end() {
    let b = Bits::zeros(5);
    assert!(matches!(b.read_ue(0), Err(Error::Read(_))));
    let b = Bits::from_bin("0010").unwrap();
    assert!(b.read_ue(0).is_err());
}

#[test]
fn test_slicing() {
    let b = Bits::from_hex("0x12345").unwrap();
    assert_eq!(b.slice(4, 12).unwrap().to_hex().unwrap(), "23");
    assert_eq!(b.slice(0, 0).unwrap().len(), 0);
    assert!(b.slice(0, 21).is_err());
    assert!(b.slice(5, 4).is_err());
}

#[test]
fn test_get() {
    let b = Bits::from_bin("100").unwrap();
    assert_eq!(b.get(0), Some(true));
    assert_eq!(b.get(2), Some(false));
    assert_eq!(b.get(3), None);
}

#[test]
fn test_find() {
    let b = Bits::from_hex("0xc3e").unwrap();
    let p = Bits::from_bin("1111").unwrap();
    assert_eq!(b.find(&p, None, None, None).unwrap(), Some(6));
    // The run of ones spans 6..=10, so a later start still matches
    assert_eq!(b.find(&p, Some(7), None, None).unwrap(), Some(7));
    assert_eq!(b.find(&p, Some(8), None, None).unwrap(), None);
    assert_eq!(b.find(&p, None, None, Some(true)).unwrap(), None);
    assert!(b.find(&Bits::new(), None, None, None).is_err());
}

#[test]
fn test_find_bytealigned() {
    let b = Bits::from_hex("0x00ff00ff").unwrap();
    let p = Bits::from_hex("0xff").unwrap();
    assert_eq!(b.find(&p, None, None, Some(true)).unwrap(), Some(8));
    assert_eq!(b.rfind(&p, None, None, Some(true)).unwrap(), Some(24));
    assert_eq!(
        b.find_all(&p, Some(true)).unwrap(),
        vec![8, 24]
    );
}

#[test]
fn test_find_all_overlapping() {
    let b = Bits::from_bin("11111").unwrap();
    let p = Bits::from_bin("11").unwrap();
    assert_eq!(b.find_all(&p, Some(false)).unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn test_starts_and_ends_with() {
    let b = Bits::from_hex("0xdeadbeef").unwrap();
    assert!(b.starts_with(&Bits::from_hex("0xdead").unwrap()));
    assert!(b.ends_with(&Bits::from_hex("0xbeef").unwrap()));
    assert!(!b.starts_with(&Bits::from_hex("0xbeef").unwrap()));
    assert!(!b.ends_with(&Bits::from_hex("0xdeadbeef00").unwrap()));
}

#[test]
fn test_count_all_any() {
    let b = Bits::from_bin("01101").unwrap();
    assert_eq!(b.count(true), 3);
    assert_eq!(b.count(false), 2);
    assert!(!b.all(true, None).unwrap());
    assert!(b.any(true, None).unwrap());
    assert!(b.all(true, Some(&[1, 2, 4])).unwrap());
    assert!(!b.any(true, Some(&[0, 3])).unwrap());
    assert!(b.all(true, Some(&[9])).is_err());
    assert!(Bits::ones(9).all(true, None).unwrap());
    assert!(!Bits::zeros(9).any(true, None).unwrap());
}

#[test]
fn test_chunks() {
    let b = Bits::from_hex("0x123").unwrap();
    let chunks: Vec<_> = b.chunks(4).unwrap().collect();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[1].to_hex().unwrap(), "2");
    let uneven: Vec<_> = b.chunks(5).unwrap().collect();
    assert_eq!(uneven.last().unwrap().len(), 2);
    assert!(b.chunks(0).is_err());
}

#[test]
fn test_split() {
    let b = Bits::from_hex("0x4700004701").unwrap();
    let delimiter = Bits::from_hex("0x47").unwrap();
    let parts = b.split(&delimiter, Some(true)).unwrap();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0].len(), 0);
    assert_eq!(parts[1].to_hex().unwrap(), "470000");
    assert_eq!(parts[2].to_hex().unwrap(), "4701");
    let none = Bits::from_hex("0x11").unwrap();
    assert_eq!(none.split(&delimiter, None).unwrap(), vec![none.clone()]);
}

#[test]
fn test_join_and_repeat() {
    let sep = Bits::from_bin("0").unwrap();
    let a = Bits::from_bin("11").unwrap();
    let joined = sep.join([&a, &a, &a]);
    assert_eq!(joined.to_bin(), "11011011");
    assert_eq!(a.repeat(3).to_bin(), "111111");
    assert_eq!(a.repeat(0).len(), 0);
}

#[test]
fn test_bitwise_operators() {
    let a = Bits::from_hex("0x3c").unwrap();
    let b = Bits::from_hex("0x0f").unwrap();
    assert_eq!((&a & &b).to_hex().unwrap(), "0c");
    assert_eq!((&a | &b).to_hex().unwrap(), "3f");
    assert_eq!((&a ^ &b).to_hex().unwrap(), "33");
    assert_eq!((!&a).to_hex().unwrap(), "c3");
    let short = Bits::from_bin("1").unwrap();
    assert!(a.and(&short).is_err());
    assert!(Bits::new().inverted().is_err());
}

#[test]
fn test_shifts() {
    let b = Bits::from_bin("10011").unwrap();
    assert_eq!((&b << 2).to_bin(), "01100");
    assert_eq!((&b >> 2).to_bin(), "00100");
    assert_eq!(b.shifted_left(99).unwrap().to_bin(), "00000");
    assert!(Bits::new().shifted_left(1).is_err());
}

#[test]
fn test_concatenation() {
    let a = Bits::from_bin("101").unwrap();
    let b = Bits::from_hex("0xf").unwrap();
    assert_eq!((&a + &b).to_bin(), "1011111");
}

#[test]
fn test_equality_and_hashing() {
    use std::collections::HashSet;
    let a = Bits::from_bin("0011").unwrap();
    let b = Bits::from_hex("0x3").unwrap();
    assert_eq!(a, b);
    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
    // Same value, different length
    assert_ne!(Bits::from_bin("011").unwrap(), b);
}

#[test]
fn test_parse_auto_strings() {
    assert_eq!(Bits::parse("0xff").unwrap().len(), 8);
    assert_eq!(Bits::parse("u12=352").unwrap().to_uint().unwrap(), 352);
    assert_eq!(Bits::parse("0b11, pad:2, 0o7").unwrap().to_bin(), "1100111");
    assert_eq!(Bits::parse("float32=0.25").unwrap().to_f64().unwrap(), 0.25);
    assert!(Bits::parse("u12").is_err());
    assert!(Bits::parse("wibble=3").is_err());
}

#[test]
fn test_p4binary_and_p3binary() {
    assert_eq!(Bits::from_p4binary(0.0).to_hex().unwrap(), "00");
    let b = Bits::from_p4binary(1.0);
    assert_eq!(b.to_p4binary().unwrap(), 1.0);
    let c = Bits::from_p3binary(-0.5);
    assert_eq!(c.to_p3binary().unwrap(), -0.5);
    assert!(Bits::zeros(9).to_p4binary().is_err());
}
