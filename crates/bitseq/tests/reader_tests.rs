//! Integration tests for BitReader and format reading

use bitseq::{pack, BitReader, Bits, Dtype, DtypeValue, Error};
use pretty_assertions::assert_eq;

#[test]
fn test_sequential_reads() {
    let b = Bits::parse("0x47, u12=1000, 0b1").unwrap();
    let mut r = BitReader::new(&b);
    assert_eq!(
        r.read(&Dtype::parse("hex8").unwrap()).unwrap(),
        DtypeValue::String("47".to_string())
    );
    assert_eq!(
        r.read(&Dtype::parse("u12").unwrap()).unwrap(),
        DtypeValue::Uint(1000)
    );
    assert_eq!(
        r.read(&Dtype::parse("bool").unwrap()).unwrap(),
        DtypeValue::Bool(true)
    );
    assert!(r.is_at_end());
}

#[test]
fn test_read_past_end_errors() {
    let b = Bits::zeros(10);
    let mut r = BitReader::new(&b);
    r.read_bits(8).unwrap();
    assert!(matches!(r.read_bits(3), Err(Error::Read(_))));
    // A failed read leaves the position alone
    assert_eq!(r.pos(), 8);
    assert_eq!(r.read_bits(2).unwrap().len(), 2);
}

#[test]
fn test_peek_does_not_advance() {
    let b = Bits::from_hex("0xabcd").unwrap();
    let mut r = BitReader::new(&b);
    let d = Dtype::parse("u8").unwrap();
    assert_eq!(r.peek(&d).unwrap(), DtypeValue::Uint(0xab));
    assert_eq!(r.peek_bits(4).unwrap().to_hex().unwrap(), "a");
    assert_eq!(r.pos(), 0);
    assert_eq!(r.read(&d).unwrap(), DtypeValue::Uint(0xab));
    assert_eq!(r.pos(), 8);
}

#[test]
fn test_set_pos_and_remaining() {
    let b = Bits::zeros(16);
    let mut r = BitReader::new(&b);
    r.set_pos(10).unwrap();
    assert_eq!(r.remaining(), 6);
    assert!(r.set_pos(17).is_err());
}

#[test]
fn test_bytealign() {
    let b = Bits::zeros(20);
    let mut r = BitReader::new(&b);
    r.read_bits(3).unwrap();
    assert_eq!(r.bytealign(), 5);
    assert_eq!(r.pos(), 8);
    assert_eq!(r.bytealign(), 0);
}

#[test]
fn test_reader_find() {
    let b = Bits::from_hex("0x00470047").unwrap();
    let mut r = BitReader::new(&b);
    let sync = Bits::from_hex("0x47").unwrap();
    assert_eq!(r.find(&sync, Some(true)).unwrap(), Some(8));
    assert_eq!(r.pos(), 8);
    r.read_bits(8).unwrap();
    assert_eq!(r.find(&sync, Some(true)).unwrap(), Some(24));
    // A failed search leaves the position alone
    r.read_bits(8).unwrap();
    assert_eq!(r.find(&sync, Some(true)).unwrap(), None);
    assert_eq!(r.pos(), 32);
}

#[test]
fn test_read_list() {
    let b = pack("u4, i4, float32", &[3u64.into(), (-2i64).into(), 0.5.into()]).unwrap();
    let mut r = BitReader::new(&b);
    let values = r.read_list("u4, i4, float32").unwrap();
    assert_eq!(
        values,
        vec![
            DtypeValue::Uint(3),
            DtypeValue::Int(-2),
            DtypeValue::Float(0.5)
        ]
    );
    assert!(r.is_at_end());
}

#[test]
fn test_read_list_with_stretchy() {
    let b = Bits::from_hex("0x12345678").unwrap();
    let mut r = BitReader::new(&b);
    r.read_bits(8).unwrap();
    let values = r.read_list("u8, hex").unwrap();
    assert_eq!(values[0], DtypeValue::Uint(0x34));
    assert_eq!(values[1], DtypeValue::String("5678".to_string()));
    assert!(r.is_at_end());
}

#[test]
fn test_read_exp_golomb() {
    let mut b = Bits::from_ue(7).unwrap();
    b = b.concat(&Bits::from_se(-3).unwrap());
    let mut r = BitReader::new(&b);
    assert_eq!(
        r.read(&Dtype::parse("ue").unwrap()).unwrap(),
        DtypeValue::Uint(7)
    );
    assert_eq!(
        r.read(&Dtype::parse("se").unwrap()).unwrap(),
        DtypeValue::Int(-3)
    );
    assert!(r.is_at_end());
}

#[test]
fn test_golomb_before_stretchy() {
    // ue(0) is the single bit "1"; the stretchy token takes the other 15.
    let b = Bits::from_hex("0xffff").unwrap();
    let mut r = BitReader::new(&b);
    let values = r.read_list("ue, bin").unwrap();
    assert_eq!(values[0], DtypeValue::Uint(0));
    assert_eq!(values[1], DtypeValue::String("1".repeat(15)));
}

#[test]
fn test_golomb_after_stretchy_errors() {
    let b = Bits::from_hex("0xffff").unwrap();
    let mut r = BitReader::new(&b);
    assert!(r.read_list("bin, ue").is_err());
}
