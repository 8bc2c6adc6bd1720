//! Integration tests for Array, ScaledArray and ScaledDtype

use bitseq::{Array, Bits, Dtype, DtypeValue, Scalar, ScaledArray, ScaledDtype};
use pretty_assertions::assert_eq;

fn uints(values: &[u128]) -> Vec<DtypeValue> {
    values.iter().map(|&v| DtypeValue::Uint(v)).collect()
}

#[test]
fn test_basic_element_access() {
    let mut a = Array::with_items(Dtype::parse("u7").unwrap(), &uints(&[90, 100, 110])).unwrap();
    assert_eq!(a.len(), 3);
    assert_eq!(a.item_size(), 7);
    assert_eq!(a.data().len(), 21);
    assert_eq!(a.get(1).unwrap(), DtypeValue::Uint(100));
    a.set(1, &DtypeValue::Uint(5)).unwrap();
    assert_eq!(a.get(1).unwrap(), DtypeValue::Uint(5));
    assert!(a.get(3).is_err());
    assert!(a.set(0, &DtypeValue::Uint(128)).is_err());
}

#[test]
fn test_needs_fixed_length_dtype() {
    assert!(Array::new(Dtype::parse("u8").unwrap()).is_ok());
    assert!(Array::new(Dtype::parse("bin").unwrap()).is_err());
    assert!(Dtype::parse("ue").map(Array::new).unwrap().is_err());
}

#[test]
fn test_trailing_bits() {
    let a = Array::from_bytes(Dtype::parse("u12").unwrap(), vec![0xab, 0xcd, 0xef, 0x01]).unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(a.trailing_bits().len(), 8);
    assert_eq!(a.get(0).unwrap(), DtypeValue::Uint(0xabc));
    assert_eq!(a.get(1).unwrap(), DtypeValue::Uint(0xdef));
}

#[test]
fn test_push_with_trailing_bits_errors() {
    let mut a = Array::from_bytes(Dtype::parse("u12").unwrap(), vec![0xab]).unwrap();
    assert!(a.push(&DtypeValue::Uint(0)).is_err());
    a.data_mut().append(&Bits::zeros(4));
    a.push(&DtypeValue::Uint(9)).unwrap();
    assert_eq!(a.len(), 2);
}

#[test]
fn test_insert_pop_remove() {
    let mut a = Array::with_items(Dtype::parse("u8").unwrap(), &uints(&[1, 3])).unwrap();
    a.insert(1, &DtypeValue::Uint(2)).unwrap();
    assert_eq!(a.to_vec().unwrap(), uints(&[1, 2, 3]));
    assert_eq!(a.pop().unwrap(), DtypeValue::Uint(3));
    assert_eq!(a.remove(0).unwrap(), DtypeValue::Uint(1));
    assert_eq!(a.to_vec().unwrap(), uints(&[2]));
    a.pop().unwrap();
    assert!(a.pop().is_err());
}

#[test]
fn test_reverse_and_byteswap() {
    let mut a = Array::with_items(Dtype::parse("u8").unwrap(), &uints(&[1, 2, 3])).unwrap();
    a.reverse().unwrap();
    assert_eq!(a.to_vec().unwrap(), uints(&[3, 2, 1]));

    let mut b = Array::with_items(Dtype::parse("uintbe16").unwrap(), &uints(&[0x0102, 0x0304]))
        .unwrap();
    b.byteswap().unwrap();
    assert_eq!(b.to_vec().unwrap(), uints(&[0x0201, 0x0403]));

    let mut c = Array::new(Dtype::parse("u7").unwrap()).unwrap();
    assert!(c.byteswap().is_err());
}

#[test]
fn test_count_and_eq() {
    let a = Array::with_items(Dtype::parse("u4").unwrap(), &uints(&[1, 2, 1, 1])).unwrap();
    assert_eq!(a.count(&DtypeValue::Uint(1)), 3);
    assert_eq!(a.count(&DtypeValue::Uint(9)), 0);
    let b = Array::from_bytes(Dtype::parse("u4").unwrap(), a.to_bytes()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_set_dtype_reinterprets() {
    let mut a = Array::with_items(Dtype::parse("u8").unwrap(), &uints(&[0x12, 0x34])).unwrap();
    a.set_dtype(Dtype::parse("u4").unwrap()).unwrap();
    assert_eq!(a.to_vec().unwrap(), uints(&[1, 2, 3, 4]));
    assert!(a.set_dtype(Dtype::parse("hex").unwrap()).is_err());
}

#[test]
fn test_scalar_arithmetic() {
    let a = Array::with_items(Dtype::parse("i8").unwrap(), &[
        DtypeValue::Int(10),
        DtypeValue::Int(-4),
    ])
    .unwrap();
    let added = a.add_scalar(Scalar::Int(1)).unwrap();
    assert_eq!(added.to_vec().unwrap(), vec![DtypeValue::Int(11), DtypeValue::Int(-3)]);
    let halved = a.floordiv_scalar(Scalar::Int(2)).unwrap();
    assert_eq!(
        halved.to_vec().unwrap(),
        vec![DtypeValue::Int(5), DtypeValue::Int(-2)]
    );
    let shifted = a.lshift_scalar(2).unwrap();
    assert_eq!(
        shifted.to_vec().unwrap(),
        vec![DtypeValue::Int(40), DtypeValue::Int(-16)]
    );
    // Overflowing the element range fails on the rebuild
    assert!(a.mul_scalar(Scalar::Int(100)).is_err());
    assert!(a.floordiv_scalar(Scalar::Int(0)).is_err());
}

#[test]
fn test_float_array_arithmetic() {
    let a = Array::with_items(Dtype::parse("float32").unwrap(), &[
        DtypeValue::Float(0.5),
        DtypeValue::Float(-8.0),
    ])
    .unwrap();
    let scaled = a.mul_scalar(Scalar::Float(2.0)).unwrap();
    assert_eq!(
        scaled.to_vec().unwrap(),
        vec![DtypeValue::Float(1.0), DtypeValue::Float(-16.0)]
    );
    let divided = a.div_scalar(Scalar::Int(2)).unwrap();
    assert_eq!(
        divided.to_vec().unwrap(),
        vec![DtypeValue::Float(0.25), DtypeValue::Float(-4.0)]
    );
}

#[test]
fn test_integer_division_is_floored_only() {
    let a = Array::with_items(Dtype::parse("u8").unwrap(), &uints(&[6])).unwrap();
    // True division produces floats, which an integer dtype cannot store
    assert!(a.div_scalar(Scalar::Int(2)).is_err());
    assert_eq!(
        a.floordiv_scalar(Scalar::Int(4)).unwrap().to_vec().unwrap(),
        uints(&[1])
    );
}

#[test]
fn test_scalar_ops_in_place() {
    let mut a = Array::with_items(Dtype::parse("u8").unwrap(), &uints(&[3, 5])).unwrap();
    a.add_scalar_in_place(Scalar::Int(10)).unwrap();
    a.lshift_scalar_in_place(1).unwrap();
    assert_eq!(a.to_vec().unwrap(), uints(&[26, 30]));
    // A failing operation leaves the array as it was
    assert!(a.mul_scalar_in_place(Scalar::Int(100)).is_err());
    assert_eq!(a.to_vec().unwrap(), uints(&[26, 30]));
}

#[test]
fn test_bitwise_scalars() {
    let a = Array::with_items(Dtype::parse("u4").unwrap(), &uints(&[0b1100, 0b1010])).unwrap();
    assert_eq!(
        a.and_scalar(0b0110).unwrap().to_vec().unwrap(),
        uints(&[0b0100, 0b0010])
    );
    assert_eq!(
        a.or_scalar(0b0001).unwrap().to_vec().unwrap(),
        uints(&[0b1101, 0b1011])
    );
    assert_eq!(
        a.xor_scalar(0b1111).unwrap().to_vec().unwrap(),
        uints(&[0b0011, 0b0101])
    );
}

#[test]
fn test_scaled_dtype() {
    let sd = ScaledDtype::new(Dtype::parse("u8").unwrap(), 2).unwrap();
    let bits = sd.build(&DtypeValue::Uint(20)).unwrap();
    assert_eq!(bits.to_uint().unwrap(), 5);
    assert_eq!(sd.get(&bits).unwrap(), DtypeValue::Uint(20));
    // 2^2 does not divide 21
    assert!(sd.build(&DtypeValue::Uint(21)).is_err());
    assert!(ScaledDtype::new(Dtype::parse("hex8").unwrap(), 1).is_err());
}

#[test]
fn test_scaled_dtype_large_scale_promotes_to_float() {
    // 255 << 122 overflows u128, so the scaled value comes back as a float
    let sd = ScaledDtype::new(Dtype::parse("u8").unwrap(), 122).unwrap();
    let bits = Bits::from_uint(0xff, 8).unwrap();
    assert_eq!(
        sd.get(&bits).unwrap(),
        DtypeValue::Float(255.0 * 2f64.powi(122))
    );
    // With headroom the value stays an integer
    let sd = ScaledDtype::new(Dtype::parse("u8").unwrap(), 100).unwrap();
    assert_eq!(sd.get(&bits).unwrap(), DtypeValue::Uint(255u128 << 100));
    let sd = ScaledDtype::new(Dtype::parse("i8").unwrap(), 122).unwrap();
    let bits = Bits::from_int(-128, 8).unwrap();
    assert_eq!(
        sd.get(&bits).unwrap(),
        DtypeValue::Float(-128.0 * 2f64.powi(122))
    );
}

#[test]
fn test_scaled_dtype_negative_scale() {
    let sd = ScaledDtype::new(Dtype::parse("u8").unwrap(), -1).unwrap();
    let bits = sd.build(&DtypeValue::Float(2.5)).unwrap();
    assert_eq!(bits.to_uint().unwrap(), 5);
    assert_eq!(sd.get(&bits).unwrap(), DtypeValue::Float(2.5));
}

#[test]
fn test_scaled_array() {
    let sd = ScaledDtype::new(Dtype::parse("i8").unwrap(), 3).unwrap();
    let mut a = ScaledArray::new(sd).unwrap();
    a.push(&DtypeValue::Int(8)).unwrap();
    a.push(&DtypeValue::Int(-16)).unwrap();
    assert_eq!(a.to_vec().unwrap(), vec![DtypeValue::Int(8), DtypeValue::Int(-16)]);
    // The raw elements hold the unscaled values
    assert_eq!(a.array().get(0).unwrap(), DtypeValue::Int(1));
    // Rescaling changes every value without touching the data
    a.set_scale(4);
    assert_eq!(a.get(0).unwrap(), DtypeValue::Int(16));
    a.set(0, &DtypeValue::Int(32)).unwrap();
    assert_eq!(a.array().get(0).unwrap(), DtypeValue::Int(2));
}
