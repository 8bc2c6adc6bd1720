//! Raw bit storage shared by all the container types
//!
//! A [`BitStore`] is a growable sequence of bits packed MSB-first into a
//! `Vec<u8>`: bit `i` of the sequence lives at bit `7 - (i % 8)` of byte
//! `i / 8`. All positions here are msb0; lsb0 translation happens in the
//! containers that sit on top.

/// A growable, byte-packed sequence of bits.
///
/// Invariant: any pad bits past `len` in the final byte are zero. Equality,
/// hashing and the bitwise operators all rely on this canonical form, so
/// every mutating operation re-masks the final byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub(crate) struct BitStore {
    data: Vec<u8>,
    len: usize,
}

/// Number of bytes needed to hold `bits` bits.
#[inline]
pub(crate) fn byte_len(bits: usize) -> usize {
    bits.div_ceil(8)
}

impl BitStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store of `n` zero bits.
    pub fn zeros(n: usize) -> Self {
        Self {
            data: vec![0; byte_len(n)],
            len: n,
        }
    }

    /// Create a store of `n` one bits.
    pub fn ones(n: usize) -> Self {
        let mut s = Self {
            data: vec![0xff; byte_len(n)],
            len: n,
        };
        s.mask_pad();
        s
    }

    /// Create a store from whole bytes.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let len = data.len() * 8;
        Self { data, len }
    }

    /// Create a store from a slice of bools, one bit per item.
    pub fn from_bools<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let mut s = Self::new();
        for b in bits {
            s.push(b);
        }
        s
    }

    /// The number of bits held.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the store holds no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get bit `i`. Caller guarantees `i < len`.
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        (self.data[i >> 3] >> (7 - (i & 7))) & 1 == 1
    }

    /// Set bit `i`. Caller guarantees `i < len`.
    #[inline]
    pub fn set(&mut self, i: usize, value: bool) {
        debug_assert!(i < self.len);
        let mask = 1u8 << (7 - (i & 7));
        if value {
            self.data[i >> 3] |= mask;
        } else {
            self.data[i >> 3] &= !mask;
        }
    }

    /// Set every bit to `value`.
    pub fn set_all(&mut self, value: bool) {
        let fill = if value { 0xff } else { 0x00 };
        for b in &mut self.data {
            *b = fill;
        }
        self.mask_pad();
    }

    /// Append a single bit.
    pub fn push(&mut self, value: bool) {
        if self.len % 8 == 0 {
            self.data.push(0);
        }
        self.len += 1;
        if value {
            self.set(self.len - 1, true);
        }
    }

    /// Read 8 bits starting at `pos`, MSB-aligned, zero-padded past the end.
    #[inline]
    fn byte_at(&self, pos: usize) -> u8 {
        let idx = pos >> 3;
        let shift = (pos & 7) as u32;
        let hi = self.data.get(idx).copied().unwrap_or(0);
        if shift == 0 {
            hi
        } else {
            let lo = self.data.get(idx + 1).copied().unwrap_or(0);
            (hi << shift) | (lo >> (8 - shift))
        }
    }

    /// Copy out the bits in `start..end`. Caller guarantees
    /// `start <= end <= len`.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= self.len);
        let n = end - start;
        let mut data = Vec::with_capacity(byte_len(n));
        let mut pos = start;
        while pos < end {
            data.push(self.byte_at(pos));
            pos += 8;
        }
        let mut s = Self { data, len: n };
        s.mask_pad();
        s
    }

    /// Append all of `other`'s bits.
    pub fn append(&mut self, other: &BitStore) {
        let shift = (self.len & 7) as u32;
        if shift == 0 {
            self.data.extend_from_slice(&other.data);
        } else {
            let mut pos = 0;
            while pos < other.len {
                let b = other.byte_at(pos);
                let last = self.data.len() - 1;
                self.data[last] |= b >> shift;
                self.data.push(b << (8 - shift));
                pos += 8;
            }
        }
        self.len += other.len;
        self.data.truncate(byte_len(self.len));
        self.mask_pad();
    }

    /// Prepend all of `other`'s bits.
    pub fn prepend(&mut self, other: &BitStore) {
        let mut joined = other.clone();
        joined.append(self);
        *self = joined;
    }

    /// Insert `other`'s bits so the first lands at position `pos`.
    /// Caller guarantees `pos <= len`.
    pub fn insert(&mut self, pos: usize, other: &BitStore) {
        debug_assert!(pos <= self.len);
        let tail = self.slice(pos, self.len);
        let mut head = self.slice(0, pos);
        head.append(other);
        head.append(&tail);
        *self = head;
    }

    /// Remove the bits in `start..end`. Caller guarantees
    /// `start <= end <= len`.
    pub fn delete(&mut self, start: usize, end: usize) {
        debug_assert!(start <= end && end <= self.len);
        let tail = self.slice(end, self.len);
        let mut head = self.slice(0, start);
        head.append(&tail);
        *self = head;
    }

    /// Replace the bits in `start..end` with `other` (lengths may differ).
    pub fn splice(&mut self, start: usize, end: usize, other: &BitStore) {
        debug_assert!(start <= end && end <= self.len);
        let tail = self.slice(end, self.len);
        let mut head = self.slice(0, start);
        head.append(other);
        head.append(&tail);
        *self = head;
    }

    /// Overwrite in place starting at `pos`. Caller guarantees
    /// `pos + other.len() <= len`.
    pub fn overwrite(&mut self, pos: usize, other: &BitStore) {
        debug_assert!(pos + other.len <= self.len);
        for i in 0..other.len {
            self.set(pos + i, other.get(i));
        }
    }

    /// Flip bit `i`.
    pub fn invert(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.data[i >> 3] ^= 1u8 << (7 - (i & 7));
    }

    /// Flip every bit.
    pub fn invert_all(&mut self) {
        for b in &mut self.data {
            *b = !*b;
        }
        self.mask_pad();
    }

    /// Reverse the order of all bits.
    pub fn reverse(&mut self) {
        let mut rev = BitStore::zeros(self.len);
        for i in 0..self.len {
            if self.get(i) {
                rev.set(self.len - 1 - i, true);
            }
        }
        *self = rev;
    }

    /// Count of one bits.
    pub fn count_ones(&self) -> usize {
        // Pad bits are zero, so whole bytes can be counted.
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Whether any bit is one.
    pub fn any_set(&self) -> bool {
        self.data.iter().any(|&b| b != 0)
    }

    /// Whether every bit is one.
    pub fn all_set(&self) -> bool {
        self.count_ones() == self.len
    }

    /// The bits as bytes, zero-padded at the end to a byte boundary.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// Whether `pattern` matches at `pos`.
    fn matches_at(&self, pattern: &BitStore, pos: usize) -> bool {
        let mut i = 0;
        while i + 8 <= pattern.len {
            if self.byte_at(pos + i) != pattern.byte_at(i) {
                return false;
            }
            i += 8;
        }
        let rem = pattern.len - i;
        if rem > 0 {
            let mask = 0xffu8 << (8 - rem);
            if (self.byte_at(pos + i) ^ pattern.byte_at(i)) & mask != 0 {
                return false;
            }
        }
        true
    }

    /// Find the first occurrence of `pattern` within `start..end`.
    /// Returns the msb0 bit position of the match.
    pub fn find(
        &self,
        pattern: &BitStore,
        start: usize,
        end: usize,
        bytealigned: bool,
    ) -> Option<usize> {
        if pattern.len == 0 || pattern.len > end.saturating_sub(start) {
            return None;
        }
        let step = if bytealigned { 8 } else { 1 };
        let mut pos = if bytealigned {
            start.next_multiple_of(8)
        } else {
            start
        };
        while pos + pattern.len <= end {
            if self.matches_at(pattern, pos) {
                return Some(pos);
            }
            pos += step;
        }
        None
    }

    /// Find the last occurrence of `pattern` within `start..end`.
    pub fn rfind(
        &self,
        pattern: &BitStore,
        start: usize,
        end: usize,
        bytealigned: bool,
    ) -> Option<usize> {
        if pattern.len == 0 || pattern.len > end.saturating_sub(start) {
            return None;
        }
        let last = end - pattern.len;
        let mut pos = if bytealigned { last - (last % 8) } else { last };
        if pos < start {
            return None;
        }
        loop {
            if (!bytealigned || pos % 8 == 0) && self.matches_at(pattern, pos) {
                return Some(pos);
            }
            if pos <= start {
                return None;
            }
            pos -= 1;
        }
    }

    /// Iterate over the bits as bools.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }

    /// Bitwise AND with an equal-length store.
    pub fn bitand(&self, other: &BitStore) -> BitStore {
        debug_assert_eq!(self.len, other.len);
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a & b)
            .collect();
        Self {
            data,
            len: self.len,
        }
    }

    /// Bitwise OR with an equal-length store.
    pub fn bitor(&self, other: &BitStore) -> BitStore {
        debug_assert_eq!(self.len, other.len);
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a | b)
            .collect();
        Self {
            data,
            len: self.len,
        }
    }

    /// Bitwise XOR with an equal-length store.
    pub fn bitxor(&self, other: &BitStore) -> BitStore {
        debug_assert_eq!(self.len, other.len);
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a ^ b)
            .collect();
        Self {
            data,
            len: self.len,
        }
    }

    /// Zero any pad bits past `len` in the final byte.
    fn mask_pad(&mut self) {
        let rem = self.len % 8;
        if rem != 0 {
            if let Some(last) = self.data.last_mut() {
                *last &= 0xffu8 << (8 - rem);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_bin(s: &str) -> BitStore {
        BitStore::from_bools(s.chars().map(|c| c == '1'))
    }

    #[test]
    fn test_push_and_get() {
        let s = from_bin("10110");
        assert_eq!(s.len(), 5);
        assert!(s.get(0));
        assert!(!s.get(1));
        assert!(s.get(2));
        assert!(s.get(3));
        assert!(!s.get(4));
    }

    #[test]
    fn test_unaligned_append() {
        let mut a = from_bin("101");
        let b = from_bin("1100111");
        a.append(&b);
        assert_eq!(a, from_bin("1011100111"));
    }

    #[test]
    fn test_slice_unaligned() {
        let s = from_bin("0011010111001");
        assert_eq!(s.slice(2, 9), from_bin("1101011"));
        assert_eq!(s.slice(0, 0), BitStore::new());
    }

    #[test]
    fn test_splice_changes_length() {
        let mut s = from_bin("111000");
        s.splice(1, 4, &from_bin("0"));
        assert_eq!(s, from_bin("1000"));
    }

    #[test]
    fn test_find_and_rfind() {
        let s = from_bin("00111100111");
        let p = from_bin("111");
        assert_eq!(s.find(&p, 0, s.len(), false), Some(2));
        assert_eq!(s.rfind(&p, 0, s.len(), false), Some(8));
        assert_eq!(s.find(&p, 4, s.len(), false), Some(8));
    }

    #[test]
    fn test_canonical_pad() {
        let mut a = from_bin("111");
        a.invert_all();
        assert_eq!(a, from_bin("000"));
        assert_eq!(a.count_ones(), 0);
    }
}
