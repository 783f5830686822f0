//! Byte encodings for the pieces that cross the wire: `t1`/`t0` in the key
//! pair, `s1`/`s2`/`t0` in the signing key, and `z`/hints in the signature.
//! Every coefficient is packed into a fixed bit width, LSB-first, with no
//! padding between coefficients — only the final byte of a polynomial may be
//! partially filled.

use super::types::{Poly, PolyVec, Z};
use super::D;

fn bytes_for(bits: u32) -> usize {
    (256 * bits as usize).div_ceil(8)
}

/// Packs 256 unsigned values (each `< 2^bits`) into `out`, LSB-first.
fn pack_bits(values: &[u32; 256], bits: u32, out: &mut [u8]) {
    debug_assert_eq!(out.len(), bytes_for(bits));
    let mut acc: u64 = 0;
    let mut acc_bits = 0u32;
    let mut pos = 0usize;
    for &v in values {
        acc |= u64::from(v) << acc_bits;
        acc_bits += bits;
        while acc_bits >= 8 {
            out[pos] = acc as u8;
            pos += 1;
            acc >>= 8;
            acc_bits -= 8;
        }
    }
    if acc_bits > 0 {
        out[pos] = acc as u8;
    }
}

/// Inverse of [`pack_bits`].
fn unpack_bits(bytes: &[u8], bits: u32) -> [u32; 256] {
    debug_assert_eq!(bytes.len(), bytes_for(bits));
    let mask = (1u64 << bits) - 1;
    let mut acc: u64 = 0;
    let mut acc_bits = 0u32;
    let mut byte_pos = 0usize;
    core::array::from_fn(|_| {
        while acc_bits < bits {
            acc |= u64::from(bytes[byte_pos]) << acc_bits;
            byte_pos += 1;
            acc_bits += 8;
        }
        let v = (acc & mask) as u32;
        acc >>= bits;
        acc_bits -= bits;
        v
    })
}

/// `t1`: the high bits from `Power2Round`, already unsigned in `[0, 2^10)`.
pub(crate) fn pack_t1(p: &Poly, out: &mut [u8]) {
    let values: [u32; 256] = core::array::from_fn(|i| p[i].get() as u32);
    pack_bits(&values, 10, out);
}

pub(crate) fn unpack_t1(bytes: &[u8]) -> Poly {
    let values = unpack_bits(bytes, 10);
    core::array::from_fn(|i| Z::from_canonical(values[i] as i32))
}

pub(crate) fn t1_bytes() -> usize {
    bytes_for(10)
}

/// `t0`: the low bits from `Power2Round`, centered in `(-2^(d-1), 2^(d-1)]`,
/// shifted to the unsigned range `[0, 2^d)` via `2^(d-1) - centered`.
pub(crate) fn pack_t0(p: &Poly, out: &mut [u8]) {
    let bias = 1i64 << (D - 1);
    let values: [u32; 256] = core::array::from_fn(|i| (bias - i64::from(p[i].centered())) as u32);
    pack_bits(&values, D, out);
}

pub(crate) fn unpack_t0(bytes: &[u8]) -> Poly {
    let bias = 1i64 << (D - 1);
    let values = unpack_bits(bytes, D);
    core::array::from_fn(|i| Z::from_i64(bias - i64::from(values[i])))
}

pub(crate) fn t0_bytes() -> usize {
    bytes_for(D)
}

fn eta_bits(eta: u32) -> u32 {
    if eta == 2 {
        3
    } else {
        4
    }
}

/// `s1`/`s2`: coefficients centered in `[-eta, eta]`, shifted to `[0, 2*eta]`
/// via `eta - centered`.
pub(crate) fn pack_eta(p: &Poly, eta: u32, out: &mut [u8]) {
    let values: [u32; 256] =
        core::array::from_fn(|i| (i64::from(eta) - i64::from(p[i].centered())) as u32);
    pack_bits(&values, eta_bits(eta), out);
}

pub(crate) fn unpack_eta(bytes: &[u8], eta: u32) -> Poly {
    let values = unpack_bits(bytes, eta_bits(eta));
    core::array::from_fn(|i| Z::from_i64(i64::from(eta) - i64::from(values[i])))
}

pub(crate) fn eta_bytes(eta: u32) -> usize {
    bytes_for(eta_bits(eta))
}

fn gamma1_bits(gamma1: i64) -> u32 {
    if gamma1 == (1 << 17) {
        18
    } else {
        20
    }
}

/// `z`: coefficients centered in `(-gamma1, gamma1]`, shifted to `[0, 2*gamma1)`
/// via `gamma1 - 1 - centered`, mirroring [`super::sampling::expand_mask`]'s encoding.
pub(crate) fn pack_z(p: &Poly, gamma1: i64, out: &mut [u8]) {
    let values: [u32; 256] =
        core::array::from_fn(|i| (gamma1 - 1 - i64::from(p[i].centered())) as u32);
    pack_bits(&values, gamma1_bits(gamma1), out);
}

pub(crate) fn unpack_z(bytes: &[u8], gamma1: i64) -> Poly {
    let values = unpack_bits(bytes, gamma1_bits(gamma1));
    core::array::from_fn(|i| Z::from_i64(gamma1 - 1 - i64::from(values[i])))
}

pub(crate) fn z_bytes(gamma1: i64) -> usize {
    bytes_for(gamma1_bits(gamma1))
}

fn w1_bits(gamma2: i64) -> u32 {
    if gamma2 == (super::Q - 1) / 88 {
        6
    } else {
        4
    }
}

/// `w1`: the already-unsigned high bits from `Decompose`.
pub(crate) fn pack_w1(p: &Poly, gamma2: i64, out: &mut [u8]) {
    let values: [u32; 256] = core::array::from_fn(|i| p[i].get() as u32);
    pack_bits(&values, w1_bits(gamma2), out);
}

pub(crate) fn w1_bytes(gamma2: i64) -> usize {
    bytes_for(w1_bits(gamma2))
}

/// Packs a `K`-polynomial hint vector into the signature's final
/// `omega + K` bytes: the nonzero positions of each polynomial, concatenated
/// in order, followed (at offset `omega`) by each polynomial's cumulative
/// running total of hint bits seen so far.
pub(crate) fn pack_hint<const K: usize>(hints: &[[bool; 256]; K], omega: usize, out: &mut [u8]) {
    debug_assert_eq!(out.len(), omega + K);
    let mut index = 0usize;
    for (i, poly_hints) in hints.iter().enumerate() {
        for (j, &h) in poly_hints.iter().enumerate() {
            if h {
                out[index] = j as u8;
                index += 1;
            }
        }
        out[omega + i] = index as u8;
    }
}

/// Inverse of [`pack_hint`]. Returns `None` on any malformed encoding
/// (non-monotonic counts, overflow past `omega`, or out-of-order indices
/// within a polynomial) rather than panicking, since this decodes
/// attacker-controlled signature bytes.
pub(crate) fn unpack_hint<const K: usize>(bytes: &[u8], omega: usize) -> Option<[[bool; 256]; K]> {
    debug_assert_eq!(bytes.len(), omega + K);
    let mut hints = [[false; 256]; K];
    let mut prev = 0usize;
    for i in 0..K {
        let count = bytes[omega + i] as usize;
        if count < prev || count > omega {
            return None;
        }
        let mut last = None;
        for &pos in &bytes[prev..count] {
            let pos = pos as usize;
            if let Some(l) = last {
                if pos <= l {
                    return None;
                }
            }
            hints[i][pos] = true;
            last = Some(pos);
        }
        prev = count;
    }
    if bytes[omega..omega + K].iter().map(|&b| b as usize).last().unwrap_or(0) != prev {
        return None;
    }
    Some(hints)
}

pub(crate) fn polyvec_pack_t1<const K: usize>(v: &PolyVec<K>, out: &mut [u8]) {
    let stride = t1_bytes();
    for i in 0..K {
        pack_t1(&v[i], &mut out[i * stride..(i + 1) * stride]);
    }
}

pub(crate) fn polyvec_unpack_t1<const K: usize>(bytes: &[u8]) -> PolyVec<K> {
    let stride = t1_bytes();
    core::array::from_fn(|i| unpack_t1(&bytes[i * stride..(i + 1) * stride]))
}

pub(crate) fn polyvec_pack_t0<const K: usize>(v: &PolyVec<K>, out: &mut [u8]) {
    let stride = t0_bytes();
    for i in 0..K {
        pack_t0(&v[i], &mut out[i * stride..(i + 1) * stride]);
    }
}

pub(crate) fn polyvec_unpack_t0<const K: usize>(bytes: &[u8]) -> PolyVec<K> {
    let stride = t0_bytes();
    core::array::from_fn(|i| unpack_t0(&bytes[i * stride..(i + 1) * stride]))
}

pub(crate) fn polyvec_pack_eta<const K: usize>(v: &PolyVec<K>, eta: u32, out: &mut [u8]) {
    let stride = eta_bytes(eta);
    for i in 0..K {
        pack_eta(&v[i], eta, &mut out[i * stride..(i + 1) * stride]);
    }
}

pub(crate) fn polyvec_unpack_eta<const K: usize>(bytes: &[u8], eta: u32) -> PolyVec<K> {
    let stride = eta_bytes(eta);
    core::array::from_fn(|i| unpack_eta(&bytes[i * stride..(i + 1) * stride], eta))
}

pub(crate) fn polyvec_pack_z<const L: usize>(v: &PolyVec<L>, gamma1: i64, out: &mut [u8]) {
    let stride = z_bytes(gamma1);
    for i in 0..L {
        pack_z(&v[i], gamma1, &mut out[i * stride..(i + 1) * stride]);
    }
}

pub(crate) fn polyvec_unpack_z<const L: usize>(bytes: &[u8], gamma1: i64) -> PolyVec<L> {
    let stride = z_bytes(gamma1);
    core::array::from_fn(|i| unpack_z(&bytes[i * stride..(i + 1) * stride], gamma1))
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::vec;

    use super::*;
    use crate::dilithium::types::poly_zero;

    #[test]
    fn test_t1_round_trips() {
        let mut p = poly_zero();
        for (i, c) in p.iter_mut().enumerate() {
            *c = Z::from_canonical((i % 1024) as i32);
        }
        let mut buf = vec![0u8; t1_bytes()];
        pack_t1(&p, &mut buf);
        let back = unpack_t1(&buf);
        assert!(back.iter().zip(p.iter()).all(|(a, b)| a.get() == b.get()));
    }

    #[test]
    fn test_eta_round_trips() {
        for eta in [2u32, 4] {
            let mut p = poly_zero();
            for (i, c) in p.iter_mut().enumerate() {
                let v = (i as i64 % (2 * i64::from(eta) + 1)) - i64::from(eta);
                *c = Z::from_i64(v);
            }
            let mut buf = vec![0u8; eta_bytes(eta)];
            pack_eta(&p, eta, &mut buf);
            let back = unpack_eta(&buf, eta);
            for i in 0..256 {
                assert_eq!(back[i].centered(), p[i].centered());
            }
        }
    }

    #[test]
    fn test_hint_round_trips() {
        let mut hints = [[false; 256]; 4];
        hints[0][5] = true;
        hints[0][10] = true;
        hints[2][255] = true;
        let omega = 16;
        let mut buf = vec![0u8; omega + 4];
        pack_hint(&hints, omega, &mut buf);
        let back: [[bool; 256]; 4] = unpack_hint(&buf, omega).expect("valid hint decodes");
        assert_eq!(back, hints);
    }
}
