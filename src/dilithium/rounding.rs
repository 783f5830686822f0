//! Coefficient-level rounding primitives used by signing and verification:
//! `Power2Round`/`Decompose` split a field element into high and low parts,
//! and `MakeHint`/`UseHint` let a verifier recover the signer's high bits from
//! a compressed hint instead of the full polynomial.

use super::types::{Poly, PolyVec};
use super::Q;

/// Signed representative of `a mod m` in `(-m/2, m/2]`, the `mods` operator
/// from FIPS 204 §2.3 (distinct from the ordinary two-sided `mod`).
fn mods(a: i64, m: i64) -> i64 {
    let r = a.rem_euclid(m);
    if r > m / 2 {
        r - m
    } else {
        r
    }
}

/// Splits `r` (taken mod `Q`) into `(r1, r0)` with `r = r1 * 2^d + r0` and
/// `r0 in (-2^(d-1), 2^(d-1)]`.
#[must_use]
pub(crate) fn power2round(r: i64, d: u32) -> (i64, i64) {
    let r = r.rem_euclid(Q);
    let r0 = mods(r, 1 << d);
    ((r - r0) >> d, r0)
}

/// Splits `r` into `(r1, r0)` with `r = r1 * 2*gamma2 + r0 (mod Q)` and `r0`
/// the signed remainder in `(-gamma2, gamma2]`, folding the boundary case
/// where `r1` would otherwise index the (unused) top bucket.
#[must_use]
pub(crate) fn decompose(r: i64, gamma2: i64) -> (i64, i64) {
    let r = r.rem_euclid(Q);
    let r0 = mods(r, 2 * gamma2);
    if r - r0 == Q - 1 {
        (0, r0 - 1)
    } else {
        ((r - r0) / (2 * gamma2), r0)
    }
}

#[must_use]
pub(crate) fn high_bits(r: i64, gamma2: i64) -> i64 {
    decompose(r, gamma2).0
}

#[must_use]
pub(crate) fn low_bits(r: i64, gamma2: i64) -> i64 {
    decompose(r, gamma2).1
}

/// Whether adding `z` to `r` changes the high-order bits, i.e. whether a hint
/// bit is needed for the verifier to recover `HighBits(r)` from `HighBits(r+z)`.
#[must_use]
pub(crate) fn make_hint(z: i64, r: i64, gamma2: i64) -> bool {
    high_bits(r, gamma2) != high_bits((r + z).rem_euclid(Q), gamma2)
}

/// Recovers `HighBits(r)` given a hint bit produced by [`make_hint`] against the
/// signer's actual `r`.
#[must_use]
pub(crate) fn use_hint(hint: bool, r: i64, gamma2: i64) -> i64 {
    let m = (Q - 1) / (2 * gamma2);
    let (r1, r0) = decompose(r, gamma2);
    if !hint {
        return r1;
    }
    if r0 > 0 {
        (r1 + 1).rem_euclid(m)
    } else {
        (r1 - 1).rem_euclid(m)
    }
}

#[must_use]
pub(crate) fn poly_power2round(p: &Poly, d: u32) -> (Poly, Poly) {
    let mut hi = [super::types::Z::zero(); 256];
    let mut lo = [super::types::Z::zero(); 256];
    for i in 0..256 {
        let (h, l) = power2round(i64::from(p[i].centered()), d);
        hi[i] = super::types::Z::from_i64(h);
        lo[i] = super::types::Z::from_i64(l);
    }
    (hi, lo)
}

#[must_use]
pub(crate) fn poly_high_bits(p: &Poly, gamma2: i64) -> Poly {
    core::array::from_fn(|i| super::types::Z::from_i64(high_bits(i64::from(p[i].centered()), gamma2)))
}

#[must_use]
pub(crate) fn poly_low_bits(p: &Poly, gamma2: i64) -> Poly {
    core::array::from_fn(|i| super::types::Z::from_i64(low_bits(i64::from(p[i].centered()), gamma2)))
}

#[must_use]
pub(crate) fn poly_make_hint(z: &Poly, r: &Poly, gamma2: i64) -> ([bool; 256], u32) {
    let mut hints = [false; 256];
    let mut weight = 0u32;
    for i in 0..256 {
        let h = make_hint(i64::from(z[i].centered()), i64::from(r[i].centered()), gamma2);
        hints[i] = h;
        weight += u32::from(h);
    }
    (hints, weight)
}

#[must_use]
pub(crate) fn poly_use_hint(hints: &[bool; 256], r: &Poly, gamma2: i64) -> Poly {
    core::array::from_fn(|i| {
        super::types::Z::from_i64(use_hint(hints[i], i64::from(r[i].centered()), gamma2))
    })
}

#[must_use]
pub(crate) fn polyvec_power2round<const K: usize>(v: &PolyVec<K>, d: u32) -> (PolyVec<K>, PolyVec<K>) {
    let mut hi = [[super::types::Z::zero(); 256]; K];
    let mut lo = [[super::types::Z::zero(); 256]; K];
    for i in 0..K {
        let (h, l) = poly_power2round(&v[i], d);
        hi[i] = h;
        lo[i] = l;
    }
    (hi, lo)
}

#[must_use]
pub(crate) fn polyvec_high_bits<const K: usize>(v: &PolyVec<K>, gamma2: i64) -> PolyVec<K> {
    core::array::from_fn(|i| poly_high_bits(&v[i], gamma2))
}

#[must_use]
pub(crate) fn polyvec_low_bits<const K: usize>(v: &PolyVec<K>, gamma2: i64) -> PolyVec<K> {
    core::array::from_fn(|i| poly_low_bits(&v[i], gamma2))
}

#[must_use]
pub(crate) fn polyvec_make_hint<const K: usize>(
    z: &PolyVec<K>, r: &PolyVec<K>, gamma2: i64,
) -> ([[bool; 256]; K], u32) {
    let mut hints = [[false; 256]; K];
    let mut weight = 0u32;
    for i in 0..K {
        let (h, w) = poly_make_hint(&z[i], &r[i], gamma2);
        hints[i] = h;
        weight += w;
    }
    (hints, weight)
}

#[must_use]
pub(crate) fn polyvec_use_hint<const K: usize>(
    hints: &[[bool; 256]; K], r: &PolyVec<K>, gamma2: i64,
) -> PolyVec<K> {
    core::array::from_fn(|i| poly_use_hint(&hints[i], &r[i], gamma2))
}

#[cfg(test)]
mod tests {
    use super::{decompose, power2round};
    use crate::dilithium::Q;

    #[test]
    fn test_power2round_reconstructs_value() {
        for r in [0i64, 1, 5000, Q - 1, 4_190_208] {
            let (r1, r0) = power2round(r, 13);
            let rebuilt = (r1 * (1 << 13) + r0).rem_euclid(Q);
            assert_eq!(rebuilt, r.rem_euclid(Q));
        }
    }

    #[test]
    fn test_decompose_reconstructs_value() {
        let gamma2 = (Q - 1) / 32;
        for r in [0i64, 1, 5000, Q - 1, 4_190_208] {
            let (r1, r0) = decompose(r, gamma2);
            let rebuilt = (r1 * (2 * gamma2) + r0).rem_euclid(Q);
            assert_eq!(rebuilt, r.rem_euclid(Q));
        }
    }
}
