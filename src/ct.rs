//! Constant-time primitives shared by all three families: `verify` (compare),
//! `cmov`/`select` (conditional move), and little helpers built on top.
//!
//! Per spec §5 and §9, secret-dependent control flow and memory addressing
//! are forbidden on the paths these wrap: CPA decryption, the FO
//! re-encryption compare, McEliece decoding, Beneš application,
//! Berlekamp–Massey, GF inversion, and all packing/unpacking of secret
//! material. Rather than hand-rolling bitmask arithmetic at every call site
//! (as the original C source does, and as the teacher's `types.rs` does with
//! `// TODO Not quite CT` branches), this crate routes every such comparison
//! and selection through `subtle`, which a target's optimizer cannot turn
//! back into a branch without defeating its own `black_box` barriers.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Constant-time equality over two equal-length byte slices. Returns `true`
/// iff every byte matches; never short-circuits.
#[must_use]
pub(crate) fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    debug_assert_eq!(a.len(), b.len(), "ct_eq: length mismatch is itself a side channel");
    a.ct_eq(b).into()
}

/// Constant-time inequality; the complement of [`ct_eq`].
#[must_use]
pub(crate) fn ct_neq(a: &[u8], b: &[u8]) -> bool {
    !ct_eq(a, b)
}

/// Conditionally overwrite `dst` with `src`, in constant time with respect to
/// `cond`. Used for FO implicit rejection (swap in `z`-derived key material)
/// and for McEliece's decapsulation merge-select between a real and an
/// implicit-reject error vector.
pub(crate) fn cmov(dst: &mut [u8], src: &[u8], cond: bool) {
    debug_assert_eq!(dst.len(), src.len());
    let choice = Choice::from(u8::from(cond));
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d = u8::conditional_select(d, s, choice);
    }
}

/// Conditionally select one 32-byte array or another, in constant time.
#[must_use]
pub(crate) fn select32(cond: bool, a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let choice = Choice::from(u8::from(cond));
    core::array::from_fn(|i| u8::conditional_select(&a[i], &b[i], choice))
}

/// Constant-time "is zero" test over a byte slice — used by GF(2^m) inversion
/// (spec §4.6) where branching on "is this field element zero" would leak
/// which secret coefficients vanish.
#[must_use]
pub(crate) fn ct_is_zero(a: &[u8]) -> bool {
    let or_all = a.iter().fold(0u8, |acc, &b| acc | b);
    or_all.ct_eq(&0u8).into()
}

/// Constant-time "is zero" test over a 16-bit word (GF(2^13)/GF(2^12) elements
/// are stored as `u16`).
#[must_use]
pub(crate) fn ct_is_zero_u16(a: u16) -> bool {
    a.ct_eq(&0u16).into()
}
