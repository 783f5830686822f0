//! Classic McEliece decapsulation (spec §4.8): recovers the error vector via
//! Berlekamp–Massey and root-finding, confirms it against the transmitted
//! hash, and falls back to implicit rejection on any mismatch.

use alloc::vec;
use alloc::vec::Vec;

use sha3::digest::XofReader;

use super::bm::berlekamp_massey;
use super::gf::Field;
use super::goppa::{eval_at_support, support_gen, syndrome};
use super::keygen::{unpack_secret_key, Params};
use crate::ct::{cmov, ct_eq, ct_is_zero_u16};
use crate::hash::{kdf32, shake256_xof};

/// Horner evaluation of a polynomial given explicit low-to-high coefficients
/// (unlike [`super::goppa::eval_poly`], which assumes an implicit monic
/// leading term) — the Berlekamp–Massey locator carries its leading
/// coefficient explicitly.
fn eval_full_poly(coeffs: &[u16], x: u16, field: Field) -> u16 {
    let mut acc = 0u16;
    for &c in coeffs.iter().rev() {
        acc = field.add(field.mul(acc, x), c);
    }
    acc
}

fn get_bit(bytes: &[u8], pos: usize) -> u8 {
    (bytes[pos / 8] >> (pos % 8)) & 1
}

fn set_bit(bytes: &mut [u8], pos: usize) {
    bytes[pos / 8] |= 1 << (pos % 8);
}

/// Decodes the padded received vector `r` (the transmitted syndrome left-
/// justified into an `n`-bit buffer, zero elsewhere) against the secret
/// Goppa code, returning the recovered error vector and whether decoding
/// succeeded: exactly `t` error positions were found (the standard
/// bounded-distance-decoding success criterion) *and* the decoded error
/// vector reproduces the original syndrome.
fn decode(g: &[u16], support: &[u16], r: &[u8], t: usize, field: Field) -> (Vec<u8>, bool) {
    let n = support.len();
    let g_at_support = eval_at_support(g, support, field);
    let inv_g_at_support: Vec<u16> = g_at_support.iter().map(|&v| field.inv(v)).collect();
    let syndromes = syndrome(g, support, &inv_g_at_support, r, t, field);
    let locator = berlekamp_massey(&syndromes, t, field);

    // `locator` is the connection polynomial of the recurrence satisfied by
    // the syndrome sequence, `prod_j (1 - L_j x)`: its roots sit at `1/L_j`,
    // not `L_j`. Rather than inverting every support point (undefined at the
    // element `0`, which legitimately appears in the support), evaluate the
    // coefficient-reversed polynomial directly at `L_j` instead — algebraically
    // identical (`x^deg * locator(1/x)`) and well-defined everywhere.
    let reversed: Vec<u16> = locator.iter().rev().copied().collect();

    // Root test folds into `e`/`weight` via a 0/1 mask rather than branching
    // on `eval_full_poly`'s result, which depends on the (secret) received
    // vector through the syndrome and locator.
    let mut e = vec![0u8; n.div_ceil(8)];
    let mut weight = 0u32;
    for (i, &l_i) in support.iter().enumerate() {
        let is_root = u8::from(ct_is_zero_u16(eval_full_poly(&reversed, l_i, field)));
        e[i / 8] |= is_root << (i % 8);
        weight += u32::from(is_root);
    }
    let weight_ok = weight == u32::try_from(t).expect("t fits u32");

    // Recompute the syndrome of the decoded error vector and compare it
    // against the one the ciphertext actually carried — a decoder that
    // merely finds `t` roots without reproducing the syndrome has not
    // decoded the received word, only stumbled onto a same-weight vector.
    let check_syndromes = syndrome(g, support, &inv_g_at_support, &e, t, field);
    let syndrome_diff = syndromes
        .iter()
        .zip(check_syndromes.iter())
        .fold(0u16, |acc, (a, b)| acc | (a ^ b));
    let syndrome_ok = ct_is_zero_u16(syndrome_diff);

    (e, weight_ok & syndrome_ok)
}

/// Derives pseudorandom implicit-rejection error material from the secret
/// seed and the ciphertext, used in place of a real decode on failure so the
/// shared secret remains indistinguishable from a genuine one (spec §4.8,
/// mirroring the Fujisaki–Okamoto treatment in [`crate::kyber`]).
fn implicit_reject_vector(seed: &[u8; 32], ct: &[u8], n: usize) -> Vec<u8> {
    let mut out = vec![0u8; n.div_ceil(8)];
    let mut reader = shake256_xof(&[b"mceliece-reject", seed, ct]);
    reader.read(&mut out);
    out
}

/// Decapsulates `ct` under `sk`, returning the shared secret. Always
/// succeeds from the caller's perspective: a malformed or forged ciphertext
/// yields a pseudorandom key rather than an error (spec §4.8), so callers
/// never see an `AuthFailure` from this path the way Kyber surfaces none
/// either.
#[must_use]
pub(crate) fn mceliece_decap(sk: &[u8], ct: &[u8], params: &Params) -> [u8; 32] {
    let pk_nrows = params.pk_nrows;
    let s_len = pk_nrows.div_ceil(8);
    let s = &ct[0..s_len];
    let tau = &ct[s_len..s_len + 32];

    let (seed, g, control_bits) = unpack_secret_key(sk, params);
    let support = support_gen(control_bits, params.field.m, params.n);

    let mut r = vec![0u8; params.n.div_ceil(8)];
    for row in 0..pk_nrows {
        if get_bit(s, row) == 1 {
            set_bit(&mut r, row);
        }
    }

    let (e_decoded, decode_ok) = decode(&g, &support, &r, params.t, params.field);
    let tau_prime = kdf32(&[&[0x02], &e_decoded]);
    let hash_ok = ct_eq(&tau_prime, tau);
    let success = decode_ok & hash_ok;

    let e_reject = implicit_reject_vector(&seed, ct, params.n);
    let mut e_used = e_decoded;
    cmov(&mut e_used, &e_reject, !success);

    let mut tag = [0x01u8];
    cmov(&mut tag, &[0x00u8], !success);

    kdf32(&[&tag, &e_used, s, tau])
}
