use sha3::digest::XofReader;

use super::types::{Poly, PolyVec, Z};
use super::Q;
use crate::hash::{shake256_xof, xof};

/// Expands one cell of the public matrix `A` from `rho` via rejection
/// sampling over a SHAKE-128 stream, the same technique Kyber's `sample_ntt`
/// uses (`reject >= Q`, two candidates per 3-byte draw) but over Dilithium's
/// larger modulus, so each candidate needs the full 3 bytes (23-bit mask)
/// rather than splitting one draw into two 12-bit candidates.
#[allow(clippy::cast_possible_truncation)]
fn sample_a_cell(mut reader: impl XofReader) -> Poly {
    let mut out = [Z::zero(); 256];
    let mut c = [0u8; 3];
    let mut j = 0usize;
    while j < 256 {
        reader.read(&mut c);
        let candidate = (u32::from(c[0]) | (u32::from(c[1]) << 8) | (u32::from(c[2]) << 16)) & 0x007F_FFFF;
        if (candidate as i64) < Q {
            out[j] = Z::from_canonical(candidate as i32);
            j += 1;
        }
    }
    out
}

/// `ExpandA`: builds the `K x L` public matrix from `rho`, one cell at a
/// time, each cell domain-separated by its `(row, col)` indices.
#[must_use]
pub(crate) fn expand_a<const K: usize, const L: usize>(rho: &[u8; 32]) -> [[Poly; L]; K] {
    core::array::from_fn(|i| core::array::from_fn(|j| sample_a_cell(xof(rho, i as u8, j as u8))))
}

/// Rejection-samples one polynomial with coefficients in `[-eta, eta]` from a
/// SHAKE-256 stream seeded by `rho_prime` and a 2-byte little-endian nonce.
#[allow(clippy::cast_possible_truncation)]
fn sample_eta_poly(rho_prime: &[u8; 64], nonce: u16, eta: u32) -> Poly {
    let mut out = [Z::zero(); 256];
    let mut reader = shake256_xof(&[rho_prime, &nonce.to_le_bytes()]);
    let mut j = 0usize;
    let mut byte_buf = [0u8; 1];
    while j < 256 {
        reader.read(&mut byte_buf);
        let b = byte_buf[0];
        for nibble in [b & 0x0F, b >> 4] {
            if j >= 256 {
                break;
            }
            let accept = if eta == 2 { nibble < 15 } else { nibble < 9 };
            if accept {
                let centered = if eta == 2 {
                    i64::from(eta) - i64::from(nibble % 5)
                } else {
                    i64::from(eta) - i64::from(nibble)
                };
                out[j] = Z::from_i64(centered);
                j += 1;
            }
        }
    }
    out
}

/// `ExpandS`: samples the secret vectors `s1` (length `L`) and `s2` (length
/// `K`) from a single seed `rho_prime`, with nonces `0..L` and `L..L+K`
/// respectively so the two vectors never reuse a stream.
#[must_use]
pub(crate) fn expand_s<const K: usize, const L: usize>(
    rho_prime: &[u8; 64], eta: u32,
) -> (PolyVec<L>, PolyVec<K>) {
    let s1 = core::array::from_fn(|i| sample_eta_poly(rho_prime, i as u16, eta));
    let s2 = core::array::from_fn(|i| sample_eta_poly(rho_prime, (L + i) as u16, eta));
    (s1, s2)
}

/// Samples one polynomial with coefficients in `(-gamma1, gamma1]` from
/// `rho_double_prime` and a 2-byte nonce (`ExpandMask`, per-index call).
#[allow(clippy::cast_possible_truncation)]
fn sample_gamma1_poly(rho_double_prime: &[u8; 64], nonce: u16, gamma1: i64) -> Poly {
    let bits = if gamma1 == (1 << 17) { 18u32 } else { 20u32 };
    let mut reader = shake256_xof(&[rho_double_prime, &nonce.to_le_bytes()]);
    let mut out = [Z::zero(); 256];
    let mut bitbuf: u64 = 0;
    let mut bitcount = 0u32;
    let mut byte = [0u8; 1];
    let mut j = 0usize;
    while j < 256 {
        while bitcount < bits {
            reader.read(&mut byte);
            bitbuf |= u64::from(byte[0]) << bitcount;
            bitcount += 8;
        }
        let mask = (1u64 << bits) - 1;
        let raw = bitbuf & mask;
        bitbuf >>= bits;
        bitcount -= bits;
        let centered = gamma1 - 1 - raw as i64;
        out[j] = Z::from_i64(centered);
        j += 1;
    }
    out
}

/// `ExpandMask`: samples the masking vector `y` of length `L` for signing
/// attempt `kappa`, one polynomial per index with consecutive nonces.
#[must_use]
pub(crate) fn expand_mask<const L: usize>(
    rho_double_prime: &[u8; 64], kappa: u16, gamma1: i64,
) -> PolyVec<L> {
    core::array::from_fn(|i| {
        sample_gamma1_poly(rho_double_prime, kappa + i as u16, gamma1)
    })
}

/// `SampleInBall`: builds the challenge polynomial `c` with exactly `tau`
/// nonzero coefficients (each `+1` or `-1`) from the commitment hash `c_tilde`,
/// via a Fisher–Yates-style rejection shuffle seeded by the same SHAKE-256 stream
/// (the standard Dilithium technique: draw a sign-bit stream first, then walk
/// indices `255` down to `256 - tau`, swapping in freshly rejected positions).
#[must_use]
pub(crate) fn sample_in_ball(c_tilde: &[u8], tau: usize) -> Poly {
    let mut reader = shake256_xof(&[c_tilde]);
    let mut sign_bytes = [0u8; 8];
    reader.read(&mut sign_bytes);
    let mut sign_bits = u64::from_le_bytes(sign_bytes);

    let mut c = [Z::zero(); 256];
    let mut byte = [0u8; 1];
    for i in (256 - tau)..256 {
        let j = loop {
            reader.read(&mut byte);
            let candidate = usize::from(byte[0]);
            if candidate <= i {
                break candidate;
            }
        };
        c[i] = c[j];
        let sign = sign_bits & 1;
        sign_bits >>= 1;
        c[j] = if sign == 1 { Z::from_i64(-1) } else { Z::from_i64(1) };
    }
    c
}

#[cfg(test)]
mod tests {
    use super::sample_in_ball;

    #[test]
    fn test_sample_in_ball_has_exact_weight() {
        let c_tilde = [7u8; 48];
        let c = sample_in_ball(&c_tilde, 39);
        let weight = c.iter().filter(|z| z.get() != 0).count();
        assert_eq!(weight, 39);
        assert!(c.iter().all(|z| z.get() == 0 || z.centered().abs() == 1));
    }
}
