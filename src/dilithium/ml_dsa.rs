//! ML-DSA key generation, signing, and verification (the Fiat–Shamir-with-
//! aborts loop), parameterized by each security level's `(K, L, eta, gamma1,
//! gamma2, tau, beta, omega)` tuple via const generics so every buffer —
//! keys, signature, and rejection-loop scratch alike — stays on the stack.

use crate::ct::ct_eq;
use crate::error::PqcError;
use crate::hash::shake256;

use super::ntt::{ntt, ntt_inv, poly_pointwise};
use super::packing::{
    eta_bytes, pack_hint, pack_w1, polyvec_pack_eta, polyvec_pack_t0, polyvec_pack_t1,
    polyvec_pack_z, polyvec_unpack_eta, polyvec_unpack_t0, polyvec_unpack_t1, polyvec_unpack_z,
    t0_bytes, unpack_hint, w1_bytes, z_bytes,
};
use super::rounding::{
    polyvec_high_bits, polyvec_low_bits, polyvec_make_hint, polyvec_power2round, polyvec_use_hint,
};
use super::sampling::{expand_a, expand_mask, expand_s, sample_in_ball};
use super::types::{poly_add, polyvec_add, polyvec_max_abs, polyvec_sub, Poly, PolyVec, Z};
use super::D;

const TR_BYTES: usize = 64;
const MU_BYTES: usize = 64;
/// Rejection loops in `ExpandS`/`ExpandMask` always terminate; key generation
/// itself never restarts (spec: "key-gen is infallible aside from entropy
/// failure"), so unlike McEliece there is no keygen retry cap here.
const SIGN_RETRIES_MAX: usize = 1000;
/// Upper bound on any parameter set's packed `w1` vector (`K=8` rows at the
/// widest 6-bit encoding), used to size fixed scratch without threading an
/// extra const generic through every call site.
const MAX_W1_PACKED: usize = 8 * 256 * 6 / 8;
/// Upper bound on `c_tilde`'s length across all three parameter sets.
const MAX_CTILDE: usize = 64;

fn matrix_vec_mul<const K: usize, const L: usize>(
    a_hat: &[[Poly; L]; K], v_hat: &PolyVec<L>,
) -> PolyVec<K> {
    core::array::from_fn(|k| {
        let mut acc = [Z::zero(); 256];
        for l in 0..L {
            acc = poly_add(&acc, &poly_pointwise(&a_hat[k][l], &v_hat[l]));
        }
        acc
    })
}

fn polyvec_ntt<const K: usize>(v: &PolyVec<K>) -> PolyVec<K> {
    core::array::from_fn(|i| ntt(&v[i]))
}

fn polyvec_ntt_inv<const K: usize>(v: &PolyVec<K>) -> PolyVec<K> {
    core::array::from_fn(|i| ntt_inv(&v[i]))
}

fn poly_scale_c<const K: usize>(c_hat: &Poly, v_hat: &PolyVec<K>) -> PolyVec<K> {
    core::array::from_fn(|i| poly_pointwise(c_hat, &v_hat[i]))
}

fn pack_w1_vec<const K: usize>(w1: &PolyVec<K>, gamma2: i64, out: &mut [u8]) {
    let stride = w1_bytes(gamma2);
    for i in 0..K {
        pack_w1(&w1[i], gamma2, &mut out[i * stride..(i + 1) * stride]);
    }
}

/// The FIPS 204 "pure" message representation prefix: domain byte `0`
/// followed by the context string's length, preceding `context` and the
/// message itself in every hash that binds to them.
fn message_prefix(context: &[u8]) -> [u8; 2] {
    [0x00, context.len() as u8]
}

/// `ML-DSA.KeyGen`: derives `(rho, rho_prime, key_seed)` from a single random
/// seed domain-separated by the parameter set's `(K, L)`, expands the public
/// matrix, samples the secret vectors, and packs `pk`/`sk`.
pub(crate) fn ml_dsa_keygen<
    const K: usize,
    const L: usize,
    const ETA: u32,
    const PK_LEN: usize,
    const SK_LEN: usize,
>(
    seed: &[u8; 32],
) -> ([u8; PK_LEN], [u8; SK_LEN]) {
    let mut expanded = [0u8; 128];
    shake256(&[seed, &[K as u8], &[L as u8]], &mut expanded);
    let rho: [u8; 32] = expanded[0..32].try_into().expect("32 bytes");
    let rho_prime: [u8; 64] = expanded[32..96].try_into().expect("64 bytes");
    let key_seed: [u8; 32] = expanded[96..128].try_into().expect("32 bytes");

    let a_hat: [[Poly; L]; K] = expand_a::<K, L>(&rho);
    let (s1, s2) = expand_s::<K, L>(&rho_prime, ETA);

    let s1_hat = polyvec_ntt(&s1);
    let t_hat = matrix_vec_mul::<K, L>(&a_hat, &s1_hat);
    let t = polyvec_add(&polyvec_ntt_inv(&t_hat), &s2);
    let (t1, t0) = polyvec_power2round::<K>(&t, D);

    let mut pk = [0u8; PK_LEN];
    pk[0..32].copy_from_slice(&rho);
    polyvec_pack_t1::<K>(&t1, &mut pk[32..]);

    let mut tr = [0u8; TR_BYTES];
    shake256(&[&pk], &mut tr);

    let eta_b = eta_bytes(ETA);
    let mut sk = [0u8; SK_LEN];
    let mut off = 0usize;
    sk[off..off + 32].copy_from_slice(&rho);
    off += 32;
    sk[off..off + 32].copy_from_slice(&key_seed);
    off += 32;
    sk[off..off + TR_BYTES].copy_from_slice(&tr);
    off += TR_BYTES;
    polyvec_pack_eta::<L>(&s1, ETA, &mut sk[off..off + L * eta_b]);
    off += L * eta_b;
    polyvec_pack_eta::<K>(&s2, ETA, &mut sk[off..off + K * eta_b]);
    off += K * eta_b;
    polyvec_pack_t0::<K>(&t0, &mut sk[off..off + K * t0_bytes()]);

    (pk, sk)
}

/// Checks that `pk` and `sk` correspond by recomputing `tr = H(pk)` and
/// comparing it against the `tr` `sk` already carries, mirroring the KEM
/// families' `validate_keypair_with_rng_vartime`. Not constant-time beyond
/// the final comparison.
#[must_use]
pub(crate) fn ml_dsa_validate_keypair(pk: &[u8], sk: &[u8]) -> bool {
    let mut tr = [0u8; TR_BYTES];
    shake256(&[pk], &mut tr);
    ct_eq(&sk[64..64 + TR_BYTES], &tr)
}

struct UnpackedSk<const K: usize, const L: usize> {
    rho: [u8; 32],
    key_seed: [u8; 32],
    tr: [u8; TR_BYTES],
    s1_hat: PolyVec<L>,
    s2: PolyVec<K>,
    t0_hat: PolyVec<K>,
}

fn unpack_sk<const K: usize, const L: usize>(sk: &[u8], eta: u32) -> UnpackedSk<K, L> {
    let eta_b = eta_bytes(eta);
    let mut off = 0usize;
    let rho: [u8; 32] = sk[off..off + 32].try_into().expect("32 bytes");
    off += 32;
    let key_seed: [u8; 32] = sk[off..off + 32].try_into().expect("32 bytes");
    off += 32;
    let tr: [u8; TR_BYTES] = sk[off..off + TR_BYTES].try_into().expect("tr bytes");
    off += TR_BYTES;
    let s1 = polyvec_unpack_eta::<L>(&sk[off..off + L * eta_b], eta);
    off += L * eta_b;
    let s2 = polyvec_unpack_eta::<K>(&sk[off..off + K * eta_b], eta);
    off += K * eta_b;
    let t0 = polyvec_unpack_t0::<K>(&sk[off..off + K * t0_bytes()]);

    UnpackedSk {
        rho,
        key_seed,
        tr,
        s1_hat: polyvec_ntt::<L>(&s1),
        s2,
        t0_hat: polyvec_ntt::<K>(&t0),
    }
}

/// `ML-DSA.Sign`: the rejection-sampling loop over nonce `kappa`. `rnd` is
/// either 32 fresh random bytes (hedged signing) or the all-zero string
/// (deterministic signing); both feed `rho''` the same way.
///
/// # Errors
/// Returns [`PqcError::InternalInvariant`] if no candidate signature is found
/// within [`SIGN_RETRIES_MAX`] attempts — astronomically unlikely for an
/// honest RNG, but bounds an adversarial or broken one.
#[allow(clippy::too_many_arguments)]
pub(crate) fn ml_dsa_sign<
    const K: usize,
    const L: usize,
    const ETA: u32,
    const GAMMA1: i64,
    const GAMMA2: i64,
    const TAU: usize,
    const BETA: i64,
    const OMEGA: usize,
    const CTILDE_BYTES: usize,
    const SIG_LEN: usize,
>(
    sk: &[u8], message: &[u8], context: &[u8], rnd: &[u8; 32],
) -> Result<[u8; SIG_LEN], PqcError> {
    let unpacked = unpack_sk::<K, L>(sk, ETA);
    let a_hat = expand_a::<K, L>(&unpacked.rho);

    let prefix = message_prefix(context);
    let mut mu = [0u8; MU_BYTES];
    shake256(&[&unpacked.tr, &prefix, context, message], &mut mu);

    let mut rho_double_prime = [0u8; 64];
    shake256(&[&unpacked.key_seed, rnd, &mu], &mut rho_double_prime);

    let gamma1_minus_beta = GAMMA1 - BETA;
    let gamma2_minus_beta = GAMMA2 - BETA;
    let s2_hat = polyvec_ntt::<K>(&unpacked.s2);

    for kappa_block in 0..SIGN_RETRIES_MAX {
        let kappa = (kappa_block * L) as u16;
        let y = expand_mask::<L>(&rho_double_prime, kappa, GAMMA1);
        let y_hat = polyvec_ntt::<L>(&y);
        let w_hat = matrix_vec_mul::<K, L>(&a_hat, &y_hat);
        let w = polyvec_ntt_inv::<K>(&w_hat);
        let w1 = polyvec_high_bits::<K>(&w, GAMMA2);

        let mut w1_packed = [0u8; MAX_W1_PACKED];
        let w1_len = K * w1_bytes(GAMMA2);
        pack_w1_vec::<K>(&w1, GAMMA2, &mut w1_packed[..w1_len]);

        let mut c_tilde = [0u8; MAX_CTILDE];
        shake256(&[&mu, &w1_packed[..w1_len]], &mut c_tilde[..CTILDE_BYTES]);

        let c = sample_in_ball(&c_tilde[..CTILDE_BYTES], TAU);
        let c_hat = ntt(&c);

        let cs1 = polyvec_ntt_inv::<L>(&poly_scale_c::<L>(&c_hat, &unpacked.s1_hat));
        let z = polyvec_add(&y, &cs1);
        if i64::from(polyvec_max_abs::<L>(&z)) >= gamma1_minus_beta {
            continue;
        }

        let cs2 = polyvec_ntt_inv::<K>(&poly_scale_c::<K>(&c_hat, &s2_hat));
        let w_minus_cs2 = polyvec_sub::<K>(&w, &cs2);
        let r0 = polyvec_low_bits::<K>(&w_minus_cs2, GAMMA2);
        if i64::from(polyvec_max_abs::<K>(&r0)) >= gamma2_minus_beta {
            continue;
        }

        let ct0 = polyvec_ntt_inv::<K>(&poly_scale_c::<K>(&c_hat, &unpacked.t0_hat));
        if i64::from(polyvec_max_abs::<K>(&ct0)) >= GAMMA2 {
            continue;
        }

        let (hints, weight) = polyvec_make_hint::<K>(&ct0, &w_minus_cs2, GAMMA2);
        if weight as usize > OMEGA {
            continue;
        }

        let mut sig = [0u8; SIG_LEN];
        let mut off = 0usize;
        sig[off..off + CTILDE_BYTES].copy_from_slice(&c_tilde[..CTILDE_BYTES]);
        off += CTILDE_BYTES;
        let z_stride = z_bytes(GAMMA1);
        polyvec_pack_z::<L>(&z, GAMMA1, &mut sig[off..off + L * z_stride]);
        off += L * z_stride;
        pack_hint::<K>(&hints, OMEGA, &mut sig[off..off + OMEGA + K]);

        return Ok(sig);
    }
    Err(PqcError::InternalInvariant)
}

/// `ML-DSA.Verify`: recomputes the commitment from `pk`, `sig`, and `message`
/// and checks it against the transmitted `c_tilde`. Returns `false` (never an
/// error) on any malformed input, matching [`crate::traits::Verify`]'s contract.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub(crate) fn ml_dsa_verify<
    const K: usize,
    const L: usize,
    const GAMMA1: i64,
    const GAMMA2: i64,
    const TAU: usize,
    const BETA: i64,
    const OMEGA: usize,
    const CTILDE_BYTES: usize,
    const SIG_LEN: usize,
>(
    pk: &[u8], message: &[u8], context: &[u8], sig: &[u8; SIG_LEN],
) -> bool {
    let Ok(rho): Result<[u8; 32], _> = pk[0..32].try_into() else {
        return false;
    };
    let t1 = polyvec_unpack_t1::<K>(&pk[32..]);

    let mut off = 0usize;
    let c_tilde = &sig[off..off + CTILDE_BYTES];
    off += CTILDE_BYTES;
    let z_stride = z_bytes(GAMMA1);
    let z = polyvec_unpack_z::<L>(&sig[off..off + L * z_stride], GAMMA1);
    off += L * z_stride;
    let Some(hints): Option<[[bool; 256]; K]> =
        unpack_hint::<K>(&sig[off..off + OMEGA + K], OMEGA)
    else {
        return false;
    };
    let hint_weight: u32 = hints.iter().flatten().map(|&h| u32::from(h)).sum();
    if hint_weight as usize > OMEGA {
        return false;
    }

    if i64::from(polyvec_max_abs::<L>(&z)) >= GAMMA1 - BETA {
        return false;
    }

    let mut tr = [0u8; TR_BYTES];
    shake256(&[pk], &mut tr);
    let prefix = message_prefix(context);
    let mut mu = [0u8; MU_BYTES];
    shake256(&[&tr, &prefix, context, message], &mut mu);

    let c = sample_in_ball(c_tilde, TAU);
    let c_hat = ntt(&c);

    let a_hat = expand_a::<K, L>(&rho);
    let z_hat = polyvec_ntt::<L>(&z);
    let az_hat = matrix_vec_mul::<K, L>(&a_hat, &z_hat);

    let t1_shifted: PolyVec<K> = core::array::from_fn(|i| {
        core::array::from_fn(|j| Z::from_i64(i64::from(t1[i][j].get()) << D))
    });
    let t1_hat = polyvec_ntt::<K>(&t1_shifted);
    let ct1_hat = poly_scale_c::<K>(&c_hat, &t1_hat);

    let az_minus_ct1_hat: PolyVec<K> =
        core::array::from_fn(|i| super::types::poly_sub(&az_hat[i], &ct1_hat[i]));
    let r = polyvec_ntt_inv::<K>(&az_minus_ct1_hat);
    let w1_prime = polyvec_use_hint::<K>(&hints, &r, GAMMA2);

    let mut w1_packed = [0u8; MAX_W1_PACKED];
    let w1_len = K * w1_bytes(GAMMA2);
    pack_w1_vec::<K>(&w1_prime, GAMMA2, &mut w1_packed[..w1_len]);

    let mut c_tilde_prime = [0u8; MAX_CTILDE];
    shake256(&[&mu, &w1_packed[..w1_len]], &mut c_tilde_prime[..CTILDE_BYTES]);

    &c_tilde_prime[..CTILDE_BYTES] == c_tilde
}

#[cfg(test)]
mod tests {
    use super::{ml_dsa_keygen, ml_dsa_sign, ml_dsa_verify};

    const K: usize = 4;
    const L: usize = 4;
    const ETA: u32 = 2;
    const GAMMA1: i64 = 1 << 17;
    const GAMMA2: i64 = (crate::dilithium::Q - 1) / 88;
    const TAU: usize = 39;
    const BETA: i64 = 78;
    const OMEGA: usize = 80;
    const CTILDE_BYTES: usize = 32;
    const PK_LEN: usize = 1312;
    const SK_LEN: usize = 2560;
    const SIG_LEN: usize = 2420;

    #[allow(clippy::too_many_arguments)]
    fn sign(
        sk: &[u8], message: &[u8], context: &[u8], rnd: &[u8; 32],
    ) -> Result<[u8; SIG_LEN], crate::error::PqcError> {
        ml_dsa_sign::<K, L, ETA, GAMMA1, GAMMA2, TAU, BETA, OMEGA, CTILDE_BYTES, SIG_LEN>(
            sk, message, context, rnd,
        )
    }

    fn verify(pk: &[u8], message: &[u8], context: &[u8], sig: &[u8; SIG_LEN]) -> bool {
        ml_dsa_verify::<K, L, GAMMA1, GAMMA2, TAU, BETA, OMEGA, CTILDE_BYTES, SIG_LEN>(
            pk, message, context, sig,
        )
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let seed = [7u8; 32];
        let (pk, sk) = ml_dsa_keygen::<K, L, ETA, PK_LEN, SK_LEN>(&seed);
        let message = b"the quick brown fox jumps over the lazy dog";
        let sig = sign(&sk, message, b"", &[0u8; 32]).expect("signing succeeds");
        assert!(verify(&pk, message, b"", &sig));
    }

    #[test]
    fn test_verify_rejects_wrong_message() {
        let seed = [9u8; 32];
        let (pk, sk) = ml_dsa_keygen::<K, L, ETA, PK_LEN, SK_LEN>(&seed);
        let sig = sign(&sk, b"original message", b"", &[1u8; 32]).expect("signing succeeds");
        assert!(!verify(&pk, b"tampered message", b"", &sig));
    }

    #[test]
    fn test_verify_rejects_flipped_signature_byte() {
        let seed = [3u8; 32];
        let (pk, sk) = ml_dsa_keygen::<K, L, ETA, PK_LEN, SK_LEN>(&seed);
        let message = b"sign this";
        let mut sig = sign(&sk, message, b"", &[2u8; 32]).expect("signing succeeds");
        sig[0] ^= 1;
        assert!(!verify(&pk, message, b"", &sig));
    }

    #[test]
    fn test_verify_rejects_mismatched_context() {
        let seed = [11u8; 32];
        let (pk, sk) = ml_dsa_keygen::<K, L, ETA, PK_LEN, SK_LEN>(&seed);
        let message = b"context-bound message";
        let sig = sign(&sk, message, b"alpha", &[4u8; 32]).expect("signing succeeds");
        assert!(!verify(&pk, message, b"beta", &sig));
    }

    #[test]
    fn test_keygen_is_deterministic_from_seed() {
        let seed = [42u8; 32];
        let (pk1, sk1) = ml_dsa_keygen::<K, L, ETA, PK_LEN, SK_LEN>(&seed);
        let (pk2, sk2) = ml_dsa_keygen::<K, L, ETA, PK_LEN, SK_LEN>(&seed);
        assert_eq!(pk1, pk2);
        assert_eq!(sk1, sk2);
    }
}
