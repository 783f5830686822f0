use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable};

use super::byte_fns::{byte_decode, byte_encode};
use super::k_pke::{k_pke_decrypt, k_pke_encrypt, k_pke_key_gen};
use crate::ct::ct_neq;
use crate::error::PqcError;
use crate::hash::{g, h, kdf32};
use crate::SharedSecretKey;

/// `ML-KEM.KeyGen_internal(d,z)`: deterministically builds an encaps/decaps key pair
/// from two 32-byte seeds. `dk = dk_PKE || ek || H(ek) || z` per the FO key-pair layout.
pub(crate) fn ml_kem_key_gen_internal<const K: usize, const ETA1_64: usize>(
    d: [u8; 32],
    z: [u8; 32],
    ek: &mut [u8],
    dk: &mut [u8],
) {
    debug_assert_eq!(ek.len(), 384 * K + 32, "ek len not 384 * K + 32");
    debug_assert_eq!(dk.len(), 768 * K + 96, "dk len not 768 * K + 96");

    let p1 = 384 * K;
    k_pke_key_gen::<K, ETA1_64>(d, ek, &mut dk[..p1]);

    let h_ek = h(ek);
    let p2 = p1 + ek.len();
    let p3 = p2 + h_ek.len();
    dk[p1..p2].copy_from_slice(ek);
    dk[p2..p3].copy_from_slice(&h_ek);
    dk[p3..].copy_from_slice(&z);
}

/// `ML-KEM.Encaps_internal(ek, m)` per the FO transform (spec §4.5): `m` has already been
/// hashed by the caller, so this step only derives `(K̄, r)`, re-encrypts, and folds the
/// ciphertext hash into the final KDF.
fn ml_kem_encaps_internal<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    du: u32,
    dv: u32,
    m: &[u8; 32],
    ek: &[u8],
    ct: &mut [u8],
) -> Result<SharedSecretKey, PqcError> {
    let h_ek = h(ek);
    let (k_bar, r) = g(&[m, &h_ek]);

    k_pke_encrypt::<K, ETA1_64, ETA2_64>(du, dv, ek, m, &r, ct)?;

    let k = kdf32(&[&k_bar, &h(ct)]);
    Ok(SharedSecretKey::new(k))
}

/// `ML-KEM.Decaps_internal(dk, c)`: recovers the shared secret, implicitly rejecting a
/// mismatched re-encryption by substituting `z`-derived key material rather than returning
/// an error (spec §4.5 step 4 of decapsulation).
#[allow(clippy::similar_names)]
fn ml_kem_decaps_internal<
    const K: usize,
    const ETA1_64: usize,
    const ETA2_64: usize,
    const CT_LEN: usize,
>(
    du: u32,
    dv: u32,
    dk: &[u8],
    ct: &[u8; CT_LEN],
) -> Result<SharedSecretKey, PqcError> {
    debug_assert_eq!(dk.len(), 768 * K + 96, "dk len not 768 * K + 96");

    let dk_pke = &dk[0..384 * K];
    let ek_pke = &dk[384 * K..768 * K + 32];
    let z = &dk[768 * K + 64..768 * K + 96];

    let m_prime = k_pke_decrypt::<K>(du, dv, dk_pke, ct)?;
    let h_ek_pke = h(ek_pke);
    let (k_bar_prime, r_prime) = g(&[&m_prime, &h_ek_pke]);

    let mut c_prime = [0u8; CT_LEN];
    k_pke_encrypt::<K, ETA1_64, ETA2_64>(du, dv, ek_pke, &m_prime, &r_prime, &mut c_prime)?;

    let fail = ct_neq(ct, &c_prime);
    let choice = Choice::from(u8::from(fail));
    let k_bar: [u8; 32] =
        core::array::from_fn(|i| u8::conditional_select(&k_bar_prime[i], &z[i], choice));

    let k = kdf32(&[&k_bar, &h(ct)]);
    Ok(SharedSecretKey::new(k))
}

/// `ML-KEM.KeyGen()`: draws `d` and `z` from `rng` and runs the internal algorithm.
///
/// # Errors
/// Returns [`PqcError::EntropyFailure`] if `rng` fails.
pub(crate) fn ml_kem_key_gen<const K: usize, const ETA1_64: usize>(
    rng: &mut impl CryptoRngCore,
    ek: &mut [u8],
    dk: &mut [u8],
) -> Result<(), PqcError> {
    let mut d = [0u8; 32];
    rng.try_fill_bytes(&mut d).map_err(|_| PqcError::EntropyFailure)?;
    let mut z = [0u8; 32];
    rng.try_fill_bytes(&mut z).map_err(|_| PqcError::EntropyFailure)?;

    ml_kem_key_gen_internal::<K, ETA1_64>(d, z, ek, dk);
    Ok(())
}

/// `ML-KEM.Encaps(ek)`: draws 32 random bytes and hashes them into `m` (spec §4.5 step 1,
/// resisting low-entropy OS RNGs), then runs the internal algorithm.
///
/// # Errors
/// Returns [`PqcError::EntropyFailure`] if `rng` fails, or a decrypt/encrypt-path error.
pub(crate) fn ml_kem_encaps<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    rng: &mut impl CryptoRngCore,
    du: u32,
    dv: u32,
    ek: &[u8],
    ct: &mut [u8],
) -> Result<SharedSecretKey, PqcError> {
    let mut rand32 = [0u8; 32];
    rng.try_fill_bytes(&mut rand32).map_err(|_| PqcError::EntropyFailure)?;
    let m = h(&rand32);

    ml_kem_encaps_internal::<K, ETA1_64, ETA2_64>(du, dv, &m, ek, ct)
}

/// `ML-KEM.Decaps(c, dk)`: runs the internal decapsulation algorithm.
///
/// # Errors
/// Returns an error only on a structural decode failure; a mismatched ciphertext is
/// handled via implicit rejection and still returns `Ok`.
pub(crate) fn ml_kem_decaps<
    const K: usize,
    const ETA1_64: usize,
    const ETA2_64: usize,
    const CT_LEN: usize,
>(
    du: u32,
    dv: u32,
    dk: &[u8],
    ct: &[u8; CT_LEN],
) -> Result<SharedSecretKey, PqcError> {
    debug_assert_eq!(ct.len(), 32 * (du as usize * K + dv as usize), "ct len not 32 * ...");
    ml_kem_decaps_internal::<K, ETA1_64, ETA2_64, CT_LEN>(du, dv, dk, ct)
}

/// Validates `ek`'s modulus-reduction round trip: `ek = ByteEncode12(ByteDecode12(ek))`.
pub(crate) fn ek_passes_modulus_check<const K: usize>(ek: &[u8]) -> bool {
    let mut pass = true;
    for i in 0..K {
        let mut ek_tilde = [0u8; 384];
        let Ok(ek_hat) = byte_decode(12, &ek[384 * i..384 * (i + 1)]) else {
            return false;
        };
        byte_encode(12, &ek_hat, &mut ek_tilde);
        pass &= ek_tilde == ek[384 * i..384 * (i + 1)];
    }
    pass
}

#[cfg(test)]
mod tests {
    use rand_core::SeedableRng;

    use super::{ml_kem_decaps, ml_kem_encaps, ml_kem_key_gen};
    use crate::traits::SerDes;

    const ETA1_64: usize = 3 * 64;
    const ETA2_64: usize = 2 * 64;
    const DU: u32 = 10;
    const DV: u32 = 4;
    const K: usize = 2;
    const EK_LEN: usize = 800;
    const DK_LEN: usize = 1632;
    const CT_LEN: usize = 768;

    #[test]
    fn test_encaps_decaps_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; DK_LEN];
        let mut ct = [0u8; CT_LEN];

        ml_kem_key_gen::<K, ETA1_64>(&mut rng, &mut ek, &mut dk).unwrap();
        let ssk1 = ml_kem_encaps::<K, ETA1_64, ETA2_64>(&mut rng, DU, DV, &ek, &mut ct).unwrap();
        let ssk2 = ml_kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(DU, DV, &dk, &ct).unwrap();

        assert_eq!(ssk1.into_bytes(), ssk2.into_bytes());
    }

    #[test]
    fn test_decaps_implicit_rejection_on_corrupt_ciphertext() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; DK_LEN];
        let mut ct = [0u8; CT_LEN];

        ml_kem_key_gen::<K, ETA1_64>(&mut rng, &mut ek, &mut dk).unwrap();
        let ssk1 = ml_kem_encaps::<K, ETA1_64, ETA2_64>(&mut rng, DU, DV, &ek, &mut ct).unwrap();
        ct[0] ^= 0xFF;
        let ssk2 = ml_kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(DU, DV, &dk, &ct).unwrap();

        assert_ne!(ssk1.into_bytes(), ssk2.into_bytes());
    }
}
