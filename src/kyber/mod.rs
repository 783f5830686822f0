//! ML-KEM (FIPS 203 lattice-based key encapsulation), built from the K-PKE IND-CPA scheme
//! plus the Fujisaki–Okamoto implicit-rejection wrapper.
//!
//! Functionality map:
//!
//! `ByteEncode`/`ByteDecode`        --> byte_fns.rs
//! `SampleNTT`/`SamplePolyCBDη`     --> sampling.rs
//! `NTT`/`NTTinv`/`MultiplyNTTs`    --> ntt.rs
//! `K-PKE.KeyGen/Encrypt/Decrypt`   --> k_pke.rs
//! `ML-KEM.KeyGen/Encaps/Decaps`   --> ml_kem.rs
//! vector/matrix helpers, Compress/Decompress --> helpers.rs
//!
//! The three parameter sets below are modules with injected macro code connecting them to
//! the functionality in `ml_kem.rs`.

mod byte_fns;
mod helpers;
mod k_pke;
mod ml_kem;
mod ntt;
mod sampling;
mod types;

pub(crate) const Q: u16 = 3329;
pub(crate) const ZETA: u16 = 17;

macro_rules! functionality {
    () => {
        const ETA1_64: usize = ETA1 as usize * 64;
        const ETA2_64: usize = ETA2 as usize * 64;

        use rand_core::CryptoRngCore;
        use zeroize::{Zeroize, ZeroizeOnDrop};

        use crate::error::PqcError;
        use crate::hash::h;
        use crate::kyber::ml_kem::{
            ek_passes_modulus_check, ml_kem_decaps, ml_kem_encaps, ml_kem_key_gen,
        };
        use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
        use crate::SharedSecretKey;

        /// Correctly sized encapsulation key specific to this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct EncapsKey([u8; EK_LEN]);

        /// Correctly sized decapsulation key specific to this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct DecapsKey([u8; DK_LEN]);

        /// Correctly sized ciphertext specific to this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct CipherText([u8; CT_LEN]);

        /// Key-generation entry point: produces opaque, parameter-set-specific
        /// encapsulation and decapsulation keys.
        pub struct KG();

        impl KeyGen for KG {
            type DecapsByteArray = [u8; DK_LEN];
            type DecapsKey = DecapsKey;
            type EncapsByteArray = [u8; EK_LEN];
            type EncapsKey = EncapsKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(EncapsKey, DecapsKey), PqcError> {
                let (mut ek, mut dk) = ([0u8; EK_LEN], [0u8; DK_LEN]);
                ml_kem_key_gen::<K, ETA1_64>(rng, &mut ek, &mut dk)?;
                Ok((EncapsKey(ek), DecapsKey(dk)))
            }

            fn keygen_from_seed(d: &[u8], z: &[u8]) -> (EncapsKey, DecapsKey) {
                let d: [u8; 32] = d.try_into().expect("ML-KEM seed d is 32 bytes");
                let z: [u8; 32] = z.try_into().expect("ML-KEM seed z is 32 bytes");
                let (mut ek, mut dk) = ([0u8; EK_LEN], [0u8; DK_LEN]);
                crate::kyber::ml_kem::ml_kem_key_gen_internal::<K, ETA1_64>(d, z, &mut ek, &mut dk);
                (EncapsKey(ek), DecapsKey(dk))
            }

            fn validate_keypair_with_rng_vartime(
                _rng: &mut impl CryptoRngCore, ek: &Self::EncapsByteArray, dk: &Self::DecapsByteArray,
            ) -> bool {
                let len_ek_pke = 384 * K + 32;
                let len_dk_pke = 384 * K;
                let same_ek = *ek == dk[len_dk_pke..(len_dk_pke + len_ek_pke)];
                let same_h = h(ek) == dk[(len_dk_pke + len_ek_pke)..(len_dk_pke + len_ek_pke + 32)];
                same_ek & same_h
            }
        }

        impl Encaps for EncapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(Self::SharedSecretKey, Self::CipherText), PqcError> {
                let mut ct = [0u8; CT_LEN];
                let ssk = ml_kem_encaps::<K, ETA1_64, ETA2_64>(rng, DU, DV, &self.0, &mut ct)?;
                Ok((ssk, CipherText(ct)))
            }
        }

        impl Decaps for DecapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_decaps(&self, ct: &CipherText) -> Result<SharedSecretKey, PqcError> {
                ml_kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(DU, DV, &self.0, &ct.0)
            }
        }

        impl SerDes for EncapsKey {
            type ByteArray = [u8; EK_LEN];

            fn into_bytes(self) -> Self::ByteArray {
                self.0
            }

            fn try_from_bytes(ek: Self::ByteArray) -> Result<Self, PqcError> {
                // Per FIPS 203, the encapsulation key must correctly decode to an array of
                // integers modulo q without any modular reductions.
                if !ek_passes_modulus_check::<K>(&ek) {
                    return Err(PqcError::ParameterMismatch);
                }
                Ok(EncapsKey(ek))
            }
        }

        impl SerDes for DecapsKey {
            type ByteArray = [u8; DK_LEN];

            fn into_bytes(self) -> Self::ByteArray {
                self.0
            }

            fn try_from_bytes(dk: Self::ByteArray) -> Result<Self, PqcError> {
                Ok(DecapsKey(dk))
            }
        }

        impl SerDes for CipherText {
            type ByteArray = [u8; CT_LEN];

            fn into_bytes(self) -> Self::ByteArray {
                self.0
            }

            fn try_from_bytes(ct: Self::ByteArray) -> Result<Self, PqcError> {
                Ok(CipherText(ct))
            }
        }
    };
}

pub(crate) use functionality;

/// ML-KEM-512, security category 1 (FIPS 203 table 2).
#[cfg(feature = "ml-kem-512")]
pub mod ml_kem_512 {
    //! Typical usage: the originator runs [`KG::try_keygen`](crate::traits::KeyGen::try_keygen)
    //! to get an `EncapsKey`/`DecapsKey` pair, serializes the encaps key and sends it to the
    //! remote party, which calls `try_encaps` to get a shared secret and ciphertext, and sends
    //! the ciphertext back so the originator can call `try_decaps` to recover the same secret.

    const K: usize = 2;
    const ETA1: u32 = 3;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized encapsulation key length (bytes).
    pub const EK_LEN: usize = 800;
    /// Serialized decapsulation key length (bytes).
    pub const DK_LEN: usize = 1632;
    /// Serialized ciphertext length (bytes).
    pub const CT_LEN: usize = 768;

    crate::kyber::functionality!();
}

/// ML-KEM-768, security category 3 (FIPS 203 table 2).
#[cfg(feature = "ml-kem-768")]
pub mod ml_kem_768 {
    //! See [`ml_kem_512`](super::ml_kem_512) for the typical usage flow.

    const K: usize = 3;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized encapsulation key length (bytes).
    pub const EK_LEN: usize = 1184;
    /// Serialized decapsulation key length (bytes).
    pub const DK_LEN: usize = 2400;
    /// Serialized ciphertext length (bytes).
    pub const CT_LEN: usize = 1088;

    crate::kyber::functionality!();
}

/// ML-KEM-1024, security category 5 (FIPS 203 table 2).
#[cfg(feature = "ml-kem-1024")]
pub mod ml_kem_1024 {
    //! See [`ml_kem_512`](super::ml_kem_512) for the typical usage flow.

    const K: usize = 4;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 11;
    const DV: u32 = 5;

    /// Serialized encapsulation key length (bytes).
    pub const EK_LEN: usize = 1568;
    /// Serialized decapsulation key length (bytes).
    pub const DK_LEN: usize = 3168;
    /// Serialized ciphertext length (bytes).
    pub const CT_LEN: usize = 1568;

    crate::kyber::functionality!();
}
