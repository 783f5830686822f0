//! ML-DSA (FIPS 204 lattice-based signatures), the Fiat–Shamir-with-aborts
//! construction over `R_q = Z_q[X]/(X^256+1)`.
//!
//! Functionality map:
//!
//! `Z`/`Poly`/`PolyVec`                      --> types.rs
//! `NTT`/`NTTinv`                             --> ntt.rs
//! `Power2Round`/`Decompose`/`MakeHint`/`UseHint` --> rounding.rs
//! `ExpandA`/`ExpandS`/`ExpandMask`/`SampleInBall` --> sampling.rs
//! Encode/Decode of `t1`/`t0`/`s`/`z`/`w1`/hints --> packing.rs
//! `ML-DSA.KeyGen/Sign/Verify`                --> ml_dsa.rs
//!
//! The three parameter sets below are modules with injected macro code
//! connecting them to the functionality in `ml_dsa.rs`.

mod ml_dsa;
mod ntt;
mod packing;
mod rounding;
mod sampling;
mod types;

pub(crate) const Q: i64 = 8_380_417;
pub(crate) const N: usize = 256;
pub(crate) const D: u32 = 13;
/// A primitive 512th root of unity mod `Q`, generating [`ntt::ZETA_TABLE`].
pub(crate) const ROOT: i64 = 1753;

macro_rules! functionality {
    () => {
        use rand_core::CryptoRngCore;
        use zeroize::{Zeroize, ZeroizeOnDrop};

        use crate::error::PqcError;
        use crate::traits::{Sign, SerDes, Verify};
        use crate::dilithium::ml_dsa::{
            ml_dsa_keygen, ml_dsa_sign, ml_dsa_validate_keypair, ml_dsa_verify,
        };

        /// Correctly sized verifying (public) key specific to this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct VerifyingKey([u8; PK_LEN]);

        /// Correctly sized signing (private) key specific to this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct SigningKey([u8; SK_LEN]);

        /// Correctly sized detached signature specific to this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct Signature([u8; SIG_LEN]);

        /// Key-generation entry point: produces opaque, parameter-set-specific
        /// signing and verifying keys.
        pub struct KG();

        impl KG {
            /// Generates a signing/verifying key pair using the OS default random
            /// number generator.
            ///
            /// # Errors
            /// Returns an error if the random number generator fails.
            #[cfg(feature = "default-rng")]
            pub fn try_keygen() -> Result<(VerifyingKey, SigningKey), PqcError> {
                Self::try_keygen_with_rng(&mut rand_core::OsRng)
            }

            /// Generates a signing/verifying key pair using a provided random
            /// number generator.
            ///
            /// # Errors
            /// Returns an error if the random number generator fails.
            pub fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(VerifyingKey, SigningKey), PqcError> {
                let mut seed = [0u8; 32];
                rng.try_fill_bytes(&mut seed).map_err(|_| PqcError::EntropyFailure)?;
                let (pk, sk) = ml_dsa_keygen::<K, L, ETA, PK_LEN, SK_LEN>(&seed);
                Ok((VerifyingKey(pk), SigningKey(sk)))
            }

            /// Generates a signing/verifying key pair deterministically from a
            /// 32-byte seed.
            #[must_use]
            pub fn keygen_from_seed(seed: &[u8; 32]) -> (VerifyingKey, SigningKey) {
                let (pk, sk) = ml_dsa_keygen::<K, L, ETA, PK_LEN, SK_LEN>(seed);
                (VerifyingKey(pk), SigningKey(sk))
            }

            /// Checks that `vk` and `sk` correspond, e.g. after both have been
            /// serialized, stored, and reloaded independently. Not constant-time.
            #[must_use]
            pub fn validate_keypair(vk: &VerifyingKey, sk: &SigningKey) -> bool {
                ml_dsa_validate_keypair(&vk.0, &sk.0)
            }
        }

        impl Sign for SigningKey {
            type Signature = Signature;

            fn try_sign_with_rng(
                &self, rng: &mut impl CryptoRngCore, message: &[u8], context: &[u8],
            ) -> Result<Signature, PqcError> {
                if context.len() > 255 {
                    return Err(PqcError::ParameterMismatch);
                }
                let mut rnd = [0u8; 32];
                rng.try_fill_bytes(&mut rnd).map_err(|_| PqcError::EntropyFailure)?;
                let sig = ml_dsa_sign::<K, L, ETA, GAMMA1, GAMMA2, TAU, BETA, OMEGA, CTILDE_BYTES, SIG_LEN>(
                    &self.0, message, context, &rnd,
                )?;
                Ok(Signature(sig))
            }
        }

        impl Verify for VerifyingKey {
            type Signature = Signature;

            fn verify(&self, message: &[u8], signature: &Signature, context: &[u8]) -> bool {
                if context.len() > 255 {
                    return false;
                }
                ml_dsa_verify::<K, L, GAMMA1, GAMMA2, TAU, BETA, OMEGA, CTILDE_BYTES, SIG_LEN>(
                    &self.0, message, context, &signature.0,
                )
            }
        }

        impl SerDes for VerifyingKey {
            type ByteArray = [u8; PK_LEN];

            fn into_bytes(self) -> Self::ByteArray {
                self.0
            }

            fn try_from_bytes(pk: Self::ByteArray) -> Result<Self, PqcError> {
                Ok(VerifyingKey(pk))
            }
        }

        impl SerDes for SigningKey {
            type ByteArray = [u8; SK_LEN];

            fn into_bytes(self) -> Self::ByteArray {
                self.0
            }

            fn try_from_bytes(sk: Self::ByteArray) -> Result<Self, PqcError> {
                Ok(SigningKey(sk))
            }
        }

        impl SerDes for Signature {
            type ByteArray = [u8; SIG_LEN];

            fn into_bytes(self) -> Self::ByteArray {
                self.0
            }

            fn try_from_bytes(sig: Self::ByteArray) -> Result<Self, PqcError> {
                Ok(Signature(sig))
            }
        }
    };
}

pub(crate) use functionality;

/// ML-DSA-44, security category 2 (FIPS 204 table 1).
#[cfg(feature = "ml-dsa-44")]
pub mod ml_dsa_44 {
    //! Typical usage: the signer runs [`KG::try_keygen`] to get a `VerifyingKey`/
    //! `SigningKey` pair, publishes the verifying key, and calls
    //! [`Sign::try_sign`](crate::traits::Sign::try_sign) on each message. Anyone
    //! holding the verifying key calls [`Verify::verify`](crate::traits::Verify::verify).

    const K: usize = 4;
    const L: usize = 4;
    const ETA: u32 = 2;
    const GAMMA1: i64 = 1 << 17;
    const GAMMA2: i64 = (super::super::Q - 1) / 88;
    const TAU: usize = 39;
    const BETA: i64 = 78;
    const OMEGA: usize = 80;
    const CTILDE_BYTES: usize = 32;

    /// Serialized verifying key length (bytes).
    pub const PK_LEN: usize = 1312;
    /// Serialized signing key length (bytes).
    pub const SK_LEN: usize = 2560;
    /// Serialized signature length (bytes).
    pub const SIG_LEN: usize = 2420;

    crate::dilithium::functionality!();
}

/// ML-DSA-65, security category 3 (FIPS 204 table 1).
#[cfg(feature = "ml-dsa-65")]
pub mod ml_dsa_65 {
    //! See [`ml_dsa_44`](super::ml_dsa_44) for the typical usage flow.

    const K: usize = 6;
    const L: usize = 5;
    const ETA: u32 = 4;
    const GAMMA1: i64 = 1 << 19;
    const GAMMA2: i64 = (super::super::Q - 1) / 32;
    const TAU: usize = 49;
    const BETA: i64 = 196;
    const OMEGA: usize = 55;
    const CTILDE_BYTES: usize = 48;

    /// Serialized verifying key length (bytes).
    pub const PK_LEN: usize = 1952;
    /// Serialized signing key length (bytes).
    pub const SK_LEN: usize = 4032;
    /// Serialized signature length (bytes).
    pub const SIG_LEN: usize = 3309;

    crate::dilithium::functionality!();
}

/// ML-DSA-87, security category 5 (FIPS 204 table 1).
#[cfg(feature = "ml-dsa-87")]
pub mod ml_dsa_87 {
    //! See [`ml_dsa_44`](super::ml_dsa_44) for the typical usage flow.

    const K: usize = 8;
    const L: usize = 7;
    const ETA: u32 = 2;
    const GAMMA1: i64 = 1 << 19;
    const GAMMA2: i64 = (super::super::Q - 1) / 32;
    const TAU: usize = 60;
    const BETA: i64 = 120;
    const OMEGA: usize = 75;
    const CTILDE_BYTES: usize = 64;

    /// Serialized verifying key length (bytes).
    pub const PK_LEN: usize = 2592;
    /// Serialized signing key length (bytes).
    pub const SK_LEN: usize = 4896;
    /// Serialized signature length (bytes).
    pub const SIG_LEN: usize = 4627;

    crate::dilithium::functionality!();
}
