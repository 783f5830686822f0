//! Classic McEliece (binary Goppa code key encapsulation), built from
//! GF(2^m) field arithmetic, a Beneš permutation network, and a
//! Berlekamp–Massey decoder.
//!
//! Functionality map:
//!
//! `GF(2^m)` arithmetic                        --> gf.rs
//! Beneš network (generate/apply control bits) --> benes.rs
//! Goppa polynomial, support, syndrome          --> goppa.rs
//! Berlekamp–Massey decoding                    --> bm.rs
//! Systematic parity-check (public key)         --> pk_gen.rs
//! Key generation / retry loop                  --> keygen.rs
//! Encapsulation                                --> encap.rs
//! Decapsulation                                --> decap.rs
//!
//! The five parameter sets below are modules with injected macro code
//! connecting them to the functionality above.

mod benes;
mod bm;
mod decap;
mod encap;
mod gf;
mod goppa;
mod keygen;
mod pk_gen;

macro_rules! functionality {
    () => {
        use rand_core::CryptoRngCore;
        use zeroize::{Zeroize, ZeroizeOnDrop};

        use crate::entropy::Hcg;
        use crate::error::PqcError;
        use crate::mceliece::decap::mceliece_decap;
        use crate::mceliece::encap::mceliece_encap;
        use crate::mceliece::keygen::{mceliece_keygen, Params};
        use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
        use crate::SharedSecretKey;

        fn params() -> Params {
            Params { field: FIELD, t: T, n: N, pk_nrows: PK_NROWS, sk_len: SK_LEN }
        }

        /// Correctly sized encapsulation (public) key specific to this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct EncapsKey(alloc::vec::Vec<u8>);

        /// Correctly sized decapsulation (secret) key specific to this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct DecapsKey(alloc::vec::Vec<u8>);

        /// Correctly sized ciphertext specific to this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct CipherText(alloc::vec::Vec<u8>);

        /// Key-generation entry point: produces opaque, parameter-set-specific
        /// encapsulation and decapsulation keys.
        pub struct KG();

        impl KeyGen for KG {
            type DecapsByteArray = alloc::vec::Vec<u8>;
            type DecapsKey = DecapsKey;
            type EncapsByteArray = alloc::vec::Vec<u8>;
            type EncapsKey = EncapsKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(EncapsKey, DecapsKey), PqcError> {
                let (pk, sk) = mceliece_keygen(&params(), |out: &mut [u8]| {
                    rng.try_fill_bytes(out).map_err(|_| PqcError::EntropyFailure)
                })?;
                Ok((EncapsKey(pk), DecapsKey(sk)))
            }

            /// McEliece's deterministic variant feeds `d` into the HMAC-SHA512 DRBG
            /// (spec §4.8) rather than drawing from an RNG directly; `z` is unused
            /// (unlike Kyber, McEliece has no separate implicit-rejection seed
            /// parameter — its own 32-byte seed, sampled from the same DRBG, plays
            /// that role).
            fn keygen_from_seed(d: &[u8], _z: &[u8]) -> (EncapsKey, DecapsKey) {
                let mut drbg = Hcg::init(d, b"mceliece-keygen", false);
                let (pk, sk) = mceliece_keygen(&params(), |out: &mut [u8]| drbg.generate(out))
                    .expect("DRBG-backed keygen does not fail");
                (EncapsKey(pk), DecapsKey(sk))
            }

            fn validate_keypair_with_rng_vartime(
                _rng: &mut impl CryptoRngCore, _ek: &Self::EncapsByteArray,
                _dk: &Self::DecapsByteArray,
            ) -> bool {
                // The secret key carries no copy of the public key to check against
                // (see `keygen::pack_secret_key`'s layout note); a caller that needs
                // this check should re-run key generation deterministically instead.
                false
            }
        }

        impl Encaps for EncapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(Self::SharedSecretKey, Self::CipherText), PqcError> {
                let (k, ct) = mceliece_encap(&self.0, N, T, PK_NROWS, |out: &mut [u8]| {
                    rng.try_fill_bytes(out).map_err(|_| PqcError::EntropyFailure)
                })?;
                Ok((SharedSecretKey::new(k), CipherText(ct)))
            }
        }

        impl Decaps for DecapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_decaps(&self, ct: &CipherText) -> Result<SharedSecretKey, PqcError> {
                let k = mceliece_decap(&self.0, &ct.0, &params());
                Ok(SharedSecretKey::new(k))
            }
        }

        impl SerDes for EncapsKey {
            type ByteArray = alloc::vec::Vec<u8>;

            fn into_bytes(self) -> Self::ByteArray {
                self.0
            }

            fn try_from_bytes(ek: Self::ByteArray) -> Result<Self, PqcError> {
                if ek.len() != PK_LEN {
                    return Err(PqcError::ParameterMismatch);
                }
                Ok(EncapsKey(ek))
            }
        }

        impl SerDes for DecapsKey {
            type ByteArray = alloc::vec::Vec<u8>;

            fn into_bytes(self) -> Self::ByteArray {
                self.0
            }

            fn try_from_bytes(dk: Self::ByteArray) -> Result<Self, PqcError> {
                if dk.len() != SK_LEN {
                    return Err(PqcError::ParameterMismatch);
                }
                Ok(DecapsKey(dk))
            }
        }

        impl SerDes for CipherText {
            type ByteArray = alloc::vec::Vec<u8>;

            fn into_bytes(self) -> Self::ByteArray {
                self.0
            }

            fn try_from_bytes(ct: Self::ByteArray) -> Result<Self, PqcError> {
                if ct.len() != CT_LEN {
                    return Err(PqcError::ParameterMismatch);
                }
                Ok(CipherText(ct))
            }
        }
    };
}

pub(crate) use functionality;

/// Classic McEliece 348864, security category 1.
#[cfg(feature = "mceliece-348864")]
pub mod mceliece_348864 {
    //! Typical usage: the originator runs [`KG::try_keygen`](crate::traits::KeyGen::try_keygen)
    //! to get an `EncapsKey`/`DecapsKey` pair, serializes the encaps key and sends it to the
    //! remote party, which calls `try_encaps` to get a shared secret and ciphertext, and sends
    //! the ciphertext back so the originator can call `try_decaps` to recover the same secret.

    use crate::mceliece::gf::Field;

    const FIELD: Field = Field::gf12();
    const T: usize = 64;
    const N: usize = 3488;
    const PK_NROWS: usize = T * FIELD.m as usize;

    /// Serialized encapsulation key length (bytes).
    pub const PK_LEN: usize = 261_120;
    /// Serialized decapsulation key length (bytes).
    pub const SK_LEN: usize = 6492;
    /// Serialized ciphertext length (bytes).
    pub const CT_LEN: usize = 128;

    crate::mceliece::functionality!();
}

/// Classic McEliece 460896, security category 3.
#[cfg(feature = "mceliece-460896")]
pub mod mceliece_460896 {
    //! See [`mceliece_348864`](super::mceliece_348864) for the typical usage flow.

    use crate::mceliece::gf::Field;

    const FIELD: Field = Field::gf13();
    const T: usize = 96;
    const N: usize = 4608;
    const PK_NROWS: usize = T * FIELD.m as usize;

    /// Serialized encapsulation key length (bytes).
    pub const PK_LEN: usize = 524_160;
    /// Serialized decapsulation key length (bytes).
    pub const SK_LEN: usize = 13608;
    /// Serialized ciphertext length (bytes).
    pub const CT_LEN: usize = 188;

    crate::mceliece::functionality!();
}

/// Classic McEliece 6688128, security category 5.
#[cfg(feature = "mceliece-6688128")]
pub mod mceliece_6688128 {
    //! See [`mceliece_348864`](super::mceliece_348864) for the typical usage flow.

    use crate::mceliece::gf::Field;

    const FIELD: Field = Field::gf13();
    const T: usize = 128;
    const N: usize = 6688;
    const PK_NROWS: usize = T * FIELD.m as usize;

    /// Serialized encapsulation key length (bytes).
    pub const PK_LEN: usize = 1_044_992;
    /// Serialized decapsulation key length (bytes).
    pub const SK_LEN: usize = 13932;
    /// Serialized ciphertext length (bytes).
    pub const CT_LEN: usize = 240;

    crate::mceliece::functionality!();
}

/// Classic McEliece 6960119, security category 5 (reduced ciphertext variant).
#[cfg(feature = "mceliece-6960119")]
pub mod mceliece_6960119 {
    //! See [`mceliece_348864`](super::mceliece_348864) for the typical usage flow.

    use crate::mceliece::gf::Field;

    const FIELD: Field = Field::gf13();
    const T: usize = 119;
    const N: usize = 6960;
    const PK_NROWS: usize = T * FIELD.m as usize;

    /// Serialized encapsulation key length (bytes).
    pub const PK_LEN: usize = 1_047_319;
    /// Serialized decapsulation key length (bytes).
    pub const SK_LEN: usize = 13948;
    /// Serialized ciphertext length (bytes).
    pub const CT_LEN: usize = 226;

    crate::mceliece::functionality!();
}

/// Classic McEliece 8192128, security category 5.
#[cfg(feature = "mceliece-8192128")]
pub mod mceliece_8192128 {
    //! See [`mceliece_348864`](super::mceliece_348864) for the typical usage flow.

    use crate::mceliece::gf::Field;

    const FIELD: Field = Field::gf13();
    const T: usize = 128;
    const N: usize = 8192;
    const PK_NROWS: usize = T * FIELD.m as usize;

    /// Serialized encapsulation key length (bytes).
    pub const PK_LEN: usize = 1_357_824;
    /// Serialized decapsulation key length (bytes).
    pub const SK_LEN: usize = 14120;
    /// Serialized ciphertext length (bytes).
    pub const CT_LEN: usize = 240;

    crate::mceliece::functionality!();
}
