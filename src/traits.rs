use rand_core::{CryptoRng, CryptoRngCore, RngCore};

#[cfg(feature = "default-rng")]
use rand_core::OsRng;

use crate::error::PqcError;

/// The `KeyGen` trait is defined to allow trait objects, implemented by both
/// KEM families (`kyber`, `mceliece`).
pub trait KeyGen {
    /// The (public) encapsulation key sent from the originator to the remote party.
    type EncapsKey;
    /// The (private) decapsulation key used by the originator to generate the shared secret.
    type DecapsKey;
    /// A serialized (public) encapsulation key byte array of the correct length.
    type EncapsByteArray;
    /// A serialized (private) decapsulation key byte array of the correct length.
    type DecapsByteArray;

    /// Generates an encapsulation and decapsulation key pair specific to this security
    /// parameter set, using the OS default random number generator.
    ///
    /// # Errors
    /// Returns an error if the random number generator fails.
    ///
    /// # Examples
    /// ```rust
    /// # fn main() -> Result<(), pqc_core::error::PqcError> {
    /// # #[cfg(feature = "ml-kem-512")] {
    /// use pqc_core::kyber::ml_kem_512;
    /// use pqc_core::traits::{KeyGen, SerDes, Decaps, Encaps};
    ///
    /// let (ek1, dk1) = ml_kem_512::KG::try_keygen()?;
    /// let ek1_bytes = ek1.into_bytes();
    ///
    /// let ek2 = ml_kem_512::EncapsKey::try_from_bytes(ek1_bytes)?;
    /// let (ssk2, ct2) = ek2.try_encaps()?;
    /// let ct1 = ml_kem_512::CipherText::try_from_bytes(ct2.into_bytes())?;
    /// let ssk1 = dk1.try_decaps(&ct1)?;
    ///
    /// assert_eq!(ssk1, ssk2);
    /// # }
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::EncapsKey, Self::DecapsKey), PqcError> {
        Self::try_keygen_with_rng(&mut OsRng)
    }

    /// Generates an encapsulation and decapsulation key pair using a provided
    /// random number generator.
    ///
    /// # Errors
    /// Returns an error if the random number generator fails.
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::EncapsKey, Self::DecapsKey), PqcError>;

    /// Generates an encapsulation and decapsulation key pair deterministically from a
    /// caller-supplied seed. Family-specific seed lengths: Kyber takes `d` and `z` (32
    /// bytes each, FIPS 203 §7.1); McEliece takes a single seed which feeds its own
    /// internal DRBG (spec §4.8).
    #[must_use]
    fn keygen_from_seed(d: &[u8], z: &[u8]) -> (Self::EncapsKey, Self::DecapsKey);

    /// Performs validation between an encapsulation key and a decapsulation key (both in
    /// byte arrays), e.g. after both have been serialized, stored, and reloaded. Not
    /// constant-time.
    fn validate_keypair_with_rng_vartime(
        rng: &mut impl CryptoRngCore,
        ek: &Self::EncapsByteArray,
        dk: &Self::DecapsByteArray,
    ) -> bool;
}

/// The `Encaps` trait defines methods for generating shared secrets and ciphertexts
/// using an encapsulation key.
pub trait Encaps {
    /// The shared secret key type generated during encapsulation.
    type SharedSecretKey;
    /// The ciphertext type transmitted from the encapsulating party to the decapsulating party.
    type CipherText;

    /// Generates a shared secret and ciphertext from an encapsulation key, using the
    /// OS default random number generator.
    ///
    /// # Errors
    /// Returns an error when the random number generator fails or an internal error
    /// condition arises.
    #[cfg(feature = "default-rng")]
    fn try_encaps(&self) -> Result<(Self::SharedSecretKey, Self::CipherText), PqcError> {
        self.try_encaps_with_rng(&mut OsRng)
    }

    /// Generates a shared secret and ciphertext from an encapsulation key, using a
    /// provided random number generator.
    ///
    /// # Errors
    /// Returns an error when the random number generator fails or an internal error
    /// condition arises.
    fn try_encaps_with_rng(
        &self,
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::SharedSecretKey, Self::CipherText), PqcError>;

    /// Generates a shared secret and ciphertext deterministically from a caller-supplied
    /// 32-byte seed, rather than a random number generator.
    fn encaps_from_seed(&self, seed: &[u8; 32]) -> (Self::SharedSecretKey, Self::CipherText) {
        self.try_encaps_with_rng(&mut DummyRng { data: *seed })
            .expect("rng will not fail")
    }
}

/// Deterministic pseudo-RNG wrapper used by every `*_from_seed` method; it always returns
/// its fixed 32-byte buffer and never consults an entropy source. Kept local to this module
/// so seed-derived operations never accidentally touch the OS RNG or a DRBG reseed path.
pub(crate) struct DummyRng {
    pub(crate) data: [u8; 32],
}

impl RngCore for DummyRng {
    fn next_u32(&mut self) -> u32 { unimplemented!() }

    fn next_u64(&mut self) -> u64 { unimplemented!() }

    fn fill_bytes(&mut self, _out: &mut [u8]) { unimplemented!() }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        out.copy_from_slice(&self.data);
        Ok(())
    }
}

impl CryptoRng for DummyRng {}

/// The `Decaps` trait defines methods for recovering the shared secret using a
/// decapsulation key and ciphertext.
pub trait Decaps {
    /// The ciphertext type received from the encapsulating party.
    type CipherText;
    /// The shared secret key type generated during decapsulation.
    type SharedSecretKey;

    /// Generates a shared secret from a decapsulation key and ciphertext. Always succeeds
    /// and returns *some* shared secret key, per the Fujisaki–Okamoto implicit-rejection
    /// construction (spec §4.5, §4.7) — a malformed ciphertext yields a pseudorandom key
    /// indistinguishable from a genuine one rather than an error, so this only returns
    /// `Err` on a caller-visible structural problem (e.g. wrong parameter set).
    ///
    /// # Errors
    /// Returns an error if an internal invariant is violated.
    fn try_decaps(&self, ct: &Self::CipherText) -> Result<Self::SharedSecretKey, PqcError>;
}

/// The `SerDes` trait provides methods for serializing and deserializing cryptographic
/// objects to and from their fixed-size wire representation.
pub trait SerDes {
    /// The fixed-size byte array type used for serialization.
    type ByteArray;

    /// Produces a byte array of fixed size specific to the struct being serialized.
    fn into_bytes(self) -> Self::ByteArray;

    /// Consumes a byte array of fixed size specific to the struct being deserialized;
    /// performs validation.
    ///
    /// # Errors
    /// Returns an error on malformed input.
    fn try_from_bytes(ba: Self::ByteArray) -> Result<Self, PqcError>
    where
        Self: Sized;
}

/// The `Sign` trait defines methods for producing a signature over a message with a
/// signing key, implemented by `dilithium`.
pub trait Sign {
    /// The detached signature type produced.
    type Signature;

    /// Signs `message` under an optional `context` string (FIPS 204 §5.2 caps `context`
    /// at 255 bytes), using the OS default random number generator for the hedged
    /// randomizer `rnd`.
    ///
    /// # Errors
    /// Returns an error when the random number generator fails or `context` exceeds 255
    /// bytes.
    #[cfg(feature = "default-rng")]
    fn try_sign(&self, message: &[u8], context: &[u8]) -> Result<Self::Signature, PqcError> {
        self.try_sign_with_rng(&mut OsRng, message, context)
    }

    /// Signs `message` under an optional `context` string, using a provided random number
    /// generator for the hedged randomizer `rnd`.
    ///
    /// # Errors
    /// Returns an error when the random number generator fails or `context` exceeds 255
    /// bytes.
    fn try_sign_with_rng(
        &self,
        rng: &mut impl CryptoRngCore,
        message: &[u8],
        context: &[u8],
    ) -> Result<Self::Signature, PqcError>;

    /// Signs `message` deterministically: `rnd` is fixed to the all-zero 32-byte string
    /// rather than drawn from an RNG, per FIPS 204's deterministic variant.
    ///
    /// # Errors
    /// Returns an error when `context` exceeds 255 bytes.
    fn sign_deterministic(
        &self,
        message: &[u8],
        context: &[u8],
    ) -> Result<Self::Signature, PqcError> {
        self.try_sign_with_rng(&mut DummyRng { data: [0u8; 32] }, message, context)
    }

    /// Signs `message` deterministically from a caller-supplied 32-byte seed,
    /// rather than the all-zero string `sign_deterministic` uses — the `Sign`
    /// counterpart to [`Encaps::encaps_from_seed`].
    ///
    /// # Errors
    /// Returns an error when `context` exceeds 255 bytes.
    fn sign_from_seed(
        &self,
        message: &[u8],
        context: &[u8],
        seed: &[u8; 32],
    ) -> Result<Self::Signature, PqcError> {
        self.try_sign_with_rng(&mut DummyRng { data: *seed }, message, context)
    }
}

/// The `Verify` trait defines methods for checking a signature against a message with a
/// verification key.
pub trait Verify {
    /// The detached signature type consumed.
    type Signature;

    /// Verifies that `signature` is valid for `message` under `context`, returning `false`
    /// (not an error) on any mismatch — this function never needs to distinguish "bad
    /// encoding" from "bad signature" for the caller, since both mean "do not trust this
    /// message".
    fn verify(&self, message: &[u8], signature: &Self::Signature, context: &[u8]) -> bool;
}
