#![no_std]
#![deny(clippy::pedantic)]
#![allow(clippy::similar_names, clippy::many_single_char_names)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//! Implements three NIST post-quantum primitives behind a common trait
//! surface: ML-KEM (`kyber`), Classic McEliece (`mceliece`), and ML-DSA
//! (`dilithium`). Each family is feature-gated independently so a binary
//! only pays for the parameter sets it actually links.
//
// Functionality map
//
// Keccak / SHA-3 / SHA-2 / HMAC wrappers        --> hash.rs
// Constant-time compare / select primitives     --> ct.rs
// OS entropy, Hcg DRBG                           --> entropy.rs
// Shared error type                             --> error.rs
// KeyGen / Encaps / Decaps / SerDes / Sign / Verify --> traits.rs
// ML-KEM (K-PKE + FO wrapper)                   --> kyber/
// Classic McEliece (Goppa code KEM)             --> mceliece/
// ML-DSA (Fiat–Shamir with aborts)              --> dilithium/

#[cfg(feature = "mceliece")]
extern crate alloc;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::traits::SerDes;

mod ct;
pub mod error;
mod hash;

mod entropy;

/// All functionality is covered by traits, such that consumers can utilize trait objects.
pub mod traits;

#[cfg(feature = "kyber")]
pub mod kyber;

#[cfg(feature = "mceliece")]
pub mod mceliece;

#[cfg(feature = "dilithium")]
pub mod dilithium;

/// Shared secret key length, in bytes, for every KEM parameter set in this crate.
pub const SSK_LEN: usize = 32;

/// The (opaque) shared secret established by a KEM, common to `kyber` and `mceliece`.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretKey([u8; SSK_LEN]);

impl SharedSecretKey {
    pub(crate) fn new(bytes: [u8; SSK_LEN]) -> Self {
        SharedSecretKey(bytes)
    }
}

impl SerDes for SharedSecretKey {
    type ByteArray = [u8; SSK_LEN];

    fn into_bytes(self) -> Self::ByteArray {
        self.0
    }

    fn try_from_bytes(ssk: Self::ByteArray) -> Result<Self, error::PqcError> {
        Ok(SharedSecretKey(ssk))
    }
}

impl PartialEq for SharedSecretKey {
    fn eq(&self, other: &Self) -> bool {
        ct::ct_eq(&self.0, &other.0)
    }
}

impl Eq for SharedSecretKey {}
