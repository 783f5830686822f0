//! Error kinds shared across all three primitive families.
//!
//! No exceptions cross an FFI boundary from this crate: every fallible
//! operation returns a `Result` (or, for signature verification, a plain
//! `bool`). Kept deliberately small and `Copy` so it costs nothing to
//! propagate through the rejection loops in key generation and signing.

use core::fmt;

/// If the condition is not met, return an error. Borrowed from the `anyhow`
/// crate, generalized from the teacher's single-message `ensure!` to carry
/// a [`PqcError`] variant.
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err);
        }
    };
}

pub(crate) use ensure;

/// Top-level error type returned by fallible operations in this crate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PqcError {
    /// The OS entropy provider (or a caller-supplied `rng`) refused to fill a buffer.
    EntropyFailure,
    /// KEM decapsulation or signature verification rejected its input.
    ///
    /// For KEMs this is advisory only: per the Fujisaki–Okamoto implicit-rejection
    /// construction, the shared-secret output is still populated deterministically
    /// and must not be used by a caller that receives this error.
    AuthFailure,
    /// A public key, secret key, ciphertext, signature, or context string had a
    /// length (or structural property, e.g. modulus range) inconsistent with the
    /// declared parameter set.
    ParameterMismatch,
    /// An internal invariant was violated (e.g. Gaussian elimination produced a
    /// singular matrix during decapsulation). Should never occur in practice;
    /// surfaced rather than panicking so callers can fail closed.
    InternalInvariant,
}

impl fmt::Display for PqcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PqcError::EntropyFailure => "entropy source failed to produce randomness",
            PqcError::AuthFailure => "authentication failed (decapsulation or verification)",
            PqcError::ParameterMismatch => "input length or range inconsistent with parameter set",
            PqcError::InternalInvariant => "internal invariant violated",
        };
        f.write_str(msg)
    }
}
