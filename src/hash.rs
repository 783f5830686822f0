//! Hash and XOF wrappers shared by all three primitive families.
//!
//! The L0 "Keccak core" and "Hash/XOF wrappers" rows of the component table
//! are implemented here by depending on the `sha3` crate rather than hand
//! rolling Keccak-f[1600] — the permutation, sponge, and domain separators
//! (0x1F/0x06/0x04) are exactly what `sha3` already implements, and every
//! crate in this corpus that needs SHA-3 reaches for it the same way.
//! SHA-2 and HMAC-SHA512 (used only by the HMAC-based DRBG in `entropy.rs`)
//! are likewise wrapped here rather than reimplemented.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Sha3_512, Shake128, Shake256};

/// Function PRF. Pseudorandom function generating `OUT` bytes of output from
/// a 32-byte seed and a single-byte domain separator, via SHAKE-256.
#[must_use]
pub(crate) fn prf<const OUT: usize>(s: &[u8; 32], b: u8) -> [u8; OUT] {
    let mut hasher = Shake256::default();
    hasher.update(s);
    hasher.update(&[b]);
    let mut reader = hasher.finalize_xof();
    let mut result = [0u8; OUT];
    reader.read(&mut result);
    result
}

/// Function XOF, used to expand a 32-byte seed plus two index bytes into a
/// SHAKE-128 stream (matrix sampling in both Kyber and Dilithium).
#[must_use]
pub(crate) fn xof(rho: &[u8; 32], i: u8, j: u8) -> impl XofReader {
    let mut hasher = Shake128::default();
    hasher.update(rho);
    hasher.update(&[i]);
    hasher.update(&[j]);
    hasher.finalize_xof()
}

/// Function G: SHA3-512, split into two 32-byte halves.
#[must_use]
pub(crate) fn g(bytes: &[&[u8]]) -> ([u8; 32], [u8; 32]) {
    let mut hasher = Sha3_512::new();
    bytes.iter().for_each(|b| Digest::update(&mut hasher, b));
    let digest = hasher.finalize();
    let a = digest[0..32].try_into().expect("g: 32-byte slice");
    let b = digest[32..64].try_into().expect("g: 32-byte slice");
    (a, b)
}

/// Function H: SHA3-256.
#[must_use]
pub(crate) fn h(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, bytes);
    hasher.finalize().into()
}

/// 32-byte SHAKE-256 KDF over an arbitrary number of message parts. Used to
/// derive the final Kyber shared secret and as the McEliece confirmation/
/// shared-secret hash (spec §4.5, §4.7, §4.8).
#[must_use]
pub(crate) fn kdf32(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Shake256::default();
    parts.iter().for_each(|p| hasher.update(p));
    let mut reader = hasher.finalize_xof();
    let mut result = [0u8; 32];
    reader.read(&mut result);
    result
}

/// Arbitrary-length SHAKE-256 squeeze over message parts, restartable across
/// blocks per spec §4.1 (the reader may be squeezed incrementally by the caller).
#[must_use]
pub(crate) fn shake256_xof(parts: &[&[u8]]) -> impl XofReader {
    let mut hasher = Shake256::default();
    parts.iter().for_each(|p| hasher.update(p));
    hasher.finalize_xof()
}

/// Variable-length SHAKE-256 digest over message parts (Dilithium `tr`, `c~`, `mu`).
#[must_use]
pub(crate) fn shake256(parts: &[&[u8]], out: &mut [u8]) {
    let mut hasher = Shake256::default();
    parts.iter().for_each(|p| hasher.update(p));
    let mut reader = hasher.finalize_xof();
    reader.read(out);
}

type HmacSha512 = Hmac<Sha512>;

/// HMAC-SHA512, keyed MAC backing the `Hcg` DRBG (spec §4.10).
#[must_use]
pub(crate) fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac = <HmacSha512 as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// HMAC-SHA512 over multiple message parts, fed incrementally so callers
/// never need to materialize a concatenated buffer (used by `Hcg::update`,
/// which otherwise would need to join `V || 0x00 || seed`).
#[must_use]
pub(crate) fn hmac_sha512_parts(key: &[u8], parts: &[&[u8]]) -> [u8; 64] {
    let mut mac = <HmacSha512 as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
    parts.iter().for_each(|p| mac.update(p));
    mac.finalize().into_bytes().into()
}
