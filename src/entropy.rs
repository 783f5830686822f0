//! OS entropy and the `Hcg` DRBG construction named in spec §4.10
//! (HMAC-SHA512-based). Exposes an `init`/`generate`/`update` contract,
//! auto-reseeds from OS entropy once predictive resistance is requested and
//! a threshold is crossed, and zeroizes its state on drop.
//!
//! Global/static singletons (the original C source's `secrand`) are replaced
//! with an explicit context object the caller owns and passes around —
//! thread-safety then falls out of Rust's aliasing rules rather than needing
//! a mutex the original never had.

use zeroize::ZeroizeOnDrop;

use crate::error::PqcError;
use crate::hash::{hmac_sha512, hmac_sha512_parts};

/// Reseed threshold (in generated bytes) for the HMAC-backed generator.
const HCG_RESEED_THRESHOLD: u64 = 1 << 16; // 64 KiB

/// Fills `out` with OS-provided cryptographically strong randomness. This is
/// the `acp` collaborator of spec §4.10 and the `rng(out, len) -> bool`
/// collaborator of spec §6, backed by the `getrandom` crate (`/dev/urandom`,
/// `BCryptGenRandom`, or the platform equivalent under the hood).
pub(crate) fn os_entropy(out: &mut [u8]) -> Result<(), PqcError> {
    getrandom::getrandom(out).map_err(|_| PqcError::EntropyFailure)
}

/// HMAC-SHA512-based deterministic random bit generator (HMAC_DRBG-style,
/// one-block generate with chained state per spec §4.10's `hcg`).
#[derive(ZeroizeOnDrop)]
pub struct Hcg {
    key: [u8; 64],
    value: [u8; 64],
    #[zeroize(skip)]
    predictive_resistance: bool,
    bytes_since_reseed: u64,
}

impl Hcg {
    /// Key the generator from a seed and domain-separation info string.
    #[must_use]
    pub fn init(seed: &[u8], info: &[u8], predictive_resistance: bool) -> Self {
        let key = [0u8; 64];
        let value = hmac_sha512(&key, seed);
        let mut hcg = Self { key, value, predictive_resistance, bytes_since_reseed: 0 };
        hcg.update(info);
        hcg
    }

    /// Absorb additional seed material, rekeying the HMAC state (`K = HMAC(K, V || 0x00 || seed)`).
    pub fn update(&mut self, seed: &[u8]) {
        self.key = hmac_sha512_parts(&self.key, &[&self.value, &[0x00], seed]);
        self.value = hmac_sha512(&self.key, &self.value);
    }

    /// Fill `out` with pseudorandom bytes, reseeding from OS entropy first if
    /// predictive resistance is enabled and the byte threshold has been
    /// crossed.
    ///
    /// # Errors
    /// Returns [`PqcError::EntropyFailure`] if a required OS reseed fails.
    pub fn generate(&mut self, out: &mut [u8]) -> Result<(), PqcError> {
        if self.predictive_resistance && self.bytes_since_reseed >= HCG_RESEED_THRESHOLD {
            let mut reseed = [0u8; 64];
            os_entropy(&mut reseed)?;
            self.update(&reseed);
            self.bytes_since_reseed = 0;
        }
        let mut filled = 0;
        while filled < out.len() {
            self.value = hmac_sha512(&self.key, &self.value);
            let take = core::cmp::min(64, out.len() - filled);
            out[filled..filled + take].copy_from_slice(&self.value[..take]);
            filled += take;
        }
        self.bytes_since_reseed += out.len() as u64;
        Ok(())
    }
}
