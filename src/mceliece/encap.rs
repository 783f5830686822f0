//! Classic McEliece encapsulation (spec §4.7): samples a constant-weight
//! error vector, forms its syndrome under the public systematic parity-check
//! matrix, and derives a confirmation hash and shared secret from it.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::PqcError;
use crate::hash::kdf32;

/// Samples a weight-`t` error vector over `n` bits: `t` distinct positions
/// drawn uniformly from `[0, n)`, via rejection sampling on oversized
/// candidate indices (the same technique the reference implementation's
/// `encrypt.c` uses, generalized away from its fixed `GFBITS`/`SYS_T`).
fn sample_error_vector(
    n: usize, t: usize, fill: &mut dyn FnMut(&mut [u8]) -> Result<(), PqcError>,
) -> Result<Vec<u8>, PqcError> {
    let mut positions = Vec::with_capacity(t);
    let mut e = vec![0u8; n.div_ceil(8)];
    while positions.len() < t {
        let mut buf = [0u8; 2];
        fill(&mut buf)?;
        let candidate = (u16::from_le_bytes(buf) as usize) % n.next_power_of_two();
        if candidate >= n || positions.contains(&candidate) {
            continue;
        }
        positions.push(candidate);
        e[candidate / 8] |= 1 << (candidate % 8);
    }
    Ok(e)
}

/// Computes the `pk_nrows`-bit syndrome `s = e_left XOR T * e_right` of a
/// weight-`t` vector `e` under the systematic parity-check matrix `[I | T]`,
/// where `pk` packs `T` row-major at `ceil(pk_ncols/8)` bytes per row.
fn public_syndrome(pk: &[u8], e: &[u8], pk_nrows: usize, pk_ncols: usize) -> Vec<u8> {
    let stride = pk_ncols.div_ceil(8);
    let mut s = vec![0u8; pk_nrows.div_ceil(8)];
    for row in 0..pk_nrows {
        let left_bit = (e[row / 8] >> (row % 8)) & 1;
        let mut acc = left_bit;
        let row_bytes = &pk[row * stride..(row + 1) * stride];
        for col in 0..pk_ncols {
            let t_bit = (row_bytes[col / 8] >> (col % 8)) & 1;
            let e_bit = (e[(pk_nrows + col) / 8] >> ((pk_nrows + col) % 8)) & 1;
            acc ^= t_bit & e_bit;
        }
        if acc == 1 {
            s[row / 8] |= 1 << (row % 8);
        }
    }
    s
}

/// Encapsulates against `pk`, returning `(shared_secret, ciphertext)` where
/// `ciphertext = syndrome || confirmation_hash`.
///
/// # Errors
/// Returns [`PqcError::EntropyFailure`] if `fill` fails.
pub(crate) fn mceliece_encap(
    pk: &[u8], n: usize, t: usize, pk_nrows: usize,
    mut fill: impl FnMut(&mut [u8]) -> Result<(), PqcError>,
) -> Result<([u8; 32], Vec<u8>), PqcError> {
    let pk_ncols = n - pk_nrows;
    let e = sample_error_vector(n, t, &mut fill)?;
    let s = public_syndrome(pk, &e, pk_nrows, pk_ncols);

    let tau = kdf32(&[&[0x02], &e]);
    let k = kdf32(&[&[0x01], &e, &s, &tau]);

    let mut ct = Vec::with_capacity(s.len() + 32);
    ct.extend_from_slice(&s);
    ct.extend_from_slice(&tau);
    Ok((k, ct))
}

#[cfg(test)]
mod tests {
    use super::sample_error_vector;

    #[test]
    fn test_sample_error_vector_has_exact_weight_and_length() {
        let n = 128;
        let t = 16;
        let mut counter = 0u64;
        let mut fill = |out: &mut [u8]| -> Result<(), crate::error::PqcError> {
            for b in out {
                counter = counter.wrapping_add(0x2545_F491_4F6C_DD1D);
                *b = (counter >> 40) as u8;
            }
            Ok(())
        };
        let e = sample_error_vector(n, t, &mut fill).expect("sampling succeeds");
        assert_eq!(e.len(), n.div_ceil(8));
        let weight: u32 = e.iter().map(|b| b.count_ones()).sum();
        assert_eq!(weight, t as u32);
    }
}
