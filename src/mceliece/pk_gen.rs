//! Systematic public-key (parity-check matrix) generation (spec §4.6).

use alloc::vec;
use alloc::vec::Vec;

use super::gf::Field;
use super::goppa::eval_at_support;

/// Builds the systematic part `T` of the parity-check matrix `H = [I | T]`
/// for a binary Goppa code, returning it packed row-major (`pk_nrows` rows of
/// `ceil(pk_ncols/8)` bytes each), or `None` if the matrix is singular (the
/// caller must resample and retry per spec §4.6).
///
/// `mat` is represented one byte per bit rather than tightly packed during
/// elimination — `pk_nrows * n` bytes, heap-allocated per spec §5's note
/// that McEliece key-generation scratch exceeds stack budgets — which trades
/// memory for a Gaussian-elimination loop that reads exactly like a textbook
/// presentation instead of `pk_gen.c`'s byte-sliced version.
#[must_use]
pub(crate) fn pk_gen(
    g_coeffs: &[u16], support: &[u16], field: Field, t: usize, pk_nrows: usize,
) -> Option<Vec<u8>> {
    let n = support.len();
    let pk_ncols = n - pk_nrows;

    let g_at_l = eval_at_support(g_coeffs, support, field);
    let mut inv: Vec<u16> = g_at_l.iter().map(|&v| field.inv(v)).collect();

    let mut mat = vec![0u8; pk_nrows * n];
    for block in 0..t {
        for (j, inv_j) in inv.iter_mut().enumerate() {
            for k in 0..field.m as usize {
                let row = block * field.m as usize + k;
                mat[row * n + j] = u8::try_from((*inv_j >> k) & 1).expect("single bit");
            }
            *inv_j = field.mul(*inv_j, support[j]);
        }
    }

    for i in 0..pk_nrows {
        if mat[i * n + i] == 0 {
            let mut found = None;
            for k in (i + 1)..pk_nrows {
                if mat[k * n + i] == 1 {
                    found = Some(k);
                    break;
                }
            }
            let k = found?;
            for c in 0..n {
                mat.swap(i * n + c, k * n + c);
            }
        }
        for k in 0..pk_nrows {
            if k != i && mat[k * n + i] == 1 {
                for c in 0..n {
                    mat[k * n + c] ^= mat[i * n + c];
                }
            }
        }
    }

    let out_stride = pk_ncols.div_ceil(8);
    let mut pk = vec![0u8; pk_nrows * out_stride];
    for i in 0..pk_nrows {
        for c in 0..pk_ncols {
            if mat[i * n + pk_nrows + c] == 1 {
                pk[i * out_stride + c / 8] |= 1 << (c % 8);
            }
        }
    }
    Some(pk)
}
