use super::types::Z;
use super::Q;
use crate::error::{ensure, PqcError};

/// Encodes an array of `d`-bit integers into a byte array, for `1 <= d <= 12`.
///
/// `integers_f` holds values in `Z_m` where `m = 2^d` for `d < 12` and `m = q` for `d == 12`;
/// `bytes_b` must be `32*d` bytes long.
pub(crate) fn byte_encode(d: u32, integers_f: &[Z; 256], bytes_b: &mut [u8]) {
    let mut temp = 0u64;
    let mut bit_index = 0;
    let mut byte_index = 0;
    for coeff in integers_f {
        let coeff = u64::from(coeff.get_u16());
        let coeff = coeff & (2u64.pow(d) - 1);
        temp |= coeff << bit_index;
        bit_index += d as usize;
        while bit_index > 7 {
            bytes_b[byte_index] = temp as u8;
            temp >>= 8;
            byte_index += 1;
            bit_index -= 8;
        }
    }
}

/// Decodes a byte array into an array of `d`-bit integers, for `1 <= d <= 12`.
///
/// # Errors
/// Returns [`PqcError::ParameterMismatch`] if any decoded integer is out of range for
/// its modulus (`2^d` for `d < 12`, `q` for `d == 12`).
pub(crate) fn byte_decode(d: u32, bytes_b: &[u8]) -> Result<[Z; 256], PqcError> {
    let mut integers_f = [Z::default(); 256];
    let mut temp = 0u64;
    let mut int_index = 0;
    let mut bit_index = 0;
    for byte in bytes_b {
        temp |= u64::from(*byte) << bit_index;
        bit_index += 8;
        while bit_index >= d as usize {
            let tmask = temp & (2u64.pow(d) - 1);
            integers_f[int_index].set_u16(tmask as u16);
            bit_index -= d as usize;
            temp >>= d;
            int_index += 1;
        }
    }
    let max = if d < 12 { 2u16.pow(d) } else { Q };
    ensure!(integers_f.iter().all(|e| e.get_u16() < max), PqcError::ParameterMismatch);
    Ok(integers_f)
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::vec;
    use alloc::vec::Vec;

    use rand::{Rng, SeedableRng};

    use super::{byte_decode, byte_encode};

    #[test]
    fn test_decode_and_encode_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        for d in [4u32, 5, 10, 11] {
            let num_bytes = 32 * d as usize;
            let bytes1: Vec<u8> = (0..num_bytes).map(|_| rng.gen()).collect();
            let integers = byte_decode(d, &bytes1).unwrap();
            let mut bytes2 = vec![0u8; num_bytes];
            byte_encode(d, &integers, &mut bytes2);
            assert_eq!(bytes1, bytes2);
        }
    }
}
