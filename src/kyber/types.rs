use super::Q;

/// Element of `Z_q`, stored as `u16` but computed in wider integers so
/// add/sub/mul can reduce mod `q` without an intermediate overflow.
#[derive(Clone, Copy, Default)]
pub(crate) struct Z(u16);

#[allow(clippy::inline_always)]
impl Z {
    const M: u64 = 2u64.pow(32) / Self::Q64;
    #[allow(clippy::cast_possible_truncation)]
    const Q16: u16 = Q;
    const Q64: u64 = Q as u64;

    /// Const constructor for compile-time table generation (e.g. `ZETA_TABLE`).
    pub(crate) const fn zero() -> Self {
        Self(0)
    }

    /// Const constructor from a raw reduced value, for compile-time table generation.
    pub(crate) const fn from_u16(a: u16) -> Self {
        Self(a)
    }

    pub(crate) fn get_u16(self) -> u16 {
        self.0
    }

    pub(crate) fn get_u32(self) -> u32 {
        u32::from(self.0)
    }

    pub(crate) fn set_u16(&mut self, a: u16) {
        self.0 = a;
    }

    #[inline(always)]
    pub(crate) fn add(self, other: Self) -> Self {
        let sum = self.0.wrapping_add(other.0);
        let (trial, borrow) = sum.overflowing_sub(Self::Q16);
        Self(if borrow { sum } else { trial })
    }

    #[inline(always)]
    pub(crate) fn sub(self, other: Self) -> Self {
        let (diff, borrow) = self.0.overflowing_sub(other.0);
        let trial = diff.wrapping_add(Self::Q16);
        Self(if borrow { trial } else { diff })
    }

    #[inline(always)]
    pub(crate) fn mul(self, other: Self) -> Self {
        let prod = u64::from(self.0) * u64::from(other.0);
        let quot = (prod * Self::M) >> 32;
        let rem = prod - quot * Self::Q64;
        let (diff, borrow) = rem.overflowing_sub(Self::Q64);
        let result = if borrow { rem } else { diff };
        Self(u16::try_from(result).expect("reduced value fits u16"))
    }

    /// `c0` half of `BaseCaseMultiply`: `a0*b0 + a1*b1*gamma`.
    #[inline(always)]
    pub(crate) fn base_mul(self, a1: Self, b0: Self, b1: Self, gamma: Self) -> Self {
        self.mul(b0).add(a1.mul(b1).mul(gamma))
    }

    /// `c1` half of `BaseCaseMultiply`: `a0*b1 + a1*b0`.
    #[inline(always)]
    pub(crate) fn base_mul2(self, a1: Self, b0: Self, b1: Self) -> Self {
        self.mul(b1).add(a1.mul(b0))
    }
}
