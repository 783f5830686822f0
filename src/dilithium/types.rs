use super::Q;

/// Element of `Z_q` for Dilithium's modulus. Reduction goes through a plain
/// `i64` remainder rather than the Montgomery arithmetic the reference
/// implementation (and this crate's Kyber `Z`) use — Dilithium's modulus is
/// large enough (`Q < 2^23`) that a 64-bit product never risks overflow, so
/// the speed Montgomery buys isn't worth carrying a second bespoke reduction
/// scheme. Always holds a canonical representative in `[0, Q)`.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Z(i32);

impl Z {
    pub(crate) const fn zero() -> Self {
        Self(0)
    }

    /// Const constructor from a raw reduced value, for compile-time table generation.
    pub(crate) const fn from_canonical(a: i32) -> Self {
        Self(a)
    }

    /// Builds a `Z` from an arbitrary (possibly negative, possibly
    /// out-of-range) `i64`, reducing into `[0, Q)`.
    pub(crate) fn from_i64(a: i64) -> Self {
        Self(a.rem_euclid(Q) as i32)
    }

    pub(crate) fn get(self) -> i32 {
        self.0
    }

    /// Signed centered representative in `(-Q/2, Q/2]`.
    pub(crate) fn centered(self) -> i32 {
        if self.0 > (Q as i32) / 2 {
            self.0 - Q as i32
        } else {
            self.0
        }
    }

    #[inline(always)]
    pub(crate) fn add(self, other: Self) -> Self {
        let mut s = self.0 + other.0;
        if s >= Q as i32 {
            s -= Q as i32;
        }
        Self(s)
    }

    #[inline(always)]
    pub(crate) fn sub(self, other: Self) -> Self {
        let mut s = self.0 - other.0;
        if s < 0 {
            s += Q as i32;
        }
        Self(s)
    }

    #[inline(always)]
    pub(crate) fn mul(self, other: Self) -> Self {
        Self::from_i64(i64::from(self.0) * i64::from(other.0))
    }

    pub(crate) fn neg(self) -> Self {
        if self.0 == 0 {
            self
        } else {
            Self(Q as i32 - self.0)
        }
    }
}

/// A single polynomial in `R_q = Z_q[X]/(X^256+1)`.
pub(crate) type Poly = [Z; 256];

pub(crate) fn poly_zero() -> Poly {
    [Z::zero(); 256]
}

pub(crate) fn poly_add(a: &Poly, b: &Poly) -> Poly {
    core::array::from_fn(|i| a[i].add(b[i]))
}

pub(crate) fn poly_sub(a: &Poly, b: &Poly) -> Poly {
    core::array::from_fn(|i| a[i].sub(b[i]))
}

/// A length-`K` vector of polynomials (`s2`, `t`, `w`, ... depending on call site).
pub(crate) type PolyVec<const K: usize> = [Poly; K];

pub(crate) fn polyvec_add<const K: usize>(a: &PolyVec<K>, b: &PolyVec<K>) -> PolyVec<K> {
    core::array::from_fn(|i| poly_add(&a[i], &b[i]))
}

pub(crate) fn polyvec_sub<const K: usize>(a: &PolyVec<K>, b: &PolyVec<K>) -> PolyVec<K> {
    core::array::from_fn(|i| poly_sub(&a[i], &b[i]))
}

/// The infinity norm of a polynomial's centered representatives.
pub(crate) fn poly_max_abs(p: &Poly) -> i32 {
    p.iter().map(|c| c.centered().unsigned_abs() as i32).max().unwrap_or(0)
}

pub(crate) fn polyvec_max_abs<const K: usize>(v: &PolyVec<K>) -> i32 {
    v.iter().map(poly_max_abs).max().unwrap_or(0)
}
