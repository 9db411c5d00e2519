// -*- mode: rust; -*-
//
// This file is part of ed25519-group.
// See LICENSE for licensing information.

//! Field arithmetic for ℤ/(2²⁵⁵-19), using 64-bit arithmetic with
//! 128-bit products.
//!
//! This backend only serves the Elligator 2 maps; everything else in the
//! crate works on `curve25519-dalek` types.  Field elements are
//! represented in radix 2^51 as five `u64`s whose limbs are allowed to
//! grow up to 2^54 between reductions mod p.

use core::fmt::Debug;
use core::ops::Neg;
use core::ops::{Add, AddAssign};
use core::ops::{Mul, MulAssign};
use core::ops::{Sub, SubAssign};

use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

use crate::constants::SQRT_M1;

const LOW_51_BIT_MASK: u64 = (1u64 << 51) - 1;

/// A `FieldElement` represents an element of the field GF(2^255 - 19).
#[derive(Copy, Clone)]
pub(crate) struct FieldElement(pub(crate) [u64; 5]);

impl Debug for FieldElement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FieldElement({:?})", &self.0[..])
    }
}

impl ConstantTimeEq for FieldElement {
    /// Test equality between two `FieldElement`s by comparing their
    /// canonical encodings.
    fn ct_eq(&self, other: &FieldElement) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &FieldElement) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for FieldElement {}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &FieldElement, b: &FieldElement, choice: Choice) -> FieldElement {
        FieldElement([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
            u64::conditional_select(&a.0[4], &b.0[4], choice),
        ])
    }

    fn conditional_assign(&mut self, other: &FieldElement, choice: Choice) {
        self.0[0].conditional_assign(&other.0[0], choice);
        self.0[1].conditional_assign(&other.0[1], choice);
        self.0[2].conditional_assign(&other.0[2], choice);
        self.0[3].conditional_assign(&other.0[3], choice);
        self.0[4].conditional_assign(&other.0[4], choice);
    }
}

impl<'b> AddAssign<&'b FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: &'b FieldElement) {
        for i in 0..5 {
            self.0[i] += rhs.0[i];
        }
    }
}

impl<'a, 'b> Add<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: &'b FieldElement) -> FieldElement {
        let mut output = *self;
        output += rhs;
        output
    }
}

impl<'b> SubAssign<&'b FieldElement> for FieldElement {
    fn sub_assign(&mut self, rhs: &'b FieldElement) {
        let result = (self as &FieldElement) - rhs;
        self.0 = result.0;
    }
}

impl<'a, 'b> Sub<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: &'b FieldElement) -> FieldElement {
        // To avoid underflow, first add a multiple of p.
        // Choose 16*p = p << 4 to be larger than 54-bit rhs.
        FieldElement::reduce([
            (self.0[0] + 36028797018963664u64) - rhs.0[0],
            (self.0[1] + 36028797018963952u64) - rhs.0[1],
            (self.0[2] + 36028797018963952u64) - rhs.0[2],
            (self.0[3] + 36028797018963952u64) - rhs.0[3],
            (self.0[4] + 36028797018963952u64) - rhs.0[4],
        ])
    }
}

impl<'b> MulAssign<&'b FieldElement> for FieldElement {
    fn mul_assign(&mut self, rhs: &'b FieldElement) {
        let result = (self as &FieldElement) * rhs;
        self.0 = result.0;
    }
}

impl<'a, 'b> Mul<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: &'b FieldElement) -> FieldElement {
        /// Multiply two 64-bit integers with 128 bits of output.
        #[inline(always)]
        fn m(x: u64, y: u64) -> u128 {
            (x as u128) * (y as u128)
        }

        let a: &[u64; 5] = &self.0;
        let b: &[u64; 5] = &rhs.0;

        // 64-bit precomputations to avoid 128-bit multiplications
        let b1_19 = b[1] * 19;
        let b2_19 = b[2] * 19;
        let b3_19 = b[3] * 19;
        let b4_19 = b[4] * 19;

        // Multiply to get 128-bit coefficients of output.
        //
        // The carry (c[i] >> 51) fits into a u64 iff the limb bitlength b
        // satisfies 2b + 6.27 < 64 + 51, iff b <= 54.
        let c0: u128 = m(a[0], b[0]) + m(a[4], b1_19) + m(a[3], b2_19) + m(a[2], b3_19) + m(a[1], b4_19);
        let mut c1: u128 = m(a[1], b[0]) + m(a[0], b[1]) + m(a[4], b2_19) + m(a[3], b3_19) + m(a[2], b4_19);
        let mut c2: u128 = m(a[2], b[0]) + m(a[1], b[1]) + m(a[0], b[2]) + m(a[4], b3_19) + m(a[3], b4_19);
        let mut c3: u128 = m(a[3], b[0]) + m(a[2], b[1]) + m(a[1], b[2]) + m(a[0], b[3]) + m(a[4], b4_19);
        let mut c4: u128 = m(a[4], b[0]) + m(a[3], b[1]) + m(a[2], b[2]) + m(a[1], b[3]) + m(a[0], b[4]);

        debug_assert!(a.iter().all(|&x| x < (1 << 54)));
        debug_assert!(b.iter().all(|&x| x < (1 << 54)));

        // The 128-bit output limbs are stored in two 64-bit registers
        // (low/high part).  Rebinding the names after carrying informs
        // LLVM that the values have shrunk.
        let mut c0: u64 = {
            c1 += (c0 >> 51) as u128;
            (c0 as u64) & LOW_51_BIT_MASK
        };
        let c1: u64 = {
            c2 += (c1 >> 51) as u128;
            (c1 as u64) & LOW_51_BIT_MASK
        };
        let c2: u64 = {
            c3 += (c2 >> 51) as u128;
            (c2 as u64) & LOW_51_BIT_MASK
        };
        let c3: u64 = {
            c4 += (c3 >> 51) as u128;
            (c3 as u64) & LOW_51_BIT_MASK
        };
        let c4: u64 = {
            c0 += ((c4 >> 51) as u64) * 19;
            (c4 as u64) & LOW_51_BIT_MASK
        };

        FieldElement::reduce([c0, c1, c2, c3, c4])
    }
}

impl<'a> Neg for &'a FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        // See commentary in the Sub impl.
        FieldElement::reduce([
            36028797018963664u64 - self.0[0],
            36028797018963952u64 - self.0[1],
            36028797018963952u64 - self.0[2],
            36028797018963952u64 - self.0[3],
            36028797018963952u64 - self.0[4],
        ])
    }
}

/// Convert eight bytes into a little-endian u64.
#[inline]
fn load8(input: &[u8]) -> u64 {
    (input[0] as u64)
        | ((input[1] as u64) << 8)
        | ((input[2] as u64) << 16)
        | ((input[3] as u64) << 24)
        | ((input[4] as u64) << 32)
        | ((input[5] as u64) << 40)
        | ((input[6] as u64) << 48)
        | ((input[7] as u64) << 56)
}

impl FieldElement {
    /// The additive identity.
    pub(crate) const ZERO: FieldElement = FieldElement::from_limbs([0, 0, 0, 0, 0]);

    /// The multiplicative identity.
    pub(crate) const ONE: FieldElement = FieldElement::from_limbs([1, 0, 0, 0, 0]);

    /// Construct a `FieldElement` directly from its radix-2^51 limbs.
    pub(crate) const fn from_limbs(limbs: [u64; 5]) -> FieldElement {
        FieldElement(limbs)
    }

    /// Given 64-bit limbs, carry to enforce the bound c_i < 2^52.
    #[inline(always)]
    fn reduce(mut limbs: [u64; 5]) -> FieldElement {
        limbs[1] += limbs[0] >> 51;
        limbs[0] &= LOW_51_BIT_MASK;
        limbs[2] += limbs[1] >> 51;
        limbs[1] &= LOW_51_BIT_MASK;
        limbs[3] += limbs[2] >> 51;
        limbs[2] &= LOW_51_BIT_MASK;
        limbs[4] += limbs[3] >> 51;
        limbs[3] &= LOW_51_BIT_MASK;
        limbs[0] += (limbs[4] >> 51) * 19;
        limbs[4] &= LOW_51_BIT_MASK;

        FieldElement(limbs)
    }

    /// Load a `FieldElement` from the low 255 bits of a 256-bit input.
    ///
    /// # Warning
    ///
    /// This function does not check that the input is a canonical
    /// representative.  It masks the high bit, but it will happily
    /// decode 2^255 - 18 to 1.
    pub(crate) fn from_bytes(bytes: &[u8; 32]) -> FieldElement {
        FieldElement([
            // load bits [  0, 64), no shift
            load8(&bytes[0..]) & LOW_51_BIT_MASK,
            // load bits [ 48,112), shift to [ 51,112)
            (load8(&bytes[6..]) >> 3) & LOW_51_BIT_MASK,
            // load bits [ 96,160), shift to [102,160)
            (load8(&bytes[12..]) >> 6) & LOW_51_BIT_MASK,
            // load bits [152,216), shift to [153,216)
            (load8(&bytes[19..]) >> 1) & LOW_51_BIT_MASK,
            // load bits [192,256), shift to [204,256)
            (load8(&bytes[24..]) >> 12) & LOW_51_BIT_MASK,
        ])
    }

    /// Serialize this `FieldElement` to its canonical 32-byte encoding.
    pub(crate) fn to_bytes(self) -> [u8; 32] {
        // This reduces to the range [0,2^255), but we need [0,2^255-19).
        let mut limbs = FieldElement::reduce(self.0).0;

        // Let h = limbs[0] + limbs[1]*2^51 + ... + limbs[4]*2^204.
        //
        // Write h = pq + r with 0 <= r < p.  Since h < 2^255, q is 0 or 1,
        // and h >= p <==> h + 19 >= 2^255, so q is the carry bit of h + 19.
        let mut q = (limbs[0] + 19) >> 51;
        q = (limbs[1] + q) >> 51;
        q = (limbs[2] + q) >> 51;
        q = (limbs[3] + q) >> 51;
        q = (limbs[4] + q) >> 51;

        // Now compute r = h - pq = h + 19q - 2^255q.
        limbs[0] += 19 * q;

        limbs[1] += limbs[0] >> 51;
        limbs[0] &= LOW_51_BIT_MASK;
        limbs[2] += limbs[1] >> 51;
        limbs[1] &= LOW_51_BIT_MASK;
        limbs[3] += limbs[2] >> 51;
        limbs[2] &= LOW_51_BIT_MASK;
        limbs[4] += limbs[3] >> 51;
        limbs[3] &= LOW_51_BIT_MASK;
        // Instead of carrying (limbs[4] >> 51) = 2^255q into another limb,
        // discard it, subtracting the value from h.
        limbs[4] &= LOW_51_BIT_MASK;

        let mut s = [0u8; 32];
        s[0] = limbs[0] as u8;
        s[1] = (limbs[0] >> 8) as u8;
        s[2] = (limbs[0] >> 16) as u8;
        s[3] = (limbs[0] >> 24) as u8;
        s[4] = (limbs[0] >> 32) as u8;
        s[5] = (limbs[0] >> 40) as u8;
        s[6] = ((limbs[0] >> 48) | (limbs[1] << 3)) as u8;
        s[7] = (limbs[1] >> 5) as u8;
        s[8] = (limbs[1] >> 13) as u8;
        s[9] = (limbs[1] >> 21) as u8;
        s[10] = (limbs[1] >> 29) as u8;
        s[11] = (limbs[1] >> 37) as u8;
        s[12] = ((limbs[1] >> 45) | (limbs[2] << 6)) as u8;
        s[13] = (limbs[2] >> 2) as u8;
        s[14] = (limbs[2] >> 10) as u8;
        s[15] = (limbs[2] >> 18) as u8;
        s[16] = (limbs[2] >> 26) as u8;
        s[17] = (limbs[2] >> 34) as u8;
        s[18] = (limbs[2] >> 42) as u8;
        s[19] = ((limbs[2] >> 50) | (limbs[3] << 1)) as u8;
        s[20] = (limbs[3] >> 7) as u8;
        s[21] = (limbs[3] >> 15) as u8;
        s[22] = (limbs[3] >> 23) as u8;
        s[23] = (limbs[3] >> 31) as u8;
        s[24] = (limbs[3] >> 39) as u8;
        s[25] = ((limbs[3] >> 47) | (limbs[4] << 4)) as u8;
        s[26] = (limbs[4] >> 4) as u8;
        s[27] = (limbs[4] >> 12) as u8;
        s[28] = (limbs[4] >> 20) as u8;
        s[29] = (limbs[4] >> 28) as u8;
        s[30] = (limbs[4] >> 36) as u8;
        s[31] = (limbs[4] >> 44) as u8;

        // High bit should be zero.
        debug_assert!((s[31] & 0b1000_0000u8) == 0u8);

        s
    }

    #[inline(always)]
    fn square_inner(&self) -> [u64; 5] {
        /// Multiply two 64-bit integers with 128 bits of output.
        #[inline(always)]
        fn m(x: u64, y: u64) -> u128 {
            (x as u128) * (y as u128)
        }

        let a: &[u64; 5] = &self.0;

        let a3_19 = 19 * a[3];
        let a4_19 = 19 * a[4];

        let c0: u128 = m(a[0], a[0]) + 2 * (m(a[1], a4_19) + m(a[2], a3_19));
        let mut c1: u128 = m(a[3], a3_19) + 2 * (m(a[0], a[1]) + m(a[2], a4_19));
        let mut c2: u128 = m(a[1], a[1]) + 2 * (m(a[0], a[2]) + m(a[4], a3_19));
        let mut c3: u128 = m(a[4], a4_19) + 2 * (m(a[0], a[3]) + m(a[1], a[2]));
        let mut c4: u128 = m(a[2], a[2]) + 2 * (m(a[0], a[4]) + m(a[1], a[3]));

        debug_assert!(a.iter().all(|&x| x < (1 << 54)));

        let mut c0: u64 = {
            c1 += (c0 >> 51) as u128;
            (c0 as u64) & LOW_51_BIT_MASK
        };
        let c1: u64 = {
            c2 += (c1 >> 51) as u128;
            (c1 as u64) & LOW_51_BIT_MASK
        };
        let c2: u64 = {
            c3 += (c2 >> 51) as u128;
            (c2 as u64) & LOW_51_BIT_MASK
        };
        let c3: u64 = {
            c4 += (c3 >> 51) as u128;
            (c3 as u64) & LOW_51_BIT_MASK
        };
        let c4: u64 = {
            c0 += ((c4 >> 51) as u64) * 19;
            (c4 as u64) & LOW_51_BIT_MASK
        };

        [c0, c1, c2, c3, c4]
    }

    /// Returns the square of this field element.
    pub(crate) fn square(&self) -> FieldElement {
        FieldElement::reduce(self.square_inner())
    }

    /// Returns 2 times the square of this field element.
    pub(crate) fn square2(&self) -> FieldElement {
        let mut limbs = self.square_inner();
        for limb in &mut limbs {
            *limb *= 2;
        }
        FieldElement::reduce(limbs)
    }

    /// Requires k > 0; raise self to the 2^k-th power.
    fn pow2k(&self, k: u32) -> FieldElement {
        debug_assert!(k > 0);
        let mut z = self.square();
        for _ in 1..k {
            z = z.square();
        }
        z
    }

    /// Compute (self^(2^250-1), self^11), used as a helper function
    /// within invert() and pow_p58().
    fn pow22501(&self) -> (FieldElement, FieldElement) {
        // Each temporary variable t_i is of the form (self)^e_i.
        // Squaring t_i corresponds to multiplying e_i by 2, so the pow2k
        // function shifts e_i left by k places.  Multiplying t_i and t_j
        // corresponds to adding e_i + e_j.
        //
        // Temporary t_i                      Nonzero bits of e_i
        let t0 = self.square(); //            1         e_0 = 2^1
        let t1 = t0.square().square(); //     3         e_1 = 2^3
        let t2 = self * &t1; //               3,0       e_2 = 2^3 + 2^0
        let t3 = &t0 * &t2; //                3,1,0
        let t4 = t3.square(); //              4,2,1
        let t5 = &t2 * &t4; //                4,3,2,1,0
        let t6 = t5.pow2k(5); //              9,8,7,6,5
        let t7 = &t6 * &t5; //                9,8,7,6,5,4,3,2,1,0
        let t8 = t7.pow2k(10); //             19..10
        let t9 = &t8 * &t7; //                19..0
        let t10 = t9.pow2k(20); //            39..20
        let t11 = &t10 * &t9; //              39..0
        let t12 = t11.pow2k(10); //           49..10
        let t13 = &t12 * &t7; //              49..0
        let t14 = t13.pow2k(50); //           99..50
        let t15 = &t14 * &t13; //             99..0
        let t16 = t15.pow2k(100); //          199..100
        let t17 = &t16 * &t15; //             199..0
        let t18 = t17.pow2k(50); //           249..50
        let t19 = &t18 * &t13; //             249..0

        (t19, t3)
    }

    /// Given a nonzero field element, compute its inverse.
    ///
    /// The inverse is computed as self^(p-2), since
    /// x^(p-2)x = x^(p-1) = 1 (mod p).  The inverse of zero is zero.
    pub(crate) fn invert(&self) -> FieldElement {
        // The bits of p-2 = 2^255 -19 -2 are 11010111111...11.
        //
        //                                nonzero bits of exponent
        let (t19, t3) = self.pow22501(); // t19: 249..0 ; t3: 3,1,0
        let t20 = t19.pow2k(5); //          254..5
        &t20 * &t3 //                       254..5,3,1,0
    }

    /// Raise this field element to the power (p-5)/8 = 2^252 - 3.
    fn pow_p58(&self) -> FieldElement {
        // The bits of (p-5)/8 are 101111.....11.
        //
        //                               nonzero bits of exponent
        let (t19, _) = self.pow22501(); // 249..0
        let t20 = t19.pow2k(2); //         251..2
        self * &t20 //                     251..2,0
    }

    /// Given `FieldElements` `u` and `v`, compute either `sqrt(u/v)` or
    /// `sqrt(i*u/v)` in constant time.
    ///
    /// This function always returns the nonnegative square root.
    ///
    /// # Return
    ///
    /// - `(Choice(1), +sqrt(u/v))  ` if `v` is nonzero and `u/v` is square;
    /// - `(Choice(1), zero)        ` if `u` is zero;
    /// - `(Choice(0), zero)        ` if `v` is zero and `u` is nonzero;
    /// - `(Choice(0), +sqrt(i*u/v))` if `u/v` is nonsquare (so `i*u/v` is square).
    pub(crate) fn sqrt_ratio_i(u: &FieldElement, v: &FieldElement) -> (Choice, FieldElement) {
        // Using the same trick as in ed25519 decoding, we merge the
        // inversion, the square root, and the square test as follows.
        //
        // To compute sqrt(α), we can compute β = α^((p+3)/8).
        // Then β^2 = ±α, so multiplying β by sqrt(-1) if necessary
        // gives sqrt(α).
        //
        // To compute 1/sqrt(α), we observe that
        //    1/β = α^(p-1-(p+3)/8) = α^((7p-11)/8)
        //                          = α^3 * (α^7)^((p-5)/8).
        //
        // We can therefore compute sqrt(u/v) = sqrt(u)/sqrt(v)
        // by first computing
        //    r = u^((p+3)/8) v^(p-1-(p+3)/8)
        //      = u u^((p-5)/8) v^3 (v^7)^((p-5)/8)
        //      = (uv^3) (uv^7)^((p-5)/8).
        //
        // If v is nonzero and u/v is square, then r^2 = ±u/v,
        //                                     so vr^2 = ±u.
        // If vr^2 =  u, then sqrt(u/v) = r.
        // If vr^2 = -u, then sqrt(u/v) = r*sqrt(-1).
        //
        // If v is zero, r is also zero.
        let v3 = &v.square() * v;
        let v7 = &v3.square() * v;
        let mut r = &(u * &v3) * &(u * &v7).pow_p58();
        let check = v * &r.square();

        let i = &SQRT_M1;

        let correct_sign_sqrt = check.ct_eq(u);
        let flipped_sign_sqrt = check.ct_eq(&(-u));
        let flipped_sign_sqrt_i = check.ct_eq(&(&(-u) * i));

        let r_prime = &SQRT_M1 * &r;
        r.conditional_assign(&r_prime, flipped_sign_sqrt | flipped_sign_sqrt_i);

        // Choose the nonnegative square root.
        let r_is_negative = r.is_negative();
        r.conditional_negate(r_is_negative);

        let was_nonzero_square = correct_sign_sqrt | flipped_sign_sqrt;

        (was_nonzero_square, r)
    }

    /// Determine if this `FieldElement` is negative, in the sense used in
    /// the ed25519 paper: `x` is negative if the low bit of its canonical
    /// encoding is set.
    pub(crate) fn is_negative(&self) -> Choice {
        let bytes = self.to_bytes();
        (bytes[0] & 1).into()
    }

    /// Determine if this `FieldElement` is zero.
    pub(crate) fn is_zero(&self) -> Choice {
        let zero = [0u8; 32];
        let bytes = self.to_bytes();
        bytes.ct_eq(&zero)
    }
}
