// -*- mode: rust; -*-
//
// This file is part of ed25519-group.
// See LICENSE for licensing information.

//! Elligator 2 maps from field elements onto the prime-order subgroup.
//!
//! Two pipelines are provided: the map of RFC 9380 section 6.7.1
//! ([`from_hash`], fed by a 512-bit input), and the legacy map
//! ([`from_uniform`], fed by 255 bits plus a sign bit).  Both end with
//! multiplication by the cofactor, so their outputs always lie in the
//! prime-order subgroup.

use crate::constants::{MONTGOMERY_A, MONTGOMERY_A_NEG};
use crate::field::FieldElement;

use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

/// Determines which of the two candidate roots yields a point on the
/// curve, per the `gx1` square test of the map.
#[inline]
fn high_y(d: &FieldElement) -> Choice {
    let d_sq = &d.square();
    let au = &MONTGOMERY_A * d;

    let inner = &(d_sq + &au) + &FieldElement::ONE;
    let eps = d * &inner; /* eps = d^3 + Ad^2 + d */

    let (eps_is_sq, _) = FieldElement::sqrt_ratio_i(&eps, &FieldElement::ONE);

    eps_is_sq
}

/// The shared core of the Elligator 2 map: given `r`, produce the mapped
/// Montgomery point as fractions `(xMn, xMd, yMn, yMd)`.
fn map_to_curve_parts(
    r: &FieldElement,
) -> (FieldElement, FieldElement, FieldElement, FieldElement) {
    let zero = FieldElement::ZERO;
    let one = FieldElement::ONE;
    let minus_one = -&FieldElement::ONE;

    // Exceptional case 2u^2 == -1
    let mut tv1 = r.square2();
    tv1.conditional_assign(&zero, tv1.ct_eq(&minus_one));

    let d_1 = &one + &tv1; /* 1 + 2u^2 */
    let d = &MONTGOMERY_A_NEG * &(d_1.invert()); /* d = -A/(1+2u^2) */

    let inner = &(&d.square() + &(&d * &MONTGOMERY_A)) + &one;
    let gx1 = &d * &inner; /* gx1 = d^3 + Ad^2 + d */
    let gx2 = &gx1 * &tv1;

    let eps_is_sq = high_y(&d);

    // complete X
    /* A_temp = 0, or A if nonsquare*/
    let a_temp = FieldElement::conditional_select(&MONTGOMERY_A, &zero, eps_is_sq);
    let mut x = &d + &a_temp; /* d, or d+A if nonsquare */
    x.conditional_negate(!eps_is_sq); /* d, or -d-A if nonsquare */

    // complete Y
    let y2 = FieldElement::conditional_select(&gx2, &gx1, eps_is_sq);
    let (_, mut y) = FieldElement::sqrt_ratio_i(&y2, &one);
    y.conditional_negate(eps_is_sq ^ y.is_negative());

    (&x * &d_1, d_1, y, one)
}

/// Elligator 2 map onto the Montgomery curve, returning affine `(u, v)`.
pub(crate) fn map_fe_to_montgomery(r: &FieldElement) -> (FieldElement, FieldElement) {
    let (xmn, xmd, y, _) = map_to_curve_parts(r);
    (&xmn * &(xmd.invert()), y)
}

/// Elligator 2 map onto the Edwards curve, returning affine `(x, y)`,
/// per `map_to_curve_elligator2_edwards25519` of RFC 9380.
pub(crate) fn map_fe_to_edwards(r: &FieldElement) -> (FieldElement, FieldElement) {
    // 1.  (xMn, xMd, yMn, yMd) = map_to_curve_elligator2_curve25519(u)
    let (xmn, xmd, ymn, ymd) = map_to_curve_parts(r);
    // c1 = sqrt(-486664)
    // this cannot fail as it computes a constant
    let c1 = &(&MONTGOMERY_A_NEG - &FieldElement::ONE) - &FieldElement::ONE;
    let (_, c1) = FieldElement::sqrt_ratio_i(&c1, &FieldElement::ONE);

    // 2.  xn = xMn * yMd
    // 3.  xn = xn * c1
    let mut xn = &(&xmn * &ymd) * &c1;

    // 4.  xd = xMd * yMn    # xn / xd = c1 * xM / yM
    let mut xd = &xmd * &ymn;

    // 5.  yn = xMn - xMd
    let mut yn = &xmn - &xmd;
    // 6.  yd = xMn + xMd    # (n / d - 1) / (n / d + 1) = (n - d) / (n + d)
    let mut yd = &xmn + &xmd;

    // 7. tv1 = xd * yd
    // 8.   e = tv1 == 0
    let cond = (&xd * &yd).is_zero();

    // 9.  xn = CMOV(xn, 0, e)
    // 10. xd = CMOV(xd, 1, e)
    // 11. yn = CMOV(yn, 1, e)
    // 12. yd = CMOV(yd, 1, e)
    xn = FieldElement::conditional_select(&xn, &FieldElement::ZERO, cond);
    xd = FieldElement::conditional_select(&xd, &FieldElement::ONE, cond);
    yn = FieldElement::conditional_select(&yn, &FieldElement::ONE, cond);
    yd = FieldElement::conditional_select(&yd, &FieldElement::ONE, cond);

    // 13. return (xn, xd, yn, yd)
    (&xn * &(xd.invert()), &yn * &(yd.invert()))
}

/// Double an affine point of the Edwards curve.
///
/// For a point on -x^2 + y^2 = 1 + d x^2 y^2 we have
/// y^2 - x^2 = 1 + d x^2 y^2 and 2 - (y^2 - x^2) = 1 - d x^2 y^2, so both
/// doubling denominators are available without the curve constant, and
/// neither can vanish on a curve point.
fn double(x: &FieldElement, y: &FieldElement) -> (FieldElement, FieldElement) {
    let xx = x.square();
    let yy = y.square();
    let xy = x * y;

    let num_x = &xy + &xy;
    let den_x = &yy - &xx;
    let num_y = &yy + &xx;
    let two = &FieldElement::ONE + &FieldElement::ONE;
    let den_y = &two - &den_x;

    let inv = (&den_x * &den_y).invert();
    (&(&num_x * &den_y) * &inv, &(&num_y * &den_x) * &inv)
}

/// Clear the cofactor of an affine point by multiplying by 8.
fn mul_by_cofactor(x: &FieldElement, y: &FieldElement) -> (FieldElement, FieldElement) {
    let (x, y) = double(x, y);
    let (x, y) = double(&x, &y);
    double(&x, &y)
}

/// Compressed Edwards encoding of an affine point.
fn encode(x: &FieldElement, y: &FieldElement) -> [u8; 32] {
    let mut s = y.to_bytes();
    s[31] ^= x.is_negative().unwrap_u8() << 7;
    s
}

/// Reduce a 64-byte big-endian integer to a field element.
///
/// Writing the input as G * 2^256 + F with 256-bit halves, the high bits
/// spill as 2^255 = 19, 2^256 = 38 and 2^511 = 722 mod p.
pub(crate) fn reduce_wide(h: &[u8; 64]) -> FieldElement {
    let mut fl = [0u8; 32];
    let mut gl = [0u8; 32];
    for i in 0..32 {
        fl[i] = h[63 - i];
        gl[i] = h[31 - i];
    }

    let f_spills = Choice::from(fl[31] >> 7);
    let g_spills = Choice::from(gl[31] >> 7);

    // from_bytes masks bit 255 of each half; fold the masked bits and the
    // high half back in through the spill constants.
    let f = FieldElement::from_bytes(&fl);
    let g = FieldElement::from_bytes(&gl);

    let nineteen = FieldElement::from_limbs([19, 0, 0, 0, 0]);
    let thirty_eight = FieldElement::from_limbs([38, 0, 0, 0, 0]);
    let seven_twenty_two = FieldElement::from_limbs([722, 0, 0, 0, 0]);

    let f_hi = FieldElement::conditional_select(&FieldElement::ZERO, &nineteen, f_spills);
    let g_hi = FieldElement::conditional_select(&FieldElement::ZERO, &seven_twenty_two, g_spills);

    &(&f + &f_hi) + &(&(&thirty_eight * &g) + &g_hi)
}

/// Map a 512-bit hash output onto the prime-order subgroup, per the
/// RFC 9380 edwards25519 map followed by cofactor clearing.
pub(crate) fn from_hash(h: &[u8; 64]) -> [u8; 32] {
    let u = reduce_wide(h);
    let (x, y) = map_fe_to_edwards(&u);
    let (x, y) = mul_by_cofactor(&x, &y);
    encode(&x, &y)
}

/// Map 32 uniform bytes onto the prime-order subgroup with the legacy
/// Elligator 2 construction.
///
/// Bit 255 selects the sign of the Edwards x-coordinate; the remaining
/// bits feed the Montgomery map, and the result is carried to the
/// Edwards curve by the birational map before clearing the cofactor.
pub(crate) fn from_uniform(r: &[u8; 32]) -> [u8; 32] {
    let mut s = *r;
    let x_sign = Choice::from(s[31] >> 7);
    s[31] &= 0x7f;

    let r_fe = FieldElement::from_bytes(&s);
    let (u, v) = map_fe_to_montgomery(&r_fe);

    // c1 = sqrt(-486664), as in the Edwards map above.
    let c1 = &(&MONTGOMERY_A_NEG - &FieldElement::ONE) - &FieldElement::ONE;
    let (_, c1) = FieldElement::sqrt_ratio_i(&c1, &FieldElement::ONE);

    // x = c1 * u / v, y = (u - 1) / (u + 1).  The exceptional cases go
    // through invert(0) = 0 and land on small-order points, which the
    // cofactor clearing folds into the identity.
    let mut x = &(&c1 * &u) * &v.invert();
    let y = &(&u - &FieldElement::ONE) * &(&u + &FieldElement::ONE).invert();

    x.conditional_negate(x.is_negative() ^ x_sign);

    let (x, y) = mul_by_cofactor(&x, &y);
    encode(&x, &y)
}
