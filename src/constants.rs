// -*- mode: rust; -*-
//
// This file is part of ed25519-group.
// See LICENSE for licensing information.

//! Field constants used by the Elligator 2 maps, given as radix-2^51
//! limb literals.

use crate::field::FieldElement;

/// `= sqrt(-1)`, the nonnegative square root of minus one mod p.
pub(crate) const SQRT_M1: FieldElement = FieldElement::from_limbs([
    1718705420411056,
    234908883556509,
    2233514472574048,
    2117202627021982,
    765476049583133,
]);

/// `A` is the Montgomery curve parameter 486662.
pub(crate) const MONTGOMERY_A: FieldElement = FieldElement::from_limbs([486662, 0, 0, 0, 0]);

/// `-A`, the negation of the Montgomery curve parameter.
pub(crate) const MONTGOMERY_A_NEG: FieldElement = FieldElement::from_limbs([
    2251799813198567,
    2251799813685247,
    2251799813685247,
    2251799813685247,
    2251799813685247,
]);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn montgomery_a_neg_is_minus_a() {
        assert_eq!(&MONTGOMERY_A + &MONTGOMERY_A_NEG, FieldElement::ZERO);
    }

    #[test]
    fn sqrt_m1_squares_to_minus_one() {
        assert_eq!(SQRT_M1.square(), -&FieldElement::ONE);
    }
}
