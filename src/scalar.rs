// -*- mode: rust; -*-
//
// This file is part of ed25519-group.
// See LICENSE for licensing information.

//! Scalar arithmetic modulo the group order
//! l = 2^252 + 27742317777372353535851937790883648493.
//!
//! Scalars cross this API as 32-byte little-endian encodings.  Inputs
//! need not be canonical (they are reduced mod l first); outputs always
//! are.  The arithmetic itself is delegated to `curve25519-dalek`'s
//! `Scalar`; this module supplies the widening, wiping, and rejection
//! sampling around it.

use curve25519_dalek::scalar::Scalar;
use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::errors::GroupError;

/// Copy a 32-byte encoding into the low half of a zeroed 64-byte buffer,
/// so that arbitrary (non-canonical) inputs can go through the wide
/// reduction.
#[inline]
fn widen(s: &[u8; 32]) -> [u8; 64] {
    let mut wide = [0u8; 64];
    wide[..32].copy_from_slice(s);
    wide
}

/// Reduce an arbitrary 32-byte encoding mod l.
#[inline]
fn reduce_from(s: &[u8; 32]) -> Scalar {
    let mut wide = widen(s);
    let reduced = Scalar::from_bytes_mod_order_wide(&wide);
    wide.zeroize();
    reduced
}

/// Returns a uniformly distributed nonzero scalar in [1, l).
///
/// Candidates are drawn from `rng` with the top three bits cleared and
/// rejected until one is canonical and nonzero; each draw succeeds with
/// probability about one half.
pub fn random<R>(rng: &mut R) -> [u8; 32]
where
    R: RngCore + CryptoRng,
{
    let mut candidate = [0u8; 32];
    loop {
        rng.fill_bytes(&mut candidate);
        candidate[31] &= 0x1f;

        let in_range = Scalar::from_canonical_bytes(candidate).is_some();
        let nonzero = !candidate.ct_eq(&[0u8; 32]);
        if bool::from(in_range & nonzero) {
            return candidate;
        }
    }
}

/// Reduces a 512-bit little-endian integer mod l.
pub fn reduce(s: &[u8; 64]) -> [u8; 32] {
    let mut wide = *s;
    let reduced = Scalar::from_bytes_mod_order_wide(&wide).to_bytes();
    wide.zeroize();
    reduced
}

/// Computes `x + y (mod l)`.
pub fn add(x: &[u8; 32], y: &[u8; 32]) -> [u8; 32] {
    (reduce_from(x) + reduce_from(y)).to_bytes()
}

/// Computes `x - y (mod l)`, as the addition of `x` and `negate(y)`.
pub fn sub(x: &[u8; 32], y: &[u8; 32]) -> [u8; 32] {
    add(x, &negate(y))
}

/// Computes `x * y (mod l)`.
pub fn mul(x: &[u8; 32], y: &[u8; 32]) -> [u8; 32] {
    (reduce_from(x) * reduce_from(y)).to_bytes()
}

/// Computes `-s (mod l)`, so that `add(s, negate(s)) == 0`.
pub fn negate(s: &[u8; 32]) -> [u8; 32] {
    (-reduce_from(s)).to_bytes()
}

/// Computes `1 - s (mod l)`, so that `add(complement(s), s) == 1`.
pub fn complement(s: &[u8; 32]) -> [u8; 32] {
    (Scalar::ONE - reduce_from(s)).to_bytes()
}

/// Computes the multiplicative inverse of `s` mod l.
///
/// Returns `GroupError::NoInverse` when `s` is congruent to zero, the
/// one residue without an inverse.
pub fn invert(s: &[u8; 32]) -> Result<[u8; 32], GroupError> {
    let scalar = reduce_from(s);
    if bool::from(scalar.ct_eq(&Scalar::ZERO)) {
        return Err(GroupError::NoInverse);
    }
    Ok(scalar.invert().to_bytes())
}

#[cfg(test)]
mod test {
    use super::*;
    use hex::FromHex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::vec::Vec;

    /// Little-endian encoding of the group order l.
    const L_BYTES: &str = "edd3f55c1a631258d69cf7a2def9de1400000000000000000000000000000010";

    const A: &str = "4514a4345ac3ad4f45a7afc3a06aa0abd594c9eb1e86ce9a2ec3d1ed45a2d707";
    const B: &str = "ff01e4ae97ba211233a9a362c5128e656a23c822d71e6f1d57a078caf85e7009";
    const A_PLUS_B: &str = "57429286d71abd09a2b35b8387834ffc3fb8910ef6a43db885634ab83e014801";
    const A_MINUS_B: &str = "33e6b5e2dc6b9e95e89a0304ba51f15a6b7101c947675f7dd72259234d43670e";
    const A_TIMES_B: &str = "75500542adde78ef09a323e7b3a2b24cb439dc0088d16760271d49005ef92a06";
    const A_INV: &str = "a7019c5488fdddf617e2593d414a67d7fd6c1c37259a0012e5501e70b03ce609";
    const A_NEG: &str = "a8bf5128c09f640891f547df3d8f3e692a6b3614e1793165d13c2e12ba5d2808";
    const A_COMP: &str = "a9bf5128c09f640891f547df3d8f3e692a6b3614e1793165d13c2e12ba5d2808";

    fn sc(s: &str) -> [u8; 32] {
        <[u8; 32]>::from_hex(s).expect("failed to unhex")
    }

    fn one() -> [u8; 32] {
        let mut one = [0u8; 32];
        one[0] = 1;
        one
    }

    #[test]
    fn add_vector_and_commutativity() {
        let (a, b) = (sc(A), sc(B));
        assert_eq!(add(&a, &b), sc(A_PLUS_B));
        assert_eq!(add(&b, &a), sc(A_PLUS_B));
    }

    #[test]
    fn sub_vector_and_round_trip() {
        let (a, b) = (sc(A), sc(B));
        assert_eq!(sub(&a, &b), sc(A_MINUS_B));
        assert_eq!(add(&sub(&a, &b), &b), a);
        assert_eq!(sub(&add(&a, &b), &b), a);
    }

    #[test]
    fn mul_vector_and_commutativity() {
        let (a, b) = (sc(A), sc(B));
        assert_eq!(mul(&a, &b), sc(A_TIMES_B));
        assert_eq!(mul(&b, &a), sc(A_TIMES_B));
    }

    #[test]
    fn negate_vector_and_identities() {
        let a = sc(A);
        assert_eq!(negate(&a), sc(A_NEG));
        assert_eq!(add(&a, &negate(&a)), [0u8; 32]);
        assert_eq!(negate(&negate(&a)), a);
        assert_eq!(negate(&[0u8; 32]), [0u8; 32]);
    }

    #[test]
    fn complement_vector_and_identity() {
        let a = sc(A);
        assert_eq!(complement(&a), sc(A_COMP));
        assert_eq!(add(&complement(&a), &a), one());
        assert_eq!(complement(&[0u8; 32]), one());
    }

    #[test]
    fn invert_vector_and_identity() {
        let a = sc(A);
        let a_inv = invert(&a).unwrap();
        assert_eq!(a_inv, sc(A_INV));
        assert_eq!(mul(&a, &a_inv), one());
    }

    #[test]
    fn invert_rejects_zero_residues() {
        assert_eq!(invert(&[0u8; 32]).unwrap_err(), GroupError::NoInverse);
        // l itself is a non-canonical encoding of zero.
        assert_eq!(invert(&sc(L_BYTES)).unwrap_err(), GroupError::NoInverse);
    }

    #[test]
    fn non_canonical_inputs_are_reduced() {
        // l is congruent to zero, so it acts as the additive identity.
        let l = sc(L_BYTES);
        assert_eq!(add(&l, &one()), one());
        assert_eq!(mul(&l, &sc(A)), [0u8; 32]);
        assert_eq!(negate(&l), [0u8; 32]);
    }

    #[test]
    fn reduce_wide_vector() {
        let wide = <[u8; 64]>::from_hex(
            "0b3329b175e89a6740b81bfb511f84bff24cf8f1230e3a02878affeddd081763\
             a267c7ee78f655c1272c332a62287c5b373ce685ea7eeb7dccf9c17f648aabce",
        )
        .expect("failed to unhex");
        assert_eq!(
            hex::encode(reduce(&wide)),
            "ab2d8555b80c21a05fdfe21d756708de4306d67c64ca7c6a8882420b785c5d0a",
        );
    }

    #[test]
    fn reduce_of_l_is_zero() {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(&sc(L_BYTES));
        assert_eq!(reduce(&wide), [0u8; 32]);
    }

    #[test]
    fn random_scalars_are_canonical_and_nonzero() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..64 {
            let s = random(&mut rng);
            assert_ne!(s, [0u8; 32]);
            assert_eq!(s[31] & 0xe0, 0);
            // Canonical: inverting and multiplying back round-trips.
            let s_inv = invert(&s).unwrap();
            assert_eq!(mul(&s, &s_inv), one());
        }
    }

    /// An RNG that replays a fixed script of 32-byte draws.
    struct ScriptedRng {
        draws: Vec<[u8; 32]>,
        next: usize,
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            unreachable!()
        }
        fn next_u64(&mut self) -> u64 {
            unreachable!()
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.copy_from_slice(&self.draws[self.next]);
            self.next += 1;
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for ScriptedRng {}

    #[test]
    fn random_rejects_out_of_range_and_zero_draws() {
        // First draw reduces to 2^253 - 1 after masking (>= l, rejected),
        // second is zero (rejected), third is canonical and returned.
        let rng = &mut ScriptedRng {
            draws: vec![[0xff; 32], [0u8; 32], sc(A)],
            next: 0,
        };
        assert_eq!(random(rng), sc(A));
        assert_eq!(rng.next, 3);
    }
}
