// -*- mode: rust; -*-
//
// This file is part of ed25519-group.
// See LICENSE for licensing information.

//! Operations on compressed Edwards points.
//!
//! Points cross this API as 32-byte compressed encodings.  Arithmetic
//! operands need only decode to points on the curve; only [`is_valid`]
//! additionally demands a canonical encoding and membership in the
//! prime-order subgroup.

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use rand_core::{CryptoRng, RngCore};

use crate::elligator2;
use crate::errors::GroupError;

/// Decode an arithmetic operand, rejecting strings that do not decode
/// to a point on the curve.
fn decompress(bytes: &[u8; 32]) -> Result<EdwardsPoint, GroupError> {
    CompressedEdwardsY(*bytes)
        .decompress()
        .ok_or(GroupError::PointDecompression)
}

/// Checks that `bytes` is the canonical encoding of a point of the
/// prime-order subgroup.
///
/// Returns `false` for off-curve strings, non-canonical encodings,
/// small-order points (including the identity), and on-curve points with
/// a torsion component.
pub fn is_valid(bytes: &[u8; 32]) -> bool {
    let compressed = CompressedEdwardsY(*bytes);
    let point = match compressed.decompress() {
        Some(p) => p,
        None => return false,
    };
    // Canonicity: the encoding must round-trip.
    if point.compress() != compressed {
        return false;
    }
    if point.is_small_order() {
        return false;
    }
    point.is_torsion_free()
}

/// Adds two compressed points.
///
/// The operands must decode to points on the curve; they are not
/// required to be canonically encoded or to lie in the prime-order
/// subgroup.
pub fn add(p: &[u8; 32], q: &[u8; 32]) -> Result<[u8; 32], GroupError> {
    let (p, q) = (decompress(p)?, decompress(q)?);
    Ok((p + q).compress().to_bytes())
}

/// Subtracts a compressed point from another.
pub fn sub(p: &[u8; 32], q: &[u8; 32]) -> Result<[u8; 32], GroupError> {
    let (p, q) = (decompress(p)?, decompress(q)?);
    Ok((p - q).compress().to_bytes())
}

/// Maps 32 uniform bytes onto the prime-order subgroup with the legacy
/// Elligator 2 construction.
///
/// This is a total function: every input yields a valid point, and the
/// all-zero input yields the identity.
pub fn from_uniform(r: &[u8; 32]) -> [u8; 32] {
    elligator2::from_uniform(r)
}

/// Maps a 512-bit hash output onto the prime-order subgroup, using the
/// RFC 9380 edwards25519 Elligator 2 map on the input reduced mod p
/// (big-endian), followed by cofactor clearing.
pub fn from_hash(h: &[u8; 64]) -> [u8; 32] {
    elligator2::from_hash(h)
}

/// Returns a uniformly distributed point of the prime-order subgroup,
/// built by running 32 bytes from `rng` through [`from_uniform`].
pub fn random<R>(rng: &mut R) -> [u8; 32]
where
    R: RngCore + CryptoRng,
{
    let mut seed = [0u8; 32];
    rng.fill_bytes(&mut seed);
    from_uniform(&seed)
}
