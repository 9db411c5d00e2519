// -*- mode: rust; -*-
//
// This file is part of ed25519-group.
// See LICENSE for licensing information.

#![no_std]
#![warn(missing_docs)]

//! Group and scalar operations for the Ed25519 prime-order group.
//!
//! Compressed Edwards points and scalars cross the API boundary as
//! fixed-size byte arrays; the operations live in the [`point`],
//! [`scalar`], and [`hash_to_curve`] modules.  Group arithmetic is
//! delegated to `curve25519-dalek`; the Elligator 2 maps are implemented
//! internally.

#[cfg(test)]
#[macro_use]
extern crate std;

//------------------------------------------------------------------------
// ed25519-group public modules
//------------------------------------------------------------------------

// Operations on compressed Edwards points
pub mod point;

// Scalar arithmetic mod l = 2^252 + ..., the order of the group
pub mod scalar;

// RFC 9380 hash-to-curve for edwards25519
pub mod hash_to_curve;

mod errors;

pub use crate::errors::GroupError;

//------------------------------------------------------------------------
// ed25519-group internal modules
//------------------------------------------------------------------------

// Finite field arithmetic mod p = 2^255 - 19
pub(crate) mod field;

// Field constants for the Elligator 2 maps
pub(crate) mod constants;

// Elligator 2 maps onto the curve
pub(crate) mod elligator2;

/// Length in bytes of a compressed point encoding.
pub const POINT_LENGTH: usize = 32;

/// Length in bytes of the uniform input to [`point::from_uniform`].
pub const UNIFORM_LENGTH: usize = 32;

/// Length in bytes of the wide hash input to [`point::from_hash`].
pub const HASH_LENGTH: usize = 64;

/// Length in bytes of a canonical scalar encoding.
pub const SCALAR_LENGTH: usize = 32;

/// Length in bytes of the unreduced input accepted by [`scalar::reduce`].
pub const UNREDUCED_SCALAR_LENGTH: usize = 64;
