// -*- mode: rust; -*-
//
// This file is part of ed25519-group.
// See LICENSE for licensing information.

//! Errors which may occur while operating on group elements and scalars.

use core::fmt;
use core::fmt::Display;

/// Errors which may occur while operating on group elements and scalars.
///
/// This error may arise due to:
///
/// * Being given a byte string which does not decode to a point on the
///   curve.
///
/// * A hash-to-curve context whose length, together with the suite name,
///   exceeds the 255-byte domain-separation budget.
///
/// * A hash expansion request for more output than the construction
///   supports.
///
/// * Asking for the multiplicative inverse of zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum GroupError {
    /// The byte string does not decode to a point on the curve.
    PointDecompression,
    /// The context and suite name exceed 255 bytes of domain separation.
    ContextTooLong,
    /// The requested hash expansion exceeds the supported output length.
    ExpansionTooLong,
    /// Zero has no multiplicative inverse modulo the group order.
    NoInverse,
}

impl Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            GroupError::PointDecompression => write!(f, "Cannot decompress Edwards point"),
            GroupError::ContextTooLong => {
                write!(f, "Domain separation tag cannot exceed 255 bytes")
            }
            GroupError::ExpansionTooLong => {
                write!(f, "Hash expansion exceeds the supported output length")
            }
            GroupError::NoInverse => write!(f, "Zero has no inverse modulo the group order"),
        }
    }
}

impl core::error::Error for GroupError {}
