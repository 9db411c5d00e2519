// -*- mode: rust; -*-
//
// This file is part of ed25519-group.
// See LICENSE for licensing information.

//! RFC 9380 hash-to-curve for edwards25519, with SHA-512
//! `expand_message_xmd` expansion.
//!
//! The effective domain-separation tag is `ctx || suite_name`, so a
//! caller-chosen context of `"QUUX-V01-CS02-with-"` reproduces the
//! standardized test vectors of the RFC.

use sha2::{Digest, Sha512};

use crate::elligator2;
use crate::errors::GroupError;
use crate::point;

/// Suite name for the nonuniform encoding.
const SUITE_NU: &[u8] = b"edwards25519_XMD:SHA-512_ELL2_NU_";

/// Suite name for the random-oracle encoding.
const SUITE_RO: &[u8] = b"edwards25519_XMD:SHA-512_ELL2_RO_";

/// Bytes drawn per field element (L in RFC 9380 section 5, for
/// edwards25519: ceil((255 + 128) / 8)).
const FIELD_DRAW_BYTES: usize = 48;

/// Maximum number of draws the intermediate output stream holds: two
/// 64-byte SHA-512 blocks cover the one- and two-element suites.
const MAX_DRAWS: usize = 2;

/// `expand_message_xmd` over SHA-512, drawing `out.len()` field elements
/// of `FIELD_DRAW_BYTES` bytes each, left-padded into 64-byte buffers
/// for the wide reduction.
///
/// The DST is `ctx || suite`, length-suffixed per the RFC.  Requests
/// for more than `MAX_DRAWS` draws return
/// `GroupError::ExpansionTooLong`.
fn expand_message_xmd(
    out: &mut [[u8; 64]],
    suite: &[u8],
    ctx: &[u8],
    msg: &[u8],
) -> Result<(), GroupError> {
    let count = out.len();
    if count == 0 || count > MAX_DRAWS {
        return Err(GroupError::ExpansionTooLong);
    }

    if ctx.len() > 255 - suite.len() {
        return Err(GroupError::ContextTooLong);
    }
    let dst_len = (suite.len() + ctx.len()) as u8;
    let len_in_bytes = (count * FIELD_DRAW_BYTES) as u16;

    // b_0 = H(Z_pad || msg || l_i_b_str || 0x00 || DST_prime)
    let mut h = Sha512::new();
    h.update([0u8; 128]); // Z_pad: one SHA-512 input block of zeros
    h.update(msg);
    h.update(len_in_bytes.to_be_bytes());
    h.update([0u8]);
    h.update(ctx);
    h.update(suite);
    h.update([dst_len]);
    let b_0: [u8; 64] = h.finalize().into();

    // b_i = H(strxor(b_0, b_(i-1)) || i || DST_prime), with b_0 as the
    // initial xor operand.
    let mut stream = [0u8; 128];
    let mut prev = [0u8; 64];
    for i in 0..count {
        let mut block = [0u8; 64];
        for (j, b) in block.iter_mut().enumerate() {
            *b = b_0[j] ^ prev[j];
        }
        let mut h = Sha512::new();
        h.update(block);
        h.update([(i + 1) as u8]);
        h.update(ctx);
        h.update(suite);
        h.update([dst_len]);
        prev = h.finalize().into();
        stream[i * 64..(i + 1) * 64].copy_from_slice(&prev);
    }

    // Each draw is a 48-byte big-endian chunk, left-padded to the
    // 64-byte buffer the wide reduction expects.
    for (j, draw) in out.iter_mut().enumerate() {
        *draw = [0u8; 64];
        draw[16..].copy_from_slice(&stream[j * FIELD_DRAW_BYTES..(j + 1) * FIELD_DRAW_BYTES]);
    }

    Ok(())
}

/// Hashes `msg` onto the prime-order subgroup with the
/// `edwards25519_XMD:SHA-512_ELL2_NU_` suite (nonuniform encoding).
///
/// `ctx` is the caller's domain-separation context; together with the
/// suite name it must fit the RFC's 255-byte DST budget, otherwise
/// `GroupError::ContextTooLong` is returned.
pub fn from_string(ctx: &[u8], msg: &[u8]) -> Result<[u8; 32], GroupError> {
    let mut draws = [[0u8; 64]; 1];
    expand_message_xmd(&mut draws, SUITE_NU, ctx, msg)?;
    Ok(elligator2::from_hash(&draws[0]))
}

/// Hashes `msg` onto the prime-order subgroup with the
/// `edwards25519_XMD:SHA-512_ELL2_RO_` suite (random-oracle encoding).
///
/// Two independent field draws are mapped and summed, making the output
/// indifferentiable from a random oracle onto the subgroup.
pub fn from_string_ro(ctx: &[u8], msg: &[u8]) -> Result<[u8; 32], GroupError> {
    let mut draws = [[0u8; 64]; 2];
    expand_message_xmd(&mut draws, SUITE_RO, ctx, msg)?;
    let p0 = elligator2::from_hash(&draws[0]);
    let p1 = elligator2::from_hash(&draws[1]);
    point::add(&p0, &p1)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::string::String;
    use std::vec::Vec;

    /// The context that makes the effective DST match the RFC 9380
    /// QUUX vectors.
    const QUUX_CTX: &[u8] = b"QUUX-V01-CS02-with-";

    fn rfc_messages() -> Vec<Vec<u8>> {
        let mut q128 = String::from("q128_");
        for _ in 0..128 {
            q128.push('q');
        }
        let mut a512 = String::from("a512_");
        for _ in 0..512 {
            a512.push('a');
        }
        vec![
            Vec::from(&b""[..]),
            Vec::from(&b"abc"[..]),
            Vec::from(&b"abcdef0123456789"[..]),
            q128.into_bytes(),
            a512.into_bytes(),
        ]
    }

    // P outputs for the RFC 9380 J.5.2 (NU) test vectors, as compressed
    // Edwards encodings.
    const NU_VECTORS: [&str; 5] = [
        "9b0f7f682dabce2190b14e21a175f39eb6a6b29fff2a9f5e72d5a4044d312e22",
        "42fa27c8f5a1ae0aa38bb59d5938e5145622ba5dedd11d11736fa2f9502d7367",
        "fb861a8e0a5a954a5c6836d379f1b07775134a6adaca0939e7dd1add246c8aaf",
        "5034607af591cadcb883b05846079a27c2b46c29f474078b12baebf56efff6aa",
        "371a8945427accbf317cc92c1607d3cd62325fb34134d391f28fb19ed3c390ac",
    ];

    // P outputs for the RFC 9380 J.5.1 (RO) test vectors.
    const RO_VECTORS: [&str; 5] = [
        "21dc15e10253796df23a7699c8a383ea624cce88c52431f6be220b1a56c8a609",
        "31558a26887f23fb8218f143e69d5f0af2e7831130bd5b432ef23883b895839a",
        "a661c58eea707f2171dd1a8a641e41758ac842cfd31e64dabc7f0e143d0a0653",
        "f7d2895eea2ef7b737ed56594f99e238a1eeb0dd672f98d239fafc55e315ca2e",
        "95f9d827f3c0f8076af227f01fef51d0cc924fb1806a237fc2c566f204fcc26d",
    ];

    #[test]
    fn from_string_matches_rfc9380_nu_vectors() {
        for (i, msg) in rfc_messages().iter().enumerate() {
            let p = from_string(QUUX_CTX, msg).unwrap();
            assert_eq!(hex::encode(p), NU_VECTORS[i], "({i}) NU mismatch");
            assert!(crate::point::is_valid(&p));
        }
    }

    #[test]
    fn from_string_ro_matches_rfc9380_ro_vectors() {
        for (i, msg) in rfc_messages().iter().enumerate() {
            let p = from_string_ro(QUUX_CTX, msg).unwrap();
            assert_eq!(hex::encode(p), RO_VECTORS[i], "({i}) RO mismatch");
            assert!(crate::point::is_valid(&p));
        }
    }

    #[test]
    fn ro_is_the_sum_of_its_mapped_draws() {
        let mut draws = [[0u8; 64]; 2];
        expand_message_xmd(&mut draws, SUITE_RO, QUUX_CTX, b"abc").unwrap();
        let p0 = elligator2::from_hash(&draws[0]);
        let p1 = elligator2::from_hash(&draws[1]);
        let sum = point::add(&p0, &p1).unwrap();
        assert_eq!(sum, from_string_ro(QUUX_CTX, b"abc").unwrap());
    }

    #[test]
    fn hashing_is_deterministic_and_domain_separated() {
        let p = from_string(b"ctx-one", b"message").unwrap();
        assert_eq!(p, from_string(b"ctx-one", b"message").unwrap());
        assert_ne!(p, from_string(b"ctx-two", b"message").unwrap());
        assert_ne!(p, from_string(b"ctx-one", b"other message").unwrap());
        assert_ne!(p, from_string_ro(b"ctx-one", b"message").unwrap());
    }

    #[test]
    fn context_budget_is_255_bytes_including_suite() {
        let max_ctx = [b'x'; 255 - 33]; // suite names are 33 bytes
        assert!(from_string(&max_ctx, b"msg").is_ok());
        assert!(from_string_ro(&max_ctx, b"msg").is_ok());

        let too_long = [b'x'; 255 - 33 + 1];
        assert_eq!(
            from_string(&too_long, b"msg").unwrap_err(),
            GroupError::ContextTooLong
        );
        assert_eq!(
            from_string_ro(&too_long, b"msg").unwrap_err(),
            GroupError::ContextTooLong
        );
    }

    #[test]
    fn expand_rejects_unsupported_draw_counts() {
        let mut too_many = [[0u8; 64]; 3];
        assert_eq!(
            expand_message_xmd(&mut too_many, SUITE_RO, QUUX_CTX, b"msg").unwrap_err(),
            GroupError::ExpansionTooLong
        );

        let mut none: [[u8; 64]; 0] = [];
        assert_eq!(
            expand_message_xmd(&mut none, SUITE_NU, QUUX_CTX, b"msg").unwrap_err(),
            GroupError::ExpansionTooLong
        );
    }
}
