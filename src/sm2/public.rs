// Copyright 2024 The gmsm developers.
//
// Permission to use, copy, modify, and/or distribute this software for any
// purpose with or without fee is hereby granted, provided that the above
// copyright notice and this permission notice appear in all copies.
//
// THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHORS DISCLAIM ALL WARRANTIES
// WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
// MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHORS BE LIABLE FOR ANY
// SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
// WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN ACTION
// OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF OR IN
// CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.

use crate::error::{GmError, Result};
use crate::sm2::affine::verify_jacobian_point_is_on_the_curve;
use crate::sm2::elem::FieldElem;
use crate::sm2::param::CurveCtx;
use num_bigint::BigUint;
use num_traits::One;

/// Length in bytes of one curve coordinate.
pub const BN_LENGTH: usize = 32;

/// Length in bytes of an encoded public key, `x || y`.
pub const PUBLIC_KEY_LEN: usize = 2 * BN_LENGTH;

/// A point on the curve in Jacobian coordinates `(x, y, z)`.
///
/// The point at infinity is represented with `z == 0`.
#[derive(Clone, Debug)]
pub struct Point(pub(crate) [BigUint; 3]);

impl Point {
    pub(crate) fn new(inner: [BigUint; 3]) -> Self {
        Point(inner)
    }

    pub(crate) fn point_x(&self) -> BigUint {
        self.0[0].clone()
    }

    pub(crate) fn point_y(&self) -> BigUint {
        self.0[1].clone()
    }

    pub(crate) fn point_z(&self) -> BigUint {
        self.0[2].clone()
    }

    pub(crate) fn to_bns(&self) -> &[BigUint; 3] {
        &self.0
    }
}

/// An SM2 public key, held as the uncompressed coordinates `x || y`.
///
/// A `PublicKey` built through [`PublicKey::from_bytes`] is known to lie
/// on the curve.
#[derive(Clone, Copy)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LEN],
}

impl PublicKey {
    /// Wraps coordinates that are already known to form a curve point.
    pub(crate) fn new(x: &[u8; BN_LENGTH], y: &[u8; BN_LENGTH]) -> Self {
        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        bytes[..BN_LENGTH].copy_from_slice(x);
        bytes[BN_LENGTH..].copy_from_slice(y);
        PublicKey { bytes }
    }

    /// Parses a 64-byte `x || y` encoding, checking that the point lies
    /// on the curve.
    pub fn from_bytes(bytes: &[u8], cctx: &CurveCtx) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_LEN {
            return Err(GmError::InvalidParameters("public key must be 64 bytes"));
        }
        let x = FieldElem::from_bytes(&bytes[..BN_LENGTH], cctx)?;
        let y = FieldElem::from_bytes(&bytes[BN_LENGTH..], cctx)?;

        let point = Point::new([x.inner, y.inner, BigUint::one()]);
        verify_jacobian_point_is_on_the_curve(&point, cctx)?;

        let mut out = [0u8; PUBLIC_KEY_LEN];
        out.copy_from_slice(bytes);
        Ok(PublicKey { bytes: out })
    }

    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.bytes
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.bytes
    }

    /// The key as a Jacobian point with `z = 1`.
    pub(crate) fn to_point(&self) -> Point {
        let x = BigUint::from_bytes_be(&self.bytes[..BN_LENGTH]);
        let y = BigUint::from_bytes_be(&self.bytes[BN_LENGTH..]);
        Point::new([x, y, BigUint::one()])
    }
}

impl core::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sm2::affine::big_endian_affine_from_jacobian;

    #[test]
    fn generator_round_trips_through_bytes() {
        let cctx = CurveCtx::sm2p256_new();
        let g = Point::new(cctx.g_point.clone());
        let (x, y) = big_endian_affine_from_jacobian(&g, &cctx).unwrap();
        let pk = PublicKey::new(&x, &y);

        let parsed = PublicKey::from_bytes(pk.as_bytes(), &cctx).unwrap();
        assert_eq!(parsed.to_bytes(), pk.to_bytes());
    }

    #[test]
    fn rejects_wrong_length() {
        let cctx = CurveCtx::sm2p256_new();
        assert_eq!(
            PublicKey::from_bytes(&[0u8; 65], &cctx).unwrap_err(),
            GmError::InvalidParameters("public key must be 64 bytes")
        );
    }

    #[test]
    fn rejects_point_off_the_curve() {
        let cctx = CurveCtx::sm2p256_new();
        let g = Point::new(cctx.g_point.clone());
        let (x, mut y) = big_endian_affine_from_jacobian(&g, &cctx).unwrap();
        y[31] ^= 1;

        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        bytes[..BN_LENGTH].copy_from_slice(&x);
        bytes[BN_LENGTH..].copy_from_slice(&y);
        assert_eq!(
            PublicKey::from_bytes(&bytes, &cctx).unwrap_err(),
            GmError::InvalidPoint
        );
    }
}
