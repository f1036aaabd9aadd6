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
use crate::rand::SecureRandom;
use crate::sm2::affine::{affine_from_jacobian, big_endian_affine_from_jacobian};
use crate::sm2::curve::{
    bn_point_mul, bn_scalar_add_mod, bn_scalar_mod, bn_scalar_mul_mod, bn_scalar_sub_mod,
    bn_scalar_to_inv,
};
use crate::sm2::param::CurveCtx;
use crate::sm2::private::create_private_key;
use crate::sm2::public::{Point, PublicKey, BN_LENGTH};
use crate::sm2::verification::Signature;
use crate::sm3::Sm3;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use zeroize::Zeroizing;

const SIGN_RETRY_LIMIT: usize = 100;

/// An SM2 signing key together with its public half.
pub struct KeyPair {
    d: Zeroizing<[u8; BN_LENGTH]>,
    pk: PublicKey,
}

impl KeyPair {
    /// Creates a key pair from a fresh random scalar.
    pub fn generate(rng: &mut dyn SecureRandom, cctx: &CurveCtx) -> Result<Self> {
        let d = create_private_key(rng, cctx)?;
        let pk = public_from_private(&BigUint::from_bytes_be(d.as_ref()), cctx)?;
        Ok(KeyPair { d, pk })
    }

    /// Imports a big-endian private scalar, which must lie in [1, n-1].
    pub fn new(private_key: &[u8; BN_LENGTH], cctx: &CurveCtx) -> Result<Self> {
        let d = BigUint::from_bytes_be(private_key);
        if d.is_zero() || d >= cctx.n {
            return Err(GmError::InvalidParameters(
                "private key must lie in [1, n-1]",
            ));
        }
        let pk = public_from_private(&d, cctx)?;
        Ok(KeyPair {
            d: Zeroizing::new(*private_key),
            pk,
        })
    }

    pub fn public_key(&self) -> PublicKey {
        self.pk
    }

    /// Hashes the message with SM3 and signs the digest.
    pub fn sign(
        &self,
        rng: &mut dyn SecureRandom,
        message: &[u8],
        cctx: &CurveCtx,
    ) -> Result<Signature> {
        let digest = Sm3::digest(message);
        self.sign_digest(rng, &digest, cctx)
    }

    /// Signs a precomputed 32-byte digest.
    pub fn sign_digest(
        &self,
        rng: &mut dyn SecureRandom,
        digest: &[u8; 32],
        cctx: &CurveCtx,
    ) -> Result<Signature> {
        let d = BigUint::from_bytes_be(self.d.as_ref());
        let e = bn_scalar_mod(&BigUint::from_bytes_be(digest), cctx);

        // d = n - 1 makes  1 + d == 0 (mod n): no nonce can produce a
        // nonzero s, so fail up front instead of inverting zero.
        let one_plus_d = bn_scalar_add_mod(&d, &BigUint::one(), cctx);
        if one_plus_d.is_zero() {
            tracing::debug!(target: "gmsm::sm2", "private key has no usable signing inverse");
            return Err(GmError::SigningFailed);
        }
        let left = bn_scalar_to_inv(&one_plus_d, cctx);

        for _ in 0..SIGN_RETRY_LIMIT {
            let k_bytes = create_private_key(rng, cctx)?;
            let k = BigUint::from_bytes_be(k_bytes.as_ref());

            let kg = Point::new(bn_point_mul(&cctx.g_point, &k, cctx));
            let x1 = {
                let (x, _) = affine_from_jacobian(&kg, cctx)?;
                x.inner
            };

            let r = bn_scalar_add_mod(&e, &bn_scalar_mod(&x1, cctx), cctx);
            if r.is_zero() || &r + &k == cctx.n {
                continue;
            }

            let dr = bn_scalar_mul_mod(&d, &r, cctx);
            let right = bn_scalar_sub_mod(&k, &dr, cctx);
            let s = bn_scalar_mul_mod(&left, &right, cctx);
            if s.is_zero() {
                continue;
            }

            return Ok(Signature::from_scalars(r, s));
        }
        tracing::debug!(target: "gmsm::sm2", "no valid nonce after retries");
        Err(GmError::SigningFailed)
    }
}

/// d*G in big-endian affine form.
pub(crate) fn public_from_private(private_key: &BigUint, cctx: &CurveCtx) -> Result<PublicKey> {
    let pk_point = Point::new(bn_point_mul(&cctx.g_point, private_key, cctx));

    let (x, y) = big_endian_affine_from_jacobian(&pk_point, cctx)?;

    Ok(PublicKey::new(&x, &y))
}
