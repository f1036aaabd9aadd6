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
use crate::sm2::curve::{
    bn_add_mod, bn_mul_mod, bn_point_add, bn_point_mul, bn_scalar_mod, bn_to_inv,
};
use crate::sm2::param::CurveCtx;
use crate::sm2::public::{Point, PublicKey, BN_LENGTH};
use core::marker::PhantomData;
use num_bigint::BigUint;
use num_traits::Zero;

// Marker for values reduced modulo the field prime p.
#[derive(Copy, Clone, Debug)]
pub enum P {}

// Marker for values reduced modulo the group order n.
#[derive(Copy, Clone, Debug)]
pub enum N {}

/// Elements are always fully reduced with respect to their modulus *m*;
/// i.e. 0 <= x < m for every value x. The marker keeps coordinates (mod p)
/// and scalars (mod n) from being mixed.
#[derive(Clone, Debug)]
pub struct Elem<M> {
    pub(crate) inner: BigUint,
    m: PhantomData<M>,
}

pub type FieldElem = Elem<P>;
pub type Scalar = Elem<N>;

impl<M> Elem<M> {
    pub(crate) fn from_inner(inner: BigUint) -> Self {
        Self {
            inner,
            m: PhantomData,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }

    pub fn is_equal(&self, other: &Elem<M>) -> bool {
        self.inner == other.inner
    }

    /// Fixed-width big-endian encoding, left-padded with zeros.
    pub fn bytes_less_safe(&self) -> [u8; BN_LENGTH] {
        let bz = self.inner.to_bytes_be();
        let mut r = [0; BN_LENGTH];
        r[BN_LENGTH - bz.len()..].copy_from_slice(&bz);
        r
    }
}

impl FieldElem {
    /// Parses a 32-byte big-endian coordinate; values >= p are rejected.
    pub fn from_bytes(bytes: &[u8], cctx: &CurveCtx) -> Result<Self> {
        if bytes.len() != BN_LENGTH {
            return Err(GmError::InvalidParameters("coordinate must be 32 bytes"));
        }
        let inner = BigUint::from_bytes_be(bytes);
        if inner >= cctx.p {
            tracing::debug!(target: "gmsm::sm2", "coordinate out of field range");
            return Err(GmError::InvalidPoint);
        }
        Ok(Self::from_inner(inner))
    }
}

pub fn elem_mul(a: &FieldElem, b: &FieldElem, cctx: &CurveCtx) -> FieldElem {
    Elem::from_inner(bn_mul_mod(&a.inner, &b.inner, cctx))
}

pub fn elem_add(a: &FieldElem, b: &FieldElem, cctx: &CurveCtx) -> FieldElem {
    Elem::from_inner(bn_add_mod(&a.inner, &b.inner, cctx))
}

/// 1/(a^2) (mod p); a must be nonzero.
pub fn elem_inv_sqr(a: &FieldElem, cctx: &CurveCtx) -> FieldElem {
    assert!(!a.is_zero());
    let a_inv = bn_to_inv(&a.inner, cctx);
    Elem::from_inner(bn_mul_mod(&a_inv, &a_inv, cctx))
}

/// Reduces a field element (or any 256-bit integer) into the scalar ring.
pub fn elem_reduced_to_scalar(e: &FieldElem, cctx: &CurveCtx) -> Scalar {
    Elem::from_inner(bn_scalar_mod(&e.inner, cctx))
}

pub fn scalar_g(g_scalar: &Scalar, cctx: &CurveCtx) -> [BigUint; 3] {
    bn_point_mul(&cctx.g_point, &g_scalar.inner, cctx)
}

pub fn scalar_p(p_scalar: &Scalar, pk: &PublicKey, cctx: &CurveCtx) -> [BigUint; 3] {
    bn_point_mul(&pk.to_point().to_bns(), &p_scalar.inner, cctx)
}

/// g_scalar*G + p_scalar*Q, the verification double multiplication.
pub fn twin_mul(g_scalar: &Scalar, p_scalar: &Scalar, pk: &PublicKey, cctx: &CurveCtx) -> Point {
    let g_point = scalar_g(g_scalar, cctx);
    let p_point = scalar_p(p_scalar, pk, cctx);
    Point::new(bn_point_add(&g_point, &p_point, cctx))
}
