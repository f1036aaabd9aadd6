use crate::error::{GmError, Result};
use crate::sm2::affine::affine_from_jacobian;
use crate::sm2::curve::{bn_scalar_add_mod, bn_scalar_mod};
use crate::sm2::elem::{elem_reduced_to_scalar, twin_mul, Elem, Scalar};
use crate::sm2::param::CurveCtx;
use crate::sm2::public::{PublicKey, BN_LENGTH};
use crate::sm3::Sm3;
use num_bigint::BigUint;
use num_traits::Zero;
use subtle::ConstantTimeEq;

/// Maximum length of a DER-encoded signature: two 33-byte INTEGERs
/// inside a SEQUENCE.
pub const MAX_DER_SIGNATURE_LEN: usize = 72;

#[derive(Debug)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {
    /// Builds a signature from big-endian `r` and `s`, which must both
    /// lie in [1, n-1].
    pub fn new(r: &[u8; BN_LENGTH], s: &[u8; BN_LENGTH], cctx: &CurveCtx) -> Result<Self> {
        let r = BigUint::from_bytes_be(r);
        let s = BigUint::from_bytes_be(s);

        if r.is_zero() || r >= cctx.n || s.is_zero() || s >= cctx.n {
            return Err(GmError::InvalidSignature);
        }

        Ok(Signature { r, s })
    }

    pub(crate) fn from_scalars(r: BigUint, s: BigUint) -> Self {
        Signature { r, s }
    }

    pub fn r(&self) -> [u8; BN_LENGTH] {
        let mut out = [0; BN_LENGTH];
        let bz = self.r.to_bytes_be();
        out[BN_LENGTH - bz.len()..].copy_from_slice(&bz);
        out
    }

    pub fn s(&self) -> [u8; BN_LENGTH] {
        let mut out = [0; BN_LENGTH];
        let bz = self.s.to_bytes_be();
        out[BN_LENGTH - bz.len()..].copy_from_slice(&bz);
        out
    }

    /// Encodes the signature as a DER `SEQUENCE { INTEGER r, INTEGER s }`.
    pub fn to_der(&self) -> Vec<u8> {
        fn push_integer(out: &mut Vec<u8>, v: &BigUint) {
            let bz = v.to_bytes_be();
            out.push(0x02);
            if bz[0] & 0x80 != 0 {
                out.push(bz.len() as u8 + 1);
                out.push(0x00);
            } else {
                out.push(bz.len() as u8);
            }
            out.extend_from_slice(&bz);
        }

        let mut body = Vec::with_capacity(MAX_DER_SIGNATURE_LEN - 2);
        push_integer(&mut body, &self.r);
        push_integer(&mut body, &self.s);

        let mut der = Vec::with_capacity(body.len() + 2);
        der.push(0x30);
        der.push(body.len() as u8);
        der.extend_from_slice(&body);
        der
    }

    /// Parses a strict DER `SEQUENCE { INTEGER r, INTEGER s }`. Trailing
    /// bytes, non-minimal integers and out-of-range scalars are all
    /// rejected.
    pub fn from_der(der: &[u8], cctx: &CurveCtx) -> Result<Self> {
        fn take_integer<'a>(input: &'a [u8]) -> Result<(BigUint, &'a [u8])> {
            if input.len() < 2 || input[0] != 0x02 {
                return Err(GmError::InvalidSignature);
            }
            let len = input[1] as usize;
            if len == 0 || len > BN_LENGTH + 1 || input.len() < 2 + len {
                return Err(GmError::InvalidSignature);
            }
            let body = &input[2..2 + len];
            // Minimal encoding: no redundant leading zero, and a leading
            // zero only to clear a set sign bit.
            if body[0] & 0x80 != 0 {
                return Err(GmError::InvalidSignature);
            }
            if body[0] == 0x00 && (body.len() == 1 || body[1] & 0x80 == 0) {
                return Err(GmError::InvalidSignature);
            }
            Ok((BigUint::from_bytes_be(body), &input[2 + len..]))
        }

        if der.len() < 2 || der[0] != 0x30 || der[1] as usize != der.len() - 2 {
            return Err(GmError::InvalidSignature);
        }

        let (r, rest) = take_integer(&der[2..])?;
        let (s, rest) = take_integer(rest)?;
        if !rest.is_empty() {
            return Err(GmError::InvalidSignature);
        }

        if r.is_zero() || r >= cctx.n || s.is_zero() || s >= cctx.n {
            return Err(GmError::InvalidSignature);
        }

        Ok(Signature { r, s })
    }

    /// Hashes the message with SM3 and verifies the digest.
    pub fn verify(&self, pk: &PublicKey, msg: &[u8], cctx: &CurveCtx) -> Result<()> {
        let digest = Sm3::digest(msg);
        self.verify_digest(pk, &digest, cctx)
    }

    /// Checks the signature over a precomputed 32-byte digest.
    pub fn verify_digest(&self, pk: &PublicKey, digest: &[u8; 32], cctx: &CurveCtx) -> Result<()> {
        if self.r.is_zero() || self.r >= cctx.n || self.s.is_zero() || self.s >= cctx.n {
            return Err(GmError::InvalidSignature);
        }

        let e = bn_scalar_mod(&BigUint::from_bytes_be(digest), cctx);

        let t = bn_scalar_add_mod(&self.r, &self.s, cctx);
        if t.is_zero() {
            return Err(GmError::InvalidSignature);
        }

        // s*G + t*Q
        let point = twin_mul(
            &Scalar::from_inner(self.s.clone()),
            &Scalar::from_inner(t),
            pk,
            cctx,
        );

        let (x1, _) =
            affine_from_jacobian(&point, cctx).map_err(|_| GmError::InvalidSignature)?;
        let x1 = elem_reduced_to_scalar(&x1, cctx);
        let expected: Scalar = Elem::from_inner(bn_scalar_add_mod(&e, &x1.inner, cctx));
        let got: Scalar = Elem::from_inner(self.r.clone());

        if bool::from(expected.bytes_less_safe().ct_eq(&got.bytes_less_safe())) {
            return Ok(());
        }
        tracing::debug!(target: "gmsm::sm2", "signature does not match digest");
        Err(GmError::InvalidSignature)
    }
}
