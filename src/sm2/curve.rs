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

use crate::sm2::param::CurveCtx;
use num_bigint::BigUint;
use num_traits::identities::Zero;
use num_traits::One;

const CURVE_LENGTH: u64 = 256;

pub(crate) fn bn_add_mod(a: &BigUint, b: &BigUint, cctx: &CurveCtx) -> BigUint {
    assert!(a.bits() <= CURVE_LENGTH && b.bits() <= CURVE_LENGTH);
    (a + b) % &cctx.p
}

fn bn_neg_mod(a: &BigUint, cctx: &CurveCtx) -> BigUint {
    assert!(a.bits() <= CURVE_LENGTH);
    let a = a % &cctx.p;
    (&cctx.p - &a) % &cctx.p
}

pub(crate) fn bn_sub_mod(a: &BigUint, b: &BigUint, cctx: &CurveCtx) -> BigUint {
    assert!(a.bits() <= CURVE_LENGTH && b.bits() <= CURVE_LENGTH);
    let neg_b = bn_neg_mod(b, cctx);
    (a + &neg_b) % &cctx.p
}

pub(crate) fn bn_mul_mod(a: &BigUint, b: &BigUint, cctx: &CurveCtx) -> BigUint {
    assert!(a.bits() <= CURVE_LENGTH);
    a * b % &cctx.p
}

// a << b
fn bn_shl_mod(a: &BigUint, b: usize, cctx: &CurveCtx) -> BigUint {
    assert!(a.bits() <= CURVE_LENGTH);
    (a << b) % &cctx.p
}

/// The algorithm: "add-1998-cmo-2"
/// Cost: 12M + 4S + 6add + 1*2.
///       Z1Z1 = Z1^2
///       Z2Z2 = Z2^2
///       U1 = X1*Z2Z2
///       U2 = X2*Z1Z1
///       S1 = Y1*Z2*Z2Z2
///       S2 = Y2*Z1*Z1Z1
///       H = U2-U1
///       r = S2-S1
///       V = U1*H^2
///       X3 = r^2-H^3-2*V
///       Y3 = r*(V-X3)-S1*H^3
///       Z3 = Z1*Z2*H
///
/// H = 0 means both inputs share an x coordinate: the same point (r = 0,
/// fall through to doubling) or opposite points (result is infinity).
pub(crate) fn bn_point_add(a: &[BigUint; 3], b: &[BigUint; 3], cctx: &CurveCtx) -> [BigUint; 3] {
    let a_x = &a[0];
    let a_y = &a[1];
    let a_z = &a[2];
    let b_x = &b[0];
    let b_y = &b[1];
    let b_z = &b[2];

    if a_z.is_zero() {
        return b.clone();
    } else if b_z.is_zero() {
        return a.clone();
    }

    let a_z_sqr = bn_mul_mod(a_z, a_z, cctx);
    let b_z_sqr = bn_mul_mod(b_z, b_z, cctx);
    let u1 = bn_mul_mod(a_x, &b_z_sqr, cctx);
    let u2 = bn_mul_mod(b_x, &a_z_sqr, cctx);
    let a_z_cub = bn_mul_mod(&a_z_sqr, a_z, cctx);
    let b_z_cub = bn_mul_mod(&b_z_sqr, b_z, cctx);
    let s1 = bn_mul_mod(a_y, &b_z_cub, cctx);
    let s2 = bn_mul_mod(b_y, &a_z_cub, cctx);
    let h = bn_sub_mod(&u2, &u1, cctx);
    let r = bn_sub_mod(&s2, &s1, cctx);

    if h.is_zero() {
        if r.is_zero() {
            return bn_point_double(a, cctx);
        }
        return point_at_infinity();
    }

    let r_sqr = bn_mul_mod(&r, &r, cctx);
    let h_sqr = bn_mul_mod(&h, &h, cctx);
    let h_cub = bn_mul_mod(&h_sqr, &h, cctx);

    let v = bn_mul_mod(&u1, &h_sqr, cctx);
    let rem_x = bn_sub_mod(
        &bn_sub_mod(&r_sqr, &h_cub, cctx),
        &bn_shl_mod(&v, 1, cctx),
        cctx,
    );
    let rem_y = bn_sub_mod(
        &bn_mul_mod(&r, &bn_sub_mod(&v, &rem_x, cctx), cctx),
        &bn_mul_mod(&s1, &h_cub, cctx),
        cctx,
    );
    let rem_z = bn_mul_mod(&bn_mul_mod(a_z, b_z, cctx), &h, cctx);

    [rem_x, rem_y, rem_z]
}

/// The algorithm: "dbl-2001-b", valid because SM2's a == -3 (mod p).
/// Cost: 3M + 5S + 8add + 1*3 + 1*4 + 2*8
///       delta = Z1^2
///       gamma = Y1^2
///       beta = X1*gamma
///       alpha = 3*(X1-delta)*(X1+delta)
///       X3 = alpha^2-8*beta
///       Z3 = (Y1+Z1)^2-gamma-delta
///       Y3 = alpha*(4*beta-X3)-8*gamma^2
pub(crate) fn bn_point_double(a: &[BigUint; 3], cctx: &CurveCtx) -> [BigUint; 3] {
    let a_x = &a[0];
    let a_y = &a[1];
    let a_z = &a[2];
    let delta = bn_mul_mod(a_z, a_z, cctx);
    let gamma = bn_mul_mod(a_y, a_y, cctx);
    let beta = bn_mul_mod(a_x, &gamma, cctx);
    let alpha = bn_mul_mod(
        &bn_mul_mod(
            &bn_sub_mod(a_x, &delta, cctx),
            &bn_add_mod(a_x, &delta, cctx),
            cctx,
        ),
        &BigUint::from(3u32),
        cctx,
    );
    let rem_x = bn_sub_mod(
        &bn_mul_mod(&alpha, &alpha, cctx),
        &bn_shl_mod(&beta, 3, cctx),
        cctx,
    );
    let lam1 = bn_sub_mod(&bn_shl_mod(&beta, 2, cctx), &rem_x, cctx); // 4 * beta - x3
    let rem_y = bn_sub_mod(
        &bn_mul_mod(&alpha, &lam1, cctx),
        &bn_shl_mod(&bn_mul_mod(&gamma, &gamma, cctx), 3, cctx),
        cctx,
    );
    let lam2 = bn_add_mod(a_y, a_z, cctx);
    let rem_z = bn_sub_mod(
        &bn_sub_mod(&bn_mul_mod(&lam2, &lam2, cctx), &gamma, cctx),
        &delta,
        cctx,
    );
    [rem_x, rem_y, rem_z]
}

/// Right-to-left binary ladder. A scalar that is zero (mod n) yields the
/// point at infinity (z = 0).
pub(crate) fn bn_point_mul(a: &[BigUint; 3], scalar: &BigUint, cctx: &CurveCtx) -> [BigUint; 3] {
    assert!(scalar.bits() <= CURVE_LENGTH);
    let scalar_bz = scalar.to_bytes_le();
    let mut a_order = a.clone();
    let mut rem = point_at_infinity();

    for scalar_byte in scalar_bz {
        for bit in 0..8 {
            if (scalar_byte >> bit) & 0x01 != 0 {
                rem = bn_point_add(&rem, &a_order, cctx);
            }
            a_order = bn_point_double(&a_order, cctx);
        }
    }
    rem
}

pub(crate) fn point_at_infinity() -> [BigUint; 3] {
    [BigUint::one(), BigUint::one(), BigUint::zero()]
}

pub(crate) fn bn_to_inv(a: &BigUint, cctx: &CurveCtx) -> BigUint {
    // Fermat's Little Theorem: a**-1 (mod p) == a**(p - 2) (mod p).
    assert!(a.bits() <= CURVE_LENGTH && !a.is_zero());
    a.modpow(&(&cctx.p - 2u32), &cctx.p)
}

pub(crate) fn bn_scalar_mod(a: &BigUint, cctx: &CurveCtx) -> BigUint {
    a % &cctx.n
}

pub(crate) fn bn_scalar_mul_mod(a: &BigUint, b: &BigUint, cctx: &CurveCtx) -> BigUint {
    assert!(a.bits() <= CURVE_LENGTH);
    a * b % &cctx.n
}

pub(crate) fn bn_scalar_add_mod(a: &BigUint, b: &BigUint, cctx: &CurveCtx) -> BigUint {
    assert!(a.bits() <= CURVE_LENGTH && b.bits() <= CURVE_LENGTH);
    (a + b) % &cctx.n
}

fn bn_scalar_neg_mod(a: &BigUint, cctx: &CurveCtx) -> BigUint {
    assert!(a.bits() <= CURVE_LENGTH);
    let a = a % &cctx.n;
    (&cctx.n - &a) % &cctx.n
}

pub(crate) fn bn_scalar_sub_mod(a: &BigUint, b: &BigUint, cctx: &CurveCtx) -> BigUint {
    assert!(a.bits() <= CURVE_LENGTH && b.bits() <= CURVE_LENGTH);
    let neg_b = bn_scalar_neg_mod(b, cctx);
    (a + &neg_b) % &cctx.n
}

pub(crate) fn bn_scalar_to_inv(a: &BigUint, cctx: &CurveCtx) -> BigUint {
    // Fermat's Little Theorem: a**-1 (mod n) == a**(n - 2) (mod n).
    assert!(a.bits() <= CURVE_LENGTH && !a.is_zero());
    a.modpow(&(&cctx.n - 2u32), &cctx.n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sm2::affine::affine_from_jacobian;
    use crate::sm2::public::Point;

    fn affine_hex(point: [BigUint; 3], cctx: &CurveCtx) -> (String, String) {
        let (x, y) = affine_from_jacobian(&Point::new(point), cctx).unwrap();
        (
            hex::encode(x.bytes_less_safe()),
            hex::encode(y.bytes_less_safe()),
        )
    }

    #[test]
    fn bn_mod_arithmetic() {
        let cctx = &CurveCtx::sm2p256_new();
        let a = BigUint::from_bytes_be(
            &hex::decode("fffffc4d0000064efffffb8c00000324fffffdc600000543fffff8950000053b")
                .unwrap(),
        );
        let a_sqr = bn_mul_mod(&a, &a, cctx);
        assert!(a_sqr < cctx.p);

        // a - a == 0, 0 - a == -a, a + (-a) == 0
        assert!(bn_sub_mod(&a, &a, cctx).is_zero());
        let neg = bn_sub_mod(&BigUint::zero(), &a, cctx);
        assert!(bn_add_mod(&a, &neg, cctx).is_zero());

        // shifting is doubling
        assert_eq!(bn_shl_mod(&a, 1, cctx), bn_add_mod(&a, &a, cctx));
    }

    #[test]
    fn bn_to_inv_cancels() {
        let cctx = &CurveCtx::sm2p256_new();
        let a = BigUint::from_bytes_be(
            &hex::decode("fffffc4d0000064efffffb8c00000324fffffdc600000543fffff8950000053b")
                .unwrap(),
        );
        assert_eq!(bn_mul_mod(&bn_to_inv(&a, cctx), &a, cctx), BigUint::one());

        let b = BigUint::from(0x1234u32);
        assert_eq!(
            bn_scalar_mul_mod(&bn_scalar_to_inv(&b, cctx), &b, cctx),
            BigUint::one()
        );
    }

    #[test]
    fn bn_point_double_matches_two_g() {
        let cctx = &CurveCtx::sm2p256_new();
        let g2 = bn_point_double(&cctx.g_point, cctx);
        let (x, y) = affine_hex(g2, cctx);
        assert_eq!(
            x,
            "56cefd60d7c87c000d58ef57fa73ba4d9c0dfa08c08a7331495c2e1da3f2bd52"
        );
        assert_eq!(
            y,
            "31b7e7e6cc8189f668535ce0f8eaf1bd6de84c182f6c8e716f780d3a970a23c3"
        );
    }

    #[test]
    fn bn_point_add_matches_three_g() {
        let cctx = &CurveCtx::sm2p256_new();
        let g2 = bn_point_double(&cctx.g_point, cctx);
        let g3 = bn_point_add(&g2, &cctx.g_point, cctx);
        let (x, y) = affine_hex(g3, cctx);
        assert_eq!(
            x,
            "a97f7cd4b3c993b4be2daa8cdb41e24ca13f6bd945302244e26918f1d0509ebf"
        );
        assert_eq!(
            y,
            "530b5dd88c688ef5ccc5cec08a72150f7c400ee5cd045292aaacdd037458f6e6"
        );
    }

    #[test]
    fn bn_point_add_degenerate_cases() {
        let cctx = &CurveCtx::sm2p256_new();

        // P + P falls through to doubling even though the operands are the
        // same point in the same representation.
        let doubled = bn_point_add(&cctx.g_point, &cctx.g_point, cctx);
        let expected = bn_point_double(&cctx.g_point, cctx);
        assert_eq!(affine_hex(doubled, cctx), affine_hex(expected, cctx));

        // P + (-P) is the point at infinity.
        let neg_g = [
            cctx.g_point[0].clone(),
            &cctx.p - &cctx.g_point[1],
            BigUint::one(),
        ];
        let inf = bn_point_add(&cctx.g_point, &neg_g, cctx);
        assert!(inf[2].is_zero());

        // infinity is the identity
        let back = bn_point_add(&inf, &cctx.g_point, cctx);
        assert_eq!(affine_hex(back, cctx), affine_hex(cctx.g_point.clone(), cctx));
    }

    #[test]
    fn bn_point_mul_matches_repeated_addition() {
        let cctx = &CurveCtx::sm2p256_new();
        let g5 = bn_point_mul(&cctx.g_point, &BigUint::from(5u32), cctx);

        let mut acc = cctx.g_point.clone();
        for _ in 0..4 {
            acc = bn_point_add(&acc, &cctx.g_point, cctx);
        }
        assert_eq!(affine_hex(g5, cctx), affine_hex(acc, cctx));
    }

    #[test]
    fn bn_point_mul_order_yields_infinity() {
        let cctx = &CurveCtx::sm2p256_new();
        let zero = bn_point_mul(&cctx.g_point, &BigUint::zero(), cctx);
        assert!(zero[2].is_zero());

        // n*G == infinity since G has order n
        let n = cctx.n.clone();
        let ng = bn_point_mul(&cctx.g_point, &n, cctx);
        assert!(ng[2].is_zero());
    }
}
