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

use num_bigint::BigUint;
use num_traits::One;

/// Domain parameters of the SM2 recommended curve (GB/T 32918.5):
/// y^2 == x^3 + a*x + b (mod p), base point G of prime order n.
pub struct CurveCtx {
    pub p: BigUint,
    pub a: BigUint,
    pub b: BigUint,
    pub n: BigUint,
    // generator G in Jacobian coordinates, z = 1
    pub g_point: [BigUint; 3],
}

impl CurveCtx {
    pub fn sm2p256_new() -> CurveCtx {
        let p = BigUint::from_bytes_be(
            &hex::decode("fffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff")
                .unwrap(),
        );
        let a = BigUint::from_bytes_be(
            &hex::decode("fffffffeffffffffffffffffffffffffffffffff00000000fffffffffffffffc")
                .unwrap(),
        );
        let b = BigUint::from_bytes_be(
            &hex::decode("28e9fa9e9d9f5e344d5a9e4bcf6509a7f39789f515ab8f92ddbcbd414d940e93")
                .unwrap(),
        );
        let n = BigUint::from_bytes_be(
            &hex::decode("fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123")
                .unwrap(),
        );
        let g_x = BigUint::from_bytes_be(
            &hex::decode("32c4ae2c1f1981195f9904466a39c9948fe30bbff2660be1715a4589334c74c7")
                .unwrap(),
        );
        let g_y = BigUint::from_bytes_be(
            &hex::decode("bc3736a2f4f6779c59bdcee36b692153d0a9877cc62a474002df32e52139f0a0")
                .unwrap(),
        );

        CurveCtx {
            p,
            a,
            b,
            n,
            g_point: [g_x, g_y, BigUint::one()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_is_p_minus_three() {
        // dbl-2001-b in curve.rs relies on a == -3 (mod p).
        let cctx = CurveCtx::sm2p256_new();
        assert_eq!(cctx.a, &cctx.p - 3u32);
    }

    #[test]
    fn generator_satisfies_curve_equation() {
        let cctx = CurveCtx::sm2p256_new();
        let x = &cctx.g_point[0];
        let y = &cctx.g_point[1];
        let lhs = y * y % &cctx.p;
        let rhs = (x * x % &cctx.p * x + &cctx.a * x + &cctx.b) % &cctx.p;
        assert_eq!(lhs, rhs);
    }
}
