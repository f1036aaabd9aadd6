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
use crate::sm2::param::CurveCtx;
use crate::sm2::public::BN_LENGTH;
use num_bigint::BigUint;
use num_traits::Zero;
use zeroize::Zeroizing;

const GENERATE_RETRY_LIMIT: usize = 100;

/// Draws a uniformly random scalar in [1, n-1] by rejection sampling.
pub(crate) fn create_private_key(
    rng: &mut dyn SecureRandom,
    cctx: &CurveCtx,
) -> Result<Zeroizing<[u8; BN_LENGTH]>> {
    for _ in 0..GENERATE_RETRY_LIMIT {
        let mut candidate = Zeroizing::new([0u8; BN_LENGTH]);
        rng.fill(candidate.as_mut())?;

        let d = BigUint::from_bytes_be(candidate.as_ref());
        if !d.is_zero() && d < cctx.n {
            return Ok(candidate);
        }
    }
    tracing::debug!(target: "gmsm::sm2", "no suitable private key after retries");
    Err(GmError::RandomSource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand::SystemRandom;

    #[test]
    fn generated_scalar_is_in_range() {
        let cctx = CurveCtx::sm2p256_new();
        let mut rng = SystemRandom;
        let key = create_private_key(&mut rng, &cctx).unwrap();
        let d = BigUint::from_bytes_be(key.as_ref());
        assert!(!d.is_zero());
        assert!(d < cctx.n);
    }

    #[test]
    fn rejects_out_of_range_candidates() {
        struct AllOnes;
        impl SecureRandom for AllOnes {
            fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
                dest.fill(0xff);
                Ok(())
            }
        }

        let cctx = CurveCtx::sm2p256_new();
        // 2^256 - 1 exceeds n, so every draw is rejected.
        assert_eq!(
            create_private_key(&mut AllOnes, &cctx).unwrap_err(),
            GmError::RandomSource
        );
    }
}
