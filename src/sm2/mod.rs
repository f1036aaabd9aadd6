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

//! SM2 digital signatures over the sm2p256v1 curve.
//!
//! Scalar multiplication runs on Jacobian coordinates over plain
//! big-integer arithmetic. Keys are validated on import, signatures are
//! range-checked on construction, and digests travel as raw 32-byte
//! arrays so callers can hash with [`crate::sm3`] or bring their own
//! digest.

mod affine;
mod curve;
mod elem;
mod param;
mod private;
mod public;
mod signing;
mod verification;

pub use param::CurveCtx;
pub use public::{PublicKey, BN_LENGTH, PUBLIC_KEY_LEN};
pub use signing::KeyPair;
pub use verification::{Signature, MAX_DER_SIGNATURE_LEN};
