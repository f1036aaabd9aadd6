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

use thiserror::Error;

/// The error taxonomy shared by all three algorithms.
///
/// Cryptographic validation failures deliberately carry no detail about
/// which step rejected the input; the diagnostic side channel for operators
/// is `tracing`, emitted at the failure site.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GmError {
    /// Malformed or out-of-range input supplied by the caller.
    #[error("invalid parameters: {0}")]
    InvalidParameters(&'static str),

    /// The system entropy source failed or is unavailable.
    #[error("secure random source unavailable")]
    RandomSource,

    /// An externally supplied point does not lie on the SM2 curve.
    #[error("point is not on the curve")]
    InvalidPoint,

    /// Signature rejected. Covers range checks, decode failures and
    /// verification mismatches alike.
    #[error("signature rejected")]
    InvalidSignature,

    /// CBC decryption produced an invalid PKCS#7 pad.
    #[error("invalid block padding")]
    Padding,

    /// Cipher input length is not a multiple of the 16-byte block size.
    #[error("input length is not a multiple of the block size")]
    InvalidBlockLength,

    /// The signing nonce retry budget was exhausted.
    #[error("signing failed")]
    SigningFailed,
}

pub type Result<T> = core::result::Result<T, GmError>;
