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

//! The Chinese national cryptographic algorithm suite: SM2 elliptic-curve
//! signatures (GB/T 32918), the SM3 hash function (GB/T 32905) and the SM4
//! block cipher (GB/T 32907).
//!
//! ```
//! use gmsm::rand::SystemRandom;
//! use gmsm::sm2::{CurveCtx, KeyPair};
//!
//! let cctx = CurveCtx::sm2p256_new();
//! let mut rng = SystemRandom;
//!
//! let key_pair = KeyPair::generate(&mut rng, &cctx).unwrap();
//! let sig = key_pair.sign(&mut rng, b"hello world", &cctx).unwrap();
//! sig.verify(&key_pair.public_key(), b"hello world", &cctx).unwrap();
//! ```

pub mod error;
pub mod rand;
pub mod sm2;
pub mod sm3;
pub mod sm4;

pub use error::GmError;
