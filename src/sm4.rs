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

//! The SM4 block cipher (GB/T 32907): a 32-round unbalanced Feistel
//! network with 128-bit blocks and keys, plus ECB and CBC modes with
//! PKCS#7 padding.

use crate::error::{GmError, Result};
use crate::rand::SecureRandom;
use subtle::{Choice, ConstantTimeEq, ConstantTimeLess};

/// Block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// Key length in bytes.
pub const KEY_LEN: usize = 16;

const ROUNDS: usize = 32;

#[rustfmt::skip]
const SBOX: [u8; 256] = [
    0xd6, 0x90, 0xe9, 0xfe, 0xcc, 0xe1, 0x3d, 0xb7, 0x16, 0xb6, 0x14, 0xc2, 0x28, 0xfb, 0x2c, 0x05,
    0x2b, 0x67, 0x9a, 0x76, 0x2a, 0xbe, 0x04, 0xc3, 0xaa, 0x44, 0x13, 0x26, 0x49, 0x86, 0x06, 0x99,
    0x9c, 0x42, 0x50, 0xf4, 0x91, 0xef, 0x98, 0x7a, 0x33, 0x54, 0x0b, 0x43, 0xed, 0xcf, 0xac, 0x62,
    0xe4, 0xb3, 0x1c, 0xa9, 0xc9, 0x08, 0xe8, 0x95, 0x80, 0xdf, 0x94, 0xfa, 0x75, 0x8f, 0x3f, 0xa6,
    0x47, 0x07, 0xa7, 0xfc, 0xf3, 0x73, 0x17, 0xba, 0x83, 0x59, 0x3c, 0x19, 0xe6, 0x85, 0x4f, 0xa8,
    0x68, 0x6b, 0x81, 0xb2, 0x71, 0x64, 0xda, 0x8b, 0xf8, 0xeb, 0x0f, 0x4b, 0x70, 0x56, 0x9d, 0x35,
    0x1e, 0x24, 0x0e, 0x5e, 0x63, 0x58, 0xd1, 0xa2, 0x25, 0x22, 0x7c, 0x3b, 0x01, 0x21, 0x78, 0x87,
    0xd4, 0x00, 0x46, 0x57, 0x9f, 0xd3, 0x27, 0x52, 0x4c, 0x36, 0x02, 0xe7, 0xa0, 0xc4, 0xc8, 0x9e,
    0xea, 0xbf, 0x8a, 0xd2, 0x40, 0xc7, 0x38, 0xb5, 0xa3, 0xf7, 0xf2, 0xce, 0xf9, 0x61, 0x15, 0xa1,
    0xe0, 0xae, 0x5d, 0xa4, 0x9b, 0x34, 0x1a, 0x55, 0xad, 0x93, 0x32, 0x30, 0xf5, 0x8c, 0xb1, 0xe3,
    0x1d, 0xf6, 0xe2, 0x2e, 0x82, 0x66, 0xca, 0x60, 0xc0, 0x29, 0x23, 0xab, 0x0d, 0x53, 0x4e, 0x6f,
    0xd5, 0xdb, 0x37, 0x45, 0xde, 0xfd, 0x8e, 0x2f, 0x03, 0xff, 0x6a, 0x72, 0x6d, 0x6c, 0x5b, 0x51,
    0x8d, 0x1b, 0xaf, 0x92, 0xbb, 0xdd, 0xbc, 0x7f, 0x11, 0xd9, 0x5c, 0x41, 0x1f, 0x10, 0x5a, 0xd8,
    0x0a, 0xc1, 0x31, 0x88, 0xa5, 0xcd, 0x7b, 0xbd, 0x2d, 0x74, 0xd0, 0x12, 0xb8, 0xe5, 0xb4, 0xb0,
    0x89, 0x69, 0x97, 0x4a, 0x0c, 0x96, 0x77, 0x7e, 0x65, 0xb9, 0xf1, 0x09, 0xc5, 0x6e, 0xc6, 0x84,
    0x18, 0xf0, 0x7d, 0xec, 0x3a, 0xdc, 0x4d, 0x20, 0x79, 0xee, 0x5f, 0x3e, 0xd7, 0xcb, 0x39, 0x48,
];

const FK: [u32; 4] = [0xa3b1bac6, 0x56aa3350, 0x677d9197, 0xb27022dc];

#[rustfmt::skip]
const CK: [u32; ROUNDS] = [
    0x00070e15, 0x1c232a31, 0x383f464d, 0x545b6269,
    0x70777e85, 0x8c939aa1, 0xa8afb6bd, 0xc4cbd2d9,
    0xe0e7eef5, 0xfc030a11, 0x181f262d, 0x343b4249,
    0x50575e65, 0x6c737a81, 0x888f969d, 0xa4abb2b9,
    0xc0c7ced5, 0xdce3eaf1, 0xf8ff060d, 0x141b2229,
    0x30373e45, 0x4c535a61, 0x686f767d, 0x848b9299,
    0xa0a7aeb5, 0xbcc3cad1, 0xd8dfe6ed, 0xf4fb0209,
    0x10171e25, 0x2c333a41, 0x484f565d, 0x646b7279,
];

#[inline(always)]
fn tau(x: u32) -> u32 {
    let b = x.to_be_bytes();
    u32::from_be_bytes([
        SBOX[b[0] as usize],
        SBOX[b[1] as usize],
        SBOX[b[2] as usize],
        SBOX[b[3] as usize],
    ])
}

// Round transformation T: substitution then the linear diffusion L.
#[inline(always)]
fn t_round(x: u32) -> u32 {
    let b = tau(x);
    b ^ b.rotate_left(2) ^ b.rotate_left(10) ^ b.rotate_left(18) ^ b.rotate_left(24)
}

// Key-schedule variant T' with the weaker diffusion L'.
#[inline(always)]
fn t_key(x: u32) -> u32 {
    let b = tau(x);
    b ^ b.rotate_left(13) ^ b.rotate_left(23)
}

/// An SM4 cipher with an expanded key schedule.
///
/// The same schedule serves both directions; decryption walks the round
/// keys in reverse.
#[derive(Clone)]
pub struct Sm4 {
    rk: [u32; ROUNDS],
}

impl Sm4 {
    /// Expands a 16-byte key into the 32 round keys.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != KEY_LEN {
            return Err(GmError::InvalidParameters("key must be 16 bytes"));
        }

        let mut k = [0u32; 4];
        for i in 0..4 {
            k[i] = u32::from_be_bytes([key[4 * i], key[4 * i + 1], key[4 * i + 2], key[4 * i + 3]])
                ^ FK[i];
        }

        let mut rk = [0u32; ROUNDS];
        for i in 0..ROUNDS {
            let next = k[0] ^ t_key(k[1] ^ k[2] ^ k[3] ^ CK[i]);
            rk[i] = next;
            k = [k[1], k[2], k[3], next];
        }
        Ok(Sm4 { rk })
    }

    fn crypt_block(&self, block: &[u8; BLOCK_LEN], decrypt: bool) -> [u8; BLOCK_LEN] {
        let mut x = [0u32; 4];
        for i in 0..4 {
            x[i] = u32::from_be_bytes([
                block[4 * i],
                block[4 * i + 1],
                block[4 * i + 2],
                block[4 * i + 3],
            ]);
        }

        for i in 0..ROUNDS {
            let rk = if decrypt {
                self.rk[ROUNDS - 1 - i]
            } else {
                self.rk[i]
            };
            let next = x[0] ^ t_round(x[1] ^ x[2] ^ x[3] ^ rk);
            x = [x[1], x[2], x[3], next];
        }

        // The final output applies the reversal transform R.
        let mut out = [0u8; BLOCK_LEN];
        for i in 0..4 {
            out[4 * i..4 * i + 4].copy_from_slice(&x[3 - i].to_be_bytes());
        }
        out
    }

    pub fn encrypt_block(&self, block: &[u8; BLOCK_LEN]) -> [u8; BLOCK_LEN] {
        self.crypt_block(block, false)
    }

    pub fn decrypt_block(&self, block: &[u8; BLOCK_LEN]) -> [u8; BLOCK_LEN] {
        self.crypt_block(block, true)
    }

    /// ECB over a whole number of blocks. No padding is applied.
    pub fn ecb_encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        if plaintext.len() % BLOCK_LEN != 0 {
            return Err(GmError::InvalidBlockLength);
        }
        let mut out = Vec::with_capacity(plaintext.len());
        for chunk in plaintext.chunks_exact(BLOCK_LEN) {
            let mut block = [0u8; BLOCK_LEN];
            block.copy_from_slice(chunk);
            out.extend_from_slice(&self.encrypt_block(&block));
        }
        Ok(out)
    }

    pub fn ecb_decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() % BLOCK_LEN != 0 {
            return Err(GmError::InvalidBlockLength);
        }
        let mut out = Vec::with_capacity(ciphertext.len());
        for chunk in ciphertext.chunks_exact(BLOCK_LEN) {
            let mut block = [0u8; BLOCK_LEN];
            block.copy_from_slice(chunk);
            out.extend_from_slice(&self.decrypt_block(&block));
        }
        Ok(out)
    }

    /// CBC encryption with PKCS#7 padding; the output is always a
    /// nonzero whole number of blocks.
    pub fn cbc_encrypt(&self, iv: &[u8; BLOCK_LEN], plaintext: &[u8]) -> Vec<u8> {
        let data = pkcs7_pad(plaintext);
        let mut out = Vec::with_capacity(data.len());

        let mut prev = *iv;
        for chunk in data.chunks_exact(BLOCK_LEN) {
            let mut block = [0u8; BLOCK_LEN];
            for (i, (c, p)) in chunk.iter().zip(prev.iter()).enumerate() {
                block[i] = c ^ p;
            }
            prev = self.encrypt_block(&block);
            out.extend_from_slice(&prev);
        }
        out
    }

    /// CBC decryption with constant-time PKCS#7 unpadding.
    pub fn cbc_decrypt(&self, iv: &[u8; BLOCK_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(GmError::InvalidBlockLength);
        }

        let mut out = Vec::with_capacity(ciphertext.len());
        let mut prev = *iv;
        for chunk in ciphertext.chunks_exact(BLOCK_LEN) {
            let mut block = [0u8; BLOCK_LEN];
            block.copy_from_slice(chunk);
            let decrypted = self.decrypt_block(&block);
            for (d, p) in decrypted.iter().zip(prev.iter()) {
                out.push(d ^ p);
            }
            prev = block;
        }

        pkcs7_unpad(&mut out)?;
        Ok(out)
    }
}

fn pkcs7_pad(data: &[u8]) -> Vec<u8> {
    let pad = BLOCK_LEN - data.len() % BLOCK_LEN;
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.resize(data.len() + pad, pad as u8);
    out
}

/// Strips PKCS#7 padding without branching on the pad bytes, so a
/// tampered final block does not leak where validation failed.
fn pkcs7_unpad(data: &mut Vec<u8>) -> Result<()> {
    debug_assert!(data.len() >= BLOCK_LEN && data.len() % BLOCK_LEN == 0);

    let pad = data[data.len() - 1];
    let mut valid: Choice = pad.ct_lt(&(BLOCK_LEN as u8 + 1)) & 0u8.ct_lt(&pad);

    let last = &data[data.len() - BLOCK_LEN..];
    for (i, b) in last.iter().enumerate() {
        let from_end = (BLOCK_LEN - i) as u8;
        let in_pad = from_end.ct_lt(&pad.wrapping_add(1));
        valid &= !in_pad | b.ct_eq(&pad);
    }

    if bool::from(valid) {
        data.truncate(data.len() - pad as usize);
        Ok(())
    } else {
        tracing::debug!(target: "gmsm::sm4", "pkcs7 padding check failed");
        Err(GmError::Padding)
    }
}

/// Draws a random 16-byte cipher key.
pub fn generate_key(rng: &mut dyn SecureRandom) -> Result<[u8; KEY_LEN]> {
    let mut key = [0u8; KEY_LEN];
    rng.fill(&mut key)?;
    Ok(key)
}

/// CBC-encrypts under a fresh random IV, which is prepended to the
/// ciphertext.
pub fn cbc_encrypt_iv_prepended(
    key: &[u8],
    rng: &mut dyn SecureRandom,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let cipher = Sm4::new(key)?;

    let mut iv = [0u8; BLOCK_LEN];
    rng.fill(&mut iv)?;

    let mut out = Vec::with_capacity(BLOCK_LEN + plaintext.len() + BLOCK_LEN);
    out.extend_from_slice(&iv);
    out.extend_from_slice(&cipher.cbc_encrypt(&iv, plaintext));
    Ok(out)
}

/// Inverse of [`cbc_encrypt_iv_prepended`]: splits off the leading IV
/// and decrypts the remainder.
pub fn cbc_decrypt_iv_prepended(key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Sm4::new(key)?;

    if ciphertext.len() < 2 * BLOCK_LEN {
        return Err(GmError::InvalidBlockLength);
    }
    let mut iv = [0u8; BLOCK_LEN];
    iv.copy_from_slice(&ciphertext[..BLOCK_LEN]);

    cipher.cbc_decrypt(&iv, &ciphertext[BLOCK_LEN..])
}

/// ECB with PKCS#7 padding. ECB leaks block-level structure; prefer CBC
/// unless interoperating with a fixed format.
pub fn ecb_pkcs7_encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Sm4::new(key)?;
    cipher.ecb_encrypt(&pkcs7_pad(plaintext))
}

pub fn ecb_pkcs7_decrypt(key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Sm4::new(key)?;
    if ciphertext.is_empty() {
        return Err(GmError::InvalidBlockLength);
    }
    let mut out = cipher.ecb_decrypt(ciphertext)?;
    pkcs7_unpad(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand::SystemRandom;

    const KEY_HEX: &str = "0123456789abcdeffedcba9876543210";

    fn cipher() -> Sm4 {
        Sm4::new(&hex::decode(KEY_HEX).unwrap()).unwrap()
    }

    // GB/T 32907 appendix A example 1: key == plaintext.
    #[test]
    fn block_known_answer() {
        let cipher = cipher();
        let pt: [u8; BLOCK_LEN] = hex::decode(KEY_HEX).unwrap().try_into().unwrap();

        let ct = cipher.encrypt_block(&pt);
        assert_eq!(hex::encode(ct), "681edf34d206965e86b3e94f536e4246");
        assert_eq!(cipher.decrypt_block(&ct), pt);
    }

    #[test]
    fn first_round_key_known_answer() {
        assert_eq!(cipher().rk[0], 0xf12186f9);
    }

    // GB/T 32907 appendix A example 2: one million iterations.
    #[test]
    #[ignore = "slow"]
    fn million_iterations_known_answer() {
        let cipher = cipher();
        let mut x: [u8; BLOCK_LEN] = hex::decode(KEY_HEX).unwrap().try_into().unwrap();
        for _ in 0..1_000_000 {
            x = cipher.encrypt_block(&x);
        }
        assert_eq!(hex::encode(x), "595298c7c6fd271f0402f804c33d3f66");
    }

    #[test]
    fn rejects_bad_key_and_block_lengths() {
        assert!(Sm4::new(&[0u8; 15]).is_err());
        assert!(Sm4::new(&[0u8; 17]).is_err());

        let cipher = cipher();
        assert_eq!(
            cipher.ecb_encrypt(&[0u8; 15]).unwrap_err(),
            GmError::InvalidBlockLength
        );
        assert_eq!(
            cipher.cbc_decrypt(&[0u8; BLOCK_LEN], &[0u8; 20]).unwrap_err(),
            GmError::InvalidBlockLength
        );
        assert_eq!(
            cipher.cbc_decrypt(&[0u8; BLOCK_LEN], &[]).unwrap_err(),
            GmError::InvalidBlockLength
        );
    }

    #[test]
    fn cbc_known_answer() {
        let cipher = cipher();
        let iv: [u8; BLOCK_LEN] = (0u8..16).collect::<Vec<_>>().try_into().unwrap();
        let msg = b"this is sm4 cbc mode test data!";

        let ct = cipher.cbc_encrypt(&iv, msg);
        assert_eq!(
            hex::encode(&ct),
            "c57690bb600b7856dbfda07292657751d28900c3b0f98df7ddbf3b30e7077545"
        );
        assert_eq!(cipher.cbc_decrypt(&iv, &ct).unwrap(), msg);
    }

    #[test]
    fn cbc_round_trips_all_padding_lengths() {
        let cipher = cipher();
        let iv = [0x42u8; BLOCK_LEN];
        let data: Vec<u8> = (0u8..64).collect();

        for len in 0..=data.len() {
            let ct = cipher.cbc_encrypt(&iv, &data[..len]);
            assert_eq!(ct.len() % BLOCK_LEN, 0);
            assert!(!ct.is_empty());
            assert_eq!(cipher.cbc_decrypt(&iv, &ct).unwrap(), &data[..len]);
        }
    }

    #[test]
    fn corrupted_padding_is_rejected() {
        let cipher = cipher();
        let iv = [0u8; BLOCK_LEN];
        let mut ct = cipher.cbc_encrypt(&iv, b"some plaintext");

        let last = ct.len() - 1;
        ct[last] ^= 0x01;
        assert_eq!(cipher.cbc_decrypt(&iv, &ct).unwrap_err(), GmError::Padding);
    }

    #[test]
    fn iv_prepended_round_trip() {
        let key = hex::decode(KEY_HEX).unwrap();
        let mut rng = SystemRandom;
        let msg = b"prepended iv mode";

        let ct = cbc_encrypt_iv_prepended(&key, &mut rng, msg).unwrap();
        assert!(ct.len() >= 2 * BLOCK_LEN);
        assert_eq!(cbc_decrypt_iv_prepended(&key, &ct).unwrap(), msg);

        assert!(cbc_decrypt_iv_prepended(&key, &ct[..BLOCK_LEN]).is_err());
    }

    #[test]
    fn ecb_round_trip_and_structure() {
        let key = hex::decode(KEY_HEX).unwrap();
        let msg = b"ecb pkcs7 mode round trip data";

        let ct = ecb_pkcs7_encrypt(&key, msg).unwrap();
        assert_eq!(ecb_pkcs7_decrypt(&key, &ct).unwrap(), msg);

        // Equal plaintext blocks map to equal ciphertext blocks.
        let cipher = cipher();
        let two = cipher.ecb_encrypt(&[0xabu8; 2 * BLOCK_LEN]).unwrap();
        assert_eq!(two[..BLOCK_LEN], two[BLOCK_LEN..]);
    }

    #[test]
    fn generated_keys_differ() {
        let mut rng = SystemRandom;
        let a = generate_key(&mut rng).unwrap();
        let b = generate_key(&mut rng).unwrap();
        assert_ne!(a, b);
    }
}
