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

//! The SM3 cryptographic hash function (GB/T 32905), producing 256-bit
//! digests over a 512-bit block.

/// Digest length in bytes.
pub const DIGEST_LEN: usize = 32;

/// Internal block length in bytes.
pub const BLOCK_LEN: usize = 64;

const IV: [u32; 8] = [
    0x7380166f, 0x4914b2b9, 0x172442d7, 0xda8a0600, 0xa96f30bc, 0x163138aa, 0xe38dee4d, 0xb0fb0e4e,
];

#[inline(always)]
fn ff0(x: u32, y: u32, z: u32) -> u32 {
    x ^ y ^ z
}

#[inline(always)]
fn ff1(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (x & z) | (y & z)
}

#[inline(always)]
fn gg0(x: u32, y: u32, z: u32) -> u32 {
    x ^ y ^ z
}

#[inline(always)]
fn gg1(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (!x & z)
}

#[inline(always)]
fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

#[inline(always)]
fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

fn compress(state: &mut [u32; 8], block: &[u8; BLOCK_LEN]) {
    let mut w = [0u32; 68];
    let mut w1 = [0u32; 64];

    for i in 0..16 {
        w[i] = u32::from_be_bytes([
            block[4 * i],
            block[4 * i + 1],
            block[4 * i + 2],
            block[4 * i + 3],
        ]);
    }
    for i in 16..68 {
        w[i] = p1(w[i - 16] ^ w[i - 9] ^ w[i - 3].rotate_left(15))
            ^ w[i - 13].rotate_left(7)
            ^ w[i - 6];
    }
    for i in 0..64 {
        w1[i] = w[i] ^ w[i + 4];
    }

    let mut a = state[0];
    let mut b = state[1];
    let mut c = state[2];
    let mut d = state[3];
    let mut e = state[4];
    let mut f = state[5];
    let mut g = state[6];
    let mut h = state[7];

    for i in 0..16 {
        let ss1 = a
            .rotate_left(12)
            .wrapping_add(e)
            .wrapping_add(0x79cc4519u32.rotate_left(i as u32))
            .rotate_left(7);
        let ss2 = ss1 ^ a.rotate_left(12);
        let tt1 = ff0(a, b, c)
            .wrapping_add(d)
            .wrapping_add(ss2)
            .wrapping_add(w1[i]);
        let tt2 = gg0(e, f, g)
            .wrapping_add(h)
            .wrapping_add(ss1)
            .wrapping_add(w[i]);
        d = c;
        c = b.rotate_left(9);
        b = a;
        a = tt1;
        h = g;
        g = f.rotate_left(19);
        f = e;
        e = p0(tt2);
    }

    for i in 16..64 {
        let ss1 = a
            .rotate_left(12)
            .wrapping_add(e)
            .wrapping_add(0x7a879d8au32.rotate_left(i as u32 % 32))
            .rotate_left(7);
        let ss2 = ss1 ^ a.rotate_left(12);
        let tt1 = ff1(a, b, c)
            .wrapping_add(d)
            .wrapping_add(ss2)
            .wrapping_add(w1[i]);
        let tt2 = gg1(e, f, g)
            .wrapping_add(h)
            .wrapping_add(ss1)
            .wrapping_add(w[i]);
        d = c;
        c = b.rotate_left(9);
        b = a;
        a = tt1;
        h = g;
        g = f.rotate_left(19);
        f = e;
        e = p0(tt2);
    }

    state[0] ^= a;
    state[1] ^= b;
    state[2] ^= c;
    state[3] ^= d;
    state[4] ^= e;
    state[5] ^= f;
    state[6] ^= g;
    state[7] ^= h;
}

/// Streaming SM3 context.
///
/// `finish` borrows the context immutably, so a running hash can be
/// snapshotted and continued afterwards.
#[derive(Clone)]
pub struct Sm3 {
    state: [u32; 8],
    count: u64,
    buffer: [u8; BLOCK_LEN],
    buffer_len: usize,
}

impl Default for Sm3 {
    fn default() -> Self {
        Self::new()
    }
}

impl Sm3 {
    pub fn new() -> Self {
        Sm3 {
            state: IV,
            count: 0,
            buffer: [0; BLOCK_LEN],
            buffer_len: 0,
        }
    }

    /// One-shot digest of `data`.
    pub fn digest(data: &[u8]) -> [u8; DIGEST_LEN] {
        let mut ctx = Sm3::new();
        ctx.update(data);
        ctx.finish()
    }

    pub fn update(&mut self, mut data: &[u8]) {
        self.count = self.count.wrapping_add(data.len() as u64);

        if self.buffer_len > 0 {
            let want = BLOCK_LEN - self.buffer_len;
            let take = want.min(data.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&data[..take]);
            self.buffer_len += take;
            data = &data[take..];

            if self.buffer_len == BLOCK_LEN {
                let block = self.buffer;
                compress(&mut self.state, &block);
                self.buffer_len = 0;
            }
        }

        while data.len() >= BLOCK_LEN {
            let mut block = [0u8; BLOCK_LEN];
            block.copy_from_slice(&data[..BLOCK_LEN]);
            compress(&mut self.state, &block);
            data = &data[BLOCK_LEN..];
        }

        if !data.is_empty() {
            self.buffer[..data.len()].copy_from_slice(data);
            self.buffer_len = data.len();
        }
    }

    /// Pads and returns the digest without consuming the context.
    pub fn finish(&self) -> [u8; DIGEST_LEN] {
        let mut state = self.state;

        let mut tail = [0u8; 2 * BLOCK_LEN];
        tail[..self.buffer_len].copy_from_slice(&self.buffer[..self.buffer_len]);
        tail[self.buffer_len] = 0x80;

        let tail_len = if self.buffer_len < 56 {
            BLOCK_LEN
        } else {
            2 * BLOCK_LEN
        };
        let bit_len = self.count << 3;
        tail[tail_len - 8..tail_len].copy_from_slice(&bit_len.to_be_bytes());

        let mut block = [0u8; BLOCK_LEN];
        block.copy_from_slice(&tail[..BLOCK_LEN]);
        compress(&mut state, &block);
        if tail_len == 2 * BLOCK_LEN {
            block.copy_from_slice(&tail[BLOCK_LEN..]);
            compress(&mut state, &block);
        }

        let mut digest = [0u8; DIGEST_LEN];
        for (i, word) in state.iter().enumerate() {
            digest[4 * i..4 * i + 4].copy_from_slice(&word.to_be_bytes());
        }
        digest
    }

    pub fn reset(&mut self) {
        *self = Sm3::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // GB/T 32905 appendix A example 1.
    #[test]
    fn digest_abc() {
        assert_eq!(
            hex::encode(Sm3::digest(b"abc")),
            "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
        );
    }

    // GB/T 32905 appendix A example 2.
    #[test]
    fn digest_sixteen_abcd() {
        let msg = b"abcd".repeat(16);
        assert_eq!(
            hex::encode(Sm3::digest(&msg)),
            "debe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732"
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(
            hex::encode(Sm3::new().finish()),
            "1ab21d8355cfa17f8e61194831e81a8f22bec8c728fefb747ed035eb5082aa2b"
        );
        assert_eq!(Sm3::new().finish(), Sm3::digest(b""));
    }

    #[test]
    fn split_updates_match_one_shot() {
        let msg: Vec<u8> = (0u8..=255).cycle().take(1000).collect();
        let one_shot = Sm3::digest(&msg);

        for split in [1, 17, 63, 64, 65, 500] {
            let mut ctx = Sm3::new();
            for chunk in msg.chunks(split) {
                ctx.update(chunk);
            }
            assert_eq!(ctx.finish(), one_shot);
        }
    }

    #[test]
    fn finish_does_not_consume() {
        let mut ctx = Sm3::new();
        ctx.update(b"abc");
        let first = ctx.finish();
        let second = ctx.finish();
        assert_eq!(first, second);

        // The context keeps running after a snapshot.
        ctx.update(b"d");
        assert_eq!(ctx.finish(), Sm3::digest(b"abcd"));
    }

    #[test]
    fn reset_restarts_the_stream() {
        let mut ctx = Sm3::new();
        ctx.update(b"junk before reset");
        ctx.reset();
        ctx.update(b"abc");
        assert_eq!(ctx.finish(), Sm3::digest(b"abc"));
    }
}
