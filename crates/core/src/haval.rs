//! HAVAL-256 multi-pass digest
//!
//! The only primitive of the chain implemented here rather than supplied by a
//! provider. A 1024-bit block is folded into eight 32-bit words by 3, 4 or 5
//! passes of 32 steps each, followed by a feed-forward into the chaining
//! state. The pipeline always runs five passes.
//!
//! Every pass is table driven:
//! - `WORD_ORDER[pass]` picks the message word consumed at each step
//! - `ROUND_CONSTANTS[pass]` is added at each step (all zero for pass 1)
//! - `OPERANDS[passes][pass]` permutes the seven working variables fed to the
//!   pass boolean function, and differs per pass count

use crate::params::{HAVAL_BLOCK_SIZE, HAVAL_OUTPUT_SIZE, HAVAL_VERSION, HAVAL256_5_EMPTY};
use crate::primitives::HashPrimitive;

/// Output length in bits, as recorded in the padding block
const OUTPUT_BITS: usize = HAVAL_OUTPUT_SIZE * 8;

/// Padding ends at this offset within a block; the last 10 bytes carry the trailer
const TRAILER_OFFSET: usize = 118;

/// Longest message whose bit length still fits the 64-bit trailer field
const MAX_MESSAGE_BYTES: u64 = u64::MAX >> 3;

/// Fractional part of pi, the first eight words
const INITIAL_STATE: [u32; 8] = [
    0x243F6A88, 0x85A308D3, 0x13198A2E, 0x03707344, 0xA4093822, 0x299F31D0, 0x082EFA98, 0xEC4E6C89,
];

const WORD_ORDER: [[u8; 32]; 5] = [
    [
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
        25, 26, 27, 28, 29, 30, 31,
    ],
    [
        5, 14, 26, 18, 11, 28, 7, 16, 0, 23, 20, 22, 1, 10, 4, 8, 30, 3, 21, 9, 17, 24, 29, 6, 19,
        12, 15, 13, 2, 25, 31, 27,
    ],
    [
        19, 9, 4, 20, 28, 17, 8, 22, 29, 14, 25, 12, 24, 30, 16, 26, 31, 15, 7, 3, 1, 0, 18, 27,
        13, 6, 21, 10, 23, 11, 5, 2,
    ],
    [
        24, 4, 0, 14, 2, 7, 28, 23, 26, 6, 30, 20, 18, 25, 19, 3, 22, 11, 31, 21, 8, 27, 12, 9, 1,
        29, 5, 15, 17, 10, 16, 13,
    ],
    [
        27, 3, 21, 26, 17, 11, 20, 29, 19, 0, 12, 7, 13, 8, 31, 10, 5, 9, 14, 30, 18, 6, 28, 24, 2,
        23, 16, 22, 4, 1, 25, 15,
    ],
];

/// Continuation of the pi words after `INITIAL_STATE`, 32 per pass
const ROUND_CONSTANTS: [[u32; 32]; 5] = [
    [0; 32],
    [
        0x452821E6, 0x38D01377, 0xBE5466CF, 0x34E90C6C, 0xC0AC29B7, 0xC97C50DD, 0x3F84D5B5,
        0xB5470917, 0x9216D5D9, 0x8979FB1B, 0xD1310BA6, 0x98DFB5AC, 0x2FFD72DB, 0xD01ADFB7,
        0xB8E1AFED, 0x6A267E96, 0xBA7C9045, 0xF12C7F99, 0x24A19947, 0xB3916CF7, 0x0801F2E2,
        0x858EFC16, 0x636920D8, 0x71574E69, 0xA458FEA3, 0xF4933D7E, 0x0D95748F, 0x728EB658,
        0x718BCD58, 0x82154AEE, 0x7B54A41D, 0xC25A59B5,
    ],
    [
        0x9C30D539, 0x2AF26013, 0xC5D1B023, 0x286085F0, 0xCA417918, 0xB8DB38EF, 0x8E79DCB0,
        0x603A180E, 0x6C9E0E8B, 0xB01E8A3E, 0xD71577C1, 0xBD314B27, 0x78AF2FDA, 0x55605C60,
        0xE65525F3, 0xAA55AB94, 0x57489862, 0x63E81440, 0x55CA396A, 0x2AAB10B6, 0xB4CC5C34,
        0x1141E8CE, 0xA15486AF, 0x7C72E993, 0xB3EE1411, 0x636FBC2A, 0x2BA9C55D, 0x741831F6,
        0xCE5C3E16, 0x9B87931E, 0xAFD6BA33, 0x6C24CF5C,
    ],
    [
        0x7A325381, 0x28958677, 0x3B8F4898, 0x6B4BB9AF, 0xC4BFE81B, 0x66282193, 0x61D809CC,
        0xFB21A991, 0x487CAC60, 0x5DEC8032, 0xEF845D5D, 0xE98575B1, 0xDC262302, 0xEB651B88,
        0x23893E81, 0xD396ACC5, 0x0F6D6FF3, 0x83F44239, 0x2E0B4482, 0xA4842004, 0x69C8F04A,
        0x9E1F9B5E, 0x21C66842, 0xF6E96C9A, 0x670C9C61, 0xABD388F0, 0x6A51A0D2, 0xD8542F68,
        0x960FA728, 0xAB5133A3, 0x6EEF0B6C, 0x137A3BE4,
    ],
    [
        0xBA3BF050, 0x7EFB2A98, 0xA1F1651D, 0x39AF0176, 0x66CA593E, 0x82430E88, 0x8CEE8619,
        0x456F9FB4, 0x7D84A5C3, 0x3B8B5EBE, 0xE06F75D8, 0x85C12073, 0x401A449F, 0x56C16AA6,
        0x4ED3AA62, 0x363F7706, 0x1BFEDF72, 0x429B023D, 0x37D0D724, 0xD00A1248, 0xDB0FEAD3,
        0x49F1C09B, 0x075372C9, 0x80991B7B, 0x25D479D8, 0xF6E8DEF7, 0xE3FE501A, 0xB6794C3B,
        0x976CE0BD, 0x04C006BA, 0xC1A94FB6, 0x409F60C4,
    ],
];

/// Unused slot for pass counts that stop early
const UNUSED: [u8; 7] = [6, 5, 4, 3, 2, 1, 0];

/// Operand permutation per (pass count, pass).
///
/// Each row lists, for boolean-function parameters `x6..x0` in that order,
/// which working variable `x0..x6` is passed in.
const OPERANDS: [[[u8; 7]; 5]; 3] = [
    // 3 passes
    [
        [1, 0, 3, 5, 6, 2, 4],
        [4, 2, 1, 0, 5, 3, 6],
        [6, 1, 2, 3, 4, 5, 0],
        UNUSED,
        UNUSED,
    ],
    // 4 passes
    [
        [2, 6, 1, 4, 5, 3, 0],
        [3, 5, 2, 0, 1, 6, 4],
        [1, 4, 3, 6, 0, 2, 5],
        [6, 4, 0, 5, 2, 1, 3],
        UNUSED,
    ],
    // 5 passes
    [
        [3, 4, 1, 0, 5, 2, 6],
        [6, 2, 1, 0, 3, 4, 5],
        [2, 6, 0, 4, 3, 1, 5],
        [1, 5, 3, 2, 0, 4, 6],
        [2, 5, 0, 6, 4, 3, 1],
    ],
];

/// Number of passes applied per block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Passes {
    Three = 3,
    Four = 4,
    #[default]
    Five = 5,
}

impl Passes {
    pub const fn count(self) -> usize {
        self as usize
    }

    const fn table(self) -> usize {
        self as usize - 3
    }
}

/// HAVAL-256 hasher state
///
/// Reusable: `finalize` leaves the instance in its freshly constructed state.
#[derive(Clone)]
pub struct Haval256 {
    state: [u32; 8],
    buffer: [u8; HAVAL_BLOCK_SIZE],
    /// Total bytes ingested since the last reset
    count: u64,
    passes: Passes,
}

impl Haval256 {
    /// HAVAL-256 with five passes, the configuration used by the chain
    pub fn new() -> Self {
        Self::with_passes(Passes::Five)
    }

    pub fn with_passes(passes: Passes) -> Self {
        Self {
            state: INITIAL_STATE,
            buffer: [0u8; HAVAL_BLOCK_SIZE],
            count: 0,
            passes,
        }
    }

    pub fn passes(&self) -> Passes {
        self.passes
    }

    /// Absorb more message bytes
    pub fn update(&mut self, mut data: &[u8]) {
        let pending = self.pending();
        self.count += data.len() as u64;

        if pending > 0 {
            let take = (HAVAL_BLOCK_SIZE - pending).min(data.len());
            self.buffer[pending..pending + take].copy_from_slice(&data[..take]);
            data = &data[take..];
            if pending + take < HAVAL_BLOCK_SIZE {
                return;
            }
            compress(&mut self.state, self.passes, &self.buffer);
        }

        while let Some((block, rest)) = data.split_first_chunk::<HAVAL_BLOCK_SIZE>() {
            compress(&mut self.state, self.passes, block);
            data = rest;
        }

        self.buffer[..data.len()].copy_from_slice(data);
    }

    /// Pad, write the 32-byte digest and reset
    pub fn finalize_reset(&mut self) -> [u8; HAVAL_OUTPUT_SIZE] {
        let mut out = [0u8; HAVAL_OUTPUT_SIZE];
        self.finalize_into_slice(&mut out);
        out
    }

    /// Return to the initial state, keeping the pass count
    pub fn reset(&mut self) {
        self.state = INITIAL_STATE;
        self.buffer = [0u8; HAVAL_BLOCK_SIZE];
        self.count = 0;
    }

    /// Bytes waiting in the block buffer
    #[inline(always)]
    fn pending(&self) -> usize {
        (self.count % HAVAL_BLOCK_SIZE as u64) as usize
    }

    fn finalize_into_slice(&mut self, dst: &mut [u8]) {
        assert!(
            dst.len() >= HAVAL_OUTPUT_SIZE,
            "HAVAL-256 output buffer holds {} bytes, needs {}",
            dst.len(),
            HAVAL_OUTPUT_SIZE
        );
        assert!(
            self.count <= MAX_MESSAGE_BYTES,
            "HAVAL-256 message bit length overflows 64 bits"
        );

        let mut tail = [0u8; 2 * HAVAL_BLOCK_SIZE];
        let len = self.write_padding(&mut tail);
        self.update(&tail[..len]);

        for (chunk, word) in dst[..HAVAL_OUTPUT_SIZE].chunks_exact_mut(4).zip(self.state) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }

        self.reset();
    }

    /// Build the padding tail for the current message; returns its length
    fn write_padding(&self, tail: &mut [u8; 2 * HAVAL_BLOCK_SIZE]) -> usize {
        let fill = padding_len(self.pending());
        let bits = self.count << 3;

        tail[0] = 0x01;
        tail[fill] = (((OUTPUT_BITS & 0x03) << 6) as u8)
            | (((self.passes.count() & 0x07) as u8) << 3)
            | (HAVAL_VERSION & 0x07);
        tail[fill + 1] = (OUTPUT_BITS >> 2) as u8;
        tail[fill + 2..fill + 10].copy_from_slice(&bits.to_le_bytes());

        fill + 10
    }
}

impl Default for Haval256 {
    fn default() -> Self {
        Self::new()
    }
}

impl HashPrimitive for Haval256 {
    #[inline]
    fn ingest(&mut self, data: &[u8]) {
        self.update(data);
    }

    #[inline]
    fn finalize(&mut self, dst: &mut [u8]) {
        self.finalize_into_slice(dst);
    }
}

/// Bytes of `0x01 00..` fill needed so `pending + fill` lands on 118 mod 128
#[inline(always)]
pub(crate) fn padding_len(pending: usize) -> usize {
    if pending < TRAILER_OFFSET {
        TRAILER_OFFSET - pending
    } else {
        TRAILER_OFFSET + HAVAL_BLOCK_SIZE - pending
    }
}

/// One-shot HAVAL-256/5
pub fn haval256_5(data: &[u8]) -> [u8; HAVAL_OUTPUT_SIZE] {
    let mut hasher = Haval256::new();
    hasher.update(data);
    hasher.finalize_reset()
}

/// Check the engine against the published empty-message digest
pub fn self_test() -> bool {
    haval256_5(&[]) == HAVAL256_5_EMPTY
}

/// Compress one block into the chaining state
#[inline(always)]
fn compress(state: &mut [u32; 8], passes: Passes, block: &[u8; HAVAL_BLOCK_SIZE]) {
    let mut w = [0u32; 32];
    for (word, bytes) in w.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    let mut t = *state;
    let operands = &OPERANDS[passes.table()];

    for pass in 0..passes.count() {
        let order = &WORD_ORDER[pass];
        let constants = &ROUND_CONSTANTS[pass];
        let phi = &operands[pass];

        for step in 0..32 {
            // Target walks t7, t6, .., t0 and wraps every eight steps;
            // operand x_k sits k + 1 positions after it.
            let target = 7 - (step & 7);

            let mut x = [0u32; 7];
            for (param, &source) in phi.iter().enumerate() {
                x[6 - param] = t[(target + source as usize + 1) & 7];
            }

            let f = boolean(pass, &x);
            t[target] = f
                .rotate_right(7)
                .wrapping_add(t[target].rotate_right(11))
                .wrapping_add(w[order[step] as usize])
                .wrapping_add(constants[step]);
        }
    }

    for (h, v) in state.iter_mut().zip(t) {
        *h = h.wrapping_add(v);
    }
}

/// Pass boolean functions F1..F5; `x[k]` is parameter `x_k`
#[inline(always)]
fn boolean(pass: usize, x: &[u32; 7]) -> u32 {
    let [x0, x1, x2, x3, x4, x5, x6] = *x;
    match pass {
        0 => x1 & (x0 ^ x4) ^ x2 & x5 ^ x3 & x6 ^ x0,
        1 => x2 & (x1 & !x3 ^ x4 & x5 ^ x6 ^ x0) ^ x4 & (x1 ^ x5) ^ x3 & x5 ^ x0,
        2 => x3 & (x1 & x2 ^ x6 ^ x0) ^ x1 & x4 ^ x2 & x5 ^ x0,
        3 => x4 & (x5 & !x2 ^ x3 & !x6 ^ x1 ^ x6 ^ x0) ^ x3 & (x1 & x2 ^ x5 ^ x6) ^ x2 & x6 ^ x0,
        _ => x0 & (x1 & x2 & x3 ^ !x5) ^ x1 & x4 ^ x2 & x5 ^ x3 & x6,
    }
}

#[cfg(feature = "digest")]
mod digest_impl {
    use super::Haval256;
    use digest::consts::U32;
    use digest::{FixedOutput, FixedOutputReset, HashMarker, Output, OutputSizeUser, Reset, Update};

    impl HashMarker for Haval256 {}

    impl OutputSizeUser for Haval256 {
        type OutputSize = U32;
    }

    impl Update for Haval256 {
        fn update(&mut self, data: &[u8]) {
            Haval256::update(self, data);
        }
    }

    impl FixedOutput for Haval256 {
        fn finalize_into(mut self, out: &mut Output<Self>) {
            self.finalize_into_slice(out);
        }
    }

    impl FixedOutputReset for Haval256 {
        fn finalize_into_reset(&mut self, out: &mut Output<Self>) {
            self.finalize_into_slice(out);
        }
    }

    impl Reset for Haval256 {
        fn reset(&mut self) {
            Haval256::reset(self);
        }
    }
}
