//! Presentation byte order for the final digest
//!
//! The last stage leaves its output as little-endian words. Consumers compare
//! digests as 256-bit big-endian numbers, so the 32 bytes are regrouped as
//! four little-endian u64 words and written back in reverse word order, each
//! big-endian. The transform is its own inverse.

use crate::params::DIGEST_SIZE;

const WORDS: usize = DIGEST_SIZE / 8;

/// Native little-endian words -> display (big-endian) order
#[inline]
pub fn to_display_order(native: &[u8; DIGEST_SIZE]) -> [u8; DIGEST_SIZE] {
    let mut words = [0u64; WORDS];
    for (word, bytes) in words.iter_mut().zip(native.chunks_exact(8)) {
        let mut le = [0u8; 8];
        le.copy_from_slice(bytes);
        *word = u64::from_le_bytes(le);
    }

    let mut out = [0u8; DIGEST_SIZE];
    for (bytes, word) in out.chunks_exact_mut(8).zip(words.iter().rev()) {
        bytes.copy_from_slice(&word.to_be_bytes());
    }
    out
}

/// Display order -> native little-endian words
#[inline]
pub fn from_display_order(display: &[u8; DIGEST_SIZE]) -> [u8; DIGEST_SIZE] {
    let mut words = [0u64; WORDS];
    for (word, bytes) in words.iter_mut().rev().zip(display.chunks_exact(8)) {
        let mut be = [0u8; 8];
        be.copy_from_slice(bytes);
        *word = u64::from_be_bytes(be);
    }

    let mut out = [0u8; DIGEST_SIZE];
    for (bytes, word) in out.chunks_exact_mut(8).zip(words) {
        bytes.copy_from_slice(&word.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting() -> [u8; DIGEST_SIZE] {
        core::array::from_fn(|i| i as u8)
    }

    #[test]
    fn display_order_reverses_bytes() {
        let native = counting();
        let display = to_display_order(&native);
        let mut reversed = native;
        reversed.reverse();
        assert_eq!(display, reversed);
    }

    #[test]
    fn round_trip() {
        let native = counting();
        assert_eq!(from_display_order(&to_display_order(&native)), native);
        assert_eq!(to_display_order(&from_display_order(&native)), native);
    }

    #[test]
    fn first_native_byte_lands_last() {
        let mut native = [0u8; DIGEST_SIZE];
        native[0] = 0x01;
        let display = to_display_order(&native);
        assert_eq!(display[DIGEST_SIZE - 1], 0x01);
        assert!(display[..DIGEST_SIZE - 1].iter().all(|&b| b == 0));
    }
}
