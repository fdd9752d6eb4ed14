//! X17 Pipeline Orchestrator
//!
//! Seventeen primitives run back to back. Each stage reads the previous
//! stage's output from one scratch buffer and finalizes into the other, so a
//! hash touches no memory beyond two 64-byte arrays and the primitives'
//! own state. Stage order and sizing come from [`STAGES`]; the loop below
//! knows nothing about which concrete primitives are plugged in.

use alloc::vec::Vec;
use core::fmt;

use tracing::{debug, warn};

use crate::byte_order::to_display_order;
use crate::error::Error;
use crate::params::*;
use crate::primitives::{BoxedPrimitive, PrimitiveProvider};

/// X17 hasher
///
/// Owns one instance of every primitive plus the scratch pair, and reuses
/// them across calls. Independent instances share nothing, so one per thread
/// is the intended way to hash in parallel.
pub struct X17 {
    /// One primitive per entry of `STAGES`, same order
    primitives: Vec<BoxedPrimitive>,
    /// Alternating stage outputs
    scratch: [[u8; SCRATCH_SIZE]; 2],
}

impl X17 {
    /// Resolve every stage through `provider`.
    ///
    /// Fails with [`Error::MissingPrimitives`] naming all stages the provider
    /// could not supply.
    pub fn from_provider<P: PrimitiveProvider + ?Sized>(provider: &P) -> Result<Self, Error> {
        let mut primitives = Vec::with_capacity(STAGE_COUNT);
        let mut missing = Vec::new();

        for (position, stage) in STAGES.iter().enumerate() {
            match provider.provide(stage.id) {
                Some(primitive) => {
                    debug!(stage = %stage.id, position, "resolved x17 primitive");
                    primitives.push(primitive);
                }
                None => missing.push(stage.id),
            }
        }

        if !missing.is_empty() {
            warn!(missing = missing.len(), "x17 pipeline is incomplete");
            return Err(Error::MissingPrimitives(missing));
        }

        Ok(Self {
            primitives,
            scratch: [[0u8; SCRATCH_SIZE]; 2],
        })
    }

    /// Compute the X17 digest of `input`, in display byte order.
    pub fn hash(&mut self, input: &[u8]) -> [u8; DIGEST_SIZE] {
        for (index, (stage, primitive)) in STAGES.iter().zip(self.primitives.iter_mut()).enumerate()
        {
            let [even, odd] = &mut self.scratch;
            let (previous, next) = if index % 2 == 0 {
                (&*odd, even)
            } else {
                (&*even, odd)
            };

            let data = match stage.input_len {
                None => input,
                Some(len) => &previous[..len],
            };

            // Bytes a narrow primitive leaves unwritten read as zero downstream
            let out = &mut next[..stage.output_len];
            out.fill(0);

            primitive.ingest(data);
            primitive.finalize(out);
        }

        let mut native = [0u8; DIGEST_SIZE];
        native.copy_from_slice(&self.scratch[(STAGE_COUNT - 1) % 2][..DIGEST_SIZE]);

        for buffer in &mut self.scratch {
            buffer.fill(0);
        }

        to_display_order(&native)
    }
}

impl fmt::Debug for X17 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("X17")
            .field("stages", &STAGES.map(|stage| stage.id.name()))
            .finish_non_exhaustive()
    }
}

/// Single-shot hashing with a throwaway pipeline
///
/// For repeated hashing build an [`X17`] once and reuse it.
pub fn hash_with<P: PrimitiveProvider + ?Sized>(
    provider: &P,
    input: &[u8],
) -> Result<[u8; DIGEST_SIZE], Error> {
    Ok(X17::from_provider(provider)?.hash(input))
}

/// Check if a hash meets the required difficulty
///
/// Difficulty is measured as the number of leading zero bits of the digest
/// in display order. For example, difficulty 16 requires the first 2 bytes
/// to be zero.
///
/// # Example
///
/// ```rust
/// use x17_core::meets_difficulty;
///
/// let hash: [u8; 32] = [
///     0x00, 0x00, 0x0F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
///     0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
///     0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
///     0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
/// ];
/// assert!(meets_difficulty(&hash, 20));
/// assert!(!meets_difficulty(&hash, 21));
/// ```
#[inline(always)]
pub fn meets_difficulty(hash: &[u8; DIGEST_SIZE], difficulty: u32) -> bool {
    let mut zero_bits = 0u32;

    for byte in hash.iter() {
        if *byte == 0 {
            zero_bits += 8;
        } else {
            zero_bits += byte.leading_zeros();
            break;
        }
    }

    zero_bits >= difficulty
}

/// Check a hash against a 256-bit target, both big-endian
///
/// A hash is valid when it is numerically less than or equal to the target.
#[inline(always)]
pub fn meets_target(hash: &[u8; DIGEST_SIZE], target: &[u8; DIGEST_SIZE]) -> bool {
    hash <= target
}
