//! Nonce search and batch hashing
//!
//! A candidate is the caller's header followed by the nonce as 8
//! little-endian bytes. The sequential search owns one [`X17`]; the parallel
//! variants build one pipeline per rayon worker from a shared provider, since
//! a pipeline is mutable state and never crosses threads while hashing.

use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::algorithm::{meets_difficulty, Error, PrimitiveProvider, DIGEST_SIZE, X17};

/// Size of the nonce appended to the header
pub const NONCE_SIZE: usize = 8;

/// A nonce whose digest met the difficulty
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    pub nonce: u64,
    /// Digest in display order
    pub hash: [u8; DIGEST_SIZE],
}

impl Solution {
    /// Digest as lowercase hex
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// Header with a trailing nonce slot
struct Candidate {
    bytes: Vec<u8>,
    nonce_at: usize,
}

impl Candidate {
    fn new(header: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(header.len() + NONCE_SIZE);
        bytes.extend_from_slice(header);
        bytes.extend_from_slice(&[0u8; NONCE_SIZE]);
        Self {
            bytes,
            nonce_at: header.len(),
        }
    }

    fn with_nonce(&mut self, nonce: u64) -> &[u8] {
        self.bytes[self.nonce_at..].copy_from_slice(&nonce.to_le_bytes());
        &self.bytes
    }
}

/// Bytes hashed for `nonce` under `header`
pub fn candidate(header: &[u8], nonce: u64) -> Vec<u8> {
    Candidate::new(header).with_nonce(nonce).to_vec()
}

/// Try nonces in ascending order, returning the first that meets `difficulty`
pub fn search_nonce(
    x17: &mut X17,
    header: &[u8],
    nonces: Range<u64>,
    difficulty: u32,
) -> Option<Solution> {
    debug!(start = nonces.start, end = nonces.end, difficulty, "searching nonces");

    let mut candidate = Candidate::new(header);
    for nonce in nonces {
        let hash = x17.hash(candidate.with_nonce(nonce));
        if meets_difficulty(&hash, difficulty) {
            let solution = Solution { nonce, hash };
            info!(nonce, hash = %solution.hash_hex(), "found x17 solution");
            return Some(solution);
        }
    }
    None
}

/// Search `nonces` across the rayon pool
///
/// Any qualifying nonce may be returned, not necessarily the smallest. Fails
/// when `provider` cannot build a complete pipeline, including for a worker
/// after the initial check succeeded.
#[cfg(feature = "parallel")]
pub fn par_search_nonce<P>(
    provider: &P,
    header: &[u8],
    nonces: Range<u64>,
    difficulty: u32,
) -> Result<Option<Solution>, Error>
where
    P: PrimitiveProvider + Sync + ?Sized,
{
    X17::from_provider(provider)?;
    debug!(
        start = nonces.start,
        end = nonces.end,
        difficulty,
        threads = rayon::current_num_threads(),
        "searching nonces in parallel"
    );

    let found = nonces
        .into_par_iter()
        .map_init(
            || (X17::from_provider(provider), Candidate::new(header)),
            |(x17, candidate), nonce| -> Result<Option<Solution>, Error> {
                let x17 = x17.as_mut().map_err(|e| e.clone())?;
                let hash = x17.hash(candidate.with_nonce(nonce));
                Ok(meets_difficulty(&hash, difficulty).then_some(Solution { nonce, hash }))
            },
        )
        .find_map_any(Result::transpose)
        .transpose()?;

    if let Some(solution) = &found {
        info!(nonce = solution.nonce, hash = %solution.hash_hex(), "found x17 solution");
    }
    Ok(found)
}

/// Sequential fallback when the `parallel` feature is disabled
#[cfg(not(feature = "parallel"))]
pub fn par_search_nonce<P>(
    provider: &P,
    header: &[u8],
    nonces: Range<u64>,
    difficulty: u32,
) -> Result<Option<Solution>, Error>
where
    P: PrimitiveProvider + Sync + ?Sized,
{
    let mut x17 = X17::from_provider(provider)?;
    Ok(search_nonce(&mut x17, header, nonces, difficulty))
}

/// Hash every input, preserving order
#[cfg(feature = "parallel")]
pub fn hash_batch<P, I>(provider: &P, inputs: &[I]) -> Result<Vec<[u8; DIGEST_SIZE]>, Error>
where
    P: PrimitiveProvider + Sync + ?Sized,
    I: AsRef<[u8]> + Sync,
{
    X17::from_provider(provider)?;
    debug!(inputs = inputs.len(), "hashing batch in parallel");

    inputs
        .par_iter()
        .map_init(
            || X17::from_provider(provider),
            |x17, input| match x17 {
                Ok(x17) => Ok(x17.hash(input.as_ref())),
                Err(e) => Err(e.clone()),
            },
        )
        .collect()
}

/// Sequential fallback when the `parallel` feature is disabled
#[cfg(not(feature = "parallel"))]
pub fn hash_batch<P, I>(provider: &P, inputs: &[I]) -> Result<Vec<[u8; DIGEST_SIZE]>, Error>
where
    P: PrimitiveProvider + Sync + ?Sized,
    I: AsRef<[u8]> + Sync,
{
    let mut x17 = X17::from_provider(provider)?;
    Ok(inputs.iter().map(|input| x17.hash(input.as_ref())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{from_fn, DigestStage};
    use crate::backend::RustCryptoPrimitives;
    use proptest::prelude::*;
    use sha2::Sha512;

    fn stand_ins() -> impl PrimitiveProvider + Sync {
        (
            RustCryptoPrimitives,
            from_fn(|_| Some(DigestStage::<Sha512>::boxed())),
        )
    }

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_candidate_layout() {
        let bytes = candidate(b"header", 0x0102030405060708);
        assert_eq!(&bytes[..6], b"header");
        assert_eq!(&bytes[6..], &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_candidate_slot_is_rewritten() {
        let mut slot = Candidate::new(b"h");
        slot.with_nonce(u64::MAX);
        assert_eq!(slot.with_nonce(1), candidate(b"h", 1).as_slice());
    }

    #[test]
    fn test_zero_difficulty_takes_first_nonce() {
        let mut x17 = X17::from_provider(&stand_ins()).unwrap();
        let solution = search_nonce(&mut x17, b"block", 7..100, 0).unwrap();
        assert_eq!(solution.nonce, 7);
        assert_eq!(solution.hash, x17.hash(&candidate(b"block", 7)));
    }

    #[test]
    fn test_search_finds_valid_nonce() {
        init_logging();
        let mut x17 = X17::from_provider(&stand_ins()).unwrap();
        let solution = search_nonce(&mut x17, b"block", 0..4096, 4).unwrap();

        assert!(meets_difficulty(&solution.hash, 4));
        assert_eq!(solution.hash, x17.hash(&candidate(b"block", solution.nonce)));
        for nonce in 0..solution.nonce {
            assert!(!meets_difficulty(&x17.hash(&candidate(b"block", nonce)), 4));
        }
    }

    #[test]
    fn test_search_exhausts_range() {
        let mut x17 = X17::from_provider(&stand_ins()).unwrap();
        assert_eq!(search_nonce(&mut x17, b"block", 0..8, 256), None);
        assert_eq!(search_nonce(&mut x17, b"block", 5..5, 0), None);
    }

    #[test]
    fn test_par_search_finds_valid_nonce() {
        init_logging();
        let provider = stand_ins();
        let solution = par_search_nonce(&provider, b"block", 0..4096, 4)
            .unwrap()
            .unwrap();

        let mut x17 = X17::from_provider(&provider).unwrap();
        assert!(meets_difficulty(&solution.hash, 4));
        assert_eq!(solution.hash, x17.hash(&candidate(b"block", solution.nonce)));
    }

    #[test]
    fn test_par_search_without_solution() {
        let found = par_search_nonce(&stand_ins(), b"block", 0..16, 256).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_par_search_requires_complete_pipeline() {
        let err = par_search_nonce(&RustCryptoPrimitives, b"block", 0..16, 0).unwrap_err();
        assert!(matches!(err, Error::MissingPrimitives(_)));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_par_search_reports_worker_assembly_failure() {
        use crate::algorithm::STAGE_COUNT;
        use std::sync::atomic::{AtomicUsize, Ordering};

        // Enough primitives for one pipeline, then nothing
        let handed_out = AtomicUsize::new(0);
        let provider = from_fn(|stage| {
            if handed_out.fetch_add(1, Ordering::SeqCst) >= STAGE_COUNT {
                return None;
            }
            RustCryptoPrimitives
                .provide(stage)
                .or_else(|| Some(DigestStage::<Sha512>::boxed()))
        });

        let err = par_search_nonce(&provider, b"block", 0..64, 256).unwrap_err();
        assert!(matches!(err, Error::MissingPrimitives(_)));
    }

    #[test]
    fn test_batch_matches_sequential() {
        let provider = stand_ins();
        let inputs: Vec<Vec<u8>> = (0..64u8).map(|i| vec![i; i as usize]).collect();

        let batch = hash_batch(&provider, &inputs).unwrap();

        let mut x17 = X17::from_provider(&provider).unwrap();
        assert_eq!(batch.len(), inputs.len());
        for (input, hash) in inputs.iter().zip(&batch) {
            assert_eq!(*hash, x17.hash(input));
        }
    }

    #[test]
    fn test_batch_empty_and_incomplete() {
        let empty: [&[u8]; 0] = [];
        assert!(hash_batch(&stand_ins(), &empty).unwrap().is_empty());
        assert!(hash_batch(&RustCryptoPrimitives, &[b"x"]).is_err());
    }

    #[test]
    fn test_solution_hex() {
        let solution = Solution {
            nonce: 1,
            hash: [0xab; DIGEST_SIZE],
        };
        assert_eq!(solution.hash_hex(), "ab".repeat(DIGEST_SIZE));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn batch_preserves_order(inputs in prop::collection::vec(
            prop::collection::vec(any::<u8>(), 0..200),
            0..16,
        )) {
            let provider = stand_ins();
            let batch = hash_batch(&provider, &inputs).unwrap();
            let mut x17 = X17::from_provider(&provider).unwrap();
            let sequential: Vec<_> = inputs.iter().map(|input| x17.hash(input)).collect();
            prop_assert_eq!(batch, sequential);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_solution_serde() {
        let solution = Solution {
            nonce: 42,
            hash: [7; DIGEST_SIZE],
        };
        let json = serde_json::to_string(&solution).unwrap();
        let back: Solution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, solution);
    }
}
