//! RustCrypto-backed stages
//!
//! Seven of the sixteen external primitives have maintained RustCrypto
//! implementations with a 64-byte output. They are wrapped in
//! [`DigestStage`] and offered together with the built-in HAVAL engine.
//! The remaining stages have no digest-0.10 crate and are listed in
//! [`EXTERNAL_STAGES`]; pair this provider with one that covers them.

use digest::consts::U64;
use groestl::Groestl512;
use jh::Jh512;
use sha2::Sha512;
use sha3::Keccak512;
use shabal::Shabal512;
use skein::Skein512;
use whirlpool::Whirlpool;

use crate::algorithm::{
    BoxedPrimitive, DigestStage, Error, Haval256, PrimitiveProvider, StageId, X17,
};

/// Stages [`RustCryptoPrimitives`] cannot supply, in pipeline order
pub const EXTERNAL_STAGES: [StageId; 9] = [
    StageId::Blake512,
    StageId::Bmw512,
    StageId::Luffa512,
    StageId::CubeHash512,
    StageId::Shavite512,
    StageId::Simd512,
    StageId::Echo512,
    StageId::Hamsi512,
    StageId::Fugue512,
];

/// Groestl, Skein, JH, Keccak, Shabal, Whirlpool, SHA-512 and HAVAL-256/5
#[derive(Clone, Copy, Debug, Default)]
pub struct RustCryptoPrimitives;

impl PrimitiveProvider for RustCryptoPrimitives {
    fn provide(&self, stage: StageId) -> Option<BoxedPrimitive> {
        let primitive: BoxedPrimitive = match stage {
            StageId::Groestl512 => DigestStage::<Groestl512>::boxed(),
            StageId::Skein512 => DigestStage::<Skein512<U64>>::boxed(),
            StageId::Jh512 => DigestStage::<Jh512>::boxed(),
            StageId::Keccak512 => DigestStage::<Keccak512>::boxed(),
            StageId::Shabal512 => DigestStage::<Shabal512>::boxed(),
            StageId::Whirlpool => DigestStage::<Whirlpool>::boxed(),
            StageId::Sha512 => DigestStage::<Sha512>::boxed(),
            StageId::Haval256 => Box::new(Haval256::new()),
            _ => return None,
        };
        Some(primitive)
    }
}

/// Build a pipeline from the RustCrypto stages plus `external`
///
/// `external` is consulted only for stages the RustCrypto set does not
/// cover.
pub fn pipeline<E: PrimitiveProvider>(external: E) -> Result<X17, Error> {
    X17::from_provider(&(RustCryptoPrimitives, external))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{from_fn, HashPrimitive, STAGES};
    use digest::Digest;

    fn finalize_64(primitive: &mut BoxedPrimitive, data: &[u8]) -> [u8; 64] {
        let mut out = [0u8; 64];
        primitive.ingest(data);
        primitive.finalize(&mut out);
        out
    }

    #[test]
    fn test_stage_widths_match_table() {
        assert_eq!(DigestStage::<Groestl512>::output_len(), StageId::Groestl512.output_len());
        assert_eq!(DigestStage::<Skein512<U64>>::output_len(), StageId::Skein512.output_len());
        assert_eq!(DigestStage::<Jh512>::output_len(), StageId::Jh512.output_len());
        assert_eq!(DigestStage::<Keccak512>::output_len(), StageId::Keccak512.output_len());
        assert_eq!(DigestStage::<Shabal512>::output_len(), StageId::Shabal512.output_len());
        assert_eq!(DigestStage::<Whirlpool>::output_len(), StageId::Whirlpool.output_len());
        assert_eq!(DigestStage::<Sha512>::output_len(), StageId::Sha512.output_len());
    }

    #[test]
    fn test_covers_everything_but_external() {
        for stage in STAGES.iter().map(|s| s.id) {
            let provided = RustCryptoPrimitives.provide(stage).is_some();
            assert_eq!(provided, !EXTERNAL_STAGES.contains(&stage), "{stage}");
        }
    }

    #[test]
    fn test_missing_stages_reported() {
        let err = X17::from_provider(&RustCryptoPrimitives).unwrap_err();
        assert_eq!(err, Error::MissingPrimitives(EXTERNAL_STAGES.to_vec()));
    }

    #[test]
    fn test_adapters_match_direct_hashers() {
        let data = b"The quick brown fox jumps over the lazy dog";

        let mut keccak = RustCryptoPrimitives.provide(StageId::Keccak512).unwrap();
        assert_eq!(finalize_64(&mut keccak, data)[..], Keccak512::digest(data)[..]);

        let mut sha = RustCryptoPrimitives.provide(StageId::Sha512).unwrap();
        assert_eq!(finalize_64(&mut sha, data)[..], Sha512::digest(data)[..]);

        let mut whirlpool = RustCryptoPrimitives.provide(StageId::Whirlpool).unwrap();
        assert_eq!(finalize_64(&mut whirlpool, data)[..], Whirlpool::digest(data)[..]);
    }

    #[test]
    fn test_adapter_resets_after_finalize() {
        let mut groestl = RustCryptoPrimitives.provide(StageId::Groestl512).unwrap();
        let first = finalize_64(&mut groestl, b"abc");
        let second = finalize_64(&mut groestl, b"abc");
        assert_eq!(first, second);
        assert_eq!(first[..], Groestl512::digest(b"abc")[..]);
    }

    #[test]
    fn test_haval_is_builtin() {
        let mut haval = RustCryptoPrimitives.provide(StageId::Haval256).unwrap();
        let mut out = [0u8; 32];
        haval.finalize(&mut out);
        assert_eq!(out, crate::algorithm::HAVAL256_5_EMPTY);
    }

    #[test]
    fn test_pipeline_consults_external_only_for_gaps() {
        let asked = std::sync::Mutex::new(Vec::new());
        let external = from_fn(|stage| {
            asked.lock().unwrap().push(stage);
            Some(DigestStage::<Sha512>::boxed())
        });

        let mut x17 = pipeline(&external).unwrap();
        assert_eq!(*asked.lock().unwrap(), EXTERNAL_STAGES.to_vec());
        assert_eq!(x17.hash(b"abc"), x17.hash(b"abc"));
    }
}
