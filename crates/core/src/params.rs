//! X17 Pipeline Parameters
//!
//! The stage order and per-stage sizing are part of the consensus protocol.
//! Changing anything in [`STAGES`] changes every digest.

use core::fmt;

/// Number of chained primitives
pub const STAGE_COUNT: usize = 17;

/// Size of each scratch buffer (largest stage output)
pub const SCRATCH_SIZE: usize = 64;

/// Final digest size in bytes
pub const DIGEST_SIZE: usize = 32;

/// Wide (512-bit) stage output
pub const WIDE_OUTPUT: usize = 64;

/// HAVAL block size in bytes
pub const HAVAL_BLOCK_SIZE: usize = 128;

/// HAVAL-256 output size in bytes
pub const HAVAL_OUTPUT_SIZE: usize = 32;

/// HAVAL format version written into the padding block
pub const HAVAL_VERSION: u8 = 1;

/// Identifies one primitive of the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageId {
    Blake512,
    Bmw512,
    Groestl512,
    Skein512,
    Jh512,
    Keccak512,
    Luffa512,
    CubeHash512,
    Shavite512,
    Simd512,
    Echo512,
    Hamsi512,
    Fugue512,
    Shabal512,
    Whirlpool,
    Sha512,
    Haval256,
}

impl StageId {
    /// Human-readable primitive name
    pub const fn name(self) -> &'static str {
        match self {
            StageId::Blake512 => "BLAKE-512",
            StageId::Bmw512 => "BMW-512",
            StageId::Groestl512 => "Groestl-512",
            StageId::Skein512 => "Skein-512",
            StageId::Jh512 => "JH-512",
            StageId::Keccak512 => "Keccak-512",
            StageId::Luffa512 => "Luffa-512",
            StageId::CubeHash512 => "CubeHash-512",
            StageId::Shavite512 => "SHAvite-512",
            StageId::Simd512 => "SIMD-512",
            StageId::Echo512 => "ECHO-512",
            StageId::Hamsi512 => "Hamsi-512",
            StageId::Fugue512 => "Fugue-512",
            StageId::Shabal512 => "Shabal-512",
            StageId::Whirlpool => "Whirlpool",
            StageId::Sha512 => "SHA-512",
            StageId::Haval256 => "HAVAL-256/5",
        }
    }

    /// Fixed digest length this primitive produces
    pub const fn output_len(self) -> usize {
        match self {
            StageId::Haval256 => HAVAL_OUTPUT_SIZE,
            _ => WIDE_OUTPUT,
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of one pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageDescriptor {
    pub id: StageId,
    /// Bytes consumed; `None` for the first stage, which takes the caller's input
    pub input_len: Option<usize>,
    /// Bytes produced into the scratch buffer
    pub output_len: usize,
}

impl StageDescriptor {
    const fn first(id: StageId) -> Self {
        Self {
            id,
            input_len: None,
            output_len: id.output_len(),
        }
    }

    const fn chained(id: StageId) -> Self {
        Self {
            id,
            input_len: Some(WIDE_OUTPUT),
            output_len: id.output_len(),
        }
    }
}

/// The seventeen stages, in protocol order.
pub const STAGES: [StageDescriptor; STAGE_COUNT] = [
    StageDescriptor::first(StageId::Blake512),
    StageDescriptor::chained(StageId::Bmw512),
    StageDescriptor::chained(StageId::Groestl512),
    StageDescriptor::chained(StageId::Skein512),
    StageDescriptor::chained(StageId::Jh512),
    StageDescriptor::chained(StageId::Keccak512),
    StageDescriptor::chained(StageId::Luffa512),
    StageDescriptor::chained(StageId::CubeHash512),
    StageDescriptor::chained(StageId::Shavite512),
    StageDescriptor::chained(StageId::Simd512),
    StageDescriptor::chained(StageId::Echo512),
    StageDescriptor::chained(StageId::Hamsi512),
    StageDescriptor::chained(StageId::Fugue512),
    StageDescriptor::chained(StageId::Shabal512),
    StageDescriptor::chained(StageId::Whirlpool),
    StageDescriptor::chained(StageId::Sha512),
    StageDescriptor::chained(StageId::Haval256),
];

/// HAVAL-256/5 of the empty message
/// (`be417bb4dd5cfb76c7126f4f8eeb1553a449039307b1a3cd451dbfdc0fbbe330`)
pub const HAVAL256_5_EMPTY: [u8; HAVAL_OUTPUT_SIZE] = [
    0xbe, 0x41, 0x7b, 0xb4, 0xdd, 0x5c, 0xfb, 0x76, 0xc7, 0x12, 0x6f, 0x4f, 0x8e, 0xeb, 0x15,
    0x53, 0xa4, 0x49, 0x03, 0x93, 0x07, 0xb1, 0xa3, 0xcd, 0x45, 0x1d, 0xbf, 0xdc, 0x0f, 0xbb,
    0xe3, 0x30,
];

/// Published X17 digests (after byte-order adaptation)
pub const REFERENCE_VECTORS: [(&[u8], &str); 3] = [
    (
        b"",
        "6db4782561b9d204ab5cafed83175a8198bb65e48722ffb997b36a13fc5fbe33",
    ),
    (
        b"DASH",
        "917b3ee1904c019af5319f70c197a449711c9303d26bb942a5b2d1df71160b5f",
    ),
    (
        b"The quick brown fox jumps over the lazy dog",
        "fe8b334eaa56ddf2d29df1861f163af7241cf151d96e51d9ebd5f66b65661ae7",
    ),
];
