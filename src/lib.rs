//! X17 Hash Library
//!
//! The X17 chained proof-of-work hash with RustCrypto-backed stages,
//! reference-vector verification and nonce search.
//!
//! # Overview
//!
//! [`x17_core`] (re-exported as [`algorithm`]) holds the pipeline, the
//! HAVAL-256 engine and the primitive contract. This crate adds:
//!
//! - **RustCrypto stages**: [`RustCryptoPrimitives`] supplies Groestl, Skein,
//!   JH, Keccak, Shabal, Whirlpool, SHA-512 and HAVAL
//! - **Verification**: [`verify_reference_vectors`] checks a pipeline against
//!   the published digests
//! - **Mining**: [`search_nonce`], [`par_search_nonce`] and [`hash_batch`]
//!
//! # Example
//!
//! ```rust
//! use x17::{backend::EXTERNAL_STAGES, pipeline, Error};
//! use x17::algorithm::from_fn;
//!
//! // BLAKE, BMW, Luffa, CubeHash, SHAvite, SIMD, ECHO, Hamsi and Fugue
//! // must be supplied by the caller
//! match pipeline(from_fn(|_| None)) {
//!     Err(Error::MissingPrimitives(missing)) => assert_eq!(missing, EXTERNAL_STAGES),
//!     _ => unreachable!(),
//! }
//! ```

// Re-export the core algorithm
pub use x17_core as algorithm;

pub mod backend;
pub mod mining;
mod vectors;

// Convenience re-exports
pub use algorithm::{hash_with, meets_difficulty, meets_target, Error, PrimitiveProvider, X17};
pub use backend::{pipeline, RustCryptoPrimitives};
pub use mining::{hash_batch, par_search_nonce, search_nonce, Solution};
pub use vectors::verify_reference_vectors;
