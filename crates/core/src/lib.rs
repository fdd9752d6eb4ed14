//! # X17 Core Algorithm
//!
//! A chained proof-of-work hash: seventeen different 512-bit-class hash
//! functions run in a fixed order, each hashing the previous one's output.
//! Forcing heterogeneous compression functions into one pipeline makes a
//! dedicated ASIC expensive to build.
//!
//! ## Pipeline
//!
//! ```text
//! input -> BLAKE -> BMW -> Groestl -> Skein -> JH -> Keccak -> Luffa
//!       -> CubeHash -> SHAvite -> SIMD -> ECHO -> Hamsi -> Fugue
//!       -> Shabal -> Whirlpool -> SHA-512 -> HAVAL-256/5 -> byte order
//! ```
//!
//! Every stage but the last emits 64 bytes. HAVAL-256/5 narrows to 32 bytes,
//! which are then rewritten in display (big-endian) order.
//!
//! ## Primitives
//!
//! This crate implements HAVAL-256 and the orchestration. The other sixteen
//! primitives are supplied through [`PrimitiveProvider`]s, each exposing only
//! the two-operation [`HashPrimitive`] contract. With the `digest` feature,
//! any RustCrypto hasher can be plugged in through [`DigestStage`].
//!
//! ## Example
//!
//! ```rust
//! use x17_core::{BuiltinPrimitives, Error, X17, from_fn};
//!
//! // HAVAL is built in; the rest must come from somewhere
//! let result = X17::from_provider(&(BuiltinPrimitives, from_fn(|_| None)));
//! assert!(matches!(result, Err(Error::MissingPrimitives(missing)) if missing.len() == 16));
//! ```
//!
//! ```rust
//! use x17_core::haval::{Haval256, self_test};
//!
//! assert!(self_test());
//!
//! let mut hasher = Haval256::new();
//! hasher.update(b"first");
//! let digest = hasher.finalize_reset();
//! assert_eq!(digest.len(), 32);
//! ```
//!
//! ## no_std Support
//!
//! This crate supports `no_std` environments with the `alloc` crate:
//!
//! ```toml
//! [dependencies]
//! x17-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod byte_order;
mod error;
pub mod haval;
mod params;
mod primitives;
mod x17;

pub use byte_order::{from_display_order, to_display_order};
pub use error::Error;
pub use haval::{Haval256, Passes};
pub use params::*;
#[cfg(feature = "digest")]
pub use primitives::DigestStage;
pub use primitives::{
    BoxedPrimitive, BuiltinPrimitives, FnProvider, HashPrimitive, PrimitiveProvider, from_fn,
};
pub use x17::{X17, hash_with, meets_difficulty, meets_target};
