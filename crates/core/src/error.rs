//! Pipeline assembly and verification errors
//!
//! Hashing itself never fails; these only surface while building an [`X17`]
//! from providers or when checking it against published vectors.
//!
//! [`X17`]: crate::X17

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::params::StageId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Providers left these stages unresolved, listed in pipeline order
    #[error("no primitive supplied for {}", StageList(.0))]
    MissingPrimitives(Vec<StageId>),

    /// A pipeline produced a digest other than the published one
    #[error("reference vector {input:?}: expected {expected}, got {actual}")]
    VectorMismatch {
        input: String,
        expected: String,
        actual: String,
    },
}

struct StageList<'a>(&'a [StageId]);

impl fmt::Display for StageList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{stage}")?;
        }
        Ok(())
    }
}
