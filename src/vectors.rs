//! Published end-to-end digests

use tracing::{debug, warn};

use crate::algorithm::{Error, REFERENCE_VECTORS, X17};

/// Hash every published vector with `x17` and compare
///
/// Returns the first mismatch. A pipeline that passes is wired with the
/// primitives the chain was defined with.
pub fn verify_reference_vectors(x17: &mut X17) -> Result<(), Error> {
    for (input, expected) in REFERENCE_VECTORS {
        let actual = hex::encode(x17.hash(input));
        if actual != expected {
            warn!(input = ?String::from_utf8_lossy(input), %expected, %actual, "x17 reference vector mismatch");
            return Err(Error::VectorMismatch {
                input: String::from_utf8_lossy(input).into_owned(),
                expected: expected.to_string(),
                actual,
            });
        }
        debug!(input_len = input.len(), "x17 reference vector ok");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{from_fn, DigestStage};
    use crate::backend::pipeline;

    #[test]
    fn test_stand_in_pipeline_is_rejected() {
        let mut x17 = pipeline(from_fn(|_| Some(DigestStage::<sha2::Sha512>::boxed()))).unwrap();
        let expected_hash = hex::encode(x17.hash(b""));

        match verify_reference_vectors(&mut x17) {
            Err(Error::VectorMismatch {
                input,
                expected,
                actual,
            }) => {
                assert_eq!(input, "");
                assert_eq!(expected, REFERENCE_VECTORS[0].1);
                assert_eq!(actual, expected_hash);
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatch_message_names_input() {
        let err = Error::VectorMismatch {
            input: "DASH".into(),
            expected: "aa".into(),
            actual: "bb".into(),
        };
        assert_eq!(
            err.to_string(),
            "reference vector \"DASH\": expected aa, got bb"
        );
    }
}
