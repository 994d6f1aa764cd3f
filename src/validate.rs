//! Validation module for ensuring patch safety.
//!
//! # Hard Rule (Never Violate)
//!
//! After splicing, re-parse the patched buffer. If the element population
//! shrank or the buffer no longer parses, refuse the write - the original
//! file stays untouched. The patcher only ever inserts attributes and text,
//! so a lost element means an edit landed somewhere it should not have.

use crate::dom::{DocumentIndex, DomError};
use thiserror::Error;

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Patched document lost elements: {before} before, {after} after")]
    ElementsLost { before: usize, after: usize },

    #[error("Patched document no longer parses: {0}")]
    Reparse(#[from] DomError),
}

/// Validate that a patched buffer is a safe replacement for the original.
pub fn validate_patch(original: &str, patched: &str) -> Result<(), ValidationError> {
    let before = DocumentIndex::scan(original)?.elements().len();
    let after = DocumentIndex::scan(patched)?.elements().len();

    if after < before {
        return Err(ValidationError::ElementsLost { before, after });
    }

    Ok(())
}
