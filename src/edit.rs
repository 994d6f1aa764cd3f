use std::io::Write;
use std::path::Path;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// The fundamental edit primitive: byte-span replacement with verification.
///
/// All remediation rules compile down to this single primitive. Intelligence
/// lives in span acquisition (DOM queries over the parsed document), not in
/// the application logic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Edit does nothing until applied"]
pub struct Edit {
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// New text to insert at [byte_start, byte_end)
    pub new_text: String,
    /// Verification of what we expect to find before applying
    pub expected_before: EditVerification,
}

/// Verification strategy for edit safety.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditVerification {
    /// Exact text match required
    ExactMatch(String),
    /// xxh3 hash of expected text (faster for large spans)
    Hash(u64),
}

impl EditVerification {
    /// Check if the provided text matches the verification criteria.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            EditVerification::ExactMatch(expected) => text == expected,
            EditVerification::Hash(expected_hash) => {
                let actual_hash = xxh3_64(text.as_bytes());
                actual_hash == *expected_hash
            }
        }
    }

    /// Create verification from text, using hash for text over 1KB.
    pub fn from_text(text: &str) -> Self {
        if text.len() > 1024 {
            EditVerification::Hash(xxh3_64(text.as_bytes()))
        } else {
            EditVerification::ExactMatch(text.to_string())
        }
    }

}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("Before-text verification failed at byte {byte_start}")]
    BeforeTextMismatch {
        byte_start: usize,
        byte_end: usize,
        expected: String,
        found: String,
    },

    #[error("Invalid byte range: [{byte_start}, {byte_end}) in buffer of length {len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        len: usize,
    },

    #[error("Overlapping edits: [{first_start}, {first_end}) and [{second_start}, {second_end})")]
    OverlappingEdits {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 validation error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Invalid edit would create malformed UTF-8")]
    InvalidUtf8Edit,
}

/// Result of applying an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "EditResult should be checked for success/already-applied"]
pub enum EditResult {
    /// Edit was successfully applied
    Applied { bytes_changed: usize },
    /// Edit was already applied (current text matches new_text)
    AlreadyApplied,
}

impl Edit {
    /// Create a new edit with automatic verification generation.
    pub fn new(
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        expected_before: impl Into<String>,
    ) -> Self {
        let expected = expected_before.into();
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: EditVerification::from_text(&expected),
        }
    }

    /// Create a pure insertion at a byte offset (zero-width span).
    pub fn insert(at: usize, new_text: impl Into<String>) -> Self {
        Self::new(at, at, new_text, "")
    }

    /// Validate the edit against the current buffer contents.
    ///
    /// Returns the current text at [byte_start, byte_end) if validation succeeds.
    fn validate<'a>(&self, content: &'a [u8]) -> Result<&'a [u8], EditError> {
        // Validate byte range
        if self.byte_start > self.byte_end {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                len: content.len(),
            });
        }

        if self.byte_end > content.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                len: content.len(),
            });
        }

        // Extract current text at span
        let current_bytes = &content[self.byte_start..self.byte_end];
        let current_text = std::str::from_utf8(current_bytes)?;

        // Check if already applied (idempotency)
        if current_text == self.new_text {
            return Ok(current_bytes);
        }

        // Verify expected before-text
        if !self.expected_before.matches(current_text) {
            return Err(EditError::BeforeTextMismatch {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                expected: format!("{:?}", self.expected_before),
                found: current_text.to_string(),
            });
        }

        Ok(current_bytes)
    }

    /// Apply a batch of edits to an in-memory buffer.
    ///
    /// Edits are sorted by byte_start descending and applied bottom-to-top
    /// to avoid offset invalidation. All edits are validated against the
    /// original buffer before any splice happens.
    pub fn apply_all(
        source: &str,
        mut edits: Vec<Edit>,
    ) -> Result<(String, Vec<EditResult>), EditError> {
        if edits.is_empty() {
            return Ok((source.to_string(), Vec::new()));
        }

        // Descending by byte_start
        edits.sort_by(|a, b| b.byte_start.cmp(&a.byte_start));

        let original = source.as_bytes();

        // Validate all edits first
        for edit in &edits {
            edit.validate(original)?;
        }

        // Check for overlapping spans (edits are sorted descending by byte_start)
        // For non-overlapping regions: earlier edit's end <= later edit's start
        for window in edits.windows(2) {
            let (later, earlier) = (&window[0], &window[1]);
            if earlier.byte_end > later.byte_start {
                return Err(EditError::OverlappingEdits {
                    first_start: earlier.byte_start,
                    first_end: earlier.byte_end,
                    second_start: later.byte_start,
                    second_end: later.byte_end,
                });
            }
        }

        // Apply edits bottom-to-top (already sorted descending)
        let mut new_content = original.to_vec();
        let mut results = Vec::with_capacity(edits.len());

        for edit in &edits {
            let current_bytes = &new_content[edit.byte_start..edit.byte_end];
            let current_text = std::str::from_utf8(current_bytes)?;

            // Check idempotency
            if current_text == edit.new_text {
                results.push(EditResult::AlreadyApplied);
                continue;
            }

            // Splice in new text
            new_content.splice(
                edit.byte_start..edit.byte_end,
                edit.new_text.as_bytes().iter().copied(),
            );

            results.push(EditResult::Applied {
                bytes_changed: edit.new_text.len(),
            });
        }

        // Validate resulting content is valid UTF-8
        let patched = String::from_utf8(new_content).map_err(|_| EditError::InvalidUtf8Edit)?;

        Ok((patched, results))
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// This ensures crash safety - either the full write succeeds or nothing changes.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), EditError> {
    // Create tempfile in same directory to ensure same filesystem
    let parent = path.parent().ok_or_else(|| {
        EditError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Path has no parent directory",
        ))
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;

    // Write content
    temp.write_all(content)?;

    // Flush to disk (fsync)
    temp.as_file().sync_all()?;

    // Atomic rename
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
