//! a11y-patcher: Accessibility patching for HTML documents
//!
//! A rule-based patcher that remediates missing accessibility attributes
//! (`alt`, `aria-label`, anchor text, skip-link target ids) on HTML produced
//! by page builders and third-party widgets.
//!
//! # Architecture
//!
//! All remediation compiles down to a single primitive: [`Edit`], which
//! represents a verified byte-span replacement. Intelligence lives in span
//! acquisition (DOM queries over a parsed document index), not in the
//! application logic. Rules plan semantic fixes; the pass engine lowers them
//! to edits and splices bottom-to-top.
//!
//! # Safety
//!
//! - All edits verify expected before-text before applying
//! - Atomic file writes (tempfile + fsync + rename)
//! - Site boundary enforcement
//! - Patched buffers are re-parsed before any write
//! - Idempotent rules: a second pass over patched output is a no-op
//!
//! # Example
//!
//! ```
//! use a11y_patcher::Patcher;
//!
//! let patcher = Patcher::new();
//! let outcome = patcher
//!     .run_pass(r#"<img src="logo.png" title="Logo">"#)
//!     .unwrap();
//!
//! assert!(outcome.html.contains(r#"alt="Logo""#));
//! assert!(!patcher.run_pass(&outcome.html).unwrap().changed());
//! ```

pub mod applicator;
pub mod dom;
pub mod edit;
pub mod patcher;
pub mod rules;
pub mod safety;
pub mod validate;
pub mod watch;

// Re-exports
pub use applicator::{
    check_file, discover_html_files, fix_file, is_html_path, FileOutcome, FileReport,
};
pub use dom::{DocumentIndex, DomError, ElementFacts};
pub use edit::{Edit, EditError, EditResult, EditVerification};
pub use patcher::{PassOutcome, Patcher, RuleOutcome};
pub use rules::{registry, Fix, Rule, RuleContext};
pub use safety::{SafetyError, SiteGuard};
pub use validate::{validate_patch, ValidationError};
pub use watch::{watch_site, Debouncer, WatchError, WatchOptions};
