//! The patch pass engine.
//!
//! One pass = every rule, in registry order, against the current document
//! state. The buffer is re-indexed between rules (no diffing), so the
//! broadest rule observes the alt texts and labels the earlier rules just
//! wrote. Correctness under repeated passes comes from rule idempotence,
//! not from tracking what a previous pass did.

use serde::Serialize;
use std::collections::HashSet;

use crate::dom::{self, AttrSite, DocumentIndex, DomError};
use crate::edit::Edit;
use crate::rules::{registry, Fix, Rule, RuleContext};

/// Per-rule outcome of one pass.
#[derive(Debug, Clone, Serialize)]
pub struct RuleOutcome {
    pub rule: &'static str,
    /// Elements patched by this rule in this pass
    pub patched: usize,
}

/// Outcome of one full pass over one document.
#[derive(Debug, Clone)]
pub struct PassOutcome {
    /// Patched buffer (byte-identical to the input when already compliant)
    pub html: String,
    pub rules: Vec<RuleOutcome>,
}

impl PassOutcome {
    pub fn total_patched(&self) -> usize {
        self.rules.iter().map(|r| r.patched).sum()
    }

    pub fn changed(&self) -> bool {
        self.total_patched() > 0
    }
}

/// The rule-based DOM patcher.
pub struct Patcher {
    rules: Vec<Box<dyn Rule>>,
}

impl Patcher {
    pub fn new() -> Self {
        Self { rules: registry() }
    }

    /// The rule set in execution order.
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Run one full patch pass over `html`.
    ///
    /// Never fails on rule-level grounds: a selector that matches nothing is
    /// the compliant state, and a fix that cannot be lowered to a byte span
    /// is dropped for this pass (the next trigger reconsiders it).
    pub fn run_pass(&self, html: &str) -> Result<PassOutcome, DomError> {
        let mut buffer = html.to_string();
        let mut outcomes = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let index = DocumentIndex::scan(&buffer)?;

            // Ownership flags for cross-rule exclusion
            let claimed: Vec<bool> = index
                .elements()
                .iter()
                .map(|el| self.rules.iter().any(|r| r.claims(el)))
                .collect();

            let fixes = rule.plan(&index, &RuleContext { claimed: &claimed });
            let (edits, elements) = lower_fixes(&buffer, &index, &fixes);

            let patched = match Edit::apply_all(&buffer, edits) {
                Ok((next, _results)) => {
                    buffer = next;
                    elements.len()
                }
                // A batch that cannot be spliced leaves the buffer as-is;
                // the elements stay unpatched until the next trigger.
                Err(_) => 0,
            };

            outcomes.push(RuleOutcome {
                rule: rule.name(),
                patched,
            });
        }

        Ok(PassOutcome {
            html: buffer,
            rules: outcomes,
        })
    }
}

impl Default for Patcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Lower semantic fixes to byte-span edits.
///
/// Returns the edits plus the set of elements that produced at least one.
fn lower_fixes(
    buffer: &str,
    index: &DocumentIndex,
    fixes: &[Fix],
) -> (Vec<Edit>, HashSet<usize>) {
    let mut edits = Vec::new();
    let mut elements = HashSet::new();

    for fix in fixes {
        let el = index.get(fix.element());
        let Some(tag) = dom::open_tag_at(buffer, el.start) else {
            continue;
        };

        match fix {
            Fix::SetAttr { name, value, .. } => {
                let escaped = dom::escape_attr_value(value);
                let edit = match dom::find_attr(buffer, &tag, name) {
                    AttrSite::Missing => Edit::insert(
                        tag.attr_insert_offset(),
                        format!(r#" {}="{}""#, name, escaped),
                    ),
                    AttrSite::Bare {
                        name_start,
                        name_end,
                    } => Edit::new(
                        name_start,
                        name_end,
                        format!(r#"{}="{}""#, name, escaped),
                        &buffer[name_start..name_end],
                    ),
                    AttrSite::Valued {
                        value_start,
                        value_end,
                    } => Edit::new(
                        value_start,
                        value_end,
                        format!(r#""{}""#, escaped),
                        &buffer[value_start..value_end],
                    ),
                };
                edits.push(edit);
                elements.insert(fix.element());
            }
            Fix::PrependText { text, .. } => {
                if tag.self_closing {
                    continue;
                }
                edits.push(Edit::insert(
                    tag.text_insert_offset(),
                    dom::escape_text(text),
                ));
                elements.insert(fix.element());
            }
        }
    }

    (edits, elements)
}
