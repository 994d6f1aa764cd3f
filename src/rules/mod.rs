//! The fixed remediation rule set.
//!
//! Rules are stateless selector/predicate/action units over the document
//! index. Execution order is registry order; the pass engine re-indexes the
//! buffer between rules, so later rules observe earlier rules' mutations.
//! Every rule is idempotent: an element that already satisfies the target
//! condition no longer matches the rule's predicate.

pub mod chat_widget;
pub mod generic_label;
pub mod icon_link;
pub mod img_alt;
pub mod skip_link;
pub mod skip_target;

use crate::dom::{DocumentIndex, ElementFacts};

pub use chat_widget::ChatWidgetRule;
pub use generic_label::GenericLabelRule;
pub use icon_link::IconLinkRule;
pub use img_alt::ImgAltRule;
pub use skip_link::SkipLinkRule;
pub use skip_target::SkipTargetRule;

/// A semantic mutation planned by a rule. Lowered to byte-span edits by the
/// pass engine; a fix that cannot be lowered is skipped, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fix {
    /// Set an attribute to a value (inserted if missing, replaced if empty)
    SetAttr {
        element: usize,
        name: &'static str,
        value: String,
    },
    /// Prepend text content just inside an element's open tag
    PrependText { element: usize, text: String },
}

impl Fix {
    /// The element this fix targets.
    pub fn element(&self) -> usize {
        match self {
            Fix::SetAttr { element, .. } | Fix::PrependText { element, .. } => *element,
        }
    }
}

/// Execution context handed to a rule within one pass.
pub struct RuleContext<'a> {
    /// Per-element flags: claimed by some rule's ownership predicate.
    /// Broad rules consult this instead of hard-coding other rules' classes.
    pub claimed: &'a [bool],
}

impl RuleContext<'_> {
    pub fn is_claimed(&self, element: usize) -> bool {
        self.claimed.get(element).copied().unwrap_or(false)
    }
}

/// One remediation rule.
pub trait Rule: Send + Sync {
    /// Stable identifier, used in reports
    fn name(&self) -> &'static str;

    /// One-line human description
    fn description(&self) -> &'static str;

    /// Ownership marker: does this rule consider `el` its own? Consulted by
    /// broader rules for cross-rule exclusion.
    fn claims(&self, _el: &ElementFacts) -> bool {
        false
    }

    /// Plan the fixes still needed on the current document state.
    fn plan(&self, index: &DocumentIndex, ctx: &RuleContext<'_>) -> Vec<Fix>;
}

/// The fixed rule set, in execution order.
pub fn registry() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(ImgAltRule),
        Box::new(SkipLinkRule),
        Box::new(IconLinkRule),
        Box::new(ChatWidgetRule),
        Box::new(SkipTargetRule),
        Box::new(GenericLabelRule),
    ]
}

/// Shared predicate: the element carries a non-empty `aria-label` or
/// `aria-labelledby`.
pub(crate) fn has_accessible_label(el: &ElementFacts) -> bool {
    el.attr("aria-label").is_some_and(|v| !v.trim().is_empty())
        || el.attr("aria-labelledby").is_some_and(|v| !v.trim().is_empty())
}
