//! Skip-link rule.
//!
//! Theme skip links are frequently shipped as empty anchors. An anchor with
//! the skip marker class, no visible text, and no accessible label gets both
//! its text and its label set to the fixed navigation string.

use super::{has_accessible_label, Fix, Rule, RuleContext};
use crate::dom::DocumentIndex;

pub(crate) const SKIP_LINK_CLASS: &str = "skip-link";
pub(crate) const SKIP_LINK_TEXT: &str = "Saltar al contenido";

pub struct SkipLinkRule;

impl Rule for SkipLinkRule {
    fn name(&self) -> &'static str {
        "skip-link"
    }

    fn description(&self) -> &'static str {
        "empty skip links get visible text and a matching label"
    }

    fn claims(&self, el: &crate::dom::ElementFacts) -> bool {
        el.tag == "a" && el.has_class(SKIP_LINK_CLASS)
    }

    fn plan(&self, index: &DocumentIndex, _ctx: &RuleContext<'_>) -> Vec<Fix> {
        let mut fixes = Vec::new();
        for el in index.elements() {
            if !self.claims(el) {
                continue;
            }
            if !el.visible_text().is_empty() || has_accessible_label(el) {
                continue;
            }
            fixes.push(Fix::PrependText {
                element: el.index,
                text: SKIP_LINK_TEXT.to_string(),
            });
            fixes.push(Fix::SetAttr {
                element: el.index,
                name: "aria-label",
                value: SKIP_LINK_TEXT.to_string(),
            });
        }
        fixes
    }
}
