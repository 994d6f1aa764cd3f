//! Generic interactive-element labeling rule.
//!
//! The broadest rule, run last: interactive elements with no accessible name
//! at all get one. Elements claimed by more specific rules are excluded via
//! the registry's ownership predicates. Elements whose name is already
//! derivable (visible text, or a descendant image with alt text) are skipped
//! so no redundant label is written.
//!
//! Label priority: visible text, then `title`, then a generic fallback keyed
//! by element kind. The generic fallbacks are not descriptive of the
//! destination; they are kept for compatibility with the deployed behavior.

use super::{has_accessible_label, Fix, Rule, RuleContext};
use crate::dom::{DocumentIndex, ElementFacts};

pub(crate) const ANCHOR_FALLBACK: &str = "Abrir enlace";
pub(crate) const CONTROL_FALLBACK: &str = "Botón interactivo";

fn is_interactive(el: &ElementFacts) -> bool {
    el.tag == "a" || el.tag == "button" || el.attr("role") == Some("menuitem")
}

fn has_described_image(index: &DocumentIndex, el: &ElementFacts) -> bool {
    index.descendants(el.index).into_iter().any(|d| {
        let d = index.get(d);
        d.tag == "img" && d.attr("alt").is_some_and(|v| !v.trim().is_empty())
    })
}

/// Label priority: visible text, `title`, kind fallback.
fn derive_label(el: &ElementFacts) -> String {
    let text = el.visible_text();
    if !text.is_empty() {
        return text.to_string();
    }
    if let Some(title) = el.attr("title").map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }
    if el.tag == "a" {
        ANCHOR_FALLBACK.to_string()
    } else {
        CONTROL_FALLBACK.to_string()
    }
}

pub struct GenericLabelRule;

impl Rule for GenericLabelRule {
    fn name(&self) -> &'static str {
        "generic-label"
    }

    fn description(&self) -> &'static str {
        "remaining unlabeled interactive elements get a derived or generic label"
    }

    fn plan(&self, index: &DocumentIndex, ctx: &RuleContext<'_>) -> Vec<Fix> {
        let mut fixes = Vec::new();
        for el in index.elements() {
            if !is_interactive(el) || ctx.is_claimed(el.index) {
                continue;
            }
            // Elements with an accessible name already are out of scope:
            // a label, visible text, or a described image descendant.
            if has_accessible_label(el)
                || !el.visible_text().is_empty()
                || has_described_image(index, el)
            {
                continue;
            }
            let label = derive_label(el);
            if label.is_empty() {
                continue;
            }
            fixes.push(Fix::SetAttr {
                element: el.index,
                name: "aria-label",
                value: label,
            });
        }
        fixes
    }
}
