//! Icon-link labeling rule.
//!
//! Icon-only anchors (icon wrapper class, or an icon-font glyph descendant)
//! with no text and no label get a label derived from their `href` against a
//! fixed table. An href outside the table gets nothing: guessing a label is
//! worse than leaving the gap visible to an audit.

use super::{has_accessible_label, Fix, Rule, RuleContext};
use crate::dom::{DocumentIndex, ElementFacts};

pub(crate) const ICON_WRAPPER_CLASS: &str = "elementor-icon";

/// href → label table. Schemes match by prefix, shop paths by substring.
fn label_for_href(href: &str) -> Option<&'static str> {
    if href.starts_with("tel:") {
        return Some("Llamar por teléfono");
    }
    if href.starts_with("mailto:") {
        return Some("Enviar correo electrónico");
    }
    if href.contains("/mi-cuenta") {
        return Some("Mi Cuenta");
    }
    if href.contains("/carrito") {
        return Some("Carrito");
    }
    None
}

/// Icon-font class convention: `fa`/`fas`/`far`/`fab` (plus `fa-*`) and
/// Elementor's `eicon-*`.
fn is_icon_glyph_class(class: &str) -> bool {
    matches!(class, "fa" | "fas" | "far" | "fab")
        || class.starts_with("fa-")
        || class.starts_with("eicon-")
}

fn has_glyph_descendant(index: &DocumentIndex, el: &ElementFacts) -> bool {
    index
        .descendants(el.index)
        .into_iter()
        .any(|d| index.get(d).classes.iter().any(|c| is_icon_glyph_class(c)))
}

pub struct IconLinkRule;

impl Rule for IconLinkRule {
    fn name(&self) -> &'static str {
        "icon-link"
    }

    fn description(&self) -> &'static str {
        "icon-only links get a label derived from their destination"
    }

    fn claims(&self, el: &ElementFacts) -> bool {
        el.tag == "a" && el.has_class(ICON_WRAPPER_CLASS)
    }

    fn plan(&self, index: &DocumentIndex, _ctx: &RuleContext<'_>) -> Vec<Fix> {
        let mut fixes = Vec::new();
        for el in index.elements() {
            if el.tag != "a" {
                continue;
            }
            if !el.has_class(ICON_WRAPPER_CLASS) && !has_glyph_descendant(index, el) {
                continue;
            }
            if !el.visible_text().is_empty() || has_accessible_label(el) {
                continue;
            }
            let Some(label) = el.attr("href").and_then(label_for_href) else {
                continue;
            };
            fixes.push(Fix::SetAttr {
                element: el.index,
                name: "aria-label",
                value: label.to_string(),
            });
        }
        fixes
    }
}
