//! Third-party chat-widget button rule.
//!
//! Known widget buttons ship without a label. Each widget selector is an
//! independent presence check against a fixed class, not a document scan.

use super::{has_accessible_label, Fix, Rule, RuleContext};
use crate::dom::{DocumentIndex, ElementFacts};

pub(crate) const WIDGET_CLASSES: &[&str] = &["joinchat__button", "wa__btn_popup"];
pub(crate) const WIDGET_LABEL: &str = "Contactar por WhatsApp";

pub struct ChatWidgetRule;

impl Rule for ChatWidgetRule {
    fn name(&self) -> &'static str {
        "chat-widget"
    }

    fn description(&self) -> &'static str {
        "known chat-widget buttons get the fixed contact label"
    }

    fn claims(&self, el: &ElementFacts) -> bool {
        WIDGET_CLASSES.iter().any(|class| el.has_class(class))
    }

    fn plan(&self, index: &DocumentIndex, _ctx: &RuleContext<'_>) -> Vec<Fix> {
        let mut fixes = Vec::new();
        for class in WIDGET_CLASSES {
            let Some(el) = index.elements().iter().find(|el| el.has_class(class)) else {
                continue;
            };
            if has_accessible_label(el) {
                continue;
            }
            fixes.push(Fix::SetAttr {
                element: el.index,
                name: "aria-label",
                value: WIDGET_LABEL.to_string(),
            });
        }
        fixes
    }
}
