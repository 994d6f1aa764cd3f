//! Skip-link target-repair rule.
//!
//! A skip link pointing at `#id` is broken when no element carries that id.
//! The page-root container (fixed structural attribute convention) acquires
//! the missing id. Idempotent: once assigned, the id-existence check
//! short-circuits every later pass.

use super::{Fix, Rule, RuleContext};
use crate::dom::DocumentIndex;
use crate::rules::skip_link::SKIP_LINK_CLASS;

pub(crate) const PAGE_ROOT_ATTR: &str = "data-elementor-type";
pub(crate) const PAGE_ROOT_VALUE: &str = "wp-page";

pub struct SkipTargetRule;

impl Rule for SkipTargetRule {
    fn name(&self) -> &'static str {
        "skip-target"
    }

    fn description(&self) -> &'static str {
        "a skip link pointing at a missing fragment id gets the page root as its target"
    }

    fn plan(&self, index: &DocumentIndex, _ctx: &RuleContext<'_>) -> Vec<Fix> {
        // Primary skip link = first in document order
        let Some(skip_link) = index
            .elements()
            .iter()
            .find(|el| el.tag == "a" && el.has_class(SKIP_LINK_CLASS))
        else {
            return Vec::new();
        };

        let Some(href) = skip_link.attr("href") else {
            return Vec::new();
        };
        let Some(id) = href.strip_prefix('#').filter(|id| !id.is_empty()) else {
            return Vec::new();
        };

        if index.has_element_with_id(id) {
            return Vec::new();
        }

        let Some(root) = index
            .elements()
            .iter()
            .find(|el| el.attr(PAGE_ROOT_ATTR) == Some(PAGE_ROOT_VALUE) && !el.has_attr("id"))
        else {
            return Vec::new();
        };

        vec![Fix::SetAttr {
            element: root.index,
            name: "id",
            value: id.to_string(),
        }]
    }
}
