//! Image alt-text rule.
//!
//! Selects `img` elements missing a non-empty `alt`; the replacement value is
//! the trimmed `title` attribute when present, else a fixed fallback.
//! Idempotent because an element with a non-empty `alt` no longer matches.

use super::{Fix, Rule, RuleContext};
use crate::dom::DocumentIndex;

pub(crate) const FALLBACK_ALT: &str = "Imagen descriptiva";

pub struct ImgAltRule;

impl Rule for ImgAltRule {
    fn name(&self) -> &'static str {
        "img-alt"
    }

    fn description(&self) -> &'static str {
        "images without a non-empty alt get one from their title, else a fixed fallback"
    }

    fn plan(&self, index: &DocumentIndex, _ctx: &RuleContext<'_>) -> Vec<Fix> {
        index
            .elements()
            .iter()
            .filter(|el| el.tag == "img")
            .filter(|el| el.attr("alt").is_none_or(|v| v.trim().is_empty()))
            .map(|el| {
                let value = el
                    .attr("title")
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(FALLBACK_ALT);
                Fix::SetAttr {
                    element: el.index,
                    name: "alt",
                    value: value.to_string(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(html: &str) -> Vec<Fix> {
        let index = DocumentIndex::scan(html).unwrap();
        ImgAltRule.plan(&index, &RuleContext { claimed: &[] })
    }

    #[test]
    fn test_alt_from_title() {
        let fixes = plan(r#"<img src="a.png" title=" Logo ">"#);
        assert_eq!(
            fixes,
            vec![Fix::SetAttr {
                element: 0,
                name: "alt",
                value: "Logo".to_string()
            }]
        );
    }

    #[test]
    fn test_alt_fallback_without_title() {
        let fixes = plan(r#"<img src="a.png">"#);
        assert_eq!(
            fixes,
            vec![Fix::SetAttr {
                element: 0,
                name: "alt",
                value: FALLBACK_ALT.to_string()
            }]
        );
    }

    #[test]
    fn test_empty_alt_is_refilled() {
        let fixes = plan(r#"<img src="a.png" alt="" title="X">"#);
        assert_eq!(fixes.len(), 1);
    }

    #[test]
    fn test_existing_alt_untouched() {
        let fixes = plan(r#"<img src="a.png" alt="X" title="Y">"#);
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_whitespace_title_falls_back() {
        let fixes = plan(r#"<img src="a.png" title="   ">"#);
        assert_eq!(
            fixes,
            vec![Fix::SetAttr {
                element: 0,
                name: "alt",
                value: FALLBACK_ALT.to_string()
            }]
        );
    }
}
