//! Span acquisition over parsed HTML.
//!
//! The patcher never mutates a tree in place: rules query an owned
//! [`DocumentIndex`] snapshot and plan fixes, which are lowered to byte-span
//! edits located by the open-tag scanner in [`spans`].

pub mod index;
pub mod spans;

pub use index::{DocumentIndex, DomError, ElementFacts};
pub use spans::{find_attr, open_tag_at, AttrSite, OpenTag};

/// Escape a string for insertion into a double-quoted attribute value.
///
/// Only `"` is escaped: values copied from another attribute keep their
/// source escaping, so touching `&` would double-escape existing entities.
pub fn escape_attr_value(value: &str) -> String {
    value.replace('"', "&quot;")
}

/// Escape a string for insertion as text content.
pub fn escape_text(value: &str) -> String {
    value.replace('&', "&amp;").replace('<', "&lt;")
}
