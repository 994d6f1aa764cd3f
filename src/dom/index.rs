//! Owned snapshot of a parsed HTML document.
//!
//! `DocumentIndex::scan` parses the buffer with `tl` and walks the tree into
//! a flat element table with parent/children links. Rules run their selector
//! predicates over this table; the index is rebuilt from source before every
//! rule, so later rules observe the state earlier rules left behind.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("Failed to parse HTML: {reason}")]
    Parse { reason: String },
}

/// Everything a rule can ask about one element.
#[derive(Debug, Clone)]
pub struct ElementFacts {
    /// Position in the element table (document order)
    pub index: usize,
    /// Parent element, if any
    pub parent: Option<usize>,
    /// Lowercased tag name
    pub tag: String,
    /// Attributes with keys lowercased. `None` value = bare attribute.
    pub attrs: Vec<(String, Option<String>)>,
    /// Split class list
    pub classes: Vec<String>,
    /// Byte offset of the element's `<` in the source buffer
    pub start: usize,
    /// Concatenated descendant text content
    pub text: String,
}

impl ElementFacts {
    /// Attribute value by name. A bare attribute yields `Some("")`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Trimmed text content - what a reader actually sees.
    pub fn visible_text(&self) -> &str {
        self.text.trim()
    }
}

/// Flat, owned view of the document tree.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    elements: Vec<ElementFacts>,
    children: Vec<Vec<usize>>,
}

impl DocumentIndex {
    /// Parse `html` and index every element.
    pub fn scan(html: &str) -> Result<Self, DomError> {
        let dom = tl::parse(html, tl::ParserOptions::default())
            .map_err(|e| DomError::Parse {
                reason: e.to_string(),
            })?;
        let parser = dom.parser();

        let mut index = DocumentIndex::default();
        for handle in dom.children() {
            index.walk(*handle, parser, None);
        }
        Ok(index)
    }

    fn walk(&mut self, handle: tl::NodeHandle, parser: &tl::Parser, parent: Option<usize>) {
        let Some(node) = handle.get(parser) else {
            return;
        };

        if let tl::Node::Tag(tag) = node {
            let me = self.elements.len();

            let tag_name = tag.name().as_utf8_str().to_lowercase();

            let mut attrs = Vec::new();
            for (key, value) in tag.attributes().iter() {
                let key: &str = key.as_ref();
                attrs.push((key.to_lowercase(), value.map(|v| v.to_string())));
            }

            let classes: Vec<String> = attrs
                .iter()
                .find(|(k, _)| k == "class")
                .and_then(|(_, v)| v.as_deref())
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();

            let (start, _) = tag.boundaries(parser);
            let text = tag.inner_text(parser).to_string();

            self.elements.push(ElementFacts {
                index: me,
                parent,
                tag: tag_name,
                attrs,
                classes,
                start,
                text,
            });
            self.children.push(Vec::new());
            if let Some(p) = parent {
                self.children[p].push(me);
            }

            for child in tag.children().top().iter() {
                self.walk(*child, parser, Some(me));
            }
        }
    }

    /// All elements in document order.
    pub fn elements(&self) -> &[ElementFacts] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> &ElementFacts {
        &self.elements[index]
    }

    /// Direct children of an element.
    pub fn children_of(&self, index: usize) -> &[usize] {
        &self.children[index]
    }

    /// All descendants of an element, depth-first.
    pub fn descendants(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.children[index].iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            out.push(i);
            for child in self.children[i].iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Does any element carry this exact id?
    pub fn has_element_with_id(&self, id: &str) -> bool {
        self.elements
            .iter()
            .any(|el| el.attr("id").is_some_and(|v| v == id))
    }
}
