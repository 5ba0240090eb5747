//! Scene document tree
//!
//! The parser never touches XML text directly. It walks an owned [`Element`]
//! tree: a name, ordered attributes and ordered child elements. Text nodes,
//! comments and processing instructions are dropped when the tree is built.

use std::path::Path;

use thiserror::Error;

/// Errors reading a document before any scene parsing happens
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The text is not well-formed XML
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// One element of a scene document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute, replacing any previous value
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let (name, value) = (name.into(), value.into());
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    /// Builder: append a child element
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child element
    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether an attribute is present
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Child elements in document order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First child with a given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Position of the first child with a given name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|c| c.name == name)
    }

    /// All children with a given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Names of all children in document order
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut element = Self::new(node.tag_name().name());
        for attribute in node.attributes() {
            element
                .attributes
                .push((attribute.name().to_string(), attribute.value().to_string()));
        }
        for child in node.children().filter(roxmltree::Node::is_element) {
            element.children.push(Self::from_node(child));
        }
        element
    }
}

/// Parse XML text into an element tree rooted at the document element
pub fn parse_document(text: &str) -> Result<Element, DocumentError> {
    let document = roxmltree::Document::parse(text)?;
    Ok(Element::from_node(document.root_element()))
}

/// Read and parse a scene document from disk
pub fn load_document(path: impl AsRef<Path>) -> Result<Element, DocumentError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    log::info!("XML Loading finished: {}", path.as_ref().display());
    parse_document(&text)
}
