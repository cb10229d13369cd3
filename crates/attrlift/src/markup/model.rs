//! Markup data model
//!
//! A parsed document is a closed tree of [`Node`] variants. Every node keeps the
//! [`Span`] it was read from so an edit can be turned back into a text patch that
//! leaves the rest of the buffer untouched.

use std::fmt;

use crate::error::{Result, Span};
use crate::markup::escape::escape_attribute;
use crate::markup::parser::Parser;

/// Markup document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Declarations, comments and whitespace before the root element
    pub prolog: Vec<Node>,
    pub root: Element,
    /// Comments and whitespace after the root element
    pub epilog: Vec<Node>,
}

/// Markup node
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(Markup),
    CData(Markup),
    /// `<?target data?>`
    Instruction(Markup),
    /// `<!DOCTYPE ...>`
    Doctype(Markup),
}

/// Markup element
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    pub form: TagForm,
    pub span: Span,
}

/// How an element is closed in the source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TagForm {
    /// `<name/>`
    Empty,
    /// `<name>...</name>`
    #[default]
    Paired,
}

/// Attribute on an element's opening tag
///
/// `value` holds the logical string; escaping happens when the attribute is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub quote: Quote,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Quote {
    #[default]
    Double,
    Single,
}

/// Character data between tags, entities already decoded
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    pub content: String,
    pub span: Span,
}

/// Content of a node this crate treats as opaque (comment, CDATA, instruction, doctype)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Markup {
    pub content: String,
    pub span: Span,
}

/// Address of a node as child indices from the root element
///
/// The empty path is the root element itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the enclosing element, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// Index of this node among its siblings, `None` for the root
    pub fn index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

impl Document {
    /// Resolve a path to an element
    pub fn element(&self, path: &NodePath) -> Option<&Element> {
        let mut element = &self.root;
        for &index in path.indices() {
            element = element.children.get(index)?.as_element()?;
        }
        Some(element)
    }

    /// Resolve a path to a non-root node
    pub fn node(&self, path: &NodePath) -> Option<&Node> {
        let index = path.index()?;
        self.element(&path.parent()?)?.children.get(index)
    }

    /// Find the node under a caret
    ///
    /// With `want_leaf` the deepest node is returned, text included; otherwise
    /// the deepest element. A caret directly after a text run still selects it.
    pub fn node_at(&self, offset: usize, want_leaf: bool) -> Option<NodePath> {
        if !self.root.span.contains(offset) {
            return None;
        }

        let mut path = NodePath::root();
        let mut element = &self.root;
        loop {
            let Some(index) = element
                .children
                .iter()
                .position(|child| child.touches(offset))
            else {
                return Some(path);
            };

            match element.children.get(index) {
                Some(Node::Element(child)) => {
                    path = path.child(index);
                    element = child;
                }
                Some(_) if want_leaf => return Some(path.child(index)),
                _ => return Some(path),
            }
        }
    }
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Self::Element(element) => element.span,
            Self::Text(text) => text.span,
            Self::Comment(markup)
            | Self::CData(markup)
            | Self::Instruction(markup)
            | Self::Doctype(markup) => markup.span,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    fn touches(&self, offset: usize) -> bool {
        let span = self.span();
        match self {
            Self::Text(_) => span.start.offset <= offset && offset <= span.end.offset,
            _ => span.contains(offset),
        }
    }
}

impl Element {
    /// Value of the first attribute called `name`
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Concatenated text and CDATA of all descendants
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        push_inner_text(self, &mut out);
        out
    }
}

fn push_inner_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(text) => out.push_str(&text.content),
            Node::CData(cdata) => out.push_str(&cdata.content),
            Node::Element(inner) => push_inner_text(inner, out),
            Node::Comment(_) | Node::Instruction(_) | Node::Doctype(_) => {}
        }
    }
}

impl Text {
    /// Whitespace-only runs are layout, not content
    pub fn is_whitespace(&self) -> bool {
        self.content.trim().is_empty()
    }
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            quote: Quote::Double,
        }
    }

    /// Build an attribute from `name="value"` markup
    ///
    /// The value must already be escaped; the name is checked against the name grammar.
    pub fn from_markup(markup: &str) -> Result<Self> {
        Parser::new(markup.as_bytes()).parse_attribute()
    }

    /// Build a well-formed attribute holding `value` verbatim
    pub fn synthesize(name: &str, value: &str) -> Result<Self> {
        Self::from_markup(&format!(
            "{name}=\"{}\"",
            escape_attribute(value, Quote::Double)
        ))
    }
}

impl Quote {
    pub const fn as_char(self) -> char {
        match self {
            Self::Double => '"',
            Self::Single => '\'',
        }
    }
}
