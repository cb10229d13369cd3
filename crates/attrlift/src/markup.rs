//! Markup tree: model, parser, escaping and serialization

pub mod escape;
pub mod model;
pub mod parser;
pub mod writer;

pub use model::{Attribute, Document, Element, Markup, Node, NodePath, Quote, TagForm, Text};
pub use parser::{parse, parse_with_config, Parser};
