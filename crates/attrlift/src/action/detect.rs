//! Resolve a caret node to the element the action would rewrite
//!
//! This is the single resolution step shared by the availability probe and by
//! execution, so both always agree on the target.

use tracing::{debug, instrument};

use crate::action::tags::{TagAttributeMap, SUPPORTED_TAGS};
use crate::markup::model::{Document, Node, NodePath};

/// Element, attribute and text an applicable edit would use
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditTarget {
    /// Path of the element that owns the text
    pub element: NodePath,
    pub tag: String,
    pub attribute: &'static str,
    /// Inner text of the element, trimmed
    pub raw_text: String,
}

/// Resolve against the built-in tag table
pub fn detect(document: &Document, cursor_node: &NodePath) -> Option<EditTarget> {
    detect_with(document, cursor_node, &SUPPORTED_TAGS)
}

/// Resolve a caret node against `tags`
///
/// The caret node has to be a non-whitespace text run; its enclosing element
/// must be listed in `tags`. Pure: nothing in `document` changes.
#[instrument(level = "debug", skip_all, fields(node = %cursor_node))]
pub fn detect_with(
    document: &Document,
    cursor_node: &NodePath,
    tags: &TagAttributeMap,
) -> Option<EditTarget> {
    match document.node(cursor_node) {
        Some(Node::Text(text)) if !text.is_whitespace() => {}
        Some(_) => {
            debug!("caret is not on a text token");
            return None;
        }
        None => {
            debug!("caret node does not resolve");
            return None;
        }
    }

    let element_path = cursor_node.parent()?;
    let element = document.element(&element_path)?;

    let Some(attribute) = tags.attribute_for(&element.name) else {
        debug!(tag = %element.name, "tag has no text attribute");
        return None;
    };

    Some(EditTarget {
        element: element_path,
        tag: element.name.clone(),
        attribute,
        raw_text: element.inner_text().trim().to_string(),
    })
}
