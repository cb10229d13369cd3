//! Rewrite a resolved target: text becomes the first attribute, children go away
//!
//! The document is never edited in place. [`apply`] builds the replacement
//! element and the patch that installs it; the host commits the patch.

use tracing::{info, instrument};

use crate::action::detect::EditTarget;
use crate::action::host::TextPatch;
use crate::config::Dialect;
use crate::error::{Error, Result, Span};
use crate::markup::model::{Attribute, Document, Element, TagForm};

/// Replacement element and the patch that writes it into the source
#[derive(Clone, Debug, PartialEq)]
pub struct Applied {
    /// The element as it reads after the edit; its span covers the replacement text
    pub element: Element,
    pub patch: TextPatch,
}

/// Build the edit for `target`
///
/// Fails with a malformed-tree error, before anything is built, when the target
/// no longer matches `document`.
#[instrument(level = "debug", skip_all, fields(tag = %target.tag, path = %target.element))]
pub fn apply(document: &Document, target: &EditTarget, dialect: Dialect) -> Result<Applied> {
    let original = document
        .element(&target.element)
        .ok_or_else(|| Error::malformed(format!("no element at {}", target.element)))?;
    if original.name != target.tag {
        return Err(Error::malformed(format!(
            "element at {} is <{}>, expected <{}>",
            target.element, original.name, target.tag
        )));
    }

    let attribute = Attribute::synthesize(target.attribute, &target.raw_text)
        .map_err(|err| Error::malformed(format!("cannot build attribute: {err}")))?;

    let mut attributes = Vec::with_capacity(original.attributes.len() + 1);
    attributes.push(attribute);
    attributes.extend(original.attributes.iter().cloned());

    let form = if dialect.can_be_empty_tag(&original.name) {
        TagForm::Empty
    } else {
        TagForm::Paired
    };

    let mut element = Element {
        name: original.name.clone(),
        attributes,
        children: Vec::new(),
        form,
        span: original.span,
    };

    let replacement = element.to_string();
    element.span = Span::new(
        original.span.start,
        original.span.start.advanced_by(&replacement),
    );

    info!(
        attribute = target.attribute,
        removed = original.children.len(),
        "moved text to attribute"
    );
    Ok(Applied {
        element,
        patch: TextPatch::new(original.span.range(), replacement),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::detect::detect;
    use crate::markup::model::NodePath;
    use crate::markup::parser::parse;

    fn rewrite(src: &str, needle: &str, dialect: Dialect) -> Result<Option<String>> {
        let doc = parse(src)?;
        let target = src
            .find(needle)
            .and_then(|offset| doc.node_at(offset, true))
            .and_then(|node| detect(&doc, &node));
        match target {
            Some(target) => {
                let applied = apply(&doc, &target, dialect)?;
                applied.patch.apply_to(src).map(Some)
            }
            None => Ok(None),
        }
    }

    #[test]
    fn test_label_collapses() -> Result<()> {
        let out = rewrite("<Label>Hello</Label>", "Hello", Dialect::Xml)?;
        assert_eq!(out.as_deref(), Some("<Label Content=\"Hello\"/>"));
        Ok(())
    }

    #[test]
    fn test_new_attribute_comes_first() -> Result<()> {
        let out = rewrite(
            "<Button Margin=\"4\" x:Name='ok'>OK</Button>",
            "OK<",
            Dialect::Xml,
        )?;
        assert_eq!(
            out.as_deref(),
            Some("<Button Content=\"OK\" Margin=\"4\" x:Name='ok'/>")
        );
        Ok(())
    }

    #[test]
    fn test_all_children_removed() -> Result<()> {
        let out = rewrite(
            "<Grid>\n  <TextBlock>Hi <!-- greet --><Run>there</Run></TextBlock>\n</Grid>",
            "Hi",
            Dialect::Xml,
        )?;
        assert_eq!(
            out.as_deref(),
            Some("<Grid>\n  <TextBlock Text=\"Hi there\"/>\n</Grid>")
        );
        Ok(())
    }

    #[test]
    fn test_html_keeps_closing_tag() -> Result<()> {
        let out = rewrite("<Label>Hello</Label>", "Hello", Dialect::Html)?;
        assert_eq!(out.as_deref(), Some("<Label Content=\"Hello\"></Label>"));
        Ok(())
    }

    #[test]
    fn test_escapes_reserved_characters() -> Result<()> {
        let out = rewrite("<Button>Say \"Hi\" &amp; &lt;wave&gt;</Button>", "Say", Dialect::Xml)?;
        assert_eq!(
            out.as_deref(),
            Some("<Button Content=\"Say &quot;Hi&quot; &amp; &lt;wave>\"/>")
        );
        Ok(())
    }

    #[test]
    fn test_empty_text_gives_empty_value() -> Result<()> {
        let doc = parse("<Label>Hello</Label>")?;
        let target = EditTarget {
            element: NodePath::root(),
            tag: "Label".to_string(),
            attribute: "Content",
            raw_text: String::new(),
        };
        let applied = apply(&doc, &target, Dialect::Xml)?;
        assert_eq!(applied.patch.replacement, "<Label Content=\"\"/>");
        assert_eq!(applied.element.attribute("Content"), Some(""));
        Ok(())
    }

    #[test]
    fn test_duplicate_attribute_is_not_deduplicated() -> Result<()> {
        let doc = parse("<Label Content=\"old\">new</Label>")?;
        let target = detect(&doc, &NodePath::from(vec![0]));
        let applied = match target {
            Some(target) => apply(&doc, &target, Dialect::Xml)?,
            None => return Err(Error::malformed("expected a target")),
        };
        let values: Vec<_> = applied.element.attributes.iter().map(|a| a.value.as_str()).collect();
        assert_eq!(values, ["new", "old"]);
        Ok(())
    }

    #[test]
    fn test_replacement_span() -> Result<()> {
        let doc = parse("<Grid>\n<Label>Hello</Label></Grid>")?;
        let target = detect(&doc, &NodePath::from(vec![1, 0]));
        let applied = match target {
            Some(target) => apply(&doc, &target, Dialect::Xml)?,
            None => return Err(Error::malformed("expected a target")),
        };
        assert_eq!(applied.patch.range, 7..27);
        assert_eq!(applied.element.span.range(), 7..31);
        assert_eq!(applied.element.span.end.line, 2);
        Ok(())
    }

    #[test]
    fn test_stale_target_is_malformed() -> Result<()> {
        let doc = parse("<Grid><Label>Hi</Label></Grid>")?;
        let stale = EditTarget {
            element: NodePath::from(vec![3]),
            tag: "Label".to_string(),
            attribute: "Content",
            raw_text: "Hi".to_string(),
        };
        let err = apply(&doc, &stale, Dialect::Xml).err();
        assert_eq!(err.map(|e| e.is_malformed_tree()), Some(true));

        let renamed = EditTarget {
            element: NodePath::root(),
            ..stale
        };
        let err = apply(&doc, &renamed, Dialect::Xml).err();
        assert_eq!(err.map(|e| e.is_malformed_tree()), Some(true));
        Ok(())
    }
}
