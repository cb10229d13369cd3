//! Markup serialization
//!
//! Text and attribute values are re-escaped; opaque nodes are written back
//! between their original delimiters.

use std::fmt::{self, Display, Formatter, Write};

use crate::markup::escape::{escape_attribute, escape_text};
use crate::markup::model::{Attribute, Document, Element, Node, TagForm};

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for node in &self.prolog {
            write!(f, "{node}")?;
        }
        write!(f, "{}", self.root)?;
        for node in &self.epilog {
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(element) => write!(f, "{element}"),
            Self::Text(text) => f.write_str(&escape_text(&text.content)),
            Self::Comment(markup) => write!(f, "<!--{}-->", markup.content),
            Self::CData(markup) => write!(f, "<![CDATA[{}]]>", markup.content),
            Self::Instruction(markup) => write!(f, "<?{}?>", markup.content),
            Self::Doctype(markup) => write!(f, "<!{}>", markup.content),
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for attribute in &self.attributes {
            write!(f, " {attribute}")?;
        }

        if self.form == TagForm::Empty && self.children.is_empty() {
            return f.write_str("/>");
        }

        f.write_char('>')?;
        for child in &self.children {
            write!(f, "{child}")?;
        }
        write!(f, "</{}>", self.name)
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let quote = self.quote.as_char();
        write!(
            f,
            "{}={quote}{}{quote}",
            self.name,
            escape_attribute(&self.value, self.quote)
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Span;
    use crate::markup::model::{Attribute, Element, Quote, TagForm};
    use crate::markup::parser::parse;

    #[test]
    fn test_write_empty_and_paired() {
        let mut element = Element {
            name: "Label".to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            form: TagForm::Paired,
            span: Span::empty(),
        };
        element.attributes.push(Attribute::new("Content", "Hi"));
        assert_eq!(element.to_string(), "<Label Content=\"Hi\"></Label>");

        element.form = TagForm::Empty;
        assert_eq!(element.to_string(), "<Label Content=\"Hi\"/>");
    }

    #[test]
    fn test_write_escapes_per_quote() {
        let mut attr = Attribute::new("Text", "it's \"x\" & <y>");
        assert_eq!(attr.to_string(), "Text=\"it's &quot;x&quot; &amp; &lt;y>\"");
        attr.quote = Quote::Single;
        assert_eq!(attr.to_string(), "Text='it&apos;s \"x\" &amp; &lt;y>'");
    }

    #[test]
    fn test_document_reserialization_is_stable() -> crate::Result<()> {
        let src = "<?xml version=\"1.0\"?>\n<Grid a='1'>\n  <!-- c -->\n  <Label>a &amp; b</Label>\n  <Image/>\n</Grid>\n";
        let doc = parse(src)?;
        let written = doc.to_string();
        assert_eq!(written, src);
        assert_eq!(parse(&written)?.to_string(), written);
        Ok(())
    }
}
