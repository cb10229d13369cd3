//! Parser limits and markup dialect selection

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Pos, Result, Span};

/// Configuration for parser limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum element nesting depth
    pub max_depth: usize,
    /// Maximum input size in bytes
    pub max_size: usize,
    /// Accept repeated attribute names on one element
    pub allow_duplicate_attributes: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: 100,
            max_size: 10 * 1024 * 1024, // 10MB
            allow_duplicate_attributes: false,
        }
    }
}

impl ParserConfig {
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub const fn with_duplicate_attributes(mut self, allow: bool) -> Self {
        self.allow_duplicate_attributes = allow;
        self
    }

    pub fn validate_size(&self, len: usize) -> Result<()> {
        if len > self.max_size {
            return Err(Error::new(
                ErrorKind::MaxSizeExceeded { max: self.max_size },
                Span::empty(),
            ));
        }
        Ok(())
    }

    pub fn validate_depth(&self, depth: usize, at: Pos) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::new(
                ErrorKind::MaxDepthExceeded {
                    max: self.max_depth,
                },
                Span::at(at),
            ));
        }
        Ok(())
    }
}

/// Markup grammar the document is written in
///
/// Only affects whether an element left without children may be written as `<tag/>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// XML and XAML: any element may self-close
    #[default]
    Xml,
    /// HTML: only void elements may be written without a closing tag
    Html,
}

const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

impl Dialect {
    /// Whether an element named `tag` with no children may drop its closing tag
    pub fn can_be_empty_tag(self, tag: &str) -> bool {
        match self {
            Self::Xml => true,
            Self::Html => HTML_VOID_ELEMENTS
                .iter()
                .any(|void| void.eq_ignore_ascii_case(tag)),
        }
    }

    /// Guess the dialect from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xml" | "xaml" | "axaml" | "svg" => Some(Self::Xml),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xml" | "xaml" => Ok(Self::Xml),
            "html" => Ok(Self::Html),
            other => Err(Error::new(
                ErrorKind::Expected {
                    expected: "xml or html".to_string(),
                    found: other.to_string(),
                },
                Span::empty(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = ParserConfig::default();
        assert_eq!(config.max_depth, 100);
        assert_eq!(config.max_size, 10 * 1024 * 1024);
        assert!(!config.allow_duplicate_attributes);
        assert!(config.with_duplicate_attributes(true).allow_duplicate_attributes);
    }

    #[test]
    fn test_size_limit() {
        let config = ParserConfig::default().with_max_size(4);
        assert!(config.validate_size(4).is_ok());
        let err = config.validate_size(5).err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::MaxSizeExceeded { max: 4 })
        );
    }

    #[test]
    fn test_xml_allows_any_empty_tag() {
        assert!(Dialect::Xml.can_be_empty_tag("Label"));
        assert!(Dialect::Xml.can_be_empty_tag("div"));
    }

    #[test]
    fn test_html_allows_only_void_elements() {
        assert!(Dialect::Html.can_be_empty_tag("br"));
        assert!(Dialect::Html.can_be_empty_tag("IMG"));
        assert!(!Dialect::Html.can_be_empty_tag("label"));
        assert!(!Dialect::Html.can_be_empty_tag("button"));
    }

    #[test]
    fn test_dialect_parsing() {
        assert_eq!("XAML".parse::<Dialect>().ok(), Some(Dialect::Xml));
        assert_eq!("html".parse::<Dialect>().ok(), Some(Dialect::Html));
        assert!("yaml".parse::<Dialect>().is_err());
        assert_eq!(Dialect::from_extension("htm"), Some(Dialect::Html));
        assert_eq!(Dialect::from_extension("json"), None);
    }
}
