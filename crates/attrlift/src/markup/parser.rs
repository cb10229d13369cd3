//! Markup parser implementation
//!
//! Recursive descent over a byte [`Cursor`]. The tree is lossless enough for
//! caret lookup and patching: whitespace runs, comments, CDATA sections,
//! processing instructions and the doctype are all kept with their spans.

use tracing::{debug, instrument};

use crate::config::ParserConfig;
use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::lexer::cursor::{is_whitespace, Cursor};
use crate::markup::escape::decode_entities;
use crate::markup::model::{Attribute, Document, Element, Markup, Node, Quote, TagForm, Text};

/// Markup parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: ParserConfig,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default limits
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    pub const fn with_config(input: &'a [u8], config: ParserConfig) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            depth: 0,
        }
    }

    /// Parse a complete document: prolog, one root element, epilog
    #[instrument(level = "debug", skip(self))]
    pub fn parse(&mut self) -> Result<Document> {
        self.config.validate_size(self.cursor.remaining().len())?;

        let prolog = self.parse_misc()?;
        if self.cursor.is_eof() {
            return Err(self.expected("root element", "end of input"));
        }
        let root = self.parse_element()?;
        let epilog = self.parse_misc()?;

        if !self.cursor.is_eof() {
            return Err(self.error_here(ErrorKind::InvalidToken, "content after root element"));
        }

        debug!(root = %root.name, "parsed document");
        Ok(Document {
            prolog,
            root,
            epilog,
        })
    }

    /// Parse a lone `name="value"` attribute, as used by the attribute factory
    pub fn parse_attribute(&mut self) -> Result<Attribute> {
        self.cursor.skip_whitespace();
        let attribute = self.parse_attribute_inner()?;
        self.cursor.skip_whitespace();
        if !self.cursor.is_eof() {
            return Err(self.error_here(ErrorKind::InvalidToken, "trailing input after attribute"));
        }
        Ok(attribute)
    }

    /// Whitespace, comments, instructions and doctype outside the root element
    fn parse_misc(&mut self) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        loop {
            if self.cursor.current().is_some_and(is_whitespace) {
                let start = self.cursor.position();
                let begin = self.cursor.pos();
                self.cursor.skip_whitespace();
                nodes.push(Node::Text(Text {
                    content: bytes_to_string(self.cursor.slice_from(begin), start)?,
                    span: Span::new(start, self.cursor.position()),
                }));
            } else if self.cursor.starts_with(b"<!--") {
                nodes.push(Node::Comment(self.parse_delimited(b"<!--", b"-->")?));
            } else if self.cursor.starts_with(b"<?") {
                nodes.push(Node::Instruction(self.parse_delimited(b"<?", b"?>")?));
            } else if self.cursor.starts_with(b"<!") {
                nodes.push(Node::Doctype(self.parse_doctype()?));
            } else {
                return Ok(nodes);
            }
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        let start = self.cursor.position();
        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here(ErrorKind::InvalidToken, "unexpected closing tag"));
        }

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
                form: TagForm::Empty,
                span: Span::new(start, self.cursor.position()),
            });
        }

        self.expect_byte(b'>')?;

        self.depth += 1;
        self.config.validate_depth(self.depth, start)?;

        let mut children = Vec::new();
        loop {
            if self.cursor.starts_with(b"</") {
                let close_start = self.cursor.position();
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(Error::new(
                        ErrorKind::MismatchedTag {
                            open: name,
                            close: close_name,
                        },
                        Span::new(close_start, self.cursor.position()),
                    ));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.starts_with(b"<!--") {
                children.push(Node::Comment(self.parse_delimited(b"<!--", b"-->")?));
            } else if self.cursor.starts_with(b"<![CDATA[") {
                children.push(Node::CData(self.parse_delimited(b"<![CDATA[", b"]]>")?));
            } else if self.cursor.starts_with(b"<?") {
                children.push(Node::Instruction(self.parse_delimited(b"<?", b"?>")?));
            } else if self.cursor.current() == Some(b'<') {
                children.push(Node::Element(self.parse_element()?));
            } else if self.cursor.is_eof() {
                return Err(Error::with_message(
                    ErrorKind::UnterminatedMarkup,
                    Span::new(start, self.cursor.position()),
                    format!("unterminated element <{name}>"),
                ));
            } else {
                children.push(Node::Text(self.parse_text()?));
            }
        }

        self.depth -= 1;
        Ok(Element {
            name,
            attributes,
            children,
            form: TagForm::Paired,
            span: Span::new(start, self.cursor.position()),
        })
    }

    fn parse_attributes(&mut self) -> Result<Vec<Attribute>> {
        let mut attrs: Vec<Attribute> = Vec::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here(ErrorKind::UnterminatedMarkup, "unexpected end of input")),
            }

            let start = self.cursor.position();
            let attr = self.parse_attribute_inner()?;
            if !self.config.allow_duplicate_attributes
                && attrs.iter().any(|existing| existing.name == attr.name)
            {
                return Err(Error::new(
                    ErrorKind::DuplicateAttribute { name: attr.name },
                    Span::new(start, self.cursor.position()),
                ));
            }
            attrs.push(attr);
        }

        Ok(attrs)
    }

    fn parse_attribute_inner(&mut self) -> Result<Attribute> {
        let name = self.parse_name()?;
        self.cursor.skip_whitespace();
        self.expect_byte(b'=')?;
        self.cursor.skip_whitespace();

        let quote = match self.cursor.current() {
            Some(b'"') => Quote::Double,
            Some(b'\'') => Quote::Single,
            _ => return Err(self.error_here(ErrorKind::InvalidToken, "expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.position();
        let begin = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if char::from(b) == quote.as_char() {
                let raw = bytes_to_string(self.cursor.slice_from(begin), start)?;
                let span = Span::new(start, self.cursor.position());
                self.cursor.advance();
                let value = decode_entities(&raw).map_err(|err| relocate(err, span))?;
                return Ok(Attribute { name, value, quote });
            }
            if b == b'<' {
                return Err(self.error_here(ErrorKind::InvalidToken, "'<' not allowed in attribute value"));
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::UnterminatedMarkup, "unterminated attribute value"))
    }

    fn parse_text(&mut self) -> Result<Text> {
        let start = self.cursor.position();
        let begin = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let span = Span::new(start, self.cursor.position());
        let raw = bytes_to_string(self.cursor.slice_from(begin), start)?;
        let content = decode_entities(&raw).map_err(|err| relocate(err, span))?;
        Ok(Text { content, span })
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.position();
        let begin = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            Some(other) => {
                return Err(self.expected("name", &format!("{:?}", char::from(other))));
            }
            None => return Err(self.expected("name", "end of input")),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        bytes_to_string(self.cursor.slice_from(begin), start)
    }

    /// `open` content `close`, keeping the content
    fn parse_delimited(&mut self, open: &[u8], close: &[u8]) -> Result<Markup> {
        let start = self.cursor.position();
        self.cursor.advance_by(open.len());
        let begin = self.cursor.pos();

        while !self.cursor.is_eof() {
            if self.cursor.starts_with(close) {
                let content = bytes_to_string(self.cursor.slice_from(begin), start)?;
                self.cursor.advance_by(close.len());
                return Ok(Markup {
                    content,
                    span: Span::new(start, self.cursor.position()),
                });
            }
            self.cursor.advance();
        }

        Err(Error::new(
            ErrorKind::UnterminatedMarkup,
            Span::new(start, self.cursor.position()),
        ))
    }

    /// `<!DOCTYPE ...>` including a bracketed internal subset
    fn parse_doctype(&mut self) -> Result<Markup> {
        let start = self.cursor.position();
        self.cursor.advance_by(2);
        let begin = self.cursor.pos();
        let mut brackets = 0usize;

        while let Some(b) = self.cursor.current() {
            match b {
                b'[' => brackets += 1,
                b']' => brackets = brackets.saturating_sub(1),
                b'>' if brackets == 0 => {
                    let content = bytes_to_string(self.cursor.slice_from(begin), start)?;
                    self.cursor.advance();
                    return Ok(Markup {
                        content,
                        span: Span::new(start, self.cursor.position()),
                    });
                }
                _ => {}
            }
            self.cursor.advance();
        }

        Err(Error::new(
            ErrorKind::UnterminatedMarkup,
            Span::new(start, self.cursor.position()),
        ))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            return Ok(());
        }
        let found = match self.cursor.current() {
            Some(b) => format!("{:?}", char::from(b)),
            None => "end of input".to_string(),
        };
        Err(self.expected(&format!("{:?}", char::from(expected)), &found))
    }

    fn expected(&self, expected: &str, found: &str) -> Error {
        Error::new(
            ErrorKind::Expected {
                expected: expected.to_string(),
                found: found.to_string(),
            },
            Span::at(self.cursor.position()),
        )
    }

    fn error_here(&self, kind: ErrorKind, message: &str) -> Error {
        Error::with_message(kind, Span::at(self.cursor.position()), message)
    }
}

/// Parse a document with default limits
pub fn parse(input: &str) -> Result<Document> {
    Parser::new(input.as_bytes()).parse()
}

/// Parse a document with custom limits
pub fn parse_with_config(input: &str, config: ParserConfig) -> Result<Document> {
    Parser::with_config(input.as_bytes(), config).parse()
}

fn relocate(err: Error, span: Span) -> Error {
    Error::with_message(err.kind().clone(), span, err.message())
}

fn bytes_to_string(bytes: &[u8], at: Pos) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::new(ErrorKind::InvalidUtf8, Span::at(at)))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}
