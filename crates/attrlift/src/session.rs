//! In-memory editing session
//!
//! Owns the text buffer, the document parsed from it and the caret. A commit
//! patches a copy of the buffer and re-parses it; buffer and document are only
//! replaced together once the new text parses, so no reader ever sees a
//! half-applied edit or a tree that still points at removed text.

use std::mem;
use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::action::host::{EditHost, SelectionProvider, TextPatch};
use crate::config::{Dialect, ParserConfig};
use crate::error::{Error, ErrorKind, Result, Span};
use crate::markup::model::{Document, NodePath};
use crate::markup::parser::parse_with_config;

/// Editing session over one markup buffer
#[derive(Clone, Debug)]
pub struct Session {
    path: Option<PathBuf>,
    source: String,
    document: Document,
    caret: usize,
    dialect: Dialect,
    config: ParserConfig,
    dirty: bool,
    undo: Vec<String>,
}

impl Session {
    /// Open a session with default limits and the XML dialect
    pub fn new(source: impl Into<String>) -> Result<Self> {
        Self::with_options(source, Dialect::default(), ParserConfig::default())
    }

    pub fn with_options(
        source: impl Into<String>,
        dialect: Dialect,
        config: ParserConfig,
    ) -> Result<Self> {
        let source = source.into();
        let document = parse_with_config(&source, config)?;
        Ok(Self {
            path: None,
            source,
            document,
            caret: 0,
            dialect,
            config,
            dirty: false,
            undo: Vec::new(),
        })
    }

    /// Associate the buffer with the file it was read from
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub const fn caret(&self) -> usize {
        self.caret
    }

    /// Move the caret to a byte offset
    pub fn set_caret(&mut self, offset: usize) -> Result<()> {
        if !self.source.is_char_boundary(offset) {
            return Err(Error::new(
                ErrorKind::Expected {
                    expected: format!("caret offset within 0..={}", self.source.len()),
                    found: offset.to_string(),
                },
                Span::empty(),
            ));
        }
        self.caret = offset;
        Ok(())
    }

    /// Move the caret to a 1-based line and character column
    pub fn set_caret_at(&mut self, line: usize, col: usize) -> Result<()> {
        let offset = offset_at(&self.source, line, col).ok_or_else(|| {
            Error::new(
                ErrorKind::Expected {
                    expected: "a position inside the document".to_string(),
                    found: format!("{line}:{col}"),
                },
                Span::empty(),
            )
        })?;
        self.set_caret(offset)
    }

    /// There are committed edits not yet saved
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Restore the buffer as it was before the last commit
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(previous) = self.undo.pop() else {
            return Ok(false);
        };
        self.document = parse_with_config(&previous, self.edit_config())?;
        self.source = previous;
        self.caret = self.caret.min(self.source.len());
        while !self.source.is_char_boundary(self.caret) {
            self.caret -= 1;
        }
        self.dirty = true;
        debug!("undid last edit");
        Ok(true)
    }

    pub fn into_source(self) -> String {
        self.source
    }

    /// Limits for re-parsing edited text, which may repeat an attribute name
    fn edit_config(&self) -> ParserConfig {
        self.config.with_duplicate_attributes(true)
    }
}

impl SelectionProvider for Session {
    fn current_node(&self, want_leaf: bool) -> Option<NodePath> {
        self.document.node_at(self.caret, want_leaf)
    }
}

impl EditHost for Session {
    fn document(&self) -> &Document {
        &self.document
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[instrument(level = "debug", skip_all, fields(range = ?patch.range))]
    fn commit(&mut self, patch: TextPatch) -> Result<()> {
        let next = patch.apply_to(&self.source)?;
        let document = parse_with_config(&next, self.edit_config())
            .map_err(|err| Error::malformed(format!("edit produced invalid markup: {err}")))?;

        self.undo.push(mem::replace(&mut self.source, next));
        self.document = document;
        self.caret = patch.range.start;
        Ok(())
    }

    fn mark_dirty(&mut self) {
        if !self.dirty {
            info!(path = ?self.path, "document modified");
        }
        self.dirty = true;
    }
}

/// Byte offset of a 1-based line and character column
///
/// The column may point one past the last character of the line.
pub fn offset_at(source: &str, line: usize, col: usize) -> Option<usize> {
    if line == 0 || col == 0 {
        return None;
    }

    let mut line_start = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let content = text.strip_suffix('\n').unwrap_or(text);
            let content = content.strip_suffix('\r').unwrap_or(content);
            return content
                .char_indices()
                .map(|(offset, _)| offset)
                .chain(std::iter::once(content.len()))
                .nth(col - 1)
                .map(|offset| line_start + offset);
        }
        line_start += text.len();
    }

    // empty trailing line after a final newline
    (line_start == source.len() && col == 1 && source.ends_with('\n')).then_some(line_start)
}
