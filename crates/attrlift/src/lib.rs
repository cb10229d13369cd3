//! attrlift - move inline element text into an attribute
//!
//! Given a caret inside a markup document, the "Move text to attribute" action
//! rewrites `<Label>Hello</Label>` as `<Label Content="Hello"/>` for the controls
//! listed in [`SUPPORTED_TAGS`]. Only the edited element changes; every other
//! byte of the document is kept.
//!
//! # Quick Start
//!
//! ```
//! use attrlift::{move_text_to_attribute, Dialect};
//! # fn main() -> Result<(), attrlift::Error> {
//! let src = "<StackPanel><Button>Say \"Hi\"</Button></StackPanel>";
//! let caret = src.find("Say").unwrap_or_default();
//! let out = move_text_to_attribute(src, caret, Dialect::Xml)?;
//! assert_eq!(
//!     out.as_deref(),
//!     Some("<StackPanel><Button Content=\"Say &quot;Hi&quot;\"/></StackPanel>")
//! );
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod config;
pub use config::{Dialect, ParserConfig};

pub mod lexer;

pub mod markup;
pub use markup::{parse, Attribute, Document, Element, Node, NodePath, TagForm};

pub mod action;
pub use action::{
    ContextAction, EditHost, EditTarget, MoveTextToAttribute, Outcome, SelectionProvider,
    TagAttributeMap, TextPatch, SUPPORTED_TAGS,
};

pub mod session;
pub use session::Session;

/// Probe a caret position without changing anything
pub fn probe(source: &str, offset: usize) -> Result<Option<EditTarget>> {
    let mut session = Session::new(source)?;
    session.set_caret(offset)?;
    Ok(MoveTextToAttribute::new().resolve(&session))
}

/// Run the action at `offset`; `None` when it does not apply there
pub fn move_text_to_attribute(
    source: &str,
    offset: usize,
    dialect: Dialect,
) -> Result<Option<String>> {
    let mut session = Session::with_options(source, dialect, ParserConfig::default())?;
    session.set_caret(offset)?;
    match MoveTextToAttribute::new().execute(&mut session)? {
        Outcome::Applied(_) => Ok(Some(session.into_source())),
        Outcome::NotApplicable => Ok(None),
    }
}
