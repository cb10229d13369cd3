//! Context actions over a parsed markup document

pub mod detect;
pub mod host;
pub mod move_text;
pub mod mutate;
pub mod tags;

pub use detect::{detect, detect_with, EditTarget};
pub use host::{ContextAction, EditHost, Outcome, SelectionProvider, TextPatch};
pub use move_text::MoveTextToAttribute;
pub use mutate::{apply, Applied};
pub use tags::{TagAttributeMap, SUPPORTED_TAGS};
