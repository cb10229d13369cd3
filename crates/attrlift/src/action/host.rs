//! Seam between context actions and the editor that hosts them

use std::ops::Range;

use crate::action::detect::EditTarget;
use crate::config::Dialect;
use crate::error::{Error, Result};
use crate::markup::model::{Document, NodePath};

/// Where the user's caret is
pub trait SelectionProvider {
    /// Node under the caret: the deepest node with `want_leaf`, else the deepest element
    fn current_node(&self, want_leaf: bool) -> Option<NodePath>;
}

/// Editor state an action reads and the commit path it writes through
pub trait EditHost: SelectionProvider {
    fn document(&self) -> &Document;

    /// Text the current document was parsed from
    fn source(&self) -> &str;

    fn dialect(&self) -> Dialect;

    /// Apply `patch` to the buffer as one transaction
    fn commit(&mut self, patch: TextPatch) -> Result<()>;

    /// The persisted form of the document is stale
    fn mark_dirty(&mut self);
}

/// Replacement of one byte range of the source buffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextPatch {
    pub range: Range<usize>,
    pub replacement: String,
}

impl TextPatch {
    pub fn new(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    /// Produce the patched text, leaving `source` untouched
    pub fn apply_to(&self, source: &str) -> Result<String> {
        let Range { start, end } = self.range;
        let (Some(head), Some(tail)) = (source.get(..start), source.get(end..)) else {
            return Err(Error::malformed(format!(
                "patch range {start}..{end} does not fit a buffer of {} bytes",
                source.len()
            )));
        };
        if start > end {
            return Err(Error::malformed(format!("patch range {start}..{end} is reversed")));
        }

        let mut out = String::with_capacity(head.len() + self.replacement.len() + tail.len());
        out.push_str(head);
        out.push_str(&self.replacement);
        out.push_str(tail);
        Ok(out)
    }
}

/// How an invocation ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was changed
    NotApplicable,
    Applied(EditTarget),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Refactoring offered at a caret position when it applies
pub trait ContextAction {
    /// Menu text
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn group(&self) -> &'static str;

    /// Cheap probe the host runs before offering the action
    fn is_available(&self, host: &dyn EditHost) -> bool;

    /// Run the action; `Ok(Outcome::NotApplicable)` when it does not apply here
    fn execute(&self, host: &mut dyn EditHost) -> Result<Outcome>;
}
