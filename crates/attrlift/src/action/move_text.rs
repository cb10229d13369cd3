//! "Move text to attribute" context action

use tracing::{debug, instrument};

use crate::action::detect::{detect_with, EditTarget};
use crate::action::host::{ContextAction, EditHost, Outcome};
use crate::action::mutate::apply;
use crate::action::tags::{TagAttributeMap, SUPPORTED_TAGS};
use crate::error::Result;

/// Turns `<Label>Hello</Label>` into `<Label Content="Hello"/>`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveTextToAttribute {
    tags: TagAttributeMap,
}

impl MoveTextToAttribute {
    pub const NAME: &'static str = "Move text to attribute";
    pub const DESCRIPTION: &'static str = "Moves the text content to an attribute";
    pub const GROUP: &'static str = "XAML";

    pub const fn new() -> Self {
        Self {
            tags: SUPPORTED_TAGS,
        }
    }

    /// Use a different tag table
    pub const fn with_tags(tags: TagAttributeMap) -> Self {
        Self { tags }
    }

    pub const fn tags(&self) -> &TagAttributeMap {
        &self.tags
    }

    /// What the action would do at the host's caret, if anything
    pub fn resolve(&self, host: &dyn EditHost) -> Option<EditTarget> {
        let node = host.current_node(true)?;
        detect_with(host.document(), &node, &self.tags)
    }
}

impl ContextAction for MoveTextToAttribute {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn group(&self) -> &'static str {
        Self::GROUP
    }

    fn is_available(&self, host: &dyn EditHost) -> bool {
        self.resolve(host).is_some()
    }

    #[instrument(level = "debug", skip_all)]
    fn execute(&self, host: &mut dyn EditHost) -> Result<Outcome> {
        let Some(target) = self.resolve(host) else {
            debug!("not applicable at caret");
            return Ok(Outcome::NotApplicable);
        };

        let applied = apply(host.document(), &target, host.dialect())?;
        host.commit(applied.patch)?;
        host.mark_dirty();
        Ok(Outcome::Applied(target))
    }
}
