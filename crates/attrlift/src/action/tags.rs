//! Elements whose text content has an attribute equivalent

/// Tag name to attribute name lookup table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagAttributeMap {
    entries: &'static [(&'static str, &'static str)],
}

/// Controls that expose their text through `Content` or `Text`
pub const SUPPORTED_TAGS: TagAttributeMap = TagAttributeMap::new(&[
    ("Label", "Content"),
    ("Button", "Content"),
    ("CheckBox", "Content"),
    ("RadioButton", "Content"),
    ("RepeatButton", "Content"),
    ("TextBlock", "Text"),
    ("TextBox", "Text"),
]);

impl TagAttributeMap {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Attribute that can hold the text of `tag`; names match exactly
    pub fn attribute_for(&self, tag: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|&(_, attribute)| attribute)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.attribute_for(tag).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TagAttributeMap {
    fn default() -> Self {
        SUPPORTED_TAGS
    }
}
