//! Typed message patches.
//!
//! Handlers never mutate the shared [`Message`]. To produce a modified
//! line they build a [`MessagePatch`] naming only the fields they change and
//! apply it to get a new snapshot.
//!
//! # Example
//!
//! ```
//! use slirc_hooks::{Message, MessagePatch};
//! use slirc_hooks::message::Field;
//!
//! let original = Message::privmsg("#c", "hello");
//! let patch = MessagePatch::new().param(1, "goodbye");
//! let changed = original.apply(&patch);
//!
//! assert_eq!(changed.text(), Some("goodbye"));
//! assert_eq!(original.text(), Some("hello"));
//! assert_eq!(patch.changed(), vec![Field::Params]);
//! ```

use crate::source::Source;

use super::tags::Tags;
use super::types::Message;

/// A field of [`Message`] that a patch can change.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Field {
    /// [`Message::command`]
    Command,
    /// [`Message::params`]
    Params,
    /// [`Message::tags`]
    Tags,
    /// [`Message::source`]
    Source,
    /// [`Message::display_name`]
    DisplayName,
}

/// The set of intended changes to a [`Message`].
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct MessagePatch {
    /// Replacement command.
    pub command: Option<String>,
    /// Replacement parameter list.
    pub params: Option<Vec<String>>,
    /// Single-parameter replacements, applied after `params`.
    pub param_updates: Vec<(usize, String)>,
    /// Replacement tag block.
    pub tags: Option<Tags>,
    /// Replacement source.
    pub source: Option<Source>,
    /// Replacement display name; `Some(None)` clears it.
    pub display_name: Option<Option<String>>,
}

impl MessagePatch {
    /// An empty patch.
    pub fn new() -> Self {
        MessagePatch::default()
    }

    /// Replace the command.
    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Replace the whole parameter list.
    #[must_use]
    pub fn params<P, S>(mut self, params: P) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = Some(params.into_iter().map(Into::into).collect());
        self
    }

    /// Replace one parameter. Out-of-range indices are ignored on apply.
    #[must_use]
    pub fn param(mut self, index: usize, value: impl Into<String>) -> Self {
        self.param_updates.push((index, value.into()));
        self
    }

    /// Replace the tag block.
    #[must_use]
    pub fn tags(mut self, tags: Tags) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Replace the source.
    #[must_use]
    pub fn source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Replace (or clear) the display name.
    #[must_use]
    pub fn display_name(mut self, name: Option<String>) -> Self {
        self.display_name = Some(name);
        self
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.changed().is_empty()
    }

    /// The fields this patch touches, in declaration order.
    pub fn changed(&self) -> Vec<Field> {
        let mut fields = Vec::new();
        if self.command.is_some() {
            fields.push(Field::Command);
        }
        if self.params.is_some() || !self.param_updates.is_empty() {
            fields.push(Field::Params);
        }
        if self.tags.is_some() {
            fields.push(Field::Tags);
        }
        if self.source.is_some() {
            fields.push(Field::Source);
        }
        if self.display_name.is_some() {
            fields.push(Field::DisplayName);
        }
        fields
    }
}

impl Message {
    /// Return a copy of this message with `patch` applied.
    pub fn apply(&self, patch: &MessagePatch) -> Message {
        let mut msg = self.clone();
        if let Some(ref command) = patch.command {
            msg.command = command.clone();
        }
        if let Some(ref params) = patch.params {
            msg.params = params.clone();
        }
        for (index, value) in &patch.param_updates {
            if let Some(slot) = msg.params.get_mut(*index) {
                *slot = value.clone();
            }
        }
        if let Some(ref tags) = patch.tags {
            msg.tags = tags.clone();
        }
        if let Some(ref source) = patch.source {
            msg.source = source.clone();
        }
        if let Some(ref name) = patch.display_name {
            msg.display_name = name.clone();
        }
        msg
    }

    /// The patch that turns `self` into `other`.
    ///
    /// Only patchable fields are compared; `server` and the trailing flag
    /// are ignored.
    pub fn diff(&self, other: &Message) -> MessagePatch {
        MessagePatch {
            command: (self.command != other.command).then(|| other.command.clone()),
            params: (self.params != other.params).then(|| other.params.clone()),
            param_updates: Vec::new(),
            tags: (self.tags != other.tags).then(|| other.tags.clone()),
            source: (self.source != other.source).then(|| other.source.clone()),
            display_name: (self.display_name != other.display_name)
                .then(|| other.display_name.clone()),
        }
    }
}
