//! Input and notification types.

/// Key input model.
pub mod key;

use super::id::FieldId;

/// Result of routing an input to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event was processed and propagation stops.
    Handle,
    /// The event was processed without a state change and propagation stops.
    Consume,
    /// The event was not handled and should reach the host's default action.
    Ignore,
}

impl EventOutcome {
    /// Should the host stop the event here?
    pub fn halts(self) -> bool {
        !matches!(self, Self::Ignore)
    }
}

/// Notifications queued for the host, drained with `FormBuilder::take_events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The selection set changed.
    SelectionChanged {
        /// Selected fields in selection order.
        selected: Vec<FieldId>,
    },
    /// Field focus moved.
    FocusChanged {
        /// Field that lost focus.
        from: Option<FieldId>,
        /// Field that gained focus.
        to: Option<FieldId>,
    },
    /// Pending property edits were written to a field.
    FieldSaved(FieldId),
}
