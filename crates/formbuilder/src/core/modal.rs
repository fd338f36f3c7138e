use super::{field::Attribute, id::FieldId, options::OptionsEditor};

/// Host-assigned handle for a shown modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModalHandle(pub u64);

/// A numbered button in a modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalButton {
    /// Text shown, `(n) Label`.
    pub label: String,
    /// Value carried back when chosen.
    pub value: String,
    /// Disabled buttons cannot be activated.
    pub enabled: bool,
    /// Styled as a destructive choice.
    pub danger: bool,
}

impl ModalButton {
    /// An enabled button numbered from `index`.
    pub fn numbered(index: usize, label: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: format!("({}) {label}", index + 1),
            danger: value == "false",
            value,
            enabled: true,
        }
    }

    /// Set whether the button can be activated.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Where a field picked in the add-field modal goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Right after this field.
    After(FieldId),
    /// At the end of this field's children.
    ChildOf(FieldId),
    /// At the end of the form.
    Root,
}

/// A modal dialog the host should present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Pick which property of a field to edit.
    ChooseProperty {
        /// Field being edited.
        field: FieldId,
        /// Prompt text.
        title: String,
        /// One button per property.
        buttons: Vec<ModalButton>,
    },
    /// Pick a value for a single-choice property.
    Choices {
        /// Field being edited.
        field: FieldId,
        /// Property being edited.
        attribute: Attribute,
        /// One button per choice.
        buttons: Vec<ModalButton>,
    },
    /// Type a value for a text property.
    TextInput {
        /// Field being edited.
        field: FieldId,
        /// Property being edited.
        attribute: Attribute,
        /// Input caption.
        title: String,
        /// Value shown initially.
        current: String,
        /// Textarea rather than a single-line input.
        multiline: bool,
    },
    /// Edit an option list.
    Options {
        /// Field being edited.
        field: FieldId,
        /// Property being edited.
        attribute: Attribute,
        /// Live editor rows.
        editor: OptionsEditor,
    },
    /// Pick a template to instantiate.
    AddField {
        /// Insertion point.
        anchor: Anchor,
        /// One button per template.
        buttons: Vec<ModalButton>,
    },
    /// Show the help page.
    Help {
        /// Dialog title.
        title: String,
        /// Fetched page body.
        html: String,
    },
}

impl Modal {
    /// The numbered buttons, if this modal has any.
    pub fn buttons(&self) -> &[ModalButton] {
        match self {
            Self::ChooseProperty { buttons, .. }
            | Self::Choices { buttons, .. }
            | Self::AddField { buttons, .. } => buttons,
            _ => &[],
        }
    }

    /// First button that can be activated.
    pub fn first_enabled(&self) -> Option<usize> {
        self.buttons().iter().position(|b| b.enabled)
    }
}

/// How the user closed a modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalResponse {
    /// A numbered button was activated.
    Button(usize),
    /// A text value was submitted.
    Text(String),
    /// The modal was dismissed.
    Cancel,
}

/// The modal currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenModal {
    /// Host handle.
    pub(crate) handle: ModalHandle,
    /// Content.
    pub(crate) modal: Modal,
    /// Button carrying the highlight.
    pub(crate) highlighted: Option<usize>,
}
