use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// The kind of editable control drawn inside a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Enter leaves the control.
    SingleLine,
    /// Enter inserts a newline; Ctrl+Enter leaves the control.
    MultiLine,
}

/// Behaviour shared by every field of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The field may hold child fields.
    pub accept_children: bool,
    /// The interior control that keyboard focus can enter.
    pub control: Option<ControlKind>,
    /// The field is driven by an ordered option list.
    pub options: bool,
    /// The field has a configurable width.
    pub width: bool,
}

/// The closed set of field types a form can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    /// Single-line text input.
    Text,
    /// Multi-line text input.
    Textarea,
    /// Radio group.
    Radio,
    /// Drop-down select.
    Select,
    /// Single checkbox.
    Checkbox,
    /// Group of checkboxes.
    MultipleChoice,
    /// File picker.
    FileUpload,
    /// Push button.
    Button,
    /// Container for nested fields.
    Fieldset,
}

impl FieldType {
    /// Every type, in catalog order.
    pub const ALL: [Self; 9] = [
        Self::Text,
        Self::Textarea,
        Self::Radio,
        Self::Select,
        Self::Checkbox,
        Self::MultipleChoice,
        Self::FileUpload,
        Self::Button,
        Self::Fieldset,
    ];

    /// The type tag used in configuration.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::MultipleChoice => "multiple-choice",
            Self::FileUpload => "file-upload",
            Self::Button => "button",
            Self::Fieldset => "fieldset",
        }
    }

    /// Look up a type by tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// The capability row for this type.
    pub fn capabilities(self) -> Capabilities {
        let (accept_children, control, options, width) = match self {
            Self::Text => (false, Some(ControlKind::SingleLine), false, true),
            Self::Textarea => (false, Some(ControlKind::MultiLine), false, true),
            Self::Radio => (false, Some(ControlKind::SingleLine), true, false),
            Self::Select => (false, Some(ControlKind::SingleLine), true, true),
            Self::Checkbox => (false, Some(ControlKind::SingleLine), false, false),
            Self::MultipleChoice => (false, Some(ControlKind::SingleLine), true, false),
            Self::FileUpload => (false, Some(ControlKind::SingleLine), false, true),
            Self::Button => (false, None, false, false),
            Self::Fieldset => (true, None, false, false),
        };
        Capabilities {
            accept_children,
            control,
            options,
            width,
        }
    }

    /// Label given to a new field that has none.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Textarea => "Text Box",
            Self::Radio => "Radio Buttons",
            Self::Select => "Select Options",
            Self::Checkbox => "Checkbox",
            Self::MultipleChoice => "Multiple Choice",
            Self::FileUpload => "File Upload",
            Self::Button => "Button",
            Self::Fieldset => "Fieldset",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s).ok_or_else(|| Error::UnknownFieldType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for t in FieldType::ALL {
            assert_eq!(t.tag().parse::<FieldType>(), Ok(t));
        }
        assert_eq!(
            "slider".parse::<FieldType>(),
            Err(Error::UnknownFieldType("slider".into()))
        );
    }

    #[test]
    fn only_fieldsets_nest() {
        let nesting: Vec<_> = FieldType::ALL
            .into_iter()
            .filter(|t| t.capabilities().accept_children)
            .collect();
        assert_eq!(nesting, vec![FieldType::Fieldset]);
    }

    #[test]
    fn controls() {
        assert_eq!(
            FieldType::Textarea.capabilities().control,
            Some(ControlKind::MultiLine)
        );
        assert_eq!(FieldType::Fieldset.capabilities().control, None);
        assert!(FieldType::Select.capabilities().options);
        assert!(!FieldType::Text.capabilities().options);
    }
}
