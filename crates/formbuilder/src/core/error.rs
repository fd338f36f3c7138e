use std::result::Result as StdResult;

use thiserror::Error;

use super::id::FieldId;

/// Result type for form builder operations.
pub type Result<T> = StdResult<T, Error>;

/// Form builder error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("unknown field type: {0}")]
    /// The type tag has no entry in the field type table.
    UnknownFieldType(String),
    #[error("field not found: {0:?}")]
    /// The field id is not live in the tree.
    FieldNotFound(FieldId),
    #[error("field is not attached to the form: {0:?}")]
    /// The field has no parent container.
    Detached(FieldId),
    #[error("template not found: {0}")]
    /// No available field has this id.
    TemplateNotFound(String),
    #[error("field does not accept children: {0:?}")]
    /// Insertion under a field whose type does not accept children.
    NotAContainer(FieldId),
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    /// Insertion under the field itself or one of its descendants.
    WouldCreateCycle {
        /// Requested parent.
        parent: FieldId,
        /// Field being inserted.
        child: FieldId,
    },
    #[error("field is unique: {0:?}")]
    /// The operation would create a second instance of a unique field.
    UniqueField(FieldId),
    #[error("unknown attribute: {0}")]
    /// The attribute name is not part of the field model.
    UnknownAttribute(String),
    #[error("invalid value for {attribute}: {value}")]
    /// The value cannot be stored in the attribute.
    InvalidAttribute {
        /// Attribute name.
        attribute: String,
        /// Rejected value, rendered for display.
        value: String,
    },
    #[error("no field is being edited")]
    /// A property edit arrived with no settings session open.
    NotEditing,
    #[error("no modal is open")]
    /// A modal response arrived with no modal showing.
    NoModal,
    #[error("modal cannot accept response: {0}")]
    /// The response does not fit the open modal.
    UnexpectedResponse(String),
    #[error("config: {0}")]
    /// Configuration could not be loaded.
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
