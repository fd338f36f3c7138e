//! Core types of the form builder session.

/// Template catalog.
pub mod available;
/// The editing session.
pub mod builder;
/// Session configuration and user-facing text.
pub mod config;
/// Drag and drop gestures.
pub mod dragdrop;
/// Core error types.
pub mod error;
/// Input and notification types.
pub mod event;
/// Field attributes and nodes.
pub mod field;
/// Field type table.
pub mod field_type;
/// Keyboard focus state machine.
pub mod focus;
/// The presentation layer interface.
pub mod host;
/// Field ids and containers.
pub mod id;
/// Modal dialogs.
pub mod modal;
/// Name and label normalization.
pub mod names;
/// Option list editor.
pub mod options;
/// Property descriptions and the settings workflow.
pub mod property;
/// Selection set.
pub mod selection;
/// Testing utilities.
pub mod testing;
/// The field tree arena.
pub mod tree;
/// Unique template registry.
pub mod unique;

pub use available::{AvailableField, AvailableFields};
pub use builder::{Deletion, FieldSpec, FormBuilder};
pub use config::{Config, Strings};
pub use host::Host;
pub use id::{Container, FieldId};
pub use tree::FieldTree;
