//! Formbuilder: the editing core of an interactive form designer.
//!
//! A [`FormBuilder`] owns a tree of fields, a catalog of templates to create
//! fields from, and the selection, focus and property-editing state that
//! goes with them. All presentation goes through a [`Host`]: the builder
//! asks it to render fields, show modals and confirm deletions, and the host
//! feeds key presses, clicks, drags and modal responses back in.
//!
//! # Module Organization
//!
//! - [`field`] - Field attributes, config bundles and nodes
//! - [`focus`] - The keyboard navigation state machine
//! - [`property`] - Property descriptions and normalization
//! - [`testing`] - A scripted host and harness for tests

#![warn(missing_docs)]

mod core;

pub use core::{
    AvailableField, AvailableFields, Config, Container, Deletion, FieldId, FieldSpec, FieldTree,
    FormBuilder, Host, Strings,
};
pub use core::{
    dragdrop, error, event, field, field_type, focus, modal, names, options, property, selection,
    testing, unique,
};
