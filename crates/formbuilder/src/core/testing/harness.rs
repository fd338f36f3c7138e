use std::collections::VecDeque;

use tracing::Level;
use tracing_subscriber::fmt;

use crate::core::{
    builder::{FieldSpec, FormBuilder},
    config::Config,
    error::Result,
    event::{EventOutcome, key::Key},
    field::{FieldConfig, FieldNode},
    host::Host,
    id::{Container, FieldId},
    modal::{Modal, ModalHandle},
};

/// Install a test-friendly tracing subscriber. Safe to call from every test.
pub fn init_tracing() {
    fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init()
        .ok();
}

/// A [`Host`] that records everything it is asked to do and answers
/// confirmations from a script.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    /// Fields handed over for rendering, with their container.
    pub rendered: Vec<(FieldId, Container)>,
    /// Alert messages, in order.
    pub alerts: Vec<String>,
    /// Confirmation prompts, in order.
    pub confirms: Vec<String>,
    /// Modals shown, with the handle each was given.
    pub modals: Vec<(ModalHandle, Modal)>,
    /// Handles closed, in order.
    pub hidden: Vec<ModalHandle>,
    /// Help pages requested.
    pub help_requests: Vec<String>,
    /// Answers for upcoming confirmations. Empty means yes.
    answers: VecDeque<bool>,
    /// Last handle issued.
    next_handle: u64,
}

impl ScriptedHost {
    /// A host that confirms everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next confirmation.
    pub fn answer(&mut self, yes: bool) -> &mut Self {
        self.answers.push_back(yes);
        self
    }

    /// The most recently shown modal.
    pub fn last_modal(&self) -> Option<&Modal> {
        self.modals.last().map(|(_, m)| m)
    }

    /// Handles shown and not yet hidden.
    pub fn open_handles(&self) -> Vec<ModalHandle> {
        self.modals
            .iter()
            .map(|(h, _)| *h)
            .filter(|h| !self.hidden.contains(h))
            .collect()
    }
}

impl Host for ScriptedHost {
    fn render(&mut self, field: FieldId, _node: &FieldNode, container: Container) {
        self.rendered.push((field, container));
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.answers.pop_front().unwrap_or(true)
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn show_modal(&mut self, modal: &Modal) -> ModalHandle {
        self.next_handle += 1;
        let handle = ModalHandle(self.next_handle);
        self.modals.push((handle, modal.clone()));
        handle
    }

    fn hide_modal(&mut self, handle: ModalHandle) {
        self.hidden.push(handle);
    }

    fn fetch_help(&mut self, url: &str) {
        self.help_requests.push(url.to_string());
    }
}

/// A session wired to a [`ScriptedHost`]. Tests drive it with keys and
/// inspect the tree and the host's log.
#[derive(Debug)]
pub struct Harness {
    /// Session under test.
    pub builder: FormBuilder,
    /// Recording host.
    pub host: ScriptedHost,
}

impl Harness {
    /// A harness with the default config.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// A harness with a custom config.
    pub fn with_config(config: Config) -> Result<Self> {
        init_tracing();
        Ok(Self {
            builder: FormBuilder::new(config)?,
            host: ScriptedHost::new(),
        })
    }

    /// Create a field from `config` and append it to `parent`.
    pub fn add(&mut self, config: FieldConfig, parent: Container) -> Result<FieldId> {
        let id = self.builder.create_field(FieldSpec::Config(config))?;
        let index = self.builder.tree().children(parent).len();
        self.builder.insert_field(&mut self.host, id, index, parent)?;
        Ok(id)
    }

    /// Append a field with just a type and label to `parent`.
    pub fn add_labeled(&mut self, tag: &str, label: &str, parent: Container) -> Result<FieldId> {
        self.add(FieldConfig::of_type(tag).label(label), parent)
    }

    /// Send one key.
    pub fn key(&mut self, key: impl Into<Key>) -> Result<EventOutcome> {
        self.builder.key(&mut self.host, key)
    }

    /// Send several keys, stopping at the first error.
    pub fn keys<K: Into<Key>>(&mut self, keys: impl IntoIterator<Item = K>) -> Result<()> {
        for k in keys {
            self.key(k)?;
        }
        Ok(())
    }

    /// Focus a field.
    pub fn focus(&mut self, field: FieldId) -> Result<()> {
        self.builder.focus_field(field)
    }

    /// Label of a field, or an empty string if it is gone.
    pub fn label(&self, field: FieldId) -> String {
        self.builder
            .field(field)
            .map(|n| n.label().to_string())
            .unwrap_or_default()
    }

    /// The form as labels, with children in brackets: `A[B, C], D`.
    pub fn outline(&self) -> String {
        self.outline_of(Container::Root)
    }

    /// Outline of one container.
    fn outline_of(&self, container: Container) -> String {
        self.builder
            .tree()
            .children(container)
            .iter()
            .map(|id| {
                let children = self.builder.tree().children(Container::Field(*id));
                if children.is_empty() {
                    self.label(*id)
                } else {
                    format!("{}[{}]", self.label(*id), self.outline_of(Container::Field(*id)))
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
