//! The editing session: one value owning the field tree and every piece of
//! state that must stay consistent with it.

use std::mem;

use super::{
    available::{AvailableField, AvailableFields},
    config::Config,
    dragdrop::{DragEnd, DragSource, DragStart, DragState, DropEvent, DropTarget, drop_index},
    error::{Error, Result},
    event::{EditorEvent, EventOutcome, key::Key},
    field::{AttrValue, Attribute, FieldConfig, FieldNode},
    field_type::FieldType,
    focus::{self, Effect, FocusTarget, NavView, Notice, RecoveryHint},
    host::Host,
    id::{Container, FieldId},
    modal::{Anchor, Modal, ModalButton, ModalHandle, ModalResponse, OpenModal},
    names,
    options::{OptionRole, OptionsEditor},
    property::{self, EditorKind, PropertyList, PropertyWorkflow},
    selection::SelectionSet,
    tree::FieldTree,
    unique::UniqueRegistry,
};

/// Type used when a field config names none.
const DEFAULT_TYPE: FieldType = FieldType::Text;

/// What to build a field from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// A fresh field from an attribute bundle.
    Config(FieldConfig),
    /// An existing field, detached and ready to be inserted again.
    Existing(FieldId),
}

/// Outcome of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    /// The subtree was removed. Ids are in post-order.
    Deleted(Vec<FieldId>),
    /// The user declined the confirmation.
    Declined,
    /// The field is required and required fields are protected.
    Protected,
}

/// An interactive form-building session.
#[derive(Debug)]
pub struct FormBuilder {
    /// Session configuration.
    config: Config,
    /// Placed and detached fields.
    tree: FieldTree,
    /// Template catalog.
    templates: AvailableFields,
    /// Live instances of unique templates.
    unique: UniqueRegistry,
    /// Selected fields.
    selection: SelectionSet,
    /// Settings panel state.
    properties: PropertyWorkflow,
    /// Keyboard focus.
    focus: FocusTarget,
    /// Field that most recently held focus.
    last_focused: Option<FieldId>,
    /// Workflow modal currently showing.
    modal: Option<OpenModal>,
    /// Help modal currently showing.
    help: Option<ModalHandle>,
    /// Drag in flight.
    drag: Option<DragState>,
    /// Notifications not yet drained.
    events: Vec<EditorEvent>,
}

impl FormBuilder {
    /// Start a session with an empty form.
    pub fn new(config: Config) -> Result<Self> {
        let templates = AvailableFields::from_configs(
            &config.available_fields,
            &config.available_fields_id_prefix,
        )?;
        Ok(Self {
            config,
            tree: FieldTree::new(),
            templates,
            unique: UniqueRegistry::new(),
            selection: SelectionSet::new(),
            properties: PropertyWorkflow::default(),
            focus: FocusTarget::None,
            last_focused: None,
            modal: None,
            help: None,
            drag: None,
            events: Vec::new(),
        })
    }

    /// Session configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The field tree.
    pub fn tree(&self) -> &FieldTree {
        &self.tree
    }

    /// Look up a field.
    pub fn field(&self, id: FieldId) -> Option<&FieldNode> {
        self.tree.get(id)
    }

    /// The template catalog.
    pub fn templates(&self) -> &AvailableFields {
        &self.templates
    }

    /// Look up a template by id.
    pub fn available_field(&self, id: &str) -> Option<&AvailableField> {
        self.templates.get(id)
    }

    /// Live instances of unique templates.
    pub fn unique_fields(&self) -> &UniqueRegistry {
        &self.unique
    }

    /// Selected fields.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Settings panel state.
    pub fn properties(&self) -> &PropertyWorkflow {
        &self.properties
    }

    /// Keyboard focus.
    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    /// Field that most recently held focus.
    pub fn last_focused(&self) -> Option<FieldId> {
        self.last_focused
    }

    /// Workflow modal currently showing.
    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref().map(|m| &m.modal)
    }

    /// Highlighted button of the showing modal.
    pub fn highlighted(&self) -> Option<usize> {
        self.modal.as_ref().and_then(|m| m.highlighted)
    }

    /// Is the help modal showing?
    pub fn help_open(&self) -> bool {
        self.help.is_some()
    }

    /// Is a drag in flight?
    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Drain queued notifications.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        mem::take(&mut self.events)
    }

    /// Validate a config bundle and all of its children.
    fn check_config(config: &FieldConfig) -> Result<()> {
        config
            .field_type
            .as_deref()
            .map_or(Ok(DEFAULT_TYPE), str::parse::<FieldType>)?;
        config.fields.iter().try_for_each(Self::check_config)
    }

    /// Generate a field id no live field uses.
    fn fresh_id(&mut self) -> (String, u64) {
        loop {
            let seq = self.tree.next_seq();
            let id = format!("{}{seq}", self.config.fields_id_prefix);
            if self.tree.find(&id).is_none() {
                return (id, seq);
            }
        }
    }

    /// Build a detached field, and its children, from a checked config.
    fn build(&mut self, config: &FieldConfig) -> Result<FieldId> {
        let field_type = config
            .field_type
            .as_deref()
            .map_or(Ok(DEFAULT_TYPE), str::parse::<FieldType>)?;
        let (generated, seq) = self.fresh_id();
        let id = config.id.clone().unwrap_or(generated);
        let name = config
            .name
            .clone()
            .unwrap_or_else(|| names::generated_name(field_type, seq));
        let field = self
            .tree
            .create_detached(FieldNode::from_config(field_type, id, name, config));

        if field_type.capabilities().accept_children {
            for (i, child) in config.fields.iter().enumerate() {
                let child = self.build(child)?;
                self.tree.insert(child, i, Container::Field(field))?;
            }
        } else if !config.fields.is_empty() {
            tracing::warn!(%field_type, "children ignored on a field that cannot hold them");
        }
        Ok(field)
    }

    /// Create a detached field. Nothing is created if any type in the bundle
    /// is unknown. Detached fields live until they are inserted or passed to
    /// [`Self::delete_field`]; the caller owns that choice.
    ///
    /// Detaching an existing field releases its unique templates and drops it
    /// from the selection and focus.
    pub fn create_field(&mut self, spec: FieldSpec) -> Result<FieldId> {
        match spec {
            FieldSpec::Existing(id) => {
                self.tree.detach(id)?;
                let detached = self.tree.subtree_pre_order(id);
                self.forget(&detached);
                tracing::debug!(field = ?id, "field detached");
                Ok(id)
            }
            FieldSpec::Config(config) => {
                if let Err(e) = Self::check_config(&config) {
                    tracing::warn!(error = %e, "field not created");
                    return Err(e);
                }
                let field = self.build(&config)?;
                tracing::debug!(?field, "field created");
                Ok(field)
            }
        }
    }

    /// Place a field at `index` in `parent`, moving it if it is already
    /// placed. Returns the clamped index it landed at.
    pub fn insert_field(
        &mut self,
        host: &mut dyn Host,
        field: FieldId,
        index: usize,
        parent: Container,
    ) -> Result<usize> {
        self.check_unique_placement(field)?;
        let at = self.tree.insert(field, index, parent)?;
        self.render(host, field, parent);
        for id in self.tree.subtree_pre_order(field) {
            self.sync_unique(id);
        }
        tracing::info!(?field, ?parent, index = at, "field inserted");
        Ok(at)
    }

    /// Hand a field to the host and mark its subtree rendered.
    fn render(&mut self, host: &mut dyn Host, field: FieldId, container: Container) {
        if let Some(node) = self.tree.get(field) {
            host.render(field, node, container);
        }
        for id in self.tree.subtree_pre_order(field) {
            if let Some(node) = self.tree.get_mut(id) {
                node.rendered = true;
            }
        }
    }

    /// Render every placed field, top-level first.
    pub fn render_all(&mut self, host: &mut dyn Host) {
        let roots = self.tree.root_children().to_vec();
        for id in roots {
            self.render(host, id, Container::Root);
        }
        for id in self.tree.pre_order() {
            self.sync_unique(id);
        }
    }

    /// Is the field unique, either itself or as a registered instance?
    fn is_unique(&self, field: FieldId) -> bool {
        self.tree.get(field).is_some_and(FieldNode::unique)
            || self.unique.template_for(field).is_some()
    }

    /// The config a deep copy of `field` is built from. Unique descendants are
    /// left out.
    fn clone_config(&self, field: FieldId) -> Result<FieldConfig> {
        let node = self.tree.node(field)?;
        let mut config = node.cloning_config();
        for child in node.children() {
            if !self.is_unique(*child) {
                config.fields.push(self.clone_config(*child)?);
            }
        }
        Ok(config)
    }

    /// Insert a deep copy of `field` right after it. The copy is marked
    /// revealing until the host calls [`Self::finish_reveal`].
    pub fn duplicate_field(&mut self, host: &mut dyn Host, field: FieldId) -> Result<FieldId> {
        if self.is_unique(field) {
            tracing::warn!(?field, "unique field not duplicated");
            return Err(Error::UniqueField(field));
        }
        let parent = self.tree.parent(field).ok_or(Error::Detached(field))?;
        let index = self.tree.index_of(field).ok_or(Error::Detached(field))?;
        let config = self.clone_config(field)?;
        let copy = self.create_field(FieldSpec::Config(config))?;
        self.tree.node_mut(copy)?.revealing = true;
        self.insert_field(host, copy, index + 1, parent)?;
        tracing::info!(?field, ?copy, "field duplicated");
        Ok(copy)
    }

    /// The host finished revealing a duplicated field.
    pub fn finish_reveal(&mut self, field: FieldId) -> Result<()> {
        self.tree.node_mut(field)?.revealing = false;
        Ok(())
    }

    /// Ask the user, then remove a field and its subtree.
    pub fn delete_field(&mut self, host: &mut dyn Host, field: FieldId) -> Result<Deletion> {
        let node = self.tree.node(field)?;
        if node.required() && !self.config.allow_remove_required_fields {
            host.alert(self.config.strings.notice(Notice::RequiredField));
            tracing::warn!(?field, "required field not removed");
            return Ok(Deletion::Protected);
        }
        if !host.confirm(&self.config.strings.confirm_delete) {
            tracing::debug!(?field, "delete declined");
            return Ok(Deletion::Declined);
        }
        let removed = self.tree.remove_subtree(field)?;
        self.forget(&removed);
        tracing::info!(?field, count = removed.len(), "field deleted");
        Ok(Deletion::Deleted(removed))
    }

    /// Drop every reference the session holds to removed or detached fields.
    fn forget(&mut self, removed: &[FieldId]) {
        let templates: Vec<String> = removed
            .iter()
            .filter_map(|id| self.unique.template_for(*id).map(str::to_string))
            .collect();
        for t in templates {
            self.unique.unregister(&mut self.templates, &t);
        }
        self.unique.debug_assert_consistent(&self.templates);

        self.unselect_fields(Some(removed));
        if self.last_focused.is_some_and(|id| removed.contains(&id)) {
            self.last_focused = None;
        }
        if self.properties.editing().is_some_and(|id| removed.contains(&id)) {
            self.properties.set_editing(None);
        }
        if self
            .properties
            .list()
            .is_some_and(|l| removed.contains(&l.field()))
        {
            self.close_edit_properties();
        }
        if let Some(id) = self.focus.field()
            && removed.contains(&id)
        {
            self.focus = FocusTarget::None;
            self.events.push(EditorEvent::FocusChanged {
                from: Some(id),
                to: None,
            });
        }
        if matches!(&self.drag, Some(DragState { source: DragSource::Field(id) }) if removed.contains(id))
        {
            self.drag = None;
        }
    }

    /// Delete with confirmation, then move focus next to where the field was.
    fn delete_and_refocus(&mut self, host: &mut dyn Host, field: FieldId) -> Result<()> {
        let hint = RecoveryHint::for_field(&self.tree, field);
        if let Deletion::Deleted(_) = self.delete_field(host, field)? {
            self.set_focus(hint.target());
        }
        Ok(())
    }

    /// The catalog template a field was created from, and whether the pair
    /// is unique.
    fn template_of(&self, field: FieldId) -> Option<(String, bool)> {
        let node = self.tree.get(field)?;
        let raw = node.id();
        let template = raw
            .strip_prefix(self.config.fields_id_prefix.as_str())
            .unwrap_or(raw);
        let t = self.templates.get(template)?;
        Some((template.to_string(), t.unique() || node.unique()))
    }

    /// Refuse to place a subtree holding a second live instance of a unique
    /// template.
    fn check_unique_placement(&self, field: FieldId) -> Result<()> {
        let subtree = self.tree.subtree_pre_order(field);
        for id in &subtree {
            let Some((template, true)) = self.template_of(*id) else {
                continue;
            };
            if let Some(live) = self.unique.get(&template)
                && !subtree.contains(&live)
                && self.tree.is_attached(live)
            {
                tracing::warn!(template, field = ?id, ?live, "unique template already placed");
                return Err(Error::UniqueField(*id));
            }
        }
        Ok(())
    }

    /// Register or release the unique template a field was created from.
    fn sync_unique(&mut self, field: FieldId) {
        let Some((template, wants)) = self.template_of(field) else {
            return;
        };
        if wants && self.tree.is_attached(field) {
            self.unique.register(&mut self.templates, &template, field);
        } else if self.unique.get(&template) == Some(field) {
            self.unique.unregister(&mut self.templates, &template);
        }
        self.unique.debug_assert_consistent(&self.templates);
    }

    /// Describe a field's editable properties.
    pub fn get_field_properties(&self, field: FieldId, exclude_hidden: bool) -> Result<PropertyList> {
        let node = self.tree.node(field)?;
        Ok(PropertyList::for_field(field, node, exclude_hidden))
    }

    /// Queue a selection notification.
    fn emit_selection(&mut self) {
        self.events.push(EditorEvent::SelectionChanged {
            selected: self.selection.values().to_vec(),
        });
    }

    /// Add fields to the selection. Each newly selected field opens the
    /// property editor; the last one wins.
    pub fn select_fields(&mut self, fields: &[FieldId]) {
        let mut changed = false;
        for &id in fields {
            if !self.tree.contains(id) || !self.selection.add(id) {
                continue;
            }
            if let Some(node) = self.tree.get_mut(id) {
                node.selected = true;
            }
            changed = true;
            if let Err(e) = self.open_edit_properties(id) {
                tracing::warn!(error = %e, "property editor not opened");
            }
        }
        if changed {
            self.emit_selection();
        }
    }

    /// Remove fields from the selection, or clear it when `fields` is `None`.
    pub fn unselect_fields(&mut self, fields: Option<&[FieldId]>) {
        let fields = match fields {
            Some(f) => f.to_vec(),
            None => self.selection.values().to_vec(),
        };
        let mut changed = false;
        for id in fields {
            if !self.selection.remove(id) {
                continue;
            }
            if let Some(node) = self.tree.get_mut(id) {
                node.selected = false;
            }
            changed = true;
            self.close_edit_properties();
        }
        if changed {
            self.emit_selection();
        }
    }

    /// Make `field` the only selected field and the one under edit.
    pub fn edit_field(&mut self, field: FieldId) {
        if !self.tree.contains(field) {
            return;
        }
        self.properties.set_editing(Some(field));
        self.unselect_fields(None);
        self.select_fields(&[field]);
    }

    /// The host's cancel action: clear the selection.
    pub fn cancel(&mut self) {
        self.unselect_fields(None);
    }

    /// Show the settings tab bound to `field`.
    pub fn open_edit_properties(&mut self, field: FieldId) -> Result<()> {
        let list = self.get_field_properties(field, true)?;
        self.properties.open(list);
        Ok(())
    }

    /// Return to the fields tab.
    pub fn close_edit_properties(&mut self) {
        self.properties.close();
    }

    /// Record an edit from the property grid without writing it.
    pub fn set_pending_value(&mut self, attr: Attribute, value: AttrValue) -> Result<()> {
        let list = self.properties.list_mut().ok_or(Error::NotEditing)?;
        list.set_value(attr, value)
    }

    /// Write the open property list onto its field. Nothing is written if any
    /// value is rejected.
    pub fn save_all_pending_edits(&mut self) -> Result<()> {
        let Some(list) = self.properties.list() else {
            return Ok(());
        };
        let field = list.field();
        let pending: Vec<(Attribute, AttrValue)> = list
            .iter()
            .filter(|p| !p.is_read_only())
            .map(|p| (p.attribute, p.value.clone()))
            .collect();

        let node = self.tree.node_mut(field)?;
        let mut staged = node.clone();
        for (attr, value) in pending {
            staged.set_attribute(attr, value)?;
        }
        *node = staged;

        self.sync_unique(field);
        self.open_edit_properties(field)?;
        self.events.push(EditorEvent::FieldSaved(field));
        tracing::info!(?field, "pending edits saved");
        Ok(())
    }

    /// Write one property, normalizing names and labels, then refocus the
    /// field.
    pub fn update_property(&mut self, field: FieldId, attr: Attribute, value: AttrValue) -> Result<()> {
        if self.get_field_properties(field, true)?.get(attr).is_none() {
            return Err(Error::UnknownAttribute(attr.name().to_string()));
        }
        let value = property::normalize(attr, value);
        self.tree.node_mut(field)?.set_attribute(attr, value)?;
        self.sync_unique(field);
        if self.properties.list().is_some_and(|l| l.field() == field) {
            self.open_edit_properties(field)?;
        }
        self.set_focus(FocusTarget::Field(field));
        tracing::info!(?field, %attr, "property updated");
        Ok(())
    }

    /// Show a modal, replacing any open one, and move focus into it.
    fn open_modal(&mut self, host: &mut dyn Host, modal: Modal, focus: FocusTarget) {
        if let Some(old) = self.modal.take() {
            host.hide_modal(old.handle);
        }
        let handle = host.show_modal(&modal);
        tracing::debug!(?handle, "modal shown");
        self.modal = Some(OpenModal {
            handle,
            modal,
            highlighted: None,
        });
        self.set_focus(focus);
    }

    /// Focus for a freshly opened button modal.
    fn first_button(modal: &Modal) -> FocusTarget {
        modal
            .first_enabled()
            .map_or(FocusTarget::None, FocusTarget::ModalButton)
    }

    /// Open the modal listing a field's properties. Read-only properties are
    /// listed disabled.
    pub fn open_property_chooser(&mut self, host: &mut dyn Host, field: FieldId) -> Result<()> {
        let list = self.get_field_properties(field, true)?;
        let buttons = list
            .iter()
            .enumerate()
            .map(|(i, p)| {
                ModalButton::numbered(i, &p.display_name, p.attribute.name())
                    .enabled(!p.is_read_only())
            })
            .collect();
        let modal = Modal::ChooseProperty {
            field,
            title: self.config.strings.choose_property.clone(),
            buttons,
        };
        let focus = Self::first_button(&modal);
        self.open_modal(host, modal, focus);
        Ok(())
    }

    /// Open the editor modal for one property.
    pub fn choose_property(&mut self, host: &mut dyn Host, field: FieldId, attr: Attribute) -> Result<()> {
        let list = self.get_field_properties(field, true)?;
        let prop = list
            .get(attr)
            .ok_or_else(|| Error::UnknownAttribute(attr.name().to_string()))?;
        let Some(editor) = &prop.editor else {
            tracing::debug!(?field, %attr, "read-only property not edited");
            return Ok(());
        };
        let (modal, focus) = match editor {
            EditorKind::SingleChoice(choices) => {
                let buttons = choices
                    .iter()
                    .enumerate()
                    .map(|(i, (value, label))| ModalButton::numbered(i, label, value.as_str()))
                    .collect();
                let modal = Modal::Choices {
                    field,
                    attribute: attr,
                    buttons,
                };
                let focus = Self::first_button(&modal);
                (modal, focus)
            }
            EditorKind::Options => {
                let editor = OptionsEditor::new(self.tree.node(field)?.options());
                let focus = FocusTarget::Options(editor.initial_focus());
                let modal = Modal::Options {
                    field,
                    attribute: attr,
                    editor,
                };
                (modal, focus)
            }
            EditorKind::Text | EditorKind::TextArea => {
                let modal = Modal::TextInput {
                    field,
                    attribute: attr,
                    title: prop.display_name.clone(),
                    current: prop.value.to_string(),
                    multiline: *editor == EditorKind::TextArea,
                };
                (modal, FocusTarget::ModalInput)
            }
        };
        self.open_modal(host, modal, focus);
        Ok(())
    }

    /// Open the modal listing templates to instantiate at `anchor`. Unique
    /// templates that are already placed are listed disabled.
    pub fn open_add_field(&mut self, host: &mut dyn Host, anchor: Anchor) -> Result<()> {
        if let Anchor::After(id) | Anchor::ChildOf(id) = anchor {
            self.tree.node(id)?;
        }
        let buttons = self
            .templates
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let placed = t.unique() && self.unique.contains(t.id());
                ModalButton::numbered(i, t.label(), i.to_string()).enabled(!placed)
            })
            .collect();
        let modal = Modal::AddField { anchor, buttons };
        let focus = Self::first_button(&modal);
        self.open_modal(host, modal, focus);
        Ok(())
    }

    /// Instantiate the template at `index` and place it relative to `anchor`.
    fn keyboard_new_field(&mut self, host: &mut dyn Host, anchor: Anchor, index: usize) -> Result<()> {
        let template = self
            .templates
            .by_index(index)
            .ok_or_else(|| Error::TemplateNotFound(index.to_string()))?;
        if template.unique()
            && let Some(existing) = self.unique.get(template.id())
        {
            return Err(Error::UniqueField(existing));
        }
        let config = template.field_config();
        let (parent, at) = match anchor {
            Anchor::After(t) => (
                self.tree.parent(t).ok_or(Error::Detached(t))?,
                self.tree.index_of(t).map_or(0, |i| i + 1),
            ),
            Anchor::ChildOf(t) => (Container::Field(t), self.tree.children(Container::Field(t)).len()),
            Anchor::Root => (Container::Root, self.tree.root_children().len()),
        };
        let field = self.create_field(FieldSpec::Config(config))?;
        if let Err(e) = self.insert_field(host, field, at, parent) {
            self.tree.remove_subtree(field)?;
            return Err(e);
        }
        let focus = match anchor {
            Anchor::ChildOf(t) => self.tree.first_child(t),
            Anchor::After(t) => self.tree.next_sibling(t),
            Anchor::Root => self.tree.first_field(),
        };
        self.set_focus(focus.map_or(FocusTarget::None, FocusTarget::Field));
        Ok(())
    }

    /// Focus the most recently selected field, if any.
    fn selected_focus(&self) -> FocusTarget {
        self.selection
            .last()
            .filter(|id| self.tree.contains(*id))
            .map_or(FocusTarget::None, FocusTarget::Field)
    }

    /// Check that `response` fits the open modal without closing it.
    fn check_response(open: &OpenModal, response: &ModalResponse) -> Result<bool> {
        let fits = match (&open.modal, response) {
            (_, ModalResponse::Cancel) => true,
            (Modal::TextInput { .. }, ModalResponse::Text(_)) => true,
            (
                Modal::ChooseProperty { .. } | Modal::Choices { .. } | Modal::AddField { .. },
                ModalResponse::Button(i),
            ) => {
                let button = open
                    .modal
                    .buttons()
                    .get(*i)
                    .ok_or_else(|| Error::UnexpectedResponse(format!("no button {i}")))?;
                return Ok(button.enabled);
            }
            _ => false,
        };
        if fits {
            Ok(true)
        } else {
            Err(Error::UnexpectedResponse(format!("{response:?}")))
        }
    }

    /// Resolve the open modal. Activating a disabled button does nothing and
    /// leaves the modal open. Cancelling never touches the tree.
    pub fn resolve_modal(&mut self, host: &mut dyn Host, response: ModalResponse) -> Result<()> {
        let open = self.modal.as_ref().ok_or(Error::NoModal)?;
        if !Self::check_response(open, &response)? {
            tracing::debug!(?response, "disabled modal button ignored");
            return Ok(());
        }
        let open = self.modal.take().ok_or(Error::NoModal)?;
        host.hide_modal(open.handle);

        let value_of = |buttons: &[ModalButton], i: usize| {
            buttons
                .get(i)
                .map(|b| b.value.clone())
                .ok_or_else(|| Error::UnexpectedResponse(format!("no button {i}")))
        };
        match (open.modal, response) {
            (_, ModalResponse::Cancel) => {
                self.set_focus(self.selected_focus());
                Ok(())
            }
            (Modal::ChooseProperty { field, buttons, .. }, ModalResponse::Button(i)) => {
                let attr: Attribute = value_of(&buttons, i)?.parse()?;
                self.choose_property(host, field, attr)
            }
            (
                Modal::Choices {
                    field,
                    attribute,
                    buttons,
                },
                ModalResponse::Button(i),
            ) => self.update_property(field, attribute, AttrValue::Text(value_of(&buttons, i)?)),
            (Modal::TextInput { field, attribute, .. }, ModalResponse::Text(text)) => {
                self.update_property(field, attribute, AttrValue::Text(text))
            }
            (Modal::AddField { anchor, .. }, ModalResponse::Button(i)) => {
                self.keyboard_new_field(host, anchor, i)
            }
            (_, response) => Err(Error::UnexpectedResponse(format!("{response:?}"))),
        }
    }

    /// The options editor of the showing modal.
    pub fn options_editor(&self) -> Option<&OptionsEditor> {
        match self.modal.as_ref().map(|m| &m.modal) {
            Some(Modal::Options { editor, .. }) => Some(editor),
            _ => None,
        }
    }

    /// Mutable options editor, for binding the row inputs.
    pub fn options_editor_mut(&mut self) -> Option<&mut OptionsEditor> {
        match self.modal.as_mut().map(|m| &mut m.modal) {
            Some(Modal::Options { editor, .. }) => Some(editor),
            _ => None,
        }
    }

    /// Press a row button of the options editor.
    pub fn activate_option(&mut self, row: usize, role: OptionRole) -> Result<()> {
        let editor = self.options_editor_mut().ok_or(Error::NoModal)?;
        if let Some(next) = editor.activate(row, role) {
            self.set_focus(FocusTarget::Options(next));
        }
        Ok(())
    }

    /// Save the options editor onto its field.
    pub fn save_options(&mut self, host: &mut dyn Host) -> Result<()> {
        if self.options_editor().is_none() {
            return Err(Error::NoModal);
        }
        let open = self.modal.take().ok_or(Error::NoModal)?;
        host.hide_modal(open.handle);
        let Modal::Options {
            field,
            attribute,
            editor,
        } = open.modal
        else {
            return Err(Error::NoModal);
        };
        let options = editor.collect();
        self.update_property(field, attribute, AttrValue::Options(options))
    }

    /// Show the fetched help page, replacing any help already showing.
    pub fn show_help(&mut self, host: &mut dyn Host, html: impl Into<String>) {
        if let Some(old) = self.help.take() {
            host.hide_modal(old);
        }
        let modal = Modal::Help {
            title: self.config.strings.help.clone(),
            html: html.into(),
        };
        self.help = Some(host.show_modal(&modal));
    }

    /// Close the help page.
    pub fn hide_help(&mut self, host: &mut dyn Host) {
        if let Some(handle) = self.help.take() {
            host.hide_modal(handle);
        }
    }

    /// Move keyboard focus. Focusing a new field blurs the old one, records
    /// it as last focused and, when editing is enabled, puts it under edit.
    pub fn set_focus(&mut self, target: FocusTarget) {
        let target = match target.field() {
            Some(id) if !self.tree.contains(id) => FocusTarget::None,
            _ => target,
        };
        if self.focus == target {
            return;
        }
        let from = self.focus.field();
        let to = target.field();
        self.focus = target;
        if from == to {
            return;
        }
        if let Some(node) = from.and_then(|id| self.tree.get_mut(id)) {
            node.focused = false;
        }
        if let Some(id) = to {
            if let Some(node) = self.tree.get_mut(id) {
                node.focused = true;
            }
            self.last_focused = Some(id);
        }
        tracing::debug!(?from, ?to, "field focus moved");
        self.events.push(EditorEvent::FocusChanged { from, to });
        if let Some(id) = to
            && self.config.enable_editing
        {
            self.edit_field(id);
        }
    }

    /// Focus a field programmatically, blurring the previous one.
    pub fn focus_field(&mut self, field: FieldId) -> Result<()> {
        self.tree.node(field)?;
        self.set_focus(FocusTarget::Field(field));
        Ok(())
    }

    /// A mouse click on a field.
    pub fn click_field(&mut self, field: FieldId) -> Result<()> {
        self.focus_field(field)
    }

    /// What keyboard navigation can see right now.
    fn nav_view(&self) -> NavView<'_> {
        let modal = self.modal.as_ref();
        NavView {
            tree: &self.tree,
            buttons: modal.map_or(0, |m| m.modal.buttons().len()),
            highlighted: modal.and_then(|m| m.highlighted),
            option_rows: self.options_editor().map_or(0, OptionsEditor::len),
            last_focused: self.last_focused,
            selected: self.selection.last(),
        }
    }

    /// Route a key press. Ignored keys leave every piece of state untouched.
    pub fn key(&mut self, host: &mut dyn Host, key: impl Into<Key>) -> Result<EventOutcome> {
        let key = key.into();
        let t = focus::transition(&self.nav_view(), &self.focus, key);
        tracing::debug!(?key, outcome = ?t.outcome, "key routed");
        if t.outcome == EventOutcome::Ignore {
            return Ok(t.outcome);
        }
        self.set_focus(t.focus);
        for effect in t.effects {
            self.apply(host, effect)?;
        }
        Ok(t.outcome)
    }

    /// Carry out one transition effect.
    fn apply(&mut self, host: &mut dyn Host, effect: Effect) -> Result<()> {
        match effect {
            Effect::Move {
                field,
                parent,
                index,
            } => {
                self.insert_field(host, field, index, parent)?;
            }
            Effect::Delete(field) => self.delete_and_refocus(host, field)?,
            Effect::Duplicate(field) => match self.duplicate_field(host, field) {
                Err(Error::UniqueField(_)) => {
                    host.alert(self.config.strings.notice(Notice::FieldIsUnique));
                }
                other => {
                    other?;
                }
            },
            Effect::Notify(notice) => host.alert(self.config.strings.notice(notice)),
            Effect::ChooseProperty(field) => self.open_property_chooser(host, field)?,
            Effect::AddField(anchor) => self.open_add_field(host, anchor)?,
            Effect::Highlight(i) => {
                if let Some(m) = self.modal.as_mut() {
                    m.highlighted = Some(i);
                }
            }
            Effect::Activate(i) => self.resolve_modal(host, ModalResponse::Button(i))?,
            Effect::CancelModal => {
                if self.modal.is_some() {
                    self.resolve_modal(host, ModalResponse::Cancel)?;
                }
            }
            Effect::OptionButton { row, role } => self.activate_option(row, role)?,
            Effect::SaveOptions => self.save_options(host)?,
            Effect::FetchHelp => host.fetch_help(&self.config.help_url),
        }
        Ok(())
    }

    /// Mouse-down on a drag source. Templates that are locked by their unique
    /// instance stop the gesture here.
    pub fn drag_mouse_down(&self, source: &DragSource) -> DragStart {
        match source {
            DragSource::Template(t) if !self.templates.get(t).is_some_and(AvailableField::draggable) => {
                DragStart::Rejected
            }
            DragSource::Field(id) if !self.tree.contains(*id) => DragStart::Rejected,
            _ => DragStart::PassThrough,
        }
    }

    /// A drag begins.
    pub fn drag_start(&mut self, source: DragSource) -> DragStart {
        let start = match &source {
            DragSource::Template(t) => match self.templates.get(t) {
                Some(tpl) if tpl.draggable() => DragStart::CloneTemplate {
                    template: t.clone(),
                },
                _ => DragStart::Rejected,
            },
            DragSource::Field(id) if self.tree.contains(*id) => DragStart::PassThrough,
            DragSource::Field(_) => DragStart::Rejected,
        };
        tracing::debug!(?source, ?start, "drag started");
        if start != DragStart::Rejected {
            self.drag = Some(DragState { source });
        }
        start
    }

    /// A drag ends. The carried template is instantiated, or the carried
    /// field moved, at the drop position. Drops outside a container that
    /// accepts fields change nothing.
    pub fn drag_end(&mut self, host: &mut dyn Host, drop: &DropEvent) -> Result<DragEnd> {
        let Some(state) = self.drag.take() else {
            return Ok(DragEnd::default());
        };
        let (restore, dragged) = match &state.source {
            DragSource::Template(t) => (Some(t.clone()), None),
            DragSource::Field(id) => (None, Some(*id)),
        };
        let rejected = DragEnd {
            field: None,
            restore: restore.clone(),
        };
        let parent = match drop.target {
            DropTarget::Root => Container::Root,
            DropTarget::Field(p) if self.tree.get(p).is_some_and(FieldNode::accepts_children) => {
                Container::Field(p)
            }
            _ => {
                tracing::debug!(drop_target = ?drop.target, "drop rejected");
                return Ok(rejected);
            }
        };
        let index = drop_index(&drop.siblings, dragged);
        let field = match dragged {
            Some(id) => id,
            None => {
                let Some(config) = restore
                    .as_deref()
                    .and_then(|t| self.templates.get(t))
                    .filter(|t| t.draggable())
                    .map(AvailableField::field_config)
                else {
                    return Ok(rejected);
                };
                self.create_field(FieldSpec::Config(config))?
            }
        };
        if let Err(e) = self.insert_field(host, field, index, parent) {
            tracing::warn!(error = %e, "drop rejected");
            if dragged.is_none() {
                self.tree.remove_subtree(field)?;
            }
            return Ok(rejected);
        }
        Ok(DragEnd {
            field: Some(field),
            restore,
        })
    }
}
