//! Keyboard focus: where it is, and where each key sends it.
//!
//! [`transition`] is a pure function over a read-only [`NavView`]. It decides
//! the next [`FocusTarget`] and lists the [`Effect`]s the session must carry
//! out; it never mutates anything itself.

use super::{
    event::{
        EventOutcome,
        key::{Ctrl, Empty, Key, KeyCode},
    },
    field_type::ControlKind,
    id::{Container, FieldId},
    modal::Anchor,
    options::{OptionRole, OptionsFocus},
    tree::FieldTree,
};

/// The element holding keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FocusTarget {
    /// Nothing the editor tracks.
    #[default]
    None,
    /// A placed field.
    Field(FieldId),
    /// The editable control inside a field.
    FieldControl(FieldId),
    /// A numbered modal button.
    ModalButton(usize),
    /// The text input of a modal.
    ModalInput,
    /// A control of the options editor.
    Options(OptionsFocus),
}

impl FocusTarget {
    /// The field whose box contains the focus.
    pub fn field(&self) -> Option<FieldId> {
        match self {
            Self::Field(id) | Self::FieldControl(id) => Some(*id),
            _ => None,
        }
    }

    /// Is focus in a text entry control, where typed characters are input?
    pub fn is_text_entry(&self) -> bool {
        match self {
            Self::FieldControl(_) | Self::ModalInput => true,
            Self::Options(OptionsFocus::Row { role, .. }) => role.is_input(),
            _ => false,
        }
    }
}

/// Messages the host is asked to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// A unique field cannot be duplicated.
    FieldIsUnique,
    /// The field cannot hold children.
    NoChildren,
    /// A required field cannot be removed.
    RequiredField,
}

/// Work the session performs after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Move a field within its parent.
    Move {
        /// Field to move.
        field: FieldId,
        /// Its containing list.
        parent: Container,
        /// Target index, as understood by insertion.
        index: usize,
    },
    /// Confirm, then delete a field and refocus.
    Delete(FieldId),
    /// Duplicate a field.
    Duplicate(FieldId),
    /// Show a message.
    Notify(Notice),
    /// Open the choose-property modal.
    ChooseProperty(FieldId),
    /// Open the add-field modal.
    AddField(Anchor),
    /// Move the modal highlight.
    Highlight(usize),
    /// Activate a modal button.
    Activate(usize),
    /// Dismiss the open modal.
    CancelModal,
    /// Press an options-editor row button.
    OptionButton {
        /// Row index.
        row: usize,
        /// Button pressed.
        role: OptionRole,
    },
    /// Save the options editor.
    SaveOptions,
    /// Ask the host to fetch the help page.
    FetchHelp,
}

/// Outcome of routing a key through the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Focus after the key.
    pub focus: FocusTarget,
    /// Work to perform, in order.
    pub effects: Vec<Effect>,
    /// Whether the key was handled.
    pub outcome: EventOutcome,
}

impl Transition {
    /// Leave everything alone and let the key through.
    fn ignore(focus: FocusTarget) -> Self {
        Self {
            focus,
            effects: Vec::new(),
            outcome: EventOutcome::Ignore,
        }
    }

    /// Stop the key without changing anything.
    fn consume(focus: FocusTarget) -> Self {
        Self {
            focus,
            effects: Vec::new(),
            outcome: EventOutcome::Consume,
        }
    }

    /// Stop the key and move focus.
    fn to(focus: FocusTarget) -> Self {
        Self::handle(focus, Vec::new())
    }

    /// Stop the key, move focus, and perform effects.
    fn handle(focus: FocusTarget, effects: Vec<Effect>) -> Self {
        Self {
            focus,
            effects,
            outcome: EventOutcome::Handle,
        }
    }
}

/// What navigation can see of the session.
#[derive(Debug, Clone, Copy)]
pub struct NavView<'a> {
    /// Field tree.
    pub tree: &'a FieldTree,
    /// Number of buttons in the open modal.
    pub buttons: usize,
    /// Highlighted modal button.
    pub highlighted: Option<usize>,
    /// Rows in the open options editor.
    pub option_rows: usize,
    /// Field that most recently held focus.
    pub last_focused: Option<FieldId>,
    /// Most recently selected field.
    pub selected: Option<FieldId>,
}

/// Preferred refocus candidates around a removed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryHint {
    /// Next sibling.
    pub next: Option<FieldId>,
    /// Previous sibling.
    pub prev: Option<FieldId>,
    /// Parent field.
    pub ancestor: Option<FieldId>,
}

impl RecoveryHint {
    /// Capture the candidates before `id` is removed.
    pub fn for_field(tree: &FieldTree, id: FieldId) -> Self {
        Self {
            next: tree.next_sibling(id),
            prev: tree.prev_sibling(id),
            ancestor: tree.parent_field(id),
        }
    }

    /// Where focus goes: next, else previous, else parent.
    pub fn target(&self) -> FocusTarget {
        self.next
            .or(self.prev)
            .or(self.ancestor)
            .map_or(FocusTarget::None, FocusTarget::Field)
    }
}

/// Route a key from `focus`.
pub fn transition(view: &NavView<'_>, focus: &FocusTarget, key: Key) -> Transition {
    if key.is_help() && !focus.is_text_entry() {
        return Transition::handle(*focus, vec![Effect::FetchHelp]);
    }
    match *focus {
        FocusTarget::FieldControl(id) => control_key(view, id, key),
        FocusTarget::Field(id) => field_key(view, id, key),
        FocusTarget::ModalButton(index) => button_key(view, index, key),
        FocusTarget::ModalInput => input_key(view, key),
        FocusTarget::Options(OptionsFocus::Save) => save_key(view, key),
        FocusTarget::Options(OptionsFocus::Row { row, role }) => option_key(view, row, role, key),
        FocusTarget::None => idle_key(view, key),
    }
}

/// Keys inside a field's editable control.
fn control_key(view: &NavView<'_>, id: FieldId, key: Key) -> Transition {
    let here = FocusTarget::FieldControl(id);
    let control = view
        .tree
        .get(id)
        .and_then(|n| n.capabilities().control)
        .unwrap_or(ControlKind::SingleLine);
    let leave = key == KeyCode::Esc
        || match control {
            ControlKind::SingleLine => key == KeyCode::Enter,
            ControlKind::MultiLine => key == Ctrl + KeyCode::Enter,
        };
    if leave {
        Transition::to(FocusTarget::Field(id))
    } else {
        Transition::ignore(here)
    }
}

/// Keys on a focused field.
fn field_key(view: &NavView<'_>, id: FieldId, key: Key) -> Transition {
    let tree = view.tree;
    let here = FocusTarget::Field(id);
    let Some(node) = tree.get(id) else {
        return Transition::ignore(here);
    };
    let next = tree.next_sibling(id);
    let prev = tree.prev_sibling(id);
    let ancestor = tree.parent_field(id);
    let first_child = tree.first_child(id);
    let position = tree.parent(id).zip(tree.index_of(id));

    if key == 'j' || key == Ctrl + KeyCode::Down {
        if let (Some(_), Some((parent, index))) = (next, position) {
            let effect = Effect::Move {
                field: id,
                parent,
                index: index + 1,
            };
            return Transition::handle(here, vec![effect]);
        }
    } else if key == 'k' || key == Ctrl + KeyCode::Up {
        if let (Some(_), Some((parent, index))) = (prev, position) {
            let effect = Effect::Move {
                field: id,
                parent,
                index: index - 1,
            };
            return Transition::handle(here, vec![effect]);
        }
    }

    if key.mods != Empty {
        return Transition::ignore(here);
    }
    match key.key {
        KeyCode::Right => match first_child.or(next) {
            Some(to) => Transition::to(FocusTarget::Field(to)),
            None => Transition::consume(here),
        },
        KeyCode::Down => next.map_or_else(
            || Transition::ignore(here),
            |to| Transition::to(FocusTarget::Field(to)),
        ),
        KeyCode::Left => match ancestor.or(prev) {
            Some(to) => Transition::to(FocusTarget::Field(to)),
            None => Transition::consume(here),
        },
        KeyCode::Up => prev.map_or_else(
            || Transition::ignore(here),
            |to| Transition::to(FocusTarget::Field(to)),
        ),
        KeyCode::Enter => {
            if node.capabilities().control.is_some() {
                Transition::to(FocusTarget::FieldControl(id))
            } else if let Some(child) = first_child {
                Transition::to(FocusTarget::Field(child))
            } else {
                Transition::consume(here)
            }
        }
        KeyCode::Esc => ancestor.map_or_else(
            || Transition::ignore(here),
            |to| Transition::to(FocusTarget::Field(to)),
        ),
        KeyCode::Delete | KeyCode::Backspace => Transition::handle(here, vec![Effect::Delete(id)]),
        KeyCode::Char('d') => {
            let effect = if node.unique() {
                Effect::Notify(Notice::FieldIsUnique)
            } else {
                Effect::Duplicate(id)
            };
            Transition::handle(here, vec![effect])
        }
        KeyCode::Char('e') => Transition::handle(here, vec![Effect::ChooseProperty(id)]),
        KeyCode::Char('n') => Transition::handle(here, vec![Effect::AddField(Anchor::After(id))]),
        KeyCode::Char('c') => {
            let effect = if node.accepts_children() {
                Effect::AddField(Anchor::ChildOf(id))
            } else {
                Effect::Notify(Notice::NoChildren)
            };
            Transition::handle(here, vec![effect])
        }
        _ => Transition::ignore(here),
    }
}

/// Keys on a numbered modal button.
fn button_key(view: &NavView<'_>, index: usize, key: Key) -> Transition {
    let here = FocusTarget::ModalButton(index);
    let focus_button = |to: usize| {
        Transition::handle(FocusTarget::ModalButton(to), vec![Effect::Highlight(to)])
    };
    if let Some(n) = key.digit() {
        let target = (n as usize).checked_sub(1).filter(|i| *i < view.buttons);
        return match target {
            Some(i) if view.highlighted == Some(i) => {
                Transition::handle(here, vec![Effect::Activate(i)])
            }
            Some(i) => focus_button(i),
            None => Transition::consume(here),
        };
    }
    if key == KeyCode::Down {
        if index + 1 < view.buttons {
            return focus_button(index + 1);
        }
    } else if key == KeyCode::Up {
        if let Some(to) = index.checked_sub(1) {
            return focus_button(to);
        }
    } else if key == KeyCode::Enter {
        return Transition::handle(here, vec![Effect::Activate(index)]);
    } else if key == KeyCode::Esc {
        return cancel(view);
    }
    Transition::ignore(here)
}

/// Dismiss the modal and return to the selected field.
fn cancel(view: &NavView<'_>) -> Transition {
    let focus = view
        .selected
        .filter(|id| view.tree.contains(*id))
        .map_or(FocusTarget::None, FocusTarget::Field);
    Transition::handle(focus, vec![Effect::CancelModal])
}

/// Keys in a modal's text input. Enter submission is the host's job, since
/// only it holds the typed text.
fn input_key(view: &NavView<'_>, key: Key) -> Transition {
    if key == KeyCode::Esc {
        cancel(view)
    } else {
        Transition::ignore(FocusTarget::ModalInput)
    }
}

/// Keys on the options editor's save button.
fn save_key(view: &NavView<'_>, key: Key) -> Transition {
    let here = FocusTarget::Options(OptionsFocus::Save);
    if key == KeyCode::Enter {
        Transition::handle(here, vec![Effect::SaveOptions])
    } else if key == KeyCode::Up {
        match view.option_rows.checked_sub(1) {
            Some(row) => Transition::to(FocusTarget::Options(OptionsFocus::Row {
                row,
                role: OptionRole::Label,
            })),
            None => Transition::consume(here),
        }
    } else if key == KeyCode::Esc {
        cancel(view)
    } else {
        Transition::ignore(here)
    }
}

/// Keys on an options editor row control.
fn option_key(view: &NavView<'_>, row: usize, role: OptionRole, key: Key) -> Transition {
    let here = FocusTarget::Options(OptionsFocus::Row { row, role });
    let at = |row: usize, role: OptionRole| FocusTarget::Options(OptionsFocus::Row { row, role });

    if key == KeyCode::Esc {
        return cancel(view);
    }
    if key == KeyCode::Down {
        let to = if row + 1 < view.option_rows {
            at(row + 1, role)
        } else {
            FocusTarget::Options(OptionsFocus::Save)
        };
        return Transition::to(to);
    }
    if key == KeyCode::Up {
        return match row.checked_sub(1) {
            Some(up) => Transition::to(at(up, role)),
            None => Transition::consume(here),
        };
    }

    if role.is_input() {
        if key == KeyCode::Enter {
            let last_in_row = role.next().is_none_or(|r| !r.is_input());
            if last_in_row && row + 1 < view.option_rows {
                return Transition::to(at(row + 1, role));
            }
            return Transition::consume(here);
        }
        return Transition::ignore(here);
    }

    match key.key {
        _ if key.mods != Empty => Transition::ignore(here),
        KeyCode::Left => role
            .prev()
            .map_or_else(|| Transition::consume(here), |r| Transition::to(at(row, r))),
        KeyCode::Right => role
            .next()
            .map_or_else(|| Transition::consume(here), |r| Transition::to(at(row, r))),
        KeyCode::Enter => Transition::handle(here, vec![Effect::OptionButton { row, role }]),
        _ => Transition::ignore(here),
    }
}

/// Keys when no field or modal holds focus.
fn idle_key(view: &NavView<'_>, key: Key) -> Transition {
    let here = FocusTarget::None;
    if key == 'f' {
        let tree = view.tree;
        let target = view
            .last_focused
            .filter(|id| tree.is_attached(*id))
            .or_else(|| tree.first_field());
        return match target {
            Some(id) => Transition::to(FocusTarget::Field(id)),
            None => Transition::consume(here),
        };
    }
    if key == 'n' {
        return Transition::handle(here, vec![Effect::AddField(Anchor::Root)]);
    }
    Transition::ignore(here)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::{
        event::key::Shift,
        field::{FieldConfig, FieldNode},
        field_type::FieldType,
    };

    /// A[B, C], D with A a fieldset and D a textarea.
    struct Fixture {
        tree: FieldTree,
        a: FieldId,
        b: FieldId,
        c: FieldId,
        d: FieldId,
    }

    fn fixture() -> Fixture {
        let mut tree = FieldTree::new();
        let mut add = |t: FieldType, label: &str| {
            let seq = tree.next_seq();
            tree.create_detached(FieldNode::from_config(
                t,
                format!("fields_field_{seq}"),
                format!("n{seq}"),
                &FieldConfig::default().label(label),
            ))
        };
        let a = add(FieldType::Fieldset, "A");
        let b = add(FieldType::Text, "B");
        let c = add(FieldType::Button, "C");
        let d = add(FieldType::Textarea, "D");
        tree.insert(a, 0, Container::Root).unwrap();
        tree.insert(d, 1, Container::Root).unwrap();
        tree.insert(b, 0, Container::Field(a)).unwrap();
        tree.insert(c, 1, Container::Field(a)).unwrap();
        Fixture { tree, a, b, c, d }
    }

    fn view(tree: &FieldTree) -> NavView<'_> {
        NavView {
            tree,
            buttons: 0,
            highlighted: None,
            option_rows: 0,
            last_focused: None,
            selected: None,
        }
    }

    fn go(view: &NavView<'_>, focus: FocusTarget, key: impl Into<Key>) -> Transition {
        transition(view, &focus, key.into())
    }

    #[test]
    fn arrows_between_fields() {
        let f = fixture();
        let v = view(&f.tree);
        assert_eq!(go(&v, FocusTarget::Field(f.a), KeyCode::Right).focus, FocusTarget::Field(f.b));
        assert_eq!(go(&v, FocusTarget::Field(f.b), KeyCode::Right).focus, FocusTarget::Field(f.c));
        let t = go(&v, FocusTarget::Field(f.c), KeyCode::Right);
        assert_eq!((t.focus, t.outcome), (FocusTarget::Field(f.c), EventOutcome::Consume));

        assert_eq!(go(&v, FocusTarget::Field(f.c), KeyCode::Left).focus, FocusTarget::Field(f.a));
        assert_eq!(go(&v, FocusTarget::Field(f.d), KeyCode::Left).focus, FocusTarget::Field(f.a));
        assert_eq!(go(&v, FocusTarget::Field(f.a), KeyCode::Down).focus, FocusTarget::Field(f.d));
        assert_eq!(go(&v, FocusTarget::Field(f.d), KeyCode::Down).outcome, EventOutcome::Ignore);
        assert_eq!(go(&v, FocusTarget::Field(f.c), KeyCode::Up).focus, FocusTarget::Field(f.b));
        assert_eq!(go(&v, FocusTarget::Field(f.b), KeyCode::Up).outcome, EventOutcome::Ignore);
        assert_eq!(go(&v, FocusTarget::Field(f.b), KeyCode::Esc).focus, FocusTarget::Field(f.a));
        assert_eq!(go(&v, FocusTarget::Field(f.a), KeyCode::Esc).outcome, EventOutcome::Ignore);
    }

    #[test]
    fn enter_and_leave_controls() {
        let f = fixture();
        let v = view(&f.tree);
        assert_eq!(
            go(&v, FocusTarget::Field(f.b), KeyCode::Enter).focus,
            FocusTarget::FieldControl(f.b)
        );
        assert_eq!(go(&v, FocusTarget::Field(f.a), KeyCode::Enter).focus, FocusTarget::Field(f.b));
        assert_eq!(go(&v, FocusTarget::Field(f.c), KeyCode::Enter).outcome, EventOutcome::Consume);

        let single = FocusTarget::FieldControl(f.b);
        assert_eq!(go(&v, single, KeyCode::Enter).focus, FocusTarget::Field(f.b));
        assert_eq!(go(&v, single, KeyCode::Esc).focus, FocusTarget::Field(f.b));
        assert_eq!(go(&v, single, 'x').outcome, EventOutcome::Ignore);

        let multi = FocusTarget::FieldControl(f.d);
        assert_eq!(go(&v, multi, KeyCode::Enter).outcome, EventOutcome::Ignore);
        assert_eq!(go(&v, multi, Ctrl + KeyCode::Enter).focus, FocusTarget::Field(f.d));
    }

    #[test]
    fn moves_need_a_neighbour() {
        let f = fixture();
        let v = view(&f.tree);
        let t = go(&v, FocusTarget::Field(f.b), 'j');
        assert_eq!(
            t.effects,
            vec![Effect::Move {
                field: f.b,
                parent: Container::Field(f.a),
                index: 1
            }]
        );
        assert_eq!(t.focus, FocusTarget::Field(f.b));
        assert_eq!(go(&v, FocusTarget::Field(f.c), 'j').outcome, EventOutcome::Ignore);
        assert_eq!(
            go(&v, FocusTarget::Field(f.c), Ctrl + KeyCode::Up).effects,
            vec![Effect::Move {
                field: f.c,
                parent: Container::Field(f.a),
                index: 0
            }]
        );
        assert_eq!(go(&v, FocusTarget::Field(f.a), 'k').outcome, EventOutcome::Ignore);
    }

    #[test]
    fn commands_on_fields() {
        let f = fixture();
        let v = view(&f.tree);
        assert_eq!(go(&v, FocusTarget::Field(f.b), 'd').effects, vec![Effect::Duplicate(f.b)]);
        assert_eq!(go(&v, FocusTarget::Field(f.b), KeyCode::Backspace).effects, vec![Effect::Delete(f.b)]);
        assert_eq!(go(&v, FocusTarget::Field(f.b), 'e').effects, vec![Effect::ChooseProperty(f.b)]);
        assert_eq!(
            go(&v, FocusTarget::Field(f.b), 'n').effects,
            vec![Effect::AddField(Anchor::After(f.b))]
        );
        assert_eq!(
            go(&v, FocusTarget::Field(f.a), 'c').effects,
            vec![Effect::AddField(Anchor::ChildOf(f.a))]
        );
        assert_eq!(
            go(&v, FocusTarget::Field(f.b), 'c').effects,
            vec![Effect::Notify(Notice::NoChildren)]
        );
        assert_eq!(go(&v, FocusTarget::Field(f.b), 'z').outcome, EventOutcome::Ignore);
    }

    #[test]
    fn unique_fields_are_not_duplicated() {
        let mut f = fixture();
        f.tree.get_mut(f.b).unwrap().unique = true;
        let v = view(&f.tree);
        assert_eq!(
            go(&v, FocusTarget::Field(f.b), 'd').effects,
            vec![Effect::Notify(Notice::FieldIsUnique)]
        );
    }

    #[test]
    fn modal_buttons() {
        let f = fixture();
        let mut v = view(&f.tree);
        v.buttons = 3;
        v.selected = Some(f.b);

        let t = go(&v, FocusTarget::ModalButton(0), KeyCode::Down);
        assert_eq!(t.focus, FocusTarget::ModalButton(1));
        assert_eq!(t.effects, vec![Effect::Highlight(1)]);
        assert_eq!(go(&v, FocusTarget::ModalButton(2), KeyCode::Down).outcome, EventOutcome::Ignore);
        assert_eq!(go(&v, FocusTarget::ModalButton(0), KeyCode::Up).outcome, EventOutcome::Ignore);

        let t = go(&v, FocusTarget::ModalButton(0), '3');
        assert_eq!((t.focus, t.effects), (FocusTarget::ModalButton(2), vec![Effect::Highlight(2)]));
        v.highlighted = Some(2);
        assert_eq!(go(&v, FocusTarget::ModalButton(2), '3').effects, vec![Effect::Activate(2)]);
        let t = go(&v, FocusTarget::ModalButton(2), '9');
        assert_eq!((t.effects.len(), t.outcome), (0, EventOutcome::Consume));
        assert_eq!(go(&v, FocusTarget::ModalButton(2), '0').outcome, EventOutcome::Consume);
        assert_eq!(go(&v, FocusTarget::ModalButton(1), KeyCode::Enter).effects, vec![Effect::Activate(1)]);

        let t = go(&v, FocusTarget::ModalButton(1), KeyCode::Esc);
        assert_eq!((t.focus, t.effects), (FocusTarget::Field(f.b), vec![Effect::CancelModal]));
    }

    #[test]
    fn options_editor_navigation() {
        let f = fixture();
        let mut v = view(&f.tree);
        v.option_rows = 2;
        let at = |row, role| FocusTarget::Options(OptionsFocus::Row { row, role });
        let save = FocusTarget::Options(OptionsFocus::Save);

        assert_eq!(go(&v, at(0, OptionRole::Add), KeyCode::Right).focus, at(0, OptionRole::Delete));
        assert_eq!(go(&v, at(0, OptionRole::Add), KeyCode::Left).focus, at(0, OptionRole::Value));
        assert_eq!(go(&v, at(0, OptionRole::Delete), KeyCode::Right).outcome, EventOutcome::Consume);
        assert_eq!(go(&v, at(0, OptionRole::MoveUp), KeyCode::Down).focus, at(1, OptionRole::MoveUp));
        assert_eq!(go(&v, at(1, OptionRole::MoveUp), KeyCode::Down).focus, save);
        assert_eq!(go(&v, at(1, OptionRole::Delete), KeyCode::Up).focus, at(0, OptionRole::Delete));
        assert_eq!(
            go(&v, at(1, OptionRole::Delete), KeyCode::Enter).effects,
            vec![Effect::OptionButton {
                row: 1,
                role: OptionRole::Delete
            }]
        );

        assert_eq!(go(&v, at(0, OptionRole::Value), KeyCode::Enter).focus, at(1, OptionRole::Value));
        let t = go(&v, at(0, OptionRole::Label), KeyCode::Enter);
        assert_eq!((t.focus, t.outcome), (at(0, OptionRole::Label), EventOutcome::Consume));
        let t = go(&v, at(1, OptionRole::Value), KeyCode::Enter);
        assert_eq!((t.focus, t.outcome), (at(1, OptionRole::Value), EventOutcome::Consume));
        assert_eq!(go(&v, at(0, OptionRole::Label), KeyCode::Left).outcome, EventOutcome::Ignore);
        assert_eq!(go(&v, at(1, OptionRole::Label), KeyCode::Down).focus, save);

        assert_eq!(go(&v, save, KeyCode::Enter).effects, vec![Effect::SaveOptions]);
        assert_eq!(go(&v, save, KeyCode::Up).focus, at(1, OptionRole::Label));
        v.option_rows = 0;
        assert_eq!(go(&v, save, KeyCode::Up).outcome, EventOutcome::Consume);
    }

    #[test]
    fn idle_keys() {
        let f = fixture();
        let mut v = view(&f.tree);
        assert_eq!(go(&v, FocusTarget::None, 'f').focus, FocusTarget::Field(f.a));
        v.last_focused = Some(f.c);
        assert_eq!(go(&v, FocusTarget::None, 'f').focus, FocusTarget::Field(f.c));
        assert_eq!(
            go(&v, FocusTarget::None, 'n').effects,
            vec![Effect::AddField(Anchor::Root)]
        );
        assert_eq!(go(&v, FocusTarget::None, 'x').outcome, EventOutcome::Ignore);

        let empty = FieldTree::new();
        let v = view(&empty);
        assert_eq!(go(&v, FocusTarget::None, 'f').outcome, EventOutcome::Consume);
    }

    #[test]
    fn help_outside_text_entry() {
        let f = fixture();
        let v = view(&f.tree);
        assert_eq!(go(&v, FocusTarget::Field(f.a), Shift + '/').effects, vec![Effect::FetchHelp]);
        assert_eq!(go(&v, FocusTarget::None, Shift + '?').effects, vec![Effect::FetchHelp]);
        assert_eq!(go(&v, FocusTarget::FieldControl(f.b), Shift + '/').outcome, EventOutcome::Ignore);
    }

    #[test]
    fn recovery_prefers_next_then_prev_then_parent() {
        let f = fixture();
        assert_eq!(RecoveryHint::for_field(&f.tree, f.b).target(), FocusTarget::Field(f.c));
        assert_eq!(RecoveryHint::for_field(&f.tree, f.c).target(), FocusTarget::Field(f.b));
        assert_eq!(RecoveryHint::for_field(&f.tree, f.a).target(), FocusTarget::Field(f.d));
    }
}
