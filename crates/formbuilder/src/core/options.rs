use super::field::FieldOption;

/// The controls of one options-editor row, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionRole {
    /// Move the row up.
    MoveUp,
    /// Move the row down.
    MoveDown,
    /// Label input.
    Label,
    /// Value input.
    Value,
    /// Insert a blank row after this one.
    Add,
    /// Delete the row.
    Delete,
}

impl OptionRole {
    /// Row controls in visual order.
    pub const ROW: [Self; 6] = [
        Self::MoveUp,
        Self::MoveDown,
        Self::Label,
        Self::Value,
        Self::Add,
        Self::Delete,
    ];

    /// Is this a text input rather than a button?
    pub fn is_input(self) -> bool {
        matches!(self, Self::Label | Self::Value)
    }

    /// The control to the left.
    pub fn prev(self) -> Option<Self> {
        let i = Self::ROW.iter().position(|r| *r == self)?;
        i.checked_sub(1).map(|i| Self::ROW[i])
    }

    /// The control to the right.
    pub fn next(self) -> Option<Self> {
        let i = Self::ROW.iter().position(|r| *r == self)?;
        Self::ROW.get(i + 1).copied()
    }
}

/// A focusable control in the options editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionsFocus {
    /// A control in a row.
    Row {
        /// Row index.
        row: usize,
        /// Control within the row.
        role: OptionRole,
    },
    /// The save button below the rows.
    Save,
}

/// Editable copy of a field's option list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsEditor {
    /// Rows in display order.
    rows: Vec<FieldOption>,
}

impl OptionsEditor {
    /// Start editing a copy of `options`.
    pub fn new(options: &[FieldOption]) -> Self {
        Self {
            rows: options.to_vec(),
        }
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[FieldOption] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Are there no rows?
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Where focus lands when the editor opens.
    pub fn initial_focus(&self) -> OptionsFocus {
        if self.rows.is_empty() {
            OptionsFocus::Save
        } else {
            OptionsFocus::Row {
                row: 0,
                role: OptionRole::Label,
            }
        }
    }

    /// Replace a row's label text.
    pub fn set_label(&mut self, row: usize, label: impl Into<String>) -> bool {
        self.rows.get_mut(row).map(|r| r.label = label.into()).is_some()
    }

    /// Replace a row's value text.
    pub fn set_value(&mut self, row: usize, value: impl Into<String>) -> bool {
        self.rows.get_mut(row).map(|r| r.value = value.into()).is_some()
    }

    /// Run the button at `(row, role)`. Returns the control that should take
    /// focus, or `None` to leave focus where it is.
    pub fn activate(&mut self, row: usize, role: OptionRole) -> Option<OptionsFocus> {
        if row >= self.rows.len() {
            return None;
        }
        match role {
            OptionRole::MoveUp => {
                let to = row.checked_sub(1)?;
                self.rows.swap(row, to);
                Some(OptionsFocus::Row { row: to, role })
            }
            OptionRole::MoveDown => {
                let to = row + 1;
                if to >= self.rows.len() {
                    return None;
                }
                self.rows.swap(row, to);
                Some(OptionsFocus::Row { row: to, role })
            }
            OptionRole::Add => {
                self.rows.insert(row + 1, FieldOption::default());
                Some(OptionsFocus::Row {
                    row: row + 1,
                    role: OptionRole::Label,
                })
            }
            OptionRole::Delete => {
                self.rows.remove(row);
                if self.rows.is_empty() {
                    return None;
                }
                Some(OptionsFocus::Row {
                    row: row.min(self.rows.len() - 1),
                    role: OptionRole::Label,
                })
            }
            OptionRole::Label | OptionRole::Value => None,
        }
    }

    /// Collect the rows, in order, into an option list.
    pub fn collect(&self) -> Vec<FieldOption> {
        self.rows.clone()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::field::ChoiceMap;

    fn editor(labels: &[&str]) -> OptionsEditor {
        let opts: Vec<_> = labels
            .iter()
            .map(|l| FieldOption::new(l.to_lowercase(), *l))
            .collect();
        OptionsEditor::new(&opts)
    }

    fn labels(e: &OptionsEditor) -> Vec<&str> {
        e.rows().iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn reorder_follows_the_row() {
        let mut e = editor(&["A", "B", "C"]);
        assert_eq!(
            e.activate(2, OptionRole::MoveUp),
            Some(OptionsFocus::Row {
                row: 1,
                role: OptionRole::MoveUp
            })
        );
        assert_eq!(labels(&e), ["A", "C", "B"]);
        assert_eq!(e.activate(0, OptionRole::MoveUp), None);
        assert_eq!(e.activate(2, OptionRole::MoveDown), None);
        assert_eq!(labels(&e), ["A", "C", "B"]);
    }

    #[test]
    fn add_inserts_blank_row() {
        let mut e = editor(&["A", "B"]);
        assert_eq!(
            e.activate(0, OptionRole::Add),
            Some(OptionsFocus::Row {
                row: 1,
                role: OptionRole::Label
            })
        );
        assert_eq!(labels(&e), ["A", "", "B"]);
    }

    #[test]
    fn delete_moves_focus() {
        let mut e = editor(&["Yes", "No"]);
        assert_eq!(
            e.activate(0, OptionRole::Delete),
            Some(OptionsFocus::Row {
                row: 0,
                role: OptionRole::Label
            })
        );
        assert_eq!(labels(&e), ["No"]);
        assert_eq!(e.activate(0, OptionRole::Delete), None);
        assert!(e.is_empty());
        assert_eq!(e.initial_focus(), OptionsFocus::Save);

        let mut e = editor(&["A", "B"]);
        assert_eq!(
            e.activate(1, OptionRole::Delete),
            Some(OptionsFocus::Row {
                row: 0,
                role: OptionRole::Label
            })
        );
    }

    #[test]
    fn collect_builds_choices() {
        let mut e = editor(&["Yes", "No"]);
        e.set_value(1, "n");
        let opts = e.collect();
        let choices: ChoiceMap = opts.iter().collect();
        assert_eq!(opts[1], FieldOption::new("n", "No"));
        assert_eq!(choices.get("yes"), Some("Yes"));
        assert_eq!(choices.get("n"), Some("No"));
    }

    #[test]
    fn row_order() {
        assert_eq!(OptionRole::MoveUp.prev(), None);
        assert_eq!(OptionRole::Label.next(), Some(OptionRole::Value));
        assert_eq!(OptionRole::Delete.next(), None);
        assert!(OptionRole::Value.is_input());
        assert!(!OptionRole::Add.is_input());
    }
}
