//! Integration tests for keyboard navigation, deletion and the add-field flow.

#[cfg(test)]
mod tests {
    use formbuilder::{
        Config, Container, FieldId,
        error::Result,
        event::{
            EventOutcome,
            key::{KeyCode, Shift},
        },
        field::FieldConfig,
        focus::FocusTarget,
        modal::{Anchor, Modal},
        testing::Harness,
    };

    /// X, Y, Z at the top level.
    fn three() -> Result<(Harness, FieldId, FieldId, FieldId)> {
        let mut h = Harness::new()?;
        let x = h.add_labeled("text", "X", Container::Root)?;
        let y = h.add_labeled("text", "Y", Container::Root)?;
        let z = h.add_labeled("text", "Z", Container::Root)?;
        Ok((h, x, y, z))
    }

    fn catalog() -> Config {
        Config::default()
            .with_template(FieldConfig::of_type("text").id("availableFields_field_name").label("Name"))
            .with_template(FieldConfig::of_type("fieldset").id("availableFields_field_group").label("Group"))
    }

    #[test]
    fn delete_refocuses_next_then_previous_then_parent() -> Result<()> {
        let (mut h, _, y, z) = three()?;
        h.focus(y)?;
        assert_eq!(h.key(KeyCode::Delete)?, EventOutcome::Handle);
        assert_eq!(h.outline(), "X, Z");
        assert_eq!(h.builder.focus(), FocusTarget::Field(z));
        assert_eq!(h.host.confirms, ["Are you sure you want to delete the selected field?"]);

        let mut h = Harness::new()?;
        let set = h.add_labeled("fieldset", "S", Container::Root)?;
        let a = h.add_labeled("text", "A", Container::Field(set))?;
        let b = h.add_labeled("text", "B", Container::Field(set))?;
        h.focus(b)?;
        h.key(KeyCode::Backspace)?;
        assert_eq!(h.builder.focus(), FocusTarget::Field(a));
        h.key(KeyCode::Delete)?;
        assert_eq!(h.builder.focus(), FocusTarget::Field(set));
        assert_eq!(h.outline(), "S");
        Ok(())
    }

    #[test]
    fn declined_delete_changes_nothing() -> Result<()> {
        let (mut h, _, y, _) = three()?;
        h.focus(y)?;
        h.host.answer(false);
        h.key(KeyCode::Delete)?;
        assert_eq!(h.outline(), "X, Y, Z");
        assert_eq!(h.builder.focus(), FocusTarget::Field(y));
        assert!(h.builder.selection().contains(y));
        Ok(())
    }

    #[test]
    fn deleting_clears_selection_and_properties() -> Result<()> {
        let (mut h, x, _, _) = three()?;
        h.focus(x)?;
        assert!(h.builder.properties().list().is_some());
        h.key(KeyCode::Delete)?;
        assert!(!h.builder.selection().contains(x));
        assert_ne!(h.builder.last_focused(), Some(x));
        assert!(h.builder.field(x).is_none());
        Ok(())
    }

    #[test]
    fn required_fields_are_protected() -> Result<()> {
        let mut h = Harness::new()?;
        let r = h.add(FieldConfig::of_type("text").label("R").required(true), Container::Root)?;
        h.focus(r)?;
        h.key(KeyCode::Delete)?;
        assert_eq!(h.outline(), "R");
        assert!(h.host.confirms.is_empty());
        assert_eq!(h.host.alerts, ["Required fields cannot be removed"]);

        let config = Config {
            allow_remove_required_fields: true,
            ..Config::default()
        };
        let mut h = Harness::with_config(config)?;
        let r = h.add(FieldConfig::of_type("text").label("R").required(true), Container::Root)?;
        h.focus(r)?;
        h.key(KeyCode::Delete)?;
        assert_eq!(h.outline(), "");
        Ok(())
    }

    #[test]
    fn add_after_with_digit_keys() -> Result<()> {
        let mut h = Harness::with_config(catalog())?;
        let x = h.add_labeled("text", "X", Container::Root)?;
        h.add_labeled("text", "Y", Container::Root)?;
        h.focus(x)?;

        h.key('n')?;
        assert!(matches!(
            h.builder.modal(),
            Some(Modal::AddField { anchor: Anchor::After(a), .. }) if *a == x
        ));
        assert_eq!(h.builder.focus(), FocusTarget::ModalButton(0));

        h.key('1')?;
        assert_eq!(h.builder.highlighted(), Some(0));
        assert_eq!(h.outline(), "X, Y");
        h.key('1')?;
        assert_eq!(h.outline(), "X, Name, Y");
        assert!(h.builder.modal().is_none());
        assert!(h.host.open_handles().is_empty());

        let added = h.builder.tree().next_sibling(x);
        assert_eq!(h.builder.focus().field(), added);
        Ok(())
    }

    #[test]
    fn add_child_focuses_first_child() -> Result<()> {
        let mut h = Harness::with_config(catalog())?;
        let set = h.add_labeled("fieldset", "S", Container::Root)?;
        h.focus(set)?;
        h.key('c')?;
        h.key(KeyCode::Down)?;
        assert_eq!(h.builder.focus(), FocusTarget::ModalButton(1));
        h.key(KeyCode::Enter)?;
        assert_eq!(h.outline(), "S[Group]");
        assert_eq!(h.builder.focus().field(), h.builder.tree().first_child(set));
        Ok(())
    }

    #[test]
    fn add_to_empty_form_from_idle() -> Result<()> {
        let mut h = Harness::with_config(catalog())?;
        assert_eq!(h.key('n')?, EventOutcome::Handle);
        h.key(KeyCode::Enter)?;
        assert_eq!(h.outline(), "Name");
        assert_eq!(h.builder.focus().field(), h.builder.tree().first_field());
        Ok(())
    }

    #[test]
    fn children_only_for_containers() -> Result<()> {
        let mut h = Harness::with_config(catalog())?;
        let x = h.add_labeled("text", "X", Container::Root)?;
        h.focus(x)?;
        h.key('c')?;
        assert!(h.builder.modal().is_none());
        assert_eq!(h.host.alerts, ["This field does not accept children"]);
        Ok(())
    }

    #[test]
    fn escape_cancels_modal() -> Result<()> {
        let mut h = Harness::with_config(catalog())?;
        let x = h.add_labeled("text", "X", Container::Root)?;
        h.focus(x)?;
        h.key('n')?;
        h.key(KeyCode::Esc)?;
        assert!(h.builder.modal().is_none());
        assert_eq!(h.builder.focus(), FocusTarget::Field(x));
        assert_eq!(h.outline(), "X");
        Ok(())
    }

    #[test]
    fn field_controls_and_escape() -> Result<()> {
        let mut h = Harness::new()?;
        let set = h.add_labeled("fieldset", "S", Container::Root)?;
        let a = h.add_labeled("text", "A", Container::Field(set))?;
        h.focus(set)?;
        h.key(KeyCode::Enter)?;
        assert_eq!(h.builder.focus(), FocusTarget::Field(a));
        h.key(KeyCode::Enter)?;
        assert_eq!(h.builder.focus(), FocusTarget::FieldControl(a));
        assert_eq!(h.key('q')?, EventOutcome::Ignore);
        h.key(KeyCode::Esc)?;
        assert_eq!(h.builder.focus(), FocusTarget::Field(a));
        h.key(KeyCode::Esc)?;
        assert_eq!(h.builder.focus(), FocusTarget::Field(set));
        Ok(())
    }

    #[test]
    fn focus_from_idle_returns_to_last_field() -> Result<()> {
        let (mut h, x, y, _) = three()?;
        h.key('f')?;
        assert_eq!(h.builder.focus(), FocusTarget::Field(x));
        h.focus(y)?;
        h.builder.set_focus(FocusTarget::None);
        h.key('f')?;
        assert_eq!(h.builder.focus(), FocusTarget::Field(y));
        Ok(())
    }

    #[test]
    fn focus_moves_the_editing_session() -> Result<()> {
        let (mut h, x, y, _) = three()?;
        h.focus(x)?;
        h.key(KeyCode::Down)?;
        assert_eq!(h.builder.selection().values(), [y]);
        assert_eq!(h.builder.properties().editing(), Some(y));
        assert!(h.builder.field(y).is_some_and(|n| n.is_focused()));
        assert!(h.builder.field(x).is_some_and(|n| !n.is_focused()));
        Ok(())
    }

    #[test]
    fn help_is_requested_outside_text_entry() -> Result<()> {
        let (mut h, x, _, _) = three()?;
        h.focus(x)?;
        h.key(Shift + '/')?;
        assert_eq!(h.host.help_requests, ["help.html"]);

        h.builder.show_help(&mut h.host, "<p>keys</p>");
        h.builder.show_help(&mut h.host, "<p>keys</p>");
        assert!(h.builder.help_open());
        assert_eq!(h.host.open_handles().len(), 1);
        h.builder.hide_help(&mut h.host);
        assert!(h.host.open_handles().is_empty());

        h.key(KeyCode::Enter)?;
        assert_eq!(h.key(Shift + '/')?, EventOutcome::Ignore);
        assert_eq!(h.host.help_requests.len(), 1);
        Ok(())
    }
}
