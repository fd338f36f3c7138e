use std::collections::HashMap;

use super::{available::AvailableFields, id::FieldId};

/// Maps unique templates to their live instance. A template has an entry
/// exactly when it is not draggable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniqueRegistry {
    /// Template id to placed field.
    entries: HashMap<String, FieldId>,
}

impl UniqueRegistry {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `field` as the instance of `template` and lock the template.
    pub(crate) fn register(
        &mut self,
        templates: &mut AvailableFields,
        template: &str,
        field: FieldId,
    ) {
        if self.entries.insert(template.to_string(), field) != Some(field) {
            tracing::debug!(template, ?field, "unique field registered");
        }
        if let Some(t) = templates.get_mut(template) {
            t.set_draggable(false);
        }
    }

    /// Forget the instance of `template` and unlock the template.
    pub(crate) fn unregister(
        &mut self,
        templates: &mut AvailableFields,
        template: &str,
    ) -> Option<FieldId> {
        let removed = self.entries.remove(template);
        if let Some(t) = templates.get_mut(template) {
            t.set_draggable(true);
        }
        if removed.is_some() {
            tracing::debug!(template, "unique field unregistered");
        }
        removed
    }

    /// The live instance of a template.
    pub fn get(&self, template: &str) -> Option<FieldId> {
        self.entries.get(template).copied()
    }

    /// Does the template have a live instance?
    pub fn contains(&self, template: &str) -> bool {
        self.entries.contains_key(template)
    }

    /// The template a field is registered under.
    pub fn template_for(&self, field: FieldId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, f)| **f == field)
            .map(|(t, _)| t.as_str())
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the registry empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that registry entries and template flags agree.
    pub(crate) fn debug_assert_consistent(&self, templates: &AvailableFields) {
        if cfg!(debug_assertions) {
            for t in templates.iter() {
                debug_assert_eq!(
                    self.contains(t.id()),
                    !t.draggable(),
                    "template {} draggable flag out of sync",
                    t.id()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;
    use crate::core::field::FieldConfig;

    #[test]
    fn registration_toggles_draggable() {
        let mut templates = AvailableFields::from_configs(
            &[FieldConfig::of_type("text").id("T1").unique(true)],
            "",
        )
        .unwrap();
        let mut ids: SlotMap<FieldId, ()> = SlotMap::with_key();
        let f = ids.insert(());

        let mut reg = UniqueRegistry::new();
        reg.register(&mut templates, "T1", f);
        assert_eq!(reg.get("T1"), Some(f));
        assert_eq!(reg.template_for(f), Some("T1"));
        assert!(!templates.get("T1").unwrap().draggable());
        reg.debug_assert_consistent(&templates);

        assert_eq!(reg.unregister(&mut templates, "T1"), Some(f));
        assert!(templates.get("T1").unwrap().draggable());
        assert!(reg.is_empty());
        assert_eq!(reg.unregister(&mut templates, "T1"), None);
        reg.debug_assert_consistent(&templates);
    }
}
