use super::id::FieldId;

/// Insertion-ordered, duplicate-free set of selected fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    /// Members in selection order.
    order: Vec<FieldId>,
}

impl SelectionSet {
    /// Construct an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Returns false if it was already present.
    pub(crate) fn add(&mut self, id: FieldId) -> bool {
        if self.order.contains(&id) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Remove a field. Returns false if it was not present.
    pub(crate) fn remove(&mut self, id: FieldId) -> bool {
        let before = self.order.len();
        self.order.retain(|x| *x != id);
        self.order.len() != before
    }

    /// Is the field selected?
    pub fn contains(&self, id: FieldId) -> bool {
        self.order.contains(&id)
    }

    /// Members in selection order.
    pub fn values(&self) -> &[FieldId] {
        &self.order
    }

    /// Most recently selected field.
    pub fn last(&self) -> Option<FieldId> {
        self.order.last().copied()
    }

    /// Number of selected fields.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Is nothing selected?
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn ordered_and_unique() {
        let mut ids: SlotMap<FieldId, ()> = SlotMap::with_key();
        let (a, b) = (ids.insert(()), ids.insert(()));

        let mut s = SelectionSet::new();
        assert!(s.add(b));
        assert!(s.add(a));
        assert!(!s.add(b));
        assert_eq!(s.values(), &[b, a]);
        assert_eq!(s.last(), Some(a));

        assert!(s.remove(b));
        assert!(!s.remove(b));
        assert_eq!(s.values(), &[a]);
        assert!(s.contains(a));
        assert!(!s.contains(b));
    }
}
