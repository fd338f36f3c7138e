use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a field stored in the tree arena.
    pub struct FieldId;
}

/// Where a field lives: directly on the form, or inside a parent field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    /// The form's top-level field list.
    Root,
    /// The child list of a field.
    Field(FieldId),
}

impl Container {
    /// The parent field, if this is not the root.
    pub fn field(&self) -> Option<FieldId> {
        match self {
            Self::Root => None,
            Self::Field(id) => Some(*id),
        }
    }
}

impl From<FieldId> for Container {
    fn from(id: FieldId) -> Self {
        Self::Field(id)
    }
}
