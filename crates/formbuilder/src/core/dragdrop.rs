use super::id::FieldId;

/// What the user grabbed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DragSource {
    /// A catalog template, by id.
    Template(String),
    /// A placed field.
    Field(FieldId),
}

/// How the host should proceed after a drag starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragStart {
    /// Stop the gesture.
    Rejected,
    /// Leave a copy of the template's node in the catalog and drag the
    /// original. The original is restored when the drag ends.
    CloneTemplate {
        /// Template being dragged.
        template: String,
    },
    /// Drag the placed field itself.
    PassThrough,
}

/// Where a dragged node was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// The form's top-level list.
    Root,
    /// A field's child list.
    Field(FieldId),
    /// Anything else.
    Outside,
}

/// An entry in the visual list the dragged node landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualItem {
    /// A placed field.
    Field(FieldId),
    /// A drop placeholder drawn by the sortable list.
    Placeholder,
    /// The dragged node.
    Carried,
}

/// A completed drop gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    /// Container the node was released in.
    pub target: DropTarget,
    /// Visual contents of that container, including the dragged node.
    pub siblings: Vec<VisualItem>,
}

/// Result of a drop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DragEnd {
    /// The field now at the drop position.
    pub field: Option<FieldId>,
    /// Template whose original drag node the host should put back.
    pub restore: Option<String>,
}

/// Drag bookkeeping between start and end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DragState {
    /// What is being carried.
    pub(crate) source: DragSource,
}

/// Position of the dragged node among the real fields of `siblings`.
/// Placeholders do not count. `dragged` is treated as the carried node when
/// the host lists it by id.
pub fn drop_index(siblings: &[VisualItem], dragged: Option<FieldId>) -> usize {
    let mut index = 0;
    for item in siblings {
        match item {
            VisualItem::Placeholder => {}
            VisualItem::Carried => return index,
            VisualItem::Field(id) if Some(*id) == dragged => return index,
            VisualItem::Field(_) => index += 1,
        }
    }
    index
}
