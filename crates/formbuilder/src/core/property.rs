use super::{
    error::{Error, Result},
    field::{AttrValue, Attribute, FieldNode},
    id::FieldId,
    names,
};

/// How a property's value is edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorKind {
    /// Single-line text.
    Text,
    /// Multi-line text.
    TextArea,
    /// Pick one `(value, label)` pair.
    SingleChoice(Vec<(String, String)>),
    /// The options editor.
    Options,
}

/// One row of the property editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Attribute this row edits.
    pub attribute: Attribute,
    /// Name shown to the user.
    pub display_name: String,
    /// Editor, or `None` for read-only rows.
    pub editor: Option<EditorKind>,
    /// Current, possibly pending, value.
    pub value: AttrValue,
}

impl Property {
    /// Can the user change this row?
    pub fn is_read_only(&self) -> bool {
        self.editor.is_none()
    }
}

/// Yes/no pairs for flag attributes.
fn yes_no() -> Vec<(String, String)> {
    vec![("true".into(), "Yes".into()), ("false".into(), "No".into())]
}

/// Width choices.
fn widths() -> Vec<(String, String)> {
    ["25", "50", "75", "100"]
        .into_iter()
        .map(|w| (w.to_string(), format!("{w}%")))
        .collect()
}

/// The editor an attribute gets on a given field, ignoring read-only status.
fn editor_for(node: &FieldNode, attr: Attribute) -> Option<EditorKind> {
    match attr {
        Attribute::Type | Attribute::Unique => None,
        Attribute::HiddenAttributes | Attribute::ReadOnlyAttributes => None,
        Attribute::Label | Attribute::Name => Some(EditorKind::Text),
        Attribute::Tip => Some(EditorKind::TextArea),
        Attribute::ShowLabel | Attribute::Required => Some(EditorKind::SingleChoice(yes_no())),
        Attribute::Width => Some(EditorKind::SingleChoice(widths())),
        Attribute::Options => Some(EditorKind::Options),
        Attribute::PredefinedValue if node.capabilities().options => {
            let choices = node
                .predefined_choices()
                .iter()
                .map(|(v, l)| (v.to_string(), l.to_string()))
                .collect();
            Some(EditorKind::SingleChoice(choices))
        }
        Attribute::PredefinedValue => Some(EditorKind::Text),
    }
}

/// Attributes a field exposes, in editor order.
fn schema(node: &FieldNode) -> Vec<Attribute> {
    let caps = node.capabilities();
    let mut attrs = vec![
        Attribute::Type,
        Attribute::Label,
        Attribute::ShowLabel,
        Attribute::Required,
        Attribute::Name,
        Attribute::PredefinedValue,
        Attribute::Tip,
    ];
    if caps.width {
        attrs.push(Attribute::Width);
    }
    if caps.options {
        attrs.push(Attribute::Options);
    }
    attrs
}

/// The property rows of one field, bound to the settings view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyList {
    /// Field the rows describe.
    field: FieldId,
    /// Rows in editor order.
    properties: Vec<Property>,
}

impl PropertyList {
    /// Describe a field. Hidden attributes are left out when `exclude_hidden`
    /// is set; read-only attributes are listed without an editor.
    pub fn for_field(field: FieldId, node: &FieldNode, exclude_hidden: bool) -> Self {
        let properties = schema(node)
            .into_iter()
            .filter(|a| !(exclude_hidden && node.is_hidden(*a)))
            .map(|attribute| Property {
                attribute,
                display_name: attribute.display_name().to_string(),
                editor: if node.is_read_only(attribute) {
                    None
                } else {
                    editor_for(node, attribute)
                },
                value: node.attribute(attribute),
            })
            .collect();
        Self { field, properties }
    }

    /// Field the rows describe.
    pub fn field(&self) -> FieldId {
        self.field
    }

    /// Rows in editor order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// Row at a position.
    pub fn by_index(&self, index: usize) -> Option<&Property> {
        self.properties.get(index)
    }

    /// Row for an attribute.
    pub fn get(&self, attr: Attribute) -> Option<&Property> {
        self.properties.iter().find(|p| p.attribute == attr)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Are there no rows?
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Record a pending value for a row.
    pub(crate) fn set_value(&mut self, attr: Attribute, value: AttrValue) -> Result<()> {
        let p = self
            .properties
            .iter_mut()
            .find(|p| p.attribute == attr)
            .ok_or_else(|| Error::UnknownAttribute(attr.name().to_string()))?;
        p.value = value;
        Ok(())
    }
}

/// Clean up user input before it is written: names become camel-cased
/// identifiers and labels are capitalized.
pub fn normalize(attr: Attribute, value: AttrValue) -> AttrValue {
    match (attr, value) {
        (Attribute::Name, AttrValue::Text(s)) => AttrValue::Text(names::field_name(&s)),
        (Attribute::Label, AttrValue::Text(s)) => AttrValue::Text(names::capitalize(&s)),
        (_, v) => v,
    }
}

/// Which tab of the side panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// The template catalog.
    #[default]
    Fields,
    /// The property editor of the selected field.
    Settings,
}

/// State of the settings panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyWorkflow {
    /// Showing tab.
    view: View,
    /// Whether the settings tab can be chosen.
    settings_enabled: bool,
    /// Rows of the open session.
    list: Option<PropertyList>,
    /// Field most recently put under edit.
    editing: Option<FieldId>,
}

impl PropertyWorkflow {
    /// Showing tab.
    pub fn view(&self) -> View {
        self.view
    }

    /// Can the settings tab be chosen?
    pub fn settings_enabled(&self) -> bool {
        self.settings_enabled
    }

    /// Rows of the open session.
    pub fn list(&self) -> Option<&PropertyList> {
        self.list.as_ref()
    }

    /// Field most recently put under edit.
    pub fn editing(&self) -> Option<FieldId> {
        self.editing
    }

    /// Show the settings tab bound to `list`.
    pub(crate) fn open(&mut self, list: PropertyList) {
        self.settings_enabled = true;
        self.view = View::Settings;
        self.list = Some(list);
    }

    /// Return to the fields tab and discard the rows.
    pub(crate) fn close(&mut self) {
        self.view = View::Fields;
        self.settings_enabled = false;
        self.list = None;
    }

    /// Mutable rows of the open session.
    pub(crate) fn list_mut(&mut self) -> Option<&mut PropertyList> {
        self.list.as_mut()
    }

    /// Record the field under edit.
    pub(crate) fn set_editing(&mut self, field: Option<FieldId>) {
        self.editing = field;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use slotmap::SlotMap;

    use super::*;
    use crate::core::{field::FieldConfig, field_type::FieldType};

    fn fid() -> FieldId {
        let mut ids: SlotMap<FieldId, ()> = SlotMap::with_key();
        ids.insert(())
    }

    fn node(t: FieldType, config: FieldConfig) -> FieldNode {
        FieldNode::from_config(t, "f".into(), "n".into(), &config)
    }

    #[test]
    fn schema_follows_capabilities() {
        let text = node(FieldType::Text, FieldConfig::default());
        let list = PropertyList::for_field(fid(), &text, true);
        let attrs: Vec<_> = list.iter().map(|p| p.attribute.name()).collect();
        assert_eq!(
            attrs,
            [
                "type",
                "label",
                "showLabel",
                "required",
                "name",
                "predefinedValue",
                "tip",
                "width"
            ]
        );
        assert!(list.get(Attribute::Type).unwrap().is_read_only());

        let radio = node(FieldType::Radio, FieldConfig::default());
        let list = PropertyList::for_field(fid(), &radio, true);
        assert_eq!(list.get(Attribute::Options).unwrap().editor, Some(EditorKind::Options));
        assert!(list.get(Attribute::Width).is_none());
        assert!(matches!(
            list.get(Attribute::PredefinedValue).unwrap().editor,
            Some(EditorKind::SingleChoice(ref c)) if c.len() == 3
        ));
    }

    #[test]
    fn hidden_and_read_only() {
        let mut config = FieldConfig::default();
        config.hidden_attributes = Some(vec!["tip".into()]);
        config.read_only_attributes = Some(vec!["name".into()]);
        let n = node(FieldType::Text, config);

        let list = PropertyList::for_field(fid(), &n, true);
        assert!(list.get(Attribute::Tip).is_none());
        assert!(list.get(Attribute::Name).unwrap().is_read_only());

        let list = PropertyList::for_field(fid(), &n, false);
        assert!(list.get(Attribute::Tip).is_some());
    }

    #[test]
    fn normalization() {
        assert_eq!(
            normalize(Attribute::Name, " First Name ".into()),
            AttrValue::from("firstName")
        );
        assert_eq!(
            normalize(Attribute::Label, "first name".into()),
            AttrValue::from("First name")
        );
        assert_eq!(normalize(Attribute::Tip, "keep me".into()), AttrValue::from("keep me"));
    }

    #[test]
    fn workflow_open_close() {
        let mut w = PropertyWorkflow::default();
        assert_eq!(w.view(), View::Fields);
        let n = node(FieldType::Text, FieldConfig::default());
        w.open(PropertyList::for_field(fid(), &n, true));
        assert_eq!(w.view(), View::Settings);
        assert!(w.settings_enabled());
        w.close();
        assert_eq!(w.view(), View::Fields);
        assert!(!w.settings_enabled());
        assert!(w.list().is_none());
    }
}
