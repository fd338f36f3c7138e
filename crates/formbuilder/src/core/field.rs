use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    error::{Error, Result},
    field_type::{Capabilities, FieldType},
    id::{Container, FieldId},
};

/// One entry of an option-based field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldOption {
    /// Submitted value.
    pub value: String,
    /// Displayed label.
    pub label: String,
}

impl FieldOption {
    /// Construct an option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Ordered value to label mapping. Inserting an existing value replaces its
/// label in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceMap {
    /// Entries in insertion order.
    entries: Vec<(String, String)>,
}

impl ChoiceMap {
    /// Construct an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the label for `value`.
    pub fn insert(&mut self, value: impl Into<String>, label: impl Into<String>) {
        let value = value.into();
        let label = label.into();
        match self.entries.iter_mut().find(|(v, _)| *v == value) {
            Some(entry) => entry.1 = label,
            None => self.entries.push((value, label)),
        }
    }

    /// Label stored for `value`.
    pub fn get(&self, value: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, l)| l.as_str())
    }

    /// Iterate `(value, label)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(v, l)| (v.as_str(), l.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the map empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<&'a FieldOption> for ChoiceMap {
    fn from_iter<I: IntoIterator<Item = &'a FieldOption>>(iter: I) -> Self {
        let mut map = Self::new();
        for opt in iter {
            map.insert(opt.value.as_str(), opt.label.as_str());
        }
        map
    }
}

/// The attributes of the field model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Field type tag. Never writable.
    Type,
    /// Displayed label.
    Label,
    /// Whether the label is shown.
    ShowLabel,
    /// Whether the field must be filled in.
    Required,
    /// Submitted name.
    Name,
    /// Initial value.
    PredefinedValue,
    /// Help text.
    Tip,
    /// Display width.
    Width,
    /// Option list of an option-based field.
    Options,
    /// At most one live instance of the template may exist.
    Unique,
    /// Attributes left out of the property editor.
    HiddenAttributes,
    /// Attributes shown but not editable.
    ReadOnlyAttributes,
}

impl Attribute {
    /// Every attribute.
    pub const ALL: [Self; 12] = [
        Self::Type,
        Self::Label,
        Self::ShowLabel,
        Self::Required,
        Self::Name,
        Self::PredefinedValue,
        Self::Tip,
        Self::Width,
        Self::Options,
        Self::Unique,
        Self::HiddenAttributes,
        Self::ReadOnlyAttributes,
    ];

    /// The attribute name used in configuration and modal button values.
    pub fn name(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Label => "label",
            Self::ShowLabel => "showLabel",
            Self::Required => "required",
            Self::Name => "name",
            Self::PredefinedValue => "predefinedValue",
            Self::Tip => "tip",
            Self::Width => "width",
            Self::Options => "options",
            Self::Unique => "unique",
            Self::HiddenAttributes => "hiddenAttributes",
            Self::ReadOnlyAttributes => "readOnlyAttributes",
        }
    }

    /// Human-readable name shown in the property editor.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Type => "Type",
            Self::Label => "Label",
            Self::ShowLabel => "Show Label",
            Self::Required => "Required",
            Self::Name => "Name",
            Self::PredefinedValue => "Predefined Value",
            Self::Tip => "Tip",
            Self::Width => "Width",
            Self::Options => "Options",
            Self::Unique => "Unique",
            Self::HiddenAttributes => "Hidden Attributes",
            Self::ReadOnlyAttributes => "Read-only Attributes",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| Error::UnknownAttribute(s.to_string()))
    }
}

/// A value held by an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Free text.
    Text(String),
    /// A flag.
    Bool(bool),
    /// An option list.
    Options(Vec<FieldOption>),
    /// A list of attribute names.
    List(Vec<String>),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Options(opts) => {
                let labels: Vec<&str> = opts.iter().map(|o| o.label.as_str()).collect();
                f.write_str(&labels.join(", "))
            }
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<FieldOption>> for AttrValue {
    fn from(opts: Vec<FieldOption>) -> Self {
        Self::Options(opts)
    }
}

/// Attribute bundle used to create a field. Absent attributes are undefined
/// and fall back to the type's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    /// Type tag.
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    /// Stable id. Generated when absent.
    pub id: Option<String>,
    /// Displayed label.
    pub label: Option<String>,
    /// Submitted name. Generated when absent.
    pub name: Option<String>,
    /// Option list.
    pub options: Option<Vec<FieldOption>>,
    /// Initial value.
    pub predefined_value: Option<String>,
    /// Help text.
    pub tip: Option<String>,
    /// Display width.
    pub width: Option<String>,
    /// Required flag.
    pub required: Option<bool>,
    /// Unique flag.
    pub unique: Option<bool>,
    /// Label visibility.
    pub show_label: Option<bool>,
    /// Attributes left out of the property editor.
    pub hidden_attributes: Option<Vec<String>>,
    /// Attributes shown but not editable.
    pub read_only_attributes: Option<Vec<String>>,
    /// Child fields.
    pub fields: Vec<Self>,
}

impl FieldConfig {
    /// A config holding only a type tag.
    pub fn of_type(tag: impl Into<String>) -> Self {
        Self {
            field_type: Some(tag.into()),
            ..Self::default()
        }
    }

    /// Set the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the required flag.
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Set the unique flag.
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self
    }

    /// Append a child field.
    pub fn child(mut self, child: Self) -> Self {
        self.fields.push(child);
        self
    }
}

/// Options given to option-based fields created without any.
fn default_options() -> Vec<FieldOption> {
    (1..=3)
        .map(|i| FieldOption::new(format!("value {i}"), format!("option {i}")))
        .collect()
}

/// A placed form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    /// Stable string id.
    pub(crate) id: String,
    /// Field type.
    pub(crate) field_type: FieldType,
    /// Displayed label.
    pub(crate) label: String,
    /// Submitted name.
    pub(crate) name: String,
    /// Option list.
    pub(crate) options: Vec<FieldOption>,
    /// Choices offered by the predefined-value editor.
    pub(crate) predefined_choices: ChoiceMap,
    /// Initial value.
    pub(crate) predefined_value: String,
    /// Help text.
    pub(crate) tip: String,
    /// Display width.
    pub(crate) width: String,
    /// Required flag.
    pub(crate) required: bool,
    /// Unique flag.
    pub(crate) unique: bool,
    /// Label visibility.
    pub(crate) show_label: bool,
    /// Attributes left out of the property editor.
    pub(crate) hidden_attributes: Vec<String>,
    /// Attributes shown but not editable.
    pub(crate) read_only_attributes: Vec<String>,
    /// Containing list, if attached.
    pub(crate) parent: Option<Container>,
    /// Ordered children.
    pub(crate) children: Vec<FieldId>,
    /// Member of the selection set.
    pub(crate) selected: bool,
    /// Holds keyboard focus.
    pub(crate) focused: bool,
    /// Has been handed to the host for rendering.
    pub(crate) rendered: bool,
    /// Hidden until the host finishes its reveal transition.
    pub(crate) revealing: bool,
}

impl FieldNode {
    /// Build a detached node from a config bundle.
    pub(crate) fn from_config(
        field_type: FieldType,
        id: String,
        name: String,
        config: &FieldConfig,
    ) -> Self {
        let options = match &config.options {
            Some(opts) => opts.clone(),
            None if field_type.capabilities().options => default_options(),
            None => Vec::new(),
        };
        Self {
            id,
            field_type,
            label: config
                .label
                .clone()
                .unwrap_or_else(|| field_type.default_label().to_string()),
            name,
            predefined_choices: options.iter().collect(),
            options,
            predefined_value: config.predefined_value.clone().unwrap_or_default(),
            tip: config.tip.clone().unwrap_or_default(),
            width: config.width.clone().unwrap_or_default(),
            required: config.required.unwrap_or(false),
            unique: config.unique.unwrap_or(false),
            show_label: config.show_label.unwrap_or(true),
            hidden_attributes: config.hidden_attributes.clone().unwrap_or_default(),
            read_only_attributes: config.read_only_attributes.clone().unwrap_or_default(),
            parent: None,
            children: Vec::new(),
            selected: false,
            focused: false,
            rendered: false,
            revealing: false,
        }
    }

    /// Stable string id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Field type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Capabilities of this field's type.
    pub fn capabilities(&self) -> Capabilities {
        self.field_type.capabilities()
    }

    /// Can this field hold children?
    pub fn accepts_children(&self) -> bool {
        self.capabilities().accept_children
    }

    /// Displayed label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Submitted name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Option list.
    pub fn options(&self) -> &[FieldOption] {
        &self.options
    }

    /// Choices offered by the predefined-value editor.
    pub fn predefined_choices(&self) -> &ChoiceMap {
        &self.predefined_choices
    }

    /// Required flag.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Unique flag.
    pub fn unique(&self) -> bool {
        self.unique
    }

    /// Containing list, if attached.
    pub fn parent(&self) -> Option<Container> {
        self.parent
    }

    /// Ordered children.
    pub fn children(&self) -> &[FieldId] {
        &self.children
    }

    /// Is the field in the selection set?
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Does the field hold keyboard focus?
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Has the field been rendered?
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Is the field waiting for its reveal transition?
    pub fn is_revealing(&self) -> bool {
        self.revealing
    }

    /// Is the attribute excluded from the property editor?
    pub fn is_hidden(&self, attr: Attribute) -> bool {
        self.hidden_attributes.iter().any(|a| a == attr.name())
    }

    /// Is the attribute shown without an editor?
    pub fn is_read_only(&self, attr: Attribute) -> bool {
        self.read_only_attributes.iter().any(|a| a == attr.name())
    }

    /// Current value of an attribute.
    pub fn attribute(&self, attr: Attribute) -> AttrValue {
        match attr {
            Attribute::Type => AttrValue::Text(self.field_type.tag().to_string()),
            Attribute::Label => AttrValue::Text(self.label.clone()),
            Attribute::ShowLabel => AttrValue::Bool(self.show_label),
            Attribute::Required => AttrValue::Bool(self.required),
            Attribute::Name => AttrValue::Text(self.name.clone()),
            Attribute::PredefinedValue => AttrValue::Text(self.predefined_value.clone()),
            Attribute::Tip => AttrValue::Text(self.tip.clone()),
            Attribute::Width => AttrValue::Text(self.width.clone()),
            Attribute::Options => AttrValue::Options(self.options.clone()),
            Attribute::Unique => AttrValue::Bool(self.unique),
            Attribute::HiddenAttributes => AttrValue::List(self.hidden_attributes.clone()),
            Attribute::ReadOnlyAttributes => AttrValue::List(self.read_only_attributes.clone()),
        }
    }

    /// Write an attribute. Flags accept `"true"` and `"false"` text.
    pub(crate) fn set_attribute(&mut self, attr: Attribute, value: AttrValue) -> Result<()> {
        match attr {
            Attribute::Type => {
                if value != AttrValue::Text(self.field_type.tag().to_string()) {
                    return Err(invalid(attr, &value));
                }
            }
            Attribute::Label => self.label = text(attr, value)?,
            Attribute::Name => self.name = text(attr, value)?,
            Attribute::PredefinedValue => self.predefined_value = text(attr, value)?,
            Attribute::Tip => self.tip = text(attr, value)?,
            Attribute::Width => self.width = text(attr, value)?,
            Attribute::ShowLabel => self.show_label = flag(attr, &value)?,
            Attribute::Required => self.required = flag(attr, &value)?,
            Attribute::Unique => self.unique = flag(attr, &value)?,
            Attribute::Options => match value {
                AttrValue::Options(opts) => {
                    self.predefined_choices = opts.iter().collect();
                    self.options = opts;
                }
                other => return Err(invalid(attr, &other)),
            },
            Attribute::HiddenAttributes => self.hidden_attributes = list(attr, value)?,
            Attribute::ReadOnlyAttributes => self.read_only_attributes = list(attr, value)?,
        }
        Ok(())
    }

    /// The attributes a copy of this field is created from. Id and name are
    /// left undefined so the copy gets fresh ones; children are not included.
    pub fn cloning_config(&self) -> FieldConfig {
        FieldConfig {
            field_type: Some(self.field_type.tag().to_string()),
            id: None,
            label: Some(self.label.clone()),
            name: None,
            options: Some(self.options.clone()),
            predefined_value: Some(self.predefined_value.clone()),
            tip: Some(self.tip.clone()),
            width: Some(self.width.clone()),
            required: Some(self.required),
            unique: Some(self.unique),
            show_label: Some(self.show_label),
            hidden_attributes: Some(self.hidden_attributes.clone()),
            read_only_attributes: Some(self.read_only_attributes.clone()),
            fields: Vec::new(),
        }
    }
}

/// Rejection for a value that does not fit an attribute.
fn invalid(attr: Attribute, value: &AttrValue) -> Error {
    Error::InvalidAttribute {
        attribute: attr.name().to_string(),
        value: value.to_string(),
    }
}

/// Coerce a value to text.
fn text(attr: Attribute, value: AttrValue) -> Result<String> {
    match value {
        AttrValue::Text(s) => Ok(s),
        other => Err(invalid(attr, &other)),
    }
}

/// Coerce a value to a flag.
fn flag(attr: Attribute, value: &AttrValue) -> Result<bool> {
    match value {
        AttrValue::Bool(b) => Ok(*b),
        AttrValue::Text(s) if s == "true" => Ok(true),
        AttrValue::Text(s) if s == "false" => Ok(false),
        other => Err(invalid(attr, other)),
    }
}

/// Coerce a value to a list of names.
fn list(attr: Attribute, value: AttrValue) -> Result<Vec<String>> {
    match value {
        AttrValue::List(items) => Ok(items),
        other => Err(invalid(attr, &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(field_type: FieldType, config: &FieldConfig) -> FieldNode {
        FieldNode::from_config(field_type, "f1".into(), "n1".into(), config)
    }

    #[test]
    fn defaults_fill_undefined_attributes() {
        let n = node(FieldType::Radio, &FieldConfig::default());
        assert_eq!(n.label(), "Radio Buttons");
        assert_eq!(n.options().len(), 3);
        assert_eq!(n.predefined_choices().get("value 2"), Some("option 2"));
        assert!(n.attribute(Attribute::ShowLabel) == AttrValue::Bool(true));
        assert!(!n.required());

        let n = node(FieldType::Text, &FieldConfig::default().label("Email"));
        assert_eq!(n.label(), "Email");
        assert!(n.options().is_empty());
    }

    #[test]
    fn flags_accept_text() {
        let mut n = node(FieldType::Text, &FieldConfig::default());
        n.set_attribute(Attribute::Required, "true".into()).unwrap();
        assert!(n.required());
        n.set_attribute(Attribute::Required, false.into()).unwrap();
        assert!(!n.required());
        assert!(matches!(
            n.set_attribute(Attribute::Required, "maybe".into()),
            Err(Error::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn type_is_not_writable() {
        let mut n = node(FieldType::Text, &FieldConfig::default());
        assert!(n.set_attribute(Attribute::Type, "text".into()).is_ok());
        assert!(n.set_attribute(Attribute::Type, "select".into()).is_err());
        assert_eq!(n.field_type(), FieldType::Text);
    }

    #[test]
    fn choice_map_replaces_in_place() {
        let mut m = ChoiceMap::new();
        m.insert("a", "A");
        m.insert("b", "B");
        m.insert("a", "Alpha");
        let pairs: Vec<_> = m.iter().collect();
        assert_eq!(pairs, vec![("a", "Alpha"), ("b", "B")]);
    }

    #[test]
    fn attribute_names() {
        for a in Attribute::ALL {
            assert_eq!(a.name().parse::<Attribute>(), Ok(a));
        }
        assert!("colour".parse::<Attribute>().is_err());
    }

    #[test]
    fn cloning_config_omits_identity() {
        let n = node(FieldType::Select, &FieldConfig::default().label("Pick"));
        let c = n.cloning_config();
        assert_eq!(c.id, None);
        assert_eq!(c.name, None);
        assert_eq!(c.label.as_deref(), Some("Pick"));
        assert_eq!(c.field_type.as_deref(), Some("select"));
    }

    #[test]
    fn config_deserializes_camel_case() {
        let c: FieldConfig = serde_json::from_str(
            r#"{"type":"text","showLabel":false,"readOnlyAttributes":["name"]}"#,
        )
        .unwrap();
        assert_eq!(c.field_type.as_deref(), Some("text"));
        assert_eq!(c.show_label, Some(false));
        assert_eq!(c.read_only_attributes, Some(vec!["name".to_string()]));
        assert_eq!(c.label, None);
    }
}
