use serde::{Deserialize, Serialize};

use super::{error::Result, field::FieldConfig, focus::Notice};

/// User-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Strings {
    /// Add-field action.
    pub add_node: String,
    /// Close button.
    pub close: String,
    /// Property name column header.
    pub property_name: String,
    /// Save button.
    pub save: String,
    /// Settings tab.
    pub settings: String,
    /// Value column header.
    pub value: String,
    /// Title of the choose-property modal.
    pub choose_property: String,
    /// Delete confirmation.
    pub confirm_delete: String,
    /// Alert for duplicating a unique field.
    pub field_is_unique: String,
    /// Alert for adding a child to a leaf.
    pub no_children: String,
    /// Alert for deleting a protected required field.
    pub required_field: String,
    /// Help modal title.
    pub help: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            add_node: "Add field".into(),
            close: "Close".into(),
            property_name: "Property Name".into(),
            save: "Save".into(),
            settings: "Settings".into(),
            value: "Value".into(),
            choose_property: "Choose a property to edit".into(),
            confirm_delete: "Are you sure you want to delete the selected field?".into(),
            field_is_unique: "Field is unique".into(),
            no_children: "This field does not accept children".into(),
            required_field: "Required fields cannot be removed".into(),
            help: "Help".into(),
        }
    }
}

impl Strings {
    /// Text for a notice.
    pub fn notice(&self, notice: Notice) -> &str {
        match notice {
            Notice::FieldIsUnique => &self.field_is_unique,
            Notice::NoChildren => &self.no_children,
            Notice::RequiredField => &self.required_field,
        }
    }
}

/// Form builder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Whether required fields may be deleted.
    pub allow_remove_required_fields: bool,
    /// Whether focusing a field opens its property editor.
    pub enable_editing: bool,
    /// Address of the help page.
    pub help_url: String,
    /// Prefix stripped from template ids.
    pub available_fields_id_prefix: String,
    /// Prefix of generated field ids, stripped to find a field's template.
    pub fields_id_prefix: String,
    /// User-facing text.
    pub strings: Strings,
    /// Template catalog.
    pub available_fields: Vec<FieldConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allow_remove_required_fields: false,
            enable_editing: true,
            help_url: "help.html".into(),
            available_fields_id_prefix: "availableFields_field_".into(),
            fields_id_prefix: "fields_field_".into(),
            strings: Strings::default(),
            available_fields: Vec::new(),
        }
    }
}

impl Config {
    /// Load a config from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append a template to the catalog.
    pub fn with_template(mut self, template: FieldConfig) -> Self {
        self.available_fields.push(template);
        self
    }
}
