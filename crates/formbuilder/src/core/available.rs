use super::{
    error::{Error, Result},
    field::FieldConfig,
    field_type::FieldType,
};

/// A template in the catalog that users drag or pick from to create fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableField {
    /// Template id with any catalog prefix stripped.
    id: String,
    /// Type of the fields this template creates.
    field_type: FieldType,
    /// Default attribute bundle.
    defaults: FieldConfig,
    /// False while the template's unique instance is placed.
    draggable: bool,
}

impl AvailableField {
    /// Build a template from its config. `prefix` is stripped from the id.
    pub fn new(config: FieldConfig, prefix: &str) -> Result<Self> {
        let raw = config
            .id
            .as_deref()
            .ok_or_else(|| Error::Config("available field without an id".into()))?;
        let id = raw.strip_prefix(prefix).unwrap_or(raw).to_string();
        let tag = config.field_type.as_deref().unwrap_or("text");
        let field_type = tag.parse()?;
        Ok(Self {
            id,
            field_type,
            defaults: config,
            draggable: true,
        })
    }

    /// Template id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Type of created fields.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Label shown in the catalog.
    pub fn label(&self) -> &str {
        self.defaults
            .label
            .as_deref()
            .unwrap_or_else(|| self.field_type.default_label())
    }

    /// Name given to the unique instance.
    pub fn name(&self) -> Option<&str> {
        self.defaults.name.as_deref()
    }

    /// Is at most one instance allowed?
    pub fn unique(&self) -> bool {
        self.defaults.unique.unwrap_or(false)
    }

    /// Can the template currently be dragged or picked?
    pub fn draggable(&self) -> bool {
        self.draggable
    }

    /// Set the draggable flag.
    pub(crate) fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
    }

    /// The bundle a new field is created from. A unique template's instance
    /// takes the template's id and name so it can be traced back.
    pub fn field_config(&self) -> FieldConfig {
        let d = &self.defaults;
        let (id, name) = if self.unique() {
            (Some(self.id.clone()), d.name.clone())
        } else {
            (None, None)
        };
        FieldConfig {
            field_type: Some(self.field_type.tag().to_string()),
            id,
            label: d.label.clone(),
            name,
            options: d.options.clone(),
            predefined_value: d.predefined_value.clone(),
            tip: d.tip.clone(),
            width: d.width.clone(),
            required: d.required,
            unique: d.unique,
            show_label: d.show_label,
            hidden_attributes: d.hidden_attributes.clone(),
            read_only_attributes: d.read_only_attributes.clone(),
            fields: Vec::new(),
        }
    }
}

/// The ordered template catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableFields {
    /// Templates in catalog order.
    fields: Vec<AvailableField>,
}

impl AvailableFields {
    /// Build the catalog from template configs.
    pub fn from_configs(configs: &[FieldConfig], prefix: &str) -> Result<Self> {
        let mut fields: Vec<AvailableField> = Vec::with_capacity(configs.len());
        for c in configs {
            let f = AvailableField::new(c.clone(), prefix)?;
            if fields.iter().any(|e| e.id == f.id) {
                return Err(Error::Config(format!("duplicate available field: {}", f.id)));
            }
            fields.push(f);
        }
        Ok(Self { fields })
    }

    /// Look up a template by stripped id.
    pub fn get(&self, id: &str) -> Option<&AvailableField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Mutable lookup by stripped id.
    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut AvailableField> {
        self.fields.iter_mut().find(|f| f.id == id)
    }

    /// Template at a catalog position.
    pub fn by_index(&self, index: usize) -> Option<&AvailableField> {
        self.fields.get(index)
    }

    /// Iterate templates in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &AvailableField> {
        self.fields.iter()
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Is the catalog empty?
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
