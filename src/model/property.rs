use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::common::Vars;

/// field name as referenced by templates and display rules
pub type FieldName = String;

/// Kind of a form field, wire-compatible with declarative node JSON.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PropertyKind {
    #[default]
    String,
    Number,
    Boolean,
    Options,
    MultiOptions,
    Collection,
    FixedCollection,
    DateTime,
    Hidden,
}

/// One static choice in an `options`/`multiOptions` field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PropertyOption {
    /// display label
    pub name: String,
    /// wire value
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertyOption {
    pub fn new<T: Serialize>(
        name: &str,
        value: T,
    ) -> Self {
        Self {
            name: name.to_string(),
            value: json!(value),
            description: None,
        }
    }

    pub fn describe(
        mut self,
        description: &str,
    ) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Renderer hints attached to a field.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    /// mask the value in the form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<bool>,
    /// name of the dynamic option loader backing this dropdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_options_method: Option<String>,
    /// fixed collection rows may repeat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_values: Option<bool>,
}

/// Visibility rules: a field is shown iff, for every listed selector,
/// the current value is one of the rule's values.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DisplayRules {
    pub show: HashMap<FieldName, Vec<Value>>,
}

impl DisplayRules {
    pub fn matches(
        &self,
        selection: &Vars,
    ) -> bool {
        self.show.iter().all(|(field, allowed)| match selection.get_value(field) {
            Some(value) => allowed.contains(value),
            None => false,
        })
    }
}

/// One group of row fields inside a `fixedCollection`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyGroup {
    pub name: FieldName,
    pub display_name: String,
    pub values: Vec<NodeProperty>,
}

impl PropertyGroup {
    pub fn new(
        name: &str,
        display_name: &str,
        values: Vec<NodeProperty>,
    ) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            values,
        }
    }
}

/// Declarative form-field record consumed by a host renderer.
///
/// `items` holds the sub-fields of a `collection`, `groups` the row
/// groups of a `fixedCollection`; both are empty for scalar kinds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub name: FieldName,
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "default", default)]
    pub default_value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<NodeProperty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<PropertyGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_options: Option<TypeOptions>,
    #[serde(rename = "displayOptions", skip_serializing_if = "Option::is_none")]
    pub display_rules: Option<DisplayRules>,
}

impl NodeProperty {
    pub fn new(
        name: &str,
        display_name: &str,
        kind: PropertyKind,
    ) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            kind,
            required: false,
            default_value: Value::Null,
            placeholder: None,
            description: None,
            options: Vec::new(),
            items: Vec::new(),
            groups: Vec::new(),
            type_options: None,
            display_rules: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value<T: Serialize>(
        mut self,
        value: T,
    ) -> Self {
        self.default_value = json!(value);
        self
    }

    pub fn placeholder(
        mut self,
        placeholder: &str,
    ) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn describe(
        mut self,
        description: &str,
    ) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn options(
        mut self,
        options: Vec<PropertyOption>,
    ) -> Self {
        self.options = options;
        self
    }

    pub fn items(
        mut self,
        items: Vec<NodeProperty>,
    ) -> Self {
        self.items = items;
        self
    }

    pub fn groups(
        mut self,
        groups: Vec<PropertyGroup>,
    ) -> Self {
        self.groups = groups;
        self
    }

    pub fn type_options(
        mut self,
        type_options: TypeOptions,
    ) -> Self {
        self.type_options = Some(type_options);
        self
    }

    /// Add one selector rule; repeated calls accumulate.
    pub fn show<T: Serialize>(
        mut self,
        field: &str,
        values: &[T],
    ) -> Self {
        let rules = self.display_rules.get_or_insert_with(DisplayRules::default);
        rules.show.insert(field.to_string(), values.iter().map(|v| json!(v)).collect());
        self
    }

    /// Visible under the given selection; fields without rules always are.
    pub fn is_visible(
        &self,
        selection: &Vars,
    ) -> bool {
        match &self.display_rules {
            Some(rules) => rules.matches(selection),
            None => true,
        }
    }

    /// Loader name when this field is a dynamic dropdown.
    pub fn load_options_method(&self) -> Option<&str> {
        self.type_options.as_ref().and_then(|t| t.load_options_method.as_deref())
    }

    /// JSON Schema fragment for this field, used to validate user values
    /// before a request is shaped.
    pub fn schema_entry(&self) -> Value {
        match self.kind {
            PropertyKind::String | PropertyKind::DateTime | PropertyKind::Hidden => json!({"type": "string"}),
            // numeric renderer bounds are form hints, not validation rules;
            // hooks clamp where the API enforces a ceiling
            PropertyKind::Number => json!({"type": "number"}),
            PropertyKind::Boolean => json!({"type": "boolean"}),
            PropertyKind::Options => match self.static_string_values() {
                Some(mut values) => {
                    // the declared default is always storable, even when it
                    // is not a listed option (unset dropdowns default to "")
                    if let Some(default) = self.default_value.as_str() {
                        if !values.iter().any(|v| v == default) {
                            values.insert(0, default.to_string());
                        }
                    }
                    json!({"type": "string", "enum": values})
                }
                None => json!({"type": "string"}),
            },
            PropertyKind::MultiOptions => match self.static_string_values() {
                Some(values) => json!({"type": "array", "items": {"type": "string", "enum": values}}),
                None => json!({"type": "array", "items": {"type": "string"}}),
            },
            PropertyKind::Collection => {
                let entries: serde_json::Map<String, Value> = self.items.iter().map(|p| (p.name.clone(), p.schema_entry())).collect();
                json!({"type": "object", "properties": entries})
            }
            PropertyKind::FixedCollection => {
                let entries: serde_json::Map<String, Value> = self
                    .groups
                    .iter()
                    .map(|group| {
                        let row: serde_json::Map<String, Value> = group.values.iter().map(|p| (p.name.clone(), p.schema_entry())).collect();
                        let row_schema = json!({"type": "object", "properties": row});
                        let multiple = self.type_options.as_ref().and_then(|t| t.multiple_values).unwrap_or(false);
                        let entry = if multiple {
                            json!({"type": "array", "items": row_schema})
                        } else {
                            row_schema
                        };
                        (group.name.clone(), entry)
                    })
                    .collect();
                json!({"type": "object", "properties": entries})
            }
        }
    }

    /// Static option values when every declared option is a string;
    /// dynamic dropdowns (loader-backed) have none.
    fn static_string_values(&self) -> Option<Vec<String>> {
        if self.options.is_empty() || self.load_options_method().is_some() {
            return None;
        }
        self.options.iter().map(|o| o.value.as_str().map(str::to_string)).collect()
    }
}
