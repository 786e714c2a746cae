use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    MollieflowError, Result,
    common::Vars,
    model::{CredentialSchema, DisplayRules, NodeProperty, OperationCatalog},
};

/// Request settings shared by every operation of the node.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RequestDefaults {
    #[serde(rename = "baseURL")]
    pub base_url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Reference to a credential schema, gated on the authentication selector.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CredentialRef {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "displayOptions", skip_serializing_if = "Option::is_none")]
    pub display_rules: Option<DisplayRules>,
}

/// Declarative node descriptor a host renders and executes against.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub version: u32,
    pub request_defaults: RequestDefaults,
    pub credentials: Vec<CredentialRef>,
    pub properties: Vec<NodeProperty>,
}

impl NodeDescriptor {
    /// Fill absent visible fields with their declared defaults, in
    /// declaration order so selector defaults cascade to the fields they
    /// gate (`returnAll` before `limit`).
    pub fn resolve_values(
        &self,
        values: &Vars,
    ) -> Vars {
        let mut resolved = values.clone();
        for property in &self.properties {
            if !resolved.contains_key(&property.name) && !property.default_value.is_null() && property.is_visible(&resolved) {
                resolved.set(&property.name, property.default_value.clone());
            }
        }
        resolved
    }

    /// Properties shown for the given values; only these contribute to a
    /// request.
    pub fn visible_properties(
        &self,
        values: &Vars,
    ) -> Vec<&NodeProperty> {
        self.properties.iter().filter(|p| p.is_visible(values)).collect()
    }

    /// Retain only entries a visible property claims. Hosts keep form
    /// values across selection changes, so a hidden field's value must
    /// not reach templates or hooks.
    pub fn scope_values(
        &self,
        values: &Vars,
    ) -> Vars {
        let visible: HashSet<&str> = self.visible_properties(values).iter().map(|p| p.name.as_str()).collect();
        let mut scoped = Vars::new();
        for (key, value) in values.iter() {
            if visible.contains(key.as_str()) {
                scoped.set(key, value.clone());
            }
        }
        scoped
    }

    /// JSON Schema over the visible property set, used to reject invalid
    /// field values before a request is shaped.
    pub fn compile_schema(
        &self,
        values: &Vars,
    ) -> Value {
        let mut entries = serde_json::Map::new();
        let mut required: Vec<String> = Vec::new();
        for property in self.visible_properties(values) {
            entries.insert(property.name.clone(), property.schema_entry());
            if property.required {
                required.push(property.name.clone());
            }
        }
        json!({"type": "object", "properties": entries, "required": required})
    }

    pub fn validate(
        &self,
        values: &Vars,
    ) -> Result<()> {
        let schema = self.compile_schema(values);
        let instance = Value::from(values.clone());
        jsonschema::validate(&schema, &instance).map_err(|e| MollieflowError::Validation(format!("invalid parameters: {}", e)))?;
        Ok(())
    }

    pub fn property(
        &self,
        name: &str,
    ) -> Option<&NodeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The credential schema active for the given values.
    pub fn credential_for(
        &self,
        values: &Vars,
    ) -> Result<&CredentialRef> {
        self.credentials
            .iter()
            .find(|c| match &c.display_rules {
                Some(rules) => rules.matches(values),
                None => true,
            })
            .ok_or_else(|| MollieflowError::Credential("no credential matches the current authentication selection".to_string()))
    }
}

/// The bundle a host consumes: descriptor, routing catalog and the
/// credential schemas the descriptor references.
#[derive(Debug, Clone)]
pub struct Connector {
    pub descriptor: NodeDescriptor,
    pub catalog: OperationCatalog,
    pub credentials: Vec<CredentialSchema>,
}

impl Connector {
    pub fn credential_schema(
        &self,
        name: &str,
    ) -> Result<&CredentialSchema> {
        self.credentials
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| MollieflowError::Credential(format!("unknown credential schema '{}'", name)))
    }
}
