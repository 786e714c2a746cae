use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};

/// Ordered JSON object keyed by field name.
///
/// Holds the user-entered values for one resource/operation selection.
/// Connector code reads it through typed accessors; the embedding host
/// owns the values and their lifetime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vars(Map<String, Value>);

impl Vars {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with<T: Serialize>(
        mut self,
        key: &str,
        value: T,
    ) -> Self {
        self.set(key, value);
        self
    }

    pub fn set<T: Serialize>(
        &mut self,
        key: &str,
        value: T,
    ) {
        self.0.insert(key.to_string(), json!(value));
    }

    /// Typed read; `None` when the key is absent or the value does not
    /// deserialize as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.0.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Value> for Vars {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }
}

impl From<Vars> for Value {
    fn from(vars: Vars) -> Self {
        Value::Object(vars.0)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_vars_set_get() {
        let mut vars = Vars::new();
        vars.set("amount", 10.5);
        vars.set("currency", "EUR");

        assert_eq!(vars.get::<f64>("amount"), Some(10.5));
        assert_eq!(vars.get::<String>("currency"), Some("EUR".to_string()));
        assert_eq!(vars.get::<String>("missing"), None);
    }

    #[test]
    fn test_vars_get_wrong_type() {
        let vars = Vars::new().with("limit", "not a number");
        assert_eq!(vars.get::<u64>("limit"), None);
    }

    #[test]
    fn test_vars_with_builder() {
        let vars = Vars::new().with("resource", "payment").with("operation", "create");
        assert_eq!(vars.len(), 2);
        assert!(vars.contains_key("resource"));
    }

    #[test]
    fn test_vars_from_value() {
        let vars = Vars::from(json!({"description": "Order 1", "returnAll": false}));
        assert_eq!(vars.get::<String>("description"), Some("Order 1".to_string()));
        assert_eq!(vars.get::<bool>("returnAll"), Some(false));

        // non-object values collapse to an empty set
        let vars = Vars::from(json!([1, 2, 3]));
        assert!(vars.is_empty());
    }

    #[test]
    fn test_vars_into_value() {
        let vars = Vars::new().with("status", "paid");
        let value: Value = vars.into();
        assert_eq!(value, json!({"status": "paid"}));
    }
}
