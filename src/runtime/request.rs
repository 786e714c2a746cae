use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::model::HttpMethod;

/// In-flight request value, taken and returned by pre-send hooks.
/// The url is a path relative to the node's request defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub url: String,
    pub qs: Map<String, Value>,
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
}

impl RequestOptions {
    pub fn new(
        method: HttpMethod,
        url: &str,
    ) -> Self {
        Self {
            method,
            url: url.to_string(),
            qs: Map::new(),
            body: None,
            headers: HashMap::new(),
        }
    }

    pub fn set_query<T: Serialize>(
        &mut self,
        key: &str,
        value: T,
    ) {
        self.qs.insert(key.to_string(), json!(value));
    }

    /// Insert a body entry, creating the body object on demand.
    pub fn set_body_entry<T: Serialize>(
        &mut self,
        key: &str,
        value: T,
    ) {
        let body = self.body.get_or_insert_with(|| json!({}));
        if let Value::Object(map) = body {
            map.insert(key.to_string(), json!(value));
        }
    }

    pub fn body_entry(
        &self,
        key: &str,
    ) -> Option<&Value> {
        self.body.as_ref().and_then(|body| body.get(key))
    }

    pub fn set_header(
        &mut self,
        key: &str,
        value: &str,
    ) {
        self.headers.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_set_query() {
        let mut options = RequestOptions::new(HttpMethod::Get, "/v2/payments");
        options.set_query("limit", 100);
        options.set_query("testmode", true);

        assert_eq!(options.qs.get("limit"), Some(&json!(100)));
        assert_eq!(options.qs.get("testmode"), Some(&json!(true)));
    }

    #[test]
    fn test_set_body_entry_creates_object() {
        let mut options = RequestOptions::new(HttpMethod::Post, "/v2/payments");
        assert_eq!(options.body, None);

        options.set_body_entry("testmode", true);
        assert_eq!(options.body, Some(json!({"testmode": true})));

        options.set_body_entry("description", "Order 1");
        assert_eq!(options.body_entry("description"), Some(&json!("Order 1")));
    }

    #[test]
    fn test_set_body_entry_preserves_existing() {
        let mut options = RequestOptions::new(HttpMethod::Post, "/v2/payments");
        options.body = Some(json!({"amount": {"value": "10.00", "currency": "EUR"}}));
        options.set_body_entry("testmode", true);

        assert_eq!(options.body_entry("amount"), Some(&json!({"value": "10.00", "currency": "EUR"})));
        assert_eq!(options.body_entry("testmode"), Some(&json!(true)));
    }
}
