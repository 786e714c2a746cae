use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{HttpMethod, NodeProperty};

/// Header-injection rule, resolved against the stored credential fields
/// right before dispatch. Values are templates with `{{$credentials.*}}`
/// placeholders.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Authenticate {
    pub headers: HashMap<String, String>,
}

impl Authenticate {
    pub fn bearer(template: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", template));
        Self { headers }
    }
}

/// Probe request a host issues to verify stored credential values.
/// Success is judged purely from the HTTP status.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialTestRequest {
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
}

/// Declarative credential descriptor: the fields a host must store plus
/// how to authenticate requests with them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSchema {
    pub name: String,
    pub display_name: String,
    /// generic grant flow this schema builds on, resolved by the host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    pub properties: Vec<NodeProperty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticate: Option<Authenticate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<CredentialTestRequest>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_authenticate_bearer_header() {
        let authenticate = Authenticate::bearer("{{$credentials.apiKey}}");
        assert_eq!(
            authenticate.headers.get("Authorization"),
            Some(&"Bearer {{$credentials.apiKey}}".to_string())
        );
    }

    #[test]
    fn test_test_request_wire_names() {
        let test = CredentialTestRequest {
            base_url: "https://api.mollie.com".to_string(),
            url: "/v2/methods".to_string(),
            method: HttpMethod::Get,
        };
        let value = serde_json::to_value(&test).unwrap();
        assert_eq!(value["baseURL"], json!("https://api.mollie.com"));
        assert_eq!(value["method"], json!("GET"));
    }
}
