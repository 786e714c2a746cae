use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{MollieflowError, Result, common::Vars};

/// Per-invocation execution context: the user's field values for one
/// resource/operation selection plus the stored fields of the active
/// credential. Stateless across invocations; the connector holds no
/// shared mutable state.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    params: Vars,
    credentials: Vars,
}

impl ExecutionContext {
    pub fn new(
        params: Vars,
        credentials: Vars,
    ) -> Self {
        Self { params, credentials }
    }

    pub fn params(&self) -> &Vars {
        &self.params
    }

    pub fn credentials(&self) -> &Vars {
        &self.credentials
    }

    pub fn param<T: DeserializeOwned>(
        &self,
        name: &str,
    ) -> Option<T> {
        self.params.get(name)
    }

    pub fn param_or<T: DeserializeOwned>(
        &self,
        name: &str,
        default: T,
    ) -> T {
        self.params.get(name).unwrap_or(default)
    }

    /// Dotted-path read into collection values
    /// (`additionalFields.webhookUrl`).
    pub fn param_path(
        &self,
        path: &str,
    ) -> Option<Value> {
        let mut keys = path.split('.');
        let first = keys.next()?;
        let mut current = self.params.get_value(first)?.clone();
        for key in keys {
            current = current.get(key)?.clone();
        }
        Some(current)
    }

    pub fn authentication(&self) -> String {
        self.params.get::<String>("authentication").unwrap_or_else(|| "apiKey".to_string())
    }

    pub fn resource(&self) -> Result<String> {
        self.params
            .get::<String>("resource")
            .ok_or_else(|| MollieflowError::Descriptor("missing 'resource' selection".to_string()))
    }

    pub fn operation(&self) -> Result<String> {
        self.params
            .get::<String>("operation")
            .ok_or_else(|| MollieflowError::Descriptor("missing 'operation' selection".to_string()))
    }

    pub fn is_oauth2(&self) -> bool {
        self.authentication() == "oAuth2"
    }

    /// OAuth2 credential test flag; always false under API-key
    /// authentication, where test/live is implied by the key prefix.
    pub fn test_mode(&self) -> bool {
        self.is_oauth2() && self.credentials.get::<bool>("testMode") == Some(true)
    }

    pub fn api_key(&self) -> Result<String> {
        if self.authentication() != "apiKey" {
            return Err(MollieflowError::Credential("api key credential is not active".to_string()));
        }
        self.credentials
            .get::<String>("apiKey")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| MollieflowError::Credential("apiKey is not set".to_string()))
    }

    /// Host-supplied access token; the token exchange itself is owned by
    /// the embedding host.
    pub fn access_token(&self) -> Result<String> {
        if !self.is_oauth2() {
            return Err(MollieflowError::Credential("oauth2 credential is not active".to_string()));
        }
        self.credentials
            .get::<String>("accessToken")
            .filter(|token| !token.is_empty())
            .ok_or_else(|| MollieflowError::Credential("accessToken is not set".to_string()))
    }

    /// Bearer token for the active authentication mode.
    pub fn bearer_token(&self) -> Result<String> {
        match self.authentication().as_str() {
            "apiKey" => self.api_key(),
            "oAuth2" => self.access_token(),
            other => Err(MollieflowError::Credential(format!("unknown authentication mode '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_param_path_traversal() {
        let params = Vars::new().with("additionalFields", json!({"webhookUrl": "https://example.com/hook"}));
        let ctx = ExecutionContext::new(params, Vars::new());

        assert_eq!(ctx.param_path("additionalFields.webhookUrl"), Some(json!("https://example.com/hook")));
        assert_eq!(ctx.param_path("additionalFields.missing"), None);
        assert_eq!(ctx.param_path("missing"), None);
    }

    #[test]
    fn test_test_mode_requires_oauth2() {
        let credentials = Vars::new().with("testMode", true);

        let ctx = ExecutionContext::new(Vars::new().with("authentication", "oAuth2"), credentials.clone());
        assert!(ctx.test_mode());

        let ctx = ExecutionContext::new(Vars::new().with("authentication", "apiKey"), credentials);
        assert!(!ctx.test_mode());
    }

    #[test]
    fn test_bearer_token_per_mode() {
        let ctx = ExecutionContext::new(
            Vars::new().with("authentication", "apiKey"),
            Vars::new().with("apiKey", "live_abc123"),
        );
        assert_eq!(ctx.bearer_token().unwrap(), "live_abc123");

        let ctx = ExecutionContext::new(
            Vars::new().with("authentication", "oAuth2"),
            Vars::new().with("accessToken", "access_xyz"),
        );
        assert_eq!(ctx.bearer_token().unwrap(), "access_xyz");
    }

    #[test]
    fn test_bearer_token_missing_field() {
        let ctx = ExecutionContext::new(Vars::new().with("authentication", "oAuth2"), Vars::new());
        let err = ctx.bearer_token().unwrap_err();
        assert!(matches!(err, MollieflowError::Credential(_)));
        assert!(err.to_string().contains("accessToken"));
    }

    #[test]
    fn test_default_authentication() {
        let ctx = ExecutionContext::default();
        assert_eq!(ctx.authentication(), "apiKey");
        assert!(!ctx.is_oauth2());
    }
}
