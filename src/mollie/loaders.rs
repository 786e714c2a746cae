//! Dynamic dropdown loaders.
//!
//! A loader never errors: empty lists and request failures degrade to a
//! single labelled placeholder with an empty value, so the dropdown
//! always renders something actionable. Options are fetched on every
//! call; there is no caching layer.

use std::str::FromStr;

use serde_json::{Map, json};
use tracing::trace;

use crate::{
    common::Vars,
    model::{NodeProperty, PropertyOption},
    runtime::{Executor, Transport, extract_root},
};

/// The loaders a property can name in its `loadOptionsMethod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum LoadOptions {
    GetBalances,
    GetPayments,
    GetProfiles,
}

impl LoadOptions {
    fn path(&self) -> &'static str {
        match self {
            LoadOptions::GetBalances => "/v2/balances",
            LoadOptions::GetPayments => "/v2/payments",
            LoadOptions::GetProfiles => "/v2/profiles",
        }
    }

    fn root(&self) -> &'static str {
        match self {
            LoadOptions::GetBalances => "_embedded.balances",
            LoadOptions::GetPayments => "_embedded.payments",
            LoadOptions::GetProfiles => "_embedded.profiles",
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            LoadOptions::GetBalances => "balances",
            LoadOptions::GetPayments => "payments",
            LoadOptions::GetProfiles => "profiles",
        }
    }

    /// Placeholder shown when the backing request fails.
    fn error_option(
        &self,
        message: &str,
        status: Option<u16>,
    ) -> PropertyOption {
        match self {
            LoadOptions::GetBalances => {
                let label = match status {
                    Some(status) => format!("Error: {} ({})", message, status),
                    None => format!("Error: {}", message),
                };
                PropertyOption::new(&label, "")
            }
            LoadOptions::GetPayments => PropertyOption::new("No payments found - check API credentials", ""),
            LoadOptions::GetProfiles => PropertyOption::new("No profiles found - check API credentials", ""),
        }
    }

    /// Placeholder shown when the list comes back empty.
    fn empty_option(
        &self,
        test_mode: bool,
    ) -> PropertyOption {
        let label = if test_mode {
            format!("No test {} available", self.noun())
        } else {
            format!("No {} available", self.noun())
        };
        PropertyOption::new(&label, "")
    }

    fn map_item(
        &self,
        item: &serde_json::Value,
    ) -> PropertyOption {
        let text = |key: &str| item.get(key).and_then(serde_json::Value::as_str).unwrap_or_default();
        let id = text("id");
        match self {
            LoadOptions::GetBalances => {
                let description = Some(text("description")).filter(|d| !d.is_empty()).unwrap_or(id);
                PropertyOption::new(&format!("{} ({} - {})", description, text("currency"), text("status")), id)
            }
            LoadOptions::GetPayments => {
                let description = Some(text("description")).filter(|d| !d.is_empty()).unwrap_or("No description");
                let amount = item
                    .get("amount")
                    .filter(|amount| !amount.is_null())
                    .map(|amount| {
                        format!(
                            "{} {}",
                            amount.get("currency").and_then(serde_json::Value::as_str).unwrap_or_default(),
                            amount.get("value").and_then(serde_json::Value::as_str).unwrap_or_default(),
                        )
                    })
                    .unwrap_or_default();
                PropertyOption::new(&format!("{} - {} ({})", description, amount, text("status")), id)
            }
            LoadOptions::GetProfiles => {
                let name = Some(text("name")).filter(|n| !n.is_empty()).unwrap_or(id);
                PropertyOption::new(name, id)
            }
        }
    }
}

/// Loader behind a property's dropdown, when it declares one.
pub fn loader_for(property: &NodeProperty) -> Option<LoadOptions> {
    property.load_options_method().and_then(|name| LoadOptions::from_str(name).ok())
}

/// Resolve one dropdown's options against the live API.
pub async fn load_options<T: Transport>(
    executor: &Executor<T>,
    loader: LoadOptions,
    values: &Vars,
    credentials: &Vars,
) -> Vec<PropertyOption> {
    let ctx = executor.context(values, credentials);

    // the balances endpoint only exists for organization tokens
    if loader == LoadOptions::GetBalances && !ctx.is_oauth2() {
        return vec![PropertyOption::new("Balances dropdown only available with OAuth2", "")];
    }

    let mut qs = Map::new();
    qs.insert("limit".to_string(), json!(250));
    if ctx.test_mode() {
        qs.insert("testmode".to_string(), json!(true));
    }

    trace!("loaders::{}", loader.as_ref());
    let response = match executor.fetch(&ctx, loader.path(), qs).await {
        Ok(response) if response.is_success() => response,
        Ok(response) => return vec![loader.error_option(&response.error_message(), Some(response.status))],
        Err(err) => return vec![loader.error_option(&err.to_string(), None)],
    };

    let items = extract_root(response.body, loader.root());
    if items.is_empty() {
        return vec![loader.empty_option(ctx.test_mode())];
    }

    items.iter().map(|item| loader.map_item(item)).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        Config, MollieflowError, Result,
        mollie::connector,
        runtime::{HttpResponse, PreparedRequest},
    };

    #[derive(Clone)]
    struct StubTransport {
        response: HttpResponse,
        seen: Arc<Mutex<Vec<PreparedRequest>>>,
    }

    impl StubTransport {
        fn new(
            status: u16,
            body: Value,
        ) -> Self {
            Self {
                response: HttpResponse { status, body },
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn last_request(&self) -> PreparedRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn dispatch(
            &self,
            request: PreparedRequest,
        ) -> Result<HttpResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn dispatch(
            &self,
            _request: PreparedRequest,
        ) -> Result<HttpResponse> {
            Err(MollieflowError::Http("connection refused".to_string()))
        }
    }

    fn executor_with<T: Transport>(transport: T) -> Executor<T> {
        Executor::new(connector(), Config::default(), transport)
    }

    fn oauth2_values() -> Vars {
        Vars::new().with("authentication", "oAuth2")
    }

    fn oauth2_credentials(test_mode: bool) -> Vars {
        Vars::new().with("accessToken", "access_xyz").with("testMode", test_mode)
    }

    #[tokio::test]
    async fn test_balances_require_oauth2() {
        let executor = executor_with(StubTransport::new(200, json!({})));
        let options = load_options(&executor, LoadOptions::GetBalances, &Vars::new(), &Vars::new().with("apiKey", "live_x")).await;

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "Balances dropdown only available with OAuth2");
        assert_eq!(options[0].value, json!(""));
    }

    #[tokio::test]
    async fn test_balances_mapped_with_test_mode_query() {
        let transport = StubTransport::new(
            200,
            json!({"_embedded": {"balances": [
                {"id": "bal_1", "description": "Primary balance", "currency": "EUR", "status": "active"},
                {"id": "bal_2", "currency": "USD", "status": "inactive"},
            ]}}),
        );
        let executor = executor_with(transport.clone());
        let options = load_options(&executor, LoadOptions::GetBalances, &oauth2_values(), &oauth2_credentials(true)).await;

        assert_eq!(options[0].name, "Primary balance (EUR - active)");
        assert_eq!(options[0].value, json!("bal_1"));
        // id stands in when there is no description
        assert_eq!(options[1].name, "bal_2 (USD - inactive)");

        let request = transport.last_request();
        assert_eq!(request.url, "https://api.mollie.com/v2/balances");
        assert_eq!(request.qs.get("limit"), Some(&json!(250)));
        assert_eq!(request.qs.get("testmode"), Some(&json!(true)));
        assert_eq!(request.headers.get("Authorization"), Some(&"Bearer access_xyz".to_string()));
    }

    #[tokio::test]
    async fn test_balances_api_rejection_labelled() {
        let executor = executor_with(StubTransport::new(401, json!({"title": "Unauthorized Request"})));
        let options = load_options(&executor, LoadOptions::GetBalances, &oauth2_values(), &oauth2_credentials(false)).await;

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "Error: Unauthorized Request (401)");
        assert_eq!(options[0].value, json!(""));
    }

    #[tokio::test]
    async fn test_payments_empty_list_placeholder() {
        let executor = executor_with(StubTransport::new(200, json!({"_embedded": {"payments": []}})));

        let options = load_options(&executor, LoadOptions::GetPayments, &oauth2_values(), &oauth2_credentials(false)).await;
        assert_eq!(options[0].name, "No payments available");

        let options = load_options(&executor, LoadOptions::GetPayments, &oauth2_values(), &oauth2_credentials(true)).await;
        assert_eq!(options[0].name, "No test payments available");
    }

    #[tokio::test]
    async fn test_payments_transport_failure_placeholder() {
        let executor = executor_with(FailingTransport);
        let options = load_options(&executor, LoadOptions::GetPayments, &Vars::new(), &Vars::new().with("apiKey", "test_x")).await;

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "No payments found - check API credentials");
    }

    #[tokio::test]
    async fn test_payments_labels() {
        let executor = executor_with(StubTransport::new(
            200,
            json!({"_embedded": {"payments": [
                {"id": "tr_1", "description": "Order 1", "amount": {"currency": "EUR", "value": "10.00"}, "status": "paid"},
                {"id": "tr_2", "status": "open"},
            ]}}),
        ));
        let options = load_options(&executor, LoadOptions::GetPayments, &Vars::new(), &Vars::new().with("apiKey", "test_x")).await;

        assert_eq!(options[0].name, "Order 1 - EUR 10.00 (paid)");
        assert_eq!(options[0].value, json!("tr_1"));
        assert_eq!(options[1].name, "No description -  (open)");
    }

    #[tokio::test]
    async fn test_profiles_label_prefers_name() {
        let executor = executor_with(StubTransport::new(
            200,
            json!({"_embedded": {"profiles": [
                {"id": "pfl_1", "name": "My website"},
                {"id": "pfl_2"},
            ]}}),
        ));
        let options = load_options(&executor, LoadOptions::GetProfiles, &Vars::new(), &Vars::new().with("apiKey", "test_x")).await;

        assert_eq!(options[0].name, "My website");
        assert_eq!(options[0].value, json!("pfl_1"));
        assert_eq!(options[1].name, "pfl_2");
    }

    #[test]
    fn test_loader_for_resolves_descriptor_names() {
        let connector = connector();
        let property = connector
            .descriptor
            .properties
            .iter()
            .find(|p| p.name == "balanceId" && p.load_options_method().is_some())
            .unwrap();

        assert_eq!(loader_for(property), Some(LoadOptions::GetBalances));
        assert_eq!(LoadOptions::from_str("getProfiles").ok(), Some(LoadOptions::GetProfiles));
    }
}
