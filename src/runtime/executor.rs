use serde_json::{Map, Value, json};
use tracing::{debug, trace};

use crate::{
    Config, MollieflowError, Result,
    common::Vars,
    model::{Connector, HttpMethod, Operation, PostReceiveStep, Routing},
    runtime::{ExecutionContext, HttpResponse, PreparedRequest, RequestOptions, Transport, template},
};

/// Interprets the connector's routing records: resolves an operation,
/// validates field values, renders templates, runs hooks and dispatches
/// through the transport.
pub struct Executor<T: Transport> {
    connector: Connector,
    config: Config,
    transport: T,
}

impl<T: Transport> Executor<T> {
    pub fn new(
        connector: Connector,
        config: Config,
        transport: T,
    ) -> Self {
        Self {
            connector,
            config,
            transport,
        }
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execution context over defaulted field values and the stored
    /// credential fields.
    pub fn context(
        &self,
        values: &Vars,
        credentials: &Vars,
    ) -> ExecutionContext {
        let values = self.connector.descriptor.resolve_values(values);
        ExecutionContext::new(values, credentials.clone())
    }

    /// The pure half of an invocation: resolve the operation, validate the
    /// visible values, render url and body templates and run the pre-send
    /// hooks in order. No I/O happens here.
    pub fn build_request(
        &self,
        values: &Vars,
        credentials: &Vars,
    ) -> Result<RequestOptions> {
        self.shape(values, credentials).map(|(_, options, _)| options)
    }

    fn shape(
        &self,
        values: &Vars,
        credentials: &Vars,
    ) -> Result<(ExecutionContext, RequestOptions, &Operation)> {
        let values = self.connector.descriptor.resolve_values(values);
        self.connector.descriptor.validate(&values)?;
        // hosts keep values for fields the current selection hides;
        // only the visible set contributes to the request
        let values = self.connector.descriptor.scope_values(&values);

        let ctx = ExecutionContext::new(values, credentials.clone());
        let resource = ctx.resource()?;
        let operation = ctx.operation()?;
        trace!("executor::build_request({}.{})", resource, operation);

        let operation = self.connector.catalog.resolve(&resource, &operation)?;
        let url = template::resolve_template(&ctx, &operation.routing.request.url)?;
        let mut options = RequestOptions::new(operation.routing.request.method, &url);
        if let Some(body) = &operation.routing.request.body {
            options.body = Some(template::resolve_json_value(&ctx, body)?.unwrap_or_else(|| json!({})));
        }

        for hook in &operation.routing.send.pre_send {
            options = hook(&ctx, options)?;
        }

        Ok((ctx, options, operation))
    }

    /// Absolute request with the node's default headers and bearer
    /// authentication applied.
    fn prepare(
        &self,
        ctx: &ExecutionContext,
        options: RequestOptions,
    ) -> Result<PreparedRequest> {
        let mut headers = self.connector.descriptor.request_defaults.headers.clone();
        for (key, value) in options.headers {
            headers.insert(key, value);
        }
        headers.insert("Authorization".to_string(), format!("Bearer {}", ctx.bearer_token()?));

        Ok(PreparedRequest {
            method: options.method,
            url: format!("{}{}", self.config.base_url.trim_end_matches('/'), options.url),
            qs: options.qs,
            headers,
            body: options.body,
        })
    }

    /// Full invocation: build, dispatch, shape output items.
    pub async fn execute(
        &self,
        values: &Vars,
        credentials: &Vars,
    ) -> Result<Vec<Value>> {
        let (ctx, options, operation) = self.shape(values, credentials)?;
        let prepared = self.prepare(&ctx, options)?;
        debug!("executor::dispatch {} {}", prepared.method.as_ref(), prepared.url);

        let response = self.transport.dispatch(prepared).await?;
        if !response.is_success() {
            return Err(MollieflowError::Response {
                status: response.status,
                message: response.error_message(),
            });
        }

        Ok(apply_output(&operation.routing, response.body))
    }

    /// One authenticated GET outside the routing catalog, used by dynamic
    /// option loaders.
    pub async fn fetch(
        &self,
        ctx: &ExecutionContext,
        path: &str,
        qs: Map<String, Value>,
    ) -> Result<HttpResponse> {
        let mut options = RequestOptions::new(HttpMethod::Get, path);
        options.qs = qs;
        let prepared = self.prepare(ctx, options)?;
        debug!("executor::fetch {}", prepared.url);
        self.transport.dispatch(prepared).await
    }

    /// Issue a credential schema's test request; success is judged purely
    /// from the HTTP status.
    pub async fn verify_credential(
        &self,
        name: &str,
        credentials: &Vars,
    ) -> Result<()> {
        let schema = self.connector.credential_schema(name)?;
        let test = schema
            .test
            .as_ref()
            .ok_or_else(|| MollieflowError::Credential(format!("credential '{}' declares no test request", name)))?;

        let mut prepared = PreparedRequest {
            method: test.method,
            url: format!("{}{}", test.base_url.trim_end_matches('/'), test.url),
            ..Default::default()
        };
        if let Some(authenticate) = &schema.authenticate {
            for (key, value) in &authenticate.headers {
                prepared.headers.insert(key.clone(), template::resolve_credentials(credentials, value)?);
            }
        }

        trace!("executor::verify_credential({})", name);
        let response = self
            .transport
            .dispatch(prepared)
            .await
            .map_err(|err| MollieflowError::Credential(err.to_string()))?;
        if !response.is_success() {
            return Err(MollieflowError::Credential(format!("credential test failed: {}", response.error_message())));
        }
        Ok(())
    }
}

/// Run the post-receive pipeline over the response body.
fn apply_output(
    routing: &Routing,
    body: Value,
) -> Vec<Value> {
    let mut items = vec![body];
    for step in &routing.output.post_receive {
        match step {
            PostReceiveStep::RootProperty(path) => {
                items = items.into_iter().flat_map(|item| extract_root(item, path)).collect();
            }
            PostReceiveStep::ForEach(mapper) => {
                items = items.into_iter().map(mapper).collect();
            }
        }
    }
    items
}

/// Extract the value at a dotted path; an absent key yields an empty
/// sequence, an array spreads into items.
pub(crate) fn extract_root(
    item: Value,
    path: &str,
) -> Vec<Value> {
    let mut current = item;
    for key in path.split('.') {
        current = match current.get_mut(key) {
            Some(value) => value.take(),
            None => return Vec::new(),
        };
    }
    match current {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::model::{
        CredentialRef, CredentialSchema, CredentialTestRequest, HttpMethod, NodeDescriptor, NodeProperty, OperationCatalog, OutputOptions,
        PropertyKind, RequestDefaults, RequestTemplate, SendOptions,
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

    fn add_page_limit(
        ctx: &ExecutionContext,
        mut options: RequestOptions,
    ) -> Result<RequestOptions> {
        options.set_query("limit", ctx.param_or::<u64>("limit", 10));
        Ok(options)
    }

    fn sample_connector() -> Connector {
        let mut catalog = OperationCatalog::new();
        catalog.insert(Operation {
            resource: "invoice".to_string(),
            value: "get".to_string(),
            name: "Get".to_string(),
            description: "Get an invoice".to_string(),
            action: "Get an invoice".to_string(),
            routing: Routing {
                request: RequestTemplate {
                    method: HttpMethod::Get,
                    url: "/v1/invoices/{{$parameter.invoiceId}}".to_string(),
                    body: None,
                },
                send: SendOptions {
                    paginate: false,
                    pre_send: vec![add_page_limit],
                },
                output: OutputOptions {
                    post_receive: vec![PostReceiveStep::RootProperty("_embedded.invoices".to_string())],
                },
            },
        });

        Connector {
            descriptor: NodeDescriptor {
                name: "sample".to_string(),
                display_name: "Sample".to_string(),
                description: "sample node".to_string(),
                version: 1,
                request_defaults: RequestDefaults {
                    base_url: "https://api.example.com".to_string(),
                    headers: HashMap::from([("Accept".to_string(), "application/json".to_string())]),
                },
                credentials: vec![CredentialRef {
                    name: "sampleApi".to_string(),
                    required: true,
                    display_rules: None,
                }],
                properties: vec![
                    NodeProperty::new("resource", "Resource", PropertyKind::Options).default_value("invoice"),
                    NodeProperty::new("operation", "Operation", PropertyKind::Options).default_value("get"),
                    NodeProperty::new("invoiceId", "Invoice", PropertyKind::String).required(),
                    NodeProperty::new("limit", "Limit", PropertyKind::Number),
                ],
            },
            catalog,
            credentials: vec![CredentialSchema {
                name: "sampleApi".to_string(),
                display_name: "Sample API".to_string(),
                extends: None,
                documentation_url: None,
                properties: vec![],
                authenticate: Some(crate::model::Authenticate::bearer("{{$credentials.apiKey}}")),
                test: Some(CredentialTestRequest {
                    base_url: "https://api.example.com".to_string(),
                    url: "/v1/ping".to_string(),
                    method: HttpMethod::Get,
                }),
            }],
        }
    }

    fn executor_with(transport: StubTransport) -> Executor<StubTransport> {
        Executor::new(sample_connector(), Config::default(), transport)
    }

    fn credentials() -> Vars {
        Vars::new().with("apiKey", "key_123")
    }

    #[test]
    fn test_build_request_renders_url_and_runs_hooks() {
        let executor = executor_with(StubTransport::new(200, json!({})));
        let values = Vars::new().with("invoiceId", "inv_42").with("limit", 25);

        let options = executor.build_request(&values, &credentials()).unwrap();
        assert_eq!(options.method, HttpMethod::Get);
        assert_eq!(options.url, "/v1/invoices/inv_42");
        assert_eq!(options.qs.get("limit"), Some(&json!(25)));
    }

    #[test]
    fn test_build_request_missing_required_value() {
        let executor = executor_with(StubTransport::new(200, json!({})));

        let err = executor.build_request(&Vars::new(), &credentials()).unwrap_err();
        assert!(matches!(err, MollieflowError::Validation(_)));
    }

    #[test]
    fn test_build_request_unknown_operation() {
        let executor = executor_with(StubTransport::new(200, json!({})));
        let values = Vars::new().with("operation", "burn").with("invoiceId", "inv_42");

        let err = executor.build_request(&values, &credentials()).unwrap_err();
        assert!(matches!(err, MollieflowError::Descriptor(_)));
    }

    #[tokio::test]
    async fn test_execute_dispatches_and_extracts_items() {
        let transport = StubTransport::new(200, json!({"_embedded": {"invoices": [{"id": "inv_1"}, {"id": "inv_2"}]}}));
        let executor = executor_with(transport.clone());
        let values = Vars::new().with("invoiceId", "inv_42");

        let items = executor.execute(&values, &credentials()).await.unwrap();
        assert_eq!(items, vec![json!({"id": "inv_1"}), json!({"id": "inv_2"})]);

        let request = transport.last_request();
        assert_eq!(request.url, "https://api.mollie.com/v1/invoices/inv_42");
        assert_eq!(request.headers.get("Authorization"), Some(&"Bearer key_123".to_string()));
        assert_eq!(request.headers.get("Accept"), Some(&"application/json".to_string()));
    }

    #[tokio::test]
    async fn test_execute_surfaces_api_rejection() {
        let transport = StubTransport::new(422, json!({"status": 422, "title": "Unprocessable Entity", "detail": "Invalid amount"}));
        let executor = executor_with(transport);
        let values = Vars::new().with("invoiceId", "inv_42");

        let err = executor.execute(&values, &credentials()).await.unwrap_err();
        assert_eq!(
            err,
            MollieflowError::Response {
                status: 422,
                message: "Invalid amount".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_execute_missing_credential_field() {
        let executor = executor_with(StubTransport::new(200, json!({})));
        let values = Vars::new().with("invoiceId", "inv_42");

        let err = executor.execute(&values, &Vars::new()).await.unwrap_err();
        assert!(matches!(err, MollieflowError::Credential(_)));
    }

    #[tokio::test]
    async fn test_verify_credential_success() {
        let transport = StubTransport::new(200, json!({"count": 12}));
        let executor = executor_with(transport.clone());

        executor.verify_credential("sampleApi", &credentials()).await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.url, "https://api.example.com/v1/ping");
        assert_eq!(request.headers.get("Authorization"), Some(&"Bearer key_123".to_string()));
    }

    #[tokio::test]
    async fn test_verify_credential_rejected() {
        let executor = executor_with(StubTransport::new(401, json!({"title": "Unauthorized Request"})));

        let err = executor.verify_credential("sampleApi", &credentials()).await.unwrap_err();
        assert!(matches!(err, MollieflowError::Credential(_)));
        assert!(err.to_string().contains("Unauthorized Request"));
    }

    #[tokio::test]
    async fn test_verify_credential_transport_failure() {
        let executor = Executor::new(sample_connector(), Config::default(), FailingTransport);

        let err = executor.verify_credential("sampleApi", &credentials()).await.unwrap_err();
        assert!(matches!(err, MollieflowError::Credential(_)));
    }

    #[test]
    fn test_extract_root_missing_key_is_empty() {
        let items = extract_root(json!({"count": 0}), "_embedded.payments");
        assert!(items.is_empty());
    }

    #[test]
    fn test_extract_root_spreads_array() {
        let items = extract_root(json!({"_embedded": {"payments": [1, 2, 3]}}), "_embedded.payments");
        assert_eq!(items, vec![json!(1), json!(2), json!(3)]);
    }
}
