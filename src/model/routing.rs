use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    MollieflowError, Result,
    runtime::{ExecutionContext, RequestOptions},
};

/// HTTP verbs used by operation routing records.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Writes carry request flags in the body, reads in the query string.
    pub fn is_write(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

/// Request-shaping hook, run in declaration order before dispatch.
pub type PreSendHook = fn(&ExecutionContext, RequestOptions) -> Result<RequestOptions>;

/// Infallible per-item mapper applied after root-property extraction.
pub type ItemMapper = fn(Value) -> Value;

/// One post-receive step of an operation's output pipeline.
#[derive(Debug, Clone)]
pub enum PostReceiveStep {
    /// Extract the array at a dotted path of the response body; an absent
    /// key yields an empty sequence, not an error.
    RootProperty(String),
    /// Map every emitted item.
    ForEach(ItemMapper),
}

/// Method + URL template + optional JSON body template. Query strings are
/// shaped exclusively by pre-send hooks.
#[derive(Debug, Clone, Default)]
pub struct RequestTemplate {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// hint for hosts that implement cursor pagination; the connector
    /// itself never paginates
    pub paginate: bool,
    pub pre_send: Vec<PreSendHook>,
}

#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub post_receive: Vec<PostReceiveStep>,
}

/// Routing record of one operation: how to build the request and how to
/// shape the response. Static data, defined at connector construction.
#[derive(Debug, Clone, Default)]
pub struct Routing {
    pub request: RequestTemplate,
    pub send: SendOptions,
    pub output: OutputOptions,
}

/// One (resource, operation) entry with its display metadata and routing.
#[derive(Debug, Clone)]
pub struct Operation {
    /// owning resource wire value
    pub resource: String,
    /// operation wire value
    pub value: String,
    /// display label
    pub name: String,
    pub description: String,
    /// short action phrase for host activity logs
    pub action: String,
    pub routing: Routing,
}

/// Lookup table over every operation the connector ships.
#[derive(Debug, Clone, Default)]
pub struct OperationCatalog {
    operations: HashMap<(String, String), Operation>,
}

impl OperationCatalog {
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    pub fn insert(
        &mut self,
        operation: Operation,
    ) {
        self.operations.insert((operation.resource.clone(), operation.value.clone()), operation);
    }

    pub fn resolve(
        &self,
        resource: &str,
        operation: &str,
    ) -> Result<&Operation> {
        self.operations
            .get(&(resource.to_string(), operation.to_string()))
            .ok_or_else(|| MollieflowError::Descriptor(format!("unknown operation '{}' for resource '{}'", operation, resource)))
    }

    /// Operations of one resource in stable wire-value order, for hosts
    /// building an operation dropdown.
    pub fn for_resource(
        &self,
        resource: &str,
    ) -> Vec<&Operation> {
        let mut operations: Vec<&Operation> = self.operations.values().filter(|op| op.resource == resource).collect();
        operations.sort_by(|a, b| a.value.cmp(&b.value));
        operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
