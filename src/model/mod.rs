mod credential;
mod node;
mod property;
mod routing;

pub use credential::{Authenticate, CredentialSchema, CredentialTestRequest};
pub use node::{Connector, CredentialRef, NodeDescriptor, RequestDefaults};
pub use property::{DisplayRules, FieldName, NodeProperty, PropertyGroup, PropertyKind, PropertyOption, TypeOptions};
pub use routing::{HttpMethod, ItemMapper, Operation, OperationCatalog, OutputOptions, PostReceiveStep, PreSendHook, RequestTemplate, Routing, SendOptions};
