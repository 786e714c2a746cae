//! The Mollie connector content: node descriptor, credential schemas,
//! routing catalog, shaping hooks and dynamic option loaders. Everything
//! here is declarative data plus plain functions; the generic runtime in
//! [`crate::runtime`] interprets it.

mod credentials;
mod hooks;
mod loaders;
mod node;
mod operations;
pub mod options;

pub use credentials::{AUTHORIZE_URL, BASE_SCOPE, TOKEN_URL, api_key_schema, assemble_scope, authorize_url, oauth2_schema};
pub use loaders::{LoadOptions, load_options, loader_for};
pub use node::{connector, node_descriptor};
pub use operations::catalog;
