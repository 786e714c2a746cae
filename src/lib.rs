//! # Mollieflow
//!
//! Mollieflow is a declarative connector for the Mollie payment API,
//! written in Rust. A static descriptor defines form fields, credential
//! schemas and per-operation request routing; a small runtime resolves
//! templates, validates values and dispatches requests over a pluggable
//! transport.
//!
//! ## Core Pieces
//!
//! - **Descriptor**: resources, operations and form fields as data, with
//!   visibility rules gating what a host renders
//! - **Routing**: URL and body templates (`{{$parameter.*}}`) plus
//!   pre-send hooks for everything a template cannot express
//! - **Executor**: resolves defaults, validates against a generated JSON
//!   Schema, renders the request and shapes the response items
//! - **Loaders**: dynamic dropdown options fetched from the live API,
//!   degrading to labelled placeholders instead of failing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mollieflow::{Config, Executor, HttpTransport, Vars, mollie};
//!
//! let config = Config::default();
//! let transport = HttpTransport::create(&config)?;
//! let executor = Executor::new(mollie::connector(), config, transport);
//!
//! let values = Vars::new()
//!     .with("resource", "payment")
//!     .with("operation", "get")
//!     .with("paymentId", "tr_WDqYK6vllg");
//! let credentials = Vars::new().with("apiKey", "test_dHar4XY7LxsDOtmnkVtjNVWXLSlXsM");
//!
//! let items = executor.execute(&values, &credentials).await?;
//! ```

mod common;
mod config;
mod error;
mod model;
pub mod mollie;
mod runtime;

pub use common::Vars;
pub use config::Config;
pub use error::MollieflowError;
pub use model::*;
pub use runtime::{ExecutionContext, Executor, HttpResponse, HttpTransport, PreparedRequest, RequestOptions, Transport};

/// Result type alias for Mollieflow operations.
pub type Result<T> = std::result::Result<T, MollieflowError>;
