mod context;
mod executor;
mod http;
mod request;
pub mod template;

pub use context::ExecutionContext;
pub use executor::Executor;
pub(crate) use executor::extract_root;
pub use http::{HttpResponse, HttpTransport, PreparedRequest, Transport};
pub use request::RequestOptions;
