//! HTTP Request domain types

mod body;
mod header;
mod method;
mod prepared;
mod spec;

pub use body::{JSON_CONTENT_TYPE, RequestBody};
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use prepared::PreparedRequest;
pub use spec::RequestSpec;
