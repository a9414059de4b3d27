//! HTTP middleware components
//!
//! Cross-cutting concerns applied to every request: request-id correlation
//! and security headers. Validation is handled at the edge by `ApiError`'s
//! `From<ApplicationError>` conversion, since the two real validation cases
//! (blank `name`, blank `body`) are domain-level, not request-shape-level.

pub mod request_id;
pub mod security_headers;

pub use request_id::{RequestId, RequestIdLayer};
pub use security_headers::SecurityHeadersLayer;
