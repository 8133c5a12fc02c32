//! Cross-cutting utilities shared by ASIREX services: health endpoints,
//! tracing setup, request-id middleware, serde helpers, and the
//! gateway-injected identity extractor.

pub mod health;
pub mod identity;
pub mod middleware;
pub mod serde;
pub mod tracing;
