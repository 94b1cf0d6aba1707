//! HTTP transport layer
//!
//! Route handlers for the gist, domain, hosted-site and like endpoints.

pub mod handlers;
