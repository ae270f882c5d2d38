//! ISSM intent gateway.
//!
//! A thin HTTP front end that wraps tenant-scoped intents in an identified
//! envelope, publishes them to a per-tenant Kafka topic, and proxies
//! read-only workflow status from an Argo server.

pub mod argo;
pub mod bus;
pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod routes;
