//! Data models: invoice record, schema contract and configuration.

pub mod config;
pub mod invoice;
pub mod schema;
