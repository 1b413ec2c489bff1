//! Validate delimited eLTER data files against remote JSON Schemas.
//!
//! Fetches a topic-specific schema and a shared-definitions schema from a
//! schema store, links them in an in-memory registry so `$ref`s resolve
//! between them, and validates every row of a delimited file (draft 2020-12),
//! reporting each violation as `{line, path, message}`.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod runner;
pub mod schema;
