//! Library side of the `sante` command-line tool.
//!
//! - [`config`]: `sante.toml` loading and the default source list
//! - [`logging`]: tracing subscriber setup
//! - [`pipeline`]: ingest, clean, aggregate, merge and store stages
//! - [`types`]: per-source, per-disease and per-run outcomes

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
