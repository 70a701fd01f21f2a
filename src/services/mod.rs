//! Service layer for the rewrite pipeline.
//!
//! Services hold the network-bound stages and emit events for progress
//! tracking, so the CLI and tests can drive them the same way.

pub mod rewrite;

pub use rewrite::{fetch_page_meta, RewriteEvent, RewriteService};
