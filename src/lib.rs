//! metarewrite - Search Console keyword triage and SEO rewrite assistant.
//!
//! Reads a search analytics export, classifies each keyword by how much it
//! matters to its page, picks an action for the keywords worth working on,
//! and generates new titles and meta descriptions for the affected pages.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod export;
pub mod input;
pub mod llm;
pub mod models;
pub mod scrapers;
pub mod services;
