//! Data models for keyword triage and page rewrites.

mod keyword;
mod page;

pub use keyword::{ActionCode, KeywordImportance, KeywordRecord, RawRecord};
pub use page::{PageMeta, PageSummary, SuggestionRow};
