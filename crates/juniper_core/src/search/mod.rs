//! Cross-date history search.
//!
//! # Responsibility
//! - Match free-text queries against every recorded entry, not just the
//!   viewed date.
//! - Annotate hits with the date they were recorded on.

pub mod history;
