//! Core domain logic for the Juniper academy front-desk ledger.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod format;
pub mod logging;
pub mod model;
pub mod projection;
pub mod repo;
pub mod search;
pub mod store;
pub mod summary;

pub use config::{ConfigError, CoreConfig, GeminiConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::day::{default_manager_for, weekday_label, DayPayload};
pub use model::entry::{
    Consultation, EntryValidationError, Expense, FirstLesson, FirstLessonFlag, NoticeText,
    Payment, PaymentFlag, PaymentMethod, Reservation, ShoppingItem,
};
pub use model::record::{new_entry_id, Dated, EntryId, Identified, TemporalRecord};
pub use model::state::{LedgerState, TemporalEntry};
pub use projection::day::{build_day_report, project, project_latest, DayReport, DayTotals};
pub use repo::state_repo::{
    MemoryStateRepository, RepoError, RepoResult, SqliteStateRepository, StateRepository,
    STATE_DOCUMENT_KEY,
};
pub use search::history::{suggest_payment_history, PaymentSuggestion, SearchQuery};
pub use store::ledger_store::{LedgerStore, NoticeSlot};
pub use store::{StoreError, StoreResult};
pub use summary::gemini::GeminiClient;
pub use summary::{summarize_day, SummaryError, SummaryGate, SummaryGenerator, SummaryOutcome};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
