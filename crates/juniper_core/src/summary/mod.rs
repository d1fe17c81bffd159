//! AI day-summary boundary.
//!
//! # Responsibility
//! - Turn a [`DayReport`] into a prompt and hand it to a text generator.
//! - Collapse every failure into a fixed human-readable message.
//! - Refuse overlapping requests while one is outstanding.
//!
//! # Invariants
//! - Nothing in this module mutates ledger state.
//! - Generator errors never propagate past [`summarize_day`].

use crate::projection::day::DayReport;
use log::{error, info};
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub mod gemini;
pub mod prompt;

pub use prompt::build_summary_prompt;

/// Shown when the generator answered with no text.
pub const EMPTY_SUMMARY_MESSAGE: &str = "요약을 생성할 수 없습니다.";
/// Shown when the generator call failed.
pub const SUMMARY_FAILURE_MESSAGE: &str = "AI 분석 중 오류가 발생했습니다.";

/// Failure talking to a text generator.
#[derive(Debug)]
pub enum SummaryError {
    /// No API key configured.
    MissingApiKey,
    /// Request could not be sent or the response not read.
    Transport(reqwest::Error),
    /// Service answered with a non-success status.
    Status { code: u16, body: String },
    /// Response body did not have the expected shape.
    InvalidResponse(String),
}

impl Display for SummaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "summary API key is not configured"),
            Self::Transport(err) => write!(f, "summary request failed: {err}"),
            Self::Status { code, body } => {
                write!(f, "summary service returned status {code}: {body}")
            }
            Self::InvalidResponse(message) => write!(f, "invalid summary response: {message}"),
        }
    }
}

impl Error for SummaryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SummaryError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Request/response text generation service.
pub trait SummaryGenerator {
    fn generate(&self, prompt: &str) -> Result<String, SummaryError>;
}

impl<G: SummaryGenerator + ?Sized> SummaryGenerator for &G {
    fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        (**self).generate(prompt)
    }
}

/// Produces the synopsis for `report`, or one of the fixed fallback
/// messages.
pub fn summarize_day<G: SummaryGenerator + ?Sized>(generator: &G, report: &DayReport) -> String {
    let started_at = Instant::now();
    let prompt = build_summary_prompt(report);

    match generator.generate(&prompt) {
        Ok(text) if !text.trim().is_empty() => {
            info!(
                "event=summary_generate module=summary status=ok date={} duration_ms={}",
                report.date,
                started_at.elapsed().as_millis()
            );
            text.trim().to_string()
        }
        Ok(_) => {
            info!(
                "event=summary_generate module=summary status=empty date={}",
                report.date
            );
            EMPTY_SUMMARY_MESSAGE.to_string()
        }
        Err(err) => {
            error!(
                "event=summary_generate module=summary status=error date={} duration_ms={} error={err}",
                report.date,
                started_at.elapsed().as_millis()
            );
            SUMMARY_FAILURE_MESSAGE.to_string()
        }
    }
}

/// Result of asking a [`SummaryGate`] for a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Completed(String),
    /// Another request was still outstanding; nothing was sent.
    Busy,
}

/// Busy flag allowing one outstanding summary request at a time.
#[derive(Debug, Default)]
pub struct SummaryGate {
    busy: Cell<bool>,
}

impl SummaryGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Runs [`summarize_day`] unless a request is already in flight.
    pub fn run<G: SummaryGenerator + ?Sized>(
        &self,
        generator: &G,
        report: &DayReport,
    ) -> SummaryOutcome {
        if self.busy.replace(true) {
            info!("event=summary_generate module=summary status=busy");
            return SummaryOutcome::Busy;
        }
        let _release = BusyRelease(&self.busy);
        SummaryOutcome::Completed(summarize_day(generator, report))
    }
}

struct BusyRelease<'a>(&'a Cell<bool>);

impl Drop for BusyRelease<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
