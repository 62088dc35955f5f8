pub mod types;

pub use types::Report;

use crate::pr::{ChangedFile, PrRef};
use crate::validation::Outcome;

/// Build a Report for a PR that went through validation.
pub fn build(pr: &PrRef, outcome: Outcome, files: Vec<ChangedFile>) -> Report {
    Report {
        pr_number: pr.number,
        state: outcome.state(),
        files,
    }
}

/// Plain-text body sent back to the webhook caller. Every variant is
/// delivered with `200 OK`.
#[derive(Debug, Clone)]
pub enum Reply {
    Unparseable,
    Ignored { action: String },
    NoPrNumber,
    NoRepository,
    FetchFailed,
    Complete(Report),
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Unparseable => write!(f, "Webhook received, but could not parse PR event"),
            Reply::Ignored { action } => write!(f, "Ignoring PR event with action: {}", action),
            Reply::NoPrNumber => write!(f, "No PR number found"),
            Reply::NoRepository => write!(f, "No repository found"),
            Reply::FetchFailed => write!(f, "Error fetching PR files"),
            Reply::Complete(report) => write!(f, "{}", report),
        }
    }
}
