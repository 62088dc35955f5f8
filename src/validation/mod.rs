pub mod forbidden;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ValidationConfig;
use crate::pr::{ChangedFile, CommitState};

/// Result of validating a pull request's file list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn state(self) -> CommitState {
        match self {
            Outcome::Pass => CommitState::Success,
            Outcome::Fail => CommitState::Failure,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Outcome::Pass => "PR validation passed.",
            Outcome::Fail => "PR validation failed.",
        }
    }
}

/// A rule violation reported against a specific file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: &'static str,
    pub filename: String,
    pub message: String,
}

/// A single validation rule. Rules are pure: they only look at the
/// file list they are given.
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, files: &[ChangedFile]) -> Vec<Violation>;
}

/// Runs every rule over a PR's files. Any violation fails the PR; otherwise
/// the configured default outcome applies.
pub struct Validator {
    rules: Vec<Box<dyn Rule>>,
    default_outcome: Outcome,
}

impl Validator {
    pub fn new(rules: Vec<Box<dyn Rule>>, default_outcome: Outcome) -> Self {
        Self {
            rules,
            default_outcome,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        let forbidden = forbidden::ForbiddenFileRule::new(config.forbidden_files.clone());
        Self::new(vec![Box::new(forbidden)], config.default_outcome)
    }

    pub fn validate(&self, files: &[ChangedFile]) -> Outcome {
        let violations: Vec<Violation> = self
            .rules
            .iter()
            .flat_map(|rule| rule.check(files))
            .collect();

        for v in &violations {
            warn!(rule = v.rule, file = %v.filename, "{}", v.message);
        }

        if violations.is_empty() {
            debug!(rules = self.rules.len(), outcome = ?self.default_outcome, "no violations");
            self.default_outcome
        } else {
            Outcome::Fail
        }
    }
}
