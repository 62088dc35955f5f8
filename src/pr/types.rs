use serde::{Deserialize, Serialize};

/// A file changed in a pull request, as returned by the
/// `GET /repos/{owner}/{repo}/pulls/{number}/files` endpoint.
/// Missing fields default; `patch` is absent for binary files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(dead_code)] // Mirrors the API record; only some fields are used by rules today
pub struct ChangedFile {
    /// File path (e.g., "src/auth/config.rs")
    pub filename: String,
    /// Lines added in this file
    pub additions: u64,
    /// Lines deleted in this file
    pub deletions: u64,
    /// Total changed lines
    pub changes: u64,
    /// added, removed, modified, renamed, ...
    pub status: String,
    pub raw_url: String,
    pub blob_url: String,
    pub patch: Option<String>,
}

/// Coordinates of a pull request on GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl std::fmt::Display for PrRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// GitHub commit status state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitState {
    Failure,
    Success,
}

impl std::fmt::Display for CommitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitState::Failure => write!(f, "failure"),
            CommitState::Success => write!(f, "success"),
        }
    }
}

/// Body of `POST /repos/{owner}/{repo}/statuses/{sha}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStatus {
    pub state: CommitState,
    pub description: String,
    pub context: String,
}
