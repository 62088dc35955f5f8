use crate::pr::{ChangedFile, CommitState};

/// Summary of one processed pull request, rendered as the webhook response.
#[derive(Debug, Clone)]
pub struct Report {
    /// PR number
    pub pr_number: u64,
    /// Commit state reported for the head commit
    pub state: CommitState,
    /// Files changed in the PR, in API order
    pub files: Vec<ChangedFile>,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "PR #{} validation complete. Status: {}",
            self.pr_number, self.state
        )?;
        writeln!(f, "Files changed in PR:")?;
        for file in &self.files {
            writeln!(
                f,
                "- {} (additions: {}, deletions: {}, changes: {})",
                file.filename, file.additions, file.deletions, file.changes
            )?;
        }
        Ok(())
    }
}
