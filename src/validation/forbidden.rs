use super::{Rule, Violation};
use crate::pr::ChangedFile;

/// Flags files whose path exactly matches a forbidden name.
///
/// Matching is on the full path GitHub reports, so `docs/forbidden.txt`
/// does not match `forbidden.txt`.
pub struct ForbiddenFileRule {
    names: Vec<String>,
}

impl ForbiddenFileRule {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
}

impl Rule for ForbiddenFileRule {
    fn name(&self) -> &'static str {
        "forbidden-file"
    }

    fn check(&self, files: &[ChangedFile]) -> Vec<Violation> {
        files
            .iter()
            .filter(|f| self.names.iter().any(|name| *name == f.filename))
            .map(|f| Violation {
                rule: self.name(),
                filename: f.filename.clone(),
                message: format!("forbidden file {} changed", f.filename),
            })
            .collect()
    }
}
