use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::pr::{self, CommitStatus, PullRequestApi, PullRequestEvent};
use crate::report::{self, Reply};
use crate::validation::{Outcome, Validator};

/// Per-request pipeline: filter the event, fetch files, validate, report the
/// commit status, and close the PR when validation fails.
pub struct Processor {
    api: Arc<dyn PullRequestApi>,
    validator: Validator,
    accepted_actions: Vec<String>,
    status_context: String,
    close_on_failure: bool,
}

impl Processor {
    pub fn new(api: Arc<dyn PullRequestApi>, config: &Config) -> Self {
        Self {
            api,
            validator: Validator::from_config(&config.validation),
            accepted_actions: config.webhook.accepted_actions.clone(),
            status_context: config.validation.status_context.clone(),
            close_on_failure: config.validation.close_on_failure,
        }
    }

    /// Outbound failures are logged and never abort the reply: a failed
    /// status update still proceeds to the close step and the summary.
    #[instrument(skip_all, fields(action = %event.action))]
    pub async fn handle(&self, event: PullRequestEvent) -> Reply {
        if !self.accepted_actions.iter().any(|a| *a == event.action) {
            info!("ignoring PR event");
            return Reply::Ignored {
                action: event.action,
            };
        }

        let Some(number) = event.pr_number() else {
            warn!("no PR number found in event");
            return Reply::NoPrNumber;
        };
        let Some(pr) = event.pr_ref() else {
            warn!(pr = number, "no repository found in event");
            return Reply::NoRepository;
        };
        info!(owner = %pr.owner, repo = %pr.repo, pr = pr.number, "validating pull request");

        let files = match self.api.list_files(&pr).await {
            Ok(files) => files,
            Err(e) => {
                error!(%pr, error = %e, "error fetching PR files");
                return Reply::FetchFailed;
            }
        };
        for f in &files {
            info!(
                file = %f.filename,
                additions = f.additions,
                deletions = f.deletions,
                changes = f.changes,
                "changed file"
            );
        }

        let outcome = self.validator.validate(&files);
        let status = CommitStatus {
            state: outcome.state(),
            description: outcome.description().to_string(),
            context: self.status_context.clone(),
        };
        if let Err(e) = pr::update_status(self.api.as_ref(), &pr, &status).await {
            error!(%pr, error = %e, "error updating PR status");
        }

        if outcome == Outcome::Fail && self.close_on_failure {
            match self.api.close_pull_request(&pr).await {
                Ok(()) => info!(%pr, "PR closed due to failed validation"),
                Err(e) => error!(%pr, error = %e, "error closing PR"),
            }
        }

        Reply::Complete(report::build(&pr, outcome, files))
    }
}
