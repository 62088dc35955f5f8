pub mod event;
pub mod types;

pub use event::PullRequestEvent;
pub use types::{ChangedFile, CommitState, CommitStatus, PrRef};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::GitHubConfig;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const CLIENT_USER_AGENT: &str = "commit-validator";

#[derive(Debug, Error)]
pub enum PrError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("GitHub API error ({status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("GitHub token not configured")]
    MissingToken,
}

/// Pull request operations against the hosting platform.
/// `GitHubClient` is the production implementation.
#[async_trait]
pub trait PullRequestApi: Send + Sync {
    /// List the files changed in a PR. Only the first page is returned.
    async fn list_files(&self, pr: &PrRef) -> Result<Vec<ChangedFile>, PrError>;

    /// SHA of the PR's head commit.
    async fn head_sha(&self, pr: &PrRef) -> Result<String, PrError>;

    async fn create_status(
        &self,
        pr: &PrRef,
        sha: &str,
        status: &CommitStatus,
    ) -> Result<(), PrError>;

    async fn close_pull_request(&self, pr: &PrRef) -> Result<(), PrError>;
}

/// Attach a commit status to the head commit of a PR.
pub async fn update_status(
    api: &dyn PullRequestApi,
    pr: &PrRef,
    status: &CommitStatus,
) -> Result<(), PrError> {
    let sha = api.head_sha(pr).await?;
    debug!(%pr, sha = %sha, "resolved head commit");
    api.create_status(pr, &sha, status).await?;
    info!(%pr, state = %status.state, description = %status.description, "status updated");
    Ok(())
}

/// GitHub REST API client. Token and base URL are fixed at construction.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self, PrError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(CLIENT_USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn pull_url(&self, pr: &PrRef) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_url, pr.owner, pr.repo, pr.number
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(ACCEPT, GITHUB_ACCEPT);
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("token {}", token)),
            None => builder,
        }
    }

    fn require_token(&self) -> Result<(), PrError> {
        match self.token {
            Some(_) => Ok(()),
            None => Err(PrError::MissingToken),
        }
    }
}

/// Pass the response through when it has the expected status, otherwise
/// turn it into an error carrying the response body.
async fn expect_status(response: Response, expected: StatusCode) -> Result<Response, PrError> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
    Err(PrError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl PullRequestApi for GitHubClient {
    #[instrument(skip(self), fields(%pr))]
    async fn list_files(&self, pr: &PrRef) -> Result<Vec<ChangedFile>, PrError> {
        let url = format!("{}/files", self.pull_url(pr));
        debug!(authenticated = self.token.is_some(), "fetching PR files");
        let response = self.request(Method::GET, &url).send().await?;
        let files = expect_status(response, StatusCode::OK)
            .await?
            .json::<Vec<ChangedFile>>()
            .await?;
        debug!(files = files.len(), "received PR files");
        Ok(files)
    }

    #[instrument(skip(self), fields(%pr))]
    async fn head_sha(&self, pr: &PrRef) -> Result<String, PrError> {
        self.require_token()?;

        #[derive(serde::Deserialize)]
        struct Head {
            sha: String,
        }

        #[derive(serde::Deserialize)]
        struct PullResponse {
            head: Head,
        }

        let response = self.request(Method::GET, &self.pull_url(pr)).send().await?;
        let pull = expect_status(response, StatusCode::OK)
            .await?
            .json::<PullResponse>()
            .await?;
        Ok(pull.head.sha)
    }

    #[instrument(skip(self, status), fields(%pr, state = %status.state))]
    async fn create_status(
        &self,
        pr: &PrRef,
        sha: &str,
        status: &CommitStatus,
    ) -> Result<(), PrError> {
        self.require_token()?;
        let url = format!(
            "{}/repos/{}/{}/statuses/{}",
            self.api_url, pr.owner, pr.repo, sha
        );
        let response = self
            .request(Method::POST, &url)
            .json(status)
            .send()
            .await?;
        expect_status(response, StatusCode::CREATED).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(%pr))]
    async fn close_pull_request(&self, pr: &PrRef) -> Result<(), PrError> {
        self.require_token()?;
        let response = self
            .request(Method::PATCH, &self.pull_url(pr))
            .json(&serde_json::json!({ "state": "closed" }))
            .send()
            .await?;
        expect_status(response, StatusCode::OK).await?;
        info!("pull request closed");
        Ok(())
    }
}
