use axum::body::Bytes;
use axum::extract::{Form, FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::types::PrRef;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Could not parse form body: {0}")]
    Form(String),

    #[error("Form body has no payload field")]
    MissingPayload,

    #[error("Could not read request body: {0}")]
    Body(String),

    #[error("Could not parse PR event: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pull request webhook event, reduced to the fields the validator needs.
/// Every field is optional on the wire and defaults to empty/zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PullRequestEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub action: String,
    /// Top-level PR number, used when `pull_request.number` is absent
    #[serde(deserialize_with = "null_as_default")]
    pub number: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub pull_request: PullRequestInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub repository: Repository,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PullRequestInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub number: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Repository {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: Owner,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Owner {
    #[serde(deserialize_with = "null_as_default")]
    pub login: String,
}

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl PullRequestEvent {
    pub fn parse(payload: &[u8]) -> Result<Self, EventError> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// PR number from `pull_request.number`, falling back to the top-level
    /// `number`. Zero means "not present".
    pub fn pr_number(&self) -> Option<u64> {
        [self.pull_request.number, self.number]
            .into_iter()
            .find(|n| *n != 0)
    }

    /// Resolve the event to PR coordinates; None when the number or the
    /// repository is missing.
    pub fn pr_ref(&self) -> Option<PrRef> {
        let number = self.pr_number()?;
        if self.repository.owner.login.is_empty() || self.repository.name.is_empty() {
            return None;
        }
        Some(PrRef {
            owner: self.repository.owner.login.clone(),
            repo: self.repository.name.clone(),
            number,
        })
    }
}

#[derive(Debug, Deserialize)]
struct FormBody {
    payload: Option<String>,
}

/// Extract the raw JSON payload from a webhook request.
///
/// GitHub sends either `application/x-www-form-urlencoded` with the JSON in a
/// `payload` field, or the JSON document as the body. Any content type other
/// than form-encoded is treated as raw JSON.
pub async fn extract_payload(req: Request) -> Result<Bytes, EventError> {
    if is_form_encoded(&req) {
        let Form(form) = Form::<FormBody>::from_request(req, &())
            .await
            .map_err(|rejection| EventError::Form(rejection.body_text()))?;
        let payload = form.payload.ok_or(EventError::MissingPayload)?;
        Ok(Bytes::from(payload))
    } else {
        Bytes::from_request(req, &())
            .await
            .map_err(|rejection| EventError::Body(rejection.body_text()))
    }
}

fn is_form_encoded(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}
