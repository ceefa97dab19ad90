use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

const CREATED: u16 = 201;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Publish,
    Draft,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PublishedPost {
    pub link: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BlogPublishError {
    #[error("blog endpoint rejected post with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("blog request failed: {0}")]
    Transport(String),
    #[error("blog runtime unavailable: {0}")]
    Runtime(String),
}

pub trait BlogGateway: Debug {
    fn publish(&self, title: &str, html_content: &str) -> Result<PublishedPost, BlogPublishError>;
}

#[derive(Clone)]
pub struct WordPressSettings {
    pub endpoint: String,
    pub username: String,
    pub application_password: String,
    pub status: PostStatus,
}

#[derive(Debug, Serialize)]
struct PostPayload<'a> {
    title: &'a str,
    content: &'a str,
    status: PostStatus,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    #[serde(default)]
    link: Option<String>,
}

/// WordPress REST client authenticating with an application password.
pub struct WordPressClient {
    http: reqwest::Client,
    settings: WordPressSettings,
    runtime: Runtime,
}

impl WordPressClient {
    pub fn new(settings: WordPressSettings) -> Result<Self, BlogPublishError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| BlogPublishError::Runtime(err.to_string()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            settings,
            runtime,
        })
    }
}

impl Debug for WordPressClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordPressClient")
            .field("endpoint", &self.settings.endpoint)
            .field("status", &self.settings.status)
            .finish_non_exhaustive()
    }
}

impl BlogGateway for WordPressClient {
    fn publish(&self, title: &str, html_content: &str) -> Result<PublishedPost, BlogPublishError> {
        let payload = PostPayload {
            title,
            content: html_content,
            status: self.settings.status,
        };

        let (status, body) = self
            .runtime
            .block_on(async {
                let response = self
                    .http
                    .post(&self.settings.endpoint)
                    .basic_auth(
                        &self.settings.username,
                        Some(&self.settings.application_password),
                    )
                    .json(&payload)
                    .send()
                    .await?;
                let status = response.status().as_u16();
                let body = response.text().await?;
                Ok::<_, reqwest::Error>((status, body))
            })
            .map_err(|err| BlogPublishError::Transport(err.to_string()))?;

        interpret_response(status, body)
    }
}

/// Only `201 Created` counts as success; every other status is surfaced with
/// the response body.
pub(crate) fn interpret_response(
    status: u16,
    body: String,
) -> Result<PublishedPost, BlogPublishError> {
    if status != CREATED {
        return Err(BlogPublishError::Rejected { status, body });
    }

    let link = serde_json::from_str::<CreatedPost>(&body)
        .ok()
        .and_then(|post| post.link);
    Ok(PublishedPost { link })
}
