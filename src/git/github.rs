//! GitHub REST backend for the repository model

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::BackendConfig;
use crate::git::error::GitError;
use crate::git::repository::{
    Branch, Commit, GitFile, Provider, PullRequestArgs, Repository, UpdateArgs,
};

/// GitHub serves file content inline only up to this size; larger blobs come
/// back with `"encoding": "none"`.
pub const MAX_INLINE_FILE_SIZE: u64 = 1024 * 1024;

/// Shared API handle: one HTTP client plus connection settings.
struct GithubApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GithubApi {
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::GET, path)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::POST, path)
    }

    fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::PUT, path)
    }
}

/// Owner/name pair identifying a repository.
#[derive(Debug, Clone)]
struct RepoId {
    owner: String,
    name: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// [`Provider`] implementation for the GitHub REST API.
pub struct GithubProvider {
    api: Arc<GithubApi>,
}

impl GithubProvider {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            api: Arc::new(GithubApi {
                client: reqwest::Client::builder()
                    .user_agent("bump-pr")
                    .build()
                    .expect("Failed to create HTTP client"),
                base_url: config.base_url,
                token: config.token,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    default_branch: String,
}

#[async_trait::async_trait]
impl Provider for GithubProvider {
    async fn repository(&self, owner: &str, name: &str) -> Result<Box<dyn Repository>, GitError> {
        let id = RepoId {
            owner: owner.to_string(),
            name: name.to_string(),
        };

        let response = self.api.get(&format!("/repos/{id}")).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("repository lookup for {} returned {}", id, status);
            return Err(GitError::BackendUnavailable(format!(
                "{id}: repository lookup returned {status}"
            )));
        }

        let repo: RepoResponse = response
            .json()
            .await
            .map_err(|e| GitError::BackendUnavailable(format!("unexpected repository payload: {e}")))?;

        Ok(Box::new(GithubRepository {
            api: self.api.clone(),
            id,
            default_branch: repo.default_branch,
        }))
    }
}

pub struct GithubRepository {
    api: Arc<GithubApi>,
    id: RepoId,
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
}

#[derive(Serialize)]
struct CreateRefPayload<'a> {
    #[serde(rename = "ref")]
    git_ref: String,
    sha: &'a str,
}

#[derive(Serialize)]
struct CreatePullPayload<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
}

/// One entry from the contents API. Directories come back as a JSON array
/// instead, so the caller checks for that before deserializing.
#[derive(Debug, Deserialize)]
struct ContentEntry {
    #[serde(rename = "type")]
    kind: String,
    sha: String,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[async_trait::async_trait]
impl Repository for GithubRepository {
    async fn default_branch(&self) -> Result<Box<dyn Branch>, GitError> {
        Ok(Box::new(GithubBranch {
            api: self.api.clone(),
            id: self.id.clone(),
            name: self.default_branch.clone(),
        }))
    }

    async fn create_branch(&self, from: &Commit, name: &str) -> Result<Box<dyn Branch>, GitError> {
        let response = self
            .api
            .post(&format!("/repos/{}/git/refs", self.id))
            .json(&CreateRefPayload {
                git_ref: format!("refs/heads/{name}"),
                sha: &from.hash,
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(GitError::BranchAlreadyExists(name.to_string()));
        }
        if !status.is_success() {
            warn!("ref creation for {} returned {}", name, status);
            return Err(GitError::BackendUnavailable(format!(
                "ref creation returned {status}"
            )));
        }

        info!("created branch {} at {}", name, from.hash);
        Ok(Box::new(GithubBranch {
            api: self.api.clone(),
            id: self.id.clone(),
            name: name.to_string(),
        }))
    }

    async fn file_at(&self, commit: &Commit, path: &str) -> Result<Box<dyn GitFile>, GitError> {
        let response = self
            .api
            .get(&format!("/repos/{}/contents/{}", self.id, path))
            .query(&[("ref", commit.hash.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GitError::FileNotFound(path.to_string()));
        }
        if !status.is_success() {
            warn!("contents lookup for {} returned {}", path, status);
            return Err(GitError::BackendUnavailable(format!(
                "contents lookup returned {status}"
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GitError::BackendUnavailable(format!("unexpected contents payload: {e}")))?;

        // The contents API answers with an array when the path is a directory
        if payload.is_array() {
            return Err(GitError::NotAFile(path.to_string()));
        }

        let entry: ContentEntry = serde_json::from_value(payload)
            .map_err(|e| GitError::BackendUnavailable(format!("unexpected contents payload: {e}")))?;

        if entry.kind != "file" {
            return Err(GitError::NotAFile(path.to_string()));
        }

        // Oversized blobs are flagged before any content is decoded
        if entry.encoding.as_deref() == Some("none") {
            return Err(GitError::FileTooLarge {
                path: path.to_string(),
                limit: MAX_INLINE_FILE_SIZE,
            });
        }

        let encoded = entry.content.ok_or_else(|| {
            GitError::BackendUnavailable(format!("contents payload for {path} has no content"))
        })?;
        let content = decode_content(&encoded).map_err(|e| {
            GitError::BackendUnavailable(format!("invalid base64 content for {path}: {e}"))
        })?;

        Ok(Box::new(GithubGitFile {
            api: self.api.clone(),
            id: self.id.clone(),
            path: path.to_string(),
            content,
            sha: entry.sha,
        }))
    }

    async fn create_pull_request(
        &self,
        into: &dyn Branch,
        from: &dyn Branch,
        args: PullRequestArgs,
    ) -> Result<(), GitError> {
        let response = self
            .api
            .post(&format!("/repos/{}/pulls", self.id))
            .json(&CreatePullPayload {
                title: &args.title,
                head: from.name(),
                base: into.name(),
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(GitError::PullRequestRejected(format!(
                "{} -> {} returned {status}",
                from.name(),
                into.name()
            )));
        }
        if !status.is_success() {
            warn!("pull request creation returned {}", status);
            return Err(GitError::BackendUnavailable(format!(
                "pull request creation returned {status}"
            )));
        }

        info!("opened pull request from {} into {}", from.name(), into.name());
        Ok(())
    }
}

pub struct GithubBranch {
    api: Arc<GithubApi>,
    id: RepoId,
    name: String,
}

#[async_trait::async_trait]
impl Branch for GithubBranch {
    fn name(&self) -> &str {
        &self.name
    }

    async fn last_commit(&self) -> Result<Commit, GitError> {
        let response = self
            .api
            .get(&format!("/repos/{}/commits", self.id))
            .query(&[("sha", self.name.as_str()), ("per_page", "1")])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GitError::BranchNotFound(self.name.clone()));
        }
        if !status.is_success() {
            warn!("commit listing for {} returned {}", self.name, status);
            return Err(GitError::BackendUnavailable(format!(
                "commit listing returned {status}"
            )));
        }

        let commits: Vec<CommitResponse> = response
            .json()
            .await
            .map_err(|e| GitError::BackendUnavailable(format!("unexpected commits payload: {e}")))?;

        let tip = commits
            .into_iter()
            .next()
            .ok_or_else(|| GitError::BranchNotFound(self.name.clone()))?;

        Ok(Commit::new(tip.sha))
    }
}

pub struct GithubGitFile {
    api: Arc<GithubApi>,
    id: RepoId,
    path: String,
    content: Vec<u8>,
    // Blob sha captured at read time, GitHub's optimistic-concurrency token
    sha: String,
}

#[derive(Serialize)]
struct UpdateFilePayload<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Debug, Deserialize)]
struct UpdateFileResponse {
    commit: CommitResponse,
}

#[async_trait::async_trait]
impl GitFile for GithubGitFile {
    fn content(&self) -> &[u8] {
        &self.content
    }

    async fn update(&self, args: UpdateArgs<'_>) -> Result<Commit, GitError> {
        let response = self
            .api
            .put(&format!("/repos/{}/contents/{}", self.id, self.path))
            .json(&UpdateFilePayload {
                message: &args.message,
                content: BASE64_STANDARD.encode(&args.content),
                sha: &self.sha,
                branch: args.target_branch.name(),
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(GitError::ConcurrentModification(self.path.clone()));
        }
        if !status.is_success() {
            warn!("file update for {} returned {}", self.path, status);
            return Err(GitError::BackendUnavailable(format!(
                "file update returned {status}"
            )));
        }

        let updated: UpdateFileResponse = response
            .json()
            .await
            .map_err(|e| GitError::BackendUnavailable(format!("unexpected update payload: {e}")))?;

        info!(
            "updated {} on {} at {}",
            self.path,
            args.target_branch.name(),
            updated.commit.sha
        );
        Ok(Commit::new(updated.commit.sha))
    }
}

/// Decode contents-API base64, which GitHub wraps with newlines.
fn decode_content(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let stripped: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64_STANDARD.decode(stripped)
}
