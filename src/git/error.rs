use thiserror::Error;

/// Errors a hosting backend can surface through the repository model.
///
/// Every variant maps to a condition the orchestrator treats as fatal for the
/// current run; none of them are retried here.
#[derive(Debug, Error)]
pub enum GitError {
    /// Transient network or API failure, or the repository does not exist.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The branch disappeared between resolution and use.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// A ref with the requested name already exists. Pre-existing-branch
    /// handling is out of scope, so callers treat this as fatal.
    #[error("branch already exists: {0}")]
    BranchAlreadyExists(String),

    /// The path resolves to a directory, submodule or symlink.
    #[error("{0} is not a file (directory, submodule or symlink)")]
    NotAFile(String),

    /// The blob exceeds the backend's inline-retrieval threshold.
    #[error("{path} is larger than {limit} bytes, inline retrieval is unsupported")]
    FileTooLarge { path: String, limit: u64 },

    /// The path does not exist at the resolving commit.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// The concurrency token captured at read time no longer matches the
    /// stored blob; someone else wrote the file first.
    #[error("{0} was modified concurrently, re-run to pick up the new content")]
    ConcurrentModification(String),

    /// The forge refused to open the pull request (permissions, identical
    /// branches, ...). The working branch and commit already exist.
    #[error("pull request rejected: {0}")]
    PullRequestRejected(String),
}

impl From<reqwest::Error> for GitError {
    fn from(err: reqwest::Error) -> Self {
        GitError::BackendUnavailable(err.to_string())
    }
}
