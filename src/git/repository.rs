//! Provider-agnostic model of a hosted git repository
//!
//! These traits are the full capability set the bump workflow requires from a
//! forge. Backends implement them; the orchestrator consumes them as trait
//! objects and never sees adapter-specific types.

use crate::git::error::GitError;

/// An immutable snapshot of the repository tree, identified by its hash.
///
/// The hash is the sole identity used for optimistic concurrency: branches are
/// created from it and files are resolved against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
}

impl Commit {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }
}

/// Arguments for writing new content to a file.
///
/// The write targets `target_branch`; the concurrency token proving the read's
/// freshness travels inside the [`GitFile`] handle, not here.
pub struct UpdateArgs<'a> {
    pub target_branch: &'a dyn Branch,
    pub content: Vec<u8>,
    pub message: String,
}

/// Arguments for opening a pull request.
pub struct PullRequestArgs {
    pub title: String,
}

/// A named, mutable pointer to a [`Commit`].
#[async_trait::async_trait]
pub trait Branch: Send + Sync {
    fn name(&self) -> &str;

    /// Resolve the current tip of this branch.
    async fn last_commit(&self) -> Result<Commit, GitError>;
}

/// A versioned blob resolved against a specific commit.
///
/// The handle captures the backend's concurrency token at read time, so it is
/// only valid for the commit it was resolved against.
#[async_trait::async_trait]
pub trait GitFile: Send + Sync {
    /// Raw blob content as read at the resolving commit.
    fn content(&self) -> &[u8];

    /// Write new content to this file's path on the target branch, returning
    /// the resulting commit. Fails with [`GitError::ConcurrentModification`]
    /// when the captured token is stale.
    async fn update(&self, args: UpdateArgs<'_>) -> Result<Commit, GitError>;
}

/// The aggregate root: a single hosted repository.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    /// The repository's primary integration branch.
    async fn default_branch(&self) -> Result<Box<dyn Branch>, GitError>;

    /// Create a new ref named `name` pointing at `from`. Fails with
    /// [`GitError::BranchAlreadyExists`] when the name is taken.
    async fn create_branch(&self, from: &Commit, name: &str) -> Result<Box<dyn Branch>, GitError>;

    /// Resolve the blob at `path` as of `commit`.
    async fn file_at(&self, commit: &Commit, path: &str) -> Result<Box<dyn GitFile>, GitError>;

    /// Open a proposal to merge `from` into `into`.
    async fn create_pull_request(
        &self,
        into: &dyn Branch,
        from: &dyn Branch,
        args: PullRequestArgs,
    ) -> Result<(), GitError>;
}

/// Entry point into a hosting backend.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Resolve a repository by its owner/name pair.
    async fn repository(&self, owner: &str, name: &str) -> Result<Box<dyn Repository>, GitError>;
}
