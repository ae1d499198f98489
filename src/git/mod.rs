//! Hosted-repository access layer
//!
//! The bump workflow only ever talks to a forge through the capability traits
//! in [`repository`]: resolve the default branch, read a file at a commit,
//! create a branch, write a file, open a pull request. [`github`] implements
//! those capabilities against the GitHub REST API; other backends (GitLab,
//! Bitbucket, raw git) would slot in beside it.
//!
//! # Modules
//!
//! - [`repository`]: the provider-agnostic model (`Commit`, `Branch`,
//!   `GitFile`, `Repository`, `Provider`)
//! - [`github`]: GitHub REST adapter
//! - [`error`]: error taxonomy shared by all backends

pub mod error;
pub mod github;
pub mod repository;
