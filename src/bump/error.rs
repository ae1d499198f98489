use semver::Version;
use thiserror::Error;

use crate::git::error::GitError;

/// Errors a bump run can end with.
///
/// [`DependencyNotPresent`](BumpError::DependencyNotPresent) and
/// [`AlreadySatisfied`](BumpError::AlreadySatisfied) are no-op conditions: the
/// requested bump does not apply to the repository's current state. Both occur
/// before any write, so nothing needs to be undone.
#[derive(Debug, Error)]
pub enum BumpError {
    /// The manifest is not valid UTF-8 JSON.
    #[error("unable to parse package.json: {0}")]
    ManifestParse(String),

    /// The manifest has no `dependencies` object mapping names to constraint
    /// strings.
    #[error("dependencies should be an object mapping package names to version ranges")]
    InvalidManifestShape,

    /// The repository does not depend on the requested package.
    #[error("repository is not dependant on {package}")]
    DependencyNotPresent { package: String },

    /// The current constraint already requires a version newer than the
    /// target; bumping downward is never performed.
    #[error("{package} already requires {minimum}, newer than {target}")]
    AlreadySatisfied {
        package: String,
        minimum: Version,
        target: Version,
    },

    /// A backend operation failed.
    #[error(transparent)]
    Git(#[from] GitError),
}
