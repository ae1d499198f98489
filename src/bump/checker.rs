//! The version bump algorithm

use semver::Version;
use serde_json::Value;
use tracing::info;

use crate::bump::error::BumpError;
use crate::git::repository::{PullRequestArgs, Repository, UpdateArgs};
use crate::version::range::VersionRange;

/// The manifest lives at the repository root.
pub const MANIFEST_PATH: &str = "package.json";

/// Fixed name of the per-run working branch. Concurrent runs against the same
/// repository race on it; the second one fails with `BranchAlreadyExists`.
pub const WORKING_BRANCH: &str = "feat/bump-dependency";

/// Bump `package_name` to `target_version` in the repository's manifest and
/// open a pull request proposing the change.
///
/// The steps are strictly sequential: the default branch's tip is the fixed
/// baseline for the whole run, the manifest is read at that commit, mutated in
/// memory, committed on a new branch created from the same commit, and the
/// pull request targets the default branch. Any failure aborts the remaining
/// steps; no created branch is rolled back afterwards.
pub async fn bump_dependency(
    repo: &dyn Repository,
    package_name: &str,
    target_version: &Version,
) -> Result<(), BumpError> {
    let default_branch = repo.default_branch().await?;
    let baseline = default_branch.last_commit().await?;
    info!(
        "resolved baseline commit {} on {}",
        baseline.hash,
        default_branch.name()
    );

    let manifest_file = repo.file_at(&baseline, MANIFEST_PATH).await?;
    let text = std::str::from_utf8(manifest_file.content())
        .map_err(|e| BumpError::ManifestParse(e.to_string()))?;
    let mut manifest: Value =
        serde_json::from_str(text).map_err(|e| BumpError::ManifestParse(e.to_string()))?;

    let dependencies = manifest
        .get_mut("dependencies")
        .ok_or(BumpError::InvalidManifestShape)?
        .as_object_mut()
        .ok_or(BumpError::InvalidManifestShape)?;

    let constraint = dependencies
        .get(package_name)
        .ok_or_else(|| BumpError::DependencyNotPresent {
            package: package_name.to_string(),
        })?
        .as_str()
        .ok_or(BumpError::InvalidManifestShape)?;

    // If the constraint already requires a newer version there is nothing to
    // bump. Constraints without a resolvable minimum (git URLs, tags) pass
    // through and get rewritten like any other.
    if let Some(minimum) = VersionRange::parse(constraint).and_then(|r| r.min_version()) {
        if minimum > *target_version {
            return Err(BumpError::AlreadySatisfied {
                package: package_name.to_string(),
                minimum,
                target: target_version.clone(),
            });
        }
    }

    dependencies.insert(
        package_name.to_string(),
        Value::String(target_version.to_string()),
    );

    let working_branch = repo.create_branch(&baseline, WORKING_BRANCH).await?;

    let content = serde_json::to_string_pretty(&manifest)
        .map_err(|e| BumpError::ManifestParse(e.to_string()))?;
    manifest_file
        .update(UpdateArgs {
            target_branch: working_branch.as_ref(),
            content: content.into_bytes(),
            message: format!("chore(deps): bump {package_name} to {target_version}"),
        })
        .await?;

    repo.create_pull_request(
        default_branch.as_ref(),
        working_branch.as_ref(),
        PullRequestArgs {
            title: format!("bump {package_name}"),
        },
    )
    .await?;

    info!(
        "opened pull request bumping {} to {}",
        package_name, target_version
    );
    Ok(())
}
