//! Automates a single dependency-version bump on a hosted repository: read
//! package.json from the default branch's tip, rewrite one dependency's
//! constraint, commit on a new branch and open a pull request.

pub mod bump;
pub mod config;
pub mod git;
pub mod version;
