//! Dependency bump orchestration
//!
//! [`checker::bump_dependency`] drives one read-transform-write-publish run
//! against the repository model: resolve the default branch's tip, read the
//! manifest there, rewrite one dependency's constraint, commit the result on a
//! fresh branch and open a pull request. Everything provider-specific stays
//! behind the [`crate::git::repository`] traits.

pub mod checker;
pub mod error;
