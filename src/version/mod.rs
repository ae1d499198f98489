//! Version range evaluation for manifest constraints
//!
//! The bump workflow needs three capabilities: parse a constraint string into
//! a range, resolve the minimum version satisfying that range, and compare two
//! resolved versions. Comparison and canonical rendering come straight from
//! [`semver::Version`]; the npm range grammar lives in [`range`].

pub mod range;
