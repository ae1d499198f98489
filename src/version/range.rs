//! npm-style version range grammar
//!
//! Supports the range syntax found in package.json dependency values:
//! - `1.2.3` - exact match (partial versions like `1.2` are padded with zeros)
//! - `^1.2.3` - compatible with version (>=1.2.3 <2.0.0)
//! - `~1.2.3` - approximately equivalent (>=1.2.3 <1.3.0)
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3` - comparison operators
//! - `1.x`, `1.2.x`, `*` - wildcards
//! - `1.0.0 - 2.0.0` - hyphen ranges (inclusive on both ends)
//! - `>=1.0.0 <2.0.0` - space-separated AND
//! - `^1.0.0 || ^2.0.0` - OR alternatives
//!
//! Pre-release versions are always included in matching, so `^1.0.0-rc.1`
//! admits `1.0.0-rc.2` and a plain `>=1.2.3` admits `1.3.0-beta.1`.

use semver::{BuildMetadata, Prerelease, Version};

/// A parsed npm version range expression.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionRange {
    /// Exact version match
    Exact(Version),
    /// Caret range: ^1.2.3 means >=1.2.3 <2.0.0 (special cases for 0.x)
    Caret(Version),
    /// Tilde range: ~1.2.3 means >=1.2.3 <1.3.0
    Tilde(Version),
    /// Greater than or equal
    Gte(Version),
    /// Greater than
    Gt(Version),
    /// Less than or equal
    Lte(Version),
    /// Less than
    Lt(Version),
    /// Any version: * matches everything
    Any,
    /// Wildcard major: 1.x means >=1.0.0 <2.0.0
    WildcardMajor(u64),
    /// Wildcard minor: 1.2.x means >=1.2.0 <1.3.0
    WildcardMinor(u64, u64),
    /// Hyphen range: 1.0.0 - 2.0.0 means >=1.0.0 <=2.0.0
    Hyphen { from: Version, to: Version },
    /// Space-separated ranges, all must be satisfied
    And(Vec<VersionRange>),
    /// ||-separated alternatives, any may be satisfied
    Or(Vec<VersionRange>),
}

impl VersionRange {
    /// Parse a constraint string into a range.
    ///
    /// Returns `None` for strings that do not form a recognizable range
    /// (empty strings, git URLs, `workspace:` protocols and the like).
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return None;
        }

        // || has the lowest precedence
        if spec.contains("||") {
            let branches: Option<Vec<VersionRange>> =
                spec.split("||").map(Self::parse_intersection).collect();
            return branches.map(VersionRange::Or);
        }

        Self::parse_intersection(spec)
    }

    /// Parse a spec that may be a hyphen range, a space-separated AND, or a
    /// single primitive range.
    fn parse_intersection(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return None;
        }

        // Hyphen ranges contain spaces of their own, so they go first
        if let Some(range) = Self::parse_hyphen(spec) {
            return Some(range);
        }

        let parts: Vec<&str> = spec.split_whitespace().collect();
        match parts.len() {
            0 => None,
            1 => Self::parse_primitive(parts[0]),
            _ => parts
                .into_iter()
                .map(Self::parse_primitive)
                .collect::<Option<Vec<VersionRange>>>()
                .map(VersionRange::And),
        }
    }

    /// Parse a hyphen range like "1.0.0 - 2.0.0".
    fn parse_hyphen(spec: &str) -> Option<Self> {
        let (left, right) = spec.split_once(" - ")?;
        let from = parse_version(left.trim())?;
        let to = parse_version(right.trim())?;
        Some(VersionRange::Hyphen { from, to })
    }

    /// Parse a single range without AND/OR/hyphen composition.
    fn parse_primitive(spec: &str) -> Option<Self> {
        let spec = spec.trim();

        if let Some(rest) = spec.strip_prefix(">=") {
            parse_version(rest.trim()).map(VersionRange::Gte)
        } else if let Some(rest) = spec.strip_prefix('>') {
            parse_version(rest.trim()).map(VersionRange::Gt)
        } else if let Some(rest) = spec.strip_prefix("<=") {
            parse_version(rest.trim()).map(VersionRange::Lte)
        } else if let Some(rest) = spec.strip_prefix('<') {
            parse_version(rest.trim()).map(VersionRange::Lt)
        } else if let Some(rest) = spec.strip_prefix('^') {
            parse_version(rest.trim()).map(VersionRange::Caret)
        } else if let Some(rest) = spec.strip_prefix('~') {
            parse_version(rest.trim()).map(VersionRange::Tilde)
        } else if spec == "*" {
            Some(VersionRange::Any)
        } else if let Some(range) = Self::parse_wildcard(spec) {
            Some(range)
        } else {
            parse_version(spec).map(VersionRange::Exact)
        }
    }

    /// Parse wildcard forms: 1.x, 1.X, 1.*, 1.2.x and friends.
    fn parse_wildcard(spec: &str) -> Option<Self> {
        let is_wild = |s: &str| matches!(s, "x" | "X" | "*");
        let parts: Vec<&str> = spec.split('.').collect();

        match parts.as_slice() {
            [major, rest] if is_wild(rest) => {
                major.parse().ok().map(VersionRange::WildcardMajor)
            }
            [major, minor, rest] if is_wild(rest) => {
                let major = major.parse().ok()?;
                let minor = minor.parse().ok()?;
                Some(VersionRange::WildcardMinor(major, minor))
            }
            _ => None,
        }
    }

    /// Resolve the minimum version that satisfies this range, or `None` when
    /// the range is unsatisfiable.
    pub fn min_version(&self) -> Option<Version> {
        match self {
            VersionRange::Or(branches) => {
                branches.iter().filter_map(VersionRange::min_version).min()
            }
            _ => {
                let candidate = self.min_candidate()?;
                self.satisfies(&candidate).then_some(candidate)
            }
        }
    }

    /// The lower bound of this range, before checking it against upper bounds.
    fn min_candidate(&self) -> Option<Version> {
        match self {
            VersionRange::Exact(v)
            | VersionRange::Caret(v)
            | VersionRange::Tilde(v)
            | VersionRange::Gte(v) => Some(v.clone()),
            VersionRange::Gt(v) => Some(just_above(v)),
            VersionRange::Lte(_) | VersionRange::Lt(_) | VersionRange::Any => {
                Some(Version::new(0, 0, 0))
            }
            VersionRange::WildcardMajor(major) => Some(Version::new(*major, 0, 0)),
            VersionRange::WildcardMinor(major, minor) => Some(Version::new(*major, *minor, 0)),
            VersionRange::Hyphen { from, .. } => Some(from.clone()),
            // For AND, the largest lower bound wins; min_version verifies it
            // against every part afterwards
            VersionRange::And(parts) => parts.iter().filter_map(Self::min_candidate).max(),
            VersionRange::Or(_) => self.min_version(),
        }
    }

    /// Check whether a version satisfies this range, pre-releases included.
    pub fn satisfies(&self, version: &Version) -> bool {
        match self {
            VersionRange::Exact(v) => version == v,
            VersionRange::Caret(base) => *version >= *base && *version < caret_upper(base),
            VersionRange::Tilde(base) => *version >= *base && *version < tilde_upper(base),
            VersionRange::Gte(v) => *version >= *v,
            VersionRange::Gt(v) => *version > *v,
            VersionRange::Lte(v) => *version <= *v,
            VersionRange::Lt(v) => *version < *v,
            VersionRange::Any => true,
            VersionRange::WildcardMajor(major) => {
                *version >= Version::new(*major, 0, 0)
                    && *version < exclusive_upper(*major + 1, 0, 0)
            }
            VersionRange::WildcardMinor(major, minor) => {
                *version >= Version::new(*major, *minor, 0)
                    && *version < exclusive_upper(*major, *minor + 1, 0)
            }
            VersionRange::Hyphen { from, to } => *version >= *from && *version <= *to,
            VersionRange::And(parts) => parts.iter().all(|p| p.satisfies(version)),
            VersionRange::Or(branches) => branches.iter().any(|b| b.satisfies(version)),
        }
    }
}

/// Parse a version string into a [`Version`], normalizing partial versions.
///
/// Partial versions like "1" or "1.2" are padded with zeros:
/// - "1" -> 1.0.0
/// - "1.2" -> 1.2.0
/// - "1.2.3" -> 1.2.3
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim().strip_prefix('v').unwrap_or(version.trim());
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// The exclusive upper bound for a caret range.
fn caret_upper(base: &Version) -> Version {
    if base.major > 0 {
        exclusive_upper(base.major + 1, 0, 0)
    } else if base.minor > 0 {
        exclusive_upper(0, base.minor + 1, 0)
    } else {
        exclusive_upper(0, 0, base.patch + 1)
    }
}

/// The exclusive upper bound for a tilde range.
fn tilde_upper(base: &Version) -> Version {
    exclusive_upper(base.major, base.minor + 1, 0)
}

/// A version with a `-0` pre-release tag, the floor of its release number.
///
/// Used as an exclusive upper bound so that `^1.0.0` keeps out `2.0.0-alpha`
/// even though pre-releases participate in matching.
fn exclusive_upper(major: u64, minor: u64, patch: u64) -> Version {
    Version {
        major,
        minor,
        patch,
        pre: Prerelease::new("0").expect("0 is a valid pre-release identifier"),
        build: BuildMetadata::EMPTY,
    }
}

/// The smallest version strictly greater than `v`, pre-releases included.
fn just_above(v: &Version) -> Version {
    if v.pre.is_empty() {
        exclusive_upper(v.major, v.minor, v.patch + 1)
    } else {
        Version {
            major: v.major,
            minor: v.minor,
            patch: v.patch,
            pre: Prerelease::new(&format!("{}.0", v.pre))
                .expect("appending .0 keeps the pre-release valid"),
            build: BuildMetadata::EMPTY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn version(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[rstest]
    #[case("1.2.3", Some("1.2.3"))]
    #[case("^1.2.3", Some("1.2.3"))]
    #[case("~1.2.3", Some("1.2.3"))]
    #[case(">=1.2.3", Some("1.2.3"))]
    #[case(">1.2.3", Some("1.2.4-0"))]
    #[case("<2.0.0", Some("0.0.0"))]
    #[case("<=2.0.0", Some("0.0.0"))]
    #[case("*", Some("0.0.0"))]
    #[case("1.x", Some("1.0.0"))]
    #[case("1.2.x", Some("1.2.0"))]
    #[case("1.0.0 - 2.0.0", Some("1.0.0"))]
    #[case(">=1.2.3 <2.0.0", Some("1.2.3"))]
    #[case(">1.2.3 <1.2.5", Some("1.2.4-0"))]
    #[case(">=2.0.0 <1.0.0", None)] // unsatisfiable
    #[case("^1.0.0 || ^2.0.0", Some("1.0.0"))]
    #[case("^2.0.0 || ^1.0.0", Some("1.0.0"))]
    #[case("^1.0.0-rc.1", Some("1.0.0-rc.1"))]
    #[case("1.2", Some("1.2.0"))]
    #[case("1", Some("1.0.0"))]
    fn min_version_of_range(#[case] spec: &str, #[case] expected: Option<&str>) {
        let range = VersionRange::parse(spec).unwrap();
        assert_eq!(range.min_version(), expected.map(version));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-version")]
    #[case("git+https://github.com/user/repo.git")]
    #[case("workspace:*")]
    fn unparseable_specs_return_none(#[case] spec: &str) {
        assert_eq!(VersionRange::parse(spec), None);
    }

    #[rstest]
    #[case("^1.2.3", "1.2.3", true)]
    #[case("^1.2.3", "1.9.0", true)]
    #[case("^1.2.3", "2.0.0", false)]
    #[case("^0.2.3", "0.2.9", true)]
    #[case("^0.2.3", "0.3.0", false)]
    #[case("^0.0.3", "0.0.4", false)]
    #[case("~1.2.3", "1.2.9", true)]
    #[case("~1.2.3", "1.3.0", false)]
    #[case(">=1.2.3", "1.3.0-beta.1", true)] // pre-releases included
    #[case("1.x", "1.9.9", true)]
    #[case("1.x", "2.0.0", false)]
    #[case("1.2.x", "1.2.7", true)]
    #[case("1.2.x", "1.3.0", false)]
    #[case("1.0.0 - 2.0.0", "2.0.0", true)]
    #[case("1.0.0 - 2.0.0", "2.0.1", false)]
    #[case(">=1.0.0 <2.0.0", "1.5.0", true)]
    #[case(">=1.0.0 <2.0.0", "2.0.0", false)]
    #[case("^1.0.0 || ^3.0.0", "3.1.0", true)]
    #[case("^1.0.0 || ^3.0.0", "2.0.0", false)]
    #[case("*", "0.0.1-alpha", true)]
    fn range_satisfaction(#[case] spec: &str, #[case] candidate: &str, #[case] expected: bool) {
        let range = VersionRange::parse(spec).unwrap();
        assert_eq!(range.satisfies(&version(candidate)), expected, "{spec} vs {candidate}");
    }

    #[test]
    fn caret_excludes_next_major_pre_release() {
        let range = VersionRange::parse("^1.2.3").unwrap();
        assert!(!range.satisfies(&version("2.0.0-alpha")));
    }

    #[rstest]
    #[case("1", "1.0.0")]
    #[case("1.2", "1.2.0")]
    #[case("1.2.3", "1.2.3")]
    #[case("v1.2.3", "1.2.3")]
    #[case("1.2.3-rc.1", "1.2.3-rc.1")]
    fn parse_version_pads_partial_versions(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_version(input), Some(version(expected)));
    }

    #[test]
    fn parse_version_rejects_garbage() {
        assert_eq!(parse_version("one.two.three"), None);
    }
}
