//! Version comparison
//!
//! Versions are dotted numeric strings with an optional pre-release suffix
//! and optional build metadata, e.g. `1.2`, `v1.14.0`, `1.1.1-dev`,
//! `2.0.0-rc.1+build5`. Both operands are parsed on every call; nothing
//! parsed is kept between calls.
//!
//! Ordering rules:
//! - numeric segments compare numerically, missing trailing segments are zero
//!   (`1.2 == 1.2.0`, `1.2.3 < 1.2.10`)
//! - a pre-release ranks below the same version without one
//!   (`1.1.1-dev < 1.1.1`)
//! - pre-release identifiers compare numerically when both are numeric,
//!   lexically otherwise, numeric before alphanumeric
//! - build metadata is ignored

use std::cmp::Ordering;

/// Outcome of comparing two version strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Left is older than right
    Smaller,
    /// Both describe the same version
    Equal,
    /// Left is newer than right
    Greater,
    /// At least one operand could not be parsed
    Error,
}

#[cfg(test)]
impl Comparison {
    /// The comparison seen from the other operand
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Comparison::Smaller => Comparison::Greater,
            Comparison::Greater => Comparison::Smaller,
            other => other,
        }
    }
}

impl From<Ordering> for Comparison {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Comparison::Smaller,
            Ordering::Equal => Comparison::Equal,
            Ordering::Greater => Comparison::Greater,
        }
    }
}

/// Compare `left` against `right`.
///
/// Returns [`Comparison::Error`] if either side fails to parse. Callers must
/// not take a destructive decision (skip an install, replace a binary) on an
/// `Error` result.
#[must_use]
pub fn compare(left: &str, right: &str) -> Comparison {
    match (Version::parse(left), Version::parse(right)) {
        (Some(l), Some(r)) => l.cmp(&r).into(),
        _ => Comparison::Error,
    }
}

/// Whether `installed` satisfies a minimum `required` version.
///
/// `None` when either side cannot be parsed.
#[must_use]
pub fn satisfies_minimum(installed: &str, required: &str) -> Option<bool> {
    match compare(installed, required) {
        Comparison::Smaller => Some(false),
        Comparison::Equal | Comparison::Greater => Some(true),
        Comparison::Error => None,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Identifier<'a> {
    Numeric(u64),
    Alpha(&'a str),
}

impl Ord for Identifier<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::Numeric(_), Identifier::Alpha(_)) => Ordering::Less,
            (Identifier::Alpha(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::Alpha(a), Identifier::Alpha(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Identifier<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct Version<'a> {
    segments: Vec<u64>,
    pre: Vec<Identifier<'a>>,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '~'
}

fn parse_identifiers(input: &str) -> Option<Vec<Identifier<'_>>> {
    input
        .split('.')
        .map(|part| {
            if part.is_empty() || !part.chars().all(is_ident_char) {
                return None;
            }
            if part.chars().all(|c| c.is_ascii_digit()) {
                part.parse().ok().map(Identifier::Numeric)
            } else {
                Some(Identifier::Alpha(part))
            }
        })
        .collect()
}

impl<'a> Version<'a> {
    fn parse(input: &'a str) -> Option<Self> {
        let input = input.trim();
        let input = input.strip_prefix('v').unwrap_or(input);

        let core_end = input
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(input.len());
        let (core, rest) = input.split_at(core_end);

        let segments = core
            .split('.')
            .map(|s| if s.is_empty() { None } else { s.parse().ok() })
            .collect::<Option<Vec<u64>>>()?;

        let (pre_part, metadata) = match rest.split_once('+') {
            Some((pre, meta)) => (pre, Some(meta)),
            None => (rest, None),
        };

        if let Some(meta) = metadata {
            parse_identifiers(meta)?;
        }

        let pre_part = pre_part.strip_prefix('-').unwrap_or(pre_part);
        let pre = if pre_part.is_empty() {
            if rest.starts_with('-') {
                return None;
            }
            Vec::new()
        } else {
            parse_identifiers(pre_part)?
        };

        Some(Version { segments, pre })
    }
}

impl Ord for Version<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        match (self.pre.is_empty(), other.pre.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.pre.cmp(&other.pre),
        }
    }
}

impl PartialEq for Version<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version<'_> {}

impl PartialOrd for Version<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_examples() {
        assert_eq!(compare("0.9.9", "1.0.0"), Comparison::Smaller);
        assert_eq!(compare("1.1.0", "1.1.1-dev"), Comparison::Smaller);
        assert_eq!(compare("abc", "0.9.0"), Comparison::Error);
        assert_eq!(compare("0.9.0", "abc"), Comparison::Error);
    }

    #[test]
    fn test_numeric_segments_are_not_lexical() {
        assert_eq!(compare("1.2.3", "1.2.10"), Comparison::Smaller);
        assert_eq!(compare("1.10.0", "1.9.9"), Comparison::Greater);
    }

    #[test]
    fn test_missing_segments_are_zero() {
        assert_eq!(compare("1.2", "1.2.0"), Comparison::Equal);
        assert_eq!(compare("1", "1.0.1"), Comparison::Smaller);
    }

    #[test]
    fn test_leading_v_and_whitespace() {
        assert_eq!(compare("v1.4.0", "1.4.0"), Comparison::Equal);
        assert_eq!(compare(" 1.4.0\n", "1.4.0"), Comparison::Equal);
    }

    #[test]
    fn test_pre_release_ranks_lower() {
        assert_eq!(compare("1.1.1-dev", "1.1.1"), Comparison::Smaller);
        assert_eq!(compare("2.0.0-rc.1", "2.0.0-rc.2"), Comparison::Smaller);
        assert_eq!(compare("2.0.0-rc.2", "2.0.0-rc.10"), Comparison::Smaller);
        assert_eq!(compare("2.0.0-1", "2.0.0-alpha"), Comparison::Smaller);
        assert_eq!(compare("2.0.0-alpha", "2.0.0-alpha.1"), Comparison::Smaller);
        assert_eq!(compare("1.0rc1", "1.0"), Comparison::Smaller);
    }

    #[test]
    fn test_build_metadata_ignored() {
        assert_eq!(compare("1.0.0+build.5", "1.0.0"), Comparison::Equal);
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "v", "1..2", "1.2.", ".1", "1.2-", "1.2+", "1.2 beta", "latest"] {
            assert_eq!(compare(bad, "1.0.0"), Comparison::Error, "{bad:?}");
        }
    }

    #[test]
    fn test_total_order_and_antisymmetry() {
        let versions = [
            "0.1", "0.9.9", "1.0.0-alpha", "1.0.0-alpha.1", "1.0.0-beta", "1.0.0", "1.0.1",
            "1.1.1-dev", "1.1.1", "1.2", "1.10.0", "2.0.0-rc.1", "2.0.0",
        ];
        for (i, a) in versions.iter().enumerate() {
            for (j, b) in versions.iter().enumerate() {
                let forward = compare(a, b);
                assert_ne!(forward, Comparison::Error);
                assert_eq!(forward, compare(b, a).inverse(), "{a} vs {b}");
                let expected: Comparison = i.cmp(&j).into();
                assert_eq!(forward, expected, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_satisfies_minimum() {
        assert_eq!(satisfies_minimum("1.15.0", "1.14.0"), Some(true));
        assert_eq!(satisfies_minimum("1.14.0", "1.14.0"), Some(true));
        assert_eq!(satisfies_minimum("1.13.0", "1.14.0"), Some(false));
        assert_eq!(satisfies_minimum("devel", "1.14.0"), None);
    }
}
