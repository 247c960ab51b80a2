use semver::Version;

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles partial versions like "1" or "1.2" by padding with zeros and
/// tolerates a leading `v`.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
/// - "v1.2.3" -> Version(1, 2, 3)
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.strip_prefix('v').unwrap_or(version);
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Returns true when `a` has lower precedence than `b`.
///
/// Versions that fail to parse are never considered lower, so a malformed
/// value never displaces a well-formed one.
pub fn is_version_lower(a: &str, b: &str) -> bool {
    match (parse_version(a), parse_version(b)) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    }
}

/// Smallest version outside `^version`, `None` when a component overflows
///
/// - ^1.2.3 -> 2.0.0
/// - ^0.2.3 -> 0.3.0
/// - ^0.0.3 -> 0.0.4
pub fn caret_ceiling(version: &Version) -> Option<Version> {
    let ceiling = if version.major > 0 {
        Version::new(version.major.checked_add(1)?, 0, 0)
    } else if version.minor > 0 {
        Version::new(0, version.minor.checked_add(1)?, 0)
    } else {
        Version::new(0, 0, version.patch.checked_add(1)?)
    };
    Some(ceiling)
}

/// Smallest version outside `~version` (~1.2.3 -> 1.3.0)
pub fn tilde_ceiling(version: &Version) -> Option<Version> {
    Some(Version::new(version.major, version.minor.checked_add(1)?, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(Version::new(1, 0, 0)))]
    #[case("1.2", Some(Version::new(1, 2, 0)))]
    #[case("1.2.3", Some(Version::new(1, 2, 3)))]
    #[case("v4.1.0", Some(Version::new(4, 1, 0)))]
    #[case("1.0.0-beta.1", Version::parse("1.0.0-beta.1").ok())]
    #[case("invalid", None)]
    #[case("", None)]
    fn test_parse_version(#[case] input: &str, #[case] expected: Option<Version>) {
        assert_eq!(parse_version(input), expected);
    }

    #[rstest]
    #[case("1.0.0", "2.0.0", true)]
    #[case("2.0.0", "1.0.0", false)]
    #[case("1.0.0", "1.0.0", false)]
    #[case("1.0.0-alpha", "1.0.0", true)]
    #[case("1.2", "1.10.0", true)]
    #[case("invalid", "1.0.0", false)]
    #[case("1.0.0", "invalid", false)]
    fn test_is_version_lower(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
        assert_eq!(is_version_lower(a, b), expected);
    }

    #[rstest]
    #[case(Version::new(1, 2, 3), Some(Version::new(2, 0, 0)))]
    #[case(Version::new(0, 2, 3), Some(Version::new(0, 3, 0)))]
    #[case(Version::new(0, 0, 3), Some(Version::new(0, 0, 4)))]
    #[case(Version::new(u64::MAX, 0, 0), None)]
    #[case(Version::new(0, u64::MAX, 1), None)]
    #[case(Version::new(0, 0, u64::MAX), None)]
    fn test_caret_ceiling(#[case] input: Version, #[case] expected: Option<Version>) {
        assert_eq!(caret_ceiling(&input), expected);
    }

    #[rstest]
    #[case(Version::new(1, 2, 3), Some(Version::new(1, 3, 0)))]
    #[case(Version::new(1, u64::MAX, 0), None)]
    fn test_tilde_ceiling(#[case] input: Version, #[case] expected: Option<Version>) {
        assert_eq!(tilde_ceiling(&input), expected);
    }
}
