//! Range string normalization
//!
//! Test authors write ranges by hand, so they show up with padding, a space
//! between an operator and its version (`>= 4 < 5`) or the npm dist-tag
//! `latest`. Normalization turns those into the grammar understood by
//! [`VersionRange`](crate::version::range::VersionRange).

use regex::Regex;

use crate::config::LATEST_RANGE;

pub struct RangeNormalizer {
    /// An operator character followed by whitespace and a digit: `>= 4`
    operator_gap_re: Regex,
}

impl RangeNormalizer {
    pub fn new() -> Self {
        Self {
            operator_gap_re: Regex::new(r"([<>=])\s+(\d)").unwrap(),
        }
    }

    /// Normalize a single range expression (no `||`)
    ///
    /// - trims surrounding whitespace
    /// - maps `latest` to [`LATEST_RANGE`]
    /// - removes whitespace between an operator and the version it applies to
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed == "latest" {
            return LATEST_RANGE.to_string();
        }

        self.operator_gap_re
            .replace_all(trimmed, "${1}${2}")
            .into_owned()
    }
}

impl Default for RangeNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
