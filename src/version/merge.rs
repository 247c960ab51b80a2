//! Selection of the range with the lowest minimum boundary
//!
//! A dependency may list alternatives (`^1.0.0 || ^3.0.0`) and a target may be
//! declared by many test cases. The merger keeps whichever range reaches
//! furthest down, so the resolved minimum is the oldest version any test
//! exercises.

use crate::version::error::RangeError;
use crate::version::normalize::RangeNormalizer;
use crate::version::range::VersionRange;

/// Returns true when `a` reaches a lower minimum version than `b`.
///
/// - `*` is lower than anything except another `*`.
/// - Nothing is lower than a range without a lower boundary.
/// - A range with only an upper boundary is lower when that boundary
///   precedes the lower boundary of `b`.
/// - Otherwise the lower boundaries are compared.
///
/// Equal ranges are never lower than each other, so the range seen first
/// wins a tie.
pub fn is_range_lower(a: &VersionRange, b: &VersionRange) -> bool {
    if a.is_unbounded() {
        return !b.is_unbounded();
    }

    let Some(b_lower) = b.lower() else {
        return false;
    };

    match a.lower() {
        Some(a_lower) => a_lower < b_lower,
        None => a.upper().is_some_and(|a_upper| a_upper < b_lower),
    }
}

/// Reduce ranges left to right, replacing the current pick only when a later
/// range is strictly lower
pub fn lowest_range<I>(ranges: I) -> Option<VersionRange>
where
    I: IntoIterator<Item = VersionRange>,
{
    ranges.into_iter().reduce(|best, candidate| {
        if is_range_lower(&candidate, &best) {
            candidate
        } else {
            best
        }
    })
}

/// Parse normalized range strings and return the one with the lowest minimum.
///
/// `source` is the expression the strings were split from; it is carried in
/// the error of the first string that fails to parse.
pub fn process_range_strings<S: AsRef<str>>(
    ranges: &[S],
    source: &str,
) -> Result<VersionRange, RangeError> {
    let parsed = ranges
        .iter()
        .map(|range| VersionRange::parse_with_source(range.as_ref(), source))
        .collect::<Result<Vec<_>, _>>()?;

    lowest_range(parsed).ok_or_else(|| RangeError::Parse {
        range: String::new(),
        source_expr: source.to_string(),
        reason: "no ranges given".to_string(),
    })
}

/// Splits, normalizes and merges `||` expressions
pub struct RangeMerger {
    normalizer: RangeNormalizer,
}

impl RangeMerger {
    pub fn new() -> Self {
        Self {
            normalizer: RangeNormalizer::new(),
        }
    }

    /// Split an expression on `||` and normalize every alternative
    pub fn split_or_expression(&self, expression: &str) -> Vec<String> {
        expression
            .split("||")
            .map(|part| self.normalizer.normalize(part))
            .collect()
    }

    /// The alternative of `expression` with the lowest minimum version
    pub fn merge_expression(&self, expression: &str) -> Result<VersionRange, RangeError> {
        let parts = self.split_or_expression(expression);
        process_range_strings(&parts, expression)
    }
}

impl Default for RangeMerger {
    fn default() -> Self {
        Self::new()
    }
}
