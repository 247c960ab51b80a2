//! Version range boundaries
//!
//! Supports npm style range expressions without `||`:
//! - `1.2.3`, `=1.2.3` - exact version
//! - `^1.2.3` - compatible with version (>=1.2.3 <2.0.0)
//! - `~1.2.3` - approximately equivalent (>=1.2.3 <1.3.0)
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3` (and `=>`, `=<`) - comparison operators
//! - `1.2.x`, `1.x`, `1`, `*` - wildcards and partial versions
//! - `1.0.0 - 2.0.0` - hyphen ranges
//!
//! Whitespace separated comparators must all hold. Only the boundaries of the
//! resulting set are tracked, and strictness is dropped: `>1.0.0` has the lower
//! boundary `1.0.0`, the same as `>=1.0.0`.

use semver::Version;

use crate::config::UNBOUNDED_MIN_VERSION;
use crate::version::error::RangeError;
use crate::version::semver::{caret_ceiling, tilde_ceiling};

/// Lower and upper boundary of a range expression. `None` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    lower: Option<Version>,
    upper: Option<Version>,
}

impl VersionRange {
    /// Range that admits every version (`*`)
    pub fn any() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    /// Parse a normalized range expression
    pub fn parse(range: &str) -> Result<Self, RangeError> {
        Self::parse_with_source(range, range)
    }

    /// Parse a normalized range expression, reporting `source` as the
    /// expression it was derived from when parsing fails
    pub fn parse_with_source(range: &str, source: &str) -> Result<Self, RangeError> {
        Self::parse_comparators(range).map_err(|reason| RangeError::Parse {
            range: range.to_string(),
            source_expr: source.to_string(),
            reason,
        })
    }

    fn parse_comparators(range: &str) -> Result<Self, String> {
        let tokens: Vec<&str> = range.split_whitespace().collect();
        if tokens.is_empty() {
            return Err("empty range".to_string());
        }

        let mut result = Self::any();
        let mut i = 0;
        while i < tokens.len() {
            // Hyphen range: `1.0.0 - 2.0.0`
            if tokens.get(i + 1) == Some(&"-") {
                let to = tokens
                    .get(i + 2)
                    .ok_or_else(|| format!("hyphen range `{} -` has no upper version", tokens[i]))?;
                let from = Operand::parse(tokens[i])?;
                let to = Operand::parse(to)?;
                result.intersect(from.floor(), to.ceiling()?);
                i += 3;
                continue;
            }

            let (lower, upper) = Self::parse_comparator(tokens[i])?;
            result.intersect(lower, upper);
            i += 1;
        }

        Ok(result)
    }

    /// Parse one comparator into its (lower, upper) boundaries
    fn parse_comparator(token: &str) -> Result<(Option<Version>, Option<Version>), String> {
        let (operator, rest) = Operator::split(token);
        if rest.is_empty() {
            return Err(format!("operator `{}` is not followed by a version", token));
        }
        let operand = Operand::parse(rest)?;

        let bounds = match operator {
            Operator::Eq => (operand.floor(), operand.ceiling()?),
            Operator::Gte | Operator::Gt => (operand.floor(), None),
            Operator::Lt => (None, operand.floor()),
            Operator::Lte => (None, operand.ceiling()?),
            Operator::Caret => (operand.floor(), operand.caret_ceiling()?),
            Operator::Tilde => (operand.floor(), operand.tilde_ceiling()?),
        };
        Ok(bounds)
    }

    /// Narrow this range by another set of boundaries (all comparators must hold)
    fn intersect(&mut self, lower: Option<Version>, upper: Option<Version>) {
        if let Some(lower) = lower
            && self.lower.as_ref().is_none_or(|current| lower > *current)
        {
            self.lower = Some(lower);
        }
        if let Some(upper) = upper
            && self.upper.as_ref().is_none_or(|current| upper < *current)
        {
            self.upper = Some(upper);
        }
    }

    pub fn lower(&self) -> Option<&Version> {
        self.lower.as_ref()
    }

    pub fn upper(&self) -> Option<&Version> {
        self.upper.as_ref()
    }

    /// True for `*`: no boundary on either side
    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// The minimum version the range admits, `0.0.0` when unbounded below
    pub fn min_version(&self) -> String {
        self.lower
            .as_ref()
            .map(Version::to_string)
            .unwrap_or_else(|| UNBOUNDED_MIN_VERSION.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Gte,
    Gt,
    Lte,
    Lt,
    Caret,
    Tilde,
}

impl Operator {
    /// Longest prefixes first so `>=` is not read as `>`
    const PREFIXES: [(&'static str, Operator); 9] = [
        (">=", Operator::Gte),
        ("=>", Operator::Gte),
        ("<=", Operator::Lte),
        ("=<", Operator::Lte),
        (">", Operator::Gt),
        ("<", Operator::Lt),
        ("=", Operator::Eq),
        ("^", Operator::Caret),
        ("~", Operator::Tilde),
    ];

    fn split(token: &str) -> (Operator, &str) {
        Self::PREFIXES
            .iter()
            .find_map(|(prefix, operator)| token.strip_prefix(*prefix).map(|rest| (*operator, rest)))
            .unwrap_or((Operator::Eq, token))
    }
}

/// Version part of a comparator
#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    /// `*`, `x`, `X`
    Any,
    /// `1`, `1.x`, `1.x.x`
    Major(u64),
    /// `1.2`, `1.2.x`
    Minor(u64, u64),
    /// `1.2.3`, `1.2.3-beta.1`
    Full(Version),
}

impl Operand {
    fn parse(text: &str) -> Result<Self, String> {
        let version = text.strip_prefix('v').unwrap_or(text);
        if let Ok(full) = Version::parse(version) {
            return Ok(Operand::Full(full));
        }

        let parts: Vec<&str> = version.split('.').collect();
        Self::parse_partial(&parts).ok_or_else(|| format!("`{}` is not a valid version", text))
    }

    fn parse_partial(parts: &[&str]) -> Option<Self> {
        match parts {
            [major, rest @ ..] if is_wildcard(major) && rest.iter().all(|p| is_wildcard(p)) => {
                Some(Operand::Any)
            }
            [major] => parse_number(major).map(Operand::Major),
            [major, minor] if is_wildcard(minor) => parse_number(major).map(Operand::Major),
            [major, minor, patch] if is_wildcard(minor) && is_wildcard(patch) => {
                parse_number(major).map(Operand::Major)
            }
            [major, minor] => Some(Operand::Minor(parse_number(major)?, parse_number(minor)?)),
            [major, minor, patch] if is_wildcard(patch) => {
                Some(Operand::Minor(parse_number(major)?, parse_number(minor)?))
            }
            _ => None,
        }
    }

    fn floor(&self) -> Option<Version> {
        match self {
            Operand::Any => None,
            Operand::Major(major) => Some(Version::new(*major, 0, 0)),
            Operand::Minor(major, minor) => Some(Version::new(*major, *minor, 0)),
            Operand::Full(version) => Some(version.clone()),
        }
    }

    /// Highest boundary of the set the operand denotes on its own
    fn ceiling(&self) -> Result<Option<Version>, String> {
        let ceiling = match self {
            Operand::Any => None,
            Operand::Major(major) => Some(Version::new(bump(*major)?, 0, 0)),
            Operand::Minor(major, minor) => Some(Version::new(*major, bump(*minor)?, 0)),
            Operand::Full(version) => Some(version.clone()),
        };
        Ok(ceiling)
    }

    fn caret_ceiling(&self) -> Result<Option<Version>, String> {
        let ceiling = match self {
            Operand::Any => None,
            Operand::Major(major) => Some(Version::new(bump(*major)?, 0, 0)),
            Operand::Minor(0, minor) => Some(Version::new(0, bump(*minor)?, 0)),
            Operand::Minor(major, _) => Some(Version::new(bump(*major)?, 0, 0)),
            Operand::Full(version) => Some(caret_ceiling(version).ok_or_else(out_of_range)?),
        };
        Ok(ceiling)
    }

    fn tilde_ceiling(&self) -> Result<Option<Version>, String> {
        match self {
            Operand::Full(version) => tilde_ceiling(version).map(Some).ok_or_else(out_of_range),
            other => other.ceiling(),
        }
    }
}

/// Next value of a version component
fn bump(component: u64) -> Result<u64, String> {
    component.checked_add(1).ok_or_else(out_of_range)
}

fn out_of_range() -> String {
    "version component out of range".to_string()
}

fn is_wildcard(part: &str) -> bool {
    matches!(part, "*" | "x" | "X")
}

fn parse_number(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
