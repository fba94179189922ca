//! npm semver range parsing and satisfaction
//!
//! Supports the npm range grammar:
//! - `1.2.3`, `=1.2.3` - exact match
//! - `^1.2.3` - compatible with version (>=1.2.3 <2.0.0-0, special cases for 0.x)
//! - `~1.2.3`, `~>1.2.3` - approximately equivalent (>=1.2.3 <1.3.0-0)
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3` - comparison operators
//! - `1.2.x`, `1.x`, `*`, `1.2` - X-ranges and partial versions
//! - `1.2.3 - 2.3.4` - hyphen ranges
//! - `>=1.0.0 <2.0.0` - AND (whitespace separated)
//! - `^1.0.0 || ^2.0.0` - OR
//!
//! `semver::VersionReq` follows Cargo rules, which differ from npm for bare
//! versions, `||` and pre-release handling, so ranges are desugared here into
//! primitive comparators the way npm does it.

use crate::error::RangeError;
use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;
use std::sync::LazyLock;

/// Collapses whitespace between an operator and its version (`>= 1.2` -> `>=1.2`)
static OPERATOR_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(~>|<=|>=|<|>|=|~|\^)\s+").unwrap());

/// Hyphen range: `A - B`
static HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap());

/// A parsed npm version range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    raw: String,
    /// OR of comparator sets; a set with no comparators matches anything
    sets: Vec<Vec<Comparator>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    fn matches(&self, version: &Version) -> bool {
        match self.op {
            Op::Lt => version < &self.version,
            Op::Lte => version <= &self.version,
            Op::Gt => version > &self.version,
            Op::Gte => version >= &self.version,
            Op::Eq => version == &self.version,
        }
    }
}

/// A version with possibly missing (wildcard) components
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn is_any(&self) -> bool {
        self.major.is_none()
    }

    /// Missing components filled with zero
    fn floor(&self) -> Version {
        let mut v = Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        if self.patch.is_some() {
            v.pre = self.pre.clone();
        }
        v
    }

    /// Exclusive upper bound for the components that are present
    fn ceiling(&self, raw: &str) -> Result<Option<Version>, RangeError> {
        Ok(match (self.major, self.minor, self.patch) {
            (None, _, _) => None,
            (Some(major), None, _) => Some(lowest(bump(major, raw)?, 0, 0)),
            (Some(major), Some(minor), None) => Some(lowest(major, bump(minor, raw)?, 0)),
            (Some(_), Some(_), Some(_)) => None,
        })
    }

    fn is_full(&self) -> bool {
        self.patch.is_some()
    }
}

/// The lowest possible version for a release tuple (`X.Y.Z-0`)
fn lowest(major: u64, minor: u64, patch: u64) -> Version {
    let mut v = Version::new(major, minor, patch);
    v.pre = Prerelease::new("0").unwrap_or(Prerelease::EMPTY);
    v
}

/// Next component value; a range whose bound cannot be represented is invalid
fn bump(component: u64, raw: &str) -> Result<u64, RangeError> {
    component
        .checked_add(1)
        .ok_or_else(|| RangeError::new(raw, format!("version component {} out of range", component)))
}

/// Matches nothing, used for `<*` and `>*`
fn nothing() -> Vec<Comparator> {
    vec![Comparator::new(Op::Lt, lowest(0, 0, 0))]
}

impl VersionRange {
    /// Parse an npm range string
    pub fn parse(raw: &str) -> Result<Self, RangeError> {
        let mut sets = Vec::new();
        for part in raw.split("||") {
            sets.push(parse_set(part.trim(), raw)?);
        }
        Ok(Self {
            raw: raw.trim().to_string(),
            sets,
        })
    }

    /// Check whether a version satisfies this range
    ///
    /// Pre-release versions only match when `include_prerelease` is set, or
    /// when a comparator of the same set names a pre-release on the same
    /// `major.minor.patch` tuple.
    pub fn satisfies(&self, version: &Version, include_prerelease: bool) -> bool {
        let stripped;
        let version = if version.build.is_empty() {
            version
        } else {
            stripped = Version {
                build: BuildMetadata::EMPTY,
                ..version.clone()
            };
            &stripped
        };

        self.sets
            .iter()
            .any(|set| set_satisfies(set, version, include_prerelease))
    }
}

fn set_satisfies(set: &[Comparator], version: &Version, include_prerelease: bool) -> bool {
    if !set.iter().all(|c| c.matches(version)) {
        return false;
    }

    if version.pre.is_empty() || include_prerelease {
        return true;
    }

    set.iter().any(|c| {
        !c.version.pre.is_empty()
            && c.version.major == version.major
            && c.version.minor == version.minor
            && c.version.patch == version.patch
    })
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Parse one `||` branch into an AND of comparators
fn parse_set(spec: &str, raw: &str) -> Result<Vec<Comparator>, RangeError> {
    if spec.is_empty() {
        return Ok(Vec::new());
    }

    if let Some(caps) = HYPHEN_RE.captures(spec) {
        return parse_hyphen(&caps[1], &caps[2], raw);
    }

    let normalized = OPERATOR_SPACE_RE.replace_all(spec, "$1");
    let mut comparators = Vec::new();
    for token in normalized.split_whitespace() {
        comparators.extend(parse_token(token, raw)?);
    }
    Ok(comparators)
}

fn parse_hyphen(from: &str, to: &str, raw: &str) -> Result<Vec<Comparator>, RangeError> {
    let from = parse_partial(from, raw)?;
    let to = parse_partial(to, raw)?;
    let mut comparators = Vec::new();

    if !from.is_any() {
        comparators.push(Comparator::new(Op::Gte, from.floor()));
    }

    if !to.is_any() {
        match to.ceiling(raw)? {
            Some(ceiling) => comparators.push(Comparator::new(Op::Lt, ceiling)),
            None => comparators.push(Comparator::new(Op::Lte, to.floor())),
        }
    }

    Ok(comparators)
}

/// Parse a single comparator token such as `^1.2.3` or `>=2`
fn parse_token(token: &str, raw: &str) -> Result<Vec<Comparator>, RangeError> {
    let (op, rest) = split_operator(token);
    let partial = parse_partial(rest, raw)?;

    let comparators = match op {
        "^" => caret(&partial, raw)?,
        "~" | "~>" => tilde(&partial, raw)?,
        "" | "=" => exact(&partial, raw)?,
        ">=" => {
            if partial.is_any() {
                Vec::new()
            } else {
                vec![Comparator::new(Op::Gte, partial.floor())]
            }
        }
        ">" => greater(&partial, raw)?,
        "<" => {
            if partial.is_any() {
                nothing()
            } else if partial.is_full() {
                vec![Comparator::new(Op::Lt, partial.floor())]
            } else {
                let floor = partial.floor();
                vec![Comparator::new(
                    Op::Lt,
                    lowest(floor.major, floor.minor, floor.patch),
                )]
            }
        }
        "<=" if partial.is_any() => Vec::new(),
        "<=" => match partial.ceiling(raw)? {
            Some(ceiling) => vec![Comparator::new(Op::Lt, ceiling)],
            None => vec![Comparator::new(Op::Lte, partial.floor())],
        },
        other => {
            return Err(RangeError::new(
                raw,
                format!("unsupported operator '{}'", other),
            ))
        }
    };

    Ok(comparators)
}

fn split_operator(token: &str) -> (&str, &str) {
    for op in ["~>", ">=", "<=", ">", "<", "=", "^", "~"] {
        if let Some(rest) = token.strip_prefix(op) {
            return (op, rest);
        }
    }
    ("", token)
}

fn exact(partial: &Partial, raw: &str) -> Result<Vec<Comparator>, RangeError> {
    if partial.is_any() {
        return Ok(Vec::new());
    }
    Ok(match partial.ceiling(raw)? {
        Some(ceiling) => vec![
            Comparator::new(Op::Gte, partial.floor()),
            Comparator::new(Op::Lt, ceiling),
        ],
        None => vec![Comparator::new(Op::Eq, partial.floor())],
    })
}

fn greater(partial: &Partial, raw: &str) -> Result<Vec<Comparator>, RangeError> {
    Ok(match (partial.major, partial.minor, partial.patch) {
        (None, _, _) => nothing(),
        (Some(major), None, _) => {
            vec![Comparator::new(Op::Gte, Version::new(bump(major, raw)?, 0, 0))]
        }
        (Some(major), Some(minor), None) => {
            vec![Comparator::new(Op::Gte, Version::new(major, bump(minor, raw)?, 0))]
        }
        _ => vec![Comparator::new(Op::Gt, partial.floor())],
    })
}

fn tilde(partial: &Partial, raw: &str) -> Result<Vec<Comparator>, RangeError> {
    let (Some(major), minor) = (partial.major, partial.minor) else {
        return Ok(Vec::new());
    };
    let upper = match minor {
        None => lowest(bump(major, raw)?, 0, 0),
        Some(minor) => lowest(major, bump(minor, raw)?, 0),
    };
    Ok(vec![
        Comparator::new(Op::Gte, partial.floor()),
        Comparator::new(Op::Lt, upper),
    ])
}

fn caret(partial: &Partial, raw: &str) -> Result<Vec<Comparator>, RangeError> {
    let Some(major) = partial.major else {
        return Ok(Vec::new());
    };
    let upper = match (partial.minor, partial.patch) {
        (Some(minor), None) if major == 0 => lowest(0, bump(minor, raw)?, 0),
        (Some(0), Some(patch)) if major == 0 => lowest(0, 0, bump(patch, raw)?),
        (Some(minor), Some(_)) if major == 0 => lowest(0, bump(minor, raw)?, 0),
        _ => lowest(bump(major, raw)?, 0, 0),
    };
    Ok(vec![
        Comparator::new(Op::Gte, partial.floor()),
        Comparator::new(Op::Lt, upper),
    ])
}

/// Parse `1`, `1.2`, `1.x`, `1.2.3-beta.1+build`, `*`, `v1.2.3`
fn parse_partial(s: &str, raw: &str) -> Result<Partial, RangeError> {
    let s = s.strip_prefix(['v', 'V']).unwrap_or(s);
    if s.is_empty() {
        return Err(RangeError::new(raw, "missing version"));
    }

    let core = s.split_once('+').map_or(s, |(core, _)| core);
    let (core, pre) = match core.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (core, None),
    };

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3 {
        return Err(RangeError::new(raw, format!("too many components in '{}'", s)));
    }

    let mut components = [None, None, None];
    let mut wildcard_seen = false;
    for (i, part) in parts.iter().enumerate() {
        if wildcard_seen || matches!(*part, "x" | "X" | "*") {
            wildcard_seen = true;
            continue;
        }
        let value = part.parse::<u64>().map_err(|_| {
            RangeError::new(raw, format!("invalid version component '{}'", part))
        })?;
        components[i] = Some(value);
    }

    let [major, minor, patch] = components;
    let pre = match pre {
        Some(pre) if patch.is_some() => Prerelease::new(pre)
            .map_err(|e| RangeError::new(raw, format!("invalid pre-release '{}': {}", pre, e)))?,
        Some(pre) => {
            return Err(RangeError::new(
                raw,
                format!("pre-release '{}' on partial version", pre),
            ))
        }
        None => Prerelease::EMPTY,
    };

    Ok(Partial {
        major,
        minor,
        patch,
        pre,
    })
}
