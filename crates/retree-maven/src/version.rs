//! Version parsing and version selectors.
//!
//! Selectors follow the notations used in dependency upgrade rules:
//!
//! | Selector              | Matches                                    |
//! |-----------------------|--------------------------------------------|
//! | `5.3.7`               | exactly that version                       |
//! | `5.x`, `5.3.x`, `*`   | releases with that prefix                  |
//! | `~5.3.1`              | `>=5.3.1 <5.4`                             |
//! | `^5.3.1`              | `>=5.3.1 <6`                               |
//! | `5.0 - 5.3`           | inclusive range                            |
//! | `[5.0,6.0)`           | Maven range, `[`/`]` inclusive, `(`/`)` not |
//! | `latest.release`      | any release                                |
//! | `latest.integration`  | any version, pre-releases included         |
//! | `latest.patch`        | releases on the current version's minor line |
//!
//! Every selector except `latest.integration` and exact versions ignores
//! pre-releases such as `6.0.0-M1` or `1.0-SNAPSHOT`.

use crate::error::{MavenError, Result};
use std::cmp::Ordering;
use std::fmt;

/// A dotted numeric version with an optional qualifier, e.g. `5.3.7`,
/// `4.3.6.RELEASE` or `6.0.0-M1`.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u64>,
    qualifier: Option<String>,
    raw: String,
}

impl Version {
    pub fn parse(s: &str) -> Result<Version> {
        let raw = s.trim();
        let split = raw
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(raw.len());
        let numeric = raw[..split].trim_end_matches('.');
        let qualifier = raw[split..].trim_start_matches(['-', '.']);
        if numeric.is_empty() {
            return Err(MavenError::InvalidVersion(s.to_string()));
        }
        let parts = numeric
            .split('.')
            .map(|p| p.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| MavenError::InvalidVersion(s.to_string()))?;
        Ok(Version {
            parts,
            qualifier: (!qualifier.is_empty()).then(|| qualifier.to_string()),
            raw: raw.to_string(),
        })
    }

    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    pub fn major(&self) -> u64 {
        self.part(0)
    }

    pub fn minor(&self) -> u64 {
        self.part(1)
    }

    fn part(&self, i: usize) -> u64 {
        self.parts.get(i).copied().unwrap_or(0)
    }

    /// No qualifier, or one of the qualifiers that mark a final release
    /// (`RELEASE`, `FINAL`, `GA`, service packs).
    pub fn is_release(&self) -> bool {
        match &self.qualifier {
            None => true,
            Some(q) => {
                let q = q.to_ascii_uppercase();
                q == "RELEASE" || q == "FINAL" || q == "GA" || q.starts_with("SP")
            }
        }
    }

    fn qualifier_rank(&self) -> i8 {
        match &self.qualifier {
            None => 0,
            Some(q) if q.to_ascii_uppercase().starts_with("SP") => 1,
            Some(_) if self.is_release() => 0,
            Some(_) => -1,
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            match self.part(i).cmp(&other.part(i)) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        match self.qualifier_rank().cmp(&other.qualifier_rank()) {
            Ordering::Equal if self.qualifier_rank() != 0 => {
                let a = self.qualifier.as_deref().unwrap_or("").to_ascii_uppercase();
                let b = other.qualifier.as_deref().unwrap_or("").to_ascii_uppercase();
                a.cmp(&b)
            }
            ordering => ordering,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One end of a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    pub version: Version,
    pub inclusive: bool,
}

/// A parsed version selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionComparator {
    Exact(Version),
    /// `5.x`; an empty prefix is `*`.
    XRange(Vec<u64>),
    Range {
        lower: Option<Bound>,
        upper: Option<Bound>,
    },
    LatestRelease,
    LatestIntegration,
    LatestPatch,
}

impl VersionComparator {
    pub fn parse(selector: &str) -> Result<VersionComparator> {
        let s = selector.trim();
        let invalid = || MavenError::InvalidSelector(selector.to_string());
        if s.is_empty() {
            return Err(invalid());
        }

        match s {
            "latest.release" => return Ok(VersionComparator::LatestRelease),
            "latest.integration" => return Ok(VersionComparator::LatestIntegration),
            "latest.patch" => return Ok(VersionComparator::LatestPatch),
            "*" | "x" | "X" => return Ok(VersionComparator::XRange(Vec::new())),
            _ => {}
        }

        if s.starts_with(['[', '(']) {
            return parse_maven_range(s).ok_or_else(invalid);
        }

        if let Some((low, high)) = s.split_once(" - ") {
            let lower = Version::parse(low).map_err(|_| invalid())?;
            let upper = Version::parse(high).map_err(|_| invalid())?;
            return Ok(VersionComparator::Range {
                lower: Some(Bound {
                    version: lower,
                    inclusive: true,
                }),
                upper: Some(Bound {
                    version: upper,
                    inclusive: true,
                }),
            });
        }

        if let Some(rest) = s.strip_prefix('~') {
            let base = Version::parse(rest).map_err(|_| invalid())?;
            let upper = match base.parts.len() {
                1 => format!("{}", base.major() + 1),
                _ => format!("{}.{}", base.major(), base.minor() + 1),
            };
            return Ok(half_open(base, &upper));
        }

        if let Some(rest) = s.strip_prefix('^') {
            let base = Version::parse(rest).map_err(|_| invalid())?;
            let upper = if base.major() > 0 || base.parts.len() == 1 {
                format!("{}", base.major() + 1)
            } else if base.minor() > 0 || base.parts.len() == 2 {
                format!("0.{}", base.minor() + 1)
            } else {
                format!("0.0.{}", base.part(2) + 1)
            };
            return Ok(half_open(base, &upper));
        }

        let segments: Vec<&str> = s.split('.').collect();
        if let Some(pos) = segments
            .iter()
            .position(|p| matches!(*p, "x" | "X" | "*"))
        {
            // wildcards may only trail: `5.x` and `5.x.x` but not `5.x.3`
            if segments[pos..]
                .iter()
                .any(|p| !matches!(*p, "x" | "X" | "*"))
            {
                return Err(invalid());
            }
            let prefix = segments[..pos]
                .iter()
                .map(|p| p.parse::<u64>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| invalid())?;
            return Ok(VersionComparator::XRange(prefix));
        }

        Version::parse(s)
            .map(VersionComparator::Exact)
            .map_err(|_| invalid())
    }

    /// Check that `selector` is a valid selector.
    pub fn validate(selector: &str) -> Result<()> {
        Self::parse(selector).map(|_| ())
    }

    /// Whether `version` satisfies this selector. `current` is the version in
    /// use today; only `latest.patch` consults it. Unparsable versions never
    /// match.
    pub fn is_valid(&self, current: Option<&str>, version: &str) -> bool {
        let Ok(candidate) = Version::parse(version) else {
            return false;
        };
        match self {
            VersionComparator::Exact(v) => &candidate == v,
            VersionComparator::LatestIntegration => true,
            VersionComparator::LatestRelease => candidate.is_release(),
            VersionComparator::LatestPatch => {
                let Some(Ok(current)) = current.map(Version::parse) else {
                    return false;
                };
                candidate.is_release()
                    && candidate.major() == current.major()
                    && candidate.minor() == current.minor()
                    && candidate >= current
            }
            VersionComparator::XRange(prefix) => {
                candidate.is_release()
                    && prefix
                        .iter()
                        .enumerate()
                        .all(|(i, p)| candidate.part(i) == *p)
            }
            VersionComparator::Range { lower, upper } => {
                let above = lower.as_ref().is_none_or(|b| match candidate.cmp(&b.version) {
                    Ordering::Greater => true,
                    Ordering::Equal => b.inclusive,
                    Ordering::Less => false,
                });
                let below = upper.as_ref().is_none_or(|b| match candidate.cmp(&b.version) {
                    Ordering::Less => true,
                    Ordering::Equal => b.inclusive,
                    Ordering::Greater => false,
                });
                candidate.is_release() && above && below
            }
        }
    }
}

fn half_open(lower: Version, upper: &str) -> VersionComparator {
    let upper = Version {
        parts: upper.split('.').filter_map(|p| p.parse().ok()).collect(),
        qualifier: None,
        raw: upper.to_string(),
    };
    VersionComparator::Range {
        lower: Some(Bound {
            version: lower,
            inclusive: true,
        }),
        upper: Some(Bound {
            version: upper,
            inclusive: false,
        }),
    }
}

/// `[1.0,2.0)`, `[1.0,)`, `(,2.0]`, and the single-version form `[1.0]`.
fn parse_maven_range(s: &str) -> Option<VersionComparator> {
    let lower_inclusive = s.starts_with('[');
    let upper_inclusive = s.ends_with(']');
    if !s.ends_with([']', ')']) || s.len() < 2 {
        return None;
    }
    let inner = &s[1..s.len() - 1];
    let bound = |text: &str, inclusive: bool| -> Option<Option<Bound>> {
        let text = text.trim();
        if text.is_empty() {
            return Some(None);
        }
        Version::parse(text).ok().map(|version| Some(Bound { version, inclusive }))
    };
    match inner.split_once(',') {
        Some((low, high)) => {
            if high.contains(',') {
                return None;
            }
            Some(VersionComparator::Range {
                lower: bound(low, lower_inclusive)?,
                upper: bound(high, upper_inclusive)?,
            })
        }
        None => {
            if !(lower_inclusive && upper_inclusive) {
                return None;
            }
            Version::parse(inner).ok().map(VersionComparator::Exact)
        }
    }
}
