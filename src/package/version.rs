//! Dotted-numeric version comparison.
//!
//! Versions are compared component-wise over the components both sides
//! share; a longer version is not greater than its own prefix.

use anyhow::Result;
use std::fmt;
use std::str::FromStr;

use crate::error::BpmError;

/// Version keyword meaning "pick for me".
pub const LATEST: &str = "latest";

/// Which version an operation should act on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionRequest {
    /// Resolved by the operation: the index's declared latest for install,
    /// the highest installed version for uninstall and locate.
    #[default]
    Latest,
    /// Match exact version string
    Exact(String),
}

impl From<&str> for VersionRequest {
    fn from(s: &str) -> Self {
        if s == LATEST {
            VersionRequest::Latest
        } else {
            VersionRequest::Exact(s.to_string())
        }
    }
}

impl From<Option<&str>> for VersionRequest {
    fn from(s: Option<&str>) -> Self {
        s.map(VersionRequest::from).unwrap_or_default()
    }
}

impl fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRequest::Latest => f.write_str(LATEST),
            VersionRequest::Exact(v) => f.write_str(v),
        }
    }
}

/// A parsed dotted sequence of non-negative integers (e.g. "1.2.0").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    raw: String,
    components: Vec<u64>,
}

impl Version {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// True at the first shared component where `self` is larger.
    /// Equal shared components are not "greater".
    pub fn is_greater(&self, other: &Version) -> bool {
        for (left, right) in self.components.iter().zip(other.components.iter()) {
            if left < right {
                return false;
            }
            if left > right {
                return true;
            }
        }
        false
    }
}

impl FromStr for Version {
    type Err = BpmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split('.')
            .map(|part| {
                part.parse::<u64>().map_err(|_| BpmError::MalformedVersion {
                    version: s.to_string(),
                    component: part.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Version {
            raw: s.to_string(),
            components,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compare two version strings, rejecting malformed components.
pub fn is_greater(a: &str, b: &str) -> Result<bool, BpmError> {
    Ok(a.parse::<Version>()?.is_greater(&b.parse::<Version>()?))
}

/// Version resolver - pure functions over version strings.
pub struct VersionResolver;

impl VersionResolver {
    /// Highest version in iteration order.
    ///
    /// The first item seeds the fold and only a strictly greater version
    /// replaces it, so ties keep the earliest-seen version.
    pub fn highest<'a, I>(versions: I) -> Result<Option<&'a str>, BpmError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut best: Option<(&'a str, Version)> = None;
        for raw in versions {
            let parsed = raw.parse::<Version>()?;
            match &best {
                Some((_, current)) if !parsed.is_greater(current) => {}
                _ => best = Some((raw, parsed)),
            }
        }
        Ok(best.map(|(raw, _)| raw))
    }
}
