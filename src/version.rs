//! Release version numbers of the form `<major>.<minor>[.<patch>][suffix]`.
use regex::Regex;
use serde::{Serialize, Serializer};
use std::{fmt::Display, str::FromStr, sync::LazyLock};

use crate::error::{ReleaseError, Result};

/// Suffix marking a development build between releases.
pub const DEFAULT_DEV_SUFFIX: &str = "-DEV";

static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<major>\d+)\.(?<minor>\d+)(?:\.(?<patch>\d+))?(?<suffix>-[0-9A-Za-z.\-]+)?$")
        .unwrap()
});

/// A project version as the release workflow understands it.
///
/// A zero `patch_level` denotes a main release and is omitted from the
/// rendered string, so `0.21` and `0.21.0` parse to the same value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseVersion {
    pub major: u64,
    pub minor: u64,
    pub patch_level: u64,
    /// Pre-release marker including its leading dash, e.g. `-DEV`.
    pub suffix: String,
}

impl ReleaseVersion {
    pub fn new(major: u64, minor: u64, patch_level: u64) -> Self {
        Self {
            major,
            minor,
            patch_level,
            suffix: String::new(),
        }
    }

    /// The next main release: minor incremented, patch level and suffix
    /// cleared. Parsing never yields a minor of `u64::MAX`.
    pub fn next(&self) -> Self {
        Self::new(self.major, self.minor.saturating_add(1), 0)
    }

    /// A patch release of this version's number.
    pub fn next_patch_level(&self, level: u64) -> Self {
        Self::new(self.major, self.minor, level)
    }

    /// The previous main release number.
    pub fn prev(&self) -> Self {
        if self.minor == 0 {
            return Self::new(self.major.saturating_sub(1), 0, 0);
        }
        Self::new(self.major, self.minor - 1, 0)
    }

    pub fn with_suffix(&self, suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            ..self.clone()
        }
    }

    /// Whether this is an in-progress development build.
    pub fn is_dev(&self) -> bool {
        !self.suffix.is_empty()
    }

    /// `major.minor` without patch level or suffix.
    pub fn number(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl Display for ReleaseVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.patch_level > 0 {
            write!(
                f,
                "{}.{}.{}{}",
                self.major, self.minor, self.patch_level, self.suffix
            )
        } else {
            write!(f, "{}.{}{}", self.major, self.minor, self.suffix)
        }
    }
}

impl FromStr for ReleaseVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let caps = VERSION_REGEX
            .captures(trimmed)
            .ok_or_else(|| ReleaseError::InvalidVersion(s.to_string()))?;

        let number = |name: &str| -> Result<u64> {
            match caps.name(name) {
                Some(m) => m
                    .as_str()
                    .parse::<u64>()
                    .map_err(|_| ReleaseError::InvalidVersion(s.to_string())),
                None => Ok(0),
            }
        };

        let minor = number("minor")?;
        if minor == u64::MAX {
            return Err(ReleaseError::InvalidVersion(s.to_string()));
        }

        Ok(Self {
            major: number("major")?,
            minor,
            patch_level: number("patch")?,
            suffix: caps
                .name("suffix")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }
}

impl Serialize for ReleaseVersion {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
