//! Core data types used throughout SdkGate.
//!
//! This module defines the fundamental data structures for representing:
//! - Versions and the closed set of recognized platforms
//! - Per-platform availability facts and the per-declaration aggregate
//! - The tri-state classification and batch evaluation results
//! - Report formats

use crate::analyzer::{LowerBound, UpperBound};
use crate::render::RuntimeCheck;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// An OS version triple.
///
/// Ordering is lexicographic on `(major, minor, patch)`. A `Version` is a
/// plain value; "absent" versions are modelled by the caller as
/// `Option<Version>` and interpreted through [`LowerBound`] / [`UpperBound`].
///
/// # Example
///
/// ```rust
/// use sdkgate::Version;
///
/// let v: Version = "10.12".parse().unwrap();
/// assert_eq!(v, Version::new(10, 12, 0));
/// assert_eq!(v.to_string(), "10.12");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    /// Major component
    pub major: u64,
    /// Minor component
    pub minor: u64,
    /// Patch component
    pub patch: u64,
}

impl Version {
    /// The lowest possible version, `0.0.0`.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Create a version from its components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch }
    }

    /// The version as a `(major, minor, patch)` tuple.
    #[must_use]
    pub const fn as_triple(self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

impl FromStr for Version {
    type Err = crate::error::SdkGateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_version(s)
    }
}

impl TryFrom<String> for Version {
    type Error = crate::error::SdkGateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_version(&s)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}

/// Parse a version string, handling incomplete versions.
fn parse_version(s: &str) -> Result<Version, crate::error::SdkGateError> {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    // Handle versions like "10" and "10.12" by appending ".0"
    let normalized = match trimmed.matches('.').count() {
        0 => format!("{trimmed}.0.0"),
        1 => format!("{trimmed}.0"),
        _ => trimmed.to_string(),
    };

    let parsed = semver::Version::parse(&normalized).map_err(|e| crate::err!(VersionParse {
        version: s.to_string(),
        source: e,
    }))?;

    if !parsed.pre.is_empty() || !parsed.build.is_empty() {
        return Err(crate::err!(InvalidVersion {
            version: s.to_string(),
            message: "pre-release and build suffixes are not OS versions".to_string(),
        }));
    }

    Ok(Version::new(parsed.major, parsed.minor, parsed.patch))
}

/// A recognized target platform.
///
/// The set is closed: adding a platform is a single variant plus an entry in
/// [`Platform::ALL`]. Every per-platform walk uses `ALL` so output order is
/// stable.
///
/// Identifiers are matched case-insensitively wherever they are read
/// (configuration keys, fact files, CLI overrides) and always written in
/// lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Platform {
    /// macOS
    Macos,
    /// iOS and iPadOS
    Ios,
    /// tvOS
    Tvos,
    /// watchOS
    Watchos,
    /// visionOS
    Visionos,
}

impl Platform {
    /// All recognized platforms in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Macos,
        Self::Ios,
        Self::Tvos,
        Self::Watchos,
        Self::Visionos,
    ];

    /// Lowercase identifier used in configuration, facts and rendered text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Macos => "macos",
            Self::Ios => "ios",
            Self::Tvos => "tvos",
            Self::Watchos => "watchos",
            Self::Visionos => "visionos",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = crate::error::SdkGateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == lowered)
            .ok_or_else(|| crate::err!(UnknownPlatform { platform: s.to_string() }))
    }
}

impl TryFrom<String> for Platform {
    type Error = crate::error::SdkGateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Raw availability of one declaration on one platform.
///
/// `unavailable` overrides every version bound: such a fact describes an
/// empty availability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformFact {
    /// First version where the declaration exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduced: Option<Version>,

    /// Version where the declaration became discouraged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Version>,

    /// Version where the declaration stopped existing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obsoleted: Option<Version>,

    /// Unconditionally unavailable on this platform
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unavailable: bool,
}

impl PlatformFact {
    /// A fact that only records an introduction version.
    #[must_use]
    pub const fn introduced(version: Version) -> Self {
        Self {
            introduced: Some(version),
            deprecated: None,
            obsoleted: None,
            unavailable: false,
        }
    }

    /// A fact marking the declaration as unavailable on the platform.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            introduced: None,
            deprecated: None,
            obsoleted: None,
            unavailable: true,
        }
    }

    /// Set the deprecation version.
    #[must_use]
    pub const fn deprecated_in(mut self, version: Version) -> Self {
        self.deprecated = Some(version);
        self
    }

    /// Set the obsoletion version.
    #[must_use]
    pub const fn obsoleted_in(mut self, version: Version) -> Self {
        self.obsoleted = Some(version);
        self
    }

    /// Start of the usable window; absent means "always existed".
    #[must_use]
    pub const fn lower_bound(&self) -> LowerBound {
        LowerBound::new(self.introduced)
    }

    /// End of the usable window: the tighter of deprecation and obsoletion.
    #[must_use]
    pub fn upper_bound(&self) -> UpperBound {
        UpperBound::new(self.deprecated).min(UpperBound::new(self.obsoleted))
    }

    /// True when the fact carries no information at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.introduced.is_none()
            && self.deprecated.is_none()
            && self.obsoleted.is_none()
            && !self.unavailable
    }
}

/// Availability of one declaration across all platforms.
///
/// Built once (by ingestion or by a merge) and never mutated afterwards:
/// fields are private and the builder methods consume `self`.
///
/// A missing platform entry means the declaration is unrestricted there.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclarationAvailability {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    platforms: BTreeMap<Platform, PlatformFact>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    always_deprecated: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    always_unavailable: bool,
}

impl DeclarationAvailability {
    /// An unrestricted declaration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the fact for `platform`, replacing any previous one.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform, fact: PlatformFact) -> Self {
        self.platforms.insert(platform, fact);
        self
    }

    /// Mark the declaration deprecated regardless of platform.
    #[must_use]
    pub fn deprecated_everywhere(mut self) -> Self {
        self.always_deprecated = true;
        self
    }

    /// Mark the declaration unavailable regardless of platform.
    #[must_use]
    pub fn unavailable_everywhere(mut self) -> Self {
        self.always_unavailable = true;
        self
    }

    /// The fact recorded for `platform`, if any.
    #[must_use]
    pub fn fact(&self, platform: Platform) -> Option<&PlatformFact> {
        self.platforms.get(&platform)
    }

    /// All recorded facts in canonical platform order.
    pub fn facts(&self) -> impl Iterator<Item = (Platform, &PlatformFact)> + '_ {
        self.platforms.iter().map(|(p, f)| (*p, f))
    }

    /// True when at least one platform fact is recorded.
    #[must_use]
    pub fn has_facts(&self) -> bool {
        !self.platforms.is_empty()
    }

    /// Whether the declaration is deprecated on every platform.
    #[must_use]
    pub const fn is_always_deprecated(&self) -> bool {
        self.always_deprecated
    }

    /// Whether the declaration is unavailable on every platform.
    #[must_use]
    pub const fn is_always_unavailable(&self) -> bool {
        self.always_unavailable
    }
}

/// Outcome of resolving a declaration against the configured targets.
///
/// Ordered from strictest to most permissive: `None < Some < All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Never usable within the configured targets
    None,
    /// Usable behind a runtime guard
    Some,
    /// Usable unconditionally
    All,
}

impl Classification {
    /// Combine the classifications of two platforms.
    ///
    /// Agreement keeps the shared value; any disagreement is `Some`.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        if self == other {
            self
        } else {
            Self::Some
        }
    }

    /// Whether generated code must guard uses at runtime.
    #[must_use]
    pub const fn needs_guard(self) -> bool {
        matches!(self, Self::Some)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Some => write!(f, "some"),
            Self::All => write!(f, "all"),
        }
    }
}

/// A named declaration together with its availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationRecord {
    /// Declaration name as it appears in the header
    pub name: String,

    /// Ingested availability facts
    pub availability: DeclarationAvailability,
}

/// Everything the emission layer needs for one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Declaration name
    pub name: String,

    /// Resolution outcome
    pub classification: Classification,

    /// Documentation text, only for guarded declarations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,

    /// Source-level availability attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,

    /// Runtime check descriptor, only for guarded declarations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_check: Option<RuntimeCheck>,
}

/// Counts of evaluations per classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Declarations evaluated
    pub total: usize,
    /// Unconditionally available
    pub all: usize,
    /// Conditionally available
    pub some: usize,
    /// Never available
    pub none: usize,
}

impl EvaluationSummary {
    /// Count one classification.
    pub fn record(&mut self, classification: Classification) {
        self.total += 1;
        match classification {
            Classification::All => self.all += 1,
            Classification::Some => self.some += 1,
            Classification::None => self.none += 1,
        }
    }
}

/// Result of evaluating a batch of declarations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// One entry per input declaration, in input order
    pub evaluations: Vec<Evaluation>,

    /// Summary statistics
    pub summary: EvaluationSummary,

    /// Timestamp of the evaluation
    pub timestamp: Option<DateTime<Utc>>,
}

impl EvaluationReport {
    /// Check if any declaration can never be used.
    #[must_use]
    pub fn has_unusable(&self) -> bool {
        self.summary.none > 0
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ReportFormat {
    /// Plain text format
    #[default]
    Text,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("10", Version::new(10, 0, 0) ; "major only")]
    #[test_case("10.12", Version::new(10, 12, 0) ; "major minor")]
    #[test_case("10.12.4", Version::new(10, 12, 4) ; "full triple")]
    #[test_case("v13.1", Version::new(13, 1, 0) ; "v prefix")]
    #[test_case(" 17.0 ", Version::new(17, 0, 0) ; "surrounding whitespace")]
    fn test_version_parse(input: &str, expected: Version) {
        assert_eq!(input.parse::<Version>().unwrap(), expected);
    }

    #[test]
    fn test_version_parse_rejects_garbage() {
        assert!("ten".parse::<Version>().is_err());
        assert!("10.x".parse::<Version>().is_err());
        assert!(matches!(
            "1.0.0-beta".parse::<Version>(),
            Err(crate::error::SdkGateError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn test_version_ordering_is_lexicographic() {
        assert!(Version::new(10, 9, 9) < Version::new(10, 10, 0));
        assert!(Version::new(9, 99, 99) < Version::new(10, 0, 0));
        assert!(Version::new(10, 12, 1) > Version::new(10, 12, 0));
        assert_eq!(Version::ZERO, Version::default());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(10, 12, 0).to_string(), "10.12");
        assert_eq!(Version::new(10, 12, 2).to_string(), "10.12.2");
    }

    #[test]
    fn test_version_serializes_as_string() {
        let json = serde_json::to_string(&Version::new(11, 0, 0)).unwrap();
        assert_eq!(json, "\"11.0\"");
        let back: Version = serde_json::from_str("\"10.15.7\"").unwrap();
        assert_eq!(back, Version::new(10, 15, 7));
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("macOS".parse::<Platform>().unwrap(), Platform::Macos);
        assert_eq!("iOS".parse::<Platform>().unwrap(), Platform::Ios);
        assert!("android".parse::<Platform>().is_err());
    }

    #[test_case("\"macos\"" ; "lowercase")]
    #[test_case("\"macOS\"" ; "mixed case")]
    #[test_case("\"MACOS\"" ; "uppercase")]
    fn test_platform_deserializes_case_insensitively(json: &str) {
        assert_eq!(serde_json::from_str::<Platform>(json).unwrap(), Platform::Macos);
    }

    #[test]
    fn test_platform_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Platform::Visionos).unwrap(), "\"visionos\"");
        assert!(serde_json::from_str::<Platform>("\"android\"").is_err());
    }

    #[test]
    fn test_platform_all_is_ordered() {
        let mut sorted = Platform::ALL;
        sorted.sort();
        assert_eq!(sorted, Platform::ALL);
    }

    #[test]
    fn test_upper_bound_takes_tighter_end() {
        let fact = PlatformFact::introduced(Version::new(10, 0, 0))
            .deprecated_in(Version::new(10, 14, 0))
            .obsoleted_in(Version::new(10, 12, 0));
        assert_eq!(fact.upper_bound(), UpperBound::at(Version::new(10, 12, 0)));

        let only_obsoleted = PlatformFact::default().obsoleted_in(Version::new(11, 0, 0));
        assert_eq!(only_obsoleted.upper_bound(), UpperBound::at(Version::new(11, 0, 0)));
        assert!(PlatformFact::default().upper_bound().is_unbounded());
    }

    #[test]
    fn test_classification_combine() {
        use Classification as C;
        assert_eq!(C::All.combine(C::All), C::All);
        assert_eq!(C::None.combine(C::None), C::None);
        assert_eq!(C::All.combine(C::None), C::Some);
        assert_eq!(C::Some.combine(C::All), C::Some);
        assert!(C::None < C::Some && C::Some < C::All);
    }

    #[test]
    fn test_summary_record() {
        let mut summary = EvaluationSummary::default();
        summary.record(Classification::All);
        summary.record(Classification::Some);
        summary.record(Classification::Some);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.some, 2);
        assert_eq!(summary.none, 0);
    }

    #[test]
    fn test_declaration_availability_json_shape() {
        let avail = DeclarationAvailability::new()
            .with_platform(Platform::Macos, PlatformFact::introduced(Version::new(10, 12, 0)))
            .with_platform(Platform::Ios, PlatformFact::unavailable());
        let value = serde_json::to_value(&avail).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "platforms": {
                    "macos": { "introduced": "10.12" },
                    "ios": { "unavailable": true }
                }
            })
        );
    }
}
