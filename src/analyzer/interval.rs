//! Version interval semantics.
//!
//! Availability data uses "absent" in two opposite directions, and mixing
//! them up silently flips results. The two directions get distinct types:
//!
//! - [`LowerBound`]: absent means `0.0.0` (introduced, configured minimum).
//! - [`UpperBound`]: absent means past every finite version (deprecated,
//!   obsoleted, configured maximum).
//!
//! ```text
//!   API window      [introduced ........ min(deprecated, obsoleted))
//!   target window        [min ......... max]
//!
//!   all   API window contains the whole target window
//!   some  the windows overlap
//!   none  disjoint, or the API window is empty
//! ```

use crate::types::{Classification, PlatformFact, Version};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Start of a version window. Absent means the window starts at `0.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LowerBound(Option<Version>);

impl LowerBound {
    /// No lower bound: the window reaches back to `0.0.0`.
    pub const UNBOUNDED: Self = Self(None);

    /// Wrap an optional version.
    #[must_use]
    pub const fn new(version: Option<Version>) -> Self {
        Self(version)
    }

    /// A concrete lower bound.
    #[must_use]
    pub const fn at(version: Version) -> Self {
        Self(Some(version))
    }

    /// The underlying optional version.
    #[must_use]
    pub const fn get(self) -> Option<Version> {
        self.0
    }

    /// The effective first version of the window.
    #[must_use]
    pub fn version(self) -> Version {
        self.0.unwrap_or(Version::ZERO)
    }

    /// Whether this window starts no later than `other`.
    #[must_use]
    pub fn starts_by(self, other: Self) -> bool {
        self.version() <= other.version()
    }

    /// The later of two starts. A missing bound imposes nothing, so the
    /// result is absent only when both sides are.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        match (self.0, other.0) {
            (None, b) => Self(b),
            (a, None) => Self(a),
            (Some(a), Some(b)) => Self(Some(a.max(b))),
        }
    }
}

impl fmt::Display for LowerBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => write!(f, "-inf"),
        }
    }
}

/// End of a version window. Absent means the window never ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpperBound(Option<Version>);

impl UpperBound {
    /// No upper bound: the window extends indefinitely.
    pub const UNBOUNDED: Self = Self(None);

    /// Wrap an optional version.
    #[must_use]
    pub const fn new(version: Option<Version>) -> Self {
        Self(version)
    }

    /// A concrete upper bound.
    #[must_use]
    pub const fn at(version: Version) -> Self {
        Self(Some(version))
    }

    /// The underlying optional version.
    #[must_use]
    pub const fn get(self) -> Option<Version> {
        self.0
    }

    /// Whether the window extends indefinitely.
    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        self.0.is_none()
    }

    /// Strict comparison under the infinity convention.
    ///
    /// An unbounded `self` is greater than anything, including another
    /// unbounded value. A bounded `self` is never greater than an unbounded
    /// `other`.
    #[must_use]
    pub fn gt(self, other: Self) -> bool {
        match (self.0, other.0) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(a), Some(b)) => a > b,
        }
    }

    /// Whether a point strictly below this bound exists at `version`,
    /// i.e. an exclusive end still admits `version`.
    #[must_use]
    pub fn exceeds(self, version: Version) -> bool {
        self.0.is_none_or(|end| end > version)
    }

    /// Whether an inclusive end admits `version`.
    #[must_use]
    pub fn reaches(self, version: Version) -> bool {
        self.0.is_none_or(|end| version <= end)
    }

    /// The earlier of two ends. A missing bound imposes nothing, so the
    /// result is absent only when both sides are.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        match (self.0, other.0) {
            (None, b) => Self(b),
            (a, None) => Self(a),
            (Some(a), Some(b)) => Self(Some(a.min(b))),
        }
    }
}

impl fmt::Display for UpperBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => write!(f, "+inf"),
        }
    }
}

/// Half-open window `[start, end)` in which a declaration is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiWindow {
    /// First usable version
    pub start: LowerBound,
    /// First version no longer usable
    pub end: UpperBound,
    /// Set when the platform marks the declaration unavailable
    pub unavailable: bool,
}

impl ApiWindow {
    /// Build the window described by a platform fact.
    #[must_use]
    pub fn from_fact(fact: &PlatformFact) -> Self {
        Self {
            start: fact.lower_bound(),
            end: fact.upper_bound(),
            unavailable: fact.unavailable,
        }
    }

    /// True when no version at all is usable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unavailable || !self.end.exceeds(self.start.version())
    }

    /// Classify this window against a configured target window.
    #[must_use]
    pub fn classify(&self, target: &TargetWindow) -> Classification {
        if self.is_empty() {
            tracing::trace!(start = %self.start, end = %self.end, "API window is empty");
            return Classification::None;
        }

        let covers_start = self.start.starts_by(target.min);
        let covers_end = self.end.gt(target.max);
        if covers_start && covers_end {
            return Classification::All;
        }

        let overlaps =
            target.max.reaches(self.start.version()) && self.end.exceeds(target.min.version());
        tracing::trace!(
            start = %self.start,
            end = %self.end,
            target_min = %target.min,
            target_max = %target.max,
            overlaps,
            "Compared API window with target window"
        );
        if overlaps {
            Classification::Some
        } else {
            Classification::None
        }
    }
}

/// Closed window `[min, max]` of deployment versions the output must support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetWindow {
    /// Oldest supported version
    pub min: LowerBound,
    /// Newest supported version
    pub max: UpperBound,
}

impl TargetWindow {
    /// Build a target window from optional bounds.
    #[must_use]
    pub const fn new(min: Option<Version>, max: Option<Version>) -> Self {
        Self {
            min: LowerBound::new(min),
            max: UpperBound::new(max),
        }
    }
}
