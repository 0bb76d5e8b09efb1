//! Availability resolution.
//!
//! Classifies one declaration against the configured deployment targets.

use crate::analyzer::interval::ApiWindow;
use crate::config::DeploymentTargets;
use crate::types::{Classification, DeclarationAvailability};

/// Resolver for declaration availability against deployment targets.
///
/// # Algorithm Overview
///
/// ## Phase 0: Escape hatch
///
/// With no constrained platform at all, every declaration is `All`. Users
/// who do not care about deployment targets get unguarded output.
///
/// ## Phase 1: Absolute overrides
///
/// `always_deprecated` or `always_unavailable` yields `None`.
///
/// ## Phase 2: Per-platform classification
///
/// Each constrained platform classifies the declaration's window against
/// its target window. A platform without a fact contributes `All`.
/// Unconstrained platforms are skipped and cannot veto anything.
///
/// ```text
/// macos  target [10.13, +inf)  fact introduced 10.12     -> all
/// ios    target [12.0, +inf)   fact unavailable          -> none
/// tvos   not configured        fact introduced 15.0      -> skipped
///                                               combined -> some
/// ```
///
/// ## Phase 3: Combination
///
/// Agreement across platforms keeps the shared value, disagreement is
/// `Some`. No contribution at all is `None`.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityResolver<'a> {
    targets: &'a DeploymentTargets,
}

impl<'a> AvailabilityResolver<'a> {
    /// Create a resolver over read-only target configuration.
    #[must_use]
    pub const fn new(targets: &'a DeploymentTargets) -> Self {
        Self { targets }
    }

    /// Classify `availability` against the configured targets.
    #[must_use]
    pub fn resolve(&self, availability: &DeclarationAvailability) -> Classification {
        if !self.targets.any_constrained() {
            tracing::trace!("No deployment targets configured, treating as available");
            return Classification::All;
        }

        if availability.is_always_deprecated() || availability.is_always_unavailable() {
            tracing::debug!(
                always_deprecated = availability.is_always_deprecated(),
                always_unavailable = availability.is_always_unavailable(),
                "Declaration is unusable on every platform"
            );
            return Classification::None;
        }

        let combined = self
            .targets
            .iter_constrained()
            .map(|(platform, range)| {
                let local = availability.fact(platform).map_or(Classification::All, |fact| {
                    ApiWindow::from_fact(fact).classify(&range.window())
                });
                tracing::debug!(%platform, classification = %local, "Classified platform");
                local
            })
            .reduce(Classification::combine);

        combined.unwrap_or(Classification::None)
    }
}

/// Classify `availability` against `targets`.
#[must_use]
pub fn resolve(
    availability: &DeclarationAvailability,
    targets: &DeploymentTargets,
) -> Classification {
    AvailabilityResolver::new(targets).resolve(availability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetRange;
    use crate::types::{Platform, PlatformFact, Version};
    use quickcheck::{quickcheck, Arbitrary, Gen};

    fn v(major: u64, minor: u64) -> Version {
        Version::new(major, minor, 0)
    }

    fn macos_ios(macos: TargetRange, ios: TargetRange) -> DeploymentTargets {
        DeploymentTargets::new()
            .with(Platform::Macos, macos)
            .with(Platform::Ios, ios)
    }

    #[test]
    fn test_no_targets_no_facts_is_all() {
        let targets = DeploymentTargets::new();
        assert_eq!(resolve(&DeclarationAvailability::new(), &targets), Classification::All);
    }

    #[test]
    fn test_no_targets_overrides_always_unavailable() {
        let targets = DeploymentTargets::new().with(Platform::Macos, TargetRange::default());
        let avail = DeclarationAvailability::new()
            .unavailable_everywhere()
            .with_platform(Platform::Macos, PlatformFact::unavailable());
        assert_eq!(resolve(&avail, &targets), Classification::All);
    }

    #[test]
    fn test_always_unavailable_with_targets_is_none() {
        let targets = DeploymentTargets::new().with(Platform::Ios, TargetRange::from_min(v(9, 0)));
        let avail = DeclarationAvailability::new()
            .unavailable_everywhere()
            .with_platform(Platform::Ios, PlatformFact::introduced(v(2, 0)));
        assert_eq!(resolve(&avail, &targets), Classification::None);

        let deprecated = DeclarationAvailability::new().deprecated_everywhere();
        assert_eq!(resolve(&deprecated, &targets), Classification::None);
    }

    #[test]
    fn test_introduced_at_target_min_is_all() {
        let targets =
            DeploymentTargets::new().with(Platform::Macos, TargetRange::from_min(v(12, 0)));
        let avail = DeclarationAvailability::new()
            .with_platform(Platform::Macos, PlatformFact::introduced(v(12, 0)));
        assert_eq!(resolve(&avail, &targets), Classification::All);
    }

    #[test]
    fn test_deprecated_after_target_window_is_all() {
        let targets = DeploymentTargets::new()
            .with(Platform::Macos, TargetRange::between(v(10, 0), v(10, 10)));
        let avail = DeclarationAvailability::new().with_platform(
            Platform::Macos,
            PlatformFact::introduced(v(10, 0)).deprecated_in(v(10, 12)),
        );
        assert_eq!(resolve(&avail, &targets), Classification::All);
    }

    #[test]
    fn test_unavailable_on_one_configured_platform_is_some() {
        let targets = macos_ios(TargetRange::from_min(v(10, 0)), TargetRange::from_min(v(10, 0)));
        let avail = DeclarationAvailability::new()
            .with_platform(Platform::Macos, PlatformFact::unavailable());
        assert_eq!(resolve(&avail, &targets), Classification::Some);
    }

    #[test]
    fn test_restriction_on_unconfigured_platform_is_ignored() {
        let targets =
            DeploymentTargets::new().with(Platform::Macos, TargetRange::from_min(v(10, 13)));
        let avail = DeclarationAvailability::new()
            .with_platform(Platform::Ios, PlatformFact::unavailable())
            .with_platform(Platform::Watchos, PlatformFact::introduced(v(99, 0)));
        assert_eq!(resolve(&avail, &targets), Classification::All);
    }

    #[test]
    fn test_unavailable_everywhere_configured_is_none() {
        let targets = macos_ios(TargetRange::from_min(v(10, 0)), TargetRange::from_min(v(10, 0)));
        let avail = DeclarationAvailability::new()
            .with_platform(Platform::Macos, PlatformFact::unavailable())
            .with_platform(Platform::Ios, PlatformFact::unavailable());
        assert_eq!(resolve(&avail, &targets), Classification::None);
    }

    #[test]
    fn test_newer_than_target_is_some() {
        let targets = DeploymentTargets::new().with(Platform::Ios, TargetRange::from_min(v(12, 0)));
        let avail = DeclarationAvailability::new()
            .with_platform(Platform::Ios, PlatformFact::introduced(v(14, 0)));
        assert_eq!(resolve(&avail, &targets), Classification::Some);
    }

    #[test]
    fn test_trivial_range_counts_as_unconfigured() {
        let targets = macos_ios(TargetRange::default(), TargetRange::from_min(v(12, 0)));
        let avail = DeclarationAvailability::new()
            .with_platform(Platform::Macos, PlatformFact::unavailable())
            .with_platform(Platform::Ios, PlatformFact::introduced(v(11, 0)));
        assert_eq!(resolve(&avail, &targets), Classification::All);
    }

    /// A single-platform setup with small version numbers so quickcheck
    /// hits boundaries often.
    #[derive(Debug, Clone)]
    struct Case {
        fact: PlatformFact,
        outer: (u64, u64),
        inner: (u64, u64),
    }

    fn small_version(g: &mut Gen) -> Version {
        Version::new(u64::from(u8::arbitrary(g) % 8), 0, 0)
    }

    fn small_option(g: &mut Gen) -> Option<Version> {
        if bool::arbitrary(g) {
            Some(small_version(g))
        } else {
            None
        }
    }

    impl Arbitrary for Case {
        fn arbitrary(g: &mut Gen) -> Self {
            let fact = PlatformFact {
                introduced: small_option(g),
                deprecated: small_option(g),
                obsoleted: small_option(g),
                unavailable: u8::arbitrary(g) % 5 == 0,
            };
            let mut outer = [u64::from(u8::arbitrary(g) % 8), u64::from(u8::arbitrary(g) % 8)];
            outer.sort_unstable();
            let lo = outer[0] + u64::from(u8::arbitrary(g)) % (outer[1] - outer[0] + 1);
            let hi = lo + u64::from(u8::arbitrary(g)) % (outer[1] - lo + 1);
            Self {
                fact,
                outer: (outer[0], outer[1]),
                inner: (lo, hi),
            }
        }
    }

    fn classify_with(fact: PlatformFact, (min, max): (u64, u64)) -> Classification {
        let targets = DeploymentTargets::new()
            .with(
                Platform::Macos,
                TargetRange::between(Version::new(min, 0, 0), Version::new(max, 0, 0)),
            );
        let avail = DeclarationAvailability::new().with_platform(Platform::Macos, fact);
        resolve(&avail, &targets)
    }

    quickcheck! {
        fn prop_shrinking_target_never_loses_all(case: Case) -> bool {
            classify_with(case.fact, case.outer) != Classification::All
                || classify_with(case.fact, case.inner) == Classification::All
        }

        fn prop_shrinking_target_never_gains_from_none(case: Case) -> bool {
            classify_with(case.fact, case.outer) != Classification::None
                || classify_with(case.fact, case.inner) == Classification::None
        }

        fn prop_unavailable_with_targets_is_none(case: Case) -> bool {
            let targets = DeploymentTargets::new()
                .with(Platform::Ios, TargetRange::from_min(Version::new(case.outer.0, 0, 0)));
            let avail = DeclarationAvailability::new()
                .unavailable_everywhere()
                .with_platform(Platform::Ios, case.fact);
            resolve(&avail, &targets) == Classification::None
        }
    }
}
