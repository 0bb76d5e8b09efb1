//! Merging availability of composed declarations.
//!
//! A construct synthesized from several declarations is usable only where
//! every input is usable, so merging tightens each bound: the later start
//! and the earlier end win. The operation is commutative and associative,
//! so any number of inputs can be folded pairwise in any order.
//!
//! Deprecation and obsoletion are merged field by field. Because the
//! effective end of a window is `min(deprecated, obsoleted)`, and `min` is
//! commutative and associative, the merged effective end equals the minimum
//! of the inputs' effective ends. Field-wise merging therefore resolves
//! exactly like collapsing each input to its effective end first, while
//! still letting the renderer tell the two fields apart.

use crate::analyzer::interval::UpperBound;
use crate::types::{DeclarationAvailability, PlatformFact};

/// Combine two facts for the same platform.
#[must_use]
pub fn merge_facts(a: &PlatformFact, b: &PlatformFact) -> PlatformFact {
    PlatformFact {
        introduced: a.lower_bound().max(b.lower_bound()).get(),
        deprecated: UpperBound::new(a.deprecated).min(UpperBound::new(b.deprecated)).get(),
        obsoleted: UpperBound::new(a.obsoleted).min(UpperBound::new(b.obsoleted)).get(),
        unavailable: a.unavailable || b.unavailable,
    }
}

/// Availability of a construct that requires both `a` and `b`.
#[must_use]
pub fn merge(a: &DeclarationAvailability, b: &DeclarationAvailability) -> DeclarationAvailability {
    let mut merged = DeclarationAvailability::new();
    if a.is_always_deprecated() || b.is_always_deprecated() {
        merged = merged.deprecated_everywhere();
    }
    if a.is_always_unavailable() || b.is_always_unavailable() {
        merged = merged.unavailable_everywhere();
    }

    for (platform, fact) in a.facts() {
        let combined = b.fact(platform).map_or(*fact, |other| merge_facts(fact, other));
        merged = merged.with_platform(platform, combined);
    }
    for (platform, fact) in b.facts() {
        if a.fact(platform).is_none() {
            merged = merged.with_platform(platform, *fact);
        }
    }

    tracing::trace!(
        left = a.facts().count(),
        right = b.facts().count(),
        merged = merged.facts().count(),
        "Merged declaration availability"
    );
    merged
}

/// Fold any number of inputs. An empty input is unrestricted.
#[must_use]
pub fn merge_all<'a, I>(inputs: I) -> DeclarationAvailability
where
    I: IntoIterator<Item = &'a DeclarationAvailability>,
{
    inputs
        .into_iter()
        .fold(DeclarationAvailability::new(), |acc, next| merge(&acc, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Platform, Version};
    use pretty_assertions::assert_eq;
    use quickcheck::{quickcheck, Arbitrary, Gen};

    fn v(major: u64, minor: u64) -> Version {
        Version::new(major, minor, 0)
    }

    #[test]
    fn test_merge_facts_tightens_window() {
        let a = PlatformFact::introduced(v(10, 0)).deprecated_in(v(12, 0));
        let b = PlatformFact::introduced(v(11, 0)).deprecated_in(v(13, 0)).obsoleted_in(v(14, 0));
        assert_eq!(
            merge_facts(&a, &b),
            PlatformFact::introduced(v(11, 0)).deprecated_in(v(12, 0)).obsoleted_in(v(14, 0))
        );
    }

    #[test]
    fn test_absent_side_imposes_no_bound() {
        let a = PlatformFact::default();
        let b = PlatformFact::introduced(v(10, 0)).obsoleted_in(v(11, 0));
        assert_eq!(merge_facts(&a, &b), b);
        assert_eq!(merge_facts(&a, &a), a);
    }

    #[test]
    fn test_cross_field_ends_keep_effective_bound() {
        let only_deprecated = PlatformFact::default().deprecated_in(v(10, 0));
        let only_obsoleted = PlatformFact::default().obsoleted_in(v(9, 0));
        let merged = merge_facts(&only_deprecated, &only_obsoleted);
        assert_eq!(merged.deprecated, Some(v(10, 0)));
        assert_eq!(merged.obsoleted, Some(v(9, 0)));
        assert_eq!(merged.upper_bound(), UpperBound::at(v(9, 0)));
    }

    #[test]
    fn test_merge_with_fact_free_input() {
        let a = DeclarationAvailability::new()
            .with_platform(Platform::Macos, PlatformFact::introduced(v(10, 0)));
        let b = DeclarationAvailability::new()
            .with_platform(Platform::Ios, PlatformFact::introduced(v(12, 0)));
        let c = DeclarationAvailability::new();

        let merged = merge_all([&a, &b, &c]);
        assert_eq!(
            merged,
            DeclarationAvailability::new()
                .with_platform(Platform::Macos, PlatformFact::introduced(v(10, 0)))
                .with_platform(Platform::Ios, PlatformFact::introduced(v(12, 0)))
        );
    }

    #[test]
    fn test_shared_platform_picks_later_introduction() {
        let a = DeclarationAvailability::new()
            .with_platform(Platform::Macos, PlatformFact::introduced(v(10, 0)));
        let b = DeclarationAvailability::new()
            .with_platform(Platform::Macos, PlatformFact::introduced(v(12, 0)));
        let merged = merge(&a, &b);
        assert_eq!(merged.fact(Platform::Macos), Some(&PlatformFact::introduced(v(12, 0))));
    }

    #[test]
    fn test_override_flags_are_ored() {
        let a = DeclarationAvailability::new().deprecated_everywhere();
        let b = DeclarationAvailability::new().unavailable_everywhere();
        let merged = merge(&a, &b);
        assert!(merged.is_always_deprecated());
        assert!(merged.is_always_unavailable());
        let empty = DeclarationAvailability::new();
        assert!(!merge(&empty, &empty).is_always_deprecated());
    }

    #[test]
    fn test_merge_all_empty_is_unrestricted() {
        assert_eq!(merge_all(std::iter::empty()), DeclarationAvailability::new());
    }

    /// Every fact over a tiny version domain, including all-absent fields.
    fn fact_domain() -> Vec<PlatformFact> {
        let versions = [None, Some(v(1, 0)), Some(v(2, 0))];
        let mut out = Vec::new();
        for introduced in versions {
            for deprecated in versions {
                for obsoleted in versions {
                    for unavailable in [false, true] {
                        out.push(PlatformFact { introduced, deprecated, obsoleted, unavailable });
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_merge_facts_laws_exhaustive() {
        let domain = fact_domain();
        for a in &domain {
            for b in &domain {
                let ab = merge_facts(a, b);
                assert_eq!(ab, merge_facts(b, a));
                for c in &domain {
                    assert_eq!(merge_facts(&ab, c), merge_facts(a, &merge_facts(b, c)));
                }
            }
        }
    }

    #[derive(Debug, Clone)]
    struct Avail(DeclarationAvailability);

    fn arbitrary_version(g: &mut Gen) -> Option<Version> {
        match u8::arbitrary(g) % 4 {
            0 => None,
            n => Some(Version::new(u64::from(n) + 9, u64::from(u8::arbitrary(g) % 3), 0)),
        }
    }

    impl Arbitrary for Avail {
        fn arbitrary(g: &mut Gen) -> Self {
            let mut avail = DeclarationAvailability::new();
            for platform in [Platform::Macos, Platform::Ios, Platform::Tvos] {
                if bool::arbitrary(g) {
                    let fact = PlatformFact {
                        introduced: arbitrary_version(g),
                        deprecated: arbitrary_version(g),
                        obsoleted: arbitrary_version(g),
                        unavailable: u8::arbitrary(g) % 4 == 0,
                    };
                    avail = avail.with_platform(platform, fact);
                }
            }
            if u8::arbitrary(g) % 6 == 0 {
                avail = avail.deprecated_everywhere();
            }
            if u8::arbitrary(g) % 6 == 0 {
                avail = avail.unavailable_everywhere();
            }
            Self(avail)
        }
    }

    quickcheck! {
        fn prop_merge_commutative(a: Avail, b: Avail) -> bool {
            merge(&a.0, &b.0) == merge(&b.0, &a.0)
        }

        fn prop_merge_associative(a: Avail, b: Avail, c: Avail) -> bool {
            merge(&merge(&a.0, &b.0), &c.0) == merge(&a.0, &merge(&b.0, &c.0))
        }

        fn prop_empty_is_identity(a: Avail) -> bool {
            merge(&a.0, &DeclarationAvailability::new()) == a.0
        }
    }
}
