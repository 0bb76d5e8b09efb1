//! Renderer adapters.
//!
//! Turns resolved availability into the three artifacts the emission layer
//! consumes: documentation text, a source-level attribute, and a runtime
//! check descriptor. Placement and final syntax belong to the emission
//! layer.
//!
//! ```text
//! documentation   macos: introduced=10.12, deprecated=10.15
//!                 ios: unavailable
//! attribute       macos(introduced=10.12, deprecated=10.15), ios(unavailable)
//! runtime check   [{macos, unavailable: false, introduced: (10, 12, 0)},
//!                  {ios,   unavailable: true,  introduced: none}]
//! ```

use crate::types::{Classification, DeclarationAvailability, Platform, PlatformFact};
use serde::{Deserialize, Serialize};

/// Runtime check input for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCheck {
    /// Platform the check applies to
    pub platform: Platform,
    /// The declaration never exists on this platform
    pub unavailable: bool,
    /// Minimum OS version to check for
    pub introduced: Option<(u64, u64, u64)>,
}

/// Structured descriptor for a guarded call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeCheck {
    /// One entry per platform with a fact, in canonical order
    pub platforms: Vec<PlatformCheck>,
}

/// Present fields of a fact as `name=version` items.
fn fields(fact: &PlatformFact) -> Vec<String> {
    [
        ("introduced", fact.introduced),
        ("deprecated", fact.deprecated),
        ("obsoleted", fact.obsoleted),
    ]
    .into_iter()
    .filter_map(|(name, version)| version.map(|v| format!("{name}={v}")))
    .collect()
}

/// Render one fact body, or nothing when the fact is empty.
fn describe(fact: &PlatformFact) -> Option<String> {
    if fact.unavailable {
        return Some("unavailable".to_string());
    }
    let fields = fields(fact);
    if fields.is_empty() {
        None
    } else {
        Some(fields.join(", "))
    }
}

/// Documentation lines for a guarded declaration.
///
/// Only `Some` classifications get text: unconditional declarations need no
/// note and unusable ones are not emitted.
#[must_use]
pub fn documentation(
    availability: &DeclarationAvailability,
    classification: Classification,
) -> Option<String> {
    if !classification.needs_guard() {
        return None;
    }
    let lines: Vec<String> = availability
        .facts()
        .filter_map(|(platform, fact)| describe(fact).map(|body| format!("{platform}: {body}")))
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Source-level availability attribute.
///
/// Independent of classification: any declaration with facts carries one.
#[must_use]
pub fn attribute(availability: &DeclarationAvailability) -> Option<String> {
    let clauses: Vec<String> = availability
        .facts()
        .filter_map(|(platform, fact)| describe(fact).map(|body| format!("{platform}({body})")))
        .collect();
    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(", "))
    }
}

/// Runtime check descriptor, produced only when a guard is needed.
#[must_use]
pub fn runtime_check(
    availability: &DeclarationAvailability,
    classification: Classification,
) -> Option<RuntimeCheck> {
    if !classification.needs_guard() || !availability.has_facts() {
        return None;
    }
    let platforms = availability
        .facts()
        .map(|(platform, fact)| PlatformCheck {
            platform,
            unavailable: fact.unavailable,
            introduced: fact.introduced.map(crate::types::Version::as_triple),
        })
        .collect();
    Some(RuntimeCheck { platforms })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Version;
    use pretty_assertions::assert_eq;

    fn v(major: u64, minor: u64) -> Version {
        Version::new(major, minor, 0)
    }

    fn sample() -> DeclarationAvailability {
        DeclarationAvailability::new()
            .with_platform(
                Platform::Macos,
                PlatformFact::introduced(v(10, 12)).deprecated_in(v(10, 15)),
            )
            .with_platform(Platform::Ios, PlatformFact::unavailable())
    }

    #[test]
    fn test_documentation_only_for_some() {
        let avail = sample();
        assert_eq!(
            documentation(&avail, Classification::Some).as_deref(),
            Some("macos: introduced=10.12, deprecated=10.15\nios: unavailable")
        );
        assert_eq!(documentation(&avail, Classification::All), None);
        assert_eq!(documentation(&avail, Classification::None), None);
        assert_eq!(documentation(&DeclarationAvailability::new(), Classification::Some), None);
    }

    #[test]
    fn test_attribute_independent_of_classification() {
        assert_eq!(
            attribute(&sample()).as_deref(),
            Some("macos(introduced=10.12, deprecated=10.15), ios(unavailable)")
        );
        assert_eq!(attribute(&DeclarationAvailability::new()), None);
    }

    #[test]
    fn test_unavailable_hides_versions() {
        let mut fact = PlatformFact::introduced(v(9, 0));
        fact.unavailable = true;
        let avail = DeclarationAvailability::new().with_platform(Platform::Tvos, fact);
        assert_eq!(attribute(&avail).as_deref(), Some("tvos(unavailable)"));
    }

    #[test]
    fn test_empty_fact_is_skipped() {
        let avail = DeclarationAvailability::new()
            .with_platform(Platform::Macos, PlatformFact::default())
            .with_platform(Platform::Ios, PlatformFact::default().obsoleted_in(v(13, 0)));
        assert_eq!(attribute(&avail).as_deref(), Some("ios(obsoleted=13.0)"));
        let only_empty =
            DeclarationAvailability::new().with_platform(Platform::Macos, PlatformFact::default());
        assert_eq!(attribute(&only_empty), None);
    }

    #[test]
    fn test_runtime_check_descriptor() {
        let avail = sample();
        assert_eq!(
            runtime_check(&avail, Classification::Some),
            Some(RuntimeCheck {
                platforms: vec![
                    PlatformCheck {
                        platform: Platform::Macos,
                        unavailable: false,
                        introduced: Some((10, 12, 0)),
                    },
                    PlatformCheck {
                        platform: Platform::Ios,
                        unavailable: true,
                        introduced: None,
                    },
                ],
            })
        );
        assert_eq!(runtime_check(&avail, Classification::All), None);
        assert_eq!(runtime_check(&DeclarationAvailability::new(), Classification::Some), None);
    }
}
