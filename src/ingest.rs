//! Declaration fact ingestion.
//!
//! Reads the JSON document produced by a header scanner and turns it into
//! immutable [`DeclarationRecord`]s. Header parsing itself happens upstream;
//! this module only validates and normalizes the extracted facts.
//!
//! # Document Format
//!
//! ```json
//! [
//!   {
//!     "name": "NSUserActivity",
//!     "platforms": {
//!       "macos": { "introduced": "10.10" },
//!       "ios": { "introduced": "8.0", "deprecated": "17.0" },
//!       "driverkit": { "unavailable": true }
//!     }
//!   },
//!   { "name": "NSLegacyThing", "always_deprecated": true }
//! ]
//! ```
//!
//! Unrecognized platform keys (`driverkit` above) are dropped with a
//! warning. Malformed versions are reported per declaration, all at once.

use crate::error::{ErrorCollector, Result, ResultExt, SdkGateError};
use crate::types::{DeclarationAvailability, DeclarationRecord, Platform, PlatformFact, Version};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeclaration {
    name: String,
    #[serde(default)]
    always_deprecated: bool,
    #[serde(default)]
    always_unavailable: bool,
    #[serde(default)]
    platforms: BTreeMap<String, RawFact>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawFact {
    introduced: Option<String>,
    deprecated: Option<String>,
    obsoleted: Option<String>,
    unavailable: bool,
}

/// Load declaration records from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a valid fact
/// document, or any declaration holds a malformed version.
pub fn load_declarations(path: &Path) -> Result<Vec<DeclarationRecord>> {
    tracing::debug!(path = %path.display(), "Loading declaration facts");
    let content = std::fs::read_to_string(path).with_path(path)?;
    parse_declarations(&content, path)
}

/// Parse declaration records from a JSON string.
///
/// `origin` is only used for error messages.
///
/// # Errors
///
/// Returns `FactsParse` for structural problems and `InvalidDeclaration`
/// (or `Multiple`) for malformed versions.
pub fn parse_declarations(content: &str, origin: &Path) -> Result<Vec<DeclarationRecord>> {
    let raw: Vec<RawDeclaration> = serde_json::from_str(content).map_err(|e| {
        crate::err!(FactsParse {
            file: origin.to_path_buf(),
            message: e.to_string(),
        })
    })?;

    let mut errors = ErrorCollector::new();
    let mut records = Vec::with_capacity(raw.len());
    for declaration in raw {
        match convert(declaration) {
            Ok(record) => records.push(record),
            Err(e) => errors.add(e),
        }
    }
    errors.into_result()?;

    tracing::info!(
        path = %origin.display(),
        declarations = records.len(),
        "Declaration facts loaded"
    );
    Ok(records)
}

fn convert(raw: RawDeclaration) -> Result<DeclarationRecord> {
    let mut availability = DeclarationAvailability::new();
    if raw.always_deprecated {
        availability = availability.deprecated_everywhere();
    }
    if raw.always_unavailable {
        availability = availability.unavailable_everywhere();
    }

    let mut problems = Vec::new();
    for (key, fact) in raw.platforms {
        let Ok(platform) = key.parse::<Platform>() else {
            tracing::warn!(
                declaration = %raw.name,
                platform = %key,
                "Ignoring unrecognized platform"
            );
            continue;
        };
        if availability.fact(platform).is_some() {
            problems.push(format!("platform '{platform}' is listed more than once (as '{key}')"));
            continue;
        }
        let mut version = |field: &str, value: Option<String>| -> Option<Version> {
            let value = value?;
            value
                .parse()
                .map_err(|e: SdkGateError| {
                    problems.push(format!("{platform}.{field} '{value}': {e}"));
                })
                .ok()
        };
        let parsed = PlatformFact {
            introduced: version("introduced", fact.introduced),
            deprecated: version("deprecated", fact.deprecated),
            obsoleted: version("obsoleted", fact.obsoleted),
            unavailable: fact.unavailable,
        };
        availability = availability.with_platform(platform, parsed);
    }

    if !problems.is_empty() {
        return Err(crate::err!(InvalidDeclaration {
            name: raw.name,
            message: problems.join("; "),
        }));
    }

    Ok(DeclarationRecord {
        name: raw.name,
        availability,
    })
}
