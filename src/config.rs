//! Configuration module for SdkGate.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`sdkgate.yaml`)
//! - Environment variables
//! - CLI arguments
//!
//! # Configuration File Format
//!
//! ```yaml
//! # sdkgate.yaml
//!
//! # Deployment targets per platform. Platforms left out do not
//! # constrain anything.
//! targets:
//!   macos:
//!     min: "10.13"
//!   ios:
//!     min: "12.0"
//!     max: ${SDKGATE_IOS_MAX}  # Environment variable expansion
//!
//! # Resolution options
//! resolve:
//!   parallel: true
//!
//! # Output options
//! output:
//!   colored: true
//!   verbose: false
//!   pretty: true
//! ```
//!
//! Configuration is loaded once and is read-only afterwards; it is shared
//! freely across concurrent resolutions.

use crate::analyzer::TargetWindow;
use crate::error::{Result, SdkGateError};
use crate::types::{Platform, Version};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Configured deployment range for one platform.
///
/// Absent `min` means "from the beginning of time"; absent `max` means
/// "indefinitely into the future".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetRange {
    /// Oldest OS version the generated output must run on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Version>,

    /// Newest OS version the generated output must run on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Version>,
}

impl TargetRange {
    /// A range with only a minimum.
    #[must_use]
    pub const fn from_min(min: Version) -> Self {
        Self { min: Some(min), max: None }
    }

    /// A range with both ends.
    #[must_use]
    pub const fn between(min: Version, max: Version) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    /// Whether the range actually restricts anything.
    #[must_use]
    pub const fn is_constrained(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// The range as an interval for classification.
    #[must_use]
    pub const fn window(&self) -> TargetWindow {
        TargetWindow::new(self.min, self.max)
    }
}

/// Deployment targets keyed by platform.
///
/// Keys are read case-insensitively; two keys naming the same platform
/// (`macos` and `macOS`) are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, TargetRange>",
    into = "BTreeMap<Platform, TargetRange>"
)]
pub struct DeploymentTargets(BTreeMap<Platform, TargetRange>);

impl TryFrom<BTreeMap<String, TargetRange>> for DeploymentTargets {
    type Error = SdkGateError;

    fn try_from(raw: BTreeMap<String, TargetRange>) -> Result<Self> {
        let mut targets = BTreeMap::new();
        for (key, range) in raw {
            let platform: Platform = key.parse()?;
            if targets.insert(platform, range).is_some() {
                return Err(crate::err!(ConfigValue {
                    key: format!("targets.{key}"),
                    message: format!("platform '{platform}' is configured more than once"),
                }));
            }
        }
        Ok(Self(targets))
    }
}

impl From<DeploymentTargets> for BTreeMap<Platform, TargetRange> {
    fn from(targets: DeploymentTargets) -> Self {
        targets.0
    }
}

impl DeploymentTargets {
    /// No targets configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the range for `platform`.
    #[must_use]
    pub fn with(mut self, platform: Platform, range: TargetRange) -> Self {
        self.0.insert(platform, range);
        self
    }

    /// The configured range for `platform`, if it constrains anything.
    #[must_use]
    pub fn constrained(&self, platform: Platform) -> Option<&TargetRange> {
        self.0.get(&platform).filter(|r| r.is_constrained())
    }

    /// Whether any platform has a non-trivial range.
    #[must_use]
    pub fn any_constrained(&self) -> bool {
        self.0.values().any(TargetRange::is_constrained)
    }

    /// Iterate over constrained platforms in canonical order.
    pub fn iter_constrained(&self) -> impl Iterator<Item = (Platform, &TargetRange)> + '_ {
        self.0
            .iter()
            .filter(|(_, r)| r.is_constrained())
            .map(|(p, r)| (*p, r))
    }

    fn entry(&mut self, platform: Platform) -> &mut TargetRange {
        self.0.entry(platform).or_default()
    }

    /// Reject ranges whose minimum lies above their maximum.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValue` naming the first offending platform.
    pub fn validate(&self) -> Result<()> {
        for (platform, range) in &self.0 {
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min > max {
                    return Err(crate::err!(ConfigValue {
                        key: format!("targets.{platform}"),
                        message: format!("min {min} is greater than max {max}"),
                    }));
                }
            }
        }
        Ok(())
    }
}

/// Resolution options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Evaluate declarations on the rayon thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Use colored output.
    #[serde(default = "default_true")]
    pub colored: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Pretty-print JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            colored: true,
            verbose: false,
            pretty: true,
        }
    }
}

/// Main configuration structure with nested sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deployment targets
    pub targets: DeploymentTargets,

    /// Resolution options
    pub resolve: ResolveOptions,

    /// Output options
    pub output: OutputOptions,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid, names an unknown platform,
    /// holds a malformed version, or a range has `min > max`.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        let expanded = expand_env_vars(content);
        tracing::debug!("Expanded environment variables in configuration");

        let config: Self = serde_yaml::from_str(&expanded).map_err(|e| SdkGateError::ConfigParse {
            message: e.to_string(),
            source: Some(Box::new(e)),
            src_path: file!(),
            src_line: line!(),
        })?;
        config.targets.validate()?;

        tracing::debug!(
            constrained_platforms = config.targets.iter_constrained().count(),
            parallel = config.resolve.parallel,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Generate an example YAML configuration.
    #[must_use]
    pub fn example_yaml() -> String {
        r#"# SdkGate Configuration File

# Deployment targets per platform.
# A platform that is not listed (or lists neither min nor max) does not
# restrict anything. With no targets at all, every declaration is treated
# as available.
targets:
  macos:
    # Oldest supported macOS version
    min: "10.13"

  ios:
    min: "12.0"
    # Newest supported iOS version (optional)
    # max: "17.0"

  # tvos:
  #   min: "12.0"
  # watchos:
  #   min: "5.0"
  # visionos:
  #   min: "1.0"

# Resolution options
resolve:
  # Evaluate declarations in parallel
  parallel: true

# Output options
output:
  # Use colored output in terminal
  colored: true

  # Enable verbose output
  verbose: false

  # Pretty-print JSON output
  pretty: true
"#
        .to_string()
    }

    /// Merge CLI target overrides into the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is malformed or produces `min > max`.
    pub fn merge_cli_args(&mut self, args: &crate::cli::TargetArgs) -> Result<()> {
        for arg in &args.min {
            let (platform, version) = parse_target_override(arg)?;
            tracing::debug!(%platform, %version, "Overriding minimum deployment target");
            self.targets.entry(platform).min = Some(version);
        }
        for arg in &args.max {
            let (platform, version) = parse_target_override(arg)?;
            tracing::debug!(%platform, %version, "Overriding maximum deployment target");
            self.targets.entry(platform).max = Some(version);
        }
        self.targets.validate()
    }
}

/// Parse a `PLATFORM=VERSION` override.
fn parse_target_override(arg: &str) -> Result<(Platform, Version)> {
    let Some((platform, version)) = arg.split_once('=') else {
        return Err(crate::err!(ConfigValue {
            key: arg.to_string(),
            message: "expected PLATFORM=VERSION".to_string(),
        }));
    };
    Ok((platform.parse()?, version.parse()?))
}

static BRACED_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"));
static BARE_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("static regex"));

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. Unset variables are left untouched.
fn expand_env_vars(content: &str) -> String {
    let substitute = |caps: &regex::Captures<'_>| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    };
    let braced = BRACED_VAR.replace_all(content, substitute);
    BARE_VAR.replace_all(&braced, substitute).into_owned()
}
