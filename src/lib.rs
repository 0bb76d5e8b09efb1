//! # SdkGate
//!
//! A deployment-target availability resolver for native header binding
//! generators.
//!
//! Header scanners record, per declaration and platform, when an API was
//! introduced, deprecated or obsoleted. SdkGate decides whether each
//! declaration is usable unconditionally, behind a runtime check, or not at
//! all within the configured deployment targets, and renders the facts the
//! code emitter needs.
//!
//! ## Features
//!
//! - **Interval resolution**: tri-state classification over partially
//!   specified version windows on several platforms
//! - **Composition**: merge the availability of declarations a synthesized
//!   construct depends on
//! - **Rendering**: documentation text, availability attributes and runtime
//!   check descriptors
//! - **Batch evaluation**: parallel evaluation of whole fact files with text
//!   and JSON reports
//!
//! ## Example
//!
//! ```rust
//! use sdkgate::config::{DeploymentTargets, TargetRange};
//! use sdkgate::{
//!     Classification, Config, DeclarationAvailability, DeclarationRecord, Evaluator, Platform,
//!     PlatformFact, Version,
//! };
//!
//! let mut config = Config::default();
//! config.targets = DeploymentTargets::new()
//!     .with(Platform::Ios, TargetRange::from_min(Version::new(12, 0, 0)));
//!
//! let record = DeclarationRecord {
//!     name: "UIScene".to_string(),
//!     availability: DeclarationAvailability::new()
//!         .with_platform(Platform::Ios, PlatformFact::introduced(Version::new(13, 0, 0))),
//! };
//!
//! let evaluator = Evaluator::new(config);
//! let report = evaluator.evaluate(&[record]);
//! assert_eq!(report.evaluations[0].classification, Classification::Some);
//! assert_eq!(report.evaluations[0].attribute.as_deref(), Some("ios(introduced=13.0)"));
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod render;
pub mod reporter;
pub mod types;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{Result, SdkGateError};
pub use types::{
    Classification, DeclarationAvailability, DeclarationRecord, Evaluation, EvaluationReport,
    Platform, PlatformFact, ReportFormat, Version,
};

use analyzer::AvailabilityResolver;
use rayon::prelude::*;
use std::path::Path;
use types::EvaluationSummary;

/// Batch evaluator that resolves and renders declarations.
///
/// The `Evaluator` is the primary entry point for using SdkGate as a
/// library. Its configuration is read-only, and each declaration is
/// evaluated independently of every other.
pub struct Evaluator {
    config: Config,
}

impl Evaluator {
    /// Create a new evaluator with the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration this evaluator resolves against.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve and render a single declaration.
    #[must_use]
    pub fn evaluate_one(&self, record: &DeclarationRecord) -> Evaluation {
        let availability = &record.availability;
        let classification = AvailabilityResolver::new(&self.config.targets).resolve(availability);
        tracing::debug!(declaration = %record.name, %classification, "Resolved declaration");

        Evaluation {
            name: record.name.clone(),
            classification,
            documentation: render::documentation(availability, classification),
            attribute: render::attribute(availability),
            runtime_check: render::runtime_check(availability, classification),
        }
    }

    /// Evaluate a batch of declarations, preserving input order.
    #[must_use]
    pub fn evaluate(&self, records: &[DeclarationRecord]) -> EvaluationReport {
        tracing::info!(
            declarations = records.len(),
            parallel = self.config.resolve.parallel,
            "Evaluating declarations"
        );

        let evaluations: Vec<Evaluation> = if self.config.resolve.parallel {
            records.par_iter().map(|r| self.evaluate_one(r)).collect()
        } else {
            records.iter().map(|r| self.evaluate_one(r)).collect()
        };

        let mut summary = EvaluationSummary::default();
        for evaluation in &evaluations {
            summary.record(evaluation.classification);
        }

        tracing::info!(
            all = summary.all,
            some = summary.some,
            none = summary.none,
            "Evaluation complete"
        );

        EvaluationReport {
            evaluations,
            summary,
            timestamp: Some(chrono::Utc::now()),
        }
    }

    /// Load a fact file and evaluate every declaration in it.
    ///
    /// # Errors
    ///
    /// Returns an error if the fact file cannot be read or parsed.
    pub fn evaluate_file(&self, path: &Path) -> Result<EvaluationReport> {
        let records = ingest::load_declarations(path)?;
        Ok(self.evaluate(&records))
    }

    /// Merge the availability of the named declarations.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDeclaration` (or `Multiple`) for names not present in
    /// `records`.
    pub fn merge_named<S: AsRef<str>>(
        &self,
        records: &[DeclarationRecord],
        names: &[S],
    ) -> Result<DeclarationAvailability> {
        let mut errors = error::ErrorCollector::new();
        let mut inputs = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            match records.iter().find(|r| r.name == name) {
                Some(record) => inputs.push(&record.availability),
                None => errors.add(crate::err!(UnknownDeclaration { name: name.to_string() })),
            }
        }
        errors.into_result()?;

        tracing::debug!(inputs = inputs.len(), "Merging declaration availability");
        Ok(analyzer::merge_all(inputs))
    }
}
