//! JSON report generator.

use crate::config::{Config, DeploymentTargets};
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{Evaluation, EvaluationReport, EvaluationSummary};
use serde::Serialize;

/// JSON report generator.
pub struct JsonReporter {
    /// Whether to pretty-print the output
    pretty: bool,
    /// Targets the report was resolved against
    targets: DeploymentTargets,
}

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
            targets: config.targets.clone(),
        }
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, report: &EvaluationReport) -> Result<String> {
        let document = JsonReport {
            metadata: ReportMetadata {
                version: env!("CARGO_PKG_VERSION"),
                timestamp: report.timestamp.map(|t| t.to_rfc3339()),
                targets: &self.targets,
            },
            summary: &report.summary,
            declarations: &report.evaluations,
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };

        json.map_err(|e| crate::err!(ReportGeneration {
            message: format!("Failed to serialize JSON report: {e}"),
        }))
    }
}

/// JSON report structure.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    metadata: ReportMetadata<'a>,
    summary: &'a EvaluationSummary,
    declarations: &'a [Evaluation],
}

/// Report metadata.
#[derive(Debug, Serialize)]
struct ReportMetadata<'a> {
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    targets: &'a DeploymentTargets,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetRange;
    use crate::types::{Classification, Platform, Version};

    #[test]
    fn test_json_report_shape() {
        let mut config = Config::default();
        config.output.pretty = false;
        config.targets = DeploymentTargets::new()
            .with(Platform::Ios, TargetRange::from_min(Version::new(12, 0, 0)));

        let mut report = EvaluationReport::default();
        report.evaluations.push(Evaluation {
            name: "UIThing".to_string(),
            classification: Classification::All,
            documentation: None,
            attribute: Some("ios(introduced=11.0)".to_string()),
            runtime_check: None,
        });
        report.summary.record(Classification::All);

        let json = JsonReporter::new(&config).generate(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metadata"]["targets"]["ios"]["min"], "12.0");
        assert_eq!(value["summary"]["all"], 1);
        assert_eq!(value["declarations"][0]["name"], "UIThing");
        assert_eq!(value["declarations"][0]["classification"], "all");
        assert!(value["declarations"][0].get("runtime_check").is_none());
    }
}
