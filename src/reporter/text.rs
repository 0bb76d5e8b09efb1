//! Plain text report generator.

use crate::config::{Config, DeploymentTargets};
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{Classification, Evaluation, EvaluationReport};
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

/// Text report generator for CLI output.
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to list declarations that need no guard
    verbose: bool,
    /// Targets the report was resolved against
    targets: DeploymentTargets,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
            verbose: config.output.verbose,
            targets: config.targets.clone(),
        }
    }
}

impl ReportGenerator for TextReporter {
    fn generate(&self, report: &EvaluationReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header());
        output.push('\n');

        output.push_str(&self.format_summary(report));
        output.push('\n');

        let declarations = self.format_declarations(report);
        if !declarations.is_empty() {
            output.push_str(&declarations);
            output.push('\n');
        }

        Ok(output)
    }
}

impl TextReporter {
    fn title(&self, text: &str) -> String {
        if self.use_colors {
            text.bright_cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Format the report header.
    fn format_header(&self) -> String {
        let title = "SdkGate Availability";
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));

        if self.use_colors {
            format!(
                "\n{} {}\n{}\n",
                title.bright_white().bold(),
                version.dimmed(),
                "=".repeat(80).bright_blue(),
            )
        } else {
            format!("\n{} {}\n{}\n", title, version, "=".repeat(80))
        }
    }

    /// Format the summary section.
    fn format_summary(&self, report: &EvaluationReport) -> String {
        let mut output = format!("\n{}\n{}\n", self.title("Summary"), "-".repeat(80));

        let targets: Vec<String> = self
            .targets
            .iter_constrained()
            .map(|(platform, range)| {
                let min = range.min.map_or_else(|| "*".to_string(), |v| v.to_string());
                let max = range.max.map_or_else(|| "*".to_string(), |v| v.to_string());
                format!("{platform} {min}..{max}")
            })
            .collect();
        if targets.is_empty() {
            output.push_str("  Targets: none configured (everything is available)\n");
        } else {
            output.push_str(&format!("  Targets: {}\n", targets.join(", ")));
        }

        let s = &report.summary;
        if self.use_colors {
            output.push_str(&format!(
                "  {} available | {} guarded | {} unavailable | {} total\n",
                s.all.to_string().green().bold(),
                s.some.to_string().yellow().bold(),
                s.none.to_string().red().bold(),
                s.total
            ));
        } else {
            output.push_str(&format!(
                "  {} available | {} guarded | {} unavailable | {} total\n",
                s.all, s.some, s.none, s.total
            ));
        }

        output
    }

    /// Format the declarations table.
    fn format_declarations(&self, report: &EvaluationReport) -> String {
        let shown: Vec<&Evaluation> = report
            .evaluations
            .iter()
            .filter(|e| self.verbose || e.classification != Classification::All)
            .collect();
        if shown.is_empty() {
            return String::new();
        }

        let mut output = format!("\n{}\n{}\n", self.title("Declarations"), "-".repeat(80));

        let hidden = report.evaluations.len() - shown.len();
        if hidden > 0 {
            let note = format!("{hidden} unconditionally available (use -v to show all)");
            if self.use_colors {
                output.push_str(&format!("  {}\n\n", note.dimmed()));
            } else {
                output.push_str(&format!("  {note}\n\n"));
            }
        }

        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Declaration", "Availability", "Attribute"]);

        for evaluation in shown {
            table.add_row(vec![
                Cell::new(&evaluation.name),
                self.classification_cell(evaluation.classification),
                Cell::new(evaluation.attribute.as_deref().unwrap_or("-")),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    fn classification_cell(&self, classification: Classification) -> Cell {
        let cell = Cell::new(classification.to_string());
        if !self.use_colors {
            return cell;
        }
        match classification {
            Classification::All => cell.fg(Color::Green),
            Classification::Some => cell.fg(Color::Yellow),
            Classification::None => cell.fg(Color::Red),
        }
    }
}
