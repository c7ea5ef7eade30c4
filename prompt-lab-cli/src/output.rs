//! Output formatting for CLI

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use prompt_lab_workflow::{PipelineReport, StageOutcome};
use serde::Serialize;
use serde_json::Value;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Output writer that handles different formats
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format }
    }

    /// Print a serializable value in a machine-readable format
    fn write_structured<T: Serialize>(&self, value: &T) -> Result<()> {
        match self.format {
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
            _ => println!("{}", serde_json::to_string_pretty(value)?),
        }
        Ok(())
    }

    /// Print the outcome of a pipeline run
    pub fn write_report(&self, report: &PipelineReport) -> Result<()> {
        if self.format != OutputFormat::Table {
            return self.write_structured(report);
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.apply_modifier(UTF8_ROUND_CORNERS);
        table.set_header(
            ["Stage", "Status", "Details"]
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
        for outcome in &report.outcomes {
            table.add_row(outcome_row(outcome));
        }
        println!("{table}");

        if let Some(rows) = report
            .outcomes
            .iter()
            .find(|o| o.name == "summarize")
            .and_then(|o| o.output.get("rows"))
            .and_then(Value::as_array)
        {
            print_method_summary(rows);
        }

        if report.success {
            self.success(&format!("Pipeline '{}' finished", report.pipeline));
        } else {
            let stage = report.failed_stage().map(|o| o.name.as_str()).unwrap_or("unknown");
            self.error(&format!("Pipeline '{}' failed at stage '{}'", report.pipeline, stage));
        }
        Ok(())
    }

    /// Write a success message
    pub fn success(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "✓".green(), message);
        } else {
            println!("{}", message);
        }
    }

    /// Write an error message
    pub fn error(&self, message: &str) {
        if self.format == OutputFormat::Table {
            eprintln!("{} {}", "✗".red(), message);
        } else {
            eprintln!("Error: {}", message);
        }
    }
}

fn outcome_row(outcome: &StageOutcome) -> Vec<Cell> {
    let status = if outcome.success {
        Cell::new("✓ ok").fg(Color::Green)
    } else {
        Cell::new("✗ failed").fg(Color::Red)
    };
    vec![Cell::new(&outcome.name), status, Cell::new(outcome_details(outcome))]
}

/// One-line summary of what a stage produced
pub fn outcome_details(outcome: &StageOutcome) -> String {
    if let Some(error) = &outcome.error {
        return error.clone();
    }

    let output = &outcome.output;
    if let Some(accuracy) = output.get("accuracy").and_then(Value::as_f64) {
        return format!(
            "accuracy {:.3} ({}/{})",
            accuracy,
            output["correct"].as_u64().unwrap_or(0),
            output["total"].as_u64().unwrap_or(0)
        );
    }
    if let Some(completed) = output.get("completed").and_then(Value::as_array) {
        let failed = output.get("failed").and_then(Value::as_array).map_or(0, Vec::len);
        return format!("{} completed, {} failed", completed.len(), failed);
    }
    ["path", "summary_path"]
        .iter()
        .find_map(|key| output.get(*key).and_then(Value::as_str))
        .unwrap_or("-")
        .to_string()
}

fn print_method_summary(rows: &[Value]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(
        ["Method", "Total", "Correct", "Accuracy"]
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    for row in rows {
        table.add_row(vec![
            Cell::new(row["method"].as_str().unwrap_or("-")),
            Cell::new(row["total"].as_u64().unwrap_or(0)),
            Cell::new(row["correct"].as_u64().unwrap_or(0)),
            Cell::new(format!("{:.3}", row["accuracy"].as_f64().unwrap_or(0.0))),
        ]);
    }
    println!("\n{}", "Method Summary".bold().underline());
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Yaml.to_string(), "yaml");
    }

    #[test]
    fn test_outcome_details() {
        let experiment = StageOutcome::success(
            "experiment:cot",
            json!({"method": "cot", "total": 9, "correct": 3, "accuracy": 0.3333}),
        );
        assert_eq!(outcome_details(&experiment), "accuracy 0.333 (3/9)");

        let run_all = StageOutcome::success("run_all", json!({"completed": [{}, {}], "failed": [{}]}));
        assert_eq!(outcome_details(&run_all), "2 completed, 1 failed");

        let report = StageOutcome::success("report", json!({"path": "analysis_results/report.html"}));
        assert_eq!(outcome_details(&report), "analysis_results/report.html");

        let failed = StageOutcome::failure("summarize", "File not found: x.csv");
        assert_eq!(outcome_details(&failed), "File not found: x.csv");
    }
}
