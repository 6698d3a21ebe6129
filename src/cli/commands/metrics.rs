//! `droneforge metrics` command - Performance panel for a build

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{effective_format, load_config, open_project};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store;
use crate::engine::performance::{MetricStatus, Priority, ALL_CLEAR};
use crate::engine::{aggregate, PerformancePanel};

#[derive(clap::Args, Debug)]
pub struct MetricsArgs {
    /// Build name
    pub name: String,
}

const SUGGESTION_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("priority", "PRIORITY", 8),
    ColumnDef::new("text", "SUGGESTION", 60),
];

pub fn run(args: MetricsArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let format = effective_format(global, &load_config(global));
    let build = store::load_or_empty(&project, &args.name)?;

    let summary = aggregate(&build.components);
    let panel = PerformancePanel::from_summary(&summary, build.len());
    log::debug!("metrics for '{}': {:?}", build.name, summary);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&panel).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&panel).into_diagnostic()?);
        }
        OutputFormat::Auto => print_panel(&build.name, &panel),
        other => {
            // piped formats list the suggestions only
            let rows = panel.suggestions.iter().map(|s| {
                TableRow::new(s.text.to_string())
                    .cell("priority", CellValue::Priority(s.priority))
                    .cell("text", CellValue::Text(s.text.to_string()))
            });
            TableFormatter::new(SUGGESTION_COLUMNS, "suggestion")
                .with_config(TableConfig::for_pipe())
                .output(rows, other);
        }
    }
    Ok(())
}

fn print_panel(name: &str, panel: &PerformancePanel) {
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "{} {}  {}",
        style("Performance:").bold(),
        style(name).cyan(),
        style(format!("({} components)", panel.component_count)).dim()
    );
    println!("{}", style("─".repeat(50)).dim());

    println!(
        "{:<18} {} {}%",
        "Build progress",
        progress_bar(panel.completeness, 20),
        panel.completeness
    );
    println!();

    for metric in &panel.metrics {
        let value = match metric.status {
            MetricStatus::Good => style(&metric.value).green(),
            MetricStatus::Warning => style(&metric.value).yellow(),
            MetricStatus::Bad => style(&metric.value).red(),
            MetricStatus::Neutral => style(&metric.value),
        };
        println!("{:<18} {}", metric.label, value);
    }
    println!();

    if panel.is_all_clear() {
        println!("{} {}", style("✓").green(), ALL_CLEAR);
        return;
    }

    println!("{}", style("Suggestions").bold());
    for suggestion in &panel.suggestions {
        let marker = match suggestion.priority {
            Priority::High => style("!").red(),
            Priority::Medium => style("!").yellow(),
            Priority::Low => style("·").dim(),
        };
        println!("  {} {}", marker, suggestion.text);
    }
}

/// Fixed-width text progress bar
pub(crate) fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent.min(100) as usize * width) / 100;
    format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(width - filled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 10), "[░░░░░░░░░░]");
        assert_eq!(progress_bar(50, 10), "[█████░░░░░]");
        assert_eq!(progress_bar(100, 4), "[████]");
        // out of range clamps
        assert_eq!(progress_bar(250, 4), "[████]");
    }
}
