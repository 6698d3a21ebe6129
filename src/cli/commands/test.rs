//! `droneforge test` command - Simulated flight tests

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::io::Write;
use std::time::Duration;

use crate::cli::commands::catalog;
use crate::cli::commands::metrics::progress_bar;
use crate::cli::helpers::{effective_format, load_config, open_project};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store;
use crate::engine::{ConfigField, Report, ResultStatus, TestConfig, TestId, TestRun};
use crate::entities::catalog::test_info;

#[derive(Subcommand, Debug)]
pub enum TestCommands {
    /// Evaluate a build against one flight test
    Run(RunArgs),

    /// List the flight-test library
    List,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Build name
    pub name: String,

    /// Test to run (hover, ascent, rotation, wind, speed, thermal, weather, waypoint)
    #[arg(default_value = "hover")]
    pub test: String,

    /// Wind speed in km/h (0-100)
    #[arg(long, allow_hyphen_values = true)]
    pub wind_speed: Option<f64>,

    /// Air temperature in °C (-20 to 50)
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: Option<f64>,

    /// Altitude in m (0-500)
    #[arg(long, allow_hyphen_values = true)]
    pub altitude: Option<f64>,

    /// Humidity / rain intensity in % (0-100)
    #[arg(long, allow_hyphen_values = true)]
    pub humidity: Option<f64>,

    /// Precision / rotation level (1-10)
    #[arg(long, allow_hyphen_values = true)]
    pub precision: Option<f64>,

    /// Show the simulation progress before the results
    #[arg(long)]
    pub live: bool,

    /// Milliseconds between progress ticks with --live (default: from config)
    #[arg(long)]
    pub tick_ms: Option<u64>,
}

impl RunArgs {
    fn overrides(&self) -> [(ConfigField, Option<f64>); 5] {
        [
            (ConfigField::WindSpeed, self.wind_speed),
            (ConfigField::Temperature, self.temperature),
            (ConfigField::Altitude, self.altitude),
            (ConfigField::Humidity, self.humidity),
            (ConfigField::Precision, self.precision),
        ]
    }
}

const RESULT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("label", "METRIC", 20),
    ColumnDef::new("value", "VALUE", 12),
    ColumnDef::new("trend", "TREND", 5),
    ColumnDef::new("status", "STATUS", 8),
];

pub fn run(cmd: TestCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TestCommands::Run(args) => run_test(args, global),
        TestCommands::List => {
            let format = effective_format(global, &load_config(global));
            catalog::run_tests(format, global)
        }
    }
}

/// Configured defaults, then command-line overrides, forced into range
fn resolve_config(base: TestConfig, overrides: &[(ConfigField, Option<f64>)]) -> TestConfig {
    overrides
        .iter()
        .fold(base, |acc, (field, value)| match value {
            Some(v) => acc.with(*field, *v),
            None => acc,
        })
        .clamped()
}

fn run_test(args: RunArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = load_config(global);
    let format = effective_format(global, &config);

    let test = TestId::from_id_lenient(&args.test);
    let test_config = resolve_config(config.test_config(), &args.overrides());
    let build = store::load_or_empty(&project, &args.name)?;

    if args.live && !global.quiet {
        let tick = Duration::from_millis(args.tick_ms.unwrap_or_else(|| config.tick_ms()));
        animate(test, tick)?;
    }

    let report = Report::run(&build, test, &test_config);
    log::debug!(
        "{} on '{}': {} result(s), overall {}",
        test,
        build.name,
        report.results.len(),
        report.summary.overall
    );

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&report).into_diagnostic()?);
        }
        OutputFormat::Auto => print_report(&build.name, &report),
        other => {
            TableFormatter::new(RESULT_COLUMNS, "result")
                .with_config(TableConfig::for_pipe())
                .output(result_rows(&report), other);
        }
    }
    Ok(())
}

fn result_rows(report: &Report) -> impl Iterator<Item = TableRow> + '_ {
    report.results.iter().map(|r| {
        TableRow::new(r.label.clone())
            .cell("label", CellValue::Text(r.label.clone()))
            .cell("value", CellValue::Text(r.value.clone()))
            .cell("trend", CellValue::Trend(r.trend))
            .cell("status", CellValue::Status(r.status))
    })
}

/// Drive the progress ticker on stderr until the run completes
fn animate(test: TestId, tick: Duration) -> Result<()> {
    let mut run = TestRun::new();
    run.toggle();
    let mut stderr = std::io::stderr();
    loop {
        write!(
            stderr,
            "\r{} {} {:>3}%",
            style(format!("{:<10}", run.phase())).dim(),
            progress_bar(run.progress, 30),
            run.progress
        )
        .into_diagnostic()?;
        stderr.flush().into_diagnostic()?;
        if run.tick() {
            break;
        }
        std::thread::sleep(tick);
    }
    writeln!(
        stderr,
        "\r{} {} {:>3}%  {}",
        style(format!("{:<10}", run.phase())).green(),
        progress_bar(run.progress, 30),
        run.progress,
        style(test).cyan()
    )
    .into_diagnostic()?;
    Ok(())
}

fn print_report(name: &str, report: &Report) {
    let title = test_info(report.test)
        .map(|info| info.name)
        .unwrap_or("Stability Check");

    println!("{}", style("─".repeat(50)).dim());
    println!(
        "{} {}  {}",
        style(title).bold(),
        style(format!("({})", report.test)).dim(),
        style(name).cyan()
    );
    if let Some(info) = test_info(report.test) {
        let settings: Vec<String> = info
            .settings
            .iter()
            .map(|field| format!("{}={} {}", field.key(), report.config.get(*field), field.unit()))
            .collect();
        println!("{}", style(settings.join("  ")).dim());
    }
    println!("{}", style("─".repeat(50)).dim());

    TableFormatter::new(RESULT_COLUMNS, "result")
        .with_config(TableConfig::for_pipe())
        .output(result_rows(report), OutputFormat::Tsv);

    println!();
    println!(
        "{} passed, {} warning(s), {} failed",
        style(report.summary.pass_count).green(),
        style(report.summary.warning_count).yellow(),
        style(report.summary.fail_count).red()
    );
    let overall = match report.summary.overall {
        ResultStatus::Pass => style("PASS").green().bold(),
        ResultStatus::Warning => style("WARNING").yellow().bold(),
        ResultStatus::Fail => style("FAIL").red().bold(),
    };
    println!("{}: {}", style("Overall").bold(), overall);
    println!("{}", report.recommendation);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_then_clamp() {
        let base = TestConfig::default();
        let config = resolve_config(
            base,
            &[
                (ConfigField::WindSpeed, Some(250.0)),
                (ConfigField::Temperature, None),
                (ConfigField::Precision, Some(0.0)),
            ],
        );
        assert_eq!(config.wind_speed, 100.0);
        assert_eq!(config.temperature, base.temperature);
        assert_eq!(config.precision, 1.0);
    }

    #[test]
    fn test_no_overrides_keeps_base() {
        let base = TestConfig::default().with(ConfigField::Humidity, 75.0);
        assert_eq!(resolve_config(base, &[]), base);
    }
}
