//! `droneforge catalog` command - Browse components and the test library

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{effective_format, load_config};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::catalog::{Catalog, TEST_LIBRARY};
use crate::entities::component::{Component, ComponentCategory};

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// List catalog components
    List(ListArgs),

    /// Show one component's specs
    Show(ShowArgs),

    /// List the flight-test library
    Tests,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only show this category (motors, propellers, frames, power, ...)
    #[arg(long, short = 'c')]
    pub category: Option<ComponentCategory>,

    /// Print only the number of matching components
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Catalog id (e.g. motor-2212)
    pub id: String,
}

const COMPONENT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 28),
    ColumnDef::new("category", "CATEGORY", 12),
    ColumnDef::new("weight", "WEIGHT", 8),
    ColumnDef::new("thrust", "THRUST", 8),
    ColumnDef::new("power", "POWER", 8),
];

const TEST_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 10),
    ColumnDef::new("name", "NAME", 22),
    ColumnDef::new("tier", "TIER", 10),
    ColumnDef::new("duration", "DURATION", 9),
    ColumnDef::new("settings", "SETTINGS", 40),
    ColumnDef::new("description", "DESCRIPTION", 44),
];

pub fn run(cmd: CatalogCommands, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let format = effective_format(global, &config);
    match cmd {
        CatalogCommands::List(args) => run_list(args, format, global),
        CatalogCommands::Show(args) => run_show(args, format),
        CatalogCommands::Tests => run_tests(format, global),
    }
}

fn component_row(component: &Component) -> TableRow {
    let optional = |value: &Option<String>| match value {
        Some(v) => CellValue::Text(v.clone()),
        None => CellValue::Empty,
    };
    TableRow::new(component.id.clone())
        .cell("id", CellValue::Id(component.id.clone()))
        .cell("name", CellValue::Text(component.name.clone()))
        .cell("category", CellValue::Type(component.category.to_string()))
        .cell("weight", CellValue::Text(component.specs.weight.clone()))
        .cell("thrust", optional(&component.specs.thrust))
        .cell("power", optional(&component.specs.power))
}

fn run_list(args: ListArgs, format: OutputFormat, global: &GlobalOpts) -> Result<()> {
    let catalog = Catalog::builtin().into_diagnostic()?;
    let components: Vec<&Component> = match args.category {
        Some(category) => catalog.by_category(category).collect(),
        None => catalog.iter().collect(),
    };

    if args.count {
        println!("{}", components.len());
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&components).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&components).into_diagnostic()?);
        }
        _ => {
            let config = if global.quiet {
                TableConfig::for_pipe()
            } else {
                TableConfig::default()
            };
            TableFormatter::new(COMPONENT_COLUMNS, "component")
                .with_config(config)
                .output(components.iter().map(|c| component_row(c)), format);
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, format: OutputFormat) -> Result<()> {
    let catalog = Catalog::builtin().into_diagnostic()?;
    let component = catalog.require(&args.id).into_diagnostic()?;

    match format {
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(component).into_diagnostic()?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(component).into_diagnostic()?);
        }
        OutputFormat::Id => {
            println!("{}", component.id);
        }
        _ => {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("ID").bold(), style(&component.id).cyan());
            println!("{}: {}", style("Name").bold(), style(&component.name).yellow());
            println!("{}: {}", style("Category").bold(), component.category);
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("Weight").bold(), component.specs.weight);
            if let Some(ref thrust) = component.specs.thrust {
                println!("{}: {}", style("Thrust").bold(), thrust);
            }
            if let Some(ref power) = component.specs.power {
                println!("{}: {}", style("Power").bold(), power);
            }
        }
    }
    Ok(())
}

pub fn run_tests(format: OutputFormat, global: &GlobalOpts) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(TEST_LIBRARY).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(TEST_LIBRARY).into_diagnostic()?);
        }
        _ => {
            let rows = TEST_LIBRARY.iter().map(|info| {
                let settings: Vec<&str> = info.settings.iter().map(|f| f.key()).collect();
                TableRow::new(info.id.to_string())
                    .cell("id", CellValue::Id(info.id.to_string()))
                    .cell("name", CellValue::Text(info.name.to_string()))
                    .cell("tier", CellValue::Type(info.tier.to_string()))
                    .cell("duration", CellValue::Text(info.duration.to_string()))
                    .cell("settings", CellValue::Text(settings.join(", ")))
                    .cell("description", CellValue::Text(info.description.to_string()))
            });
            let config = if global.quiet {
                TableConfig::for_pipe()
            } else {
                TableConfig::default()
            };
            TableFormatter::new(TEST_COLUMNS, "test")
                .with_config(config)
                .output(rows, format);
        }
    }
    Ok(())
}
