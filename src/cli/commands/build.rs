//! `droneforge build` command - Create and edit drone builds
//!
//! Every edit loads the stored build, derives a new value from it and
//! writes that value back. Edits use the strict loader so a damaged file is
//! reported instead of being overwritten.

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::cli::helpers::{color_swatch, effective_format, load_config, open_project};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store;
use crate::entities::build::Build;
use crate::entities::catalog::Catalog;
use crate::entities::component::Position;
use crate::entities::palette::{ColorPart, DroneColors, PRESET_COLORS};
use crate::engine::{aggregate, BuildState};

#[derive(Subcommand, Debug)]
pub enum BuildCommands {
    /// Create a new, empty build
    New(NewArgs),

    /// List stored builds
    List,

    /// Show a build's components and palette
    Show(NameArgs),

    /// Place catalog components into a build
    Add(AddArgs),

    /// Remove one placed component
    Remove(RemoveArgs),

    /// Remove every component (the palette is kept)
    Clear(ClearArgs),

    /// Show or change the colour palette
    Colors(ColorsArgs),

    /// Check that a stored build file is well formed
    Validate(NameArgs),

    /// Export a build as JSON (or YAML with --format yaml)
    Export(ExportArgs),

    /// Import a build from a JSON or YAML file
    Import(ImportArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Build name (letters, digits, '-' and '_')
    pub name: String,

    /// Author (default: from config)
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct NameArgs {
    /// Build name
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Build name
    pub name: String,

    /// Catalog ids to place, in order (repeat an id to place it twice)
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Workspace position for the new components as x,y or x,y,z
    #[arg(long, allow_hyphen_values = true)]
    pub at: Option<Position>,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Build name
    pub name: String,

    /// Placed component: @N, instance id, or unique id prefix
    pub reference: String,
}

#[derive(clap::Args, Debug)]
pub struct ClearArgs {
    /// Build name
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct ColorsArgs {
    /// Build name
    pub name: String,

    /// Motor colour (#RRGGBB)
    #[arg(long)]
    pub motors: Option<String>,

    /// Frame colour (#RRGGBB)
    #[arg(long)]
    pub frame: Option<String>,

    /// Propeller colour (#RRGGBB)
    #[arg(long)]
    pub propellers: Option<String>,

    /// Battery colour (#RRGGBB)
    #[arg(long)]
    pub battery: Option<String>,

    /// LED colour (#RRGGBB)
    #[arg(long)]
    pub leds: Option<String>,

    /// Restore the default palette before applying other flags
    #[arg(long)]
    pub reset: bool,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Build name
    pub name: String,

    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// File to import (.json, otherwise YAML)
    pub file: PathBuf,

    /// Store under this name instead of the one in the file
    #[arg(long)]
    pub name: Option<String>,

    /// Overwrite an existing build with the same name
    #[arg(long)]
    pub force: bool,
}

const COMPONENT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("instance", "INSTANCE", 32),
    ColumnDef::new("id", "COMPONENT", 16),
    ColumnDef::new("name", "NAME", 26),
    ColumnDef::new("category", "CATEGORY", 12),
    ColumnDef::new("weight", "WEIGHT", 8),
    ColumnDef::new("position", "POSITION", 20),
];

const BUILD_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("parts", "PARTS", 6),
    ColumnDef::new("weight", "WEIGHT", 8),
    ColumnDef::new("state", "STATE", 11),
    ColumnDef::new("author", "AUTHOR", 20),
];

pub fn run(cmd: BuildCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        BuildCommands::New(args) => run_new(args, global),
        BuildCommands::List => run_list(global),
        BuildCommands::Show(args) => run_show(args, global),
        BuildCommands::Add(args) => run_add(args, global),
        BuildCommands::Remove(args) => run_remove(args, global),
        BuildCommands::Clear(args) => run_clear(args, global),
        BuildCommands::Colors(args) => run_colors(args, global),
        BuildCommands::Validate(args) => run_validate(args, global),
        BuildCommands::Export(args) => run_export(args, global),
        BuildCommands::Import(args) => run_import(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = load_config(global);
    let author = args.author.unwrap_or_else(|| config.author());

    let build = Build::new(&args.name, Some(author));
    let path = store::create(&project, &build)?;

    if !global.quiet {
        println!(
            "{} Created build {} at {}",
            style("✓").green(),
            style(&build.name).cyan(),
            style(path.display()).dim()
        );
        println!(
            "   Add parts with {}",
            style(format!("droneforge build add {} <COMPONENT_ID>...", build.name)).yellow()
        );
    }
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let format = effective_format(global, &load_config(global));
    let names = store::list(&project);

    let builds: Vec<Build> = names
        .iter()
        .map(|name| store::load_or_empty(&project, name))
        .collect::<Result<_, _>>()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&builds).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&builds).into_diagnostic()?);
        }
        _ => {
            if builds.is_empty() && format == OutputFormat::Auto {
                println!("No builds found.");
                println!(
                    "Create one with {}",
                    style("droneforge build new <NAME>").yellow()
                );
                return Ok(());
            }
            let rows = builds.iter().map(|build| {
                let summary = aggregate(&build.components);
                let state = BuildState::classify(&summary, build.len());
                TableRow::new(build.name.clone())
                    .cell("name", CellValue::Id(build.name.clone()))
                    .cell("parts", CellValue::Number(build.len() as i64))
                    .cell("weight", CellValue::Text(format!("{}g", summary.total_weight)))
                    .cell("state", CellValue::Type(state.to_string()))
                    .cell(
                        "author",
                        build
                            .author
                            .clone()
                            .map(CellValue::Text)
                            .unwrap_or(CellValue::Empty),
                    )
            });
            let config = if global.quiet {
                TableConfig::for_pipe()
            } else {
                TableConfig::default()
            };
            TableFormatter::new(BUILD_COLUMNS, "build")
                .with_config(config)
                .output(rows, format);
        }
    }
    Ok(())
}

fn component_rows(build: &Build) -> impl Iterator<Item = TableRow> + '_ {
    build.components.iter().enumerate().map(|(i, placed)| {
        TableRow::new(placed.instance_id.to_string())
            .with_reference(format!("@{}", i + 1))
            .cell("instance", CellValue::Id(placed.instance_id.to_string()))
            .cell("id", CellValue::Text(placed.id().to_string()))
            .cell("name", CellValue::Text(placed.name().to_string()))
            .cell("category", CellValue::Type(placed.category().to_string()))
            .cell("weight", CellValue::Text(placed.component.specs.weight.clone()))
            .cell("position", CellValue::Text(placed.position.to_string()))
    })
}

fn run_show(args: NameArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let format = effective_format(global, &load_config(global));
    let build = store::load_or_empty(&project, &args.name)?;

    match format {
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&build).into_diagnostic()?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&build).into_diagnostic()?);
        }
        OutputFormat::Auto => {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("Build").bold(), style(&build.name).cyan());
            if let Some(ref author) = build.author {
                println!("{}: {}", style("Author").bold(), author);
            }
            println!(
                "{}: {}",
                style("Created").bold(),
                build.created.format("%Y-%m-%d %H:%M")
            );
            println!("{}", style("─".repeat(60)).dim());

            if build.is_empty() {
                println!("{}", style("No components placed.").dim());
            } else {
                TableFormatter::new(COMPONENT_COLUMNS, "component")
                    .with_config(TableConfig::for_pipe())
                    .output(component_rows(&build), OutputFormat::Tsv);
                println!();
                println!("{} component(s)", style(build.len()).cyan());
            }

            println!();
            println!("{}", style("Palette").bold());
            print_palette(&build.colors);
        }
        other => {
            TableFormatter::new(COMPONENT_COLUMNS, "component")
                .with_config(TableConfig::for_pipe())
                .output(component_rows(&build), other);
        }
    }
    Ok(())
}

fn print_palette(colors: &DroneColors) {
    for (part, hex) in colors.iter() {
        println!("  {:<12} {}", part.to_string(), color_swatch(hex));
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let catalog = Catalog::builtin().into_diagnostic()?;
    let build = store::load(&project, &args.name)?;
    let position = args.at.unwrap_or_default();

    // resolve every id before touching the build so a typo adds nothing
    let components = args
        .ids
        .iter()
        .map(|id| catalog.require(id).cloned())
        .collect::<Result<Vec<_>, _>>()
        .into_diagnostic()?;

    let updated = components
        .into_iter()
        .fold(build, |acc, component| acc.with_added(component, position));
    store::save(&project, &updated)?;

    if !global.quiet {
        let added = &updated.components[updated.len() - args.ids.len()..];
        for (offset, placed) in added.iter().enumerate() {
            let index = updated.len() - args.ids.len() + offset + 1;
            println!(
                "{} Added {} {} as {}",
                style("✓").green(),
                style(placed.id()).cyan(),
                style(format!("({})", placed.name())).dim(),
                style(format!("@{}", index)).cyan()
            );
        }
        println!(
            "   {} now has {} component(s)",
            style(&updated.name).cyan(),
            updated.len()
        );
    }
    Ok(())
}

fn run_remove(args: RemoveArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let build = store::load(&project, &args.name)?;

    let target = build.resolve(&args.reference).into_diagnostic()?;
    let (instance_id, label) = (target.instance_id, target.id().to_string());
    let updated = build.without(&instance_id);
    store::save(&project, &updated)?;

    if !global.quiet {
        println!(
            "{} Removed {} ({}) from {}",
            style("✓").green(),
            style(&label).cyan(),
            style(instance_id).dim(),
            style(&updated.name).cyan()
        );
    }
    Ok(())
}

fn run_clear(args: ClearArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let build = store::load(&project, &args.name)?;

    if build.is_empty() {
        if !global.quiet {
            println!("{} {} is already empty", style("!").yellow(), style(&build.name).cyan());
        }
        return Ok(());
    }

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Remove all {} component(s) from {}?",
                build.len(),
                build.name
            ))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let removed = build.len();
    let updated = build.cleared();
    store::save(&project, &updated)?;

    if !global.quiet {
        println!(
            "{} Cleared {} component(s) from {}",
            style("✓").green(),
            removed,
            style(&updated.name).cyan()
        );
    }
    Ok(())
}

fn run_colors(args: ColorsArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let build = store::load(&project, &args.name)?;

    let requested = [
        (ColorPart::Motors, &args.motors),
        (ColorPart::Frame, &args.frame),
        (ColorPart::Propellers, &args.propellers),
        (ColorPart::Battery, &args.battery),
        (ColorPart::Leds, &args.leds),
    ];
    let changes: Vec<(ColorPart, &String)> = requested
        .iter()
        .filter_map(|(part, value)| value.as_ref().map(|v| (*part, v)))
        .collect();

    if changes.is_empty() && !args.reset {
        println!("{} {}", style("Palette for").bold(), style(&build.name).cyan());
        print_palette(&build.colors);
        println!();
        println!("{}", style("Presets:").dim());
        let swatches: Vec<String> = PRESET_COLORS.iter().map(|c| color_swatch(c)).collect();
        for line in swatches.chunks(5) {
            println!("  {}", line.join("  "));
        }
        return Ok(());
    }

    let start = if args.reset {
        DroneColors::default()
    } else {
        build.colors.clone()
    };
    let colors = changes
        .iter()
        .try_fold(start, |acc, (part, value)| acc.with_color(*part, value))
        .map_err(|e| miette::miette!("{}", e))?;

    let updated = build.with_colors(colors);
    store::save(&project, &updated)?;

    if !global.quiet {
        println!(
            "{} Updated palette for {}",
            style("✓").green(),
            style(&updated.name).cyan()
        );
        print_palette(&updated.colors);
    }
    Ok(())
}

fn run_validate(args: NameArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let catalog = Catalog::builtin().into_diagnostic()?;
    let build = store::load(&project, &args.name)?;

    let mut seen = HashSet::new();
    let duplicates: Vec<String> = build
        .components
        .iter()
        .filter(|c| !seen.insert(c.instance_id))
        .map(|c| c.instance_id.to_string())
        .collect();
    if !duplicates.is_empty() {
        return Err(miette::miette!(
            help = "Remove the repeated entries or give each placement its own instance id",
            "build '{}' reuses instance ids: {}",
            build.name,
            duplicates.join(", ")
        ));
    }

    let unknown: Vec<&str> = build
        .components
        .iter()
        .map(|c| c.id())
        .filter(|id| catalog.get(id).is_none())
        .collect();

    if !global.quiet {
        for id in &unknown {
            println!(
                "{} '{}' is not in the catalog; its stored specs will be used",
                style("!").yellow(),
                id
            );
        }
        println!(
            "{} {} is valid ({} component(s))",
            style("✓").green(),
            style(&build.name).cyan(),
            build.len()
        );
    }
    Ok(())
}

fn run_export(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let build = store::load_or_empty(&project, &args.name)?;

    let as_yaml = match global.format {
        OutputFormat::Yaml => true,
        OutputFormat::Json => false,
        _ => args
            .output
            .as_ref()
            .and_then(|p| p.extension())
            .map(|ext| ext == "yaml" || ext == "yml")
            .unwrap_or(false),
    };
    let text = if as_yaml {
        serde_yml::to_string(&build).into_diagnostic()?
    } else {
        format!("{}\n", store::to_json(&build)?)
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, text).into_diagnostic()?;
            if !global.quiet {
                println!(
                    "{} Exported {} to {}",
                    style("✓").green(),
                    style(&build.name).cyan(),
                    style(path.display()).dim()
                );
            }
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn run_import(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let mut build = store::import_file(&args.file)?;
    if let Some(name) = args.name {
        build.name = name;
    }

    let path = if args.force {
        store::save(&project, &build)?
    } else {
        store::create(&project, &build)?
    };

    if !global.quiet {
        println!(
            "{} Imported {} ({} component(s)) to {}",
            style("✓").green(),
            style(&build.name).cyan(),
            build.len(),
            style(path.display()).dim()
        );
    }
    Ok(())
}

