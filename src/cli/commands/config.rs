//! `droneforge config` command - Configuration management
//!
//! Keys are flat: `author`, `default_format`, `tick_ms` and the five
//! test-condition defaults (`wind_speed`, `temperature`, ...).

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::helpers::{load_config, open_project};
use crate::cli::GlobalOpts;
use crate::core::config::{typed_value, VALID_KEYS};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path(PathArgs),

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Show only project-level config
    #[arg(long = "project-only", conflicts_with = "global_only")]
    pub project_only: bool,

    /// Show only global (user) config
    #[arg(long = "global-only")]
    pub global_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g., author, wind_speed)
    pub key: String,

    /// Value to set
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    /// Set in global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Show only project config path
    #[arg(long = "project-only", conflicts_with = "global_only")]
    pub project_only: bool,

    /// Show only global config path
    #[arg(long = "global-only")]
    pub global_only: bool,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Set(args) => run_set(args, global),
        ConfigCommands::Unset(args) => run_unset(args, global),
        ConfigCommands::Path(args) => run_path(args, global),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);

    if let Some(key) = &args.key {
        if !is_valid_key(key) {
            return Err(unknown_key(key));
        }
        return match config.get(key) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    if args.project_only {
        print_file("Project config:", &project_config_path(global)?)
    } else if args.global_only {
        print_file("Global config:", &global_config_path()?)
    } else {
        println!("{}", style("Effective Configuration").bold().underlined());
        println!();
        print_effective(&config);

        println!();
        println!("{}", style("Config Sources (in priority order):").dim());
        println!("  1. Environment variables (DRONEFORGE_AUTHOR, DRONEFORGE_FORMAT)");
        println!("  2. Project config (.droneforge/config.yaml)");
        println!("  3. Global config (~/.config/droneforge/config.yaml)");
        Ok(())
    }
}

fn print_effective(config: &Config) {
    for (key, _) in VALID_KEYS {
        match config.get(key) {
            Some(v) => println!("  {}: {}", style(key).cyan(), style(v).yellow()),
            None => println!("  {}: {}", style(key).cyan(), style("(not set)").dim()),
        }
    }
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let value = typed_value(&args.key, &args.value).map_err(|e| miette::miette!("{}", e))?;
    let config_path = target_path(args.global, global)?;

    let mut map = read_mapping(&config_path)?;
    map.insert(serde_yml::Value::String(args.key.clone()), value);
    write_mapping(&config_path, &map)?;

    if !global.quiet {
        println!(
            "{} Set {} {} {} in {} config",
            style("✓").green(),
            style(&args.key).cyan(),
            style("→").dim(),
            style(&args.value).yellow(),
            scope(args.global)
        );
    }
    Ok(())
}

fn run_unset(args: UnsetArgs, global: &GlobalOpts) -> Result<()> {
    let config_path = target_path(args.global, global)?;
    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut map = read_mapping(&config_path)?;
    if map
        .remove(serde_yml::Value::String(args.key.clone()))
        .is_none()
    {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }
    write_mapping(&config_path, &map)?;

    if !global.quiet {
        println!(
            "{} Removed {} from {} config",
            style("✓").green(),
            style(&args.key).cyan(),
            scope(args.global)
        );
    }
    Ok(())
}

fn run_path(args: PathArgs, global: &GlobalOpts) -> Result<()> {
    if args.project_only {
        println!("{}", project_config_path(global)?.display());
        return Ok(());
    }
    if args.global_only {
        println!("{}", global_config_path()?.display());
        return Ok(());
    }

    let global_path = global_config_path()?;
    println!("{}", style("Configuration file paths:").bold());
    println!();
    println!("  {} {}", style("Global:").cyan(), global_path.display());
    println!("         {}", existence(&global_path));

    println!();
    match project_config_path(global) {
        Ok(path) => {
            println!("  {} {}", style("Project:").cyan(), path.display());
            println!("          {}", existence(&path));
        }
        Err(_) => println!(
            "  {} {}",
            style("Project:").cyan(),
            style("(not in a DroneForge project)").dim()
        ),
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();
    for (key, description) in VALID_KEYS {
        println!("  {:<16} {}", style(key).cyan(), style(description).dim());
    }
    println!();
    println!(
        "{}",
        style("Use 'droneforge config set <key> <value>' to set a value.").dim()
    );
    Ok(())
}

fn is_valid_key(key: &str) -> bool {
    VALID_KEYS.iter().any(|(k, _)| *k == key)
}

fn unknown_key(key: &str) -> miette::Report {
    miette::miette!(
        "Unknown config key '{}'. Run 'droneforge config keys' to list valid keys",
        key
    )
}

fn scope(global: bool) -> &'static str {
    if global {
        "global"
    } else {
        "project"
    }
}

fn existence(path: &Path) -> console::StyledObject<&'static str> {
    if path.exists() {
        style("(exists)").green()
    } else {
        style("(not created)").dim()
    }
}

fn global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn project_config_path(global: &GlobalOpts) -> Result<PathBuf> {
    Ok(open_project(global)?.config_dir().join("config.yaml"))
}

fn target_path(use_global: bool, global: &GlobalOpts) -> Result<PathBuf> {
    if use_global {
        global_config_path()
    } else {
        project_config_path(global)
    }
}

/// Existing config as a YAML mapping; a missing or empty file is an empty map
fn read_mapping(path: &Path) -> Result<serde_yml::Mapping> {
    if !path.exists() {
        return Ok(serde_yml::Mapping::new());
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    match serde_yml::from_str::<serde_yml::Value>(&content).into_diagnostic()? {
        serde_yml::Value::Mapping(map) => Ok(map),
        serde_yml::Value::Null => Ok(serde_yml::Mapping::new()),
        _ => Err(miette::miette!(
            "{} is not a YAML mapping; fix or remove it first",
            path.display()
        )),
    }
}

fn write_mapping(path: &Path, map: &serde_yml::Mapping) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(map).into_diagnostic()?;
    fs::write(path, yaml).into_diagnostic()
}

fn print_file(title: &str, path: &Path) -> Result<()> {
    println!("{} {}", style(title).bold(), style(path.display()).dim());
    println!();
    if path.exists() {
        print!("{}", fs::read_to_string(path).into_diagnostic()?);
    } else {
        println!("{}", style("(not created)").dim());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_mapping_round_trip_keeps_numbers() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.yaml");

        let mut map = read_mapping(&path).unwrap();
        assert!(map.is_empty());
        map.insert("wind_speed".into(), typed_value("wind_speed", "35").unwrap());
        map.insert("author".into(), typed_value("author", "Sam").unwrap());
        write_mapping(&path, &map).unwrap();

        let config: Config = serde_yml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(config.wind_speed, Some(35.0));
        assert_eq!(config.author.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_read_mapping_rejects_non_mapping() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "- just\n- a list\n").unwrap();
        assert!(read_mapping(&path).is_err());
    }

    #[test]
    fn test_empty_file_is_empty_mapping() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "").unwrap();
        assert!(read_mapping(&path).unwrap().is_empty());
    }
}
