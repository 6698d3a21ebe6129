//! `droneforge init` command - Initialize a new project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::cli::GlobalOpts;
use crate::core::project::{Project, ProjectError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Rewrite the project config even if .droneforge/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Created directory {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            println!(
                "{} Initialized DroneForge project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            if global.quiet {
                return Ok(());
            }
            println!();
            println!("Created project structure:");
            print_structure(project.root());
            println!();
            println!("Next steps:");
            println!(
                "  {} Browse available parts",
                style("droneforge catalog list").yellow()
            );
            println!(
                "  {} Start a build",
                style("droneforge build new <NAME>").yellow()
            );
            println!(
                "  {} Run a flight test",
                style("droneforge test run <NAME> hover").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} DroneForge project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("droneforge init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn print_structure(root: &Path) {
    let entries = [".droneforge/", ".droneforge/config.yaml", "builds/"];

    for entry in entries {
        if root.join(entry).exists() {
            let marker = if entry.ends_with('/') { "📁" } else { "📄" };
            println!("  {} {}", marker, style(entry).dim());
        }
    }
}
