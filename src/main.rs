use clap::Parser;
use miette::Result;
use droneforge::cli::commands;
use droneforge::cli::{Cli, Commands, GlobalOpts};

fn init_logging(global: &GlobalOpts) {
    let level = if global.verbose {
        log::LevelFilter::Debug
    } else if global.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    };
    // RUST_LOG, when set, takes precedence over the flags
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    // Restore default SIGPIPE so `droneforge ... | head` exits quietly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(&global);

    match cli.command {
        Commands::Init(args) => commands::init::run(args, &global),
        Commands::Catalog(cmd) => commands::catalog::run(cmd, &global),
        Commands::Build(cmd) => commands::build::run(cmd, &global),
        Commands::Metrics(args) => commands::metrics::run(args, &global),
        Commands::Test(cmd) => commands::test::run(cmd, &global),
        Commands::Config(cmd) => commands::config::run(cmd, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
