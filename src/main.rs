use anyhow::{Context, Result};
use capmatrix::app::App;
use capmatrix::cli::{Args, Commands};
use capmatrix::config::Config;
use capmatrix::{render, repl, view};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// RUST_LOG wins, then -v, then the config file, then warnings only
fn init_logging(verbose: bool, config: &Config) {
    let fallback = if verbose {
        "capmatrix=debug".to_string()
    } else {
        config
            .logging
            .level
            .clone()
            .unwrap_or_else(|| "warn".to_string())
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(path) = &args.config {
        config.merge_file(path)?;
    }
    init_logging(args.verbose, &config);

    let command = args.command.clone().unwrap_or(Commands::Shell);
    let mut app = App::open(&args, config)?;

    match command {
        Commands::Shell => repl::run(&mut app)?,
        Commands::Tabs => {
            let active = view::default_tab(&app.catalog);
            println!("{}", render::tabs(&view::visible_tabs(&app.catalog), active));
        }
        Commands::List { tab, search } => {
            if let Some(id) = &tab {
                if !app.catalog.tab(id).is_some_and(|t| t.is_visible()) {
                    anyhow::bail!("unknown or empty tab '{}' (see `capmatrix tabs`)", id);
                }
            }
            let active = view::resolve_tab(&app.catalog, tab.as_deref());
            let query = search.unwrap_or_default();
            let groups = view::filter_groups(active, &query);
            println!("== {} ==", active.label);
            println!("{}", render::groups(&groups, &app.store, &query));
        }
        Commands::Show { skill } => {
            println!("{}", render::skill_detail(&app.skill(&skill)?, &app.store));
        }
        Commands::Summary => println!("{}", render::summary(&app.summary())),
        Commands::Rate { skill, rating } => println!("{}", app.rate(&skill, &rating)?),
        Commands::Focus { skill } => println!("{}", app.toggle_focus(&skill)?),
        Commands::Reset { yes } => println!("{}", app.reset(yes)),
        Commands::Copy => println!("{}", app.copy_report()?),
        Commands::Export { out } => {
            let path = app.export_csv(out.as_deref())?;
            println!("Exported {}", path.display());
        }
        Commands::Config => {
            let rendered =
                toml::to_string_pretty(&app.config).context("failed to render config")?;
            print!("{}", rendered);
        }
    }

    Ok(())
}
