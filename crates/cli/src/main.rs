use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use report::{LookupReport, OrderReport, ResolveReport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use xcdeps_graph::{DependencyModel, ProjectGraph, Resolver, TargetCatalog};

mod config;
mod report;

#[derive(Parser)]
#[command(name = "xcdeps")]
#[command(about = "Resolve target dependencies of Xcode projects", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Resolver configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum worklist steps per target (overrides the config file)
    #[arg(long, global = true)]
    step_budget: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and print every target's transitive dependencies
    Resolve(ProjectArgs),

    /// Find a target or package by name, product name or output path
    Lookup(LookupArgs),

    /// Print targets in an order where dependencies come first
    Order(ProjectArgs),
}

#[derive(Args)]
struct ProjectArgs {
    /// Path to a .xcodeproj bundle or project.pbxproj file
    project: PathBuf,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct LookupArgs {
    /// Path to a .xcodeproj bundle or project.pbxproj file
    project: PathBuf,

    /// Target name, product name, output path or package product name
    key: String,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = config::load_config(cli.config.as_deref(), cli.step_budget)?;
    let resolver = Resolver::new(config).context("Invalid resolver configuration")?;

    match cli.command {
        Commands::Resolve(args) => {
            let model = load_model(&resolver, &args.project)?;
            let output = ResolveReport::new(&model);
            emit(args.json, &output, report::render_resolve)?;
        }
        Commands::Lookup(args) => {
            let model = load_model(&resolver, &args.project)?;
            let catalog = TargetCatalog::new(&model);
            let hit = catalog.lookup(&args.key).with_context(|| {
                format!(
                    "No target or package matches '{}' in {}",
                    args.key,
                    args.project.display()
                )
            })?;
            let dependencies = catalog.dependencies(hit.entry);
            let output = LookupReport::new(&args.key, hit, dependencies);
            emit(args.json, &output, report::render_lookup)?;
        }
        Commands::Order(args) => {
            let model = load_model(&resolver, &args.project)?;
            let order = model
                .build_order()
                .with_context(|| format!("Cannot order targets of {}", args.project.display()))?;
            let output = OrderReport {
                order: order
                    .into_iter()
                    .map(|id| model.name_of(id).to_string())
                    .collect(),
            };
            emit(args.json, &output, report::render_order)?;
        }
    }

    Ok(())
}

fn load_model(resolver: &Resolver, project: &Path) -> Result<DependencyModel> {
    let graph = ProjectGraph::from_path(project)
        .with_context(|| format!("Failed to load {}", project.display()))?;
    let model = resolver.resolve(graph);

    for diagnostic in model.diagnostics() {
        log::warn!("{diagnostic}");
    }
    Ok(model)
}

fn emit<T: Serialize>(json: bool, report: &T, render: fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render(report));
    }
    Ok(())
}
