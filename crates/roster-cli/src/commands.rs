use anyhow::{Context, Result};
use tracing::info_span;

use roster_cli::config::RosterConfig;
use roster_cli::workspace::{Workspace, parse_map_args};
use roster_model::FieldCatalog;

use crate::cli::{Cli, HistoryArgs, ImportArgs, SuggestArgs};
use crate::summary::{print_fields, print_history, print_import, print_learned, print_suggestions};

pub fn run_fields() -> Result<()> {
    print_fields(FieldCatalog::CURRENT);
    Ok(())
}

pub fn run_suggest(cli: &Cli, args: &SuggestArgs) -> Result<()> {
    let workspace = open_workspace(cli)?;
    let reports = workspace.suggest_file(&args.file)?;
    print_suggestions(&reports, args.explain, args.top);
    Ok(())
}

pub fn run_import(cli: &Cli, args: &ImportArgs) -> Result<()> {
    let span = info_span!("import_file", file = %args.file.display());
    let _guard = span.enter();
    let workspace = open_workspace(cli)?;
    let explicit = parse_map_args(&args.map)?;
    let confirmed = workspace.confirm(&args.file, explicit, args.accept_suggestions)?;
    let outcome = workspace
        .import_file(&args.file, &confirmed)
        .with_context(|| format!("import {}", args.file.display()))?;
    print_import(&outcome);
    Ok(())
}

pub fn run_history(cli: &Cli, args: &HistoryArgs) -> Result<()> {
    let workspace = open_workspace(cli)?;
    let mut jobs = workspace.history()?;
    if let Some(limit) = args.limit {
        jobs.truncate(limit);
    }
    print_history(&jobs);
    Ok(())
}

pub fn run_learned(cli: &Cli) -> Result<()> {
    let workspace = open_workspace(cli)?;
    print_learned(&workspace.learned());
    Ok(())
}

fn open_workspace(cli: &Cli) -> Result<Workspace> {
    let config = RosterConfig::load(cli.config.as_deref(), &cli.data_dir)?;
    Workspace::open(&cli.data_dir, config)
}
