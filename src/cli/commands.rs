//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::{Browser, LoadedTaxonomy};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::sample::sample_tree;
use crate::domain::{NodeId, SelectionEngine, SkippedRow, TaxonomyTree};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::terminal::TerminalDisplay;
use crate::infrastructure::InfraError;
use crate::tree_traits::{MarkedTree, TreeNodeConvert};

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        None => cmd_browse(container, cli.input.as_deref()),
        Some(Commands::Browse { input }) => {
            cmd_browse(container, input.as_deref().or(cli.input.as_deref()))
        }
        Some(Commands::Build { input, output }) => cmd_build(container, input, output.as_deref()),
        Some(Commands::Tree { input, select }) => cmd_tree(container, input.as_deref(), select),
        Some(Commands::Config { command }) => cmd_config(container, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Explicit argument, then configured input, then the built-in sample.
fn load_taxonomy(container: &ServiceContainer, input: Option<&Path>) -> CliResult<LoadedTaxonomy> {
    let input = input.or(container.settings.input.as_deref());
    let loaded = match input {
        Some(path) => container.taxonomy_service().load(path)?,
        None => {
            debug!("no input, using built-in sample");
            LoadedTaxonomy {
                tree: sample_tree()?,
                skipped: Vec::new(),
            }
        }
    };
    report_skipped(&loaded.skipped);
    Ok(loaded)
}

fn report_skipped(skipped: &[SkippedRow]) {
    if skipped.is_empty() {
        return;
    }
    output::warning(&format!("{} row(s) skipped", skipped.len()));
    for row in skipped {
        output::detail(&format!("row {}: {:?} ({})", row.line, row.code, row.reason));
    }
}

#[instrument(skip(container))]
fn cmd_browse(container: &ServiceContainer, input: Option<&Path>) -> CliResult<()> {
    let loaded = load_taxonomy(container, input)?;
    let options = container.settings.browser_options();
    let mut browser = Browser::new(&loaded.tree, options);
    {
        let mut display = TerminalDisplay::new(options.list_height)?;
        browser.run(&mut display)?;
    }
    print_selection(&loaded.tree, &browser.into_selection());
    Ok(())
}

fn print_selection(tree: &TaxonomyTree, selection: &SelectionEngine) {
    let leaves = selection.selected_leaves(tree);
    for id in &leaves {
        output::info(id);
    }
    let titles = leaves
        .iter()
        .filter_map(|id| tree.node_by_id(id))
        .map(|node| node.title())
        .join(", ");
    output::status(&format!(
        "{} of {} items selected{}",
        leaves.len(),
        tree.leaf_ids().len(),
        if titles.is_empty() {
            String::new()
        } else {
            format!(": {titles}")
        }
    ));
}

#[instrument(skip(container))]
fn cmd_build(container: &ServiceContainer, input: &Path, output: Option<&Path>) -> CliResult<()> {
    let service = container.taxonomy_service();
    let report = service.build_from_table(input)?;
    report_skipped(&report.skipped);

    let target = output.unwrap_or(container.settings.snapshot.as_path());
    service.save_snapshot(&report.tree, target)?;
    output::success(&format!(
        "{} nodes ({} created, {} updated, {} placeholders) written to {}",
        report.tree.len() - 1,
        report.created,
        report.updated,
        report.placeholders,
        target.display()
    ));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, input: Option<&Path>, select: &[String]) -> CliResult<()> {
    let loaded = load_taxonomy(container, input)?;
    output::info(&render_tree(&loaded.tree, select)?);
    Ok(())
}

/// Render the tree, with selection markers once any id is toggled.
pub fn render_tree(tree: &TaxonomyTree, select: &[String]) -> CliResult<String> {
    if select.is_empty() {
        return Ok(tree.to_tree_string().to_string());
    }

    let mut selection = SelectionEngine::new(tree);
    for id in select {
        selection.apply_toggle(tree, &NodeId::from(id.as_str()))?;
    }
    Ok(MarkedTree {
        tree,
        selection: &selection,
    }
    .to_tree_string()
    .to_string())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path()
                    .ok_or_else(|| CliError::Usage("no config directory available".into()))?
            } else {
                local_config_path(&current_dir()?)
            };
            if container.fs.exists(&path) && !*force {
                return Err(CliError::Usage(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config files (lowest to highest precedence)");
            let local = local_config_path(&current_dir()?);
            let candidates = global_config_path().into_iter().chain(std::iter::once(local));
            for path in candidates {
                let marker = if container.fs.exists(&path) {
                    "found"
                } else {
                    "missing"
                };
                output::info(&format!("  {} ({marker})", path.display()));
            }
            Ok(())
        }
    }
}

fn current_dir() -> CliResult<PathBuf> {
    std::env::current_dir().map_err(|e| InfraError::io("resolve working directory", e).into())
}
