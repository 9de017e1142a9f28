///
/// This module implements the CLI for sourceforge-harvest: command parsing,
/// config resolution and user-visible output.
///
/// All pipeline logic lives in the [`sourceforge-harvest-core`] crate; this
/// module only wires configuration into it and prints the result.
///
/// ## How To Use
/// - From a shell: `sourceforge-harvest fetch --username alice --target-directory ./mirror`.
/// - Programmatically or from tests: call [`run`] with a constructed [`Cli`].
///
/// [`sourceforge-harvest-core`]: ../../sourceforge-harvest-core/
use crate::load_config::{load_config, resolve_params, CliConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sourceforge_harvest_core::connection::{connection_data, icon_svg};
use sourceforge_harvest_core::contract::{DataSource, ReplicationOutcome};
use sourceforge_harvest_core::fetch::{FetchReport, SourceForgeDataSource};
use std::path::PathBuf;

/// CLI for sourceforge-harvest: clone every git repository of a SourceForge account.
#[derive(Parser)]
#[clap(
    name = "sourceforge-harvest",
    version,
    about = "Clone the git repositories of a SourceForge account into a local directory"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the account's projects and clone each one into the target directory
    Fetch {
        /// Path to an optional YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// SourceForge account name (overrides the config file)
        #[clap(long, env = "SOURCEFORGE_USERNAME")]
        username: Option<String>,
        /// Directory receiving the clones, created if absent (overrides the config file)
        #[clap(long, env = "SOURCEFORGE_TARGET_DIRECTORY")]
        target_directory: Option<PathBuf>,
    },
    /// Print the connection form declaration as JSON
    Connection,
    /// Print the SVG icon
    Icon {
        /// Plugin directory to look for icon.svg in
        #[clap(long)]
        plugin_dir: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Fetch {
            config,
            username,
            target_directory,
        } => {
            let file_config = match config {
                Some(path) => load_config(path)?,
                None => CliConfig::default(),
            };
            let params = resolve_params(&file_config, username, target_directory)
                .context("Incomplete fetch configuration")?;
            tracing::info!(command = "fetch", username = %params.username, "Starting fetch");

            let source = SourceForgeDataSource::new(params, &file_config.settings)
                .context("Failed to build SourceForge client")?;
            match source.fetch().await {
                Ok(report) => {
                    print_report(&report);
                    tracing::info!(command = "fetch", ?report, "Fetch complete");
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "fetch", error = %e, "Fetch aborted");
                    Err(anyhow::Error::new(e))
                }
            }
        }
        Commands::Connection => {
            let json = serde_json::to_string_pretty(&connection_data())?;
            println!("{json}");
            Ok(())
        }
        Commands::Icon { plugin_dir } => {
            println!("{}", icon_svg(plugin_dir.as_deref()));
            Ok(())
        }
    }
}

fn print_report(report: &FetchReport) {
    println!(
        "SourceForge user '{}' -> {}",
        report.username,
        report.target_directory.display()
    );
    if let Some(error) = &report.listing_error {
        println!("Listing failed: {error}");
        return;
    }
    for entry in &report.projects {
        match &entry.outcome {
            ReplicationOutcome::Cloned => println!("  cloned   {}", entry.project.name),
            ReplicationOutcome::Skipped(reason) => {
                println!("  skipped  {} ({reason})", entry.project.name)
            }
            ReplicationOutcome::Failed(reason) => {
                println!("  failed   {}: {reason}", entry.project.name)
            }
        }
    }
    println!(
        "{} cloned, {} skipped, {} failed",
        report.cloned(),
        report.skipped(),
        report.failed()
    );
}
