//! Command line interface for the release bundler.
//!
//! This module wires argument parsing, package configuration, the release
//! provider, and the output store together for each subcommand.

mod args;
pub mod commands;

pub use args::{Args, Command};

use crate::config::PackageSet;
use crate::error::{CliError, Result};
use crate::provider::{GithubProvider, Provider, SnapshotProvider};

/// Main CLI entry point
pub async fn run(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let packages = PackageSet::load(&args.config)?;
    let provider = create_provider(&args)?;

    match &args.command {
        Command::Compose {
            package,
            tag,
            minors,
            dry_run,
        } => {
            let request = commands::ComposeRequest {
                package,
                tag: tag.as_deref(),
                minors: *minors,
                dry_run: *dry_run,
            };
            commands::compose(&packages, &provider, &args.output, request).await?;
        }
        Command::LastN { package, minors } => {
            for tag in commands::last_n(&packages, &provider, package, *minors).await? {
                println!("{tag}");
            }
        }
        Command::Snapshot { package, out } => {
            commands::snapshot(&packages, &provider, package.as_deref(), out).await?;
        }
    }

    Ok(0)
}

/// Picks the snapshot provider when a snapshot file is given, GitHub otherwise
fn create_provider(args: &Args) -> Result<Provider> {
    match &args.releases {
        Some(path) => {
            log::debug!("Reading releases from {}", path.display());
            Ok(Provider::Snapshot(SnapshotProvider::load(path)?))
        }
        None => {
            log::debug!("Reading releases from {}", args.github_api);
            Ok(Provider::Github(GithubProvider::new(&args.github_api)?))
        }
    }
}
