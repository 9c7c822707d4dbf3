//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap,
//! with validation of the values clap cannot check itself.

use crate::provider::DEFAULT_API_URL;
use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Release-aligned manifest bundler
#[derive(Parser, Debug)]
#[command(
    name = "release_bundler",
    version,
    about = "Composes ordered manifest bundles from upstream releases",
    long_about = "Composes an ordered bundle of release assets for a package, merging in the
dependency releases aligned with each target release.

Usage:
  release_bundler compose --package knative-serving --tag v1.2.3
  release_bundler compose --package knative-serving --minors 3
  release_bundler last-n --package knative-eventing --minors 2
  release_bundler --releases releases.json compose --package knative-serving --dry-run

Exit code 0 = every requested bundle was written completely."
)]
pub struct Args {
    /// Package configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "packages.toml",
        env = "RELEASE_BUNDLER_CONFIG"
    )]
    pub config: PathBuf,

    /// Root of the output tree; bundles land in <OUTPUT>/<package>/<version>/
    #[arg(short, long, value_name = "DIR", default_value = "kodata")]
    pub output: PathBuf,

    /// Read releases from a JSON snapshot instead of the GitHub API
    #[arg(short, long, value_name = "FILE")]
    pub releases: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_URL, env = "GITHUB_API_URL")]
    pub github_api: String,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compose and write bundles for a package
    Compose {
        /// Package name from the configuration file
        #[arg(short, long)]
        package: String,

        /// Target release tag; defaults to every release in the last N minors
        #[arg(short, long)]
        tag: Option<String>,

        /// Number of most recent minor series to bundle when no tag is given
        #[arg(short = 'n', long, default_value = "3")]
        minors: NonZeroUsize,

        /// Print the bundle file names without fetching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the primary release tags within the last N minor series
    LastN {
        /// Package name from the configuration file
        #[arg(short, long)]
        package: String,

        /// Number of most recent minor series to keep
        #[arg(short = 'n', long, default_value = "3")]
        minors: NonZeroUsize,
    },

    /// Save the releases of one or all packages as a JSON snapshot
    Snapshot {
        /// Package name; all packages when omitted
        #[arg(short, long)]
        package: Option<String>,

        /// Snapshot file to write
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
}

impl Command {
    fn package(&self) -> Option<&str> {
        match self {
            Command::Compose { package, .. } | Command::LastN { package, .. } => {
                Some(package.as_str())
            }
            Command::Snapshot { package, .. } => package.as_deref(),
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.command.package().is_some_and(|p| p.trim().is_empty()) {
            return Err("Package cannot be empty".to_string());
        }

        if let Command::Compose { tag: Some(tag), .. } = &self.command {
            crate::release::parse_tag(tag).map_err(|e| e.to_string())?;
        }

        if self.releases.is_none() {
            url::Url::parse(&self.github_api)
                .map_err(|e| format!("Invalid GitHub API URL '{}': {}", self.github_api, e))?;
        }

        Ok(())
    }

    /// Default log filter for env_logger
    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
