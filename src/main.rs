//! Release Bundler - ordered manifest bundles from aligned upstream releases.
//!
//! This binary composes bundles for configured packages and writes them to
//! an output tree, exiting non-zero if any bundle could not be completed.

use release_bundler::cli;
use std::process;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse_args();

    // Initialize logging; RUST_LOG overrides the verbosity flag
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    // Run CLI and get exit code
    let exit_code = match cli::run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
