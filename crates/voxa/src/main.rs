// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voxa - offline-first voice-assistant client core.
//!
//! This is the binary entry point. It hosts the local store, the HTTP
//! gateway client, and the sync engine; speech, UI, and intent dispatch
//! live in the platform layers above.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;
mod status;

/// Voxa - offline-first voice-assistant client core.
#[derive(Parser, Debug)]
#[command(name = "voxa", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the store and sync engine until interrupted.
    Serve,
    /// Show store statistics and backend reachability.
    Status {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match voxa_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            voxa_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Status { json }) => status::run_status(&config, json).await,
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => {
                print!("{rendered}");
                Ok(())
            }
            Err(e) => Err(voxa_core::VoxaError::Internal(format!(
                "failed to render config: {e}"
            ))),
        },
        None => {
            println!("voxa: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("voxa: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config = voxa_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "voxa");
        assert_eq!(config.sync.interval_secs, 300);
    }
}
