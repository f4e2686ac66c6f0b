// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ARIA-SDR - deterministic routing assistant.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod classify;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ARIA-SDR - deterministic routing assistant.
#[derive(Parser, Debug)]
#[command(name = "aria", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default lookup paths.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Classify one message and print the routing result as JSON.
    Classify {
        /// The user message.
        text: String,
        /// Conversation variable, repeatable (`--var lead_volumetria=1500`).
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = classify::parse_var)]
        vars: Vec<(String, String)>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => {
            let loaded = match &cli.config {
                Some(path) => aria_config::load_and_validate_path(path),
                None => aria_config::load_and_validate(),
            };
            let config = match loaded {
                Ok(config) => config,
                Err(errors) => {
                    aria_config::render_errors(&errors);
                    std::process::exit(1);
                }
            };
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Classify { text, vars }) => {
            match classify::run_classify(&text, vars) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("aria: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_classify_with_vars() {
        let cli = Cli::try_parse_from([
            "aria",
            "classify",
            "quero enviar",
            "--var",
            "lead_volumetria=1500",
            "--var",
            "canal=web",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Classify { text, vars }) => {
                assert_eq!(text, "quero enviar");
                assert_eq!(
                    vars,
                    vec![
                        ("lead_volumetria".to_string(), "1500".to_string()),
                        ("canal".to_string(), "web".to_string()),
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_var_without_equals() {
        assert!(Cli::try_parse_from(["aria", "classify", "x", "--var", "nope"]).is_err());
    }

    #[test]
    fn cli_accepts_global_config_path() {
        let cli = Cli::try_parse_from(["aria", "serve", "--config", "/tmp/aria.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/aria.toml")));
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    #[serial_test::serial]
    fn binary_loads_config_defaults() {
        let config = aria_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.agent.name, "aria");
    }
}
