//! Layoutgen CLI - generate, verify and inspect signed root layout fixtures.

use clap::{ArgAction, Parser, Subcommand};
use layoutgen_fixture::{DEFAULT_KEY_PATH, DEFAULT_OUTPUT_PATH};
use std::path::PathBuf;
use tracing::Level;

mod commands;
mod output;

use commands::{canonicalize, gen, inspect, verify};

#[derive(Parser)]
#[command(name = "layoutgen")]
#[command(about = "Build, sign and check the root layout test fixture")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign the fixture layout and write it (the default when no command is given)
    Generate {
        /// PEM-encoded RSA private key
        #[arg(long, default_value = DEFAULT_KEY_PATH)]
        key: PathBuf,
        /// Output path for the signed layout
        #[arg(long, short, default_value = DEFAULT_OUTPUT_PATH)]
        output: PathBuf,
    },
    /// Verify the signatures of a layout against its embedded keys
    Verify {
        /// Path to the signed layout
        layout: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show canonical bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<PathBuf>,
    },
    /// Summarize the steps, keys and signatures of a layout
    Inspect {
        /// Path to the signed layout
        layout: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Generate {
        key: PathBuf::from(DEFAULT_KEY_PATH),
        output: PathBuf::from(DEFAULT_OUTPUT_PATH),
    });

    let result = match command {
        Commands::Generate { key, output } => gen::run(key, output),
        Commands::Verify { layout, json } => verify::run(layout, json),
        Commands::Canonicalize { input } => canonicalize::run(input),
        Commands::Inspect { layout, json } => inspect::run(layout, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_default_generate() {
        let cli = Cli::try_parse_from(["layoutgen"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn generate_flags_default_to_fixed_paths() {
        let cli = Cli::try_parse_from(["layoutgen", "generate"]).unwrap();
        match cli.command {
            Some(Commands::Generate { key, output }) => {
                assert_eq!(key, PathBuf::from("./test/alice"));
                assert_eq!(output, PathBuf::from("root.layout"));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn verbosity_is_counted() {
        let cli = Cli::try_parse_from(["layoutgen", "-vv", "verify", "root.layout"]).unwrap();
        assert_eq!(log_level(cli.verbose), Level::DEBUG);
        assert_eq!(log_level(0), Level::WARN);
        assert_eq!(log_level(7), Level::TRACE);
    }
}
