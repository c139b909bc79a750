//! Apollo's header generator
//!
//! The engine's aggregate headers (`Components.hpp`, `ComponentConfig.hpp`) include one header
//! per component type. Rather than maintaining them by hand, they're generated at build time from
//! the canonical type list, filling the `@INCLUDES@` placeholder of a checked-in template.
//!
//! This crate consists of the generation pipeline ([`codegen`]) and a command line utility
//! driving it.

use apollo_utils::{ok, AnyResult};
use clap::{ArgAction, Parser, Subcommand};
use commands::{build::BuildCommand, check::CheckCommand, list::ListCommand, preset::PresetCommand};
use log::LevelFilter;

pub mod codegen;
pub mod commands;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increases logging verbosity (can be repeated)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Generates headers declared in a specification file
    Build(BuildCommand),
    /// Verifies that generated headers are up to date, without writing anything
    Check(CheckCommand),
    /// Prints the type names every generator would use
    List(ListCommand),
    /// Runs one of the engine's built-in generators
    Preset(PresetCommand),
}

pub trait Command {
    fn run(self) -> AnyResult;
}

/// Runs `apollo_gen` as if it was ran from the command line.
///
/// This function is provided to allow invocation of the generator from build scripts.
pub fn run(cli: Cli) -> AnyResult {
    match cli.command {
        CliCommand::Build(c) => c.run()?,
        CliCommand::Check(c) => c.run()?,
        CliCommand::List(c) => c.run()?,
        CliCommand::Preset(c) => c.run()?,
    }
    ok()
}

/// Sets up the logger. `RUST_LOG` takes precedence over the verbosity flags.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = pretty_env_logger::formatted_builder();
    builder
        .format_indent(None)
        .format_timestamp(None)
        .filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    // Fails only if a logger is already set up (library callers may have their own)
    let _ = builder.try_init();
}
