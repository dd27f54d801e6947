use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use deco::compile_pack;
use deco::project::{ProjectSettingsBuilder, SuffixMode, DEFAULT_NAMESPACE};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match run(cli) {
		Ok(true) => ExitCode::SUCCESS,
		Ok(false) => ExitCode::FAILURE,
		Err(e) => {
			eprintln!("Error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

/// Sets up logging. `RUST_LOG` takes precedence over the verbosity flag
fn init_logging(verbose: bool) {
	let default = if verbose { "info,deco=debug" } else { "info" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

/// Runs the command, returning whether it succeeded without errors
fn run(cli: Cli) -> anyhow::Result<bool> {
	match cli.command {
		Command::Compile {
			input_directory,
			output,
			random_suffixes,
			seed,
		} => {
			if !input_directory.exists() {
				bail!(
					"Input directory {} does not exist. Usage: deco compile <INPUT_DIRECTORY> [-o <OUTPUT>]",
					input_directory.display()
				);
			}
			if !input_directory.is_dir() {
				bail!(
					"Input {} is not a directory. Usage: deco compile <INPUT_DIRECTORY> [-o <OUTPUT>]",
					input_directory.display()
				);
			}

			let suffix_mode = if random_suffixes {
				SuffixMode::Random
			} else {
				SuffixMode::Seeded(seed)
			};
			let settings = ProjectSettingsBuilder::new(DEFAULT_NAMESPACE)
				.suffix_mode(suffix_mode)
				.build();

			let report = compile_pack(&input_directory, &output, &settings)
				.context("Failed to compile datapack")?;
			for diagnostic in report.diagnostics.iter() {
				eprintln!("{diagnostic}");
			}
			if report.is_success() {
				println!(
					"Compiled {} functions, {} tags and {} advancements into {}",
					report.functions,
					report.tags,
					report.advancements,
					output.display()
				);
			} else {
				eprintln!(
					"Compilation finished with {} errors",
					report.diagnostics.len()
				);
			}

			Ok(report.is_success())
		}
	}
}

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
	#[command(subcommand)]
	command: Command,
	/// Print debug logging
	#[arg(short, long, global = true)]
	verbose: bool,
}

#[derive(Subcommand)]
enum Command {
	/// Compile a source tree into a datapack
	Compile {
		/// The source folder, laid out like a datapack
		input_directory: PathBuf,
		/// The output directory
		#[arg(short, long, default_value = "out")]
		output: PathBuf,
		/// Use different generated names on every run
		#[arg(long, conflicts_with = "seed")]
		random_suffixes: bool,
		/// Seed for generated names
		#[arg(long, default_value_t = 0)]
		seed: u64,
	},
}
