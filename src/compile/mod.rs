pub mod source;
mod walker;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use crate::builtins::BuiltinRegistry;
use crate::common::{CompileError, Diagnostics, Function, FunctionTag, ResourceLocation};
use crate::decorators::DecoratorRegistry;
use crate::output::datapack::Datapack;
use crate::output::text::{DECO_EXTENSION, FUNCTION_EXTENSION};
use crate::parse::parse_file;
use crate::project::ProjectSettings;
use crate::util::{read_dir_sorted, resolve_path, slash_path};

use self::source::{DecoFile, FUNCTIONS_DIR};
pub use self::walker::Walker;

const PACK_META: &str = "pack.mcmeta";

/// Compiles source trees into datapacks
pub struct Compiler {
	settings: ProjectSettings,
	decorators: DecoratorRegistry,
	builtins: BuiltinRegistry,
}

impl Compiler {
	pub fn new(settings: ProjectSettings) -> Self {
		Self::with_registries(
			settings,
			DecoratorRegistry::with_builtins(),
			BuiltinRegistry::with_builtins(),
		)
	}

	pub fn with_registries(
		settings: ProjectSettings,
		decorators: DecoratorRegistry,
		builtins: BuiltinRegistry,
	) -> Self {
		Self {
			settings,
			decorators,
			builtins,
		}
	}

	/// Compiles a source tree into an in-memory pack. Recoverable errors are
	/// collected in the result, internal errors end the run
	pub fn compile(&self, input: &Path) -> anyhow::Result<Compilation> {
		let mut run = Run {
			pack: Datapack::new(&self.settings).context("Failed to create datapack")?,
			diagnostics: Diagnostics::new(),
		};
		tracing::info!("Compiling {}", input.display());

		let meta_path = input.join(PACK_META);
		if meta_path.is_file() {
			match read_source(&meta_path) {
				Ok(meta) => run.pack.set_pack_meta(meta),
				Err(e) => run.report(Some(PACK_META.to_string()), e)?,
			}
		}

		let data_dir = input.join("data");
		if !data_dir.is_dir() {
			tracing::info!("There is nothing in the datapack");
			return Ok(run.finish());
		}

		let namespaces = match read_dir_sorted(&data_dir) {
			Ok(entries) => entries.into_iter().filter(|x| x.is_dir()).collect(),
			Err(e) => {
				run.report(None, e)?;
				Vec::new()
			}
		};

		// Tags have to be known before any decorator appends to them
		for namespace in &namespaces {
			self.load_tags(&mut run, namespace)?;
		}
		for namespace in &namespaces {
			let functions_dir = namespace.join(FUNCTIONS_DIR);
			if !functions_dir.is_dir() {
				continue;
			}
			for path in run.collect_files(&functions_dir)? {
				self.compile_file(&mut run, &data_dir, &path)?;
			}
		}

		Ok(run.finish())
	}

	/// Reads the existing function tags of a namespace
	fn load_tags(&self, run: &mut Run, namespace_dir: &Path) -> anyhow::Result<()> {
		let tags_dir = namespace_dir.join("tags").join(FUNCTIONS_DIR);
		if !tags_dir.is_dir() {
			return Ok(());
		}
		let namespace = namespace_dir
			.file_name()
			.map(|x| x.to_string_lossy().to_string())
			.unwrap_or_default();

		for path in run.collect_files(&tags_dir)? {
			if path.extension().and_then(|x| x.to_str()) != Some("json") {
				continue;
			}
			match read_tag(&namespace, &tags_dir, &path) {
				Ok((location, tag)) => run.pack.seed_tag(location, tag),
				Err(e) => run.report(Some(path.display().to_string()), e)?,
			}
		}

		Ok(())
	}

	fn compile_file(&self, run: &mut Run, data_dir: &Path, path: &Path) -> anyhow::Result<()> {
		let relative = path.strip_prefix(data_dir).unwrap_or(path);
		let file = match DecoFile::from_data_path(relative) {
			Ok(file) => file,
			Err(e) => return run.report(Some(slash_path(relative)), e),
		};

		let result = match file.extension() {
			Some(DECO_EXTENSION) => self.compile_deco(run, &file, path),
			Some(FUNCTION_EXTENSION) => compile_mcfunction(run, &file, path),
			_ => {
				tracing::debug!("Ignoring {file}");
				return Ok(());
			}
		};
		if let Err(e) = result {
			run.report(Some(file.to_string()), e)?;
		}

		Ok(())
	}

	fn compile_deco(&self, run: &mut Run, file: &DecoFile, path: &Path) -> Result<(), CompileError> {
		tracing::debug!("Compiling {file}");
		let text = read_source(path)?;
		let parsed = parse_file(&text)?;
		let mut walker = Walker::new(
			&mut run.pack,
			&self.decorators,
			&self.builtins,
			&mut run.diagnostics,
			file,
		);
		walker.walk(parsed)
	}
}

/// Command files are copied as they are
fn compile_mcfunction(run: &mut Run, file: &DecoFile, path: &Path) -> Result<(), CompileError> {
	tracing::debug!("Copying {file}");
	let text = read_source(path)?;
	let mut function = Function::new(file.location()?);
	function.add_command(text);
	run.pack.add_function(function)
}

fn read_source(path: &Path) -> Result<String, CompileError> {
	std::fs::read_to_string(path).map_err(|source| CompileError::Io {
		path: path.to_path_buf(),
		source,
	})
}

fn read_tag(
	namespace: &str,
	tags_dir: &Path,
	path: &Path,
) -> Result<(ResourceLocation, FunctionTag), CompileError> {
	let invalid = |message: String| CompileError::InvalidTag {
		path: path.to_path_buf(),
		message,
	};

	let relative = path.strip_prefix(tags_dir).unwrap_or(path);
	let dirs: Vec<_> = relative
		.parent()
		.into_iter()
		.flat_map(|x| x.components())
		.map(|x| x.as_os_str().to_string_lossy().to_string())
		.collect();
	let stem = relative
		.file_stem()
		.map(|x| x.to_string_lossy().to_string())
		.unwrap_or_default();
	let location =
		ResourceLocation::new(namespace, &dirs, &stem).map_err(|e| invalid(e.to_string()))?;

	let text = read_source(path)?;
	let tag = serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?;

	Ok((location, tag))
}

/// State of one compilation run
struct Run {
	pack: Datapack,
	diagnostics: Diagnostics,
}

impl Run {
	/// Records a recoverable error. Internal errors abort the run
	fn report(&mut self, file: Option<String>, error: CompileError) -> anyhow::Result<()> {
		if error.is_internal() {
			let context = match &file {
				Some(file) => format!("Internal compiler error while compiling {file}"),
				None => "Internal compiler error".to_string(),
			};
			return Err(anyhow::Error::new(error).context(context));
		}
		self.diagnostics.push(file, error);
		Ok(())
	}

	/// Lists all files below a directory in sorted order. Unreadable
	/// directories are reported and skipped
	fn collect_files(&mut self, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
		let mut out = Vec::new();
		let mut stack = vec![dir.to_path_buf()];
		while let Some(dir) = stack.pop() {
			let entries = match read_dir_sorted(&dir) {
				Ok(entries) => entries,
				Err(e) => {
					self.report(Some(dir.display().to_string()), e)?;
					continue;
				}
			};
			for entry in entries {
				if entry.is_dir() {
					stack.push(entry);
				} else {
					out.push(entry);
				}
			}
		}
		out.sort();
		Ok(out)
	}

	fn finish(self) -> Compilation {
		Compilation {
			pack: self.pack,
			diagnostics: self.diagnostics,
		}
	}
}

/// The result of compiling a source tree, before it is written out
pub struct Compilation {
	pub pack: Datapack,
	pub diagnostics: Diagnostics,
}

impl Compilation {
	/// Writes the pack to a directory
	pub fn output(mut self, path: &Path) -> anyhow::Result<CompileReport> {
		self.pack
			.output(path)
			.with_context(|| format!("Failed to output datapack to {}", path.display()))?;

		let report = CompileReport {
			functions: self.pack.functions().count(),
			tags: self
				.pack
				.function_tags()
				.filter(|(loc, tag)| self.pack.should_output_tag(loc, tag))
				.count(),
			advancements: self.pack.advancements().count(),
			diagnostics: self.diagnostics,
		};
		tracing::info!(
			functions = report.functions,
			tags = report.tags,
			advancements = report.advancements,
			errors = report.diagnostics.len(),
			"Finished compiling"
		);

		Ok(report)
	}
}

/// Summary of a finished compilation
#[derive(Debug)]
pub struct CompileReport {
	pub functions: usize,
	pub tags: usize,
	pub advancements: usize,
	pub diagnostics: Diagnostics,
}

impl CompileReport {
	pub fn is_success(&self) -> bool {
		self.diagnostics.is_empty()
	}
}

/// Compiles a source tree and writes the datapack to the output directory
pub fn compile_pack(
	input: &Path,
	output: &Path,
	settings: &ProjectSettings,
) -> anyhow::Result<CompileReport> {
	if !input.is_dir() {
		bail!("Input {} is not a directory", input.display());
	}
	check_output_dir(input, output)?;
	let compiler = Compiler::new(settings.clone());
	let compilation = compiler.compile(input)?;
	compilation.output(output)
}

/// Writing a pack clears the output's data directory, so it must not hold
/// any of the sources
pub fn check_output_dir(input: &Path, output: &Path) -> anyhow::Result<()> {
	let input_data = resolve_path(input)
		.with_context(|| format!("Failed to resolve input {}", input.display()))?
		.join("data");
	let output_data = resolve_path(output)
		.with_context(|| format!("Failed to resolve output {}", output.display()))?
		.join("data");
	if output_data.starts_with(&input_data) || input_data.starts_with(&output_data) {
		bail!(
			"Output {} would overwrite the sources in {}. Choose an output directory outside of the input",
			output.display(),
			input.display()
		);
	}

	Ok(())
}
