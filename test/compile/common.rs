use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use deco::project::{ProjectSettings, ProjectSettingsBuilder, SuffixMode};
use deco::{compile_pack, CompileReport};
use itertools::Itertools;

/// Name of the file in each test directory with the expected output
pub static EXPECTED_FILE: &str = "expected.txt";
/// Name of the directory in each test directory with the source tree
pub static INPUT_DIR: &str = "input";

pub fn test_settings() -> ProjectSettings {
	ProjectSettingsBuilder::new("deco")
		.suffix_mode(SuffixMode::Sequential)
		.build()
}

/// Compiles a source tree and lists everything that was written
pub fn compile_and_list(input: &Path, output: &Path) -> anyhow::Result<String> {
	let report =
		compile_pack(input, output, &test_settings()).context("Failed to compile test input")?;
	create_output(output, &report)
}

/// Lists every file in an output directory along with its contents,
/// followed by the diagnostics of the run
pub fn create_output(output: &Path, report: &CompileReport) -> anyhow::Result<String> {
	let mut files = Vec::new();
	list_files(output, &mut files)?;

	let mut out = String::new();
	for path in files.into_iter().sorted() {
		let relative = path.strip_prefix(output).unwrap_or(&path);
		let name = relative
			.components()
			.map(|x| x.as_os_str().to_string_lossy())
			.join("/");
		let contents = std::fs::read_to_string(&path)
			.with_context(|| format!("Failed to read output file {name}"))?;
		writeln!(&mut out, "# === {name} === #")?;
		writeln!(&mut out, "{contents}")?;
		out.push('\n');
	}
	for diagnostic in report.diagnostics.iter() {
		writeln!(&mut out, "# !! {diagnostic}")?;
	}

	Ok(out.trim_end().to_string())
}

fn list_files(dir: &Path, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
	for entry in std::fs::read_dir(dir).context("Failed to read output directory")? {
		let path = entry?.path();
		if path.is_dir() {
			list_files(&path, out)?;
		} else {
			out.push(path);
		}
	}
	Ok(())
}

/// Normalizes line endings and trailing whitespace so listings can be compared
#[allow(dead_code)]
pub fn normalize(text: &str) -> String {
	text.replace("\r\n", "\n").trim_end().to_string()
}
