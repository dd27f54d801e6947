mod common;

use std::path::Path;

use anyhow::{bail, Context};
use color_print::cprintln;
use common::{compile_and_list, normalize, EXPECTED_FILE, INPUT_DIR};
use include_dir::{include_dir, Dir, DirEntry};

static TESTS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/test/compile/tests");

fn main() {
	let mut failed = Vec::new();
	for dir in TESTS.dirs() {
		let test = dir
			.path()
			.file_name()
			.expect("Failed to get name of test directory")
			.to_string_lossy()
			.to_string();
		println!("     - Running compile test '{test}'");
		if let Err(e) = run_test(&test, dir) {
			cprintln!("<red>Test {} failed:</red> {:?}", test, e);
			failed.push(test);
		}
	}

	if !failed.is_empty() {
		panic!("Compile tests failed: {}", failed.join(", "));
	}
	cprintln!("<green>All compile tests passed</green>");
}

fn run_test(test_name: &str, dir: &Dir) -> anyhow::Result<()> {
	let expected = dir
		.get_file(dir.path().join(EXPECTED_FILE))
		.context("Expected output file does not exist")?
		.contents_utf8()
		.context("Expected output file is not UTF-8")?;

	let input = tempfile::tempdir().context("Failed to create input directory")?;
	let output = tempfile::tempdir().context("Failed to create output directory")?;
	let input_root = dir.path().join(INPUT_DIR);
	if let Some(input_dir) = dir.get_dir(&input_root) {
		extract(input_dir, &input_root, input.path())?;
	}

	let actual = compile_and_list(input.path(), output.path())?;
	let expected = normalize(expected);
	if actual != expected {
		for (i, (l, r)) in expected.lines().zip(actual.lines()).enumerate() {
			if l != r {
				cprintln!("<yellow>Line {}:</yellow>\n  expected: {}\n  actual:   {}", i + 1, l, r);
				break;
			}
		}
		bail!("Output of {test_name} does not match the expected output:\n{actual}");
	}

	Ok(())
}

/// Writes an embedded directory to disk. Entry paths are relative to the
/// root of the embedded tree, so they are made relative to `root` first
fn extract(dir: &Dir, root: &Path, target: &Path) -> anyhow::Result<()> {
	for entry in dir.entries() {
		match entry {
			DirEntry::Dir(dir) => extract(dir, root, target)?,
			DirEntry::File(file) => {
				let relative = file.path().strip_prefix(root)?;
				let path = target.join(relative);
				if let Some(parent) = path.parent() {
					std::fs::create_dir_all(parent)?;
				}
				std::fs::write(&path, file.contents())
					.with_context(|| format!("Failed to write {}", path.display()))?;
			}
		}
	}
	Ok(())
}
