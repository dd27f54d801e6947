mod common;

use std::path::PathBuf;

use common::{compile_and_list, EXPECTED_FILE, INPUT_DIR};

/// Regenerates the expected output of a compile test from its input
fn main() {
	let test_dir = PathBuf::from("./test/compile/tests");
	let test_name = std::env::args().nth(1).expect("Test name argument missing");
	let test_dir = test_dir.join(&test_name);
	let input = test_dir.join(INPUT_DIR);

	let output = std::env::temp_dir().join(format!("deco_cg_gen_{test_name}"));
	if output.exists() {
		std::fs::remove_dir_all(&output).expect("Failed to clear output directory");
	}
	std::fs::create_dir_all(&input).expect("Failed to create input directory");

	let listing = compile_and_list(&input, &output).expect("Failed to compile test input");
	std::fs::write(test_dir.join(EXPECTED_FILE), format!("{listing}\n"))
		.expect("Failed to write expected output");
	std::fs::remove_dir_all(&output).expect("Failed to remove output directory");
}
