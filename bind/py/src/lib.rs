use std::collections::HashMap;
use std::path::PathBuf;

use deco::common::Function;
use deco::project::{ProjectSettings, ProjectSettingsBuilder, SuffixMode, DEFAULT_NAMESPACE};
use deco::{check_output_dir, Compiler};
use pyo3::{exceptions::PyRuntimeError, prelude::*};

/// A Python module implemented in Rust.
#[pymodule]
fn deco_compiler(_py: Python, m: &PyModule) -> PyResult<()> {
	m.add_function(wrap_pyfunction!(compile_pack, m)?)?;
	m.add_class::<PyProjectSettings>()?;
	m.add_class::<PyCompileReport>()?;
	m.add_class::<PyFunction>()?;
	Ok(())
}

/// Compiles a source tree and writes the datapack to the output directory
#[pyfunction]
#[pyo3(signature = (input, output, namespace=None))]
fn compile_pack(input: &str, output: &str, namespace: Option<&str>) -> PyResult<PyCompileReport> {
	let settings = PyProjectSettings::new(namespace.unwrap_or(DEFAULT_NAMESPACE));
	compile_with(input, output, &settings.inner)
}

fn compile_with(
	input: &str,
	output: &str,
	settings: &ProjectSettings,
) -> PyResult<PyCompileReport> {
	let input = PathBuf::from(input);
	if !input.is_dir() {
		return Err(PyRuntimeError::new_err(format!(
			"Input {} is not a directory",
			input.display()
		)));
	}

	let output = PathBuf::from(output);
	check_output_dir(&input, &output).map_err(|x| PyRuntimeError::new_err(format!("{x:?}")))?;

	let mut compilation = Compiler::new(settings.clone())
		.compile(&input)
		.map_err(|x| PyRuntimeError::new_err(format!("{x:?}")))?;
	// Include the pack's own load and tick functions
	compilation
		.pack
		.finalize()
		.map_err(|x| PyRuntimeError::new_err(x.to_string()))?;
	let functions: HashMap<String, PyFunction> = compilation
		.pack
		.functions()
		.map(|x| (x.location().to_string(), PyFunction { inner: x.clone() }))
		.collect();

	let report = compilation
		.output(&output)
		.map_err(|x| PyRuntimeError::new_err(format!("{x:?}")))?;

	Ok(PyCompileReport {
		functions,
		diagnostics: report.diagnostics.iter().map(|x| x.to_string()).collect(),
	})
}

#[pyclass(name = "ProjectSettings")]
#[derive(Clone)]
struct PyProjectSettings {
	inner: ProjectSettings,
}

#[pymethods]
impl PyProjectSettings {
	#[new]
	fn new(namespace: &str) -> Self {
		Self {
			inner: ProjectSettingsBuilder::new(namespace).build(),
		}
	}

	fn seed(&mut self, seed: u64) {
		self.inner = ProjectSettingsBuilder::new(self.inner.namespace())
			.suffix_mode(SuffixMode::Seeded(seed))
			.pack_format(self.inner.pack_format())
			.build();
	}

	fn compile(&self, input: &str, output: &str) -> PyResult<PyCompileReport> {
		compile_with(input, output, &self.inner)
	}
}

#[pyclass(name = "CompileReport")]
#[derive(Clone)]
struct PyCompileReport {
	functions: HashMap<String, PyFunction>,
	diagnostics: Vec<String>,
}

#[pymethods]
impl PyCompileReport {
	fn functions(&self) -> HashMap<String, PyFunction> {
		self.functions.clone()
	}

	fn diagnostics(&self) -> Vec<String> {
		self.diagnostics.clone()
	}

	fn is_success(&self) -> bool {
		self.diagnostics.is_empty()
	}
}

#[pyclass(name = "Function")]
#[derive(Clone)]
struct PyFunction {
	inner: Function,
}

#[pymethods]
impl PyFunction {
	fn contents(&self) -> Vec<String> {
		self.inner.contents().to_vec()
	}
}
