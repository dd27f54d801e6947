use std::fmt::Display;
use std::path::{Component, Path};

use crate::common::{CompileError, ResourceLocation};
use crate::util::slash_path;

/// The directory under a namespace that holds function sources
pub const FUNCTIONS_DIR: &str = "functions";

/// Where a source file sits in the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoFile {
	namespace: String,
	/// Directories between the functions folder and the file
	path: Vec<String>,
	/// File name without the extension
	stem: String,
	extension: Option<String>,
	/// Path relative to the data directory, for messages
	display: String,
}

impl DecoFile {
	/// Reads a file's position from its path relative to the `data` directory,
	/// which must look like `<namespace>/functions/<dirs...>/<file>`
	pub fn from_data_path(relative: &Path) -> Result<Self, CompileError> {
		let display = slash_path(relative);
		let malformed = |reason: &str| CompileError::MalformedPath {
			path: display.clone(),
			reason: reason.to_string(),
		};

		let mut parts = Vec::new();
		for component in relative.components() {
			let Component::Normal(part) = component else {
				return Err(malformed("Path must be relative to the data directory"));
			};
			let part = part
				.to_str()
				.ok_or_else(|| malformed("Path is not valid UTF-8"))?;
			parts.push(part.to_string());
		}
		if parts.len() < 3 {
			return Err(malformed(
				"Expected <namespace>/functions/<file>",
			));
		}
		if parts[1] != FUNCTIONS_DIR {
			return Err(malformed("Source files must be inside a functions directory"));
		}

		let Some(file_name) = parts.pop() else {
			return Err(malformed("Missing file name"));
		};
		let file_path = Path::new(&file_name);
		let stem = file_path
			.file_stem()
			.and_then(|x| x.to_str())
			.unwrap_or_default()
			.to_string();
		let extension = file_path
			.extension()
			.and_then(|x| x.to_str())
			.map(str::to_string);
		let namespace = parts.remove(0);
		let path = parts.split_off(1);

		let out = Self {
			namespace,
			path,
			stem,
			extension,
			display: display.clone(),
		};
		// Make sure every location this file can produce is valid
		out.location().map_err(|e| malformed(&e.to_string()))?;

		Ok(out)
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn extension(&self) -> Option<&str> {
		self.extension.as_deref()
	}

	/// The location of the function named after the file itself
	pub fn location(&self) -> Result<ResourceLocation, CompileError> {
		ResourceLocation::new(&self.namespace, &self.path, &self.stem).map_err(|e| {
			CompileError::MalformedPath {
				path: self.display.clone(),
				reason: e.to_string(),
			}
		})
	}

	/// The location of a function declared in this file. `main` is the
	/// file's own function, other names sit next to the file
	pub fn function_location(&self, name: &str) -> Result<ResourceLocation, CompileError> {
		if name == MAIN_FUNCTION {
			return self.location();
		}
		ResourceLocation::new(&self.namespace, &self.path, name).map_err(|e| {
			CompileError::MalformedPath {
				path: self.display.clone(),
				reason: e.to_string(),
			}
		})
	}
}

impl Display for DecoFile {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.display)
	}
}

/// Declarations with this name become the file's own function
pub const MAIN_FUNCTION: &str = "main";

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_data_path() {
		let file = DecoFile::from_data_path(Path::new("ns/functions/util/math/Add.deco")).unwrap();
		assert_eq!(file.namespace(), "ns");
		assert_eq!(file.extension(), Some("deco"));
		assert_eq!(file.to_string(), "ns/functions/util/math/Add.deco");
		assert_eq!(file.location().unwrap().to_string(), "ns:util/math/add");
		assert_eq!(
			file.function_location("main").unwrap().to_string(),
			"ns:util/math/add"
		);
		assert_eq!(
			file.function_location("helper").unwrap().to_string(),
			"ns:util/math/helper"
		);

		let file = DecoFile::from_data_path(Path::new("ns/functions/a.deco")).unwrap();
		assert_eq!(file.location().unwrap().to_string(), "ns:a");
	}

	#[test]
	fn test_malformed_paths() {
		for path in [
			"ns/a.deco",
			"ns/structures/a.deco",
			"ns/functions/bad name.deco",
			"a.deco",
		] {
			let err = DecoFile::from_data_path(Path::new(path)).unwrap_err();
			assert!(
				matches!(err, CompileError::MalformedPath { .. }),
				"{path}: {err}"
			);
		}
	}
}
