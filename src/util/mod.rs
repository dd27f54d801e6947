use std::path::{Path, PathBuf};

use crate::common::CompileError;

/// Lists the entries of a directory, sorted by path so that runs are
/// deterministic
pub fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>, CompileError> {
	let io_err = |source| CompileError::Io {
		path: dir.to_path_buf(),
		source,
	};
	let mut out = Vec::new();
	for entry in std::fs::read_dir(dir).map_err(io_err)? {
		out.push(entry.map_err(io_err)?.path());
	}
	out.sort();
	Ok(out)
}

/// Joins the components of a relative path with forward slashes
pub fn slash_path(path: &Path) -> String {
	path.components()
		.map(|x| x.as_os_str().to_string_lossy())
		.collect::<Vec<_>>()
		.join("/")
}

/// Makes a path absolute with symlinks resolved, even when it doesn't exist
/// yet. The missing part is appended to the nearest existing ancestor
pub fn resolve_path(path: &Path) -> std::io::Result<PathBuf> {
	let path = if path.is_absolute() {
		path.to_path_buf()
	} else {
		std::env::current_dir()?.join(path)
	};

	let mut existing = path.as_path();
	let mut missing = Vec::new();
	while !existing.exists() {
		let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
			break;
		};
		missing.push(name.to_os_string());
		existing = parent;
	}

	let mut out = existing.canonicalize()?;
	out.extend(missing.into_iter().rev());
	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_dir_sorted() {
		let dir = tempfile::tempdir().unwrap();
		for name in ["b", "a", "c"] {
			std::fs::write(dir.path().join(name), "").unwrap();
		}
		let names: Vec<_> = read_dir_sorted(dir.path())
			.unwrap()
			.into_iter()
			.map(|x| x.file_name().unwrap().to_string_lossy().to_string())
			.collect();
		assert_eq!(names, ["a", "b", "c"]);

		let err = read_dir_sorted(&dir.path().join("missing")).unwrap_err();
		assert!(matches!(err, CompileError::Io { .. }));
	}

	#[test]
	fn test_resolve_path() {
		let dir = tempfile::tempdir().unwrap();
		let root = dir.path().canonicalize().unwrap();
		std::fs::create_dir(root.join("src")).unwrap();

		assert_eq!(resolve_path(&dir.path().join("src")).unwrap(), root.join("src"));
		assert_eq!(
			resolve_path(&dir.path().join("src/../out/pack")).unwrap(),
			root.join("out/pack")
		);
		assert_eq!(
			resolve_path(&dir.path().join("src/out/pack")).unwrap(),
			root.join("src/out/pack")
		);
	}

	#[test]
	fn test_slash_path() {
		let path: PathBuf = ["ns", "functions", "a.deco"].iter().collect();
		assert_eq!(slash_path(&path), "ns/functions/a.deco");
	}
}
