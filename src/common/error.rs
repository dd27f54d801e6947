use std::fmt::Display;
use std::path::PathBuf;

use thiserror::Error;

use super::location::{LocationError, ResourceLocation};
use crate::parse::ParseError;

/// How far the effects of an error reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
	/// The offending source file is skipped, other files still compile
	Structural,
	/// The offending decorator, call or declaration is skipped
	Semantic,
	/// A bug in the compiler itself. The run is aborted
	Internal,
}

#[derive(Debug, Error)]
pub enum CompileError {
	#[error("Malformed source path {path}: {reason}")]
	MalformedPath { path: String, reason: String },
	#[error(transparent)]
	Parse(#[from] ParseError),
	#[error("Function {0} is declared more than once")]
	DuplicateFunction(ResourceLocation),
	#[error("Failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("Invalid function tag {path}: {message}")]
	InvalidTag { path: PathBuf, message: String },
	#[error("Unknown decorator @{0}")]
	UnknownDecorator(String),
	#[error("Invalid decorator arguments for @{name}: {reason}")]
	InvalidDecoratorArgs { name: String, reason: String },
	#[error("Unknown builtin {0}")]
	UnknownBuiltin(String),
	#[error("Invalid arguments for builtin {name}: {reason}")]
	InvalidBuiltinArgs { name: String, reason: String },
	#[error("Generated location {0} collides with an existing artifact")]
	GeneratedCollision(ResourceLocation),
	#[error("Could not find a free generated name under {0}")]
	NamesExhausted(String),
	#[error("Well-known tag {0} is missing")]
	MissingWellKnownTag(ResourceLocation),
	#[error("Generated function {0} does not exist")]
	MissingFunction(ResourceLocation),
	#[error("Invalid generated location: {0}")]
	GeneratedLocation(LocationError),
}

impl CompileError {
	pub fn severity(&self) -> Severity {
		match self {
			Self::MalformedPath { .. }
			| Self::Parse(..)
			| Self::DuplicateFunction(..)
			| Self::Io { .. }
			| Self::InvalidTag { .. } => Severity::Structural,
			Self::UnknownDecorator(..)
			| Self::InvalidDecoratorArgs { .. }
			| Self::UnknownBuiltin(..)
			| Self::InvalidBuiltinArgs { .. } => Severity::Semantic,
			Self::GeneratedCollision(..)
			| Self::NamesExhausted(..)
			| Self::MissingWellKnownTag(..)
			| Self::MissingFunction(..)
			| Self::GeneratedLocation(..) => Severity::Internal,
		}
	}

	pub fn is_internal(&self) -> bool {
		self.severity() == Severity::Internal
	}
}

/// A recoverable error, along with the source file it was found in
#[derive(Debug)]
pub struct Diagnostic {
	pub file: Option<String>,
	pub error: CompileError,
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.file {
			Some(file) => write!(f, "{file}: {}", self.error),
			None => write!(f, "{}", self.error),
		}
	}
}

/// Recoverable errors collected over one compilation run
#[derive(Debug, Default)]
pub struct Diagnostics {
	entries: Vec<Diagnostic>,
}

impl Diagnostics {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, file: Option<String>, error: CompileError) {
		tracing::warn!(file = file.as_deref().unwrap_or("<none>"), "{error}");
		self.entries.push(Diagnostic { file, error });
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
		self.entries.iter()
	}

	pub fn count(&self, severity: Severity) -> usize {
		self.entries
			.iter()
			.filter(|x| x.error.severity() == severity)
			.count()
	}
}
