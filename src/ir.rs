//! Declaration records handed from the parser to the compile walker.
//! They own all of their data and hold no references into the parser

use std::fmt::Debug;

/// One parsed source file, in source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedFile {
	pub items: Vec<Item>,
}

impl ParsedFile {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
		self.items.iter().filter_map(|x| match x {
			Item::Function(decl) => Some(decl),
			Item::Statement(..) => None,
		})
	}

	/// Statements outside of any function
	pub fn top_level(&self) -> impl Iterator<Item = &Statement> {
		self.items.iter().filter_map(|x| match x {
			Item::Statement(stmt) => Some(stmt),
			Item::Function(..) => None,
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
	Function(FunctionDecl),
	Statement(Statement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
	pub name: String,
	pub decorators: Vec<DecoratorUse>,
	pub body: Vec<Statement>,
	pub line: usize,
}

impl FunctionDecl {
	pub fn new(name: impl Into<String>, line: usize) -> Self {
		Self {
			name: name.into(),
			decorators: Vec::new(),
			body: Vec::new(),
			line,
		}
	}
}

/// A decorator attached to a declaration. Parameters have their quotes
/// stripped, and a decorator without parameters has `None`
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratorUse {
	pub name: String,
	pub params: Option<Vec<String>>,
}

impl DecoratorUse {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			params: None,
		}
	}

	pub fn with_params(name: impl Into<String>, params: Vec<String>) -> Self {
		Self {
			name: name.into(),
			params: if params.is_empty() {
				None
			} else {
				Some(params)
			},
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	/// A literal command that is copied into the function
	Command(String),
	Call(Call),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
	pub name: String,
	pub args: Vec<Expr>,
	pub line: usize,
}

#[derive(Clone, PartialEq)]
pub enum Expr {
	Str(String),
	Number(f64),
	Ident(String),
}

impl Expr {
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Str(..) => "string",
			Self::Number(..) => "number",
			Self::Ident(..) => "identifier",
		}
	}
}

impl Debug for Expr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Str(text) => write!(f, "{text:?}"),
			Self::Number(num) => write!(f, "{num}"),
			Self::Ident(ident) => write!(f, "{ident}"),
		}
	}
}
