pub mod lex;
mod parse;

use thiserror::Error;

use crate::ir::ParsedFile;

use self::lex::{lex, TextPos};
use self::parse::parse_lines;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at {pos}: {message}")]
pub struct ParseError {
	pub pos: TextPos,
	pub message: String,
}

impl ParseError {
	pub fn new(pos: TextPos, message: impl Into<String>) -> Self {
		Self {
			pos,
			message: message.into(),
		}
	}
}

/// Parser for Deco source files
pub struct Parser {
	file: ParsedFile,
}

impl Parser {
	pub fn new() -> Self {
		Self {
			file: ParsedFile::new(),
		}
	}

	pub fn parse(&mut self, text: &str) -> Result<(), ParseError> {
		let lines = lex(text)?;
		let parsed = parse_lines(lines)?;
		self.file.items.extend(parsed.items);
		Ok(())
	}

	pub fn finish(self) -> ParsedFile {
		self.file
	}
}

impl Default for Parser {
	fn default() -> Self {
		Self::new()
	}
}

/// Parses a whole source file at once
pub fn parse_file(text: &str) -> Result<ParsedFile, ParseError> {
	let mut parser = Parser::new();
	parser.parse(text)?;
	Ok(parser.finish())
}
