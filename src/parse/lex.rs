use std::fmt::Display;

use super::ParseError;

/// A position in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPos {
	/// 1-based line number
	pub line: usize,
}

impl TextPos {
	pub fn new(line: usize) -> Self {
		Self { line }
	}
}

impl Display for TextPos {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "line {}", self.line)
	}
}

/// One logical source line, with comments and blank lines already removed
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
	pub kind: LineKind,
	pub pos: TextPos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
	/// A trimmed line of text
	Text(String),
	/// The contents of a backtick command literal, possibly spanning several lines
	Backtick(String),
}

/// Splits source text into logical lines
pub fn lex(text: &str) -> Result<Vec<Line>, ParseError> {
	enum LexState {
		Root,
		Backtick { text: String, start: TextPos },
	}

	let mut out = Vec::new();
	let mut state = LexState::Root;

	for (i, raw) in text.lines().enumerate() {
		let pos = TextPos::new(i + 1);

		match &mut state {
			LexState::Root => {
				let trimmed = raw.trim();
				if trimmed.is_empty() || is_comment(trimmed) {
					continue;
				}
				if let Some(rest) = trimmed.strip_prefix('`') {
					if let Some(inner) = rest.strip_suffix('`') {
						out.push(Line {
							kind: LineKind::Backtick(inner.to_string()),
							pos,
						});
					} else {
						state = LexState::Backtick {
							text: rest.to_string(),
							start: pos,
						};
					}
					continue;
				}
				out.push(Line {
					kind: LineKind::Text(trimmed.to_string()),
					pos,
				});
			}
			LexState::Backtick { text, start } => {
				text.push('\n');
				if let Some(inner) = raw.trim_end().strip_suffix('`') {
					text.push_str(inner);
					out.push(Line {
						kind: LineKind::Backtick(std::mem::take(text)),
						pos: *start,
					});
					state = LexState::Root;
				} else {
					text.push_str(raw);
				}
			}
		}
	}

	if let LexState::Backtick { start, .. } = state {
		return Err(ParseError::new(start, "Unterminated command literal"));
	}

	Ok(out)
}

fn is_comment(line: &str) -> bool {
	line.starts_with("//") || line.starts_with('#')
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
	At,
	Comma,
	Paren(Side),
	Curly(Side),
	Ident(String),
	/// String literal contents, with the quotes removed and escapes resolved
	Str(String),
	/// Numeric literal in its source form
	Num(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
	Left,
	Right,
}

/// Reads tokens from the start of a line on demand, so that the remainder
/// of the line can still be taken as raw text
#[derive(Clone, Copy)]
pub struct Scanner<'t> {
	text: &'t str,
	offset: usize,
	pos: TextPos,
}

impl<'t> Scanner<'t> {
	pub fn new(text: &'t str, pos: TextPos) -> Self {
		Self {
			text,
			offset: 0,
			pos,
		}
	}

	pub fn pos(&self) -> TextPos {
		self.pos
	}

	/// The text that has not been consumed yet
	pub fn rest(&self) -> &'t str {
		&self.text[self.offset..]
	}

	pub fn is_at_end(&self) -> bool {
		self.rest().trim().is_empty()
	}

	pub fn peek_token(&self) -> Result<Option<Token>, ParseError> {
		let mut copy = *self;
		copy.next_token()
	}

	pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
		self.skip_whitespace();
		let Some(c) = self.peek_char() else {
			return Ok(None);
		};

		let tok = match c {
			'@' => self.single(c, Token::At),
			',' => self.single(c, Token::Comma),
			'(' => self.single(c, Token::Paren(Side::Left)),
			')' => self.single(c, Token::Paren(Side::Right)),
			'{' => self.single(c, Token::Curly(Side::Left)),
			'}' => self.single(c, Token::Curly(Side::Right)),
			'"' | '\'' => Token::Str(self.string(c)?),
			c if c.is_ascii_digit() || c == '-' => Token::Num(self.number()?),
			c if is_ident_start(c) => Token::Ident(self.ident()),
			other => {
				return Err(ParseError::new(
					self.pos,
					format!("Unexpected character {other:?}"),
				))
			}
		};

		Ok(Some(tok))
	}

	fn peek_char(&self) -> Option<char> {
		self.rest().chars().next()
	}

	fn bump(&mut self, c: char) {
		self.offset += c.len_utf8();
	}

	fn single(&mut self, c: char, tok: Token) -> Token {
		self.bump(c);
		tok
	}

	fn skip_whitespace(&mut self) {
		while let Some(c) = self.peek_char() {
			if !c.is_whitespace() {
				break;
			}
			self.bump(c);
		}
	}

	fn string(&mut self, quote: char) -> Result<String, ParseError> {
		self.bump(quote);
		let mut out = String::new();
		loop {
			let Some(c) = self.peek_char() else {
				return Err(ParseError::new(self.pos, "Unterminated string literal"));
			};
			self.bump(c);
			match c {
				'\\' => {
					let Some(escaped) = self.peek_char() else {
						return Err(ParseError::new(self.pos, "Unterminated string literal"));
					};
					self.bump(escaped);
					if escaped != quote && escaped != '\\' {
						out.push('\\');
					}
					out.push(escaped);
				}
				c if c == quote => break,
				c => out.push(c),
			}
		}

		Ok(out)
	}

	fn number(&mut self) -> Result<String, ParseError> {
		let start = self.offset;
		if self.peek_char() == Some('-') {
			self.bump('-');
		}
		let int_digits = self.digits();
		if int_digits == 0 {
			return Err(ParseError::new(self.pos, "Expected digits in number"));
		}
		if self.peek_char() == Some('.') {
			self.bump('.');
			if self.digits() == 0 {
				return Err(ParseError::new(self.pos, "Expected digits after decimal point"));
			}
		}

		Ok(self.text[start..self.offset].to_string())
	}

	fn digits(&mut self) -> usize {
		let mut count = 0;
		while let Some(c) = self.peek_char().filter(char::is_ascii_digit) {
			self.bump(c);
			count += 1;
		}
		count
	}

	fn ident(&mut self) -> String {
		let start = self.offset;
		while let Some(c) = self.peek_char().filter(|c| is_ident_char(*c)) {
			self.bump(c);
		}
		self.text[start..self.offset].to_string()
	}
}

pub fn is_ident_start(c: char) -> bool {
	c.is_ascii_alphabetic() || c == '_'
}

pub fn is_ident_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(text: &str) -> Vec<Token> {
		let mut scanner = Scanner::new(text, TextPos::new(1));
		let mut out = Vec::new();
		while let Some(tok) = scanner.next_token().unwrap() {
			out.push(tok);
		}
		out
	}

	#[test]
	fn test_lex_lines() {
		let lines = lex("// comment\n\n  say hi  \n# other\n`say a\n  say b`\n`say c`").unwrap();
		assert_eq!(
			lines,
			vec![
				Line {
					kind: LineKind::Text("say hi".into()),
					pos: TextPos::new(3)
				},
				Line {
					kind: LineKind::Backtick("say a\n  say b".into()),
					pos: TextPos::new(5)
				},
				Line {
					kind: LineKind::Backtick("say c".into()),
					pos: TextPos::new(7)
				},
			]
		);
	}

	#[test]
	fn test_unterminated_backtick() {
		let err = lex("say a\n`say b\nsay c").unwrap_err();
		assert_eq!(err.pos, TextPos::new(2));
	}

	#[test]
	fn test_tokens() {
		assert_eq!(
			tokens(r#"@tag("ns:x", 'it\'s', -1.5, foo)"#),
			vec![
				Token::At,
				Token::Ident("tag".into()),
				Token::Paren(Side::Left),
				Token::Str("ns:x".into()),
				Token::Comma,
				Token::Str("it's".into()),
				Token::Comma,
				Token::Num("-1.5".into()),
				Token::Comma,
				Token::Ident("foo".into()),
				Token::Paren(Side::Right),
			]
		);
	}

	#[test]
	fn test_string_escapes() {
		assert_eq!(
			tokens(r#""a \"b\" \\ \n""#),
			vec![Token::Str(r#"a "b" \ \n"#.into())]
		);
		let mut scanner = Scanner::new("\"open", TextPos::new(4));
		assert!(scanner.next_token().is_err());
	}

	#[test]
	fn test_rest() {
		let mut scanner = Scanner::new("func main { say hi }", TextPos::new(1));
		assert_eq!(scanner.next_token().unwrap(), Some(Token::Ident("func".into())));
		assert_eq!(scanner.next_token().unwrap(), Some(Token::Ident("main".into())));
		assert_eq!(scanner.next_token().unwrap(), Some(Token::Curly(Side::Left)));
		assert_eq!(scanner.rest(), " say hi }");
	}
}
