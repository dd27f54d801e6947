use crate::ir::{Call, DecoratorUse, Expr, FunctionDecl, Item, ParsedFile, Statement};

use super::lex::{is_ident_char, is_ident_start, Line, LineKind, Scanner, Side, TextPos, Token};
use super::ParseError;

// If rustfmt formats this it will continue to indent the blocks forever
#[rustfmt::skip]
macro_rules! consume_expect {
	($toks:ident, $ty:pat, $msg:expr) => {{
		match $toks.next_token()? {
			Some($ty) => {}
			Some(other) => {
				return Err(ParseError::new($toks.pos(), format!("{}, found {other:?}", $msg)))
			}
			None => return Err(ParseError::new($toks.pos(), $msg)),
		}
	}};
}

// If rustfmt formats this it will continue to indent the blocks forever
#[rustfmt::skip]
macro_rules! consume_extract {
	($toks:ident, $ty:ident, $msg:expr) => {{
		match $toks.next_token()? {
			Some(Token::$ty(tok)) => tok,
			Some(other) => {
				return Err(ParseError::new($toks.pos(), format!("{}, found {other:?}", $msg)))
			}
			None => return Err(ParseError::new($toks.pos(), $msg)),
		}
	}};
}

const FUNC_KEYWORD: &str = "func";

pub fn parse_lines(lines: Vec<Line>) -> Result<ParsedFile, ParseError> {
	enum State {
		Root {
			decorators: Vec<DecoratorUse>,
			/// Where the pending decorators started
			start: Option<TextPos>,
		},
		Body(FunctionDecl),
	}

	let mut out = ParsedFile::new();
	let mut state = State::Root {
		decorators: Vec::new(),
		start: None,
	};

	for line in lines {
		let pos = line.pos;
		match &mut state {
			State::Root { decorators, start } => match line.kind {
				LineKind::Backtick(text) => {
					if let Some(start) = start {
						return Err(dangling_decorators(*start));
					}
					out.items.push(Item::Statement(Statement::Command(text)));
				}
				LineKind::Text(text) => {
					let mut scanner = Scanner::new(&text, pos);
					if text.starts_with('@') {
						decorators.extend(parse_decorators(&mut scanner)?);
						start.get_or_insert(pos);
					}
					let rest = scanner.rest().trim();
					if rest.is_empty() {
						continue;
					}
					if rest.starts_with('}') {
						return Err(ParseError::new(pos, "Unexpected `}` outside of a function"));
					}
					if starts_with_keyword(rest, FUNC_KEYWORD) {
						let mut scanner = Scanner::new(rest, pos);
						let mut decl = parse_header(&mut scanner)?;
						decl.decorators = std::mem::take(decorators);
						*start = None;
						match parse_header_rest(scanner.rest(), pos)? {
							HeaderRest::Open => state = State::Body(decl),
							HeaderRest::Closed(body) => {
								decl.body.extend(body);
								out.items.push(Item::Function(decl));
							}
						}
					} else if let Some(start) = start {
						return Err(dangling_decorators(*start));
					} else {
						out.items.push(Item::Statement(parse_statement(rest, pos)?));
					}
				}
			},
			State::Body(decl) => match line.kind {
				LineKind::Backtick(text) => decl.body.push(Statement::Command(text)),
				LineKind::Text(text) => {
					if text == "}" {
						out.items.push(Item::Function(std::mem::replace(
							decl,
							FunctionDecl::new("", 0),
						)));
						state = State::Root {
							decorators: Vec::new(),
							start: None,
						};
					} else if text.starts_with('@') {
						return Err(ParseError::new(
							pos,
							"Decorators must come before a function declaration",
						));
					} else if starts_with_keyword(&text, FUNC_KEYWORD) {
						return Err(ParseError::new(pos, "Functions can't be nested"));
					} else {
						decl.body.push(parse_statement(&text, pos)?);
					}
				}
			},
		}
	}

	match state {
		State::Body(decl) => Err(ParseError::new(
			TextPos::new(decl.line),
			format!("Function {} is missing a closing `}}`", decl.name),
		)),
		State::Root {
			start: Some(start), ..
		} => Err(dangling_decorators(start)),
		State::Root { .. } => Ok(out),
	}
}

fn dangling_decorators(pos: TextPos) -> ParseError {
	ParseError::new(pos, "Decorators must be followed by a function declaration")
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
	text.strip_prefix(keyword)
		.is_some_and(|rest| !rest.starts_with(is_ident_char))
}

/// Parses any number of `@name` or `@name(params)` decorators
fn parse_decorators(toks: &mut Scanner) -> Result<Vec<DecoratorUse>, ParseError> {
	let mut out = Vec::new();
	while toks.peek_token()? == Some(Token::At) {
		consume_expect!(toks, Token::At, "Expected `@`");
		let name = consume_extract!(toks, Ident, "Expected a decorator name");
		if toks.peek_token()? == Some(Token::Paren(Side::Left)) {
			let params = parse_arg_tokens(toks)?
				.into_iter()
				.map(|tok| match tok {
					Token::Str(text) | Token::Num(text) | Token::Ident(text) => text,
					_ => String::new(),
				})
				.collect();
			out.push(DecoratorUse::with_params(name, params));
		} else {
			out.push(DecoratorUse::new(name));
		}
	}

	Ok(out)
}

/// Parses `func <name> {`
fn parse_header(toks: &mut Scanner) -> Result<FunctionDecl, ParseError> {
	let keyword = consume_extract!(toks, Ident, "Expected `func`");
	debug_assert_eq!(keyword, FUNC_KEYWORD);
	let name = consume_extract!(toks, Ident, "Expected a function name");
	consume_expect!(toks, Token::Curly(Side::Left), "Expected `{` after function name");

	Ok(FunctionDecl::new(name, toks.pos().line))
}

enum HeaderRest {
	/// The body continues on the following lines
	Open,
	/// The whole body was on the header line
	Closed(Option<Statement>),
}

fn parse_header_rest(rest: &str, pos: TextPos) -> Result<HeaderRest, ParseError> {
	let rest = rest.trim();
	if rest.is_empty() {
		return Ok(HeaderRest::Open);
	}
	let Some(inner) = rest.strip_suffix('}') else {
		return Err(ParseError::new(
			pos,
			"Expected a new line or a closing `}` after `{`",
		));
	};
	let inner = inner.trim();
	if inner.is_empty() {
		Ok(HeaderRest::Closed(None))
	} else {
		Ok(HeaderRest::Closed(Some(parse_statement(inner, pos)?)))
	}
}

/// Parses a line of a body. A line of the form `name(args)` is a call,
/// anything else is a command
pub fn parse_statement(text: &str, pos: TextPos) -> Result<Statement, ParseError> {
	let ident_len = text
		.find(|c: char| !is_ident_char(c))
		.unwrap_or(text.len());
	let is_call = text.starts_with(is_ident_start) && text[ident_len..].starts_with('(');
	if !is_call {
		return Ok(Statement::Command(text.to_string()));
	}

	let name = text[..ident_len].to_string();
	let mut toks = Scanner::new(&text[ident_len..], pos);
	let args = parse_arg_tokens(&mut toks)?
		.into_iter()
		.map(|tok| token_to_expr(tok, pos))
		.collect::<Result<_, _>>()?;
	if !toks.is_at_end() {
		return Err(ParseError::new(
			pos,
			format!("Unexpected text after call to {name}: {}", toks.rest().trim()),
		));
	}

	Ok(Statement::Call(Call {
		name,
		args,
		line: pos.line,
	}))
}

/// Parses a parenthesized, comma separated list of literal tokens
fn parse_arg_tokens(toks: &mut Scanner) -> Result<Vec<Token>, ParseError> {
	consume_expect!(toks, Token::Paren(Side::Left), "Expected `(`");
	let mut out = Vec::new();
	if toks.peek_token()? == Some(Token::Paren(Side::Right)) {
		toks.next_token()?;
		return Ok(out);
	}

	loop {
		match toks.next_token()? {
			Some(tok @ (Token::Str(..) | Token::Num(..) | Token::Ident(..))) => out.push(tok),
			Some(other) => {
				return Err(ParseError::new(
					toks.pos(),
					format!("Expected an argument, found {other:?}"),
				))
			}
			None => return Err(ParseError::new(toks.pos(), "Unterminated argument list")),
		}
		match toks.next_token()? {
			Some(Token::Comma) => continue,
			Some(Token::Paren(Side::Right)) => break,
			Some(other) => {
				return Err(ParseError::new(
					toks.pos(),
					format!("Expected `,` or `)`, found {other:?}"),
				))
			}
			None => return Err(ParseError::new(toks.pos(), "Unterminated argument list")),
		}
	}

	Ok(out)
}

fn token_to_expr(tok: Token, pos: TextPos) -> Result<Expr, ParseError> {
	let out = match tok {
		Token::Str(text) => Expr::Str(text),
		Token::Ident(ident) => Expr::Ident(ident),
		Token::Num(num) => Expr::Number(
			num.parse()
				.map_err(|_| ParseError::new(pos, format!("Invalid number {num}")))?,
		),
		other => {
			return Err(ParseError::new(
				pos,
				format!("Expected an argument, found {other:?}"),
			))
		}
	};

	Ok(out)
}
