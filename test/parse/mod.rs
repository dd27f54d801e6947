use std::panic::catch_unwind;

use anyhow::{bail, Context};
use deco::ir::{Call, DecoratorUse, Expr, FunctionDecl, Item, ParsedFile, Statement};
use deco::parse::Parser;

struct Test {
	name: &'static str,
	input: &'static str,
	output: ParsedFile,
}

macro_rules! test {
	($name:literal, $output:block) => {
		Test {
			name: $name,
			input: include_str!(concat!("tests/", $name, ".deco")),
			output: $output,
		}
	};
	($name:literal, $input:literal, $output:block) => {
		Test {
			name: $name,
			input: $input,
			output: $output,
		}
	};
}

fn cmd(text: &str) -> Statement {
	Statement::Command(text.into())
}

fn main() {
	let tests = [
		test!("simple", {
			let mut file = ParsedFile::new();
			let mut decl = FunctionDecl::new("main", 3);
			decl.decorators.push(DecoratorUse::new("tick"));
			decl.body.push(cmd("say hello"));
			decl.body.push(cmd(r#"tellraw @a {"text":"(hi)"}"#));
			file.items.push(Item::Function(decl));
			file
		}),
		test!("mixed", {
			let mut file = ParsedFile::new();
			file.items.push(Item::Statement(cmd("say file scope")));

			let mut setup = FunctionDecl::new("setup", 5);
			setup.decorators = vec![
				DecoratorUse::new("load"),
				DecoratorUse::with_params("tag", vec!["ns:group".into()]),
			];
			setup.body.push(cmd("scoreboard objectives add deco dummy"));
			file.items.push(Item::Function(setup));

			let mut shoot = FunctionDecl::new("shoot", 7);
			shoot.body.push(Statement::Call(Call {
				name: "raycast".into(),
				args: vec![
					Expr::Str("@s".into()),
					Expr::Str("minecraft:stone".into()),
					Expr::Number(0.5),
					Expr::Number(10.0),
					Expr::Str("say hit".into()),
				],
				line: 8,
			}));
			shoot.body.push(cmd("execute as @a\n\trun say multi"));
			file.items.push(Item::Function(shoot));

			let mut placed = FunctionDecl::new("placed", 13);
			placed.decorators.push(DecoratorUse::with_params(
				"onPlaceBlock",
				vec!["minecraft:stone".into(), "minecraft:dirt".into()],
			));
			file.items.push(Item::Function(placed));
			file
		}),
		test!("empty_body", "func nothing {\n}\n", {
			let mut file = ParsedFile::new();
			file.items.push(Item::Function(FunctionDecl::new("nothing", 1)));
			file
		}),
	];

	for test in tests {
		let name = test.name;
		catch_unwind(|| {
			println!("     - Running parse test '{name}'");
			run_test(test).expect("Test failed");
		})
		.unwrap_or_else(|_| panic!("Test {name} failed"));
	}

	for (name, input) in [
		("unclosed", "func a {\nsay hi"),
		("stray decorator", "@tick\nsay hi"),
		("nested", "func a {\nfunc b {\n}\n}"),
		("stray brace", "func a {\n}\n}"),
		("unterminated string", "@tag(\"ns:x) func a {}"),
	] {
		println!("     - Running parse error test '{name}'");
		let mut parse = Parser::new();
		assert!(parse.parse(input).is_err(), "Test {name} should fail to parse");
	}
}

fn run_test(test: Test) -> anyhow::Result<()> {
	let mut parse = Parser::new();
	parse.parse(test.input).context("Failed to parse")?;
	let actual = parse.finish();

	assert_eq!(
		test.output.items.len(),
		actual.items.len(),
		"Files do not have the same number of items"
	);
	for (i, (l, r)) in test.output.items.iter().zip(actual.items.iter()).enumerate() {
		match (l, r) {
			(Item::Function(l), Item::Function(r)) => {
				assert_eq!(l.name, r.name, "Function name mismatch at item {i}");
				assert_eq!(l.line, r.line, "Line mismatch for function {}", l.name);
				assert_eq!(l.decorators, r.decorators, "Decorators of {} failed to match", l.name);
				for (j, (l, r)) in l.body.iter().zip(r.body.iter()).enumerate() {
					assert_eq!(l, r, "Statement {j} failed to match");
				}
				assert_eq!(l.body.len(), r.body.len(), "Bodies are not same size");
			}
			(Item::Statement(l), Item::Statement(r)) => {
				assert_eq!(l, r, "Statement at item {i} failed to match")
			}
			_ => bail!("Item {i} is of a different kind: {l:?} vs {r:?}"),
		}
	}

	Ok(())
}
