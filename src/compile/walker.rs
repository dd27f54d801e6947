use rustc_hash::FxHashSet;

use crate::builtins::BuiltinRegistry;
use crate::common::{CompileError, Diagnostics, Function, ResourceLocation};
use crate::decorators::DecoratorRegistry;
use crate::ir::{FunctionDecl, Item, ParsedFile, Statement};
use crate::output::datapack::Datapack;

use super::source::DecoFile;

/// Walks the declarations of one parsed source file and fills the pack
pub struct Walker<'a> {
	pack: &'a mut Datapack,
	decorators: &'a DecoratorRegistry,
	builtins: &'a BuiltinRegistry,
	diagnostics: &'a mut Diagnostics,
	file: &'a DecoFile,
}

impl<'a> Walker<'a> {
	pub fn new(
		pack: &'a mut Datapack,
		decorators: &'a DecoratorRegistry,
		builtins: &'a BuiltinRegistry,
		diagnostics: &'a mut Diagnostics,
		file: &'a DecoFile,
	) -> Self {
		Self {
			pack,
			decorators,
			builtins,
			diagnostics,
			file,
		}
	}

	/// Compiles a whole file. An error means nothing from the file was
	/// added, or, for internal errors, that the run has to stop
	pub fn walk(&mut self, parsed: ParsedFile) -> Result<(), CompileError> {
		let locations = self.check_locations(&parsed)?;

		// Builtins expanded early in the file must not take names that
		// later declarations of the same file will register
		self.pack.hold_locations(locations);
		let result = self.walk_items(parsed);
		self.pack.release_held();
		result
	}

	fn walk_items(&mut self, parsed: ParsedFile) -> Result<(), CompileError> {
		let mut top_level = Vec::new();
		for item in parsed.items {
			match item {
				Item::Function(decl) => self.exit_function(decl)?,
				Item::Statement(stmt) => top_level.push(stmt),
			}
		}
		self.exit_program(top_level)
	}

	/// Checks that none of the user functions in the file exist already,
	/// before anything is changed, and returns their locations
	fn check_locations(&self, parsed: &ParsedFile) -> Result<Vec<ResourceLocation>, CompileError> {
		let mut locations = Vec::new();
		for decl in parsed.functions() {
			locations.push(self.file.function_location(&decl.name)?);
		}
		if parsed.top_level().next().is_some() {
			locations.push(self.file.location()?);
		}

		let mut seen = FxHashSet::default();
		for location in &locations {
			if self.pack.is_taken(location) || !seen.insert(location) {
				return Err(CompileError::DuplicateFunction(location.clone()));
			}
		}

		Ok(locations)
	}

	fn exit_function(&mut self, decl: FunctionDecl) -> Result<(), CompileError> {
		let location = self.file.function_location(&decl.name)?;
		let Some(mut function) = self.build_function(location, decl.body)? else {
			return Ok(());
		};

		for decorator in &decl.decorators {
			if let Err(e) = self.decorators.apply(decorator, &mut function, self.pack) {
				self.report(e)?;
			}
		}

		self.pack.add_function(function)
	}

	/// Statements outside of any function go into a function named after the file
	fn exit_program(&mut self, statements: Vec<Statement>) -> Result<(), CompileError> {
		if statements.is_empty() {
			return Ok(());
		}
		let location = self.file.location()?;
		let Some(function) = self.build_function(location, statements)? else {
			return Ok(());
		};
		if function.is_empty() {
			return Ok(());
		}

		self.pack.add_function(function)
	}

	/// Builds a function from statements, expanding builtin calls in order.
	/// If any call is invalid the whole function is dropped, and `None` is returned
	fn build_function(
		&mut self,
		location: ResourceLocation,
		body: Vec<Statement>,
	) -> Result<Option<Function>, CompileError> {
		let mut valid = true;
		for stmt in &body {
			if let Statement::Call(call) = stmt {
				if let Err(e) = self.builtins.check(call) {
					self.report(e)?;
					valid = false;
				}
			}
		}
		if !valid {
			tracing::debug!("Dropped function {location} because of invalid calls");
			return Ok(None);
		}

		let mut function = Function::new(location);
		for stmt in body {
			match stmt {
				Statement::Command(cmd) => function.add_command(cmd),
				Statement::Call(call) => self.builtins.expand(&call, &mut function, self.pack)?,
			}
		}

		Ok(Some(function))
	}

	/// Records a recoverable error, or passes an internal one on
	fn report(&mut self, error: CompileError) -> Result<(), CompileError> {
		if error.is_internal() {
			return Err(error);
		}
		self.diagnostics.push(Some(self.file.to_string()), error);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::path::Path;

	use crate::common::Severity;
	use crate::parse::parse_file;
	use crate::project::{ProjectSettingsBuilder, SuffixMode};

	use super::*;

	struct Fixture {
		pack: Datapack,
		decorators: DecoratorRegistry,
		builtins: BuiltinRegistry,
		diagnostics: Diagnostics,
	}

	impl Fixture {
		fn new() -> Self {
			let settings = ProjectSettingsBuilder::new("deco")
				.suffix_mode(SuffixMode::Sequential)
				.build();
			Self {
				pack: Datapack::new(&settings).unwrap(),
				decorators: DecoratorRegistry::with_builtins(),
				builtins: BuiltinRegistry::with_builtins(),
				diagnostics: Diagnostics::new(),
			}
		}

		fn walk(&mut self, path: &str, text: &str) -> Result<(), CompileError> {
			let file = DecoFile::from_data_path(Path::new(path)).unwrap();
			let parsed = parse_file(text).unwrap();
			Walker::new(
				&mut self.pack,
				&self.decorators,
				&self.builtins,
				&mut self.diagnostics,
				&file,
			)
			.walk(parsed)
		}

		fn contents(&self, loc: &str) -> Option<Vec<String>> {
			self.pack
				.function(&ResourceLocation::parse(loc).unwrap())
				.map(|x| x.contents().to_vec())
		}
	}

	#[test]
	fn test_main_and_helpers() {
		let mut fix = Fixture::new();
		fix.walk(
			"ns/functions/dir/a.deco",
			"@tick\nfunc main {\n  say hi\n}\nfunc helper { say help }",
		)
		.unwrap();
		assert_eq!(fix.contents("ns:dir/a").unwrap(), ["say hi"]);
		assert_eq!(fix.contents("ns:dir/helper").unwrap(), ["say help"]);
		assert!(fix.diagnostics.is_empty());
	}

	#[test]
	fn test_top_level_function() {
		let mut fix = Fixture::new();
		fix.walk("ns/functions/b.deco", "say top\nfunc f {}\nsay bottom")
			.unwrap();
		assert_eq!(fix.contents("ns:b").unwrap(), ["say top", "say bottom"]);
		assert_eq!(fix.contents("ns:f").unwrap(), Vec::<String>::new());

		// Files with only declarations don't get a file function
		fix.walk("ns/functions/c.deco", "func g {}").unwrap();
		assert!(fix.contents("ns:c").is_none());
	}

	#[test]
	fn test_duplicate_skips_file() {
		let mut fix = Fixture::new();
		let err = fix
			.walk("ns/functions/d.deco", "@tick func x {}\nfunc x {}")
			.unwrap_err();
		assert!(matches!(err, CompileError::DuplicateFunction(..)));
		assert!(fix.contents("ns:x").is_none());
		assert!(fix.pack.tag(&ResourceLocation::parse("minecraft:tick").unwrap()).unwrap().is_empty());

		fix.walk("ns/functions/e.deco", "func y {}").unwrap();
		let err = fix.walk("ns/functions/f.deco", "func y {}").unwrap_err();
		assert_eq!(err.severity(), Severity::Structural);
	}

	#[test]
	fn test_generated_names_avoid_later_declarations() {
		let mut fix = Fixture::new();
		fix.walk(
			"deco/functions/raycast/x.deco",
			"@tick\nfunc a {\n  raycast(\"@s\", \"minecraft:stone\", 1, 3, \"say hit\")\n}\nfunc hit_aaaaaaaa { say user }",
		)
		.unwrap();

		assert_eq!(fix.contents("deco:raycast/hit_aaaaaaaa").unwrap(), ["say user"]);
		assert_eq!(
			fix.contents("deco:raycast/a").unwrap(),
			["execute as @s at @s anchored eyes positioned ^ ^ ^ anchored feet run function deco:raycast/start_aaaaaaab"]
		);
		assert!(fix.contents("deco:raycast/hit_aaaaaaab").is_some());
		assert!(fix.diagnostics.is_empty());
		assert!(!fix.pack.is_taken(&ResourceLocation::parse("deco:raycast/unused").unwrap()));
	}

	#[test]
	fn test_bad_decorator_keeps_function() {
		let mut fix = Fixture::new();
		fix.walk(
			"ns/functions/g.deco",
			"@unknown @tag() @load\nfunc main { say still here }",
		)
		.unwrap();
		assert_eq!(fix.contents("ns:g").unwrap(), ["say still here"]);
		assert_eq!(fix.diagnostics.count(Severity::Semantic), 2);
		assert!(fix
			.pack
			.tag(&ResourceLocation::parse("minecraft:load").unwrap())
			.unwrap()
			.contains_function(&ResourceLocation::parse("ns:g").unwrap()));
	}

	#[test]
	fn test_macro_expansion_order() {
		let mut fix = Fixture::new();
		fix.walk(
			"ns/functions/h.deco",
			"func main {\n  say before\n  raycast(\"@s\", \"minecraft:stone\", 1, 3, \"say hit\")\n  say after\n}",
		)
		.unwrap();
		assert_eq!(
			fix.contents("ns:h").unwrap(),
			[
				"say before",
				"execute as @s at @s anchored eyes positioned ^ ^ ^ anchored feet run function deco:raycast/start_aaaaaaaa",
				"say after",
			]
		);
		assert!(fix.contents("deco:raycast/ray_aaaaaaaa").is_some());
	}

	#[test]
	fn test_bad_macro_drops_declaration() {
		let mut fix = Fixture::new();
		fix.walk(
			"ns/functions/i.deco",
			"@tick\nfunc main {\n  raycast(\"@s\", \"minecraft:stone\", 1, 3, \"say hit\")\n  raycast(\"@s\")\n}\nfunc other { teleport(1) }\nfunc fine { say ok }",
		)
		.unwrap();
		assert!(fix.contents("ns:i").is_none());
		assert!(fix.contents("ns:other").is_none());
		assert_eq!(fix.contents("ns:fine").unwrap(), ["say ok"]);
		assert_eq!(fix.pack.functions().count(), 1);
		assert_eq!(fix.diagnostics.len(), 2);
		assert!(fix
			.pack
			.tag(&ResourceLocation::parse("minecraft:tick").unwrap())
			.unwrap()
			.is_empty());
	}
}
