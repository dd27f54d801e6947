mod raycast;

use rustc_hash::FxHashMap;

use crate::common::{CompileError, Function};
use crate::ir::{Call, Expr};
use crate::output::datapack::Datapack;

pub use self::raycast::RaycastBuiltin;

/// A function-like call that is expanded at compile time into generated
/// functions, instead of being called at runtime
pub trait BuiltinMacro {
	fn name(&self) -> &'static str;

	/// Validates the arguments of a call without changing anything
	fn check(&self, args: &[Expr]) -> Result<(), CompileError>;

	/// Expands a call. Generated functions are registered in the pack and
	/// whatever is needed to run them is appended to `call_site`
	fn expand(
		&self,
		args: &[Expr],
		call_site: &mut Function,
		pack: &mut Datapack,
	) -> Result<(), CompileError>;
}

/// Builtin macros available to a compilation, by name
pub struct BuiltinRegistry {
	builtins: FxHashMap<&'static str, Box<dyn BuiltinMacro>>,
}

impl BuiltinRegistry {
	pub fn new() -> Self {
		Self {
			builtins: FxHashMap::default(),
		}
	}

	pub fn with_builtins() -> Self {
		let mut out = Self::new();
		out.register(RaycastBuiltin);
		out
	}

	pub fn register(&mut self, builtin: impl BuiltinMacro + 'static) {
		self.builtins.insert(builtin.name(), Box::new(builtin));
	}

	pub fn get(&self, name: &str) -> Result<&dyn BuiltinMacro, CompileError> {
		self.builtins
			.get(name)
			.map(|x| x.as_ref())
			.ok_or_else(|| CompileError::UnknownBuiltin(name.to_string()))
	}

	pub fn check(&self, call: &Call) -> Result<(), CompileError> {
		self.get(&call.name)?.check(&call.args)
	}

	pub fn expand(
		&self,
		call: &Call,
		call_site: &mut Function,
		pack: &mut Datapack,
	) -> Result<(), CompileError> {
		tracing::debug!("Expanding {} in {}", call.name, call_site.location());
		self.get(&call.name)?.expand(&call.args, call_site, pack)
	}
}

impl Default for BuiltinRegistry {
	fn default() -> Self {
		Self::with_builtins()
	}
}

fn invalid_args(name: &str, reason: impl Into<String>) -> CompileError {
	CompileError::InvalidBuiltinArgs {
		name: name.to_string(),
		reason: reason.into(),
	}
}

fn expect_arg_count<'a, const N: usize>(
	name: &str,
	args: &'a [Expr],
) -> Result<&'a [Expr; N], CompileError> {
	args.try_into()
		.map_err(|_| invalid_args(name, format!("Expected {N} arguments, found {}", args.len())))
}

fn expect_str<'a>(name: &str, index: usize, arg: &'a Expr) -> Result<&'a str, CompileError> {
	match arg {
		Expr::Str(text) => Ok(text),
		other => Err(invalid_args(
			name,
			format!("Argument {} must be a string, found {}", index + 1, other.kind()),
		)),
	}
}

fn expect_number(name: &str, index: usize, arg: &Expr) -> Result<f64, CompileError> {
	match arg {
		Expr::Number(num) => Ok(*num),
		other => Err(invalid_args(
			name,
			format!("Argument {} must be a number, found {}", index + 1, other.kind()),
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unknown_builtin() {
		let registry = BuiltinRegistry::with_builtins();
		let call = Call {
			name: "teleport".into(),
			args: Vec::new(),
			line: 1,
		};
		assert!(matches!(
			registry.check(&call),
			Err(CompileError::UnknownBuiltin(name)) if name == "teleport"
		));
	}

	#[test]
	fn test_arg_helpers() {
		let args = vec![Expr::Str("a".into()), Expr::Number(1.5)];
		let [a, b] = expect_arg_count::<2>("x", &args).unwrap();
		assert_eq!(expect_str("x", 0, a).unwrap(), "a");
		assert_eq!(expect_number("x", 1, b).unwrap(), 1.5);
		assert!(expect_number("x", 0, a).is_err());
		assert!(expect_arg_count::<3>("x", &args).is_err());

		// The arguments borrow from the call, not from the builtin's name
		let [first, _] = {
			let name = String::from("y");
			expect_arg_count::<2>(&name, &args).unwrap()
		};
		assert_eq!(first, &Expr::Str("a".into()));
	}
}
