mod builtin;
mod event;

use rustc_hash::FxHashMap;

use crate::common::{CompileError, Function};
use crate::ir::DecoratorUse;
use crate::output::datapack::Datapack;

pub use self::builtin::{LoadDecorator, TagDecorator, TickDecorator};
pub use self::event::{CarrotOnAStickDecorator, OnPlaceBlockDecorator, OnPlayerDieDecorator};

/// An annotation on a function declaration that registers the function
/// somewhere when it is compiled
pub trait Decorator {
	/// The name the decorator is used with in source, without the `@`
	fn name(&self) -> &'static str;

	/// Applies the decorator. `params` is `None` when the decorator was
	/// used without any parameters. Arity must be checked before any
	/// changes are made so that a failed decorator has no effect
	fn apply(
		&self,
		params: Option<&[String]>,
		target: &mut Function,
		pack: &mut Datapack,
	) -> Result<(), CompileError>;
}

/// Decorators available to a compilation, by name
pub struct DecoratorRegistry {
	decorators: FxHashMap<&'static str, Box<dyn Decorator>>,
}

impl DecoratorRegistry {
	/// Creates an empty registry
	pub fn new() -> Self {
		Self {
			decorators: FxHashMap::default(),
		}
	}

	/// Creates a registry with all of the builtin decorators
	pub fn with_builtins() -> Self {
		let mut out = Self::new();
		out.register(LoadDecorator);
		out.register(TickDecorator);
		out.register(TagDecorator);
		out.register(OnPlaceBlockDecorator);
		out.register(OnPlayerDieDecorator);
		out.register(CarrotOnAStickDecorator);
		out
	}

	/// Adds a decorator, replacing any existing one with the same name
	pub fn register(&mut self, decorator: impl Decorator + 'static) {
		self.decorators.insert(decorator.name(), Box::new(decorator));
	}

	pub fn get(&self, name: &str) -> Option<&dyn Decorator> {
		self.decorators.get(name).map(|x| x.as_ref())
	}

	pub fn apply(
		&self,
		usage: &DecoratorUse,
		target: &mut Function,
		pack: &mut Datapack,
	) -> Result<(), CompileError> {
		let decorator = self
			.get(&usage.name)
			.ok_or_else(|| CompileError::UnknownDecorator(usage.name.clone()))?;
		tracing::debug!("Applying @{} to {}", usage.name, target.location());
		decorator.apply(usage.params.as_deref(), target, pack)
	}
}

impl Default for DecoratorRegistry {
	fn default() -> Self {
		Self::with_builtins()
	}
}

/// Checks that a decorator was used without parameters
fn expect_no_params(name: &str, params: Option<&[String]>) -> Result<(), CompileError> {
	match params {
		None | Some([]) => Ok(()),
		Some(params) => Err(CompileError::InvalidDecoratorArgs {
			name: name.to_string(),
			reason: format!("Expected no parameters, found {}", params.len()),
		}),
	}
}

/// Checks that a decorator was used with exactly `N` parameters
fn expect_params<'p, const N: usize>(
	name: &str,
	params: Option<&'p [String]>,
) -> Result<&'p [String; N], CompileError> {
	let params = params.unwrap_or_default();
	params
		.try_into()
		.map_err(|_| CompileError::InvalidDecoratorArgs {
			name: name.to_string(),
			reason: format!("Expected {N} parameters, found {}", params.len()),
		})
}
