use crate::common::{CompileError, Function, ResourceLocation};
use crate::output::datapack::{Datapack, WellKnownTag};

use super::{expect_no_params, expect_params, Decorator};

/// `@load`: runs the function when the pack is loaded
pub struct LoadDecorator;

impl Decorator for LoadDecorator {
	fn name(&self) -> &'static str {
		"load"
	}

	fn apply(
		&self,
		params: Option<&[String]>,
		target: &mut Function,
		pack: &mut Datapack,
	) -> Result<(), CompileError> {
		expect_no_params(self.name(), params)?;
		pack.well_known_tag_mut(WellKnownTag::Load)?
			.add_function(target.location().clone());
		Ok(())
	}
}

/// `@tick`: runs the function every tick
pub struct TickDecorator;

impl Decorator for TickDecorator {
	fn name(&self) -> &'static str {
		"tick"
	}

	fn apply(
		&self,
		params: Option<&[String]>,
		target: &mut Function,
		pack: &mut Datapack,
	) -> Result<(), CompileError> {
		expect_no_params(self.name(), params)?;
		pack.well_known_tag_mut(WellKnownTag::Tick)?
			.add_function(target.location().clone());
		Ok(())
	}
}

/// `@tag("ns:name")`: adds the function to a function tag, creating the tag
/// if it doesn't exist yet
pub struct TagDecorator;

impl Decorator for TagDecorator {
	fn name(&self) -> &'static str {
		"tag"
	}

	fn apply(
		&self,
		params: Option<&[String]>,
		target: &mut Function,
		pack: &mut Datapack,
	) -> Result<(), CompileError> {
		let [tag] = expect_params::<1>(self.name(), params)?;
		let tag = ResourceLocation::parse(tag).map_err(|e| CompileError::InvalidDecoratorArgs {
			name: self.name().to_string(),
			reason: format!("Invalid tag location {tag:?}: {e}"),
		})?;
		pack.tag_mut(&tag).add_function(target.location().clone());
		Ok(())
	}
}
