use serde_json::json;

use crate::common::advancement::Criterion;
use crate::common::{Advancement, CompileError, Function};
use crate::output::datapack::Datapack;
use crate::output::text::{
	format_add_objective, format_function_call, format_revoke_advancement, CARROT_CRITERION,
	CARROT_OBJECTIVE,
};

use super::{expect_no_params, Decorator};

const EVENT_DIR: &str = "event";

/// Registers an advancement that rewards the target, and makes the target
/// revoke it again so that the event can fire more than once
fn add_revoked_advancement(
	prefix: &str,
	criterion_name: &str,
	criterion: Criterion,
	target: &mut Function,
	pack: &mut Datapack,
) -> Result<(), CompileError> {
	let [location] = pack.generate_locations(EVENT_DIR, [prefix])?;
	let advancement = Advancement::triggered(criterion_name, criterion, target.location().clone());
	pack.add_advancement(location.clone(), advancement)?;
	target.add_command(format_revoke_advancement(&location));
	Ok(())
}

/// `@onPlaceBlock("block", ...)`: runs the function as a player that
/// places one of the given blocks
pub struct OnPlaceBlockDecorator;

impl Decorator for OnPlaceBlockDecorator {
	fn name(&self) -> &'static str {
		"onPlaceBlock"
	}

	fn apply(
		&self,
		params: Option<&[String]>,
		target: &mut Function,
		pack: &mut Datapack,
	) -> Result<(), CompileError> {
		let location: Vec<_> = params
			.unwrap_or_default()
			.iter()
			.map(|block| {
				json!({
					"condition": "minecraft:block_state_property",
					"block": block,
				})
			})
			.collect();
		let criterion = Criterion {
			trigger: "minecraft:placed_block".into(),
			conditions: json!({ "location": location }),
		};
		add_revoked_advancement("place_block", "on_place_block", criterion, target, pack)
	}
}

/// `@onPlayerDie`: runs the function as a player that dies
pub struct OnPlayerDieDecorator;

impl Decorator for OnPlayerDieDecorator {
	fn name(&self) -> &'static str {
		"onPlayerDie"
	}

	fn apply(
		&self,
		params: Option<&[String]>,
		target: &mut Function,
		pack: &mut Datapack,
	) -> Result<(), CompileError> {
		expect_no_params(self.name(), params)?;
		let criterion = Criterion {
			trigger: "minecraft:entity_hurt_player".into(),
			conditions: json!({
				"player": [
					{
						"condition": "minecraft:entity_properties",
						"entity": "this",
						"predicate": {
							"nbt": "{Health:0f}"
						}
					}
				]
			}),
		};
		add_revoked_advancement("player_die", "requirement", criterion, target, pack)
	}
}

/// `@carrotOnAStick`: runs the function as an entity that uses a carrot on
/// a stick. All uses share one dispatcher function that is polled every tick
pub struct CarrotOnAStickDecorator;

impl Decorator for CarrotOnAStickDecorator {
	fn name(&self) -> &'static str {
		"carrotOnAStick"
	}

	fn apply(
		&self,
		params: Option<&[String]>,
		target: &mut Function,
		pack: &mut Datapack,
	) -> Result<(), CompileError> {
		expect_no_params(self.name(), params)?;

		let dispatcher = match pack.state.carrot_dispatcher.clone() {
			Some(dispatcher) => dispatcher,
			None => {
				let [location] = pack.generate_locations(EVENT_DIR, ["carrot_on_a_stick"])?;
				let mut dispatcher = Function::new(location.clone());
				// Must stay the last command
				dispatcher.add_command(format!("scoreboard players set @s {CARROT_OBJECTIVE} 0"));
				pack.add_generated_function(dispatcher)?;
				pack.add_load(format_add_objective(CARROT_OBJECTIVE, CARROT_CRITERION));
				pack.add_tick(format!(
					"execute as @e[scores={{{CARROT_OBJECTIVE}=1..}}] run {}",
					format_function_call(&location)
				));
				pack.state.carrot_dispatcher = Some(location.clone());
				location
			}
		};

		let dispatcher = pack
			.function_mut(&dispatcher)
			.ok_or(CompileError::MissingFunction(dispatcher.clone()))?;
		dispatcher.insert_command(
			-1,
			format!(
				"execute as @s at @s run {}",
				format_function_call(target.location())
			),
		);

		Ok(())
	}
}
