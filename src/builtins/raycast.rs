use crate::common::{CompileError, Function};
use crate::ir::Expr;
use crate::output::datapack::Datapack;
use crate::output::text::{
	format_function_call, format_float, format_set_score, RAYCAST_DISTANCE_PLAYER,
	RAYCAST_HIT_PLAYER, RAYCAST_OBJECTIVE,
};
use crate::push_cmds;

use super::{expect_arg_count, expect_number, expect_str, invalid_args, BuiltinMacro};

const NAME: &str = "raycast";

/// `raycast(shooter, block, step, max_distance, callback)`: steps forward
/// from the shooter's eyes until a matching block is found or the distance
/// runs out, then runs the callback at the hit position
pub struct RaycastBuiltin;

struct RaycastArgs<'a> {
	shooter: &'a str,
	block: &'a str,
	step: f64,
	/// How many steps can be taken before giving up
	limit: i32,
	callback: &'a str,
}

impl<'a> RaycastArgs<'a> {
	fn from_args(args: &'a [Expr]) -> Result<Self, CompileError> {
		let [shooter, block, step, max, callback] = expect_arg_count::<5>(NAME, args)?;
		let shooter = expect_str(NAME, 0, shooter)?;
		let block = expect_str(NAME, 1, block)?;
		let step = expect_number(NAME, 2, step)?;
		let max = expect_number(NAME, 3, max)?;
		let callback = expect_str(NAME, 4, callback)?;

		if !step.is_finite() || step <= 0.0 {
			return Err(invalid_args(NAME, format!("Step {step} must be positive")));
		}
		if !max.is_finite() || max < 0.0 {
			return Err(invalid_args(
				NAME,
				format!("Max distance {max} must not be negative"),
			));
		}
		if shooter.trim().is_empty() || block.trim().is_empty() {
			return Err(invalid_args(NAME, "Shooter and block must not be empty"));
		}
		// The step count is kept in a scoreboard, which only holds 32-bit values
		let limit = (max / step).floor();
		if limit > f64::from(i32::MAX) {
			return Err(invalid_args(
				NAME,
				format!("Max distance {max} takes more than {} steps of {step}", i32::MAX),
			));
		}

		Ok(Self {
			shooter,
			block,
			step,
			limit: limit as i32,
			callback,
		})
	}
}

impl BuiltinMacro for RaycastBuiltin {
	fn name(&self) -> &'static str {
		NAME
	}

	fn check(&self, args: &[Expr]) -> Result<(), CompileError> {
		RaycastArgs::from_args(args).map(|_| ())
	}

	fn expand(
		&self,
		args: &[Expr],
		call_site: &mut Function,
		pack: &mut Datapack,
	) -> Result<(), CompileError> {
		let args = RaycastArgs::from_args(args)?;
		let [hit_loc, ray_loc, start_loc] =
			pack.generate_locations(NAME, ["hit", "ray", "start"])?;

		let mut hit = Function::new(hit_loc.clone());
		push_cmds!(hit,
			format_set_score(RAYCAST_HIT_PLAYER, RAYCAST_OBJECTIVE, 1);
			args.callback;
		);

		let mut ray = Function::new(ray_loc.clone());
		push_cmds!(ray,
			format!("execute if block ~ ~ ~ {} run {}", args.block, format_function_call(&hit_loc));
			format!("scoreboard players add {RAYCAST_DISTANCE_PLAYER} {RAYCAST_OBJECTIVE} 1");
			format!(
				"execute if score {RAYCAST_HIT_PLAYER} {RAYCAST_OBJECTIVE} matches 0 if score {RAYCAST_DISTANCE_PLAYER} {RAYCAST_OBJECTIVE} matches ..{} positioned ^ ^ ^{} run {}",
				args.limit,
				format_float(args.step),
				format_function_call(&ray_loc)
			);
		);

		let mut start = Function::new(start_loc.clone());
		push_cmds!(start,
			format_set_score(RAYCAST_HIT_PLAYER, RAYCAST_OBJECTIVE, 0);
			format_set_score(RAYCAST_DISTANCE_PLAYER, RAYCAST_OBJECTIVE, 0);
			format_function_call(&ray_loc);
		);

		pack.add_generated_function(hit)?;
		pack.add_generated_function(ray)?;
		pack.add_generated_function(start)?;

		if !pack.state.raycast_objective {
			pack.add_load(format!("scoreboard objectives add {RAYCAST_OBJECTIVE} dummy"));
			pack.state.raycast_objective = true;
		}

		call_site.add_command(format!(
			"execute as {} at @s anchored eyes positioned ^ ^ ^ anchored feet run {}",
			args.shooter,
			format_function_call(&start_loc)
		));

		Ok(())
	}
}
