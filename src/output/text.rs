// Well-known tags
pub const ENGINE_NAMESPACE: &str = "minecraft";
pub const LOAD_TAG: &str = "load";
pub const TICK_TAG: &str = "tick";

// Extensions
pub const DECO_EXTENSION: &str = "deco";
pub const FUNCTION_EXTENSION: &str = "mcfunction";

// Raycast
pub const RAYCAST_OBJECTIVE: &str = "deco.raycast";
pub const RAYCAST_HIT_PLAYER: &str = "#hit";
pub const RAYCAST_DISTANCE_PLAYER: &str = "#distance";

// Carrot on a stick
pub const CARROT_OBJECTIVE: &str = "deco.carrotonastick";
pub const CARROT_CRITERION: &str = "minecraft.used:minecraft.carrot_on_a_stick";

pub fn format_function_call(function: &impl std::fmt::Display) -> String {
	format!("function {function}")
}

pub fn format_revoke_advancement(advancement: &impl std::fmt::Display) -> String {
	format!("advancement revoke @s only {advancement}")
}

pub fn format_add_objective(objective: &str, criterion: &str) -> String {
	format!("scoreboard objectives add {objective} {criterion}")
}

pub fn format_set_score(player: &str, objective: &str, value: i64) -> String {
	format!("scoreboard players set {player} {objective} {value}")
}

/// Formats a float the shortest way that reads back to the same value
pub fn format_float(value: f64) -> String {
	format!("{value}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_float_format() {
		assert_eq!(format_float(0.5), "0.5");
		assert_eq!(format_float(1.0), "1");
		assert_eq!(format_float(0.25), "0.25");
	}
}
