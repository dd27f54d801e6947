use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ResourceLocation;

/// An advancement document. Only the criteria and the function reward are
/// modeled, which is all the event decorators need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advancement {
	pub criteria: BTreeMap<String, Criterion>,
	pub rewards: AdvancementRewards,
}

impl Advancement {
	/// Creates an advancement with a single criterion that runs a function when granted
	pub fn triggered(name: &str, criterion: Criterion, reward: ResourceLocation) -> Self {
		Self {
			criteria: BTreeMap::from([(name.to_string(), criterion)]),
			rewards: AdvancementRewards { function: reward },
		}
	}

	pub fn reward_function(&self) -> &ResourceLocation {
		&self.rewards.function
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
	pub trigger: String,
	pub conditions: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancementRewards {
	pub function: ResourceLocation,
}
