use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::location::LocationError;
use super::ResourceLocation;

/// A function tag file, serialized as `{"values": [...], "replace": bool}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionTag {
	pub values: Vec<TagValue>,
	#[serde(default)]
	pub replace: bool,
}

impl FunctionTag {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_function(location: ResourceLocation) -> Self {
		Self {
			values: vec![TagValue::Function(location)],
			replace: false,
		}
	}

	pub fn add_function(&mut self, location: ResourceLocation) {
		self.values.push(TagValue::Function(location));
	}

	/// Puts a function at the front of the tag, unless it is already present
	pub fn prepend_function(&mut self, location: ResourceLocation) {
		if !self.contains_function(&location) {
			self.values.insert(0, TagValue::Function(location));
		}
	}

	pub fn contains_function(&self, location: &ResourceLocation) -> bool {
		self.values
			.iter()
			.any(|x| matches!(x, TagValue::Function(loc) if loc == location))
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

/// An entry in a function tag: either a function or, with a `#` prefix,
/// another function tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagValue {
	Function(ResourceLocation),
	Tag(ResourceLocation),
}

impl TagValue {
	pub fn parse(text: &str) -> Result<Self, LocationError> {
		match text.trim().strip_prefix('#') {
			Some(tag) => Ok(Self::Tag(ResourceLocation::parse(tag)?)),
			None => Ok(Self::Function(ResourceLocation::parse(text)?)),
		}
	}
}

impl Display for TagValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Function(loc) => write!(f, "{loc}"),
			Self::Tag(loc) => write!(f, "#{loc}"),
		}
	}
}

impl Serialize for TagValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

/// Tag entries can also be written in the long object form
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTagValue {
	Short(String),
	Long { id: String },
}

impl<'de> Deserialize<'de> for TagValue {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let text = match RawTagValue::deserialize(deserializer)? {
			RawTagValue::Short(text) | RawTagValue::Long { id: text } => text,
		};
		Self::parse(&text).map_err(serde::de::Error::custom)
	}
}
