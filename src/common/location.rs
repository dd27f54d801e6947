use std::fmt::{Debug, Display};
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A normalized `namespace:path/name` identifier.
///
/// Every part is lower-cased and checked on construction, so two locations
/// are equal exactly when their string forms are equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
	namespace: String,
	path: Vec<String>,
	name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
	#[error("Resource location {0:?} must contain exactly one colon")]
	Colon(String),
	#[error("Resource location {0:?} has an empty namespace")]
	EmptyNamespace(String),
	#[error("Resource location {0:?} has no name")]
	EmptyName(String),
	#[error("Invalid character {1:?} in resource location part {0:?}")]
	InvalidChar(String, char),
}

impl ResourceLocation {
	/// Creates a location from its parts. Path parts may themselves contain
	/// separators; they are split and empty segments are dropped.
	pub fn new<P, S>(namespace: &str, path: P, name: &str) -> Result<Self, LocationError>
	where
		P: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let namespace = normalize_part(namespace)?;
		if namespace.is_empty() {
			return Err(LocationError::EmptyNamespace(format!("{namespace}:{name}")));
		}
		let mut segments = Vec::new();
		for part in path {
			segments.extend(split_segments(part.as_ref())?);
		}
		let mut name_segments = split_segments(name)?;
		let Some(name) = name_segments.pop() else {
			return Err(LocationError::EmptyName(format!("{namespace}:{name}")));
		};
		segments.extend(name_segments);

		Ok(Self {
			namespace,
			path: segments,
			name,
		})
	}

	/// Parses a location in its string form. Backslashes are treated as
	/// path separators.
	pub fn parse(text: &str) -> Result<Self, LocationError> {
		let Some((namespace, rest)) = text.split_once(':') else {
			return Err(LocationError::Colon(text.to_string()));
		};
		if rest.contains(':') {
			return Err(LocationError::Colon(text.to_string()));
		}
		if namespace.trim().is_empty() {
			return Err(LocationError::EmptyNamespace(text.to_string()));
		}
		Self::new(namespace.trim(), std::iter::empty::<&str>(), rest).map_err(|e| match e {
			LocationError::EmptyName(_) => LocationError::EmptyName(text.to_string()),
			other => other,
		})
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn path(&self) -> &[String] {
		&self.path
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Creates a sibling location with the same namespace and path but a different name
	pub fn with_name(&self, name: &str) -> Result<Self, LocationError> {
		Self::new(&self.namespace, &self.path, name)
	}

	/// The path and name joined with slashes, without the namespace
	pub fn full_path(&self) -> String {
		self.path.iter().map(String::as_str).chain([self.name.as_str()]).join("/")
	}
}

fn split_segments(text: &str) -> Result<Vec<String>, LocationError> {
	text.split(['/', '\\'])
		.map(str::trim)
		.filter(|x| !x.is_empty())
		.map(normalize_part)
		.collect()
}

fn normalize_part(part: &str) -> Result<String, LocationError> {
	let part = part.trim().to_lowercase();
	if let Some(c) = part.chars().find(|c| !is_valid_char(*c)) {
		return Err(LocationError::InvalidChar(part, c));
	}
	Ok(part)
}

fn is_valid_char(c: char) -> bool {
	matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

impl Display for ResourceLocation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.namespace, self.full_path())
	}
}

impl Debug for ResourceLocation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{self}")
	}
}

impl FromStr for ResourceLocation {
	type Err = LocationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl Serialize for ResourceLocation {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for ResourceLocation {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let text = String::deserialize(deserializer)?;
		Self::parse(&text).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_round_trip() {
		for text in ["ns:name", "ns:a/b/name", "minecraft:tick", "my_pack:gen/ray.x-1"] {
			let loc = ResourceLocation::parse(text).unwrap();
			assert_eq!(loc.to_string(), text);
			assert_eq!(ResourceLocation::parse(&loc.to_string()).unwrap(), loc);
		}
	}

	#[test]
	fn test_normalization() {
		let upper = ResourceLocation::parse("NS:Core/Main").unwrap();
		let lower = ResourceLocation::parse("ns:core/main").unwrap();
		assert_eq!(upper, lower);
		assert_eq!(upper.to_string(), "ns:core/main");

		let messy = ResourceLocation::parse("ns:/core\\\\util//main/").unwrap();
		assert_eq!(messy.to_string(), "ns:core/util/main");
		assert_eq!(messy.path(), &["core".to_string(), "util".to_string()]);
		assert_eq!(messy.name(), "main");
	}

	#[test]
	fn test_from_parts() {
		let loc = ResourceLocation::new("ns", ["a/b", "c"], "main").unwrap();
		assert_eq!(loc.to_string(), "ns:a/b/c/main");
		let loc = ResourceLocation::new("ns", Vec::<String>::new(), "main").unwrap();
		assert_eq!(loc.to_string(), "ns:main");
		assert_eq!(loc.with_name("other").unwrap().to_string(), "ns:other");
	}

	#[test]
	fn test_invalid() {
		assert!(matches!(
			ResourceLocation::parse("no_colon"),
			Err(LocationError::Colon(..))
		));
		assert!(matches!(
			ResourceLocation::parse("a:b:c"),
			Err(LocationError::Colon(..))
		));
		assert!(matches!(
			ResourceLocation::parse(":name"),
			Err(LocationError::EmptyNamespace(..))
		));
		assert!(matches!(
			ResourceLocation::parse("ns:/"),
			Err(LocationError::EmptyName(..))
		));
		assert!(matches!(
			ResourceLocation::parse("ns:has space"),
			Err(LocationError::InvalidChar(_, ' '))
		));
	}

	#[test]
	fn test_serde() {
		let loc = ResourceLocation::parse("ns:a/b").unwrap();
		let json = serde_json::to_string(&loc).unwrap();
		assert_eq!(json, "\"ns:a/b\"");
		let back: ResourceLocation = serde_json::from_str(&json).unwrap();
		assert_eq!(back, loc);
	}
}
