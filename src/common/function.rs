use super::ResourceLocation;

/// A generated function file: a location and its command lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
	location: ResourceLocation,
	contents: Vec<String>,
}

impl Function {
	pub fn new(location: ResourceLocation) -> Self {
		Self {
			location,
			contents: Vec::new(),
		}
	}

	pub fn location(&self) -> &ResourceLocation {
		&self.location
	}

	pub fn contents(&self) -> &[String] {
		&self.contents
	}

	pub fn into_contents(self) -> Vec<String> {
		self.contents
	}

	pub fn is_empty(&self) -> bool {
		self.contents.is_empty()
	}

	/// Appends a command. Text spanning several lines becomes one command
	/// per line, and blank lines are dropped
	pub fn add_command(&mut self, command: impl AsRef<str>) {
		self.contents.extend(split_commands(command.as_ref()));
	}

	/// Inserts a command at an index. A negative index counts from the end,
	/// so `-1` inserts before the last command
	pub fn insert_command(&mut self, index: isize, command: impl AsRef<str>) {
		let index = if index < 0 {
			self.contents.len().saturating_sub(index.unsigned_abs())
		} else {
			index.unsigned_abs().min(self.contents.len())
		};
		let lines: Vec<_> = split_commands(command.as_ref()).collect();
		self.contents.splice(index..index, lines);
	}
}

fn split_commands(text: &str) -> impl Iterator<Item = String> + '_ {
	text.lines()
		.map(str::trim)
		.filter(|x| !x.is_empty())
		.map(str::to_string)
}
