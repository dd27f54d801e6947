/// Settings for one compilation run
#[derive(Clone, Debug)]
pub struct ProjectSettings {
	/// Namespace that generated functions and advancements are placed in
	pub(crate) namespace: String,
	pub(crate) suffix_mode: SuffixMode,
	/// Pack format written to pack.mcmeta when the source has none
	pub(crate) pack_format: u32,
}

impl ProjectSettings {
	pub fn new(namespace: String) -> Self {
		Self {
			namespace,
			suffix_mode: SuffixMode::Seeded(0),
			pack_format: DEFAULT_PACK_FORMAT,
		}
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn suffix_mode(&self) -> SuffixMode {
		self.suffix_mode
	}

	pub fn pack_format(&self) -> u32 {
		self.pack_format
	}
}

impl Default for ProjectSettings {
	fn default() -> Self {
		Self::new(DEFAULT_NAMESPACE.to_string())
	}
}

pub const DEFAULT_NAMESPACE: &str = "deco";
/// Minecraft 1.20.x
pub const DEFAULT_PACK_FORMAT: u32 = 15;

pub struct ProjectSettingsBuilder {
	settings: ProjectSettings,
}

impl ProjectSettingsBuilder {
	pub fn new(namespace: &str) -> Self {
		Self {
			settings: ProjectSettings::new(namespace.to_string()),
		}
	}

	pub fn build(self) -> ProjectSettings {
		self.settings
	}

	pub fn suffix_mode(mut self, mode: SuffixMode) -> Self {
		self.settings.suffix_mode = mode;
		self
	}

	pub fn pack_format(mut self, format: u32) -> Self {
		self.settings.pack_format = format;
		self
	}
}

/// Different ways to pick the suffixes that keep generated names unique
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SuffixMode {
	/// Pseudo-random suffixes from a fixed seed. Identical input
	/// produces identical output
	Seeded(u64),
	/// Suffixes from an entropy-seeded generator. Output differs between runs
	Random,
	/// Suffixes count up from zero. Easiest to read, used by the tests
	Sequential,
}
