use std::path::Path;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::common::{Advancement, CompileError, Function, FunctionTag, ResourceLocation};
use crate::output::names::NameGenerator;
use crate::output::text::{ENGINE_NAMESPACE, LOAD_TAG, TICK_TAG};
use crate::project::ProjectSettings;

use self::files::output_pack;

mod files;

pub use self::files::{get_advancement_path, get_func_path, get_func_tag_path};

/// How many suffixes are tried before giving up on a generated name
const MAX_NAME_ATTEMPTS: usize = 64;

/// Every artifact produced by one compilation run
pub struct Datapack {
	namespace: String,
	pack_format: u32,
	functions: IndexMap<ResourceLocation, Function>,
	function_tags: IndexMap<ResourceLocation, FunctionTag>,
	/// Tags that were defined in the source tree before compilation
	seeded_tags: FxHashSet<ResourceLocation>,
	advancements: IndexMap<ResourceLocation, Advancement>,
	load: Function,
	tick: Function,
	/// Generated locations that have been handed out but may not be registered yet
	reserved: FxHashSet<ResourceLocation>,
	/// User locations of the file being compiled, which generated names must avoid
	held: FxHashSet<ResourceLocation>,
	names: NameGenerator,
	pack_meta: Option<String>,
	finalized: bool,
	pub state: FeatureState,
}

/// Setup that decorators and builtins share across a run
#[derive(Debug, Default)]
pub struct FeatureState {
	/// The function that calls every carrot on a stick callback
	pub carrot_dispatcher: Option<ResourceLocation>,
	/// Whether the raycast objective is already created on load
	pub raycast_objective: bool,
}

/// The tags that the game runs on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownTag {
	Load,
	Tick,
}

impl WellKnownTag {
	pub fn location(self) -> ResourceLocation {
		let name = match self {
			Self::Load => LOAD_TAG,
			Self::Tick => TICK_TAG,
		};
		ResourceLocation::new(ENGINE_NAMESPACE, Vec::<&str>::new(), name)
			.expect("Well-known tag location is valid")
	}
}

impl Datapack {
	pub fn new(settings: &ProjectSettings) -> Result<Self, CompileError> {
		let namespace = settings.namespace().to_string();
		let generated = |name: &str| {
			ResourceLocation::new(&namespace, Vec::<&str>::new(), name)
				.map_err(CompileError::GeneratedLocation)
		};
		let load = Function::new(generated(LOAD_TAG)?);
		let tick = Function::new(generated(TICK_TAG)?);

		let mut function_tags = IndexMap::new();
		function_tags.insert(WellKnownTag::Load.location(), FunctionTag::new());
		function_tags.insert(WellKnownTag::Tick.location(), FunctionTag::new());

		Ok(Self {
			namespace,
			pack_format: settings.pack_format(),
			functions: IndexMap::new(),
			function_tags,
			seeded_tags: FxHashSet::default(),
			advancements: IndexMap::new(),
			load,
			tick,
			reserved: FxHashSet::default(),
			held: FxHashSet::default(),
			names: NameGenerator::new(settings.suffix_mode()),
			pack_meta: None,
			finalized: false,
			state: FeatureState::default(),
		})
	}

	/// The namespace generated artifacts are placed in
	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn functions(&self) -> impl Iterator<Item = &Function> {
		self.functions.values()
	}

	pub fn function(&self, location: &ResourceLocation) -> Option<&Function> {
		self.functions.get(location)
	}

	pub fn function_mut(&mut self, location: &ResourceLocation) -> Option<&mut Function> {
		self.functions.get_mut(location)
	}

	/// Whether a function with this location exists, is about to be
	/// generated, or is held for the file being compiled
	pub fn is_taken(&self, location: &ResourceLocation) -> bool {
		self.is_registered(location) || self.held.contains(location)
	}

	fn is_registered(&self, location: &ResourceLocation) -> bool {
		self.functions.contains_key(location)
			|| self.advancements.contains_key(location)
			|| self.reserved.contains(location)
	}

	/// Keeps generated names away from locations a source file is about to
	/// register, until [`Self::release_held`] is called
	pub fn hold_locations(&mut self, locations: impl IntoIterator<Item = ResourceLocation>) {
		self.held.extend(locations);
	}

	pub fn release_held(&mut self) {
		self.held.clear();
	}

	/// Registers a function declared in the source
	pub fn add_function(&mut self, function: Function) -> Result<(), CompileError> {
		if self.is_registered(function.location()) {
			return Err(CompileError::DuplicateFunction(function.location().clone()));
		}
		self.held.remove(function.location());
		tracing::debug!("Registered function {}", function.location());
		self.functions.insert(function.location().clone(), function);
		Ok(())
	}

	/// Registers a function produced by the compiler. Its location must come
	/// from [`Self::generate_locations`] and must not be registered yet
	pub fn add_generated_function(&mut self, function: Function) -> Result<(), CompileError> {
		let location = function.location();
		if self.functions.contains_key(location) || !self.reserved.contains(location) {
			return Err(CompileError::GeneratedCollision(location.clone()));
		}
		tracing::debug!("Generated function {location}");
		self.functions.insert(location.clone(), function);
		Ok(())
	}

	/// Creates `N` fresh locations sharing one suffix, as
	/// `<namespace>:<dir>/<prefix>_<suffix>`. The locations are reserved,
	/// so no later name can collide with them
	pub fn generate_locations<const N: usize>(
		&mut self,
		dir: &str,
		prefixes: [&str; N],
	) -> Result<[ResourceLocation; N], CompileError> {
		self.fresh_locations(&[dir], prefixes)
	}

	fn fresh_locations<const N: usize>(
		&mut self,
		path: &[&str],
		prefixes: [&str; N],
	) -> Result<[ResourceLocation; N], CompileError> {
		for _ in 0..MAX_NAME_ATTEMPTS {
			let suffix = self.names.next_suffix();
			let mut out = Vec::with_capacity(N);
			for prefix in prefixes {
				let name = format!("{prefix}_{suffix}");
				let loc = ResourceLocation::new(&self.namespace, path, &name)
					.map_err(CompileError::GeneratedLocation)?;
				out.push(loc);
			}
			if out.iter().any(|x| self.is_taken(x)) {
				continue;
			}
			self.reserved.extend(out.iter().cloned());
			let out: [ResourceLocation; N] = out
				.try_into()
				.map_err(|_| CompileError::NamesExhausted(path.join("/")))?;
			return Ok(out);
		}

		Err(CompileError::NamesExhausted(format!(
			"{}:{}",
			self.namespace,
			path.join("/")
		)))
	}

	pub fn function_tags(&self) -> impl Iterator<Item = (&ResourceLocation, &FunctionTag)> {
		self.function_tags.iter()
	}

	pub fn tag(&self, location: &ResourceLocation) -> Option<&FunctionTag> {
		self.function_tags.get(location)
	}

	/// Gets a tag, creating it empty if it has no definition yet
	pub fn tag_mut(&mut self, location: &ResourceLocation) -> &mut FunctionTag {
		self.function_tags.entry(location.clone()).or_default()
	}

	pub fn well_known_tag_mut(
		&mut self,
		tag: WellKnownTag,
	) -> Result<&mut FunctionTag, CompileError> {
		let location = tag.location();
		self.function_tags
			.get_mut(&location)
			.ok_or(CompileError::MissingWellKnownTag(location))
	}

	/// Adds a tag definition found in the source tree
	pub fn seed_tag(&mut self, location: ResourceLocation, tag: FunctionTag) {
		tracing::debug!("Loaded function tag {location}");
		self.seeded_tags.insert(location.clone());
		self.function_tags.insert(location, tag);
	}

	pub fn is_seeded_tag(&self, location: &ResourceLocation) -> bool {
		self.seeded_tags.contains(location)
	}

	pub fn advancements(&self) -> impl Iterator<Item = (&ResourceLocation, &Advancement)> {
		self.advancements.iter()
	}

	pub fn advancement(&self, location: &ResourceLocation) -> Option<&Advancement> {
		self.advancements.get(location)
	}

	/// Registers an advancement under a location from [`Self::generate_locations`]
	pub fn add_advancement(
		&mut self,
		location: ResourceLocation,
		advancement: Advancement,
	) -> Result<(), CompileError> {
		if self.advancements.contains_key(&location) || !self.reserved.contains(&location) {
			return Err(CompileError::GeneratedCollision(location));
		}
		tracing::debug!("Generated advancement {location}");
		self.advancements.insert(location, advancement);
		Ok(())
	}

	/// The pack's own function that runs on load
	pub fn load(&self) -> &Function {
		&self.load
	}

	/// The pack's own function that runs every tick
	pub fn tick(&self) -> &Function {
		&self.tick
	}

	pub fn add_load(&mut self, command: impl AsRef<str>) {
		self.load.add_command(command);
	}

	pub fn add_tick(&mut self, command: impl AsRef<str>) {
		self.tick.add_command(command);
	}

	pub fn set_pack_meta(&mut self, contents: String) {
		self.pack_meta = Some(contents);
	}

	pub fn pack_meta(&self) -> Option<&str> {
		self.pack_meta.as_deref()
	}

	pub fn pack_format(&self) -> u32 {
		self.pack_format
	}

	/// Registers the pack's load and tick functions, if they have any
	/// commands, and puts them at the front of their tags. When a source
	/// function already uses `<namespace>:load` or `<namespace>:tick`, the
	/// pack's function gets a suffixed name instead. Safe to call more than once
	pub fn finalize(&mut self) -> Result<(), CompileError> {
		if self.finalized {
			return Ok(());
		}
		self.finalized = true;

		for (tag, name) in [(WellKnownTag::Load, LOAD_TAG), (WellKnownTag::Tick, TICK_TAG)] {
			let function = match tag {
				WellKnownTag::Load => &self.load,
				WellKnownTag::Tick => &self.tick,
			};
			if function.is_empty() {
				continue;
			}
			let mut location = function.location().clone();
			let contents = function.contents().to_vec();
			if self.is_taken(&location) {
				let [fresh] = self.fresh_locations(&[], [name])?;
				tracing::debug!("{location} is declared in the source, using {fresh} instead");
				location = fresh;
			} else {
				self.reserved.insert(location.clone());
			}

			let mut function = Function::new(location.clone());
			for command in contents {
				function.add_command(command);
			}
			self.add_generated_function(function)?;
			self.well_known_tag_mut(tag)?.prepend_function(location);
		}

		Ok(())
	}

	/// Whether a tag should be written out. Well-known tags always exist in
	/// the model but are only written when they have entries or came from
	/// the source tree
	pub fn should_output_tag(&self, location: &ResourceLocation, tag: &FunctionTag) -> bool {
		!tag.is_empty() || self.is_seeded_tag(location)
	}

	/// Writes the pack to a folder. Will remove all existing files in the
	/// data directory of that folder
	pub fn output(&mut self, path: &Path) -> anyhow::Result<()> {
		self.finalize()?;
		output_pack(self, path)
	}
}
