use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::common::ResourceLocation;
use crate::output::text::FUNCTION_EXTENSION;

use super::Datapack;

/// Outputs a datapack to a folder. Will remove all existing files in /data directory of that folder.
pub fn output_pack(pack: &Datapack, path: &Path) -> anyhow::Result<()> {
	let data_path = path.join("data");
	// Clear the old data
	if data_path.exists() {
		std::fs::remove_dir_all(&data_path).context("Failed to remove data directory")?;
	}
	std::fs::create_dir_all(&data_path).context("Failed to recreate data directory")?;

	for function in pack.functions() {
		let id = function.location();
		let contents = function.contents().join("\n");
		write_file(&data_path.join(get_func_path(id)), contents)
			.with_context(|| format!("Failed to write function file {id}"))?;
	}
	for (id, tag) in pack.function_tags() {
		if !pack.should_output_tag(id, tag) {
			continue;
		}
		let contents =
			serde_json::to_string_pretty(tag).context("Failed to serialize function tag contents")?;
		write_file(&data_path.join(get_func_tag_path(id)), contents)
			.with_context(|| format!("Failed to write function tag file {id}"))?;
	}
	for (id, advancement) in pack.advancements() {
		let contents = serde_json::to_string_pretty(advancement)
			.context("Failed to serialize advancement contents")?;
		write_file(&data_path.join(get_advancement_path(id)), contents)
			.with_context(|| format!("Failed to write advancement file {id}"))?;
	}

	let meta = match pack.pack_meta() {
		Some(meta) => meta.to_string(),
		None => default_pack_meta(pack.pack_format())?,
	};
	std::fs::write(path.join("pack.mcmeta"), meta).context("Failed to write pack.mcmeta")?;

	Ok(())
}

fn write_file(path: &Path, contents: String) -> anyhow::Result<()> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).context("Failed to create parent directory")?;
	}
	std::fs::write(path, contents)?;
	Ok(())
}

#[derive(Serialize)]
struct PackMeta {
	pack: PackInfo,
}

#[derive(Serialize)]
struct PackInfo {
	pack_format: u32,
	description: &'static str,
}

fn default_pack_meta(pack_format: u32) -> anyhow::Result<String> {
	let meta = PackMeta {
		pack: PackInfo {
			pack_format,
			description: "Generated by Deco Compiler",
		},
	};
	serde_json::to_string_pretty(&meta).context("Failed to serialize pack.mcmeta")
}

/// Gets the relative path of a function
pub fn get_func_path(loc: &ResourceLocation) -> PathBuf {
	get_resource_path(loc, &["functions"], FUNCTION_EXTENSION)
}

/// Gets the relative path of a function tag
pub fn get_func_tag_path(loc: &ResourceLocation) -> PathBuf {
	get_resource_path(loc, &["tags", "functions"], "json")
}

/// Gets the relative path of an advancement
pub fn get_advancement_path(loc: &ResourceLocation) -> PathBuf {
	get_resource_path(loc, &["advancements"], "json")
}

/// Gets the relative path of a file from a resource
pub fn get_resource_path(loc: &ResourceLocation, ty: &[&str], extension: &str) -> PathBuf {
	let mut out = PathBuf::from(loc.namespace());
	out.extend(ty);
	out.extend(loc.path());
	out.push(format!("{}.{extension}", loc.name()));
	out
}
