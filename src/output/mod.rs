pub mod datapack;
pub mod names;
pub mod text;
