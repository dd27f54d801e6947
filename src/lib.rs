pub mod builtins;
pub mod common;
pub mod compile;
pub mod decorators;
pub mod ir;
mod macros;
pub mod output;
pub mod parse;
pub mod project;
mod util;

pub use compile::{check_output_dir, compile_pack, Compilation, CompileReport, Compiler};
