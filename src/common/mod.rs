pub mod advancement;
pub mod error;
pub mod function;
pub mod location;
pub mod tag;

pub use self::advancement::Advancement;
pub use self::error::{CompileError, Diagnostic, Diagnostics, Severity};
pub use self::function::Function;
pub use self::location::ResourceLocation;
pub use self::tag::{FunctionTag, TagValue};
