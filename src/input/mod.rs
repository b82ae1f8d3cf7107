//! MathML input: entity translation and compilation of markup into a [`MmlTree`](crate::tree::MmlTree).

pub mod entities;
pub mod mathml;

pub use self::entities::EntityTable;
pub use self::mathml::{MathMl, MathMlCompiler, MathMlOptions, MathSource, ParseAs, VerifyOptions};
