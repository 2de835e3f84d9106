//! Command implementations.

pub mod generate;
pub mod metadata;
pub mod segments;

pub use self::generate::execute_generate;
pub use self::metadata::execute_metadata;
pub use self::segments::execute_segments;
