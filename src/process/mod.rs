// src/process/mod.rs
pub mod chunk;
pub mod normalize;
pub mod reader;
pub mod utils;

pub use chunk::{Chunk, Value};
pub use normalize::{ColumnRule, RuleProfile, RuleSet};
pub use reader::{ChunkReader, ReaderOptions};
