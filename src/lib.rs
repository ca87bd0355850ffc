pub mod config;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod report;
pub mod sink;

pub use config::LoaderConfig;
pub use error::{LoadError, Result};
pub use pipeline::{LoadReport, Loader};
