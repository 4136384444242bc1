pub mod config;
pub mod error;
pub mod scoring;
pub mod types;

pub use config::Config;
pub use error::EvalError;
pub use types::*;
