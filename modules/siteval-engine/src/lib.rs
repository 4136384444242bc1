pub mod audit;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod prompt;
pub mod validate;

pub use pipeline::{EvaluationResult, Evaluator};
