pub mod claude;
pub mod error;
pub mod retry;

pub use claude::{Claude, Completion, CompletionOptions};
pub use error::{AiError, Result};
pub use retry::with_retry;
