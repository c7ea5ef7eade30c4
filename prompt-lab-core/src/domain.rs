pub mod config;
pub mod completion;
pub mod evaluation;
pub mod prompt;
pub mod task;

pub use config::*;
pub use completion::*;
pub use evaluation::*;
pub use prompt::*;
pub use task::*;
