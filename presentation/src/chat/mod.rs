//! Interactive chat module
//!
//! Provides a line-based interactive chat interface.

mod repl;
mod template;

pub use repl::ChatRepl;
pub use template::RequestTemplate;
