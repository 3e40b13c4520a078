//! Reply output

pub mod console;
pub mod fallback;
pub mod reply;
pub mod token_writer;
