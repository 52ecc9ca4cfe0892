pub mod console;
pub mod prompts;

pub use console::{Console, Level};
