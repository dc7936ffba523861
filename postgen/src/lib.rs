// Library interface for postgen modules
// This allows tests and the binaries to import modules

pub mod error;
pub mod fallback;
pub mod generator;
pub mod llm;
pub mod news;
pub mod prompt;
pub mod server;
