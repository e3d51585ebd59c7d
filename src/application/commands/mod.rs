//! Command handling - Interpretation of transcripts and dispatch of intents

pub mod dispatcher;
pub mod interpreter;

pub use dispatcher::{ActionDispatcher, Reply, JOKE, DEFAULT_SEARCH_URL};
pub use interpreter::{interpret, standard_rules, Interpreter};
