//! Domain entities - Core objects with no external dependencies

pub mod transcript;
pub mod intent;
pub mod rule;

pub use transcript::Transcript;
pub use intent::Intent;
pub use rule::{Rule, RuleSet};
