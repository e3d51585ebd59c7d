//! Application services - Orchestration of a voice interaction

pub mod command_service;
pub mod assistant_service;

pub use command_service::CommandService;
pub use assistant_service::{Adapters, Turn, VoiceAssistant, DEFAULT_PROMPT, LISTENING};
