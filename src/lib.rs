//! Keyword-driven voice assistant.
//!
//! A transcript from a speech recognizer is matched against an ordered list
//! of keyword rules, the resulting [`Intent`](domain::entities::Intent) is
//! dispatched to the platform (browser, mail, dialer, web search) and the
//! reply is shown and spoken back.

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use application::commands::{interpret, ActionDispatcher, Interpreter, Reply};
pub use application::services::{Adapters, CommandService, Turn, VoiceAssistant};
pub use domain::entities::{Intent, Transcript};
pub use infrastructure::config::Config;
