//! Application layer - Use cases and orchestration
//! 
//! This layer contains:
//! - Commands: Transcript interpretation and intent dispatch
//! - Services: The voice assistant controller
//! - Errors: Error taxonomy and user-facing messages

pub mod errors;
pub mod commands;
pub mod services;
