//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Speech recognition, speech synthesis, display and permissions
//! - Platform: URL opener, dialer, mail and web search requests
//! - Process: External program invocation

pub mod config;
pub mod adapters;
pub mod platform;
pub mod process;
