//! Domain layer - Core logic with no platform dependencies
//! 
//! This layer contains:
//! - Entities: Transcript, Intent and the ordered interpretation rules
//! - Traits: Abstractions over platform services (speech, display, platform, clock)

pub mod entities;
pub mod traits;
