//! Platform implementations

pub mod desktop;
pub mod recording;

pub use desktop::DesktopPlatform;
pub use recording::{Operation, PlatformRequest, RecordingPlatform};
