//! Domain traits - Abstractions for platform implementations

pub mod speech;
pub mod platform;
pub mod display;
pub mod clock;

pub use speech::{SpeechInput, SpeechOutput, SessionGate, SessionGuard};
pub use platform::Platform;
pub use display::{Display, Permissions};
pub use clock::{Clock, SystemClock, FixedClock};
