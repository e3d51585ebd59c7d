//! Shipped configuration and script files stay loadable
//! Run with: cargo test --test config_files

use voice_assistant::infrastructure::adapters::ScriptedRecognizer;
use voice_assistant::infrastructure::config::{Config, MicrophonePolicy, RecognizerBackend, VoiceBackend};

const DEMO_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/assistant.yaml");
const DEMO_SCRIPT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/morning.txt");

#[test]
fn demo_config_parses() {
    let config = Config::load(DEMO_CONFIG).expect("demo config should load");

    assert_eq!(config.recognizer.backend, RecognizerBackend::Command);
    assert_eq!(config.recognizer.command.as_deref().map(|c| c[0].as_str()), Some("whisper-listen"));
    assert_eq!(config.voice.backend, VoiceBackend::System);
    assert_eq!(config.permissions.microphone, MicrophonePolicy::Ask);
    assert!(!config.platform.dry_run);
}

#[test]
fn demo_script_has_every_line() {
    let script = std::fs::read_to_string(DEMO_SCRIPT).expect("demo script should exist");
    let recognizer = ScriptedRecognizer::from_script(&script);
    assert_eq!(recognizer.remaining(), 8);
}
