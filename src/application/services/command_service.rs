use crate::application::commands::{ActionDispatcher, Interpreter, Reply};
use crate::domain::entities::{Intent, Transcript};

/// Service for interpreting transcripts and dispatching the resulting intents
pub struct CommandService {
    interpreter: Interpreter,
    dispatcher: ActionDispatcher,
}

impl CommandService {
    pub fn new(interpreter: Interpreter, dispatcher: ActionDispatcher) -> Self {
        Self { interpreter, dispatcher }
    }

    pub fn interpret(&self, transcript: &Transcript) -> Intent {
        self.interpreter.interpret(transcript)
    }

    pub async fn handle(&self, transcript: &Transcript) -> (Intent, Reply) {
        let intent = self.interpret(transcript);
        tracing::debug!("[{}] {:?} -> {}", transcript.id, transcript.text, intent);
        let reply = self.dispatcher.dispatch(&intent).await;
        (intent, reply)
    }

    pub fn get_help(&self, rule: Option<&str>) -> String {
        let rules = self.interpreter.rules();

        if let Some(name) = rule {
            if let Some(rule) = rules.get(name) {
                let mut help = format!("{} - {}", rule.name, rule.description.as_deref().unwrap_or("No description"));
                if let Some(example) = &rule.example {
                    help.push_str(&format!("\nExample: \"{}\"", example));
                }
                return help;
            }
            return format!("Rule {} not found", name);
        }

        // Priority order
        let mut help = "Commands (checked in this order):\n".to_string();
        for (idx, rule) in rules.iter().enumerate() {
            help.push_str(&format!("  {}. {} - {}", idx + 1, rule.name, rule.description.as_deref().unwrap_or("")));
            if let Some(example) = &rule.example {
                help.push_str(&format!(" (\"{}\")", example));
            }
            help.push('\n');
        }
        help.push_str("Anything else is repeated back with an offer to search the web.\n");
        help
    }
}
