//! Command interpreter - Maps a transcript to exactly one intent

use once_cell::sync::Lazy;
use crate::domain::entities::{Intent, Rule, RuleSet, Transcript};

static STANDARD: Lazy<Interpreter> = Lazy::new(Interpreter::standard);

/// Interpret a transcript with the standard rule set
pub fn interpret(text: &str) -> Intent {
    STANDARD.interpret(&Transcript::new(text))
}

/// Text after the first occurrence of `marker`, or the whole text when absent
fn after<'a>(text: &'a str, marker: &str) -> &'a str {
    text.find(marker)
        .map(|idx| &text[idx + marker.len()..])
        .unwrap_or(text)
}

/// The built-in rules, highest priority first.
///
/// Order matters: "search for what time is it" is a GetTime request
/// because the time rule is checked before the search rule.
pub fn standard_rules() -> RuleSet {
    RuleSet::new()
        .with_rule(Rule::new("time")
            .with_description("Speak the current time")
            .with_example("what's the time")
            .when(|text| text.contains("time"))
            .then(|_, _| Intent::GetTime))
        .with_rule(Rule::new("open")
            .with_description("Open a website or app")
            .with_example("open youtube")
            .when(|text| text.starts_with("open ") || text.contains("open "))
            .then(|text, _| Intent::open(after(text, "open ").trim())))
        .with_rule(Rule::new("search")
            .with_description("Search the web")
            .with_example("search for rust tutorials")
            .when(|text| text.contains("search for") || text.starts_with("search "))
            .then(|text, _| {
                let query = if text.contains("search for") {
                    after(text, "search for")
                } else {
                    after(text, "search ")
                };
                Intent::search(query.trim())
            }))
        .with_rule(Rule::new("joke")
            .with_description("Tell a joke")
            .with_example("tell me a joke")
            .when(|text| text.contains("joke"))
            .then(|_, _| Intent::Joke))
        .with_rule(Rule::new("call")
            .with_description("Open the dialer with a number")
            .with_example("call 555 1234")
            .when(|text| text.contains("call "))
            .then(|text, _| Intent::call(after(text, "call ").trim().replace(' ', ""))))
}

/// Ordered rule evaluation with a fallback intent
pub struct Interpreter {
    rules: RuleSet,
}

impl Interpreter {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn standard() -> Self {
        Self::new(standard_rules())
    }

    pub fn interpret(&self, transcript: &Transcript) -> Intent {
        match self.rules.first_match(transcript) {
            Some((rule, intent)) => {
                tracing::debug!("Rule '{}' matched: {}", rule.name, intent);
                intent
            }
            None => {
                tracing::debug!("No rule matched, falling back");
                Intent::fallback(transcript.text.clone())
            }
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::standard()
    }
}
