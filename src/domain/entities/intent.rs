use serde::Serialize;
use std::fmt;

/// The closed set of requests a transcript can resolve to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    GetTime,
    OpenTarget { target: String },
    Search { query: String },
    Joke,
    Call { number: String },
    Fallback { text: String },
}

impl Intent {
    pub fn open(target: impl Into<String>) -> Self {
        Intent::OpenTarget { target: target.into() }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Intent::Search { query: query.into() }
    }

    pub fn call(number: impl Into<String>) -> Self {
        Intent::Call { number: number.into() }
    }

    pub fn fallback(text: impl Into<String>) -> Self {
        Intent::Fallback { text: text.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Intent::GetTime => "get_time",
            Intent::OpenTarget { .. } => "open_target",
            Intent::Search { .. } => "search",
            Intent::Joke => "joke",
            Intent::Call { .. } => "call",
            Intent::Fallback { .. } => "fallback",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::GetTime => write!(f, "GetTime"),
            Intent::OpenTarget { target } => write!(f, "OpenTarget({})", target),
            Intent::Search { query } => write!(f, "Search({})", query),
            Intent::Joke => write!(f, "Joke"),
            Intent::Call { number } => write!(f, "Call({})", number),
            Intent::Fallback { text } => write!(f, "Fallback({})", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_intent_tag() {
        let json = serde_json::to_value(Intent::open("youtube")).unwrap();
        assert_eq!(json, serde_json::json!({"intent": "open_target", "target": "youtube"}));

        let json = serde_json::to_value(Intent::GetTime).unwrap();
        assert_eq!(json, serde_json::json!({"intent": "get_time"}));
    }

    #[test]
    fn display_names_the_variant() {
        assert_eq!(Intent::call("5551234").to_string(), "Call(5551234)");
        assert_eq!(Intent::Joke.to_string(), "Joke");
    }
}
