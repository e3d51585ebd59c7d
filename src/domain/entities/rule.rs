use super::{Intent, Transcript};

/// Predicate over the lower-cased transcript
pub type RulePredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Builds an intent from the lower-cased text and the original transcript
pub type IntentBuilder = Box<dyn Fn(&str, &Transcript) -> Intent + Send + Sync>;

/// A single interpretation rule: when `predicate` holds, `build` produces the intent
pub struct Rule {
    pub name: String,
    pub description: Option<String>,
    pub example: Option<String>,
    predicate: Option<RulePredicate>,
    build: Option<IntentBuilder>,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            example: None,
            predicate: None,
            build: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    pub fn then<F>(mut self, build: F) -> Self
    where
        F: Fn(&str, &Transcript) -> Intent + Send + Sync + 'static,
    {
        self.build = Some(Box::new(build));
        self
    }

    /// A rule without a predicate or builder never matches
    pub fn matches(&self, lowered: &str) -> bool {
        self.build.is_some() && self.predicate.as_ref().is_some_and(|p| p(lowered))
    }

    pub fn apply(&self, lowered: &str, transcript: &Transcript) -> Option<Intent> {
        if !self.matches(lowered) {
            return None;
        }
        self.build.as_ref().map(|b| b(lowered, transcript))
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("example", &self.example)
            .finish_non_exhaustive()
    }
}

/// Ordered rule list; the first matching rule wins
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.push(rule);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Evaluate rules in priority order and return the first match with its intent
    pub fn first_match(&self, transcript: &Transcript) -> Option<(&Rule, Intent)> {
        let lowered = transcript.lowered();
        self.rules
            .iter()
            .find_map(|rule| rule.apply(&lowered, transcript).map(|intent| (rule, intent)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(name: &str, word: &'static str) -> Rule {
        Rule::new(name)
            .when(move |text| text.contains(word))
            .then(|_, _| Intent::Joke)
    }

    #[test]
    fn first_rule_in_order_wins() {
        let rules = RuleSet::new()
            .with_rule(Rule::new("a").when(|t| t.contains("x")).then(|_, _| Intent::GetTime))
            .with_rule(Rule::new("b").when(|t| t.contains("x")).then(|_, _| Intent::Joke));

        let (rule, intent) = rules.first_match(&Transcript::new("X marks")).unwrap();
        assert_eq!(rule.name, "a");
        assert_eq!(intent, Intent::GetTime);
    }

    #[test]
    fn incomplete_rule_never_matches() {
        let rules = RuleSet::new()
            .with_rule(Rule::new("no-builder").when(|_| true))
            .with_rule(Rule::new("no-predicate").then(|_, _| Intent::GetTime))
            .with_rule(keyword("joke", "joke"));

        let (rule, _) = rules.first_match(&Transcript::new("a joke")).unwrap();
        assert_eq!(rule.name, "joke");
        assert!(rules.first_match(&Transcript::new("nothing")).is_none());
    }

    #[test]
    fn builder_sees_lowered_and_original() {
        let rules = RuleSet::new().with_rule(
            Rule::new("echo")
                .when(|_| true)
                .then(|lowered, original| Intent::fallback(format!("{}|{}", lowered, original.text))),
        );
        let (_, intent) = rules.first_match(&Transcript::new("Hi There")).unwrap();
        assert_eq!(intent, Intent::fallback("hi there|Hi There"));
    }

    #[test]
    fn lookup_and_iteration_keep_order() {
        let rules = RuleSet::new()
            .with_rule(keyword("one", "1").with_description("first"))
            .with_rule(keyword("two", "2"));

        assert_eq!(rules.len(), 2);
        assert_eq!(rules.get("one").and_then(|r| r.description.as_deref()), Some("first"));
        let names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
    }
}
