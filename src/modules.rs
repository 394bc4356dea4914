use crate::config::ModuleRule;
use crate::error::{Result, RevstatError};
use regex::Regex;

/// Classifies file paths into logical modules via ordered regex rules.
///
/// Every pattern is applied as a find-anywhere search, not a full match, so a
/// path can belong to any number of modules. Rule order is configuration
/// order and fixes the order in which matched names are emitted.
pub struct ModuleClassifier {
    rules: Vec<(Regex, String)>,
}

impl ModuleClassifier {
    /// Compiles the configured rules. A malformed pattern is a fatal
    /// configuration error; the classifier is never built from a partially
    /// compiled rule set.
    pub fn compile(rules: &[ModuleRule]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let regex = Regex::new(&rule.pattern).map_err(|source| {
                RevstatError::InvalidPattern { pattern: rule.pattern.clone(), source }
            })?;
            compiled.push((regex, rule.name.clone()));
        }
        Ok(Self { rules: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Module names matching `path`, in rule order, without duplicates: a
    /// path touched by two rules carrying the same name counts that module
    /// once.
    pub fn classify(&self, path: &str) -> Vec<&str> {
        let mut matched: Vec<&str> = Vec::new();
        for (regex, name) in &self.rules {
            if regex.is_match(path) && !matched.contains(&name.as_str()) {
                matched.push(name);
            }
        }
        matched
    }
}
