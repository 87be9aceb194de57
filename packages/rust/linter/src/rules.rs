//! The fixed rule table.

use std::sync::LazyLock;

use regex::Regex;

use crate::SuggestionKind;

/// One find/replace rule.
#[derive(Debug)]
pub struct Rule {
    pub pattern: Regex,
    pub replacement: &'static str,
    pub kind: SuggestionKind,
}

/// All rules, in the order their suggestions are reported.
pub fn rules() -> &'static [Rule] {
    static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
        [
            (r"\bi\b", "I", SuggestionKind::Grammar),
            (r"\bteh\b", "the", SuggestionKind::Spelling),
            (r"\brecieve\b", "receive", SuggestionKind::Spelling),
            (r"\boccured\b", "occurred", SuggestionKind::Spelling),
            (r"\bbenefits\s+includes?\b", "benefits include", SuggestionKind::Grammar),
            (r"\beffective\s+for\s+to\b", "effective for", SuggestionKind::Grammar),
            (r"\bvery\s+unique\b", "unique", SuggestionKind::Style),
            (r"\bmore\s+better\b", "better", SuggestionKind::Grammar),
        ]
        .into_iter()
        .map(|(pattern, replacement, kind)| Rule {
            pattern: Regex::new(pattern).expect("valid regex"),
            replacement,
            kind,
        })
        .collect()
    });

    &RULES
}
