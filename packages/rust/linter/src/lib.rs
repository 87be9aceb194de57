//! Rule-table linter for product descriptions.
//!
//! Each rule is a regex, a replacement and a kind. [`check`] runs every rule
//! over the text independently and reports one [`Suggestion`] per match;
//! [`apply_suggestion`] splices a single suggestion back into the text.
//!
//! Ranges are byte offsets into the checked text.

mod rules;

use std::ops::Range;

use pureextracts_shared::{PureExtractsError, Result};
use serde::Serialize;
use tracing::debug;

pub use rules::{Rule, rules};

/// What a rule corrects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Grammar,
    Spelling,
    Style,
}

impl std::fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Grammar => "grammar",
            Self::Spelling => "spelling",
            Self::Style => "style",
        })
    }
}

/// A proposed replacement for one span of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// The matched text.
    pub text: String,
    /// What to replace it with.
    pub suggestion: String,
    pub kind: SuggestionKind,
    /// Byte range of `text` in the checked string.
    pub range: Range<usize>,
}

/// Run every rule over `text`.
///
/// Suggestions come out grouped by rule (table order), then by position.
/// Matches that already read exactly like the replacement are not reported.
pub fn check(text: &str) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for rule in rules() {
        for m in rule.pattern.find_iter(text) {
            if m.as_str() == rule.replacement {
                continue;
            }
            suggestions.push(Suggestion {
                text: m.as_str().to_string(),
                suggestion: rule.replacement.to_string(),
                kind: rule.kind,
                range: m.range(),
            });
        }
    }

    debug!(len = text.len(), found = suggestions.len(), "description checked");
    suggestions
}

/// Replace the suggestion's range in `text` with its replacement.
///
/// Fails when the range no longer holds the matched text, e.g. because an
/// earlier suggestion has already been applied and shifted the offsets.
pub fn apply_suggestion(text: &str, suggestion: &Suggestion) -> Result<String> {
    let Range { start, end } = suggestion.range.clone();
    match text.get(start..end) {
        Some(current) if current == suggestion.text => {
            let mut out = String::with_capacity(text.len() + suggestion.suggestion.len());
            out.push_str(&text[..start]);
            out.push_str(&suggestion.suggestion);
            out.push_str(&text[end..]);
            Ok(out)
        }
        Some(current) => Err(PureExtractsError::Lint(format!(
            "expected '{}' at {start}..{end}, found '{current}'",
            suggestion.text
        ))),
        None => Err(PureExtractsError::Lint(format!(
            "range {start}..{end} is outside the text ({} bytes)",
            text.len()
        ))),
    }
}

/// Apply every suggestion from [`check`], re-checking after each edit so
/// offsets stay valid. Returns the corrected text and how many edits were made.
pub fn apply_all(text: &str) -> Result<(String, usize)> {
    let mut current = text.to_string();
    let mut applied = 0;

    // Each pass fixes one span; every rule's replacement is itself clean, so
    // the number of passes is bounded by the number of matches.
    while let Some(first) = check(&current).into_iter().next() {
        current = apply_suggestion(&current, &first)?;
        applied += 1;
    }

    Ok((current, applied))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_i_is_flagged() {
        let found = check("i think i like it");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|s| s.kind == SuggestionKind::Grammar));
        assert_eq!(found[0].range, 0..1);
        assert_eq!(found[1].range, 8..9);
    }

    #[test]
    fn capital_i_and_words_containing_i_are_clean() {
        assert!(check("I think it is fine").is_empty());
    }

    #[test]
    fn spelling_rules() {
        let found = check("We recieve teh oil.");
        let pairs: Vec<(&str, &str)> = found
            .iter()
            .map(|s| (s.text.as_str(), s.suggestion.as_str()))
            .collect();
        // Rule order: `teh` precedes `recieve` in the table.
        assert_eq!(pairs, [("teh", "the"), ("recieve", "receive")]);
        assert!(found.iter().all(|s| s.kind == SuggestionKind::Spelling));
    }

    #[test]
    fn multi_word_rules_span_whitespace() {
        let text = "Its benefits  includes a very unique aroma, more better than most.";
        let found = check(text);
        let texts: Vec<&str> = found.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["benefits  includes", "very unique", "more better"]);
        assert_eq!(found[1].kind, SuggestionKind::Style);
        for s in &found {
            assert_eq!(&text[s.range.clone()], s.text);
        }
    }

    #[test]
    fn already_correct_phrase_is_not_reported() {
        assert!(check("The benefits include calm focus.").is_empty());
    }

    #[test]
    fn apply_single_suggestion() {
        let text = "Highly effective for to soothe skin.";
        let found = check(text);
        assert_eq!(found.len(), 1);
        let fixed = apply_suggestion(text, &found[0]).unwrap();
        assert_eq!(fixed, "Highly effective for soothe skin.");
    }

    #[test]
    fn stale_suggestion_is_rejected() {
        let text = "teh teh";
        let found = check(text);
        let once = apply_suggestion(text, &found[0]).unwrap();
        assert_eq!(once, "the teh");

        // Offsets of the second match are unchanged here, so it still applies.
        assert_eq!(apply_suggestion(&once, &found[1]).unwrap(), "the the");

        let shifted = Suggestion {
            range: 0..3,
            ..found[0].clone()
        };
        assert!(apply_suggestion("the", &shifted).is_err());

        let out_of_bounds = Suggestion {
            range: 10..13,
            ..found[0].clone()
        };
        let err = apply_suggestion(text, &out_of_bounds).unwrap_err();
        assert!(err.to_string().contains("outside the text"));
    }

    #[test]
    fn apply_all_fixes_everything() {
        let (fixed, count) =
            apply_all("i recieve teh very unique extract, it occured once.").unwrap();
        assert_eq!(fixed, "I receive the unique extract, it occurred once.");
        assert_eq!(count, 5);
        assert!(check(&fixed).is_empty());
    }

    #[test]
    fn suggestion_serializes_lowercase_kind() {
        let found = check("more better");
        let json = serde_json::to_value(&found[0]).unwrap();
        assert_eq!(json["kind"], "grammar");
        assert_eq!(json["range"]["start"], 0);
        assert_eq!(json["range"]["end"], 11);
    }
}
