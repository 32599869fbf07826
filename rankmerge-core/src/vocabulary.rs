/// Mapping from typed answers to decisions.
///
/// The prompt shows the existing item on the left and the new item on the
/// right. Picking the left item means the new item goes before it; picking the
/// right item means it goes after.
use crate::constants::{LEFT_ANSWERS, RIGHT_ANSWERS};
use crate::types::Decision;

/// What to do with an answer that is in neither vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UnrecognizedPolicy {
    /// Treat it as picking the right (new) item. Matches the historical
    /// behavior where anything but a left answer meant "after".
    #[default]
    Right,
    /// Treat it as picking the left (existing) item.
    Left,
    /// Ask the same question again.
    Reprompt,
}

impl UnrecognizedPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "right" => Some(UnrecognizedPolicy::Right),
            "left" => Some(UnrecognizedPolicy::Left),
            "reprompt" => Some(UnrecognizedPolicy::Reprompt),
            _ => None,
        }
    }
}

/// Interpretation of one typed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Decided(Decision),
    /// The caller should ask again.
    Retry,
}

#[derive(Debug, Clone, Default)]
pub struct AnswerVocabulary {
    pub policy: UnrecognizedPolicy,
}

impl AnswerVocabulary {
    pub fn new(policy: UnrecognizedPolicy) -> Self {
        AnswerVocabulary { policy }
    }

    /// Interpret a raw input line. Matching is case-insensitive after trimming.
    ///
    /// An empty line counts as a left answer: the historical prompt tested the
    /// input by substring membership, and the empty string is a substring of
    /// every left token.
    pub fn interpret(&self, raw: &str) -> Answer {
        let answer = raw.trim().to_lowercase();
        if answer.is_empty() || LEFT_ANSWERS.contains(&answer.as_str()) {
            return Answer::Decided(Decision::Before);
        }
        if RIGHT_ANSWERS.contains(&answer.as_str()) {
            return Answer::Decided(Decision::After);
        }
        match self.policy {
            UnrecognizedPolicy::Right => Answer::Decided(Decision::After),
            UnrecognizedPolicy::Left => Answer::Decided(Decision::Before),
            UnrecognizedPolicy::Reprompt => Answer::Retry,
        }
    }

    pub fn is_recognized(&self, raw: &str) -> bool {
        let answer = raw.trim().to_lowercase();
        answer.is_empty()
            || LEFT_ANSWERS.contains(&answer.as_str())
            || RIGHT_ANSWERS.contains(&answer.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_answers_place_before() {
        let vocab = AnswerVocabulary::default();
        for raw in ["<", ",", "l", "L", "left", " Left \n"] {
            assert_eq!(vocab.interpret(raw), Answer::Decided(Decision::Before), "input {raw:?}");
        }
    }

    #[test]
    fn test_right_answers_place_after() {
        let vocab = AnswerVocabulary::new(UnrecognizedPolicy::Left);
        for raw in [">", ".", "r", "R", "right"] {
            assert_eq!(vocab.interpret(raw), Answer::Decided(Decision::After), "input {raw:?}");
        }
    }

    #[test]
    fn test_empty_line_is_left() {
        let vocab = AnswerVocabulary::new(UnrecognizedPolicy::Reprompt);
        assert_eq!(vocab.interpret(""), Answer::Decided(Decision::Before));
        assert_eq!(vocab.interpret("   \n"), Answer::Decided(Decision::Before));
    }

    #[test]
    fn test_unrecognized_follows_policy() {
        let right = AnswerVocabulary::new(UnrecognizedPolicy::Right);
        let left = AnswerVocabulary::new(UnrecognizedPolicy::Left);
        let again = AnswerVocabulary::new(UnrecognizedPolicy::Reprompt);

        assert_eq!(right.interpret("yes"), Answer::Decided(Decision::After));
        assert_eq!(left.interpret("yes"), Answer::Decided(Decision::Before));
        assert_eq!(again.interpret("yes"), Answer::Retry);
        assert!(!again.is_recognized("yes"));
        assert!(again.is_recognized(">"));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(UnrecognizedPolicy::parse("Reprompt"), Some(UnrecognizedPolicy::Reprompt));
        assert_eq!(UnrecognizedPolicy::parse("right"), Some(UnrecognizedPolicy::Right));
        assert_eq!(UnrecognizedPolicy::parse("maybe"), None);
    }
}
