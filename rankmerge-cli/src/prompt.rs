/// Console comparisons: show two items, read which one the person picks.
///
/// The existing item is shown on the left (`<`) and the new item on the
/// right (`>`). Picking the right item places the new one after the existing
/// one.
use std::io::{BufRead, Write};

use rankmerge_core::{Answer, AnswerVocabulary, Decision, Item, OracleError, OrderingOracle};
use tracing::debug;

/// Build the two-line question for one comparison.
pub fn build_prompt(criterion: &str, left: &str, right: &str, question_number: usize) -> String {
    format!("[{question_number}] {left} (<) vs (>) {right}\n{criterion}: ")
}

pub struct ConsoleOracle<R, W> {
    input: R,
    output: W,
    criterion: String,
    vocabulary: AnswerVocabulary,
    asked: usize,
}

impl<R: BufRead, W: Write> ConsoleOracle<R, W> {
    pub fn new(input: R, output: W, criterion: impl Into<String>, vocabulary: AnswerVocabulary) -> Self {
        ConsoleOracle {
            input,
            output,
            criterion: criterion.into(),
            vocabulary,
            asked: 0,
        }
    }
}

impl<R: BufRead, W: Write> OrderingOracle for ConsoleOracle<R, W> {
    fn compare(&mut self, existing: &Item, new: &Item) -> Result<Decision, OracleError> {
        let prompt = build_prompt(&self.criterion, existing.as_str(), new.as_str(), self.asked + 1);
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(OracleError::InputClosed);
            }

            match self.vocabulary.interpret(&line) {
                Answer::Decided(decision) => {
                    if !self.vocabulary.is_recognized(&line) {
                        debug!(answer = line.trim(), ?decision, "unrecognized answer mapped by policy");
                    }
                    self.asked += 1;
                    return Ok(decision);
                }
                Answer::Retry => {
                    writeln!(self.output, "Answer with < or > (also: , l left / . r right).")?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankmerge_core::UnrecognizedPolicy;
    use std::io::Cursor;

    fn oracle(input: &str, policy: UnrecognizedPolicy) -> ConsoleOracle<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleOracle::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            "Choose the MORE DIFFICULT file",
            AnswerVocabulary::new(policy),
        )
    }

    #[test]
    fn test_build_prompt_contains_all_parts() {
        let prompt = build_prompt("Which is harder?", "b.txt", "a.txt", 3);
        assert!(prompt.starts_with("[3] b.txt (<) vs (>) a.txt\n"));
        assert!(prompt.ends_with("Which is harder?: "));
    }

    #[test]
    fn test_console_oracle_reads_answers() {
        let mut o = oracle(">\n<\n", UnrecognizedPolicy::Right);
        let (a, b) = (Item::new("a"), Item::new("b"));

        assert_eq!(o.compare(&a, &b).unwrap(), Decision::After);
        assert_eq!(o.compare(&a, &b).unwrap(), Decision::Before);
        assert_eq!(o.asked, 2);

        let shown = String::from_utf8(o.output.clone()).unwrap();
        assert!(shown.contains("[1] a (<) vs (>) b"));
        assert!(shown.contains("[2] a (<) vs (>) b"));
    }

    #[test]
    fn test_console_oracle_reprompts_on_unrecognized() {
        let mut o = oracle("maybe\nr\n", UnrecognizedPolicy::Reprompt);
        let (a, b) = (Item::new("a"), Item::new("b"));

        assert_eq!(o.compare(&a, &b).unwrap(), Decision::After);
        let shown = String::from_utf8(o.output.clone()).unwrap();
        assert_eq!(shown.matches("[1] a (<) vs (>) b").count(), 2);
        assert!(shown.contains("Answer with < or >"));
    }

    #[test]
    fn test_console_oracle_closed_input() {
        let mut o = oracle("", UnrecognizedPolicy::Right);
        let err = o.compare(&Item::new("a"), &Item::new("b")).unwrap_err();
        assert!(matches!(err, OracleError::InputClosed));
    }

    #[test]
    fn test_console_oracle_empty_line_picks_left() {
        let mut o = oracle("\n", UnrecognizedPolicy::Right);
        assert_eq!(o.compare(&Item::new("a"), &Item::new("b")).unwrap(), Decision::Before);
    }
}
