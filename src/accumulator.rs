//! Per-response state machines that fold classified lines into question records.
//!
//! A question-start line flushes the current buffer (emitting a record only when it is
//! complete) and installs the new seed; end of input flushes once more. Incomplete
//! blocks are dropped without error.

use crate::classifier::LineTag;
use crate::models::{ClassicRecord, TestRecord};
use tracing::debug;

/// Letter to option index. Letters outside the table map to `DEFAULT_OPTION_INDEX`.
const OPTION_LETTERS: [(&str, usize); 4] = [("A", 0), ("B", 1), ("C", 2), ("D", 3)];
pub const DEFAULT_OPTION_INDEX: usize = 0;

pub fn option_index(letter: &str) -> usize {
    let letter = letter.trim().to_uppercase();
    OPTION_LETTERS
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, i)| *i)
        .unwrap_or(DEFAULT_OPTION_INDEX)
}

/// Which field the accumulator is currently filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Question,
    Options,
    Answer,
    Explanation,
}

/// A fresh, single-use state machine for one response.
pub trait RecordAccumulator: Default {
    type Record;

    /// Apply one tagged line, returning the record flushed by it, if any.
    fn apply(&mut self, tag: LineTag) -> Option<Self::Record>;

    /// Consume the state, flushing the last buffered question.
    fn finish(self) -> Option<Self::Record>;

    fn phase(&self) -> Phase;
}

/// Fold tagged lines through a new accumulator of type `A`.
pub fn accumulate<A, I>(tags: I) -> Vec<A::Record>
where
    A: RecordAccumulator,
    I: IntoIterator<Item = LineTag>,
{
    let (state, mut records) = tags
        .into_iter()
        .fold((A::default(), Vec::new()), |(mut state, mut records), tag| {
            records.extend(state.apply(tag));
            (state, records)
        });
    records.extend(state.finish());
    records
}

fn append_line(buffer: &mut String, line: &str) {
    if !buffer.is_empty() {
        buffer.push(' ');
    }
    buffer.push_str(line);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassicState {
    pub question: String,
    pub answer: String,
    pub reading_answer: bool,
}

impl ClassicState {
    fn flush(&mut self) -> Option<ClassicRecord> {
        let ClassicState { question, answer, .. } = std::mem::take(self);
        if question.is_empty() || answer.is_empty() {
            if !question.is_empty() || !answer.is_empty() {
                debug!(
                    question_len = question.len(),
                    answer_len = answer.len(),
                    "Dropping incomplete classic block"
                );
            }
            return None;
        }
        Some(ClassicRecord {
            question_text: question,
            answer_text: answer,
        })
    }
}

impl RecordAccumulator for ClassicState {
    type Record = ClassicRecord;

    fn apply(&mut self, tag: LineTag) -> Option<ClassicRecord> {
        match tag {
            LineTag::QuestionStart(seed) => {
                let flushed = self.flush();
                self.question = seed;
                flushed
            }
            LineTag::AnswerStart(seed) => {
                self.reading_answer = true;
                self.answer = seed;
                None
            }
            LineTag::Continuation { text, extends_question } => {
                if self.reading_answer {
                    append_line(&mut self.answer, &text);
                } else if !self.question.is_empty() && extends_question {
                    append_line(&mut self.question, &text);
                }
                None
            }
            LineTag::Option(_)
            | LineTag::CorrectAnswer(_)
            | LineTag::Explanation(_)
            | LineTag::Ignorable => None,
        }
    }

    fn finish(mut self) -> Option<ClassicRecord> {
        self.flush()
    }

    fn phase(&self) -> Phase {
        if self.reading_answer {
            Phase::Answer
        } else if self.question.is_empty() && self.answer.is_empty() {
            Phase::Idle
        } else {
            Phase::Question
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestState {
    pub question: String,
    pub options: Vec<String>,
    pub answer_letter: String,
    pub explanation: String,
}

impl TestState {
    fn flush(&mut self) -> Option<TestRecord> {
        let TestState {
            question,
            options,
            answer_letter,
            explanation,
        } = std::mem::take(self);

        if question.is_empty() || answer_letter.is_empty() {
            if !question.is_empty() || !options.is_empty() {
                debug!(
                    question_len = question.len(),
                    options = options.len(),
                    has_letter = !answer_letter.is_empty(),
                    "Dropping incomplete test block"
                );
            }
            return None;
        }

        let option_count = options.len();
        let options: [String; 4] = match options.try_into() {
            Ok(options) => options,
            Err(_) => {
                debug!(options = option_count, "Dropping test block without exactly four options");
                return None;
            }
        };

        let explanation = if explanation.is_empty() {
            format!("Doğru cevap: {}", answer_letter)
        } else {
            explanation
        };

        Some(TestRecord {
            question_text: question,
            options,
            correct_option_index: option_index(&answer_letter),
            explanation,
        })
    }
}

impl RecordAccumulator for TestState {
    type Record = TestRecord;

    fn apply(&mut self, tag: LineTag) -> Option<TestRecord> {
        match tag {
            LineTag::QuestionStart(seed) => {
                let flushed = self.flush();
                self.question = seed;
                flushed
            }
            LineTag::Option(text) => {
                self.options.push(text);
                None
            }
            LineTag::CorrectAnswer(letter) => {
                if let Some(letter) = letter {
                    self.answer_letter = letter;
                }
                None
            }
            LineTag::Explanation(text) => {
                if let Some(text) = text {
                    self.explanation = text;
                }
                None
            }
            LineTag::Continuation { text, extends_question } => {
                if !self.explanation.is_empty() {
                    append_line(&mut self.explanation, &text);
                } else if !self.question.is_empty() && self.options.is_empty() && extends_question {
                    append_line(&mut self.question, &text);
                }
                None
            }
            LineTag::AnswerStart(_) | LineTag::Ignorable => None,
        }
    }

    fn finish(mut self) -> Option<TestRecord> {
        self.flush()
    }

    fn phase(&self) -> Phase {
        if !self.explanation.is_empty() {
            Phase::Explanation
        } else if !self.options.is_empty() || !self.answer_letter.is_empty() {
            Phase::Options
        } else if !self.question.is_empty() {
            Phase::Question
        } else {
            Phase::Idle
        }
    }
}
