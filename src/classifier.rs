//! Line classification for Turkish question/answer responses.
//!
//! Markers are matched as substrings anywhere in the line, not against a grammar.
//! Multi-line fields carry no join marker, so plain lines come back as continuations.

use crate::models::QuestionType;
use once_cell::sync::Lazy;
use regex::Regex;

const QUESTION_MARKER: &str = "Soru";
const ANSWER_MARKER: &str = "Cevap";
const CORRECT_ANSWER_MARKER: &str = "Doğru Cevap";
const EXPLANATION_MARKER: &str = "Açıklama";
const EMPHASIS: &str = "**";
const SEPARATOR: &str = "---";
const OPTION_PREFIXES: [&str; 4] = ["A)", "B)", "C)", "D)"];

static EMPHASIS_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*{2,}").expect("valid emphasis regex"));
static QUESTION_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Soru\s*\d+\s*[:.)]?").expect("valid question label regex"));
static RESIDUAL_QUESTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Soru\s*").expect("valid residual question regex"));
static RESIDUAL_ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Cevap\s*").expect("valid residual answer regex"));

/// Semantic role of one trimmed, non-empty response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineTag {
    /// Starts a new question; carries the question text seed (possibly empty).
    QuestionStart(String),
    /// `A)`..`D)` option text (test mode).
    Option(String),
    /// Letter after `Doğru Cevap:`; `None` when the line has no colon (test mode).
    CorrectAnswer(Option<String>),
    /// Text after `Açıklama:`; `None` when the line has no colon (test mode).
    Explanation(Option<String>),
    /// Starts the answer of a classic question.
    AnswerStart(String),
    /// Plain text that may extend whichever field is currently open.
    ///
    /// `extends_question` is false for lines that must not be glued onto a question even
    /// though they may extend an explanation or answer.
    Continuation { text: String, extends_question: bool },
    /// Separators, stray headings and anything else with no role.
    Ignorable,
}

impl LineTag {
    pub fn category(&self) -> &'static str {
        match self {
            LineTag::QuestionStart(_) => "question_start",
            LineTag::Option(_) => "option",
            LineTag::CorrectAnswer(_) => "correct_answer",
            LineTag::Explanation(_) => "explanation",
            LineTag::AnswerStart(_) => "answer_start",
            LineTag::Continuation { .. } => "continuation",
            LineTag::Ignorable => "ignorable",
        }
    }
}

/// Classify one trimmed, non-empty line. Pure: the same input always yields the same tag.
pub fn classify(line: &str, mode: QuestionType) -> LineTag {
    match mode {
        QuestionType::Test => classify_test(line),
        QuestionType::Classic => classify_classic(line),
    }
}

fn classify_test(line: &str) -> LineTag {
    if line.contains(QUESTION_MARKER)
        && (line.contains(':') || line.contains('.') || line.contains(EMPHASIS))
    {
        return LineTag::QuestionStart(test_question_seed(line));
    }

    if let Some(rest) = OPTION_PREFIXES.iter().find_map(|p| line.strip_prefix(p)) {
        return LineTag::Option(rest.trim().to_string());
    }

    if line.contains(CORRECT_ANSWER_MARKER) {
        return LineTag::CorrectAnswer(after_colon(&strip_emphasis(line)));
    }

    if line.contains(EXPLANATION_MARKER) {
        return LineTag::Explanation(after_colon(&strip_emphasis(line)));
    }

    if line.contains(QUESTION_MARKER) || line.contains(SEPARATOR) {
        return LineTag::Ignorable;
    }

    LineTag::Continuation {
        text: line.to_string(),
        extends_question: !line.contains("A)"),
    }
}

fn classify_classic(line: &str) -> LineTag {
    let has_punctuation = line.contains(':') || line.contains('.');

    if line.contains(QUESTION_MARKER) && has_punctuation {
        return LineTag::QuestionStart(labelled_field(line, &RESIDUAL_QUESTION));
    }

    if line.contains(ANSWER_MARKER) && has_punctuation {
        return LineTag::AnswerStart(labelled_field(line, &RESIDUAL_ANSWER));
    }

    if line.contains(QUESTION_MARKER) || line.contains(ANSWER_MARKER) || line.contains(SEPARATOR) {
        return LineTag::Ignorable;
    }

    LineTag::Continuation {
        text: line.to_string(),
        extends_question: true,
    }
}

/// Question text of a test-mode question line: label first, then colon, then period.
fn test_question_seed(line: &str) -> String {
    let cleaned = strip_emphasis(line);
    let cleaned = cleaned.trim();

    if let Some(label) = QUESTION_LABEL.find(cleaned) {
        return clean_seed(&cleaned[label.end()..]);
    }

    after_colon(cleaned).unwrap_or_else(|| after_period(cleaned, &RESIDUAL_QUESTION))
}

/// Text after the first colon, or after the first period minus a residual label word.
fn labelled_field(line: &str, residual: &Regex) -> String {
    after_colon(line).unwrap_or_else(|| after_period(line, residual))
}

fn after_colon(text: &str) -> Option<String> {
    text.split_once(':').map(|(_, rest)| clean_seed(rest))
}

fn after_period(text: &str, residual: &Regex) -> String {
    match text.split_once('.') {
        Some((_, rest)) => clean_seed(&residual.replace(rest.trim(), "")),
        None => String::new(),
    }
}

fn strip_emphasis(line: &str) -> String {
    EMPHASIS_RUN.replace_all(line, "").into_owned()
}

/// Trim whitespace and stray emphasis asterisks left at either end of a field.
fn clean_seed(text: &str) -> String {
    text.trim_matches(|c: char| c == '*' || c.is_whitespace())
        .to_string()
}
