//! Extraction engine: response text in, validated question records out.

use crate::accumulator::{accumulate, ClassicState, TestState};
use crate::classifier::{classify, LineTag};
use crate::models::{ExtractedQuestion, QuestionRecord, QuestionType};
use tracing::{debug, instrument, trace};

/// Trimmed, non-empty lines of a model response, in order.
pub fn response_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Classify every line of `response_text` for `question_type`.
pub fn classify_response(response_text: &str, question_type: QuestionType) -> Vec<LineTag> {
    response_lines(response_text)
        .map(|line| {
            let tag = classify(line, question_type);
            trace!(target: "study_query::extract", category = tag.category(), line, "Classified line");
            tag
        })
        .collect()
}

/// Extract every valid record of `question_type` from one response.
///
/// Never fails: malformed or incomplete blocks are skipped, so the result may hold
/// fewer records than were asked for, none at all, or occasionally more.
#[instrument(target = "study_query::extract", skip(response_text), fields(response_len = response_text.len()))]
pub fn extract(response_text: &str, question_type: QuestionType, topic_id: &str) -> Vec<ExtractedQuestion> {
    let tags = classify_response(response_text, question_type);
    let line_count = tags.len();

    let records: Vec<QuestionRecord> = match question_type {
        QuestionType::Classic => accumulate::<ClassicState, _>(tags)
            .into_iter()
            .map(QuestionRecord::from)
            .collect(),
        QuestionType::Test => accumulate::<TestState, _>(tags)
            .into_iter()
            .map(QuestionRecord::from)
            .collect(),
    };

    debug!(lines = line_count, records = records.len(), %question_type, "Extraction finished");

    records
        .into_iter()
        .map(|record| ExtractedQuestion {
            topic_id: topic_id.to_string(),
            record,
        })
        .collect()
}

/// Extract several responses, one per type, concatenating results in the given order.
pub fn extract_all<'a, I>(responses: I, topic_id: &str) -> Vec<ExtractedQuestion>
where
    I: IntoIterator<Item = (QuestionType, &'a str)>,
{
    responses
        .into_iter()
        .flat_map(|(question_type, text)| extract(text, question_type, topic_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_lines_trim_and_skip_blanks() {
        let lines: Vec<&str> = response_lines("  a  \r\n\n\t\n b\n").collect();
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn empty_response_yields_nothing() {
        assert!(extract("", QuestionType::Test, "t").is_empty());
        assert!(extract("\n\n   \n", QuestionType::Classic, "t").is_empty());
    }

    #[test]
    fn records_carry_topic_and_type() {
        let out = extract("Soru 1: A?\nCevap 1: B.", QuestionType::Classic, "topic-7");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].topic_id, "topic-7");
        assert_eq!(out[0].question_type(), QuestionType::Classic);
    }
}
