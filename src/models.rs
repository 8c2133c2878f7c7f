//! Records produced by the extraction engine and the documents handed to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of question asked of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Open question with a free-form answer.
    Classic,
    /// Four-option multiple choice.
    Test,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Classic => "classic",
            QuestionType::Test => "test",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            QuestionType::Classic => "Klasik Soru-Cevap",
            QuestionType::Test => "Çoktan Seçmeli",
        }
    }

    /// Parse from the lowercase wire name (case insensitive)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "test" => Ok(Self::Test),
            _ => Err(format!("Unknown question type: '{}'. Supported: classic, test", s)),
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EducationLevel {
    Elementary,
    Middle,
    #[default]
    Highschool,
    University,
}

impl EducationLevel {
    pub fn raw_value(&self) -> &'static str {
        match self {
            EducationLevel::Elementary => "elementary",
            EducationLevel::Middle => "middle",
            EducationLevel::Highschool => "highschool",
            EducationLevel::University => "university",
        }
    }

    /// Raw value with its first letter upper-cased, as embedded in prompts.
    pub fn capitalized(&self) -> String {
        let raw = self.raw_value();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EducationLevel::Elementary => "İlkokul",
            EducationLevel::Middle => "Ortaokul",
            EducationLevel::Highschool => "Lise",
            EducationLevel::University => "Üniversite",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "elementary" => Ok(Self::Elementary),
            "middle" => Ok(Self::Middle),
            "highschool" => Ok(Self::Highschool),
            "university" => Ok(Self::University),
            _ => Err(format!(
                "Unknown education level: '{}'. Supported: elementary, middle, highschool, university",
                s
            )),
        }
    }
}

/// Open question and its answer, both non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicRecord {
    pub question_text: String,
    pub answer_text: String,
}

/// Multiple-choice question. `correct_option_index` is always in `0..4`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub question_text: String,
    pub options: [String; 4],
    pub correct_option_index: usize,
    /// Model explanation, or `"Doğru cevap: <letter>"` when none was given.
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionRecord {
    Classic(ClassicRecord),
    Test(TestRecord),
}

impl QuestionRecord {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionRecord::Classic(_) => QuestionType::Classic,
            QuestionRecord::Test(_) => QuestionType::Test,
        }
    }

    pub fn question_text(&self) -> &str {
        match self {
            QuestionRecord::Classic(r) => &r.question_text,
            QuestionRecord::Test(r) => &r.question_text,
        }
    }

    /// Answer text as stored: the answer for classic questions, the explanation for tests.
    pub fn answer_text(&self) -> &str {
        match self {
            QuestionRecord::Classic(r) => &r.answer_text,
            QuestionRecord::Test(r) => &r.explanation,
        }
    }
}

impl From<ClassicRecord> for QuestionRecord {
    fn from(record: ClassicRecord) -> Self {
        QuestionRecord::Classic(record)
    }
}

impl From<TestRecord> for QuestionRecord {
    fn from(record: TestRecord) -> Self {
        QuestionRecord::Test(record)
    }
}

/// A record pulled out of one model response, tagged with the topic it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedQuestion {
    pub topic_id: String,
    #[serde(flatten)]
    pub record: QuestionRecord,
}

impl ExtractedQuestion {
    pub fn question_type(&self) -> QuestionType {
        self.record.question_type()
    }
}

/// Input to one prompt/extraction pass for a single question type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub lesson_name: String,
    pub topic_name: String,
    pub education_level: EducationLevel,
    pub user_prompt: String,
    pub per_type_count: usize,
    pub question_type: QuestionType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRef {
    pub id: String,
    pub name: String,
}

impl TopicRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A full question-generation request spanning one or more types.
///
/// `question_types` is an ordered sequence: the quota remainder goes to the earliest
/// entries, so callers must not build it from an unordered set.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub lesson_name: String,
    pub topic: TopicRef,
    pub education_level: EducationLevel,
    pub user_prompt: String,
    pub total_count: usize,
    pub question_types: Vec<QuestionType>,
}

impl GenerationRequest {
    pub fn pass_request(&self, question_type: QuestionType, per_type_count: usize) -> ExtractionRequest {
        ExtractionRequest {
            lesson_name: self.lesson_name.clone(),
            topic_name: self.topic.name.clone(),
            education_level: self.education_level,
            user_prompt: self.user_prompt.clone(),
            per_type_count,
            question_type,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContentRequest {
    pub lesson_name: String,
    pub topic: TopicRef,
    pub education_level: EducationLevel,
    pub user_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestQuestionData {
    pub options: [String; 4],
    pub correct_option_index: usize,
}

impl TestQuestionData {
    pub fn correct_answer(&self) -> &str {
        self.options
            .get(self.correct_option_index)
            .unwrap_or(&self.options[0])
    }
}

/// Question document as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub topic_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_set_id: Option<String>,
    pub question_text: String,
    pub answer_text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_data: Option<TestQuestionData>,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn from_extracted(extracted: ExtractedQuestion, question_set_id: Option<&str>) -> Self {
        let ExtractedQuestion { topic_id, record } = extracted;
        let question_type = record.question_type();
        let (question_text, answer_text, test_data) = match record {
            QuestionRecord::Classic(r) => (r.question_text, r.answer_text, None),
            QuestionRecord::Test(r) => (
                r.question_text,
                r.explanation,
                Some(TestQuestionData {
                    options: r.options,
                    correct_option_index: r.correct_option_index,
                }),
            ),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            topic_id,
            question_set_id: question_set_id.map(str::to_string),
            question_text,
            answer_text,
            question_type,
            test_data,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicContent {
    pub id: String,
    pub topic_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl TopicContent {
    pub fn new(topic_id: &str, text: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            topic_id: topic_id.to_string(),
            text,
            created_at: Utc::now(),
        }
    }
}
