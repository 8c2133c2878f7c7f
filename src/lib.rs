//! Turn free-form model output for Turkish quiz prompts into typed question records.

pub mod accumulator;
pub mod classifier;
pub mod clients;
pub mod config;
pub mod core;
pub mod error;
pub mod extract;
pub mod generator;
pub mod interceptors;
pub mod models;
pub mod prompts;
pub mod quota;
pub mod store;

// Convenient re-exports
pub use crate::core::{LowLevelClient, RetryConfig};
pub use config::GeneratorConfig;
pub use error::{AIError, GenerationError, StudyQueryError, StudyResult};
pub use extract::{extract, extract_all};
pub use generator::{QuestionBatch, QuestionGenerator, TypePass};
pub use models::{
    ClassicRecord, ContentRequest, EducationLevel, ExtractedQuestion, GenerationRequest, Question,
    QuestionRecord, QuestionType, TestRecord, TopicContent, TopicRef,
};
pub use quota::allocate;
pub use store::{MemoryQuestionStore, QuestionStore};
