//! Persistence seam for generated questions.

use crate::error::{StudyQueryError, StudyResult};
use crate::models::Question;
use async_trait::async_trait;
use std::fmt::Debug;
use tokio::sync::RwLock;

#[async_trait]
pub trait QuestionStore: Send + Sync + Debug {
    async fn add_question(&self, question: Question) -> StudyResult<()>;

    async fn questions_in_set(&self, question_set_id: &str) -> StudyResult<Vec<Question>>;
}

/// In-process store, insertion ordered.
#[derive(Debug, Default)]
pub struct MemoryQuestionStore {
    questions: RwLock<Vec<Question>>,
}

impl MemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.questions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.questions.read().await.is_empty()
    }

    pub async fn all(&self) -> Vec<Question> {
        self.questions.read().await.clone()
    }
}

#[async_trait]
impl QuestionStore for MemoryQuestionStore {
    async fn add_question(&self, question: Question) -> StudyResult<()> {
        let mut questions = self.questions.write().await;
        if questions.iter().any(|q| q.id == question.id) {
            return Err(StudyQueryError::Store(format!(
                "question {} already stored",
                question.id
            )));
        }
        questions.push(question);
        Ok(())
    }

    async fn questions_in_set(&self, question_set_id: &str) -> StudyResult<Vec<Question>> {
        Ok(self
            .questions
            .read()
            .await
            .iter()
            .filter(|q| q.question_set_id.as_deref() == Some(question_set_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassicRecord, ExtractedQuestion};

    fn question(set: Option<&str>) -> Question {
        Question::from_extracted(
            ExtractedQuestion {
                topic_id: "t".to_string(),
                record: ClassicRecord {
                    question_text: "Q?".to_string(),
                    answer_text: "A.".to_string(),
                }
                .into(),
            },
            set,
        )
    }

    #[tokio::test]
    async fn filters_by_question_set() {
        let store = MemoryQuestionStore::new();
        store.add_question(question(Some("s1"))).await.unwrap();
        store.add_question(question(Some("s2"))).await.unwrap();
        store.add_question(question(None)).await.unwrap();

        assert_eq!(store.len().await, 3);
        assert_eq!(store.questions_in_set("s1").await.unwrap().len(), 1);
        assert!(store.questions_in_set("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        let store = MemoryQuestionStore::new();
        let q = question(None);
        store.add_question(q.clone()).await.unwrap();
        assert!(matches!(
            store.add_question(q).await,
            Err(StudyQueryError::Store(_))
        ));
    }
}
