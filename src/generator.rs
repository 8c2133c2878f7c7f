//! Question generator: prompt, call the model per question type, extract, collect.

use crate::config::GeneratorConfig;
use crate::core::LowLevelClient;
use crate::error::{GenerationError, StudyQueryError, StudyResult};
use crate::extract::extract;
use crate::interceptors::Interceptor;
use crate::models::{
    ContentRequest, ExtractedQuestion, GenerationRequest, Question, QuestionType, TopicContent,
};
use crate::prompts;
use crate::quota::allocate;
use crate::store::QuestionStore;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Outcome of one per-type generate-then-extract pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePass {
    pub question_type: QuestionType,
    pub requested: usize,
    pub extracted: usize,
    /// Set when the generation call failed; the pass then contributed no records.
    pub error: Option<String>,
}

impl TypePass {
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Records from every pass, grouped by type in request order.
#[derive(Debug, Clone, Default)]
pub struct QuestionBatch {
    questions: Vec<ExtractedQuestion>,
    passes: Vec<TypePass>,
}

impl QuestionBatch {
    pub fn questions(&self) -> &[ExtractedQuestion] {
        &self.questions
    }

    pub fn into_questions(self) -> Vec<ExtractedQuestion> {
        self.questions
    }

    pub fn passes(&self) -> &[TypePass] {
        &self.passes
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn requested(&self) -> usize {
        self.passes.iter().map(|p| p.requested).sum()
    }

    /// Fewer records than requested. Expected from time to time, not an error.
    pub fn is_short(&self) -> bool {
        self.len() < self.requested()
    }

    pub fn failed_types(&self) -> Vec<QuestionType> {
        self.passes
            .iter()
            .filter(|p| p.is_failed())
            .map(|p| p.question_type)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct QuestionGenerator<C> {
    client: C,
    config: GeneratorConfig,
    interceptor: Option<Arc<dyn Interceptor>>,
}

impl<C: LowLevelClient> QuestionGenerator<C> {
    pub fn new(client: C, config: GeneratorConfig) -> Self {
        info!(
            max_question_count = config.max_question_count,
            concurrent_passes = config.concurrent_passes,
            "Creating question generator"
        );
        Self {
            client,
            config,
            interceptor: None,
        }
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Send `prompt` to the model, retrying per the configured budgets.
    ///
    /// Empty or whitespace-only text counts as `NoTextGenerated`.
    #[instrument(target = "study_query::generator", skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn generate_text(&self, label: &str, prompt: &str) -> Result<String, GenerationError> {
        let mut attempt = 0;

        loop {
            debug!(attempt = attempt + 1, "Making API call");

            let result = match self.client.ask_raw(prompt.to_string()).await {
                Ok(text) if text.trim().is_empty() => Err(GenerationError::NoTextGenerated),
                Ok(text) => Ok(text),
                Err(ai_error) => Err(GenerationError::Ai(ai_error)),
            };

            match result {
                Ok(text) => {
                    debug!(response_len = text.len(), "Received API response");
                    self.record_exchange(label, prompt, &text).await;
                    return Ok(text);
                }
                Err(err) => {
                    let max_retries = self.config.retry.max_retries_for(&err);
                    warn!(error = %err, attempt = attempt + 1, max_retries, "API call failed");

                    if attempt >= max_retries {
                        error!(error = %err, max_retries, "Max retries exceeded");
                        return Err(err);
                    }

                    attempt += 1;
                }
            }
        }
    }

    async fn record_exchange(&self, label: &str, prompt: &str, response: &str) {
        if let Some(interceptor) = &self.interceptor {
            if let Err(e) = interceptor.save(label, prompt, response).await {
                warn!(error = %e, label, "Failed to save transcript");
            }
        }
    }

    fn validate(&self, request: &GenerationRequest) -> StudyResult<()> {
        if request.total_count == 0 {
            return Err(StudyQueryError::InvalidInput(
                "question count must be at least 1".to_string(),
            ));
        }
        if request.total_count > self.config.max_question_count {
            return Err(StudyQueryError::InvalidInput(format!(
                "question count {} exceeds the maximum of {}",
                request.total_count, self.config.max_question_count
            )));
        }
        Ok(())
    }

    async fn run_pass(
        &self,
        request: &GenerationRequest,
        question_type: QuestionType,
        requested: usize,
    ) -> (Vec<ExtractedQuestion>, TypePass) {
        let prompt = prompts::question_prompt(&request.pass_request(question_type, requested));
        let label = format!("questions_{}", question_type);

        match self.generate_text(&label, &prompt).await {
            Ok(text) => {
                let questions = extract(&text, question_type, &request.topic.id);
                if questions.len() < requested {
                    info!(%question_type, requested, extracted = questions.len(), "Pass returned fewer questions than requested");
                }
                let pass = TypePass {
                    question_type,
                    requested,
                    extracted: questions.len(),
                    error: None,
                };
                (questions, pass)
            }
            Err(err) => {
                warn!(%question_type, error = %err, "Generation pass failed, continuing without it");
                let pass = TypePass {
                    question_type,
                    requested,
                    extracted: 0,
                    error: Some(err.to_string()),
                };
                (Vec::new(), pass)
            }
        }
    }

    /// Generate `total_count` questions split across the requested types.
    ///
    /// Only invalid input is an error. A failed pass contributes zero records and is
    /// reported in the batch's `TypePass` list.
    #[instrument(
        target = "study_query::generator",
        skip(self, request),
        fields(topic_id = %request.topic.id, total = request.total_count)
    )]
    pub async fn generate_questions(&self, request: &GenerationRequest) -> StudyResult<QuestionBatch> {
        self.validate(request)?;
        let allocation = allocate(request.total_count, &request.question_types)?;

        let mut passes = Vec::with_capacity(allocation.len());
        let mut active = Vec::new();
        for (index, (question_type, count)) in allocation.iter().enumerate() {
            if *count == 0 {
                debug!(%question_type, "Skipping type with zero quota");
            } else {
                active.push(index);
            }
            passes.push(TypePass {
                question_type: *question_type,
                requested: *count,
                extracted: 0,
                error: None,
            });
        }

        let results = if self.config.concurrent_passes {
            join_all(active.iter().map(|&index| {
                let (question_type, count) = allocation[index];
                self.run_pass(request, question_type, count)
            }))
            .await
        } else {
            let mut results = Vec::with_capacity(active.len());
            for &index in &active {
                let (question_type, count) = allocation[index];
                results.push(self.run_pass(request, question_type, count).await);
            }
            results
        };

        let mut questions = Vec::new();
        for (&index, (records, pass)) in active.iter().zip(results) {
            questions.extend(records);
            passes[index] = pass;
        }

        let batch = QuestionBatch { questions, passes };
        info!(
            generated = batch.len(),
            requested = batch.requested(),
            failed = batch.failed_types().len(),
            "Question generation finished"
        );
        Ok(batch)
    }

    #[instrument(target = "study_query::generator", skip(self, request), fields(topic_id = %request.topic.id))]
    pub async fn generate_learning_content(&self, request: &ContentRequest) -> StudyResult<TopicContent> {
        let prompt = prompts::learning_content_prompt(request);
        let text = self.generate_text("content", &prompt).await?;
        info!(content_len = text.len(), "Learning content generated");
        Ok(TopicContent::new(&request.topic.id, text))
    }

    /// Generate a batch and persist each question under `question_set_id`.
    ///
    /// Returns the stored documents together with the batch outcome.
    pub async fn generate_into_set<S>(
        &self,
        store: &S,
        request: &GenerationRequest,
        question_set_id: &str,
    ) -> StudyResult<(Vec<Question>, QuestionBatch)>
    where
        S: QuestionStore + ?Sized,
    {
        let batch = self.generate_questions(request).await?;

        let mut stored = Vec::with_capacity(batch.len());
        for extracted in batch.questions() {
            let question = Question::from_extracted(extracted.clone(), Some(question_set_id));
            store.add_question(question.clone()).await?;
            stored.push(question);
        }

        debug!(stored = stored.len(), question_set_id, "Persisted question set");
        Ok((stored, batch))
    }
}
