#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Once;
use study_query::clients::{MockClient, MockHandle};
use study_query::{
    EducationLevel, GenerationRequest, GeneratorConfig, QuestionGenerator, QuestionType,
    RetryConfig, TopicRef,
};

static INIT: Once = Once::new();

/// Route `RUST_LOG` output to the test harness once per binary.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Substring present only in the classic question prompt.
pub const CLASSIC_PROMPT_MARKER: &str = "KLASİK";
/// Substring present only in the multiple-choice prompt.
pub const TEST_PROMPT_MARKER: &str = "ÇOK SEÇENEKLİ";
/// Substring present only in the learning content prompt.
pub const CONTENT_PROMPT_MARKER: &str = "eğitici ve kapsamlı";

pub const CLASSIC_RESPONSE: &str = "Soru 1: Türev nedir?
Cevap 1: Bir fonksiyonun anlık değişim oranıdır.

Soru 2: x^2 ifadesinin türevi nedir?
Cevap 2: 2x olur.";

pub const TEST_RESPONSE: &str = "**Soru 1:** Sabit bir fonksiyonun türevi nedir?
A) 1
B) 0
C) x
D) Tanımsız
**Doğru Cevap:** B
**Açıklama:** Sabitin değişimi yoktur.

Soru 2: 3x ifadesinin türevi kaçtır?
A) 3
B) x
C) 0
D) 3x
Doğru Cevap: A";

pub fn mock_generator(retry: RetryConfig) -> (QuestionGenerator<MockClient>, Arc<MockHandle>) {
    init_test_logging();
    let (client, handle) = MockClient::new();
    let generator = QuestionGenerator::new(client, GeneratorConfig::default().with_retry(retry));
    (generator, handle)
}

pub fn generation_request(total: usize, types: Vec<QuestionType>) -> GenerationRequest {
    GenerationRequest {
        lesson_name: "Matematik".to_string(),
        topic: TopicRef::new("topic-derivative", "Türev"),
        education_level: EducationLevel::Highschool,
        user_prompt: "Temel türev kuralları".to_string(),
        total_count: total,
        question_types: types,
    }
}
