use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use study_query::clients::GeminiClient;
use study_query::interceptors::FileInterceptor;
use study_query::{
    extract, ContentRequest, EducationLevel, GenerationRequest, GeneratorConfig,
    MemoryQuestionStore, QuestionGenerator, QuestionType, TopicRef,
};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about = "Generate and parse Turkish study questions", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    GEMINI_API_KEY           API key for the Gemini client
    STUDY_MAX_QUESTIONS      Largest accepted question count [default: 15]
    STUDY_CONCURRENT_PASSES  Run per-type passes concurrently [default: true]
    STUDY_MAX_RETRIES        Retry budget per failed call
    RUST_LOG                 Log filter [default: info]

EXAMPLES:
    study-query extract --type test --topic-id t1 response.txt
    study-query questions --lesson Fizik --topic \"Newton Yasaları\" --count 6 --types classic,test
    study-query content --lesson Biyoloji --topic Hücre --level middle")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a saved model response and print the records as JSON
    Extract {
        #[arg(long = "type", value_parser = QuestionType::from_str)]
        question_type: QuestionType,
        #[arg(long)]
        topic_id: String,
        /// Response file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Generate questions through Gemini and print them as JSON
    Questions {
        #[command(flatten)]
        topic: TopicArgs,
        #[arg(long, default_value_t = 5)]
        count: usize,
        #[arg(long, value_delimiter = ',', default_value = "classic", value_parser = QuestionType::from_str)]
        types: Vec<QuestionType>,
        /// Save every prompt/response exchange under this directory
        #[arg(long)]
        transcripts: Option<PathBuf>,
    },
    /// Generate learning content for a topic
    Content {
        #[command(flatten)]
        topic: TopicArgs,
    },
}

#[derive(Args)]
struct TopicArgs {
    #[arg(long)]
    lesson: String,
    #[arg(long)]
    topic: String,
    #[arg(long, default_value = "highschool", value_parser = EducationLevel::from_str)]
    level: EducationLevel,
    #[arg(long, default_value = "")]
    prompt: String,
    /// Topic id stamped on the output; random when omitted
    #[arg(long)]
    topic_id: Option<String>,
}

impl TopicArgs {
    fn topic_ref(&self) -> TopicRef {
        let id = self
            .topic_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        TopicRef::new(id, self.topic.clone())
    }
}

fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn generator(transcripts: Option<PathBuf>) -> QuestionGenerator<GeminiClient> {
    let generator = QuestionGenerator::new(GeminiClient::default(), GeneratorConfig::from_env());
    match transcripts {
        Some(dir) => generator.with_interceptor(Arc::new(FileInterceptor::new(dir))),
        None => generator,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            question_type,
            topic_id,
            file,
        } => {
            let text = read_input(file)?;
            let records = extract(&text, question_type, &topic_id);
            info!(records = records.len(), "Extracted records");
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Questions {
            topic,
            count,
            types,
            transcripts,
        } => {
            if types.is_empty() {
                bail!("at least one question type is required");
            }
            let request = GenerationRequest {
                lesson_name: topic.lesson.clone(),
                topic: topic.topic_ref(),
                education_level: topic.level,
                user_prompt: topic.prompt.clone(),
                total_count: count,
                question_types: types,
            };

            let store = MemoryQuestionStore::new();
            let set_id = Uuid::new_v4().to_string();
            let (questions, batch) = generator(transcripts)
                .generate_into_set(&store, &request, &set_id)
                .await?;

            if batch.is_short() {
                warn!(
                    generated = batch.len(),
                    requested = batch.requested(),
                    failed = ?batch.failed_types(),
                    "Fewer questions were generated than requested"
                );
            }
            println!("{}", serde_json::to_string_pretty(&questions)?);
        }
        Command::Content { topic } => {
            let request = ContentRequest {
                lesson_name: topic.lesson.clone(),
                topic: topic.topic_ref(),
                education_level: topic.level,
                user_prompt: topic.prompt.clone(),
            };
            let content = generator(None).generate_learning_content(&request).await?;
            println!("{}", content.text);
        }
    }

    Ok(())
}
