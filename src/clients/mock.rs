use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{core::LowLevelClient, error::AIError};

/// Canned reply for `MockClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    Success(String),
    Failure(String),
}

#[derive(Debug, Default)]
struct MockState {
    queue: VecDeque<MockResponse>,
    routed: Vec<(String, VecDeque<MockResponse>)>,
    prompts: Vec<String>,
}

/// Shared control side of a `MockClient`: queue replies, inspect prompts.
#[derive(Debug, Default)]
pub struct MockHandle {
    state: Mutex<MockState>,
}

impl MockHandle {
    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a reply served to any prompt no routed reply matches.
    pub fn add_response(&self, response: MockResponse) {
        self.lock().queue.push_back(response);
    }

    /// Queue a reply served only to prompts containing `needle`.
    ///
    /// Routed replies make concurrent callers deterministic.
    pub fn add_routed_response(&self, needle: impl Into<String>, response: MockResponse) {
        let needle = needle.into();
        let mut state = self.lock();
        match state.routed.iter().position(|(n, _)| *n == needle) {
            Some(i) => state.routed[i].1.push_back(response),
            None => state.routed.push((needle, VecDeque::from([response]))),
        }
    }

    /// Every prompt received so far, in arrival order.
    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().prompts.len()
    }

    fn next_response(&self, prompt: &str) -> Option<MockResponse> {
        let mut state = self.lock();
        state.prompts.push(prompt.to_string());

        let routed = state
            .routed
            .iter_mut()
            .find(|(needle, queue)| !queue.is_empty() && prompt.contains(needle.as_str()))
            .and_then(|(_, queue)| queue.pop_front());

        routed.or_else(|| state.queue.pop_front())
    }
}

/// Scripted client for tests. Replies come from the paired `MockHandle`.
#[derive(Debug, Clone)]
pub struct MockClient {
    handle: Arc<MockHandle>,
}

impl MockClient {
    pub fn new() -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle::default());
        (
            Self {
                handle: handle.clone(),
            },
            handle,
        )
    }
}

#[async_trait]
impl LowLevelClient for MockClient {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        match self.handle.next_response(&prompt) {
            Some(MockResponse::Success(text)) => Ok(text),
            Some(MockResponse::Failure(message)) => Err(AIError::Mock(message)),
            None => Err(AIError::Mock("No mock response queued".to_string())),
        }
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}

/// Mock client that always answers with empty text
#[derive(Debug, Clone, Default)]
pub struct MockVoid;

#[async_trait]
impl LowLevelClient for MockVoid {
    async fn ask_raw(&self, _prompt: String) -> Result<String, AIError> {
        Ok(String::new())
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
