use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::provider::{CompletionRequest, LlmError, LlmProvider};

/// Deterministic scripted provider for tests.
///
/// Queued responses and injected errors are consumed in order; once the
/// script is exhausted every further call returns the default response. No
/// network is involved, and every request is recorded for assertions.
#[derive(Debug)]
pub struct MockProvider {
    default_response: String,
    script: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    /// A provider that answers every call with `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue one response to be returned before the default kicks in.
    pub fn push_response(&self, response: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
    }

    /// Queue one failed call.
    pub fn push_error(&self, message: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(message.into()));
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Copies of every request seen, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request);

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(LlmError::ApiError {
                status: 503,
                body: message,
            }),
            None => Ok(self.default_response.clone()),
        }
    }
}
