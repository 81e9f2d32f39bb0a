//! Fake generators for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::traits::{GenerateError, TextGenerator};

/// Replays a fixed list of responses, one per call.
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, GenerateError>>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String, GenerateError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rate_limited() -> Result<String, GenerateError> {
        Err(GenerateError::api("429 RESOURCE_EXHAUSTED", "Resource has been exhausted"))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Self::rate_limited)
    }
}

/// Answers every prompt through a closure and records the prompts.
pub struct FnGenerator<F> {
    respond: F,
    prompts: Mutex<Vec<String>>,
}

impl<F> FnGenerator<F>
where
    F: Fn(&str) -> Result<String, GenerateError> + Send + Sync,
{
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F> TextGenerator for FnGenerator<F>
where
    F: Fn(&str) -> Result<String, GenerateError> + Send + Sync,
{
    fn name(&self) -> &'static str {
        "fn"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.respond)(prompt)
    }
}
