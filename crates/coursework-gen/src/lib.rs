//! Text generation for course material.
//!
//! This crate wraps a generative text API behind the [`TextGenerator`] trait,
//! retries rate-limited calls with exponential backoff, and uses the result to
//! write reference solutions and correct challenge sample code.

pub mod correct;
pub mod gemini;
pub mod prompts;
pub mod retry;
pub mod solutions;
pub mod traits;

#[cfg(test)]
mod testing;

pub use correct::{CorrectConfig, CorrectError, CorrectionReport, SampleCorrector};
pub use gemini::GeminiClient;
pub use retry::{generate_with_retry, RetryPolicy, RetryState};
pub use solutions::{
    wrap_solution, SolutionConfig, SolutionError, SolutionOutcome, SolutionReport, SolutionWriter,
};
pub use traits::{GenerateError, TextGenerator};
