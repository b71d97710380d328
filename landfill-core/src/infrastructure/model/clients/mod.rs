//! Model clients

mod gemini;
mod openai;

pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
