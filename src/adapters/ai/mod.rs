//! AI analyzer adapters.

mod gemini;

pub use gemini::GeminiAnalyzer;
