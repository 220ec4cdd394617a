//! Concrete LLM provider implementations

#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(feature = "groq")]
pub mod groq;

#[cfg(feature = "gemini")]
pub use gemini::GeminiProvider;
#[cfg(feature = "groq")]
pub use groq::GroqProvider;
