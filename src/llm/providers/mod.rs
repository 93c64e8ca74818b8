pub mod ollama;
pub mod openrouter;
