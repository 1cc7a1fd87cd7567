// Adapters layer: concrete implementations for external systems (model server, documents, speech, roster data).

pub mod document;
pub mod ollama;
pub mod roster;
pub mod transcription;
