//! Resume intake: turns an uploaded document into a `ParsedResumeRecord`.
//!
//! classify → extract text → one LLM call → coerce the reply into the record schema.

pub mod classifier;
pub mod coerce;
pub mod errors;
pub mod extract;
pub mod form;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;

pub use classifier::DocumentFormat;
pub use errors::ParseError;
