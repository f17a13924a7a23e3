//! Worksheet Generation Module
//!
//! The core pipeline: state-standards lookup, template registry, prompt
//! construction, content validation and enrichment, math-notation
//! normalization, and the orchestrating `Generator`.

pub mod content;
pub mod notation;
pub mod pipeline;
pub mod prompt;
pub mod standards;
pub mod templates;
pub mod types;
pub mod validate;

// Re-exports for convenience.
pub use self::pipeline::{GenerateError, Generator};
pub use self::standards::StandardsIndex;
pub use self::templates::TemplateRegistry;
pub use self::types::{
    GeneratedContent, GenerationRequest, GenerationResponse, ResourceData, ResponseMetadata,
    Template,
};
