pub mod client;
pub mod parser;
pub mod pipeline;
pub mod prompt;

pub use client::{GenerationClient, ProviderGenerationClient};
pub use parser::parse;
pub use pipeline::GenerationPipeline;
pub use prompt::build_prompt;
