//! Vendor-backed component generation.

pub mod client;
pub mod output;
pub mod pipeline;
pub mod prompts;

pub use client::AnthropicClient;
pub use output::{parse_json_output, strip_code_fences};
pub use pipeline::{Pipeline, PipelineOutput, Stage, StageFailure};
