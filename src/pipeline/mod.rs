//! Batch pipeline: validation, clustering and scoring stages over a record set

mod engine;
mod models;

pub use engine::Pipeline;
pub use models::{PipelineConfig, PipelineOutput, PipelineWarning};
