mod cache;
mod code_block;
mod task;

pub use cache::Cache;
pub use code_block::{CodeBlock, ResolvedFile};
pub use task::{AffectedArea, TaskMetadata, TaskType};
