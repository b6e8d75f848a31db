mod agent_runner;
mod block_parser;
mod change_summary;
mod code_extraction;
mod file_cache;
mod file_writer;
mod llm_client;
mod path_resolver;
mod prompt_builder;
pub mod task_analysis;

pub use agent_runner::{
    fallback_response, populate_prompt, AgentModelRegistry, AgentRegistry, AgentRunner,
    AgentRunnerError, AgentSpecification, ExecutionError, ExecutionResult, Model, PopulateError,
    Provider, TaskRequest,
};
pub use block_parser::parse_code_blocks;
pub use change_summary::summarize;
pub use code_extraction::{CodeExtraction, ExtractionResult};
pub use file_cache::{FileCache, DEFAULT_CACHE_DIR};
pub use file_writer::{FileWriter, WriteError, WriteReport, WrittenFile};
pub use llm_client::{retry_delay, CompletionClient, HttpCompletionClient};
pub use path_resolver::{normalize_path, resolve_path};
pub use prompt_builder::{compile_prompt, PromptContext, PromptTemplate, TemplateSection, ANSWER_FORMAT};
