use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::llm_client::CompletionClient;
use super::prompt_builder::{compile_prompt, PromptContext, PromptTemplate, ANSWER_FORMAT};
use super::task_analysis::analyze;
use crate::contexts::FileCache;
use crate::data::{Cache, TaskMetadata, TaskType};

/// Errors that can occur while building the prompt
#[derive(Debug, Error)]
pub enum PopulateError {
    #[error("Prompt template '{0}' is invalid: {1}")]
    InvalidTemplate(String, String),
    #[error("Failed to read prompt template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while calling the model
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Invalid model registry: {0}")]
    InvalidModelRegistry(String),
    #[error("Unknown provider '{0}'")]
    UnknownProvider(String),
    #[error("No API key configured for {0}")]
    MissingCredentials(Provider),
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("Unexpected response from {provider}: {details}")]
    InvalidResponse { provider: Provider, details: String },
}

/// Errors that can occur in the agent runner
#[derive(Debug, Error)]
pub enum AgentRunnerError {
    #[error(transparent)]
    Populate(#[from] PopulateError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Inference API hosting a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Together,
    HuggingFace,
}

impl Provider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "together" | "together.ai" | "togetherai" => Some(Provider::Together),
            "huggingface" | "hugging_face" | "hf" => Some(Provider::HuggingFace),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Provider::Together => f.write_str("Together.ai"),
            Provider::HuggingFace => f.write_str("Hugging Face"),
        }
    }
}

/// A model that can answer a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub name: String,
    pub provider: Provider,
}

/// A populated prompt ready for execution
#[derive(Debug, Clone)]
pub struct AgentSpecification {
    pub template_name: String,
    pub prompt: String,
}

/// The result of executing an agent
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub output: String,
    pub model: String,
    /// Served from the response cache
    pub cached: bool,
    /// The call failed and `output` is the canned fallback answer
    pub fallback: bool,
}

/// What the user asked for
#[derive(Debug, Clone)]
pub struct TaskRequest {
    pub title: String,
    pub description: String,
    pub metadata: TaskMetadata,
}

impl TaskRequest {
    /// An empty title is replaced by the first non-blank line of the description.
    pub fn new(title: &str, description: &str, metadata: TaskMetadata) -> Self {
        let title = if title.trim().is_empty() {
            description
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or_default()
        } else {
            title.trim()
        };

        Self {
            title: title.to_string(),
            description: description.trim().to_string(),
            metadata,
        }
    }
}

/// Trait for loading prompt templates by task type
pub trait AgentRegistry {
    fn get_template(&self, task_type: TaskType) -> Result<PromptTemplate, PopulateError>;
}

/// Trait for resolving execution models by task type
pub trait AgentModelRegistry {
    fn get_model(&self, task_type: TaskType) -> Result<Model, ExecutionError>;
}

/// Builds the complete prompt for a request from its template.
pub fn populate_prompt(template: &PromptTemplate, request: &TaskRequest) -> AgentSpecification {
    let task_type = request.metadata.task_type;
    let analysis = analyze(&request.title, task_type);
    let areas = request
        .metadata
        .affected_areas
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let context = PromptContext::new(&request.title, &request.description, task_type, &analysis)
        .with_value("areas", &areas);

    let mut prompt = compile_prompt(template, &context);
    prompt.push_str("\n\n");
    prompt.push_str(ANSWER_FORMAT);

    AgentSpecification {
        template_name: template.name.clone(),
        prompt,
    }
}

/// Canned answer used when the model cannot be reached. It is itself a
/// valid ```language:path response so the rest of the pipeline still runs.
pub fn fallback_response(title: &str) -> String {
    let mut excerpt: String = title.chars().take(100).collect();
    excerpt = excerpt.replace('\\', "\\\\").replace('"', "\\\"");

    format!(
        r#"# 🤖 Code Template Généré

```javascript:src/generated.js
// Code généré automatiquement

console.log("Tâche: {}...");

export default function GeneratedComponent() {{
    return {{
        message: "Fonctionnalité à implémenter",
        status: "generated"
    }};
}}
```

> ⚠️ Code de fallback généré - Vérifiez la configuration des API IA
"#,
        excerpt
    )
}

/// Agent Runner context: prompt population, model call, response caching
pub struct AgentRunner<R, M, C>
where
    R: AgentRegistry,
    M: AgentModelRegistry,
    C: CompletionClient,
{
    /// The task being worked on
    request: TaskRequest,
    /// Registry for loading prompt templates
    agent_registry: R,
    /// Registry for resolving execution models
    agent_model_registry: M,
    /// Client that talks to the inference API
    client: C,
    /// Root folder of the response cache; `None` disables caching
    cache_root: Option<PathBuf>,
}

impl<R, M, C> AgentRunner<R, M, C>
where
    R: AgentRegistry,
    M: AgentModelRegistry,
    C: CompletionClient,
{
    pub fn new(request: TaskRequest, agent_registry: R, agent_model_registry: M, client: C) -> Self {
        Self {
            request,
            agent_registry,
            agent_model_registry,
            client,
            cache_root: None,
        }
    }

    pub fn with_cache(mut self, cache_root: PathBuf) -> Self {
        self.cache_root = Some(cache_root);
        self
    }

    /// Role method: agent.execute
    ///
    /// Any execution failure degrades to the fallback response.
    fn execute(&self, specification: &AgentSpecification, model: &Model) -> ExecutionResult {
        info!("Calling {} on {}", model.name, model.provider);

        match self.client.complete(model, &specification.prompt) {
            Ok(output) => ExecutionResult {
                output,
                model: model.name.clone(),
                cached: false,
                fallback: false,
            },
            Err(e) => {
                warn!("Model call failed, using fallback response: {}", e);
                ExecutionResult {
                    output: fallback_response(&self.request.title),
                    model: model.name.clone(),
                    cached: false,
                    fallback: true,
                }
            }
        }
    }

    /// Hash of template + model name, used as the cache folder
    fn generate_template_model_hash(&self, template: &PromptTemplate, model_name: &str) -> String {
        let composite = format!("{}:{}:{}", template.name, template.base, model_name);
        let mut hasher = Sha256::new();
        hasher.update(composite.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Hash of the populated prompt, used as the cache file name
    fn generate_cache_key(&self, prompt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(prompt.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Role method: cache.get_cached_artefact
    fn get_cached_artefact(&self, template: &PromptTemplate, model_name: &str) -> Option<FileCache> {
        let root = self.cache_root.as_ref()?;
        let folder_hash = self.generate_template_model_hash(template, model_name);
        Some(FileCache::new(Some(root.clone()), folder_hash))
    }

    /// Runs the whole lifecycle: template, model, prompt, cache, call.
    pub fn run(self) -> Result<ExecutionResult, AgentRunnerError> {
        let task_type = self.request.metadata.task_type;

        let template = self.agent_registry.get_template(task_type)?;
        let model = self.agent_model_registry.get_model(task_type)?;
        let specification = populate_prompt(&template, &self.request);

        let cache = self.get_cached_artefact(&template, &model.name);
        let cache_key = self.generate_cache_key(&specification.prompt);

        if let Some(cached) = cache.as_ref().and_then(|c| c.get(&cache_key)) {
            debug!("Cache hit for {} prompt", specification.template_name);
            return Ok(ExecutionResult {
                output: cached,
                model: model.name,
                cached: true,
                fallback: false,
            });
        }

        let result = self.execute(&specification, &model);

        if let Some(cache) = cache {
            if !result.fallback {
                cache.set(&cache_key, &result.output);
            }
        }

        Ok(result)
    }
}
