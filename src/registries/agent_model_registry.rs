use crate::contexts::{AgentModelRegistry, ExecutionError, Model, Provider};
use crate::data::TaskType;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Model used for task types missing from the registry
pub const DEFAULT_MODEL: &str = "deepseek-ai/DeepSeek-R1-Distill-Llama-70B-free";

const BUILTIN_REGISTRY: &str = include_str!("../../agents/agent_model_registry.yml");

/// File-based implementation of AgentModelRegistry
/// Loads task-type-to-model mappings from a YAML file, or the built-in
/// mapping when the file does not exist.
#[derive(Clone)]
pub struct FileAgentModelRegistry {
    registry_path: PathBuf,
}

impl FileAgentModelRegistry {
    /// `registry_path` defaults to "agents/agent_model_registry.yml"
    pub fn new(registry_path: Option<PathBuf>) -> Self {
        Self {
            registry_path: registry_path
                .unwrap_or_else(|| PathBuf::from("agents/agent_model_registry.yml")),
        }
    }

    fn load_registry(&self) -> Result<HashMap<String, Model>, ExecutionError> {
        if !self.registry_path.exists() {
            debug!("{} not found, using built-in models", self.registry_path.display());
            return parse_registry(BUILTIN_REGISTRY);
        }

        let content = fs::read_to_string(&self.registry_path).map_err(|e| {
            ExecutionError::InvalidModelRegistry(format!(
                "Failed to read {}: {}",
                self.registry_path.display(),
                e
            ))
        })?;

        parse_registry(&content)
    }
}

impl AgentModelRegistry for FileAgentModelRegistry {
    fn get_model(&self, task_type: TaskType) -> Result<Model, ExecutionError> {
        let registry = self.load_registry()?;

        Ok(registry.get(task_type.as_str()).cloned().unwrap_or_else(|| Model {
            name: DEFAULT_MODEL.to_string(),
            provider: Provider::Together,
        }))
    }
}

/// Parses the YAML registry into a HashMap keyed by task type name.
/// Supports a plain model id (Together.ai) or an object with model and provider.
fn parse_registry(yaml_content: &str) -> Result<HashMap<String, Model>, ExecutionError> {
    use yaml_rust::{Yaml, YamlLoader};

    let docs = YamlLoader::load_from_str(yaml_content).map_err(|e| {
        ExecutionError::InvalidModelRegistry(format!("Invalid registry YAML: {}", e))
    })?;

    let mut registry = HashMap::new();

    let Some(hash) = docs.first().and_then(|doc| doc.as_hash()) else {
        return Ok(registry);
    };

    for (key, value) in hash {
        let Some(task) = key.as_str() else {
            continue;
        };

        let model = if let Some(name) = value.as_str() {
            Model {
                name: name.to_string(),
                provider: Provider::Together,
            }
        } else if let Some(entry) = value.as_hash() {
            let name = entry
                .get(&Yaml::String("model".to_string()))
                .and_then(|v| v.as_str())
                .unwrap_or(DEFAULT_MODEL);

            let provider = match entry
                .get(&Yaml::String("provider".to_string()))
                .and_then(|v| v.as_str())
            {
                Some(p) => Provider::parse(p)
                    .ok_or_else(|| ExecutionError::UnknownProvider(p.to_string()))?,
                None => Provider::Together,
            };

            Model {
                name: name.to_string(),
                provider,
            }
        } else {
            continue;
        };

        registry.insert(task.to_string(), model);
    }

    Ok(registry)
}
