use crate::contexts::{AgentRegistry, PopulateError, PromptTemplate};
use crate::data::TaskType;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// File-based implementation of AgentRegistry
/// Loads prompt templates from `<agents_dir>/<task_type>.yml`. Task types
/// without a file use the templates compiled into the binary.
#[derive(Clone)]
pub struct FileAgentRegistry {
    agents_dir: PathBuf,
}

impl FileAgentRegistry {
    /// `agents_dir` defaults to "agents"
    pub fn new(agents_dir: Option<PathBuf>) -> Self {
        Self {
            agents_dir: agents_dir.unwrap_or_else(|| PathBuf::from("agents")),
        }
    }
}

impl AgentRegistry for FileAgentRegistry {
    fn get_template(&self, task_type: TaskType) -> Result<PromptTemplate, PopulateError> {
        let template_path = self.agents_dir.join(format!("{}.yml", task_type));

        if !template_path.exists() {
            debug!("{} not found, using built-in template", template_path.display());
            return parse_template(task_type.as_str(), builtin_template(task_type));
        }

        let content = fs::read_to_string(&template_path).map_err(|source| {
            PopulateError::TemplateRead {
                path: template_path.clone(),
                source,
            }
        })?;

        parse_template(&template_path.display().to_string(), &content)
    }
}

fn builtin_template(task_type: TaskType) -> &'static str {
    match task_type {
        TaskType::Feature => include_str!("../../agents/feature.yml"),
        TaskType::Backend => include_str!("../../agents/backend.yml"),
        TaskType::Frontend => include_str!("../../agents/frontend.yml"),
        TaskType::Testing => include_str!("../../agents/testing.yml"),
        TaskType::BugFix => include_str!("../../agents/bug_fix.yml"),
        TaskType::Refactor => include_str!("../../agents/refactor.yml"),
    }
}

fn parse_template(source: &str, yaml_content: &str) -> Result<PromptTemplate, PopulateError> {
    serde_yaml::from_str(yaml_content)
        .map_err(|e| PopulateError::InvalidTemplate(source.to_string(), e.to_string()))
}
