use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use ai_team::contexts::{
    populate_prompt, AgentRegistry, AgentRunner, AgentRunnerError, AgentSpecification,
    ExecutionResult, HttpCompletionClient, TaskRequest,
};
use ai_team::registries::{FileAgentModelRegistry, FileAgentRegistry};
use ai_team::settings::Settings;

use super::Config;

const MODEL_REGISTRY_FILE: &str = "agent_model_registry.yml";

pub struct AgentExecutor {
    verbose: bool,
    use_cache: bool,
    settings: Settings,
    agent_registry: FileAgentRegistry,
    model_registry: FileAgentModelRegistry,
}

impl AgentExecutor {
    /// `agents_dir` overrides the default `agents/` folder and must exist.
    pub fn new(agents_dir: Option<PathBuf>, use_cache: bool, settings: Settings, config: &Config) -> Result<Self> {
        if let Some(dir) = &agents_dir {
            validate_agents_dir(dir)?;
        }

        let model_registry_path = agents_dir.as_ref().map(|dir| dir.join(MODEL_REGISTRY_FILE));

        Ok(Self {
            verbose: config.verbose,
            use_cache,
            settings,
            agent_registry: FileAgentRegistry::new(agents_dir),
            model_registry: FileAgentModelRegistry::new(model_registry_path),
        })
    }

    /// Builds the prompt for a request without calling any model
    pub fn prompt(&self, request: &TaskRequest) -> Result<AgentSpecification> {
        let template = self
            .agent_registry
            .get_template(request.metadata.task_type)
            .context("Failed to load prompt template")?;
        Ok(populate_prompt(&template, request))
    }

    /// Runs the agent on the blocking pool; the HTTP client is blocking.
    pub async fn execute(&self, request: TaskRequest) -> Result<ExecutionResult> {
        if self.verbose {
            println!(
                "Executing {} agent for: {}",
                request.metadata.task_type, request.title
            );
        }

        let mut runner = AgentRunner::new(
            request,
            self.agent_registry.clone(),
            self.model_registry.clone(),
            HttpCompletionClient::new(self.settings.clone()),
        );
        if self.use_cache {
            runner = runner.with_cache(self.settings.cache_dir.clone());
        }

        let result = tokio::task::spawn_blocking(move || runner.run())
            .await
            .context("Agent task panicked")?
            .map_err(|e| match e {
                AgentRunnerError::Populate(populate_err) => {
                    anyhow::anyhow!("Failed to populate agent: {}", populate_err)
                }
                AgentRunnerError::Execution(exec_err) => {
                    anyhow::anyhow!("Failed to execute agent: {}", exec_err)
                }
            })?;

        debug!(
            "Agent answered with {} bytes (cached: {}, fallback: {})",
            result.output.len(),
            result.cached,
            result.fallback
        );

        Ok(result)
    }

    pub async fn verify_credentials(&self) -> Result<()> {
        let client = HttpCompletionClient::new(self.settings.clone());
        tokio::task::spawn_blocking(move || client.verify_credentials())
            .await
            .context("Credential check panicked")?
            .context("Together.ai rejected the API key")
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

fn validate_agents_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Agents directory not found: {}", dir.display());
    }

    Ok(())
}
