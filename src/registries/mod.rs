mod agent_model_registry;
mod agent_registry;
pub mod language_registry;

pub use agent_model_registry::{FileAgentModelRegistry, DEFAULT_MODEL};
pub use agent_registry::FileAgentRegistry;
