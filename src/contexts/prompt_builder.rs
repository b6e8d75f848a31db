//! Prompt compilation from YAML templates.

use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::task_analysis::TaskAnalysis;
use crate::data::TaskType;

/// Answer-format instructions appended to every prompt so that responses
/// use ```language:path fences.
pub const ANSWER_FORMAT: &str = "## 📦 FORMAT DE RÉPONSE
Fournis le code dans des blocs markdown avec le langage et le chemin du fichier.
Exemple:
```javascript:src/components/Example.jsx
// code
```";

/// A section appended when its condition holds, e.g. `complexity:high`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TemplateSection {
    pub when: String,
    pub text: String,
}

/// Prompt skeleton for one task type
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base: String,
    #[serde(default)]
    pub sections: Vec<TemplateSection>,
    #[serde(default)]
    pub constraints: Option<String>,
}

/// Values available to a template
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    values: BTreeMap<String, String>,
    patterns: Vec<String>,
}

impl PromptContext {
    pub fn new(title: &str, description: &str, task_type: TaskType, analysis: &TaskAnalysis) -> Self {
        let mut values = BTreeMap::new();
        values.insert("title".to_string(), title.to_string());
        values.insert("description".to_string(), description.to_string());
        values.insert("type".to_string(), task_type.to_string());
        values.insert("complexity".to_string(), analysis.complexity.to_string());
        values.insert("scope".to_string(), analysis.scope.to_string());
        values.insert("priority".to_string(), analysis.priority.to_string());

        Self {
            values,
            patterns: analysis.patterns.clone(),
        }
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Evaluates a section condition such as `scope:service` or `pattern:auth`.
    /// Unknown condition kinds are false.
    pub fn matches(&self, condition: &str) -> bool {
        let Some((kind, expected)) = condition.split_once(':') else {
            return false;
        };

        match kind {
            "complexity" | "scope" | "priority" => self.get(kind) == Some(expected),
            "pattern" => self.patterns.iter().any(|p| p == expected),
            _ => false,
        }
    }
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid regex"))
}

/// Fills `{{key}}` placeholders, then appends the matching sections and the
/// constraints block. Placeholders without a (non-empty) value are kept.
pub fn compile_prompt(template: &PromptTemplate, context: &PromptContext) -> String {
    let mut compiled = placeholder_re()
        .replace_all(&template.base, |caps: &Captures| {
            context
                .get(&caps[1])
                .map(|v| v.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned();

    for section in &template.sections {
        if context.matches(&section.when) {
            compiled.push_str("\n\n");
            compiled.push_str(&section.text);
        }
    }

    if let Some(constraints) = &template.constraints {
        compiled.push_str("\n\n## Contraintes Spécifiques\n");
        compiled.push_str(constraints);
    }

    compiled
}
