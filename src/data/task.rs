use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of work a task asks for.
///
/// Parsing never fails: anything outside the vocabulary is a `Feature`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum TaskType {
    #[default]
    Feature,
    Backend,
    Frontend,
    Testing,
    BugFix,
    Refactor,
}

impl TaskType {
    pub const ALL: [TaskType; 6] = [
        TaskType::Feature,
        TaskType::Backend,
        TaskType::Frontend,
        TaskType::Testing,
        TaskType::BugFix,
        TaskType::Refactor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Feature => "feature",
            TaskType::Backend => "backend",
            TaskType::Frontend => "frontend",
            TaskType::Testing => "testing",
            TaskType::BugFix => "bug_fix",
            TaskType::Refactor => "refactor",
        }
    }

    /// Case-insensitive lookup with `Feature` as the fallback
    pub fn parse(value: &str) -> Self {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .unwrap_or_default()
    }
}

impl From<String> for TaskType {
    fn from(value: String) -> Self {
        TaskType::parse(&value)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Part of the repository a task is expected to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffectedArea {
    Frontend,
    Backend,
    Testing,
    General,
}

impl AffectedArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            AffectedArea::Frontend => "frontend",
            AffectedArea::Backend => "backend",
            AffectedArea::Testing => "testing",
            AffectedArea::General => "general",
        }
    }

    /// Case-insensitive lookup; `None` for anything outside the vocabulary
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "frontend" => Some(AffectedArea::Frontend),
            "backend" => Some(AffectedArea::Backend),
            "testing" => Some(AffectedArea::Testing),
            "general" => Some(AffectedArea::General),
            _ => None,
        }
    }
}

impl fmt::Display for AffectedArea {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement hints that travel with one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetadata {
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub affected_areas: Vec<AffectedArea>,
}

impl TaskMetadata {
    pub fn new(task_type: TaskType, affected_areas: Vec<AffectedArea>) -> Self {
        Self {
            task_type,
            affected_areas,
        }
    }

    pub fn has_area(&self, area: AffectedArea) -> bool {
        self.affected_areas.contains(&area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_type_parse_is_case_insensitive() {
        assert_eq!(TaskType::parse("BUG_FIX"), TaskType::BugFix);
        assert_eq!(TaskType::parse(" Frontend "), TaskType::Frontend);
        assert_eq!(TaskType::parse("refactor"), TaskType::Refactor);
    }

    #[test]
    fn test_unknown_task_type_degrades_to_feature() {
        assert_eq!(TaskType::parse("architecture"), TaskType::Feature);
        assert_eq!(TaskType::parse(""), TaskType::Feature);
        assert_eq!(TaskMetadata::default().task_type, TaskType::Feature);
    }

    #[test]
    fn test_area_parse() {
        assert_eq!(AffectedArea::parse("Backend"), Some(AffectedArea::Backend));
        assert_eq!(AffectedArea::parse("database"), None);
    }

    #[test]
    fn test_metadata_deserializes_with_defaults() {
        let meta: TaskMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(meta, TaskMetadata::default());

        let meta: TaskMetadata =
            serde_json::from_str(r#"{"task_type":"bug_fix","affected_areas":["frontend"]}"#)
                .unwrap();
        assert_eq!(meta.task_type, TaskType::BugFix);
        assert!(meta.has_area(AffectedArea::Frontend));

        let meta: TaskMetadata = serde_json::from_str(r#"{"task_type":"Performance"}"#).unwrap();
        assert_eq!(meta.task_type, TaskType::Feature);
    }
}
