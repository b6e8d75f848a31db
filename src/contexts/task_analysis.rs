//! Keyword heuristics that classify a task from its title or description.
//!
//! Every classifier is a literal table of `(result, keywords)` pairs checked
//! in order against the lower-cased text with plain substring matching.

use serde::Serialize;
use std::fmt;

use crate::data::{AffectedArea, TaskType};

const TASK_TYPE_KEYWORDS: &[(TaskType, &[&str])] = &[
    (TaskType::BugFix, &["bug", "fix", "error"]),
    (TaskType::Testing, &["test"]),
    (TaskType::Refactor, &["refactor", "optimize"]),
    (TaskType::Backend, &["api", "backend", "server"]),
    (TaskType::Frontend, &["ui", "frontend", "component"]),
];

const AREA_KEYWORDS: &[(AffectedArea, &[&str])] = &[
    (AffectedArea::Frontend, &["frontend", "ui", "component", "css"]),
    (AffectedArea::Backend, &["backend", "api", "server", "database"]),
    (AffectedArea::Testing, &["test"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    High,
    Medium,
    Low,
}

const COMPLEXITY_KEYWORDS: &[(Complexity, &[&str])] = &[
    (
        Complexity::High,
        &[
            "architecture",
            "microservice",
            "system",
            "integration",
            "migration",
            "performance",
            "scalable",
            "enterprise",
        ],
    ),
    (
        Complexity::Medium,
        &["dashboard", "api", "authentication", "database", "workflow", "automation"],
    ),
    (
        Complexity::Low,
        &["button", "form", "page", "style", "text", "image", "simple"],
    ),
];

const TECHNOLOGY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "frontend",
        &[
            "react",
            "vue",
            "angular",
            "next",
            "nuxt",
            "svelte",
            "typescript",
            "tailwind",
            "css",
            "html",
            "javascript",
        ],
    ),
    (
        "backend",
        &[
            "node", "express", "fastify", "python", "django", "flask", "java", "spring", "php",
            "laravel", "go", "rust",
        ],
    ),
    (
        "database",
        &[
            "mongodb",
            "postgresql",
            "mysql",
            "redis",
            "elasticsearch",
            "prisma",
            "sequelize",
        ],
    ),
    (
        "cloud",
        &["aws", "azure", "gcp", "docker", "kubernetes", "serverless", "lambda"],
    ),
    (
        "testing",
        &["jest", "cypress", "playwright", "vitest", "mocha", "junit"],
    ),
];

const PATTERN_KEYWORDS: &[(&str, &[&str])] = &[
    ("mvc", &["model", "view", "controller", "mvc"]),
    ("microservices", &["microservice", "service", "api", "distributed"]),
    ("spa", &["single page", "spa", "router", "navigation"]),
    ("crud", &["create", "read", "update", "delete", "crud", "form"]),
    ("rest", &["rest", "restful", "endpoint", "api"]),
    ("graphql", &["graphql", "query", "mutation", "subscription"]),
    ("auth", &["authentication", "authorization", "login", "jwt", "oauth"]),
    ("real-time", &["websocket", "socket.io", "real-time", "live", "stream"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Component,
    Interface,
    Service,
    Application,
    Feature,
}

const SCOPE_KEYWORDS: &[(Scope, &[&str])] = &[
    (Scope::Component, &["landing", "page", "component", "button", "form"]),
    (Scope::Interface, &["dashboard", "admin", "panel", "interface"]),
    (Scope::Service, &["api", "service", "backend", "server"]),
    (Scope::Application, &["app", "application", "system", "platform"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Normal,
}

const URGENT_KEYWORDS: &[&str] = &["urgent", "critique", "bug", "fix", "emergency", "asap"];
const HIGH_PRIORITY_KEYWORDS: &[&str] =
    &["important", "priority", "performance", "security", "optimization"];

macro_rules! lowercase_display {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                let text = format!("{:?}", self).to_lowercase();
                f.write_str(&text)
            }
        }
    )*};
}

lowercase_display!(Complexity, Scope, Priority);

/// Technologies of one category found in a title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnologyGroup {
    pub category: String,
    pub techs: Vec<String>,
}

/// Everything the heuristics infer from a task title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskAnalysis {
    pub complexity: Complexity,
    pub technologies: Vec<TechnologyGroup>,
    pub patterns: Vec<String>,
    pub scope: Scope,
    pub priority: Priority,
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

fn first_match<T: Copy>(text: &str, table: &[(T, &[&str])]) -> Option<T> {
    table
        .iter()
        .find(|(_, keywords)| contains_any(text, keywords))
        .map(|(result, _)| *result)
}

pub fn classify_task_type(description: &str) -> TaskType {
    first_match(&description.to_lowercase(), TASK_TYPE_KEYWORDS).unwrap_or_default()
}

/// Areas mentioned in the description; `[general]` when none is.
pub fn identify_affected_areas(description: &str) -> Vec<AffectedArea> {
    let text = description.to_lowercase();
    let areas: Vec<AffectedArea> = AREA_KEYWORDS
        .iter()
        .filter(|(_, keywords)| contains_any(&text, keywords))
        .map(|(area, _)| *area)
        .collect();

    if areas.is_empty() {
        vec![AffectedArea::General]
    } else {
        areas
    }
}

pub fn detect_complexity(title: &str) -> Complexity {
    first_match(&title.to_lowercase(), COMPLEXITY_KEYWORDS).unwrap_or(Complexity::Medium)
}

pub fn detect_technologies(title: &str) -> Vec<TechnologyGroup> {
    let text = title.to_lowercase();
    TECHNOLOGY_KEYWORDS
        .iter()
        .filter_map(|(category, techs)| {
            let found: Vec<String> = techs
                .iter()
                .filter(|tech| text.contains(*tech))
                .map(|tech| tech.to_string())
                .collect();
            if found.is_empty() {
                None
            } else {
                Some(TechnologyGroup {
                    category: category.to_string(),
                    techs: found,
                })
            }
        })
        .collect()
}

pub fn detect_patterns(title: &str) -> Vec<String> {
    let text = title.to_lowercase();
    PATTERN_KEYWORDS
        .iter()
        .filter(|(_, keywords)| contains_any(&text, keywords))
        .map(|(pattern, _)| pattern.to_string())
        .collect()
}

pub fn detect_scope(title: &str) -> Scope {
    first_match(&title.to_lowercase(), SCOPE_KEYWORDS).unwrap_or(Scope::Feature)
}

pub fn detect_priority(title: &str, task_type: TaskType) -> Priority {
    let text = title.to_lowercase();
    if task_type == TaskType::BugFix || contains_any(&text, URGENT_KEYWORDS) {
        Priority::Urgent
    } else if contains_any(&text, HIGH_PRIORITY_KEYWORDS) {
        Priority::High
    } else {
        Priority::Normal
    }
}

pub fn analyze(title: &str, task_type: TaskType) -> TaskAnalysis {
    TaskAnalysis {
        complexity: detect_complexity(title),
        technologies: detect_technologies(title),
        patterns: detect_patterns(title),
        scope: detect_scope(title),
        priority: detect_priority(title, task_type),
    }
}
