use serde::{Deserialize, Serialize};

/// A fenced code block pulled out of an LLM response.
///
/// The content is stored trimmed and is never blank; use [`CodeBlock::new`]
/// to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    filename: String,
    content: String,
    language: String,
}

impl CodeBlock {
    /// Builds a block from raw fence captures.
    ///
    /// Returns `None` when the body is empty after trimming. An empty
    /// language tag becomes `"text"`.
    pub fn new(filename: &str, content: &str, language: &str) -> Option<Self> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let language = language.trim();
        Some(Self {
            filename: filename.trim().to_string(),
            content: content.to_string(),
            language: if language.is_empty() {
                "text".to_string()
            } else {
                language.to_string()
            },
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

/// A code block with its final repository-relative destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFile {
    /// Forward-slash path relative to the repository root
    pub path: String,
    pub content: String,
    pub language: String,
    /// Filename hint the block was parsed with
    pub original_name: String,
}

impl ResolvedFile {
    pub fn from_block(block: CodeBlock, path: String) -> Self {
        Self {
            path,
            content: block.content,
            language: block.language,
            original_name: block.filename,
        }
    }
}
