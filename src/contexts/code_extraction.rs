use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::block_parser::parse_code_blocks;
use super::change_summary::summarize;
use super::path_resolver::resolve_path;
use crate::data::{ResolvedFile, TaskMetadata};

/// Outcome of turning one LLM response into files
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub files: Vec<ResolvedFile>,
    pub modified_files: Vec<String>,
    pub summary: String,
}

/// Code Extraction context: parses, places and reports the code contained
/// in a single LLM response.
pub struct CodeExtraction<'a> {
    /// Raw response text
    raw: &'a str,
    /// Placement hints for the run
    meta: &'a TaskMetadata,
}

impl<'a> CodeExtraction<'a> {
    pub fn new(raw: &'a str, meta: &'a TaskMetadata) -> Self {
        Self { raw, meta }
    }

    /// Role method: files.organize
    ///
    /// Resolves every block to a path. When two blocks land on the same path
    /// the later block replaces the earlier one in the earlier one's slot,
    /// matching what writing them in order would leave on disk.
    fn organize(&self) -> Vec<ResolvedFile> {
        let mut files: Vec<ResolvedFile> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        for block in parse_code_blocks(self.raw) {
            let path = resolve_path(&block, self.meta);
            let file = ResolvedFile::from_block(block, path);

            match slots.get(&file.path) {
                Some(&idx) => {
                    debug!("{} is generated twice, keeping the later block", file.path);
                    files[idx] = file;
                }
                None => {
                    slots.insert(file.path.clone(), files.len());
                    files.push(file);
                }
            }
        }

        files
    }

    pub fn run(self) -> ExtractionResult {
        let files = self.organize();
        let modified_files = files.iter().map(|f| f.path.clone()).collect();
        let summary = summarize(&files, self.meta);

        ExtractionResult {
            files,
            modified_files,
            summary,
        }
    }
}
