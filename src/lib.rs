//! Turns LLM responses into files on disk.
//!
//! The pipeline is: parse fenced code blocks out of the raw answer, place each
//! block at a project-relative path, then report what was produced. Around it
//! sit the prompt templates, the model registry, and the HTTP client that
//! produce the raw answer in the first place.

pub mod contexts;
pub mod data;
pub mod registries;
pub mod settings;
