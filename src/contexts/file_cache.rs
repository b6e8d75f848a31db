use crate::data::Cache;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Default root of the response cache, relative to the working directory
pub const DEFAULT_CACHE_DIR: &str = ".ai-team/cache";

/// FileCache stores LLM responses as plain files.
///
/// The cache is organized as: `{folder}/{template_model_hash}/{prompt_hash}.cache`
/// where template_model_hash = hash(prompt template + model name), so editing a
/// template or switching model never serves a stale answer.
#[derive(Debug, Clone)]
pub struct FileCache {
    /// The root folder path for the cache
    folder: PathBuf,
    /// Hash of prompt template + model name (used as subfolder)
    template_model_hash: String,
}

impl FileCache {
    /// Creates a new FileCache. A `None` folder means [`DEFAULT_CACHE_DIR`].
    pub fn new(folder: Option<PathBuf>, template_model_hash: String) -> Self {
        Self {
            folder: folder.unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
            template_model_hash,
        }
    }

    /// Keys are hex hashes and therefore safe as file names.
    fn get_cache_path(&self, key: &str) -> PathBuf {
        let mut path = self.get_cache_dir();
        path.push(format!("{}.cache", key));
        path
    }

    fn get_cache_dir(&self) -> PathBuf {
        self.folder.join(&self.template_model_hash)
    }
}

impl Cache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        // missing or unreadable file is a miss
        fs::read_to_string(self.get_cache_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        let path = self.get_cache_path(key);
        let dir = self.get_cache_dir();

        if let Err(e) = fs::create_dir_all(&dir) {
            warn!("Failed to create cache directory {:?}: {}", dir, e);
            return;
        }

        if let Err(e) = fs::write(&path, value) {
            warn!("Failed to write cache file {:?}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_cache_path_construction() {
        let cache = FileCache::new(Some(PathBuf::from("/tmp/cache")), "abc123".to_string());
        let path = cache.get_cache_path("test_key");
        assert_eq!(path, Path::new("/tmp/cache/abc123/test_key.cache"));
    }

    #[test]
    fn test_cache_get_set() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(Some(dir.path().to_path_buf()), "test_hash".to_string());

        assert_eq!(cache.get("nonexistent"), None);

        cache.set("test_key", "test_value");
        assert_eq!(cache.get("test_key"), Some("test_value".to_string()));
        assert!(dir.path().join("test_hash/test_key.cache").is_file());

        cache.set("test_key", "new_value");
        assert_eq!(cache.get("test_key"), Some("new_value".to_string()));
    }

    #[test]
    fn test_set_into_unwritable_root_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let cache = FileCache::new(Some(blocker), "hash".to_string());
        cache.set("key", "value");
        assert_eq!(cache.get("key"), None);
    }

    #[test]
    fn test_default_folder() {
        let cache = FileCache::new(None, "test_hash".to_string());
        assert_eq!(cache.folder, Path::new(".ai-team/cache"));
    }
}
