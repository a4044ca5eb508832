//! Template storage with a TTL read cache.
//!
//! Files under the templates directory override the built-in texts;
//! the cache keeps disk reads off the hot path. Freshness is
//! best-effort: content may be stale for at most the TTL window, and
//! concurrent refreshes racing is fine (last write wins).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use super::{defaults, TemplateError};

/// Default freshness window for cached template content.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

struct CachedTemplate {
    content: String,
    loaded_at: Instant,
}

pub struct TemplateStore {
    root: PathBuf,
    ttl: Duration,
    cache: Mutex<HashMap<String, CachedTemplate>>,
}

impl TemplateStore {
    pub fn new(root: PathBuf) -> Self {
        Self::with_ttl(root, DEFAULT_TTL)
    }

    pub fn with_ttl(root: PathBuf, ttl: Duration) -> Self {
        Self {
            root,
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Load a template by relative name ("estructura_a.txt",
    /// "mods/poder.txt"). Cache, then disk override, then built-in.
    pub fn load(&self, name: &str) -> Result<String, TemplateError> {
        {
            let cache = self.lock();
            if let Some(cached) = cache.get(name) {
                if cached.loaded_at.elapsed() < self.ttl {
                    return Ok(cached.content.clone());
                }
            }
        }

        let content = self.read_source(name)?;
        let mut cache = self.lock();
        cache.insert(
            name.to_string(),
            CachedTemplate {
                content: content.clone(),
                loaded_at: Instant::now(),
            },
        );
        Ok(content)
    }

    fn read_source(&self, name: &str) -> Result<String, TemplateError> {
        let path = self.root.join(name);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                debug!(template = name, "template loaded from disk override");
                Ok(content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => defaults::builtin(name)
                .map(str::to_string)
                .ok_or_else(|| TemplateError::NotFound(name.to_string())),
            Err(e) => Err(TemplateError::Io(e)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CachedTemplate>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}
