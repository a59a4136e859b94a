//! Process-wide memo of compiled procedures, keyed by exact source text.
//!
//! Entries are never invalidated: the same text always compiles to the same
//! procedure and paths. Failed compilations are not stored.

use crate::{extract, CompileError, Path};
use dashmap::DashMap;
use imut_ir::Procedure;
use imut_parse::parse_procedure;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// A parsed procedure together with the paths it writes.
#[derive(Debug)]
pub struct Compiled {
    pub procedure: Procedure,
    pub paths: Vec<Path>,
}

impl Compiled {
    /// Lex, parse and analyze `source` without caching.
    pub fn new(source: &str) -> Result<Self, CompileError> {
        let procedure = parse_procedure(source)?;
        let paths = extract(&procedure)?;
        Ok(Compiled { procedure, paths })
    }
}

/// Counters for one cache.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    /// Successful compilations stored in the cache.
    pub compilations: u64,
    pub hits: u64,
}

/// Concurrent insert-if-absent cache of compiled procedures.
pub struct PathCache {
    entries: DashMap<Box<str>, Arc<Compiled>>,
    compilations: AtomicU64,
    hits: AtomicU64,
}

impl PathCache {
    pub fn new() -> Self {
        PathCache {
            entries: DashMap::new(),
            compilations: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    /// The cache shared by every caller that does not bring its own.
    pub fn global() -> &'static PathCache {
        static GLOBAL: OnceLock<PathCache> = OnceLock::new();
        GLOBAL.get_or_init(PathCache::new)
    }

    /// Compiled form of `source`, compiling it on first sight.
    ///
    /// Concurrent first calls for the same text compile it once; the others
    /// wait on the entry and share the result.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn compile(&self, source: &str) -> Result<Arc<Compiled>, CompileError> {
        // Fast path: already compiled
        if let Some(compiled) = self.entries.get(source) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("path cache hit");
            return Ok(Arc::clone(&compiled));
        }

        let mut compiled_here = false;
        let entry = self
            .entries
            .entry(Box::from(source))
            .or_try_insert_with(|| {
                compiled_here = true;
                Compiled::new(source).map(Arc::new)
            })?;
        let compiled = Arc::clone(&entry);
        drop(entry);

        if compiled_here {
            self.compilations.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(paths = compiled.paths.len(), "path cache miss");
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("path cache hit after wait");
        }
        Ok(compiled)
    }

    /// Write paths of `source`. The returned list is a fresh copy.
    pub fn extract_paths(&self, source: &str) -> Result<Vec<Path>, CompileError> {
        Ok(self.compile(source)?.paths.clone())
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            compilations: self.compilations.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
        }
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PathCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathCache")
            .field("stats", &self.stats())
            .finish()
    }
}
