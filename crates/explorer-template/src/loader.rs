/*
 * loader.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template source loading and caching.
//!
//! A [`TemplateLoader`] knows how to read raw template text for a name from
//! some backing store (the filesystem, an in-memory map, ...). The
//! [`TemplateStore`] wraps a loader with a cache so each distinct name is read
//! at most once for the lifetime of the store.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::{TemplateError, TemplateResult};

/// Default file extension for templates on disk.
pub const DEFAULT_EXTENSION: &str = "html";

/// Trait for reading raw template source from a backing store.
///
/// Implementations must be shareable across threads: a single store serves
/// every concurrent render.
pub trait TemplateLoader: Send + Sync {
    /// Read the source of the template called `name`.
    ///
    /// The name is used verbatim; implementations decide how it maps to a
    /// location in their store.
    fn read(&self, name: &str) -> io::Result<String>;
}

/// Loader that reads `<root>/<name>.<extension>` from the filesystem.
#[derive(Debug, Clone)]
pub struct FileSystemLoader {
    root: PathBuf,
    extension: String,
}

impl FileSystemLoader {
    /// Create a loader rooted at `root` using the `.html` extension.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Use a different file extension. An empty extension means template
    /// names are file names.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The path a template name resolves to.
    ///
    /// ```ignore
    /// // root: templates, extension: html
    /// // "index"     -> templates/index.html
    /// // "tx/detail" -> templates/tx/detail.html
    /// ```
    pub fn template_path(&self, name: &str) -> PathBuf {
        if self.extension.is_empty() {
            self.root.join(name)
        } else {
            self.root.join(format!("{name}.{}", self.extension))
        }
    }
}

impl TemplateLoader for FileSystemLoader {
    fn read(&self, name: &str) -> io::Result<String> {
        std::fs::read_to_string(self.template_path(name))
    }
}

/// Loader backed by an in-memory map.
///
/// Useful for testing and for templates bundled into the application.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    templates: HashMap<String, String>,
}

impl MemoryLoader {
    /// Create a new empty memory loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template to the loader.
    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.templates.insert(name.into(), source.into());
        self
    }

    /// Create a loader with the given templates.
    pub fn with_templates(
        templates: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        let mut loader = Self::new();
        for (name, source) in templates {
            loader.add(name, source);
        }
        loader
    }
}

impl TemplateLoader for MemoryLoader {
    fn read(&self, name: &str) -> io::Result<String> {
        self.templates.get(name).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no template named '{name}'"))
        })
    }
}

/// Cache of template sources keyed by name.
///
/// Entries are inserted on first successful load and never evicted or
/// replaced. Reads take a shared lock; the backing read happens outside any
/// lock, so two threads loading the same new name may both hit the loader,
/// and the first insert wins.
pub struct TemplateStore {
    loader: Box<dyn TemplateLoader>,
    cache: RwLock<HashMap<String, Arc<str>>>,
}

impl TemplateStore {
    /// Create an empty store over the given loader.
    pub fn new(loader: impl TemplateLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Load a template by name, reading the backing store on a cache miss.
    ///
    /// # Errors
    /// [`TemplateError::TemplateNotFound`] if the backing read fails. Failures
    /// are not cached; a later call reads again.
    pub fn load(&self, name: &str) -> TemplateResult<Arc<str>> {
        if let Some(source) = self.cached(name) {
            debug!(template = name, "template cache hit");
            return Ok(source);
        }

        debug!(template = name, "loading template");
        let source: Arc<str> = self
            .loader
            .read(name)
            .map_err(|source| TemplateError::TemplateNotFound {
                name: name.to_string(),
                source,
            })?
            .into();

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(name.to_string()).or_insert(source)))
    }

    /// The cached source for `name`, without touching the backing store.
    pub fn cached(&self, name: &str) -> Option<Arc<str>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cached(name).is_some()
    }

    /// Number of cached templates.
    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateStore")
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}
