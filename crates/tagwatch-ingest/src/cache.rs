//! # Dataset Cache
//!
//! A loaded inventory is reused across every computation until the caller
//! asks for a reload. There is no file watching and no expiry.

use std::path::{Path, PathBuf};

use tagwatch_core::TagwatchError;

use crate::columns::LoadOptions;
use crate::loader::{load_path, Dataset};

/// One-shot loader with an explicit invalidation point.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    options: LoadOptions,
    cached: Option<Dataset>,
    loads: usize,
}

impl DatasetCache {
    /// Create an empty cache for `path`. Nothing is read until [`get`](Self::get).
    pub fn new(path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: path.into(),
            options,
            cached: None,
            loads: 0,
        }
    }

    /// Source file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Options used for every load.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// The cached dataset, loading it first if needed.
    ///
    /// A failed load leaves the cache empty, so the next call retries.
    pub fn get(&mut self) -> Result<&Dataset, TagwatchError> {
        let dataset = match self.cached.take() {
            Some(dataset) => dataset,
            None => self.load()?,
        };
        Ok(self.cached.insert(dataset))
    }

    /// Drop the cached dataset and load it again.
    ///
    /// On failure the previously cached dataset is kept.
    pub fn reload(&mut self) -> Result<&Dataset, TagwatchError> {
        let dataset = self.load()?;
        Ok(self.cached.insert(dataset))
    }

    /// Take the dataset out of the cache, loading it first if needed.
    pub fn into_dataset(mut self) -> Result<Dataset, TagwatchError> {
        match self.cached.take() {
            Some(dataset) => Ok(dataset),
            None => self.load(),
        }
    }

    /// Forget the cached dataset without reloading.
    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            tracing::debug!(path = %self.path.display(), "dataset cache invalidated");
        }
    }

    /// Whether a dataset is currently cached.
    pub fn is_loaded(&self) -> bool {
        self.cached.is_some()
    }

    /// Number of successful loads performed.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    fn load(&mut self) -> Result<Dataset, TagwatchError> {
        let dataset = load_path(&self.path, &self.options)?;
        self.loads += 1;
        tracing::debug!(path = %self.path.display(), loads = self.loads, "dataset cache filled");
        Ok(dataset)
    }
}
