//! In-memory `AbiLookup` implementation.
//!
//! Two structures behind one lock: an append-only list of everything ever
//! registered, and a selector index where the latest registration wins.
//! Thread-safe via `Arc<RwLock<Inner>>`; clones share state.

use abidecode_core::{
    abi::{AbiEntry, AbiItem, AbiLookup},
    error::RegistryError,
    signature::normalize_selector,
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::{debug, info};

use crate::json;

#[derive(Debug, Default)]
struct Inner {
    /// Every registration in order, duplicates included
    entries: Vec<Arc<AbiEntry>>,
    /// Selector (4-byte function/error selector or 32-byte event topic) → entry
    by_selector: HashMap<String, Arc<AbiEntry>>,
}

impl Inner {
    fn push(&mut self, entry: Arc<AbiEntry>) {
        if let Some(selector) = entry.selector() {
            if let Some(prev) = self.by_selector.insert(selector.to_string(), entry.clone()) {
                debug!(selector, previous = prev.name(), "selector re-registered");
            }
        }
        self.entries.push(entry);
    }
}

/// Thread-safe in-memory ABI definition registry.
#[derive(Debug, Clone, Default)]
pub struct AbiRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl AbiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Writers only ever push whole, validated entries; a poisoned lock
    // still guards consistent state.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register validated entries. Readers see either none or all of them.
    /// Returns the number of entries added.
    pub fn add<I>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = AbiEntry>,
    {
        let entries: Vec<Arc<AbiEntry>> = entries.into_iter().map(Arc::new).collect();
        let count = entries.len();
        let mut inner = self.write();
        for entry in entries {
            inner.push(entry);
        }
        count
    }

    /// Validate raw items and register them. Nothing is registered if any
    /// item is invalid.
    pub fn add_items(&self, items: Vec<AbiItem>) -> Result<usize, RegistryError> {
        Ok(self.add(json::into_entries(items)?))
    }

    /// Register every item in a JSON ABI document (bare array or artifact
    /// object). Nothing is registered if any item is invalid.
    pub fn add_json(&self, json: &str) -> Result<usize, RegistryError> {
        Ok(self.add(json::parse_entries(json)?))
    }

    /// Load a single `.json` ABI file. Returns the count of entries added.
    pub fn load_file(&self, path: &Path) -> Result<usize, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        let count = self.add_json(&content)?;
        debug!(path = %path.display(), count, "loaded ABI file");
        Ok(count)
    }

    /// Load all `.json` files under `dir` recursively, in path order.
    ///
    /// Every file is parsed before any is registered. Returns the total
    /// number of entries added.
    pub fn load_directory(&self, dir: &Path) -> Result<usize, RegistryError> {
        let mut files = walkdir_json(dir)?;
        files.sort();

        let mut entries = Vec::new();
        for path in &files {
            let content = std::fs::read_to_string(path)?;
            entries.extend(json::parse_entries(&content)?);
        }
        let count = self.add(entries);
        info!(dir = %dir.display(), files = files.len(), count, "loaded ABI directory");
        Ok(count)
    }

    /// Every registered entry in insertion order, duplicates included.
    pub fn all(&self) -> Vec<Arc<AbiEntry>> {
        self.read().entries.clone()
    }

    /// Latest entry registered under `selector` (case-insensitive, `0x`
    /// optional).
    pub fn find_by_selector(&self, selector: &str) -> Option<Arc<AbiEntry>> {
        self.read()
            .by_selector
            .get(&normalize_selector(selector))
            .cloned()
    }

    /// Drop every registration.
    pub fn clear(&self) {
        let mut inner = self.write();
        inner.entries.clear();
        inner.by_selector.clear();
    }

    /// Total registrations, duplicates included.
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The selector index, sorted by selector.
    pub fn selectors(&self) -> Vec<(String, Arc<AbiEntry>)> {
        let mut pairs: Vec<(String, Arc<AbiEntry>)> = self
            .read()
            .by_selector
            .iter()
            .map(|(s, e)| (s.clone(), e.clone()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }

    /// Registered events in insertion order.
    pub fn events(&self) -> Vec<Arc<AbiEntry>> {
        self.read()
            .entries
            .iter()
            .filter(|e| e.is_event())
            .cloned()
            .collect()
    }
}

impl AbiLookup for AbiRegistry {
    fn find_by_selector(&self, selector: &str) -> Option<Arc<AbiEntry>> {
        AbiRegistry::find_by_selector(self, selector)
    }

    fn all(&self) -> Vec<Arc<AbiEntry>> {
        AbiRegistry::all(self)
    }
}

/// Collect all `.json` files under `dir` recursively.
fn walkdir_json(dir: &Path) -> Result<Vec<PathBuf>, RegistryError> {
    if !dir.is_dir() {
        return Err(RegistryError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(walkdir_json(&path)?);
        } else if path.extension().is_some_and(|e| e == "json") {
            files.push(path);
        }
    }
    Ok(files)
}
