//! Extractor registration and lookup.
//!
//! The registry maps normalized content types to extractors. It is built once at
//! startup, owned by the pipeline and read-only afterwards, so lookups need no locking.

use crate::core::mime::normalize_content_type;
use crate::plugins::FormatExtractor;
use crate::{DocnormError, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

fn validate_plugin_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DocnormError::config("plugin name cannot be empty"));
    }

    if name.contains(char::is_whitespace) {
        return Err(DocnormError::config(format!(
            "plugin name '{}' cannot contain whitespace",
            name
        )));
    }

    Ok(())
}

/// Content-type keyed registry of format extractors.
///
/// Several extractors may claim the same content type; the one with the highest
/// priority wins. Registering a second extractor at the same priority replaces the
/// first for that content type; an extractor displaced from all of its content types
/// is unregistered and shut down.
pub struct FormatExtractorRegistry {
    extractors: HashMap<String, BTreeMap<i32, Arc<dyn FormatExtractor>>>,
    name_index: HashMap<String, Vec<(String, i32)>>,
}

impl FormatExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            name_index: HashMap::new(),
        }
    }

    /// Register an extractor for every content type it supports.
    ///
    /// The extractor is initialized before it becomes visible to lookups.
    pub fn register(&mut self, extractor: Arc<dyn FormatExtractor>) -> Result<()> {
        let name = extractor.name().to_string();
        let priority = extractor.priority();

        validate_plugin_name(&name)?;

        let content_types: Vec<String> = extractor
            .supported_content_types()
            .iter()
            .map(|content_type| normalize_content_type(content_type))
            .collect();

        if content_types.iter().any(String::is_empty) {
            return Err(DocnormError::config(format!(
                "extractor '{}' declares an empty content type",
                name
            )));
        }

        extractor.initialize()?;

        if self.name_index.contains_key(&name) {
            self.remove(&name)?;
        }

        let mut index_entries = Vec::with_capacity(content_types.len());
        let mut displaced = Vec::new();
        for content_type in content_types {
            let previous = self
                .extractors
                .entry(content_type.clone())
                .or_default()
                .insert(priority, Arc::clone(&extractor));
            if let Some(previous) = previous {
                displaced.push((previous, content_type.clone()));
            }
            index_entries.push((content_type, priority));
        }

        tracing::debug!(extractor = %name, priority, "registered format extractor");
        self.name_index.insert(name, index_entries);

        for (previous, content_type) in displaced {
            self.forget_slot(previous, &content_type, priority)?;
        }

        Ok(())
    }

    /// Drop the index entry of an extractor displaced from one content type slot.
    ///
    /// An extractor left with no slots is unregistered and shut down.
    fn forget_slot(&mut self, previous: Arc<dyn FormatExtractor>, content_type: &str, priority: i32) -> Result<()> {
        let previous_name = previous.name().to_string();
        let Some(entries) = self.name_index.get_mut(&previous_name) else {
            return Ok(());
        };
        entries.retain(|(entry_type, entry_priority)| !(entry_type == content_type && *entry_priority == priority));
        if !entries.is_empty() {
            return Ok(());
        }

        self.name_index.remove(&previous_name);
        tracing::debug!(extractor = %previous_name, "format extractor displaced at equal priority");
        previous.shutdown()
    }

    /// Resolve the extractor for a declared content type.
    ///
    /// # Errors
    ///
    /// `UnsupportedType` carrying the content type exactly as declared.
    pub fn get(&self, content_type: &str) -> Result<Arc<dyn FormatExtractor>> {
        self.extractors
            .get(&normalize_content_type(content_type))
            .and_then(|priority_map| priority_map.values().next_back())
            .cloned()
            .ok_or_else(|| DocnormError::UnsupportedType(content_type.to_string()))
    }

    /// Registered extractor names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.name_index.keys().cloned().collect();
        names.sort();
        names
    }

    /// Content types with at least one extractor, sorted.
    pub fn content_types(&self) -> Vec<String> {
        let mut content_types: Vec<String> = self.extractors.keys().cloned().collect();
        content_types.sort();
        content_types
    }

    /// Unregister an extractor by name and shut it down.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let Some(index_entries) = self.name_index.remove(name) else {
            return Ok(());
        };

        let mut extractor_to_shutdown: Option<Arc<dyn FormatExtractor>> = None;

        for (content_type, priority) in index_entries {
            if let Some(priority_map) = self.extractors.get_mut(&content_type) {
                if let Some(extractor) = priority_map.remove(&priority)
                    && extractor_to_shutdown.is_none()
                {
                    extractor_to_shutdown = Some(extractor);
                }

                if priority_map.is_empty() {
                    self.extractors.remove(&content_type);
                }
            }
        }

        if let Some(extractor) = extractor_to_shutdown {
            extractor.shutdown()?;
        }

        Ok(())
    }

    /// Shut down every registered extractor, keeping the registrations.
    ///
    /// Used on process exit, when the registry is shared and can no longer be mutated.
    /// All extractors are attempted; the first error is returned.
    pub fn shutdown_all(&self) -> Result<()> {
        let mut first_error = None;

        for name in self.list() {
            let Some(extractor) = self.find_by_name(&name) else {
                continue;
            };
            if let Err(e) = extractor.shutdown() {
                tracing::warn!(extractor = %name, error = %e, "extractor shutdown failed");
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    fn find_by_name(&self, name: &str) -> Option<Arc<dyn FormatExtractor>> {
        let (content_type, priority) = self.name_index.get(name)?.first()?;
        self.extractors.get(content_type)?.get(priority).cloned()
    }
}

impl Default for FormatExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
