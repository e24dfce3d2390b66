//! Category normalization for vendor outputs.
//!
//! Parsing products name their layout classes differently. A
//! [`CategoryNormalizer`] maps a vendor-native class name onto one of the
//! twelve canonical [`Category`] values before the loader validates an
//! element, so the rest of the engine only ever sees canonical categories.
//!
//! # Example
//!
//! ```
//! use dpeval::normalize::NormalizerRegistry;
//! use dpeval::model::Category;
//!
//! let registry = NormalizerRegistry::with_defaults();
//! let aws = registry.get("aws").unwrap();
//! assert_eq!(aws.normalize("LAYOUT_SECTION_HEADER"), Some(Category::Heading1));
//! ```

mod vendor;

pub use vendor::{IdentityNormalizer, MappedNormalizer};

use crate::model::Category;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps vendor-native category names to canonical categories.
///
/// Vendors differ only in naming, so a normalizer is a pure function of the
/// raw name. Returning `None` leaves the element to fail schema validation.
pub trait CategoryNormalizer: Send + Sync {
    /// Name of the vendor this normalizer handles (lowercase).
    fn name(&self) -> &str;

    /// Map a raw category name to a canonical category.
    fn normalize(&self, raw: &str) -> Option<Category>;
}

/// Registry of category normalizers, looked up by vendor name.
pub struct NormalizerRegistry {
    by_name: HashMap<String, Arc<dyn CategoryNormalizer>>,
}

impl NormalizerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the identity normalizer and the built-in vendor maps.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(IdentityNormalizer));
        for normalizer in MappedNormalizer::builtin() {
            registry.register(Arc::new(normalizer));
        }
        registry
    }

    /// Register a normalizer under its name, replacing any previous one.
    pub fn register(&mut self, normalizer: Arc<dyn CategoryNormalizer>) {
        self.by_name
            .insert(normalizer.name().to_lowercase(), normalizer);
    }

    /// Get a normalizer by vendor name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<Arc<dyn CategoryNormalizer>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if a vendor is registered.
    pub fn supports(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_lowercase())
    }

    /// Registered vendor names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for NormalizerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_defaults() {
        let registry = NormalizerRegistry::with_defaults();
        assert!(registry.supports("identity"));
        assert!(registry.supports("Microsoft"));
        assert!(registry.supports("unstructured"));
        assert!(!registry.supports("acme"));
    }

    #[test]
    fn test_registry_names_sorted() {
        let registry = NormalizerRegistry::with_defaults();
        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.contains(&"google"));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = NormalizerRegistry::new();
        registry.register(Arc::new(MappedNormalizer::new(
            "acme",
            [("Blob", Category::Figure)],
            None,
        )));
        registry.register(Arc::new(MappedNormalizer::new(
            "acme",
            [("Blob", Category::Chart)],
            None,
        )));

        let acme = registry.get("ACME").unwrap();
        assert_eq!(acme.normalize("Blob"), Some(Category::Chart));
    }
}
