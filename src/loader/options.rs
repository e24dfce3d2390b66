//! Loading options.

use crate::normalize::CategoryNormalizer;
use std::fmt;
use std::sync::Arc;

/// Options for loading canonical JSON datasets.
#[derive(Clone, Default)]
pub struct LoadOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Vendor category normalizer applied before validation
    pub normalizer: Option<Arc<dyn CategoryNormalizer>>,
}

impl LoadOptions {
    /// Create new load options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail the whole load on the first schema error.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Exclude malformed documents and keep loading.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Normalize vendor category names before validation.
    pub fn with_normalizer(mut self, normalizer: Arc<dyn CategoryNormalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("error_mode", &self.error_mode)
            .field("normalizer", &self.normalizer.as_ref().map(|n| n.name()))
            .finish()
    }
}

/// Error handling mode during loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any schema error
    Strict,
    /// Reject the offending document and continue
    #[default]
    Lenient,
}
