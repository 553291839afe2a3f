//! Engine configuration: name normalizer, name validator and version tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Maps a name's raw spelling to its canonical spelling. Must be pure.
pub type Normalizer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Accepts or rejects a normalized name. Must be pure.
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

pub const DEFAULT_VERSION: &str = "default";

/// Built-in normalizers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameCase {
    #[default]
    Preserve,
    Upper,
    Lower,
}

impl NameCase {
    pub fn apply(self, name: &str) -> String {
        match self {
            NameCase::Preserve => name.to_string(),
            NameCase::Upper => name.to_uppercase(),
            NameCase::Lower => name.to_lowercase(),
        }
    }
}

#[derive(Clone)]
pub struct EngineConfig {
    pub normalizer: Normalizer,
    pub validator: Validator,
    /// Persisted documents must carry this tag to be loaded.
    pub version: String,
}

impl EngineConfig {
    pub fn new(version: impl Into<String>) -> Self {
        EngineConfig {
            version: version.into(),
            ..EngineConfig::default()
        }
    }

    pub fn with_normalizer<F>(mut self, normalizer: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.normalizer = Arc::new(normalizer);
        self
    }

    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validator = Arc::new(validator);
        self
    }

    pub fn with_name_case(self, case: NameCase) -> Self {
        self.with_normalizer(move |name| case.apply(name))
    }

    pub fn normalize(&self, name: &str) -> String {
        (self.normalizer)(name)
    }

    pub fn is_valid(&self, name: &str) -> bool {
        (self.validator)(name)
    }
}

impl Default for EngineConfig {
    /// Identity normalizer, accept-everything validator, version `"default"`.
    fn default() -> Self {
        EngineConfig {
            normalizer: Arc::new(|name: &str| name.to_string()),
            validator: Arc::new(|_: &str| true),
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
