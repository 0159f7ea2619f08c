//! ConfigMap document schema.
//!
//! The mounted file is a flat YAML mapping. Only `message` and `level`
//! are interpreted; anything else is carried along so change detection
//! sees it.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Parsed contents of the mounted ConfigMap file.
///
/// Immutable once constructed. Equality is structural, so two documents
/// with the same keys compare equal regardless of key order in the file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ConfigMap {
    /// Greeting template; every `%s` is replaced with the caller's name.
    pub message: String,

    /// Logging severity name ("trace" through "error", any case).
    pub level: Option<String>,

    /// Keys this service does not interpret, preserved but unused.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}
