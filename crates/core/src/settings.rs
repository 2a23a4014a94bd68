//! Scoped key-value settings store.
//!
//! The gateway reads its service settings (feature flag, downstream URL)
//! through the [`ConfigReader`] trait on every request. Values are looked up
//! per [`Scope`]: a store-scoped lookup falls back to the default scope when
//! the store does not define the key.
//!
//! Two implementations are provided:
//! - [`FileSettings`]: a YAML document re-read on every lookup, so edits made
//!   by an administrator apply to the next request without a restart.
//! - [`MemorySettings`]: an in-process map, used for embedding and tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// The store/tenant context a setting is resolved for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Global settings
    #[default]
    Default,

    /// Settings of a single store, identified by its code
    Store(String),
}

impl Scope {
    /// Build a scope from an optional store code.
    ///
    /// A missing or blank code selects the default scope.
    pub fn from_store(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some(code) if !code.is_empty() => Scope::Store(code.to_string()),
            _ => Scope::Default,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Default => write!(f, "default"),
            Scope::Store(code) => write!(f, "store:{}", code),
        }
    }
}

/// A scalar setting value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SettingValue {
    /// Interpret the value as an on/off flag.
    ///
    /// Text values `""`, `"0"`, `"false"`, `"no"` and `"off"` are off
    /// (case-insensitive); any other text is on.
    pub fn as_flag(&self) -> bool {
        match self {
            SettingValue::Bool(b) => *b,
            SettingValue::Int(i) => *i != 0,
            SettingValue::Float(f) => *f != 0.0,
            SettingValue::Text(s) => {
                let s = s.trim().to_ascii_lowercase();
                !matches!(s.as_str(), "" | "0" | "false" | "no" | "off")
            }
        }
    }

    /// Render the value as text.
    pub fn as_text(&self) -> String {
        match self {
            SettingValue::Bool(b) => b.to_string(),
            SettingValue::Int(i) => i.to_string(),
            SettingValue::Float(f) => f.to_string(),
            SettingValue::Text(s) => s.clone(),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

/// Read access to scoped settings.
///
/// Implementations must not cache across calls: every lookup reflects the
/// current state of the backing store.
pub trait ConfigReader: Send + Sync {
    /// Look up `key` for `scope`.
    ///
    /// Returns `Ok(None)` when the key is not set in the scope or in the
    /// default scope it falls back to.
    fn get_value(&self, key: &str, scope: &Scope) -> AppResult<Option<SettingValue>>;
}

type ValueMap = HashMap<String, Option<SettingValue>>;

/// Settings grouped by scope, as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ScopedValues {
    #[serde(default)]
    default: ValueMap,

    #[serde(default)]
    stores: HashMap<String, ValueMap>,
}

impl ScopedValues {
    fn lookup(&self, key: &str, scope: &Scope) -> Option<SettingValue> {
        if let Scope::Store(code) = scope {
            let scoped = self
                .stores
                .get(code)
                .and_then(|values| values.get(key))
                .and_then(Clone::clone);
            if scoped.is_some() {
                return scoped;
            }
        }

        self.default.get(key).and_then(Clone::clone)
    }
}

/// YAML-backed settings store.
///
/// Document layout:
/// ```yaml
/// default:
///   rag_assistant/general/enabled: true
///   rag_assistant/general/rag_service_url: http://localhost:8000
/// stores:
///   french:
///     rag_assistant/general/enabled: false
/// ```
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    /// Create a store backed by the YAML file at `path`.
    ///
    /// The file is not read until the first lookup.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> AppResult<ScopedValues> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            AppError::Settings(format!(
                "Failed to read settings file {:?}: {}",
                self.path, e
            ))
        })?;

        if contents.trim().is_empty() {
            return Ok(ScopedValues::default());
        }

        serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Settings(format!(
                "Failed to parse settings file {:?}: {}",
                self.path, e
            ))
        })
    }
}

impl ConfigReader for FileSettings {
    fn get_value(&self, key: &str, scope: &Scope) -> AppResult<Option<SettingValue>> {
        let values = self.read()?;
        let value = values.lookup(key, scope);
        tracing::trace!(key, %scope, found = value.is_some(), "settings lookup");
        Ok(value)
    }
}

/// In-memory settings store.
///
/// # Example
/// ```
/// use ragassist_core::settings::{ConfigReader, MemorySettings, Scope, SettingValue};
///
/// let settings = MemorySettings::new()
///     .with_default("rag_assistant/general/enabled", true)
///     .with_store("french", "rag_assistant/general/enabled", false);
///
/// let value = settings
///     .get_value("rag_assistant/general/enabled", &Scope::Store("french".into()))
///     .unwrap();
/// assert_eq!(value, Some(SettingValue::Bool(false)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: ScopedValues,
}

impl MemorySettings {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value in the default scope.
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.values.default.insert(key.into(), Some(value.into()));
        self
    }

    /// Set a value for a single store.
    pub fn with_store(
        mut self,
        store: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<SettingValue>,
    ) -> Self {
        self.values
            .stores
            .entry(store.into())
            .or_default()
            .insert(key.into(), Some(value.into()));
        self
    }
}

impl ConfigReader for MemorySettings {
    fn get_value(&self, key: &str, scope: &Scope) -> AppResult<Option<SettingValue>> {
        Ok(self.values.lookup(key, scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENABLED: &str = "rag_assistant/general/enabled";
    const URL: &str = "rag_assistant/general/rag_service_url";

    #[test]
    fn test_scope_from_store() {
        assert_eq!(Scope::from_store(None), Scope::Default);
        assert_eq!(Scope::from_store(Some("   ")), Scope::Default);
        assert_eq!(
            Scope::from_store(Some(" french ")),
            Scope::Store("french".to_string())
        );
    }

    #[test]
    fn test_flag_interpretation() {
        assert!(SettingValue::Bool(true).as_flag());
        assert!(!SettingValue::Bool(false).as_flag());
        assert!(SettingValue::Int(1).as_flag());
        assert!(!SettingValue::Int(0).as_flag());
        assert!(SettingValue::Text("1".into()).as_flag());
        assert!(SettingValue::Text("yes".into()).as_flag());
        for off in ["", "0", "false", "FALSE", " no ", "off"] {
            assert!(!SettingValue::Text(off.into()).as_flag(), "{off:?}");
        }
    }

    #[test]
    fn test_as_text() {
        assert_eq!(SettingValue::Text("http://svc".into()).as_text(), "http://svc");
        assert_eq!(SettingValue::Int(8000).as_text(), "8000");
        assert_eq!(SettingValue::Bool(true).as_text(), "true");
    }

    #[test]
    fn test_memory_store_scope_fallback() {
        let settings = MemorySettings::new()
            .with_default(ENABLED, true)
            .with_default(URL, "http://default.example")
            .with_store("french", ENABLED, false);

        let french = Scope::Store("french".to_string());
        assert_eq!(
            settings.get_value(ENABLED, &french).unwrap(),
            Some(SettingValue::Bool(false))
        );
        assert_eq!(
            settings.get_value(URL, &french).unwrap(),
            Some(SettingValue::Text("http://default.example".into()))
        );
        assert_eq!(
            settings.get_value(ENABLED, &Scope::Default).unwrap(),
            Some(SettingValue::Bool(true))
        );
        assert_eq!(settings.get_value("missing/key", &french).unwrap(), None);
    }

    #[test]
    fn test_file_store_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(
            &path,
            r#"
default:
  rag_assistant/general/enabled: "1"
  rag_assistant/general/rag_service_url: http://localhost:8000/
stores:
  french:
    rag_assistant/general/enabled: 0
    rag_assistant/general/rag_service_url: ~
"#,
        )
        .unwrap();

        let settings = FileSettings::new(&path);
        let french = Scope::Store("french".to_string());

        let enabled = settings.get_value(ENABLED, &Scope::Default).unwrap().unwrap();
        assert!(enabled.as_flag());

        let enabled = settings.get_value(ENABLED, &french).unwrap().unwrap();
        assert!(!enabled.as_flag());

        // A null store value falls back to the default scope.
        let url = settings.get_value(URL, &french).unwrap().unwrap();
        assert_eq!(url.as_text(), "http://localhost:8000/");
    }

    #[test]
    fn test_file_store_is_reread_on_every_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "default:\n  rag_assistant/general/enabled: true\n").unwrap();

        let settings = FileSettings::new(&path);
        let first = settings.get_value(ENABLED, &Scope::Default).unwrap().unwrap();
        assert!(first.as_flag());

        std::fs::write(&path, "default:\n  rag_assistant/general/enabled: false\n").unwrap();
        let second = settings.get_value(ENABLED, &Scope::Default).unwrap().unwrap();
        assert!(!second.as_flag());
    }

    #[test]
    fn test_file_store_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "").unwrap();

        let settings = FileSettings::new(&path);
        assert_eq!(settings.get_value(ENABLED, &Scope::Default).unwrap(), None);
    }

    #[test]
    fn test_file_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = FileSettings::new(dir.path().join("absent.yaml"));

        let err = settings.get_value(ENABLED, &Scope::Default).unwrap_err();
        assert!(matches!(err, AppError::Settings(_)));
        assert!(err.to_string().contains("Failed to read settings file"));
    }

    #[test]
    fn test_file_store_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "default: [1, 2").unwrap();

        let err = FileSettings::new(&path)
            .get_value(ENABLED, &Scope::Default)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings file"));
    }
}
