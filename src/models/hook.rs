//! Session snapshot piped by the host on every statusline tick.
//!
//! Every field is optional. A field with the wrong JSON type decodes as
//! absent instead of failing the whole snapshot, so one bad counter never
//! blanks the entire line.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// camelCase spellings accepted for the host's snake_case keys.
const KEY_ALIASES: &[(&str, &str)] = &[
    ("modelDisplayName", "model_display_name"),
    ("displayName", "display_name"),
    ("contextWindow", "context_window"),
    ("currentUsage", "current_usage"),
    ("inputTokens", "input_tokens"),
    ("cacheCreationInputTokens", "cache_creation_input_tokens"),
    ("cacheReadInputTokens", "cache_read_input_tokens"),
    ("contextWindowSize", "context_window_size"),
    ("totalCostUsd", "total_cost_usd"),
    ("currentDir", "current_dir"),
];

/// Rewrite camelCase keys to snake_case in every object of the tree. When
/// both spellings are present the snake_case value is kept.
fn canonicalize_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (camel, snake) in KEY_ALIASES {
                if let Some(v) = map.remove(*camel) {
                    if map.contains_key(*snake) {
                        debug!(key = *snake, "both key spellings present, keeping snake_case");
                    } else {
                        map.insert((*snake).to_string(), v);
                    }
                }
            }
            map.values_mut().for_each(canonicalize_keys);
        }
        Value::Array(items) => items.iter_mut().for_each(canonicalize_keys),
        _ => {}
    }
}

/// Decode a field into `Some(T)` or fall back to `None` when the value has
/// the wrong shape (string where a number belongs, negative token count, ...).
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// The host sends `{"display_name": ...}`; bare strings are accepted too.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum HookModel {
    Name(String),
    Info {
        #[serde(default, deserialize_with = "lenient")]
        display_name: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        id: Option<String>,
    },
}

impl HookModel {
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name.as_str()),
            Self::Info { display_name, .. } => display_name.as_deref(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CurrentUsage {
    #[serde(default, deserialize_with = "lenient")]
    pub input_tokens: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub cache_creation_input_tokens: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub cache_read_input_tokens: Option<u64>,
}

impl CurrentUsage {
    /// Sum of the counters that are present. Absent counters contribute nothing.
    pub fn total_tokens(&self) -> u64 {
        [
            self.input_tokens,
            self.cache_creation_input_tokens,
            self.cache_read_input_tokens,
        ]
        .into_iter()
        .flatten()
        .fold(0u64, u64::saturating_add)
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct HookContextWindow {
    #[serde(default, deserialize_with = "lenient")]
    pub current_usage: Option<CurrentUsage>,
    #[serde(default, deserialize_with = "lenient")]
    pub context_window_size: Option<u64>,
}

/// Optional cost summary provided by the host
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct HookCost {
    #[serde(default, deserialize_with = "lenient")]
    pub total_cost_usd: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct HookWorkspace {
    #[serde(default, deserialize_with = "lenient")]
    pub current_dir: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    #[serde(default, deserialize_with = "lenient")]
    pub model: Option<HookModel>,
    /// Flat form of `model.display_name`
    #[serde(default, deserialize_with = "lenient")]
    pub model_display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub context_window: Option<HookContextWindow>,
    #[serde(default, deserialize_with = "lenient")]
    pub cost: Option<HookCost>,
    #[serde(default, deserialize_with = "lenient")]
    pub workspace: Option<HookWorkspace>,
    /// Top-level cwd, used when the workspace record lacks `current_dir`
    #[serde(default, deserialize_with = "lenient")]
    pub cwd: Option<String>,
}

impl SessionSnapshot {
    /// Decode stdin bytes. Empty or malformed input yields the all-absent
    /// snapshot, which still renders a complete line.
    pub fn from_slice(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            debug!("empty snapshot on stdin");
            return Self::default();
        }
        let mut value: Value = match serde_json::from_slice(bytes) {
            Ok(value) => value,
            Err(err) => {
                debug!(error = %err, "unparseable snapshot, rendering defaults");
                return Self::default();
            }
        };
        canonicalize_keys(&mut value);
        match serde_json::from_value(value) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                debug!(error = %err, "snapshot has unexpected shape, rendering defaults");
                Self::default()
            }
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model
            .as_ref()
            .and_then(HookModel::display_name)
            .or(self.model_display_name.as_deref())
    }

    pub fn current_dir(&self) -> Option<&str> {
        self.workspace
            .as_ref()
            .and_then(|w| w.current_dir.as_deref())
            .or(self.cwd.as_deref())
            .filter(|d| !d.is_empty())
    }

    pub fn total_cost_usd(&self) -> Option<f64> {
        self.cost
            .as_ref()
            .and_then(|c| c.total_cost_usd)
            .filter(|v| v.is_finite())
    }
}
