//! Settings snapshot: lenient normalization and per-key merge
//!
//! The settings store lives on the JS side of the boundary; this module owns
//! the cached snapshot the engine evaluates against. Stored values are
//! untrusted (the popup or an old profile may have written anything), so every
//! field is normalized with a per-field type check instead of a strict
//! deserialize: a wrong-typed field falls back to its default, never fails.
//!
//! Merge semantics: storage change events carry `{key: {newValue}}` pairs for
//! changed keys only. Only those keys overwrite the cached snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Built-in fallback pair used when no usable `names` list is stored.
pub const DEFAULT_NAMES: [&str; 2] = ["Sam Altman", "Elon Musk"];

// =============================================================================
// SiteMode
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteMode {
    All,
    Whitelist,
    Blacklist,
}

impl Default for SiteMode {
    fn default() -> Self {
        SiteMode::All
    }
}

impl SiteMode {
    /// Parse a stored mode string. Unknown values fall back to `All`.
    pub fn parse(raw: &str) -> SiteMode {
        match raw {
            "whitelist" => SiteMode::Whitelist,
            "blacklist" => SiteMode::Blacklist,
            _ => SiteMode::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteMode::All => "all",
            SiteMode::Whitelist => "whitelist",
            SiteMode::Blacklist => "blacklist",
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Cached settings snapshot, read-only for the evaluation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub names: Vec<String>,
    pub whitelist: Vec<String>,
    pub blacklist: Vec<String>,
    pub site_mode: SiteMode,
    pub ui_collapsed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            names: DEFAULT_NAMES.iter().map(|n| n.to_string()).collect(),
            whitelist: Vec::new(),
            blacklist: Vec::new(),
            site_mode: SiteMode::All,
            ui_collapsed: false,
        }
    }
}

impl Settings {
    /// Normalize a full stored record into a snapshot.
    ///
    /// An absent or empty `names` list falls back to [`DEFAULT_NAMES`]; this
    /// fallback applies only at load time. Later merges may legitimately
    /// leave the list empty, which disables matching until names return.
    pub fn from_value(stored: &Value) -> Settings {
        let mut settings = Settings::default();
        if let Some(map) = stored.as_object() {
            for (key, value) in map {
                settings.apply_key(key, value);
            }
            if settings.names.is_empty() {
                settings.names = DEFAULT_NAMES.iter().map(|n| n.to_string()).collect();
            }
        }
        settings
    }

    /// Overwrite a single key from a stored value. Unknown keys are ignored;
    /// wrong-typed values reset the field to its default.
    pub fn apply_key(&mut self, key: &str, value: &Value) {
        match key {
            "names" => self.names = coerce_string_list(value),
            "whitelist" => self.whitelist = coerce_string_list(value),
            "blacklist" => self.blacklist = coerce_string_list(value),
            "siteMode" => {
                self.site_mode = value
                    .as_str()
                    .map(SiteMode::parse)
                    .unwrap_or(SiteMode::All);
            }
            "uiCollapsed" => self.ui_collapsed = value.as_bool().unwrap_or(false),
            _ => {}
        }
    }

    /// Merge a `{key: {newValue}}` change record into the snapshot.
    /// Keys without a `newValue` field (removals) reset to the field default.
    pub fn merge_changes(&mut self, changes: &Value) {
        let Some(map) = changes.as_object() else {
            return;
        };
        for (key, change) in map {
            let new_value = change.get("newValue").unwrap_or(&Value::Null);
            self.apply_key(key, new_value);
        }
    }
}

fn coerce_string_list(value: &Value) -> Vec<String> {
    match value.as_array() {
        Some(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|s| s.to_string())
            .collect(),
        None => Vec::new(),
    }
}

// =============================================================================
// SettingsPatch
// =============================================================================

/// Partial settings record handed to the persist callback. Serializes to the
/// same camelCase wire shape the store uses, omitting untouched keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacklist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_mode: Option<SiteMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_collapsed: Option<bool>,
}

impl SettingsPatch {
    pub fn collapsed(flag: bool) -> Self {
        Self {
            ui_collapsed: Some(flag),
            ..Default::default()
        }
    }
}
