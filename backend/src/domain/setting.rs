//! Key/value site settings.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

/// Maximum length of a setting key.
pub const SETTING_KEY_MAX: usize = 64;

/// Keys the CMS reads with dedicated views.
pub const WELL_KNOWN_KEYS: [&str; 5] = ["contact", "home", "about", "branding", "footer"];

static KEY_RE: OnceLock<Regex> = OnceLock::new();

fn key_regex() -> &'static Regex {
    KEY_RE.get_or_init(|| {
        Regex::new("^[a-z][a-z0-9_-]*$")
            .unwrap_or_else(|error| panic!("setting key regex failed to compile: {error}"))
    })
}

/// Returned when a setting key is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSettingKey;

impl fmt::Display for InvalidSettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "setting key must start with a lowercase letter and contain at most \
             {SETTING_KEY_MAX} lowercase letters, digits, hyphens, or underscores"
        )
    }
}

impl std::error::Error for InvalidSettingKey {}

/// Lowercase setting identifier such as `branding`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SettingKey(String);

impl SettingKey {
    /// Validate and construct a key.
    pub fn new(key: impl AsRef<str>) -> Result<Self, InvalidSettingKey> {
        let key = key.as_ref().trim();
        if key.len() > SETTING_KEY_MAX || !key_regex().is_match(key) {
            return Err(InvalidSettingKey);
        }
        Ok(Self(key.to_owned()))
    }
}

impl AsRef<str> for SettingKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored setting value. The shape of `value` is owned by the CMS views.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    pub key: SettingKey,
    pub value: Value,
    pub updated_at: DateTime<Utc>,
}
