//! Persisted user settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use super::AppError;

pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Text-generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Anthropic,
    Openai,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Openai => "openai",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "claude-sonnet-4-5",
            ProviderKind::Openai => "gpt-4o-mini",
        }
    }

    pub fn default_api_url(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "https://api.anthropic.com/v1/messages",
            ProviderKind::Openai => "https://api.openai.com/v1/chat/completions",
        }
    }

    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => ANTHROPIC_API_KEY_ENV,
            ProviderKind::Openai => OPENAI_API_KEY_ENV,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" => Ok(ProviderKind::Anthropic),
            "openai" => Ok(ProviderKind::Openai),
            other => Err(AppError::config_error(format!(
                "Unknown provider '{}': expected anthropic or openai",
                other
            ))),
        }
    }
}

/// How `gh pr merge` combines the branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    #[default]
    Squash,
    Merge,
    Rebase,
}

impl MergeStrategy {
    pub fn flag(&self) -> &'static str {
        match self {
            MergeStrategy::Squash => "--squash",
            MergeStrategy::Merge => "--merge",
            MergeStrategy::Rebase => "--rebase",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag().trim_start_matches("--"))
    }
}

impl FromStr for MergeStrategy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "squash" => Ok(MergeStrategy::Squash),
            "merge" => Ok(MergeStrategy::Merge),
            "rebase" => Ok(MergeStrategy::Rebase),
            other => Err(AppError::config_error(format!(
                "Unknown merge strategy '{}': expected squash, merge or rebase",
                other
            ))),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_diff_chars() -> usize {
    40_000
}

/// Settings stored in `config.toml`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub merge_strategy: MergeStrategy,
    #[serde(default = "default_true")]
    pub delete_branch: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_diff_chars")]
    pub max_diff_chars: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: None,
            api_url: None,
            anthropic_api_key: None,
            openai_api_key: None,
            merge_strategy: MergeStrategy::default(),
            delete_branch: default_true(),
            timeout_secs: default_timeout_secs(),
            max_diff_chars: default_max_diff_chars(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("anthropic_api_key", &self.anthropic_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("merge_strategy", &self.merge_strategy)
            .field("delete_branch", &self.delete_branch)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_diff_chars", &self.max_diff_chars)
            .finish()
    }
}

impl Settings {
    pub fn parse_toml(content: &str) -> Result<Settings, AppError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String, AppError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::config_error("timeout_secs must be greater than zero"));
        }
        if self.max_diff_chars < 1_000 {
            return Err(AppError::config_error("max_diff_chars must be at least 1000"));
        }
        Ok(())
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(self.provider.default_model())
    }

    /// Stored key for the selected provider.
    pub fn stored_api_key(&self) -> Option<&str> {
        let key = match self.provider {
            ProviderKind::Anthropic => self.anthropic_api_key.as_deref(),
            ProviderKind::Openai => self.openai_api_key.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
    }

    /// Environment key when set, otherwise the stored one.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.stored_api_key().map(str::to_string))
    }

    pub fn set_api_key(&mut self, provider: ProviderKind, key: String) {
        match provider {
            ProviderKind::Anthropic => self.anthropic_api_key = Some(key),
            ProviderKind::Openai => self.openai_api_key = Some(key),
        }
    }

    /// Assign one field from its textual form, as used by `config set`.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        match key {
            "provider" => self.provider = value.parse()?,
            "model" => self.model = non_empty(value),
            "api_url" => {
                self.api_url = match non_empty(value) {
                    Some(raw) => Some(Url::parse(&raw).map_err(|e| AppError::ParseError {
                        what: "api_url".into(),
                        details: e.to_string(),
                    })?),
                    None => None,
                }
            }
            "merge_strategy" => self.merge_strategy = value.parse()?,
            "delete_branch" => self.delete_branch = parse_value(key, value)?,
            "timeout_secs" => self.timeout_secs = parse_value(key, value)?,
            "max_diff_chars" => self.max_diff_chars = parse_value(key, value)?,
            "anthropic_api_key" | "openai_api_key" => {
                return Err(AppError::config_error(
                    "API keys are set with `gitship config set-key`",
                ));
            }
            other => return Err(AppError::config_error(format!("Unknown setting '{}'", other))),
        }
        self.validate()
    }

    /// Human-readable listing with keys redacted.
    pub fn describe(&self) -> Vec<(String, String)> {
        let redact = |key: &Option<String>| match key {
            Some(k) if !k.is_empty() => "[set]".to_string(),
            _ => "[not set]".to_string(),
        };
        vec![
            ("provider".into(), self.provider.as_str().into()),
            ("model".into(), self.model().into()),
            (
                "api_url".into(),
                self.api_url
                    .as_ref()
                    .map(Url::to_string)
                    .unwrap_or_else(|| self.provider.default_api_url().to_string()),
            ),
            ("anthropic_api_key".into(), redact(&self.anthropic_api_key)),
            ("openai_api_key".into(), redact(&self.openai_api_key)),
            ("merge_strategy".into(), self.merge_strategy.to_string()),
            ("delete_branch".into(), self.delete_branch.to_string()),
            ("timeout_secs".into(), self.timeout_secs.to_string()),
            ("max_diff_chars".into(), self.max_diff_chars.to_string()),
        ]
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, AppError>
where
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| AppError::ParseError { what: key.to_string(), details: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let settings = Settings::parse_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.merge_strategy, MergeStrategy::Squash);
        assert!(settings.delete_branch);
    }

    #[test]
    fn parses_all_fields() {
        let settings = Settings::parse_toml(
            r#"
provider = "openai"
model = "gpt-4.1"
api_url = "http://localhost:9999/v1/chat/completions"
openai_api_key = "sk-test"
merge_strategy = "rebase"
delete_branch = false
timeout_secs = 5
max_diff_chars = 2000
"#,
        )
        .unwrap();
        assert_eq!(settings.provider, ProviderKind::Openai);
        assert_eq!(settings.model(), "gpt-4.1");
        assert_eq!(settings.stored_api_key(), Some("sk-test"));
        assert_eq!(settings.merge_strategy.flag(), "--rebase");
        assert!(!settings.delete_branch);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Settings::parse_toml("colour = \"blue\"").is_err());
    }

    #[test]
    fn zero_timeout_is_invalid() {
        assert!(Settings::parse_toml("timeout_secs = 0").is_err());
    }

    #[test]
    fn environment_key_wins_over_stored_key() {
        let mut settings = Settings::default();
        settings.set_api_key(ProviderKind::Anthropic, "stored".into());
        assert_eq!(settings.resolve_api_key(Some("env".into())), Some("env".into()));
        assert_eq!(settings.resolve_api_key(Some(" ".into())), Some("stored".into()));
        assert_eq!(settings.resolve_api_key(None), Some("stored".into()));
    }

    #[test]
    fn set_field_validates_values() {
        let mut settings = Settings::default();
        settings.set_field("merge_strategy", "merge").unwrap();
        settings.set_field("timeout_secs", "15").unwrap();
        assert_eq!(settings.merge_strategy, MergeStrategy::Merge);
        assert_eq!(settings.timeout_secs, 15);
        assert!(settings.set_field("timeout_secs", "soon").is_err());
        assert!(settings.set_field("openai_api_key", "x").is_err());
        assert!(settings.set_field("nope", "x").is_err());
    }

    #[test]
    fn debug_output_redacts_keys() {
        let mut settings = Settings::default();
        settings.set_api_key(ProviderKind::Openai, "sk-secret".into());
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let mut settings = Settings::default();
        settings.set_field("provider", "openai").unwrap();
        let parsed = Settings::parse_toml(&settings.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }
}
