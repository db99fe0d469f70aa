//! Completion provider settings.

use std::fmt;

use tracing::debug;

/// Environment variable holding the provider credential.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable selecting the model identifier.
pub const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL";
/// Environment variable overriding the provider base URL.
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
/// Environment variable holding the sampling temperature.
pub const AI_TEMPERATURE_ENV: &str = "AI_TEMPERATURE";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Temperature used when none is configured or the value cannot be parsed.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Provider endpoint used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/";
/// Fixed completion length budget sent with every request.
pub const MAX_OUTPUT_TOKENS: u32 = 1500;

/// Settings the completion gateway reads on every call.
#[derive(Clone, PartialEq)]
pub struct ProviderSettings {
    api_key: Option<String>,
    model: String,
    temperature: f32,
    base_url: String,
}

impl ProviderSettings {
    /// Creates settings for the supplied model with no credential.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Builds settings from an arbitrary key lookup.
    ///
    /// Blank credentials are treated as missing. The temperature falls back to
    /// [`DEFAULT_TEMPERATURE`] when absent, unparsable, or not finite.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let model = lookup(OPENAI_MODEL_ENV)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_owned());

        let mut settings = Self::new(model);
        settings.api_key = lookup(OPENAI_API_KEY_ENV).filter(|value| !value.trim().is_empty());
        settings.temperature = parse_temperature(lookup(AI_TEMPERATURE_ENV).as_deref());
        if let Some(base_url) = lookup(OPENAI_BASE_URL_ENV).filter(|value| !value.trim().is_empty())
        {
            settings.base_url = base_url;
        }
        settings
    }

    /// Builds settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(crate::env_lookup)
    }

    /// Supplies an explicit credential.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Overrides the provider base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the credential, if one is configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns the model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the sampling temperature.
    #[must_use]
    pub const fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Returns the provider base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the fixed output token budget.
    #[must_use]
    pub const fn max_output_tokens(&self) -> u32 {
        MAX_OUTPUT_TOKENS
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key_configured", &self.api_key.is_some())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Source of provider settings, consulted once per completion call.
pub trait SettingsSource: Send + Sync {
    /// Returns the settings to use for the next call.
    fn provider_settings(&self) -> ProviderSettings;
}

impl SettingsSource for ProviderSettings {
    fn provider_settings(&self) -> ProviderSettings {
        self.clone()
    }
}

/// Reads provider settings from the process environment on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvSettings;

impl SettingsSource for EnvSettings {
    fn provider_settings(&self) -> ProviderSettings {
        let settings = ProviderSettings::from_env();
        debug!(?settings, "loaded provider settings from environment");
        settings
    }
}

fn parse_temperature(raw: Option<&str>) -> f32 {
    raw.and_then(|value| value.trim().parse::<f32>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(DEFAULT_TEMPERATURE)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = ProviderSettings::from_lookup(lookup(&[]));
        assert_eq!(settings.api_key(), None);
        assert_eq!(settings.model(), DEFAULT_MODEL);
        assert!((settings.temperature() - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert_eq!(settings.base_url(), DEFAULT_BASE_URL);
        assert_eq!(settings.max_output_tokens(), 1500);
    }

    #[test]
    fn reads_all_values() {
        let settings = ProviderSettings::from_lookup(lookup(&[
            (OPENAI_API_KEY_ENV, "sk-test"),
            (OPENAI_MODEL_ENV, "gpt-4o-mini"),
            (AI_TEMPERATURE_ENV, "0.2"),
            (OPENAI_BASE_URL_ENV, "http://127.0.0.1:9000/"),
        ]));
        assert_eq!(settings.api_key(), Some("sk-test"));
        assert_eq!(settings.model(), "gpt-4o-mini");
        assert!((settings.temperature() - 0.2).abs() < f32::EPSILON);
        assert_eq!(settings.base_url(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn unparsable_temperature_falls_back() {
        assert!((parse_temperature(Some("warm")) - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert!((parse_temperature(Some("NaN")) - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert!((parse_temperature(Some(" 1.1 ")) - 1.1).abs() < f32::EPSILON);
        assert!(parse_temperature(Some("0")).abs() < f32::EPSILON);
    }

    #[test]
    fn blank_credential_is_missing() {
        let settings = ProviderSettings::from_lookup(lookup(&[(OPENAI_API_KEY_ENV, "   ")]));
        assert_eq!(settings.api_key(), None);
    }

    #[test]
    fn debug_redacts_credential() {
        let settings = ProviderSettings::default().with_api_key("sk-secret");
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("api_key_configured: true"));
    }
}
