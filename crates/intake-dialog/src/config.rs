//! Dialog configuration loading and validation.

use intake_speech::NameRules;
use intake_types::DialogState;
use serde::Deserialize;
use thiserror::Error;

fn default_max_retries() -> u32 {
    3
}

fn default_voice() -> String {
    "alice".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_service_name() -> String {
    "the county records office".to_string()
}

fn default_consent_window() -> GatherWindow {
    GatherWindow {
        timeout_seconds: 10,
        speech_timeout_seconds: 3,
    }
}

fn default_name_window() -> GatherWindow {
    GatherWindow {
        timeout_seconds: 10,
        speech_timeout_seconds: 3,
    }
}

fn default_date_window() -> GatherWindow {
    GatherWindow {
        timeout_seconds: 15,
        speech_timeout_seconds: 4,
    }
}

fn default_confirm_window() -> GatherWindow {
    GatherWindow {
        timeout_seconds: 10,
        speech_timeout_seconds: 3,
    }
}

/// Wait budget for one gather step, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GatherWindow {
    /// Overall wait for any input.
    pub timeout_seconds: u32,
    /// Silence window that ends a speech capture.
    pub speech_timeout_seconds: u32,
}

/// Tunable policy for the dialog engine.
///
/// All fields default to the values the service ships with, so an empty
/// TOML document is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DialogConfig {
    /// Failed capture attempts allowed per field before the caller is
    /// escalated to a human operator.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Length bounds for spoken names.
    #[serde(default)]
    pub name_rules: NameRules,

    /// Platform voice used for every prompt.
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Language tag used for every prompt.
    #[serde(default = "default_language")]
    pub language: String,

    /// How the service introduces itself and its database in prompts.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Gather window for the consent gate.
    #[serde(default = "default_consent_window")]
    pub consent_window: GatherWindow,

    /// Gather window for the two name-collection steps.
    #[serde(default = "default_name_window")]
    pub name_window: GatherWindow,

    /// Gather window for date collection. Longer than the name window;
    /// spoken dates take a while.
    #[serde(default = "default_date_window")]
    pub date_window: GatherWindow,

    /// Gather window for yes/no confirmation steps.
    #[serde(default = "default_confirm_window")]
    pub confirm_window: GatherWindow,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            name_rules: NameRules::default(),
            voice: default_voice(),
            language: default_language(),
            service_name: default_service_name(),
            consent_window: default_consent_window(),
            name_window: default_name_window(),
            date_window: default_date_window(),
            confirm_window: default_confirm_window(),
        }
    }
}

/// Error raised while loading or validating a [`DialogConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

impl DialogConfig {
    /// Parses a configuration from a TOML document and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::Invalid` for values the engine cannot run with.
    pub fn from_toml(document: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values that would wedge the dialog.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retries == 0 {
            return Err(ConfigError::Invalid(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if self.name_rules.min_len == 0 || self.name_rules.min_len > self.name_rules.max_len {
            return Err(ConfigError::Invalid(format!(
                "name_rules bounds are inverted or zero: min {} max {}",
                self.name_rules.min_len, self.name_rules.max_len
            )));
        }
        for (label, window) in [
            ("consent_window", self.consent_window),
            ("name_window", self.name_window),
            ("date_window", self.date_window),
            ("confirm_window", self.confirm_window),
        ] {
            if window.timeout_seconds == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{label}.timeout_seconds must be at least 1"
                )));
            }
        }
        Ok(())
    }

    /// Returns the gather window used when input is collected *for* the
    /// given state.
    pub fn window_for(&self, state: DialogState) -> GatherWindow {
        match state {
            DialogState::AwaitingConsent => self.consent_window,
            DialogState::CollectingFirstName | DialogState::CollectingLastName => self.name_window,
            DialogState::CollectingDate => self.date_window,
            _ => self.confirm_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = DialogConfig::from_toml("").expect("empty config is valid");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.name_rules.min_len, 2);
        assert_eq!(config.name_rules.max_len, 50);
        assert_eq!(config.voice, "alice");
        assert_eq!(config.language, "en-US");
        assert_eq!(config.date_window.timeout_seconds, 15);
        assert_eq!(config.date_window.speech_timeout_seconds, 4);
    }

    #[test]
    fn partial_document_overrides_some_fields() {
        let config = DialogConfig::from_toml(
            r#"
max_retries = 2
service_name = "the Riverside County custody database"

[name_rules]
min_len = 3

[date_window]
timeout_seconds = 20
speech_timeout_seconds = 5
"#,
        )
        .expect("valid config");

        assert_eq!(config.max_retries, 2);
        assert_eq!(config.name_rules.min_len, 3);
        assert_eq!(config.name_rules.max_len, 50);
        assert_eq!(config.date_window.timeout_seconds, 20);
        // Untouched sections keep their defaults.
        assert_eq!(config.consent_window.timeout_seconds, 10);
        assert!(config.service_name.contains("Riverside"));
    }

    #[test]
    fn zero_max_retries_is_rejected() {
        let err = DialogConfig::from_toml("max_retries = 0").unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn inverted_name_bounds_are_rejected() {
        let err = DialogConfig::from_toml(
            r#"
[name_rules]
min_len = 10
max_len = 4
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("name_rules"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = DialogConfig::from_toml(
            r#"
[confirm_window]
timeout_seconds = 0
speech_timeout_seconds = 3
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("confirm_window"));
    }

    #[test]
    fn window_for_maps_states_to_groups() {
        let config = DialogConfig::default();
        assert_eq!(
            config.window_for(DialogState::CollectingDate).timeout_seconds,
            15
        );
        assert_eq!(
            config
                .window_for(DialogState::CollectingLastName)
                .timeout_seconds,
            10
        );
        assert_eq!(
            config.window_for(DialogState::ConfirmingAll).timeout_seconds,
            10
        );
    }
}
