//! Configuration for the bridge and the tutorial.
//!
//! Every field has a default, so an empty YAML document is a valid config:
//!
//! ```yaml
//! voice:
//!   locale: fr-FR
//!   rate: 0.9
//! tutorial:
//!   stage2_goals: [1234, 5678, 9012]
//!   next_goal_delay_ms: 2000
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest value the four rolls can show.
pub const MAX_VALUE: u16 = 9999;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbacusConfig {
    pub voice: VoiceConfig,
    pub tutorial: TutorialConfig,
    pub runtime: RuntimeTarget,
}

impl AbacusConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Checks invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.voice.locale.trim().is_empty() {
            return Err(ConfigError::Invalid("voice.locale must not be empty".into()));
        }
        if self.voice.rate.is_nan() || self.voice.rate <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "voice.rate must be positive, got {}",
                self.voice.rate
            )));
        }
        if self.voice.pitch.is_nan() || self.voice.pitch < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "voice.pitch must not be negative, got {}",
                self.voice.pitch
            )));
        }

        let tutorial = &self.tutorial;
        if tutorial.stage2_goals.is_empty() {
            return Err(ConfigError::Invalid(
                "tutorial.stage2_goals must contain at least one goal".into(),
            ));
        }
        if let Some(goal) = tutorial
            .stage2_goals
            .iter()
            .find(|g| **g == 0 || **g > MAX_VALUE)
        {
            return Err(ConfigError::Invalid(format!(
                "tutorial.stage2_goals: {} is outside 1..={}",
                goal, MAX_VALUE
            )));
        }
        if tutorial.up_clicks_required == 0 || tutorial.down_clicks_required == 0 {
            return Err(ConfigError::Invalid(
                "tutorial click requirements must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Speech synthesis parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
    /// Delay before the synthetic completion fires when no speech engine is present.
    pub fallback_delay_ms: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            locale: "fr-FR".to_string(),
            rate: 0.9,
            pitch: 1.0,
            fallback_delay_ms: 1000,
        }
    }
}

impl VoiceConfig {
    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }
}

/// Tutorial script parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorialConfig {
    /// Goals walked through in stage 2, in order.
    pub stage2_goals: Vec<u16>,
    /// Up-clicks needed in stage 1 before the learner is asked to go down.
    pub up_clicks_required: u32,
    /// Down-clicks needed in stage 1 before validation is accepted.
    pub down_clicks_required: u32,
    /// Pause between the praise and the next random goal in stage 3.
    pub next_goal_delay_ms: u64,
    /// Seed for stage-3 goals. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for TutorialConfig {
    fn default() -> Self {
        Self {
            stage2_goals: vec![1234, 5678, 9012],
            up_clicks_required: 3,
            down_clicks_required: 3,
            next_goal_delay_ms: 2000,
            seed: None,
        }
    }
}

impl TutorialConfig {
    pub fn next_goal_delay(&self) -> Duration {
        Duration::from_millis(self.next_goal_delay_ms)
    }
}

/// Where outbound commands are addressed inside the embedded runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeTarget {
    pub game_object: String,
    pub method: String,
}

impl Default for RuntimeTarget {
    fn default() -> Self {
        Self {
            game_object: "WebBridge".to_string(),
            method: "ReceiveStringMessageFromJs".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AbacusConfig::from_yaml("{}").unwrap();
        assert_eq!(config, AbacusConfig::default());
        assert_eq!(config.tutorial.stage2_goals, vec![1234, 5678, 9012]);
        assert_eq!(config.voice.locale, "fr-FR");
        assert_eq!(config.tutorial.next_goal_delay(), Duration::from_secs(2));
        assert_eq!(config.runtime.game_object, "WebBridge");
    }

    #[test]
    fn test_partial_override() {
        let yaml = r#"
voice:
  locale: en-GB
tutorial:
  stage2_goals: [42, 9999]
  seed: 7
"#;
        let config = AbacusConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.voice.locale, "en-GB");
        assert!((config.voice.rate - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.tutorial.stage2_goals, vec![42, 9999]);
        assert_eq!(config.tutorial.seed, Some(7));
        assert_eq!(config.tutorial.up_clicks_required, 3);
    }

    #[test]
    fn test_rejects_out_of_range_goal() {
        let err = AbacusConfig::from_yaml("tutorial:\n  stage2_goals: [1234, 10000]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("10000"));

        let err = AbacusConfig::from_yaml("tutorial:\n  stage2_goals: [0]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_goals_and_bad_voice() {
        assert!(AbacusConfig::from_yaml("tutorial:\n  stage2_goals: []\n").is_err());
        assert!(AbacusConfig::from_yaml("voice:\n  rate: 0\n").is_err());
        assert!(AbacusConfig::from_yaml("voice:\n  locale: ''\n").is_err());
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        let err = AbacusConfig::from_yaml("tutorial: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tutorial:\n  next_goal_delay_ms: 500").unwrap();

        let config = AbacusConfig::from_file(file.path()).unwrap();
        assert_eq!(config.tutorial.next_goal_delay(), Duration::from_millis(500));

        let missing = AbacusConfig::from_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
