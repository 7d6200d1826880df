//! Configuration file support for PawPal.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/pawpal/config.toml`.

use crate::engine::{DEFAULT_COMPLETION_REWARD, DEFAULT_INITIAL_COINS, DEFAULT_MINIGAME_BONUS};
use crate::types::validate_goal;
use crate::{Error, HabitCollection, HabitId, PetType, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables checked, in order, for the generator API key
pub const API_KEY_VARS: [&str; 2] = ["PAWPAL_API_KEY", "OPENAI_API_KEY"];

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub goals: GoalConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Starting balance, rewards and pet defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_initial_coins")]
    pub initial_coins: u32,

    #[serde(default = "default_completion_reward")]
    pub completion_reward: u32,

    #[serde(default = "default_minigame_bonus")]
    pub minigame_bonus: u32,

    #[serde(default = "default_pet_name")]
    pub pet_name: String,

    #[serde(default)]
    pub pet_type: PetType,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_coins: default_initial_coins(),
            completion_reward: default_completion_reward(),
            minigame_bonus: default_minigame_bonus(),
            pet_name: default_pet_name(),
            pet_type: PetType::default(),
        }
    }
}

/// Daily goal per habit, in the habit's own unit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_water_goal")]
    pub water: f64,

    #[serde(default = "default_sleep_goal")]
    pub sleep: f64,

    #[serde(default = "default_steps_goal")]
    pub steps: f64,

    #[serde(default = "default_meals_goal")]
    pub meals: f64,

    #[serde(default = "default_screen_time_goal")]
    pub screen_time: f64,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            water: default_water_goal(),
            sleep: default_sleep_goal(),
            steps: default_steps_goal(),
            meals: default_meals_goal(),
            screen_time: default_screen_time_goal(),
        }
    }
}

impl GoalConfig {
    pub fn goal_for(&self, id: HabitId) -> f64 {
        match id {
            HabitId::Water => self.water,
            HabitId::Sleep => self.sleep,
            HabitId::Steps => self.steps,
            HabitId::Meals => self.meals,
            HabitId::ScreenTime => self.screen_time,
        }
    }

    /// Fresh habit collection with these goals and zero progress
    pub fn build_habits(&self) -> Result<HabitCollection> {
        HabitCollection::with_goals(|id| self.goal_for(id))
    }
}

/// Which message generator backs the encouragement card
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorProvider {
    #[default]
    Offline,
    #[serde(rename = "openai")]
    OpenAi,
}

/// Encouraging-message generator settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub provider: GeneratorProvider,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u16,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: GeneratorProvider::default(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeneratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key from the environment, if any is set and non-blank
    pub fn api_key_from_env() -> Option<String> {
        API_KEY_VARS.iter().find_map(|var| {
            std::env::var(var)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
    }
}

// Default value functions
fn default_initial_coins() -> u32 {
    DEFAULT_INITIAL_COINS
}

fn default_completion_reward() -> u32 {
    DEFAULT_COMPLETION_REWARD
}

fn default_minigame_bonus() -> u32 {
    DEFAULT_MINIGAME_BONUS
}

fn default_pet_name() -> String {
    "Buddy".into()
}

fn default_water_goal() -> f64 {
    8.0
}

fn default_sleep_goal() -> f64 {
    8.0
}

fn default_steps_goal() -> f64 {
    10_000.0
}

fn default_meals_goal() -> f64 {
    3.0
}

fn default_screen_time_goal() -> f64 {
    2.0
}

fn default_base_url() -> String {
    "https://api.openai.com".into()
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u16 {
    120
}

fn default_timeout_secs() -> u64 {
    15
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let base = match dirs::config_dir() {
            Some(dir) => dir,
            None => {
                let home = std::env::var("HOME").map_err(|_| {
                    Error::Config("Cannot locate config directory: HOME is not set".into())
                })?;
                PathBuf::from(home).join(".config")
            }
        };
        Ok(base.join("pawpal").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Check values that serde cannot constrain
    pub fn validate(&self) -> Result<()> {
        for id in HabitId::ALL {
            validate_goal(id, self.goals.goal_for(id))?;
        }

        if self.session.pet_name.trim().is_empty() {
            return Err(Error::Config("Pet name cannot be empty".into()));
        }

        if self.generator.timeout_secs == 0 {
            return Err(Error::Config("Generator timeout must be at least 1 second".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.session.initial_coins, 100);
        assert_eq!(config.session.completion_reward, 10);
        assert_eq!(config.session.minigame_bonus, 50);
        assert_eq!(config.session.pet_name, "Buddy");
        assert_eq!(config.goals.steps, 10_000.0);
        assert_eq!(config.generator.provider, GeneratorProvider::Offline);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[goals]
water = 10

[generator]
provider = "openai"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.goals.water, 10.0);
        assert_eq!(config.goals.sleep, 8.0); // default
        assert_eq!(config.generator.provider, GeneratorProvider::OpenAi);
        assert_eq!(config.generator.model, "gpt-4o-mini");
    }

    #[test]
    fn test_build_habits_uses_goals() {
        let mut config = Config::default();
        config.goals.meals = 5.0;
        let habits = config.goals.build_habits().unwrap();
        assert_eq!(habits.get(HabitId::Meals).goal, 5.0);
        assert_eq!(habits.get(HabitId::Water).goal, 8.0);
    }

    #[test]
    fn test_rejects_non_positive_goal() {
        let mut config = Config::default();
        config.goals.sleep = 0.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        assert!(matches!(config.goals.build_habits(), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.session.pet_name = "Rex".into();
        config.session.pet_type = PetType::Dragon;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.session.pet_name, "Rex");
        assert_eq!(loaded.session.pet_type, PetType::Dragon);
    }

    #[test]
    fn test_load_from_rejects_invalid_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[goals]\nsteps = -1\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
