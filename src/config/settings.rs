//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the SQL-generating language model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// When `false` every generation request fails immediately and the
    /// dialogue ends in its error stage after confirmation.
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible endpoint.
    ///
    /// - Ollama default: `http://localhost:11434`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key; `None` for local providers such as Ollama.
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset.
    pub api_key_env: String,
    /// Model identifier sent to the API (e.g. `"qwen2.5:3b"`, `"gpt-4o-mini"`).
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:11434".into(),
            api_key: None,
            api_key_env: "FLIGHT_AGENT_API_KEY".into(),
            model: "qwen2.5:3b".into(),
            temperature: 0.0,
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    /// The key to authenticate with: the configured key when non-empty,
    /// otherwise the value of the `api_key_env` environment variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .or_else(|| {
                std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|k| !k.is_empty())
            })
    }
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

/// Settings for the SQLite flight store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file. `None` means `flights.db` in the platform data dir.
    pub database_file: Option<PathBuf>,
    /// Number of synthetic flights inserted when the table is empty.
    pub sample_flights: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_file: None,
            sample_flights: 100,
        }
    }
}

impl StoreConfig {
    /// Resolve the database path, falling back to [`AppPaths::database_file`].
    pub fn database_path(&self) -> PathBuf {
        self.database_file
            .clone()
            .unwrap_or_else(|| AppPaths::new().database_file)
    }
}

// ---------------------------------------------------------------------------
// VoiceConfig
// ---------------------------------------------------------------------------

/// Settings for the voice front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Seconds to wait for the user to start answering before `listen`
    /// reports absent input; `0` waits indefinitely.
    pub listen_timeout_secs: u64,
    /// Print each spoken prompt to the terminal as `Agent: …`.
    pub echo_prompts: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            listen_timeout_secs: 10,
            echo_prompts: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use voice_flight_agent::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Query-generation settings.
    pub llm: LlmConfig,
    /// Flight database settings.
    pub store: StoreConfig,
    /// Speak / listen settings.
    pub voice: VoiceConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns `true` when no `settings.toml` file exists yet.
    pub fn is_first_run() -> bool {
        !AppPaths::new().settings_file.exists()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.llm.base_url, loaded.llm.base_url);
        assert_eq!(original.llm.api_key, loaded.llm.api_key);
        assert_eq!(original.llm.api_key_env, loaded.llm.api_key_env);
        assert_eq!(original.llm.model, loaded.llm.model);
        assert_eq!(original.llm.timeout_secs, loaded.llm.timeout_secs);

        assert_eq!(original.store.database_file, loaded.store.database_file);
        assert_eq!(original.store.sample_flights, loaded.store.sample_flights);

        assert_eq!(
            original.voice.listen_timeout_secs,
            loaded.voice.listen_timeout_secs
        );
        assert_eq!(original.voice.echo_prompts, loaded.voice.echo_prompts);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.llm.model, default.llm.model);
        assert_eq!(config.store.sample_flights, default.store.sample_flights);
        assert_eq!(
            config.voice.listen_timeout_secs,
            default.voice.listen_timeout_secs
        );
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert!(cfg.llm.enabled);
        assert_eq!(cfg.llm.base_url, "http://localhost:11434");
        assert_eq!(cfg.llm.model, "qwen2.5:3b");
        assert_eq!(cfg.llm.timeout_secs, 30);
        assert!(cfg.llm.api_key.is_none());
        assert_eq!(cfg.store.sample_flights, 100);
        assert!(cfg.store.database_file.is_none());
        assert_eq!(cfg.voice.listen_timeout_secs, 10);
        assert!(cfg.voice.echo_prompts);
    }

    /// A file that only sets one section keeps defaults for the rest.
    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[llm]\nmodel = \"gpt-4o-mini\"\n").unwrap();

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.llm.model, "gpt-4o-mini");
        assert_eq!(cfg.llm.base_url, "http://localhost:11434");
        assert_eq!(cfg.store.sample_flights, 100);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.llm.base_url = "https://api.openai.com".into();
        cfg.llm.api_key = Some("sk-test".into());
        cfg.llm.model = "gpt-4o-mini".into();
        cfg.store.database_file = Some(dir.path().join("custom.db"));
        cfg.store.sample_flights = 250;
        cfg.voice.listen_timeout_secs = 20;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.llm.base_url, "https://api.openai.com");
        assert_eq!(loaded.llm.api_key, Some("sk-test".into()));
        assert_eq!(loaded.llm.model, "gpt-4o-mini");
        assert_eq!(
            loaded.store.database_file,
            Some(dir.path().join("custom.db"))
        );
        assert_eq!(loaded.store.sample_flights, 250);
        assert_eq!(loaded.voice.listen_timeout_secs, 20);
    }

    #[test]
    fn configured_api_key_wins_over_environment() {
        let cfg = LlmConfig {
            api_key: Some("sk-config".into()),
            api_key_env: "FLIGHT_AGENT_TEST_KEY_UNUSED".into(),
            ..LlmConfig::default()
        };
        assert_eq!(cfg.resolved_api_key().as_deref(), Some("sk-config"));
    }

    #[test]
    fn empty_api_key_falls_back_to_environment() {
        let var = "FLIGHT_AGENT_TEST_KEY_FALLBACK";
        std::env::set_var(var, "sk-env");
        let cfg = LlmConfig {
            api_key: Some(String::new()),
            api_key_env: var.into(),
            ..LlmConfig::default()
        };
        assert_eq!(cfg.resolved_api_key().as_deref(), Some("sk-env"));
        std::env::remove_var(var);
    }

    #[test]
    fn explicit_database_file_is_used() {
        let cfg = StoreConfig {
            database_file: Some(PathBuf::from("/tmp/x.db")),
            ..StoreConfig::default()
        };
        assert_eq!(cfg.database_path(), PathBuf::from("/tmp/x.db"));
    }
}
