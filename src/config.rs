use anyhow::{Context, Result, anyhow};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_MODEL: &str = "gemini-exp-1206";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub model: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FileConfig {
    gemini_api_key: Option<String>,
    timeout_secs: Option<u64>,
    max_tokens: Option<u32>,
    model: Option<String>,
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let mut path = home_dir().context("Could not determine home directory")?;
        path.push(".tai/config");
        Ok(path)
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let config = Self::load_lenient()?;

        if config.api_key.is_empty() {
            return Err(anyhow!(
                "Gemini API key not found. Set GEMINI_API_KEY or add it to {}",
                path.display()
            ));
        }

        Ok(config)
    }

    /// Like `load`, but tolerates a missing API key. Used by `tai config`,
    /// which must work before a key has been configured.
    pub fn load_lenient() -> Result<Self> {
        let path = Self::config_path()?;
        let FileConfig {
            gemini_api_key: file_api_key,
            timeout_secs: file_timeout,
            max_tokens: file_max_tokens,
            model: file_model,
        } = Self::read_file_config(&path)?;

        let api_key = Self::env_string("GEMINI_API_KEY")?
            .or(file_api_key)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_default();

        let timeout_secs = Self::env_u64("TAI_TIMEOUT_SECS")?
            .or(file_timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let max_tokens = Self::env_u32("TAI_MAX_TOKENS")?
            .or(file_max_tokens)
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let model = Self::env_string("TAI_MODEL")?
            .or(file_model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            timeout_secs,
            max_tokens,
            model,
        })
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let file = FileConfig {
            gemini_api_key: Some(self.api_key.clone()),
            timeout_secs: Some(self.timeout_secs),
            max_tokens: Some(self.max_tokens),
            model: Some(self.model.clone()),
        };

        let contents =
            serde_json::to_string_pretty(&file).context("Failed to serialize config")?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed writing config at {}", path.display()))?;

        Ok(())
    }

    fn read_file_config(path: &Path) -> Result<FileConfig> {
        if !path.exists() {
            return Ok(FileConfig::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed reading config at {}", path.display()))?;
        let file = serde_json::from_str(&contents)
            .with_context(|| format!("Failed parsing JSON config at {}", path.display()))?;
        Ok(file)
    }

    fn env_string(key: &str) -> Result<Option<String>> {
        match env::var(key) {
            Ok(val) => Ok(Some(val)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(anyhow!("{key} contains invalid UTF-8")),
        }
    }

    fn env_u64(key: &str) -> Result<Option<u64>> {
        if let Some(value) = Self::env_string(key)? {
            let parsed = value
                .parse::<u64>()
                .with_context(|| format!("Failed to parse {key} as u64"))?;
            Ok(Some(parsed))
        } else {
            Ok(None)
        }
    }

    fn env_u32(key: &str) -> Result<Option<u32>> {
        if let Some(value) = Self::env_string(key)? {
            let parsed = value
                .parse::<u32>()
                .with_context(|| format!("Failed to parse {key} as u32"))?;
            Ok(Some(parsed))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    fn env_lock<'a>() -> std::sync::MutexGuard<'a, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    struct EnvGuard {
        saved: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new(vars: &[(&str, Option<&str>)]) -> Self {
            let saved = vars
                .iter()
                .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
                .collect::<Vec<_>>();
            for (key, value) in vars {
                match value {
                    Some(val) => unsafe { std::env::set_var(key, val) },
                    None => unsafe { std::env::remove_var(key) },
                }
            }
            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in &self.saved {
                match value {
                    Some(val) => unsafe { std::env::set_var(key, val) },
                    None => unsafe { std::env::remove_var(key) },
                }
            }
        }
    }

    #[test]
    fn load_from_env_only() {
        let _lock = env_lock();
        let temp_home = TempDir::new().unwrap();
        let home = temp_home.path().to_str().unwrap().to_string();

        let _env = EnvGuard::new(&[
            ("HOME", Some(home.as_str())),
            ("GEMINI_API_KEY", Some("env-key")),
            ("TAI_TIMEOUT_SECS", Some("45")),
            ("TAI_MAX_TOKENS", Some("4096")),
            ("TAI_MODEL", Some("env-model")),
        ]);

        let config = Config::load().unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.timeout_secs, 45);
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.model, "env-model");
    }

    #[test]
    fn load_prefers_env_over_file() {
        let _lock = env_lock();
        let temp_home = TempDir::new().unwrap();
        let home = temp_home.path().to_str().unwrap().to_string();
        let config_dir = temp_home.path().join(".tai");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config"),
            r#"{
                "gemini_api_key": "file-key",
                "timeout_secs": 20,
                "max_tokens": 512,
                "model": "file-model"
            }"#,
        )
        .unwrap();

        let _env = EnvGuard::new(&[
            ("HOME", Some(home.as_str())),
            ("GEMINI_API_KEY", Some("env-key")),
            ("TAI_TIMEOUT_SECS", Some("40")),
            ("TAI_MAX_TOKENS", None),
            ("TAI_MODEL", None),
        ]);

        let config = Config::load().unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.timeout_secs, 40);
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.model, "file-model");
    }

    #[test]
    fn load_errors_without_api_key() {
        let _lock = env_lock();
        let temp_home = TempDir::new().unwrap();
        let home = temp_home.path().to_str().unwrap().to_string();

        let _env = EnvGuard::new(&[
            ("HOME", Some(home.as_str())),
            ("GEMINI_API_KEY", None),
            ("TAI_TIMEOUT_SECS", None),
            ("TAI_MAX_TOKENS", None),
            ("TAI_MODEL", None),
        ]);

        let err = Config::load().unwrap_err();
        assert!(err.to_string().contains("Gemini API key not found"));
    }

    #[test]
    fn save_then_load_round_trips() {
        let _lock = env_lock();
        let temp_home = TempDir::new().unwrap();
        let home = temp_home.path().to_str().unwrap().to_string();

        let _env = EnvGuard::new(&[
            ("HOME", Some(home.as_str())),
            ("GEMINI_API_KEY", None),
            ("TAI_TIMEOUT_SECS", None),
            ("TAI_MAX_TOKENS", None),
            ("TAI_MODEL", None),
        ]);

        let config = Config {
            api_key: "saved-key".to_string(),
            timeout_secs: 15,
            max_tokens: 2048,
            model: "saved-model".to_string(),
        };
        config.save().unwrap();

        let loaded = Config::load().unwrap();
        assert_eq!(loaded, config);
    }
}
