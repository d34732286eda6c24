use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_API_BASE: &str = "https://newsapi.org/v2/top-headlines";
pub const PLACEHOLDER_API_KEY: &str = "YOUR_NEWSAPI_KEY_HERE";
const APP_DIR: &str = "news-desk";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub country: String,
    pub page_size: u32,
    pub timeout_secs: u64,
    pub daily_quota: u32,
    pub header: Option<String>,
    pub open_command: Option<String>,
    pub log_level: String,
    pub cache_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.into(),
            country: "us".into(),
            page_size: 100,
            timeout_secs: 10,
            daily_quota: 100,
            header: None,
            open_command: None,
            log_level: "warn".into(),
            cache_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewsApiConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub country: String,
    pub page_size: u32,
    pub timeout: Duration,
    pub daily_quota: u32,
}

impl NewsApiConfig {
    /// The key to send, unless it is blank or still the placeholder.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_API_KEY)
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub api: NewsApiConfig,
    pub header: Option<String>,
    pub open_command: Option<String>,
    pub log_level: String,
    pub cache_dir: PathBuf,
}

impl RuntimeConfig {
    fn from_app(parsed: AppConfig, env_key: Option<String>) -> Self {
        let cache_dir = parsed
            .cache_dir
            .or_else(default_config_dir)
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR));
        RuntimeConfig {
            api: NewsApiConfig {
                api_key: env_key.filter(|k| !k.trim().is_empty()).or(parsed.api_key),
                api_base: parsed.api_base,
                country: parsed.country,
                page_size: parsed.page_size,
                timeout: Duration::from_secs(parsed.timeout_secs.max(1)),
                daily_quota: parsed.daily_quota,
            },
            header: parsed.header,
            open_command: parsed.open_command,
            log_level: parsed.log_level,
            cache_dir,
        }
    }
}

pub fn load(config_override: Option<String>) -> Result<RuntimeConfig> {
    let env_key = env::var("NEWSAPI_KEY").ok();

    if let Some(path_str) = config_override {
        let parsed = read_config(Path::new(&path_str))?;
        return Ok(RuntimeConfig::from_app(parsed, env_key));
    }

    if let Some(path) = default_config_dir().map(|d| d.join("config.toml")) {
        if path.is_file() {
            let parsed = read_config(&path)?;
            return Ok(RuntimeConfig::from_app(parsed, env_key));
        }
    }

    Ok(RuntimeConfig::from_app(AppConfig::default(), env_key))
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse(&txt).with_context(|| format!("failed to parse toml: {}", path.display()))
}

pub fn parse(txt: &str) -> Result<AppConfig> {
    Ok(toml::from_str(txt)?)
}

fn default_config_dir() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join(APP_DIR));
    }
    if let Ok(home) = env::var("HOME") {
        return Some(PathBuf::from(home).join(".config").join(APP_DIR));
    }
    None
}
