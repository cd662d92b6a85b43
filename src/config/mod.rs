use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

pub const ENV_ENVIRONMENT: &str = "FOLIO_ENV";
pub const ENV_DATABASE_PATH: &str = "FOLIO_DATABASE_PATH";
pub const ENV_LOG: &str = "FOLIO_LOG";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub environment: Environment,
    pub site: SiteConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Self::Production
    }

    pub fn default_log_level(self) -> &'static str {
        match self {
            Self::Local => "debug",
            Self::Production => "info",
        }
    }

    pub fn default_log_format(self) -> LogFormat {
        match self {
            Self::Local => LogFormat::Compact,
            Self::Production => LogFormat::Verbose,
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "development" | "dev" => Ok(Self::Local),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    pub title: String,
    #[serde(default = "default_site_url")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Verbose,
}

/// Unset fields fall back to the environment's defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedConfig {
    #[serde(default = "default_publish_chance")]
    pub publish_chance: f64,
    #[serde(default = "default_post_lookback_days")]
    pub post_lookback_days: u32,
    #[serde(default = "default_project_lookback_days")]
    pub project_lookback_days: u32,
    #[serde(default = "default_github_url_chance")]
    pub github_url_chance: f64,
    #[serde(default = "default_live_url_chance")]
    pub live_url_chance: f64,
    #[serde(default = "default_featured_chance")]
    pub featured_chance: f64,
    /// Seeding wipes and fabricates content; production refuses unless set.
    #[serde(default)]
    pub allow_in_production: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            publish_chance: default_publish_chance(),
            post_lookback_days: default_post_lookback_days(),
            project_lookback_days: default_project_lookback_days(),
            github_url_chance: default_github_url_chance(),
            live_url_chance: default_live_url_chance(),
            featured_chance: default_featured_chance(),
            allow_in_production: false,
        }
    }
}

impl SeedConfig {
    pub fn validate(&self) -> Result<()> {
        let chances = [
            ("seed.publish_chance", self.publish_chance),
            ("seed.github_url_chance", self.github_url_chance),
            ("seed.live_url_chance", self.live_url_chance),
            ("seed.featured_chance", self.featured_chance),
        ];
        for (key, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("{} must be between 0 and 1, got {}", key, value);
            }
        }
        if self.post_lookback_days == 0 {
            anyhow::bail!("seed.post_lookback_days must be greater than 0");
        }
        if self.project_lookback_days == 0 {
            anyhow::bail!("seed.project_lookback_days must be greater than 0");
        }
        Ok(())
    }
}

fn default_site_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_publish_chance() -> f64 {
    0.7
}

fn default_post_lookback_days() -> u32 {
    365
}

fn default_project_lookback_days() -> u32 {
    730
}

fn default_github_url_chance() -> f64 {
    0.8
}

fn default_live_url_chance() -> f64 {
    0.6
}

fn default_featured_chance() -> f64 {
    0.3
}

/// `LevelFilter` parses "" as `error`, so blank is rejected up front.
fn is_log_level(level: &str) -> bool {
    let level = level.trim();
    !level.is_empty() && LevelFilter::from_str(level).is_ok()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!(
                "Could not read config file '{}': {}. Run `folio init` to create one.",
                path.display(),
                e
            )
        })?;
        let mut config = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file '{}': {}", path.display(), e))?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid config file '{}': {}", path.display(), e))?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `FOLIO_*` overrides. `lookup` is injected so tests need not
    /// touch the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup(ENV_ENVIRONMENT) {
            self.environment = env
                .parse()
                .map_err(|_| anyhow::anyhow!("{} must be 'local' or 'production', got '{}'", ENV_ENVIRONMENT, env))?;
        }
        if let Some(path) = lookup(ENV_DATABASE_PATH).filter(|p| !p.trim().is_empty()) {
            self.database.path = path;
        }
        if let Some(level) = lookup(ENV_LOG).filter(|l| !l.trim().is_empty()) {
            if !is_log_level(&level) {
                anyhow::bail!(
                    "{} must be one of trace, debug, info, warn, error, off; got '{}'",
                    ENV_LOG,
                    level
                );
            }
            self.logging.level = Some(level);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            anyhow::bail!("database.path must not be empty");
        }
        if self.database.pool_size == 0 {
            anyhow::bail!("database.pool_size must be greater than 0");
        }
        if !is_log_level(self.log_level()) {
            anyhow::bail!(
                "logging.level must be one of trace, debug, info, warn, error, off; got '{}'",
                self.log_level()
            );
        }
        self.seed.validate()?;
        Ok(())
    }

    /// Seeding fabricates content, so production configs must opt in.
    pub fn check_seed_allowed(&self) -> Result<()> {
        if self.environment.is_production() && !self.seed.allow_in_production {
            anyhow::bail!(
                "Refusing to seed a production database. Set seed.allow_in_production = true to override."
            );
        }
        Ok(())
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .level
            .as_deref()
            .unwrap_or_else(|| self.environment.default_log_level())
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging
            .format
            .unwrap_or_else(|| self.environment.default_log_format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[site]
title = "My Site"

[database]
path = "./data/folio.db"
"#;

    #[test]
    fn test_minimal_config_uses_local_defaults() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.environment, Environment::Local);
        assert_eq!(config.database.pool_size, 10);
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert_eq!(config.seed.publish_chance, 0.7);
        assert_eq!(config.seed.post_lookback_days, 365);
        assert_eq!(config.seed.project_lookback_days, 730);
        assert!(!config.seed.allow_in_production);
        config.validate().unwrap();
    }

    #[test]
    fn test_production_profile_defaults() {
        let content = format!("environment = \"production\"\n{}", MINIMAL);
        let config = Config::parse(&content).unwrap();
        assert!(config.environment.is_production());
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.log_format(), LogFormat::Verbose);
    }

    #[test]
    fn test_explicit_logging_overrides_profile() {
        let content = format!(
            "{}\n[logging]\nlevel = \"warn\"\nformat = \"verbose\"\n",
            MINIMAL
        );
        let config = Config::parse(&content).unwrap();
        assert_eq!(config.log_level(), "warn");
        assert_eq!(config.log_format(), LogFormat::Verbose);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::parse(MINIMAL).unwrap();
        config
            .apply_env_overrides(|key| match key {
                ENV_ENVIRONMENT => Some("prod".to_string()),
                ENV_DATABASE_PATH => Some("/srv/folio.db".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.database.path, "/srv/folio.db");
    }

    #[test]
    fn test_invalid_env_override_is_rejected() {
        let mut config = Config::parse(MINIMAL).unwrap();
        let result = config.apply_env_overrides(|key| {
            (key == ENV_ENVIRONMENT).then(|| "staging".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let content = format!("{}\n[seed]\npublish_chance = 1.5\n", MINIMAL);
        let config = Config::parse(&content).unwrap();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("seed.publish_chance"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let content = format!("{}\n[logging]\nlevel = \"loud\"\n", MINIMAL);
        let config = Config::parse(&content).unwrap();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("logging.level"));
        assert!(err.contains("loud"));
    }

    #[test]
    fn test_log_level_env_override_is_checked() {
        let mut config = Config::parse(MINIMAL).unwrap();
        let err = config
            .apply_env_overrides(|key| (key == ENV_LOG).then(|| "verbose".to_string()))
            .unwrap_err()
            .to_string();
        assert!(err.contains(ENV_LOG));

        config
            .apply_env_overrides(|key| (key == ENV_LOG).then(|| "WARN".to_string()))
            .unwrap();
        assert_eq!(config.log_level(), "WARN");
        config.validate().unwrap();
    }

    #[test]
    fn test_seed_refused_in_production_by_default() {
        let content = format!("environment = \"production\"\n{}", MINIMAL);
        let config = Config::parse(&content).unwrap();
        let err = config.check_seed_allowed().unwrap_err().to_string();
        assert!(err.contains("seed.allow_in_production"));
    }

    #[test]
    fn test_seed_allowed_in_production_with_flag() {
        let content = format!(
            "environment = \"production\"\n{}\n[seed]\nallow_in_production = true\n",
            MINIMAL
        );
        let config = Config::parse(&content).unwrap();
        config.check_seed_allowed().unwrap();
    }

    #[test]
    fn test_seed_allowed_locally() {
        let config = Config::parse(MINIMAL).unwrap();
        config.check_seed_allowed().unwrap();
    }

    #[test]
    fn test_validate_rejects_zero_lookback() {
        let content = format!("{}\n[seed]\npost_lookback_days = 0\n", MINIMAL);
        let config = Config::parse(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_database_section_fails_to_parse() {
        assert!(Config::parse("[site]\ntitle = \"x\"\n").is_err());
    }
}
