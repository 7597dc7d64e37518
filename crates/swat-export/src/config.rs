use anyhow::{anyhow, Result};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use outscan_backend::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_OUTPUT: &str = "SWAT.csv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const APP_NAME: &str = "swat-export";
const CONFIG_FILE: &str = "config.toml";
const LOCAL_CONFIG_FILE: &str = "swat-export.toml";

/// Export settings, layered from defaults, TOML files, `OUTSCAN_*` env vars and CLI flags
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// XMLAPI endpoint
    pub url: Option<String>,
    /// Application token (APPTOKEN)
    pub token: Option<String>,
    /// CSV destination
    pub output: PathBuf,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: Some(DEFAULT_BASE_URL.to_string()),
            token: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Values given on the command line; `None` leaves the layered value alone.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub url: Option<String>,
    pub token: Option<String>,
    pub output: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let explicit_path = config_path.as_deref();
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(explicit_path) {
            if path.exists() {
                log::debug!("Reading config file {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        // Free-form strings come from clap's `env` fallbacks instead: figment would
        // coerce values such as an all-digit token into integers.
        figment = figment.merge(
            Env::prefixed("OUTSCAN_").ignore(&["config", "url", "token", "output"]),
        );

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    pub fn merge_with_cli(&mut self, cli: CliOverrides) {
        if let Some(url) = cli.url {
            self.url = Some(url);
        }
        if let Some(token) = cli.token {
            self.token = Some(token);
        }
        if let Some(output) = cli.output {
            self.output = output;
        }
        if let Some(timeout) = cli.timeout_secs {
            self.timeout_secs = timeout;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.as_deref().map_or(true, |u| u.trim().is_empty()) {
            return Err(anyhow!(
                "Outscan URL not configured. Set via --url, OUTSCAN_URL env var, or config file"
            ));
        }
        if self.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(anyhow!(
                "Outscan token not configured. Set via --token, OUTSCAN_TOKEN env var, or config file"
            ));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn token(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Files read when no `--config` is given, later entries overriding earlier ones.
fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }

    let platform = ProjectDirs::from("", "", APP_NAME).map(|d| d.config_dir().join(CONFIG_FILE));
    let xdg = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| BaseDirs::new().map(|d| d.home_dir().join(".config")))
        .map(|dir| dir.join(APP_NAME).join(CONFIG_FILE));
    let working_dir = std::env::current_dir()
        .ok()
        .map(|dir| dir.join(LOCAL_CONFIG_FILE));

    // On Linux the platform and XDG locations coincide
    let mut paths: Vec<PathBuf> = Vec::new();
    for path in [platform, xdg, working_dir].into_iter().flatten() {
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}
