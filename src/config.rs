//! Runner configuration.
//!
//! Loaded from TOML (`CONNECT4_CONFIG`, else `connect4.toml` in the working
//! directory), then overridden from the environment.
//!
//! ```toml
//! [engine]
//! backend = "external"
//! program = "/usr/local/bin/c4solver"
//! probe_budget_ms = 500
//! timeout_slack_ms = 2000
//!
//! [ui]
//! theme = "mint"
//! result_hold_ms = 1500
//! frame_ms = 16
//!
//! [log]
//! path = "connect4.log"
//! level = "debug"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::{warn, LevelFilter};
use serde::Deserialize;

use crate::core::{NavError, SessionTuning};
use crate::engine::{Backend, ExternalEngine, NegamaxEngine};
use crate::error::ConfigError;
use crate::types::{Theme, PROBE_BUDGET_MS};

pub const CONFIG_ENV: &str = "CONNECT4_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "connect4.toml";

/// Which move-search backend the worker runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Builtin,
    External,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "builtin" => Ok(BackendKind::Builtin),
            "external" => Ok(BackendKind::External),
            other => Err(ConfigError::Validation(format!(
                "engine.backend must be \"builtin\" or \"external\", got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub backend: BackendKind,
    /// External search executable
    pub program: Option<PathBuf>,
    /// Depth cap of the built-in search
    pub max_depth: Option<u8>,
    pub probe_budget_ms: u32,
    pub timeout_slack_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Builtin,
            program: None,
            max_depth: None,
            probe_budget_ms: PROBE_BUDGET_MS,
            timeout_slack_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: String,
    pub result_hold_ms: u32,
    /// Minimum interval between rendered frames
    pub frame_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Default.as_str().to_string(),
            result_hold_ms: 1500,
            frame_ms: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log file; logging is off without one
    pub path: Option<PathBuf>,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: None,
            level: "info".to_string(),
        }
    }
}

impl LogConfig {
    /// Effective level: `Off` when there is nowhere to write.
    pub fn level_filter(&self) -> LevelFilter {
        if self.path.is_none() {
            return LevelFilter::Off;
        }
        LevelFilter::from_str(self.level.trim()).unwrap_or(LevelFilter::Info)
    }
}

/// Top-level runner configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Config file location: `$CONNECT4_CONFIG`, else `connect4.toml`.
    pub fn config_path() -> PathBuf {
        std::env::var(CONFIG_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CONNECT4_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup. Blank values are ignored.
    pub fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |key: &str| {
            var(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(backend) = get("CONNECT4_ENGINE") {
            self.engine.backend = backend.parse()?;
        }
        if let Some(program) = get("CONNECT4_ENGINE_PATH") {
            self.engine.program = Some(PathBuf::from(program));
        }
        if let Some(theme) = get("CONNECT4_THEME") {
            self.ui.theme = theme;
        }
        if let Some(path) = get("CONNECT4_LOG_PATH") {
            self.log.path = Some(PathBuf::from(path));
        }
        if let Some(level) = get("CONNECT4_LOG_LEVEL") {
            self.log.level = level;
        }
        self.validate()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.backend == BackendKind::External && self.engine.program.is_none() {
            return Err(ConfigError::Validation(
                "engine.program is required when engine.backend = \"external\"".into(),
            ));
        }
        if self.engine.max_depth == Some(0) {
            return Err(ConfigError::Validation("engine.max_depth must be > 0".into()));
        }
        if self.ui.frame_ms == 0 {
            return Err(ConfigError::Validation("ui.frame_ms must be > 0".into()));
        }
        if LevelFilter::from_str(self.log.level.trim()).is_err() {
            return Err(ConfigError::Validation(format!(
                "log.level {:?} is not a log level",
                self.log.level
            )));
        }
        Ok(())
    }

    /// Configured theme; an unknown name keeps the default.
    pub fn theme(&self) -> Theme {
        Theme::from_str(&self.ui.theme).unwrap_or_else(|| {
            warn!("{}", NavError::UnknownTheme(self.ui.theme.clone()));
            Theme::default()
        })
    }

    pub fn tuning(&self) -> SessionTuning {
        SessionTuning::from_millis(self.engine.probe_budget_ms, self.ui.result_hold_ms)
    }

    pub fn backend(&self) -> Backend {
        match (&self.engine.backend, &self.engine.program) {
            (BackendKind::External, Some(program)) => {
                Backend::External(ExternalEngine::new(program.clone()))
            }
            _ => Backend::Builtin(match self.engine.max_depth {
                Some(depth) => NegamaxEngine::with_max_depth(depth),
                None => NegamaxEngine::new(),
            }),
        }
    }

    pub fn timeout_slack(&self) -> Duration {
        Duration::from_millis(self.engine.timeout_slack_ms)
    }
}
