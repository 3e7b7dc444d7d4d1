// ⚙️ Configuration - which files to load, where to listen
// TOML on disk; every key optional. CLI flags override on top.

use crate::error::ConfigError;
use crate::source::{FileSource, LineSource};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Input files, read in order
    pub sources: Vec<PathBuf>,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            sources: vec![
                PathBuf::from("data/records1.txt"),
                PathBuf::from("data/records2.txt"),
                PathBuf::from("data/records3.txt"),
            ],
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Config file if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Replace the configured sources when `paths` is non-empty
    pub fn override_sources(&mut self, paths: Vec<PathBuf>) {
        if !paths.is_empty() {
            self.sources = paths;
        }
    }

    pub fn line_sources(&self) -> Vec<Box<dyn LineSource>> {
        self.sources
            .iter()
            .map(|path| Box::new(FileSource::new(path)) as Box<dyn LineSource>)
            .collect()
    }
}
