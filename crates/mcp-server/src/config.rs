use memento_graph::MemoryGraphStore;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const GRAPH_PATH_ENV: &str = "MEMENTO_GRAPH_PATH";
pub const EPHEMERAL_ENV: &str = "MEMENTO_EPHEMERAL";
pub const ENVIRONMENT_ENV: &str = "MEMENTO_ENVIRONMENT";

const DEFAULT_DIR: &str = ".memento";
const DEFAULT_FILE: &str = "graph.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot resolve a home directory; set {GRAPH_PATH_ENV} or {EPHEMERAL_ENV}=1")]
    NoHomeDir,

    #[error("{GRAPH_PATH_ENV} is set but empty")]
    EmptyGraphPath,
}

/// Where the graph lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Ephemeral,
    Snapshot(PathBuf),
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreLocation::Ephemeral => f.write_str("in-memory graph"),
            StoreLocation::Snapshot(path) => write!(f, "graph snapshot {}", path.display()),
        }
    }
}

/// Server settings, read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub store: StoreLocation,
    pub environment: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let ephemeral = lookup(EPHEMERAL_ENV)
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let store = if ephemeral {
            StoreLocation::Ephemeral
        } else {
            match lookup(GRAPH_PATH_ENV) {
                Some(path) if path.trim().is_empty() => return Err(ConfigError::EmptyGraphPath),
                Some(path) => StoreLocation::Snapshot(PathBuf::from(path)),
                None => {
                    let home = home.ok_or(ConfigError::NoHomeDir)?;
                    StoreLocation::Snapshot(home.join(DEFAULT_DIR).join(DEFAULT_FILE))
                }
            }
        };

        let environment = lookup(ENVIRONMENT_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_environment);

        Ok(Self { store, environment })
    }

    pub fn open_store(&self) -> memento_graph::Result<MemoryGraphStore> {
        match &self.store {
            StoreLocation::Ephemeral => Ok(MemoryGraphStore::new()),
            StoreLocation::Snapshot(path) => MemoryGraphStore::open(path),
        }
    }
}

fn default_environment() -> String {
    format!(
        "{} {} (memento-mcp {})",
        std::env::consts::OS,
        std::env::consts::ARCH,
        env!("CARGO_PKG_VERSION")
    )
}
