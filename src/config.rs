use clap::Parser;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::failure::FailurePolicy;

#[derive(Parser, Debug, Default)]
#[command(name = "restblog", about = "A small RESTful blog")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Store connection string (memory, sqlite::memory:, sqlite://<path>)
    #[arg(long, env = "DATABASEURL")]
    pub database_url: Option<String>,

    /// Address to bind to
    #[arg(long, env = "IP")]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// What clients see when a store call fails
    #[arg(long, env = "FAILURE_POLICY", value_enum)]
    pub failure_policy: Option<FailurePolicy>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting {env} (set the environment variable or pass --{flag})")]
    Missing {
        env: &'static str,
        flag: &'static str,
    },

    #[error("Could not read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unsupported database URL: {0}")]
    DatabaseUrl(String),

    #[error("Invalid bind address {0}")]
    Address(String),
}

/// Contents of the optional TOML file. Everything is optional here; the
/// required settings are checked after CLI and environment overrides.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub failure_policy: Option<FailurePolicy>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: Option<String>,
}

/// Which backend the store runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    Memory,
    SqliteMemory,
    Sqlite(PathBuf),
}

impl FromStr for DatabaseUrl {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "memory" || s == "memory://" {
            return Ok(DatabaseUrl::Memory);
        }
        if s == "sqlite::memory:" || s == "sqlite://:memory:" {
            return Ok(DatabaseUrl::SqliteMemory);
        }

        let path = s
            .strip_prefix("sqlite://")
            .or_else(|| s.strip_prefix("sqlite:"))
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ConfigError::DatabaseUrl(s.to_string()))?;

        Ok(DatabaseUrl::Sqlite(PathBuf::from(path)))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: DatabaseUrl,
    pub failure_policy: FailurePolicy,
}

impl Config {
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match cli.config {
            Some(ref path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            None => FileConfig::default(),
        };

        Self::resolve(cli, file)
    }

    /// CLI and environment values win over the file. There are no defaults
    /// for the database URL, host or port.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let database_url = cli
            .database_url
            .clone()
            .or(file.database.url)
            .ok_or(ConfigError::Missing {
                env: "DATABASEURL",
                flag: "database-url",
            })?
            .parse::<DatabaseUrl>()?;

        let host = cli.host.clone().or(file.server.host).ok_or(ConfigError::Missing {
            env: "IP",
            flag: "host",
        })?;

        let port = cli.port.or(file.server.port).ok_or(ConfigError::Missing {
            env: "PORT",
            flag: "port",
        })?;

        let failure_policy = cli
            .failure_policy
            .or(file.failure_policy)
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            database_url,
            failure_policy,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::Address(addr))
    }
}
