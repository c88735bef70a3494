use std::time::Duration;

use anyhow::{Context, Result};

// ---------------------------------------------------------------------------
// DatabaseConfig
// ---------------------------------------------------------------------------

/// Connection parameters for the MySQL pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// Deadline for opening a connection. Waiting for a busy connection to
    /// free up is not bounded.
    pub connect_timeout: Duration,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server_host: String,
    pub server_port: u16,
    /// Per-request deadline. `None` lets a request wait on the database forever.
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so tests don't have to
    /// mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let database = DatabaseConfig {
            host: vars.required("databaseHost")?,
            user: vars.required("databaseUser")?,
            password: vars.required("databasePassword")?,
            name: vars.required("databaseName")?,
            port: vars
                .required("databasePort")?
                .trim()
                .parse()
                .context("databasePort must be a valid port number")?,
            max_connections: vars
                .optional("DB_MAX_CONNECTIONS", "10")
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            connect_timeout: Duration::from_secs(
                vars.optional("DB_CONNECT_TIMEOUT_SECS", "5")
                    .parse()
                    .context("DB_CONNECT_TIMEOUT_SECS must be a positive integer")?,
            ),
        };

        let request_timeout = vars
            .get("REQUEST_TIMEOUT_SECS")
            .map(|s| s.parse::<u64>().map(Duration::from_secs))
            .transpose()
            .context("REQUEST_TIMEOUT_SECS must be a positive integer")?;

        Ok(Self {
            database,
            server_host: vars.optional("SERVER_HOST", "0.0.0.0"),
            server_port: vars
                .optional("PORT", "3000")
                .parse()
                .context("PORT must be a valid port number")?,
            request_timeout,
        })
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Empty values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.get(key)
            .with_context(|| format!("missing required env var: {key}"))
    }

    fn optional(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_owned())
    }
}
