// secrets
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATABASE: &str = "songs";
const DEFAULT_COLLECTION: &str = "songs";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretsError {
    #[error("Missing MongoDB server in the SERVICE_HOST variable")]
    MissingServiceHost,
    #[error("PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),
}

/// Startup configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub service_host: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
    pub bind_addr: String,
    pub seed_file: PathBuf,
    pub database_name: String,
    pub collection_name: String,
}

impl Secrets {
    pub fn from_env() -> Result<Self, SecretsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SecretsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let service_host = get("SERVICE_HOST").ok_or(SecretsError::MissingServiceHost)?;
        let port = match get("PORT") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u16>()
                    .map_err(|_| SecretsError::InvalidPort(raw.clone()))?,
            ),
            None => None,
        };

        let secrets = Secrets {
            service_host: service_host.trim().to_string(),
            username: get("USERNAME"),
            password: get("PASSWORD"),
            port,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            seed_file: get("SEED_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(default_seed_file),
            database_name: get("DATABASE_NAME").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection_name: get("COLLECTION_NAME")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        };

        // Log which keys are configured (NOT their values!)
        let configured: Vec<&str> = [
            ("SERVICE_HOST", true),
            ("USERNAME", secrets.username.is_some()),
            ("PASSWORD", secrets.password.is_some()),
            ("PORT", secrets.port.is_some()),
        ]
        .iter()
        .filter(|(_, set)| *set)
        .map(|(k, _)| *k)
        .collect();
        info!("Secrets configured: {:?}", configured);

        Ok(secrets)
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        }
    }

    /// SERVICE_HOST with PORT applied to every listed host that does not
    /// name its own port.
    fn host(&self) -> String {
        let Some(port) = self.port else {
            return self.service_host.clone();
        };
        self.service_host
            .split(',')
            .map(|host| with_port(host.trim(), port))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn database_url(&self) -> String {
        match self.credentials() {
            Some((user, pass)) => format!(
                "mongodb://{}:{}@{}",
                urlencoding::encode(user),
                urlencoding::encode(pass),
                self.host()
            ),
            None => format!("mongodb://{}", self.host()),
        }
    }

    /// Same as [`Secrets::database_url`] with the password masked, for logs.
    pub fn redacted_database_url(&self) -> String {
        match self.credentials() {
            Some((user, _)) => format!(
                "mongodb://{}:****@{}",
                urlencoding::encode(user),
                self.host()
            ),
            None => format!("mongodb://{}", self.host()),
        }
    }
}

fn with_port(host: &str, port: u16) -> String {
    match host.rfind(']') {
        // [::1] or [::1]:27017
        Some(end) if host[end + 1..].starts_with(':') => host.to_string(),
        Some(_) => format!("{}:{}", host, port),
        None => match host.matches(':').count() {
            0 => format!("{}:{}", host, port),
            1 => host.to_string(),
            // bare IPv6 literal
            _ => format!("[{}]:{}", host, port),
        },
    }
}

fn default_seed_file() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("songs.json")
}
