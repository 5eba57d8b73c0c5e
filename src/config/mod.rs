use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub relay: RelayConfig,
    pub transfer: TransferConfig,
    pub client: ClientConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub port: u16,
    pub max_request_size_bytes: usize,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferBackend {
    Ftp,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    pub backend: TransferBackend,
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub connect_timeout_secs: u64,
    /// Directory on the transfer server that receives every upload
    pub remote_dir: String,
    /// Root directory for the local backend
    pub local_root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub relay_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub ttl_minutes: i64,
    pub config_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Relay overrides
        if let Some(port) = env::var("RELAY_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.relay.port = port;
        }
        if let Ok(v) = env::var("RELAY_MAX_REQUEST_SIZE_BYTES") {
            self.relay.max_request_size_bytes = v.parse().unwrap_or(self.relay.max_request_size_bytes);
        }
        if let Ok(v) = env::var("RELAY_CORS_ORIGINS") {
            self.relay.cors_origins = v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        }

        // Transfer overrides
        if let Ok(v) = env::var("TRANSFER_BACKEND") {
            match v.to_ascii_lowercase().as_str() {
                "ftp" => self.transfer.backend = TransferBackend::Ftp,
                "local" => self.transfer.backend = TransferBackend::Local,
                other => tracing::warn!("Ignoring unknown TRANSFER_BACKEND '{}'", other),
            }
        }
        if let Ok(v) = env::var("FTP_HOST") {
            self.transfer.host = v;
        }
        if let Ok(v) = env::var("FTP_PORT") {
            self.transfer.port = v.parse().unwrap_or(self.transfer.port);
        }
        if let Ok(v) = env::var("FTP_USER") {
            self.transfer.user = v;
        }
        if let Ok(v) = env::var("FTP_PASSWORD") {
            self.transfer.password = v;
        }
        if let Ok(v) = env::var("FTP_CONNECT_TIMEOUT_SECS") {
            self.transfer.connect_timeout_secs = v.parse().unwrap_or(self.transfer.connect_timeout_secs);
        }
        if let Ok(v) = env::var("TRANSFER_REMOTE_DIR") {
            self.transfer.remote_dir = v;
        }
        if let Ok(v) = env::var("TRANSFER_LOCAL_ROOT") {
            self.transfer.local_root = PathBuf::from(v);
        }

        // Client overrides
        if let Ok(v) = env::var("TLMS_API_URL") {
            self.client.api_base_url = normalize_base_url(&v);
        }
        if let Ok(v) = env::var("TLMS_RELAY_URL") {
            self.client.relay_url = normalize_base_url(&v);
        }
        if let Ok(v) = env::var("TLMS_REQUEST_TIMEOUT_SECS") {
            self.client.request_timeout_secs = v.parse().unwrap_or(self.client.request_timeout_secs);
        }

        // Session overrides
        if let Ok(v) = env::var("TLMS_SESSION_TTL_MINUTES") {
            self.session.ttl_minutes = v.parse().unwrap_or(self.session.ttl_minutes);
        }
        if let Ok(v) = env::var("TLMS_CONFIG_DIR") {
            self.session.config_dir = Some(PathBuf::from(v));
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            relay: RelayConfig {
                port: 3001,
                max_request_size_bytes: 25 * 1024 * 1024, // 25MB
                cors_origins: Vec::new(),
            },
            transfer: TransferConfig {
                backend: TransferBackend::Local,
                host: "localhost".to_string(),
                port: 21,
                user: String::new(),
                password: String::new(),
                connect_timeout_secs: 10,
                remote_dir: "/uploads".to_string(),
                local_root: PathBuf::from("relay-storage"),
            },
            client: ClientConfig {
                api_base_url: "http://localhost:8080".to_string(),
                relay_url: "http://localhost:3001".to_string(),
                request_timeout_secs: 30,
            },
            session: SessionConfig {
                ttl_minutes: 60,
                config_dir: None,
            },
        }
    }

    pub fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.relay.max_request_size_bytes = 10 * 1024 * 1024;
        config.transfer.backend = TransferBackend::Ftp;
        config.client.request_timeout_secs = 20;
        config
    }

    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.relay.max_request_size_bytes = 10 * 1024 * 1024;
        config.transfer.backend = TransferBackend::Ftp;
        config.transfer.connect_timeout_secs = 5;
        config.client.request_timeout_secs = 15;
        config
    }
}

/// Trim whitespace and trailing slashes so paths can be appended with `/`.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Directory holding the persisted client session.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let dir = match &config().session.config_dir {
        Some(dir) => dir.clone(),
        None => {
            let home = env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
            PathBuf::from(home).join(".config").join("tlms")
        }
    };

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
