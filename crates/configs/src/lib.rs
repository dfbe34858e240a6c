use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Allowed CORS origins; empty means permissive.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8002, worker_threads: Some(4), cors_origins: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Run pending migrations when the server starts.
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            auto_migrate: true,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the external login service.
    #[serde(default)]
    pub jwt_secret: String,
    /// Header carrying the agency (tenant) identifier.
    #[serde(default = "default_tenant_header")]
    pub tenant_header: String,
    /// Fall back to a fixed development secret when none is configured (`ALLOW_DEV_SECRET`).
    #[serde(default)]
    pub allow_dev_secret: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), tenant_header: default_tenant_header(), allow_dev_secret: false }
    }
}

fn default_tenant_header() -> String { "X-Agency-Id".to_string() }

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    #[default]
    Local,
    S3,
}

impl std::str::FromStr for StorageBackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "fs" | "filesystem" => Ok(Self::Local),
            "s3" => Ok(Self::S3),
            other => Err(anyhow!("unknown storage backend `{other}` (expected local or s3)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackendKind,
    #[serde(default = "default_local_root")]
    pub local_root: String,
    #[serde(default)]
    pub s3_bucket: Option<String>,
    #[serde(default)]
    pub s3_region: Option<String>,
    /// Endpoint override, e.g. LocalStack or MinIO.
    #[serde(default)]
    pub s3_endpoint: Option<String>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::Local,
            local_root: default_local_root(),
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_local_root() -> String { "uploads".to_string() }
fn default_max_upload_bytes() -> usize { 25 * 1024 * 1024 }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) when present, otherwise start from defaults;
    /// then fill gaps from the environment and validate.
    pub fn load_and_validate() -> Result<Self> {
        let path = config_path();
        let mut cfg = if Path::new(&path).exists() { load_from_file(&path)? } else { AppConfig::default() };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        self.storage.normalize_from_env()?;
        self.storage.validate()?;
        Ok(())
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.auth.jwt_secret == DEV_JWT_SECRET
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if let Some(host) = env_nonempty("HOST") {
            self.host = host;
        }
        if let Some(port) = env_nonempty("PORT") {
            self.port = port.parse().map_err(|_| anyhow!("PORT must be a number in 1..=65535"))?;
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Some(url) = env_nonempty("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if let Some(flag) = env_nonempty("ALLOW_DEV_SECRET") {
            self.allow_dev_secret = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        let from_env = env_nonempty("SECRET_KEY").or_else(|| env_nonempty("JWT_SECRET"));
        self.fill_secret(from_env);
        if self.tenant_header.trim().is_empty() {
            self.tenant_header = default_tenant_header();
        }
    }

    /// The dev secret is only used when explicitly allowed.
    fn fill_secret(&mut self, from_env: Option<String>) {
        if !self.jwt_secret.trim().is_empty() {
            return;
        }
        if let Some(secret) = from_env {
            self.jwt_secret = secret;
        } else if self.allow_dev_secret {
            self.jwt_secret = DEV_JWT_SECRET.to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml, SECRET_KEY or JWT_SECRET"));
        }
        if self.jwt_secret == DEV_JWT_SECRET && !self.allow_dev_secret {
            return Err(anyhow!("auth.jwt_secret is the development secret; set ALLOW_DEV_SECRET=true to accept it"));
        }
        let valid_header = self
            .tenant_header
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid_header {
            return Err(anyhow!("auth.tenant_header `{}` is not a valid header name", self.tenant_header));
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) -> Result<()> {
        if let Some(kind) = env_nonempty("STORAGE_BACKEND") {
            self.backend = kind.parse()?;
        }
        if let Some(root) = env_nonempty("UPLOAD_DIR") {
            self.local_root = root;
        }
        if self.s3_bucket.is_none() {
            self.s3_bucket = env_nonempty("S3_BUCKET_NAME");
        }
        if self.s3_region.is_none() {
            self.s3_region = env_nonempty("AWS_REGION");
        }
        if self.s3_endpoint.is_none() {
            self.s3_endpoint = env_nonempty("S3_ENDPOINT");
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        match self.backend {
            StorageBackendKind::Local if self.local_root.trim().is_empty() => {
                Err(anyhow!("storage.local_root is required for the local backend"))
            }
            StorageBackendKind::S3 if self.s3_bucket.as_deref().map_or(true, |b| b.trim().is_empty()) => {
                Err(anyhow!("storage.s3_bucket (or S3_BUCKET_NAME) is required for the s3 backend"))
            }
            _ if self.max_upload_bytes == 0 => Err(anyhow!("storage.max_upload_bytes must be positive")),
            _ => Ok(()),
        }
    }
}
