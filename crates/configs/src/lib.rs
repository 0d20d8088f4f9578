use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Snapshot file holding every accepted signup.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Directory served at `/` (landing page and assets).
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file(), static_dir: default_static_dir() }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 8080 }
fn default_data_file() -> PathBuf { PathBuf::from("./data/waitlist.json") }
fn default_static_dir() -> PathBuf { PathBuf::from("static") }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`); when no file is readable, build the
    /// configuration from environment variables instead.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(_) => Self::from_env(),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// `SERVER_HOST`, `PORT`, `TOKIO_WORKER_THREADS`, `WAITLIST_DATA_FILE`, `STATIC_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(host) = lookup("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg.server.worker_threads = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok());
        if let Some(file) = lookup("WAITLIST_DATA_FILE") {
            cfg.storage.data_file = PathBuf::from(file);
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            cfg.storage.static_dir = PathBuf::from(dir);
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(anyhow!("storage.data_file must not be empty"));
        }
        if self.data_file.file_name().is_none() {
            return Err(anyhow!("storage.data_file must name a file, got {}", self.data_file.display()));
        }
        Ok(())
    }

    /// Directory that must exist before the snapshot file can be written.
    pub fn data_dir(&self) -> PathBuf {
        match self.data_file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_uses_defaults() -> Result<()> {
        let mut cfg = parse("")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.bind_addr(), "0.0.0.0:8080");
        assert_eq!(cfg.storage.data_file, PathBuf::from("./data/waitlist.json"));
        assert_eq!(cfg.storage.data_dir(), PathBuf::from("./data"));
        Ok(())
    }

    #[test]
    fn toml_overrides_are_applied() -> Result<()> {
        let mut cfg = parse(
            r#"
            [server]
            host = "  "
            port = 9000
            worker_threads = 0

            [storage]
            data_file = "/var/lib/waitlist/entries.json"
            static_dir = "public"
            "#,
        )?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.worker_threads, None);
        assert_eq!(cfg.storage.data_dir(), PathBuf::from("/var/lib/waitlist"));
        assert_eq!(cfg.storage.static_dir, PathBuf::from("public"));
        Ok(())
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut cfg = parse("[server]\nport = 0\n").expect("parse");
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn empty_data_file_is_rejected() {
        let mut cfg = parse("[storage]\ndata_file = \"\"\n").expect("parse");
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn env_lookup_falls_back_per_key() {
        let vars: HashMap<&str, &str> = [("PORT", "3000"), ("WAITLIST_DATA_FILE", "waitlist.json"), ("TOKIO_WORKER_THREADS", "x")]
            .into_iter()
            .collect();
        let cfg = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.worker_threads, None);
        assert_eq!(cfg.storage.data_dir(), PathBuf::from("."));
    }
}
