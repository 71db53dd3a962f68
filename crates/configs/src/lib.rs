use anyhow::anyhow;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub calculator: CalculatorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: Some(4),
            frontend_dir: default_frontend_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: default_data_dir(),
            file_name: default_file_name(),
        }
    }
}

impl StorageConfig {
    pub fn file_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join(&self.file_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default = "default_annual_salary")]
    pub annual_salary: f64,
    #[serde(default = "default_start_date")]
    pub start_date: String,
    #[serde(default = "default_person_name")]
    pub person_name: String,
    #[serde(default = "default_image_url")]
    pub image_url: String,
    #[serde(default = "default_context_text")]
    pub context_text: String,
    #[serde(default = "default_display_decimals")]
    pub display_decimals: u8,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            annual_salary: default_annual_salary(),
            start_date: default_start_date(),
            person_name: default_person_name(),
            image_url: default_image_url(),
            context_text: default_context_text(),
            display_decimals: default_display_decimals(),
        }
    }
}

fn default_frontend_dir() -> String { "frontend".into() }
fn default_data_dir() -> String { "data".into() }
fn default_file_name() -> String { "global_object.json".into() }
fn default_annual_salary() -> f64 { 470_000.0 }
fn default_start_date() -> String { "2024-11-11T09:00:00Z".into() }
fn default_person_name() -> String { "Andrew Coster".into() }
fn default_image_url() -> String {
    "https://www.taxpayers.org.nz/assets/News/Comms/Andrew-Coster-Police.jpg".into()
}
fn default_context_text() -> String {
    "The Taxpayers' Union is calling on the Public Service Commissioner to end \
     the paid garden leave of the Social Investment Agency chief executive \
     following the release of the Independent Police Conduct Authority report. \
     Every hour on the public payroll is counted here."
        .into()
}
fn default_display_decimals() -> u8 { 2 }

const MAX_DISPLAY_DECIMALS: u8 = 6;

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Like [`AppConfig::load_and_validate`], but a missing config file falls
    /// back to defaults overlaid with `SERVER_HOST`, `SERVER_PORT`, `DATA_DIR`
    /// and `FRONTEND_DIR`.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => {
                let mut cfg = AppConfig::default();
                cfg.apply_env();
                cfg
            }
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Ok(dir) = std::env::var("FRONTEND_DIR") {
            self.server.frontend_dir = dir;
        }
        if let Ok(dir) = std::env::var("DATA_DIR") {
            self.storage.data_dir = dir;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize();
        self.calculator.validate()?;
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
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
        if self.frontend_dir.trim().is_empty() {
            self.frontend_dir = default_frontend_dir();
        }
        Ok(())
    }
}

impl StorageConfig {
    fn normalize(&mut self) {
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
        if self.file_name.trim().is_empty() {
            self.file_name = default_file_name();
        }
    }
}

impl CalculatorConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.annual_salary.is_finite() || self.annual_salary < 0.0 {
            return Err(anyhow!("calculator.annual_salary must be a non-negative number"));
        }
        self.start_instant()?;
        if self.display_decimals > MAX_DISPLAY_DECIMALS {
            return Err(anyhow!("calculator.display_decimals must be <= {MAX_DISPLAY_DECIMALS}"));
        }
        Ok(())
    }

    /// Parsed `start_date`.
    pub fn start_instant(&self) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.start_date)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| anyhow!("calculator.start_date is not RFC 3339 ({}): {e}", self.start_date))
    }
}
