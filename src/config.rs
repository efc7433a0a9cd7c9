//! Runtime configuration: where the CSV tables live and how the API is served.

use anyhow::{Result, bail};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "assets";
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/student_analytics.log";

/// Directories searched for the source CSVs, preferred first.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub data_dir: PathBuf,
    pub fallback_dir: Option<PathBuf>,
}

impl DataPaths {
    pub fn new(data_dir: impl Into<PathBuf>, fallback_dir: Option<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            fallback_dir,
        }
    }

    /// Returns the first existing location of `file_name`.
    ///
    /// # Errors
    ///
    /// Fails when the file is in neither the data directory nor the fallback.
    pub fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        let preferred = self.data_dir.join(file_name);
        if preferred.exists() {
            return Ok(preferred);
        }

        match &self.fallback_dir {
            Some(dir) => {
                let fallback = dir.join(file_name);
                if fallback.exists() {
                    return Ok(fallback);
                }
                bail!(
                    "Could not find CSV at {} or {}",
                    preferred.display(),
                    fallback.display()
                )
            }
            None => bail!("Could not find CSV at {}", preferred.display()),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR, None)
    }
}

/// Settings for the HTTP API.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Origin allowed by CORS, e.g. the dev server of the web frontend.
    pub frontend_origin: String,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            frontend_origin: DEFAULT_FRONTEND_ORIGIN.to_string(),
        }
    }
}

/// Splits a log file path into the directory and file name used by the
/// rolling appender.
pub fn log_file_location(path: &str) -> (PathBuf, PathBuf) {
    let path = Path::new(path);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let file = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("student_analytics.log"));
    (dir.to_path_buf(), file)
}
