use crate::{common::system_page_size, error::VRingBufError};
use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::ffi::CString;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Requested capacity in bytes, rounded up to the page size.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Rounding granularity. Must be a multiple of the system page size;
    /// `None` uses the system page size.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Name given to the backing memfd, visible in `/proc/<pid>/maps`.
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_capacity() -> usize {
    64 << 10
}

fn default_name() -> String {
    "vringbuf".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            capacity: default_capacity(),
            page_size: None,
            name: default_name(),
        }
    }
}

impl Config {
    pub fn new(capacity: usize) -> Self {
        Config {
            capacity,
            ..Config::default()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .wrap_err_with(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> eyre::Result<Self> {
        let config: Config =
            toml::from_str(content).wrap_err("failed to parse ring buffer config")?;
        Ok(config)
    }

    pub fn resolved_page_size(&self) -> Result<usize, VRingBufError> {
        let system = system_page_size();
        match self.page_size {
            None => Ok(system),
            Some(page_size) if page_size != 0 && page_size % system == 0 => Ok(page_size),
            Some(page_size) => Err(VRingBufError::InvalidPageSize(page_size, system)),
        }
    }

    pub(crate) fn memfd_name(&self) -> Result<CString, VRingBufError> {
        CString::new(self.name.as_str())
            .map_err(|_| VRingBufError::InvalidName(self.name.clone()))
    }
}
