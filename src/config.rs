use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::Context;
use color_eyre::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub house_ids: Vec<String>,
    pub typetalk_topic_id: u64,
    pub typetalk_token: String,
    pub redis_network: String,
    pub redis_port: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw).wrap_err("failed to parse config")
    }
}

/// `conf.json` next to the executable.
pub fn default_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().wrap_err("failed to resolve executable path")?;
    Ok(exe.with_file_name("conf.json"))
}
