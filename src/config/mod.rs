pub mod settings;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub last_folder: Option<PathBuf>,
    pub auto_load_last_folder: bool,
    /// Body lines shown per file in the listing; 0 shows the whole body.
    pub preview_line_limit: usize,
    pub batch_mode_enabled: bool,
    pub window_size: (f64, f64),
    pub window_position: (f64, f64),
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        settings::load_config(None)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            last_folder: None,
            auto_load_last_folder: true,
            preview_line_limit: 50,
            batch_mode_enabled: true,
            window_size: (1000.0, 750.0),
            window_position: (100.0, 100.0),
        }
    }
}
