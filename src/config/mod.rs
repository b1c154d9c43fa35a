// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Application configuration.
//!
//! This module manages the configuration file holding the database settings
//! and the location of the text log.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{db::DbConfig, logging::LogSink};

const CONFIG_NAME: &str = "odds";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub version: u32,
    pub log_file: Option<PathBuf>,
    pub database: DbConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            log_file: None,
            database: DbConfig::default(),
        }
    }
}

impl AppConfig {
    /// The text log configured by `log_file`, if any.
    pub fn log_sink(&self) -> Option<LogSink> {
        self.log_file.as_ref().map(LogSink::new)
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub fn save_config(cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}

/// Loads the configuration from an explicit file, falling back to defaults.
pub fn load_config_from(path: &Path) -> AppConfig {
    confy::load_path(path).unwrap_or_default()
}

pub fn save_config_to(path: &Path, cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store_path(path, cfg)
}
