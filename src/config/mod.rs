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
//! This module loads the YAML configuration document that supplies the site
//! addresses and footer text substituted into the info and wiki templates.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file.
pub(crate) const CONFIG_ENV: &str = "LIVEWIKI_CONFIG";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AppConfig {
    pub base_domain: String,
    pub wiki_path: String,
    pub stream_path: String,
    pub download_path: String,
    pub footer: String,
}

impl AppConfig {
    /// Checks required keys and fills in the paths derived from the domain.
    fn validated(mut self) -> Result<Self> {
        if self.base_domain.is_empty() {
            bail!("baseDomain config field missing");
        }
        if self.stream_path.is_empty() {
            bail!("streamPath config field missing");
        }
        if self.footer.is_empty() {
            bail!("footer config field missing");
        }

        if self.wiki_path.is_empty() {
            self.wiki_path = format!("{}/wiki", self.base_domain);
        }
        if self.download_path.is_empty() {
            self.download_path = format!("{}/downloads", self.base_domain);
        }

        Ok(self)
    }
}

/// Loads and validates the configuration file at `path`.
pub(crate) fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = path else {
        bail!("config path missing, set --config or the {} environment variable", CONFIG_ENV);
    };

    // confy would write a default file in place of a missing one.
    if !path.is_file() {
        bail!("config file {} does not exist", path.display());
    }

    let config: AppConfig = confy::load_path(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;

    config.validated()
}
