// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub export: Export,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            export: Export::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub page_size: Option<usize>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            page_size: Some(bookman_store::DEFAULT_PAGE_SIZE),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Export {
    pub filename: Option<String>,
}

impl Default for Export {
    fn default() -> Self {
        Self {
            filename: Some(bookman_store::DEFAULT_EXPORT_FILENAME.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("BOOKMAN_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set BOOKMAN_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(bookman_store::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is missing `version = 1`; move values under [ui] and [export]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(page_size) = self.ui.page_size
            && page_size == 0
        {
            bail!(
                "ui.page_size in {} must be positive, got 0",
                path.display()
            );
        }

        if let Some(filename) = &self.export.filename {
            if filename.trim().is_empty() {
                bail!("export.filename in {} must not be empty", path.display());
            }
            bookman_store::validate_csv_path(Path::new(filename)).with_context(|| {
                format!("export.filename in {} is not usable", path.display())
            })?;
        }

        Ok(())
    }

    pub fn page_size(&self) -> usize {
        self.ui.page_size.unwrap_or(bookman_store::DEFAULT_PAGE_SIZE)
    }

    pub fn export_filename(&self) -> &str {
        self.export
            .filename
            .as_deref()
            .unwrap_or(bookman_store::DEFAULT_EXPORT_FILENAME)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# bookman config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\npage_size = {}\n\n[export]\nfilename = \"{}\"\n",
            path.display(),
            bookman_store::DEFAULT_PAGE_SIZE,
            bookman_store::DEFAULT_EXPORT_FILENAME,
        )
    }
}
