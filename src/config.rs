use anyhow::{bail, Context, Result};
use graph::print::{PrintOptions, MIN_LONG_EDGE_THRESHOLD};
use graph::render::Charset;
use serde::Deserialize;
use std::path::Path;

/// Settings read from the TOML config file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub print: PrintOptions,
    pub fragments: FragmentConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FragmentConfig {
    /// Collapse every fragment as soon as the graph is loaded
    pub collapse_on_load: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub charset: Charset,
    pub color: bool,
    /// Columns available for the commit label
    pub label_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            charset: Charset::Utf8,
            color: true,
            label_width: 50,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.print.long_edge_threshold < MIN_LONG_EDGE_THRESHOLD {
            bail!(
                "print.long_edge_threshold must be at least {}, got {}",
                MIN_LONG_EDGE_THRESHOLD,
                self.print.long_edge_threshold
            );
        }
        Ok(())
    }
}
