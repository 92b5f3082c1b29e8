mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./docbatch.toml",
        "./config.toml",
        "~/.config/docbatch/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Configured default output directory with `~` expanded.
pub fn configured_output_dir(config: &Config) -> Option<PathBuf> {
    config
        .conversion
        .output_dir
        .as_ref()
        .map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).as_ref()))
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.image.dpi == 0 {
        anyhow::bail!("image.dpi must be greater than 0");
    }

    if !(1..=100).contains(&config.image.jpeg_quality) {
        anyhow::bail!(
            "image.jpeg_quality must be between 1 and 100, got {}",
            config.image.jpeg_quality
        );
    }

    for (key, value) in [
        ("word_max_concurrency", config.conversion.word_max_concurrency),
        ("pdf_max_concurrency", config.conversion.pdf_max_concurrency),
    ] {
        if value == Some(0) {
            anyhow::bail!("conversion.{} must be at least 1", key);
        }
    }

    for (name, path) in [
        ("soffice", &config.tools.soffice),
        ("pdfinfo", &config.tools.pdfinfo),
        ("pdftoppm", &config.tools.pdftoppm),
    ] {
        if let Some(path) = path {
            if !path.exists() {
                tracing::warn!("Configured {} path does not exist: {:?}", name, path);
            }
        }
    }

    Ok(())
}
