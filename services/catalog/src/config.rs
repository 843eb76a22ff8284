use std::path::PathBuf;

use anyhow::{bail, Result};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub static_root: PathBuf,
    pub registry_path: Option<PathBuf>,
    pub listing_csv: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = var("CATALOG_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let static_root = PathBuf::from(var("CATALOG_STATIC_ROOT").unwrap_or_else(|| "static".to_string()));
        let registry_path = non_empty(var("CATALOG_REGISTRY")).map(PathBuf::from);
        let listing_csv = non_empty(var("CATALOG_LISTING_CSV")).map(PathBuf::from);

        // Tiny sanity checks (fail fast, fail loud)
        if !static_root.is_dir() {
            bail!("CATALOG_STATIC_ROOT is not a directory: {}", static_root.display());
        }
        if let Some(p) = &registry_path {
            if !p.is_file() {
                bail!("CATALOG_REGISTRY does not point to a file: {}", p.display());
            }
        }
        if let Some(p) = &listing_csv {
            if !p.is_file() {
                bail!("CATALOG_LISTING_CSV does not point to a file: {}", p.display());
            }
        }

        Ok(Self {
            bind_addr,
            static_root,
            registry_path,
            listing_csv,
        })
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}
