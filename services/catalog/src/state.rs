use std::sync::Arc;

use anyhow::{Context, Result};
use registry::{load_listing_file, ListingRow, Registry};
use tracing::info;

use crate::config::AppConfig;
use crate::presenter::{entries_from_listing, entries_from_registry, ListingEntry};
use crate::prober::Prober;

pub type SharedState = Arc<AppState>;

/// Everything a request needs. Built once at startup, read-only afterwards.
pub struct AppState {
    pub config: AppConfig,
    pub registry: Arc<Registry>,
    pub prober: Prober,
    pub listing: Vec<ListingEntry>,
}

impl AppState {
    /// `listing` replaces the registry as the page source when given.
    pub fn new(config: AppConfig, registry: Registry, listing: Option<Vec<ListingRow>>) -> Self {
        let registry = Arc::new(registry);
        let listing = match listing {
            Some(rows) => entries_from_listing(rows, &registry),
            None => entries_from_registry(&registry),
        };
        let prober = Prober::new(registry.clone(), config.static_root.clone());
        Self {
            config,
            registry,
            prober,
            listing,
        }
    }

    pub fn from_config(config: AppConfig) -> Result<Self> {
        let registry = match &config.registry_path {
            Some(p) => Registry::load(p)
                .with_context(|| format!("Failed to load registry from {}", p.display()))?,
            None => Registry::builtin().context("Built-in registry is invalid")?,
        };
        info!(datasets = registry.len(), "registry: loaded");

        let listing = match &config.listing_csv {
            Some(p) => {
                let rows = load_listing_file(p)
                    .with_context(|| format!("Failed to load listing from {}", p.display()))?;
                info!(rows = rows.len(), path = %p.display(), "listing: loaded from csv");
                Some(rows)
            }
            None => None,
        };

        Ok(Self::new(config, registry, listing))
    }
}
