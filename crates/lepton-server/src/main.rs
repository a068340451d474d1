//! Lepton query service binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `lepton-config.yaml` (or `$LEPTON_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Load the catalog from the configured source
//! 4. Start the periodic refresh task, if configured
//! 5. Serve HTTP until `Ctrl-C`

mod source;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use lepton_api::{AppState, ServerConfig, spawn_refresh, start_server};
use lepton_catalog::Catalog;
use lepton_engine::{LeptonConfig, LogFormat};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::source::CatalogSource;

/// Config file used when `LEPTON_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "lepton-config.yaml";

/// Number of regions listed in the startup diagnostics.
const SMALLEST_REGIONS_LOGGED: usize = 10;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the initial file load, or the
/// server fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Configuration.
    let config_path = std::env::var("LEPTON_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, config_found) = if config_path.exists() {
        let config = LeptonConfig::from_file(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?;
        (config, true)
    } else {
        let mut config = LeptonConfig::default();
        config.apply_env_overrides().context("applying environment overrides")?;
        config.validate().context("validating configuration")?;
        (config, false)
    };

    // 2. Logging.
    init_tracing(&config);
    info!(
        path = %config_path.display(),
        found = config_found,
        base_path = %config.server.base_path,
        source = ?config.source.kind,
        "lepton-server starting"
    );

    // 3. Catalog.
    let source = CatalogSource::from_config(&config.source).context("configuring catalog source")?;
    let state = match source.load().await {
        Ok(catalog) => {
            let stats = catalog.stats();
            info!(
                places = stats.places,
                regions = stats.regions,
                categories = stats.categories,
                source = %source.describe(),
                "Catalog loaded"
            );
            log_catalog_shape(&catalog);
            AppState::new(config.clone(), catalog)
        }
        // A dataset file that fails to load is a deployment error; a
        // database may come up later and is picked up by the refresh task.
        Err(e) if matches!(source, CatalogSource::Postgres { .. })
            && config.source.refresh_interval_secs > 0 =>
        {
            tracing::error!(error = %e, "Initial catalog load failed, serving 502 until a refresh succeeds");
            AppState::unavailable(config.clone(), e.to_string())
        }
        Err(e) => return Err(e).context("loading catalog"),
    };
    let state = Arc::new(state);

    // 4. Refresh.
    let refresh = (config.source.refresh_interval_secs > 0).then(|| {
        let every = Duration::from_secs(config.source.refresh_interval_secs);
        info!(every_secs = every.as_secs(), "Catalog refresh enabled");
        let source = source.clone();
        spawn_refresh(Arc::clone(&state), every, move || {
            let source = source.clone();
            async move { source.load().await }
        })
    });

    // 5. Serve.
    let server_config = ServerConfig::from(&config.server);
    let result = start_server(&server_config, state).await;

    if let Some(handle) = refresh {
        handle.abort();
    }
    if let CatalogSource::Postgres { pool, .. } = &source {
        pool.close().await;
    }

    result.context("running HTTP server")
}

/// Debug-level breakdown of a freshly loaded catalog: the narrowest
/// regions with their place in the hierarchy, and places per category.
fn log_catalog_shape(catalog: &Catalog) {
    let regions = catalog.regions();
    for (id, area) in regions.smallest(SMALLEST_REGIONS_LOGGED) {
        tracing::debug!(
            region = %id,
            name = regions.get(id).map_or("", |r| r.name.as_str()),
            depth = regions.ancestors(id).len(),
            children = regions.children(id).len(),
            area,
            "Small region"
        );
    }
    for (category, count) in catalog.places().category_counts() {
        tracing::debug!(category, count, "Places per category");
    }
}

fn init_tracing(config: &LeptonConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
