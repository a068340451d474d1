//! Periodic catalog refresh.
//!
//! A background task reloads the catalog on a fixed interval and swaps it
//! into [`AppState`]. A failed load keeps the previous snapshot.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use lepton_catalog::Catalog;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::state::AppState;

/// Spawn a task that calls `load` every `every` and publishes the result.
///
/// The first load happens one interval after spawning; the caller is
/// expected to have attempted an initial load already.
pub fn spawn_refresh<F, Fut, E>(state: Arc<AppState>, every: Duration, load: F) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Catalog, E>> + Send,
    E: Display,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            tracing::debug!("Refreshing catalog");
            let outcome = load().await.map_err(|e| e.to_string());
            match outcome {
                Ok(catalog) => state.replace(catalog).await,
                Err(reason) => state.record_failure(reason).await,
            }
        }
    })
}
