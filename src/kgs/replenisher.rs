use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::generate;
use crate::{config::KgsConfig, db::KgsRepo};

/// Starts the KGS replenisher as a background task (§4.2).
///
/// Each tick: read `count_unused()`; if below `low_water_mark`, generate
/// `replenish_batch` more keys. Generation errors are logged and retried on
/// the next tick; they never propagate to the request path. Cancellable via
/// `shutdown`.
pub async fn start_replenisher(repo: Arc<dyn KgsRepo>, config: KgsConfig, shutdown: CancellationToken) {
    tracing::info!(
        low_water_mark = config.low_water_mark,
        replenish_batch = config.replenish_batch,
        interval_secs = config.replenish_interval_secs,
        "starting KGS replenisher"
    );

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("KGS replenisher shutting down");
                return;
            }
            _ = tokio::time::sleep(config.replenish_interval()) => {}
        }

        match repo.count_unused().await {
            Ok(count) if count < config.low_water_mark => {
                match generate(&repo, config.key_length, config.replenish_batch).await {
                    Ok(inserted) => {
                        tracing::info!(count_before = count, inserted, "replenished KGS key pool");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "KGS replenishment failed");
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "failed to read KGS pool size");
            }
        }
    }
}
