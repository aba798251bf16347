//! Fixed-delay poll scheduling

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use corridorwatch_core::prelude::*;
use tokio::time::sleep;
use tracing::{error, info};

/// Delay before the first cycle after startup
pub const INITIAL_DELAY: Duration = Duration::from_secs(5);

/// Runs cycles until `shutdown` resolves. The delay is measured from the end
/// of one cycle to the start of the next, so cycles never overlap.
pub async fn run<T, S>(
    poller: Arc<Poller<T, S>>,
    initial_delay: Duration,
    shutdown: impl Future<Output = ()>,
) where
    T: Transport + 'static,
    S: SampleStore + 'static,
{
    let interval = Duration::from_secs(poller.config().poll_seconds);
    info!(
        "Scheduling {} corridors every {}s, first poll in {}s",
        poller.config().corridors.len(),
        interval.as_secs(),
        initial_delay.as_secs()
    );

    let cycles = async {
        sleep(initial_delay).await;
        loop {
            run_cycle(&poller).await;
            sleep(interval).await;
        }
    };

    tokio::select! {
        _ = cycles => {}
        () = shutdown => info!("Scheduler stopped"),
    }
}

/// One cycle in its own task so that a panic inside it cannot take the
/// scheduler down
async fn run_cycle<T, S>(poller: &Arc<Poller<T, S>>)
where
    T: Transport + 'static,
    S: SampleStore + 'static,
{
    let poller = Arc::clone(poller);
    let handle = tokio::spawn(async move { poller.poll_cycle().await });

    if let Err(e) = handle.await {
        error!("Poll cycle aborted: {e}");
    }
}
