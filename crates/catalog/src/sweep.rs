//! Overdue sweep.

use crate::Catalog;
use crate::models::Book;
use std::sync::Arc;
use std::time::Duration;
use time::Date;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// How often a long-running session re-runs the sweep.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Recompute every overdue flag against `today`. Returns the overdue count.
pub(crate) fn refresh(books: &mut [Book], today: Date) -> usize {
    books.iter_mut().map(|book| book.refresh_overdue(today)).filter(|&overdue| overdue).count()
}

/// Run [`Catalog::sweep_overdue`] every `period` until the task is aborted.
///
/// The first run happens one period after spawning; opening the catalog
/// already swept once. Failures are logged and the loop carries on.
pub fn spawn_sweeper(catalog: Arc<Mutex<Catalog>>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            match catalog.lock().await.sweep_overdue().await {
                Ok(overdue) => tracing::debug!(overdue, "Periodic sweep finished"),
                Err(err) => tracing::warn!(?err, "Periodic sweep failed"),
            }
        }
    })
}
