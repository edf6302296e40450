//! One polling run over every registered source.
//!
//! A bounded pool of worker threads fetches sources and sends results to the
//! coordinating thread over an [`mpsc`] channel.  The coordinator is the only
//! code that touches the [`SeenSet`] and the [`ResultIndex`]: it reconciles
//! each result as it arrives, so no lock is needed and no worker ever sees
//! another worker's writes.
//!
//! ```text
//!  worker 0 ─┐
//!  worker 1 ─┼─ PollMsg ──► coordinator ──► reconcile ──► ResultIndex
//!  worker n ─┘  (channel)        │
//!                                └──────► SeenSet
//! ```
//!
//! [`run`] returns only after every worker has finished.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::dedup::reconcile;
use crate::error::{SourceError, StoreError};
use crate::index::{ResultIndex, RunOutput};
use crate::registry::SourceRegistry;
use crate::seen::SeenSet;
use crate::source::{FeedFetcher, FeedSnapshot, FetchedFeed};

/// Sent from a worker to the coordinator once a source is done.
pub struct PollMsg {
    pub position: usize,
    pub outcome: Result<FetchedFeed, SourceError>,
}

/// What a run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    pub index: ResultIndex,
    /// Sources fetched and decoded, with or without new items.
    pub checked: usize,
    /// Sources that failed, by position.
    pub failed: Vec<(usize, SourceError)>,
}

impl RunReport {
    pub fn has_updates(&self) -> bool {
        !self.index.is_empty()
    }

    /// Write the run output into `output_dir`, then save `seen` to `seen_path`.
    ///
    /// Does nothing when no source had new items: a run where every fetch
    /// failed must not be mistaken for one where everything was already seen.
    /// The seen-set goes last so a failed output write leaves it untouched and
    /// the next run reports the same entries again.  Returns the output file
    /// path when one was written.
    pub fn persist(
        &self,
        registry: &SourceRegistry,
        seen: &SeenSet,
        seen_path: &Path,
        output_dir: &Path,
        run_micros: i64,
    ) -> Result<Option<PathBuf>, StoreError> {
        if !self.has_updates() {
            return Ok(None);
        }
        let path = RunOutput::new(registry, &self.index).write(output_dir, run_micros)?;
        seen.save(seen_path)?;
        Ok(Some(path))
    }
}

/// Fetch every source in `registry` and reconcile the results against `seen`.
///
/// At most `workers` sources are in flight at once.  A failing source is
/// logged and recorded in [`RunReport::failed`]; it never stops the others,
/// and neither does a fetcher that panics.
pub fn run<F>(
    registry: &SourceRegistry,
    fetcher: &F,
    seen: &mut SeenSet,
    workers: usize,
) -> RunReport
where
    F: FeedFetcher + ?Sized,
{
    let mut report = RunReport::default();
    let total = registry.len();
    if total == 0 {
        return report;
    }

    let pool = workers.clamp(1, total);
    let cursor = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<PollMsg>();

    info!(sources = total, workers = pool, "starting run");

    thread::scope(|scope| {
        for _ in 0..pool {
            let tx = tx.clone();
            let cursor = &cursor;
            scope.spawn(move || loop {
                let position = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(address) = registry.address(position) else {
                    return;
                };
                debug!(position, address, "fetching");
                let outcome = fetch_guarded(fetcher, address);
                // Only fails if the coordinator panicked.
                if tx.send(PollMsg { position, outcome }).is_err() {
                    return;
                }
            });
        }
        // Workers hold the remaining senders; the loop below ends when the
        // last of them exits.
        drop(tx);

        for msg in rx {
            record(registry, seen, &mut report, msg);
        }
    });

    info!(
        checked = report.checked,
        updated = report.index.len(),
        failed = report.failed.len(),
        "run finished"
    );
    report
}

/// Run one fetch, turning a panic into [`SourceError::Panicked`].
fn fetch_guarded<F>(fetcher: &F, address: &str) -> Result<FetchedFeed, SourceError>
where
    F: FeedFetcher + ?Sized,
{
    panic::catch_unwind(AssertUnwindSafe(|| fetcher.fetch(address))).unwrap_or_else(|payload| {
        Err(SourceError::Panicked {
            address: address.to_string(),
            message: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn record(registry: &SourceRegistry, seen: &mut SeenSet, report: &mut RunReport, msg: PollMsg) {
    let PollMsg { position, outcome } = msg;
    let name = registry.name(position).unwrap_or_default();

    let feed = match outcome {
        Ok(feed) => feed,
        Err(error) => {
            warn!(
                position,
                name,
                kind = error.kind(),
                timeout = error.is_timeout(),
                %error,
                "source failed, no update this run"
            );
            report.failed.push((position, error));
            return;
        }
    };

    report.checked += 1;
    let fetched = feed.items.len();
    let reconciled = reconcile(feed.items, seen);
    debug!(position, name, fetched, new = reconciled.items.len(), "reconciled");

    report.index.record(
        position,
        FeedSnapshot {
            display_name: name.to_string(),
            channel_title: feed.channel_title,
            channel_language: feed.channel_language,
            items: reconciled.items,
            has_new_items: reconciled.has_new_items,
            observed_at_ms: Utc::now().timestamp_millis(),
        },
    );
}
