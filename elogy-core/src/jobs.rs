use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::EntriesSource;
use crate::error::FetchError;
use crate::model::EntriesPage;
use crate::request::EntriesRequest;

pub type WakeFn = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug)]
pub struct FetchOutcome {
    pub generation: u64,
    pub request: EntriesRequest,
    pub result: Result<EntriesPage, FetchError>,
}

/// Runs entry fetches in the background, one at a time.
///
/// Starting a fetch aborts the one in flight, and outcomes of superseded or
/// cancelled fetches are dropped in `try_next`, so the latest trigger always
/// wins.
pub struct FetchRunner {
    rt: Runtime,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
    current: Option<JoinHandle<()>>,
    generation: u64,
    waker: Option<WakeFn>,
}

impl FetchRunner {
    pub fn new() -> anyhow::Result<Self> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("elogy-fetch")
            .enable_all()
            .build()?;
        let (tx, rx) = mpsc::channel();
        Ok(Self { rt, tx, rx, current: None, generation: 0, waker: None })
    }

    /// Called after each outcome is queued, e.g. to wake the UI thread.
    pub fn set_waker(&mut self, waker: Option<WakeFn>) {
        self.waker = waker;
    }

    pub fn spawn(&mut self, source: Arc<dyn EntriesSource>, request: EntriesRequest) -> u64 {
        self.cancel();
        let generation = self.generation;
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        self.current = Some(self.rt.spawn(async move {
            // a panic in the source surfaces as FetchError::Task
            let result = AssertUnwindSafe(source.fetch_entries(request.clone()))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(FetchError::Task("entries source panicked".to_string())));
            let _ = tx.send(FetchOutcome { generation, request, result });
            if let Some(w) = waker {
                w();
            }
        }));
        generation
    }

    /// Aborts the current fetch. Its outcome is dropped even if it already
    /// finished and sits in the queue.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.current.take() {
            if !handle.is_finished() {
                debug!(generation = self.generation, "aborting in-flight fetch");
            }
            handle.abort();
        }
        self.generation += 1;
    }

    /// Next outcome of the current generation, skipping stale ones.
    pub fn try_next(&mut self) -> Option<FetchOutcome> {
        loop {
            match self.rx.try_recv() {
                Ok(outcome) if outcome.generation == self.generation => {
                    self.current = None;
                    return Some(outcome);
                }
                Ok(outcome) => debug!(generation = outcome.generation, current = self.generation, "dropping stale fetch outcome"),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }
}

impl Drop for FetchRunner {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttributeFilters;
    use futures_util::future::{BoxFuture, FutureExt};
    use std::time::{Duration, Instant};

    struct Delayed;

    struct Panicking;

    impl EntriesSource for Panicking {
        fn fetch_entries(&self, request: EntriesRequest) -> BoxFuture<'_, Result<EntriesPage, FetchError>> {
            async move {
                if request.logbook_id == 3 {
                    panic!("logbook 3 is broken");
                }
                Ok(EntriesPage::default())
            }
            .boxed()
        }
    }

    impl EntriesSource for Delayed {
        fn fetch_entries(&self, request: EntriesRequest) -> BoxFuture<'_, Result<EntriesPage, FetchError>> {
            async move {
                // logbook 1 answers slowly
                let delay = if request.logbook_id == 1 { 300 } else { 10 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                let mut page = EntriesPage::default();
                page.logbook.id = request.logbook_id;
                Ok(page)
            }
            .boxed()
        }
    }

    fn wait(runner: &mut FetchRunner) -> Option<FetchOutcome> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(o) = runner.try_next() {
                return Some(o);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn latest_request_wins() {
        let mut runner = FetchRunner::new().unwrap();
        let source: Arc<dyn EntriesSource> = Arc::new(Delayed);
        let filters = AttributeFilters::new();
        runner.spawn(source.clone(), EntriesRequest::new(Some(1), "", &filters, None, None));
        let second = runner.spawn(source, EntriesRequest::new(Some(2), "", &filters, None, None));
        let outcome = wait(&mut runner).expect("outcome");
        assert_eq!(outcome.generation, second);
        assert_eq!(outcome.result.unwrap().logbook.id, 2);
        std::thread::sleep(Duration::from_millis(400));
        assert!(runner.try_next().is_none());
    }

    #[test]
    fn waker_runs_after_outcome() {
        let mut runner = FetchRunner::new().unwrap();
        let (tx, rx) = mpsc::channel();
        let tx = std::sync::Mutex::new(tx);
        runner.set_waker(Some(Arc::new(move || {
            let _ = tx.lock().map(|t| t.send(()));
        })));
        runner.spawn(Arc::new(Delayed), EntriesRequest::new(Some(3), "", &AttributeFilters::new(), None, None));
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
        assert!(wait(&mut runner).is_some());
    }

    #[test]
    fn cancel_drops_queued_outcome() {
        let mut runner = FetchRunner::new().unwrap();
        runner.spawn(Arc::new(Delayed), EntriesRequest::new(Some(3), "", &AttributeFilters::new(), None, None));
        std::thread::sleep(Duration::from_millis(200));
        runner.cancel();
        assert!(runner.try_next().is_none());
    }

    #[test]
    fn panicking_source_reports_task_error() {
        let mut runner = FetchRunner::new().unwrap();
        runner.spawn(Arc::new(Panicking), EntriesRequest::new(Some(3), "", &AttributeFilters::new(), None, None));
        let outcome = wait(&mut runner).expect("outcome");
        assert!(matches!(outcome.result, Err(FetchError::Task(_))));
    }
}
