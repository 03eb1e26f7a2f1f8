//! Bounded copy worker pool
//!
//! Dispatcher + worker inbox design:
//! - single-consumer upstream `mpsc::Receiver` (dispatcher)
//! - per-worker `mpsc` inbox channels
//! - explicit sender drop on shutdown before awaiting workers
//!
//! Copies are blocking filesystem work, so each worker hands its task to
//! `spawn_blocking` and awaits it. The worker count therefore bounds the
//! number of copies in flight.

use crate::executor::{process_task, ProgressFn, LEDGER_SAVE_EVERY, PROGRESS_EVERY};
use crate::state::ResumeLedger;
use crate::stats::{Counter, SyncStats};
use crate::types::{CopyTask, SyncError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, warn};

/// State shared by every copy worker
pub(crate) struct WorkerContext {
    pub ledger: Option<Arc<ResumeLedger>>,
    pub stats: Arc<SyncStats>,
    pub processed: AtomicUsize,
    pub succeeded: AtomicUsize,
    pub total: usize,
    pub on_progress: Option<Arc<ProgressFn>>,
}

impl WorkerContext {
    /// Record one finished task and handle the progress/checkpoint cadence
    fn on_complete(&self, success: bool) {
        let done = self.processed.fetch_add(1, Ordering::SeqCst) + 1;

        if done % PROGRESS_EVERY == 0 || done == self.total {
            if let Some(callback) = &self.on_progress {
                callback(done, self.total);
            }
        }

        if success {
            let ok = self.succeeded.fetch_add(1, Ordering::SeqCst) + 1;
            if ok % LEDGER_SAVE_EVERY == 0 {
                if let Some(ledger) = &self.ledger {
                    if let Err(e) = ledger.save() {
                        warn!("cannot checkpoint resume state: {}", e);
                    }
                }
            }
        }
    }
}

/// Pool of copy workers fed through a bounded queue
pub struct CopyPool {
    runtime: Runtime,
    enqueue_tx: Option<mpsc::Sender<CopyTask>>,
    dispatcher_handle: Option<JoinHandle<()>>,
    worker_handles: Vec<JoinHandle<()>>,
}

impl CopyPool {
    /// Create a dispatcher + worker pool with bounded channels
    pub(crate) fn new(
        worker_count: usize,
        queue_capacity: usize,
        context: Arc<WorkerContext>,
    ) -> Result<Self, SyncError> {
        let workers = worker_count.max(1);
        let capacity = queue_capacity.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .enable_all()
            .build()
            .map_err(SyncError::Io)?;

        let handle = runtime.handle().clone();

        let (enqueue_tx, enqueue_rx) = mpsc::channel::<CopyTask>(capacity);

        let mut worker_txs = Vec::with_capacity(workers);
        let mut worker_handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let (worker_tx, worker_rx) = mpsc::channel::<CopyTask>(capacity);
            worker_txs.push(worker_tx);
            worker_handles.push(handle.spawn(worker_loop(worker_rx, Arc::clone(&context))));
        }

        let dispatcher_handle =
            handle.spawn(dispatcher_loop(enqueue_rx, worker_txs, Arc::clone(&context)));

        Ok(Self {
            runtime,
            enqueue_tx: Some(enqueue_tx),
            dispatcher_handle: Some(dispatcher_handle),
            worker_handles,
        })
    }

    /// Push a task into the upstream dispatcher queue, blocking when full
    pub fn enqueue(&self, task: CopyTask) -> Result<(), SyncError> {
        let sender = self
            .enqueue_tx
            .as_ref()
            .ok_or_else(|| SyncError::Validation("copy pool queue is already closed".to_string()))?;

        self.runtime.block_on(async {
            sender
                .send(task)
                .await
                .map_err(|_| SyncError::Validation("copy pool receiver is closed".to_string()))
        })
    }

    /// Close queue input and wait for dispatcher and workers to drain
    pub fn close_and_wait(mut self) -> Result<(), SyncError> {
        self.enqueue_tx.take();

        let dispatcher = self.dispatcher_handle.take();
        let workers = std::mem::take(&mut self.worker_handles);

        self.runtime.block_on(async move {
            if let Some(handle) = dispatcher {
                handle.await.map_err(map_join_error)?;
            }
            for handle in workers {
                handle.await.map_err(map_join_error)?;
            }
            Ok(())
        })
    }
}

async fn dispatcher_loop(
    mut enqueue_rx: mpsc::Receiver<CopyTask>,
    worker_txs: Vec<mpsc::Sender<CopyTask>>,
    context: Arc<WorkerContext>,
) {
    let mut next_worker = 0usize;
    let worker_len = worker_txs.len();

    while let Some(task) = enqueue_rx.recv().await {
        if worker_len == 0 {
            break;
        }

        let target = next_worker % worker_len;
        next_worker = (next_worker + 1) % worker_len;

        let path = task.relative_path.clone();
        if worker_txs[target].send(task).await.is_err() {
            // A closed inbox means the worker aborted. The task is counted
            // as failed so the summary stays honest, and the rotation has
            // already moved past the dead inbox.
            error!("copy worker {} is gone, dropping {}", target, path);
            context.stats.increment(Counter::Failed);
            context.on_complete(false);
        }
    }
    // worker_txs are dropped here, which closes worker inboxes.
}

async fn worker_loop(mut worker_rx: mpsc::Receiver<CopyTask>, context: Arc<WorkerContext>) {
    while let Some(task) = worker_rx.recv().await {
        let blocking_context = Arc::clone(&context);
        let join_result = tokio::task::spawn_blocking(move || {
            process_task(
                &task,
                blocking_context.ledger.as_deref(),
                &blocking_context.stats,
            )
        })
        .await;

        let success = match join_result {
            Ok(success) => success,
            Err(e) => {
                error!("copy worker task failed: {}", e);
                context.stats.increment(Counter::Failed);
                false
            }
        };

        context.on_complete(success);
    }
}

fn map_join_error(error: tokio::task::JoinError) -> SyncError {
    SyncError::Validation(format!("copy pool task failed: {}", error))
}
