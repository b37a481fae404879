//! Execution host: one worker thread, one in-flight request, latest wins.
//!
//! `submit` is synchronous. It fails any pending request with `Cancelled`,
//! then either answers inline (raw mode) or queues a job for the worker. A
//! dispatcher task on the tokio runtime matches worker responses to the
//! pending request by id and drops anything stale.

use crate::formatter::HeaderFormatter;
use crate::protocol::{ProgressUpdate, WorkerRequest, WorkerResponse};
use crate::worker::{self, Job, WorkerContext, WORKER_THREAD_NAME};
use cs_core::{
    OutputFormat, RequestId, Result, SourceFile, StripConfig, StripError, TransformMode, TransformResult,
};
use cs_transform::TransformPipeline;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc as tokio_mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type Reply = oneshot::Sender<Result<TransformResult>>;

struct Pending {
    id: RequestId,
    reply: Reply,
    cancel: Arc<AtomicBool>,
}

impl Pending {
    fn fail(self, err: StripError) {
        self.cancel.store(true, Ordering::Release);
        let _ = self.reply.send(Err(err));
    }
}

/// State shared between the host, its request handles and the dispatcher.
struct Shared {
    pending: Mutex<Option<Pending>>,
    progress: broadcast::Sender<ProgressUpdate>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Option<Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install `next` as the in-flight request and cancel whatever it replaces.
    fn supersede(&self, next: Option<Pending>) {
        let previous = std::mem::replace(&mut *self.lock(), next);
        if let Some(prev) = previous {
            debug!(request_id = %prev.id, "superseded by a newer request");
            let request_id = prev.id;
            prev.fail(StripError::Cancelled { request_id });
        }
    }

    fn take_if(&self, id: RequestId) -> Option<Pending> {
        let mut slot = self.lock();
        if slot.as_ref().is_some_and(|p| p.id == id) {
            slot.take()
        } else {
            None
        }
    }

    fn is_current(&self, id: RequestId) -> bool {
        self.lock().as_ref().is_some_and(|p| p.id == id)
    }
}

/// Runs transform batches off the caller's thread. Must be created inside a
/// tokio runtime. Dropping the host terminates it.
pub struct ExecutionHost {
    shared: Arc<Shared>,
    jobs: Option<mpsc::Sender<Job>>,
    dispatcher: Option<JoinHandle<()>>,
    ctx: WorkerContext,
    timeout: Duration,
}

impl ExecutionHost {
    pub fn create(config: &StripConfig, formatter: impl HeaderFormatter + 'static) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| StripError::Other(anyhow::anyhow!("execution host needs a tokio runtime: {e}")))?;

        let ctx = WorkerContext {
            pipeline: TransformPipeline::new(config.pipeline.clone()),
            formatter: Arc::new(formatter),
            progress_interval: config.host.progress_interval,
        };
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (resp_tx, resp_rx) = tokio_mpsc::unbounded_channel();

        let worker_ctx = ctx.clone();
        std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || worker::run(job_rx, resp_tx, worker_ctx))
            .map_err(StripError::WorkerSpawn)?;

        let (progress, _) = broadcast::channel(config.host.progress_buffer.max(1));
        let shared = Arc::new(Shared { pending: Mutex::new(None), progress });
        let dispatcher = runtime.spawn(dispatch(Arc::clone(&shared), resp_rx));

        debug!(timeout_ms = config.host.request_timeout_ms, "execution host started");
        Ok(Self {
            shared,
            jobs: Some(job_tx),
            dispatcher: Some(dispatcher),
            ctx,
            timeout: config.host.request_timeout(),
        })
    }

    /// Start a batch. Any request still in flight resolves with `Cancelled`.
    pub fn submit(&self, files: Vec<SourceFile>, mode: TransformMode, format: OutputFormat) -> RequestHandle {
        let id = RequestId::new();
        let (reply, rx) = oneshot::channel();
        let handle = RequestHandle {
            id,
            rx,
            timeout: self.timeout,
            shared: Arc::clone(&self.shared),
        };

        let Some(jobs) = self.jobs.as_ref() else {
            let _ = reply.send(Err(StripError::HostClosed));
            return handle;
        };

        if mode == TransformMode::Raw {
            self.shared.supersede(None);
            let outcome = worker::assemble(&files, mode, format, &self.ctx.pipeline, self.ctx.formatter.as_ref(), |_, _| true);
            let _ = reply.send(Ok(outcome.unwrap_or_default()));
            return handle;
        }

        let cancel = Arc::new(AtomicBool::new(false));
        self.shared.supersede(Some(Pending { id, reply, cancel: Arc::clone(&cancel) }));
        debug!(request_id = %id, files = files.len(), %mode, %format, "dispatching batch");
        let job = Job {
            request: WorkerRequest { id, files, format, mode },
            cancel,
        };
        if jobs.send(job).is_err() {
            if let Some(p) = self.shared.take_if(id) {
                p.fail(StripError::HostClosed);
            }
        }
        handle
    }

    /// `submit` and wait for the outcome.
    pub async fn run(&self, files: Vec<SourceFile>, mode: TransformMode, format: OutputFormat) -> Result<TransformResult> {
        self.submit(files, mode, format).wait().await
    }

    /// Progress for the in-flight request. Updates for superseded requests
    /// are never sent.
    pub fn subscribe_progress(&self) -> broadcast::Receiver<ProgressUpdate> {
        self.shared.progress.subscribe()
    }

    pub fn is_terminated(&self) -> bool {
        self.jobs.is_none()
    }

    /// Stop the worker and fail any pending request with `HostClosed`.
    /// Idempotent.
    pub fn terminate(&mut self) {
        let Some(jobs) = self.jobs.take() else { return };
        drop(jobs);
        let pending = self.shared.lock().take();
        if let Some(p) = pending {
            p.fail(StripError::HostClosed);
        }
        if let Some(dispatcher) = self.dispatcher.take() {
            dispatcher.abort();
        }
        debug!("execution host terminated");
    }
}

impl Drop for ExecutionHost {
    fn drop(&mut self) {
        self.terminate();
    }
}

async fn dispatch(shared: Arc<Shared>, mut responses: tokio_mpsc::UnboundedReceiver<WorkerResponse>) {
    while let Some(msg) = responses.recv().await {
        match msg {
            WorkerResponse::Progress(update) => {
                if shared.is_current(update.id) {
                    let _ = shared.progress.send(update);
                }
            }
            WorkerResponse::Result(batch) => match shared.take_if(batch.id) {
                Some(p) => {
                    let _ = p.reply.send(Ok(batch.result));
                }
                None => debug!(request_id = %batch.id, "discarding stale result"),
            },
        }
    }
    debug!("worker response channel closed");
}

/// The caller's side of one submitted request.
pub struct RequestHandle {
    id: RequestId,
    rx: oneshot::Receiver<Result<TransformResult>>,
    timeout: Duration,
    shared: Arc<Shared>,
}

impl RequestHandle {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Wait for the result. Fails with `Cancelled` when superseded, `Timeout`
    /// after the configured timeout, `HostClosed` when the host goes away.
    pub async fn wait(self) -> Result<TransformResult> {
        let RequestHandle { id, rx, timeout, shared } = self;
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(StripError::HostClosed),
            Err(_) => {
                if let Some(p) = shared.take_if(id) {
                    p.cancel.store(true, Ordering::Release);
                }
                warn!(request_id = %id, after = ?timeout, "request timed out");
                Err(StripError::Timeout { request_id: id, after: timeout })
            }
        }
    }
}
