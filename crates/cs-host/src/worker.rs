//! Worker thread: drains batch jobs, transforms files in input order, and
//! reports progress and results back over the response channel.

use crate::formatter::HeaderFormatter;
use crate::protocol::{BatchResult, ProgressUpdate, WorkerRequest, WorkerResponse};
use cs_core::{OutputFormat, SourceFile, TransformMode, TransformResult};
use cs_transform::TransformPipeline;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

pub const WORKER_THREAD_NAME: &str = "codestrip-worker";

/// A request plus its cancellation flag. The flag never crosses the wire.
pub(crate) struct Job {
    pub request: WorkerRequest,
    pub cancel: Arc<AtomicBool>,
}

/// What the worker needs besides the job itself.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub pipeline: TransformPipeline,
    pub formatter: Arc<dyn HeaderFormatter>,
    pub progress_interval: usize,
}

/// Worker thread body. Returns once the job channel closes or the host stops
/// listening for responses.
pub(crate) fn run(jobs: Receiver<Job>, responses: UnboundedSender<WorkerResponse>, ctx: WorkerContext) {
    while let Ok(job) = jobs.recv() {
        let id = job.request.id;
        if job.cancel.load(Ordering::Acquire) {
            debug!(request_id = %id, "skipping superseded batch");
            continue;
        }

        let total = job.request.files.iter().filter(|f| f.is_text).count();
        let interval = ctx.progress_interval.max(1);
        let outcome = assemble(
            &job.request.files,
            job.request.mode,
            job.request.format,
            &ctx.pipeline,
            ctx.formatter.as_ref(),
            |done, file| {
                if job.cancel.load(Ordering::Acquire) {
                    return false;
                }
                if done % interval == 0 && done != total {
                    let update = ProgressUpdate::new(id, done, total, file.label());
                    return responses.send(WorkerResponse::Progress(update)).is_ok();
                }
                true
            },
        );

        let Some(result) = outcome else {
            debug!(request_id = %id, "batch cancelled between files");
            continue;
        };
        info!(
            request_id = %id,
            files = total,
            mode = %job.request.mode,
            savings = result.size_savings_percent,
            "batch complete"
        );
        let last = job
            .request
            .files
            .iter()
            .rev()
            .find(|f| f.is_text)
            .map(|f| f.label().to_string())
            .unwrap_or_default();
        let done = WorkerResponse::Progress(ProgressUpdate::new(id, total, total, last));
        if responses.send(done).is_err() || responses.send(WorkerResponse::Result(BatchResult { id, result })).is_err() {
            break;
        }
    }
    debug!("worker thread exiting");
}

/// Transform the text files of a batch in input order and assemble the
/// output lines: header, content, footer per file, with one blank line
/// between files.
///
/// `after_file` runs after each file with the count done so far; returning
/// `false` abandons the batch and yields `None`.
pub(crate) fn assemble(
    files: &[SourceFile],
    mode: TransformMode,
    format: OutputFormat,
    pipeline: &TransformPipeline,
    formatter: &dyn HeaderFormatter,
    mut after_file: impl FnMut(usize, &SourceFile) -> bool,
) -> Option<TransformResult> {
    let mut lines = Vec::new();
    let mut original_bytes = 0;
    let mut processed_bytes = 0;

    for (idx, file) in files.iter().filter(|f| f.is_text).enumerate() {
        if idx > 0 {
            lines.push(String::new());
        }
        let out = pipeline.transform_file(file, mode);
        // Files left untouched (raw mode, size guard, scan fault) go out as is.
        let content = if mode == TransformMode::Raw || out.content == file.content {
            out.content.as_str()
        } else {
            out.content.trim_matches(['\r', '\n'])
        };
        original_bytes += out.original_len;
        processed_bytes += content.len();

        let (prefix, suffix) = formatter.format_header(file.label(), &file.extension(), format);
        lines.extend(prefix);
        lines.extend(content.lines().map(str::to_string));
        lines.extend(suffix);

        if !after_file(idx + 1, file) {
            return None;
        }
    }

    Some(TransformResult::new(lines, original_bytes, processed_bytes))
}
