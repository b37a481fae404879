//! Execution host: runs transform batches on a dedicated worker thread with
//! latest-request-wins cancellation, timeouts and progress reporting.

pub mod formatter;
pub mod host;
pub mod protocol;
pub mod worker;

pub use formatter::{BareFormatter, HeaderFormatter, StandardFormatter};
pub use host::{ExecutionHost, RequestHandle};
pub use protocol::{ProgressUpdate, WorkerRequest, WorkerResponse};
