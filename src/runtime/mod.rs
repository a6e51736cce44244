//! Runtime adapters: executors the scheduler can dispatch onto.

#[cfg(feature = "tokio-runtime")]
pub mod tokio_executor;
#[cfg(not(target_arch = "wasm32"))]
pub mod worker_threads;

#[cfg(feature = "tokio-runtime")]
pub use tokio_executor::TokioExecutor;
#[cfg(not(target_arch = "wasm32"))]
pub use worker_threads::WorkerThreadExecutor;
