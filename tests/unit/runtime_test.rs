//! Tests for executor adapters

use std::time::Duration;

use lifo_scheduler::core::{Completion, Executor};
use lifo_scheduler::runtime::{TokioExecutor, WorkerThreadExecutor};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_executor_run() {
    let executor = TokioExecutor::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel();
    executor.run(
        Box::new(move || {
            tx.send(123).unwrap();
        }),
        Completion::new(move || {
            done_tx.send(()).unwrap();
        }),
    );

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
    done_rx.await.expect("completion fired");
}

#[test]
fn test_tokio_executor_owned_runtime() {
    let executor = TokioExecutor::with_worker_threads(1).unwrap();
    let (tx, rx) = std::sync::mpsc::channel();
    executor.run(
        Box::new(|| {}),
        Completion::new(move || {
            tx.send(()).unwrap();
        }),
    );
    rx.recv_timeout(Duration::from_secs(5)).unwrap();
}

#[test]
fn test_worker_thread_executor_defaults_to_cpu_count() {
    let executor = WorkerThreadExecutor::with_default_workers().unwrap();
    assert_eq!(executor.worker_count(), num_cpus::get().max(1));
    executor.shutdown();
    assert!(executor.is_shut_down());
}
