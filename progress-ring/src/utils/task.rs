//! Defines the progress-ring task runner.
use std::future::Future;

use log::error;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;

use crate::errors::{Error, RuntimeError, Unknown};

/// Represents the outcome of a task.
/// A task may return either `()` or `Result<(), Error>`: both are converted to a `TaskResult`
/// sent back to the runtime.
pub enum TaskResult {
    Ok,
    Err(Error),
}

/// Represents a handler to a running task (used to abort it).
pub type TaskHandler = JoinHandle<Result<(), Error>>;

type TaskReceiver = UnboundedReceiver<TaskResult>;

/// Globally accessible runtime transmitter(TX)/receiver(RX): each spawned task sends the receiving
/// end of its own result channel through it.
pub static RUNTIME_TX: OnceCell<Mutex<Option<UnboundedSender<TaskReceiver>>>> =
    OnceCell::const_new();
pub static RUNTIME_RX: OnceCell<tokio::sync::Mutex<UnboundedReceiver<TaskReceiver>>> =
    OnceCell::const_new();

impl From<Result<(), Error>> for TaskResult {
    fn from(result: Result<(), Error>) -> Self {
        match result {
            Ok(_) => TaskResult::Ok,
            Err(e) => TaskResult::Err(e),
        }
    }
}

impl From<()> for TaskResult {
    fn from(_: ()) -> Self {
        TaskResult::Ok
    }
}

/// Creates the global task channel (once).
pub async fn init_task_channel() {
    RUNTIME_RX
        .get_or_init(|| async {
            let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<TaskReceiver>();
            RUNTIME_TX
                .get_or_init(|| async { Mutex::new(Some(tx)) })
                .await;
            tokio::sync::Mutex::new(rx)
        })
        .await;
}

/// Waits for every task registered through [`run`] to be done, including the tasks spawned by
/// those tasks while waiting.
///
/// Failed tasks are logged: they do not interrupt the wait.
pub async fn join_all() {
    let Some(cell) = RUNTIME_RX.get() else {
        return;
    };
    let mut receiver = cell.lock().await;

    while let Ok(mut task_receiver) = receiver.try_recv() {
        // An aborted task never sends its result: recv() then returns None.
        if let Some(TaskResult::Err(err)) = task_receiver.recv().await {
            error!("Task failed: {}", err);
        }
    }
}

/// Runs a given future as a tokio task while ensuring the main function (marked by
/// `#[progress_ring::runtime]`) will not finish before the task is done.
///
/// # Errors
/// Returns a `RuntimeError` when called outside a tokio runtime or before the task channel was
/// initialised (ie outside `#[progress_ring::runtime]`).
///
/// # Example
/// ```no_run
/// use progress_ring::utils::task;
///
/// #[progress_ring::runtime]
/// async fn main() {
///     task::run(async move {
///         // whatever
///     })
///     .unwrap();
/// }
/// ```
pub fn run<F, T>(future: F) -> Result<TaskHandler, Error>
where
    F: Future<Output = T> + Send + 'static,
    T: Into<TaskResult> + Send + 'static,
{
    let handle = Handle::try_current().map_err(|_| RuntimeError)?;
    let cell = RUNTIME_TX.get().ok_or(RuntimeError)?;
    let mut lock = cell.lock();
    let runtime_tx = lock.as_mut().ok_or(RuntimeError)?;

    // Channel dedicated to this task result.
    let (task_tx, task_rx) = tokio::sync::mpsc::unbounded_channel();

    let handler = handle.spawn(async move {
        let result = future.await.into();
        task_tx.send(result).map_err(|err| Unknown {
            info: err.to_string(),
        })?;
        Ok::<(), Error>(())
    });

    runtime_tx.send(task_rx).map_err(|err| Unknown {
        info: err.to_string(),
    })?;

    Ok(handler)
}

#[macro_export]
macro_rules! pause {
    ($ms:expr) => {
        $crate::utils::tokio::time::sleep($crate::utils::tokio::time::Duration::from_millis(
            $ms as u64,
        ))
        .await
    };
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU8, Ordering};
    use std::sync::Arc;
    use std::time::SystemTime;

    use serial_test::serial;

    use crate::errors::{Error, Unknown};
    use crate::pause;
    use crate::utils::task;

    #[progress_ring_macros::runtime]
    async fn my_runtime() -> Result<(), Error> {
        task::run(async move {
            pause!(500);
            task::run(async move {
                pause!(100);
                task::run(async move {
                    pause!(100);
                })?;
                Ok::<(), Error>(())
            })?;
            Ok::<(), Error>(())
        })?;

        task::run(async move {
            pause!(500);
        })?;

        task::run(async move {
            pause!(500);
        })?;

        Ok(())
    }

    #[test]
    #[serial]
    fn test_task_parallel_execution() {
        // Tasks run in parallel and the runtime waits for all of them (nested ones included):
        // it lasts longer than the longest chain but less than the sum of all tasks.
        let start = SystemTime::now();
        my_runtime().unwrap();
        let end = SystemTime::now();

        let duration = end.duration_since(start).unwrap().as_millis();
        assert!(
            duration >= 700,
            "Duration should be at least 700ms (found: {})",
            duration,
        );
        assert!(
            duration < 1500,
            "Duration should be lower than 1500ms (found: {})",
            duration,
        );
    }

    #[test]
    #[serial]
    fn test_task_outside_runtime() {
        let result = task::run(async move {});
        assert!(matches!(result, Err(Error::RuntimeError)));
    }

    #[progress_ring_macros::test]
    #[serial]
    async fn test_task_abort_execution() {
        let flag = Arc::new(AtomicU8::new(0));
        let flag_clone = flag.clone();

        task::run(async move {
            pause!(100);
            flag_clone.fetch_add(1, Ordering::SeqCst);
        })
        .expect("Should not panic");

        pause!(50);
        assert_eq!(flag.load(Ordering::SeqCst), 0, "Not updated before 100ms");
        pause!(100);
        assert_eq!(flag.load(Ordering::SeqCst), 1, "Updated after 100ms");

        // Same again, but aborted halfway.
        let flag_clone = flag.clone();
        let handler = task::run(async move {
            pause!(100);
            flag_clone.fetch_add(1, Ordering::SeqCst);
        })
        .expect("Should not panic");

        pause!(50);
        handler.abort();
        pause!(100);
        assert_eq!(flag.load(Ordering::SeqCst), 1, "Aborted task never updates");
    }

    #[progress_ring_macros::test]
    #[serial]
    async fn test_task_with_result() {
        let task = task::run(async move { Ok::<(), Error>(()) });
        assert!(task.is_ok(), "An Ok(()) task does not fail the runtime");

        let task = task::run(async move {
            Err::<(), Error>(Unknown {
                info: "wow panic!".to_string(),
            })
        });
        assert!(task.is_ok(), "A failing task does not fail the runtime");
    }
}
