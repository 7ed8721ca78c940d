//! TaskScope - background work owned by one coordinator
//!
//! A coordinator that waits on a service spawns the wait here. Tearing the
//! coordinator down aborts the tasks and bumps the generation, so a
//! completion that still races into the inbox is recognised as stale.
//!
//! Tasks run on the runtime handed to [`TaskScope::with_runtime`], or on the
//! ambient tokio runtime of the caller. With neither, spawning fails and the
//! caller decides how to surface it.

use std::future::Future;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct TaskScope {
    generation: u64,
    runtime: Option<Handle>,
    handles: Vec<JoinHandle<()>>,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Generation a task spawned now should report back with.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Spawn `task`, tagged with the current generation by the caller.
    pub fn spawn<F>(&mut self, task: F) -> Result<(), TryCurrentError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = match &self.runtime {
            Some(runtime) => runtime.spawn(task),
            None => Handle::try_current()?.spawn(task),
        };
        self.handles.retain(|handle| !handle.is_finished());
        self.handles.push(handle);
        Ok(())
    }

    /// Number of tasks still running.
    pub fn active(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    pub fn cancel_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        self.generation += 1;
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_cancel_aborts_and_bumps_generation() {
        let mut scope = TaskScope::new();
        let gate = Arc::new(Notify::new());
        let finished = Arc::new(AtomicBool::new(false));

        let (g, f) = (Arc::clone(&gate), Arc::clone(&finished));
        scope
            .spawn(async move {
                g.notified().await;
                f.store(true, Ordering::SeqCst);
            })
            .unwrap();
        let before = scope.generation();
        scope.cancel_all();
        gate.notify_one();
        tokio::task::yield_now().await;

        assert!(!scope.is_current(before));
        assert_eq!(scope.active(), 0);
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[test]
    fn test_spawn_without_runtime_fails() {
        let mut scope = TaskScope::new();

        assert!(scope.spawn(async {}).is_err());
        assert_eq!(scope.active(), 0);
    }

    #[test]
    fn test_spawn_on_explicit_runtime() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let mut scope = TaskScope::new().with_runtime(runtime.handle().clone());
        let (tx, rx) = tokio::sync::oneshot::channel();

        scope
            .spawn(async move {
                let _ = tx.send(42);
            })
            .unwrap();

        assert_eq!(runtime.block_on(rx).unwrap(), 42);
    }
}
