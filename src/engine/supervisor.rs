// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured supervision of the per-project tasks and the update watchdog.
//!
//! Each task runs in its own tokio task. A task that panics, or returns while
//! the shutdown token is still live, is restarted after `restart_delay`. The
//! shared [`CancellationToken`] is the only shutdown signal: cancelling it from
//! outside yields [`RunOutcome::Shutdown`], an applied update yields
//! [`RunOutcome::Restart`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{AbortHandle, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::engine::watchdog::{UpdateWatchdog, WatchdogExit};
use crate::observability::messages::supervisor::{
    NoProjects, OrchestratorCrashed, ShutdownRequested, SupervisorStarted,
};
use crate::observability::messages::StructuredLog;

type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
type TaskFactory = Arc<dyn Fn(CancellationToken) -> TaskFuture + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Shutdown,
    Restart,
}

struct SupervisedTask {
    name: String,
    factory: TaskFactory,
}

pub struct Supervisor {
    token: CancellationToken,
    restart_delay: Duration,
    shutdown_grace: Duration,
    tasks: Vec<SupervisedTask>,
    watchdog: Option<UpdateWatchdog>,
}

impl Supervisor {
    pub fn new(token: CancellationToken, restart_delay: Duration, shutdown_grace: Duration) -> Self {
        Self {
            token,
            restart_delay,
            shutdown_grace,
            tasks: Vec::new(),
            watchdog: None,
        }
    }

    /// Register a task. `factory` is called for the first start and again for
    /// every restart.
    pub fn add_task<F, Fut>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.tasks.push(SupervisedTask {
            name: name.into(),
            factory: Arc::new(move |token| Box::pin(factory(token)) as TaskFuture),
        });
    }

    pub fn with_watchdog(mut self, watchdog: UpdateWatchdog) -> Self {
        self.watchdog = Some(watchdog);
        self
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub async fn run(self) -> RunOutcome {
        SupervisorStarted {
            project_count: self.tasks.len(),
            watchdog_enabled: self.watchdog.is_some(),
        }
        .log();
        if self.tasks.is_empty() {
            NoProjects {
                watchdog_enabled: self.watchdog.is_some(),
            }
            .log();
        }

        let mut workers = JoinSet::new();
        for task in self.tasks {
            workers.spawn(supervise(task, self.token.clone(), self.restart_delay));
        }

        let outcome = match &self.watchdog {
            Some(watchdog) => match watchdog.run(self.token.clone()).await {
                WatchdogExit::RestartRequested => RunOutcome::Restart,
                WatchdogExit::Cancelled => RunOutcome::Shutdown,
            },
            None => {
                self.token.cancelled().await;
                RunOutcome::Shutdown
            }
        };

        let reason = match outcome {
            RunOutcome::Restart => "update applied",
            RunOutcome::Shutdown => "shutdown signal",
        };
        ShutdownRequested {
            reason,
            grace: self.shutdown_grace,
        }
        .log();
        self.token.cancel();

        let drained = tokio::time::timeout(self.shutdown_grace, async {
            while workers.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            tracing::warn!(
                remaining = workers.len(),
                "Workers still busy after the grace period, aborting them"
            );
            workers.shutdown().await;
        }

        outcome
    }
}

/// Aborts the wrapped task when dropped, so aborting `supervise` also stops
/// the orchestrator it is awaiting.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn supervise(task: SupervisedTask, token: CancellationToken, restart_delay: Duration) {
    loop {
        let handle = tokio::spawn((task.factory)(token.clone()));
        let _guard = AbortOnDrop(handle.abort_handle());
        let result = handle.await;
        if token.is_cancelled() {
            return;
        }

        let reason = match result {
            Ok(()) => "returned before shutdown".to_string(),
            Err(e) => describe_failure(e),
        };
        OrchestratorCrashed {
            project: &task.name,
            reason: &reason,
            restart_in: restart_delay,
        }
        .log();

        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(restart_delay) => {}
        }
    }
}

fn describe_failure(error: JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }
    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::ScriptedUpdateSource;
    use crate::config::WatchdogConfig;
    use crate::traits::UpdateStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn supervisor(token: &CancellationToken) -> Supervisor {
        Supervisor::new(
            token.clone(),
            Duration::from_millis(10),
            Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn restarts_a_crashed_task() {
        let token = CancellationToken::new();
        let starts = Arc::new(AtomicUsize::new(0));

        let mut sup = supervisor(&token);
        let counter = starts.clone();
        sup.add_task("alpha", move |token: CancellationToken| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    panic!("first start blows up");
                }
                token.cancelled().await;
            }
        });

        let run = tokio::spawn(sup.run());
        for _ in 0..200 {
            if starts.load(Ordering::SeqCst) >= 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        token.cancel();

        assert_eq!(run.await.unwrap(), RunOutcome::Shutdown);
        assert_eq!(starts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stops_all_tasks_on_cancellation() {
        let token = CancellationToken::new();
        let stopped = Arc::new(AtomicUsize::new(0));

        let mut sup = supervisor(&token);
        for name in ["alpha", "beta"] {
            let stopped = stopped.clone();
            sup.add_task(name, move |token: CancellationToken| {
                let stopped = stopped.clone();
                async move {
                    token.cancelled().await;
                    stopped.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
        assert_eq!(sup.task_count(), 2);

        let run = tokio::spawn(sup.run());
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        assert_eq!(run.await.unwrap(), RunOutcome::Shutdown);
        assert_eq!(stopped.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn applied_update_requests_restart_and_cancels_workers() {
        let token = CancellationToken::new();
        let source = Arc::new(ScriptedUpdateSource::new([Ok(
            UpdateStatus::UpdateAvailable {
                local: "aaaaaaa".into(),
                remote: "bbbbbbb".into(),
            },
        )]));

        let mut sup = supervisor(&token)
            .with_watchdog(UpdateWatchdog::new(source, &WatchdogConfig::default()));
        sup.add_task("alpha", |token: CancellationToken| async move {
            token.cancelled().await;
        });

        assert_eq!(sup.run().await, RunOutcome::Restart);
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn aborts_tasks_that_ignore_shutdown() {
        struct SetOnDrop(Arc<AtomicUsize>);
        impl Drop for SetOnDrop {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let token = CancellationToken::new();
        let dropped = Arc::new(AtomicUsize::new(0));

        let mut sup = Supervisor::new(
            token.clone(),
            Duration::from_millis(10),
            Duration::from_millis(50),
        );
        let flag = dropped.clone();
        sup.add_task("stubborn", move |_token: CancellationToken| {
            let marker = SetOnDrop(flag.clone());
            async move {
                let _marker = marker;
                std::future::pending::<()>().await;
            }
        });

        let run = tokio::spawn(sup.run());
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
        assert_eq!(run.await.unwrap(), RunOutcome::Shutdown);

        for _ in 0..100 {
            if dropped.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn runs_with_no_projects() {
        let token = CancellationToken::new();
        let sup = supervisor(&token);
        token.cancel();
        assert_eq!(sup.run().await, RunOutcome::Shutdown);
    }
}
