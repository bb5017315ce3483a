//! Engine worker runtime.
//!
//! Bridges the sync tick loop with the engine backends. Every request runs as a
//! task on a private tokio runtime, bounded by `budget + slack`; its reply comes back
//! through a single-slot channel that the tick loop polls without blocking.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::oneshot;

use crate::core::{EngineFault, MoveEngine, SearchRequest};
use crate::external::ExternalEngine;
use crate::negamax::NegamaxEngine;

/// Default grace on top of the think budget before a query counts as overrun.
pub const DEFAULT_TIMEOUT_SLACK: Duration = Duration::from_millis(2000);

/// Move-search implementation behind the worker.
#[derive(Debug, Clone)]
pub enum Backend {
    Builtin(NegamaxEngine),
    External(ExternalEngine),
}

impl Backend {
    pub fn describe(&self) -> String {
        match self {
            Backend::Builtin(_) => "builtin negamax".to_string(),
            Backend::External(e) => format!("external {}", e.program().display()),
        }
    }

    pub async fn search(&self, request: SearchRequest) -> Result<u8, EngineFault> {
        match self {
            Backend::External(engine) => engine.search(request).await,
            Backend::Builtin(engine) => {
                let engine = engine.clone();
                let column = tokio::task::spawn_blocking(move || {
                    engine.best_move(&request.board, request.to_move, request.budget_ms)
                })
                .await
                .map_err(|e| EngineFault::Unavailable(e.to_string()))?;
                column.ok_or_else(|| EngineFault::Unavailable("no legal column".into()))
            }
        }
    }
}

type Reply = Result<u8, EngineFault>;

/// Running worker instance.
pub struct EngineWorker {
    rt: Option<Runtime>,
    backend: Arc<Backend>,
    slack: Duration,
    inflight: Option<oneshot::Receiver<Reply>>,
}

impl EngineWorker {
    pub fn start(backend: Backend, slack: Duration) -> std::io::Result<Self> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("connect4-engine")
            .enable_all()
            .build()?;
        debug!("engine worker: {} (slack {:?})", backend.describe(), slack);
        Ok(Self {
            rt: Some(rt),
            backend: Arc::new(backend),
            slack,
            inflight: None,
        })
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn is_busy(&self) -> bool {
        self.inflight.is_some()
    }
}

impl MoveEngine for EngineWorker {
    fn submit(&mut self, request: SearchRequest) {
        let (tx, rx) = oneshot::channel::<Reply>();
        self.inflight = Some(rx);

        let Some(rt) = self.rt.as_ref() else {
            let _ = tx.send(Err(EngineFault::Unavailable("worker stopped".into())));
            return;
        };
        let backend = Arc::clone(&self.backend);
        let limit = Duration::from_millis(request.budget_ms as u64) + self.slack;
        rt.spawn(async move {
            let reply = match tokio::time::timeout(limit, backend.search(request)).await {
                Ok(reply) => reply,
                Err(_) => Err(EngineFault::Timeout {
                    budget_ms: request.budget_ms,
                }),
            };
            if let Err(fault) = &reply {
                warn!("engine worker: {fault}");
            }
            // The receiver is gone when the request was cancelled.
            let _ = tx.send(reply);
        });
    }

    fn poll(&mut self) -> Option<Reply> {
        let rx = self.inflight.as_mut()?;
        match rx.try_recv() {
            Ok(reply) => {
                self.inflight = None;
                Some(reply)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.inflight = None;
                Some(Err(EngineFault::Unavailable(
                    "search task ended without a reply".into(),
                )))
            }
        }
    }

    fn cancel(&mut self) {
        if self.inflight.take().is_some() {
            debug!("engine worker: request cancelled");
        }
    }
}

impl Drop for EngineWorker {
    fn drop(&mut self) {
        // Do not wait for a running search or child process on exit.
        if let Some(rt) = self.rt.take() {
            rt.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BitBoard;
    use crate::types::Side;
    use std::time::Instant;

    fn wait(worker: &mut EngineWorker, limit: Duration) -> Option<Reply> {
        let start = Instant::now();
        while start.elapsed() < limit {
            if let Some(reply) = worker.poll() {
                return Some(reply);
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        None
    }

    #[test]
    fn test_poll_without_request_is_none() {
        let mut worker =
            EngineWorker::start(Backend::Builtin(NegamaxEngine::new()), DEFAULT_TIMEOUT_SLACK)
                .unwrap();
        assert!(worker.poll().is_none());
        assert!(!worker.is_busy());
    }

    #[test]
    fn test_builtin_reply_arrives_once() {
        let mut worker =
            EngineWorker::start(Backend::Builtin(NegamaxEngine::new()), DEFAULT_TIMEOUT_SLACK)
                .unwrap();
        let board = BitBoard::from_columns(&[0, 6, 1, 6, 2]).unwrap();
        worker.submit(SearchRequest::new(board, Side::B, 20));

        let reply = wait(&mut worker, Duration::from_secs(5)).expect("no reply");
        assert_eq!(reply, Ok(3));
        assert!(worker.poll().is_none());
    }

    #[test]
    fn test_cancel_drops_reply() {
        let mut worker =
            EngineWorker::start(Backend::Builtin(NegamaxEngine::new()), DEFAULT_TIMEOUT_SLACK)
                .unwrap();
        worker.submit(SearchRequest::new(BitBoard::new(), Side::B, 5));
        worker.cancel();
        std::thread::sleep(Duration::from_millis(50));
        assert!(worker.poll().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_overrun_maps_to_timeout() {
        // `sleep 0 0 30` sleeps for 30 seconds; the worker gives up after 30ms.
        let mut worker = EngineWorker::start(
            Backend::External(ExternalEngine::new("sleep")),
            Duration::ZERO,
        )
        .unwrap();
        worker.submit(SearchRequest::new(BitBoard::new(), Side::B, 30));

        let reply = wait(&mut worker, Duration::from_secs(5)).expect("no reply");
        assert_eq!(reply, Err(EngineFault::Timeout { budget_ms: 30 }));
    }
}
