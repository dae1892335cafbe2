//! Per-link operation poller
//!
//! Each communication link gets one worker task that owns the link
//! exclusively. Operations are submitted through a [`PollerHandle`], queued
//! by priority, and run one at a time to completion. Communication errors are
//! retried with backoff until the operation's retry threshold is reached.

mod queue;
mod retry;

pub use queue::OpQueue;
pub use retry::RetryPolicy;

use ess_comlink::CommLink;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{EssrvError, Result};
use crate::operation::{Operation, PollStatus};

/// Submits operations to a link worker
#[derive(Debug, Clone)]
pub struct PollerHandle {
    link: String,
    tx: mpsc::UnboundedSender<Box<dyn Operation>>,
}

impl PollerHandle {
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Queue an operation on the link
    pub fn add_operation(&self, op: Box<dyn Operation>) -> Result<()> {
        self.tx
            .send(op)
            .map_err(|_| EssrvError::poller_closed(self.link.clone()))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Worker owning one communication link
pub struct LinkPoller {
    link: CommLink,
    queue: OpQueue,
    rx: mpsc::UnboundedReceiver<Box<dyn Operation>>,
    retry: RetryPolicy,
    cancel: CancellationToken,
    completed: u64,
    failed: u64,
}

impl LinkPoller {
    pub fn new(link: CommLink, retry: RetryPolicy, cancel: CancellationToken) -> (Self, PollerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = PollerHandle {
            link: link.name().to_string(),
            tx,
        };
        let poller = Self {
            link,
            queue: OpQueue::new(),
            rx,
            retry,
            cancel,
            completed: 0,
            failed: 0,
        };
        (poller, handle)
    }

    /// Start the worker on its own task
    pub fn spawn(
        link: CommLink,
        retry: RetryPolicy,
        cancel: CancellationToken,
    ) -> (PollerHandle, JoinHandle<()>) {
        let (poller, handle) = Self::new(link, retry, cancel);
        (handle, tokio::spawn(poller.run()))
    }

    /// Process operations until cancelled or every handle is dropped
    pub async fn run(mut self) {
        info!("{}: poller started", self.link.name());
        loop {
            while let Ok(op) = self.rx.try_recv() {
                self.queue.push(op);
            }
            let Some(op) = self.queue.pop() else {
                tokio::select! {
                    () = self.cancel.cancelled() => break,
                    received = self.rx.recv() => match received {
                        Some(op) => {
                            self.queue.push(op);
                            continue;
                        },
                        None => break,
                    },
                }
            };
            if self.cancel.is_cancelled() {
                break;
            }
            if self.run_operation(op).await {
                self.completed += 1;
            } else {
                self.failed += 1;
            }
        }

        let dropped = self.queue.drain().len();
        if dropped > 0 {
            debug!("{}: dropped {} queued operation(s)", self.link.name(), dropped);
        }
        info!(
            "{}: poller stopped, {} completed, {} failed, {} exchange(s)",
            self.link.name(),
            self.completed,
            self.failed,
            self.link.exchanges()
        );
    }

    /// Run one operation to completion, returning whether it succeeded
    async fn run_operation(&mut self, mut op: Box<dyn Operation>) -> bool {
        debug!(
            "{}: {} on {} at {}",
            self.link.name(),
            op.name(),
            op.device(),
            op.priority()
        );
        let mut errors = 0u32;
        loop {
            match op.poll(&mut self.link).await {
                Ok(PollStatus::Continue) => {},
                Ok(PollStatus::Done) => {
                    op.cleanup(true);
                    return true;
                },
                Err(e) => {
                    op.handle_comm_error(&e);
                    errors = errors.saturating_add(1);
                    if errors >= op.retry_threshold() {
                        warn!(
                            "{}: {} failed at {} after {} error(s): {}",
                            op.device(),
                            op.name(),
                            op.phase_name(),
                            errors,
                            e
                        );
                        op.cleanup(false);
                        return false;
                    }

                    let delay = self.retry.delay_for(errors);
                    debug!(
                        "{}: retrying {} at {} in {:?}",
                        op.device(),
                        op.name(),
                        op.phase_name(),
                        delay
                    );
                    tokio::select! {
                        () = self.cancel.cancelled() => {
                            op.cleanup(false);
                            return false;
                        },
                        () = tokio::time::sleep(delay) => {},
                    }
                },
            }
        }
    }
}
