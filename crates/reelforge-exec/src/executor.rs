//! Generic bounded-concurrency executor.
//!
//! A single dispatcher task takes submissions in FIFO order, waits for a
//! free slot, and spawns each task holding that slot's permit. Outputs are
//! delivered on a channel in completion order.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

use crate::{Error, Result};

/// Produces the output reported for a task that panicked.
pub(crate) type PanicHandler<O> = Box<dyn FnOnce(String) -> O + Send>;

struct Submission<O> {
    task: BoxFuture<'static, O>,
    on_panic: PanicHandler<O>,
}

/// Runs at most `slots` tasks at once and reports exactly one output per
/// submitted task.
///
/// Dropping the executor (or its [`Outputs`]) before they drain abandons the
/// batch: queued tasks never start and running tasks are aborted.
pub(crate) struct BoundedExecutor<O> {
    queue: Option<mpsc::UnboundedSender<Submission<O>>>,
    outputs: Outputs<O>,
}

/// Receiving side of an executor, in completion order.
pub(crate) struct Outputs<O> {
    receiver: mpsc::UnboundedReceiver<O>,
    _abandon: DropGuard,
}

impl<O: Send + 'static> BoundedExecutor<O> {
    /// Spawn the dispatcher on the current tokio runtime.
    pub(crate) fn new(slots: usize) -> Result<Self> {
        if slots == 0 {
            return Err(Error::InvalidConcurrency(slots));
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|e| Error::NoRuntime(e.to_string()))?;

        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        runtime.spawn(dispatch(
            queue_rx,
            output_tx,
            Arc::new(Semaphore::new(slots)),
            cancel.clone(),
        ));

        Ok(Self {
            queue: Some(queue_tx),
            outputs: Outputs {
                receiver: output_rx,
                _abandon: cancel.drop_guard(),
            },
        })
    }

    /// Queue a task. Never waits for a slot.
    pub(crate) fn submit(
        &self,
        task: BoxFuture<'static, O>,
        on_panic: PanicHandler<O>,
    ) -> Result<()> {
        let queue = self.queue.as_ref().ok_or(Error::PoolClosed)?;
        queue
            .send(Submission { task, on_panic })
            .map_err(|_| Error::PoolClosed)
    }

    /// Stop accepting submissions. Already queued tasks still run.
    pub(crate) fn close(&mut self) {
        self.queue = None;
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.queue.is_none()
    }

    /// Close the executor and hand back its outputs.
    pub(crate) fn into_outputs(mut self) -> Outputs<O> {
        self.close();
        self.outputs
    }
}

impl<O> Outputs<O> {
    pub(crate) fn poll_recv(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<O>> {
        self.receiver.poll_recv(cx)
    }

    pub(crate) async fn recv(&mut self) -> Option<O> {
        self.receiver.recv().await
    }
}

async fn dispatch<O: Send + 'static>(
    mut queue: mpsc::UnboundedReceiver<Submission<O>>,
    outputs: mpsc::UnboundedSender<O>,
    slots: Arc<Semaphore>,
    cancel: CancellationToken,
) {
    // Dropping the set on any return path aborts whatever is still running.
    let mut running = JoinSet::new();

    loop {
        let submission = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(running = running.len(), "Executor abandoned");
                return;
            }
            Some(_) = running.join_next(), if !running.is_empty() => continue,
            next = queue.recv() => match next {
                Some(submission) => submission,
                None => break,
            },
        };

        // Slots are taken in submission order; the next submission is not
        // looked at until this one has started.
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            permit = Arc::clone(&slots).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return,
            },
        };

        let outputs = outputs.clone();
        running.spawn(async move {
            let Submission { task, on_panic } = submission;
            let output = match AssertUnwindSafe(task).catch_unwind().await {
                Ok(output) => output,
                Err(panic) => on_panic(panic_message(panic.as_ref())),
            };
            drop(permit);
            let _ = outputs.send(output);
        });
    }

    while !running.is_empty() {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = running.join_next() => {}
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}
